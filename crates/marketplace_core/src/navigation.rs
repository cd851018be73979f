//! crates/marketplace_core/src/navigation.rs
//!
//! The lesson player's state machine. A `LearningSession` owns one course, a
//! cursor into its module/lesson arrays, and the set of lessons completed so far.
//! Nothing here is persisted; loading another course starts over.

use crate::domain::{Course, Lesson, Module};
use std::collections::BTreeSet;

/// Position within a course, by array index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LessonCursor {
    pub module_index: usize,
    pub lesson_index: usize,
}

impl LessonCursor {
    pub fn new(module_index: usize, lesson_index: usize) -> Self {
        Self {
            module_index,
            lesson_index,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NavigationError {
    #[error("No lesson at module {module_index}, lesson {lesson_index}")]
    InvalidCoordinate {
        module_index: usize,
        lesson_index: usize,
    },
}

/// The state for a single learner working through a single course.
#[derive(Debug, Clone)]
pub struct LearningSession {
    course: Course,
    cursor: LessonCursor,
    completed: BTreeSet<String>,
}

impl LearningSession {
    /// Starts at the first lesson of the course with nothing completed.
    pub fn new(course: Course) -> Self {
        let cursor = first_lesson(&course).unwrap_or_default();
        Self {
            course,
            cursor,
            completed: BTreeSet::new(),
        }
    }

    /// Switches to another course, resetting the cursor and the completed set.
    pub fn load_course(&mut self, course: Course) {
        *self = Self::new(course);
    }

    pub fn course(&self) -> &Course {
        &self.course
    }

    pub fn cursor(&self) -> LessonCursor {
        self.cursor
    }

    pub fn completed(&self) -> &BTreeSet<String> {
        &self.completed
    }

    pub fn is_completed(&self, lesson_id: &str) -> bool {
        self.completed.contains(lesson_id)
    }

    pub fn current_module(&self) -> Option<&Module> {
        self.course.modules.get(self.cursor.module_index)
    }

    /// `None` only when the course has no lessons at all.
    pub fn current_lesson(&self) -> Option<&Lesson> {
        self.current_module()
            .and_then(|m| m.lessons.get(self.cursor.lesson_index))
    }

    pub fn total_lessons(&self) -> usize {
        self.course.total_lessons()
    }

    /// 1-based position of the current lesson across the whole course.
    pub fn current_lesson_number(&self) -> Option<usize> {
        self.current_lesson()?;
        let before: usize = self.course.modules[..self.cursor.module_index]
            .iter()
            .map(|m| m.lessons.len())
            .sum();
        Some(before + self.cursor.lesson_index + 1)
    }

    pub fn is_first(&self) -> bool {
        first_lesson(&self.course) == Some(self.cursor)
    }

    pub fn is_last(&self) -> bool {
        last_lesson(&self.course) == Some(self.cursor)
    }

    /// Jumps straight to the given coordinates.
    pub fn select_lesson(
        &mut self,
        module_index: usize,
        lesson_index: usize,
    ) -> Result<(), NavigationError> {
        let exists = self
            .course
            .modules
            .get(module_index)
            .is_some_and(|m| lesson_index < m.lessons.len());
        if !exists {
            return Err(NavigationError::InvalidCoordinate {
                module_index,
                lesson_index,
            });
        }
        self.cursor = LessonCursor::new(module_index, lesson_index);
        Ok(())
    }

    /// Moves to the next lesson, crossing into the next module when needed.
    /// Returns `false` (and leaves the cursor alone) at the last lesson.
    pub fn advance(&mut self) -> bool {
        let Some(module) = self.current_module() else {
            return false;
        };
        if self.cursor.lesson_index + 1 < module.lessons.len() {
            self.cursor.lesson_index += 1;
            return true;
        }

        let next = (self.cursor.module_index + 1..self.course.modules.len())
            .find(|&i| !self.course.modules[i].lessons.is_empty());
        match next {
            Some(module_index) => {
                self.cursor = LessonCursor::new(module_index, 0);
                true
            }
            None => false,
        }
    }

    /// Moves to the previous lesson, crossing back to the last lesson of the
    /// previous module when needed. Returns `false` at the first lesson.
    pub fn retreat(&mut self) -> bool {
        if self.current_lesson().is_none() {
            return false;
        }
        if self.cursor.lesson_index > 0 {
            self.cursor.lesson_index -= 1;
            return true;
        }

        let previous = (0..self.cursor.module_index)
            .rev()
            .find(|&i| !self.course.modules[i].lessons.is_empty());
        match previous {
            Some(module_index) => {
                let last = self.course.modules[module_index].lessons.len() - 1;
                self.cursor = LessonCursor::new(module_index, last);
                true
            }
            None => false,
        }
    }

    /// Records the current lesson as completed. Returns `true` if it was not
    /// already in the set.
    pub fn mark_current_complete(&mut self) -> bool {
        match self.current_lesson().map(|l| l.id.clone()) {
            Some(id) => self.completed.insert(id),
            None => false,
        }
    }

    /// Completed lessons as a percentage of all lessons; 0 for an empty course.
    pub fn progress_percent(&self) -> f64 {
        let total = self.total_lessons();
        if total == 0 {
            return 0.0;
        }
        self.completed.len() as f64 * 100.0 / total as f64
    }
}

fn first_lesson(course: &Course) -> Option<LessonCursor> {
    course
        .modules
        .iter()
        .position(|m| !m.lessons.is_empty())
        .map(|module_index| LessonCursor::new(module_index, 0))
}

fn last_lesson(course: &Course) -> Option<LessonCursor> {
    course
        .modules
        .iter()
        .rposition(|m| !m.lessons.is_empty())
        .map(|module_index| {
            LessonCursor::new(module_index, course.modules[module_index].lessons.len() - 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::tests::course;
    use crate::domain::{LessonType, Level};

    fn lesson(id: &str) -> Lesson {
        Lesson {
            id: id.to_string(),
            title: format!("Lesson {}", id),
            lesson_type: LessonType::Video,
            duration: "10:00".to_string(),
            content: String::new(),
            video_url: None,
            order: 1,
        }
    }

    fn module(id: &str, lessons: &[&str]) -> Module {
        Module {
            id: id.to_string(),
            title: format!("Module {}", id),
            description: String::new(),
            duration: "1h".to_string(),
            lessons: lessons.iter().map(|l| lesson(l)).collect(),
            order: 1,
        }
    }

    fn course_with(modules: Vec<Module>) -> Course {
        let mut c = course("c", "web-development", Level::Beginner, 10.0, 4.0, 1, "2023-01-01");
        c.modules = modules;
        c
    }

    fn current_id(session: &LearningSession) -> &str {
        session.current_lesson().map(|l| l.id.as_str()).unwrap_or("")
    }

    #[test]
    fn walks_across_module_boundaries() {
        let mut session = LearningSession::new(course_with(vec![
            module("m1", &["A", "B"]),
            module("m2", &["C"]),
        ]));
        assert_eq!(session.cursor(), LessonCursor::new(0, 0));
        assert_eq!(current_id(&session), "A");

        assert!(session.advance());
        assert_eq!(session.cursor(), LessonCursor::new(0, 1));
        assert!(session.advance());
        assert_eq!(session.cursor(), LessonCursor::new(1, 0));
        assert_eq!(current_id(&session), "C");
        assert!(session.is_last());

        assert!(!session.advance());
        assert_eq!(current_id(&session), "C");

        assert!(session.retreat());
        assert_eq!(session.cursor(), LessonCursor::new(0, 1));
        assert_eq!(current_id(&session), "B");
    }

    #[test]
    fn full_traversal_takes_total_minus_one_steps_each_way() {
        let mut session = LearningSession::new(course_with(vec![
            module("m1", &["a", "b", "c"]),
            module("m2", &["d"]),
            module("m3", &["e", "f"]),
        ]));
        let total = session.total_lessons();
        assert_eq!(total, 6);

        for _ in 0..total - 1 {
            assert!(session.advance());
        }
        assert!(session.is_last());
        let terminal = session.cursor();
        assert!(!session.advance());
        assert_eq!(session.cursor(), terminal);

        for _ in 0..total - 1 {
            assert!(session.retreat());
        }
        assert_eq!(session.cursor(), LessonCursor::new(0, 0));
        assert!(session.is_first());
        assert!(!session.retreat());
        assert_eq!(session.cursor(), LessonCursor::new(0, 0));
    }

    #[test]
    fn marking_complete_is_idempotent() {
        let mut session = LearningSession::new(course_with(vec![module("m1", &["a", "b"])]));
        assert!(session.mark_current_complete());
        assert!(!session.mark_current_complete());
        assert_eq!(session.completed().len(), 1);
        assert!(session.is_completed("a"));
    }

    #[test]
    fn progress_is_completed_over_total() {
        let ids = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10"];
        let mut session = LearningSession::new(course_with(vec![
            module("m1", &ids[..4]),
            module("m2", &ids[4..]),
        ]));
        for _ in 0..3 {
            session.mark_current_complete();
            session.advance();
        }
        assert_eq!(session.progress_percent(), 30.0);
    }

    #[test]
    fn select_lesson_rejects_out_of_range_coordinates() {
        let mut session = LearningSession::new(course_with(vec![
            module("m1", &["a", "b"]),
            module("m2", &["c"]),
        ]));
        assert_eq!(
            session.select_lesson(1, 1),
            Err(NavigationError::InvalidCoordinate { module_index: 1, lesson_index: 1 })
        );
        assert_eq!(
            session.select_lesson(5, 0),
            Err(NavigationError::InvalidCoordinate { module_index: 5, lesson_index: 0 })
        );
        assert_eq!(session.cursor(), LessonCursor::new(0, 0));

        session.select_lesson(1, 0).unwrap();
        assert_eq!(current_id(&session), "c");
        assert_eq!(session.current_lesson_number(), Some(3));
    }

    #[test]
    fn empty_course_is_inert() {
        let mut session = LearningSession::new(course_with(Vec::new()));
        assert!(session.current_lesson().is_none());
        assert!(!session.advance());
        assert!(!session.retreat());
        assert!(!session.mark_current_complete());
        assert_eq!(session.progress_percent(), 0.0);
        assert_eq!(session.current_lesson_number(), None);
    }

    #[test]
    fn empty_modules_are_skipped() {
        let mut session = LearningSession::new(course_with(vec![
            module("m0", &[]),
            module("m1", &["a"]),
            module("m2", &[]),
            module("m3", &["b"]),
        ]));
        assert_eq!(session.cursor(), LessonCursor::new(1, 0));
        assert!(session.is_first());
        assert!(session.advance());
        assert_eq!(session.cursor(), LessonCursor::new(3, 0));
        assert!(session.retreat());
        assert_eq!(session.cursor(), LessonCursor::new(1, 0));
        assert!(!session.retreat());
    }

    #[test]
    fn loading_a_course_resets_state() {
        let mut session = LearningSession::new(course_with(vec![module("m1", &["a", "b"])]));
        session.advance();
        session.mark_current_complete();

        session.load_course(course_with(vec![module("x", &["x1"])]));
        assert_eq!(session.cursor(), LessonCursor::new(0, 0));
        assert!(session.completed().is_empty());
        assert_eq!(current_id(&session), "x1");
    }
}
