//! crates/marketplace_core/src/dashboard.rs
//!
//! Role-specific dashboard data: the navigation each role sees and the
//! statistics shown on its overview page.

use crate::catalog::by_instructor;
use crate::domain::{Course, Role, User};

/// A single entry in the dashboard sidebar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavItem {
    pub href: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

const fn item(href: &'static str, label: &'static str, icon: &'static str) -> NavItem {
    NavItem { href, label, icon }
}

const SHARED_ITEMS: [NavItem; 2] = [
    item("/dashboard/profile", "Profile", "user"),
    item("/dashboard/settings", "Settings", "settings"),
];

const STUDENT_ITEMS: [NavItem; 2] = [
    item("/dashboard/student", "My Learning", "book-open"),
    item("/dashboard/student/certificates", "Certificates", "award"),
];

const INSTRUCTOR_ITEMS: [NavItem; 4] = [
    item("/dashboard/instructor", "Overview", "bar-chart"),
    item("/dashboard/instructor/courses", "My Courses", "book-open"),
    item("/dashboard/instructor/students", "Students", "users"),
    item("/dashboard/instructor/analytics", "Analytics", "bar-chart"),
];

const ADMIN_ITEMS: [NavItem; 5] = [
    item("/dashboard/admin", "Overview", "bar-chart"),
    item("/dashboard/admin/users", "Users", "users"),
    item("/dashboard/admin/courses", "Courses", "book-open"),
    item("/dashboard/admin/reports", "Reports", "file-text"),
    item("/dashboard/admin/system", "System", "shield"),
];

impl Role {
    fn own_items(&self) -> &'static [NavItem] {
        match self {
            Role::Student => &STUDENT_ITEMS,
            Role::Instructor => &INSTRUCTOR_ITEMS,
            Role::Admin => &ADMIN_ITEMS,
        }
    }

    /// The role's own items followed by the items every role shares.
    pub fn navigation_items(&self) -> Vec<NavItem> {
        self.own_items()
            .iter()
            .chain(SHARED_ITEMS.iter())
            .copied()
            .collect()
    }

    /// Where `/dashboard` redirects for this role.
    pub fn dashboard_path(&self) -> &'static str {
        self.own_items()[0].href
    }
}

//=========================================================================================
// Statistics
//=========================================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentStats {
    pub enrolled_courses: usize,
    pub completed_courses: usize,
    pub in_progress_courses: usize,
    pub certificates_earned: usize,
}

impl StudentStats {
    pub fn for_user(user: &User) -> Self {
        let in_progress = user
            .enrolled_courses
            .iter()
            .filter(|id| !user.completed_courses.contains(id))
            .count();
        Self {
            enrolled_courses: user.enrolled_courses.len(),
            completed_courses: user.completed_courses.len(),
            in_progress_courses: in_progress,
            certificates_earned: user.certificates.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstructorStats {
    pub total_courses: usize,
    pub total_students: u64,
    pub total_revenue: f64,
    pub average_rating: f64,
}

impl InstructorStats {
    pub fn for_instructor(instructor_id: &str, courses: &[Course]) -> Self {
        let own = by_instructor(courses, instructor_id);
        let (students, revenue) = totals(own.iter().copied());
        Self {
            total_courses: own.len(),
            total_students: students,
            total_revenue: revenue,
            average_rating: average_rating(own.iter().copied()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdminStats {
    pub total_users: usize,
    pub total_courses: usize,
    pub total_enrollments: u64,
    pub total_revenue: f64,
    pub average_rating: f64,
}

impl AdminStats {
    pub fn for_platform(users: &[User], courses: &[Course]) -> Self {
        let (enrollments, revenue) = totals(courses.iter());
        Self {
            total_users: users.len(),
            total_courses: courses.len(),
            total_enrollments: enrollments,
            total_revenue: revenue,
            average_rating: average_rating(courses.iter()),
        }
    }
}

// (students, revenue) where revenue is price * students per course.
fn totals<'a>(courses: impl Iterator<Item = &'a Course>) -> (u64, f64) {
    courses.fold((0, 0.0), |(students, revenue), c| {
        (
            students + u64::from(c.students_count),
            revenue + c.price * f64::from(c.students_count),
        )
    })
}

fn average_rating<'a>(courses: impl Iterator<Item = &'a Course>) -> f64 {
    let (sum, count) = courses.fold((0.0, 0usize), |(sum, n), c| (sum + c.rating, n + 1));
    if count == 0 {
        0.0
    } else {
        sum / count as f64
    }
}
