//! crates/marketplace_core/src/catalog.rs
//!
//! The catalog query engine: filters a course collection by free text, category,
//! level and price bucket, then orders the survivors by the requested sort key.

use crate::domain::{Course, Level};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

//=========================================================================================
// Filter Criteria
//=========================================================================================

/// Price buckets. Boundaries are half-open: `[0, 50)`, `[50, 100)`, `[100, ∞)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PriceRange {
    Free,
    Under50,
    From50To100,
    Over100,
}

impl PriceRange {
    pub const ALL: [PriceRange; 4] = [
        PriceRange::Free,
        PriceRange::Under50,
        PriceRange::From50To100,
        PriceRange::Over100,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PriceRange::Free => "free",
            PriceRange::Under50 => "under-50",
            PriceRange::From50To100 => "50-100",
            PriceRange::Over100 => "over-100",
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        match self {
            PriceRange::Free => price == 0.0,
            PriceRange::Under50 => price < 50.0,
            PriceRange::From50To100 => (50.0..100.0).contains(&price),
            PriceRange::Over100 => price >= 100.0,
        }
    }
}

impl fmt::Display for PriceRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PriceRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(PriceRange::Free),
            "under-50" => Ok(PriceRange::Under50),
            "50-100" => Ok(PriceRange::From50To100),
            "over-100" => Ok(PriceRange::Over100),
            other => Err(format!("unknown price range '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    #[default]
    Popularity,
    Rating,
    Newest,
    PriceLow,
    PriceHigh,
}

impl SortKey {
    /// Unknown keys fall back to `Popularity`.
    pub fn parse_or_default(key: &str) -> Self {
        match key {
            "rating" => SortKey::Rating,
            "newest" => SortKey::Newest,
            "price-low" => SortKey::PriceLow,
            "price-high" => SortKey::PriceHigh,
            _ => SortKey::Popularity,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Popularity => "popularity",
            SortKey::Rating => "rating",
            SortKey::Newest => "newest",
            SortKey::PriceLow => "price-low",
            SortKey::PriceHigh => "price-high",
        }
    }

    fn compare(&self, a: &Course, b: &Course) -> Ordering {
        match self {
            SortKey::Popularity => b.students_count.cmp(&a.students_count),
            SortKey::Rating => b.rating.total_cmp(&a.rating),
            SortKey::Newest => b.created_at.cmp(&a.created_at),
            SortKey::PriceLow => a.price.total_cmp(&b.price),
            SortKey::PriceHigh => b.price.total_cmp(&a.price),
        }
    }
}

/// User-entered catalog constraints. Empty query and `None` fields are inactive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    pub query: String,
    pub category: Option<String>,
    pub level: Option<Level>,
    pub price_range: Option<PriceRange>,
    pub sort: SortKey,
}

impl FilterCriteria {
    /// True when the course passes every active filter.
    pub fn matches(&self, course: &Course) -> bool {
        self.matches_needle(course, &self.query.to_lowercase())
    }

    /// `needle` is `self.query` already lowercased.
    fn matches_needle(&self, course: &Course, needle: &str) -> bool {
        if !needle.is_empty() {
            let hit = course.title.to_lowercase().contains(needle)
                || course.description.to_lowercase().contains(needle)
                || course.instructor_name.to_lowercase().contains(needle);
            if !hit {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if &course.category != category {
                return false;
            }
        }

        if let Some(level) = self.level {
            if course.level != level {
                return false;
            }
        }

        self.price_range
            .map_or(true, |range| range.contains(course.price))
    }
}

//=========================================================================================
// Query Operations
//=========================================================================================

/// Returns the courses passing every active filter, ordered by `criteria.sort`.
///
/// The sort is stable, so ties keep their order from `courses`. The input is
/// never modified.
pub fn filter_and_sort<'a>(courses: &'a [Course], criteria: &FilterCriteria) -> Vec<&'a Course> {
    let needle = criteria.query.to_lowercase();
    let mut result: Vec<&Course> = courses
        .iter()
        .filter(|c| criteria.matches_needle(c, &needle))
        .collect();
    result.sort_by(|a, b| criteria.sort.compare(a, b));
    result
}

pub fn featured(courses: &[Course]) -> Vec<&Course> {
    courses.iter().filter(|c| c.is_featured).collect()
}

pub fn by_category<'a>(courses: &'a [Course], category_id: &str) -> Vec<&'a Course> {
    courses.iter().filter(|c| c.category == category_id).collect()
}

pub fn by_instructor<'a>(courses: &'a [Course], instructor_id: &str) -> Vec<&'a Course> {
    courses
        .iter()
        .filter(|c| c.instructor_id == instructor_id)
        .collect()
}

pub fn free(courses: &[Course]) -> Vec<&Course> {
    courses.iter().filter(|c| c.is_free()).collect()
}

/// The `limit` most-enrolled courses.
pub fn popular(courses: &[Course], limit: usize) -> Vec<&Course> {
    top_by(courses, SortKey::Popularity, limit)
}

/// The `limit` best-rated courses.
pub fn top_rated(courses: &[Course], limit: usize) -> Vec<&Course> {
    top_by(courses, SortKey::Rating, limit)
}

fn top_by(courses: &[Course], sort: SortKey, limit: usize) -> Vec<&Course> {
    let mut result: Vec<&Course> = courses.iter().collect();
    result.sort_by(|a, b| sort.compare(a, b));
    result.truncate(limit);
    result
}

//=========================================================================================
// Facets
//=========================================================================================

/// Per-dimension counts over a course collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFacets {
    /// Category ids in first-seen order.
    pub categories: Vec<(String, usize)>,
    pub levels: Vec<(Level, usize)>,
    pub price_ranges: Vec<(PriceRange, usize)>,
}

pub fn facets(courses: &[Course]) -> CatalogFacets {
    let mut categories: Vec<(String, usize)> = Vec::new();
    for course in courses {
        match categories.iter_mut().find(|(id, _)| *id == course.category) {
            Some((_, count)) => *count += 1,
            None => categories.push((course.category.clone(), 1)),
        }
    }

    let levels = Level::ALL
        .iter()
        .map(|level| (*level, courses.iter().filter(|c| c.level == *level).count()))
        .collect();

    let price_ranges = PriceRange::ALL
        .iter()
        .map(|range| (*range, courses.iter().filter(|c| range.contains(c.price)).count()))
        .collect();

    CatalogFacets {
        categories,
        levels,
        price_ranges,
    }
}
