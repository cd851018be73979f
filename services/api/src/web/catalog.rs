//! services/api/src/web/catalog.rs
//!
//! Course browsing endpoints: filtered listing, featured courses, facets,
//! course detail and categories.

use crate::web::{port_error, state::AppState};
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use marketplace_core::catalog::{self, CatalogFacets, FilterCriteria, PriceRange, SortKey};
use marketplace_core::domain::{Category, Course, Lesson, Level, Module};
use marketplace_core::util::format_price;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;
use utoipa::{IntoParams, ToSchema};

//=========================================================================================
// Request/Response Types
//=========================================================================================

/// Catalog query parameters. Empty values are treated as absent.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CatalogQuery {
    /// Case-insensitive search over title, description and instructor name.
    pub q: Option<String>,
    /// Exact category id, e.g. `web-development`.
    pub category: Option<String>,
    /// `beginner`, `intermediate` or `advanced`.
    pub level: Option<String>,
    /// `free`, `under-50`, `50-100` or `over-100`.
    pub price: Option<String>,
    /// `popularity` (default), `rating`, `newest`, `price-low` or `price-high`.
    pub sort: Option<String>,
}

impl CatalogQuery {
    /// Unknown levels and price ranges are rejected; an unknown sort key
    /// silently means popularity.
    pub fn to_criteria(&self) -> Result<FilterCriteria, String> {
        Ok(FilterCriteria {
            query: self.q.clone().unwrap_or_default(),
            category: non_empty(&self.category).map(str::to_string),
            level: non_empty(&self.level).map(str::parse::<Level>).transpose()?,
            price_range: non_empty(&self.price).map(str::parse::<PriceRange>).transpose()?,
            sort: self
                .sort
                .as_deref()
                .map(SortKey::parse_or_default)
                .unwrap_or_default(),
        })
    }
}

/// Size of the popular and top-rated lists when no `limit` is given.
pub const DEFAULT_LIST_LIMIT: usize = 6;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LimitQuery {
    /// Maximum number of courses, 6 by default.
    pub limit: Option<usize>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseSummary {
    pub id: String,
    pub title: String,
    pub short_description: String,
    pub instructor_id: String,
    pub instructor_name: String,
    pub category: String,
    pub level: String,
    pub price: f64,
    pub price_label: String,
    pub original_price: Option<f64>,
    pub discount_percent: u32,
    pub duration: String,
    pub rating: f64,
    pub reviews_count: u32,
    pub students_count: u32,
    pub total_lessons: usize,
    pub is_featured: bool,
    pub created_at: NaiveDate,
}

impl From<&Course> for CourseSummary {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id.clone(),
            title: course.title.clone(),
            short_description: course.short_description.clone(),
            instructor_id: course.instructor_id.clone(),
            instructor_name: course.instructor_name.clone(),
            category: course.category.clone(),
            level: course.level.to_string(),
            price: course.price,
            price_label: format_price(course.price),
            original_price: course.original_price,
            discount_percent: course.discount_percent(),
            duration: course.duration.clone(),
            rating: course.rating,
            reviews_count: course.reviews_count,
            students_count: course.students_count,
            total_lessons: course.total_lessons(),
            is_featured: course.is_featured,
            created_at: course.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub total: usize,
    pub courses: Vec<CourseSummary>,
}

impl CourseListResponse {
    fn from_courses(courses: &[&Course]) -> Self {
        Self {
            total: courses.len(),
            courses: courses.iter().map(|c| CourseSummary::from(*c)).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LessonView {
    pub id: String,
    pub title: String,
    pub lesson_type: String,
    pub duration: String,
}

impl From<&Lesson> for LessonView {
    fn from(lesson: &Lesson) -> Self {
        Self {
            id: lesson.id.clone(),
            title: lesson.title.clone(),
            lesson_type: lesson.lesson_type.as_str().to_string(),
            duration: lesson.duration.clone(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ModuleView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub duration: String,
    pub lessons: Vec<LessonView>,
}

impl From<&Module> for ModuleView {
    fn from(module: &Module) -> Self {
        Self {
            id: module.id.clone(),
            title: module.title.clone(),
            description: module.description.clone(),
            duration: module.duration.clone(),
            lessons: module.lessons.iter().map(LessonView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CourseDetail {
    pub course: CourseSummary,
    pub description: String,
    pub language: String,
    pub requirements: Vec<String>,
    pub what_you_will_learn: Vec<String>,
    pub tags: Vec<String>,
    pub modules: Vec<ModuleView>,
}

impl From<&Course> for CourseDetail {
    fn from(course: &Course) -> Self {
        Self {
            course: CourseSummary::from(course),
            description: course.description.clone(),
            language: course.language.clone(),
            requirements: course.requirements.clone(),
            what_you_will_learn: course.what_you_will_learn.clone(),
            tags: course.tags.clone(),
            modules: course.modules.iter().map(ModuleView::from).collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FacetCount {
    pub name: String,
    pub count: usize,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct FacetsResponse {
    pub categories: Vec<FacetCount>,
    pub levels: Vec<FacetCount>,
    pub price_ranges: Vec<FacetCount>,
}

impl From<CatalogFacets> for FacetsResponse {
    fn from(facets: CatalogFacets) -> Self {
        let count = |name: String, count: usize| FacetCount { name, count };
        Self {
            categories: facets
                .categories
                .into_iter()
                .map(|(name, n)| count(name, n))
                .collect(),
            levels: facets
                .levels
                .into_iter()
                .map(|(level, n)| count(level.to_string(), n))
                .collect(),
            price_ranges: facets
                .price_ranges
                .into_iter()
                .map(|(range, n)| count(range.to_string(), n))
                .collect(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CategoryView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub course_count: u32,
    pub is_popular: bool,
    pub subcategories: Vec<String>,
}

impl From<Category> for CategoryView {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            course_count: category.course_count,
            is_popular: category.is_popular,
            subcategories: category.subcategories.into_iter().map(|s| s.name).collect(),
        }
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// GET /courses - Filtered and sorted course listing
#[utoipa::path(
    get,
    path = "/courses",
    params(CatalogQuery),
    responses(
        (status = 200, description = "Matching courses", body = CourseListResponse),
        (status = 400, description = "Unknown level or price range")
    )
)]
pub async fn list_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<CatalogQuery>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let criteria = query
        .to_criteria()
        .map_err(|e| (StatusCode::BAD_REQUEST, e))?;

    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;

    let result = catalog::filter_and_sort(&courses, &criteria);
    debug!(
        "Catalog query {:?} matched {} of {} courses",
        criteria,
        result.len(),
        courses.len()
    );
    Ok(Json(CourseListResponse::from_courses(&result)))
}

/// GET /courses/featured - Featured courses, most popular first
#[utoipa::path(
    get,
    path = "/courses/featured",
    responses((status = 200, description = "Featured courses", body = CourseListResponse))
)]
pub async fn featured_courses_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;

    let mut featured = catalog::featured(&courses);
    featured.sort_by(|a, b| b.students_count.cmp(&a.students_count));
    Ok(Json(CourseListResponse::from_courses(&featured)))
}

/// GET /courses/popular - Most-enrolled courses
#[utoipa::path(
    get,
    path = "/courses/popular",
    params(LimitQuery),
    responses((status = 200, description = "Most popular courses", body = CourseListResponse))
)]
pub async fn popular_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(CourseListResponse::from_courses(&catalog::popular(&courses, limit))))
}

/// GET /courses/top-rated - Best-rated courses
#[utoipa::path(
    get,
    path = "/courses/top-rated",
    params(LimitQuery),
    responses((status = 200, description = "Best-rated courses", body = CourseListResponse))
)]
pub async fn top_rated_courses_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    Ok(Json(CourseListResponse::from_courses(&catalog::top_rated(&courses, limit))))
}

/// GET /courses/free - Courses that cost nothing
#[utoipa::path(
    get,
    path = "/courses/free",
    responses((status = 200, description = "Free courses", body = CourseListResponse))
)]
pub async fn free_courses_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;
    Ok(Json(CourseListResponse::from_courses(&catalog::free(&courses))))
}

/// GET /courses/facets - Course counts per category, level and price range
#[utoipa::path(
    get,
    path = "/courses/facets",
    responses((status = 200, description = "Facet counts", body = FacetsResponse))
)]
pub async fn facets_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<FacetsResponse>, (StatusCode, String)> {
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;
    Ok(Json(catalog::facets(&courses).into()))
}

/// GET /courses/{id} - Course detail page data
#[utoipa::path(
    get,
    path = "/courses/{id}",
    params(("id" = String, Path, description = "Course identifier")),
    responses(
        (status = 200, description = "Course found", body = CourseDetail),
        (status = 404, description = "Course not found")
    )
)]
pub async fn course_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(course_id): Path<String>,
) -> Result<Json<CourseDetail>, (StatusCode, String)> {
    let course = state
        .courses
        .get_course_by_id(&course_id)
        .await
        .map_err(|e| port_error(e, "Failed to load course"))?;
    Ok(Json(CourseDetail::from(&course)))
}

/// GET /categories - All course categories
#[utoipa::path(
    get,
    path = "/categories",
    responses((status = 200, description = "Categories", body = [CategoryView]))
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<CategoryView>>, (StatusCode, String)> {
    let categories = state
        .courses
        .list_categories()
        .await
        .map_err(|e| port_error(e, "Failed to list categories"))?;
    Ok(Json(categories.into_iter().map(CategoryView::from).collect()))
}

/// GET /categories/{id}/courses - Courses in one category, in catalog order
#[utoipa::path(
    get,
    path = "/categories/{id}/courses",
    params(("id" = String, Path, description = "Category identifier")),
    responses(
        (status = 200, description = "Courses in the category", body = CourseListResponse),
        (status = 404, description = "Category not found")
    )
)]
pub async fn category_courses_handler(
    State(state): State<Arc<AppState>>,
    Path(category_id): Path<String>,
) -> Result<Json<CourseListResponse>, (StatusCode, String)> {
    let categories = state
        .courses
        .list_categories()
        .await
        .map_err(|e| port_error(e, "Failed to list categories"))?;
    if !categories.iter().any(|c| c.id == category_id) {
        return Err((
            StatusCode::NOT_FOUND,
            format!("Category {} not found", category_id),
        ));
    }

    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;
    Ok(Json(CourseListResponse::from_courses(&catalog::by_category(
        &courses,
        &category_id,
    ))))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_params_mean_no_filters() {
        let query = CatalogQuery {
            q: Some(String::new()),
            category: Some(String::new()),
            level: Some(String::new()),
            price: Some(String::new()),
            sort: None,
        };
        assert_eq!(query.to_criteria().unwrap(), FilterCriteria::default());
    }

    #[test]
    fn parses_every_parameter() {
        let query = CatalogQuery {
            q: Some("react".to_string()),
            category: Some("web-development".to_string()),
            level: Some("advanced".to_string()),
            price: Some("50-100".to_string()),
            sort: Some("price-high".to_string()),
        };
        let criteria = query.to_criteria().unwrap();
        assert_eq!(criteria.level, Some(Level::Advanced));
        assert_eq!(criteria.price_range, Some(PriceRange::From50To100));
        assert_eq!(criteria.sort, SortKey::PriceHigh);
    }

    #[test]
    fn unknown_sort_is_popularity_but_unknown_level_is_an_error() {
        let query = CatalogQuery {
            sort: Some("random".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_criteria().unwrap().sort, SortKey::Popularity);

        let query = CatalogQuery {
            level: Some("expert".to_string()),
            ..Default::default()
        };
        assert!(query.to_criteria().is_err());
    }
}
