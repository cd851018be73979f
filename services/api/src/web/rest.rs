//! services/api/src/web/rest.rs
//!
//! The master definition for the OpenAPI specification.

use crate::web::{auth, catalog, dashboard, learn};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        catalog::list_courses_handler,
        catalog::featured_courses_handler,
        catalog::popular_courses_handler,
        catalog::top_rated_courses_handler,
        catalog::free_courses_handler,
        catalog::facets_handler,
        catalog::course_detail_handler,
        catalog::list_categories_handler,
        catalog::category_courses_handler,
        auth::register_handler,
        auth::login_handler,
        auth::logout_handler,
        auth::me_handler,
        auth::update_profile_handler,
        dashboard::dashboard_handler,
        learn::start_learning_handler,
        learn::learning_state_handler,
        learn::next_lesson_handler,
        learn::previous_lesson_handler,
        learn::select_lesson_handler,
        learn::complete_lesson_handler,
    ),
    components(
        schemas(
            catalog::CourseSummary,
            catalog::CourseListResponse,
            catalog::CourseDetail,
            catalog::ModuleView,
            catalog::LessonView,
            catalog::FacetCount,
            catalog::FacetsResponse,
            catalog::CategoryView,
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::ProfileUpdateRequest,
            auth::UserView,
            dashboard::NavItemView,
            dashboard::DashboardStats,
            dashboard::DashboardResponse,
            learn::SelectLessonRequest,
            learn::LearningStateResponse,
        )
    ),
    tags(
        (name = "Course Marketplace API", description = "Catalog browsing, mock authentication, dashboards and the lesson player.")
    )
)]
pub struct ApiDoc;
