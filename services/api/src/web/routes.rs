//! services/api/src/web/routes.rs
//!
//! Builds the application router. Shared by the `api` binary and the tests.

use crate::web::{
    auth::{login_handler, logout_handler, me_handler, register_handler, update_profile_handler},
    catalog::{
        category_courses_handler, course_detail_handler, facets_handler, featured_courses_handler,
        free_courses_handler, list_categories_handler, list_courses_handler,
        popular_courses_handler, top_rated_courses_handler,
    },
    dashboard::dashboard_handler,
    learn::{
        complete_lesson_handler, learning_state_handler, next_lesson_handler,
        previous_lesson_handler, select_lesson_handler, start_learning_handler,
    },
    middleware::require_auth,
    state::AppState,
};
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/courses", get(list_courses_handler))
        .route("/courses/featured", get(featured_courses_handler))
        .route("/courses/popular", get(popular_courses_handler))
        .route("/courses/top-rated", get(top_rated_courses_handler))
        .route("/courses/free", get(free_courses_handler))
        .route("/courses/facets", get(facets_handler))
        .route("/courses/{id}", get(course_detail_handler))
        .route("/categories", get(list_categories_handler))
        .route("/categories/{id}/courses", get(category_courses_handler))
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/auth/logout", post(logout_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/auth/me", get(me_handler).patch(update_profile_handler))
        .route("/dashboard", get(dashboard_handler))
        .route("/learn", get(learning_state_handler))
        .route("/learn/next", post(next_lesson_handler))
        .route("/learn/previous", post(previous_lesson_handler))
        .route("/learn/select", post(select_lesson_handler))
        .route("/learn/complete", post(complete_lesson_handler))
        .route("/learn/{course_id}", post(start_learning_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}
