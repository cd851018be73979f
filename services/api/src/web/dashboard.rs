//! services/api/src/web/dashboard.rs
//!
//! The role-specific dashboard: redirect target, sidebar navigation and the
//! statistics for the caller's role.

use crate::web::middleware::CurrentUser;
use crate::web::{catalog::CourseSummary, port_error, state::AppState};
use axum::{extract::State, http::StatusCode, Extension, Json};
use marketplace_core::catalog;
use marketplace_core::dashboard::{AdminStats, InstructorStats, NavItem, StudentStats};
use marketplace_core::domain::Role;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NavItemView {
    pub href: String,
    pub label: String,
    pub icon: String,
}

impl From<NavItem> for NavItemView {
    fn from(item: NavItem) -> Self {
        Self {
            href: item.href.to_string(),
            label: item.label.to_string(),
            icon: item.icon.to_string(),
        }
    }
}

/// Role statistics, tagged by role.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(tag = "role", rename_all = "snake_case")]
pub enum DashboardStats {
    Student {
        enrolled_courses: usize,
        completed_courses: usize,
        in_progress_courses: usize,
        certificates_earned: usize,
        /// Enrolled courses that still exist in the catalog.
        courses: Vec<CourseSummary>,
    },
    Instructor {
        total_courses: usize,
        total_students: u64,
        total_revenue: f64,
        average_rating: f64,
        courses: Vec<CourseSummary>,
    },
    Admin {
        total_users: usize,
        total_courses: usize,
        total_enrollments: u64,
        total_revenue: f64,
        average_rating: f64,
    },
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub name: String,
    pub role: String,
    pub redirect_to: String,
    pub navigation: Vec<NavItemView>,
    pub stats: DashboardStats,
}

/// GET /dashboard - Everything the caller's dashboard needs
#[utoipa::path(
    get,
    path = "/dashboard",
    responses(
        (status = 200, description = "Dashboard for the caller's role", body = DashboardResponse),
        (status = 401, description = "Not logged in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(current): Extension<CurrentUser>,
) -> Result<Json<DashboardResponse>, (StatusCode, String)> {
    let user = state
        .users
        .find_by_id(&current.user_id)
        .await
        .map_err(|e| port_error(e, "Failed to load user"))?;
    let courses = state
        .courses
        .list_courses()
        .await
        .map_err(|e| port_error(e, "Failed to list courses"))?;

    let stats = match user.role {
        Role::Student => {
            let s = StudentStats::for_user(&user);
            DashboardStats::Student {
                enrolled_courses: s.enrolled_courses,
                completed_courses: s.completed_courses,
                in_progress_courses: s.in_progress_courses,
                certificates_earned: s.certificates_earned,
                courses: courses
                    .iter()
                    .filter(|c| user.enrolled_courses.contains(&c.id))
                    .map(CourseSummary::from)
                    .collect(),
            }
        }
        Role::Instructor => {
            let s = InstructorStats::for_instructor(&user.id, &courses);
            DashboardStats::Instructor {
                total_courses: s.total_courses,
                total_students: s.total_students,
                total_revenue: s.total_revenue,
                average_rating: s.average_rating,
                courses: catalog::by_instructor(&courses, &user.id)
                    .into_iter()
                    .map(CourseSummary::from)
                    .collect(),
            }
        }
        Role::Admin => {
            let users = state
                .users
                .list_users()
                .await
                .map_err(|e| port_error(e, "Failed to list users"))?;
            let s = AdminStats::for_platform(&users, &courses);
            DashboardStats::Admin {
                total_users: s.total_users,
                total_courses: s.total_courses,
                total_enrollments: s.total_enrollments,
                total_revenue: s.total_revenue,
                average_rating: s.average_rating,
            }
        }
    };

    Ok(Json(DashboardResponse {
        role: user.role.to_string(),
        redirect_to: user.role.dashboard_path().to_string(),
        navigation: user
            .role
            .navigation_items()
            .into_iter()
            .map(NavItemView::from)
            .collect(),
        name: user.name,
        stats,
    }))
}
