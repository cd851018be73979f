use api_lib::adapters::SeedData;
use api_lib::config::Config;
use api_lib::web::{self, state::AppState};
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

fn test_router() -> Router {
    let config = Arc::new(Config {
        password_memory_kib: 64,
        password_iterations: 1,
        ..Config::default()
    });
    let seed = SeedData::bundled().expect("bundled seed");
    let state = AppState::from_seed(config, seed).expect("app state");
    web::router(Arc::new(state))
}

struct Reply {
    status: StatusCode,
    cookie: Option<String>,
    body: Value,
}

async fn send(router: &Router, request: Request<Body>) -> Reply {
    let response = router.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let cookie = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string);
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body bytes")
        .to_bytes();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    Reply { status, cookie, body }
}

async fn get(router: &Router, uri: &str, cookie: Option<&str>) -> Reply {
    let mut builder = Request::get(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    send(router, builder.body(Body::empty()).expect("request")).await
}

async fn post(router: &Router, uri: &str, cookie: Option<&str>, body: Option<Value>) -> Reply {
    let mut builder = Request::post(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    send(router, builder.body(body).expect("request")).await
}

async fn login(router: &Router, email: &str, password: &str) -> String {
    let reply = post(
        router,
        "/auth/login",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::OK);
    reply.cookie.expect("session cookie")
}

fn titles(body: &Value) -> Vec<String> {
    body["courses"]
        .as_array()
        .expect("courses array")
        .iter()
        .map(|c| c["title"].as_str().unwrap_or_default().to_string())
        .collect()
}

fn ids(body: &Value) -> Vec<String> {
    body["courses"]
        .as_array()
        .expect("courses array")
        .iter()
        .map(|c| c["id"].as_str().unwrap_or_default().to_string())
        .collect()
}

//=========================================================================================
// Catalog
//=========================================================================================

#[tokio::test]
async fn unfiltered_catalog_is_sorted_by_popularity() {
    let router = test_router();
    let reply = get(&router, "/courses", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["total"], 10);
    let ids = ids(&reply.body);
    assert_eq!(ids[0], "course-4");
    assert_eq!(ids[1], "course-7");
    assert_eq!(ids.last().map(String::as_str), Some("course-10"));
}

#[tokio::test]
async fn category_and_level_filters_combine() {
    let router = test_router();
    let reply = get(&router, "/courses?category=web-development&level=advanced", None).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(titles(&reply.body), vec!["Advanced JavaScript Concepts"]);
}

#[tokio::test]
async fn free_bucket_and_search() {
    let router = test_router();
    let free = get(&router, "/courses?price=free", None).await;
    assert_eq!(ids(&free.body), vec!["course-9"]);
    assert_eq!(free.body["courses"][0]["price_label"], "Free");

    let search = get(&router, "/courses?q=emma%20davis&sort=price-low", None).await;
    assert_eq!(ids(&search.body), vec!["course-10", "course-8", "course-4"]);
}

#[tokio::test]
async fn unknown_sort_falls_back_but_unknown_level_is_rejected() {
    let router = test_router();
    let fallback = get(&router, "/courses?sort=alphabetical", None).await;
    let popular = get(&router, "/courses", None).await;
    assert_eq!(ids(&fallback.body), ids(&popular.body));

    let bad_level = get(&router, "/courses?level=expert", None).await;
    assert_eq!(bad_level.status, StatusCode::BAD_REQUEST);
    let bad_price = get(&router, "/courses?price=cheap", None).await;
    assert_eq!(bad_price.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn course_detail_distinguishes_missing_from_empty() {
    let router = test_router();
    let missing = get(&router, "/courses/course-404", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);

    let empty = get(&router, "/courses/course-2", None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["modules"], json!([]));

    let react = get(&router, "/courses/course-1", None).await;
    assert_eq!(react.body["course"]["discount_percent"], 40);
    assert_eq!(react.body["modules"][0]["lessons"][1]["id"], "lesson-1-1-2");
}

#[tokio::test]
async fn categories_and_facets() {
    let router = test_router();
    let categories = get(&router, "/categories", None).await;
    assert_eq!(categories.body.as_array().map(Vec::len), Some(8));

    let facets = get(&router, "/courses/facets", None).await;
    assert_eq!(facets.body["categories"][0], json!({ "name": "web-development", "count": 3 }));
    assert_eq!(facets.body["price_ranges"][0], json!({ "name": "free", "count": 1 }));

    let featured = get(&router, "/courses/featured", None).await;
    assert_eq!(featured.body["total"], 5);
}

#[tokio::test]
async fn home_page_lists() {
    let router = test_router();
    let popular = get(&router, "/courses/popular?limit=2", None).await;
    assert_eq!(ids(&popular.body), vec!["course-4", "course-7"]);
    let popular = get(&router, "/courses/popular", None).await;
    assert_eq!(popular.body["total"], 6);

    // course-1 and course-5 tie on 4.8 and keep catalog order.
    let top = get(&router, "/courses/top-rated?limit=3", None).await;
    assert_eq!(ids(&top.body), vec!["course-4", "course-1", "course-5"]);

    let free = get(&router, "/courses/free", None).await;
    assert_eq!(ids(&free.body), vec!["course-9"]);
}

#[tokio::test]
async fn courses_by_category() {
    let router = test_router();
    let web = get(&router, "/categories/web-development/courses", None).await;
    assert_eq!(ids(&web.body), vec!["course-1", "course-2", "course-3"]);

    let missing = get(&router, "/categories/astronomy/courses", None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}

//=========================================================================================
// Authentication
//=========================================================================================

#[tokio::test]
async fn login_rejects_wrong_password() {
    let router = test_router();
    let reply = post(
        &router,
        "/auth/login",
        None,
        Some(json!({ "email": "student@edtech.demo", "password": "wrong-password" })),
    )
    .await;
    assert_eq!(reply.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn seeded_users_without_own_password_use_the_demo_one() {
    let router = test_router();
    let cookie = login(&router, "maria.garcia@example.com", "demo123").await;
    let me = get(&router, "/auth/me", Some(&cookie)).await;
    assert_eq!(me.body["name"], "Maria Garcia");
}

#[tokio::test]
async fn registration_validates_and_rejects_duplicates() {
    let router = test_router();
    let register = |email: &str, password: &str, role: &str| {
        json!({ "name": "Jane Doe", "email": email, "password": password, "role": role })
    };

    let created = post(
        &router,
        "/auth/register",
        None,
        Some(register("jane@example.com", "longenough", "student")),
    )
    .await;
    assert_eq!(created.status, StatusCode::CREATED);
    assert_eq!(created.body["role"], "student");
    let cookie = created.cookie.expect("session cookie");
    let me = get(&router, "/auth/me", Some(&cookie)).await;
    assert_eq!(me.body["email"], "jane@example.com");

    let duplicate = post(
        &router,
        "/auth/register",
        None,
        Some(register("student@edtech.demo", "longenough", "student")),
    )
    .await;
    assert_eq!(duplicate.status, StatusCode::CONFLICT);

    let short = post(
        &router,
        "/auth/register",
        None,
        Some(register("new@example.com", "short", "student")),
    )
    .await;
    assert_eq!(short.status, StatusCode::BAD_REQUEST);

    let admin = post(
        &router,
        "/auth/register",
        None,
        Some(register("boss@example.com", "longenough", "admin")),
    )
    .await;
    assert_eq!(admin.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn protected_routes_need_a_session_and_logout_ends_it() {
    let router = test_router();
    assert_eq!(get(&router, "/dashboard", None).await.status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        get(&router, "/dashboard", Some("session=forged")).await.status,
        StatusCode::UNAUTHORIZED
    );

    let cookie = login(&router, "student@edtech.demo", "student123").await;
    assert_eq!(get(&router, "/auth/me", Some(&cookie)).await.status, StatusCode::OK);
    let started = post(&router, "/learn/course-1", Some(&cookie), None).await;
    assert_eq!(started.status, StatusCode::OK);

    let logout = post(&router, "/auth/logout", Some(&cookie), None).await;
    assert_eq!(logout.status, StatusCode::OK);
    assert_eq!(get(&router, "/auth/me", Some(&cookie)).await.status, StatusCode::UNAUTHORIZED);

    // The lesson player does not survive the logout.
    let cookie = login(&router, "student@edtech.demo", "student123").await;
    assert_eq!(get(&router, "/learn", Some(&cookie)).await.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn profile_update_changes_name() {
    let router = test_router();
    let cookie = login(&router, "student@edtech.demo", "student123").await;
    let request = Request::patch("/auth/me")
        .header(header::COOKIE, &cookie)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({ "name": "Alex J." }).to_string()))
        .expect("request");
    let reply = send(&router, request).await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["name"], "Alex J.");
    assert_eq!(reply.body["email"], "student@edtech.demo");
}

//=========================================================================================
// Dashboards
//=========================================================================================

#[tokio::test]
async fn dashboard_follows_the_callers_role() {
    let router = test_router();

    let student = login(&router, "student@edtech.demo", "student123").await;
    let reply = get(&router, "/dashboard", Some(&student)).await;
    assert_eq!(reply.body["redirect_to"], "/dashboard/student");
    assert_eq!(reply.body["stats"]["role"], "student");
    assert_eq!(reply.body["stats"]["enrolled_courses"], 3);
    assert_eq!(reply.body["stats"]["certificates_earned"], 1);
    assert_eq!(reply.body["navigation"][0]["label"], "My Learning");

    let instructor = login(&router, "instructor@edtech.demo", "instructor123").await;
    let reply = get(&router, "/dashboard", Some(&instructor)).await;
    assert_eq!(reply.body["stats"]["role"], "instructor");
    assert_eq!(reply.body["stats"]["total_courses"], 3);
    assert_eq!(reply.body["navigation"].as_array().map(Vec::len), Some(6));

    let admin = login(&router, "admin@edtech.demo", "admin123").await;
    let reply = get(&router, "/dashboard", Some(&admin)).await;
    assert_eq!(reply.body["redirect_to"], "/dashboard/admin");
    assert_eq!(reply.body["stats"]["total_users"], 12);
    assert_eq!(reply.body["stats"]["total_courses"], 10);
}

//=========================================================================================
// Lesson Player
//=========================================================================================

#[tokio::test]
async fn lesson_player_walks_and_tracks_completion() {
    let router = test_router();
    let cookie = login(&router, "student@edtech.demo", "student123").await;
    let cookie = Some(cookie.as_str());

    assert_eq!(get(&router, "/learn", cookie).await.status, StatusCode::NOT_FOUND);

    let start = post(&router, "/learn/course-1", cookie, None).await;
    assert_eq!(start.status, StatusCode::OK);
    assert_eq!(start.body["lesson"]["id"], "lesson-1-1-1");
    assert_eq!(start.body["total_lessons"], 2);
    assert_eq!(start.body["is_first"], true);

    let done = post(&router, "/learn/complete", cookie, None).await;
    assert_eq!(done.body["changed"], true);
    let again = post(&router, "/learn/complete", cookie, None).await;
    assert_eq!(again.body["changed"], false);
    assert_eq!(again.body["completed_lessons"], json!(["lesson-1-1-1"]));
    assert_eq!(again.body["progress_percent"], 50.0);

    let next = post(&router, "/learn/next", cookie, None).await;
    assert_eq!(next.body["lesson"]["id"], "lesson-1-1-2");
    assert_eq!(next.body["lesson_number"], 2);
    assert_eq!(next.body["is_last"], true);

    let stuck = post(&router, "/learn/next", cookie, None).await;
    assert_eq!(stuck.body["changed"], false);
    assert_eq!(stuck.body["lesson"]["id"], "lesson-1-1-2");

    let back = post(&router, "/learn/previous", cookie, None).await;
    assert_eq!(back.body["lesson"]["id"], "lesson-1-1-1");
}

#[tokio::test]
async fn lesson_player_rejects_bad_coordinates_and_resets_on_switch() {
    let router = test_router();
    let cookie = login(&router, "student@edtech.demo", "student123").await;
    let cookie = Some(cookie.as_str());

    post(&router, "/learn/course-1", cookie, None).await;
    post(&router, "/learn/complete", cookie, None).await;

    let bad = post(
        &router,
        "/learn/select",
        cookie,
        Some(json!({ "module_index": 0, "lesson_index": 9 })),
    )
    .await;
    assert_eq!(bad.status, StatusCode::BAD_REQUEST);

    let jump = post(
        &router,
        "/learn/select",
        cookie,
        Some(json!({ "module_index": 0, "lesson_index": 1 })),
    )
    .await;
    assert_eq!(jump.body["lesson"]["id"], "lesson-1-1-2");

    // course-2 has no modules: the player opens but every step is a no-op.
    let empty = post(&router, "/learn/course-2", cookie, None).await;
    assert_eq!(empty.status, StatusCode::OK);
    assert_eq!(empty.body["lesson"], Value::Null);
    assert_eq!(empty.body["completed_lessons"], json!([]));
    assert_eq!(empty.body["progress_percent"], 0.0);
    let next = post(&router, "/learn/next", cookie, None).await;
    assert_eq!(next.body["changed"], false);

    let missing = post(&router, "/learn/course-404", cookie, None).await;
    assert_eq!(missing.status, StatusCode::NOT_FOUND);
}
