//! End-to-end tests for the authentication/authorization pipeline.
//!
//! Drives the real router (all middleware layers) against an in-memory
//! database, asserting on the exact wire responses.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use campus_server::api;
use campus_server::auth::middleware::require_owner;
use campus_server::auth::{AuthContext, Claims, JwtConfig, JwtService, Role};
use campus_server::core::{Config, ServerState};
use campus_server::db::DbService;
use campus_server::db::models::{Profile, ProfileCreate, UserCreate};
use campus_server::db::repository::{ProfileRepository, UserRepository};

const TEST_SECRET: &str = "integration-test-secret-key-with-plenty-of-length!";

fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_SECRET.to_string(),
        expiration_minutes: 60,
        issuer: "campus-server".to_string(),
    }
}

async fn test_state() -> ServerState {
    let db = DbService::memory().await.expect("in-memory database");
    let config = Config {
        work_dir: "/tmp/campus-test".to_string(),
        http_port: 0,
        jwt: test_jwt_config(),
        environment: "test".to_string(),
        admin_email: "admin@campus.local".to_string(),
        admin_password: None,
    };
    let jwt_service = Arc::new(JwtService::with_config(test_jwt_config()));
    ServerState::new(config, db.db, jwt_service)
}

fn app(state: &ServerState) -> Router {
    api::build_app(state).with_state(state.clone())
}

/// Create a user + profile, returning the "user:<key>" record id
async fn seed_user(state: &ServerState, email: &str, role: Role) -> String {
    let user = UserRepository::new(state.get_db())
        .create(UserCreate {
            email: email.to_string(),
            password: "password123!".to_string(),
        })
        .await
        .expect("create user");
    let user_id = user.id.expect("created user has an id");

    ProfileRepository::new(state.get_db())
        .create(ProfileCreate {
            user: user_id.clone(),
            name: email.split('@').next().unwrap_or("user").to_string(),
            role,
            department: None,
        })
        .await
        .expect("create profile");

    user_id.to_string()
}

fn token_for(state: &ServerState, user_id: &str) -> String {
    state
        .get_jwt_service()
        .generate_token(user_id)
        .expect("generate token")
}

async fn send(app: Router, req: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(req).await.expect("request");
    let status = response.status();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json body")
    };
    (status, value)
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).expect("request")
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: &Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder
        .body(Body::from(body.to_string()))
        .expect("request")
}

// ========== Authentication ==========

#[tokio::test]
async fn missing_header_is_401_access_token_required() {
    let state = test_state().await;
    let (status, body) = send(app(&state), get("/api/mess-menus", None)).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "access token required");
}

#[tokio::test]
async fn non_bearer_header_is_401_access_token_required() {
    let state = test_state().await;
    let req = Request::builder()
        .method("GET")
        .uri("/api/mess-menus")
        .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(app(&state), req).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "access token required");
}

#[tokio::test]
async fn garbage_token_is_401_invalid_token() {
    let state = test_state().await;
    let (status, body) = send(app(&state), get("/api/mess-menus", Some("not-a-jwt"))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn wrongly_signed_token_is_401_invalid_token() {
    let state = test_state().await;
    let forger = JwtService::with_config(JwtConfig {
        secret: "attacker-controlled-secret-also-long-enough!".to_string(),
        ..test_jwt_config()
    });
    let token = forger.generate_token("user:whoever").expect("token");

    let (status, body) = send(app(&state), get("/api/mess-menus", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn expired_token_is_401_token_expired() {
    let state = test_state().await;
    let user_id = seed_user(&state, "late@campus.local", Role::Student).await;

    // Forge a token that expired an hour ago (past the default leeway)
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: user_id,
        exp: now - 3600,
        iat: now - 7200,
        iss: "campus-server".to_string(),
    };
    let token = jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode token");

    let (status, body) = send(app(&state), get("/api/mess-menus", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "token expired");
}

#[tokio::test]
async fn token_for_deleted_identity_is_401_invalid_token() {
    let state = test_state().await;
    let token = token_for(&state, "user:ghost");

    let (status, body) = send(app(&state), get("/api/mess-menus", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn token_for_identity_without_profile_is_401_invalid_token() {
    let state = test_state().await;

    // Identity exists but has no profile
    let user = UserRepository::new(state.get_db())
        .create(UserCreate {
            email: "noprofile@campus.local".to_string(),
            password: "password123!".to_string(),
        })
        .await
        .expect("create user");
    let user_id = user.id.expect("user id").to_string();
    let token = token_for(&state, &user_id);

    let (status, body) = send(app(&state), get("/api/mess-menus", Some(&token))).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");
}

#[tokio::test]
async fn health_is_public() {
    let state = test_state().await;
    let (status, body) = send(app(&state), get("/health", None)).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ========== Role predicate ==========

#[tokio::test]
async fn student_hitting_faculty_route_gets_403_with_detail() {
    let state = test_state().await;
    let student = seed_user(&state, "student@campus.local", Role::Student).await;
    let token = token_for(&state, &student);

    let (status, body) = send(app(&state), get("/api/attendance", Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "insufficient permissions");
    assert_eq!(body["required"], json!(["faculty", "super_admin"]));
    assert_eq!(body["current"], "student");
}

#[tokio::test]
async fn faculty_and_admin_pass_faculty_route() {
    let state = test_state().await;
    let faculty = seed_user(&state, "faculty@campus.local", Role::Faculty).await;
    let admin = seed_user(&state, "root@campus.local", Role::SuperAdmin).await;

    for id in [&faculty, &admin] {
        let token = token_for(&state, id);
        let (status, _) = send(app(&state), get("/api/attendance", Some(&token))).await;
        assert_eq!(status, StatusCode::OK);
    }
}

// ========== Ownership-or-admin predicate ==========

#[tokio::test]
async fn super_admin_passes_ownership_check_for_any_user() {
    let state = test_state().await;
    let admin = seed_user(&state, "root@campus.local", Role::SuperAdmin).await;
    let student = seed_user(&state, "student@campus.local", Role::Student).await;
    let token = token_for(&state, &admin);

    let (status, body) = send(
        app(&state),
        get(&format!("/api/users/{student}"), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "student@campus.local");
}

#[tokio::test]
async fn student_reads_own_record() {
    let state = test_state().await;
    let student = seed_user(&state, "student@campus.local", Role::Student).await;
    let token = token_for(&state, &student);

    let (status, body) = send(
        app(&state),
        get(&format!("/api/users/{student}"), Some(&token)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "student@campus.local");
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn student_reading_other_record_is_403_access_denied() {
    let state = test_state().await;
    let a = seed_user(&state, "a@campus.local", Role::Student).await;
    let b = seed_user(&state, "b@campus.local", Role::Student).await;
    let token = token_for(&state, &a);

    let (status, body) = send(app(&state), get(&format!("/api/users/{b}"), Some(&token))).await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access denied");
}

#[tokio::test]
async fn authorization_outcome_is_idempotent() {
    let state = test_state().await;
    let a = seed_user(&state, "a@campus.local", Role::Student).await;
    let b = seed_user(&state, "b@campus.local", Role::Student).await;
    let token = token_for(&state, &a);

    let allowed_uri = format!("/api/users/{a}");
    let denied_uri = format!("/api/users/{b}");

    let first = send(app(&state), get(&allowed_uri, Some(&token))).await;
    let second = send(app(&state), get(&allowed_uri, Some(&token))).await;
    assert_eq!(first, second);

    let first = send(app(&state), get(&denied_uri, Some(&token))).await;
    let second = send(app(&state), get(&denied_uri, Some(&token))).await;
    assert_eq!(first, second);
    assert_eq!(first.0, StatusCode::FORBIDDEN);
}

// ========== Ownership from the request body ==========

fn ctx_for(user_id: &str, role: Role) -> AuthContext {
    AuthContext {
        user_id: user_id.to_string(),
        email: "owner@campus.local".to_string(),
        profile: Profile {
            id: None,
            user: user_id.parse().expect("record id"),
            name: "Owner".to_string(),
            role,
            department: None,
        },
    }
}

/// Tiny router exercising `require_owner` without path parameters
fn owner_app(ctx: AuthContext, path: &str) -> Router {
    Router::new()
        .route(path, axum::routing::post(|| async { "ok" }))
        .layer(axum::middleware::from_fn(require_owner("userId")))
        .layer(axum::Extension(ctx))
}

#[tokio::test]
async fn ownership_falls_back_to_body_field() {
    let ctx = ctx_for("user:stu1", Role::Student);

    let (status, _) = send(
        owner_app(ctx.clone(), "/guarded"),
        json_request("POST", "/guarded", None, &json!({"userId": "user:stu1"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        owner_app(ctx.clone(), "/guarded"),
        json_request("POST", "/guarded", None, &json!({"userId": "user:other"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access denied");

    // No field in path or body: ownership cannot be established
    let (status, _) = send(
        owner_app(ctx, "/guarded"),
        json_request("POST", "/guarded", None, &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn path_parameter_takes_precedence_over_body() {
    let ctx = ctx_for("user:stu1", Role::Student);

    // Path says own id, body disagrees: path wins, allowed
    let (status, _) = send(
        owner_app(ctx.clone(), "/guarded/{userId}"),
        json_request(
            "POST",
            "/guarded/user:stu1",
            None,
            &json!({"userId": "user:other"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Path says another id, body claims own: path wins, denied
    let (status, _) = send(
        owner_app(ctx, "/guarded/{userId}"),
        json_request(
            "POST",
            "/guarded/user:other",
            None,
            &json!({"userId": "user:stu1"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

// ========== Full flows ==========

#[tokio::test]
async fn register_login_me_roundtrip() {
    let state = test_state().await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/auth/register",
            None,
            &json!({
                "email": "fresh@campus.local",
                "password": "password123!",
                "name": "Fresh Student",
                "role": "student"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["role"], "student");

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "fresh@campus.local", "password": "password123!"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["token"].as_str().expect("token").to_string();

    let (status, body) = send(app(&state), get("/api/auth/me", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "fresh@campus.local");
    assert_eq!(body["role"], "student");
}

#[tokio::test]
async fn login_with_wrong_password_is_401() {
    let state = test_state().await;
    seed_user(&state, "victim@campus.local", Role::Student).await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "victim@campus.local", "password": "wrong-password"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn attendance_flow_faculty_marks_student_reads_own() {
    let state = test_state().await;
    let faculty = seed_user(&state, "prof@campus.local", Role::Faculty).await;
    let student = seed_user(&state, "stu@campus.local", Role::Student).await;
    let other = seed_user(&state, "other@campus.local", Role::Student).await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/attendance",
            Some(&token_for(&state, &faculty)),
            &json!({"student": student, "date": "2026-08-04", "status": "present"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "present");
    assert_eq!(body["student"], student);

    // Student reads their own records
    let (status, body) = send(
        app(&state),
        get(
            &format!("/api/attendance/student/{student}"),
            Some(&token_for(&state, &student)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    // Another student cannot
    let (status, body) = send(
        app(&state),
        get(
            &format!("/api/attendance/student/{student}"),
            Some(&token_for(&state, &other)),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "access denied");
}

#[tokio::test]
async fn complaint_flow_student_files_warden_resolves() {
    let state = test_state().await;
    let student = seed_user(&state, "stu@campus.local", Role::Student).await;
    let warden = seed_user(&state, "warden@campus.local", Role::HostelWarden).await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/complaints",
            Some(&token_for(&state, &student)),
            &json!({
                "title": "Broken fan",
                "description": "Room 204 ceiling fan is dead",
                "category": "hostel"
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "open");
    let complaint_id = body["id"].as_str().expect("complaint id").to_string();

    // Student cannot list all complaints
    let (status, body) = send(
        app(&state),
        get("/api/complaints", Some(&token_for(&state, &student))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["required"], json!(["hostel_warden", "super_admin"]));

    // Warden lists and resolves
    let (status, body) = send(
        app(&state),
        get("/api/complaints", Some(&token_for(&state, &warden))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    let (status, body) = send(
        app(&state),
        json_request(
            "PUT",
            &format!("/api/complaints/{complaint_id}/status"),
            Some(&token_for(&state, &warden)),
            &json!({"status": "resolved"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
}

#[tokio::test]
async fn any_authenticated_role_can_file_complaints() {
    let state = test_state().await;
    let warden = seed_user(&state, "warden@campus.local", Role::HostelWarden).await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/complaints",
            Some(&token_for(&state, &warden)),
            &json!({
                "title": "Leaky roof",
                "description": "B block corridor floods when it rains",
                "category": "maintenance"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "open");
    assert_eq!(body["user"], warden);
}

#[tokio::test]
async fn login_without_profile_is_401_invalid_credentials() {
    let state = test_state().await;

    // Identity exists but the profile create never happened
    UserRepository::new(state.get_db())
        .create(UserCreate {
            email: "noprofile@campus.local".to_string(),
            password: "password123!".to_string(),
        })
        .await
        .expect("create user");

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/auth/login",
            None,
            &json!({"email": "noprofile@campus.local", "password": "password123!"}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid credentials");
}

#[tokio::test]
async fn mess_menu_flow_staff_writes_student_reads() {
    let state = test_state().await;
    let staff = seed_user(&state, "mess@campus.local", Role::MessSupervisor).await;
    let student = seed_user(&state, "stu@campus.local", Role::Student).await;

    let (status, body) = send(
        app(&state),
        json_request(
            "POST",
            "/api/mess-menus",
            Some(&token_for(&state, &staff)),
            &json!({"day": "Monday", "meal": "lunch", "items": ["rice", "dal"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["day"], "monday");

    let (status, body) = send(
        app(&state),
        get("/api/mess-menus", Some(&token_for(&state, &student))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(1));

    // Students cannot write menus
    let (status, _) = send(
        app(&state),
        json_request(
            "POST",
            "/api/mess-menus",
            Some(&token_for(&state, &student)),
            &json!({"day": "tuesday", "meal": "dinner", "items": ["bread"]}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn role_change_takes_effect_on_next_call() {
    let state = test_state().await;
    let admin = seed_user(&state, "root@campus.local", Role::SuperAdmin).await;
    let user = seed_user(&state, "tutor@campus.local", Role::Student).await;
    let token = token_for(&state, &user);

    let (status, _) = send(app(&state), get("/api/attendance", Some(&token))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Admin promotes the user to faculty
    let (status, body) = send(
        app(&state),
        json_request(
            "PUT",
            &format!("/api/users/{user}/profile"),
            Some(&token_for(&state, &admin)),
            &json!({"role": "faculty"}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "faculty");

    // Same token now passes: the profile is resolved fresh on every call
    let (status, _) = send(app(&state), get("/api/attendance", Some(&token))).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn user_list_is_admin_only() {
    let state = test_state().await;
    let admin = seed_user(&state, "root@campus.local", Role::SuperAdmin).await;
    let director = seed_user(&state, "director@campus.local", Role::Director).await;

    let (status, body) = send(
        app(&state),
        get("/api/users", Some(&token_for(&state, &admin))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(|a| a.len()), Some(2));

    // Director is management, but not the top admin role
    let (status, body) = send(
        app(&state),
        get("/api/users", Some(&token_for(&state, &director))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["current"], "director");
}
