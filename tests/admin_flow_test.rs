//! Full scheduling-to-review flow against a real database.
//!
//! Run with a Postgres instance and `cargo test -- --ignored`.

use std::env;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;
use uuid::Uuid;

use interview_backend::dto::candidate_dto::CreateCandidatePayload;
use interview_backend::dto::directory_dto::{
    CreateDepartmentPayload, CreatePositionPayload, CreateProblemPayload, CreateStackPayload,
};
use interview_backend::dto::panel_dto::CreatePanelUserPayload;
use interview_backend::error::Error;
use interview_backend::middleware::policy::Session;
use interview_backend::{build_router, AppState};

const TEST_SECRET: &str = "test_secret_key";

fn mint_token(sub: Uuid, email: &str, user_type: &str, admin_role: Option<&str>) -> String {
    let claims = Session {
        sub,
        email: email.to_string(),
        name: "Test User".into(),
        user_type: user_type.into(),
        admin_role: admin_role.map(Into::into),
        exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("encode token")
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn schedule_take_and_review_test_end_to_end() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", TEST_SECRET);
    env::set_var("SESSION_TTL_HOURS", "8");
    let _ = interview_backend::config::init_config();

    let pool = interview_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let state = AppState::new(pool.clone());
    let suffix = Uuid::new_v4().simple().to_string();

    let department = state
        .department_service
        .create(CreateDepartmentPayload {
            name: format!("Engineering {}", suffix),
        })
        .await
        .expect("department");

    let position = state
        .position_service
        .create(CreatePositionPayload {
            name: format!("Backend {}", suffix),
            department_id: department.id,
        })
        .await
        .expect("position");

    let stack = state
        .stack_service
        .create(CreateStackPayload {
            name: format!("Node {}", suffix),
        })
        .await
        .expect("stack");

    let problem = state
        .problem_service
        .create(CreateProblemPayload {
            title: format!("Reverse a string {}", suffix),
            description: "Reverse the input string without built-ins.".into(),
            metadata: None,
            stack_ids: vec![stack.id],
        })
        .await
        .expect("problem");

    // Scheduled for right now: the candidate may start immediately.
    let candidate = state
        .candidate_service
        .create(CreateCandidatePayload {
            name: "Jane".into(),
            email: format!("jane_{}@example.com", suffix),
            department_id: department.id,
            position_id: position.id,
            problem_id: problem.problem.id,
            scheduled_time: Utc::now(),
            duration_minutes: Some(60),
        })
        .await
        .expect("candidate");
    assert_eq!(candidate.status(), "scheduled");
    assert!(!candidate.password.is_empty());

    let candidate_token = mint_token(candidate.id, &candidate.email, "CANDIDATE", None);

    let app = build_router(state.clone());
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/candidate/start-test")
                .header(header::AUTHORIZATION, format!("Bearer {}", candidate_token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    // A second start must be rejected, not silently accepted.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/candidate/start-test")
                .header(header::AUTHORIZATION, format!("Bearer {}", candidate_token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let submit_body = json!({
        "answers": [{ "stack_id": stack.id, "code": "s.split('').reverse().join('')" }]
    });
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::POST)
                .uri("/api/candidate/submit")
                .header(header::AUTHORIZATION, format!("Bearer {}", candidate_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(submit_body.to_string()))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 64 * 1024).await.expect("body");
    let submitted: JsonValue = serde_json::from_slice(&bytes).expect("json");
    let submission_id = submitted["submission_id"].as_str().expect("submission id");

    // Admin reviews and appends a remark.
    let admin_token = mint_token(
        Uuid::new_v4(),
        "reviewer@example.com",
        "ADMIN",
        Some("USER"),
    );
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri(format!("/api/admin/submissions/{}", submission_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"Good solution"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    // A later append must leave the first entry untouched.
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::PATCH)
                .uri(format!("/api/admin/submissions/{}", submission_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"text":"Clean edge-case handling"}"#))
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri(format!("/api/admin/submissions/{}", submission_id))
                .header(header::AUTHORIZATION, format!("Bearer {}", admin_token))
                .body(Body::empty())
                .expect("request"),
        )
        .await
        .expect("response");
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), 256 * 1024).await.expect("body");
    let detail: JsonValue = serde_json::from_slice(&bytes).expect("json");

    let remarks = detail["remarks"].as_array().expect("remarks");
    assert_eq!(remarks.len(), 2);
    assert_eq!(remarks[0]["text"], "Good solution");
    assert_eq!(remarks[0]["admin_email"], "reviewer@example.com");
    assert_eq!(remarks[1]["text"], "Clean edge-case handling");
    assert_eq!(detail["problem"]["stacks"][0]["name"], format!("Node {}", suffix));

    // Submitted implies Started.
    assert!(detail["candidate"]["start_time"].is_string());
    assert!(detail["candidate"]["submission_time"].is_string());
}

#[tokio::test]
#[ignore = "requires a running Postgres (DATABASE_URL)"]
async fn name_conflicts_and_paired_account_rows() {
    dotenvy::dotenv().ok();
    env::set_var("SERVER_ADDRESS", "127.0.0.1:0");
    env::set_var("JWT_SECRET", TEST_SECRET);
    env::set_var("SESSION_TTL_HOURS", "8");
    let _ = interview_backend::config::init_config();

    let pool = interview_backend::database::pool::create_pool()
        .await
        .expect("pool");
    sqlx::migrate!("./migrations").run(&pool).await.expect("migrations");

    let state = AppState::new(pool.clone());
    let suffix = Uuid::new_v4().simple().to_string();

    let first_department = state
        .department_service
        .create(CreateDepartmentPayload {
            name: format!("Engineering {}", suffix),
        })
        .await
        .expect("first department");
    let second_department = state
        .department_service
        .create(CreateDepartmentPayload {
            name: format!("Data {}", suffix),
        })
        .await
        .expect("second department");

    // Position names are unique per department, not globally.
    let position = state
        .position_service
        .create(CreatePositionPayload {
            name: format!("Backend {}", suffix),
            department_id: first_department.id,
        })
        .await
        .expect("position");
    let duplicate = state
        .position_service
        .create(CreatePositionPayload {
            name: format!("Backend {}", suffix),
            department_id: first_department.id,
        })
        .await;
    assert!(matches!(duplicate, Err(Error::Conflict(_))));
    state
        .position_service
        .create(CreatePositionPayload {
            name: format!("Backend {}", suffix),
            department_id: second_department.id,
        })
        .await
        .expect("same name in another department");

    let stack = state
        .stack_service
        .create(CreateStackPayload {
            name: format!("Rust {}", suffix),
        })
        .await
        .expect("stack");
    let problem = state
        .problem_service
        .create(CreateProblemPayload {
            title: format!("Flatten a tree {}", suffix),
            description: "Flatten a binary tree into a list in place.".into(),
            metadata: None,
            stack_ids: vec![stack.id],
        })
        .await
        .expect("problem");

    // An email already held by an admin account cannot be reused for a
    // candidate.
    let admin_email = format!("panel_{}@example.com", suffix);
    state
        .panel_service
        .create(CreatePanelUserPayload {
            name: "Panel Reviewer".into(),
            email: admin_email.clone(),
            password: "correct-horse-battery".into(),
            admin_role: "USER".into(),
        })
        .await
        .expect("panel user");
    let taken_by_admin = state
        .candidate_service
        .create(CreateCandidatePayload {
            name: "Imposter".into(),
            email: admin_email,
            department_id: first_department.id,
            position_id: position.id,
            problem_id: problem.problem.id,
            scheduled_time: Utc::now(),
            duration_minutes: Some(60),
        })
        .await;
    assert!(matches!(taken_by_admin, Err(Error::Conflict(_))));

    let candidate_email = format!("casey_{}@example.com", suffix);
    let candidate = state
        .candidate_service
        .create(CreateCandidatePayload {
            name: "Casey".into(),
            email: candidate_email.clone(),
            department_id: first_department.id,
            position_id: position.id,
            problem_id: problem.problem.id,
            scheduled_time: Utc::now(),
            duration_minutes: Some(60),
        })
        .await
        .expect("candidate");
    let taken_by_candidate = state
        .candidate_service
        .create(CreateCandidatePayload {
            name: "Casey Again".into(),
            email: candidate_email.clone(),
            department_id: first_department.id,
            position_id: position.id,
            problem_id: problem.problem.id,
            scheduled_time: Utc::now(),
            duration_minutes: Some(60),
        })
        .await;
    assert!(matches!(taken_by_candidate, Err(Error::Conflict(_))));

    // Creating a candidate also created a paired sign-in account.
    let accounts = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE email = $1 AND user_type = 'CANDIDATE'",
    )
    .bind(&candidate_email)
    .fetch_one(&pool)
    .await
    .expect("account count");
    assert_eq!(accounts, 1);

    // Deleting the candidate removes both rows.
    state
        .candidate_service
        .delete(candidate.id)
        .await
        .expect("delete candidate");
    let remaining_candidates = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM candidates WHERE email = $1",
    )
    .bind(&candidate_email)
    .fetch_one(&pool)
    .await
    .expect("candidate count");
    assert_eq!(remaining_candidates, 0);
    let remaining_accounts = sqlx::query_scalar::<_, i64>(
        "SELECT COUNT(*) FROM users WHERE email = $1",
    )
    .bind(&candidate_email)
    .fetch_one(&pool)
    .await
    .expect("account count");
    assert_eq!(remaining_accounts, 0);
}
