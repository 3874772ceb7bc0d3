pub mod config;
pub mod database;
pub mod dto;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use crate::services::{
    auth_service::AuthService, candidate_service::CandidateService,
    department_service::DepartmentService, lifecycle_service::LifecycleService,
    panel_service::PanelService, position_service::PositionService,
    problem_service::ProblemService, settings_service::SettingsService,
    stack_service::StackService, submission_service::SubmissionService,
};
use sqlx::PgPool;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub auth_service: AuthService,
    pub department_service: DepartmentService,
    pub position_service: PositionService,
    pub stack_service: StackService,
    pub problem_service: ProblemService,
    pub candidate_service: CandidateService,
    pub panel_service: PanelService,
    pub settings_service: SettingsService,
    pub lifecycle_service: LifecycleService,
    pub submission_service: SubmissionService,
}

impl AppState {
    pub fn new(pool: PgPool) -> Self {
        let auth_service = AuthService::new(pool.clone());
        let department_service = DepartmentService::new(pool.clone());
        let position_service = PositionService::new(pool.clone());
        let stack_service = StackService::new(pool.clone());
        let problem_service = ProblemService::new(pool.clone());
        let candidate_service = CandidateService::new(pool.clone());
        let panel_service = PanelService::new(pool.clone());
        let settings_service = SettingsService::new(pool.clone());
        let lifecycle_service = LifecycleService::new(pool.clone());
        let submission_service = SubmissionService::new(pool.clone());

        Self {
            pool,
            auth_service,
            department_service,
            position_service,
            stack_service,
            problem_service,
            candidate_service,
            panel_service,
            settings_service,
            lifecycle_service,
            submission_service,
        }
    }
}

/// Full application router with all guard layers applied. Shared by
/// `main` and the integration tests.
pub fn build_router(state: AppState) -> axum::Router {
    use axum::middleware::from_fn;
    use axum::routing::{get, post};
    use axum::Router;

    let public = Router::new()
        .route("/health", get(routes::health::health))
        .route("/api/session", post(routes::session::login));

    let authenticated = Router::new()
        .route("/api/session/me", get(routes::session::current_session))
        .layer(from_fn(middleware::auth::require_authenticated));

    let admin = Router::new()
        .route(
            "/api/admin/departments",
            get(routes::departments::list_departments).post(routes::departments::create_department),
        )
        .route(
            "/api/admin/positions",
            get(routes::positions::list_positions).post(routes::positions::create_position),
        )
        .route(
            "/api/admin/positions/:id",
            axum::routing::patch(routes::positions::update_position)
                .delete(routes::positions::delete_position),
        )
        .route(
            "/api/admin/problems",
            get(routes::problems::list_problems).post(routes::problems::create_problem),
        )
        .route(
            "/api/admin/problems/:id",
            get(routes::problems::get_problem)
                .patch(routes::problems::update_problem)
                .delete(routes::problems::delete_problem),
        )
        .route(
            "/api/admin/candidates",
            get(routes::candidates::list_candidates).post(routes::candidates::create_candidate),
        )
        .route(
            "/api/admin/candidates/:id",
            get(routes::candidates::get_candidate)
                .patch(routes::candidates::update_candidate)
                .delete(routes::candidates::delete_candidate),
        )
        .route(
            "/api/admin/settings",
            get(routes::settings::get_settings).patch(routes::settings::update_settings),
        )
        .route(
            "/api/admin/submissions",
            get(routes::submissions::list_submissions),
        )
        .route(
            "/api/admin/submissions/:id",
            get(routes::submissions::get_submission)
                .patch(routes::submissions::add_remark)
                .delete(routes::submissions::delete_submission),
        )
        .layer(from_fn(middleware::auth::require_admin));

    let super_admin = Router::new()
        .route(
            "/api/admin/departments/:id",
            axum::routing::patch(routes::departments::update_department)
                .delete(routes::departments::delete_department),
        )
        .route(
            "/api/admin/stacks",
            get(routes::stacks::list_stacks).post(routes::stacks::create_stack),
        )
        .route(
            "/api/admin/stacks/:id",
            axum::routing::patch(routes::stacks::update_stack).delete(routes::stacks::delete_stack),
        )
        .route(
            "/api/admin/interview-panel",
            get(routes::panel::list_panel_users).post(routes::panel::create_panel_user),
        )
        .route(
            "/api/admin/interview-panel/:id",
            axum::routing::patch(routes::panel::update_panel_user)
                .delete(routes::panel::delete_panel_user),
        )
        .layer(from_fn(middleware::auth::require_super_admin));

    let candidate = Router::new()
        .route("/api/candidate/me", get(routes::candidate_portal::get_me))
        .route(
            "/api/candidate/start-test",
            post(routes::candidate_portal::start_test),
        )
        .route(
            "/api/candidate/submit",
            post(routes::candidate_portal::submit_test),
        )
        .layer(from_fn(middleware::auth::require_candidate));

    public
        .merge(authenticated)
        .merge(admin)
        .merge(super_admin)
        .merge(candidate)
        .with_state(state)
}
