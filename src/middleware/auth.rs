use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Json, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::json;

use crate::middleware::policy::{decide, Capability, Denial, Session};

fn deny(denial: Denial) -> Response {
    match denial {
        Denial::Unauthorized => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error":"unauthorized"})),
        )
            .into_response(),
        Denial::Forbidden => {
            (StatusCode::FORBIDDEN, Json(json!({"error":"forbidden"}))).into_response()
        }
    }
}

fn session_from_request(req: &Request) -> Option<Session> {
    let auth_header = req.headers().get(axum::http::header::AUTHORIZATION)?;
    let auth_str = auth_header.to_str().ok()?;
    let token = auth_str.strip_prefix("Bearer ")?;

    let config = crate::config::get_config();
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    decode::<Session>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.as_bytes()),
        &validation,
    )
    .ok()
    .map(|data| data.claims)
}

async fn guard(mut req: Request, next: Next, required: Capability) -> Response {
    let session = session_from_request(&req);
    match decide(session.as_ref(), required) {
        Ok(()) => {
            // decide() rejects the None case, so the session is present here
            if let Some(session) = session {
                req.extensions_mut().insert(session);
            }
            next.run(req).await
        }
        Err(denial) => deny(denial),
    }
}

pub async fn require_authenticated(req: Request, next: Next) -> Response {
    guard(req, next, Capability::Authenticated).await
}

pub async fn require_admin(req: Request, next: Next) -> Response {
    guard(req, next, Capability::AdminUser).await
}

pub async fn require_super_admin(req: Request, next: Next) -> Response {
    guard(req, next, Capability::SuperAdmin).await
}

pub async fn require_candidate(req: Request, next: Next) -> Response {
    guard(req, next, Capability::CandidateUser).await
}
