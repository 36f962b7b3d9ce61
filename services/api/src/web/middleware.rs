//! services/api/src/web/middleware.rs
//!
//! Session middleware: turns the `session` cookie into the core's
//! `Session` context before any handler runs.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
};
use scholar_core::error::CoreError;
use scholar_core::session::Session;
use std::sync::Arc;
use tracing::error;

use crate::web::state::AppState;

/// Middleware that builds the viewer's `Session` and stores it in the
/// request extensions.
///
/// No cookie means an anonymous session (reads still work, scoped to
/// nothing); a cookie the identity provider rejects is 401. Role and
/// ownership checks are not done here - the core's catalog is the sole
/// enforcer of those.
pub async fn attach_session(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookie_header| {
            cookie_header.split(';').find_map(|c| {
                let c = c.trim();
                c.strip_prefix("session=")
            })
        })
        .map(str::to_string);

    let session = match token {
        None => Session::anonymous(),
        Some(token) => match state.identity.resolve_session(&token).await {
            Ok(identity) => Session::authenticated(identity),
            Err(CoreError::Authentication(_)) => return Err(StatusCode::UNAUTHORIZED),
            Err(e) => {
                error!("Identity provider failure: {:?}", e);
                return Err(StatusCode::INTERNAL_SERVER_ERROR);
            }
        },
    };

    req.extensions_mut().insert(session);
    Ok(next.run(req).await)
}
