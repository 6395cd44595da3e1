use axum::{http::HeaderMap, Json};
use tracing::{debug, instrument};

use health_log_domain::auth::session::{session_state, SessionState};

/// Report whether the caller holds a valid session.
///
/// Never rejects; an absent or invalid token yields an anonymous state.
#[utoipa::path(
    get,
    path = "/auth/session",
    responses(
        (status = 200, description = "Current session state", body = SessionState)
    ),
    security(
        (),
        ("bearer" = [])
    ),
    tag = "auth"
)]
#[instrument(skip_all)]
pub async fn get_session(headers: HeaderMap) -> Json<SessionState> {
    let state = session_state(&headers);
    debug!("Session check: authenticated={}", state.authenticated);
    Json(state)
}
