use auth::CredentialCodec;
use auth::TokenKind;
use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::extract::Request;
use axum::extract::State;
use axum::http::request::Parts;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::Response;

use crate::domain::session::models::Identity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Request gate: attach an [`Identity`] when the request carries a valid,
/// unexpired access credential.
///
/// Never rejects. A missing, malformed, forged, expired or refresh-kind
/// credential leaves the request anonymous and the access policy decides.
pub async fn establish_identity(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Response {
    if let Some(identity) = identity_from_header(&state.codec, &req) {
        req.extensions_mut().insert(identity);
    }

    next.run(req).await
}

fn identity_from_header(codec: &CredentialCodec, req: &Request) -> Option<Identity> {
    let token = extract_token_from_header(req)?;

    match codec.verify_current(token, TokenKind::Access) {
        Ok(claims) => Some(Identity::from(claims)),
        Err(e) => {
            // The token itself is never logged.
            tracing::debug!(reason = %e, "Ignoring bearer credential");
            None
        }
    }
}

fn extract_token_from_header(req: &Request) -> Option<&str> {
    req.headers()
        .get(http::header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .filter(|token| !token.is_empty())
}

/// Extractor for handlers that need the caller's identity.
///
/// Rejects with 401 when the gate attached none.
#[derive(Debug, Clone)]
pub struct CurrentIdentity(pub Identity);

#[async_trait]
impl<S> FromRequestParts<S> for CurrentIdentity
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(CurrentIdentity)
            .ok_or_else(|| ApiError::Unauthorized("Authentication required".to_string()))
    }
}
