use axum::extract::Request;
use axum::extract::State;
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::account::models::Role;
use crate::domain::session::models::Identity;
use crate::inbound::http::handlers::ApiError;
use crate::inbound::http::router::AppState;

/// Trust a route demands of the caller.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequiredTrust {
    Public,
    Authenticated,
    Role(String),
}

/// One row of the policy table.
///
/// Pattern syntax: literal segments, `{name}` for any single segment, and a
/// trailing `/**` for any (possibly empty) suffix.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RouteRule {
    pub pattern: String,
    pub access: RequiredTrust,
}

impl RouteRule {
    pub fn new(pattern: &str, access: RequiredTrust) -> Self {
        Self {
            pattern: pattern.to_string(),
            access,
        }
    }

    pub fn matches(&self, path: &str) -> bool {
        let (pattern, open_suffix) = match self.pattern.strip_suffix("/**") {
            Some(prefix) => (prefix, true),
            None => (self.pattern.as_str(), false),
        };

        let mut expected = segments(pattern);
        let mut actual = segments(path);

        loop {
            match (expected.next(), actual.next()) {
                (None, None) => return true,
                (None, Some(_)) => return open_suffix,
                (Some(_), None) => return false,
                (Some(e), Some(a)) => {
                    let wildcard = e.starts_with('{') && e.ends_with('}');
                    if !wildcard && e != a {
                        return false;
                    }
                }
            }
        }
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AccessDenied {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Access denied")]
    Forbidden,
}

/// Ordered route table, first match wins. Unmatched paths need an identity.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<RouteRule>,
}

impl AccessPolicy {
    pub fn new(rules: Vec<RouteRule>) -> Self {
        Self { rules }
    }

    /// The back office's route table.
    pub fn default_rules() -> Vec<RouteRule> {
        use RequiredTrust::Public;
        let admin = || RequiredTrust::Role(Role::ADMIN_TAG.to_string());

        vec![
            RouteRule::new("/api/user/admin/sign-up", admin()),
            RouteRule::new("/api/user/{role}/sign-up", Public),
            RouteRule::new("/api/user/login", Public),
            RouteRule::new("/api/user/refresh", Public),
            RouteRule::new("/api/user/logout", Public),
            RouteRule::new("/api/user/user-list", admin()),
            RouteRule::new("/api/category/list", Public),
            RouteRule::new("/api/category/create", admin()),
            RouteRule::new("/api/category/update/{id}", admin()),
            RouteRule::new("/api/category/delete/{id}", admin()),
            RouteRule::new("/api/category/get-by-id", admin()),
            RouteRule::new("/api/category/get-by-name", admin()),
            RouteRule::new("/health", Public),
        ]
    }

    pub fn required_trust(&self, path: &str) -> &RequiredTrust {
        self.rules
            .iter()
            .find(|rule| rule.matches(path))
            .map(|rule| &rule.access)
            .unwrap_or(&RequiredTrust::Authenticated)
    }

    /// # Errors
    /// * `Unauthenticated` - Route needs an identity and none is present
    /// * `Forbidden` - Identity lacks the required role
    pub fn authorize(&self, path: &str, identity: Option<&Identity>) -> Result<(), AccessDenied> {
        match (self.required_trust(path), identity) {
            (RequiredTrust::Public, _) => Ok(()),
            (_, None) => Err(AccessDenied::Unauthenticated),
            (RequiredTrust::Authenticated, Some(_)) => Ok(()),
            (RequiredTrust::Role(role), Some(identity)) if identity.has_role(role) => Ok(()),
            (RequiredTrust::Role(_), Some(_)) => Err(AccessDenied::Forbidden),
        }
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(Self::default_rules())
    }
}

/// Middleware: reject the request unless the policy admits the identity the
/// gate attached (or its absence).
pub async fn enforce_policy(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let path = req.uri().path();

    if let Err(denied) = state.policy.authorize(path, req.extensions().get::<Identity>()) {
        tracing::debug!(path = %path, reason = %denied, "Request rejected by access policy");
        return ApiError::from(denied).into_response();
    }

    next.run(req).await
}
