use crate::services::SessionStatus;

pub const LOGIN_ROUTE: &str = "/login";
pub const SEARCH_ROUTE: &str = "/search";

/// Paths reachable without a session
const PUBLIC_PREFIXES: &[&str] = &["/_next/", "/public/"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    RedirectToLogin,
}

/// Decide whether `path` may be shown for the given session
pub fn resolve(path: &str, session: SessionStatus) -> Access {
    if path == LOGIN_ROUTE || PUBLIC_PREFIXES.iter().any(|p| path.starts_with(p)) {
        return Access::Allow;
    }

    match session {
        SessionStatus::Active => Access::Allow,
        SessionStatus::Anonymous | SessionStatus::Expired => {
            tracing::debug!("Redirecting {} to {} ({:?})", path, LOGIN_ROUTE, session);
            Access::RedirectToLogin
        }
    }
}
