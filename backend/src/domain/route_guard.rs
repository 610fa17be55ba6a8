//! Redirect rules for page navigation.
//!
//! The decision only depends on the request path and whether a session is
//! present, so it is evaluated without touching any data source.

/// Landing page for authenticated users.
pub const WORKSPACE_PATH: &str = "/dashboard";
/// Entry point for anonymous users.
pub const LOGIN_PATH: &str = "/auth/login";

/// Outcome of evaluating a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    /// Let the request through untouched.
    Pass,
    /// Send the browser elsewhere.
    Redirect(&'static str),
}

fn is_under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Decide whether a navigation to `path` should be redirected.
///
/// # Examples
/// ```
/// use notes_backend::domain::route_guard::{GuardDecision, decide};
///
/// assert_eq!(decide("/", true), GuardDecision::Redirect("/dashboard"));
/// assert_eq!(decide("/", false), GuardDecision::Pass);
/// ```
pub fn decide(path: &str, has_session: bool) -> GuardDecision {
    if is_under(path, "/api") {
        return GuardDecision::Pass;
    }
    match has_session {
        true if path == "/" || is_under(path, "/auth") => GuardDecision::Redirect(WORKSPACE_PATH),
        false if is_under(path, WORKSPACE_PATH) => GuardDecision::Redirect(LOGIN_PATH),
        _ => GuardDecision::Pass,
    }
}
