//! Request middleware for trace correlation and session-aware redirects.

pub mod route_guard;
pub mod trace;

pub use route_guard::RouteGuard;
pub use trace::Trace;
