//! Note-taking backend: session-authenticated note storage with AI
//! summaries, arranged as a hexagon of domain services, inbound HTTP
//! adapters and outbound storage, identity and summarization adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod server;

#[cfg(test)]
mod test_support;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
