//! Identity provider adapters backed by a hosted auth API.
//!
//! The adapter speaks the GoTrue-style REST contract: password and PKCE code
//! grants on `/auth/v1/token` and registration on `/auth/v1/signup`, each
//! authorised with the project's public `apikey`.

mod dto;
mod hosted;

pub use hosted::HostedIdentityProvider;
