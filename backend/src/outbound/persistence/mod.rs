//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module. Connections come from a `bb8` pool through
//! `diesel-async`; migrations are embedded and applied at startup.
//!
//! # Example
//!
//! ```ignore
//! use notes_backend::outbound::persistence::{DbPool, DieselNoteRepository, PoolConfig};
//!
//! let config = PoolConfig::new("postgres://localhost/notes");
//! run_pending_migrations(&config).await?;
//! let repo = DieselNoteRepository::new(DbPool::new(config).await?);
//! ```

mod diesel_basic_error_mapping;
mod diesel_note_repository;
mod diesel_profile_repository;
mod models;
mod pool;
mod schema;

pub use diesel_note_repository::DieselNoteRepository;
pub use diesel_profile_repository::DieselProfileRepository;
pub use pool::{DbPool, PoolConfig, PoolError, run_pending_migrations};
