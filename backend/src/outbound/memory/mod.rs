//! In-process adapters used when no database or hosted identity backend is
//! configured, and by integration tests.
//!
//! State lives behind a mutex for the lifetime of the process and is lost on
//! restart.

mod identity;
mod notes;
mod profiles;

use std::sync::{Mutex, MutexGuard};

pub use identity::InMemoryIdentityProvider;
pub use notes::InMemoryNoteRepository;
pub use profiles::InMemoryProfileRepository;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}
