//! Observable state of in-flight note mutations.
//!
//! Each `(owner, kind)` pair moves through `idle -> pending -> succeeded |
//! failed`. Starting a mutation while the same kind is already pending for
//! the same owner is rejected, which debounces double submissions within a
//! single process.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use serde::Serialize;

use super::{Error, UserId};

/// Mutation families tracked per owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MutationKind {
    Create,
    Update,
    Delete,
    DeleteAll,
    Summarize,
}

impl MutationKind {
    /// Every tracked kind, in display order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Update,
        Self::Delete,
        Self::DeleteAll,
        Self::Summarize,
    ];

    /// Fallback notice recorded when a mutation fails without a message.
    pub fn failure_notice(self) -> &'static str {
        match self {
            Self::Create => "Failed to create note",
            Self::Update => "Failed to update note",
            Self::Delete => "Failed to delete note",
            Self::DeleteAll => "Failed to delete notes",
            Self::Summarize => "Failed to generate summary",
        }
    }
}

/// Lifecycle state of one mutation kind.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum MutationState {
    #[default]
    Idle,
    Pending,
    Succeeded {
        notice: String,
    },
    Failed {
        notice: String,
    },
}

type StateMap = HashMap<(UserId, MutationKind), MutationState>;

/// Process-wide registry of mutation states.
#[derive(Debug, Default)]
pub struct MutationTracker {
    states: Mutex<StateMap>,
}

impl MutationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StateMap> {
        self.states
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    /// Mark `kind` pending for `owner`.
    ///
    /// Returns a conflict error when the same kind is already pending.
    pub fn begin(&self, owner: &UserId, kind: MutationKind) -> Result<MutationTicket<'_>, Error> {
        let mut states = self.lock();
        let state = states.entry((owner.clone(), kind)).or_default();
        if *state == MutationState::Pending {
            return Err(Error::conflict("operation already in progress"));
        }
        *state = MutationState::Pending;
        Ok(MutationTicket {
            tracker: self,
            owner: owner.clone(),
            kind,
            settled: false,
        })
    }

    /// Current state of `kind` for `owner`.
    pub fn state(&self, owner: &UserId, kind: MutationKind) -> MutationState {
        self.lock()
            .get(&(owner.clone(), kind))
            .cloned()
            .unwrap_or_default()
    }

    /// States of every kind for `owner`.
    pub fn snapshot(&self, owner: &UserId) -> Vec<(MutationKind, MutationState)> {
        let states = self.lock();
        MutationKind::ALL
            .into_iter()
            .map(|kind| {
                let state = states
                    .get(&(owner.clone(), kind))
                    .cloned()
                    .unwrap_or_default();
                (kind, state)
            })
            .collect()
    }

    fn settle(&self, owner: &UserId, kind: MutationKind, state: MutationState) {
        self.lock().insert((owner.clone(), kind), state);
    }
}

/// Handle for a pending mutation.
///
/// Dropping an unsettled ticket returns the kind to idle, so an abandoned
/// request never blocks later ones.
#[must_use = "settle the ticket with `succeed` or `fail`"]
pub struct MutationTicket<'a> {
    tracker: &'a MutationTracker,
    owner: UserId,
    kind: MutationKind,
    settled: bool,
}

impl MutationTicket<'_> {
    /// Record success with a user-facing notice.
    pub fn succeed(mut self, notice: impl Into<String>) {
        self.settled = true;
        self.tracker.settle(
            &self.owner,
            self.kind,
            MutationState::Succeeded {
                notice: notice.into(),
            },
        );
    }

    /// Record failure, keeping the error's message or the kind's fallback.
    pub fn fail(mut self, error: &Error) {
        self.settled = true;
        let notice = if error.message().trim().is_empty() {
            self.kind.failure_notice().to_owned()
        } else {
            error.message().to_owned()
        };
        self.tracker
            .settle(&self.owner, self.kind, MutationState::Failed { notice });
    }
}

impl Drop for MutationTicket<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.tracker
                .settle(&self.owner, self.kind, MutationState::Idle);
        }
    }
}
