//! Load status shared between the populating task and waiting readers.
//!
//! `StatusCell<T>` wraps a `watch` channel holding the tri-state load
//! status. The transition to `Ready` carries the frozen snapshot, so a
//! reader that observes `Ready` also observes the complete mapping.

use super::snapshot::SettingsMap;
use crate::error::CacheError;
use std::fmt;
use std::sync::Arc;
use tokio::sync::watch;

/// Progress of the one-time population.
///
/// Advances `NotStarted -> InProgress -> Ready` and never goes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    NotStarted,
    InProgress,
    Ready,
}

impl fmt::Display for LoadStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadStatus::NotStarted => write!(f, "not started"),
            LoadStatus::InProgress => write!(f, "in progress"),
            LoadStatus::Ready => write!(f, "ready"),
        }
    }
}

enum LoadState<T> {
    NotStarted,
    InProgress,
    Ready(Arc<SettingsMap<T>>),
}

impl<T> LoadState<T> {
    fn status(&self) -> LoadStatus {
        match self {
            LoadState::NotStarted => LoadStatus::NotStarted,
            LoadState::InProgress => LoadStatus::InProgress,
            LoadState::Ready(_) => LoadStatus::Ready,
        }
    }
}

pub(crate) struct StatusCell<T> {
    tx: watch::Sender<LoadState<T>>,
}

impl<T> StatusCell<T> {
    pub(crate) fn new() -> Self {
        let (tx, _) = watch::channel(LoadState::NotStarted);
        Self { tx }
    }

    /// Move `NotStarted -> InProgress`.
    ///
    /// Returns `true` for exactly one caller over the lifetime of the cell.
    pub(crate) fn claim(&self) -> bool {
        self.tx.send_if_modified(|state| {
            if matches!(state, LoadState::NotStarted) {
                *state = LoadState::InProgress;
                true
            } else {
                false
            }
        })
    }

    /// Publish the snapshot and wake every waiter. A second publish is ignored.
    pub(crate) fn publish(&self, snapshot: SettingsMap<T>) {
        let snapshot = Arc::new(snapshot);
        self.tx.send_if_modified(move |state| {
            if matches!(state, LoadState::Ready(_)) {
                return false;
            }
            *state = LoadState::Ready(snapshot);
            true
        });
    }

    pub(crate) fn status(&self) -> LoadStatus {
        self.tx.borrow().status()
    }

    pub(crate) fn ready(&self) -> Option<Arc<SettingsMap<T>>> {
        match &*self.tx.borrow() {
            LoadState::Ready(snapshot) => Some(Arc::clone(snapshot)),
            _ => None,
        }
    }

    /// Wait until the status becomes `Ready` and return the snapshot.
    pub(crate) async fn wait_ready(&self) -> Result<Arc<SettingsMap<T>>, CacheError> {
        let mut rx = self.tx.subscribe();
        let state = rx
            .wait_for(|state| matches!(state, LoadState::Ready(_)))
            .await
            .map_err(|_| CacheError::Closed)?;
        match &*state {
            LoadState::Ready(snapshot) => Ok(Arc::clone(snapshot)),
            _ => Err(CacheError::Closed),
        }
    }
}
