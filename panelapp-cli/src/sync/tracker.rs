//! Per-entity version tracking on top of a [`VersionStore`]

use log::warn;

use super::error::SyncResult;
use super::marker::VersionMarker;
use super::store::VersionStore;

/// Why an entity does or does not need a refresh
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshReason {
    /// No usable stored marker (absent, empty or unparseable)
    NoRecord,
    /// Incoming marker is newer than the stored one, or cannot be compared
    Stale { stored: String, incoming: String },
    /// Stored marker is at least as new as the incoming one
    UpToDate { stored: String },
    /// Refresh requested regardless of stored state
    Forced,
}

/// Outcome of checking one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefreshDecision {
    pub refresh: bool,
    pub reason: RefreshReason,
}

impl RefreshDecision {
    fn refresh(reason: RefreshReason) -> Self {
        Self {
            refresh: true,
            reason,
        }
    }

    fn skip(reason: RefreshReason) -> Self {
        Self {
            refresh: false,
            reason,
        }
    }

    /// Short label for log output
    pub fn label(&self) -> &'static str {
        match self.reason {
            RefreshReason::NoRecord => "no record",
            RefreshReason::Stale { .. } => "stale",
            RefreshReason::UpToDate { .. } => "up to date",
            RefreshReason::Forced => "forced",
        }
    }
}

/// Reads, writes and compares the version marker of each entity
#[derive(Debug)]
pub struct VersionTracker<S> {
    store: S,
}

impl<S: VersionStore> VersionTracker<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stored marker for an entity
    ///
    /// Absent, empty and unparseable values all come back as `Ok(None)`.
    /// Only a failing store is an error.
    pub fn read(&self, entity_id: &str) -> SyncResult<Option<VersionMarker>> {
        let Some(raw) = self.store.get(entity_id)? else {
            return Ok(None);
        };

        if raw.trim().is_empty() {
            return Ok(None);
        }

        let marker = VersionMarker::parse(&raw);
        if marker.is_none() {
            warn!(
                "Stored version marker for {} is unparseable ('{}'), treating as missing",
                entity_id,
                raw.trim()
            );
        }
        Ok(marker)
    }

    /// Persist a marker, replacing any previous value
    pub fn write(&self, entity_id: &str, marker: &str) -> SyncResult<()> {
        self.store.put(entity_id, marker)
    }

    /// True unless both markers parse and the stored one is >= incoming
    pub fn is_stale(&self, entity_id: &str, incoming: &str) -> SyncResult<bool> {
        Ok(self.decide(entity_id, incoming)?.refresh)
    }

    /// Staleness check with the reason attached
    pub fn decide(&self, entity_id: &str, incoming: &str) -> SyncResult<RefreshDecision> {
        let Some(stored) = self.read(entity_id)? else {
            return Ok(RefreshDecision::refresh(RefreshReason::NoRecord));
        };

        let Some(incoming_marker) = VersionMarker::parse(incoming) else {
            warn!(
                "Incoming version marker for {} is unparseable ('{}'), will refresh",
                entity_id, incoming
            );
            return Ok(RefreshDecision::refresh(RefreshReason::Stale {
                stored: stored.to_string(),
                incoming: incoming.to_string(),
            }));
        };

        if incoming_marker.is_newer_than(&stored) {
            Ok(RefreshDecision::refresh(RefreshReason::Stale {
                stored: stored.to_string(),
                incoming: incoming_marker.to_string(),
            }))
        } else {
            Ok(RefreshDecision::skip(RefreshReason::UpToDate {
                stored: stored.to_string(),
            }))
        }
    }
}
