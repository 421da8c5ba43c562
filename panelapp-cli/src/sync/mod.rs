//! Incremental synchronization core
//!
//! Tracks one version marker per entity and decides which entities must be
//! fetched again. Network access and payload storage live elsewhere; this
//! module only reads and writes markers.

pub mod error;
pub mod marker;
pub mod planner;
pub mod store;
pub mod tracker;

pub use error::{SyncError, SyncResult};
pub use marker::{VersionMarker, parse_marker};
pub use planner::{Entity, PlannedRefresh, SyncPlan, SyncPlanner};
pub use store::{FileVersionStore, MemoryVersionStore, VERSION_FILE_NAME, VersionStore};
pub use tracker::{RefreshDecision, RefreshReason, VersionTracker};
