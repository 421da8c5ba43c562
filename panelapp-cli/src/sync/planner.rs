//! Refresh planning over an entity catalog

use log::{debug, warn};

use super::error::{SyncError, SyncResult};
use super::store::VersionStore;
use super::tracker::{RefreshDecision, RefreshReason, VersionTracker};

/// One trackable catalog record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    pub id: String,
    pub version_marker: String,
    pub display_name: String,
}

impl Entity {
    pub fn new(
        id: impl Into<String>,
        version_marker: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            version_marker: version_marker.into(),
            display_name: display_name.into(),
        }
    }
}

/// An entity selected for refresh, with the reason it was selected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlannedRefresh {
    pub entity: Entity,
    pub decision: RefreshDecision,
}

/// Outcome of planning a batch of entities
#[derive(Debug, Default)]
pub struct SyncPlan {
    /// Entities to refresh, in input order
    pub refresh: Vec<PlannedRefresh>,
    /// Entities whose stored marker could not be read
    pub failed: Vec<(Entity, SyncError)>,
}

/// Decides which entities need a refresh and records successful ones
#[derive(Debug)]
pub struct SyncPlanner<S> {
    tracker: VersionTracker<S>,
}

impl<S: VersionStore> SyncPlanner<S> {
    pub fn new(tracker: VersionTracker<S>) -> Self {
        Self { tracker }
    }

    /// Planner over a bare store
    pub fn with_store(store: S) -> Self {
        Self::new(VersionTracker::new(store))
    }

    pub fn tracker(&self) -> &VersionTracker<S> {
        &self.tracker
    }

    /// Entities needing refresh, in input order
    ///
    /// Fails with the first storage error encountered. Use
    /// [`plan_with_decisions`](Self::plan_with_decisions) to keep planning the
    /// remaining entities past a failure.
    pub fn plan(&self, entities: &[Entity], force: bool) -> SyncResult<Vec<Entity>> {
        let plan = self.plan_with_decisions(entities, force);
        if let Some((_, err)) = plan.failed.into_iter().next() {
            return Err(err);
        }
        Ok(plan.refresh.into_iter().map(|planned| planned.entity).collect())
    }

    /// Decide every entity, keeping the reason for each selected one
    ///
    /// A storage failure only affects its own entity: it is recorded in
    /// [`SyncPlan::failed`] and the rest are still decided. Nothing is written.
    pub fn plan_with_decisions(&self, entities: &[Entity], force: bool) -> SyncPlan {
        let mut plan = SyncPlan::default();

        for entity in entities {
            let decision = if force {
                RefreshDecision {
                    refresh: true,
                    reason: RefreshReason::Forced,
                }
            } else {
                match self.tracker.decide(&entity.id, &entity.version_marker) {
                    Ok(decision) => decision,
                    Err(e) => {
                        warn!("Cannot plan entity {}: {}", entity.id, e);
                        plan.failed.push((entity.clone(), e));
                        continue;
                    }
                }
            };

            debug!("Entity {}: {}", entity.id, decision.label());

            if decision.refresh {
                plan.refresh.push(PlannedRefresh {
                    entity: entity.clone(),
                    decision,
                });
            }
        }

        plan
    }

    /// Record the entity's marker after its refresh succeeded
    ///
    /// Must not be called for failed refreshes, so they are retried next pass.
    pub fn commit(&self, entity: &Entity) -> SyncResult<()> {
        self.tracker.write(&entity.id, &entity.version_marker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sync::store::{FileVersionStore, MemoryVersionStore};
    use std::io::{Error, ErrorKind};
    use tempfile::TempDir;

    /// Memory store whose reads fail for one id
    struct FailingIdStore {
        inner: MemoryVersionStore,
        failing_id: &'static str,
    }

    impl VersionStore for FailingIdStore {
        fn get(&self, entity_id: &str) -> SyncResult<Option<String>> {
            if entity_id == self.failing_id {
                return Err(SyncError::storage(
                    entity_id,
                    None,
                    Error::new(ErrorKind::PermissionDenied, "denied"),
                ));
            }
            self.inner.get(entity_id)
        }

        fn put(&self, entity_id: &str, value: &str) -> SyncResult<()> {
            self.inner.put(entity_id, value)
        }
    }

    fn panel(id: &str, marker: &str) -> Entity {
        Entity::new(id, marker, format!("Panel {}", id))
    }

    #[test]
    fn test_scenario_first_sync_then_up_to_date() {
        let planner = SyncPlanner::with_store(MemoryVersionStore::new());
        let e = panel("137", "2024-03-01T00:00:00Z");

        assert_eq!(planner.plan(&[e.clone()], false).unwrap(), vec![e.clone()]);

        planner.commit(&e).unwrap();
        assert!(planner.plan(&[e], false).unwrap().is_empty());
    }

    #[test]
    fn test_older_incoming_excluded() {
        let store = MemoryVersionStore::new().with_marker("137", "2024-03-01T00:00:00Z");
        let planner = SyncPlanner::with_store(store);
        let e = panel("137", "2024-02-15T00:00:00Z");

        assert!(planner.plan(&[e], false).unwrap().is_empty());
    }

    #[test]
    fn test_force_returns_everything_in_order() {
        let store = MemoryVersionStore::new()
            .with_marker("3", "2030-01-01T00:00:00Z")
            .with_marker("1", "2030-01-01T00:00:00Z");
        let planner = SyncPlanner::with_store(store);
        let entities = vec![
            panel("3", "2024-01-01T00:00:00Z"),
            panel("1", "2024-01-01T00:00:00Z"),
            panel("2", "2024-01-01T00:00:00Z"),
        ];

        assert_eq!(planner.plan(&entities, true).unwrap(), entities);
        assert!(
            planner
                .plan_with_decisions(&entities, true)
                .refresh
                .iter()
                .all(|p| p.decision.reason == RefreshReason::Forced)
        );
    }

    #[test]
    fn test_plan_preserves_order_and_filters() {
        let store = MemoryVersionStore::new()
            .with_marker("10", "2024-05-01T00:00:00Z")
            .with_marker("20", "2024-01-01T00:00:00Z")
            .with_marker("30", "");
        let planner = SyncPlanner::with_store(store);
        let entities = vec![
            panel("40", "2024-01-01T00:00:00Z"),
            panel("10", "2024-04-01T00:00:00Z"),
            panel("20", "2024-02-01T00:00:00Z"),
            panel("30", "2024-01-01T00:00:00Z"),
        ];

        let ids: Vec<_> = planner
            .plan(&entities, false)
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec!["40", "20", "30"]);
    }

    #[test]
    fn test_plan_does_not_write() {
        let planner = SyncPlanner::with_store(MemoryVersionStore::new());
        planner
            .plan(&[panel("1", "2024-01-01T00:00:00Z")], false)
            .unwrap();
        assert!(planner.tracker().store().is_empty());
    }

    #[test]
    fn test_commit_is_idempotent() {
        let planner = SyncPlanner::with_store(MemoryVersionStore::new());
        let e = panel("8", "2024-03-01T00:00:00Z");

        planner.commit(&e).unwrap();
        let once = planner.tracker().read("8").unwrap();
        planner.commit(&e).unwrap();
        let twice = planner.tracker().read("8").unwrap();

        assert_eq!(once, twice);
        assert_eq!(planner.tracker().store().len(), 1);
    }

    #[test]
    fn test_failed_refresh_keeps_prior_marker() {
        let store = MemoryVersionStore::new().with_marker("8", "2024-01-01T00:00:00Z");
        let planner = SyncPlanner::with_store(store);
        let updated = panel("8", "2024-06-01T00:00:00Z");

        assert_eq!(planner.plan(&[updated.clone()], false).unwrap().len(), 1);
        // Refresh failed: no commit, so the next pass still selects it
        assert_eq!(planner.plan(&[updated.clone()], false).unwrap().len(), 1);

        planner.commit(&updated).unwrap();
        assert!(planner.plan(&[updated], false).unwrap().is_empty());
    }

    #[test]
    fn test_file_backed_state_survives_new_planner() {
        let dir = TempDir::new().unwrap();
        let e = panel("137", "2024-03-01T00:00:00Z");

        let first = SyncPlanner::with_store(FileVersionStore::new(dir.path()));
        first.commit(&e).unwrap();

        let second = SyncPlanner::with_store(FileVersionStore::new(dir.path()));
        assert!(second.plan(&[e.clone()], false).unwrap().is_empty());

        let newer = panel("137", "2024-03-02T00:00:00Z");
        assert_eq!(second.plan(&[newer.clone()], false).unwrap(), vec![newer]);
    }

    #[test]
    fn test_storage_failure_only_affects_its_entity() {
        let planner = SyncPlanner::with_store(FailingIdStore {
            inner: MemoryVersionStore::new(),
            failing_id: "2",
        });
        let entities = vec![
            panel("1", "2024-01-01T00:00:00Z"),
            panel("2", "2024-01-01T00:00:00Z"),
            panel("3", "2024-01-01T00:00:00Z"),
        ];

        let plan = planner.plan_with_decisions(&entities, false);
        let ids: Vec<_> = plan.refresh.iter().map(|p| p.entity.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
        assert_eq!(plan.failed.len(), 1);
        assert_eq!(plan.failed[0].0.id, "2");
        assert!(matches!(
            plan.failed[0].1,
            SyncError::StorageUnavailable { .. }
        ));

        // The plain list still surfaces the failure rather than hiding it
        let err = planner.plan(&entities, false).unwrap_err();
        assert_eq!(err.entity_id(), "2");
    }
}
