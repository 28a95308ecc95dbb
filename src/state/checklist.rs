/// Challenge progress: which moves have been used, and in what order
///
/// `consume` is the only way to mark a move as used. The one way back is
/// replacing the whole state, through `reset_all` or `restore`.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::{Catalog, Item};
use crate::error::{Result, TrackerError};

/// Timestamps in the usage log are written as "2025-01-15 10:30:00"
mod log_timestamp {
    use chrono::NaiveDateTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d %H:%M:%S";

    pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveDateTime::parse_from_str(&raw, FORMAT)
            .or_else(|_| raw.parse::<NaiveDateTime>())
            .map_err(serde::de::Error::custom)
    }
}

/// One line of the usage log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageLogEntry {
    pub id: u32,
    /// Name at the time of use
    pub name: String,
    #[serde(with = "log_timestamp")]
    pub timestamp: NaiveDateTime,
}

/// Plain data copy of a checklist, shaped like the save file body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistSnapshot {
    /// Index 0 is move id 1
    pub used_moves: Vec<bool>,
    /// `None` when the log is disabled
    pub move_history: Option<Vec<UsageLogEntry>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistState {
    /// Every catalog id has an entry, and no other id ever appears
    consumed: BTreeMap<u32, bool>,
    log: Vec<UsageLogEntry>,
    log_enabled: bool,
}

impl ChecklistState {
    /// Fresh state with every move unused
    pub fn new(catalog: &Catalog, log_enabled: bool) -> Self {
        Self {
            consumed: catalog.ids().map(|id| (id, false)).collect(),
            log: Vec::new(),
            log_enabled,
        }
    }

    /// Number of moves tracked (the catalog length N)
    pub fn len(&self) -> usize {
        self.consumed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.consumed.is_empty()
    }

    /// Whether `id` has been used. Ids outside the catalog are a caller bug.
    pub fn is_consumed(&self, id: u32) -> bool {
        debug_assert!(self.consumed.contains_key(&id), "move id {} outside catalog", id);
        self.consumed.get(&id).copied().unwrap_or(false)
    }

    pub fn consumed_count(&self) -> usize {
        self.consumed.values().filter(|used| **used).count()
    }

    pub fn log_enabled(&self) -> bool {
        self.log_enabled
    }

    /// Usage log, oldest first
    pub fn log(&self) -> &[UsageLogEntry] {
        &self.log
    }

    /// Mark `item` as used
    ///
    /// # Errors
    /// * `UnknownItem` - the id is not part of this checklist
    /// * `AlreadyConsumed` - the move was used before; nothing changes
    pub fn consume(&mut self, item: &Item) -> Result<()> {
        let flag = self
            .consumed
            .get_mut(&item.id)
            .ok_or(TrackerError::UnknownItem(item.id))?;

        if *flag {
            return Err(TrackerError::AlreadyConsumed {
                id: item.id,
                name: item.name.clone(),
            });
        }

        *flag = true;
        if self.log_enabled {
            let now = Local::now().naive_local();
            self.log.push(UsageLogEntry {
                id: item.id,
                name: item.name.clone(),
                timestamp: now.with_nanosecond(0).unwrap_or(now),
            });
        }

        info!("Used move #{} {}", item.id, item.name);
        Ok(())
    }

    /// Clear every flag and the usage log
    pub fn reset_all(&mut self) {
        self.consumed.values_mut().for_each(|used| *used = false);
        self.log.clear();
        info!("Checklist reset ({} moves)", self.consumed.len());
    }

    pub fn snapshot(&self) -> ChecklistSnapshot {
        ChecklistSnapshot {
            used_moves: self.consumed.values().copied().collect(),
            move_history: self.log_enabled.then(|| self.log.clone()),
        }
    }

    /// Replace the whole state with `snapshot`
    ///
    /// Ids the snapshot does not cover (a save made against a shorter
    /// catalog) start unused. Flags past the catalog end are dropped, as are
    /// log entries for moves that are not marked used.
    pub fn restore(&mut self, snapshot: &ChecklistSnapshot) {
        if snapshot.used_moves.len() != self.consumed.len() {
            warn!(
                "Save covers {} moves, catalog has {}",
                snapshot.used_moves.len(),
                self.consumed.len()
            );
        }

        for (id, used) in self.consumed.iter_mut() {
            *used = snapshot
                .used_moves
                .get(*id as usize - 1)
                .copied()
                .unwrap_or(false);
        }

        self.log.clear();
        if self.log_enabled {
            let mut seen = BTreeSet::new();
            for entry in snapshot.move_history.iter().flatten() {
                let used = self.consumed.get(&entry.id).copied().unwrap_or(false);
                if used && seen.insert(entry.id) {
                    self.log.push(entry.clone());
                } else {
                    debug!("Dropping stale log entry for #{}", entry.id);
                }
            }
        }

        info!("Checklist restored: {}/{} used", self.consumed_count(), self.consumed.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn checklist(n: u32) -> (Catalog, ChecklistState) {
        let catalog = fixtures::numbered(n);
        let state = ChecklistState::new(&catalog, true);
        (catalog, state)
    }

    #[test]
    fn test_new_state_is_all_unused() {
        let (catalog, state) = checklist(469);
        assert_eq!(state.len(), 469);
        assert!(catalog.ids().all(|id| !state.is_consumed(id)));
        assert_eq!(state.consumed_count(), 0);
        assert!(state.log().is_empty());
    }

    #[test]
    fn test_consume_marks_and_logs() {
        let (catalog, mut state) = checklist(469);
        let item = catalog.get(120).unwrap();

        state.consume(item).unwrap();

        assert!(state.is_consumed(120));
        assert!(!state.is_consumed(121));
        assert_eq!(state.consumed_count(), 1);
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.log()[0].id, 120);
        assert_eq!(state.log()[0].name, "Move 120");
    }

    #[test]
    fn test_consume_twice_fails_without_side_effects() {
        let (catalog, mut state) = checklist(10);
        let item = catalog.get(3).unwrap();
        state.consume(item).unwrap();

        let err = state.consume(item).unwrap_err();
        assert!(matches!(err, TrackerError::AlreadyConsumed { id: 3, .. }));
        assert!(state.is_consumed(3));
        assert_eq!(state.log().len(), 1);
        assert_eq!(state.consumed_count(), 1);
    }

    #[test]
    fn test_consume_unknown_id() {
        let (_, mut state) = checklist(5);
        let stranger = fixtures::numbered(9).get(9).cloned().unwrap();
        assert!(matches!(state.consume(&stranger), Err(TrackerError::UnknownItem(9))));
        assert_eq!(state.consumed_count(), 0);
    }

    #[test]
    fn test_log_disabled_keeps_no_history() {
        let catalog = fixtures::numbered(5);
        let mut state = ChecklistState::new(&catalog, false);
        state.consume(catalog.get(2).unwrap()).unwrap();

        assert!(state.is_consumed(2));
        assert!(state.log().is_empty());
        assert_eq!(state.snapshot().move_history, None);
    }

    #[test]
    fn test_reset_all() {
        let (catalog, mut state) = checklist(20);
        for id in [1, 5, 20] {
            state.consume(catalog.get(id).unwrap()).unwrap();
        }

        state.reset_all();

        assert!(catalog.ids().all(|id| !state.is_consumed(id)));
        assert!(state.log().is_empty());
        // Usable again after a reset
        state.consume(catalog.get(5).unwrap()).unwrap();
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let (catalog, mut state) = checklist(30);
        for id in [7, 2, 30] {
            state.consume(catalog.get(id).unwrap()).unwrap();
        }
        let snapshot = state.snapshot();
        assert_eq!(snapshot.used_moves.len(), 30);
        assert!(snapshot.used_moves[6]);

        let mut other = ChecklistState::new(&catalog, true);
        other.consume(catalog.get(11).unwrap()).unwrap();
        other.restore(&snapshot);

        assert_eq!(other, state);
        assert!(!other.is_consumed(11));
    }

    #[test]
    fn test_restore_pads_shorter_saves() {
        let (_, mut state) = checklist(10);
        state.restore(&ChecklistSnapshot {
            used_moves: vec![true, false, true],
            move_history: None,
        });

        assert!(state.is_consumed(1));
        assert!(state.is_consumed(3));
        assert!((4..=10).all(|id| !state.is_consumed(id)));
        assert_eq!(state.consumed_count(), 2);
    }

    #[test]
    fn test_restore_ignores_flags_past_catalog_end() {
        let (_, mut state) = checklist(3);
        state.restore(&ChecklistSnapshot {
            used_moves: vec![false, true, false, true, true],
            move_history: None,
        });
        assert_eq!(state.len(), 3);
        assert_eq!(state.consumed_count(), 1);
    }

    #[test]
    fn test_restore_drops_log_entries_for_unused_moves() {
        let (_, mut state) = checklist(5);
        let at = NaiveDateTime::parse_from_str("2025-01-15 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let entry = |id: u32| UsageLogEntry { id, name: format!("Move {}", id), timestamp: at };

        state.restore(&ChecklistSnapshot {
            used_moves: vec![true, false, false, false, false],
            move_history: Some(vec![entry(1), entry(2), entry(1), entry(99)]),
        });

        assert_eq!(state.log(), &[entry(1)]);
        assert!(state.log().len() <= state.consumed_count());
    }

    #[test]
    fn test_log_entry_timestamp_format() {
        let at = NaiveDateTime::parse_from_str("2025-01-15 10:30:00", "%Y-%m-%d %H:%M:%S").unwrap();
        let entry = UsageLogEntry { id: 1, name: "몸통박치기".to_string(), timestamp: at };

        let json = serde_json::to_string(&entry).unwrap();
        assert_eq!(json, r#"{"id":1,"name":"몸통박치기","timestamp":"2025-01-15 10:30:00"}"#);
        assert_eq!(serde_json::from_str::<UsageLogEntry>(&json).unwrap(), entry);
    }
}
