/// Filter/sort engine for the move table
///
/// `apply` is a pure function of the catalog, the checklist and a
/// `FilterSpec`. It rebuilds the whole view on every call.

use std::cmp::Ordering;
use std::fmt;

use crate::catalog::{Catalog, Item};
use crate::state::checklist::ChecklistState;

/// Consumed-state filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UsageFilter {
    #[default]
    Any,
    Consumed,
    Unconsumed,
}

impl UsageFilter {
    pub const ALL: [UsageFilter; 3] = [UsageFilter::Any, UsageFilter::Consumed, UsageFilter::Unconsumed];

    fn matches(self, consumed: bool) -> bool {
        match self {
            UsageFilter::Any => true,
            UsageFilter::Consumed => consumed,
            UsageFilter::Unconsumed => !consumed,
        }
    }
}

impl fmt::Display for UsageFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UsageFilter::Any => "All",
            UsageFilter::Consumed => "Used",
            UsageFilter::Unconsumed => "Unused",
        })
    }
}

/// Sortable columns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Id,
    Name,
    Kind,
    Category,
    Power,
    Accuracy,
    Pp,
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::Id,
        SortKey::Name,
        SortKey::Kind,
        SortKey::Category,
        SortKey::Power,
        SortKey::Accuracy,
        SortKey::Pp,
    ];

    pub fn title(self) -> &'static str {
        match self {
            SortKey::Id => "ID",
            SortKey::Name => "Name",
            SortKey::Kind => "Type",
            SortKey::Category => "Category",
            SortKey::Power => "Power",
            SortKey::Accuracy => "Accuracy",
            SortKey::Pp => "PP",
        }
    }

    fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            SortKey::Id => a.id.cmp(&b.id),
            SortKey::Name => a.name.cmp(&b.name),
            SortKey::Kind => a.kind.cmp(&b.kind),
            SortKey::Category => a.category.cmp(&b.category),
            SortKey::Power => a.power.value.cmp(&b.power.value),
            SortKey::Accuracy => a.accuracy.value.cmp(&b.accuracy.value),
            SortKey::Pp => a.pp.value.cmp(&b.pp.value),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn arrow(self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Current filter and sort configuration
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilterSpec {
    /// Case-insensitive, unanchored match on the name
    pub search: String,
    /// `None` means any type
    pub kind: Option<String>,
    /// `None` means any category
    pub category: Option<String>,
    pub usage: UsageFilter,
    /// `None` keeps catalog order
    pub sort: Option<(SortKey, SortDirection)>,
}

impl FilterSpec {
    /// Request a sort by `key`: the active key flips direction, a new key
    /// starts ascending.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.sort = match self.sort {
            Some((current, SortDirection::Ascending)) if current == key => {
                Some((key, SortDirection::Descending))
            }
            Some((current, SortDirection::Descending)) if current == key => {
                Some((key, SortDirection::Ascending))
            }
            _ => Some((key, SortDirection::Ascending)),
        };
    }

    pub fn direction_for(&self, key: SortKey) -> Option<SortDirection> {
        self.sort
            .and_then(|(current, direction)| (current == key).then_some(direction))
    }

    fn matches(&self, item: &Item, consumed: bool, needle: &str) -> bool {
        (needle.is_empty() || item.name.to_lowercase().contains(needle))
            && self.kind.as_deref().map_or(true, |kind| item.kind == kind)
            && self.category.as_deref().map_or(true, |category| item.category == category)
            && self.usage.matches(consumed)
    }
}

/// One visible row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewRow<'a> {
    pub item: &'a Item,
    pub consumed: bool,
}

/// Filter and sort the catalog
///
/// Ascending ties fall back to id order. Descending is the exact reverse of
/// ascending.
pub fn apply<'a>(catalog: &'a Catalog, checklist: &ChecklistState, spec: &FilterSpec) -> Vec<ViewRow<'a>> {
    let needle = spec.search.trim().to_lowercase();

    let mut rows: Vec<ViewRow<'a>> = catalog
        .items()
        .iter()
        .map(|item| ViewRow {
            item,
            consumed: checklist.is_consumed(item.id),
        })
        .filter(|row| spec.matches(row.item, row.consumed, &needle))
        .collect();

    if let Some((key, direction)) = spec.sort {
        rows.sort_by(|a, b| key.compare(a.item, b.item).then(a.item.id.cmp(&b.item.id)));
        if direction == SortDirection::Descending {
            rows.reverse();
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures;

    fn ids(rows: &[ViewRow<'_>]) -> Vec<u32> {
        rows.iter().map(|row| row.item.id).collect()
    }

    #[test]
    fn test_no_filter_keeps_catalog_order() {
        let catalog = fixtures::sample();
        let state = ChecklistState::new(&catalog, true);
        let rows = apply(&catalog, &state, &FilterSpec::default());
        assert_eq!(ids(&rows), vec![1, 2, 3, 4, 5, 6]);
        assert!(rows.iter().all(|row| !row.consumed));
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        let catalog = fixtures::sample();
        let state = ChecklistState::new(&catalog, true);
        let spec = FilterSpec {
            search: "rUGg".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&catalog, &state, &spec)), vec![6]);

        let spec = FilterSpec {
            search: "치기".to_string(),
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&catalog, &state, &spec)), vec![1]);
    }

    #[test]
    fn test_predicates_combine() {
        let catalog = fixtures::sample();
        let mut state = ChecklistState::new(&catalog, true);
        state.consume(catalog.get(5).unwrap()).unwrap();

        let spec = FilterSpec {
            kind: Some("노말".to_string()),
            category: Some("물리".to_string()),
            usage: UsageFilter::Unconsumed,
            ..FilterSpec::default()
        };
        assert_eq!(ids(&apply(&catalog, &state, &spec)), vec![1, 6]);

        let spec = FilterSpec {
            usage: UsageFilter::Consumed,
            ..FilterSpec::default()
        };
        let rows = apply(&catalog, &state, &spec);
        assert_eq!(ids(&rows), vec![5]);
        assert!(rows[0].consumed);
    }

    #[test]
    fn test_power_sort_places_placeholders() {
        let catalog = fixtures::catalog(&[
            ("A", "노말", "물리", "∞", "100%", "10"),
            ("B", "노말", "물리", "40", "100%", "10"),
            ("C", "노말", "변화", "—", "—", "10"),
        ]);
        let state = ChecklistState::new(&catalog, true);
        let mut spec = FilterSpec::default();
        spec.toggle_sort(SortKey::Power);

        let powers: Vec<&str> = apply(&catalog, &state, &spec)
            .iter()
            .map(|row| row.item.power.display.as_str())
            .collect();
        assert_eq!(powers, vec!["—", "40", "∞"]);
    }

    #[test]
    fn test_ties_break_by_id() {
        let catalog = fixtures::sample();
        let state = ChecklistState::new(&catalog, true);
        let mut spec = FilterSpec::default();
        spec.toggle_sort(SortKey::Power);

        // 40 x3 (1, 2, 4), 50 x2 (5, 6), — first
        assert_eq!(ids(&apply(&catalog, &state, &spec)), vec![3, 1, 2, 4, 5, 6]);
    }

    #[test]
    fn test_toggle_reverses_exactly() {
        let catalog = fixtures::sample();
        let state = ChecklistState::new(&catalog, true);

        for key in SortKey::ALL {
            let mut spec = FilterSpec::default();
            spec.toggle_sort(key);
            let ascending = ids(&apply(&catalog, &state, &spec));

            spec.toggle_sort(key);
            assert_eq!(spec.direction_for(key), Some(SortDirection::Descending));
            let mut descending = ids(&apply(&catalog, &state, &spec));
            descending.reverse();

            assert_eq!(ascending, descending, "key {:?}", key);
        }
    }

    #[test]
    fn test_new_key_resets_to_ascending() {
        let mut spec = FilterSpec::default();
        spec.toggle_sort(SortKey::Name);
        spec.toggle_sort(SortKey::Name);
        spec.toggle_sort(SortKey::Pp);
        assert_eq!(spec.sort, Some((SortKey::Pp, SortDirection::Ascending)));
        assert_eq!(spec.direction_for(SortKey::Name), None);
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let catalog = fixtures::sample();
        let mut state = ChecklistState::new(&catalog, true);
        state.consume(catalog.get(2).unwrap()).unwrap();
        let mut spec = FilterSpec {
            search: "a".to_string(),
            ..FilterSpec::default()
        };
        spec.toggle_sort(SortKey::Accuracy);

        assert_eq!(apply(&catalog, &state, &spec), apply(&catalog, &state, &spec));
    }
}
