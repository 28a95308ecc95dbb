/// Move catalog module
///
/// This module handles:
/// - The immutable move entries and their sortable stat cells (item.rs)
/// - Reading the tabular catalog source from disk (loader.rs)

pub mod item;
pub mod loader;

pub use item::{Item, Stat, StatCell};
pub use loader::load_catalog_async;

/// The loaded catalog, ordered by identifier
///
/// Identifiers are dense: the item at index `i` always has id `i + 1`.
/// The loader rejects any source that breaks this.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    pub(crate) fn from_sorted(items: Vec<Item>) -> Self {
        debug_assert!(items.iter().enumerate().all(|(i, item)| item.id as usize == i + 1));
        Self { items }
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, id: u32) -> Option<&Item> {
        let index = (id as usize).checked_sub(1)?;
        self.items.get(index)
    }

    pub fn ids(&self) -> impl Iterator<Item = u32> + '_ {
        self.items.iter().map(|item| item.id)
    }

    /// Distinct types in first-seen order
    pub fn kinds(&self) -> Vec<String> {
        distinct(self.items.iter().map(|item| item.kind.as_str()))
    }

    /// Distinct usage categories in first-seen order
    pub fn categories(&self) -> Vec<String> {
        distinct(self.items.iter().map(|item| item.category.as_str()))
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|v| v == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// Build a catalog from (name, type, category, power, accuracy, pp) rows
    pub fn catalog(rows: &[(&str, &str, &str, &str, &str, &str)]) -> Catalog {
        let items = rows
            .iter()
            .enumerate()
            .map(|(i, (name, kind, category, power, accuracy, pp))| Item {
                id: i as u32 + 1,
                name: name.to_string(),
                kind: kind.to_string(),
                category: category.to_string(),
                power: StatCell::parse(power),
                accuracy: StatCell::parse_percentage(accuracy),
                pp: StatCell::parse(pp),
            })
            .collect();
        Catalog::from_sorted(items)
    }

    /// A catalog of `n` generic moves, "Move 1" .. "Move n"
    pub fn numbered(n: u32) -> Catalog {
        let items = (1..=n)
            .map(|id| Item {
                id,
                name: format!("Move {}", id),
                kind: "노말".to_string(),
                category: "물리".to_string(),
                power: StatCell::parse("40"),
                accuracy: StatCell::parse_percentage("100%"),
                pp: StatCell::parse("35"),
            })
            .collect();
        Catalog::from_sorted(items)
    }

    pub fn sample() -> Catalog {
        catalog(&[
            ("막치기", "노말", "물리", "40", "100%", "35"),
            ("불꽃세례", "불꽃", "특수", "40", "100%", "25"),
            ("칼춤", "노말", "변화", "—", "—", "20"),
            ("물대포", "물", "특수", "40", "100%", "25"),
            ("베어가르기", "노말", "물리", "50", "95%", "30"),
            ("Struggle", "노말", "물리", "50", "—", "∞"),
        ])
    }
}
