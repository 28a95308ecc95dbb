/// UI widgets
///
/// - Sortable move table (move_table.rs)
/// - Move picker and use button (picker.rs)
/// - Recent usage list (history.rs)

pub mod history;
pub mod move_table;
pub mod picker;

use std::fmt;

/// Entry in the type / category drop-downs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice {
    All,
    Only(String),
}

impl Choice {
    /// "All" followed by each value
    pub fn options(values: Vec<String>) -> Vec<Choice> {
        std::iter::once(Choice::All)
            .chain(values.into_iter().map(Choice::Only))
            .collect()
    }

    pub fn from_filter(filter: &Option<String>) -> Self {
        match filter {
            Some(value) => Choice::Only(value.clone()),
            None => Choice::All,
        }
    }

    pub fn into_filter(self) -> Option<String> {
        match self {
            Choice::All => None,
            Choice::Only(value) => Some(value),
        }
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("All"),
            Choice::Only(value) => f.write_str(value),
        }
    }
}
