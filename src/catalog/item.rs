/// Catalog entries and their sortable stat columns
///
/// Power, accuracy and PP come from the source as text. Most rows hold a
/// number, but some hold a placeholder: "—" when the stat does not apply and
/// "∞" when it is unlimited. A `StatCell` keeps the text exactly as it should
/// be shown and a `Stat` that orders correctly against the numbers.

use std::cmp::Ordering;
use std::fmt;

/// Placeholder tokens meaning "not applicable"
const NOT_APPLICABLE_TOKENS: [&str; 3] = ["—", "-", ""];

/// Placeholder token meaning "unlimited"
const UNLIMITED_TOKEN: &str = "∞";

/// Comparable value of a stat column
///
/// Ordering: `NotApplicable` < every `Value` < `Unlimited` < `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Stat {
    NotApplicable,
    Value(u32),
    Unlimited,
    /// Any other non-numeric token, kept verbatim
    Unknown(String),
}

impl Stat {
    fn rank(&self) -> u8 {
        match self {
            Stat::NotApplicable => 0,
            Stat::Value(_) => 1,
            Stat::Unlimited => 2,
            Stat::Unknown(_) => 3,
        }
    }

    /// Parse a raw cell. A trailing percent sign is ignored.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let numeric = trimmed.strip_suffix('%').unwrap_or(trimmed).trim();

        if let Ok(value) = numeric.parse::<u32>() {
            Stat::Value(value)
        } else if NOT_APPLICABLE_TOKENS.contains(&numeric) {
            Stat::NotApplicable
        } else if numeric == UNLIMITED_TOKEN {
            Stat::Unlimited
        } else {
            Stat::Unknown(trimmed.to_string())
        }
    }
}

impl Ord for Stat {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Stat::Value(a), Stat::Value(b)) => a.cmp(b),
            (Stat::Unknown(a), Stat::Unknown(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl PartialOrd for Stat {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A stat as displayed plus its comparable value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCell {
    pub display: String,
    pub value: Stat,
}

impl StatCell {
    pub fn parse(raw: &str) -> Self {
        Self {
            display: raw.trim().to_string(),
            value: Stat::parse(raw),
        }
    }

    /// Accuracy column: the display form always carries a percent sign when
    /// the value is numeric, whether or not the source wrote one.
    pub fn parse_percentage(raw: &str) -> Self {
        let value = Stat::parse(raw);
        let display = match value {
            Stat::Value(n) => format!("{}%", n),
            _ => raw.trim().to_string(),
        };
        Self { display, value }
    }
}

impl fmt::Display for StatCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// One immutable catalog entry (a move)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    /// Dense identifier, 1..=N
    pub id: u32,
    pub name: String,
    /// Elemental type, e.g. "노말"
    pub kind: String,
    /// Usage category, e.g. "물리" / "특수" / "변화"
    pub category: String,
    pub power: StatCell,
    pub accuracy: StatCell,
    pub pp: StatCell,
}

impl Item {
    /// Label used by the move picker: "<id>. <name>"
    pub fn picker_label(&self) -> String {
        format!("{}. {}", self.id, self.name)
    }
}
