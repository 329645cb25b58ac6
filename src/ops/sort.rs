use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Todo;

/// List-view sort order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortKey {
    /// Newest first by creation time
    #[default]
    Date,
    /// High, medium, low
    Priority,
    /// By text, case- and accent-insensitive
    Alpha,
}

impl SortKey {
    pub const ALL: [SortKey; 3] = [SortKey::Date, SortKey::Priority, SortKey::Alpha];

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Priority => "priority",
            SortKey::Alpha => "alpha",
        }
    }

    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|k| *k == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "date" => Ok(SortKey::Date),
            "priority" => Ok(SortKey::Priority),
            "alpha" => Ok(SortKey::Alpha),
            _ => Err(format!("invalid sort '{}' (expected date, priority, alpha)", s)),
        }
    }
}

/// Order todos by `key`. Stable: equal elements keep their source order.
pub fn sort<'a>(todos: &[&'a Todo], key: SortKey) -> Vec<&'a Todo> {
    let mut sorted = todos.to_vec();
    match key {
        SortKey::Date => sorted.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
        SortKey::Priority => sorted.sort_by(|a, b| b.priority.rank().cmp(&a.priority.rank())),
        SortKey::Alpha => sorted.sort_by(|a, b| collate(&a.text, &b.text)),
    }
    sorted
}

/// Locale-style text comparison: primary key folds case and common Latin
/// diacritics, ties fall back to the raw text so the order stays total.
pub fn collate(a: &str, b: &str) -> Ordering {
    collation_key(a).cmp(&collation_key(b)).then_with(|| a.cmp(b))
}

fn collation_key(s: &str) -> String {
    let mut key = String::with_capacity(s.len());
    for c in s.chars().flat_map(char::to_lowercase) {
        match c {
            'ä' | 'à' | 'á' | 'â' | 'ã' | 'å' => key.push('a'),
            'ö' | 'ò' | 'ó' | 'ô' | 'õ' | 'ø' => key.push('o'),
            'ü' | 'ù' | 'ú' | 'û' => key.push('u'),
            'é' | 'è' | 'ê' | 'ë' => key.push('e'),
            'í' | 'ì' | 'î' | 'ï' => key.push('i'),
            'ç' => key.push('c'),
            'ñ' => key.push('n'),
            'ß' => key.push_str("ss"),
            'æ' => key.push_str("ae"),
            'œ' => key.push_str("oe"),
            other => key.push(other),
        }
    }
    key
}
