use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The four presentations over the same todo collection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewType {
    #[default]
    List,
    Kanban,
    Calendar,
    Stats,
}

impl ViewType {
    /// Views in tab order
    pub const ALL: [ViewType; 4] = [
        ViewType::List,
        ViewType::Kanban,
        ViewType::Calendar,
        ViewType::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ViewType::List => "list",
            ViewType::Kanban => "kanban",
            ViewType::Calendar => "calendar",
            ViewType::Stats => "stats",
        }
    }

    /// Tab label
    pub fn title(self) -> &'static str {
        match self {
            ViewType::List => "List",
            ViewType::Kanban => "Kanban",
            ViewType::Calendar => "Calendar",
            ViewType::Stats => "Stats",
        }
    }

    /// Whether this view's fetch includes archived todos.
    /// Only the stats view aggregates over everything.
    pub fn includes_archived(self) -> bool {
        matches!(self, ViewType::Stats)
    }
}

impl fmt::Display for ViewType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ViewType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "list" => Ok(ViewType::List),
            "kanban" => Ok(ViewType::Kanban),
            "calendar" => Ok(ViewType::Calendar),
            "stats" => Ok(ViewType::Stats),
            _ => Err(format!("unknown view '{}'", s)),
        }
    }
}
