// src/engine/tabs.rs
//! Tabs: identifiers, the host [`TabControl`] API, the persisted
//! [`TabAssignments`] table and visual grouping.

mod assignments;
mod control;
mod grouping;
mod in_memory;

pub use assignments::TabAssignments;
pub use control::{TabControl, TabControlHandle};
pub use grouping::group_tab;
pub use in_memory::{InMemoryTabs, TabCall};

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Browser-assigned tab identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(pub i32);

impl Display for TabId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Browser-assigned tab group identifier.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub i32);

/// Colours a tab group can take.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GroupColor {
    Grey,
    Blue,
    Red,
    Yellow,
    Green,
    Pink,
    Purple,
    Cyan,
    Orange,
}

/// What the host reports about a tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabInfo {
    pub id: TabId,
    /// Current URL, if the host exposes one.
    pub url: Option<String>,
    pub active: bool,
    /// Position in its window.
    pub index: usize,
}

/// Filter for [`TabControl::query`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TabQuery {
    pub active: Option<bool>,
    pub current_window: bool,
}

impl TabQuery {
    pub fn active_in_current_window() -> Self {
        Self { active: Some(true), current_window: true }
    }

    pub fn current_window() -> Self {
        Self { active: None, current_window: true }
    }
}
