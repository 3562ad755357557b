// src/engine/container.rs
//! Containers: [`ContainerId`], [`Container`], the colour palette and the
//! persisted [`ContainerRegistry`].

mod registry;

pub use registry::ContainerRegistry;

use serde::{Deserialize, Serialize};
use std::fmt::Display;
use uuid::Uuid;
use crate::engine::errors::EngineError;
use crate::engine::tabs::GroupColor;

/// Identifier of a container.
///
/// Ids only contain lowercase ASCII letters, digits and `-`. The
/// special [`ContainerId::DEFAULT`] id stands for "no container".
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContainerId(String);

impl ContainerId {
    pub const DEFAULT: &'static str = "default";

    /// The implicit container of every untracked tab and unowned domain.
    pub fn default_container() -> Self {
        Self(Self::DEFAULT.to_string())
    }

    /// Generates a fresh id for a user-created container.
    pub fn generate() -> Self {
        Self(format!("container-{}", Uuid::new_v4()))
    }

    pub fn parse(s: &str) -> Result<Self, EngineError> {
        let valid = !s.is_empty()
            && s.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'-');
        if valid {
            Ok(Self(s.to_string()))
        } else {
            Err(EngineError::InvalidContainerId(s.to_string()))
        }
    }

    pub fn is_default(&self) -> bool {
        self.0 == Self::DEFAULT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ContainerId {
    fn default() -> Self {
        Self::default_container()
    }
}

impl TryFrom<String> for ContainerId {
    type Error = EngineError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<ContainerId> for String {
    fn from(id: ContainerId) -> Self {
        id.0
    }
}

impl Display for ContainerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Colour palette offered for containers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerColor {
    Blue,
    Orange,
    Green,
    Pink,
    Purple,
    Red,
    Yellow,
    Teal,
    #[serde(other)]
    Grey,
}

impl ContainerColor {
    /// Colour of the tab group that visualizes this container.
    pub fn group_color(self) -> GroupColor {
        match self {
            ContainerColor::Blue => GroupColor::Blue,
            ContainerColor::Orange => GroupColor::Orange,
            ContainerColor::Green => GroupColor::Green,
            ContainerColor::Pink => GroupColor::Pink,
            ContainerColor::Purple => GroupColor::Purple,
            ContainerColor::Red => GroupColor::Red,
            ContainerColor::Yellow => GroupColor::Yellow,
            ContainerColor::Teal => GroupColor::Cyan,
            ContainerColor::Grey => GroupColor::Grey,
        }
    }
}

/// A named isolation identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Container {
    /// Display name (ie: Work, Banking)
    pub name: String,
    pub color: ContainerColor,
    /// Icon tag understood by the UI (ie: briefcase)
    pub icon: String,
}

impl Container {
    pub fn new(name: impl Into<String>, color: ContainerColor, icon: impl Into<String>) -> Self {
        Self { name: name.into(), color, icon: icon.into() }
    }
}

/// Containers written on first run.
pub fn builtin_containers() -> Vec<(ContainerId, Container)> {
    [
        (ContainerId::DEFAULT, "Default", ContainerColor::Grey, "circle"),
        ("personal", "Personal", ContainerColor::Blue, "fingerprint"),
        ("work", "Work", ContainerColor::Orange, "briefcase"),
        ("banking", "Banking", ContainerColor::Green, "dollar"),
        ("shopping", "Shopping", ContainerColor::Pink, "cart"),
    ]
    .into_iter()
    .map(|(id, name, color, icon)| (ContainerId(id.to_string()), Container::new(name, color, icon)))
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_validated() {
        assert!(ContainerId::parse("work").is_ok());
        assert!(ContainerId::parse("container-1a2b").is_ok());
        assert!(ContainerId::parse("").is_err());
        assert!(ContainerId::parse("Work").is_err());
        assert!(ContainerId::parse("my_container").is_err());
    }

    #[test]
    fn generated_ids_are_valid_and_distinct() {
        let a = ContainerId::generate();
        let b = ContainerId::generate();
        assert_ne!(a, b);
        assert!(ContainerId::parse(a.as_str()).is_ok());
        assert!(!a.is_default());
    }

    #[test]
    fn default_id_is_explicit() {
        assert!(ContainerId::default().is_default());
        assert_eq!(ContainerId::default_container().to_string(), "default");
    }

    #[test]
    fn id_deserialization_rejects_invalid() {
        assert!(serde_json::from_str::<ContainerId>("\"work\"").is_ok());
        assert!(serde_json::from_str::<ContainerId>("\"bad_id\"").is_err());
    }

    #[test]
    fn teal_maps_to_cyan_and_unknown_colors_fall_back_to_grey() {
        assert_eq!(ContainerColor::Teal.group_color(), GroupColor::Cyan);
        assert_eq!(ContainerColor::Blue.group_color(), GroupColor::Blue);

        let c: ContainerColor = serde_json::from_str("\"turquoise\"").unwrap();
        assert_eq!(c, ContainerColor::Grey);
        assert_eq!(c.group_color(), GroupColor::Grey);
    }

    #[test]
    fn builtins_include_default() {
        let builtins = builtin_containers();
        assert_eq!(builtins.len(), 5);
        assert!(builtins.iter().any(|(id, c)| id.is_default() && c.color == ContainerColor::Grey));
    }
}
