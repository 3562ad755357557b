// src/engine.rs
//! Container engine: persistence tables, the cookie swap engine and the tab
//! event wiring around it.

pub mod config;
pub mod container;
pub mod cookies;
pub mod errors;
pub mod events;
pub mod ownership;
pub mod policy;
pub mod storage;
pub mod swap;
pub mod tabs;

mod domain;
#[allow(clippy::module_inception)]
mod engine;
mod handle;

pub use config::{EngineConfig, EngineConfigBuilder};
pub use container::{Container, ContainerColor, ContainerId, ContainerRegistry};
pub use domain::web_host;
pub use engine::ContainerEngine;
pub use errors::EngineError;
pub use events::{EngineCommand, EngineEvent, LoadStatus, TabEvent};
pub use handle::EngineHandle;

/// Default capacity of the engine command channel and event bus.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;
