use crate::engine::container::ContainerId;
use crate::engine::tabs::TabId;

/// Errors returned by the engine and its persistence tables.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Cookie store error: {0}")]
    Cookies(#[from] CookieError),

    #[error("Tab error: {0}")]
    Tabs(#[from] TabError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("Container not found: {0}")]
    ContainerNotFound(ContainerId),

    #[error("The default container cannot be modified or removed")]
    DefaultContainerImmutable,

    #[error("Invalid container id: {0:?}")]
    InvalidContainerId(String),

    #[error("No active tab")]
    NoActiveTab,

    #[error("Tab {0} has no web URL")]
    NotAWebPage(TabId),

    #[error("Engine channel closed")]
    ChannelClosed,
}

/// Faults of the key-value substrate. Always fatal to the current operation.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("backend failure: {0}")]
    Backend(#[from] anyhow::Error),

    #[cfg(feature = "sqlite_store")]
    #[error("sqlite: {0}")]
    Sqlite(#[from] r2d2_sqlite::rusqlite::Error),

    #[cfg(feature = "sqlite_store")]
    #[error("connection pool: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("record {key} cannot be (de)serialized: {source}")]
    Codec {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("storage task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Failures of the live (browser) cookie store.
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    #[error("cannot build a cookie URL from {0:?}")]
    InvalidUrl(String),

    #[error("cookie {name} rejected: {reason}")]
    Rejected { name: String, reason: String },

    #[error("host cookie store failure: {0}")]
    Host(#[from] anyhow::Error),
}

/// Failures of the host tab API.
#[derive(Debug, thiserror::Error)]
pub enum TabError {
    #[error("tab {0} not found")]
    NotFound(TabId),

    #[error("host tab API failure: {0}")]
    Host(#[from] anyhow::Error),
}

/// Validation errors of [`EngineConfig`](crate::engine::config::EngineConfig).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("web_schemes must contain at least one scheme")]
    NoWebSchemes,

    #[error("channel_capacity must be at least 1")]
    ZeroChannelCapacity,

    #[error("new_tab_url must not be empty")]
    EmptyNewTabUrl,
}
