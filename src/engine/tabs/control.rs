use std::sync::Arc;
use async_trait::async_trait;
use crate::engine::errors::TabError;
use crate::engine::tabs::{GroupColor, GroupId, TabId, TabInfo, TabQuery};

/// Tab operations provided by the host browser.
#[async_trait]
pub trait TabControl: Send + Sync {
    async fn get(&self, tab: TabId) -> Result<TabInfo, TabError>;

    /// Opens a tab at `url`. An inactive tab does not trigger activation events.
    async fn create(&self, url: &str, active: bool) -> Result<TabId, TabError>;

    async fn activate(&self, tab: TabId) -> Result<(), TabError>;

    async fn remove(&self, tab: TabId) -> Result<(), TabError>;

    /// Tabs matching `query`, ordered by index.
    async fn query(&self, query: &TabQuery) -> Result<Vec<TabInfo>, TabError>;

    async fn move_to(&self, tab: TabId, index: usize) -> Result<(), TabError>;

    /// Puts `tabs` into a (new) group.
    async fn group(&self, tabs: &[TabId]) -> Result<GroupId, TabError>;

    async fn style_group(&self, group: GroupId, color: GroupColor, title: &str) -> Result<(), TabError>;
}

/// Shared handle to the host tab API.
pub type TabControlHandle = Arc<dyn TabControl>;
