//! Engine event types and commands.
//!
//! - [`TabEvent`]: tab lifecycle notifications forwarded by the host.
//! - [`EngineCommand`]: requests from the management UI, answered over a oneshot.
//! - [`EngineEvent`]: what the engine broadcasts to observers.

use tokio::sync::oneshot;
use crate::engine::container::{Container, ContainerColor, ContainerId};
use crate::engine::swap::SwapReport;
use crate::engine::tabs::TabId;
use crate::EngineError;

/// Load state reported with [`TabEvent::Updated`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Complete,
}

/// Tab lifecycle events of the host browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabEvent {
    /// A tab was opened, possibly from another tab (link, popup).
    Created { tab: TabId, opener: Option<TabId> },
    /// The user switched to a tab.
    Activated { tab: TabId },
    /// A tab's URL or load state changed.
    Updated { tab: TabId, url: Option<String>, status: Option<LoadStatus> },
    /// A tab was closed.
    Removed { tab: TabId },
}

pub(crate) type Reply<T> = oneshot::Sender<Result<T, EngineError>>;

#[derive(Debug)]
pub enum EngineCommand {
    // ****************************************
    // ** Tabs
    /// Open a tab in `container`, at `url` or the configured new tab page
    OpenContainerTab { container: ContainerId, url: Option<String>, reply: Reply<TabId> },
    /// Reopen the active tab's page in `container` and close the original
    ReopenInContainer { container: ContainerId, reply: Reply<TabId> },
    /// Sort the current window's tabs by container
    SortTabs { reply: Reply<()> },

    // ****************************************
    // ** Site policies
    /// Always open the active tab's site in `container`. Replies with the domain.
    AlwaysOpenIn { container: ContainerId, reply: Reply<String> },
    SetSitePolicy { domain: String, container: ContainerId, reply: Reply<()> },
    RemoveSitePolicy { domain: String, reply: Reply<()> },
    ListSitePolicies { reply: Reply<Vec<(String, ContainerId)>> },

    // ****************************************
    // ** Containers
    CreateContainer { container: Container, reply: Reply<ContainerId> },
    UpdateContainer {
        id: ContainerId,
        name: Option<String>,
        color: Option<ContainerColor>,
        icon: Option<String>,
        reply: Reply<Container>,
    },
    /// Delete a container with its site policies and saved cookie jars
    DeleteContainer { id: ContainerId, reply: Reply<()> },
    ListContainers { reply: Reply<Vec<(ContainerId, Container)>> },
}

/// Everything that reaches the engine's run loop.
#[derive(Debug)]
pub(crate) enum EngineMessage {
    Tab(TabEvent),
    Command(EngineCommand),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The run loop is accepting messages
    EngineStarted,
    /// A domain changed owner
    Swapped(SwapReport),
    /// A tab was replaced by one in another container because of a site policy
    Transplanted { from: TabId, to_tab: TabId, domain: String, container: ContainerId },
    ContainerCreated { id: ContainerId },
    ContainerUpdated { id: ContainerId },
    ContainerRemoved { id: ContainerId },
}

impl EngineCommand {
    /// Short name used in logs.
    pub fn name(&self) -> &'static str {
        match self {
            EngineCommand::OpenContainerTab { .. } => "OpenContainerTab",
            EngineCommand::ReopenInContainer { .. } => "ReopenInContainer",
            EngineCommand::SortTabs { .. } => "SortTabs",
            EngineCommand::AlwaysOpenIn { .. } => "AlwaysOpenIn",
            EngineCommand::SetSitePolicy { .. } => "SetSitePolicy",
            EngineCommand::RemoveSitePolicy { .. } => "RemoveSitePolicy",
            EngineCommand::ListSitePolicies { .. } => "ListSitePolicies",
            EngineCommand::CreateContainer { .. } => "CreateContainer",
            EngineCommand::UpdateContainer { .. } => "UpdateContainer",
            EngineCommand::DeleteContainer { .. } => "DeleteContainer",
            EngineCommand::ListContainers { .. } => "ListContainers",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_names() {
        let (tx, _rx) = oneshot::channel();
        assert_eq!(EngineCommand::SortTabs { reply: tx }.name(), "SortTabs");
        let (tx, _rx) = oneshot::channel();
        let cmd = EngineCommand::OpenContainerTab { container: ContainerId::default(), url: None, reply: tx };
        assert_eq!(cmd.name(), "OpenContainerTab");
        assert!(format!("{cmd:?}").contains("OpenContainerTab"));
    }

    #[test]
    fn tab_events_compare() {
        let a = TabEvent::Updated { tab: TabId(1), url: Some("https://a.com/".into()), status: Some(LoadStatus::Loading) };
        assert_eq!(a.clone(), a);
        assert_ne!(a, TabEvent::Removed { tab: TabId(1) });
    }
}
