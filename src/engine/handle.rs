use tokio::sync::{broadcast, mpsc, oneshot};
use crate::engine::container::{Container, ContainerColor, ContainerId};
use crate::engine::events::{EngineCommand, EngineEvent, EngineMessage, Reply, TabEvent};
use crate::engine::tabs::TabId;
use crate::EngineError;

/// Cloneable front end of a running [`ContainerEngine`](crate::ContainerEngine).
///
/// The host forwards tab events with [`send_event`](Self::send_event); the
/// management UI uses the command methods, which wait for the engine's reply.
#[derive(Clone)]
pub struct EngineHandle {
    /// Engine message sender
    msg_tx: mpsc::Sender<EngineMessage>,
    /// Event sender, used to hand out subscriptions
    event_tx: broadcast::Sender<EngineEvent>,
}

impl std::fmt::Debug for EngineHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineHandle")
            .field("msg_tx", &self.msg_tx)
            .field("subscribers", &self.event_tx.receiver_count())
            .finish()
    }
}

impl EngineHandle {
    pub(crate) fn new(msg_tx: mpsc::Sender<EngineMessage>, event_tx: broadcast::Sender<EngineEvent>) -> Self {
        Self { msg_tx, event_tx }
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// Forwards a tab lifecycle event. Does not wait for it to be handled.
    pub async fn send_event(&self, event: TabEvent) -> Result<(), EngineError> {
        self.msg_tx
            .send(EngineMessage::Tab(event))
            .await
            .map_err(|_| EngineError::ChannelClosed)
    }

    /// Sends a command built around a fresh reply channel and waits for the answer.
    async fn request<T>(&self, make: impl FnOnce(Reply<T>) -> EngineCommand) -> Result<T, EngineError> {
        let (tx, rx) = oneshot::channel();

        self.msg_tx
            .send(EngineMessage::Command(make(tx)))
            .await
            .map_err(|_| EngineError::ChannelClosed)?;

        rx.await.map_err(|_| EngineError::ChannelClosed)?
    }

    pub async fn open_container_tab(&self, container: ContainerId, url: Option<String>) -> Result<TabId, EngineError> {
        self.request(|reply| EngineCommand::OpenContainerTab { container, url, reply }).await
    }

    pub async fn reopen_in_container(&self, container: ContainerId) -> Result<TabId, EngineError> {
        self.request(|reply| EngineCommand::ReopenInContainer { container, reply }).await
    }

    pub async fn sort_tabs(&self) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::SortTabs { reply }).await
    }

    /// Returns the domain the policy was recorded for.
    pub async fn always_open_in(&self, container: ContainerId) -> Result<String, EngineError> {
        self.request(|reply| EngineCommand::AlwaysOpenIn { container, reply }).await
    }

    pub async fn set_site_policy(&self, domain: impl Into<String>, container: ContainerId) -> Result<(), EngineError> {
        let domain = domain.into();
        self.request(|reply| EngineCommand::SetSitePolicy { domain, container, reply }).await
    }

    pub async fn remove_site_policy(&self, domain: impl Into<String>) -> Result<(), EngineError> {
        let domain = domain.into();
        self.request(|reply| EngineCommand::RemoveSitePolicy { domain, reply }).await
    }

    pub async fn list_site_policies(&self) -> Result<Vec<(String, ContainerId)>, EngineError> {
        self.request(|reply| EngineCommand::ListSitePolicies { reply }).await
    }

    pub async fn create_container(&self, container: Container) -> Result<ContainerId, EngineError> {
        self.request(|reply| EngineCommand::CreateContainer { container, reply }).await
    }

    pub async fn update_container(
        &self,
        id: ContainerId,
        name: Option<String>,
        color: Option<ContainerColor>,
        icon: Option<String>,
    ) -> Result<Container, EngineError> {
        self.request(|reply| EngineCommand::UpdateContainer { id, name, color, icon, reply }).await
    }

    pub async fn delete_container(&self, id: ContainerId) -> Result<(), EngineError> {
        self.request(|reply| EngineCommand::DeleteContainer { id, reply }).await
    }

    pub async fn list_containers(&self) -> Result<Vec<(ContainerId, Container)>, EngineError> {
        self.request(|reply| EngineCommand::ListContainers { reply }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn closed_engine_reports_channel_closed() {
        let (msg_tx, msg_rx) = mpsc::channel(1);
        let (event_tx, _) = broadcast::channel(1);
        let handle = EngineHandle::new(msg_tx, event_tx);
        drop(msg_rx);

        assert!(matches!(handle.send_event(TabEvent::Removed { tab: TabId(1) }).await, Err(EngineError::ChannelClosed)));
        assert!(matches!(handle.list_containers().await, Err(EngineError::ChannelClosed)));
    }

    #[tokio::test]
    async fn dropped_reply_reports_channel_closed() {
        let (msg_tx, mut msg_rx) = mpsc::channel(1);
        let (event_tx, _) = broadcast::channel(1);
        let handle = EngineHandle::new(msg_tx, event_tx);

        let engine = tokio::spawn(async move {
            // Swallow the command without replying
            let msg = msg_rx.recv().await;
            assert!(matches!(msg, Some(EngineMessage::Command(EngineCommand::SortTabs { .. }))));
        });
        assert!(matches!(handle.sort_tabs().await, Err(EngineError::ChannelClosed)));
        engine.await.unwrap();
    }
}
