use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tokio::task::JoinHandle;
use crate::engine::config::EngineConfig;
use crate::engine::container::{Container, ContainerColor, ContainerId, ContainerRegistry};
use crate::engine::cookies::{CookieJarStore, LiveCookieHandle};
use crate::engine::domain::web_host;
use crate::engine::events::{EngineCommand, EngineEvent, EngineMessage, LoadStatus, TabEvent};
use crate::engine::handle::EngineHandle;
use crate::engine::ownership::OwnershipLedger;
use crate::engine::policy::{NavigationPolicyResolver, Resolution, SitePolicyTable};
use crate::engine::storage::{KeyValueHandle, RecordStore};
use crate::engine::swap::{SwapEngine, SwapOutcome};
use crate::engine::tabs::{group_tab, TabAssignments, TabControlHandle, TabId, TabInfo, TabQuery};
use crate::engine::errors::TabError;
use crate::EngineError;

/// Wires tab events and UI commands to the container tables and the swap
/// engine.
///
/// The engine keeps no state of its own besides handles: every decision
/// re-reads the persisted tables, so it can be dropped and rebuilt at any
/// time without losing anything.
#[derive(Clone)]
pub struct ContainerEngine {
    config: Arc<EngineConfig>,
    registry: ContainerRegistry,
    assignments: TabAssignments,
    policies: SitePolicyTable,
    resolver: NavigationPolicyResolver,
    swap: SwapEngine,
    tabs: TabControlHandle,
    /// Event sender
    event_tx: broadcast::Sender<EngineEvent>,
}

impl std::fmt::Debug for ContainerEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerEngine")
            .field("config", &self.config)
            .field("swap", &self.swap)
            .field("tabs", &"Arc<dyn TabControl>")
            .finish()
    }
}

impl ContainerEngine {
    /// Creates an engine on top of the host's storage, cookie store and tabs.
    ///
    /// ```
    /// # use std::sync::Arc;
    /// # use gosub_containers::{ContainerEngine, EngineConfig};
    /// # use gosub_containers::engine::storage::InMemoryStore;
    /// # use gosub_containers::engine::cookies::InMemoryCookieStore;
    /// # use gosub_containers::engine::tabs::InMemoryTabs;
    /// let engine = ContainerEngine::new(
    ///     EngineConfig::default(),
    ///     Arc::new(InMemoryStore::new()),
    ///     Arc::new(InMemoryCookieStore::new()),
    ///     Arc::new(InMemoryTabs::new()),
    /// );
    /// ```
    pub fn new(config: EngineConfig, kv: KeyValueHandle, live: LiveCookieHandle, tabs: TabControlHandle) -> Self {
        let records = RecordStore::new(kv);
        let registry = ContainerRegistry::new(records.clone());
        let assignments = TabAssignments::new(records.clone());
        let policies = SitePolicyTable::new(records.clone());
        let swap = SwapEngine::new(
            live,
            CookieJarStore::new(records.clone()),
            OwnershipLedger::new(records),
            config.serialize_swaps,
        );
        let resolver = NavigationPolicyResolver::new(
            policies.clone(),
            assignments.clone(),
            registry.clone(),
            tabs.clone(),
            config.web_schemes.clone(),
        );

        // Broadcast event bus. Subscribe to receive swaps, transplants and container changes.
        let (event_tx, _first_rx) = broadcast::channel::<EngineEvent>(config.channel_capacity.max(1));

        Self {
            config: Arc::new(config),
            registry,
            assignments,
            policies,
            resolver,
            swap,
            tabs,
            event_tx,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &ContainerRegistry {
        &self.registry
    }

    pub fn assignments(&self) -> &TabAssignments {
        &self.assignments
    }

    pub fn policies(&self) -> &SitePolicyTable {
        &self.policies
    }

    pub fn swap_engine(&self) -> &SwapEngine {
        &self.swap
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<EngineEvent> {
        self.event_tx.subscribe()
    }

    /// First-run setup: seeds the built-in containers when enabled and none exist.
    pub async fn install(&self) -> Result<(), EngineError> {
        if self.config.seed_default_containers {
            self.registry.seed_builtins().await?;
        }
        Ok(())
    }

    /// Installs the engine and spawns its run loop.
    ///
    /// The loop ends once every [`EngineHandle`] is dropped.
    pub async fn start(self) -> Result<(EngineHandle, JoinHandle<()>), EngineError> {
        self.install().await?;

        let (msg_tx, msg_rx) = mpsc::channel::<EngineMessage>(self.config.channel_capacity.max(1));
        let handle = EngineHandle::new(msg_tx, self.event_tx.clone());
        let join_handle = tokio::spawn(self.run(msg_rx));

        Ok((handle, join_handle))
    }

    /// Every message is handled on its own task, so handlers interleave the
    /// way browser event listeners do. Failures are logged; commands also
    /// report them through their reply channel.
    async fn run(self, mut msg_rx: mpsc::Receiver<EngineMessage>) {
        let _ = self.event_tx.send(EngineEvent::EngineStarted);

        while let Some(msg) = msg_rx.recv().await {
            let engine = self.clone();
            tokio::spawn(async move {
                match msg {
                    EngineMessage::Tab(event) => {
                        if let Err(e) = engine.handle_event(event.clone()).await {
                            log::error!("handling {event:?} failed: {e}");
                        }
                    }
                    EngineMessage::Command(cmd) => engine.execute(cmd).await,
                }
            });
        }

        log::debug!("engine channel closed, run loop finished");
    }

    /// Reacts to one tab lifecycle event.
    pub async fn handle_event(&self, event: TabEvent) -> Result<(), EngineError> {
        match event {
            TabEvent::Created { tab, opener: Some(opener) } => {
                if let Some(container) = self.assignments.inherit(tab, opener).await? {
                    log::debug!("tab {tab} inherits container {container} from tab {opener}");
                    group_tab(self.tabs.as_ref(), &self.registry, tab, &container).await;
                }
            }
            TabEvent::Created { .. } => {}
            TabEvent::Activated { tab } => {
                let info = match self.tabs.get(tab).await {
                    Ok(info) => info,
                    Err(TabError::NotFound(_)) => {
                        log::debug!("tab {tab} closed before its activation was handled");
                        return Ok(());
                    }
                    Err(e) => return Err(e.into()),
                };
                if let Some(url) = info.url {
                    self.swap_for_tab(tab, &url).await?;
                }
            }
            TabEvent::Updated { tab, url: Some(url), status: Some(LoadStatus::Loading) } => {
                match self.resolver.resolve(tab, &url).await? {
                    Resolution::Ignored => {}
                    Resolution::Stay { domain, container } => {
                        // Background tabs swap once they are activated
                        if self.tabs.get(tab).await?.active {
                            self.swap(&domain, &container).await?;
                        }
                    }
                    Resolution::Transplanted { from, to_tab, domain, container } => {
                        let _ = self.event_tx.send(EngineEvent::Transplanted { from, to_tab, domain, container });
                    }
                }
            }
            TabEvent::Updated { .. } => {}
            TabEvent::Removed { tab } => {
                self.assignments.remove(tab).await?;
            }
        }
        Ok(())
    }

    /// Swaps the domain of `url` to the container of `tab`. Returns `None`
    /// for non-web URLs.
    pub async fn swap_for_tab(&self, tab: TabId, url: &str) -> Result<Option<SwapOutcome>, EngineError> {
        let Some(domain) = web_host(url, &self.config.web_schemes) else {
            return Ok(None);
        };
        let container = self.assignments.get(tab).await?;
        self.swap(&domain, &container).await.map(Some)
    }

    async fn swap(&self, domain: &str, container: &ContainerId) -> Result<SwapOutcome, EngineError> {
        let outcome = self.swap.swap_domain(domain, container).await?;
        if let SwapOutcome::Swapped(report) = &outcome {
            let _ = self.event_tx.send(EngineEvent::Swapped(report.clone()));
        }
        Ok(outcome)
    }

    /// Runs a UI command and sends its result to the command's reply channel.
    pub async fn execute(&self, cmd: EngineCommand) {
        let name = cmd.name();
        let sent = match cmd {
            EngineCommand::OpenContainerTab { container, url, reply } => {
                reply.send(self.open_container_tab(&container, url.as_deref()).await).is_ok()
            }
            EngineCommand::ReopenInContainer { container, reply } => {
                reply.send(self.reopen_in_container(&container).await).is_ok()
            }
            EngineCommand::SortTabs { reply } => reply.send(self.sort_tabs().await).is_ok(),
            EngineCommand::AlwaysOpenIn { container, reply } => {
                reply.send(self.always_open_in(&container).await).is_ok()
            }
            EngineCommand::SetSitePolicy { domain, container, reply } => {
                reply.send(self.set_site_policy(&domain, &container).await).is_ok()
            }
            EngineCommand::RemoveSitePolicy { domain, reply } => {
                let res = self.policies.remove(&domain.to_ascii_lowercase()).await.map_err(EngineError::from);
                reply.send(res).is_ok()
            }
            EngineCommand::ListSitePolicies { reply } => {
                reply.send(self.policies.list().await.map_err(EngineError::from)).is_ok()
            }
            EngineCommand::CreateContainer { container, reply } => {
                reply.send(self.create_container(container).await).is_ok()
            }
            EngineCommand::UpdateContainer { id, name, color, icon, reply } => {
                reply.send(self.update_container(&id, name, color, icon).await).is_ok()
            }
            EngineCommand::DeleteContainer { id, reply } => reply.send(self.delete_container(&id).await).is_ok(),
            EngineCommand::ListContainers { reply } => reply.send(self.registry.list().await).is_ok(),
        };
        if !sent {
            log::warn!("{name}: requester went away before the reply");
        }
    }

    /// Opens a tab in `container`. The tab is created inactive, assigned and
    /// grouped first; its activation then triggers the cookie swap.
    pub async fn open_container_tab(&self, container: &ContainerId, url: Option<&str>) -> Result<TabId, EngineError> {
        self.ensure_container(container).await?;
        let url = url.unwrap_or(&self.config.new_tab_url);

        let tab = self.tabs.create(url, false).await?;
        self.assignments.assign(tab, container).await?;
        group_tab(self.tabs.as_ref(), &self.registry, tab, container).await;
        self.tabs.activate(tab).await?;

        log::info!("opened tab {tab} in container {container}");
        Ok(tab)
    }

    /// Reopens the active tab's page in `container` and closes the original.
    pub async fn reopen_in_container(&self, container: &ContainerId) -> Result<TabId, EngineError> {
        let active = self.active_tab().await?;
        let url = active.url.filter(|u| web_host(u, &self.config.web_schemes).is_some());
        let Some(url) = url else {
            return Err(EngineError::NotAWebPage(active.id));
        };

        let tab = self.open_container_tab(container, Some(&url)).await?;
        self.tabs.remove(active.id).await?;
        self.assignments.remove(active.id).await?;
        Ok(tab)
    }

    /// Records a site policy for the active tab's hostname.
    pub async fn always_open_in(&self, container: &ContainerId) -> Result<String, EngineError> {
        let active = self.active_tab().await?;
        let domain = active
            .url
            .as_deref()
            .and_then(|u| web_host(u, &self.config.web_schemes))
            .ok_or(EngineError::NotAWebPage(active.id))?;
        self.set_site_policy(&domain, container).await?;
        Ok(domain)
    }

    pub async fn set_site_policy(&self, domain: &str, container: &ContainerId) -> Result<(), EngineError> {
        self.ensure_container(container).await?;
        let domain = domain.to_ascii_lowercase();
        self.policies.set(&domain, container).await?;
        log::info!("{domain} always opens in {container}");
        Ok(())
    }

    /// Stable-sorts the current window's tabs by container id and moves
    /// every tab to its new position.
    pub async fn sort_tabs(&self) -> Result<(), EngineError> {
        let mut keyed = Vec::new();
        for tab in self.tabs.query(&TabQuery::current_window()).await? {
            keyed.push((self.assignments.get(tab.id).await?, tab.index, tab.id));
        }
        keyed.sort_by(|a, b| a.0.cmp(&b.0).then(a.1.cmp(&b.1)));

        for (index, (_, _, tab)) in keyed.into_iter().enumerate() {
            self.tabs.move_to(tab, index).await?;
        }
        Ok(())
    }

    pub async fn create_container(&self, container: Container) -> Result<ContainerId, EngineError> {
        let id = self.registry.create(container).await?;
        let _ = self.event_tx.send(EngineEvent::ContainerCreated { id: id.clone() });
        Ok(id)
    }

    pub async fn update_container(
        &self,
        id: &ContainerId,
        name: Option<String>,
        color: Option<ContainerColor>,
        icon: Option<String>,
    ) -> Result<Container, EngineError> {
        let updated = self.registry.update(id, name, color, icon).await?;
        let _ = self.event_tx.send(EngineEvent::ContainerUpdated { id: id.clone() });
        Ok(updated)
    }

    /// Deletes a container with its site policies and saved jars.
    ///
    /// Domains it currently owns are handed back to the default container
    /// first, so its live cookies disappear with it. The container record
    /// goes last: a delete that fails halfway can simply be retried.
    pub async fn delete_container(&self, id: &ContainerId) -> Result<(), EngineError> {
        if id.is_default() {
            return Err(EngineError::DefaultContainerImmutable);
        }
        if self.registry.get(id).await?.is_none() {
            return Err(EngineError::ContainerNotFound(id.clone()));
        }
        let default = ContainerId::default_container();
        for domain in self.swap.ledger().domains_owned_by(id).await? {
            self.swap(&domain, &default).await?;
        }
        let policies = self.policies.remove_container(id).await?;
        let jars = self.swap.jars().remove_container(id).await?;
        self.registry.remove(id).await?;
        log::info!("deleted container {id} ({} site policies, {jars} cookie jars)", policies.len());
        let _ = self.event_tx.send(EngineEvent::ContainerRemoved { id: id.clone() });
        Ok(())
    }

    async fn ensure_container(&self, id: &ContainerId) -> Result<(), EngineError> {
        if id.is_default() || self.registry.get(id).await?.is_some() {
            Ok(())
        } else {
            Err(EngineError::ContainerNotFound(id.clone()))
        }
    }

    async fn active_tab(&self) -> Result<TabInfo, EngineError> {
        self.tabs
            .query(&TabQuery::active_in_current_window())
            .await?
            .into_iter()
            .next()
            .ok_or(EngineError::NoActiveTab)
    }
}
