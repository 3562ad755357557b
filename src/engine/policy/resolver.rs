use crate::engine::container::{ContainerId, ContainerRegistry};
use crate::engine::domain::web_host;
use crate::engine::errors::EngineError;
use crate::engine::policy::SitePolicyTable;
use crate::engine::tabs::{group_tab, TabAssignments, TabControlHandle, TabId};

/// What the resolver decided for a loading tab.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Not a web page; neither policies nor swapping apply.
    Ignored,
    /// The tab keeps its container. The caller should swap `domain` to it.
    Stay { domain: String, container: ContainerId },
    /// The tab was replaced by `to_tab` in `container`. The original tab is
    /// gone and must not be swapped for.
    Transplanted { from: TabId, to_tab: TabId, domain: String, container: ContainerId },
}

/// Enforces site policies on tabs that start loading a URL.
#[derive(Clone)]
pub struct NavigationPolicyResolver {
    policies: SitePolicyTable,
    assignments: TabAssignments,
    registry: ContainerRegistry,
    tabs: TabControlHandle,
    web_schemes: Vec<String>,
}

impl std::fmt::Debug for NavigationPolicyResolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationPolicyResolver")
            .field("policies", &self.policies)
            .field("tabs", &"Arc<dyn TabControl>")
            .field("web_schemes", &self.web_schemes)
            .finish()
    }
}

impl NavigationPolicyResolver {
    pub fn new(
        policies: SitePolicyTable,
        assignments: TabAssignments,
        registry: ContainerRegistry,
        tabs: TabControlHandle,
        web_schemes: Vec<String>,
    ) -> Self {
        Self { policies, assignments, registry, tabs, web_schemes }
    }

    /// Resolves `tab` loading `url`.
    ///
    /// When the URL's host has a policy for another container than the tab's,
    /// a new active tab is opened at the same URL, assigned and grouped, and
    /// the original tab is closed. Policies that point at a container which no
    /// longer exists are ignored.
    pub async fn resolve(&self, tab: TabId, url: &str) -> Result<Resolution, EngineError> {
        let Some(domain) = web_host(url, &self.web_schemes) else {
            log::debug!("tab {tab}: ignoring non-web URL {url}");
            return Ok(Resolution::Ignored);
        };

        let current = self.assignments.get(tab).await?;
        let target = match self.policies.get(&domain).await? {
            Some(target) if target != current => target,
            _ => return Ok(Resolution::Stay { domain, container: current }),
        };

        if !target.is_default() && self.registry.get(&target).await?.is_none() {
            log::warn!("site policy for {domain} points at unknown container {target}");
            return Ok(Resolution::Stay { domain, container: current });
        }

        let new_tab = self.tabs.create(url, true).await?;
        self.assignments.assign(new_tab, &target).await?;
        group_tab(self.tabs.as_ref(), &self.registry, new_tab, &target).await;

        self.tabs.remove(tab).await?;
        self.assignments.remove(tab).await?;

        log::info!("tab {tab} moved to tab {new_tab} in container {target} for {domain}");
        Ok(Resolution::Transplanted { from: tab, to_tab: new_tab, domain, container: target })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::storage::{InMemoryStore, RecordStore};
    use crate::engine::tabs::{InMemoryTabs, TabCall};
    use std::sync::Arc;

    struct Fixture {
        tabs: Arc<InMemoryTabs>,
        policies: SitePolicyTable,
        assignments: TabAssignments,
        resolver: NavigationPolicyResolver,
    }

    async fn fixture() -> Fixture {
        let records = RecordStore::new(Arc::new(InMemoryStore::new()));
        let registry = ContainerRegistry::new(records.clone());
        registry.seed_builtins().await.unwrap();
        let tabs = Arc::new(InMemoryTabs::new());
        let policies = SitePolicyTable::new(records.clone());
        let assignments = TabAssignments::new(records);
        let resolver = NavigationPolicyResolver::new(
            policies.clone(),
            assignments.clone(),
            registry,
            tabs.clone(),
            vec!["http".into(), "https".into()],
        );
        Fixture { tabs, policies, assignments, resolver }
    }

    fn id(s: &str) -> ContainerId {
        ContainerId::parse(s).unwrap()
    }

    #[tokio::test]
    async fn policy_transplants_tab() {
        let f = fixture().await;
        f.policies.set("bank.com", &id("banking")).await.unwrap();
        let tab = f.tabs.open("https://bank.com/login", true);

        let res = f.resolver.resolve(tab, "https://bank.com/login").await.unwrap();
        let Resolution::Transplanted { from, to_tab, container, .. } = res else {
            panic!("expected transplant, got {res:?}");
        };
        assert_eq!(from, tab);
        assert_eq!(container, id("banking"));
        assert_eq!(f.tabs.tab_ids(), vec![to_tab]);
        assert_eq!(f.assignments.get(to_tab).await.unwrap(), id("banking"));
        assert_eq!(
            f.tabs.calls()[0],
            TabCall::Create { url: "https://bank.com/login".into(), active: true }
        );
        assert_eq!(f.tabs.calls().last(), Some(&TabCall::Remove(tab)));
    }

    #[tokio::test]
    async fn matching_policy_stays() {
        let f = fixture().await;
        f.policies.set("bank.com", &id("banking")).await.unwrap();
        let tab = f.tabs.open("https://bank.com/", true);
        f.assignments.assign(tab, &id("banking")).await.unwrap();

        let res = f.resolver.resolve(tab, "https://bank.com/").await.unwrap();
        assert_eq!(res, Resolution::Stay { domain: "bank.com".into(), container: id("banking") });
        assert!(f.tabs.calls().is_empty());
    }

    #[tokio::test]
    async fn no_policy_stays_in_default() {
        let f = fixture().await;
        let tab = f.tabs.open("https://news.org/", true);
        let res = f.resolver.resolve(tab, "https://News.org/a").await.unwrap();
        assert_eq!(res, Resolution::Stay { domain: "news.org".into(), container: ContainerId::default() });
    }

    #[tokio::test]
    async fn internal_pages_are_ignored() {
        let f = fixture().await;
        f.policies.set("newtab", &id("work")).await.unwrap();
        let tab = f.tabs.open("chrome://newtab", true);
        assert_eq!(f.resolver.resolve(tab, "chrome://newtab").await.unwrap(), Resolution::Ignored);
        assert_eq!(f.resolver.resolve(tab, "not a url").await.unwrap(), Resolution::Ignored);
        assert!(f.tabs.calls().is_empty());
    }

    #[tokio::test]
    async fn unknown_policy_target_is_ignored() {
        let f = fixture().await;
        f.policies.set("x.com", &id("ghost")).await.unwrap();
        let tab = f.tabs.open("https://x.com/", true);
        let res = f.resolver.resolve(tab, "https://x.com/").await.unwrap();
        assert_eq!(res, Resolution::Stay { domain: "x.com".into(), container: ContainerId::default() });
    }

    #[tokio::test]
    async fn transplant_survives_grouping_failure() {
        let f = fixture().await;
        f.policies.set("bank.com", &id("banking")).await.unwrap();
        f.tabs.fail_grouping(true);
        let tab = f.tabs.open("https://bank.com/", true);

        let res = f.resolver.resolve(tab, "https://bank.com/").await.unwrap();
        assert!(matches!(res, Resolution::Transplanted { .. }));
        assert_eq!(f.tabs.tab_ids().len(), 1);
    }
}
