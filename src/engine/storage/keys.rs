//! Names of the persisted records.
//!
//! | Record | Key |
//! |---|---|
//! | container | `containers/{id}` |
//! | tab assignment | `tabContainerMap/{tabId}` |
//! | site policy | `siteContainerMap/{domain}` |
//! | domain owner | `domainOwnerMap/{domain}` |
//! | cookie jar | `cookies_{containerId}_{domain}` |
//!
//! These names are part of the on-disk format and must stay stable.

use crate::engine::container::ContainerId;
use crate::engine::tabs::TabId;

pub const CONTAINERS_PREFIX: &str = "containers/";
pub const TAB_CONTAINER_PREFIX: &str = "tabContainerMap/";
pub const SITE_CONTAINER_PREFIX: &str = "siteContainerMap/";
pub const DOMAIN_OWNER_PREFIX: &str = "domainOwnerMap/";
pub const COOKIES_PREFIX: &str = "cookies_";

pub fn container(id: &ContainerId) -> String {
    format!("{CONTAINERS_PREFIX}{id}")
}

pub fn tab_container(tab: TabId) -> String {
    format!("{TAB_CONTAINER_PREFIX}{tab}")
}

pub fn site_container(domain: &str) -> String {
    format!("{SITE_CONTAINER_PREFIX}{domain}")
}

pub fn domain_owner(domain: &str) -> String {
    format!("{DOMAIN_OWNER_PREFIX}{domain}")
}

/// Container ids never contain `_`, so the first `_` after the prefix always
/// ends the id.
pub fn cookie_jar(container: &ContainerId, domain: &str) -> String {
    format!("{COOKIES_PREFIX}{container}_{domain}")
}

pub fn cookie_jars_of(container: &ContainerId) -> String {
    format!("{COOKIES_PREFIX}{container}_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout_is_stable() {
        let work = ContainerId::parse("work").unwrap();
        assert_eq!(container(&work), "containers/work");
        assert_eq!(tab_container(TabId(42)), "tabContainerMap/42");
        assert_eq!(site_container("bank.com"), "siteContainerMap/bank.com");
        assert_eq!(domain_owner("example.com"), "domainOwnerMap/example.com");
        assert_eq!(cookie_jar(&work, "example.com"), "cookies_work_example.com");
    }

    #[test]
    fn jar_prefix_does_not_cover_other_containers() {
        let work = ContainerId::parse("work").unwrap();
        let work2 = ContainerId::parse("work-2").unwrap();
        assert!(!cookie_jar(&work2, "x.com").starts_with(&cookie_jars_of(&work)));
        assert!(cookie_jar(&work, "x.com").starts_with(&cookie_jars_of(&work)));
    }
}
