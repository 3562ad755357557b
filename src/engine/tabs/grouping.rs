use crate::engine::container::{ContainerId, ContainerRegistry};
use crate::engine::tabs::{TabControl, TabId};

/// Puts `tab` into a tab group styled after `container`.
///
/// Grouping is cosmetic: the default container and unknown containers are
/// never grouped, and any failure is logged and swallowed. Returns true when
/// the tab ended up in a styled group.
pub async fn group_tab(
    tabs: &dyn TabControl,
    registry: &ContainerRegistry,
    tab: TabId,
    container: &ContainerId,
) -> bool {
    if container.is_default() {
        return false;
    }

    let found = match registry.get(container).await {
        Ok(Some(found)) => found,
        Ok(None) => return false,
        Err(e) => {
            log::warn!("grouping tab {tab}: cannot read container {container}: {e}");
            return false;
        }
    };

    let group = match tabs.group(&[tab]).await {
        Ok(group) => group,
        Err(e) => {
            log::warn!("grouping tab {tab} failed: {e}");
            return false;
        }
    };

    if let Err(e) = tabs.style_group(group, found.color.group_color(), &found.name).await {
        log::warn!("styling group of tab {tab} failed: {e}");
        return false;
    }
    true
}
