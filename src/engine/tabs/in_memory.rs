use std::collections::HashMap;
use std::sync::Mutex;
use async_trait::async_trait;
use crate::engine::errors::TabError;
use crate::engine::tabs::{GroupColor, GroupId, TabControl, TabId, TabInfo, TabQuery};

/// A tab operation received by [`InMemoryTabs`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabCall {
    Create { url: String, active: bool },
    Activate(TabId),
    Remove(TabId),
    Move { tab: TabId, index: usize },
    Group(Vec<TabId>),
    StyleGroup { group: GroupId, color: GroupColor, title: String },
}

#[derive(Debug)]
struct State {
    /// Tabs of the single window, in index order.
    tabs: Vec<(TabId, Option<String>)>,
    active: Option<TabId>,
    groups: HashMap<GroupId, (GroupColor, String)>,
    next_tab: i32,
    next_group: i32,
    calls: Vec<TabCall>,
    fail_grouping: bool,
}

/// Single-window, in-memory tab host.
///
/// Does not emit tab events on its own; the embedder (or a test) forwards
/// them to the engine. Every call is recorded and can be inspected with
/// [`InMemoryTabs::calls`].
#[derive(Debug)]
pub struct InMemoryTabs {
    state: Mutex<State>,
}

impl Default for InMemoryTabs {
    fn default() -> Self {
        Self {
            state: Mutex::new(State {
                tabs: Vec::new(),
                active: None,
                groups: HashMap::new(),
                next_tab: 1,
                next_group: 1,
                calls: Vec::new(),
                fail_grouping: false,
            }),
        }
    }
}

impl InMemoryTabs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a tab the way a user would, without recording a call.
    pub fn open(&self, url: &str, active: bool) -> TabId {
        let mut state = self.state.lock().unwrap();
        insert_tab(&mut state, url, active)
    }

    /// Changes the URL of a tab, like an in-page navigation.
    pub fn navigate(&self, tab: TabId, url: &str) {
        let mut state = self.state.lock().unwrap();
        if let Some(entry) = state.tabs.iter_mut().find(|(id, _)| *id == tab) {
            entry.1 = Some(url.to_string());
        }
    }

    /// Makes `group`/`style_group` fail from now on.
    pub fn fail_grouping(&self, fail: bool) {
        self.state.lock().unwrap().fail_grouping = fail;
    }

    pub fn calls(&self) -> Vec<TabCall> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn tab_ids(&self) -> Vec<TabId> {
        self.state.lock().unwrap().tabs.iter().map(|(id, _)| *id).collect()
    }

    pub fn active_tab(&self) -> Option<TabId> {
        self.state.lock().unwrap().active
    }

    pub fn group_style(&self, group: GroupId) -> Option<(GroupColor, String)> {
        self.state.lock().unwrap().groups.get(&group).cloned()
    }
}

fn insert_tab(state: &mut State, url: &str, active: bool) -> TabId {
    let id = TabId(state.next_tab);
    state.next_tab += 1;
    state.tabs.push((id, Some(url.to_string())));
    if active {
        state.active = Some(id);
    }
    id
}

fn info(state: &State, index: usize) -> TabInfo {
    let (id, url) = &state.tabs[index];
    TabInfo { id: *id, url: url.clone(), active: state.active == Some(*id), index }
}

fn position(state: &State, tab: TabId) -> Result<usize, TabError> {
    state.tabs.iter().position(|(id, _)| *id == tab).ok_or(TabError::NotFound(tab))
}

#[async_trait]
impl TabControl for InMemoryTabs {
    async fn get(&self, tab: TabId) -> Result<TabInfo, TabError> {
        let state = self.state.lock().unwrap();
        let index = position(&state, tab)?;
        Ok(info(&state, index))
    }

    async fn create(&self, url: &str, active: bool) -> Result<TabId, TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::Create { url: url.to_string(), active });
        Ok(insert_tab(&mut state, url, active))
    }

    async fn activate(&self, tab: TabId) -> Result<(), TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::Activate(tab));
        position(&state, tab)?;
        state.active = Some(tab);
        Ok(())
    }

    async fn remove(&self, tab: TabId) -> Result<(), TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::Remove(tab));
        let index = position(&state, tab)?;
        state.tabs.remove(index);
        if state.active == Some(tab) {
            state.active = None;
        }
        Ok(())
    }

    async fn query(&self, query: &TabQuery) -> Result<Vec<TabInfo>, TabError> {
        let state = self.state.lock().unwrap();
        Ok((0..state.tabs.len())
            .map(|i| info(&state, i))
            .filter(|t| query.active.map_or(true, |a| t.active == a))
            .collect())
    }

    async fn move_to(&self, tab: TabId, index: usize) -> Result<(), TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::Move { tab, index });
        let from = position(&state, tab)?;
        let entry = state.tabs.remove(from);
        let index = index.min(state.tabs.len());
        state.tabs.insert(index, entry);
        Ok(())
    }

    async fn group(&self, tabs: &[TabId]) -> Result<GroupId, TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::Group(tabs.to_vec()));
        if state.fail_grouping {
            return Err(TabError::Host(anyhow::anyhow!("tab groups unavailable")));
        }
        let id = GroupId(state.next_group);
        state.next_group += 1;
        state.groups.insert(id, (GroupColor::Grey, String::new()));
        Ok(id)
    }

    async fn style_group(&self, group: GroupId, color: GroupColor, title: &str) -> Result<(), TabError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(TabCall::StyleGroup { group, color, title: title.to_string() });
        if state.fail_grouping {
            return Err(TabError::Host(anyhow::anyhow!("tab groups unavailable")));
        }
        state.groups.insert(group, (color, title.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_activate_remove() {
        let tabs = InMemoryTabs::new();
        let a = tabs.open("https://a.com/", true);
        let b = tabs.create("https://b.com/", false).await.unwrap();

        assert_eq!(tabs.active_tab(), Some(a));
        tabs.activate(b).await.unwrap();
        assert!(tabs.get(b).await.unwrap().active);

        tabs.remove(b).await.unwrap();
        assert_eq!(tabs.tab_ids(), vec![a]);
        assert!(matches!(tabs.get(b).await, Err(TabError::NotFound(_))));
        assert_eq!(
            tabs.calls(),
            vec![
                TabCall::Create { url: "https://b.com/".into(), active: false },
                TabCall::Activate(b),
                TabCall::Remove(b),
            ]
        );
    }

    #[tokio::test]
    async fn query_and_move() {
        let tabs = InMemoryTabs::new();
        let a = tabs.open("https://a.com/", false);
        let b = tabs.open("https://b.com/", true);
        let c = tabs.open("https://c.com/", false);

        let active = tabs.query(&TabQuery::active_in_current_window()).await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, b);

        tabs.move_to(c, 0).await.unwrap();
        assert_eq!(tabs.tab_ids(), vec![c, a, b]);
        let all = tabs.query(&TabQuery::current_window()).await.unwrap();
        assert_eq!(all.iter().map(|t| t.index).collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn grouping_can_fail() {
        let tabs = InMemoryTabs::new();
        let a = tabs.open("https://a.com/", true);
        let g = tabs.group(&[a]).await.unwrap();
        tabs.style_group(g, GroupColor::Blue, "Work").await.unwrap();
        assert_eq!(tabs.group_style(g), Some((GroupColor::Blue, "Work".into())));

        tabs.fail_grouping(true);
        assert!(tabs.group(&[a]).await.is_err());
    }
}
