//! # Tabs Store
//!
//! Ordered collection of open applications plus a single active pointer.
//!
//! Invariant, re-checked after every mutation: the active id is either
//! `None` (home view) or the id of a tab in the collection.
//!
//! Observers (tab strip, footer) only ever get `&TabsStore`; every mutating
//! method takes `&mut self` and is called from the reducer.

use std::fmt;

use log::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub id: String,
    pub title: String,
}

impl Tab {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TabsError {
    UnknownTab(String),
}

impl fmt::Display for TabsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabsError::UnknownTab(id) => write!(f, "no open tab with id '{id}'"),
        }
    }
}

impl std::error::Error for TabsError {}

#[derive(Debug, Default)]
pub struct TabsStore {
    tabs: Vec<Tab>,
    active: Option<String>,
}

impl TabsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open or refresh a tab and make it active. Never duplicates an id.
    pub fn open(&mut self, tab: Tab) {
        let id = tab.id.clone();
        self.insert(tab);
        self.active = Some(id);
        self.enforce_invariant();
    }

    /// Open or refresh a tab without touching the active pointer.
    pub fn insert(&mut self, tab: Tab) {
        match self.tabs.iter_mut().find(|t| t.id == tab.id) {
            Some(existing) => {
                debug!("Refreshing tab '{}'", tab.id);
                existing.title = tab.title;
            }
            None => {
                debug!("Opening tab '{}'", tab.id);
                self.tabs.push(tab);
            }
        }
        self.enforce_invariant();
    }

    /// Remove a tab. If it was active, the previous neighbour takes over
    /// (or the next one when closing the first tab).
    pub fn close(&mut self, id: &str) -> Option<Tab> {
        let pos = self.tabs.iter().position(|t| t.id == id)?;
        let removed = self.tabs.remove(pos);

        if self.active.as_deref() == Some(id) {
            self.active = if self.tabs.is_empty() {
                None
            } else {
                Some(self.tabs[pos.saturating_sub(1)].id.clone())
            };
        }
        self.enforce_invariant();
        Some(removed)
    }

    /// Activate an existing tab. Unknown ids change nothing.
    pub fn set_active(&mut self, id: &str) -> Result<(), TabsError> {
        if !self.contains(id) {
            return Err(TabsError::UnknownTab(id.to_string()));
        }
        self.active = Some(id.to_string());
        self.enforce_invariant();
        Ok(())
    }

    /// Back to the home view; tabs stay open.
    pub fn clear_active(&mut self) {
        self.active = None;
        self.enforce_invariant();
    }

    pub fn activate_next(&mut self) {
        self.step(1);
    }

    pub fn activate_previous(&mut self) {
        self.step(-1);
    }

    fn step(&mut self, delta: isize) {
        if self.tabs.is_empty() {
            return;
        }
        let len = self.tabs.len() as isize;
        let next = match self.active_index() {
            Some(i) => (i as isize + delta).rem_euclid(len),
            None if delta >= 0 => 0,
            None => len - 1,
        };
        self.active = Some(self.tabs[next as usize].id.clone());
        self.enforce_invariant();
    }

    /// Drop every tab (session teardown).
    pub fn clear(&mut self) {
        self.tabs.clear();
        self.active = None;
        self.enforce_invariant();
    }

    pub fn list(&self) -> &[Tab] {
        &self.tabs
    }

    pub fn get(&self, id: &str) -> Option<&Tab> {
        self.tabs.iter().find(|t| t.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active_tab(&self) -> Option<&Tab> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    pub fn active_index(&self) -> Option<usize> {
        let id = self.active.as_deref()?;
        self.tabs.iter().position(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tabs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tabs.is_empty()
    }

    fn enforce_invariant(&mut self) {
        let dangling = self
            .active
            .as_deref()
            .is_some_and(|id| !self.tabs.iter().any(|t| t.id == id));
        debug_assert!(!dangling, "active tab {:?} is not in the collection", self.active);
        if dangling {
            warn!("Active tab {:?} was dangling; resetting to home", self.active);
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(ids: &[&str]) -> TabsStore {
        let mut store = TabsStore::new();
        for id in ids {
            store.open(Tab::new(*id, id.to_uppercase()));
        }
        store
    }

    fn ids(store: &TabsStore) -> Vec<&str> {
        store.list().iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_open_twice_keeps_one_tab_with_latest_title() {
        let mut store = TabsStore::new();
        store.open(Tab::new("reports", "Reports"));
        store.open(Tab::new("status", "Status"));
        store.open(Tab::new("reports", "Quarterly Reports"));

        assert_eq!(ids(&store), vec!["reports", "status"]);
        assert_eq!(store.get("reports").unwrap().title, "Quarterly Reports");
        assert_eq!(store.active_id(), Some("reports"));
    }

    #[test]
    fn test_insert_keeps_active_pointer() {
        let mut store = store_with(&["a"]);
        store.clear_active();
        store.insert(Tab::new("b", "B"));
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.active_id(), None);

        store.set_active("a").unwrap();
        store.insert(Tab::new("b", "Bee"));
        assert_eq!(store.get("b").unwrap().title, "Bee");
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn test_close_active_in_two_tab_collection() {
        let mut store = store_with(&["a", "b"]);
        assert_eq!(store.active_id(), Some("b"));

        let removed = store.close("b").unwrap();
        assert_eq!(removed.id, "b");
        assert_eq!(ids(&store), vec!["a"]);
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn test_close_active_prefers_previous_neighbour() {
        let mut store = store_with(&["a", "b", "c"]);
        store.set_active("b").unwrap();
        store.close("b");
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn test_close_first_active_moves_to_next() {
        let mut store = store_with(&["a", "b", "c"]);
        store.set_active("a").unwrap();
        store.close("a");
        assert_eq!(store.active_id(), Some("b"));
    }

    #[test]
    fn test_close_inactive_keeps_active() {
        let mut store = store_with(&["a", "b", "c"]);
        store.close("a");
        assert_eq!(store.active_id(), Some("c"));
    }

    #[test]
    fn test_close_last_tab_goes_home() {
        let mut store = store_with(&["a"]);
        store.close("a");
        assert!(store.is_empty());
        assert_eq!(store.active_id(), None);
    }

    #[test]
    fn test_close_unknown_is_noop() {
        let mut store = store_with(&["a", "b"]);
        assert!(store.close("zzz").is_none());
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.active_id(), Some("b"));
    }

    #[test]
    fn test_set_active_unknown_leaves_state_unchanged() {
        let mut store = store_with(&["a", "b"]);
        let err = store.set_active("nope").unwrap_err();
        assert_eq!(err, TabsError::UnknownTab("nope".to_string()));
        assert_eq!(ids(&store), vec!["a", "b"]);
        assert_eq!(store.active_id(), Some("b"));
    }

    #[test]
    fn test_step_wraps_around() {
        let mut store = store_with(&["a", "b", "c"]);
        store.activate_next();
        assert_eq!(store.active_id(), Some("a"));
        store.activate_previous();
        assert_eq!(store.active_id(), Some("c"));
    }

    #[test]
    fn test_step_from_home() {
        let mut store = store_with(&["a", "b"]);
        store.clear_active();
        store.activate_previous();
        assert_eq!(store.active_id(), Some("b"));
        store.clear_active();
        store.activate_next();
        assert_eq!(store.active_id(), Some("a"));
    }

    #[test]
    fn test_clear_empties_everything() {
        let mut store = store_with(&["a", "b"]);
        store.clear();
        assert!(store.list().is_empty());
        assert!(store.active_tab().is_none());
    }

    #[test]
    fn test_active_always_references_existing_tab() {
        let mut store = TabsStore::new();
        let script: &[(&str, &str)] = &[
            ("open", "a"),
            ("open", "b"),
            ("close", "a"),
            ("activate", "a"),
            ("open", "c"),
            ("close", "c"),
            ("close", "b"),
            ("activate", "b"),
            ("insert", "d"),
            ("home", ""),
            ("activate", "d"),
            ("clear", ""),
        ];
        for (op, id) in script {
            match *op {
                "open" => store.open(Tab::new(*id, *id)),
                "insert" => store.insert(Tab::new(*id, *id)),
                "home" => store.clear_active(),
                "clear" => store.clear(),
                "close" => {
                    store.close(id);
                }
                _ => {
                    let _ = store.set_active(id);
                }
            }
            if let Some(active) = store.active_id() {
                assert!(store.contains(active));
            }
        }
        assert_eq!(store.active_id(), None);
    }
}
