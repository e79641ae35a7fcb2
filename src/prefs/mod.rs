//! 偏好存储：解析服务器列表与自动模式开关

pub mod resolver_list;
pub mod store;

use std::sync::Arc;

use tracing::info;

use crate::common::error::Result;

pub use resolver_list::{ResolverList, DEFAULT_RESOLVER};
pub use store::{JsonFileStore, KeyValueStore, MemoryStore};

const KEY_DNS_SERVERS: &str = "dns_servers";
const KEY_AUTO_MODE: &str = "auto_enabled";

/// 偏好访问入口，持有底层键值存储
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStore::new()))
    }

    pub fn resolver_list(&self) -> Result<ResolverList> {
        let raw = self.store.get_string(KEY_DNS_SERVERS)?.unwrap_or_default();
        Ok(ResolverList::from_persisted(&raw))
    }

    pub fn set_resolver_list(&self, list: &ResolverList) -> Result<()> {
        self.store.put_string(KEY_DNS_SERVERS, &list.to_persisted())?;
        info!(count = list.len(), "resolver list updated");
        Ok(())
    }

    pub fn auto_mode(&self) -> Result<bool> {
        Ok(self.store.get_bool(KEY_AUTO_MODE)?.unwrap_or(false))
    }

    pub fn set_auto_mode(&self, enabled: bool) -> Result<()> {
        self.store.put_bool(KEY_AUTO_MODE, enabled)?;
        info!(enabled, "auto mode preference changed");
        Ok(())
    }

    pub fn add_resolver(&self, hostname: &str) -> Result<ResolverList> {
        self.edit(|list| list.add(hostname))
    }

    pub fn remove_resolver(&self, position: usize) -> Result<ResolverList> {
        self.edit(|list| list.remove(position).map(|_| ()))
    }

    pub fn move_resolver(&self, from: usize, to: usize) -> Result<ResolverList> {
        self.edit(|list| list.move_entry(from, to))
    }

    fn edit(&self, f: impl FnOnce(&mut ResolverList) -> Result<()>) -> Result<ResolverList> {
        let mut list = self.resolver_list()?;
        f(&mut list)?;
        self.set_resolver_list(&list)?;
        Ok(list)
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_never_set() {
        let p = Preferences::in_memory();
        assert_eq!(p.resolver_list().unwrap(), ResolverList::default());
        assert!(!p.auto_mode().unwrap());
    }

    #[test]
    fn list_round_trip() {
        let p = Preferences::in_memory();
        let list: ResolverList = ["dns.google", "one.one.one.one", "dns.google"]
            .into_iter()
            .collect();
        p.set_resolver_list(&list).unwrap();
        assert_eq!(p.resolver_list().unwrap(), list);
    }

    #[test]
    fn auto_mode_round_trip() {
        let p = Preferences::in_memory();
        p.set_auto_mode(true).unwrap();
        assert!(p.auto_mode().unwrap());
        p.set_auto_mode(false).unwrap();
        assert!(!p.auto_mode().unwrap());
    }

    #[test]
    fn edits_are_persisted() {
        let p = Preferences::in_memory();
        p.add_resolver("a.example").unwrap();
        p.add_resolver("b.example").unwrap();
        p.move_resolver(1, 0).unwrap();
        assert_eq!(p.resolver_list().unwrap().entries(), &["b.example", "a.example"]);
        p.remove_resolver(0).unwrap();
        assert_eq!(p.resolver_list().unwrap().entries(), &["a.example"]);
    }

    #[test]
    fn failed_edit_leaves_list_untouched() {
        let p = Preferences::in_memory();
        p.add_resolver("a.example").unwrap();
        assert!(p.remove_resolver(4).is_err());
        assert_eq!(p.resolver_list().unwrap().entries(), &["a.example"]);
    }
}
