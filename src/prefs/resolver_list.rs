use crate::common::error::{Result, ToggleError};

/// 持久化分隔符
pub const SEPARATOR: char = ',';

/// 从未配置过列表时使用的解析服务器
pub const DEFAULT_RESOLVER: &str = "dns.google";

/// 用户维护的有序解析服务器列表
///
/// 持久化为逗号连接的单个字符串。从未配置时为单个空字符串占位，
/// 与 `"".split(',')` 的结果一致。允许重复，顺序有意义。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverList {
    entries: Vec<String>,
}

impl ResolverList {
    pub fn new(entries: Vec<String>) -> Self {
        if entries.is_empty() {
            return Self::default();
        }
        Self { entries }
    }

    pub fn from_persisted(raw: &str) -> Self {
        Self {
            entries: raw.split(SEPARATOR).map(str::to_string).collect(),
        }
    }

    pub fn to_persisted(&self) -> String {
        self.entries.join(",")
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// 首项为空字符串：从未配置
    pub fn is_unconfigured(&self) -> bool {
        self.entries.first().map_or(true, |first| first.is_empty())
    }

    /// 内存中把占位项替换为默认服务器，不回写存储
    pub fn normalized(&self) -> Self {
        let mut entries = self.entries.clone();
        match entries.first_mut() {
            Some(first) if first.is_empty() => *first = DEFAULT_RESOLVER.to_string(),
            Some(_) => {}
            None => entries.push(DEFAULT_RESOLVER.to_string()),
        }
        Self { entries }
    }

    /// 追加一个服务器；未配置时替换占位项
    pub fn add(&mut self, hostname: &str) -> Result<()> {
        let hostname = hostname.trim();
        if hostname.is_empty() {
            return Err(ToggleError::InvalidEntry("empty hostname".to_string()));
        }
        if hostname.contains(SEPARATOR) {
            return Err(ToggleError::InvalidEntry(format!(
                "'{hostname}' contains the list separator"
            )));
        }
        if self.entries.len() == 1 && self.is_unconfigured() {
            self.entries[0] = hostname.to_string();
        } else {
            self.entries.push(hostname.to_string());
        }
        Ok(())
    }

    /// 删除指定位置；删空后恢复占位项
    pub fn remove(&mut self, position: usize) -> Result<String> {
        self.check_position(position)?;
        let removed = self.entries.remove(position);
        if self.entries.is_empty() {
            self.entries.push(String::new());
        }
        Ok(removed)
    }

    pub fn move_entry(&mut self, from: usize, to: usize) -> Result<()> {
        self.check_position(from)?;
        self.check_position(to)?;
        let entry = self.entries.remove(from);
        self.entries.insert(to, entry);
        Ok(())
    }

    fn check_position(&self, position: usize) -> Result<()> {
        if position >= self.entries.len() {
            return Err(ToggleError::OutOfRange {
                position,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}

impl Default for ResolverList {
    fn default() -> Self {
        Self {
            entries: vec![String::new()],
        }
    }
}

impl<S: Into<String>> FromIterator<S> for ResolverList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self::new(iter.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list(items: &[&str]) -> ResolverList {
        items.iter().copied().collect()
    }

    #[test]
    fn empty_string_is_placeholder() {
        let l = ResolverList::from_persisted("");
        assert_eq!(l, ResolverList::default());
        assert!(l.is_unconfigured());
        assert_eq!(l.to_persisted(), "");
    }

    #[test]
    fn persisted_keeps_order_and_duplicates() {
        let l = ResolverList::from_persisted("b.example,a.example,b.example");
        assert_eq!(l.entries(), &["b.example", "a.example", "b.example"]);
        assert_eq!(l.to_persisted(), "b.example,a.example,b.example");
    }

    #[test]
    fn normalized_replaces_placeholder_in_place() {
        assert_eq!(ResolverList::default().normalized(), list(&[DEFAULT_RESOLVER]));
        let l = ResolverList::from_persisted(",x.example");
        assert_eq!(l.normalized(), list(&[DEFAULT_RESOLVER, "x.example"]));
    }

    #[test]
    fn normalized_leaves_configured_list() {
        let l = list(&["a", "b"]);
        assert_eq!(l.normalized(), l);
    }

    #[test]
    fn add_replaces_placeholder() {
        let mut l = ResolverList::default();
        l.add("  dns.quad9.net ").unwrap();
        assert_eq!(l.entries(), &["dns.quad9.net"]);
        l.add("dns.quad9.net").unwrap();
        assert_eq!(l.len(), 2);
    }

    #[test]
    fn add_rejects_separator_and_empty() {
        let mut l = ResolverList::default();
        assert!(l.add("a,b").unwrap_err().is_user_error());
        assert!(l.add("   ").is_err());
        assert!(l.is_unconfigured());
    }

    #[test]
    fn remove_last_restores_placeholder() {
        let mut l = list(&["a"]);
        assert_eq!(l.remove(0).unwrap(), "a");
        assert!(l.is_unconfigured());
        assert!(l.remove(3).is_err());
    }

    #[test]
    fn move_entry_reorders() {
        let mut l = list(&["a", "b", "c"]);
        l.move_entry(2, 0).unwrap();
        assert_eq!(l.entries(), &["c", "a", "b"]);
        assert!(l.move_entry(0, 3).is_err());
    }

    #[test]
    fn new_with_no_entries_is_placeholder() {
        assert!(ResolverList::new(Vec::new()).is_unconfigured());
    }
}
