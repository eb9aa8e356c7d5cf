use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::fields::DEFAULT_INDEX_LIST;

/// Curated names the panel is restricted to
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchList {
    index_list: Vec<String>,
    stock_list: Vec<String>,
}

impl Default for WatchList {
    fn default() -> Self {
        Self::new(DEFAULT_INDEX_LIST, Vec::<String>::new())
    }
}

impl WatchList {
    /// Build a watch-list, dropping blank and duplicate names while keeping first-seen order
    pub fn new<I, S, J, T>(index_list: I, stock_list: J) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        J: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self {
            index_list: dedup(index_list),
            stock_list: dedup(stock_list),
        }
    }

    pub fn index_list(&self) -> &[String] {
        &self.index_list
    }

    pub fn stock_list(&self) -> &[String] {
        &self.stock_list
    }

    /// Exact-match membership, no substring or fuzzy matching
    pub fn contains_index(&self, name: &str) -> bool {
        self.index_list.iter().any(|n| n == name)
    }

    pub fn contains_stock(&self, name: &str) -> bool {
        self.stock_list.iter().any(|n| n == name)
    }
}

fn dedup<I, S>(names: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut seen = HashSet::new();
    let mut result = Vec::new();

    for name in names {
        let name: String = name.into();
        let name = name.trim();
        if !name.is_empty() && seen.insert(name.to_string()) {
            result.push(name.to_string());
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::WatchList;

    #[test]
    fn dedups_and_trims() {
        let list = WatchList::new(["上证指数", " 上证指数 ", ""], ["贵州茅台", "五粮液", "贵州茅台"]);
        assert_eq!(list.index_list(), ["上证指数"]);
        assert_eq!(list.stock_list(), ["贵州茅台", "五粮液"]);
    }

    #[test]
    fn membership_is_exact() {
        let list = WatchList::new(["上证指数"], ["贵州茅台"]);
        assert!(list.contains_stock("贵州茅台"));
        assert!(!list.contains_stock("贵州"));
        assert!(!list.contains_index("上证指数 "));
    }

    #[test]
    fn default_has_three_indexes() {
        assert_eq!(WatchList::default().index_list().len(), 3);
        assert!(WatchList::default().stock_list().is_empty());
    }
}
