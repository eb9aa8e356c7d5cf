//! Persistent presentation state updated in place by each refresh.

use std::collections::HashMap;

use bevy_ecs::system::Resource;
use ratatui::widgets::TableState;

use crate::data::{
    fields::{index_key, INDEX_COLUMNS},
    IndexCell, IndexView, StockRow, WatchList,
};

/// Placeholder shown before the first refresh lands
pub const PLACEHOLDER: &str = "--";

/// Index labels laid out as a grid of [`INDEX_COLUMNS`] columns, one row per index
#[derive(Resource, Debug, Clone, Default)]
pub struct IndexPanel {
    labels: HashMap<String, IndexCell>,
    /// Label keys in grid order, row major
    keys: Vec<String>,
}

impl IndexPanel {
    /// Create every label once; later refreshes only look them up
    pub fn new(watchlist: &WatchList) -> Self {
        let mut labels = HashMap::new();
        let mut keys = Vec::new();

        for name in watchlist.index_list() {
            for (column, field) in INDEX_COLUMNS.iter().enumerate() {
                let key = index_key(name, field);
                let text = if column == 0 { name.clone() } else { PLACEHOLDER.to_string() };
                labels.insert(key.clone(), IndexCell::new(text, Default::default()));
                keys.push(key);
            }
        }

        Self { labels, keys }
    }

    /// Copy every cell of `view` onto its label; keys without a label are skipped
    pub fn apply_index(&mut self, view: &IndexView) {
        for (key, cell) in view.iter() {
            match self.labels.get_mut(key) {
                Some(label) => label.clone_from(cell),
                None => tracing::trace!(key, "指数标签不存在"),
            }
        }
    }

    #[cfg(test)]
    pub fn label(&self, key: &str) -> Option<&IndexCell> {
        self.labels.get(key)
    }

    /// Labels grouped into grid rows
    pub fn grid(&self) -> impl Iterator<Item = Vec<&IndexCell>> {
        self.keys
            .chunks(INDEX_COLUMNS.len())
            .map(|row| row.iter().filter_map(|key| self.labels.get(key)).collect())
    }

    pub fn row_count(&self) -> usize {
        self.keys.len() / INDEX_COLUMNS.len()
    }
}

/// Stock rows plus the table cursor
#[derive(Resource, Debug, Clone, Default)]
pub struct StockTable {
    rows: Vec<StockRow>,
    pub state: TableState,
}

impl StockTable {
    /// Replace every row; the selection does not survive a rebuild
    pub fn apply_stock(&mut self, rows: Vec<StockRow>) {
        self.rows = rows;
        self.state.select(None);
    }

    pub fn rows(&self) -> &[StockRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn selected(&self) -> Option<&StockRow> {
        self.rows.get(self.state.selected()?)
    }

    pub fn select_next(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let next = match self.state.selected() {
            Some(i) if i + 1 < self.rows.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        if self.rows.is_empty() {
            return;
        }
        let prev = match self.state.selected() {
            Some(0) | None => self.rows.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(prev));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ColorState;

    fn view(cells: &[(&str, &str, ColorState)]) -> IndexView {
        cells
            .iter()
            .map(|(k, t, c)| (k.to_string(), IndexCell::new(*t, *c)))
            .collect()
    }

    #[test]
    fn panel_creates_labels_for_every_index_and_column() {
        let panel = IndexPanel::new(&WatchList::new(["上证指数", "深证成指"], Vec::<String>::new()));
        assert_eq!(panel.row_count(), 2);
        assert_eq!(panel.label("上证指数_名称").unwrap().text, "上证指数");
        assert_eq!(panel.label("深证成指_沪股通").unwrap().text, PLACEHOLDER);
        assert_eq!(panel.grid().next().unwrap().len(), INDEX_COLUMNS.len());
    }

    #[test]
    fn apply_index_is_idempotent_and_skips_unknown_keys() {
        let mut panel = IndexPanel::new(&WatchList::new(["上证指数"], Vec::<String>::new()));
        let update = view(&[
            ("上证指数_最新价", "3050", ColorState::Up),
            ("上证指数_沪股通", "", ColorState::Neutral),
            ("科创50_最新价", "1000", ColorState::Down),
        ]);

        panel.apply_index(&update);
        let first = panel.clone();
        panel.apply_index(&update);

        assert_eq!(panel.labels, first.labels);
        assert_eq!(panel.label("上证指数_最新价"), Some(&IndexCell::new("3050", ColorState::Up)));
        assert_eq!(panel.label("上证指数_沪股通").unwrap().text, "");
        assert!(panel.label("科创50_最新价").is_none());
    }

    #[test]
    fn apply_stock_rebuilds_and_clears_selection() {
        let mut table = StockTable::default();
        let rows = vec![
            StockRow { cells: vec!["600519".into()], color: ColorState::Up },
            StockRow { cells: vec!["000858".into()], color: ColorState::Down },
        ];
        table.apply_stock(rows.clone());
        table.select_next();
        assert_eq!(table.selected().map(StockRow::code), Some("600519"));

        table.apply_stock(rows[1..].to_vec());
        assert_eq!(table.len(), 1);
        assert!(table.selected().is_none());
    }

    #[test]
    fn apply_stock_twice_is_stable() {
        let rows = vec![
            StockRow { cells: vec!["600519".into(), "贵州茅台".into()], color: ColorState::Up },
            StockRow { cells: vec!["000858".into(), "五粮液".into()], color: ColorState::Neutral },
        ];
        let mut once = StockTable::default();
        once.apply_stock(rows.clone());

        let mut twice = StockTable::default();
        twice.apply_stock(rows.clone());
        twice.apply_stock(rows.clone());

        assert_eq!(twice.rows(), once.rows());
        assert_eq!(twice.rows(), rows.as_slice());
        assert_eq!(twice.state.selected(), once.state.selected());
        assert!(twice.selected().is_none());
    }

    #[test]
    fn selection_wraps() {
        let mut table = StockTable::default();
        table.apply_stock(vec![StockRow::default(), StockRow::default()]);
        table.select_prev();
        assert_eq!(table.state.selected(), Some(1));
        table.select_next();
        assert_eq!(table.state.selected(), Some(0));
    }
}
