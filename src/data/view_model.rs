use super::{
    fields::{
        index_key, COLUMN_NORTH_SH, COLUMN_NORTH_SZ, FIELD_LATEST, FIELD_VALUE, FIELD_YCLOSE,
        INDEX_COLUMNS, TABLE_COLUMNS,
    },
    ColorState, Row, Snapshot, Value,
};
use crate::helper::{color_for_delta, color_for_formatted_value};

/// Text and signal of one index panel label
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexCell {
    pub text: String,
    pub color: ColorState,
}

impl IndexCell {
    pub fn new(text: impl Into<String>, color: ColorState) -> Self {
        Self {
            text: text.into(),
            color,
        }
    }
}

/// Label key → cell, in build order (index rows × [`INDEX_COLUMNS`])
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IndexView {
    cells: Vec<(String, IndexCell)>,
}

impl IndexView {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IndexCell)> {
        self.cells.iter().map(|(k, c)| (k.as_str(), c))
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&IndexCell> {
        self.cells.iter().find(|(k, _)| k == key).map(|(_, c)| c)
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl FromIterator<(String, IndexCell)> for IndexView {
    fn from_iter<I: IntoIterator<Item = (String, IndexCell)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

/// One stock table row, every cell drawn with the same color
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct StockRow {
    /// Values in [`TABLE_COLUMNS`] order
    pub cells: Vec<String>,
    pub color: ColorState,
}

impl StockRow {
    /// Security code, the first table column
    pub fn code(&self) -> &str {
        self.cells.first().map_or("", String::as_str)
    }

    pub fn name(&self) -> &str {
        self.cells.get(1).map_or("", String::as_str)
    }
}

/// Merge the index snapshot and both northbound snapshots into panel cells
pub fn build_index_view(
    index: Option<&Snapshot>,
    north_sh: Option<&Snapshot>,
    north_sz: Option<&Snapshot>,
) -> IndexView {
    let Some(index) = index else {
        return IndexView::default();
    };

    let north_sh = north_value(north_sh);
    let north_sz = north_value(north_sz);
    let mut cells = Vec::with_capacity(index.len() * INDEX_COLUMNS.len());

    for row in index.rows() {
        let color = row_color(row);
        // the first column names the row
        let name = cell_text(row, INDEX_COLUMNS[0]);

        for (column, field) in INDEX_COLUMNS.iter().enumerate() {
            let cell = match column {
                COLUMN_NORTH_SH => {
                    IndexCell::new(north_sh.clone(), color_for_formatted_value(&north_sh))
                }
                COLUMN_NORTH_SZ => {
                    IndexCell::new(north_sz.clone(), color_for_formatted_value(&north_sz))
                }
                _ => IndexCell::new(cell_text(row, field), color),
            };
            cells.push((index_key(&name, field), cell));
        }
    }

    IndexView { cells }
}

/// Turn the filtered stock snapshot into table rows
pub fn build_stock_view(stocks: Option<&Snapshot>) -> Vec<StockRow> {
    let Some(stocks) = stocks else {
        return vec![];
    };

    stocks
        .rows()
        .iter()
        .map(|row| {
            let color = row_color(row);
            let cells = TABLE_COLUMNS
                .iter()
                .map(|field| cell_text(row, field))
                .collect();
            StockRow { cells, color }
        })
        .collect()
}

/// Scalar of a northbound snapshot, empty when there is no row
fn north_value(snapshot: Option<&Snapshot>) -> String {
    snapshot
        .and_then(|s| s.get(0, FIELD_VALUE))
        .map(Value::to_string)
        .unwrap_or_default()
}

fn row_color(row: &Row) -> ColorState {
    let latest = row.get(FIELD_LATEST).and_then(Value::as_f64);
    let yclose = row.get(FIELD_YCLOSE).and_then(Value::as_f64);
    match (latest, yclose) {
        (Some(latest), Some(yclose)) => color_for_delta(latest, yclose),
        _ => ColorState::Neutral,
    }
}

fn cell_text(row: &Row, field: &str) -> String {
    row.get(field).map(Value::to_string).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{
        fields::{
            FIELD_BALANCE, FIELD_CODE, FIELD_DELTA, FIELD_NAME, FIELD_NORTH_DATE, FIELD_NORTH_SH,
            FIELD_NORTH_SZ,
        },
        snapshot::row,
    };

    fn index_row(name: &str, latest: f64, yclose: f64) -> Row {
        row([
            (FIELD_NAME, Value::from(name)),
            (FIELD_LATEST, Value::from(latest)),
            (FIELD_YCLOSE, Value::from(yclose)),
            (FIELD_DELTA, Value::from(0.5)),
            (FIELD_BALANCE, Value::from("3500.12亿")),
        ])
    }

    fn north(value: &str) -> Snapshot {
        Snapshot::new(vec![row([
            (FIELD_NORTH_DATE, "2024-03-07"),
            (FIELD_VALUE, value),
        ])])
    }

    #[test]
    fn index_view_has_six_cells_per_row() {
        let index = Snapshot::new(vec![
            index_row("上证指数", 3050.0, 3040.0),
            index_row("深证成指", 9500.0, 9600.0),
        ]);
        let view = build_index_view(Some(&index), None, None);
        assert_eq!(view.len(), 12);

        let keys: Vec<_> = view.iter().take(6).map(|(k, _)| k.to_string()).collect();
        assert_eq!(
            keys,
            INDEX_COLUMNS.map(|field| index_key("上证指数", field))
        );
    }

    #[test]
    fn index_row_color_is_shared_except_north() {
        let index = Snapshot::new(vec![index_row("上证指数", 3050.0, 3040.0)]);
        let sh = north("-12.30亿");
        let sz = north("4.56亿");
        let view = build_index_view(Some(&index), Some(&sh), Some(&sz));

        for field in [FIELD_NAME, FIELD_LATEST, FIELD_DELTA, FIELD_BALANCE] {
            let cell = view.get(&index_key("上证指数", field)).unwrap();
            assert_eq!(cell.color, ColorState::Up, "{field}");
        }
        assert_eq!(
            view.get("上证指数_沪股通"),
            Some(&IndexCell::new("-12.30亿", ColorState::Down))
        );
        assert_eq!(
            view.get("上证指数_深股通"),
            Some(&IndexCell::new("4.56亿", ColorState::Up))
        );
        assert_eq!(view.get("上证指数_成交额").unwrap().text, "3500.12亿");
        assert_eq!(view.get("上证指数_最新价").unwrap().text, "3050");
    }

    #[test]
    fn empty_north_flow_renders_blank_neutral() {
        let index = Snapshot::new(vec![index_row("上证指数", 3050.0, 3040.0)]);
        let view = build_index_view(Some(&index), Some(&Snapshot::empty()), None);

        let expected = IndexCell::new("", ColorState::Neutral);
        assert_eq!(view.get(&index_key("上证指数", FIELD_NORTH_SH)), Some(&expected));
        assert_eq!(view.get(&index_key("上证指数", FIELD_NORTH_SZ)), Some(&expected));
    }

    #[test]
    fn missing_index_snapshot_builds_nothing() {
        assert!(build_index_view(None, None, None).is_empty());
        assert!(build_stock_view(None).is_empty());
    }

    #[test]
    fn stock_view_follows_table_columns() {
        let stocks = Snapshot::new(vec![row([
            (FIELD_CODE, Value::from("600519")),
            (FIELD_NAME, Value::from("贵州茅台")),
            (FIELD_LATEST, Value::from(1700.0)),
            (FIELD_YCLOSE, Value::from(1690.0)),
            (FIELD_BALANCE, Value::from("12.30亿")),
        ])]);
        let rows = build_stock_view(Some(&stocks));

        assert_eq!(rows.len(), 1);
        let stock = &rows[0];
        assert_eq!(stock.cells.len(), TABLE_COLUMNS.len());
        assert_eq!(stock.code(), "600519");
        assert_eq!(stock.cells[1], "贵州茅台");
        assert_eq!(stock.cells[8], "12.30亿");
        // fields absent upstream stay blank
        assert_eq!(stock.cells[4], "");
        assert_eq!(stock.color, ColorState::Up);
    }

    #[test]
    fn non_numeric_prices_are_neutral() {
        let stocks = Snapshot::new(vec![row([
            (FIELD_NAME, Value::from("停牌股")),
            (FIELD_LATEST, Value::from("-")),
            (FIELD_YCLOSE, Value::from(10.0)),
        ])]);
        let rows = build_stock_view(Some(&stocks));
        assert_eq!(rows[0].color, ColorState::Neutral);
    }
}
