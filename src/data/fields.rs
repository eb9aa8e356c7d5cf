//! Upstream column names, display orders and unit constants.
//!
//! Field names are the Chinese column headers used by the upstream snapshot
//! tables. They double as display headers, so they are not localized.

pub const FIELD_DATE: &str = "日期";
pub const FIELD_CODE: &str = "代码";
pub const FIELD_NAME: &str = "名称";
pub const FIELD_OPEN: &str = "今开";
pub const FIELD_OPEN2: &str = "开盘";
pub const FIELD_CLOSE: &str = "收盘";
pub const FIELD_YCLOSE: &str = "昨收";
pub const FIELD_LATEST: &str = "最新价";
pub const FIELD_HIGH: &str = "最高";
pub const FIELD_LOW: &str = "最低";
pub const FIELD_BALANCE: &str = "成交额";
pub const FIELD_VOLUME: &str = "成交量";
pub const FIELD_DELTA: &str = "涨跌幅";
pub const FIELD_NORTH_SH: &str = "沪股通";
pub const FIELD_NORTH_SZ: &str = "深股通";

/// Northbound flow rows are keyed by `date` and carry a single `value`.
pub const FIELD_NORTH_DATE: &str = "date";
pub const FIELD_VALUE: &str = "value";

/// Index panel columns, in display order.
pub const INDEX_COLUMNS: [&str; 6] = [
    FIELD_NAME,
    FIELD_LATEST,
    FIELD_DELTA,
    FIELD_BALANCE,
    FIELD_NORTH_SH,
    FIELD_NORTH_SZ,
];

/// Positions of the two northbound slots inside [`INDEX_COLUMNS`].
pub const COLUMN_NORTH_SH: usize = 4;
pub const COLUMN_NORTH_SZ: usize = 5;

/// Stock table columns, in display order.
pub const TABLE_COLUMNS: [&str; 9] = [
    FIELD_CODE,
    FIELD_NAME,
    FIELD_LATEST,
    FIELD_DELTA,
    FIELD_OPEN,
    FIELD_YCLOSE,
    FIELD_HIGH,
    FIELD_LOW,
    FIELD_BALANCE,
];

pub const DEFAULT_INDEX_LIST: [&str; 3] = ["上证指数", "深证成指", "创业板指"];

pub const BALANCE_UNIT: f64 = 100_000_000.0;
pub const BALANCE_UNIT_TEXT: &str = "亿";

/// Northbound flow arrives in units of 10 000 CNY.
pub const NORTH_UNIT: f64 = 10_000.0;
pub const NORTH_UNIT_TEXT: &str = "亿";

/// Deltas within this band are treated as floating-point noise.
pub const SIGNAL_EPSILON: f64 = 0.000_001;

/// Moving average windows drawn on the candlestick chart.
pub const MA_PERIODS: [usize; 7] = [5, 10, 20, 30, 60, 120, 250];

/// Volume on the chart is shown in units of 10 000 shares.
pub const CHART_VOLUME_UNIT: f64 = 10_000.0;

/// Eastmoney list field codes for spot snapshots (indexes and stocks).
pub const SPOT_FIELD_CODES: [(&str, &str); 10] = [
    ("f12", FIELD_CODE),
    ("f14", FIELD_NAME),
    ("f2", FIELD_LATEST),
    ("f3", FIELD_DELTA),
    ("f17", FIELD_OPEN),
    ("f18", FIELD_YCLOSE),
    ("f15", FIELD_HIGH),
    ("f16", FIELD_LOW),
    ("f5", FIELD_VOLUME),
    ("f6", FIELD_BALANCE),
];

/// Column order of Eastmoney daily kline records (`f51..f57`).
pub const KLINE_FIELDS: [&str; 7] = [
    FIELD_DATE,
    FIELD_OPEN2,
    FIELD_CLOSE,
    FIELD_HIGH,
    FIELD_LOW,
    FIELD_VOLUME,
    FIELD_BALANCE,
];

/// Build the stable identity key of an index panel label.
pub fn index_key(index_name: &str, field_name: &str) -> String {
    format!("{index_name}_{field_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn northbound_slots_point_at_northbound_columns() {
        assert_eq!(INDEX_COLUMNS[COLUMN_NORTH_SH], FIELD_NORTH_SH);
        assert_eq!(INDEX_COLUMNS[COLUMN_NORTH_SZ], FIELD_NORTH_SZ);
    }

    #[test]
    fn index_key_joins_with_underscore() {
        assert_eq!(index_key("上证指数", FIELD_NORTH_SH), "上证指数_沪股通");
    }
}
