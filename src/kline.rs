//! Daily candlestick chart of one security.

use itertools::Itertools;
use time::OffsetDateTime;

use crate::{
    data::{
        fields::{
            CHART_VOLUME_UNIT, FIELD_CLOSE, FIELD_DATE, FIELD_HIGH, FIELD_LOW, FIELD_OPEN2,
            FIELD_VOLUME, MA_PERIODS,
        },
        Row, Snapshot, Value,
    },
    helper::date,
    provider::Provider,
};

/// One trading day
#[derive(Clone, Debug, PartialEq)]
pub struct KlineBar {
    pub date: String,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// Volume in units of [`CHART_VOLUME_UNIT`]
    pub volume: f64,
}

impl KlineBar {
    fn from_row(row: &Row) -> Option<Self> {
        let num = |field: &str| row.get(field).and_then(Value::as_f64);
        let bar = Self {
            date: row.get(FIELD_DATE)?.to_string(),
            open: num(FIELD_OPEN2)?,
            high: num(FIELD_HIGH)?,
            low: num(FIELD_LOW)?,
            close: num(FIELD_CLOSE)?,
            volume: num(FIELD_VOLUME).unwrap_or_default() / CHART_VOLUME_UNIT,
        };
        bar.is_valid().then_some(bar)
    }

    fn is_valid(&self) -> bool {
        self.open > 0.0
            && self.low > 0.0
            && self.high >= self.low
            && (self.low..=self.high).contains(&self.open)
            && (self.low..=self.high).contains(&self.close)
    }
}

/// Candles plus moving averages of a security over a date range
#[derive(Clone, Debug, PartialEq)]
pub struct KlineChart {
    pub code: String,
    pub start: String,
    pub end: String,
    pub bars: Vec<KlineBar>,
}

impl KlineChart {
    /// `None` when the snapshot holds no usable candle
    pub fn from_snapshot(code: &str, start: &str, end: &str, snapshot: &Snapshot) -> Option<Self> {
        let bars: Vec<_> = snapshot.rows().iter().filter_map(KlineBar::from_row).collect();
        if bars.is_empty() {
            return None;
        }
        Some(Self {
            code: code.to_string(),
            start: start.to_string(),
            end: end.to_string(),
            bars,
        })
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Latest value of every average in [`MA_PERIODS`], `None` while history is too short
    pub fn latest_averages(&self) -> Vec<(usize, Option<f64>)> {
        let closes = self.closes();
        MA_PERIODS
            .iter()
            .map(|&period| (period, moving_average(&closes, period).last().copied().flatten()))
            .collect()
    }

    /// `MA5 1700.00  MA10 1695.31 ...`
    pub fn averages_line(&self) -> String {
        self.latest_averages()
            .into_iter()
            .map(|(period, value)| match value {
                Some(v) => format!("MA{period} {v:.2}"),
                None => format!("MA{period} --"),
            })
            .join("  ")
    }
}

/// Simple moving average; the first `period - 1` points have none
#[allow(clippy::cast_precision_loss)]
pub fn moving_average(values: &[f64], period: usize) -> Vec<Option<f64>> {
    if period == 0 {
        return vec![None; values.len()];
    }

    let mut sum = 0.0;
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            sum += v;
            if i >= period {
                sum -= values[i - period];
            }
            (i + 1 >= period).then(|| sum / period as f64)
        })
        .collect()
}

/// Chart range: January 1st of this year to `at`, both `YYYYMMDD`
pub fn chart_range(at: OffsetDateTime) -> (String, String) {
    (date::year_start(at), date::compact(at))
}

/// Load the daily history of `code`; any failure reads as "no data"
pub async fn fetch_chart(
    provider: &dyn Provider,
    code: &str,
    start: &str,
    end: &str,
) -> Option<KlineChart> {
    match provider.history(code, start, end).await {
        Ok(snapshot) => {
            let chart = KlineChart::from_snapshot(code, start, end, &snapshot);
            if chart.is_none() {
                tracing::info!(code, start, end, "区间内没有 K 线");
            }
            chart
        }
        Err(err) => {
            tracing::warn!(code, "请求 K 线数据失败：{err}");
            None
        }
    }
}
