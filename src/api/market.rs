use std::sync::Arc;

use crate::{
    data::{
        fields::{FIELD_BALANCE, FIELD_NORTH_DATE, FIELD_VALUE},
        Market, Snapshot, Value, WatchList,
    },
    helper::{date, format_balance, format_north_flow},
    provider::Provider,
};

/// Snapshots gathered by one refresh cycle; `None` means the feed was unavailable
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketSnapshots {
    pub index: Option<Snapshot>,
    pub stocks: Option<Snapshot>,
    pub north_sh: Option<Snapshot>,
    pub north_sz: Option<Snapshot>,
}

/// Fetches upstream snapshots and narrows them down to the watch-list
pub struct MarketDataSource {
    provider: Arc<dyn Provider>,
    watchlist: WatchList,
}

impl MarketDataSource {
    pub fn new(provider: Arc<dyn Provider>, watchlist: WatchList) -> Self {
        Self {
            provider,
            watchlist,
        }
    }

    pub fn provider(&self) -> &Arc<dyn Provider> {
        &self.provider
    }

    /// Watch-listed indexes with turnover formatted in 亿
    pub async fn fetch_index_all(&self) -> Option<Snapshot> {
        let snapshot = self
            .provider
            .index_spot()
            .await
            .map_err(|err| tracing::warn!("获取指数行情失败：{err}"))
            .ok()?;
        Some(format_balance_field(self.filter_index(snapshot)))
    }

    /// Watch-listed stocks, Shanghai rows first
    ///
    /// A market that fails to load is left out; `None` only when both fail.
    pub async fn fetch_stock_all(&self) -> Option<Snapshot> {
        let mut merged: Option<Snapshot> = None;

        for market in Market::iter() {
            match self.provider.stock_spot(market).await {
                Ok(snapshot) => {
                    let filtered = self.filter_stock(snapshot);
                    merged = Some(match merged {
                        Some(prev) => prev.concat(filtered),
                        None => filtered,
                    });
                }
                Err(err) => tracing::warn!(%market, "获取个股行情失败：{err}"),
            }
        }

        merged.map(format_balance_field)
    }

    /// Today's northbound net inflow into `market`
    pub async fn fetch_north(&self, market: Market) -> Option<Snapshot> {
        self.fetch_north_on(market, &date::today()).await
    }

    /// Northbound net inflow on `day` (`YYYY-MM-DD`); no row for that day yields an empty snapshot
    pub async fn fetch_north_on(&self, market: Market, day: &str) -> Option<Snapshot> {
        let snapshot = self
            .provider
            .north_flow(market)
            .await
            .map_err(|err| tracing::warn!(%market, "获取北向资金失败：{err}"))
            .ok()?;

        Some(
            snapshot
                .filter_eq(FIELD_NORTH_DATE, day)
                .map_field(FIELD_VALUE, |value| {
                    Value::from(format_north_flow(value.as_f64().unwrap_or(0.0)))
                }),
        )
    }

    /// All four feeds of a refresh cycle, fetched concurrently
    pub async fn fetch_all(&self) -> MarketSnapshots {
        let (index, stocks, north_sh, north_sz) = tokio::join!(
            self.fetch_index_all(),
            self.fetch_stock_all(),
            self.fetch_north(Market::SH),
            self.fetch_north(Market::SZ),
        );
        MarketSnapshots {
            index,
            stocks,
            north_sh,
            north_sz,
        }
    }

    pub fn filter_index(&self, snapshot: Snapshot) -> Snapshot {
        snapshot.filter_by_name(|name| self.watchlist.contains_index(name))
    }

    pub fn filter_stock(&self, snapshot: Snapshot) -> Snapshot {
        snapshot.filter_by_name(|name| self.watchlist.contains_stock(name))
    }
}

fn format_balance_field(snapshot: Snapshot) -> Snapshot {
    // unparseable turnover shows as zero
    snapshot.map_field(FIELD_BALANCE, |value| {
        Value::from(format_balance(value.as_f64().unwrap_or(0.0)))
    })
}
