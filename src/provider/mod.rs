//! Upstream market data providers.

use futures::future::BoxFuture;

use crate::data::{Market, Snapshot};

mod eastmoney;
mod error;
mod rate_limiter;

pub use eastmoney::EastmoneyProvider;
pub use error::ProviderError;
pub use rate_limiter::RateLimiter;

pub type ProviderResult<'a> = BoxFuture<'a, Result<Snapshot, ProviderError>>;

/// Source of raw snapshots, one call per feed
pub trait Provider: Send + Sync {
    /// Spot quotes of every SH and SZ index
    fn index_spot(&self) -> ProviderResult<'_>;

    /// Spot quotes of every A share listed in `market`
    fn stock_spot(&self, market: Market) -> ProviderResult<'_>;

    /// Daily northbound net inflow into `market`, rows of `date` / `value`
    fn north_flow(&self, market: Market) -> ProviderResult<'_>;

    /// Daily candles of `code` between two `YYYYMMDD` dates, inclusive
    fn history<'a>(&'a self, code: &'a str, start: &'a str, end: &'a str) -> ProviderResult<'a>;
}
