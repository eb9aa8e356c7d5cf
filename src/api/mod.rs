pub mod market;

pub use market::{MarketDataSource, MarketSnapshots};
