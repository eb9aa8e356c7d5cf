pub mod fields;
pub mod snapshot;
pub mod types;
pub mod view_model;
pub mod watchlist;

pub use snapshot::{Row, Snapshot, Value};
pub use types::*;
pub use view_model::{IndexCell, IndexView, StockRow};
pub use watchlist::WatchList;
