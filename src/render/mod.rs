pub mod dirty_flags;
pub mod sync;

pub use dirty_flags::{DirtyFlags, RenderState};
pub use sync::{IndexPanel, StockTable, PLACEHOLDER};
