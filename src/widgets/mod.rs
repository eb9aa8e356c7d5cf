mod candles;
mod terminal;

pub use candles::Candles;
pub use terminal::Terminal;
