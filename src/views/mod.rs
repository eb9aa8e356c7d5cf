pub mod chart;
pub mod footer;
pub mod help;
pub mod index_panel;
pub mod navbar;
pub mod stock_table;
