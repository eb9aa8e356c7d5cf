pub mod date;
pub mod number;

pub use number::{
    color_for_delta, color_for_formatted_value, format_balance, format_north_flow, strip_units,
};
