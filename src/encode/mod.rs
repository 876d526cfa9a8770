pub mod color;
pub mod ranges;

pub use color::{ColorToken, DEFAULT_DOMAIN_MAX, color_of, color_of_percent};
pub use ranges::{build_ranges, final_value};
