//! Configuration module

mod blog;

pub use blog::BlogConfig;
pub use blog::{CONFIG_FILE, FREEZING_FILE};
