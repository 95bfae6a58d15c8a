pub mod action;
pub mod config;
pub mod storage;
pub mod style;
pub mod testing;

mod util;

pub use crate::config::Config;
