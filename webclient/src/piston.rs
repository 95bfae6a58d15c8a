mod client;
mod runtime;
pub mod urls;

pub use client::*;
pub use runtime::RuntimeCache;
