// exported modules
pub mod error;
pub mod model;

// executor impls
pub mod piston;

// re-exports
pub use error::*;
pub use model::*;
pub use piston::PistonClient;

// internal modules
mod http;
mod util;
