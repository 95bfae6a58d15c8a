pub mod history;
pub mod problem;
pub mod workspace;

pub use history::*;
pub use problem::*;
pub use workspace::*;
