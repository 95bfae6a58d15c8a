pub mod compare;
pub mod diff;
pub mod gate;
pub mod result;
pub mod runner;
pub mod source;
pub mod stress;
pub mod testcase;
pub mod verdict;

#[cfg(test)]
pub(crate) mod mock;

pub use compare::{compare_outputs, normalize_output};
pub use diff::*;
pub use gate::*;
pub use result::*;
pub use runner::*;
pub use source::*;
pub use stress::*;
pub use testcase::*;
pub use verdict::*;
