use std::path::Path;

use cph_core::{action, print_success, storage::ProblemWorkspace};

use super::{GlobalArgs, SubcmdResult};

/// Reset every testcase verdict to PENDING
#[derive(Debug, clap::Args)]
pub struct Args {}

pub fn exec(_args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let ws = ProblemWorkspace::new(Path::new("."));
    let problem = action::reset_problem(&ws)?;
    print_success!("Reset {} testcase(s)", problem.test_cases.len());
    Ok(())
}
