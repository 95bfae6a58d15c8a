use std::path::Path;

use cph_core::{action, storage::ProblemWorkspace, style};

use super::{GlobalArgs, SubcmdResult};
use crate::config;

/// Show recent submissions of the problem in the current directory
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Number of entries to show
    #[arg(short = 'n', long, default_value_t = 10)]
    pub limit: usize,
}

pub fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load_config(global_args)?;
    let ws = ProblemWorkspace::new(Path::new("."));
    let problem = ws.load_problem()?;
    let history = action::load_history(&ws, &cfg.history)?;

    let mut shown = 0;
    for s in history.for_problem(&problem.id).take(args.limit) {
        style::print_submission(s);
        shown += 1;
    }
    if shown == 0 {
        println!("No submissions yet");
    }
    Ok(())
}
