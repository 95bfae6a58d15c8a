use std::path::PathBuf;

use cph_core::{action, print_success};

use super::{GlobalArgs, SubcmdResult};

/// Create a problem in the given directory
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub title: String,

    /// Time limit in seconds
    #[arg(short, long)]
    pub time_limit: Option<f64>,

    #[arg(short, long, default_value = "./")]
    pub dir: PathBuf,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let ws = action::create_problem(&args.dir, &args.title, args.time_limit)?;
    print_success!(
        "Created problem {:?} ({})",
        args.title,
        ws.problem_filepath().to_string_lossy()
    );
    Ok(())
}
