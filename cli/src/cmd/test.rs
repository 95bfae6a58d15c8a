use std::path::{Path, PathBuf};

use cph_core::{action, storage::ProblemWorkspace};

use super::{ArgLanguage, GlobalArgs, SubcmdResult};
use crate::{config, util};

/// Run the program against the saved testcases
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub program_file_or_dir: Option<PathBuf>,

    /// Run only the N-th testcase (1-based)
    #[arg(short, long)]
    pub case: Option<usize>,

    /// Language of the program (detected from the file extension by default)
    #[arg(short, long)]
    pub lang: Option<ArgLanguage>,
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load_config(global_args)?;
    let program_file = util::determine_program_file(&args.program_file_or_dir)?;
    let src = action::source_from_file(&program_file, args.lang.map(Into::into))?;

    let ws = ProblemWorkspace::new(Path::new("."));
    let runner = action::build_runner(&cfg)?;
    let _ = action::do_test(&ws, &src, &runner, &cfg.history, args.case).await?;
    Ok(())
}
