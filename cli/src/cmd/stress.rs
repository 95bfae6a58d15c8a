use std::path::{Path, PathBuf};

use cph_core::{action, storage::ProblemWorkspace, testing::SourceCode};
use cph_webclient::Language;

use super::{ArgLanguage, GlobalArgs, SubcmdResult};
use crate::config;

/// Search for an input on which the program and a brute-force solution disagree
#[derive(Debug, clap::Args)]
pub struct Args {
    #[arg()] // positional argument
    pub program_file: PathBuf,

    /// Generator program printing a random input
    #[arg(short, long)]
    pub gen: PathBuf,

    /// Brute-force (reference) program
    #[arg(short, long)]
    pub brute: PathBuf,

    /// Number of iterations (1..=1000)
    #[arg(short = 'n', long)]
    pub iterations: Option<u32>,

    /// Language of the program (detected from the file extension by default)
    #[arg(short, long)]
    pub lang: Option<ArgLanguage>,

    /// Save a found counter-example as a testcase of the problem in the current dir
    #[arg(long)]
    pub save: bool,
}

fn load_source(path: &Path, fallback: Language) -> anyhow::Result<SourceCode> {
    let lang = Language::from_path(path).unwrap_or(fallback);
    action::source_from_file(path, Some(lang))
}

pub async fn exec(args: &Args, global_args: &GlobalArgs) -> SubcmdResult {
    let cfg = config::load_config(global_args)?;

    let candidate = action::source_from_file(&args.program_file, args.lang.map(Into::into))?;
    let generator = load_source(&args.gen, cfg.stress.generator_lang)?;
    let reference = load_source(&args.brute, cfg.stress.reference_lang)?;
    let plan = cfg
        .stress
        .plan(generator, reference, candidate, args.iterations);

    let ws = ProblemWorkspace::new(Path::new("."));
    let ws = ws.exists().then_some(&ws);
    if args.save && ws.is_none() {
        anyhow::bail!("--save requires a problem in the current dir (create one with `cph new`)");
    }

    let runner = action::build_runner(&cfg)?;
    action::do_stress(ws, plan, &runner, args.save).await?;
    Ok(())
}
