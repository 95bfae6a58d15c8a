use std::path::{Path, PathBuf};

use anyhow::bail;
use cph_core::{action, print_success, storage::ProblemWorkspace, testing::TestCase};

use super::{GlobalArgs, SubcmdResult};
use crate::util;

/// Add a testcase to the problem in the current directory
#[derive(Debug, clap::Args)]
pub struct Args {
    /// Input file ('-' or omitted: read from stdin)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Expected output file ('-' or omitted: read from stdin)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Add the testcase without expected output; its runs only show the program output
    #[arg(long, conflicts_with = "output")]
    pub no_output: bool,

    /// Mark the testcase as a sample copied from the problem statement
    #[arg(long)]
    pub sample: bool,
}

pub fn exec(args: &Args, _: &GlobalArgs) -> SubcmdResult {
    let (input, expected) = read_texts(args, util::read_file_or_stdin)?;

    let testcase = if args.sample {
        TestCase::new(input, expected)
    } else {
        TestCase::custom(input, expected)
    };

    let ws = ProblemWorkspace::new(Path::new("."));
    let (problem, _id) = action::add_testcase(&ws, testcase)?;
    print_success!(
        "Added testcase #{} to {:?}",
        problem.test_cases.len(),
        problem.title
    );
    Ok(())
}

/// Reads the input and the expected output named by `args`.
/// Stdin can be consumed only once, so at most one of them may come from it.
fn read_texts(
    args: &Args,
    mut read: impl FnMut(Option<&Path>, &str) -> anyhow::Result<String>,
) -> anyhow::Result<(String, String)> {
    let input_path = args.input.as_deref();
    if args.no_output {
        return Ok((read(input_path, "input")?, String::new()));
    }

    let output_path = args.output.as_deref();
    if util::is_stdin(input_path) && util::is_stdin(output_path) {
        bail!(
            "Cannot read both input and expected output from stdin; \
             pass a file with --input or --output"
        );
    }

    let input = read(input_path, "input")?;
    let expected = read(output_path, "expected output")?;
    if expected.trim().is_empty() {
        bail!("Expected output is empty; pass --no-output to add a testcase without one");
    }
    Ok((input, expected))
}
