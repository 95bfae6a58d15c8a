pub mod error {
    #[allow(unused_imports)]
    pub(crate) use anyhow::{anyhow, bail, ensure, Context as _};
    pub use anyhow::{Error, Result};
}

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use colored::Colorize;
use cph_webclient::{Executor, Language, PistonClient, Runtime};
use error::*;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use strum::IntoEnumIterator;
use tokio_util::sync::CancellationToken;

use crate::config::{Config, HistoryConfig};
use crate::storage::{Problem, ProblemWorkspace, SubmissionHistory};
use crate::style;
use crate::testing::{
    RunSummary, SourceCode, StressEvent, StressOutcome, StressPlan, StressSearchLoop, TestCase,
    TestOutcome, TestRunner, Verdict,
};

pub fn init_cph_repository(dir: impl AsRef<Path>) -> Result<()> {
    let filepath = dir.as_ref().join(Config::FILENAME);
    ensure!(
        !filepath.exists(),
        "Already initialized: {:?} exists",
        filepath
    );
    fsutil::write_with_mkdir(&filepath, Config::example_toml())
        .context("Failed to init cph repository")
}

pub fn create_problem(
    dir: impl AsRef<Path>,
    title: &str,
    time_limit_secs: Option<f64>,
) -> Result<ProblemWorkspace> {
    let mut problem = Problem::new(title);
    if let Some(secs) = time_limit_secs {
        ensure!(
            secs.is_finite() && secs > 0.0,
            "Time limit must be positive: {}",
            secs
        );
        problem = problem.with_time_limit(secs);
    }
    let ws = ProblemWorkspace::new(dir.as_ref());
    ws.create(&problem)?;
    Ok(ws)
}

pub fn add_testcase(ws: &ProblemWorkspace, testcase: TestCase) -> Result<(Problem, String)> {
    let mut problem = ws.load_problem()?;
    let id = problem.add_testcase(testcase).id.clone();
    ws.save_problem(&problem)?;
    Ok((problem, id))
}

pub fn reset_problem(ws: &ProblemWorkspace) -> Result<Problem> {
    let mut problem = ws.load_problem()?;
    problem.reset_testcases();
    ws.save_problem(&problem)?;
    Ok(problem)
}

fn spinner_style() -> ProgressStyle {
    ProgressStyle::default_spinner()
        .template("{spinner} {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
}

fn finished_message(index: usize, o: &TestOutcome) -> String {
    format!(
        "Testcase #{} ... {} [{}ms]",
        index + 1,
        style::verdict_icon(o.verdict),
        o.execution_time.as_millis(),
    )
    .cyan()
    .to_string()
}

/// Runs the testcases of the problem in `ws` (all of them, or only the
/// `only_case`-th, 1-based) and stores the verdicts and submissions.
pub async fn do_test<E: Executor>(
    ws: &ProblemWorkspace,
    src: &SourceCode,
    runner: &TestRunner<E>,
    history_cfg: &HistoryConfig,
    only_case: Option<usize>,
) -> Result<RunSummary> {
    let mut problem = ws.load_problem()?;
    let mut history = ws.load_history(history_cfg.max_submissions)?;
    if problem.test_cases.is_empty() {
        bail!(
            "No testcases saved in {:?} (Hint: add one with `cph add`)",
            ws.problem_filepath()
        );
    }

    let targets: Vec<usize> = match only_case {
        None => (0..problem.test_cases.len()).collect(),
        Some(n) => {
            ensure!(
                (1..=problem.test_cases.len()).contains(&n),
                "No testcase #{} (the problem has {} testcases)",
                n,
                problem.test_cases.len()
            );
            vec![n - 1]
        }
    };

    log::info!(
        "Running {} testcase(s) of {:?} with {}",
        targets.len(),
        problem.title,
        src.language
    );

    let progress_bar_container = MultiProgress::new();
    let bars: Vec<ProgressBar> = targets
        .iter()
        .map(|&i| {
            let bar = progress_bar_container
                .add(ProgressBar::new_spinner())
                .with_style(spinner_style())
                .with_message(format!("Testcase #{} ...", i + 1));
            bar.enable_steady_tick(Duration::from_millis(50));
            bar
        })
        .collect();

    let summary = match only_case {
        None => {
            runner
                .run_all_with_progress(&mut problem, src, &mut history, |i, o| {
                    bars[i].finish_with_message(finished_message(i, o))
                })
                .await?
        }
        Some(_) => {
            let i = targets[0];
            let id = problem.test_cases[i].id.clone();
            let outcome = runner.run_one(&mut problem, &id, src, &mut history).await?;
            bars[0].finish_with_message(finished_message(i, &outcome));
            RunSummary {
                outcomes: vec![outcome],
                newly_solved: false,
            }
        }
    };
    println!();

    ws.save_problem(&problem)?;
    ws.save_history(&history)?;

    for &i in &targets {
        let t = &problem.test_cases[i];
        if t.verdict() != Verdict::AC {
            style::print_testcase_detail(i, t);
        }
    }
    style::print_run_summary(&summary);
    Ok(summary)
}

/// Runs a stress search until a counter-example is found, every iteration passes,
/// or the user presses Ctrl-C.
///
/// With `save_counterexample`, a found counter-example is added to the problem in
/// `ws` as a custom testcase.
pub async fn do_stress<E: Executor>(
    ws: Option<&ProblemWorkspace>,
    plan: StressPlan,
    runner: &TestRunner<E>,
    save_counterexample: bool,
) -> Result<StressOutcome> {
    let problem_id = match ws {
        Some(ws) => ws.load_problem()?.id,
        None => "stress".to_owned(),
    };

    let cancel = CancellationToken::new();
    let ctrl_c = tokio::spawn({
        let cancel = cancel.clone();
        async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                log::warn!("Interrupted; stopping after the current iteration");
                cancel.cancel();
            }
        }
    });

    let bar = ProgressBar::new(plan.max_iterations as u64).with_style(
        ProgressStyle::default_bar()
            .template("{spinner} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar.enable_steady_tick(Duration::from_millis(80));

    let mut stress = StressSearchLoop::new(runner.executor().clone(), plan);
    let mut num_skipped = 0;
    let outcome = runner
        .run_stress(&problem_id, &mut stress, &cancel, |ev| match ev {
            StressEvent::IterationStarted { test_number } => {
                bar.set_position(test_number as u64 - 1);
                bar.set_message(format!("test #{}", test_number));
            }
            StressEvent::ReferenceSkipped { .. } => {
                num_skipped += 1;
                bar.inc(1);
            }
            StressEvent::Recorded(_) => bar.inc(1),
        })
        .await;
    ctrl_c.abort();
    bar.finish_and_clear();
    let outcome = outcome?;

    if num_skipped > 0 {
        log::warn!(
            "{} iteration(s) skipped because the reference program failed",
            num_skipped
        );
    }

    match &outcome {
        StressOutcome::Found(r) => {
            style::print_counterexample(r);
            if let (true, Some(ws)) = (save_counterexample, ws) {
                let mut problem = ws.load_problem()?;
                let n = problem.test_cases.len() + 1;
                problem.promote_counterexample(r);
                ws.save_problem(&problem)?;
                crate::print_success!("Saved the counter-example as testcase #{}", n);
            }
        }
        StressOutcome::Passed { iterations } => {
            crate::print_success!("All {} tests passed ✨", iterations);
        }
        StressOutcome::Cancelled { test_number } => {
            println!(
                "{}",
                format!("Cancelled before test #{}", test_number).yellow()
            );
        }
        StressOutcome::GeneratorFailed {
            test_number,
            message,
        } => {
            bail!("Test #{}: {}", test_number, message);
        }
    }
    Ok(outcome)
}

/// Runtimes the execution service offers for the supported languages.
pub async fn list_runtimes(client: &PistonClient, refresh: bool) -> Result<Vec<(Language, Vec<Runtime>)>> {
    let runtimes = if refresh {
        client.refresh_runtimes().await
    } else {
        client.runtimes().await
    }
    .context("Failed to fetch runtimes")?;

    Ok(Language::iter()
        .map(|lang| {
            let matched = runtimes.iter().filter(|r| r.matches(lang)).cloned().collect();
            (lang, matched)
        })
        .collect())
}

pub fn load_history(ws: &ProblemWorkspace, cfg: &HistoryConfig) -> Result<SubmissionHistory> {
    ws.load_history(cfg.max_submissions)
}

pub fn source_from_file(path: impl AsRef<Path>, lang: Option<Language>) -> Result<SourceCode> {
    SourceCode::from_file(&path, lang)
        .with_context(|| format!("Failed to load program {:?}", path.as_ref()))
}

/// Executor and runner configured from `cfg`.
pub fn build_runner(cfg: &Config) -> Result<TestRunner<PistonClient>> {
    let client = cfg.execution.build_client()?;
    Ok(TestRunner::new(Arc::new(client)))
}
