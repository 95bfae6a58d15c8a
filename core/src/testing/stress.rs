//! Randomized search for an input on which a candidate program disagrees with a
//! trusted reference.
//!
//! Each iteration runs the generator (empty stdin), feeds its output to the
//! reference and then to the candidate, and compares the two outputs. The search
//! stops at the first disagreement.
//!
//! A failing generator ends the whole search, while a reference that fails at
//! runtime only skips the current iteration.

use std::{sync::Arc, time::Duration};

use cph_webclient::{ExecutionResult, Executor};
use tokio_util::sync::CancellationToken;

use super::{compare::compare_outputs, source::SourceCode};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressPlan {
    pub generator: SourceCode,
    pub generator_timeout: Duration,
    pub reference: SourceCode,
    pub reference_timeout: Duration,
    pub candidate: SourceCode,
    pub candidate_timeout: Duration,
    pub max_iterations: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressResult {
    /// 1-based iteration number
    pub test_number: u32,
    pub input: String,
    /// Output of the reference program
    pub expected_output: String,
    /// Output of the candidate program
    pub actual_output: String,
    pub is_match: bool,
    pub time: Duration,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum StressStatus {
    #[default]
    Idle,
    Running,
    Found,
    Passed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StressOutcome {
    /// The candidate disagreed with the reference.
    Found(StressResult),
    /// Every iteration agreed.
    Passed { iterations: u32 },
    /// Stopped by the cancellation token before iteration `test_number` finished.
    Cancelled { test_number: u32 },
    /// The generator failed; the search cannot continue.
    GeneratorFailed { test_number: u32, message: String },
}

impl StressOutcome {
    /// Status the loop ends up in.
    pub fn status(&self) -> StressStatus {
        match self {
            StressOutcome::Found(_) => StressStatus::Found,
            StressOutcome::Passed { .. } => StressStatus::Passed,
            StressOutcome::Cancelled { .. } | StressOutcome::GeneratorFailed { .. } => {
                StressStatus::Idle
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StressEvent<'a> {
    IterationStarted { test_number: u32 },
    ReferenceSkipped { test_number: u32, result: &'a ExecutionResult },
    Recorded(&'a StressResult),
}

pub struct StressSearchLoop<E> {
    executor: Arc<E>,
    plan: StressPlan,
    results: Vec<StressResult>,
    status: StressStatus,
}

impl<E: Executor> StressSearchLoop<E> {
    pub fn new(executor: Arc<E>, plan: StressPlan) -> Self {
        Self {
            executor,
            plan,
            results: Vec::new(),
            status: StressStatus::Idle,
        }
    }

    pub fn plan(&self) -> &StressPlan {
        &self.plan
    }

    pub fn status(&self) -> StressStatus {
        self.status
    }

    /// Results recorded so far, in iteration order. Skipped iterations leave no entry.
    pub fn results(&self) -> &[StressResult] {
        &self.results
    }

    pub fn counterexample(&self) -> Option<&StressResult> {
        self.results.last().filter(|r| !r.is_match)
    }

    pub fn reset(&mut self) {
        self.results.clear();
        self.status = StressStatus::Idle;
    }

    pub async fn run(&mut self, cancel: &CancellationToken) -> StressOutcome {
        self.run_with(cancel, |_| {}).await
    }

    /// Runs the search, reporting progress to `on_event`.
    ///
    /// `cancel` is polled between executions; an execution already in flight is
    /// not interrupted.
    pub async fn run_with(
        &mut self,
        cancel: &CancellationToken,
        mut on_event: impl FnMut(StressEvent<'_>),
    ) -> StressOutcome {
        self.reset();
        self.status = StressStatus::Running;
        let outcome = self.search(cancel, &mut on_event).await;
        self.status = outcome.status();
        outcome
    }

    async fn search(
        &mut self,
        cancel: &CancellationToken,
        on_event: &mut impl FnMut(StressEvent<'_>),
    ) -> StressOutcome {
        let exec = self.executor.clone();
        let plan = &self.plan;

        for test_number in 1..=plan.max_iterations {
            if cancel.is_cancelled() {
                return StressOutcome::Cancelled { test_number };
            }
            on_event(StressEvent::IterationStarted { test_number });

            let generated = exec
                .execute(
                    &plan.generator.code,
                    plan.generator.language,
                    "",
                    plan.generator_timeout,
                )
                .await;
            if generated.exit_code != 0 || generated.compilation_error.is_some() {
                let detail = generated.compilation_error.as_deref().unwrap_or(&generated.stderr);
                let message = format!("Generator error: {}", detail);
                log::error!("Test #{}: {}", test_number, message);
                return StressOutcome::GeneratorFailed {
                    test_number,
                    message,
                };
            }
            let input = generated.stdout.trim();
            if cancel.is_cancelled() {
                return StressOutcome::Cancelled { test_number };
            }

            let reference = exec
                .execute(
                    &plan.reference.code,
                    plan.reference.language,
                    input,
                    plan.reference_timeout,
                )
                .await;
            if reference.exit_code != 0 && reference.compilation_error.is_none() {
                log::info!(
                    "Test #{}: reference program failed (exit code {}); skipped",
                    test_number,
                    reference.exit_code
                );
                on_event(StressEvent::ReferenceSkipped {
                    test_number,
                    result: &reference,
                });
                continue;
            }
            if cancel.is_cancelled() {
                return StressOutcome::Cancelled { test_number };
            }

            let candidate = exec
                .execute(
                    &plan.candidate.code,
                    plan.candidate.language,
                    input,
                    plan.candidate_timeout,
                )
                .await;

            let expected_output = reference.stdout.trim();
            let actual_output = candidate.stdout.trim();
            let result = StressResult {
                test_number,
                input: input.to_owned(),
                expected_output: expected_output.to_owned(),
                actual_output: actual_output.to_owned(),
                is_match: compare_outputs(expected_output, actual_output),
                time: candidate.execution_time,
            };
            self.results.push(result);
            let result = &self.results[self.results.len() - 1];
            on_event(StressEvent::Recorded(result));

            if !result.is_match {
                return StressOutcome::Found(result.clone());
            }
        }

        StressOutcome::Passed {
            iterations: plan.max_iterations,
        }
    }
}
