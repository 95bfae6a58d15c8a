use std::sync::Arc;

use cph_webclient::{ExecutionResult, Executor};
use tokio_util::sync::CancellationToken;

use super::{
    gate::ExecutionGate,
    result::{RunSummary, TestOutcome},
    source::SourceCode,
    stress::{StressEvent, StressOutcome, StressSearchLoop},
    verdict::classify,
};
use crate::storage::{Problem, Submission, SubmissionHistory};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RunError {
    #[error("Problem {problem_id:?} already has a run in progress")]
    AlreadyRunning { problem_id: String },

    #[error("Problem {problem_id:?} has no testcase {testcase_id:?}")]
    NoSuchTestcase {
        problem_id: String,
        testcase_id: String,
    },
}

/// Runs a solution against the testcases of a problem, one execution at a time.
pub struct TestRunner<E> {
    executor: Arc<E>,
    gate: Arc<ExecutionGate>,
}

impl<E> Clone for TestRunner<E> {
    fn clone(&self) -> Self {
        Self {
            executor: self.executor.clone(),
            gate: self.gate.clone(),
        }
    }
}

impl<E: Executor> TestRunner<E> {
    pub fn new(executor: Arc<E>) -> Self {
        Self::with_gate(executor, Arc::new(ExecutionGate::new()))
    }

    /// Runner sharing the in-flight bookkeeping of `gate` with other runners.
    pub fn with_gate(executor: Arc<E>, gate: Arc<ExecutionGate>) -> Self {
        Self { executor, gate }
    }

    pub fn executor(&self) -> &Arc<E> {
        &self.executor
    }

    pub fn gate(&self) -> &Arc<ExecutionGate> {
        &self.gate
    }

    pub fn is_running(&self, problem_id: &str) -> bool {
        self.gate.is_running(problem_id)
    }

    pub async fn run_one(
        &self,
        problem: &mut Problem,
        testcase_id: &str,
        src: &SourceCode,
        history: &mut SubmissionHistory,
    ) -> Result<TestOutcome, RunError> {
        let _permit = self.gate.try_acquire(&problem.id)?;
        self.run_testcase(problem, testcase_id, src, history).await
    }

    pub async fn run_all(
        &self,
        problem: &mut Problem,
        src: &SourceCode,
        history: &mut SubmissionHistory,
    ) -> Result<RunSummary, RunError> {
        self.run_all_with_progress(problem, src, history, |_, _| {})
            .await
    }

    /// Runs every testcase in list order. `on_finished(index, outcome)` is called as
    /// each one completes.
    ///
    /// The problem is marked solved if every testcase is accepted afterwards.
    pub async fn run_all_with_progress(
        &self,
        problem: &mut Problem,
        src: &SourceCode,
        history: &mut SubmissionHistory,
        mut on_finished: impl FnMut(usize, &TestOutcome),
    ) -> Result<RunSummary, RunError> {
        let _permit = self.gate.try_acquire(&problem.id)?;

        let ids: Vec<String> = problem.test_cases.iter().map(|t| t.id.clone()).collect();
        let mut outcomes = Vec::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            let outcome = self.run_testcase(problem, id, src, history).await?;
            on_finished(i, &outcome);
            outcomes.push(outcome);
        }

        let newly_solved = problem.all_accepted() && problem.mark_solved();
        if newly_solved {
            log::info!("Problem {:?} solved", problem.title);
        }
        Ok(RunSummary {
            outcomes,
            newly_solved,
        })
    }

    /// Runs a stress search on behalf of `problem_id`, holding its execution slot.
    pub async fn run_stress(
        &self,
        problem_id: &str,
        stress: &mut StressSearchLoop<E>,
        cancel: &CancellationToken,
        on_event: impl FnMut(StressEvent<'_>),
    ) -> Result<StressOutcome, RunError> {
        let _permit = self.gate.try_acquire(problem_id)?;
        Ok(stress.run_with(cancel, on_event).await)
    }

    async fn run_testcase(
        &self,
        problem: &mut Problem,
        testcase_id: &str,
        src: &SourceCode,
        history: &mut SubmissionHistory,
    ) -> Result<TestOutcome, RunError> {
        let time_limit = problem.time_limit();
        let problem_id = problem.id.clone();
        let Some(testcase) = problem.testcase_mut(testcase_id) else {
            return Err(RunError::NoSuchTestcase {
                problem_id,
                testcase_id: testcase_id.to_owned(),
            });
        };

        testcase.mark_running();
        let result = self
            .executor
            .execute(&src.code, src.language, testcase.input(), time_limit)
            .await;
        let verdict = classify(testcase, &result);
        log::debug!(
            "Testcase {}: {} in {}ms (exit code {})",
            testcase.id,
            verdict,
            result.execution_time.as_millis(),
            result.exit_code
        );

        testcase.record(
            verdict,
            displayed_output(&result).to_owned(),
            result.execution_time,
            result.memory_used,
        );
        history.push(Submission::new(
            problem_id,
            src.language,
            &src.code,
            verdict,
            result.execution_time,
        ));

        Ok(TestOutcome {
            testcase_id: testcase.id.clone(),
            verdict,
            execution_time: result.execution_time,
            result,
        })
    }
}

/// Text shown as the program's output: the compile diagnostic if any, then stderr,
/// then stdout.
pub fn displayed_output(result: &ExecutionResult) -> &str {
    match &result.compilation_error {
        Some(diagnostic) if !diagnostic.is_empty() => diagnostic,
        _ if !result.stderr.is_empty() => &result.stderr,
        _ => &result.stdout,
    }
}
