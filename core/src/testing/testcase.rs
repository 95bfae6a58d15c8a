use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::verdict::Verdict;
use crate::util;

/// One input with its expected output, plus the outcome of the latest run.
///
/// `actual_output` is present exactly when the verdict is a judged one; every
/// mutation goes through methods that keep that true.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    pub id: String,
    input: String,
    expected_output: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    actual_output: Option<String>,
    #[serde(default)]
    verdict: Verdict,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    execution_time_ms: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    memory_used: Option<u64>,
    #[serde(default)]
    pub is_custom: bool,
}

impl TestCase {
    /// Testcase imported with input and expected output pre-filled.
    pub fn new(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            id: util::generate_id(),
            input: input.into(),
            expected_output: expected_output.into(),
            actual_output: None,
            verdict: Verdict::Pending,
            execution_time_ms: None,
            memory_used: None,
            is_custom: false,
        }
    }

    /// Testcase written by the user.
    pub fn custom(input: impl Into<String>, expected_output: impl Into<String>) -> Self {
        Self {
            is_custom: true,
            ..Self::new(input, expected_output)
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn expected_output(&self) -> &str {
        &self.expected_output
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn actual_output(&self) -> Option<&str> {
        self.actual_output.as_deref()
    }

    pub fn execution_time(&self) -> Option<Duration> {
        self.execution_time_ms.map(Duration::from_millis)
    }

    pub fn memory_used(&self) -> Option<u64> {
        self.memory_used
    }

    /// Replaces input and/or expected output. Any previous result is discarded.
    pub fn edit(&mut self, input: Option<String>, expected_output: Option<String>) {
        if let Some(input) = input {
            self.input = input;
        }
        if let Some(expected) = expected_output {
            self.expected_output = expected;
        }
        self.reset();
    }

    pub fn reset(&mut self) {
        self.verdict = Verdict::Pending;
        self.actual_output = None;
        self.execution_time_ms = None;
        self.memory_used = None;
    }

    pub(crate) fn mark_running(&mut self) {
        self.reset();
        self.verdict = Verdict::Running;
    }

    pub(crate) fn record(
        &mut self,
        verdict: Verdict,
        actual_output: String,
        execution_time: Duration,
        memory_used: u64,
    ) {
        debug_assert!(verdict.is_judged());
        self.verdict = verdict;
        self.actual_output = Some(actual_output);
        self.execution_time_ms = Some(util::millis(execution_time));
        self.memory_used = Some(memory_used);
    }
}
