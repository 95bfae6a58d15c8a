use std::time::Duration;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::{
    testing::{StressResult, TestCase, Verdict},
    util,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub id: String,
    pub title: String,
    /// Seconds
    pub time_limit: f64,
    /// Megabytes
    pub memory_limit: u32,
    #[serde(default)]
    pub test_cases: Vec<TestCase>,
    #[serde(default)]
    pub is_solved: bool,
    pub created_at: DateTime<Local>,
    pub updated_at: DateTime<Local>,
}

impl Problem {
    pub const DEFAULT_TIME_LIMIT: f64 = 2.0;
    pub const DEFAULT_MEMORY_LIMIT: u32 = 256;

    pub fn new(title: impl Into<String>) -> Self {
        let now = Local::now();
        Self {
            id: util::generate_id(),
            title: title.into(),
            time_limit: Self::DEFAULT_TIME_LIMIT,
            memory_limit: Self::DEFAULT_MEMORY_LIMIT,
            test_cases: Vec::new(),
            is_solved: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn with_time_limit(mut self, secs: f64) -> Self {
        self.time_limit = secs;
        self
    }

    pub fn with_testcases(mut self, ts: impl IntoIterator<Item = TestCase>) -> Self {
        self.test_cases.extend(ts);
        self
    }

    pub fn time_limit(&self) -> Duration {
        Duration::try_from_secs_f64(self.time_limit).unwrap_or(Duration::ZERO)
    }

    fn touch(&mut self) {
        self.updated_at = Local::now();
    }

    pub fn testcase(&self, id: &str) -> Option<&TestCase> {
        self.test_cases.iter().find(|t| t.id == id)
    }

    pub fn testcase_mut(&mut self, id: &str) -> Option<&mut TestCase> {
        self.test_cases.iter_mut().find(|t| t.id == id)
    }

    pub fn add_testcase(&mut self, t: TestCase) -> &TestCase {
        self.test_cases.push(t);
        self.touch();
        &self.test_cases[self.test_cases.len() - 1]
    }

    /// Returns `false` if no testcase has the id.
    pub fn edit_testcase(
        &mut self,
        id: &str,
        input: Option<String>,
        expected_output: Option<String>,
    ) -> bool {
        let Some(t) = self.testcase_mut(id) else {
            return false
        };
        t.edit(input, expected_output);
        self.touch();
        true
    }

    pub fn delete_testcase(&mut self, id: &str) -> Option<TestCase> {
        let pos = self.test_cases.iter().position(|t| t.id == id)?;
        self.touch();
        Some(self.test_cases.remove(pos))
    }

    pub fn reset_testcases(&mut self) {
        self.test_cases.iter_mut().for_each(TestCase::reset);
    }

    /// Copies a counter-example found by the stress loop into a new custom testcase.
    pub fn promote_counterexample(&mut self, r: &StressResult) -> &TestCase {
        self.add_testcase(TestCase::custom(&r.input, &r.expected_output))
    }

    pub fn all_accepted(&self) -> bool {
        !self.test_cases.is_empty() && self.test_cases.iter().all(|t| t.verdict() == Verdict::AC)
    }

    /// Returns `true` if the problem was not solved before.
    pub fn mark_solved(&mut self) -> bool {
        if self.is_solved {
            return false;
        }
        self.is_solved = true;
        self.touch();
        true
    }
}
