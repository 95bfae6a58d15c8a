use std::{collections::HashMap, time::Duration};

use cph_webclient::ExecutionResult;

use super::verdict::Verdict;

/// Outcome of running one testcase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestOutcome {
    pub testcase_id: String,
    pub verdict: Verdict,
    pub execution_time: Duration,
    pub result: ExecutionResult,
}

/// Outcome of running every testcase of a problem, in list order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<TestOutcome>,
    /// The problem was marked solved by this run.
    pub newly_solved: bool,
}

impl RunSummary {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn num_accepted(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| o.verdict.is_accepted())
            .count()
    }

    pub fn all_accepted(&self) -> bool {
        !self.is_empty() && self.num_accepted() == self.len()
    }

    pub fn count_by_verdict(&self) -> HashMap<Verdict, usize> {
        self.outcomes.iter().fold(HashMap::new(), |mut count, o| {
            *count.entry(o.verdict).or_default() += 1;
            count
        })
    }
}
