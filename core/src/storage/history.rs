use std::{collections::VecDeque, time::Duration};

use chrono::{DateTime, Local};
use cph_webclient::Language;
use serde::{Deserialize, Serialize};

use crate::{testing::Verdict, util};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    pub id: String,
    pub problem_id: String,
    pub language: Language,
    pub code: String,
    pub verdict: Verdict,
    pub timestamp: DateTime<Local>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub execution_time_ms: Option<u64>,
}

impl Submission {
    pub fn new(
        problem_id: impl Into<String>,
        language: Language,
        code: impl Into<String>,
        verdict: Verdict,
        execution_time: Duration,
    ) -> Self {
        Self {
            id: util::generate_id(),
            problem_id: problem_id.into(),
            language,
            code: code.into(),
            verdict,
            timestamp: Local::now(),
            execution_time_ms: Some(util::millis(execution_time)),
        }
    }
}

/// Most recent submissions, newest first. Older entries fall off once `capacity` is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionHistory {
    capacity: usize,
    entries: VecDeque<Submission>,
}

impl Default for SubmissionHistory {
    fn default() -> Self {
        Self::with_capacity(Self::DEFAULT_CAPACITY)
    }
}

impl SubmissionHistory {
    pub const DEFAULT_CAPACITY: usize = 100;

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinking drops the oldest entries.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.entries.truncate(capacity);
    }

    pub fn push(&mut self, s: Submission) {
        self.entries.push_front(s);
        self.entries.truncate(self.capacity);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn latest(&self) -> Option<&Submission> {
        self.entries.front()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Submission> {
        self.entries.iter()
    }

    pub fn for_problem<'a>(&'a self, problem_id: &'a str) -> impl Iterator<Item = &'a Submission> {
        self.entries.iter().filter(move |s| s.problem_id == problem_id)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn submission(problem_id: &str, verdict: Verdict) -> Submission {
        Submission::new(problem_id, Language::Cpp, "int main(){}", verdict, Duration::from_millis(3))
    }

    #[test]
    fn keeps_newest_entries_only() {
        let mut h = SubmissionHistory::with_capacity(3);
        for v in [Verdict::WA, Verdict::TLE, Verdict::RTE, Verdict::AC] {
            h.push(submission("p", v));
        }
        let verdicts: Vec<_> = h.iter().map(|s| s.verdict).collect();
        assert_eq!(verdicts, vec![Verdict::AC, Verdict::RTE, Verdict::TLE]);
        assert_eq!(h.latest().unwrap().verdict, Verdict::AC);
    }

    #[test]
    fn shrinking_capacity_truncates() {
        let mut h = SubmissionHistory::default();
        for _ in 0..10 {
            h.push(submission("p", Verdict::AC));
        }
        h.set_capacity(4);
        assert_eq!(h.len(), 4);
    }

    #[test]
    fn filter_by_problem() {
        let mut h = SubmissionHistory::default();
        h.push(submission("a", Verdict::AC));
        h.push(submission("b", Verdict::WA));
        h.push(submission("a", Verdict::CE));
        assert_eq!(h.for_problem("a").count(), 2);
        assert_eq!(h.for_problem("c").count(), 0);
    }
}
