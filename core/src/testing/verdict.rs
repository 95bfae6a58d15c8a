use cph_webclient::ExecutionResult;
use serde::{Deserialize, Serialize};

use super::{compare::compare_outputs, testcase::TestCase};

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Verdict {
    AC,
    WA,
    TLE,
    RTE,
    CE,
    #[default]
    Pending,
    Running,
}

impl Verdict {
    /// `false` while the testcase has not been judged yet.
    pub fn is_judged(&self) -> bool {
        !matches!(self, Verdict::Pending | Verdict::Running)
    }

    pub fn is_accepted(&self) -> bool {
        *self == Verdict::AC
    }
}

/// Judges one execution of `testcase`.
///
/// Failures of the execution itself outrank the output comparison, so a crashed or
/// timed-out run is never accepted because its stdout happens to match.
/// A testcase without expected output is accepted as long as the run succeeded.
pub fn classify(testcase: &TestCase, result: &ExecutionResult) -> Verdict {
    use Verdict::*;
    if result.compilation_error.is_some() {
        return CE;
    }
    if result.timed_out {
        return TLE;
    }
    if result.exit_code != 0 {
        return RTE;
    }
    if testcase.expected_output().is_empty() {
        return AC;
    }
    if compare_outputs(testcase.expected_output(), &result.stdout) {
        AC
    } else {
        WA
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use super::*;

    fn run(stdout: &str) -> ExecutionResult {
        ExecutionResult {
            stdout: stdout.into(),
            stderr: String::new(),
            exit_code: 0,
            execution_time: Duration::from_millis(10),
            memory_used: 0,
            timed_out: false,
            compilation_error: None,
        }
    }

    fn testcase(expected: &str) -> TestCase {
        TestCase::new("1 2\n", expected)
    }

    #[test]
    fn accepted_and_wrong_answer() {
        assert_eq!(classify(&testcase("3\n"), &run("3")), Verdict::AC);
        assert_eq!(classify(&testcase("3\n"), &run("4\n")), Verdict::WA);
    }

    #[test]
    fn compile_error_wins_even_if_stdout_matches() {
        let res = ExecutionResult {
            compilation_error: Some("error".into()),
            timed_out: true,
            exit_code: 1,
            ..run("3\n")
        };
        assert_eq!(classify(&testcase("3\n"), &res), Verdict::CE);
    }

    #[test]
    fn timeout_wins_over_matching_stdout() {
        let res = ExecutionResult {
            timed_out: true,
            ..run("3\n")
        };
        assert_eq!(classify(&testcase("3\n"), &res), Verdict::TLE);

        let res = ExecutionResult {
            timed_out: true,
            exit_code: -1,
            ..run("")
        };
        assert_eq!(classify(&testcase("3\n"), &res), Verdict::TLE);
    }

    #[test]
    fn nonzero_exit_is_runtime_error() {
        let res = ExecutionResult {
            exit_code: 139,
            ..run("3\n")
        };
        assert_eq!(classify(&testcase("3\n"), &res), Verdict::RTE);
    }

    #[test]
    fn no_expected_output_is_display_only() {
        assert_eq!(classify(&testcase(""), &run("anything\n")), Verdict::AC);

        let res = ExecutionResult {
            exit_code: 1,
            ..run("")
        };
        assert_eq!(classify(&testcase(""), &res), Verdict::RTE);
    }

    #[test]
    fn verdict_names() {
        assert_eq!(Verdict::RTE.to_string(), "RTE");
        assert_eq!(Verdict::Pending.to_string(), "PENDING");
        assert_eq!(serde_json::to_string(&Verdict::Running).unwrap(), "\"RUNNING\"");
        assert!(!Verdict::Running.is_judged());
        assert!(Verdict::WA.is_judged());
    }
}
