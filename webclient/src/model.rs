use std::{path::Path, time::Duration};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use reqwest::Url;

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Language {
    Cpp,
    Python,
    Java,
    JavaScript,
}

impl Language {
    /// Language identifier understood by Piston.
    pub const fn piston_id(&self) -> &'static str {
        use Language::*;
        match self {
            Cpp => "c++",
            Python => "python",
            Java => "java",
            JavaScript => "javascript",
        }
    }

    pub const fn source_filename(&self) -> &'static str {
        use Language::*;
        match self {
            Cpp => "main.cpp",
            Python => "main.py",
            Java => "Main.java",
            JavaScript => "main.js",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        use Language::*;
        match ext.to_ascii_lowercase().as_str() {
            "cpp" | "cc" | "cxx" => Some(Cpp),
            "py" => Some(Python),
            "java" => Some(Java),
            "js" | "mjs" => Some(JavaScript),
            _ => None,
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?;
        Self::from_extension(ext)
    }
}

/// An entry of `GET /runtimes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Runtime {
    pub language: String,
    pub version: String,
    #[serde(default)]
    pub aliases: Vec<String>,
}

impl Runtime {
    fn is_named(&self, name: &str) -> bool {
        self.language == name || self.aliases.iter().any(|a| a == name)
    }

    pub fn matches(&self, lang: Language) -> bool {
        self.is_named(lang.piston_id()) || self.is_named(&lang.to_string())
    }
}

/// Returns the version of the first runtime serving `lang`.
pub fn find_runtime_version(runtimes: &[Runtime], lang: Language) -> Option<&str> {
    runtimes
        .iter()
        .find(|r| r.matches(lang))
        .map(|r| r.version.as_str())
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFile<'a> {
    pub name: &'a str,
    pub content: &'a str,
}

/// Body of `POST /execute`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExecuteRequest<'a> {
    pub language: &'a str,
    pub version: &'a str,
    pub files: Vec<SourceFile<'a>>,
    pub stdin: &'a str,
    pub compile_timeout: u64,
    pub run_timeout: u64,
    pub compile_memory_limit: i64,
    pub run_memory_limit: i64,
}

impl<'a> ExecuteRequest<'a> {
    pub const UNLIMITED_MEMORY: i64 = -1;

    pub fn new(
        lang: Language,
        version: &'a str,
        code: &'a str,
        stdin: &'a str,
        compile_timeout: Duration,
        run_timeout: Duration,
    ) -> Self {
        Self {
            language: lang.piston_id(),
            version,
            files: vec![SourceFile {
                name: lang.source_filename(),
                content: code,
            }],
            stdin,
            compile_timeout: compile_timeout.as_millis() as u64,
            run_timeout: run_timeout.as_millis() as u64,
            compile_memory_limit: Self::UNLIMITED_MEMORY,
            run_memory_limit: Self::UNLIMITED_MEMORY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StageOutput {
    #[serde(default)]
    pub stdout: String,
    #[serde(default)]
    pub stderr: String,
    #[serde(default)]
    pub output: String,
    #[serde(default)]
    pub code: Option<i32>,
    #[serde(default)]
    pub signal: Option<String>,
    #[serde(default)]
    pub memory: Option<u64>,
}

/// Response of `POST /execute`.
/// `compile` is present only for compiled languages.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExecuteResponse {
    pub run: StageOutput,
    #[serde(default)]
    pub compile: Option<StageOutput>,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub execution_time: Duration,
    pub memory_used: u64,
    pub timed_out: bool,
    pub compilation_error: Option<String>,
}

impl ExecutionResult {
    pub const FAILURE_EXIT_CODE: i32 = -1;
    pub const TIMED_OUT_MESSAGE: &str = "Execution timed out";
    const KILL_SIGNAL: &str = "SIGKILL";

    /// Projects a Piston response into a result.
    /// `elapsed` is the wall time of the request, `timeout` the requested run timeout.
    pub fn from_response(resp: ExecuteResponse, elapsed: Duration, timeout: Duration) -> Self {
        if let Some(compile) = resp.compile.filter(|c| c.code != Some(0)) {
            let diagnostic = if compile.stderr.is_empty() {
                compile.output
            } else {
                compile.stderr
            };
            return Self {
                stdout: String::new(),
                stderr: diagnostic.clone(),
                exit_code: compile.code.unwrap_or(Self::FAILURE_EXIT_CODE),
                execution_time: elapsed,
                memory_used: 0,
                timed_out: false,
                compilation_error: Some(diagnostic),
            };
        }

        let run = resp.run;
        let killed = run.signal.as_deref() == Some(Self::KILL_SIGNAL);
        Self {
            stdout: run.stdout,
            stderr: run.stderr,
            exit_code: run.code.unwrap_or(Self::FAILURE_EXIT_CODE),
            execution_time: elapsed,
            memory_used: run.memory.unwrap_or(0),
            timed_out: killed || elapsed > timeout,
            compilation_error: None,
        }
    }

    /// Result of a request cancelled by the client-side deadline.
    pub fn aborted(elapsed: Duration) -> Self {
        Self {
            timed_out: true,
            ..Self::failure(Self::TIMED_OUT_MESSAGE, elapsed)
        }
    }

    /// Result of a transport or service failure.
    pub fn failure(message: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: Self::FAILURE_EXIT_CODE,
            execution_time: elapsed,
            memory_used: 0,
            timed_out: false,
            compilation_error: None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0 && self.compilation_error.is_none() && !self.timed_out
    }
}

/// Runs one program with one stdin. Never fails: every fault is encoded in the result.
#[async_trait]
pub trait Executor: Send + Sync {
    async fn execute(
        &self,
        code: &str,
        lang: Language,
        stdin: &str,
        timeout: Duration,
    ) -> ExecutionResult;
}

#[cfg(test)]
mod test {
    use std::str::FromStr;

    use super::*;

    const TIMEOUT: Duration = Duration::from_millis(2000);
    const ELAPSED: Duration = Duration::from_millis(150);

    fn response(json: serde_json::Value) -> ExecuteResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn language_names() {
        assert_eq!(Language::from_str("cpp").unwrap(), Language::Cpp);
        assert_eq!(Language::from_str("JavaScript").unwrap(), Language::JavaScript);
        assert_eq!(Language::JavaScript.to_string(), "javascript");
        assert_eq!(Language::from_path("a/b/main.cc"), Some(Language::Cpp));
        assert_eq!(Language::from_path("gen.py"), Some(Language::Python));
        assert_eq!(Language::from_path("README"), None);
    }

    #[test]
    fn request_body_is_piston_shaped() {
        let req = ExecuteRequest::new(
            Language::Cpp,
            "10.2.0",
            "int main(){}",
            "1 2\n",
            Duration::from_secs(10),
            Duration::from_millis(2500),
        );
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            serde_json::json!({
                "language": "c++",
                "version": "10.2.0",
                "files": [{ "name": "main.cpp", "content": "int main(){}" }],
                "stdin": "1 2\n",
                "compile_timeout": 10000,
                "run_timeout": 2500,
                "compile_memory_limit": -1,
                "run_memory_limit": -1,
            })
        );
    }

    #[test]
    fn runtime_version_matches_id_or_alias() {
        let runtimes = vec![
            Runtime {
                language: "python".into(),
                version: "3.10.0".into(),
                aliases: vec!["py".into()],
            },
            Runtime {
                language: "gcc".into(),
                version: "10.2.0".into(),
                aliases: vec!["c++".into(), "cpp".into()],
            },
        ];
        assert_eq!(find_runtime_version(&runtimes, Language::Python), Some("3.10.0"));
        assert_eq!(find_runtime_version(&runtimes, Language::Cpp), Some("10.2.0"));
        assert_eq!(find_runtime_version(&runtimes, Language::Java), None);
    }

    #[test]
    fn compile_error_is_reported_as_diagnostic() {
        let resp = response(serde_json::json!({
            "language": "c++",
            "version": "10.2.0",
            "compile": { "stdout": "", "stderr": "main.cpp:1: error", "output": "main.cpp:1: error", "code": 1, "signal": null },
            "run": { "stdout": "", "stderr": "", "output": "", "code": null, "signal": null },
        }));
        let res = ExecutionResult::from_response(resp, ELAPSED, TIMEOUT);
        assert_eq!(res.compilation_error.as_deref(), Some("main.cpp:1: error"));
        assert_eq!(res.stderr, "main.cpp:1: error");
        assert_eq!(res.stdout, "");
        assert_eq!(res.exit_code, 1);
        assert!(!res.timed_out);
    }

    #[test]
    fn compile_diagnostic_falls_back_to_output() {
        let resp = response(serde_json::json!({
            "compile": { "stdout": "", "stderr": "", "output": "javac failed", "code": 2, "signal": null },
            "run": { "stdout": "", "stderr": "", "code": 0, "signal": null },
        }));
        let res = ExecutionResult::from_response(resp, ELAPSED, TIMEOUT);
        assert_eq!(res.compilation_error.as_deref(), Some("javac failed"));
    }

    #[test]
    fn successful_compile_is_ignored() {
        let resp = response(serde_json::json!({
            "compile": { "stdout": "", "stderr": "warning: unused", "output": "", "code": 0, "signal": null },
            "run": { "stdout": "42\n", "stderr": "", "output": "42\n", "code": 0, "signal": null, "memory": 2048 },
        }));
        let res = ExecutionResult::from_response(resp, ELAPSED, TIMEOUT);
        assert_eq!(res.compilation_error, None);
        assert_eq!(res.stdout, "42\n");
        assert_eq!(res.exit_code, 0);
        assert_eq!(res.memory_used, 2048);
        assert!(res.is_success());
    }

    #[test]
    fn kill_signal_means_timed_out() {
        let resp = response(serde_json::json!({
            "run": { "stdout": "", "stderr": "", "output": "", "code": null, "signal": "SIGKILL" },
        }));
        let res = ExecutionResult::from_response(resp, ELAPSED, TIMEOUT);
        assert!(res.timed_out);
        assert_eq!(res.exit_code, -1);
    }

    #[test]
    fn slow_wall_time_means_timed_out() {
        let resp = response(serde_json::json!({
            "run": { "stdout": "1\n", "stderr": "", "code": 0, "signal": null },
        }));
        let res = ExecutionResult::from_response(resp, TIMEOUT + Duration::from_millis(1), TIMEOUT);
        assert!(res.timed_out);
        assert_eq!(res.exit_code, 0);
    }

    #[test]
    fn aborted_and_failure_results() {
        let res = ExecutionResult::aborted(ELAPSED);
        assert!(res.timed_out);
        assert_eq!(res.exit_code, -1);
        assert_eq!(res.stderr, "Execution timed out");

        let res = ExecutionResult::failure("connection refused", ELAPSED);
        assert!(!res.timed_out);
        assert_eq!(res.exit_code, -1);
        assert_eq!(res.stderr, "connection refused");
    }
}
