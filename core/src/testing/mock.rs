//! Scripted executor for unit tests.

use std::{
    sync::Mutex,
    time::Duration,
};

use async_trait::async_trait;
use cph_webclient::{ExecutionResult, Executor, Language};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Call {
    pub code: String,
    pub lang: Language,
    pub stdin: String,
    pub timeout: Duration,
}

/// Answers each call with `script(code, stdin)` and records the call.
pub struct ScriptedExecutor<F> {
    script: F,
    calls: Mutex<Vec<Call>>,
}

impl<F> ScriptedExecutor<F>
where
    F: Fn(&str, &str) -> ExecutionResult + Send + Sync,
{
    pub fn new(script: F) -> Self {
        Self {
            script,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_of(&self, code: &str) -> usize {
        self.calls().iter().filter(|c| c.code == code).count()
    }
}

#[async_trait]
impl<F> Executor for ScriptedExecutor<F>
where
    F: Fn(&str, &str) -> ExecutionResult + Send + Sync,
{
    async fn execute(
        &self,
        code: &str,
        lang: Language,
        stdin: &str,
        timeout: Duration,
    ) -> ExecutionResult {
        self.calls.lock().unwrap().push(Call {
            code: code.to_owned(),
            lang,
            stdin: stdin.to_owned(),
            timeout,
        });
        tokio::task::yield_now().await;
        (self.script)(code, stdin)
    }
}

pub fn ok(stdout: &str) -> ExecutionResult {
    ExecutionResult {
        stdout: stdout.to_owned(),
        stderr: String::new(),
        exit_code: 0,
        execution_time: Duration::from_millis(7),
        memory_used: 0,
        timed_out: false,
        compilation_error: None,
    }
}

pub fn runtime_error(stderr: &str) -> ExecutionResult {
    ExecutionResult {
        stderr: stderr.to_owned(),
        exit_code: 1,
        ..ok("")
    }
}

pub fn compile_error(diagnostic: &str) -> ExecutionResult {
    ExecutionResult {
        stderr: diagnostic.to_owned(),
        exit_code: 1,
        compilation_error: Some(diagnostic.to_owned()),
        ..ok("")
    }
}

pub fn timed_out() -> ExecutionResult {
    ExecutionResult::aborted(Duration::from_millis(3000))
}
