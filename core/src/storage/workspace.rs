use std::path::{Path, PathBuf};

use anyhow::{bail, Context as _};

use super::{history::SubmissionHistory, problem::Problem};

/// Directory holding one problem and its submission history.
#[derive(Debug, Clone)]
pub struct ProblemWorkspace {
    dir: PathBuf,
}

impl ProblemWorkspace {
    pub const PROBLEM_FILENAME: &str = "problem.json";
    pub const HISTORY_FILENAME: &str = "submissions.json";

    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn problem_filepath(&self) -> PathBuf {
        self.dir.join(Self::PROBLEM_FILENAME)
    }

    pub fn history_filepath(&self) -> PathBuf {
        self.dir.join(Self::HISTORY_FILENAME)
    }

    pub fn exists(&self) -> bool {
        self.problem_filepath().is_file()
    }

    pub fn create(&self, problem: &Problem) -> anyhow::Result<()> {
        if self.exists() {
            bail!(
                "Problem already exists in {:?}.\nIf it's intentional, remove it and then try again.",
                self.problem_filepath()
            );
        }
        self.save_problem(problem)
    }

    pub fn load_problem(&self) -> anyhow::Result<Problem> {
        fsutil::read_json_with_deserialize(self.problem_filepath()).with_context(|| {
            format!(
                "Failed to load problem (Hint: create one with `cph new` in {:?})",
                self.dir
            )
        })
    }

    pub fn save_problem(&self, problem: &Problem) -> anyhow::Result<()> {
        fsutil::write_json_with_mkdir(self.problem_filepath(), problem)
            .context("Failed to save problem")
    }

    /// A missing history file yields an empty history.
    pub fn load_history(&self, capacity: usize) -> anyhow::Result<SubmissionHistory> {
        let mut h: SubmissionHistory = fsutil::read_json_or_default(self.history_filepath())
            .context("Failed to load submission history")?;
        h.set_capacity(capacity);
        Ok(h)
    }

    pub fn save_history(&self, h: &SubmissionHistory) -> anyhow::Result<()> {
        fsutil::write_json_with_mkdir(self.history_filepath(), h)
            .context("Failed to save submission history")
    }
}

#[cfg(test)]
mod test {
    use std::time::Duration;

    use cph_webclient::Language;

    use super::*;
    use crate::{
        storage::Submission,
        testing::{TestCase, Verdict},
    };

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("cph-ws-{}-{}", std::process::id(), name));
        let _ = std::fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn problem_and_history_roundtrip() {
        let dir = scratch_dir("roundtrip");
        let ws = ProblemWorkspace::new(&dir);
        assert!(!ws.exists());

        let problem = Problem::new("A").with_testcases([TestCase::new("1\n", "1\n")]);
        ws.create(&problem).unwrap();
        assert!(ws.exists());
        assert!(ws.create(&problem).is_err());
        assert_eq!(ws.load_problem().unwrap(), problem);

        let mut h = ws.load_history(5).unwrap();
        assert!(h.is_empty());
        h.push(Submission::new(&problem.id, Language::Python, "print(1)", Verdict::AC, Duration::ZERO));
        ws.save_history(&h).unwrap();
        assert_eq!(ws.load_history(5).unwrap(), h);
        assert_eq!(ws.load_history(0).unwrap().len(), 0);

        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn missing_problem_is_an_error() {
        let ws = ProblemWorkspace::new(scratch_dir("missing"));
        assert!(ws.load_problem().is_err());
    }
}
