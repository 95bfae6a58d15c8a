use std::path::{Path, PathBuf};
use std::result::Result as StdResult;
use std::time::Duration;

use anyhow::Context as _;
use cph_webclient::{piston::urls, Language, PistonClient};
use rust_embed::RustEmbed;
use serde::Deserialize;

use crate::{storage::SubmissionHistory, testing::SourceCode, testing::StressPlan};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    #[serde(skip)]
    pub source_config_file: Option<PathBuf>,
    pub execution: ExecutionConfig,
    pub stress: StressConfig,
    pub history: HistoryConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ExecutionConfig {
    pub api_base_url: String,
    pub compile_timeout_ms: u64,
    pub grace_period_ms: u64,
    pub request_interval_ms: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct StressConfig {
    pub max_iterations: u32,
    pub generator_timeout_ms: u64,
    pub reference_timeout_ms: u64,
    pub candidate_timeout_ms: u64,
    pub generator_lang: Language,
    pub reference_lang: Language,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub max_submissions: usize,
}

impl Default for ExecutionConfig {
    fn default() -> Self {
        Self {
            api_base_url: urls::DEFAULT_BASE_URL.to_owned(),
            compile_timeout_ms: PistonClient::DEFAULT_COMPILE_TIMEOUT.as_millis() as u64,
            grace_period_ms: PistonClient::DEFAULT_GRACE_PERIOD.as_millis() as u64,
            request_interval_ms: PistonClient::DEFAULT_REQUEST_INTERVAL.as_millis() as u64,
        }
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            generator_timeout_ms: 5000,
            reference_timeout_ms: 10000,
            candidate_timeout_ms: 10000,
            generator_lang: Language::Python,
            reference_lang: Language::Cpp,
        }
    }
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            max_submissions: SubmissionHistory::DEFAULT_CAPACITY,
        }
    }
}

#[derive(RustEmbed)]
#[folder = "assets/"]
struct Asset;

impl Config {
    pub const FILENAME: &str = "cph.toml";

    pub fn example_toml() -> String {
        let file = Asset::get(Self::FILENAME).expect("cph.toml is embedded at build time");
        String::from_utf8_lossy(file.data.as_ref()).into_owned()
    }

    pub fn from_toml(s: &str) -> StdResult<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn from_toml_file(filepath: PathBuf) -> anyhow::Result<Self> {
        let toml = fsutil::read_to_string(&filepath).context("Cannot read a file")?;
        let mut cfg = Self::from_toml(&toml)
            .with_context(|| format!("Invalid config TOML: {:?}", filepath))?;
        cfg.source_config_file = Some(filepath);
        Ok(cfg)
    }

    /// Find config file ancestor dirs, including current dir.
    pub fn find_file_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<PathBuf> {
        let cur_dir = cur_dir.as_ref();
        cur_dir
            .ancestors()
            .map(|dir| dir.join(Self::FILENAME))
            .find(|path| path.is_file())
            .with_context(|| {
                format!(
                    "Not in a cph-repository dir: Cannot find '{}'",
                    Self::FILENAME
                )
            })
    }

    pub fn from_file_finding_in_ancestors(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        let config_filepath = Config::find_file_in_ancestors(cur_dir)?;
        Self::from_toml_file(config_filepath)
    }

    /// Like [`Config::from_file_finding_in_ancestors`], but falls back to the defaults
    /// when no config file exists. A config file that exists but is broken is still an error.
    pub fn load_or_default(cur_dir: impl AsRef<Path>) -> anyhow::Result<Self> {
        match Self::find_file_in_ancestors(cur_dir) {
            Ok(filepath) => Self::from_toml_file(filepath),
            Err(_) => {
                log::debug!("No {} found; using default config", Self::FILENAME);
                Ok(Self::default())
            }
        }
    }

    /// Directory containing the config file, if it was loaded from one.
    pub fn repository_root(&self) -> Option<&Path> {
        self.source_config_file.as_deref().and_then(Path::parent)
    }
}

impl ExecutionConfig {
    pub fn build_client(&self) -> anyhow::Result<PistonClient> {
        let client = PistonClient::new(&self.api_base_url)
            .with_context(|| format!("Invalid api_base_url: {:?}", self.api_base_url))?
            .compile_timeout(Duration::from_millis(self.compile_timeout_ms))
            .grace_period(Duration::from_millis(self.grace_period_ms))
            .request_interval(Duration::from_millis(self.request_interval_ms));
        Ok(client)
    }
}

impl StressConfig {
    pub const MAX_ITERATIONS_RANGE: std::ops::RangeInclusive<u32> = 1..=1000;

    pub fn clamp_iterations(n: u32) -> u32 {
        n.clamp(
            *Self::MAX_ITERATIONS_RANGE.start(),
            *Self::MAX_ITERATIONS_RANGE.end(),
        )
    }

    /// Builds a plan from the three programs. `max_iterations` overrides the
    /// configured count; either way it is clamped to [`Self::MAX_ITERATIONS_RANGE`].
    pub fn plan(
        &self,
        generator: SourceCode,
        reference: SourceCode,
        candidate: SourceCode,
        max_iterations: Option<u32>,
    ) -> StressPlan {
        StressPlan {
            generator,
            generator_timeout: Duration::from_millis(self.generator_timeout_ms),
            reference,
            reference_timeout: Duration::from_millis(self.reference_timeout_ms),
            candidate,
            candidate_timeout: Duration::from_millis(self.candidate_timeout_ms),
            max_iterations: Self::clamp_iterations(max_iterations.unwrap_or(self.max_iterations)),
        }
    }
}
