use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use tokio::time::Instant;
use url::Url;

use super::{runtime::RuntimeCache, urls};
use crate::{
    error::*,
    http::{self, UrlGlob},
    model::*,
    util,
};

pub struct PistonClient {
    http: http::Client,
    base_url: Url,
    endpoint_glob: UrlGlob,
    compile_timeout: Duration,
    grace_period: Duration,
    runtimes_timeout: Duration,
    runtimes: RuntimeCache,
}

impl PistonClient {
    pub const DEFAULT_COMPILE_TIMEOUT: Duration = Duration::from_millis(10000);
    pub const DEFAULT_GRACE_PERIOD: Duration = Duration::from_millis(5000);
    pub const DEFAULT_REQUEST_INTERVAL: Duration = Duration::from_millis(200);
    pub const DEFAULT_RUNTIMES_TIMEOUT: Duration = Duration::from_millis(10000);
    pub const WILDCARD_VERSION: &str = "*";

    pub fn new(base_url: &str) -> Result<Self> {
        let base_url = util::parse_url(base_url)?;
        let glob = urls::endpoint_glob(&base_url);
        let endpoint_glob = UrlGlob::new(&glob).map_err(|e| Error::InvalidUrlGlob(glob, e))?;
        let http = http::Client::new([(endpoint_glob.clone(), Self::DEFAULT_REQUEST_INTERVAL)])?;
        Ok(Self {
            http,
            base_url,
            endpoint_glob,
            compile_timeout: Self::DEFAULT_COMPILE_TIMEOUT,
            grace_period: Self::DEFAULT_GRACE_PERIOD,
            runtimes_timeout: Self::DEFAULT_RUNTIMES_TIMEOUT,
            runtimes: RuntimeCache::new(),
        })
    }

    pub fn compile_timeout(mut self, timeout: Duration) -> Self {
        self.compile_timeout = timeout;
        self
    }

    /// Extra time granted beyond the run timeout before the request is abandoned.
    pub fn grace_period(mut self, grace: Duration) -> Self {
        self.grace_period = grace;
        self
    }

    /// Upper bound for fetching the runtime list.
    pub fn runtimes_timeout(mut self, timeout: Duration) -> Self {
        self.runtimes_timeout = timeout;
        self
    }

    /// Minimum interval between two requests to the service.
    pub fn request_interval(mut self, interval: Duration) -> Self {
        self.http
            .set_request_interval(self.endpoint_glob.clone(), interval);
        self
    }

    pub fn get_base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn get_compile_timeout(&self) -> Duration {
        self.compile_timeout
    }

    pub fn get_grace_period(&self) -> Duration {
        self.grace_period
    }

    pub async fn fetch_runtimes(&self) -> Result<Vec<Runtime>> {
        let url = urls::runtimes_url(&self.base_url)?;
        let requested_url = url.to_string();
        let started_at = Instant::now();
        match tokio::time::timeout(self.runtimes_timeout, util::fetch_json(&self.http, url)).await {
            Ok(res) => res,
            Err(_) => Err(Error::Aborted {
                requested_url,
                elapsed: started_at.elapsed(),
            }),
        }
    }

    /// Runtime list, fetched on first use and then kept.
    pub async fn runtimes(&self) -> Result<Arc<[Runtime]>> {
        self.runtimes.get_or_fetch(|| self.fetch_runtimes()).await
    }

    /// Fetches the runtime list again and replaces the cached one.
    pub async fn refresh_runtimes(&self) -> Result<Arc<[Runtime]>> {
        let runtimes = self.fetch_runtimes().await?;
        Ok(self.runtimes.replace(runtimes).await)
    }

    pub async fn resolve_version(&self, lang: Language) -> String {
        let runtimes = match self.runtimes().await {
            Ok(runtimes) => runtimes,
            Err(e) => {
                log::warn!("Failed to fetch runtimes: {:#}", e);
                return Self::WILDCARD_VERSION.to_owned();
            }
        };
        match find_runtime_version(&runtimes, lang) {
            Some(version) => version.to_owned(),
            None => {
                log::warn!(
                    "No runtime found for '{}'; using version '{}'",
                    lang.piston_id(),
                    Self::WILDCARD_VERSION
                );
                Self::WILDCARD_VERSION.to_owned()
            }
        }
    }

    /// Sends the execute request and returns the response together with the time
    /// elapsed since dispatch. Waiting for the request interval is not counted.
    async fn post_execute(
        &self,
        req: &ExecuteRequest<'_>,
        deadline: Duration,
    ) -> (Result<ExecuteResponse>, Duration) {
        let url = match urls::execute_url(&self.base_url) {
            Ok(url) => url,
            Err(e) => return (Err(e), Duration::ZERO),
        };
        let throttled = match util::throttled_post(&self.http, url.clone(), req).await {
            Ok(throttled) => throttled,
            Err(e) => return (Err(e), Duration::ZERO),
        };

        let started_at = Instant::now();
        let res = match tokio::time::timeout(deadline, util::send_json(throttled, &url)).await {
            Ok(res) => res,
            Err(_) => Err(Error::Aborted {
                requested_url: url.to_string(),
                elapsed: started_at.elapsed(),
            }),
        };
        (res, started_at.elapsed())
    }
}

#[async_trait]
impl Executor for PistonClient {
    async fn execute(
        &self,
        code: &str,
        lang: Language,
        stdin: &str,
        timeout: Duration,
    ) -> ExecutionResult {
        let version = self.resolve_version(lang).await;
        let req = ExecuteRequest::new(lang, &version, code, stdin, self.compile_timeout, timeout);

        let (res, elapsed) = self.post_execute(&req, timeout + self.grace_period).await;

        match res {
            Ok(resp) => ExecutionResult::from_response(resp, elapsed, timeout),
            Err(e @ Error::Aborted { .. }) => {
                log::warn!("{}", e);
                ExecutionResult::aborted(elapsed)
            }
            Err(e) => {
                log::warn!("Execution request failed: {}", e);
                ExecutionResult::failure(e.to_string(), elapsed)
            }
        }
    }
}
