use std::{sync::Arc, time::Duration};

use ::tokio::sync::Mutex;
use ::tokio::time::{Interval, MissedTickBehavior};
use serde::Serialize;

pub use ::reqwest::{Error, IntoUrl, Request, Response};
pub type UrlGlob = ::glob::Pattern;

/// Thin wrapper of `reqwest::Client` that keeps a minimum interval between
/// requests whose URL matches a glob.
#[derive(Clone)]
pub struct Client {
    inner: ::reqwest::Client,
    req_intervals: Vec<(UrlGlob, Arc<Mutex<Interval>>)>,
}

pub struct RequestBuilder {
    inner: ::reqwest::RequestBuilder,
    client: Client,
}

macro_rules! emit_request_fn {
    ($method:ident) => {
        pub fn $method(&self, u: impl IntoUrl) -> RequestBuilder {
            RequestBuilder::new(self.inner.$method(u), self.clone())
        }
    };
}

fn new_interval(dur: Duration) -> Arc<Mutex<Interval>> {
    let mut interval = ::tokio::time::interval(dur);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    Arc::new(Mutex::new(interval))
}

impl Client {
    pub fn new(
        url_wise_req_interval: impl IntoIterator<Item = (UrlGlob, Duration)>,
    ) -> Result<Self, Error> {
        let req_intervals = url_wise_req_interval
            .into_iter()
            .map(|(pat, dur)| (pat, new_interval(dur)))
            .collect();
        let inner = ::reqwest::Client::builder()
            .user_agent(concat!("cph/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .build()?;
        Ok(Self {
            inner,
            req_intervals,
        })
    }

    /// Replaces the interval registered for `pat`, or registers a new one.
    /// A zero duration removes the throttling.
    pub fn set_request_interval(&mut self, pat: UrlGlob, dur: Duration) {
        self.req_intervals.retain(|(p, _)| p != &pat);
        if !dur.is_zero() {
            self.req_intervals.push((pat, new_interval(dur)));
        }
    }

    emit_request_fn!(get);
    emit_request_fn!(post);

    /// Waits until a request to `url` is allowed by the registered interval.
    pub async fn throttle(&self, url: &str) {
        if let Some(interval) = self
            .req_intervals
            .iter()
            .find(|(pat, _)| pat.matches(url))
            .map(|(_, interval)| interval)
        {
            interval.lock().await.tick().await;
        }
    }

    async fn execute_request(&self, req: Request) -> Result<Response, Error> {
        log::debug!("{} {}", req.method(), req.url());
        self.inner.execute(req).await
    }
}

/// Request that already waited for its turn and is sent without further delay.
pub struct ThrottledRequest {
    req: Request,
    client: Client,
}

impl ThrottledRequest {
    pub async fn send(self) -> Result<Response, Error> {
        self.client.execute_request(self.req).await
    }
}

impl RequestBuilder {
    fn new(b: ::reqwest::RequestBuilder, client: Client) -> Self {
        Self { inner: b, client }
    }

    pub async fn send(self) -> Result<Response, Error> {
        self.throttled().await?.send().await
    }

    /// Waits for the request interval without sending yet.
    pub async fn throttled(self) -> Result<ThrottledRequest, Error> {
        let req = self.inner.build()?;
        self.client.throttle(req.url().as_str()).await;
        Ok(ThrottledRequest {
            req,
            client: self.client,
        })
    }

    pub fn json<T: Serialize + ?Sized>(mut self, json: &T) -> Self {
        self.inner = self.inner.json(json);
        self
    }
}
