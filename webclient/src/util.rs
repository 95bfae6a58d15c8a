use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use url::Url;

use crate::{
    error::*,
    http::{Client, ThrottledRequest},
};

pub fn parse_url(url: impl AsRef<str>) -> Result<Url> {
    match Url::parse(url.as_ref()) {
        Ok(url) => Ok(url),
        Err(e) => Err(Error::InvalidSyntaxUrl {
            url: url.as_ref().to_owned(),
            source: e,
        }),
    }
}

/// Appends `segment` to the path of `base`.
/// Unlike `Url::join`, the last segment of `base` is kept even without a trailing slash.
pub fn append_path(base: &Url, segment: &str) -> Result<Url> {
    let s = format!(
        "{}/{}",
        base.as_str().trim_end_matches('/'),
        segment.trim_start_matches('/')
    );
    self::parse_url(s)
}

async fn ensure_success(resp: Response, url: &Url) -> Result<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body = resp.text().await.unwrap_or_default();
    Err(Error::UnexpectedResponseCode {
        got: status,
        body,
        requested_url: url.to_string(),
    })
}

async fn read_json<T: DeserializeOwned>(resp: Response, url: &Url) -> Result<T> {
    let resp = ensure_success(resp, url).await?;
    let text = resp.text().await?;
    Ok(serde_json::from_str(&text)?)
}

pub async fn fetch_json<T: DeserializeOwned>(c: &Client, url: Url) -> Result<T> {
    let resp = c.get(url.clone()).send().await?;
    read_json(resp, &url).await
}

/// Builds a JSON POST and waits for the request interval, leaving the send to the caller.
pub async fn throttled_post<B>(c: &Client, url: Url, body: &B) -> Result<ThrottledRequest>
where
    B: Serialize + ?Sized,
{
    Ok(c.post(url).json(body).throttled().await?)
}

pub async fn send_json<T: DeserializeOwned>(req: ThrottledRequest, url: &Url) -> Result<T> {
    let resp = req.send().await?;
    read_json(resp, url).await
}
