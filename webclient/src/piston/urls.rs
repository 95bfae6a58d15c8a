use url::Url;

use crate::{error::Result, util};

/// Public Piston instance hosted by Engineer Man.
pub const DEFAULT_BASE_URL: &str = "https://emkc.org/api/v2/piston";

pub fn runtimes_url(base: &Url) -> Result<Url> {
    util::append_path(base, "runtimes")
}

pub fn execute_url(base: &Url) -> Result<Url> {
    util::append_path(base, "execute")
}

/// Glob matching every endpoint under `base`.
pub fn endpoint_glob(base: &Url) -> String {
    format!(
        "{}*",
        ::glob::Pattern::escape(base.as_str().trim_end_matches('/'))
    )
}
