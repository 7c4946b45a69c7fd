use std::path::PathBuf;

use crate::model::Country;

pub const BASE_URL: &str = "https://jobs.bdjobs.com";
pub const SEARCH_URL: &str = "https://jobs.bdjobs.com/jobsearch.asp";

/// Headers sent with every request (site expects a browser-like client).
/// Names are lowercase for `HeaderName::from_static`; the user agent is set by the session.
pub const DEFAULT_HEADERS: [(&str, &str); 5] = [
    ("accept", "text/html,application/xhtml+xml,application/xml;q=0.9,image/webp,*/*;q=0.8"),
    ("accept-language", "en-US,en;q=0.5"),
    ("connection", "keep-alive"),
    ("referer", "https://jobs.bdjobs.com/"),
    ("cache-control", "max-age=0"),
];

/// Fixed query parameters for every search page.
pub const SEARCH_PARAMS: [(&str, &str); 1] = [("hidJobSearch", "jobsearch")];
pub const SEARCH_TERM_PARAM: &str = "txtsearch";
pub const PAGE_PARAM: &str = "pg";

/// Job card containers, highest priority first. Each is `tag.class`.
pub const JOB_SELECTORS: [&str; 4] = [
    "div.job-item",
    "div.sout-jobs-wrapper",
    "div.norm-jobs-wrapper",
    "div.featured-wrap",
];

/// Substring of every job detail link.
pub const JOB_DETAIL_MARKER: &str = "jobdetail";

pub const DATE_FORMATS: [&str; 5] = ["%d %b %Y", "%d-%b-%Y", "%d %B %Y", "%B %d, %Y", "%d/%m/%Y"];

pub const REMOTE_KEYWORDS: [&str; 4] = ["remote", "work from home", "wfh", "home based"];

pub const DEFAULT_LOCATION: &str = "Dhaka, Bangladesh";
pub const PLACEHOLDER: &str = "N/A";

/// Knobs for the HTTP session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Rotated round-robin per request. Empty means direct connection.
    pub proxies: Vec<String>,
    pub ca_cert: Option<PathBuf>,
    /// Fixed user agent. When unset a browser UA is picked per request.
    pub user_agent: Option<String>,
    pub verify_tls: bool,
    pub max_retries: u32,
    pub backoff_secs: f64,
    pub retry_statuses: Vec<u16>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            proxies: Vec::new(),
            ca_cert: None,
            user_agent: None,
            verify_tls: true,
            max_retries: 3,
            backoff_secs: 5.0,
            retry_statuses: vec![429, 500, 502, 503, 504],
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub base_url: String,
    pub search_url: String,
    /// Seconds to wait between search pages: uniform in `[delay, delay + band_delay]`.
    pub delay: f64,
    pub band_delay: f64,
    /// Country attached to every parsed location.
    pub country: Country,
    pub session: SessionConfig,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        ScraperConfig {
            base_url: BASE_URL.to_string(),
            search_url: SEARCH_URL.to_string(),
            delay: 2.0,
            band_delay: 3.0,
            country: Country::Bangladesh,
            session: SessionConfig::default(),
        }
    }
}
