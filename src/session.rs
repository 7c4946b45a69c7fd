use std::cell::Cell;
use std::fs;
use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};
use rand::Rng;
use reqwest::blocking::Client;
use reqwest::cookie::Jar;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, USER_AGENT};
use reqwest::{Certificate, Proxy};

use crate::config::{SessionConfig, DEFAULT_HEADERS};
use crate::delay_manager;
use crate::error::ScrapeError;

const USER_AGENTS: [&str; 5] = [
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10.15; rv:121.0) Gecko/20100101 Firefox/121.0",
];

/// Status code and decoded body of a finished request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Blocking GET with query parameters. Implementations keep cookie state
/// between calls.
pub trait HttpSession {
    fn get(&self, url: &str, query: &[(&str, String)], timeout: Duration) -> Result<HttpResponse, ScrapeError>;
}

/// Normalizes a proxy string to a URL. Bare `host:port` becomes `http://host:port`.
pub fn format_proxy(proxy: &str) -> String {
    let proxy = proxy.trim();
    if proxy.starts_with("http://") || proxy.starts_with("https://") || proxy.starts_with("socks5://") {
        proxy.to_string()
    } else {
        format!("http://{}", proxy)
    }
}

pub fn random_user_agent() -> &'static str {
    let mut rng = rand::thread_rng();
    USER_AGENTS[rng.gen_range(0..USER_AGENTS.len())]
}

/// `reqwest` backed session: one client per proxy, all sharing one cookie jar.
pub struct ReqwestSession {
    clients: Vec<Client>,
    next_client: Cell<usize>,
    // False when no user agent was configured or it was rejected.
    fixed_user_agent: bool,
    config: SessionConfig,
}

impl ReqwestSession {
    pub fn new(config: SessionConfig) -> Result<Self, ScrapeError> {
        let mut headers = HeaderMap::new();
        for (name, value) in DEFAULT_HEADERS {
            headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        }
        let mut fixed_user_agent = false;
        if let Some(ua) = &config.user_agent {
            if let Ok(value) = HeaderValue::from_str(ua) {
                headers.insert(USER_AGENT, value);
                fixed_user_agent = true;
            } else {
                warn!("Ignoring user agent with invalid characters: {}", ua);
            }
        }

        let certificate = match &config.ca_cert {
            Some(path) => {
                let pem = fs::read(path).map_err(|e| ScrapeError::CaCert { path: path.clone(), reason: e.to_string() })?;
                let cert = Certificate::from_pem(&pem)
                    .map_err(|e| ScrapeError::CaCert { path: path.clone(), reason: e.to_string() })?;
                Some(cert)
            }
            None => None,
        };

        let jar = Arc::new(Jar::default());
        let proxies: Vec<Option<String>> = if config.proxies.is_empty() {
            vec![None]
        } else {
            config.proxies.iter().map(|p| Some(format_proxy(p))).collect()
        };

        let mut clients = Vec::with_capacity(proxies.len());
        for proxy in proxies {
            let mut builder = Client::builder()
                .default_headers(headers.clone())
                .cookie_provider(Arc::clone(&jar))
                .danger_accept_invalid_certs(!config.verify_tls);

            if let Some(cert) = &certificate {
                builder = builder.add_root_certificate(cert.clone());
            }

            match proxy.as_deref() {
                Some("http://localhost") => builder = builder.no_proxy(),
                Some(url) => {
                    let p = Proxy::all(url).map_err(|source| ScrapeError::Proxy { proxy: url.to_string(), source })?;
                    builder = builder.proxy(p);
                }
                None => {}
            }

            clients.push(builder.build()?);
        }

        Ok(ReqwestSession {
            clients,
            next_client: Cell::new(0),
            fixed_user_agent,
            config,
        })
    }

    pub fn client_count(&self) -> usize {
        self.clients.len()
    }

    // Round-robin over the proxy clients.
    fn client(&self) -> &Client {
        let idx = self.next_client.get() % self.clients.len();
        self.next_client.set(idx + 1);
        &self.clients[idx]
    }
}

impl HttpSession for ReqwestSession {
    fn get(&self, url: &str, query: &[(&str, String)], timeout: Duration) -> Result<HttpResponse, ScrapeError> {
        let mut attempt = 0;
        loop {
            let mut request = self.client().get(url).query(query).timeout(timeout);
            if !self.fixed_user_agent {
                request = request.header(USER_AGENT, random_user_agent());
            }

            match request.send() {
                Ok(resp) => {
                    let status = resp.status().as_u16();
                    if attempt < self.config.max_retries && self.config.retry_statuses.contains(&status) {
                        attempt += 1;
                        warn!("GET {} returned {}, retrying", url, status);
                        delay_manager::retry_backoff(self.config.backoff_secs, attempt);
                        continue;
                    }
                    let body = resp.text()?;
                    debug!("GET {} -> {} ({} bytes)", url, status, body.len());
                    return Ok(HttpResponse { status, body });
                }
                Err(e) if attempt < self.config.max_retries && (e.is_connect() || e.is_timeout()) => {
                    attempt += 1;
                    warn!("GET {} failed: {}, retrying", url, e);
                    delay_manager::retry_backoff(self.config.backoff_secs, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
    }
}
