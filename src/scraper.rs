use std::collections::HashSet;
use std::time::Duration;

use log::{debug, error, info, warn};
use scraper::Html;
use url::Url;

use crate::config::{ScraperConfig, PAGE_PARAM, SEARCH_PARAMS, SEARCH_TERM_PARAM};
use crate::delay_manager;
use crate::details::{parse_details, JobDetails};
use crate::error::ScrapeError;
use crate::extractor::{self, Extractor};
use crate::model::{DescriptionFormat, JobPost, JobResponse, ScraperInput, Site};
use crate::session::{HttpSession, ReqwestSession};

/// A job board scraper. `scrape` never fails: problems end the search early
/// and whatever was collected so far is returned.
pub trait JobScraper {
    fn site(&self) -> Site;
    fn scrape(&self, input: &ScraperInput) -> JobResponse;
}

/// How one search page ended.
#[derive(Debug, PartialEq, Eq)]
enum PageOutcome {
    /// Page processed; more pages may follow.
    Continue,
    /// Non-200 status or no job cards: stop paginating.
    Exhausted,
}

pub struct BdJobsScraper<S: HttpSession = ReqwestSession> {
    session: S,
    config: ScraperConfig,
    base_url: Url,
    extractor: Extractor,
}

impl BdJobsScraper<ReqwestSession> {
    pub fn new(config: ScraperConfig) -> Result<Self, ScrapeError> {
        let session = ReqwestSession::new(config.session.clone())?;
        Self::with_session(session, config)
    }
}

impl<S: HttpSession> BdJobsScraper<S> {
    pub fn with_session(session: S, config: ScraperConfig) -> Result<Self, ScrapeError> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|source| ScrapeError::InvalidUrl { url: config.base_url.clone(), source })?;
        Ok(BdJobsScraper {
            session,
            config,
            base_url,
            extractor: Extractor::new(),
        })
    }

    pub fn session(&self) -> &S {
        &self.session
    }

    fn search_query(&self, input: &ScraperInput, page: u32) -> Vec<(&'static str, String)> {
        let mut query: Vec<(&'static str, String)> = SEARCH_PARAMS
            .iter()
            .map(|(k, v)| (*k, v.to_string()))
            .collect();
        if let Some(term) = &input.search_term {
            query.push((SEARCH_TERM_PARAM, term.clone()));
        }
        if page > 1 {
            query.push((PAGE_PARAM, page.to_string()));
        }
        query
    }

    fn scrape_page(
        &self,
        input: &ScraperInput,
        page: u32,
        jobs: &mut Vec<JobPost>,
        seen_ids: &mut HashSet<String>,
    ) -> Result<PageOutcome, ScrapeError> {
        let query = self.search_query(input, page);
        let timeout = Duration::from_secs(input.request_timeout);
        let response = self.session.get(&self.config.search_url, &query, timeout)?;

        if !response.is_ok() {
            error!("BDJobs response status code {}", response.status);
            return Ok(PageOutcome::Exhausted);
        }

        let document = Html::parse_document(&response.body);
        let cards = extractor::locate_listings(&document);
        if cards.is_empty() {
            info!("No more job listings found");
            return Ok(PageOutcome::Exhausted);
        }
        info!("Found {} job cards on page {}", cards.len(), page);

        for card in cards {
            match extractor::build_record(card, &self.base_url, self.config.country) {
                Ok(Some(job)) => {
                    if seen_ids.contains(&job.id) {
                        debug!("Skipping duplicate job {}", job.id);
                        continue;
                    }
                    let job = self.enrich(job, input);
                    seen_ids.insert(job.id.clone());
                    jobs.push(job);
                    if jobs.len() >= input.results_wanted {
                        break;
                    }
                }
                Ok(None) => debug!("Skipping card without a job detail link"),
                Err(e) => error!("Error processing job card: {}", e),
            }
        }

        Ok(PageOutcome::Continue)
    }

    fn enrich(&self, mut job: JobPost, input: &ScraperInput) -> JobPost {
        let details = self.fetch_details(&job.job_url, input.description_format, input.request_timeout);
        job.emails = details
            .description
            .as_deref()
            .map(|d| self.extractor.extract_emails(d))
            .filter(|emails| !emails.is_empty());
        job.description = details.description;
        job.job_type = details.job_type;
        job.company_industry = details.company_industry;
        job
    }

    /// Fetches and parses a detail page. Any failure yields empty details.
    pub fn fetch_details(&self, job_url: &str, format: DescriptionFormat, timeout_secs: u64) -> JobDetails {
        match self.session.get(job_url, &[], Duration::from_secs(timeout_secs)) {
            Ok(resp) if resp.is_ok() => parse_details(&resp.body, format),
            Ok(resp) => {
                warn!("Detail page {} returned status {}", job_url, resp.status);
                JobDetails::default()
            }
            Err(e) => {
                error!("Error getting job details from {}: {}", job_url, e);
                JobDetails::default()
            }
        }
    }
}

impl<S: HttpSession> JobScraper for BdJobsScraper<S> {
    fn site(&self) -> Site {
        Site::BdJobs
    }

    fn scrape(&self, input: &ScraperInput) -> JobResponse {
        let mut jobs: Vec<JobPost> = Vec::new();
        let mut seen_ids: HashSet<String> = HashSet::new();
        let mut page: u32 = 1;

        while jobs.len() < input.results_wanted {
            info!("search page: {}", page);
            match self.scrape_page(input, page, &mut jobs, &mut seen_ids) {
                Ok(PageOutcome::Continue) => {}
                Ok(PageOutcome::Exhausted) => break,
                Err(e) => {
                    error!("Error during scraping: {}", e);
                    break;
                }
            }

            page += 1;
            if jobs.len() < input.results_wanted {
                delay_manager::random_page_delay(self.config.delay, self.config.band_delay);
            }
        }

        jobs.truncate(input.results_wanted);
        info!("Scraping completed with {} jobs", jobs.len());
        JobResponse { jobs }
    }
}
