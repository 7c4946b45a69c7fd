//! Listing-page field extraction.
//!
//! Every field is read through an ordered list of strategies; the first one
//! that yields a non-empty value wins, otherwise the field falls back to a
//! fixed placeholder.

use std::collections::BTreeSet;
use std::hash::{DefaultHasher, Hash, Hasher};
use std::sync::OnceLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

use crate::config::{DEFAULT_LOCATION, JOB_DETAIL_MARKER, JOB_SELECTORS, PLACEHOLDER};
use crate::dom;
use crate::error::ScrapeError;
use crate::model::{Country, JobPost, Site};
use crate::normalize::{is_job_remote, parse_date, parse_location};

/// A single field lookup over one job card.
pub type Strategy = for<'a> fn(ElementRef<'a>) -> Option<String>;

const CARD_TAGS: [&str; 2] = ["span", "div"];

pub const TITLE_STRATEGIES: &[Strategy] = &[title_from_anchor, title_from_heading];
pub const COMPANY_STRATEGIES: &[Strategy] = &[company_by_primary_class, company_by_loose_class];
pub const LOCATION_STRATEGIES: &[Strategy] = &[location_by_primary_class, location_by_loose_class];
pub const DATE_STRATEGIES: &[Strategy] = &[date_by_loose_class];

pub struct Extractor {
    email_regex: Regex,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new()
    }
}

impl Extractor {
    pub fn new() -> Self {
        Extractor {
            email_regex: Regex::new(r"(?i)[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}").expect("static regex"),
        }
    }

    /// Lowercased, deduplicated addresses in `text`, skipping image file names.
    pub fn extract_emails(&self, text: &str) -> Vec<String> {
        let mut emails = BTreeSet::new();
        for m in self.email_regex.find_iter(text) {
            let email = m.as_str().to_lowercase();
            if !email.ends_with(".png") && !email.ends_with(".jpg") && !email.ends_with(".jpeg") && !email.ends_with(".gif") && !email.ends_with(".webp") {
                emails.insert(email);
            }
        }
        emails.into_iter().collect()
    }
}

fn job_selectors() -> &'static [Selector] {
    static SELECTORS: OnceLock<Vec<Selector>> = OnceLock::new();
    SELECTORS.get_or_init(|| {
        JOB_SELECTORS
            .iter()
            .map(|css| Selector::parse(css).expect("static selector"))
            .collect()
    })
}

fn anchor_selector() -> &'static Selector {
    static ANCHOR: OnceLock<Selector> = OnceLock::new();
    ANCHOR.get_or_init(|| Selector::parse("a[href]").expect("static selector"))
}

fn is_detail_link(anchor: &ElementRef<'_>) -> bool {
    anchor
        .value()
        .attr("href")
        .map(|href| href.to_lowercase().contains(JOB_DETAIL_MARKER))
        .unwrap_or(false)
}

/// Job cards on a search results page, in document order. Empty means the
/// search has run out of pages.
pub fn locate_listings(document: &Html) -> Vec<ElementRef<'_>> {
    for selector in job_selectors() {
        let cards: Vec<ElementRef<'_>> = document.select(selector).collect();
        if !cards.is_empty() {
            return cards;
        }
    }

    // No known container: use the parent of every detail link.
    let mut parents: Vec<ElementRef<'_>> = Vec::new();
    for anchor in document.select(anchor_selector()).filter(is_detail_link) {
        if let Some(parent) = anchor.parent().and_then(ElementRef::wrap) {
            if !parents.contains(&parent) {
                parents.push(parent);
            }
        }
    }
    parents
}

fn detail_anchor(fragment: ElementRef<'_>) -> Option<ElementRef<'_>> {
    dom::descendant_elements(fragment).find(|el| el.value().name() == "a" && is_detail_link(el))
}

fn non_empty(text: String) -> Option<String> {
    (!text.is_empty()).then_some(text)
}

fn title_from_anchor(fragment: ElementRef<'_>) -> Option<String> {
    detail_anchor(fragment).and_then(|a| non_empty(dom::clean_text(&a)))
}

fn title_from_heading(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &["h2", "h3", "h4", "strong", "div"], &["job-title-text"])
        .and_then(|el| non_empty(dom::clean_text(&el)))
}

fn company_by_primary_class(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &CARD_TAGS, &["comp-name-text"]).and_then(|el| non_empty(dom::clean_text(&el)))
}

fn company_by_loose_class(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &CARD_TAGS, &["company", "org", "comp-name"]).and_then(|el| non_empty(dom::clean_text(&el)))
}

fn location_by_primary_class(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &CARD_TAGS, &["locon-text-d"]).and_then(|el| non_empty(dom::clean_text(&el)))
}

fn location_by_loose_class(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &CARD_TAGS, &["location", "area", "locon"]).and_then(|el| non_empty(dom::clean_text(&el)))
}

fn date_by_loose_class(fragment: ElementRef<'_>) -> Option<String> {
    dom::find_by_class(fragment, &CARD_TAGS, &["date", "deadline", "published"]).and_then(|el| non_empty(dom::clean_text(&el)))
}

/// Runs `strategies` in order and returns the first hit.
pub fn first_match(fragment: ElementRef<'_>, strategies: &[Strategy]) -> Option<String> {
    strategies.iter().find_map(|strategy| strategy(fragment))
}

/// Absolute form of a listing href.
pub fn resolve_url(href: &str, base_url: &Url) -> Result<String, ScrapeError> {
    let href = href.trim();
    if href.starts_with("http") {
        return Ok(href.to_string());
    }
    base_url
        .join(href)
        .map(|u| u.to_string())
        .map_err(|source| ScrapeError::InvalidUrl { url: href.to_string(), source })
}

/// Value of the last `jobid=` in the URL, or a stable hash of the whole URL.
pub fn job_id_from_url(job_url: &str) -> String {
    if let Some((_, rest)) = job_url.rsplit_once("jobid=") {
        let id = rest.split('&').next().unwrap_or_default();
        return id.to_string();
    }
    let mut hasher = DefaultHasher::new();
    job_url.hash(&mut hasher);
    format!("bdjobs-{}", hasher.finish())
}

/// Builds a job from one listing card. `Ok(None)` means the card has no
/// detail link and is not a job.
pub fn build_record(fragment: ElementRef<'_>, base_url: &Url, country: Country) -> Result<Option<JobPost>, ScrapeError> {
    let Some(anchor) = detail_anchor(fragment) else {
        return Ok(None);
    };
    let href = anchor.value().attr("href").unwrap_or_default();
    let job_url = resolve_url(href, base_url)?;
    let id = job_id_from_url(&job_url);

    let title = first_match(fragment, TITLE_STRATEGIES).unwrap_or_else(|| PLACEHOLDER.to_string());
    let company_name = first_match(fragment, COMPANY_STRATEGIES).unwrap_or_else(|| PLACEHOLDER.to_string());
    let location_text = first_match(fragment, LOCATION_STRATEGIES).unwrap_or_else(|| DEFAULT_LOCATION.to_string());
    let location = parse_location(&location_text, country);
    let date_posted = first_match(fragment, DATE_STRATEGIES).and_then(|text| parse_date(&text));

    // Description is not known yet, so only title and location count here.
    let is_remote = is_job_remote(&title, None, Some(&location));

    Ok(Some(JobPost {
        id,
        title,
        company_name,
        job_url,
        location,
        date_posted,
        is_remote,
        site: Site::BdJobs,
        description: None,
        job_type: None,
        company_industry: None,
        emails: None,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn base() -> Url {
        Url::parse("https://jobs.bdjobs.com").unwrap()
    }

    fn card(html: &str) -> Html {
        Html::parse_fragment(&format!(r#"<div class="job-item">{}</div>"#, html))
    }

    fn build(doc: &Html) -> Option<JobPost> {
        let fragment = locate_listings(doc).into_iter().next().unwrap();
        build_record(fragment, &base(), Country::Bangladesh).unwrap()
    }

    #[test]
    fn test_full_card() {
        let doc = card(
            r#"<a href="jobdetails.asp?jobid=1234&ln=1">Senior Rust Developer</a>
               <div class="comp-name-text">Acme Ltd</div>
               <div class="locon-text-d">Dhaka, Dhaka Division</div>
               <div class="deadline">Deadline: 15 Jan 2024</div>"#,
        );
        let job = build(&doc).unwrap();
        assert_eq!(job.id, "1234");
        assert_eq!(job.job_url, "https://jobs.bdjobs.com/jobdetails.asp?jobid=1234&ln=1");
        assert_eq!(job.title, "Senior Rust Developer");
        assert_eq!(job.company_name, "Acme Ltd");
        assert_eq!(job.location.city.as_deref(), Some("Dhaka"));
        assert_eq!(job.location.state.as_deref(), Some("Dhaka Division"));
        assert_eq!(job.date_posted, NaiveDate::from_ymd_opt(2024, 1, 15));
        assert!(!job.is_remote);
        assert_eq!(job.site, Site::BdJobs);
        assert!(job.description.is_none());
    }

    #[test]
    fn test_card_without_detail_link_is_not_a_job() {
        let doc = card(r#"<a href="/companies/acme">Acme</a><div class="comp-name-text">Acme</div>"#);
        assert!(build(&doc).is_none());
    }

    #[test]
    fn test_fallback_fields_and_placeholders() {
        let doc = card(
            r#"<a href="https://jobs.bdjobs.com/JobDetails/?id=77"><img src="logo.png"></a>
               <h3 class="job-title-text">Work From Home Data Entry</h3>
               <span class="date-text">sometime soon</span>"#,
        );
        let job = build(&doc).unwrap();
        assert!(job.id.starts_with("bdjobs-"));
        assert_eq!(job.title, "Work From Home Data Entry");
        assert_eq!(job.company_name, "N/A");
        assert_eq!(job.location.city.as_deref(), Some("Dhaka"));
        assert_eq!(job.location.state.as_deref(), Some("Bangladesh"));
        assert_eq!(job.date_posted, None);
        assert!(job.is_remote);
    }

    #[test]
    fn test_loose_company_and_location() {
        let doc = card(
            r#"<a href="/jobdetail.asp?jobid=9">Accountant</a>
               <span class="org-name">Beta Group</span>
               <span class="job-area">Chittagong</span>"#,
        );
        let job = build(&doc).unwrap();
        assert_eq!(job.company_name, "Beta Group");
        assert_eq!(job.location.city.as_deref(), Some("Chittagong"));
        assert_eq!(job.location.state, None);
    }

    #[test]
    fn test_remote_title_overrides_location() {
        let doc = card(
            r#"<a href="/jobdetail.asp?jobid=5">Remote Software Engineer</a>
               <div class="locon-text-d">Dhaka, Bangladesh</div>"#,
        );
        assert!(build(&doc).unwrap().is_remote);
    }

    #[test]
    fn test_selector_priority() {
        let doc = Html::parse_document(
            r#"<div class="featured-wrap"><a href="/jobdetail?jobid=1">A</a></div>
               <div class="job-item"><a href="/jobdetail?jobid=2">B</a></div>
               <div class="job-item"><a href="/jobdetail?jobid=3">C</a></div>"#,
        );
        let cards = locate_listings(&doc);
        assert_eq!(cards.len(), 2);
        assert!(cards.iter().all(|c| c.value().attr("class") == Some("job-item")));
    }

    #[test]
    fn test_anchor_parent_fallback() {
        let doc = Html::parse_document(
            r#"<ul>
                 <li id="a"><a href="/JobDetail?jobid=1">One</a> <a href="/jobdetail?jobid=1&x=2">again</a></li>
                 <li id="b"><a href="/jobdetail?jobid=2">Two</a></li>
                 <li id="c"><a href="/about">About</a></li>
               </ul>"#,
        );
        let ids: Vec<_> = locate_listings(&doc).iter().map(|c| c.value().attr("id").unwrap_or("")).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_empty_page_has_no_listings() {
        let doc = Html::parse_document("<html><body><p>No jobs found</p></body></html>");
        assert!(locate_listings(&doc).is_empty());
    }

    #[test]
    fn test_job_id_hash_is_stable() {
        let url = "https://jobs.bdjobs.com/details/abc";
        assert_eq!(job_id_from_url(url), job_id_from_url(url));
        assert_ne!(job_id_from_url(url), job_id_from_url("https://jobs.bdjobs.com/details/abd"));
        assert_eq!(job_id_from_url("x.asp?jobid=42"), "42");
    }

    #[test]
    fn test_job_id_uses_last_occurrence() {
        assert_eq!(job_id_from_url("https://x/jobdetail.asp?jobid=1&ref=a?jobid=2"), "2");
        assert_eq!(job_id_from_url("https://x/jobdetail.asp?jobid=7&ln=1"), "7");
    }

    #[test]
    fn test_extract_emails() {
        let ex = Extractor::new();
        let emails = ex.extract_emails("Send CV to HR@Acme.com or hr@acme.com, not banner@2x.png");
        assert_eq!(emails, vec!["hr@acme.com".to_string()]);
    }
}
