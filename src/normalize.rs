use std::sync::OnceLock;

use chrono::NaiveDate;
use log::warn;
use regex::Regex;
use scraper::Html;

use crate::config::{DATE_FORMATS, REMOTE_KEYWORDS};
use crate::model::{Country, Location};

/// Splits "City, Region[, ...]" into city and state. Without a comma the
/// whole text is the city.
pub fn parse_location(text: &str, country: Country) -> Location {
    let parts: Vec<&str> = text.split(',').collect();
    if parts.len() >= 2 {
        let state = parts[1].trim();
        Location {
            city: Some(parts[0].trim().to_string()),
            state: (!state.is_empty()).then(|| state.to_string()),
            country: Some(country),
        }
    } else {
        Location {
            city: Some(text.trim().to_string()),
            state: None,
            country: Some(country),
        }
    }
}

/// Parses listing dates such as "Deadline: 15 Jan 2024". Unknown formats yield `None`.
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let cleaned = text.replace("Deadline:", "");
    let cleaned = cleaned.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(cleaned, fmt).ok())
}

pub fn is_job_remote(title: &str, description: Option<&str>, location: Option<&Location>) -> bool {
    let mut full_text = title.to_lowercase();
    if let Some(description) = description {
        full_text.push(' ');
        full_text.push_str(&description.to_lowercase());
    }
    if let Some(location) = location {
        full_text.push(' ');
        full_text.push_str(&location.display_location().to_lowercase());
    }
    REMOTE_KEYWORDS.iter().any(|keyword| full_text.contains(keyword))
}

pub fn markdown_converter(html: &str) -> String {
    match htmd::convert(html) {
        Ok(markdown) => markdown.trim().to_string(),
        Err(e) => {
            warn!("Markdown conversion failed, falling back to plain text: {}", e);
            plain_converter(html)
        }
    }
}

/// Drops markup and collapses whitespace.
pub fn plain_converter(html: &str) -> String {
    static WS: OnceLock<Regex> = OnceLock::new();
    let ws = WS.get_or_init(|| Regex::new(r"\s+").expect("static regex"));

    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    ws.replace_all(&text, " ").trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_with_region() {
        let loc = parse_location("Dhaka, Dhaka Division", Country::Bangladesh);
        assert_eq!(loc.city.as_deref(), Some("Dhaka"));
        assert_eq!(loc.state.as_deref(), Some("Dhaka Division"));
        assert_eq!(loc.country, Some(Country::Bangladesh));
    }

    #[test]
    fn test_location_without_comma() {
        let loc = parse_location(" Chittagong ", Country::Bangladesh);
        assert_eq!(loc.city.as_deref(), Some("Chittagong"));
        assert_eq!(loc.state, None);
    }

    #[test]
    fn test_location_keeps_second_segment_only() {
        let loc = parse_location("Gulshan, Dhaka, Bangladesh", Country::Bangladesh);
        assert_eq!(loc.city.as_deref(), Some("Gulshan"));
        assert_eq!(loc.state.as_deref(), Some("Dhaka"));
    }

    #[test]
    fn test_date_formats() {
        let jan15 = NaiveDate::from_ymd_opt(2024, 1, 15);
        assert_eq!(parse_date("15 Jan 2024"), jan15);
        assert_eq!(parse_date("Deadline: 15 Jan 2024"), jan15);
        assert_eq!(parse_date("15-Jan-2024"), jan15);
        assert_eq!(parse_date("15 January 2024"), jan15);
        assert_eq!(parse_date("January 15, 2024"), jan15);
        assert_eq!(parse_date("15/01/2024"), jan15);
    }

    #[test]
    fn test_unparseable_date_is_none() {
        assert_eq!(parse_date("garbage"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn test_remote_keyword_in_title() {
        let loc = parse_location("Dhaka, Bangladesh", Country::Bangladesh);
        assert!(is_job_remote("Remote Software Engineer", None, Some(&loc)));
        assert!(!is_job_remote("Software Engineer", None, Some(&loc)));
    }

    #[test]
    fn test_remote_keyword_in_location_or_description() {
        let loc = parse_location("Home Based", Country::Bangladesh);
        assert!(is_job_remote("Accountant", None, Some(&loc)));
        assert!(is_job_remote("Accountant", Some("Fully WFH role"), None));
    }

    #[test]
    fn test_plain_converter_strips_tags() {
        let text = plain_converter("<div><p>Build   APIs</p>\n<ul><li>Rust</li></ul></div>");
        assert_eq!(text, "Build APIs Rust");
    }

    #[test]
    fn test_markdown_converter_keeps_lists() {
        let md = markdown_converter("<div><ul><li>Rust</li><li>SQL</li></ul></div>");
        assert!(md.contains("Rust"));
        assert!(md.contains("SQL"));
        assert!(md.lines().count() >= 2);
    }
}
