use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ScrapeError;

/// Job boards known to the shared model. Only `BdJobs` has a scraper here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Site {
    Linkedin,
    Indeed,
    ZipRecruiter,
    Glassdoor,
    Google,
    Bayt,
    Naukri,
    #[serde(rename = "bdjobs")]
    BdJobs,
}

impl Site {
    pub fn as_str(&self) -> &'static str {
        match self {
            Site::Linkedin => "linkedin",
            Site::Indeed => "indeed",
            Site::ZipRecruiter => "zip_recruiter",
            Site::Glassdoor => "glassdoor",
            Site::Google => "google",
            Site::Bayt => "bayt",
            Site::Naukri => "naukri",
            Site::BdJobs => "bdjobs",
        }
    }
}

impl fmt::Display for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Site {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        [
            Site::Linkedin,
            Site::Indeed,
            Site::ZipRecruiter,
            Site::Glassdoor,
            Site::Google,
            Site::Bayt,
            Site::Naukri,
            Site::BdJobs,
        ]
        .into_iter()
        .find(|site| site.as_str() == wanted)
        .ok_or_else(|| ScrapeError::UnknownSite(s.to_string()))
    }
}

/// Countries, keyed by their comma separated list of accepted names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Country {
    Bangladesh,
    India,
    Pakistan,
    Nepal,
    SriLanka,
    Malaysia,
    Singapore,
    UnitedArabEmirates,
    SaudiArabia,
    Qatar,
    Uk,
    Usa,
    Canada,
    Australia,
    Germany,
    Worldwide,
}

const COUNTRIES: [Country; 16] = [
    Country::Bangladesh,
    Country::India,
    Country::Pakistan,
    Country::Nepal,
    Country::SriLanka,
    Country::Malaysia,
    Country::Singapore,
    Country::UnitedArabEmirates,
    Country::SaudiArabia,
    Country::Qatar,
    Country::Uk,
    Country::Usa,
    Country::Canada,
    Country::Australia,
    Country::Germany,
    Country::Worldwide,
];

impl Country {
    fn names(&self) -> &'static str {
        match self {
            Country::Bangladesh => "bangladesh",
            Country::India => "india",
            Country::Pakistan => "pakistan",
            Country::Nepal => "nepal",
            Country::SriLanka => "sri lanka",
            Country::Malaysia => "malaysia",
            Country::Singapore => "singapore",
            Country::UnitedArabEmirates => "united arab emirates,uae",
            Country::SaudiArabia => "saudi arabia",
            Country::Qatar => "qatar",
            Country::Uk => "uk,united kingdom",
            Country::Usa => "usa,us,united states",
            Country::Canada => "canada",
            Country::Australia => "australia",
            Country::Germany => "germany",
            Country::Worldwide => "worldwide",
        }
    }

    /// Human readable name used in `Location::display_location`.
    pub fn display_name(&self) -> String {
        let primary = self.names().split(',').next().unwrap_or_default();
        if matches!(self, Country::Usa | Country::Uk) {
            return primary.to_uppercase();
        }
        primary
            .split(' ')
            .map(|word| {
                let mut chars = word.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl FromStr for Country {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        COUNTRIES
            .into_iter()
            .find(|c| c.names().split(',').any(|name| name == wanted))
            .ok_or_else(|| ScrapeError::UnknownCountry(s.to_string()))
    }
}

impl fmt::Display for Country {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display_name())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<Country>,
}

impl Location {
    pub fn display_location(&self) -> String {
        let mut parts: Vec<String> = Vec::new();
        if let Some(city) = self.city.as_deref().filter(|c| !c.is_empty()) {
            parts.push(city.to_string());
        }
        if let Some(state) = self.state.as_deref().filter(|s| !s.is_empty()) {
            parts.push(state.to_string());
        }
        if let Some(country) = self.country.filter(|c| *c != Country::Worldwide) {
            parts.push(country.display_name());
        }
        parts.join(", ")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DescriptionFormat {
    #[default]
    Markdown,
    Html,
    Plain,
}

impl FromStr for DescriptionFormat {
    type Err = ScrapeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "markdown" | "md" => Ok(DescriptionFormat::Markdown),
            "html" => Ok(DescriptionFormat::Html),
            "plain" | "text" => Ok(DescriptionFormat::Plain),
            _ => Err(ScrapeError::UnknownFormat(s.to_string())),
        }
    }
}

/// One scraped job. Built from a listing card, then enriched from its detail page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPost {
    pub id: String,
    pub title: String,
    pub company_name: String,
    pub job_url: String,
    pub location: Location,
    pub date_posted: Option<NaiveDate>,
    pub is_remote: bool,
    pub site: Site,
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub company_industry: Option<String>,
    pub emails: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobResponse {
    pub jobs: Vec<JobPost>,
}

/// Immutable search criteria for one `scrape` call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScraperInput {
    pub site_type: Vec<Site>,
    pub search_term: Option<String>,
    pub country: Country,
    pub results_wanted: usize,
    /// Seconds
    pub request_timeout: u64,
    pub description_format: DescriptionFormat,
}

impl Default for ScraperInput {
    fn default() -> Self {
        ScraperInput {
            site_type: vec![Site::BdJobs],
            search_term: None,
            country: Country::Bangladesh,
            results_wanted: 15,
            request_timeout: 60,
            description_format: DescriptionFormat::Markdown,
        }
    }
}

impl ScraperInput {
    pub fn new(search_term: impl Into<String>, results_wanted: usize) -> Self {
        ScraperInput {
            search_term: Some(search_term.into()),
            results_wanted,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_aliases() {
        assert_eq!("United States".parse::<Country>().unwrap(), Country::Usa);
        assert_eq!(" Bangladesh ".parse::<Country>().unwrap(), Country::Bangladesh);
        assert!("atlantis".parse::<Country>().is_err());
    }

    #[test]
    fn test_country_display() {
        assert_eq!(Country::Bangladesh.display_name(), "Bangladesh");
        assert_eq!(Country::Usa.display_name(), "USA");
        assert_eq!(Country::SaudiArabia.display_name(), "Saudi Arabia");
    }

    #[test]
    fn test_display_location_skips_missing_parts() {
        let loc = Location {
            city: Some("Dhaka".into()),
            state: None,
            country: Some(Country::Bangladesh),
        };
        assert_eq!(loc.display_location(), "Dhaka, Bangladesh");

        let anywhere = Location { city: Some("Remote".into()), state: None, country: Some(Country::Worldwide) };
        assert_eq!(anywhere.display_location(), "Remote");
    }

    #[test]
    fn test_format_and_site_parsing() {
        assert_eq!("HTML".parse::<DescriptionFormat>().unwrap(), DescriptionFormat::Html);
        assert!("pdf".parse::<DescriptionFormat>().is_err());
        assert_eq!("bdjobs".parse::<Site>().unwrap(), Site::BdJobs);
        assert_eq!(Site::BdJobs.to_string(), "bdjobs");
    }

    #[test]
    fn test_input_defaults() {
        let input = ScraperInput::new("rust", 5);
        assert_eq!(input.search_term.as_deref(), Some("rust"));
        assert_eq!(input.results_wanted, 5);
        assert_eq!(input.request_timeout, 60);
        assert_eq!(input.description_format, DescriptionFormat::Markdown);
    }
}
