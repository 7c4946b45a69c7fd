use std::error::Error;
use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use log::{error, info};

use bdjobs_scraper::{logger, BdJobsScraper, DescriptionFormat, JobPost, JobScraper, ScraperConfig, ScraperInput, SessionConfig};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

/// Scrape job listings from jobs.bdjobs.com
#[derive(Debug, Parser)]
#[command(name = "bdjobs_scraper", version)]
struct Cli {
    /// Search term for jobs
    #[arg(short, long)]
    search: Option<String>,

    /// Number of results to return
    #[arg(short, long, default_value_t = 15)]
    results: usize,

    /// Output format
    #[arg(short, long, value_enum, default_value = "csv")]
    format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Verbosity level (0=errors, 1=warnings, 2=info)
    #[arg(short, long, default_value_t = 2)]
    verbose: u8,

    /// Description format (markdown, html, plain)
    #[arg(long, default_value = "markdown")]
    desc_format: DescriptionFormat,

    /// Request timeout in seconds
    #[arg(long, default_value_t = 60)]
    timeout: u64,

    /// Custom user agent
    #[arg(long)]
    user_agent: Option<String>,

    /// Proxy to rotate through; repeat for several
    #[arg(long = "proxy")]
    proxies: Vec<String>,

    /// PEM file with an extra root certificate
    #[arg(long)]
    ca_cert: Option<PathBuf>,
}

const CSV_HEADERS: [&str; 12] = [
    "id", "site", "job_url", "title", "company", "location", "date_posted",
    "job_type", "is_remote", "emails", "description", "company_industry",
];

fn csv_row(job: &JobPost) -> [String; 12] {
    [
        job.id.clone(),
        job.site.to_string(),
        job.job_url.clone(),
        job.title.clone(),
        job.company_name.clone(),
        job.location.display_location(),
        job.date_posted.map(|d| d.format("%Y-%m-%d").to_string()).unwrap_or_default(),
        job.job_type.clone().unwrap_or_default(),
        job.is_remote.to_string(),
        job.emails.as_ref().map(|e| e.join(", ")).unwrap_or_default(),
        job.description.clone().unwrap_or_default(),
        job.company_industry.clone().unwrap_or_default(),
    ]
}

fn write_jobs<W: Write>(mut out: W, jobs: &[JobPost], format: OutputFormat) -> Result<(), Box<dyn Error>> {
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_writer(out);
            writer.write_record(CSV_HEADERS)?;
            for job in jobs {
                writer.write_record(csv_row(job))?;
            }
            writer.flush()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut out, jobs)?;
            writeln!(out)?;
        }
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logger::init(cli.verbose);

    let config = ScraperConfig {
        session: SessionConfig {
            proxies: cli.proxies,
            ca_cert: cli.ca_cert,
            user_agent: cli.user_agent,
            ..Default::default()
        },
        ..Default::default()
    };
    let scraper = BdJobsScraper::new(config)?;

    let input = ScraperInput {
        search_term: cli.search.clone(),
        results_wanted: cli.results,
        request_timeout: cli.timeout,
        description_format: cli.desc_format,
        ..Default::default()
    };

    if let Some(term) = &cli.search {
        info!("Search term: {}", term);
    }
    let response = scraper.scrape(&input);
    info!("Found {} jobs", response.jobs.len());

    if response.jobs.is_empty() {
        error!("No jobs found with the specified criteria");
        return Ok(());
    }

    match &cli.output {
        Some(path) => write_jobs(File::create(path)?, &response.jobs, cli.format)?,
        None => write_jobs(io::stdout().lock(), &response.jobs, cli.format)?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bdjobs_scraper::{Country, Location, Site};

    fn job() -> JobPost {
        JobPost {
            id: "42".into(),
            title: "Rust Developer".into(),
            company_name: "Acme".into(),
            job_url: "https://jobs.bdjobs.com/jobdetails.asp?jobid=42".into(),
            location: Location { city: Some("Dhaka".into()), state: None, country: Some(Country::Bangladesh) },
            date_posted: chrono::NaiveDate::from_ymd_opt(2024, 1, 15),
            is_remote: false,
            site: Site::BdJobs,
            description: Some("Build, test".into()),
            job_type: Some("Full Time".into()),
            company_industry: None,
            emails: Some(vec!["hr@acme.com".into()]),
        }
    }

    #[test]
    fn test_csv_output() {
        let mut buf = Vec::new();
        write_jobs(&mut buf, &[job()], OutputFormat::Csv).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(CSV_HEADERS.join(",").as_str()));
        assert_eq!(
            lines.next(),
            Some(r#"42,bdjobs,https://jobs.bdjobs.com/jobdetails.asp?jobid=42,Rust Developer,Acme,"Dhaka, Bangladesh",2024-01-15,Full Time,false,hr@acme.com,"Build, test","#)
        );
    }

    #[test]
    fn test_json_output() {
        let mut buf = Vec::new();
        write_jobs(&mut buf, &[job()], OutputFormat::Json).unwrap();
        let parsed: Vec<JobPost> = serde_json::from_slice(&buf).unwrap();
        assert_eq!(parsed, vec![job()]);
    }
}
