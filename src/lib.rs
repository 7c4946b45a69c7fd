pub mod config;
pub mod delay_manager;
pub mod details;
pub mod dom;
pub mod error;
pub mod extractor;
pub mod logger;
pub mod model;
pub mod normalize;
pub mod scraper;
pub mod session;

// Exporting types for convenience
pub use crate::config::{ScraperConfig, SessionConfig};
pub use crate::error::ScrapeError;
pub use crate::extractor::Extractor;
pub use crate::model::{Country, DescriptionFormat, JobPost, JobResponse, Location, ScraperInput, Site};
pub use crate::scraper::{BdJobsScraper, JobScraper};
pub use crate::session::{HttpResponse, HttpSession, ReqwestSession};
