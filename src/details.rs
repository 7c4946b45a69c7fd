//! Detail page parsing: description, job type and company industry.

use std::sync::OnceLock;

use scraper::{ElementRef, Html, Selector};

use crate::dom;
use crate::model::DescriptionFormat;
use crate::normalize::{markdown_converter, plain_converter};

/// Fields that only the detail page carries. All optional: a missing or
/// failed detail page leaves the job as it was.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobDetails {
    pub description: Option<String>,
    pub job_type: Option<String>,
    pub company_industry: Option<String>,
}

const LABEL_TAGS: [&str; 2] = ["span", "div"];
const SECTION_END: [&str; 3] = ["hr", "h4", "h5"];

fn content_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("div.jobcontent").expect("static selector"))
}

fn resp_heading_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("h4#job_resp").expect("static selector"))
}

fn li_selector() -> &'static Selector {
    static SEL: OnceLock<Selector> = OnceLock::new();
    SEL.get_or_init(|| Selector::parse("li").expect("static selector"))
}

pub fn parse_details(html: &str, format: DescriptionFormat) -> JobDetails {
    let document = Html::parse_document(html);
    let root = document.root_element();

    let description = responsibilities(&document).or_else(|| description_container(root, format));

    JobDetails {
        description,
        job_type: labelled_value(root, &["job type", "employment type"]),
        company_industry: labelled_value(root, &["industry"]),
    }
}

/// Lines of the "Responsibilities" section inside the main content block.
fn responsibilities(document: &Html) -> Option<String> {
    let content = document.select(content_selector()).next()?;
    let heading = content
        .select(resp_heading_selector())
        .next()
        .or_else(|| dom::find_by_own_text(content, &["h4", "h5"], &["responsibilities"]))?;

    let mut lines = Vec::new();
    for sibling in heading.next_siblings().filter_map(ElementRef::wrap) {
        let name = sibling.value().name();
        if SECTION_END.contains(&name) {
            break;
        }
        match name {
            "ul" => lines.extend(
                sibling
                    .select(li_selector())
                    .map(|li| dom::clean_text(&li))
                    .filter(|line| !line.is_empty()),
            ),
            "p" => {
                let line = dom::clean_text(&sibling);
                if !line.is_empty() {
                    lines.push(line);
                }
            }
            _ => {}
        }
    }

    (!lines.is_empty()).then(|| lines.join("\n"))
}

/// Any description-like block, serialized and converted to `format`.
///
/// `Plain` strips tags to bare text rather than going through markdown.
/// `Html` is the attribute-free markup as serialized, without re-indentation.
fn description_container(root: ElementRef<'_>, format: DescriptionFormat) -> Option<String> {
    let container = dom::find_by_class(root, &["div", "section"], &["job-description", "details", "requirements"])?;
    let html = dom::outer_html_without_attributes(&container);
    let description = match format {
        DescriptionFormat::Markdown => markdown_converter(&html),
        DescriptionFormat::Plain => plain_converter(&html),
        DescriptionFormat::Html => html,
    };
    (!description.trim().is_empty()).then_some(description)
}

/// Text of the element following a label such as "Job Type".
fn labelled_value(root: ElementRef<'_>, labels: &[&str]) -> Option<String> {
    let label = dom::find_by_own_text(root, &LABEL_TAGS, labels)?;
    let value = dom::next_sibling_element(label).or_else(|| dom::next_in_document(label, &LABEL_TAGS))?;
    let text = dom::clean_text(&value);
    (!text.is_empty()).then_some(text)
}
