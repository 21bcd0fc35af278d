//! Find the PubMed articles that cite a list of publications.
//!
//! `citedby` reads a citation template export (for example a Zotero export in
//! Wikipedia citation template format), asks the NCBI E-utilities `elink`
//! service which PubMed articles cite each PMID found in it, ranks the
//! publications by citation count and writes the result as an XML report.
//!
//! # Key Features
//!
//! - **Template parsing**: one `{{ ... }}` template per record, identified by the
//!   `PMID = <digits>` entry inside it. Records can never be paired with the
//!   wrong identifier.
//! - **Citation lookup**: one blocking `elink` request per PMID through the
//!   [`CitationSource`] trait, implemented by [`EutilsClient`].
//! - **Failure policies**: abort the whole run on the first failed lookup, or
//!   skip the failure and keep going.
//! - **Deterministic reports**: identical inputs produce byte-identical XML.
//!
//! # Basic Usage
//!
//! ```no_run
//! use citedby::{EutilsClient, RunConfig, run};
//!
//! let client = EutilsClient::new().unwrap();
//! let config = RunConfig::default()
//!     .with_template_path("zotero_export.txt")
//!     .with_output_path("pubmed_results.xml");
//!
//! let report = run(&config, &client, &mut std::io::stdout()).unwrap();
//! for publication in report.publications() {
//!     println!("{}: {}", publication.pmid, publication.citation_count());
//! }
//! ```
//!
//! # Parsing Templates Only
//!
//! ```rust
//! use citedby::TemplateParser;
//!
//! let input = "{{Cite journal | title = Example | PMID = 12345 }}";
//! let templates = TemplateParser::new().parse(input).unwrap();
//! assert_eq!(
//!     templates.get("12345"),
//!     Some("{{Cite journal | title = Example | PMID = 12345}}")
//! );
//! ```
//!
//! # Error Handling
//!
//! Every fallible operation returns the crate [`Result`] type wrapping
//! [`CitationError`], with one variant per failure class:
//!
//! ```rust
//! use citedby::{CitationError, TemplateParser};
//!
//! match TemplateParser::new().parse("{{Cite book | title = No identifier}}") {
//!     Ok(templates) => println!("Parsed {} records", templates.len()),
//!     Err(CitationError::UnidentifiedTemplate { line }) => {
//!         eprintln!("template at line {line} has no PMID")
//!     }
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

pub mod fetch;
mod regex;
pub mod report;
pub mod run;
pub mod template;

// Reexports
pub use fetch::{CitationSource, EutilsClient, FailurePolicy, Lookup};
pub use report::{Publication, Report};
pub use run::{RunConfig, run};
pub use template::{TemplateMap, TemplateParser};

/// A specialized Result type for citation operations.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Represents errors that can occur while collecting and reporting citations.
#[derive(Error, Debug)]
pub enum CitationError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    InvalidFormat(String),

    #[error("cannot read template file {}: {source}", .path.display())]
    TemplateRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("found {identifiers} PMID entries but {templates} templates")]
    MismatchedRecords { identifiers: usize, templates: usize },

    #[error("template at line {line} has no PMID")]
    UnidentifiedTemplate { line: usize },

    #[error("cannot build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request for PMID {id} failed: {source}")]
    Transport { id: String, source: reqwest::Error },

    #[error("PMID {id}: service returned {status}")]
    Status {
        id: String,
        status: reqwest::StatusCode,
    },

    #[error("invalid response for PMID {id}: {message}")]
    InvalidResponse { id: String, message: String },

    #[error("cannot write report to {}: {source}", .path.display())]
    ReportWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl From<quick_xml::Error> for CitationError {
    fn from(err: quick_xml::Error) -> Self {
        CitationError::InvalidFormat(err.to_string())
    }
}
