//! End-to-end citation run: parse templates, look up citations, write the report.

use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::fetch::{CitationSource, FailurePolicy};
use crate::report::{Publication, Report};
use crate::template::TemplateParser;
use crate::Result;

/// Template file read when none is configured.
pub const DEFAULT_TEMPLATE_FILE: &str = "zotero_export.txt";

/// Report file written when none is configured.
pub const DEFAULT_OUTPUT_FILE: &str = "pubmed_results.xml";

/// Configuration of a citation run.
///
/// # Examples
///
/// ```
/// use citedby::{FailurePolicy, RunConfig};
///
/// let config = RunConfig::default()
///     .with_output_path("out/citations.xml")
///     .with_failure_policy(FailurePolicy::Skip);
/// assert_eq!(config.template_path().to_str(), Some("zotero_export.txt"));
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    template_path: PathBuf,
    output_path: PathBuf,
    failure_policy: FailurePolicy,
    parser: TemplateParser,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            template_path: PathBuf::from(DEFAULT_TEMPLATE_FILE),
            output_path: PathBuf::from(DEFAULT_OUTPUT_FILE),
            failure_policy: FailurePolicy::default(),
            parser: TemplateParser::new(),
        }
    }
}

impl RunConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_template_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.template_path = path.into();
        self
    }

    #[must_use]
    pub fn with_output_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.output_path = path.into();
        self
    }

    #[must_use]
    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    #[must_use]
    pub fn with_parser(mut self, parser: TemplateParser) -> Self {
        self.parser = parser;
        self
    }

    pub fn template_path(&self) -> &Path {
        &self.template_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn failure_policy(&self) -> FailurePolicy {
        self.failure_policy
    }

    pub fn parser(&self) -> &TemplateParser {
        &self.parser
    }
}

/// Runs the whole pipeline once.
///
/// Progress (`fetch <id>, <id>, ...`) and the statistics block are written to
/// `console`. The report is written to the configured output path only after
/// every lookup has been resolved, so an aborted run leaves no output behind.
///
/// # Errors
///
/// Returns the first error met: an unreadable or inconsistent template file,
/// a failed lookup under [`FailurePolicy::Abort`], or a failure writing the
/// console output or the report.
pub fn run<S, W>(config: &RunConfig, source: &S, console: &mut W) -> Result<Report>
where
    S: CitationSource + ?Sized,
    W: Write + ?Sized,
{
    let templates = config.parser.parse_file(&config.template_path)?;
    info!(
        path = %config.template_path.display(),
        records = templates.len(),
        lenient = config.parser.is_lenient(),
        "parsed template file"
    );

    write!(console, "fetch ")?;
    let mut publications = Vec::with_capacity(templates.len());
    for (i, pmid) in templates.identifiers().enumerate() {
        if i > 0 {
            write!(console, ", ")?;
        }
        write!(console, "{pmid}")?;
        console.flush()?;

        let citing = config.failure_policy.resolve(pmid, source.lookup(pmid))?;
        publications.push(Publication::new(pmid, citing));
    }
    writeln!(console)?;

    let report = Report::new(publications);
    console.write_all(report.statistics().as_bytes())?;
    report.write_to_path(&config.output_path)?;
    Ok(report)
}
