//! Citation report.
//!
//! Ranks publications by citation count and writes them as XML:
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <PubMedResults>
//!   <Publication PubMedID="100">
//!     <CitingPaper PubMedID="300"/>
//!   </Publication>
//!   <Publication PubMedID="200"/>
//! </PubMedResults>
//! ```

use itertools::Itertools;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use std::cmp::Reverse;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use tracing::info;

use crate::{CitationError, Result};

const ROOT_ELEMENT: &str = "PubMedResults";
const PUBLICATION_ELEMENT: &str = "Publication";
const CITING_ELEMENT: &str = "CitingPaper";
const ID_ATTRIBUTE: &str = "PubMedID";

/// A publication and the PMIDs of the publications citing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Publication {
    /// PubMed ID of the publication
    pub pmid: String,
    /// PubMed IDs of the citing publications, in the order the service returned them
    pub citing: Vec<String>,
}

impl Publication {
    pub fn new<S: Into<String>>(pmid: S, citing: Vec<String>) -> Self {
        Self {
            pmid: pmid.into(),
            citing,
        }
    }

    pub fn citation_count(&self) -> usize {
        self.citing.len()
    }
}

/// Publications ranked by citation count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Report {
    publications: Vec<Publication>,
}

impl Report {
    /// Builds a report, ranking publications by descending citation count.
    ///
    /// The sort is stable: publications with the same count keep the order in
    /// which they were given.
    ///
    /// # Examples
    ///
    /// ```
    /// use citedby::{Publication, Report};
    ///
    /// let cited = |n: usize| -> Vec<String> { (0..n).map(|i| i.to_string()).collect() };
    /// let report = Report::new([
    ///     Publication::new("A", cited(3)),
    ///     Publication::new("B", cited(0)),
    ///     Publication::new("C", cited(5)),
    /// ]);
    /// assert_eq!(report.ranking().collect::<Vec<_>>(), vec!["C", "A", "B"]);
    /// ```
    pub fn new<I: IntoIterator<Item = Publication>>(publications: I) -> Self {
        let mut publications: Vec<_> = publications.into_iter().collect();
        publications.sort_by_key(|p| Reverse(p.citation_count()));
        Self { publications }
    }

    pub fn publications(&self) -> &[Publication] {
        &self.publications
    }

    /// PMIDs in ranked order.
    pub fn ranking(&self) -> impl Iterator<Item = &str> {
        self.publications.iter().map(|p| p.pmid.as_str())
    }

    pub fn len(&self) -> usize {
        self.publications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.publications.is_empty()
    }

    /// Console statistics block, one line per publication in ranked order.
    pub fn statistics(&self) -> String {
        let lines = self
            .publications
            .iter()
            .map(|p| {
                format!(
                    "PubMed ID: {}; Number of Citations: {}\n",
                    p.pmid,
                    p.citation_count()
                )
            })
            .join("");
        format!("Statistics:\n{lines}")
    }

    /// Writes the XML document to `sink`.
    ///
    /// # Errors
    ///
    /// Returns `CitationError` if writing to `sink` fails.
    pub fn write_xml<W: Write>(&self, sink: W) -> Result<()> {
        let mut writer = Writer::new_with_indent(sink, b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        if self.publications.is_empty() {
            writer.write_event(Event::Empty(BytesStart::new(ROOT_ELEMENT)))?;
        } else {
            writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
            for publication in &self.publications {
                write_publication(&mut writer, publication)?;
            }
            writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        }

        let sink = writer.get_mut();
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(())
    }

    /// Writes the XML document to a file, replacing any existing file.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::ReportWrite`] if the file cannot be created or
    /// written.
    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let write_error = |source| CitationError::ReportWrite {
            path: path.to_path_buf(),
            source,
        };

        let file = File::create(path).map_err(write_error)?;
        self.write_xml(BufWriter::new(file)).map_err(|e| match e {
            CitationError::Io(source) => write_error(source),
            other => other,
        })?;

        info!(path = %path.display(), publications = self.len(), "wrote citation report");
        Ok(())
    }
}

fn id_element<'a>(name: &'a str, pmid: &'a str) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    element.push_attribute((ID_ATTRIBUTE, pmid));
    element
}

fn write_publication<W: Write>(writer: &mut Writer<W>, publication: &Publication) -> Result<()> {
    let element = id_element(PUBLICATION_ELEMENT, &publication.pmid);
    if publication.citing.is_empty() {
        writer.write_event(Event::Empty(element))?;
        return Ok(());
    }

    writer.write_event(Event::Start(element))?;
    for citing in &publication.citing {
        writer.write_event(Event::Empty(id_element(CITING_ELEMENT, citing)))?;
    }
    writer.write_event(Event::End(BytesEnd::new(PUBLICATION_ELEMENT)))?;
    Ok(())
}
