//! NCBI E-utilities client.
//!
//! Endpoint used:
//!   elink: https://eutils.ncbi.nlm.nih.gov/entrez/eutils/elink.fcgi

use reqwest::blocking::Client;
use tracing::{debug, instrument};

use super::CitationSource;
use super::elink::parse_cited_in;
use crate::{CitationError, Result};

/// Base URL of the public E-utilities service.
pub const EUTILS_BASE_URL: &str = "https://eutils.ncbi.nlm.nih.gov/entrez/eutils/";

/// `elink` link name selecting PubMed articles that cite the given one.
pub const CITED_IN_LINK_NAME: &str = "pubmed_pubmed_citedin";

/// Blocking client for the `elink` "cited in" lookup.
///
/// One request is sent per PMID, with no retry and the transport's default
/// timeout.
#[derive(Debug, Clone)]
pub struct EutilsClient {
    client: Client,
    base_url: String,
}

impl EutilsClient {
    /// Creates a client for the public E-utilities service.
    ///
    /// # Errors
    ///
    /// Returns [`CitationError::Client`] if the HTTP client cannot be built.
    pub fn new() -> Result<Self> {
        Self::with_base_url(EUTILS_BASE_URL)
    }

    /// Creates a client for an E-utilities compatible service at `base_url`.
    ///
    /// # Examples
    ///
    /// ```
    /// use citedby::EutilsClient;
    ///
    /// let client = EutilsClient::with_base_url("http://localhost:8080/eutils").unwrap();
    /// assert_eq!(client.elink_url(), "http://localhost:8080/eutils/elink.fcgi");
    /// ```
    pub fn with_base_url<S: Into<String>>(base_url: S) -> Result<Self> {
        let mut base_url = base_url.into();
        if !base_url.ends_with('/') {
            base_url.push('/');
        }
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(CitationError::Client)?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn elink_url(&self) -> String {
        format!("{}elink.fcgi", self.base_url)
    }
}

impl CitationSource for EutilsClient {
    #[instrument(skip(self))]
    fn cited_by(&self, pmid: &str) -> Result<Vec<String>> {
        let transport = |source| CitationError::Transport {
            id: pmid.to_string(),
            source,
        };

        let response = self
            .client
            .get(self.elink_url())
            .query(&[
                ("dbfrom", "pubmed"),
                ("linkname", CITED_IN_LINK_NAME),
                ("id", pmid),
            ])
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(CitationError::Status {
                id: pmid.to_string(),
                status,
            });
        }

        let body = response.text().map_err(transport)?;
        let citing = parse_cited_in(&body).map_err(|e| CitationError::InvalidResponse {
            id: pmid.to_string(),
            message: e.to_string(),
        })?;

        debug!(count = citing.len(), "elink returned citing PMIDs");
        Ok(citing)
    }
}
