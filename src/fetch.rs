//! Citation lookups.
//!
//! A [`CitationSource`] answers one question: which publications cite a given
//! PMID? [`EutilsClient`] answers it with the NCBI E-utilities `elink` service.
//! Each answer is classified as a [`Lookup`], and a [`FailurePolicy`] decides
//! whether a failed lookup ends the run.

mod elink;
mod eutils;

use tracing::warn;

use crate::{CitationError, Result};

pub use eutils::{CITED_IN_LINK_NAME, EUTILS_BASE_URL, EutilsClient};

/// A service that can list the publications citing a publication.
pub trait CitationSource {
    /// Returns the PMIDs of the publications citing `pmid`, in the order the
    /// service reports them. An empty list means no citations were found.
    ///
    /// # Errors
    ///
    /// Returns `CitationError` if the lookup itself failed.
    fn cited_by(&self, pmid: &str) -> Result<Vec<String>>;

    /// Performs the lookup and classifies its outcome.
    fn lookup(&self, pmid: &str) -> Lookup {
        match self.cited_by(pmid) {
            Ok(citing) if citing.is_empty() => Lookup::NotCited,
            Ok(citing) => Lookup::Cited(citing),
            Err(e) => Lookup::Failed(e),
        }
    }
}

impl<S: CitationSource + ?Sized> CitationSource for &S {
    fn cited_by(&self, pmid: &str) -> Result<Vec<String>> {
        (**self).cited_by(pmid)
    }
}

/// Outcome of a single citation lookup.
#[derive(Debug)]
pub enum Lookup {
    /// The publication is cited by these PMIDs.
    Cited(Vec<String>),
    /// The service knows no citing publication.
    NotCited,
    /// The lookup failed.
    Failed(CitationError),
}

impl Lookup {
    pub fn is_failed(&self) -> bool {
        matches!(self, Lookup::Failed(_))
    }

    /// Converts the outcome back into a plain result, mapping
    /// [`Lookup::NotCited`] to an empty list.
    pub fn into_result(self) -> Result<Vec<String>> {
        match self {
            Lookup::Cited(citing) => Ok(citing),
            Lookup::NotCited => Ok(Vec::new()),
            Lookup::Failed(e) => Err(e),
        }
    }
}

/// What a run does when a lookup fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FailurePolicy {
    /// Stop the run with the lookup error. Nothing is written.
    #[default]
    Abort,
    /// Log the error and report the publication with zero citations.
    Skip,
}

impl FailurePolicy {
    /// Resolves a lookup into the citing PMIDs to report for `pmid`.
    ///
    /// # Errors
    ///
    /// Returns the lookup error if the lookup failed and the policy is
    /// [`FailurePolicy::Abort`].
    pub fn resolve(self, pmid: &str, lookup: Lookup) -> Result<Vec<String>> {
        match (self, lookup) {
            (FailurePolicy::Skip, Lookup::Failed(e)) => {
                warn!(pmid, error = %e, "citation lookup failed, reporting no citations");
                Ok(Vec::new())
            }
            (_, lookup) => lookup.into_result(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    struct FixedSource(HashMap<&'static str, Vec<String>>);

    impl CitationSource for FixedSource {
        fn cited_by(&self, pmid: &str) -> Result<Vec<String>> {
            self.0
                .get(pmid)
                .cloned()
                .ok_or_else(|| CitationError::InvalidResponse {
                    id: pmid.to_string(),
                    message: "unknown".to_string(),
                })
        }
    }

    fn source() -> FixedSource {
        FixedSource(HashMap::from([
            ("1", vec!["10".to_string(), "11".to_string()]),
            ("2", Vec::new()),
        ]))
    }

    #[test]
    fn test_lookup_classification() {
        let source = source();
        assert!(matches!(source.lookup("1"), Lookup::Cited(ref c) if c.len() == 2));
        assert!(matches!(source.lookup("2"), Lookup::NotCited));
        assert!(source.lookup("3").is_failed());
    }

    #[test]
    fn test_lookup_through_reference() {
        let source = source();
        let by_ref = &source;
        assert!(matches!(by_ref.lookup("2"), Lookup::NotCited));
    }

    #[test]
    fn test_abort_propagates_failure() {
        let lookup = source().lookup("3");
        let err = FailurePolicy::Abort.resolve("3", lookup).unwrap_err();
        assert!(matches!(err, CitationError::InvalidResponse { ref id, .. } if id == "3"));
    }

    #[test]
    fn test_skip_reports_no_citations() {
        let lookup = source().lookup("3");
        assert_eq!(
            FailurePolicy::Skip.resolve("3", lookup).unwrap(),
            Vec::<String>::new()
        );
    }

    #[test]
    fn test_policies_agree_on_success() {
        for policy in [FailurePolicy::Abort, FailurePolicy::Skip] {
            assert_eq!(
                policy.resolve("1", source().lookup("1")).unwrap(),
                vec!["10", "11"]
            );
            assert!(policy.resolve("2", source().lookup("2")).unwrap().is_empty());
        }
    }
}
