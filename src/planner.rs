//! Filtering and ranking on top of a shared catalog.

use std::sync::Arc;

use crate::{
    catalog::Catalog,
    destination::Destination,
    error::{Error, Result},
    filter::{self, Criteria},
    ranker,
    transcript::Transcript,
};

/// Number of ranked results returned per query when nothing else is set.
pub const DEFAULT_TOP_K: usize = 5;

/// Settings key holding the default result count.
pub const TOP_K_SETTING: &str = "top_k";

/// Parse a stored `top_k` value, falling back to [`DEFAULT_TOP_K`].
pub fn parse_top_k(value: Option<&str>) -> Result<usize> {
    let Some(value) = value else {
        return Ok(DEFAULT_TOP_K);
    };
    match value.trim().parse::<usize>() {
        Ok(k) if k > 0 => Ok(k),
        _ => Err(Error::Config(format!(
            "{TOP_K_SETTING} must be a positive integer, got '{value}'"
        ))),
    }
}

/// Assistant reply when the filters leave nothing to rank.
pub const NO_MATCHES_REPLY: &str =
    "No destinations matched your query. Try being more specific.";

/// The ranked answer to one query.
#[derive(Debug, Clone)]
pub struct Answer<'a> {
    pub query: String,
    /// Number of destinations that passed the filters.
    pub candidates: usize,
    pub results: Vec<(&'a Destination, f32)>,
}

impl Answer<'_> {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Answers browse and query requests against one catalog.
#[derive(Debug, Clone)]
pub struct Planner {
    catalog: Arc<Catalog>,
    top_k: usize,
}

impl Planner {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            top_k: DEFAULT_TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Destinations worth visiting under `criteria`, in catalog order.
    pub fn browse(&self, criteria: &Criteria) -> Vec<&Destination> {
        filter::apply(&self.catalog, criteria)
    }

    /// Rank the filtered destinations against `query` and record the
    /// exchange in `transcript`.
    ///
    /// Exactly one user and one assistant message are appended.
    pub fn ask(
        &self,
        transcript: &mut Transcript,
        criteria: &Criteria,
        query: &str,
    ) -> Answer<'_> {
        transcript.push_user(query);

        let candidates = self.browse(criteria);
        let results = if candidates.is_empty() {
            transcript.push_assistant(NO_MATCHES_REPLY);
            Vec::new()
        } else {
            let ranked =
                ranker::rank_destinations(&candidates, query, self.top_k);
            transcript.push_assistant(format!("Top results for: '{query}'"));
            ranked
        };

        tracing::debug!(
            query,
            month = %criteria.month,
            candidates = candidates.len(),
            returned = results.len(),
            "answered query"
        );

        Answer {
            query: query.to_string(),
            candidates: candidates.len(),
            results,
        }
    }
}
