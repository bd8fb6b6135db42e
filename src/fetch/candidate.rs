use crate::query::{FilterStyle, ProviderRequest};
use url::Url;

/// One way of asking an upstream for a logical result: a named endpoint plus its query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    strategy: String,
    url: Url,
    query: Vec<(String, String)>,
}

impl Candidate {
    #[must_use]
    pub fn new(strategy: impl Into<String>, url: Url, query: Vec<(String, String)>) -> Self {
        Self {
            strategy: strategy.into(),
            url,
            query,
        }
    }

    /// Build a candidate from a shaped provider request, rendering its filter in `style`.
    #[must_use]
    pub fn from_request(strategy: impl Into<String>, url: Url, request: &ProviderRequest, style: FilterStyle) -> Self {
        Self::new(strategy, url, request.query(style))
    }

    #[must_use]
    pub fn strategy(&self) -> &str {
        &self.strategy
    }

    #[must_use]
    pub const fn url(&self) -> &Url {
        &self.url
    }

    #[must_use]
    pub fn query(&self) -> &[(String, String)] {
        &self.query
    }
}
