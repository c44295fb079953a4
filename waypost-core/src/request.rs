//! The resolved request handed to actions.

use std::collections::HashMap;
use url::Url;

/// Named parameters, from a path capture or a query string.
pub type Params = HashMap<String, String>;

/// A URL that matched a route, with everything extracted from it.
///
/// Built by the router right before the action runs; never mutated after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    url: Url,
    path_parameters: Params,
    query_parameters: Params,
}

impl Request {
    /// Create a new request.
    pub fn new(url: Url, path_parameters: Params, query_parameters: Params) -> Self {
        Self {
            url,
            path_parameters,
            query_parameters,
        }
    }

    /// The URL that was dispatched.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Parameters captured from `:name` segments of the route pattern.
    pub fn path_parameters(&self) -> &Params {
        &self.path_parameters
    }

    /// Parameters parsed from the query string.
    pub fn query_parameters(&self) -> &Params {
        &self.query_parameters
    }

    /// Path and query parameters merged into one map.
    ///
    /// When both define a key, the query string value wins.
    pub fn parameters(&self) -> Params {
        let mut merged = self.path_parameters.clone();
        merged.extend(
            self.query_parameters
                .iter()
                .map(|(k, v)| (k.clone(), v.clone())),
        );
        merged
    }

    /// Look up a single merged parameter without building the whole map.
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.query_parameters
            .get(name)
            .or_else(|| self.path_parameters.get(name))
            .map(String::as_str)
    }
}
