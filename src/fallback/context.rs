//! The inbound request as seen by the fallback fetch.

use url::Url;

/// Read-only view of the request being answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    /// Inbound URI path, e.g. `/de/about`.
    pub path: String,
    /// Inbound `User-Agent` header, if any.
    pub user_agent: Option<String>,
    /// Scheme, host and port the request was addressed to.
    pub base_uri: Url,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, base_uri: Url) -> Self {
        Self {
            path: path.into(),
            user_agent: None,
            base_uri,
        }
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Absolute URI for `path` on the request's own base.
    ///
    /// The base path, query and fragment are replaced.
    pub fn uri_for(&self, path: &str) -> Url {
        let mut uri = self.base_uri.clone();
        uri.set_path(path);
        uri.set_query(None);
        uri.set_fragment(None);
        uri
    }
}
