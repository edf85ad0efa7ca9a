//! Rewrite context: the origin relative references resolve against, and the
//! proxy mount point rewritten references route through.

use url::Url;

/// Origin and proxy base path used to rewrite one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteContext {
    origin: String,
    proxy_base_path: String,
}

impl RewriteContext {
    /// Builds a context from an explicit origin (`scheme://host[:port]`) and base path.
    pub fn new(origin: &str, proxy_base_path: &str) -> Self {
        Self {
            origin: origin.trim_end_matches('/').to_string(),
            proxy_base_path: proxy_base_path.trim_end_matches('/').to_string(),
        }
    }

    /// Derives the context from the URL the document was fetched from.
    ///
    /// Returns `None` if the URL does not have a tuple origin (for example a
    /// `data:` URL), in which case nothing can be rewritten.
    pub fn from_url(document_url: &str, proxy_base_path: &str) -> Option<Self> {
        let parsed = Url::parse(document_url).ok()?;
        let origin = parsed.origin();
        if !origin.is_tuple() {
            return None;
        }
        Some(Self::new(&origin.ascii_serialization(), proxy_base_path))
    }

    /// `scheme://host[:port]` of the fetched document.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Mount path of the proxy, without trailing slash.
    pub fn proxy_base_path(&self) -> &str {
        &self.proxy_base_path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_origin_from_url() {
        let ctx = RewriteContext::from_url("https://example.com/a/b?c=d", "/proxy")
            .expect("tuple origin");
        assert_eq!(ctx.origin(), "https://example.com");
        assert_eq!(ctx.proxy_base_path(), "/proxy");
    }

    #[test]
    fn test_origin_keeps_non_default_port() {
        let ctx = RewriteContext::from_url("http://127.0.0.1:8080/x", "/proxy/")
            .expect("tuple origin");
        assert_eq!(ctx.origin(), "http://127.0.0.1:8080");
        assert_eq!(ctx.proxy_base_path(), "/proxy");
    }

    #[test]
    fn test_opaque_origin_yields_none() {
        assert!(RewriteContext::from_url("data:text/html,hello", "/proxy").is_none());
        assert!(RewriteContext::from_url("not a url", "/proxy").is_none());
    }
}
