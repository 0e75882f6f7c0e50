/// The method the server answers. Anything else gets a 405.
pub const SUPPORTED_METHOD: &str = "GET";

/// The only target the server serves. Anything else gets a 404.
pub const ROOT_TARGET: &str = "/";

/// The first two tokens of a request line.
///
/// Both are kept verbatim; the HTTP version and everything after it are
/// ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestLine {
    /// Request method, compared case-sensitively (e.g. "GET")
    pub method: String,
    /// Request target (e.g. "/")
    pub target: String,
}

impl RequestLine {
    pub fn new(method: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            target: target.into(),
        }
    }

    pub fn is_get(&self) -> bool {
        self.method == SUPPORTED_METHOD
    }

    pub fn is_root(&self) -> bool {
        self.target == ROOT_TARGET
    }
}
