use bytes::Bytes;

/// Page served for `GET /`.
pub const SUCCESS_PAGE: &[u8] =
    b"<!DOCTYPE html>\n<html>\n<body>\nHello CS 221\n</body>\n</html>\n\n";

/// Page served for every rejected request, whatever the status code.
pub const ERROR_PAGE: &[u8] = b"<!DOCTYPE html>\n<html>\n<body>\nNot found\n</body>\n</html>\n\nConnection closed by foreign host.\n";

pub const TEXT_PLAIN: &str = "text/plain";

/// HTTP status codes the server can answer with.
///
/// - `Ok` (200): `GET /`
/// - `BadRequest` (400): request line with fewer than two tokens
/// - `NotFound` (404): `GET` for any target other than `/`
/// - `MethodNotAllowed` (405): any method other than `GET`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    /// 200 OK
    Ok,
    /// 400 Bad Request
    BadRequest,
    /// 404 Not Found
    NotFound,
    /// 405 Method Not Allowed
    MethodNotAllowed,
}

impl StatusCode {
    /// Returns the numeric HTTP status code.
    ///
    /// # Example
    ///
    /// ```
    /// # use hello_responder::http::response::StatusCode;
    /// assert_eq!(StatusCode::Ok.as_u16(), 200);
    /// assert_eq!(StatusCode::MethodNotAllowed.as_u16(), 405);
    /// ```
    pub fn as_u16(&self) -> u16 {
        match self {
            StatusCode::Ok => 200,
            StatusCode::BadRequest => 400,
            StatusCode::NotFound => 404,
            StatusCode::MethodNotAllowed => 405,
        }
    }

    /// Returns the reason phrase written on the status line.
    pub fn reason_phrase(&self) -> &'static str {
        match self {
            StatusCode::Ok => "OK",
            StatusCode::BadRequest => "Bad Request",
            StatusCode::NotFound => "Not Found",
            StatusCode::MethodNotAllowed => "Method Not Allowed",
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, StatusCode::Ok)
    }
}

/// A response ready to be framed and sent.
///
/// There is no Content-Length field: the writer derives it from
/// `body` when the header block is serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub content_type: String,
    pub body: Bytes,
}

/// Builder for constructing responses in a fluent style.
///
/// # Example
///
/// ```ignore
/// let response = ResponseBuilder::new(StatusCode::Ok)
///     .content_type("text/html")
///     .body("<p>hi</p>")
///     .build();
/// ```
pub struct ResponseBuilder {
    status: StatusCode,
    content_type: String,
    body: Bytes,
}

impl ResponseBuilder {
    /// Starts a `text/plain` response with an empty body.
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            content_type: TEXT_PLAIN.to_string(),
            body: Bytes::new(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn build(self) -> Response {
        Response {
            status: self.status,
            content_type: self.content_type,
            body: self.body,
        }
    }
}

impl Response {
    /// The 200 response for `GET /`.
    pub fn ok() -> Self {
        ResponseBuilder::new(StatusCode::Ok)
            .body(Bytes::from_static(SUCCESS_PAGE))
            .build()
    }

    /// A rejection. Only the status line varies; the body is always
    /// [`ERROR_PAGE`].
    pub fn error(status: StatusCode) -> Self {
        ResponseBuilder::new(status)
            .body(Bytes::from_static(ERROR_PAGE))
            .build()
    }

    pub fn bad_request() -> Self {
        Self::error(StatusCode::BadRequest)
    }

    pub fn not_found() -> Self {
        Self::error(StatusCode::NotFound)
    }

    pub fn method_not_allowed() -> Self {
        Self::error(StatusCode::MethodNotAllowed)
    }

    pub fn content_length(&self) -> usize {
        self.body.len()
    }
}
