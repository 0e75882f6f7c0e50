use crate::http::request::RequestLine;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("request line has fewer than two tokens")]
    MalformedRequestLine,
}

/// Extracts the method and target from the first line of `buf`.
///
/// Only bytes before the first `\n` are looked at. Tokens are separated by
/// runs of ASCII whitespace; the version token and anything after the second
/// token are ignored. Non-UTF-8 bytes are replaced rather than rejected, so
/// an odd method still ends up as a 405 instead of a 400.
pub fn parse_request_line(buf: &[u8]) -> Result<RequestLine, ParseError> {
    let line = first_line(buf);

    let mut tokens = line
        .split(|b| b.is_ascii_whitespace())
        .filter(|t| !t.is_empty());

    let method = tokens.next().ok_or(ParseError::MalformedRequestLine)?;
    let target = tokens.next().ok_or(ParseError::MalformedRequestLine)?;

    Ok(RequestLine::new(
        String::from_utf8_lossy(method),
        String::from_utf8_lossy(target),
    ))
}

fn first_line(buf: &[u8]) -> &[u8] {
    match buf.iter().position(|&b| b == b'\n') {
        Some(end) => &buf[..end],
        None => buf,
    }
}
