use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::http::response::Response;

const HTTP_VERSION: &str = "HTTP/1.1";

/// Serializes the status line and headers, including the blank line that
/// ends the header block.
pub fn serialize_head(resp: &Response) -> BytesMut {
    let head = format!(
        "{} {} {}\r\nContent-Type: {}\r\nContent-Length: {}\r\n\r\n",
        HTTP_VERSION,
        resp.status.as_u16(),
        resp.status.reason_phrase(),
        resp.content_type,
        resp.content_length(),
    );

    let mut buf = BytesMut::with_capacity(head.len());
    buf.put_slice(head.as_bytes());
    buf
}

impl Response {
    /// The full wire form: header block followed by the body.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = serialize_head(self);
        buf.put_slice(&self.body);
        buf.freeze()
    }
}

/// Sends one response as two writes, the header block and then the body.
pub struct ResponseWriter {
    head: Bytes,
    body: Bytes,
}

impl ResponseWriter {
    pub fn new(response: &Response) -> Self {
        Self {
            head: serialize_head(response).freeze(),
            body: response.body.clone(),
        }
    }

    pub fn len(&self) -> usize {
        self.head.len() + self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub async fn write_to_stream<W>(&self, stream: &mut W) -> std::io::Result<()>
    where
        W: AsyncWrite + Unpin,
    {
        stream.write_all(&self.head).await?;
        if !self.body.is_empty() {
            stream.write_all(&self.body).await?;
        }
        stream.flush().await
    }
}
