//! Streaming chat responses — a pull sequence of decoded text chunks.
//!
//! Wraps the raw HTTP byte stream of an invoke call and yields each chunk of
//! UTF-8 text as it arrives, without buffering the whole body. Nothing is
//! fetched until the consumer asks for the next chunk, and dropping the
//! stream before exhaustion closes the underlying connection.

use std::pin::Pin;
use std::task::{Context, Poll};

use bytes::Bytes;
use futures::stream::Stream;
use reqwest::header::HeaderMap;

use crate::client::chat::THREAD_ID_HEADER;
use crate::error::{ObotError, ObotResult};

/// A finite stream of text chunks from a streaming chat call.
///
/// The response headers are captured when the stream opens, so the
/// continuing thread id is available from [`thread_id()`] before (or while)
/// chunks are consumed. The sequence ends when the server closes the
/// connection; it is not restartable — retrying means issuing a fresh call.
///
/// # Example
///
/// ```no_run
/// # async fn example(mut stream: obot_rs::TextStream) -> obot_rs::ObotResult<()> {
/// while let Some(chunk) = stream.next().await {
///     print!("{}", chunk?);
/// }
/// # Ok(())
/// # }
/// ```
///
/// [`thread_id()`]: TextStream::thread_id
pub struct TextStream {
    headers: HeaderMap,
    inner: Pin<Box<dyn Stream<Item = reqwest::Result<Bytes>> + Send>>,
    /// Incomplete UTF-8 tail carried over from the previous chunk.
    carry: Vec<u8>,
    done: bool,
}

impl std::fmt::Debug for TextStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextStream")
            .field("done", &self.done)
            .finish_non_exhaustive()
    }
}

impl TextStream {
    pub(crate) fn new(response: reqwest::Response) -> Self {
        let headers = response.headers().clone();
        Self {
            headers,
            inner: Box::pin(response.bytes_stream()),
            carry: Vec::new(),
            done: false,
        }
    }

    /// The response headers captured when the stream opened.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// The continuing thread id from the `X-Obot-Thread-Id` response header,
    /// if the server sent one.
    pub fn thread_id(&self) -> Option<&str> {
        self.headers
            .get(THREAD_ID_HEADER)
            .and_then(|v| v.to_str().ok())
    }

    /// Get the next chunk of decoded text.
    ///
    /// Returns `None` when the server has closed the stream. Returns
    /// `Some(Err(...))` on transport failures or invalid UTF-8.
    pub async fn next(&mut self) -> Option<ObotResult<String>> {
        futures::future::poll_fn(|cx| Pin::new(&mut *self).poll_next(cx)).await
    }
}

impl Stream for TextStream {
    type Item = ObotResult<String>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        loop {
            if this.done {
                return Poll::Ready(None);
            }
            match this.inner.as_mut().poll_next(cx) {
                Poll::Pending => return Poll::Pending,
                Poll::Ready(None) => {
                    this.done = true;
                    if !this.carry.is_empty() {
                        this.carry.clear();
                        return Poll::Ready(Some(Err(ObotError::protocol(
                            "stream ended inside a UTF-8 sequence",
                        ))));
                    }
                    return Poll::Ready(None);
                }
                Poll::Ready(Some(Err(err))) => {
                    this.done = true;
                    return Poll::Ready(Some(Err(err.into())));
                }
                Poll::Ready(Some(Ok(chunk))) => {
                    match decode_chunk(&mut this.carry, &chunk) {
                        Ok(Some(text)) => return Poll::Ready(Some(Ok(text))),
                        // Chunk held only a partial code point — poll again.
                        Ok(None) => continue,
                        Err(err) => {
                            this.done = true;
                            return Poll::Ready(Some(Err(err)));
                        }
                    }
                }
            }
        }
    }
}

/// Decode one network chunk into text, carrying incomplete trailing UTF-8
/// sequences over to the next chunk. Returns `Ok(None)` when the chunk
/// contained no complete code point yet.
pub(crate) fn decode_chunk(carry: &mut Vec<u8>, chunk: &[u8]) -> ObotResult<Option<String>> {
    let mut buf = std::mem::take(carry);
    buf.extend_from_slice(chunk);

    match String::from_utf8(buf) {
        Ok(text) => {
            if text.is_empty() {
                Ok(None)
            } else {
                Ok(Some(text))
            }
        }
        Err(err) => {
            let utf8_err = err.utf8_error();
            if utf8_err.error_len().is_some() {
                return Err(ObotError::protocol(format!(
                    "invalid UTF-8 in stream: {utf8_err}"
                )));
            }
            // Valid prefix + incomplete tail: emit the prefix, keep the tail.
            let mut bytes = err.into_bytes();
            let tail = bytes.split_off(utf8_err.valid_up_to());
            *carry = tail;
            let text = String::from_utf8_lossy(&bytes).into_owned();
            if text.is_empty() {
                Ok(None)
            } else {
                Ok(Some(text))
            }
        }
    }
}
