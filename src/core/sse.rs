//! Decoding of server-sent event streams into JSON chunks.

use bytes::BytesMut;
use futures::{StreamExt, stream::BoxStream};
use serde_json::Value;

use super::error::XaiError;

const DATA_PREFIX: &str = "data:";
const DONE_MARKER: &str = "[DONE]";

/// Incremental decoder for `data:` lines.
///
/// Input is buffered as raw bytes and only whole lines are decoded, so lines and
/// multi-byte characters may be split across network chunks.
#[derive(Debug, Default)]
pub struct SseDecoder {
    buffer: BytesMut,
    done: bool,
}

impl SseDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once `data: [DONE]` was seen; later input is ignored.
    pub fn is_done(&self) -> bool {
        self.done
    }

    pub fn feed(&mut self, chunk: &[u8]) -> Vec<Result<Value, XaiError>> {
        if self.done {
            return Vec::new();
        }
        self.buffer.extend_from_slice(chunk);

        let mut items = Vec::new();
        while let Some(newline) = self.buffer.iter().position(|b| *b == b'\n') {
            let raw = self.buffer.split_to(newline + 1);
            let line = match std::str::from_utf8(&raw) {
                Ok(line) => line.trim_end_matches(['\n', '\r']),
                Err(e) => {
                    items.push(Err(XaiError::Parse {
                        message: "Stream line is not valid UTF-8".to_string(),
                        source: Box::new(e),
                    }));
                    continue;
                }
            };

            // Comments, `event:`/`id:` fields and blank separators carry no payload.
            let Some(data) = line.strip_prefix(DATA_PREFIX) else {
                continue;
            };
            let data = data.trim();
            if data.is_empty() {
                continue;
            }
            if data == DONE_MARKER {
                self.done = true;
                self.buffer.clear();
                break;
            }

            items.push(serde_json::from_str(data).map_err(|e| XaiError::Parse {
                message: format!("Failed to parse stream chunk: {data}"),
                source: Box::new(e),
            }));
        }
        items
    }
}

/// Turn a streaming response body into a stream of decoded chunks.
///
/// The body is not polled again after `data: [DONE]`, and dropping the stream
/// releases the connection.
pub(crate) fn event_stream(response: reqwest::Response) -> BoxStream<'static, Result<Value, XaiError>> {
    let body = response.bytes_stream().boxed();

    futures::stream::unfold(Some((body, SseDecoder::new())), |state| async move {
        let (mut body, mut decoder) = state?;
        let items = match body.next().await? {
            Ok(bytes) => decoder.feed(&bytes),
            Err(e) => vec![Err(XaiError::Network {
                message: format!("Stream interrupted: {e}"),
                source: Box::new(e),
            })],
        };
        let next = (!decoder.is_done()).then_some((body, decoder));
        Some((items, next))
    })
    .flat_map(futures::stream::iter)
    .boxed()
}
