//! Progress reporting for streamed uploads
//!
//! [`ProgressBody`] chops an in-memory payload into fixed-size chunks and
//! invokes the sink after each chunk is handed to the transport, so observers
//! see a non-decreasing sequence of byte counts ending at the payload total.

use bytes::Bytes;
use futures::Stream;
use pin_project_lite::pin_project;
use std::convert::Infallible;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

/// Chunk size for progress granularity
pub(crate) const PROGRESS_CHUNK_BYTES: usize = 64 * 1024;

/// One progress notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    pub transferred: u64,
    pub total: u64,
}

impl Progress {
    /// Percentage in [0, 100]. An empty payload reports 100 immediately.
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.transferred.min(self.total) * 100) / self.total) as u8
    }
}

/// Callback invoked on each progress notification
pub type ProgressSink = Arc<dyn Fn(Progress) + Send + Sync>;

pin_project! {
    /// Request body that reports transferred bytes through a [`ProgressSink`]
    pub struct ProgressBody {
        payload: Bytes,
        offset: usize,
        total: u64,
        sink: ProgressSink,
    }
}

impl ProgressBody {
    pub fn new(payload: Bytes, sink: ProgressSink) -> Self {
        let total = payload.len() as u64;
        Self {
            payload,
            offset: 0,
            total,
            sink,
        }
    }
}

impl Stream for ProgressBody {
    type Item = Result<Bytes, Infallible>;

    fn poll_next(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.project();
        if *this.offset >= this.payload.len() {
            // Empty payloads still report a single terminal tick
            if this.payload.is_empty() && *this.offset == 0 {
                *this.offset = 1;
                (this.sink)(Progress {
                    transferred: 0,
                    total: 0,
                });
            }
            return Poll::Ready(None);
        }

        let end = (*this.offset + PROGRESS_CHUNK_BYTES).min(this.payload.len());
        let chunk = this.payload.slice(*this.offset..end);
        *this.offset = end;

        (this.sink)(Progress {
            transferred: end as u64,
            total: *this.total,
        });

        Poll::Ready(Some(Ok(chunk)))
    }
}
