//! Cancellation utilities
//!
//! Provides first-class cancellation handles for requests and streams.
//! A triggered handle makes the affected operation fail with
//! [`LlmError::Cancelled`] instead of completing normally.

use crate::error::LlmError;
use crate::stream::ChatStream;
use tokio_util::sync::CancellationToken;

/// A handle that can be used to request cancellation.
///
/// Clones share the same underlying token, so any clone can cancel the
/// operation the handle was attached to.
#[derive(Clone, Debug, Default)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Create a new, untriggered cancel handle.
    pub fn new() -> Self {
        Self {
            token: CancellationToken::new(),
        }
    }

    /// Request cancellation. In-flight requests observing this handle fail
    /// with [`LlmError::Cancelled`]; dropping the cancelled request or
    /// stream closes the underlying HTTP connection so the service stops
    /// generating tokens.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Check if cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Wait until cancellation is requested.
    pub async fn cancelled(&self) {
        self.token.cancelled().await;
    }
}

/// Create a standalone cancel handle that can be shared across tasks.
pub fn new_cancel_handle() -> CancelHandle {
    CancelHandle::new()
}

/// Make a ChatStream cancellable and return its cancel handle.
pub fn make_cancellable_stream(stream: ChatStream) -> (ChatStream, CancelHandle) {
    let handle = CancelHandle::new();
    let wrapped = wrap_cancellable(stream, handle.clone());
    (wrapped, handle)
}

/// Wrap a ChatStream so a triggered `handle` surfaces as a terminal
/// `Err(LlmError::Cancelled)` item.
pub fn wrap_cancellable(stream: ChatStream, handle: CancelHandle) -> ChatStream {
    let mut inner = stream;
    let s = async_stream::stream! {
        use futures::StreamExt;
        loop {
            if handle.is_cancelled() {
                yield Err(LlmError::Cancelled);
                break;
            }
            tokio::select! {
                biased;
                _ = handle.cancelled() => {
                    yield Err(LlmError::Cancelled);
                    break;
                }
                item = inner.next() => {
                    match item {
                        Some(item) => yield item,
                        None => break,
                    }
                }
            }
        }
    };
    Box::pin(s)
}
