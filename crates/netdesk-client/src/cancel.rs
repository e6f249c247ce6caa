//! Request cancellation

use crate::error::{ClientError, ClientResult};
use std::future::Future;
use tokio_util::sync::CancellationToken;

/// Race a backend call against the view's cancellation token.
///
/// An already-cancelled token wins without polling the request.
pub async fn with_cancel<T, F>(cancel: &CancellationToken, request: F) -> ClientResult<T>
where
    F: Future<Output = ClientResult<T>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => {
            tracing::debug!("request dropped: view cancelled");
            Err(ClientError::Cancelled)
        }
        result = request => result,
    }
}
