//! Request and handler contracts

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::domain::{DomainError, Outcome};

/// An immutable value describing one unit of work.
///
/// Each request type names exactly one response payload type.
pub trait Request: Send + Sync + 'static {
    type Response: Send + 'static;

    /// Stable name used in logs and configuration errors
    const NAME: &'static str;
}

/// The single piece of logic bound to one request type.
///
/// Expected failures come back as `Ok(Outcome::Failure)`; `Err` means an
/// infrastructure fault or cancellation and is propagated untouched.
#[async_trait]
pub trait RequestHandler<R: Request>: Send + Sync {
    async fn handle(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> Result<Outcome<R::Response>, DomainError>;
}

/// Fail fast with [`DomainError::Cancelled`] once the caller gave up
pub fn ensure_not_cancelled(cancel: &CancellationToken) -> Result<(), DomainError> {
    if cancel.is_cancelled() {
        return Err(DomainError::Cancelled);
    }

    Ok(())
}
