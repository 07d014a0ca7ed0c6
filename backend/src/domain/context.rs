//! Per-request cancellation and deadline context.
//!
//! Every use-case and port call receives a [`RequestContext`]. The service
//! races each collaborator call against the context so a caller that gives
//! up (cancels or runs out of time) never receives late side effects such as
//! a freshly minted token.

use std::future::{self, Future};
use std::time::Duration;

use thiserror::Error;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Why a request stopped before completing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CancelReason {
    /// The caller cancelled the request.
    #[error("request cancelled by caller")]
    Cancelled,
    /// The request deadline passed.
    #[error("request deadline exceeded")]
    DeadlineExceeded,
}

/// Cancellation token plus optional deadline for one request.
///
/// Cloning shares the same token: cancelling any clone cancels them all.
///
/// # Examples
/// ```
/// use sso::domain::{CancelReason, RequestContext};
///
/// let ctx = RequestContext::new();
/// assert!(ctx.check().is_ok());
/// ctx.cancel();
/// assert_eq!(ctx.check(), Err(CancelReason::Cancelled));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    token: CancellationToken,
    deadline: Option<Instant>,
}

impl RequestContext {
    /// Context that is never cancelled unless [`Self::cancel`] is called.
    pub fn new() -> Self {
        Self::default()
    }

    /// Context driven by an externally owned cancellation token.
    pub fn from_token(token: CancellationToken) -> Self {
        Self {
            token,
            deadline: None,
        }
    }

    /// Attach a deadline. An earlier existing deadline is kept.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(match self.deadline {
            Some(existing) => existing.min(deadline),
            None => deadline,
        });
        self
    }

    /// Attach a deadline `timeout` from now.
    ///
    /// A timeout too large to represent leaves the context without a new
    /// deadline.
    #[must_use]
    pub fn with_timeout(self, timeout: Duration) -> Self {
        match Instant::now().checked_add(timeout) {
            Some(deadline) => self.with_deadline(deadline),
            None => self,
        }
    }

    /// Derive a context that is cancelled with this one but can also be
    /// cancelled on its own.
    #[must_use]
    pub fn child(&self) -> Self {
        Self {
            token: self.token.child_token(),
            deadline: self.deadline,
        }
    }

    /// Cancel this context and every child derived from it.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    /// Underlying token, for adapters that propagate it to their drivers.
    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.token
    }

    /// Deadline, if one was set.
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// Fail fast if the request has already ended.
    pub fn check(&self) -> Result<(), CancelReason> {
        if self.token.is_cancelled() {
            return Err(CancelReason::Cancelled);
        }
        match self.deadline {
            Some(deadline) if Instant::now() >= deadline => Err(CancelReason::DeadlineExceeded),
            _ => Ok(()),
        }
    }

    /// Drive `fut` to completion unless the request ends first.
    ///
    /// The future is dropped as soon as cancellation or the deadline wins,
    /// so no code after its next await point runs.
    pub async fn guard<F>(&self, fut: F) -> Result<F::Output, CancelReason>
    where
        F: Future,
    {
        self.check()?;

        let deadline = async {
            match self.deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;
            () = self.token.cancelled() => Err(CancelReason::Cancelled),
            () = deadline => Err(CancelReason::DeadlineExceeded),
            output = fut => Ok(output),
        }
    }
}
