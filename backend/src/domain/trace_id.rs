//! Request-scoped correlation identifier.
//!
//! The tracing middleware puts a `TraceId` into task-local storage for the
//! lifetime of each request; errors built inside that scope pick it up via
//! [`TraceId::current`]. Task-locals are not inherited by spawned tasks, so
//! wrap spawned work in [`TraceId::scope`].

use std::future::Future;

use tokio::task_local;
use uuid::Uuid;

task_local! {
    static TRACE_ID: TraceId;
}

/// Per-request trace identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceId(Uuid);

impl TraceId {
    /// Generate a fresh random identifier.
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Accept a caller-supplied identifier when it is a well-formed UUID.
    ///
    /// # Examples
    /// ```
    /// use scholarlink::domain::TraceId;
    ///
    /// assert!(TraceId::from_header_value("not-a-uuid").is_none());
    /// assert!(TraceId::from_header_value("6f1c0e5e-7d2a-4f7e-9a55-1f3b2d4c6e80").is_some());
    /// ```
    #[must_use]
    pub fn from_header_value(value: &str) -> Option<Self> {
        value.trim().parse().ok()
    }

    /// The identifier in scope for the current task, if any.
    #[must_use]
    pub fn current() -> Option<Self> {
        TRACE_ID.try_with(|id| *id).ok()
    }

    /// Run `fut` with `trace_id` in scope.
    pub async fn scope<Fut>(trace_id: TraceId, fut: Fut) -> Fut::Output
    where
        Fut: Future,
    {
        TRACE_ID.scope(trace_id, fut).await
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for TraceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}
