use axum::http::Request;
use futures::Future;
use std::{cell::RefCell, collections::BTreeMap, fmt, time::Instant};
use tower_http::trace::MakeSpan;
use uuid::Uuid;

pub use tracing::{debug, error, info, warn};

/// Request ID tracking information
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RequestId(pub String);

impl Default for RequestId {
    fn default() -> Self {
        RequestId(Uuid::new_v4().to_string())
    }
}

impl RequestId {
    pub fn new(value: impl Into<String>) -> Self {
        RequestId(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

tokio::task_local! {
    static CURRENT_REQUEST_ID: RefCell<Option<RequestId>>;
}

/// Runs `future` with `request_id` visible to [`current_request_id`].
pub async fn scope_request_id<Fut, R>(request_id: RequestId, future: Fut) -> R
where
    Fut: Future<Output = R>,
{
    CURRENT_REQUEST_ID
        .scope(RefCell::new(Some(request_id)), future)
        .await
}

pub fn current_request_id() -> Option<RequestId> {
    CURRENT_REQUEST_ID
        .try_with(|cell| cell.borrow().clone())
        .ok()
        .flatten()
}

#[derive(Clone, Default)]
pub struct RequestSpanMaker;

impl<B> MakeSpan<B> for RequestSpanMaker {
    fn make_span(&mut self, request: &Request<B>) -> tracing::Span {
        let request_id = request
            .extensions()
            .get::<RequestId>()
            .cloned()
            .or_else(|| {
                request
                    .headers()
                    .get(crate::middleware_helpers::request_id::REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .map(RequestId::new)
            })
            .unwrap_or_default();

        tracing::info_span!(
            "http.request",
            request_id = %request_id.as_str(),
            method = %request.method(),
            uri = %request.uri(),
        )
    }
}

/// Runs a task and logs how long it took and how it ended.
///
/// Expected business failures (`is_expected` returns true) are logged at `warn`,
/// anything else at `error`.
pub async fn timed_operation<F, Fut, T, E>(
    operation_name: &str,
    tags: BTreeMap<&'static str, String>,
    is_expected: impl FnOnce(&E) -> bool,
    task: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: fmt::Display,
{
    let start = Instant::now();
    debug!(operation = %operation_name, tags = ?tags, "Operation started");

    let result = task().await;
    let duration_ms = start.elapsed().as_millis();

    match &result {
        Ok(_) => {
            info!(
                operation = %operation_name,
                duration_ms = %duration_ms,
                tags = ?tags,
                "Operation completed successfully"
            );
        }
        Err(e) if is_expected(e) => {
            warn!(
                operation = %operation_name,
                duration_ms = %duration_ms,
                error = %e,
                tags = ?tags,
                "Operation rejected"
            );
        }
        Err(e) => {
            error!(
                operation = %operation_name,
                duration_ms = %duration_ms,
                error = %e,
                tags = ?tags,
                "Operation failed"
            );
        }
    }

    result
}
