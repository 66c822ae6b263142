//! Rate limiting middleware for bot updates
//!
//! Buffers the update body, classifies it into an action bucket and asks the
//! rate limiter before the handler runs. Rejected updates are answered with
//! the slow-down message; admitted ones carry the remaining allowance in a
//! request extension.

use std::{
    future::Future,
    pin::Pin,
    sync::Arc,
    task::{Context, Poll},
};

use application::RateLimitService;
use axum::{
    Json,
    body::{Body, Bytes},
    extract::Request,
    response::{IntoResponse, Response},
};
use domain::SubjectId;
use tower::{Layer, Service};
use tracing::{debug, warn};

use crate::{error::ApiError, messages, reply::BotReply, update::Update};

/// Requests the subject may still send in the current window
///
/// `None` when the action has no policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RemainingRequests(pub Option<u32>);

/// Layer that applies update rate limiting
#[derive(Clone, Debug)]
pub struct UpdateRateLimitLayer {
    limiter: Arc<RateLimitService>,
    enabled: bool,
    max_body_bytes: usize,
}

impl UpdateRateLimitLayer {
    #[must_use]
    pub const fn new(limiter: Arc<RateLimitService>, enabled: bool, max_body_bytes: usize) -> Self {
        Self {
            limiter,
            enabled,
            max_body_bytes,
        }
    }
}

impl<S> Layer<S> for UpdateRateLimitLayer {
    type Service = UpdateRateLimiter<S>;

    fn layer(&self, inner: S) -> Self::Service {
        UpdateRateLimiter {
            inner,
            limiter: Arc::clone(&self.limiter),
            enabled: self.enabled,
            max_body_bytes: self.max_body_bytes,
        }
    }
}

/// Middleware service for update rate limiting
#[derive(Clone, Debug)]
pub struct UpdateRateLimiter<S> {
    inner: S,
    limiter: Arc<RateLimitService>,
    enabled: bool,
    max_body_bytes: usize,
}

/// Outcome of consulting the limiter for one update
enum Verdict {
    Pass,
    Admit(RemainingRequests),
    Reject(Response),
}

async fn judge(limiter: &RateLimitService, body: &Bytes) -> Verdict {
    // Malformed bodies are left for the handler's extractor to reject
    let Ok(update) = serde_json::from_slice::<Update>(body) else {
        return Verdict::Pass;
    };
    let (Some(raw_id), Some(action)) = (update.sender_id(), update.action()) else {
        return Verdict::Pass;
    };
    let subject = match SubjectId::from_signed(raw_id) {
        Ok(subject) => subject,
        Err(e) => return Verdict::Reject(ApiError::from(e).into_response()),
    };

    if !limiter.is_allowed(subject, action).await {
        warn!(%subject, %action, "Update rejected by rate limiter");
        let chat_id = update.chat_id().unwrap_or(raw_id);
        let reply = BotReply::text(chat_id, messages::RATE_LIMIT_EXCEEDED);
        return Verdict::Reject(Json(reply).into_response());
    }

    let remaining = limiter.remaining(subject, action).await;
    debug!(%subject, %action, ?remaining, "Update admitted");
    Verdict::Admit(RemainingRequests(remaining))
}

impl<S> Service<Request> for UpdateRateLimiter<S>
where
    S: Service<Request, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let enabled = self.enabled;
        let limiter = Arc::clone(&self.limiter);
        let max_body_bytes = self.max_body_bytes;
        let mut inner = self.inner.clone();

        Box::pin(async move {
            if !enabled {
                return inner.call(req).await;
            }

            let (parts, body) = req.into_parts();
            let Ok(bytes) = axum::body::to_bytes(body, max_body_bytes).await else {
                return Ok(ApiError::PayloadTooLarge.into_response());
            };

            let verdict = judge(&limiter, &bytes).await;
            let mut req = Request::from_parts(parts, Body::from(bytes));
            match verdict {
                Verdict::Pass => inner.call(req).await,
                Verdict::Admit(remaining) => {
                    req.extensions_mut().insert(remaining);
                    inner.call(req).await
                },
                Verdict::Reject(response) => Ok(response),
            }
        })
    }
}
