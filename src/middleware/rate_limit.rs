use std::collections::HashMap;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use crate::app::AppState;
use crate::config::RateLimitConfig;
use crate::error::ApiError;

const PRUNE_THRESHOLD: usize = 10_000;

/// Fixed-window request counter keyed by client address.
///
/// Each address gets its own window, started by its first request.
/// Expired windows are swept once the table holds `prune_threshold`
/// addresses, at most once per window length.
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    prune_threshold: usize,
    table: Mutex<Table>,
}

#[derive(Debug, Default)]
struct Table {
    windows: HashMap<IpAddr, Window>,
    last_prune: Option<Instant>,
}

impl Table {
    fn prune_due(&self, now: Instant, span: Duration, threshold: usize) -> bool {
        self.windows.len() >= threshold
            && self.last_prune.map_or(true, |at| now.duration_since(at) >= span)
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            prune_threshold: PRUNE_THRESHOLD,
            table: Mutex::new(Table::default()),
        }
    }

    pub fn with_prune_threshold(mut self, threshold: usize) -> Self {
        self.prune_threshold = threshold;
        self
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.max_requests, config.window())
    }

    pub fn check(&self, addr: IpAddr) -> Decision {
        self.check_at(addr, Instant::now())
    }

    /// Count one request from `addr` at `now`
    pub fn check_at(&self, addr: IpAddr, now: Instant) -> Decision {
        let mut table = self.table.lock().unwrap_or_else(PoisonError::into_inner);

        let span = self.window;
        if table.prune_due(now, span, self.prune_threshold) {
            table.windows.retain(|_, w| now.duration_since(w.started) < span);
            table.last_prune = Some(now);
        }

        let window = table.windows.entry(addr).or_insert(Window { started: now, count: 0 });
        if now.duration_since(window.started) >= self.window {
            *window = Window { started: now, count: 0 };
        }
        window.count = window.count.saturating_add(1);

        Decision {
            allowed: window.count <= self.max_requests,
            limit: self.max_requests,
            remaining: self.max_requests.saturating_sub(window.count),
            reset_after: self.window.saturating_sub(now.duration_since(window.started)),
        }
    }
}

impl Decision {
    fn apply_headers(&self, headers: &mut HeaderMap) {
        // Round up so clients never retry a second early
        let reset = self.reset_after.as_secs() + u64::from(self.reset_after.subsec_nanos() > 0);
        headers.insert("ratelimit-limit", HeaderValue::from(self.limit));
        headers.insert("ratelimit-remaining", HeaderValue::from(self.remaining));
        headers.insert("ratelimit-reset", HeaderValue::from(reset));
        if !self.allowed {
            headers.insert(RETRY_AFTER, HeaderValue::from(reset));
        }
    }
}

/// Rejects requests past the per-address cap with 429, for every route.
pub async fn rate_limit(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let Some(limiter) = state.limiter.as_deref() else {
        return next.run(request).await;
    };

    let addr = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(IpAddr::V4(Ipv4Addr::UNSPECIFIED));

    let decision = limiter.check(addr);

    let mut response = if decision.allowed {
        next.run(request).await
    } else {
        debug!("Rate limit exceeded for {}", addr);
        ApiError::too_many_requests("Too many requests, please try again later.").into_response()
    };

    decision.apply_headers(response.headers_mut());
    response
}
