//! Per-client fixed-window rate limiting for the parse endpoint.
//!
//! A client's window opens on its first request and lasts `window`; at most
//! `max` requests are admitted inside it. Counters live in a `DashMap`, whose
//! per-key entry lock makes check-and-increment atomic across concurrent
//! requests from the same client.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::{ConnectInfo, Request, State},
    middleware::Next,
    response::Response,
};
use dashmap::DashMap;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::errors::AppError;
use crate::state::AppState;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

pub struct RateLimiter {
    max: u32,
    window: Duration,
    trust_proxy: bool,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max: u32, window: Duration, trust_proxy: bool) -> Self {
        Self {
            max,
            window,
            trust_proxy,
            windows: DashMap::new(),
        }
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Counts one request for `key` and decides whether it may proceed.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            *entry = Window {
                started: now,
                count: 0,
            };
        }

        if entry.count >= self.max {
            return Decision::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(entry.started)),
            };
        }

        entry.count += 1;
        Decision::Allowed {
            remaining: self.max - entry.count,
        }
    }

    /// Drops windows that have fully elapsed.
    pub fn prune(&self) {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
    }

    pub fn tracked_clients(&self) -> usize {
        self.windows.len()
    }

    fn client_key(&self, req: &Request, peer: Option<SocketAddr>) -> String {
        if self.trust_proxy {
            let forwarded = req
                .headers()
                .get("x-forwarded-for")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|hop| !hop.is_empty());
            if let Some(hop) = forwarded {
                return hop.to_string();
            }
        }
        peer.map(|addr| addr.ip().to_string())
            .unwrap_or_else(|| "unknown".to_string())
    }
}

/// Middleware guarding `/api/parse`. Rejected requests never reach the handler.
pub async fn enforce(
    State(state): State<AppState>,
    peer: Option<ConnectInfo<SocketAddr>>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let limiter = &state.rate_limiter;
    let key = limiter.client_key(&req, peer.map(|ConnectInfo(addr)| addr));

    match limiter.check(&key) {
        Decision::Allowed { remaining } => {
            debug!(client = %key, remaining, "rate limit check passed");
            Ok(next.run(req).await)
        }
        Decision::Limited { retry_after } => {
            warn!(client = %key, ?retry_after, "rate limit exceeded");
            Err(AppError::RateLimited { retry_after })
        }
    }
}

/// Periodically evicts expired windows so idle clients do not accumulate.
pub fn spawn_pruner(limiter: Arc<RateLimiter>) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(limiter.window().max(Duration::from_secs(1)));
        loop {
            ticker.tick().await;
            limiter.prune();
            debug!(clients = limiter.tracked_clients(), "pruned rate-limit windows");
        }
    })
}
