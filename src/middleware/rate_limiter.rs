use crate::errors::ServiceError;
use crate::routes::AppState;
use actix_web::{
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    http::header,
    Error as ActixError,
};
use dashmap::DashMap;
use futures_util::future::{ok, LocalBoxFuture, Ready};
use governor::{
    clock::QuantaClock,
    middleware::NoOpMiddleware,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter as GovernorRateLimiter,
};
use std::num::NonZeroU32;
use std::sync::Arc;
use std::task::{Context, Poll};
use std::time::{Duration, Instant};

const REQUESTS_PER_MINUTE: NonZeroU32 = match NonZeroU32::new(100) {
    Some(n) => n,
    None => unreachable!(),
};
const BURST_SIZE: NonZeroU32 = match NonZeroU32::new(10) {
    Some(n) => n,
    None => unreachable!(),
};
const SWEEP_INTERVAL: Duration = Duration::from_secs(3600);

type DirectLimiter = GovernorRateLimiter<NotKeyed, InMemoryState, QuantaClock, NoOpMiddleware>;

#[derive(Clone)]
pub struct RateLimiterEntry {
    pub limiter: Arc<DirectLimiter>,
    pub last_used: Instant,
}

impl RateLimiterEntry {
    fn new() -> Self {
        RateLimiterEntry {
            limiter: Arc::new(GovernorRateLimiter::direct_with_clock(
                Quota::per_minute(REQUESTS_PER_MINUTE).allow_burst(BURST_SIZE),
                QuantaClock::default(),
            )),
            last_used: Instant::now(),
        }
    }
}

type LimiterMap = Arc<DashMap<String, RateLimiterEntry>>;

/// Per-client rate limiting middleware
pub struct UserRateLimiterMiddleware<S> {
    service: S,
    rate_limiters: LimiterMap,
}

/// Rate limiter initializer. Every worker's middleware shares one limiter map,
/// so a client's quota holds across the whole server.
#[derive(Clone)]
pub struct UserRateLimiter {
    rate_limiters: LimiterMap,
}

impl UserRateLimiter {
    /// Must be called from within the actix runtime; spawns the sweep task.
    pub fn new() -> Self {
        let rate_limiters: LimiterMap = Arc::new(DashMap::new());

        let sweep_target = rate_limiters.clone();
        actix_web::rt::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            loop {
                interval.tick().await;
                perform_cleanup(&sweep_target);
            }
        });

        UserRateLimiter { rate_limiters }
    }
}

impl<S, B> Transform<S, ServiceRequest> for UserRateLimiter
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = UserRateLimiterMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(UserRateLimiterMiddleware {
            service,
            rate_limiters: self.rate_limiters.clone(),
        })
    }
}

/// Keys a request by the user id in a valid token, otherwise by peer IP.
fn client_key(req: &ServiceRequest) -> String {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| {
            let value = value.to_str().ok()?;
            let app_state = req.app_data::<actix_web::web::Data<AppState>>()?;
            app_state
                .auth_service
                .verify_header(value)
                .ok()
                .map(|claims| format!("user:{}", claims.user_id))
        })
        .unwrap_or_else(|| {
            req.peer_addr()
                .map(|addr| format!("ip:{}", addr.ip()))
                .unwrap_or_else(|| "unknown".to_string())
        })
}

impl<S, B> Service<ServiceRequest> for UserRateLimiterMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let key = client_key(&req);

        let limiter = {
            let mut entry = self
                .rate_limiters
                .entry(key.clone())
                .or_insert_with(RateLimiterEntry::new);
            entry.value_mut().last_used = Instant::now();
            entry.value().limiter.clone()
        };

        if limiter.check().is_err() {
            log::warn!("Rate limit exceeded for {}", key);
            return Box::pin(async move { Err(ServiceError::RateLimit.into()) });
        }

        let fut = self.service.call(req);
        Box::pin(fut)
    }
}

fn perform_cleanup(rate_limiters: &DashMap<String, RateLimiterEntry>) {
    let initial_count = rate_limiters.len();
    let now = Instant::now();

    rate_limiters.retain(|_, entry| now.duration_since(entry.last_used) < SWEEP_INTERVAL);

    let current_count = rate_limiters.len();
    let removed = initial_count - current_count;

    if removed > 0 {
        log::info!(
            "Cleaned up rate limiters. Removed: {}, Remaining: {}",
            removed,
            current_count
        );
    }
}
