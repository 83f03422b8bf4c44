//! Single-flight session refresh for outgoing API requests.
//!
//! Every request goes through [`AuthRefreshCoordinator::execute`]. When a
//! response comes back 401, the first request to notice starts one refresh;
//! any request that hits a 401 while that refresh is running is queued behind
//! it. Once the refresh settles, every queued request sees the same outcome:
//! on success each is sent again exactly once, on failure each gets the
//! refresh error and the local session is ended.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::sync::oneshot;
use tokio::time::timeout;
use tracing::{debug, info, warn};

use super::transport::Transport;
use crate::auth::{Environment, RefreshBackend};
use crate::config::AuthConfig;
use crate::error::ClientError;
use crate::metrics::{Metrics, MetricsRecorder};
use crate::models::{ApiRequest, ApiResponse};
use crate::utils::log_throttle::LogThrottle;

const WAITER_LOG_WINDOW: Duration = Duration::from_secs(5);

type Outcome = Result<(), ClientError>;
type Waiter = oneshot::Sender<Outcome>;

/// Whether a refresh is running, and who is waiting on it.
///
/// Waiters are only pushed while `in_flight` is set, and the queue is emptied
/// in the same critical section that clears it.
#[derive(Default)]
struct RefreshState {
    in_flight: bool,
    pending: VecDeque<Waiter>,
}

/// What a request does after its first 401.
enum Role {
    /// Runs the refresh and settles everyone queued behind it.
    Leader,
    /// Waits for the running refresh to settle.
    Waiter(oneshot::Receiver<Outcome>),
}

pub struct AuthRefreshCoordinator {
    transport: Arc<dyn Transport>,
    backend: Arc<dyn RefreshBackend>,
    environment: Arc<dyn Environment>,
    metrics: Metrics,
    login_path: String,
    refresh_timeout_in_ms: u64,
    state: Mutex<RefreshState>,
    log_throttle: LogThrottle,
}

impl AuthRefreshCoordinator {
    pub fn new(
        transport: Arc<dyn Transport>,
        backend: Arc<dyn RefreshBackend>,
        environment: Arc<dyn Environment>,
        metrics: Metrics,
        config: &AuthConfig,
    ) -> Self {
        AuthRefreshCoordinator {
            transport,
            backend,
            environment,
            metrics,
            login_path: config.login_path.clone(),
            refresh_timeout_in_ms: config.refresh_timeout_in_ms,
            state: Mutex::new(RefreshState::default()),
            log_throttle: LogThrottle::new(WAITER_LOG_WINDOW),
        }
    }

    /// Sends `request`, transparently recovering from one expired session.
    ///
    /// Any response other than 401 is returned untouched, error statuses included.
    pub async fn execute(&self, mut request: ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = self.transport.send(&request).await?;
        if !response.is_unauthorized() {
            return Ok(response);
        }
        if !request.refreshable {
            debug!(request_id = %request.id, "401 on a non-refreshable request");
            return Err(response.to_error());
        }
        self.handle_unauthorized(&mut request, response).await
    }

    /// Recovers a request that came back 401.
    ///
    /// A request that was already retried once is rejected straight away,
    /// without touching the refresh state.
    pub async fn handle_unauthorized(
        &self,
        request: &mut ApiRequest,
        response: ApiResponse,
    ) -> Result<ApiResponse, ClientError> {
        let original_error = response.to_error();
        if request.retried {
            debug!(
                request_id = %request.id,
                "Request was already retried after a refresh; rejecting"
            );
            return Err(original_error);
        }
        request.retried = true;

        match self.claim(request) {
            Role::Waiter(settled) => {
                // A dropped sender means the leader went away without settling.
                settled.await.unwrap_or(Err(ClientError::RefreshAborted))?;
                self.replay(request).await
            }
            Role::Leader => {
                let mut cycle = RefreshCycle::new(self);
                match self.run_refresh().await {
                    Ok(()) => {
                        cycle.settle(Ok(()));
                        self.replay(request).await
                    }
                    Err(e) => {
                        cycle.settle(Err(e));
                        self.end_session();
                        Err(original_error)
                    }
                }
            }
        }
    }

    /// True while a refresh call is outstanding.
    pub fn is_refreshing(&self) -> bool {
        self.lock_state().in_flight
    }

    /// Number of requests queued behind the running refresh.
    pub fn pending_waiters(&self) -> usize {
        self.lock_state().pending.len()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    fn lock_state(&self) -> MutexGuard<'_, RefreshState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Check-and-enqueue or check-and-lead, in one critical section.
    fn claim(&self, request: &ApiRequest) -> Role {
        let mut state = self.lock_state();
        if !state.in_flight {
            state.in_flight = true;
            drop(state);
            debug!(request_id = %request.id, "Starting session refresh");
            return Role::Leader;
        }

        let (tx, rx) = oneshot::channel();
        state.pending.push_back(tx);
        let queued = state.pending.len();
        drop(state);

        if let Some(suppressed_count) = self.log_throttle.should_emit("refresh.waiter.enqueued") {
            debug!(
                event_name = "client.refresh.waiter.enqueued",
                event_domain = "client",
                request_id = %request.id,
                queued,
                suppressed_count,
                "request queued behind in-flight session refresh"
            );
        }
        Role::Waiter(rx)
    }

    async fn run_refresh(&self) -> Outcome {
        let started = Instant::now();
        let result = match timeout(
            Duration::from_millis(self.refresh_timeout_in_ms),
            self.backend.refresh(),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(ClientError::timeout(
                "session refresh",
                self.refresh_timeout_in_ms,
            )),
        };

        let label = if result.is_ok() { "success" } else { "failure" };
        self.metrics.record_refresh_attempt(label);
        self.metrics
            .record_refresh_duration(started.elapsed().as_secs_f64(), label);

        match &result {
            Ok(()) => info!(
                event_name = "client.refresh.succeeded",
                event_domain = "client",
                elapsed_ms = started.elapsed().as_millis() as u64,
                "session refreshed"
            ),
            Err(e) => warn!(
                event_name = "client.refresh.failed",
                event_domain = "client",
                error = %e,
                "session refresh failed"
            ),
        }
        result
    }

    /// Clears the in-flight flag and hands `outcome` to every waiter, oldest first.
    fn release(&self, outcome: Outcome) {
        let waiters = {
            let mut state = self.lock_state();
            state.in_flight = false;
            std::mem::take(&mut state.pending)
        };

        let label = match &outcome {
            Ok(()) => "success",
            Err(ClientError::RefreshAborted) => "aborted",
            Err(_) => "failure",
        };
        let count = waiters.len();
        for waiter in waiters {
            if waiter.send(outcome.clone()).is_err() {
                debug!("Queued request was dropped before the refresh settled");
            }
        }
        self.metrics.record_waiters_settled(count, label);
        debug!("Released {} queued request(s) with outcome '{}'", count, label);
    }

    /// Sends a request again after a successful refresh. A second 401 is final.
    async fn replay(&self, request: &ApiRequest) -> Result<ApiResponse, ClientError> {
        let response = match self.transport.send(request).await {
            Ok(response) => response,
            Err(e) => {
                self.metrics.record_retry("error");
                return Err(e);
            }
        };

        if response.is_unauthorized() {
            self.metrics.record_retry("unauthorized");
            warn!(
                request_id = %request.id,
                "Request still unauthorized after session refresh"
            );
            return Err(response.to_error());
        }

        self.metrics.record_retry("success");
        Ok(response)
    }

    /// Drops local credentials and sends the client to the login route,
    /// unless it is already there.
    fn end_session(&self) {
        self.environment.clear_session();
        self.metrics.record_session_terminated();

        if self.environment.current_path() == self.login_path {
            debug!("Already at '{}', not navigating", self.login_path);
            return;
        }
        info!(
            event_name = "client.session.ended",
            event_domain = "client",
            login_path = self.login_path.as_str(),
            "session could not be refreshed; redirecting to login"
        );
        self.environment.navigate(&self.login_path);
    }
}

/// Leader-side handle on a running refresh.
///
/// If the leader's future is dropped before `settle` is called, the waiters
/// are released with `RefreshAborted` so none of them hang.
struct RefreshCycle<'a> {
    coordinator: &'a AuthRefreshCoordinator,
    settled: bool,
}

impl<'a> RefreshCycle<'a> {
    fn new(coordinator: &'a AuthRefreshCoordinator) -> Self {
        RefreshCycle {
            coordinator,
            settled: false,
        }
    }

    fn settle(&mut self, outcome: Outcome) {
        self.settled = true;
        self.coordinator.release(outcome);
    }
}

impl Drop for RefreshCycle<'_> {
    fn drop(&mut self) {
        if !self.settled {
            warn!("Session refresh abandoned before it settled");
            self.coordinator.release(Err(ClientError::RefreshAborted));
        }
    }
}
