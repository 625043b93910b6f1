//! Sweep of tokens whose refresh value has lapsed
//!
//! Such a token can never be refreshed again, yet it still occupies one of
//! its account's slots until someone trips over it. The sweep removes them
//! in bulk and drops idle entries from the per-account lock registry.

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use orchid_shared::AuthConfig;

use crate::repositories::TokenRepository;

use super::clock::{Clock, SystemClock};
use super::locks::AccountLocks;

#[derive(Debug, Clone)]
pub struct TokenCleanupConfig {
    /// Seconds between sweeps
    pub interval_seconds: u64,
    pub enabled: bool,
}

impl Default for TokenCleanupConfig {
    fn default() -> Self {
        Self {
            interval_seconds: 3600,
            enabled: true,
        }
    }
}

impl TokenCleanupConfig {
    /// An interval of zero disables the sweep
    pub fn from_auth_config(auth: &AuthConfig) -> Self {
        let interval_seconds = auth.tokens.cleanup_interval_seconds;
        Self {
            interval_seconds,
            enabled: interval_seconds > 0,
        }
    }

    fn is_active(&self) -> bool {
        self.enabled && self.interval_seconds > 0
    }
}

/// Outcome of one sweep
#[derive(Debug, Default)]
pub struct CleanupResult {
    pub expired_tokens_deleted: usize,
    pub idle_locks_pruned: usize,
    /// Store failures; the sweep itself never aborts
    pub errors: Vec<String>,
}

impl CleanupResult {
    pub fn is_success(&self) -> bool {
        self.errors.is_empty()
    }
}

pub struct TokenCleanupService<R: TokenRepository + 'static> {
    repository: Arc<R>,
    locks: Option<Arc<AccountLocks>>,
    clock: Arc<dyn Clock>,
    config: TokenCleanupConfig,
}

impl<R: TokenRepository> TokenCleanupService<R> {
    pub fn new(repository: Arc<R>, config: TokenCleanupConfig) -> Self {
        Self {
            repository,
            locks: None,
            clock: Arc::new(SystemClock),
            config,
        }
    }

    /// Also prune idle entries of this registry on each sweep
    pub fn with_locks(mut self, locks: Arc<AccountLocks>) -> Self {
        self.locks = Some(locks);
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Runs one sweep. A disabled service reports an empty result.
    pub async fn run_cleanup(&self) -> CleanupResult {
        let mut result = CleanupResult::default();
        if !self.config.enabled {
            return result;
        }

        let now = self.clock.now();
        match self.repository.delete_refresh_expired(now).await {
            Ok(deleted) => result.expired_tokens_deleted = deleted,
            Err(e) => {
                warn!(error = %e, "Deleting refresh-expired tokens failed");
                result.errors.push(e.to_string());
            }
        }

        if let Some(locks) = &self.locks {
            result.idle_locks_pruned = locks.prune_idle();
        }

        if result.expired_tokens_deleted > 0 || result.idle_locks_pruned > 0 {
            info!(
                expired_tokens_deleted = result.expired_tokens_deleted,
                idle_locks_pruned = result.idle_locks_pruned,
                "Token sweep finished"
            );
        } else {
            debug!("Token sweep found nothing to remove");
        }

        result
    }

    /// Spawns the periodic sweep; the first one runs immediately.
    ///
    /// Returns `None` when the service is disabled.
    pub fn start_background_task(self: Arc<Self>) -> Option<JoinHandle<()>> {
        if !self.config.is_active() {
            info!("Token sweep disabled");
            return None;
        }

        let period = Duration::from_secs(self.config.interval_seconds);
        info!(interval_seconds = self.config.interval_seconds, "Starting token sweep");

        Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // A slow sweep shifts the schedule instead of bursting to catch up
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                let result = self.run_cleanup().await;
                if !result.is_success() {
                    warn!(errors = ?result.errors, "Token sweep finished with errors");
                }
            }
        }))
    }
}
