//! Tests for the expired-token sweep

use chrono::Duration;

use super::support::{account, fixture, REFRESH_TTL};
use crate::repositories::TokenRepository;
use crate::services::token::{TokenCleanupConfig, TokenCleanupService};

#[tokio::test]
async fn test_cleanup_removes_refresh_expired_tokens() {
    let owner = account("Lan");
    let f = fixture(vec![owner.clone()]);
    let stale = f.service.issue(owner.id, false).await.unwrap();
    f.clock.advance(Duration::seconds(REFRESH_TTL / 2));
    let fresh = f.service.issue(owner.id, false).await.unwrap();
    f.clock.advance(Duration::seconds(REFRESH_TTL / 2));

    let cleanup = f.service.cleanup_service(TokenCleanupConfig::default());
    let result = cleanup.run_cleanup().await;

    assert!(result.is_success());
    assert_eq!(result.expired_tokens_deleted, 1);
    assert!(f.tokens.find_by_id(stale.id).await.unwrap().is_none());
    assert!(f.tokens.find_by_id(fresh.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_cleanup_prunes_idle_locks() {
    let owner = account("Lan");
    let other = account("Mai");
    let f = fixture(vec![owner.clone(), other.clone()]);
    f.service.issue(owner.id, false).await.unwrap();
    f.service.issue(other.id, false).await.unwrap();
    assert_eq!(f.service.locks().len(), 2);

    let cleanup = f.service.cleanup_service(TokenCleanupConfig::default());
    let result = cleanup.run_cleanup().await;

    assert_eq!(result.idle_locks_pruned, 2);
    assert!(f.service.locks().is_empty());
}

#[tokio::test]
async fn test_disabled_cleanup_does_nothing() {
    let owner = account("Lan");
    let f = fixture(vec![owner.clone()]);
    f.service.issue(owner.id, false).await.unwrap();
    f.clock.advance(Duration::seconds(REFRESH_TTL + 1));

    let config = TokenCleanupConfig {
        enabled: false,
        ..TokenCleanupConfig::default()
    };
    let result = f.service.cleanup_service(config).run_cleanup().await;

    assert_eq!(result.expired_tokens_deleted, 0);
    assert_eq!(f.tokens.all().await.len(), 1);
}

#[tokio::test]
async fn test_store_errors_are_collected() {
    let owner = account("Lan");
    let f = fixture(vec![owner.clone()]);
    f.service.issue(owner.id, false).await.unwrap();
    f.tokens.set_fail_writes(true).await;

    let cleanup = TokenCleanupService::new(f.tokens.clone(), TokenCleanupConfig::default());
    let result = cleanup.run_cleanup().await;

    assert!(!result.is_success());
    assert_eq!(result.errors.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_background_task_sweeps_on_interval() {
    let owner = account("Lan");
    let f = fixture(vec![owner.clone()]);
    f.service.issue(owner.id, false).await.unwrap();
    f.clock.advance(Duration::seconds(REFRESH_TTL + 1));

    let config = TokenCleanupConfig {
        interval_seconds: 60,
        enabled: true,
    };
    std::sync::Arc::new(f.service.cleanup_service(config)).start_background_task();

    // The first tick fires immediately; give the task a chance to run it
    tokio::time::sleep(std::time::Duration::from_secs(1)).await;

    assert!(f.tokens.all().await.is_empty());
}

#[tokio::test]
async fn test_zero_interval_does_not_spawn() {
    let f = fixture(vec![]);
    let config = TokenCleanupConfig {
        interval_seconds: 0,
        enabled: true,
    };

    let handle = std::sync::Arc::new(f.service.cleanup_service(config)).start_background_task();

    assert!(handle.is_none());
}
