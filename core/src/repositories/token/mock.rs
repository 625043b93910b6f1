//! Mock implementation of TokenRepository for testing

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::entities::Token;
use crate::errors::DomainError;

use super::r#trait::TokenRepository;

/// Mock token repository for testing.
///
/// Rows live in a vector so listings come back in insertion order. Unique
/// access and refresh values are enforced the way the SQL schema does.
#[derive(Clone)]
pub struct MockTokenRepository {
    tokens: Arc<RwLock<Vec<Token>>>,
    fail_writes: Arc<RwLock<bool>>,
    fail_inserts: Arc<RwLock<bool>>,
}

impl MockTokenRepository {
    /// Create a new mock repository
    pub fn new() -> Self {
        Self {
            tokens: Arc::new(RwLock::new(Vec::new())),
            fail_writes: Arc::new(RwLock::new(false)),
            fail_inserts: Arc::new(RwLock::new(false)),
        }
    }

    /// Make every subsequent write fail with an internal error
    pub async fn set_fail_writes(&self, fail: bool) {
        *self.fail_writes.write().await = fail;
    }

    /// Make inserts of new tokens fail while updates and deletes still succeed
    pub async fn set_fail_inserts(&self, fail: bool) {
        *self.fail_inserts.write().await = fail;
    }

    /// Snapshot of every stored token, in insertion order
    pub async fn all(&self) -> Vec<Token> {
        self.tokens.read().await.clone()
    }

    async fn check_writable(&self) -> Result<(), DomainError> {
        if *self.fail_writes.read().await {
            return Err(DomainError::internal("token store unavailable"));
        }
        Ok(())
    }

    async fn check_insertable(&self, tokens: &[Token], token: &Token) -> Result<(), DomainError> {
        if *self.fail_inserts.read().await && tokens.iter().all(|t| t.id != token.id) {
            return Err(DomainError::internal("token insert rejected"));
        }
        let duplicate = tokens.iter().any(|t| {
            t.id != token.id && (t.token == token.token || t.refresh_token == token.refresh_token)
        });
        if duplicate {
            return Err(DomainError::Validation {
                message: "Token value already exists".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for MockTokenRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl TokenRepository for MockTokenRepository {
    async fn save(&self, token: Token) -> Result<Token, DomainError> {
        self.check_writable().await?;
        let mut tokens = self.tokens.write().await;
        self.check_insertable(&tokens, &token).await?;

        match tokens.iter_mut().find(|t| t.id == token.id) {
            Some(existing) => *existing = token.clone(),
            None => tokens.push(token.clone()),
        }
        Ok(token)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.id == id).cloned())
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.token == token).cloned())
    }

    async fn find_by_refresh_token(&self, refresh_token: &str) -> Result<Option<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens.iter().find(|t| t.refresh_token == refresh_token).cloned())
    }

    async fn find_all_by_account_id(&self, account_id: Uuid) -> Result<Vec<Token>, DomainError> {
        let tokens = self.tokens.read().await;
        Ok(tokens
            .iter()
            .filter(|t| t.account_id == account_id)
            .cloned()
            .collect())
    }

    async fn delete(&self, token: &Token) -> Result<bool, DomainError> {
        self.check_writable().await?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|t| t.id != token.id);
        Ok(tokens.len() < before)
    }

    async fn replace(&self, evicted: &[Token], token: Token) -> Result<Token, DomainError> {
        self.check_writable().await?;
        let mut tokens = self.tokens.write().await;

        // Validate against the post-eviction rows before touching anything
        let remaining: Vec<Token> = tokens
            .iter()
            .filter(|t| evicted.iter().all(|e| e.id != t.id))
            .cloned()
            .collect();
        self.check_insertable(&remaining, &token).await?;

        *tokens = remaining;
        tokens.push(token.clone());
        Ok(token)
    }

    async fn delete_refresh_expired(&self, now: DateTime<Utc>) -> Result<usize, DomainError> {
        self.check_writable().await?;
        let mut tokens = self.tokens.write().await;
        let before = tokens.len();
        tokens.retain(|t| !t.is_refresh_expired(now));
        Ok(before - tokens.len())
    }
}
