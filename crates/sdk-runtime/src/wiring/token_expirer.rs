//! # Access Token Expirer
//!
//! Drops the current access token once it has expired. Each context creates
//! one against its own notification center; the bridge runs the check every
//! time the application becomes active.

use std::sync::Arc;

use lifecycle_bus::NotificationCenter;
use tracing::info;

use crate::adapters::AccessTokenWallet;

pub struct AccessTokenExpirer {
    center: Arc<dyn NotificationCenter>,
}

impl AccessTokenExpirer {
    pub fn new(center: Arc<dyn NotificationCenter>) -> Self {
        Self { center }
    }

    /// The center this expirer was created against.
    pub fn notification_center(&self) -> &Arc<dyn NotificationCenter> {
        &self.center
    }

    /// Clear the wallet's current token if it has expired. Returns whether a
    /// token was dropped.
    pub fn expire_if_needed(&self, wallet: &dyn AccessTokenWallet) -> bool {
        let Some(token) = wallet.current() else {
            return false;
        };
        if !token.is_expired() {
            return false;
        }

        wallet.set_current(None);
        info!(user_id = %token.user_id, "Expired access token cleared");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::AccessTokenManager;
    use crate::container::same_instance;
    use chrono::{Duration, Utc};
    use lifecycle_bus::InMemoryNotificationCenter;
    use sdk_types::AccessToken;

    fn token(expires_in: Option<Duration>) -> AccessToken {
        AccessToken {
            token_string: "token".to_string(),
            user_id: "user".to_string(),
            app_id: "app".to_string(),
            expiration_date: expires_in.map(|d| Utc::now() + d),
        }
    }

    fn expirer() -> AccessTokenExpirer {
        AccessTokenExpirer::new(Arc::new(InMemoryNotificationCenter::new()))
    }

    #[test]
    fn test_keeps_center_it_was_created_with() {
        let center: Arc<dyn NotificationCenter> = Arc::new(InMemoryNotificationCenter::new());
        let expirer = AccessTokenExpirer::new(Arc::clone(&center));
        assert!(same_instance(expirer.notification_center(), &center));
    }

    #[test]
    fn test_expired_token_is_cleared() {
        let wallet = AccessTokenManager::new();
        wallet.set_current(Some(token(Some(Duration::seconds(-1)))));

        assert!(expirer().expire_if_needed(&wallet));
        assert!(wallet.current().is_none());
    }

    #[test]
    fn test_live_tokens_are_kept() {
        let wallet = AccessTokenManager::new();
        let expirer = expirer();
        assert!(!expirer.expire_if_needed(&wallet));

        wallet.set_current(Some(token(None)));
        assert!(!expirer.expire_if_needed(&wallet));

        wallet.set_current(Some(token(Some(Duration::hours(1)))));
        assert!(!expirer.expire_if_needed(&wallet));
        assert!(wallet.current().is_some());
    }
}
