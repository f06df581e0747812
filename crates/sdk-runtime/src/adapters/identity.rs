//! # Identity Defaults
//!
//! Token wallets and the profile manager. Tokens are held in memory; the
//! profile cache is persisted as JSON in the [`PersistentStore`].

use std::sync::Arc;

use lazy_static::lazy_static;
use parking_lot::RwLock;
use sdk_types::{AccessToken, AuthenticationToken, Profile, SdkResult};
use tracing::warn;

use super::ports::{AccessTokenWallet, AuthenticationTokenWallet, PersistentStore, ProfileProvider};
use super::store::UserDefaults;

/// Store key holding the cached profile.
pub const PROFILE_CACHE_KEY: &str = "com.facebook.sdk.FBSDKProfile.currentProfile";

lazy_static! {
    static ref SHARED_ACCESS: Arc<AccessTokenManager> = Arc::new(AccessTokenManager::new());
    static ref SHARED_AUTHENTICATION: Arc<AuthenticationTokenManager> =
        Arc::new(AuthenticationTokenManager::new());
    static ref SHARED_PROFILE: Arc<ProfileManager> =
        Arc::new(ProfileManager::new(UserDefaults::standard()));
}

// =============================================================================
// TOKENS
// =============================================================================

/// Cached and current value of one token kind.
#[derive(Debug)]
struct TokenSlots<T> {
    cached: RwLock<Option<T>>,
    current: RwLock<Option<T>>,
}

impl<T: Clone> TokenSlots<T> {
    fn new() -> Self {
        Self {
            cached: RwLock::new(None),
            current: RwLock::new(None),
        }
    }

    fn cached(&self) -> Option<T> {
        self.cached.read().clone()
    }

    fn cache(&self, token: Option<T>) {
        *self.cached.write() = token;
    }

    fn current(&self) -> Option<T> {
        self.current.read().clone()
    }

    fn set_current(&self, token: Option<T>) {
        *self.current.write() = token;
    }

    fn clear(&self) {
        *self.cached.write() = None;
        *self.current.write() = None;
    }
}

#[derive(Debug)]
pub struct AccessTokenManager {
    slots: TokenSlots<AccessToken>,
}

impl AccessTokenManager {
    pub fn new() -> Self {
        Self {
            slots: TokenSlots::new(),
        }
    }

    pub fn shared() -> Arc<AccessTokenManager> {
        Arc::clone(&SHARED_ACCESS)
    }

    /// Write a token to the cache without making it current.
    pub fn cache_token(&self, token: Option<AccessToken>) {
        self.slots.cache(token);
    }

    /// Forget the cached and current token.
    pub fn reset(&self) {
        self.slots.clear();
    }
}

impl Default for AccessTokenManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AccessTokenWallet for AccessTokenManager {
    fn cached_token(&self) -> Option<AccessToken> {
        self.slots.cached()
    }

    fn current(&self) -> Option<AccessToken> {
        self.slots.current()
    }

    fn set_current(&self, token: Option<AccessToken>) {
        if let Some(expired) = token.as_ref().filter(|t| t.is_expired()) {
            warn!(user_id = %expired.user_id, "Current access token is already expired");
        }
        self.slots.set_current(token);
    }
}

#[derive(Debug)]
pub struct AuthenticationTokenManager {
    slots: TokenSlots<AuthenticationToken>,
}

impl AuthenticationTokenManager {
    pub fn new() -> Self {
        Self {
            slots: TokenSlots::new(),
        }
    }

    pub fn shared() -> Arc<AuthenticationTokenManager> {
        Arc::clone(&SHARED_AUTHENTICATION)
    }

    pub fn cache_token(&self, token: Option<AuthenticationToken>) {
        self.slots.cache(token);
    }

    pub fn reset(&self) {
        self.slots.clear();
    }
}

impl Default for AuthenticationTokenManager {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthenticationTokenWallet for AuthenticationTokenManager {
    fn cached_token(&self) -> Option<AuthenticationToken> {
        self.slots.cached()
    }

    fn current(&self) -> Option<AuthenticationToken> {
        self.slots.current()
    }

    fn set_current(&self, token: Option<AuthenticationToken>) {
        self.slots.set_current(token);
    }
}

// =============================================================================
// PROFILE
// =============================================================================

pub struct ProfileManager {
    store: Arc<dyn PersistentStore>,
    current: RwLock<Option<Profile>>,
}

impl ProfileManager {
    pub fn new(store: Arc<dyn PersistentStore>) -> Self {
        Self {
            store,
            current: RwLock::new(None),
        }
    }

    pub fn shared() -> Arc<ProfileManager> {
        Arc::clone(&SHARED_PROFILE)
    }

    /// Persist `profile` as the cached profile.
    pub fn cache_profile(&self, profile: &Profile) -> SdkResult<()> {
        let encoded = serde_json::to_string(profile)?;
        self.store.set_string(PROFILE_CACHE_KEY, &encoded);
        Ok(())
    }

    pub fn clear_cache(&self) {
        self.store.remove(PROFILE_CACHE_KEY);
    }

    /// Drop the current profile. The persisted cache belongs to the store.
    pub fn reset(&self) {
        *self.current.write() = None;
    }
}

impl ProfileProvider for ProfileManager {
    fn fetch_cached_profile(&self) -> Option<Profile> {
        let raw = self.store.string(PROFILE_CACHE_KEY)?;
        match serde_json::from_str(&raw) {
            Ok(profile) => Some(profile),
            Err(e) => {
                warn!(error = %e, "Discarding undecodable cached profile");
                None
            }
        }
    }

    fn current(&self) -> Option<Profile> {
        self.current.read().clone()
    }

    fn set_current(&self, profile: Option<Profile>) {
        *self.current.write() = profile;
    }
}
