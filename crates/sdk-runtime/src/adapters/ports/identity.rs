//! # Identity Ports
//!
//! Wallets for the access and authentication tokens, and the profile
//! provider. The orchestrator only moves cached values into the current
//! slots at finish-launch.

use sdk_types::{AccessToken, AuthenticationToken, Profile};

/// Holder of the current access token and its cache.
pub trait AccessTokenWallet: Send + Sync {
    /// Token persisted by the token cache, if any.
    fn cached_token(&self) -> Option<AccessToken>;

    /// Token currently in use.
    fn current(&self) -> Option<AccessToken>;

    /// Replace the token currently in use.
    fn set_current(&self, token: Option<AccessToken>);

    /// String form of the current token, used when building requests.
    fn current_token_string(&self) -> Option<String> {
        self.current().map(|t| t.token_string)
    }
}

/// Holder of the current authentication token and its cache.
pub trait AuthenticationTokenWallet: Send + Sync {
    fn cached_token(&self) -> Option<AuthenticationToken>;
    fn current(&self) -> Option<AuthenticationToken>;
    fn set_current(&self, token: Option<AuthenticationToken>);
}

/// Access to the cached and the current profile.
pub trait ProfileProvider: Send + Sync {
    /// Profile restored from the cache, `None` when the cache is empty.
    fn fetch_cached_profile(&self) -> Option<Profile>;

    /// Profile currently in use.
    fn current(&self) -> Option<Profile>;

    /// Replace the current profile.
    fn set_current(&self, profile: Option<Profile>);
}
