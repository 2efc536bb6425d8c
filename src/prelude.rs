//! Convenience re-exports for common use.

pub use crate::config::AuthConfig;
pub use crate::error::{AuthError, Result};
pub use crate::orchestrator::AuthOrchestrator;
pub use crate::path::AuthRequest;
pub use crate::platform::{PlatformCapability, RuntimeEnvironment, RuntimePlatform};
pub use crate::provider::{Credential, DetachedProvider, IdentityProvider, ProviderUser};
pub use crate::types::{
    Outcome, ResultEnvelope, TokenEnvelope, TokenSnapshot, UserEnvelope, UserSnapshot,
};
