//! Envelope and snapshot types shared by every operation.

pub mod envelope;
pub mod snapshot;

pub use envelope::*;
pub use snapshot::{TokenSnapshot, UserSnapshot};

/// Envelope type produced by user-returning operations.
pub type UserEnvelope = ResultEnvelope<UserSnapshot>;

/// Envelope type produced by token retrieval. `Success(None)` means there was
/// neither a cached token nor a user to refresh from.
pub type TokenEnvelope = ResultEnvelope<Option<TokenSnapshot>>;
