//! authbridge: authentication session orchestrator
//!
//! Unifies a native identity SDK and a REST fallback service behind one
//! callback-driven contract. Every operation reports a three-way
//! [`ResultEnvelope`](types::ResultEnvelope) (success, fault, cancellation),
//! while the orchestrator keeps the current user and access token readable
//! synchronously.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use authbridge::prelude::*;
//!
//! # async fn example() -> authbridge::error::Result<()> {
//! let config = AuthConfig::from_env()?;
//! let auth = AuthOrchestrator::from_config(
//!     &config,
//!     tokio::runtime::Handle::current(),
//!     Arc::new(DetachedProvider::new()),
//! );
//! let envelope = auth
//!     .authenticate(AuthRequest::EmailPassword {
//!         email: "a@b.com".into(),
//!         password: "secret".into(),
//!     })
//!     .await;
//! assert_eq!(envelope.is_success(), auth.is_authenticated());
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod path;
pub mod platform;
pub mod prelude;
pub mod provider;
pub mod session;
pub mod task;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;
