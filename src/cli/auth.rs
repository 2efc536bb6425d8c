//! CLI handler: run one credential operation over the fallback path.

use std::sync::Arc;

use serde_json::json;

use crate::config::AuthConfig;
use crate::orchestrator::AuthOrchestrator;
use crate::path::AuthRequest;
use crate::platform::RuntimeEnvironment;
use crate::provider::DetachedProvider;
use crate::types::ResultEnvelope;

/// Resolve config: `--service-url` > `--config` file (+ env) > env.
pub fn resolve_config(
    service_url: Option<String>,
    config_path: Option<&std::path::Path>,
) -> Result<AuthConfig, Box<dyn std::error::Error>> {
    let config = match (service_url, config_path) {
        (Some(url), _) => {
            let config = AuthConfig::new(url);
            config.validate()?;
            config
        }
        (None, Some(path)) => AuthConfig::load_from_path(path)?,
        (None, None) => AuthConfig::from_env()?,
    };
    Ok(config)
}

/// Run `request` and print the envelope, user and cached token as JSON.
pub async fn handle_request(
    config: &AuthConfig,
    request: AuthRequest,
) -> Result<(), Box<dyn std::error::Error>> {
    // A terminal never has the native SDK linked.
    let auth = AuthOrchestrator::builder(config.service_url.clone(), Arc::new(DetachedProvider::new()))
        .platform(RuntimeEnvironment::new(config.platform, true))
        .build()?;

    let operation = request.operation();
    let envelope = auth.authenticate(request).await;
    let outcome = envelope.outcome();
    match envelope {
        ResultEnvelope::Success(user) => {
            let report = json!({
                "operation": operation,
                "outcome": outcome.to_string(),
                "user": user,
                "token": auth.current_token(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        ResultEnvelope::Faulted(error) => Err(error.into()),
        ResultEnvelope::Canceled => Err(format!("{operation} was canceled").into()),
    }
}
