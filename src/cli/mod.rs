//! CLI entry point for authbridge.

pub mod auth;

use clap::{Parser, Subcommand};

/// authbridge CLI
#[derive(Parser, Debug)]
#[command(name = "authbridge", version, about = "Sign in against the fallback auth service")]
pub struct Cli {
    /// Base address of the fallback service (overrides AUTHBRIDGE_SERVICE_URL)
    #[arg(long, global = true)]
    pub service_url: Option<String>,

    /// TOML config file
    #[arg(long, global = true)]
    pub config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Credential operations.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account with email and password
    CreateAccount(EmailPasswordArgs),
    /// Sign in with email and password
    SignIn(EmailPasswordArgs),
    /// Sign in with a Facebook access token
    Facebook(AccessTokenArgs),
    /// Sign in with a GitHub access token
    Github(AccessTokenArgs),
    /// Sign in with a Google id token and access token
    Google(GoogleArgs),
    /// Sign in with a Twitter token and secret
    Twitter(TwitterArgs),
    /// Sign in anonymously
    Anonymous,
}

#[derive(Parser, Debug)]
pub struct EmailPasswordArgs {
    pub email: String,
    pub password: String,
}

#[derive(Parser, Debug)]
pub struct AccessTokenArgs {
    pub access_token: String,
}

#[derive(Parser, Debug)]
pub struct GoogleArgs {
    pub id_token: String,
    pub access_token: String,
}

#[derive(Parser, Debug)]
pub struct TwitterArgs {
    pub token: String,
    pub secret: String,
}

impl Commands {
    pub fn into_request(self) -> crate::path::AuthRequest {
        use crate::path::AuthRequest;
        match self {
            Self::CreateAccount(args) => AuthRequest::CreateAccount {
                email: args.email,
                password: args.password,
            },
            Self::SignIn(args) => AuthRequest::EmailPassword {
                email: args.email,
                password: args.password,
            },
            Self::Facebook(args) => AuthRequest::Facebook {
                access_token: args.access_token,
            },
            Self::Github(args) => AuthRequest::Github {
                access_token: args.access_token,
            },
            Self::Google(args) => AuthRequest::Google {
                id_token: args.id_token,
                access_token: args.access_token,
            },
            Self::Twitter(args) => AuthRequest::Twitter {
                token: args.token,
                secret: args.secret,
            },
            Self::Anonymous => AuthRequest::Anonymous,
        }
    }
}
