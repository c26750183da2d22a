//! # seed
//!
//! Creates an administrator account, or promotes an existing one.
//!
//! ```text
//! seed --username admin --email admin@example.com --password s3cret
//! ```

use anyhow::{bail, Context};
use auth_adapters::Argon2Hasher;
use chrono::Utc;
use clap::Parser;
use domains::{validation, PasswordHasher, User, UserRepository};
use storage_adapters::SqliteStore;
use tracing::info;
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Create or promote an administrator")]
struct Cli {
    #[arg(long, env = "SEED_ADMIN_USERNAME")]
    username: String,

    #[arg(long, env = "SEED_ADMIN_EMAIL")]
    email: String,

    /// Also replaces the password of an existing account.
    #[arg(long, env = "SEED_ADMIN_PASSWORD", hide_env_values = true)]
    password: String,

    #[arg(long, env = "MINS__DATABASE__URL", default_value = "sqlite://mins.db")]
    database_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    validation::username(&cli.username)?;
    validation::email(&cli.email)?;
    if cli.password.is_empty() {
        bail!("password must not be empty");
    }

    let store = SqliteStore::connect(&cli.database_url, 1)
        .await
        .with_context(|| format!("opening database {}", cli.database_url))?;
    let password_hash = Argon2Hasher::new().hash(&cli.password)?;

    match store.find_by_username(&cli.username).await? {
        Some(mut user) => {
            user.email = cli.email;
            user.password_hash = password_hash;
            user.is_admin = true;
            UserRepository::update(&store, &user).await?;
            info!(username = %user.username, "promoted existing user to administrator");
        }
        None => {
            let user = User {
                id: Uuid::new_v4(),
                username: cli.username,
                email: cli.email,
                password_hash,
                first_name: String::new(),
                last_name: String::new(),
                is_admin: true,
                date_joined: Utc::now(),
            };
            UserRepository::insert(&store, &user).await?;
            info!(username = %user.username, "created administrator");
        }
    }
    Ok(())
}
