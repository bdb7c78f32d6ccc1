use super::types::*;
use crate::leaderboard::maintainer::MAX_LEADERBOARD_SIZE;
use crate::store::credentials::CredentialSource;

use anyhow::{Context, Result, bail};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const ENV_HOST: &str = "HOST";
pub const ENV_PORT: &str = "PORT";
pub const ENV_LEADERBOARD_SIZE: &str = "LEADERBOARD_SIZE";
pub const ENV_COLLECTION: &str = "SCORES_COLLECTION";
pub const ENV_STORE: &str = "LEADERBOARD_STORE";
pub const ENV_PRUNE_INTERVAL: &str = "LEADERBOARD_PRUNE_INTERVAL_SECS";
pub const ENV_FIREBASE_CREDENTIALS: &str = "FIREBASE_CREDENTIALS";
pub const ENV_CREDENTIALS_JSON: &str = "GOOGLE_APPLICATION_CREDENTIALS_JSON";
pub const ENV_CREDENTIALS_PATH: &str = "GOOGLE_APPLICATION_CREDENTIALS";
pub const ENV_EMULATOR_HOST: &str = "FIRESTORE_EMULATOR_HOST";
pub const ENV_PROJECT_ID: &str = "FIRESTORE_PROJECT_ID";
pub const ENV_GCLOUD_PROJECT: &str = "GCLOUD_PROJECT";

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let leaderboard_size: usize =
            try_load(&lookup, ENV_LEADERBOARD_SIZE, DEFAULT_LEADERBOARD_SIZE)?;
        if leaderboard_size == 0 {
            bail!("{} must be greater than zero", ENV_LEADERBOARD_SIZE);
        }
        if leaderboard_size > MAX_LEADERBOARD_SIZE {
            bail!(
                "{} must be at most {}",
                ENV_LEADERBOARD_SIZE,
                MAX_LEADERBOARD_SIZE
            );
        }

        let prune_secs: u64 = try_load(&lookup, ENV_PRUNE_INTERVAL, DEFAULT_PRUNE_INTERVAL_SECS)?;
        let prune_interval = (prune_secs > 0).then(|| Duration::from_secs(prune_secs));

        let store = StoreConfig {
            kind: try_load(&lookup, ENV_STORE, StoreKind::Firestore)?,
            collection: var(&lookup, ENV_COLLECTION)
                .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            credentials: credential_source(&lookup),
            emulator_host: var(&lookup, ENV_EMULATOR_HOST),
            project_id: var(&lookup, ENV_PROJECT_ID).or_else(|| var(&lookup, ENV_GCLOUD_PROJECT)),
        };

        Ok(Self {
            host: var(&lookup, ENV_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: try_load(&lookup, ENV_PORT, DEFAULT_PORT)?,
            leaderboard_size,
            prune_interval,
            store,
        })
    }
}

/// Inline JSON wins over a key file path; the well-known local file is the fallback.
fn credential_source<F>(lookup: &F) -> CredentialSource
where
    F: Fn(&str) -> Option<String>,
{
    for variable in [ENV_FIREBASE_CREDENTIALS, ENV_CREDENTIALS_JSON] {
        if let Some(json) = var(lookup, variable) {
            return CredentialSource::Inline {
                variable: variable.to_string(),
                json,
            };
        }
    }

    match var(lookup, ENV_CREDENTIALS_PATH) {
        Some(path) => CredentialSource::File(PathBuf::from(path)),
        None => CredentialSource::default(),
    }
}

fn var<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn try_load<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr + Display,
    T::Err: Display,
{
    match var(lookup, key) {
        Some(raw) => raw
            .parse()
            .map_err(|e: T::Err| anyhow::anyhow!("{}", e))
            .with_context(|| format!("invalid {} value '{}'", key, raw)),
        None => {
            tracing::debug!("{} not set, using default: {}", key, default);
            Ok(default)
        }
    }
}
