//! Service Account Credentials
//!
//! Firebase credentials arrive out-of-band, in order of precedence: the JSON content
//! in an environment variable, a path to a JSON key file, or `serviceAccountKey.json`
//! in the working directory. Only the fields needed to mint access tokens are kept.

use serde::Deserialize;
use std::fmt;
use std::fs::read_to_string;
use std::path::PathBuf;
use thiserror::Error;

/// Key file looked up in the working directory when nothing else is configured.
pub const DEFAULT_KEY_FILE: &str = "serviceAccountKey.json";

pub const DEFAULT_TOKEN_URI: &str = "https://oauth2.googleapis.com/token";

#[derive(Error, Debug)]
pub enum CredentialsError {
    #[error("failed to read credentials file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid service account JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// The parts of a Google service account key this service uses.
#[derive(Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub project_id: String,
    pub client_email: String,
    pub private_key: String,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    DEFAULT_TOKEN_URI.to_string()
}

impl ServiceAccountKey {
    pub fn from_json(json: &str) -> Result<Self, CredentialsError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Where the service account key comes from.
#[derive(Clone, PartialEq, Eq)]
pub enum CredentialSource {
    /// Serialized key content, e.g. from `FIREBASE_CREDENTIALS`.
    Inline { variable: String, json: String },
    /// Path to a key file, e.g. from `GOOGLE_APPLICATION_CREDENTIALS`.
    File(PathBuf),
}

impl CredentialSource {
    pub fn load(&self) -> Result<ServiceAccountKey, CredentialsError> {
        match self {
            Self::Inline { json, .. } => ServiceAccountKey::from_json(json),
            Self::File(path) => {
                let json = read_to_string(path).map_err(|source| CredentialsError::Read {
                    path: path.clone(),
                    source,
                })?;
                ServiceAccountKey::from_json(&json)
            }
        }
    }
}

impl Default for CredentialSource {
    fn default() -> Self {
        Self::File(PathBuf::from(DEFAULT_KEY_FILE))
    }
}

impl fmt::Debug for ServiceAccountKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ServiceAccountKey")
            .field("project_id", &self.project_id)
            .field("client_email", &self.client_email)
            .field("token_uri", &self.token_uri)
            .finish_non_exhaustive()
    }
}

// Neither impl prints key material.
impl fmt::Debug for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { variable, .. } => f
                .debug_struct("Inline")
                .field("variable", variable)
                .finish_non_exhaustive(),
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
        }
    }
}

impl fmt::Display for CredentialSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Inline { variable, .. } => write!(f, "${variable}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
