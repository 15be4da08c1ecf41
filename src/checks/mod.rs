//! Compliance checkers.
//!
//! Each checker issues its upstream calls through a [`ClientFactory`] and
//! projects the result into a small, renamed record set. No state is kept
//! between requests and any failed call fails the whole check.
//!
//! [`ClientFactory`]: crate::platform::ClientFactory

use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;

use crate::config::ConfigError;
use crate::platform::PlatformError;

pub mod fanout;
pub mod mfa;
pub mod pitr;
pub mod rls;

pub use fanout::fan_out;
pub use mfa::MfaStatus;
pub use pitr::PitrStatus;
pub use rls::RlsStatus;

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error("Project {project_ref}: {source}")]
    Project {
        project_ref: String,
        #[source]
        source: PlatformError,
    },
}

impl CheckError {
    pub fn for_project(project_ref: impl Into<String>, source: PlatformError) -> Self {
        CheckError::Project {
            project_ref: project_ref.into(),
            source,
        }
    }
}

/// Check results for the primary project, or keyed by project ref
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum PerProject<T> {
    Single(Vec<T>),
    Multi(BTreeMap<String, Vec<T>>),
}
