use thiserror::Error;

/// Errors that abort a mutation before anything is written
#[derive(Debug, Error)]
pub enum Error {
  /// The cluster's Kubernetes version is not a valid semantic version
  #[error("cannot parse cluster Kubernetes version {version:?}: {reason}")]
  VersionParse { version: String, reason: String },

  /// The cluster context could not be resolved
  #[error(transparent)]
  Lookup(#[from] anyhow::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
