use regex_lite::Regex;
use semver::Version;

use crate::error::{Error, Result};

/// First Kubernetes release where the CSI node/driver registry gates are on by default
pub const V14: Version = Version::new(1, 14, 0);

/// First Kubernetes release where the CSI volume expansion gates are on by default
pub const V16: Version = Version::new(1, 16, 0);

/// Parse the Kubernetes version of a cluster
///
/// A leading `v` is accepted (`v1.15.2`) as are pre-release and build metadata
/// (`1.15.2-gke.1`), but major, minor and patch are all required. There is no
/// partial matching: `1.15`, `latest` or `Kubernetes v1.15.2` all fail.
pub fn parse_version(ver: &str) -> Result<Version> {
  let re = Regex::new(r"^v?(\d+\.\d+\.\d+.*)$").map_err(|e| parse_error(ver, e))?;
  let bare = re
    .captures(ver)
    .and_then(|cap| cap.get(1))
    .ok_or_else(|| parse_error(ver, "expected <major>.<minor>.<patch>"))?;

  Version::parse(bare.as_str()).map_err(|e| parse_error(ver, e))
}

fn parse_error(ver: &str, reason: impl ToString) -> Error {
  Error::VersionParse {
    version: ver.to_owned(),
    reason: reason.to_string(),
  }
}

/// Strict semver precedence comparison; thresholds are only ever checked with less-than
pub fn less_than(ver: &Version, threshold: &Version) -> bool {
  ver < threshold
}

/// Version range a policy rule applies to
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Predicate {
  /// Applies regardless of version
  Always,

  /// `version < threshold`
  Below(Version),

  /// `lower <= version < upper`
  Between(Version, Version),
}

impl Predicate {
  pub fn holds(&self, ver: &Version) -> bool {
    match self {
      Predicate::Always => true,
      Predicate::Below(threshold) => less_than(ver, threshold),
      Predicate::Between(lower, upper) => !less_than(ver, lower) && less_than(ver, upper),
    }
  }
}
