//! External package dependencies.
//!
//! Targets may depend on products of other packages. Those packages are
//! only named and located here; nothing is fetched.

use std::path::PathBuf;

use semver::VersionReq;
use serde::{Deserialize, Serialize};
use url::Url;

/// Where an external package lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DependencyLocation {
    Url(Url),
    Path(PathBuf),
}

/// A validated external package dependency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDependency {
    pub name: String,
    pub location: DependencyLocation,
    pub requirement: VersionReq,
}

impl PackageDependency {
    /// Check if this dependency lives on the local filesystem.
    pub fn is_local(&self) -> bool {
        matches!(self.location, DependencyLocation::Path(_))
    }
}
