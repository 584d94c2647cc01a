//! Target definitions - the compilation units of a package.
//!
//! A Target names a source root, the public headers it exposes, and the
//! other targets or external products it depends on.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// The kind of target being built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// Library code
    #[default]
    #[serde(alias = "target", alias = "lib")]
    Regular,

    /// Code with an entry point
    #[serde(alias = "exe", alias = "bin")]
    Executable,

    /// Test suite, never part of a product
    Test,

    /// Build tool plugin
    Plugin,
}

/// A resolved dependency of a target.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TargetDependency {
    /// Another target in the same package
    Target { name: String },

    /// A product exported by an external package dependency
    Product { name: String, package: String },
}

impl TargetDependency {
    /// Get the sibling target name, if this is a target dependency.
    pub fn target_name(&self) -> Option<&str> {
        match self {
            TargetDependency::Target { name } => Some(name),
            TargetDependency::Product { .. } => None,
        }
    }
}

/// A validated build target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub name: String,

    pub kind: TargetKind,

    /// Dependencies in declaration order
    pub dependencies: Vec<TargetDependency>,

    /// Source root, relative to the package root
    pub path: PathBuf,

    /// Public headers directory, relative to `path`
    pub public_headers_path: PathBuf,

    /// Glob patterns (relative to `path`) excluded from the source scan
    pub exclude: Vec<String>,
}

impl Target {
    /// Default source root for a target with no explicit `path`.
    pub fn default_path(name: &str) -> PathBuf {
        Path::new("Sources").join(name)
    }

    /// Public headers directory relative to the package root.
    pub fn public_headers_dir(&self) -> PathBuf {
        self.path.join(&self.public_headers_path)
    }

    /// Names of sibling targets this target depends on.
    pub fn target_dependencies(&self) -> impl Iterator<Item = &str> {
        self.dependencies.iter().filter_map(|d| d.target_name())
    }

    /// External products this target depends on, as (package, product) pairs.
    pub fn product_dependencies(&self) -> impl Iterator<Item = (&str, &str)> {
        self.dependencies.iter().filter_map(|d| match d {
            TargetDependency::Product { name, package } => Some((package.as_str(), name.as_str())),
            TargetDependency::Target { .. } => None,
        })
    }
}
