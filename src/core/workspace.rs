//! Workspace - a package descriptor located on disk.
//!
//! Ties a manifest file to its package root and the merged configuration,
//! which is what the CLI commands operate on.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::builder::plan::BuildPlan;
use crate::core::{Declaration, Package};
use crate::ops::layout::verify_layout;
use crate::resolver::resolve;
use crate::util::config::{global_config_path, load_config, project_config_path, Config};
use crate::util::diagnostic::Diagnostic;

/// A loaded and validated package together with its location on disk.
#[derive(Debug)]
pub struct Workspace {
    manifest_path: PathBuf,
    root: PathBuf,
    package: Package,
    config: Config,
}

impl Workspace {
    /// Load the manifest at `manifest_path` and its configuration.
    pub fn new(manifest_path: &Path) -> Result<Self> {
        let decl = Declaration::load(manifest_path)?;
        let package = Package::load(&decl)
            .with_context(|| format!("invalid manifest: {}", manifest_path.display()))?;

        let root = manifest_path
            .parent()
            .unwrap_or(Path::new("."))
            .to_path_buf();
        let config = load_config(global_config_path().as_deref(), &project_config_path(&root));

        Ok(Workspace {
            manifest_path: manifest_path.to_path_buf(),
            root,
            package,
            config,
        })
    }

    /// Replace the loaded configuration.
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    /// Get the package root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Resolve the package into a build plan.
    pub fn resolve(&self) -> Result<BuildPlan> {
        resolve(&self.package)
            .with_context(|| format!("failed to resolve `{}`", self.package.name()))
    }

    /// Verify the on-disk source layout of every target.
    pub fn verify_layout(&self) -> Result<Vec<Diagnostic>> {
        verify_layout(&self.package, &self.root, &self.config.check)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DescriptorError;
    use tempfile::TempDir;

    #[test]
    fn test_workspace_from_manifest() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Berth.toml");
        std::fs::write(
            &path,
            r#"
name = "TableKit"

[[products]]
name = "TableKit"
targets = ["TableKit"]

[[targets]]
name = "TableKit"
path = "TableKit"
"#,
        )
        .unwrap();

        let ws = Workspace::new(&path).unwrap().with_config(Config::default());
        assert_eq!(ws.root(), tmp.path());
        assert_eq!(ws.manifest_path(), path);
        assert_eq!(ws.package().name(), "TableKit");

        let plan = ws.resolve().unwrap();
        assert_eq!(plan.build_order, vec!["TableKit"]);

        let diags = ws.verify_layout().unwrap();
        assert!(diags.iter().any(|d| d.is_error()));
    }

    #[test]
    fn test_descriptor_error_survives_context() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Berth.toml");
        std::fs::write(&path, "name = \"\"\n").unwrap();

        let err = Workspace::new(&path).unwrap_err();
        assert_eq!(
            err.downcast_ref::<DescriptorError>(),
            Some(&DescriptorError::EmptyPackageName)
        );
    }
}
