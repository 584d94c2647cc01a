//! Berth.toml declaration format.
//!
//! A `Declaration` is the raw, unvalidated form of a package descriptor as
//! written by its author. It is accepted as TOML (`Berth.toml`) or as JSON
//! (`Berth.json`); both encode the same schema. Turning a declaration into a
//! usable [`Package`](crate::core::Package) is the loader's job.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::core::platform::Platform;
use crate::core::product::LibraryType;
use crate::core::target::TargetKind;
use crate::util::fs::read_to_string;

/// A package declaration as written in the manifest.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Declaration {
    pub name: String,

    /// Minimum descriptor format version
    #[serde(default, alias = "toolsVersion")]
    pub tools_version: Option<String>,

    #[serde(default)]
    pub platforms: Vec<PlatformDecl>,

    #[serde(default)]
    pub products: Vec<ProductDecl>,

    #[serde(default)]
    pub targets: Vec<TargetDecl>,

    /// External packages whose products targets may use
    #[serde(default)]
    pub dependencies: Vec<PackageDependencyDecl>,
}

/// A minimum platform version, e.g. `{ name = "ios", version = "11" }`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatformDecl {
    pub name: Platform,
    pub version: VersionText,
}

/// A version written either as a string or as a bare major number.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum VersionText {
    Text(String),
    Major(u64),
}

impl VersionText {
    pub fn as_text(&self) -> String {
        match self {
            VersionText::Text(s) => s.clone(),
            VersionText::Major(n) => n.to_string(),
        }
    }
}

/// Declared kind of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductKindDecl {
    #[default]
    Library,
    #[serde(alias = "exe")]
    Executable,
    Plugin,
}

/// A product as declared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ProductDecl {
    pub name: String,

    #[serde(default)]
    pub kind: ProductKindDecl,

    /// Link type, only meaningful for libraries
    #[serde(default, rename = "type")]
    pub library_type: Option<LibraryType>,

    #[serde(default)]
    pub targets: Vec<String>,
}

/// A target dependency as declared.
///
/// A bare string is looked up among sibling targets first, then among the
/// external package dependencies.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum DependencyDecl {
    ByName(String),
    Target { target: String },
    Product { product: String, package: String },
}

/// A target as declared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct TargetDecl {
    pub name: String,

    #[serde(default)]
    pub kind: TargetKind,

    #[serde(default)]
    pub dependencies: Vec<DependencyDecl>,

    /// Source root; defaults to `Sources/<name>`
    #[serde(default)]
    pub path: Option<String>,

    /// Public headers directory relative to `path`; defaults to `include`
    #[serde(default, alias = "publicHeadersPath")]
    pub public_headers_path: Option<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}

/// An external package dependency as declared.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct PackageDependencyDecl {
    pub name: String,

    #[serde(default)]
    pub url: Option<String>,

    #[serde(default)]
    pub path: Option<String>,

    /// Semver requirement; any version when absent
    #[serde(default)]
    pub requirement: Option<String>,
}

impl Declaration {
    /// Create an empty declaration for a package.
    pub fn new(name: impl Into<String>) -> Self {
        Declaration {
            name: name.into(),
            tools_version: None,
            platforms: Vec::new(),
            products: Vec::new(),
            targets: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    /// Load a declaration from a file; `.json` files are read as JSON,
    /// everything else as TOML.
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_to_string(path)?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

        let decl = if is_json {
            Self::from_json_str(&content)
        } else {
            Self::from_toml_str(&content)
        };
        decl.with_context(|| format!("failed to load manifest: {}", path.display()))
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse TOML declaration")
    }

    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse JSON declaration")
    }

    pub fn with_platform(mut self, platform: Platform, version: &str) -> Self {
        self.platforms.push(PlatformDecl {
            name: platform,
            version: VersionText::Text(version.to_string()),
        });
        self
    }

    pub fn with_product(mut self, product: ProductDecl) -> Self {
        self.products.push(product);
        self
    }

    pub fn with_target(mut self, target: TargetDecl) -> Self {
        self.targets.push(target);
        self
    }

    pub fn with_dependency(mut self, dependency: PackageDependencyDecl) -> Self {
        self.dependencies.push(dependency);
        self
    }
}

impl ProductDecl {
    /// Declare a library product built from the given targets.
    pub fn library(
        name: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ProductDecl {
            name: name.into(),
            kind: ProductKindDecl::Library,
            library_type: None,
            targets: targets.into_iter().map(Into::into).collect(),
        }
    }

    /// Declare an executable product built from the given targets.
    pub fn executable(
        name: impl Into<String>,
        targets: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        ProductDecl {
            kind: ProductKindDecl::Executable,
            ..Self::library(name, targets)
        }
    }
}

impl TargetDecl {
    /// Declare a regular target with default paths and no dependencies.
    pub fn new(name: impl Into<String>) -> Self {
        TargetDecl {
            name: name.into(),
            kind: TargetKind::Regular,
            dependencies: Vec::new(),
            path: None,
            public_headers_path: None,
            exclude: Vec::new(),
        }
    }

    pub fn with_kind(mut self, kind: TargetKind) -> Self {
        self.kind = kind;
        self
    }

    /// Add by-name dependencies.
    pub fn with_dependencies(mut self, names: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.dependencies
            .extend(names.into_iter().map(|n| DependencyDecl::ByName(n.into())));
        self
    }

    pub fn with_product_dependency(
        mut self,
        product: impl Into<String>,
        package: impl Into<String>,
    ) -> Self {
        self.dependencies.push(DependencyDecl::Product {
            product: product.into(),
            package: package.into(),
        });
        self
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_public_headers_path(mut self, path: impl Into<String>) -> Self {
        self.public_headers_path = Some(path.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const TABLE_VIEW: &str = r#"
name = "TOInsetGroupedTableView"
tools-version = "5.3"

[[platforms]]
name = "ios"
version = "v11"

[[products]]
name = "TOInsetGroupedTableView"
kind = "library"
targets = ["TOInsetGroupedTableView"]

[[targets]]
name = "TOInsetGroupedTableView"
dependencies = []
path = "./TOInsetGroupedTableView/"
public-headers-path = "include"
"#;

    #[test]
    fn test_parse_table_view_manifest() {
        let decl = Declaration::from_toml_str(TABLE_VIEW).unwrap();
        assert_eq!(decl.name, "TOInsetGroupedTableView");
        assert_eq!(decl.tools_version.as_deref(), Some("5.3"));
        assert_eq!(decl.platforms[0].name, Platform::Ios);
        assert_eq!(decl.platforms[0].version.as_text(), "v11");
        assert_eq!(decl.products[0].kind, ProductKindDecl::Library);
        assert_eq!(decl.targets[0].path.as_deref(), Some("./TOInsetGroupedTableView/"));
        assert_eq!(decl.targets[0].public_headers_path.as_deref(), Some("include"));
    }

    #[test]
    fn test_parse_dependency_forms() {
        let content = r#"
name = "App"

[[dependencies]]
name = "layout-kit"
url = "https://example.com/layout-kit.git"
requirement = "^2.0"

[[targets]]
name = "App"
dependencies = [
  "Core",
  { target = "Util" },
  { product = "Layout", package = "layout-kit" },
]
"#;
        let decl = Declaration::from_toml_str(content).unwrap();
        assert_eq!(
            decl.targets[0].dependencies,
            vec![
                DependencyDecl::ByName("Core".to_string()),
                DependencyDecl::Target {
                    target: "Util".to_string()
                },
                DependencyDecl::Product {
                    product: "Layout".to_string(),
                    package: "layout-kit".to_string()
                },
            ]
        );
        assert_eq!(decl.dependencies[0].requirement.as_deref(), Some("^2.0"));
    }

    #[test]
    fn test_parse_json_with_camel_case_aliases() {
        let content = r#"{
            "name": "Lib",
            "toolsVersion": "5.3",
            "platforms": [{ "name": "iOS", "version": 11 }],
            "products": [{ "name": "Lib", "kind": "library", "targets": ["Core"] }],
            "targets": [{
                "name": "Core",
                "dependencies": [],
                "path": "./Core/",
                "publicHeadersPath": "include"
            }]
        }"#;
        let decl = Declaration::from_json_str(content).unwrap();
        assert_eq!(decl.platforms[0].version, VersionText::Major(11));
        assert_eq!(decl.targets[0].public_headers_path.as_deref(), Some("include"));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let content = r#"
name = "Lib"
colour = "blue"
"#;
        assert!(Declaration::from_toml_str(content).is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("Berth.toml");
        std::fs::write(&path, "name = ").unwrap();

        let err = Declaration::load(&path).unwrap_err();
        assert!(format!("{:#}", err).contains("failed to load manifest"));
    }

    #[test]
    fn test_builder_matches_parsed() {
        let built = Declaration::new("TOInsetGroupedTableView")
            .with_platform(Platform::Ios, "v11")
            .with_product(ProductDecl::library(
                "TOInsetGroupedTableView",
                ["TOInsetGroupedTableView"],
            ))
            .with_target(
                TargetDecl::new("TOInsetGroupedTableView")
                    .with_path("./TOInsetGroupedTableView/")
                    .with_public_headers_path("include"),
            );
        let parsed = Declaration::from_toml_str(TABLE_VIEW).unwrap();

        assert_eq!(
            Declaration {
                tools_version: Some("5.3".to_string()),
                ..built
            },
            parsed
        );
    }
}
