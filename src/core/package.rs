//! Package - the validated, immutable package descriptor.
//!
//! `Package::load` is the only way to obtain a Package. It checks every
//! structural rule of the descriptor (names, references, paths, versions)
//! without touching the filesystem. Dependency cycles are a property of the
//! target graph and are reported by the resolver.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use semver::{Version, VersionReq};
use url::Url;

use crate::core::dependency::{DependencyLocation, PackageDependency};
use crate::core::error::{similar_names, DescriptorError, NameKind};
use crate::core::manifest::{
    Declaration, DependencyDecl, PackageDependencyDecl, PlatformDecl, ProductDecl,
    ProductKindDecl, TargetDecl,
};
use crate::core::platform::{parse_version, Platform, PlatformRequirement};
use crate::core::product::{Product, ProductKind};
use crate::core::target::{Target, TargetDependency, TargetKind};
use crate::util::fs::normalize_relative;

/// Descriptor format version assumed when a manifest does not declare one.
pub const DEFAULT_TOOLS_VERSION: Version = Version::new(5, 3, 0);

/// Public headers directory assumed when a target does not declare one.
pub const DEFAULT_PUBLIC_HEADERS_PATH: &str = "include";

/// A validated package descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Package {
    name: String,
    tools_version: Version,
    platforms: Vec<PlatformRequirement>,
    products: Vec<Product>,
    targets: Vec<Target>,
    dependencies: Vec<PackageDependency>,
}

impl Package {
    /// Validate a declaration and build the package it describes.
    pub fn load(decl: &Declaration) -> Result<Self, DescriptorError> {
        if decl.name.trim().is_empty() {
            return Err(DescriptorError::EmptyPackageName);
        }
        tracing::debug!("loading package `{}`", decl.name);

        let tools_version = match decl.tools_version {
            Some(ref text) => {
                parse_version(text).ok_or_else(|| DescriptorError::InvalidVersion {
                    subject: "tools-version".to_string(),
                    value: text.clone(),
                })?
            }
            None => DEFAULT_TOOLS_VERSION,
        };

        let platforms = load_platforms(&decl.platforms)?;

        // Every name clash is reported before any reference is followed.
        let target_names = unique_names(
            decl.targets.iter().map(|t| t.name.as_str()),
            NameKind::Target,
        )?;
        unique_names(
            decl.products.iter().map(|p| p.name.as_str()),
            NameKind::Product,
        )?;
        unique_names(
            decl.dependencies.iter().map(|d| d.name.as_str()),
            NameKind::Dependency,
        )?;

        let dependencies = load_dependencies(&decl.dependencies)?;
        let mut targets = decl
            .targets
            .iter()
            .map(load_target)
            .collect::<Result<Vec<_>, _>>()?;
        let products = decl
            .products
            .iter()
            .map(|p| load_product(p, &targets))
            .collect::<Result<Vec<_>, _>>()?;

        for (target, target_decl) in targets.iter_mut().zip(&decl.targets) {
            target.dependencies = target_decl
                .dependencies
                .iter()
                .map(|dep| resolve_dependency(&target.name, dep, &target_names, &dependencies))
                .collect::<Result<Vec<_>, _>>()?;
        }

        if products.is_empty() {
            tracing::warn!(
                "package `{}` declares no products; nothing can consume it",
                decl.name
            );
        }

        tracing::debug!(
            "validated package `{}`: {} targets, {} products",
            decl.name,
            targets.len(),
            products.len()
        );

        Ok(Package {
            name: decl.name.clone(),
            tools_version,
            platforms,
            products,
            targets,
            dependencies,
        })
    }

    /// Get the package name.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tools_version(&self) -> &Version {
        &self.tools_version
    }

    pub fn platforms(&self) -> &[PlatformRequirement] {
        &self.platforms
    }

    /// Get the minimum supported version for a platform, if constrained.
    pub fn min_version(&self, platform: Platform) -> Option<&Version> {
        self.platforms
            .iter()
            .find(|p| p.platform == platform)
            .map(|p| &p.min_version)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Get all targets, in declaration order.
    pub fn targets(&self) -> &[Target] {
        &self.targets
    }

    pub fn dependencies(&self) -> &[PackageDependency] {
        &self.dependencies
    }

    /// Get a target by name.
    pub fn target(&self, name: &str) -> Option<&Target> {
        self.targets.iter().find(|t| t.name == name)
    }

    /// Get a product by name.
    pub fn product(&self, name: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.name == name)
    }

    /// Get an external package dependency by name.
    pub fn dependency(&self, name: &str) -> Option<&PackageDependency> {
        self.dependencies.iter().find(|d| d.name == name)
    }
}

/// Check that names are non-empty and unique, returning them as a set.
fn unique_names<'a>(
    names: impl Iterator<Item = &'a str>,
    kind: NameKind,
) -> Result<HashSet<&'a str>, DescriptorError> {
    let mut seen = HashSet::new();
    for name in names {
        if name.trim().is_empty() {
            return Err(DescriptorError::EmptyName { kind });
        }
        if !seen.insert(name) {
            return Err(DescriptorError::DuplicateName {
                kind,
                name: name.to_string(),
            });
        }
    }
    Ok(seen)
}

fn load_platforms(decls: &[PlatformDecl]) -> Result<Vec<PlatformRequirement>, DescriptorError> {
    let mut seen = HashSet::new();
    let mut platforms = Vec::with_capacity(decls.len());

    for decl in decls {
        if !seen.insert(decl.name) {
            return Err(DescriptorError::DuplicateName {
                kind: NameKind::Platform,
                name: decl.name.to_string(),
            });
        }

        let text = decl.version.as_text();
        let min_version = parse_version(&text).ok_or_else(|| DescriptorError::InvalidVersion {
            subject: format!("platform {}", decl.name),
            value: text.clone(),
        })?;

        platforms.push(PlatformRequirement {
            platform: decl.name,
            min_version,
        });
    }

    Ok(platforms)
}

fn load_dependencies(
    decls: &[PackageDependencyDecl],
) -> Result<Vec<PackageDependency>, DescriptorError> {
    decls
        .iter()
        .map(|decl| -> Result<PackageDependency, DescriptorError> {
            let invalid = |reason: String| DescriptorError::InvalidDependency {
                name: decl.name.clone(),
                reason,
            };

            let location = match (&decl.url, &decl.path) {
                (Some(url), None) => DependencyLocation::Url(
                    Url::parse(url).map_err(|e| invalid(format!("invalid url `{}`: {}", url, e)))?,
                ),
                (None, Some(path)) => DependencyLocation::Path(PathBuf::from(path)),
                (Some(_), Some(_)) => {
                    return Err(invalid("both `url` and `path` are set".to_string()))
                }
                (None, None) => return Err(invalid("missing `url` or `path`".to_string())),
            };

            let requirement = match decl.requirement {
                Some(ref text) => {
                    VersionReq::parse(text).map_err(|_| DescriptorError::InvalidVersion {
                        subject: format!("package dependency `{}`", decl.name),
                        value: text.clone(),
                    })?
                }
                None => VersionReq::STAR,
            };

            Ok(PackageDependency {
                name: decl.name.clone(),
                location,
                requirement,
            })
        })
        .collect()
}

/// Build a target from its declaration. Dependencies are resolved later,
/// once every product has been checked.
fn load_target(decl: &TargetDecl) -> Result<Target, DescriptorError> {
    let invalid_path = |path: &str, reason: &str| DescriptorError::InvalidPath {
        target: decl.name.clone(),
        path: path.to_string(),
        reason: reason.to_string(),
    };

    let path = match decl.path {
        Some(ref raw) => normalize_relative(Path::new(raw))
            .ok_or_else(|| invalid_path(raw, "source path must stay inside the package root"))?,
        None => Target::default_path(&decl.name),
    };

    let raw_headers = decl
        .public_headers_path
        .as_deref()
        .unwrap_or(DEFAULT_PUBLIC_HEADERS_PATH);
    let public_headers_path = normalize_relative(Path::new(raw_headers))
        .ok_or_else(|| invalid_path(raw_headers, "public headers must be nested within the target path"))?;
    if public_headers_path.as_os_str().is_empty() {
        return Err(invalid_path(
            raw_headers,
            "public headers must name a subdirectory of the target path",
        ));
    }

    Ok(Target {
        name: decl.name.clone(),
        kind: decl.kind,
        dependencies: Vec::new(),
        path,
        public_headers_path,
        exclude: decl.exclude.clone(),
    })
}

fn resolve_dependency(
    owner: &str,
    dep: &DependencyDecl,
    target_names: &HashSet<&str>,
    packages: &[PackageDependency],
) -> Result<TargetDependency, DescriptorError> {
    let unknown_target = |name: &str| {
        let mut suggestions = similar_names(name, target_names.iter().copied());
        suggestions.sort();
        DescriptorError::UnknownTargetReference {
            referrer: format!("target `{}`", owner),
            name: name.to_string(),
            suggestions,
        }
    };

    match dep {
        DependencyDecl::ByName(name) => {
            if target_names.contains(name.as_str()) {
                Ok(TargetDependency::Target { name: name.clone() })
            } else if packages.iter().any(|p| &p.name == name) {
                Ok(TargetDependency::Product {
                    name: name.clone(),
                    package: name.clone(),
                })
            } else {
                Err(unknown_target(name))
            }
        }
        DependencyDecl::Target { target } => {
            if target_names.contains(target.as_str()) {
                Ok(TargetDependency::Target {
                    name: target.clone(),
                })
            } else {
                Err(unknown_target(target))
            }
        }
        DependencyDecl::Product { product, package } => {
            if packages.iter().any(|p| &p.name == package) {
                Ok(TargetDependency::Product {
                    name: product.clone(),
                    package: package.clone(),
                })
            } else {
                Err(DescriptorError::UnknownPackageReference {
                    target: owner.to_string(),
                    package: package.clone(),
                })
            }
        }
    }
}

fn load_product(decl: &ProductDecl, targets: &[Target]) -> Result<Product, DescriptorError> {
    let invalid = |reason: &str| DescriptorError::InvalidProduct {
        product: decl.name.clone(),
        reason: reason.to_string(),
    };

    if decl.targets.is_empty() {
        return Err(DescriptorError::EmptyProduct {
            product: decl.name.clone(),
        });
    }

    let mut members = Vec::with_capacity(decl.targets.len());
    for name in &decl.targets {
        let target = targets.iter().find(|t| &t.name == name).ok_or_else(|| {
            let mut suggestions = similar_names(name, targets.iter().map(|t| t.name.as_str()));
            suggestions.sort();
            DescriptorError::UnknownTargetReference {
                referrer: format!("product `{}`", decl.name),
                name: name.clone(),
                suggestions,
            }
        })?;
        if members.iter().any(|m: &&Target| m.name == target.name) {
            return Err(DescriptorError::InvalidProduct {
                product: decl.name.clone(),
                reason: format!("target `{}` listed more than once", name),
            });
        }
        members.push(target);
    }

    if members.iter().any(|t| t.kind == TargetKind::Test) {
        return Err(invalid("test targets cannot be part of a product"));
    }

    let kind = match decl.kind {
        ProductKindDecl::Library => ProductKind::Library {
            library_type: decl.library_type.unwrap_or_default(),
        },
        ProductKindDecl::Executable => {
            let entry_points = members
                .iter()
                .filter(|t| t.kind == TargetKind::Executable)
                .count();
            if entry_points != 1 {
                return Err(invalid(
                    "an executable product needs exactly one executable target",
                ));
            }
            ProductKind::Executable
        }
        ProductKindDecl::Plugin => {
            if members.iter().any(|t| t.kind != TargetKind::Plugin) {
                return Err(invalid("a plugin product may only contain plugin targets"));
            }
            ProductKind::Plugin
        }
    };

    if decl.library_type.is_some() && !kind.is_library() {
        return Err(invalid("`type` only applies to library products"));
    }

    Ok(Product {
        name: decl.name.clone(),
        kind,
        targets: decl.targets.clone(),
    })
}
