//! Descriptor validation and resolution errors.
//!
//! Every error is fatal for the build: a malformed descriptor cannot be
//! partially honored, so nothing here is ever recovered locally.

use std::fmt;

use miette::Diagnostic as MietteDiagnostic;
use thiserror::Error;

use crate::util::diagnostic::Diagnostic;

/// The kind of named entity involved in a duplicate-name error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NameKind {
    Platform,
    Product,
    Target,
    Dependency,
}

impl fmt::Display for NameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameKind::Platform => write!(f, "platform"),
            NameKind::Product => write!(f, "product"),
            NameKind::Target => write!(f, "target"),
            NameKind::Dependency => write!(f, "package dependency"),
        }
    }
}

/// Error raised while loading or resolving a package descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Error, MietteDiagnostic)]
pub enum DescriptorError {
    #[error("package name must not be empty")]
    #[diagnostic(code(berth::load::empty_package_name))]
    EmptyPackageName,

    #[error("{kind} name must not be empty")]
    #[diagnostic(code(berth::load::empty_name))]
    EmptyName { kind: NameKind },

    #[error("duplicate {kind} name `{name}`")]
    #[diagnostic(code(berth::load::duplicate_name))]
    DuplicateName { kind: NameKind, name: String },

    #[error("unknown target `{name}` referenced by {referrer}")]
    #[diagnostic(code(berth::load::unknown_target))]
    UnknownTargetReference {
        referrer: String,
        name: String,
        suggestions: Vec<String>,
    },

    #[error("unknown package `{package}` referenced by target `{target}`")]
    #[diagnostic(code(berth::load::unknown_package))]
    UnknownPackageReference { target: String, package: String },

    #[error("invalid path `{path}` for target `{target}`: {reason}")]
    #[diagnostic(code(berth::load::invalid_path))]
    InvalidPath {
        target: String,
        path: String,
        reason: String,
    },

    #[error("invalid version `{value}` for {subject}")]
    #[diagnostic(code(berth::load::invalid_version))]
    InvalidVersion { subject: String, value: String },

    #[error("invalid package dependency `{name}`: {reason}")]
    #[diagnostic(code(berth::load::invalid_dependency))]
    InvalidDependency { name: String, reason: String },

    #[error("product `{product}` does not contain any targets")]
    #[diagnostic(code(berth::load::empty_product))]
    EmptyProduct { product: String },

    #[error("invalid product `{product}`: {reason}")]
    #[diagnostic(code(berth::load::invalid_product))]
    InvalidProduct { product: String, reason: String },

    #[error("cycle detected in target dependency graph")]
    #[diagnostic(code(berth::resolve::cyclic_dependency))]
    CyclicDependency { cycle: Vec<String> },
}

impl DescriptorError {
    /// Convert to a user-friendly diagnostic.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut diag = Diagnostic::error(self.to_string());
        if let Some(code) = MietteDiagnostic::code(self) {
            diag = diag.with_code(code.to_string());
        }

        match self {
            DescriptorError::EmptyPackageName => {
                diag.with_suggestion("Set `name` at the top of the manifest")
            }

            DescriptorError::EmptyName { kind } => {
                diag.with_suggestion(format!("Give every {} a non-empty `name`", kind))
            }

            DescriptorError::DuplicateName { kind, name } => diag
                .with_context(format!("`{}` is declared more than once", name))
                .with_suggestion(format!("Rename or merge the duplicate {} entries", kind)),

            DescriptorError::UnknownTargetReference {
                name, suggestions, ..
            } => {
                if !suggestions.is_empty() {
                    diag = diag.with_context(format!(
                        "did you mean: {}?",
                        suggestions.join(", ")
                    ));
                }
                diag.with_suggestion(format!("Declare a target named `{}`", name))
                    .with_suggestion("Check that the target name is spelled correctly")
            }

            DescriptorError::UnknownPackageReference { package, .. } => diag
                .with_suggestion(format!(
                    "Add `{}` to the package's `dependencies` list",
                    package
                )),

            DescriptorError::InvalidPath { .. } => diag
                .with_context("paths are relative; public headers live inside the target path")
                .with_suggestion("Remove `..` segments and leading `/` from the path"),

            DescriptorError::InvalidVersion { .. } => diag
                .with_suggestion("Use a dotted numeric version such as `11` or `13.4`"),

            DescriptorError::InvalidDependency { .. } => diag
                .with_suggestion("Give each package dependency exactly one of `url` or `path`"),

            DescriptorError::EmptyProduct { product } => diag.with_suggestion(format!(
                "List at least one target in product `{}`",
                product
            )),

            DescriptorError::InvalidProduct { .. } => diag,

            DescriptorError::CyclicDependency { cycle } => diag
                .with_context(format!("cycle: {}", cycle.join(" -> ")))
                .with_suggestion(
                    "Break the cycle by removing or restructuring dependencies",
                ),
        }
    }
}

/// Find declared names that look like a misspelled reference.
pub(crate) fn similar_names<'a>(
    wanted: &str,
    candidates: impl IntoIterator<Item = &'a str>,
) -> Vec<String> {
    let wanted = wanted.to_lowercase();
    candidates
        .into_iter()
        .filter(|candidate| {
            let candidate = candidate.to_lowercase();
            !wanted.is_empty() && (candidate.contains(&wanted) || wanted.contains(&candidate))
        })
        .map(str::to_string)
        .collect()
}
