//! Core data structures for Berth.
//!
//! This module contains the descriptor model:
//! - The raw declaration format (`Declaration`)
//! - The validated package and its products, targets, and platforms
//! - The error taxonomy shared by loading and resolution

pub mod dependency;
pub mod error;
pub mod manifest;
pub mod package;
pub mod platform;
pub mod product;
pub mod target;
pub mod workspace;

pub use dependency::{DependencyLocation, PackageDependency};
pub use error::{DescriptorError, NameKind};
pub use manifest::Declaration;
pub use package::Package;
pub use platform::{Platform, PlatformRequirement};
pub use product::{LibraryType, Product, ProductKind};
pub use target::{Target, TargetDependency, TargetKind};
pub use workspace::Workspace;
