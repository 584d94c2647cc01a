//! Berth - package descriptor loader and build-plan resolver
//!
//! A package descriptor names a package, the platforms it supports, the
//! products it exports, and the targets those products are compiled from.
//! This crate validates such descriptors and resolves them into a build
//! plan that an external build tool executes.

pub mod builder;
pub mod core;
pub mod ops;
pub mod resolver;
pub mod util;

pub use crate::core::{
    manifest::Declaration, package::Package, product::Product, target::Target,
    workspace::Workspace, DescriptorError,
};

pub use builder::BuildPlan;
pub use resolver::{load_and_resolve, resolve};
