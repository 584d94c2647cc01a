//! Resolution of a validated package into a build plan.
//!
//! Resolution is a topological sort over the target dependency graph.
//! Dependencies are compiled before their dependents, and targets that
//! become ready at the same time keep their declaration order.

pub mod graph;

use crate::builder::plan::BuildPlan;
use crate::core::error::DescriptorError;
use crate::core::{Declaration, Package};

pub use graph::TargetGraph;

/// Resolve a package into a build plan.
pub fn resolve(package: &Package) -> Result<BuildPlan, DescriptorError> {
    let graph = TargetGraph::new(package.targets());
    let order: Vec<String> = graph
        .topological_order()?
        .into_iter()
        .map(|t| t.name.clone())
        .collect();

    tracing::debug!(
        "resolved `{}`: build order [{}]",
        package.name(),
        order.join(", ")
    );

    Ok(BuildPlan::new(package, &graph, &order))
}

/// Load and resolve a declaration in one step.
pub fn load_and_resolve(decl: &Declaration) -> Result<(Package, BuildPlan), DescriptorError> {
    let package = Package::load(decl)?;
    let plan = resolve(&package)?;
    Ok((package, plan))
}
