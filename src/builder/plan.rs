//! Build plan generation.
//!
//! A BuildPlan is what the external build tool consumes: targets to compile
//! in dependency order, and the products to link from them. Producing the
//! plan does not touch the filesystem.

use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::platform::PlatformRequirement;
use crate::core::product::ProductKind;
use crate::core::target::TargetKind;
use crate::core::Package;
use crate::resolver::graph::TargetGraph;
use crate::util::hash::Fingerprint;

/// A complete build plan for one package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildPlan {
    /// Package name
    pub package: String,

    /// Minimum platform versions to compile against
    pub platforms: Vec<PlatformRequirement>,

    /// Target names in build order
    pub build_order: Vec<String>,

    /// One compile step per target, in build order
    pub compile_steps: Vec<CompileStep>,

    /// One link step per product, in declaration order
    pub link_steps: Vec<LinkStep>,

    /// SHA-256 over the plan contents
    pub fingerprint: String,
}

/// An external product a step needs.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ProductRef {
    pub package: String,
    pub product: String,
}

/// Compilation of a single target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompileStep {
    pub target: String,

    pub kind: TargetKind,

    /// Source root relative to the package root
    pub source_root: PathBuf,

    /// Public headers directory relative to the package root
    pub public_headers: PathBuf,

    /// Public headers of every target this one depends on, in build order
    pub include_dirs: Vec<PathBuf>,

    /// Direct target dependencies, in declaration order
    pub dependencies: Vec<String>,

    /// External products used by this target
    pub products: Vec<ProductRef>,

    /// Glob patterns excluded from the source root
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude: Vec<String>,
}

/// Linking of a single product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkStep {
    pub product: String,

    #[serde(flatten)]
    pub kind: ProductKind,

    /// Output file name
    pub output: String,

    /// Compiled targets to link, in build order
    pub targets: Vec<String>,

    /// External products to link against
    pub products: Vec<ProductRef>,
}

impl BuildPlan {
    /// Create a build plan from a package and its targets in build order.
    pub(crate) fn new(package: &Package, graph: &TargetGraph<'_>, order: &[String]) -> Self {
        let compile_steps = order
            .iter()
            .filter_map(|name| package.target(name))
            .map(|target| {
                let mut closure: Vec<&str> = graph
                    .transitive_dependencies(&target.name)
                    .into_iter()
                    .collect();
                sort_in_build_order(&mut closure, order);

                let include_dirs = closure
                    .iter()
                    .filter_map(|name| package.target(name))
                    .map(|dep| dep.public_headers_dir())
                    .collect();

                let products: BTreeSet<ProductRef> = target
                    .product_dependencies()
                    .map(|(package, product)| ProductRef {
                        package: package.to_string(),
                        product: product.to_string(),
                    })
                    .collect();

                CompileStep {
                    target: target.name.clone(),
                    kind: target.kind,
                    source_root: target.path.clone(),
                    public_headers: target.public_headers_dir(),
                    include_dirs,
                    dependencies: target.target_dependencies().map(str::to_string).collect(),
                    products: products.into_iter().collect(),
                    exclude: target.exclude.clone(),
                }
            })
            .collect::<Vec<_>>();

        let link_steps = package
            .products()
            .iter()
            .map(|product| {
                let mut members: BTreeSet<&str> = BTreeSet::new();
                for name in &product.targets {
                    members.insert(name.as_str());
                    members.extend(graph.transitive_dependencies(name));
                }
                let mut targets: Vec<&str> = members.into_iter().collect();
                sort_in_build_order(&mut targets, order);

                let products: BTreeSet<ProductRef> = compile_steps
                    .iter()
                    .filter(|step| targets.contains(&step.target.as_str()))
                    .flat_map(|step| step.products.iter().cloned())
                    .collect();

                LinkStep {
                    product: product.name.clone(),
                    kind: product.kind,
                    output: product.output_filename(),
                    targets: targets.into_iter().map(str::to_string).collect(),
                    products: products.into_iter().collect(),
                }
            })
            .collect::<Vec<_>>();

        let mut plan = BuildPlan {
            package: package.name().to_string(),
            platforms: package.platforms().to_vec(),
            build_order: order.to_vec(),
            compile_steps,
            link_steps,
            fingerprint: String::new(),
        };
        plan.fingerprint = plan.compute_fingerprint();
        plan
    }

    /// Get the compile step for a target.
    pub fn compile_step(&self, target: &str) -> Option<&CompileStep> {
        self.compile_steps.iter().find(|s| s.target == target)
    }

    /// Get the link step for a product.
    pub fn link_step(&self, product: &str) -> Option<&LinkStep> {
        self.link_steps.iter().find(|s| s.product == product)
    }

    fn compute_fingerprint(&self) -> String {
        let mut fp = Fingerprint::new();
        fp.update_str(&self.package);

        let platforms: Vec<String> = self.platforms.iter().map(|p| p.to_string()).collect();
        fp.update_strs(platforms.iter().map(String::as_str))
            .update_strs(self.build_order.iter().map(String::as_str));

        for step in &self.compile_steps {
            fp.update_str(&step.target)
                .update_str(&format!("{:?}", step.kind))
                .update_str(&step.source_root.to_string_lossy())
                .update_str(&step.public_headers.to_string_lossy());
            let include_dirs: Vec<String> = step
                .include_dirs
                .iter()
                .map(|d| d.to_string_lossy().into_owned())
                .collect();
            fp.update_strs(include_dirs.iter().map(String::as_str))
                .update_strs(step.dependencies.iter().map(String::as_str))
                .update_strs(step.exclude.iter().map(String::as_str));
            let products: Vec<String> = step
                .products
                .iter()
                .map(|p| format!("{}/{}", p.package, p.product))
                .collect();
            fp.update_strs(products.iter().map(String::as_str));
        }

        for step in &self.link_steps {
            fp.update_str(&step.product)
                .update_str(&format!("{:?}", step.kind))
                .update_str(&step.output)
                .update_strs(step.targets.iter().map(String::as_str));
        }

        fp.finish()
    }
}

fn sort_in_build_order(names: &mut [&str], order: &[String]) {
    names.sort_by_key(|name| {
        order
            .iter()
            .position(|n| n.as_str() == *name)
            .unwrap_or(usize::MAX)
    });
}
