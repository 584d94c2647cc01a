//! `berth tree` command

use std::collections::HashSet;

use anyhow::Result;

use crate::cli::TreeArgs;
use crate::commands::open_workspace;
use berth::core::{Package, TargetDependency};
use berth::resolver::TargetGraph;

pub fn execute(args: TreeArgs) -> Result<()> {
    let ws = open_workspace(&args.manifest)?;
    let package = ws.package();
    // Fails on cycles before anything is printed
    ws.resolve()?;
    let graph = TargetGraph::new(package.targets());

    println!("{} (tools {})", package.name(), package.tools_version());
    for product in package.products() {
        println!("├── {} [{}]", product.name, product.output_filename());
        for target in &product.targets {
            let mut seen = HashSet::new();
            print_target(package, &graph, target, 1, &mut seen);
        }
    }

    Ok(())
}

fn print_target(
    package: &Package,
    graph: &TargetGraph<'_>,
    name: &str,
    depth: usize,
    seen: &mut HashSet<String>,
) {
    let prefix = format!("{}├── ", "│   ".repeat(depth));
    let is_duplicate = !seen.insert(name.to_string());
    let dup_marker = if is_duplicate { " (*)" } else { "" };

    let Some(target) = package.target(name) else {
        return;
    };
    println!(
        "{}{} ({}){}",
        prefix,
        target.name,
        target.path.display(),
        dup_marker
    );
    if is_duplicate {
        return;
    }

    for dep in &target.dependencies {
        if let TargetDependency::Product { name: product, package: pkg } = dep {
            println!("{}│   ├── {} (from {})", "│   ".repeat(depth), product, pkg);
        }
    }
    for dep in graph.dependencies(name) {
        print_target(package, graph, &dep.name, depth + 1, seen);
    }
}
