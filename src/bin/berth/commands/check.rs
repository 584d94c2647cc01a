//! `berth check` command

use anyhow::{bail, Result};

use crate::cli::CheckArgs;
use crate::commands::open_workspace;
use berth::util::diagnostic::{emit, suggestions};

pub fn execute(args: CheckArgs, color: bool) -> Result<()> {
    let ws = open_workspace(&args.manifest)?;
    let package = ws.package();
    let plan = ws.resolve()?;

    let platforms = if plan.platforms.is_empty() {
        "any platform".to_string()
    } else {
        plan.platforms
            .iter()
            .map(|p| p.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    };

    eprintln!(
        "     Checked {} ({} target(s), {} product(s)) for {}",
        package.name(),
        package.targets().len(),
        package.products().len(),
        platforms
    );
    eprintln!("  Build order {}", plan.build_order.join(" -> "));

    if args.layout || ws.config().check.layout.unwrap_or(false) {
        let diagnostics = ws.verify_layout()?;
        for diag in &diagnostics {
            emit(diag, color);
        }

        let errors = diagnostics.iter().filter(|d| d.is_error()).count();
        if errors > 0 {
            bail!(
                "source layout has {} error(s)\n{}",
                errors,
                suggestions::LAYOUT_FAILED
            );
        }
        eprintln!("      Layout ok ({})", ws.root().display());
    }

    Ok(())
}
