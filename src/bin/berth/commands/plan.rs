//! `berth plan` command

use anyhow::{Context, Result};

use crate::cli::PlanArgs;
use crate::commands::open_workspace;

pub fn execute(args: PlanArgs) -> Result<()> {
    let ws = open_workspace(&args.manifest)?;
    let plan = ws.resolve()?;

    let json = if args.pretty || ws.config().plan.pretty.unwrap_or(false) {
        serde_json::to_string_pretty(&plan)
    } else {
        serde_json::to_string(&plan)
    }
    .context("failed to serialize build plan")?;

    println!("{}", json);
    Ok(())
}
