//! Command implementations

pub mod check;
pub mod completions;
pub mod plan;
pub mod tree;

use anyhow::Result;

use crate::cli::ManifestArgs;
use berth::util::diagnostic::suggestions;
use berth::util::fs::find_manifest;
use berth::Workspace;

/// Open the workspace named by `--manifest-path`, or the nearest manifest.
pub fn open_workspace(args: &ManifestArgs) -> Result<Workspace> {
    let manifest_path = match args.manifest_path {
        Some(ref path) => path.clone(),
        None => {
            let cwd = std::env::current_dir()?;
            find_manifest(&cwd).ok_or_else(|| {
                anyhow::anyhow!(
                    "could not find Berth.toml in {} or any parent directory\n{}",
                    cwd.display(),
                    suggestions::NO_MANIFEST
                )
            })?
        }
    };

    let ws = Workspace::new(&manifest_path)?;
    tracing::debug!(
        "loaded `{}` from {}",
        ws.package().name(),
        ws.manifest_path().display()
    );
    Ok(ws)
}
