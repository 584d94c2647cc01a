//! Source layout verification.
//!
//! Checks that the directories a package names actually exist on disk and
//! hold sources. This is read-only: findings are returned as diagnostics and
//! nothing is created or modified.

use std::path::Path;

use anyhow::{Context, Result};
use glob::Pattern;
use walkdir::WalkDir;

use crate::core::{Package, Target};
use crate::util::config::CheckConfig;
use crate::util::diagnostic::Diagnostic;

/// Verify every target's source layout under `root`.
pub fn verify_layout(package: &Package, root: &Path, config: &CheckConfig) -> Result<Vec<Diagnostic>> {
    let extensions = config.source_extensions();
    let mut diagnostics = Vec::new();

    for target in package.targets() {
        diagnostics.extend(verify_target(target, root, &extensions)?);
    }

    tracing::debug!(
        "verified layout of `{}`: {} finding(s)",
        package.name(),
        diagnostics.len()
    );

    Ok(diagnostics)
}

fn verify_target(target: &Target, root: &Path, extensions: &[String]) -> Result<Vec<Diagnostic>> {
    let mut diagnostics = Vec::new();
    let source_dir = root.join(&target.path);

    if !source_dir.is_dir() {
        diagnostics.push(
            Diagnostic::error(format!(
                "source directory for target `{}` does not exist",
                target.name
            ))
            .with_location(&source_dir)
            .with_suggestion(format!(
                "Create `{}` or set `path` on target `{}`",
                target.path.display(),
                target.name
            )),
        );
        return Ok(diagnostics);
    }

    let excludes = target
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p).with_context(|| {
                format!("invalid exclude pattern `{}` in target `{}`", p, target.name)
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let source_count = count_sources(&source_dir, extensions, &excludes);
    tracing::debug!(
        "target `{}`: {} source file(s) in {}",
        target.name,
        source_count,
        source_dir.display()
    );

    if source_count == 0 {
        diagnostics.push(
            Diagnostic::error(format!("target `{}` contains no source files", target.name))
                .with_location(&source_dir)
                .with_context(format!("recognized extensions: {}", extensions.join(", "))),
        );
    }

    let headers_dir = root.join(target.public_headers_dir());
    if !headers_dir.is_dir() {
        diagnostics.push(
            Diagnostic::warning(format!(
                "public headers directory for target `{}` is missing",
                target.name
            ))
            .with_location(&headers_dir)
            .with_context("the target will expose no public interface"),
        );
    }

    Ok(diagnostics)
}

fn count_sources(dir: &Path, extensions: &[String], excludes: &[Pattern]) -> usize {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| extensions.iter().any(|e| e == ext))
        })
        .filter(|entry| {
            let relative = entry.path().strip_prefix(dir).unwrap_or(entry.path());
            !excludes.iter().any(|p| p.matches_path(relative))
        })
        .count()
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;
    use crate::core::manifest::{Declaration, ProductDecl, TargetDecl};
    use tempfile::TempDir;

    fn package(target: TargetDecl) -> Package {
        let decl = Declaration::new("TableKit")
            .with_product(ProductDecl::library("TableKit", ["TableKit"]))
            .with_target(target);
        Package::load(&decl).unwrap()
    }

    fn table_kit() -> TargetDecl {
        TargetDecl::new("TableKit")
            .with_path("./TableKit/")
            .with_public_headers_path("include")
    }

    #[test]
    fn test_valid_layout() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("TableKit");
        fs::create_dir_all(src.join("include")).unwrap();
        fs::write(src.join("TableView.m"), "@implementation TableView\n@end\n").unwrap();
        fs::write(src.join("include").join("TableView.h"), "@interface TableView\n@end\n").unwrap();

        let diags = verify_layout(&package(table_kit()), tmp.path(), &CheckConfig::default()).unwrap();
        assert!(diags.is_empty(), "unexpected findings: {:?}", diags);
    }

    #[test]
    fn test_missing_source_directory() {
        let tmp = TempDir::new().unwrap();

        let diags = verify_layout(&package(table_kit()), tmp.path(), &CheckConfig::default()).unwrap();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].is_error());
        assert!(diags[0].message.contains("does not exist"));
    }

    #[test]
    fn test_empty_source_directory_and_missing_headers() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("TableKit");
        fs::create_dir_all(&src).unwrap();
        fs::write(src.join("README.md"), "docs").unwrap();

        let diags = verify_layout(&package(table_kit()), tmp.path(), &CheckConfig::default()).unwrap();
        assert_eq!(diags.len(), 2);
        assert!(diags[0].is_error());
        assert!(diags[0].message.contains("no source files"));
        assert!(!diags[1].is_error());
    }

    #[test]
    fn test_excluded_sources_do_not_count() {
        let tmp = TempDir::new().unwrap();
        let src = tmp.path().join("TableKit");
        fs::create_dir_all(src.join("include")).unwrap();
        fs::create_dir_all(src.join("Demo")).unwrap();
        fs::write(src.join("Demo").join("main.m"), "int main() { return 0; }").unwrap();

        let mut target = table_kit();
        target.exclude = vec!["Demo/**".to_string()];

        let diags = verify_layout(&package(target), tmp.path(), &CheckConfig::default()).unwrap();
        assert_eq!(diags.len(), 1);
        assert!(diags[0].message.contains("no source files"));
    }

    #[test]
    fn test_invalid_exclude_pattern_is_an_error() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("TableKit")).unwrap();

        let mut target = table_kit();
        target.exclude = vec!["[".to_string()];

        assert!(verify_layout(&package(target), tmp.path(), &CheckConfig::default()).is_err());
    }
}
