//! Package extraction: directory of Go files → [`Content`].

use super::model::Content;
use super::source::SourceCache;
use super::visitor::{Decl, FileVisitor, TypeDecl};
use crate::errors::{ApiDeltaError, Result};
use crate::{log_op_end, log_op_error, log_op_start};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tree_sitter::{Parser, Tree};

/// Extract the exported declaration surface of the package in `dir`.
///
/// Only `.go` files directly inside `dir` are considered; `_test.go` files
/// are skipped.
///
/// # Errors
///
/// - `PackageNotFound` when no file carries a package clause
/// - `MultiplePackages` when the files disagree on the package name
/// - `NoExports` when the package declares nothing exported
/// - `Io` / `Parse` on unreadable files or an unusable grammar
pub fn extract(dir: &Path) -> Result<Content> {
    log_op_start!("extract", dir = %dir.display());
    let start = std::time::Instant::now();

    let (package, file_count, content) = extract_impl(dir).map_err(|e| {
        log_op_error!(
            "extract",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "extract",
        duration_ms = start.elapsed().as_millis() as u64,
        package = %package,
        file_count = file_count
    );
    Ok(content)
}

fn extract_impl(dir: &Path) -> Result<(String, usize, Content)> {
    let files = go_source_files(dir)?;
    let mut cache = SourceCache::new();
    let mut parser = go_parser()?;

    // Pass 1: parse everything and settle the package name.
    let mut trees: Vec<(PathBuf, Tree)> = Vec::with_capacity(files.len());
    let mut names = BTreeSet::new();
    for path in files {
        let src = cache.get(&path)?;
        let tree = parser.parse(src, None).ok_or_else(|| ApiDeltaError::Parse {
            path: path.display().to_string(),
            reason: "parser returned no tree".to_string(),
        })?;
        if let Some(name) = FileVisitor::new(src).package_name(tree.root_node()) {
            names.insert(name);
        }
        trees.push((path, tree));
    }

    let package = match names.len() {
        0 => {
            return Err(ApiDeltaError::PackageNotFound {
                dir: dir.display().to_string(),
            })
        }
        1 => names.into_iter().next().unwrap_or_default(),
        _ => {
            return Err(ApiDeltaError::MultiplePackages {
                dir: dir.display().to_string(),
                names: names.into_iter().collect(),
            })
        }
    };

    // Pass 2: dispatch declarations.
    let mut content = Content::default();
    for (path, tree) in &trees {
        let src = cache.get(path)?;
        for decl in FileVisitor::new(src).declarations(tree.root_node()) {
            add_decl(&mut content, decl);
        }
    }

    if content.is_empty() {
        return Err(ApiDeltaError::NoExports { package });
    }
    Ok((package, cache.len(), content))
}

fn add_decl(content: &mut Content, decl: Decl) {
    match decl {
        Decl::Const { name, value } => {
            content.consts.insert(name, value);
        }
        Decl::Type { name, kind } => match kind {
            TypeDecl::Alias(alias) => {
                content.type_aliases.insert(name, alias);
            }
            TypeDecl::Interface(iface) => {
                content.interfaces.insert(name, iface);
            }
            TypeDecl::Struct(def) => {
                content.structs.insert(name, def);
            }
        },
        Decl::Func { key, func } => {
            content.funcs.insert(key, func);
        }
    }
}

fn go_parser() -> Result<Parser> {
    let mut parser = Parser::new();
    parser
        .set_language(&tree_sitter_go::language())
        .map_err(|e| ApiDeltaError::Parse {
            path: "<grammar>".to_string(),
            reason: e.to_string(),
        })?;
    Ok(parser)
}

/// Non-test `.go` files directly inside `dir`, sorted by path.
fn go_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir).map_err(|e| ApiDeltaError::io(dir, e))?;
    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ApiDeltaError::io(dir, e))?.path();
        if is_go_source(&path) && !is_test_file(&path) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn is_go_source(path: &Path) -> bool {
    path.is_file() && path.extension().is_some_and(|ext| ext == "go")
}

fn is_test_file(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with("_test.go"))
}

/// Whether any `.go` file in `dir` pins an `"api-version"` whose value
/// contains `preview`.
///
/// Matches lines shaped like `reqQP.Set("api-version", "2023-01-01-preview")`:
/// split on `"`, the line must yield exactly five parts and the fourth is the
/// version value.
pub fn detect_preview_api_version(dir: &Path) -> Result<bool> {
    let entries = std::fs::read_dir(dir).map_err(|e| ApiDeltaError::io(dir, e))?;
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| ApiDeltaError::io(dir, e))?.path();
        if is_go_source(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    let mut cache = SourceCache::new();
    for path in &paths {
        let src = cache.get(path)?;
        if src.lines().any(is_preview_api_version_line) {
            return Ok(true);
        }
    }
    Ok(false)
}

fn is_preview_api_version_line(line: &str) -> bool {
    if !line.contains("\"api-version\"") {
        return false;
    }
    let parts: Vec<&str> = line.split('"').collect();
    parts.len() == 5 && parts[3].contains("preview")
}
