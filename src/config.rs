use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use globset::{GlobBuilder, GlobMatcher};
use tracing::debug;
use walkdir::WalkDir;

pub const DEFAULT_SCHEMA_PATTERN: &str = "*.graphql";
pub const DEFAULT_OUT_FILE: &str = "clientgen.rs";

/// Expands schema patterns into files, keeping the first occurrence of each path.
///
/// `*` and `?` stay within one path component; `**` spans any number of
/// directories. A pattern without wildcards names a file directly.
pub fn expand_schema_globs(patterns: &[String]) -> anyhow::Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();
    for pattern in patterns {
        let matches = expand_glob(pattern)?;
        debug!(pattern = %pattern, matches = matches.len(), "expanded schema pattern");
        for m in matches {
            if out.contains(&m) {
                continue;
            }
            out.push(m);
        }
    }
    Ok(out)
}

fn expand_glob(pattern: &str) -> anyhow::Result<Vec<PathBuf>> {
    let normalized = pattern.replace('\\', "/");
    if !has_wildcard(&normalized) {
        let p = PathBuf::from(pattern);
        return Ok(if p.is_file() { vec![p] } else { Vec::new() });
    }

    let (root, rest) = split_literal_root(&normalized);
    let root_path = if root.is_empty() {
        PathBuf::from(".")
    } else {
        PathBuf::from(&root)
    };
    let matcher =
        compile_glob(&rest).with_context(|| format!("invalid schema pattern {pattern}"))?;
    if !root_path.is_dir() {
        return Ok(Vec::new());
    }

    let mut walker = WalkDir::new(&root_path)
        .min_depth(1)
        .follow_links(true)
        .sort_by_file_name();
    if !rest.contains("**") {
        walker = walker.max_depth(rest.split('/').count());
    }

    let mut matches = Vec::new();
    for entry in walker {
        let entry =
            entry.with_context(|| format!("failed to walk schema at root {}", root_path.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let rel = entry.path().strip_prefix(&root_path)?;
        let rel_str = rel
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/");
        if !matcher.is_match(&rel_str) {
            continue;
        }
        if root.is_empty() {
            matches.push(rel.to_path_buf());
        } else {
            matches.push(entry.path().to_path_buf());
        }
    }
    Ok(matches)
}

fn has_wildcard(s: &str) -> bool {
    s.contains(['*', '?', '[', '{'])
}

/// Splits `a/b/*.graphql` into (`a/b`, `*.graphql`).
fn split_literal_root(pattern: &str) -> (String, String) {
    let parts = pattern.split('/').collect::<Vec<_>>();
    let first_wild = parts
        .iter()
        .position(|p| has_wildcard(p))
        .unwrap_or(parts.len());
    let mut root = parts[..first_wild].join("/");
    if root.is_empty() && pattern.starts_with('/') {
        root.push('/');
    }
    (root, parts[first_wild..].join("/"))
}

/// `*` and `?` never cross a `/`; `**` spans directories.
fn compile_glob(glob: &str) -> Result<GlobMatcher, globset::Error> {
    Ok(GlobBuilder::new(glob)
        .literal_separator(true)
        .build()?
        .compile_matcher())
}

/// Writes `contents` to `path`, creating parent directories as needed.
pub fn write_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    fs::write(path, contents).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}

/// Fails unless `path` already holds exactly `contents`.
pub fn check_output(path: &Path, contents: &str) -> anyhow::Result<()> {
    let existing = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    if existing != contents {
        anyhow::bail!("{} is out of date; rerun clientgen", path.display());
    }
    Ok(())
}
