// src/graph/includes.rs
//! Quoted include-directive scanning and dependency path construction.
//!
//! This is a textual approximation: only lines that start with the directive
//! and carry a quoted target are considered. Angle-bracket (system) includes are ignored.

use regex::Regex;
use std::path::{Component, Path, PathBuf};
use std::sync::LazyLock;

pub const INCLUDE_DIRECTIVE: &str = "#include";

const INCLUDE_TARGET_PATTERN: &str = r#""([A-Za-z0-9_./\\-]*)""#;

static INCLUDE_TARGET_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(INCLUDE_TARGET_PATTERN).unwrap_or_else(|_| panic!("Invalid Regex"))
});

/// Returns the quoted target of an include line, or `None` for any other line.
#[must_use]
pub fn include_target(line: &str) -> Option<&str> {
    if !line.trim_start().starts_with(INCLUDE_DIRECTIVE) {
        return None;
    }
    let target = INCLUDE_TARGET_RE.captures(line)?.get(1)?.as_str();
    if target.is_empty() {
        return None;
    }
    Some(target)
}

/// All quoted include targets of `content`, in source order.
#[must_use]
pub fn include_targets(content: &str) -> Vec<&str> {
    content.lines().filter_map(include_target).collect()
}

/// Path of `target` as seen from the directory of `including`.
#[must_use]
pub fn sibling_path(including: &Path, target: &str) -> PathBuf {
    let target = target.replace('\\', "/");
    let dir = including.parent().unwrap_or_else(|| Path::new(""));
    normalize(&dir.join(target))
}

/// Replaces a `from` extension with `to`. Paths with any other extension are returned as-is.
#[must_use]
pub fn swap_extension(path: &Path, from: &str, to: &str) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext == from => path.with_extension(to),
        _ => path.to_path_buf(),
    }
}

/// Lexically resolves `.` and `..` components without touching the filesystem.
#[must_use]
pub fn normalize(path: &Path) -> PathBuf {
    let mut parts: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match parts.last() {
                Some(Component::Normal(_)) => {
                    parts.pop();
                }
                Some(Component::RootDir | Component::Prefix(_)) => {}
                _ => parts.push(component),
            },
            other => parts.push(other),
        }
    }
    parts.iter().collect()
}
