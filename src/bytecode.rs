//! Compiled Move bytecode produced by the build tool.
//!
//! Layout: `<build_dir>/<package>/bytecode_modules/<module>.mv`.

use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{KeepsakeError, Result};

fn modules_dir(build_dir: &Path, package: &str) -> PathBuf {
    build_dir.join(package).join("bytecode_modules")
}

/// Base64 bytecode of every module in the package, ordered by file name.
pub fn load_package(build_dir: &Path, package: &str) -> Result<Vec<String>> {
    let dir = modules_dir(build_dir, package);
    let entries = std::fs::read_dir(&dir).map_err(|e| {
        KeepsakeError::Build(format!("cannot read {}: {}", dir.display(), e))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("mv") {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(KeepsakeError::Build(format!(
            "no .mv modules in {}; build the package first",
            dir.display()
        )));
    }

    paths.iter().map(|p| encode_file(p)).collect()
}

/// Base64 bytecode of a single module.
pub fn load_module(build_dir: &Path, package: &str, module: &str) -> Result<String> {
    let path = modules_dir(build_dir, package).join(format!("{module}.mv"));
    if !path.is_file() {
        return Err(KeepsakeError::Build(format!(
            "module {} not found at {}",
            module,
            path.display()
        )));
    }
    encode_file(&path)
}

fn encode_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    debug!("Loaded {} ({} bytes)", path.display(), bytes.len());
    Ok(BASE64_STANDARD.encode(bytes))
}
