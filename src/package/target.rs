//! Map the CLI target to a package name

use crate::error::{StarsError, StarsResult};
use std::fs;
use std::path::{Path, MAIN_SEPARATOR};
use std::process::{Command, Stdio};
use tracing::debug;

/// Whether `target` names a path rather than a package
fn is_path(target: &str) -> bool {
    matches!(target, "." | "..") || target.contains('/') || target.contains(MAIN_SEPARATOR)
}

/// Resolve `target` to a package name.
///
/// `.`, `..` and anything containing a path separator is a project
/// checkout: the name comes from `pyproject.toml` (`[project]` then
/// `[tool.poetry]`) or `setup.py --name`. Anything else is taken as the
/// package name itself, even if a directory of that name exists.
pub fn resolve_target(target: &str) -> StarsResult<String> {
    let trimmed = target.trim();
    let path = Path::new(trimmed);

    if trimmed.is_empty() {
        return Err(StarsError::NoPackageFound(path.to_path_buf()));
    }

    if !is_path(trimmed) {
        return Ok(trimmed.to_string());
    }

    if !path.is_dir() {
        return Err(StarsError::NoPackageFound(path.to_path_buf()));
    }

    if let Some(name) = name_from_pyproject(path)? {
        debug!("package name from pyproject.toml: {}", name);
        return Ok(name);
    }

    if let Some(name) = name_from_setup_py(path)? {
        debug!("package name from setup.py: {}", name);
        return Ok(name);
    }

    Err(StarsError::NoPackageFound(path.to_path_buf()))
}

fn name_from_pyproject(dir: &Path) -> StarsResult<Option<String>> {
    let path = dir.join("pyproject.toml");
    if !path.is_file() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)
        .map_err(|e| StarsError::io(format!("reading {}", path.display()), e))?;
    let document: toml::Table = toml::from_str(&content)?;

    let project_name = document
        .get("project")
        .and_then(|project| project.get("name"));
    let poetry_name = document
        .get("tool")
        .and_then(|tool| tool.get("poetry"))
        .and_then(|poetry| poetry.get("name"));

    Ok(project_name
        .or(poetry_name)
        .and_then(|name| name.as_str())
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_lowercase))
}

fn name_from_setup_py(dir: &Path) -> StarsResult<Option<String>> {
    if !dir.join("setup.py").is_file() {
        return Ok(None);
    }

    let output = Command::new("python")
        .args(["setup.py", "--name"])
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| StarsError::command_failed("python setup.py --name", e))?;

    if !output.status.success() {
        debug!(
            "python setup.py --name failed: {}",
            String::from_utf8_lossy(&output.stderr).trim()
        );
        return Ok(None);
    }

    // setuptools may print warnings before the name
    Ok(String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .last()
        .map(str::to_lowercase))
}
