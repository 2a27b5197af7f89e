use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};

/// Resolve the application home directory.
///
/// - `explicit` takes precedence when provided; `~` and `~/…` expand to the
///   platform home.
/// - With no explicit path, the platform home plus `default_subdir` is used
///   (`$HOME/.taskdeck` on Unix, `%APPDATA%\.taskdeck` on Windows).
/// - Relative paths are anchored at the current directory, and the result
///   is created when `create` is set.
pub fn resolve_home_dir(
    explicit: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf> {
    let raw = match explicit {
        Some(path) => expand_tilde(&path)?,
        None => platform_home()?.join(default_subdir),
    };

    let absolute = if raw.is_relative() {
        env::current_dir()
            .context("cannot resolve current directory")?
            .join(raw)
    } else {
        raw
    };

    if create {
        fs::create_dir_all(&absolute)
            .with_context(|| format!("cannot create home dir '{}'", absolute.display()))?;
    }

    Ok(absolute)
}

fn platform_home() -> Result<PathBuf> {
    #[cfg(target_os = "windows")]
    let var = "APPDATA";
    #[cfg(not(target_os = "windows"))]
    let var = "HOME";

    env::var_os(var)
        .map(PathBuf::from)
        .ok_or_else(|| anyhow!("environment variable {var} is not set"))
}

fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return platform_home();
    }
    if let Some(rest) = path.strip_prefix("~/") {
        return Ok(platform_home()?.join(rest));
    }
    Ok(PathBuf::from(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_absolute_path_is_kept() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("explicit");
        let resolved = resolve_home_dir(
            Some(dir.to_string_lossy().to_string()),
            ".taskdeck",
            true,
        )
        .unwrap();
        assert_eq!(resolved, dir);
        assert!(dir.exists());
    }

    #[test]
    fn tilde_expands_to_platform_home() {
        let home = platform_home().unwrap();
        let resolved =
            resolve_home_dir(Some("~/.taskdeck_test".into()), ".taskdeck", false).unwrap();
        assert_eq!(resolved, home.join(".taskdeck_test"));
    }

    #[test]
    fn default_subdir_is_used_when_no_path_is_given() {
        let resolved = resolve_home_dir(None, ".taskdeck_probe", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with(".taskdeck_probe"));
    }
}
