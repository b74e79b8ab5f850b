//! Location of the data file.
//!
//! Resolution order:
//! 1. An explicit path (the `--data-file` flag)
//! 2. `FREELANCY_DATA_FILE`
//! 3. `~/.freelancy/data.json`

use std::path::PathBuf;

use crate::error::{Error, Result};

pub const DATA_FILE_ENV: &str = "FREELANCY_DATA_FILE";

const APP_DIR: &str = ".freelancy";
const DATA_FILE: &str = "data.json";

/// Resolve the data file path from an explicit override, the environment, or the
/// home directory.
pub fn resolve_data_file(explicit: Option<PathBuf>) -> Result<PathBuf> {
    resolve_from(explicit, std::env::var(DATA_FILE_ENV).ok(), dirs::home_dir())
}

fn resolve_from(
    explicit: Option<PathBuf>,
    env: Option<String>,
    home: Option<PathBuf>,
) -> Result<PathBuf> {
    if let Some(path) = explicit {
        return Ok(path);
    }
    if let Some(path) = env.filter(|v| !v.trim().is_empty()) {
        return Ok(PathBuf::from(path));
    }

    let mut path = home.ok_or_else(|| {
        Error::Config(format!(
            "Could not determine home directory; set {}",
            DATA_FILE_ENV
        ))
    })?;
    path.push(APP_DIR);
    path.push(DATA_FILE);
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = resolve_from(
            Some(PathBuf::from("/tmp/explicit.json")),
            Some("/tmp/env.json".to_string()),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/explicit.json"));
    }

    #[test]
    fn test_env_before_home() {
        let path = resolve_from(
            None,
            Some("/tmp/env.json".to_string()),
            Some(PathBuf::from("/home/me")),
        )
        .unwrap();
        assert_eq!(path, PathBuf::from("/tmp/env.json"));
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let path = resolve_from(None, Some("  ".to_string()), Some(PathBuf::from("/home/me")))
            .unwrap();
        assert_eq!(path, PathBuf::from("/home/me/.freelancy/data.json"));
    }

    #[test]
    fn test_no_home_is_config_error() {
        let err = resolve_from(None, None, None).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
