//! TopoFlow configuration
//!
//! Locates the `topo.kdl` configuration file and parses it into a
//! [`TopologyConfig`].

pub mod error;
pub mod model;
pub mod parser;

pub use error::*;
pub use model::{NetworkConfig, ProviderConfig, TopologyConfig};
pub use parser::{load_config, parse_config_str};

use std::path::{Path, PathBuf};

/// Environment variable pointing directly at a configuration file
pub const CONFIG_PATH_ENV: &str = "TOPO_CONFIG_PATH";

const CANDIDATES: [&str; 4] = ["topo.local.kdl", ".topo.local.kdl", "topo.kdl", ".topo.kdl"];

/// Get (and create if needed) the TopoFlow config directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = dirs::config_dir()
        .ok_or(ConfigError::ConfigDirNotFound)?
        .join("topoflow");

    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

/// Find the project's configuration file
///
/// Search order:
/// 1. `TOPO_CONFIG_PATH` (direct path)
/// 2. current directory: topo.local.kdl, .topo.local.kdl, topo.kdl, .topo.kdl
/// 3. the same names inside `./.topoflow/`
/// 4. `~/.config/topoflow/topo.kdl` (global)
pub fn find_config_file() -> Result<PathBuf> {
    let current_dir = std::env::current_dir()?;
    find_config_file_from(&current_dir)
}

/// [`find_config_file`] starting from an explicit directory
pub fn find_config_file_from(start: &Path) -> Result<PathBuf> {
    if let Ok(config_path) = std::env::var(CONFIG_PATH_ENV) {
        let path = PathBuf::from(config_path);
        if path.exists() {
            return Ok(path);
        }
        tracing::warn!(path = %path.display(), "{} points at a missing file", CONFIG_PATH_ENV);
    }

    if let Some(path) = find_in_dir(start) {
        return Ok(path);
    }

    let topo_dir = start.join(".topoflow");
    if topo_dir.is_dir()
        && let Some(path) = find_in_dir(&topo_dir)
    {
        return Ok(path);
    }

    if let Some(config_dir) = dirs::config_dir() {
        let global_config = config_dir.join("topoflow").join("topo.kdl");
        if global_config.exists() {
            return Ok(global_config);
        }
    }

    Err(ConfigError::ConfigFileNotFound)
}

fn find_in_dir(dir: &Path) -> Option<PathBuf> {
    CANDIDATES
        .iter()
        .map(|name| dir.join(name))
        .find(|path| path.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::fs;

    #[test]
    fn test_get_config_dir() {
        let config_dir = get_config_dir().unwrap();
        assert!(config_dir.ends_with("topoflow"));
        assert!(config_dir.exists());
    }

    #[test]
    #[serial]
    fn test_find_config_in_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("topo.kdl"), "// test").unwrap();

        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert!(found.ends_with("topo.kdl"));
        });
    }

    #[test]
    #[serial]
    fn test_local_file_wins() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("topo.kdl"), "// shared").unwrap();
        fs::write(temp_dir.path().join("topo.local.kdl"), "// local").unwrap();

        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert!(found.ends_with("topo.local.kdl"));
        });
    }

    #[test]
    #[serial]
    fn test_hidden_local_beats_visible_shared() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join(".topo.local.kdl"), "// hidden").unwrap();
        fs::write(temp_dir.path().join("topo.kdl"), "// visible").unwrap();

        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert!(found.ends_with(".topo.local.kdl"));
        });
    }

    #[test]
    #[serial]
    fn test_find_config_in_topoflow_dir() {
        let temp_dir = tempfile::tempdir().unwrap();
        let topo_dir = temp_dir.path().join(".topoflow");
        fs::create_dir(&topo_dir).unwrap();
        fs::write(topo_dir.join("topo.kdl"), "// nested").unwrap();

        temp_env::with_var_unset(CONFIG_PATH_ENV, || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert!(found.ends_with(".topoflow/topo.kdl"));
        });
    }

    #[test]
    #[serial]
    fn test_env_var_takes_priority() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("topo.kdl"), "// local").unwrap();
        let custom = temp_dir.path().join("custom.kdl");
        fs::write(&custom, "// custom").unwrap();

        temp_env::with_var(CONFIG_PATH_ENV, Some(custom.as_os_str()), || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert_eq!(found, custom);
        });
    }

    #[test]
    #[serial]
    fn test_missing_env_target_falls_through() {
        let temp_dir = tempfile::tempdir().unwrap();
        fs::write(temp_dir.path().join("topo.kdl"), "// local").unwrap();
        let missing = temp_dir.path().join("missing.kdl");

        temp_env::with_var(CONFIG_PATH_ENV, Some(missing.as_os_str()), || {
            let found = find_config_file_from(temp_dir.path()).unwrap();
            assert!(found.ends_with("topo.kdl"));
        });
    }

    #[test]
    #[serial]
    fn test_not_found() {
        let temp_dir = tempfile::tempdir().unwrap();
        let empty_home = tempfile::tempdir().unwrap();

        temp_env::with_vars(
            [
                (CONFIG_PATH_ENV, None),
                ("XDG_CONFIG_HOME", Some(empty_home.path().as_os_str())),
            ],
            || {
                let result = find_config_file_from(temp_dir.path());
                if cfg!(target_os = "linux") {
                    assert!(matches!(result, Err(ConfigError::ConfigFileNotFound)));
                }
            },
        );
    }

    #[test]
    #[serial]
    fn test_load_config_from_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("topo.kdl");
        fs::write(
            &path,
            r#"
            network {
                vpc-cidr-block "10.0.0.0/16"
                zones "a" "b" "c" "d"
            }
            "#,
        )
        .unwrap();

        let config = load_config(&path).unwrap();
        let topology = config.plan().unwrap();
        assert_eq!(topology.zone_count(), 3);
    }

    #[test]
    fn test_load_missing_file() {
        let temp_dir = tempfile::tempdir().unwrap();
        let err = load_config(&temp_dir.path().join("nope.kdl")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }
}
