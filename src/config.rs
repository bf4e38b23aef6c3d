use crate::error::{Result, TempMonError};
use crate::models::RuleSet;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_PATH: &str = "./config.json";

/// One entry of the JSON rule file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RuleConfig {
    pub wpi_pin: u32,
    pub output_val: bool,
    pub condition: String,
    #[serde(rename = "temperature_degC")]
    pub temperature_deg_c: f64,
    pub temperature_src: String,
    #[serde(default)]
    pub match_on_terminate: bool,
}

pub struct Config;

impl Config {
    /// Read the rule file at `path` and build the rule set from it.
    pub fn load(path: &Path) -> Result<RuleSet> {
        let raw = std::fs::read_to_string(path).map_err(|e| TempMonError::ConfigUnreadable {
            path: path.to_path_buf(),
            source: e,
        })?;

        RuleSet::build(&raw, &path.display().to_string())
    }

    pub fn resolve_path(config_override: Option<PathBuf>) -> PathBuf {
        config_override.unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn load_missing_file_is_unreadable() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("config.json")).unwrap_err();
        assert!(matches!(err, TempMonError::ConfigUnreadable { .. }));
        assert_eq!(err.exit_code(), 1);
    }

    #[test]
    fn load_empty_sequence_is_exit_code_two() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[]").unwrap();

        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, TempMonError::EmptyRuleSet(_)));
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn load_valid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"wpi_pin": 7, "output_val": true, "condition": ">",
                 "temperature_degC": 60.5, "temperature_src": "/tmp/t"}}]"#
        )
        .unwrap();

        let rules = Config::load(file.path()).unwrap();
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.pins(), vec![7]);
    }

    #[test]
    fn match_on_terminate_defaults_to_false() {
        let entry: RuleConfig = serde_json::from_str(
            r#"{"wpi_pin": 1, "output_val": false, "condition": "=",
                "temperature_degC": 0, "temperature_src": "x"}"#,
        )
        .unwrap();
        assert!(!entry.match_on_terminate);
        assert_eq!(entry.temperature_deg_c, 0.0);
    }

    #[test]
    fn resolve_path_defaults_to_working_directory() {
        assert_eq!(Config::resolve_path(None), PathBuf::from("./config.json"));
        assert_eq!(
            Config::resolve_path(Some(PathBuf::from("/etc/tempmon.json"))),
            PathBuf::from("/etc/tempmon.json")
        );
    }
}
