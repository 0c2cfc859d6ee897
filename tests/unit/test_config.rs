//! Unit tests for the config module
//!
//! Tests cover:
//! - Settings defaults and file loading
//! - required keys on an application-defined record
//! - defaults applied under partially specified files

use errflags::config::{decode_config_str, parse_config_file, Conf, LogFormat, LogOutput, Settings};
use errflags::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::fs;
use tempfile::tempdir;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ServiceConf {
    name: String,
    listen: String,
    workers: usize,
    #[serde(default)]
    log: LogSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct LogSection {
    level: String,
    output: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            output: "stderr".to_string(),
        }
    }
}

impl Default for ServiceConf {
    fn default() -> Self {
        Self {
            name: String::new(),
            listen: "127.0.0.1:8080".to_string(),
            workers: 4,
            log: LogSection::default(),
        }
    }
}

impl Conf for ServiceConf {
    fn required_fields() -> &'static [&'static str] {
        &["name", "log.level"]
    }
}

// ============================================================================
// Settings Tests
// ============================================================================

mod settings_tests {
    use super::*;

    #[test]
    fn test_load_explicit_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.toml");
        fs::write(
            &path,
            "[log]\noutput = \"stdout\"\nlevel = \"debug\"\nformat = \"json\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.log.output_target(), LogOutput::Stdout);
        assert_eq!(settings.log.level, "debug");
        assert_eq!(settings.log.format, LogFormat::Json);
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.toml");
        fs::write(&path, "").unwrap();

        let settings = Settings::load(Some(path.as_path())).unwrap();
        assert_eq!(settings.log.level, "info");
        assert!(!settings.log.colors);
    }

    #[test]
    fn test_load_malformed_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("conf.toml");
        fs::write(&path, "[log\nlevel = 1").unwrap();

        let err = Settings::load(Some(path.as_path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("conf.toml"));
    }
}

// ============================================================================
// Required Field Tests
// ============================================================================

mod required_field_tests {
    use super::*;

    #[test]
    fn test_all_required_present() {
        let conf: ServiceConf =
            decode_config_str("name = \"api\"\n[log]\nlevel = \"warn\"\n", "inline").unwrap();
        assert_eq!(conf.name, "api");
        assert_eq!(conf.workers, 4);
        assert_eq!(conf.listen, "127.0.0.1:8080");
        assert_eq!(conf.log.level, "warn");
        assert_eq!(conf.log.output, "stderr");
    }

    #[test]
    fn test_every_missing_field_listed() {
        let err = decode_config_str::<ServiceConf>("workers = 8", "service.toml").unwrap_err();
        assert_eq!(err.missing_fields(), ["name".to_string(), "log.level".to_string()]);
        assert_eq!(
            err.to_string(),
            "Config service.toml is missing required parameters: name, log.level"
        );
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let dir = tempdir().unwrap();
        let err = parse_config_file::<ServiceConf>(dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
        assert!(err.missing_fields().is_empty());
    }

    #[test]
    fn test_parse_file_with_required_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("service.toml");
        fs::write(&path, "name = \"worker\"\nworkers = 2\n[log]\nlevel = \"trace\"\n").unwrap();

        let conf: ServiceConf = parse_config_file(&path).unwrap();
        assert_eq!(conf.workers, 2);
        assert_eq!(conf.log.level, "trace");
    }
}
