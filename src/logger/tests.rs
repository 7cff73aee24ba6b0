//! Tests for the logger module

use crate::logger::config::*;
use crate::logger::writer::LogFileWriter;
use std::path::PathBuf;

#[cfg(test)]
mod config_tests {
    use super::*;

    fn console_only() -> LoggerConfig {
        LoggerConfig {
            console: ConsoleConfig::new(true, false),
            file: FileConfig {
                enabled: false,
                path: PathBuf::from("test.log"),
                append: true,
                format: LogFormat::Full,
            },
            level: "info".to_string(),
        }
    }

    #[test]
    fn test_default_config_creation() {
        let config = LoggerConfig::default();
        assert!(config.console.enabled);
        assert!(config.console.colored);
        assert!(!config.file.enabled);
        assert_eq!(config.level, "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = console_only();
        assert!(config.validate().is_ok());

        config.console.enabled = false;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_enabled_file_requires_path() {
        let mut config = console_only();
        config.file.enabled = true;
        config.file.path = PathBuf::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_level_overrides_level_only() {
        let config = console_only().with_level("debug");
        assert_eq!(config.parse_level().unwrap(), tracing::Level::DEBUG);
        assert!(!config.console.colored);
    }

    #[test]
    fn test_log_format_parsing() {
        assert_eq!("json".parse::<LogFormat>().unwrap(), LogFormat::Json);
        assert_eq!("COMPACT".parse::<LogFormat>().unwrap(), LogFormat::Compact);
        assert_eq!("full".parse::<LogFormat>().unwrap(), LogFormat::Full);
        assert!("xml".parse::<LogFormat>().is_err());
        assert_eq!(LogFormat::default(), LogFormat::Full);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn property_valid_levels_parse(
            level in prop_oneof![
                Just("trace"), Just("debug"), Just("info"), Just("warn"), Just("error"),
                Just("INFO"), Just("Warn"),
            ],
            console_enabled in any::<bool>(),
            file_enabled in any::<bool>(),
        ) {
            prop_assume!(console_enabled || file_enabled);

            let mut config = LoggerConfig::default().with_level(level);
            config.console.enabled = console_enabled;
            config.file.enabled = file_enabled;

            prop_assert!(config.validate().is_ok());
        }

        #[test]
        fn property_invalid_levels_fail(level in "[a-z]{1,10}") {
            prop_assume!(!["trace", "debug", "info", "warn", "error"].contains(&level.as_str()));

            let config = LoggerConfig::default().with_level(level);
            prop_assert!(config.parse_level().is_err());
            prop_assert!(config.validate().is_err());
        }

        #[test]
        fn property_writer_creates_nested_directories(
            subdir in "[a-z]{1,5}",
            filename in "[a-z]{1,5}\\.log"
        ) {
            let dir = tempfile::tempdir().unwrap();
            let nested_path = dir.path().join(&subdir).join(&filename);

            let config = FileConfig {
                enabled: true,
                path: nested_path.clone(),
                append: true,
                format: LogFormat::Full,
            };

            prop_assert!(LogFileWriter::new(&config).is_ok());
            prop_assert!(nested_path.parent().unwrap().exists());
        }
    }
}

#[cfg(test)]
mod writer_tests {
    use super::*;
    use std::fs;
    use std::io::Write;
    use tracing_subscriber::fmt::MakeWriter;
    use tracing_subscriber::layer::SubscriberExt;

    fn file_config(path: PathBuf, append: bool, format: LogFormat) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append,
            format,
        }
    }

    #[test]
    fn test_append_mode_keeps_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous-run\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), true, LogFormat::Full)).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"next-run\n").unwrap();
        drop(guard);

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "previous-run\nnext-run\n");
        assert!(!writer.is_in_fallback_mode());
    }

    #[test]
    fn test_truncate_mode_discards_existing_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous-run\n").unwrap();

        let writer = LogFileWriter::new(&file_config(path.clone(), false, LogFormat::Full)).unwrap();
        let mut guard = writer.make_writer();
        guard.write_all(b"next-run\n").unwrap();
        drop(guard);

        assert_eq!(fs::read_to_string(&path).unwrap(), "next-run\n");
    }

    #[test]
    fn test_json_file_layer_writes_structured_events() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json.log");

        let layer = crate::logger::file_layer(&file_config(path.clone(), false, LogFormat::Json)).unwrap();
        let subscriber = tracing_subscriber::registry().with(layer);
        tracing::subscriber::with_default(subscriber, || {
            tracing::info!(viewer_id = "viewer-1", "aggregation finished");
        });

        let content = fs::read_to_string(&path).unwrap();
        let line = content.lines().next().expect("one log line");
        let event: serde_json::Value = serde_json::from_str(line).unwrap();
        assert_eq!(event["level"], "INFO");
        assert_eq!(event["fields"]["message"], "aggregation finished");
        assert_eq!(event["fields"]["viewer_id"], "viewer-1");
    }

    #[test]
    fn test_init_logger_rejects_invalid_config_before_install() {
        let config = LoggerConfig::default().with_level("loud");
        let err = crate::logger::init_logger(config).unwrap_err();
        assert!(matches!(err, crate::logger::LoggerError::Config { .. }));
    }
}
