//! # Config Module Unit Tests / Config 模块单元测试
//!
//! This module tests the `config.rs` module: plugin declarations, TOML
//! deserialization of `RunConfig` with its defaults, and loading from disk.
//!
//! 此模块测试 `config.rs` 模块：插件声明、`RunConfig` 的 TOML 反序列化
//! 及其默认值，以及从磁盘加载。

mod common;

use parallel_features::core::config::{
    ExtendedOptions, Plugin, ReportDestination, ReportKind, RunConfig, load_run_config,
};
use std::path::PathBuf;

#[cfg(test)]
mod plugin_tests {
    use super::*;

    #[test]
    fn test_kind_prefixed_plugin() {
        let plugin: Plugin = "json:target/report.json".parse().unwrap();
        assert_eq!(
            plugin,
            Plugin::Destination(ReportDestination {
                kind: Some(ReportKind::Json),
                path: PathBuf::from("target/report.json"),
            })
        );
        assert_eq!(plugin.kind(), Some(ReportKind::Json));
    }

    #[test]
    fn test_bare_kind_is_console_plugin() {
        let plugin: Plugin = "pretty".parse().unwrap();
        assert_eq!(plugin, Plugin::Console(ReportKind::Pretty));
        assert!(plugin.destination().is_none());
    }

    #[test]
    fn test_bare_path_plugin() {
        let plugin: Plugin = "reports/out.txt".parse().unwrap();
        let dest = plugin.destination().unwrap();
        assert_eq!(dest.kind, None);
        assert_eq!(dest.path, PathBuf::from("reports/out.txt"));
        assert_eq!(plugin.to_string(), "reports/out.txt");
    }

    #[test]
    fn test_empty_plugin_is_rejected() {
        assert!("".parse::<Plugin>().is_err());
        assert!("   ".parse::<Plugin>().is_err());
    }

    #[test]
    fn test_report_kind_from_str() {
        assert_eq!("junit".parse::<ReportKind>(), Ok(ReportKind::Junit));
        assert!("xml".parse::<ReportKind>().is_err());
    }
}

#[cfg(test)]
mod run_config_tests {
    use super::*;

    #[test]
    fn test_minimal_config_defaults() {
        let config: RunConfig = toml::from_str(
            r#"
[engine]
command = "cucumber {feature}"
"#,
        )
        .unwrap();

        assert_eq!(config.language, "en");
        assert_eq!(config.feature_mask, "*.feature");
        assert!(config.cucumber.features.is_empty());
        assert!(config.extended.is_empty());
        assert_eq!(config.engine.timeout_secs, None);
        assert_eq!(config.thread_hints().count(), 0);
    }

    #[test]
    fn test_full_config() {
        let config: RunConfig = toml::from_str(
            r#"
language = "zh-CN"
feature_mask = "**/smoke_*.feature"

[engine]
command = "cucumber --format json:{report:json} {feature}"
timeout_secs = 30
env = { RUST_LOG = "debug" }

[cucumber]
features = ["features", "extra/one.feature"]
plugins = ["json:out/report.json", "pretty"]
tags = ["@smoke"]
strict = true

[[extended]]
threads_count = 4
output_folder = "out/extended"
json_report = "out/report.json"

[[extended]]
threads_count = 2
output_folder = "out/usage"
usage_report = true
"#,
        )
        .unwrap();

        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.engine.timeout_secs, Some(30));
        assert_eq!(config.engine.env.get("RUST_LOG").map(String::as_str), Some("debug"));
        assert_eq!(config.cucumber.features.len(), 2);
        assert_eq!(config.cucumber.plugins[1], Plugin::Console(ReportKind::Pretty));
        assert!(config.cucumber.strict);
        assert_eq!(config.thread_hints().collect::<Vec<_>>(), vec![4, 2]);
        assert_eq!(config.extended[1].report_prefix, "cucumber-results");
        assert!(config.extended[1].usage_report);
    }

    #[test]
    fn test_missing_engine_is_rejected() {
        let result: Result<RunConfig, _> = toml::from_str("language = \"en\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_extended_defaults() {
        let ext = ExtendedOptions::default();
        assert_eq!(ext.threads_count, 1);
        assert_eq!(ext.output_folder, None);
        assert_eq!(ext.report_prefix, "cucumber-results");
    }

    #[test]
    fn test_new_sets_sources_and_command() {
        let config = RunConfig::new(vec![PathBuf::from("features")], "run {feature}");
        assert_eq!(config.cucumber.features, vec![PathBuf::from("features")]);
        assert_eq!(config.engine.command, "run {feature}");
        assert!(config.cucumber.plugins.is_empty());
    }
}

#[cfg(test)]
mod load_tests {
    use super::*;
    use common::write_config;

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
[engine]
command = "true"

[cucumber]
features = ["features"]
"#,
        );

        let config = load_run_config(&path).unwrap();
        assert_eq!(config.cucumber.features, vec![PathBuf::from("features")]);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_run_config(&dir.path().join("missing.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }

    #[test]
    fn test_load_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_config(dir.path(), "[engine\ncommand = \"true\"\n");
        let err = load_run_config(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }
}
