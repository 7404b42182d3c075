use genome_batch::{
    Error,
    config::{self, LogFormat},
    export::ExportFormat,
};
use pretty_assertions::assert_eq;
use std::path::PathBuf;

mod common;
use common::{create_temp_dir, write_file};

#[tokio::test]
async fn test_load_explicit_config_file() {
    let dir = create_temp_dir();
    let path = write_file(
        &dir,
        "genome-batch.yaml",
        r#"
model:
  base_url: "https://genome.example.org"
monitor:
  limit: 2000
  log_path: "/var/log/genome/api_usage.log"
output:
  formats: [csv, excel]
logs:
  level: "debug"
  format: "pretty"
"#,
    );

    let config = config::load(Some(path.as_path())).await.unwrap();

    assert_eq!(config.model.base_url, "https://genome.example.org");
    assert_eq!(config.model.timeout_secs, 300);
    assert_eq!(config.monitor.limit, 2000);
    assert_eq!(config.monitor.warning_threshold, 0.9);
    assert_eq!(
        config.monitor.log_path,
        Some(PathBuf::from("/var/log/genome/api_usage.log"))
    );
    assert_eq!(
        config.output.formats,
        vec![ExportFormat::Csv, ExportFormat::Excel]
    );
    assert_eq!(config.logs.level, "debug");
    assert_eq!(config.logs.format, LogFormat::Pretty);
}

#[tokio::test]
async fn test_missing_explicit_config_is_error() {
    let dir = create_temp_dir();
    let result = config::load(Some(dir.path().join("absent.yaml").as_path())).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_invalid_threshold_is_rejected() {
    let dir = create_temp_dir();
    let path = write_file(&dir, "bad.yaml", "monitor:\n  warning_threshold: 1.5\n");

    let result = config::load(Some(path.as_path())).await;
    assert!(matches!(result, Err(Error::Config(_))));
}

#[tokio::test]
async fn test_malformed_yaml_is_error() {
    let dir = create_temp_dir();
    let path = write_file(&dir, "bad.yaml", "monitor: [unterminated\n");

    let result = config::load(Some(path.as_path())).await;
    assert!(matches!(result, Err(Error::Yaml(_))));
}

#[test]
fn test_work_dir_path_is_under_home() {
    let path = config::work_dir_path("api_usage.log").unwrap();
    assert!(path.ends_with("work/api_usage.log"));
}
