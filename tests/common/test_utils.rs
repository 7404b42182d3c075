use genome_batch::{
    config::{Config, MonitorConfig},
    genome::{Interval, Variant},
    monitor::{DEFAULT_LOG_FILE, UsageMonitor},
};
use std::path::PathBuf;
use tempfile::TempDir;

pub const VARIANTS_CSV: &str = "\
chromosome,position,reference_bases,alternate_bases
chr22,36201698,A,C
chr1,1000,G,T
chr2,50000,C,A
";

pub const INTERVALS_CSV: &str = "\
chromosome,start,end
chr22,35677410,36725986
chr1,0,131072
";

/// Create a temporary directory for test files
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Write `content` to `name` inside `dir` and return the path
pub fn write_file(dir: &TempDir, name: &str, content: &str) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Create a test configuration whose usage log and results live in `dir`
pub fn create_test_config(dir: &TempDir) -> Config {
    let mut config = Config::default();
    config.model.base_url = "http://127.0.0.1:9".to_string();
    config.model.api_key = "test-api-key".to_string();
    config.monitor = MonitorConfig {
        log_path: Some(dir.path().join(DEFAULT_LOG_FILE)),
        ..MonitorConfig::default()
    };
    config.output.dir = Some(dir.path().join("results"));
    config
}

/// Create a usage monitor logging into `dir`
pub fn create_test_monitor(dir: &TempDir, limit: u64) -> UsageMonitor {
    UsageMonitor::new(limit, 0.9, dir.path().join(DEFAULT_LOG_FILE))
        .expect("Failed to create usage monitor")
}

pub fn sample_variants() -> Vec<Variant> {
    vec![
        Variant::new("chr22", 36_201_698, "A", "C"),
        Variant::new("chr1", 1_000, "G", "T"),
        Variant::new("chr2", 50_000, "C", "A"),
    ]
}

pub fn sample_intervals() -> Vec<Interval> {
    vec![
        Interval::new("chr22", 35_677_410, 36_725_986).unwrap(),
        Interval::new("chrX", 0, 131_072).unwrap(),
    ]
}
