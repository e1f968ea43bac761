// Shared test helpers for integration tests
#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use parallel_features::core::config::{FeatureFileConfig, RunConfig};
use parallel_features::core::execution::{RunnableUnit, ScenarioEngine, ScenarioReport};
use parallel_features::core::models::WorkerIndex;
use parallel_features::core::splitter::clone_for_feature;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::{TempDir, tempdir};

/// Creates a temporary directory holding the given relative files.
/// Files ending in `.feature` get a minimal Gherkin body.
pub fn feature_tree(files: &[&str]) -> TempDir {
    let temp_dir = tempdir().expect("Failed to create temporary directory");
    for file in files {
        let path = temp_dir.path().join(file);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create feature directory");
        }
        fs::write(&path, format!("Feature: {file}\n  Scenario: works\n"))
            .expect("Failed to write feature file");
    }
    temp_dir
}

/// Writes a `Parallel.toml` into `dir` and returns its path.
pub fn write_config(dir: &Path, content: &str) -> PathBuf {
    let path = dir.join("Parallel.toml");
    fs::write(&path, content).expect("Failed to write config file");
    path
}

/// File names of the given paths, in order.
pub fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect()
}

/// Builds a standalone clone for a made-up feature file, without touching the disk.
pub fn feature_config(index: usize, feature: &str) -> FeatureFileConfig {
    let config = RunConfig::new(vec![], "engine {feature}");
    clone_for_feature(&config, WorkerIndex(index), PathBuf::from(feature))
        .expect("Failed to clone configuration")
}

pub fn unit(index: usize, feature: &str, engine: &Arc<FakeEngine>) -> RunnableUnit {
    RunnableUnit::new(feature_config(index, feature), Arc::clone(engine) as Arc<dyn ScenarioEngine>)
}

/// An in-process scenario engine that decides outcomes by feature file name
/// and records how many calls overlapped.
#[derive(Default)]
pub struct FakeEngine {
    failing: Vec<String>,
    erroring: Vec<String>,
    panicking: Vec<String>,
    delay: Duration,
    running: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn failing(mut self, name: &str) -> Self {
        self.failing.push(name.to_string());
        self
    }

    pub fn erroring(mut self, name: &str) -> Self {
        self.erroring.push(name.to_string());
        self
    }

    pub fn panicking(mut self, name: &str) -> Self {
        self.panicking.push(name.to_string());
        self
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> Vec<PathBuf> {
        self.calls.lock().unwrap().clone()
    }

    fn matches(list: &[String], feature: &Path) -> bool {
        let name = feature.file_name().unwrap_or_default().to_string_lossy();
        list.iter().any(|n| *n == name)
    }
}

#[async_trait]
impl ScenarioEngine for FakeEngine {
    async fn run_scenarios(&self, config: &FeatureFileConfig) -> Result<ScenarioReport> {
        self.calls.lock().unwrap().push(config.feature.clone());
        if Self::matches(&self.panicking, &config.feature) {
            panic!("engine crashed on {}", config.feature.display());
        }

        let running = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(running, Ordering::SeqCst);
        tokio::time::sleep(self.delay).await;
        self.running.fetch_sub(1, Ordering::SeqCst);

        if Self::matches(&self.erroring, &config.feature) {
            return Err(anyhow!("engine binary not found"));
        }
        if Self::matches(&self.failing, &config.feature) {
            Ok(ScenarioReport::failed("1 scenario failed"))
        } else {
            Ok(ScenarioReport::passed("1 scenario passed"))
        }
    }
}
