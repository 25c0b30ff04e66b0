//! Mock implementations for integration tests.
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use descriptor_index::domain::ports::{Resolution, ScanSource, TypeResolver};
use descriptor_index::domain::scan::ScanIndex;

/// TypeResolver answering from a fixed table and recording every question.
pub struct MockTypeResolver {
    answers: HashMap<String, Resolution>,
    asked: Mutex<Vec<String>>,
}

impl MockTypeResolver {
    pub fn new() -> Self {
        Self {
            answers: HashMap::new(),
            asked: Mutex::new(Vec::new()),
        }
    }

    pub fn accept(mut self, name: &str, resolution: Resolution) -> Self {
        self.answers.insert(name.to_string(), resolution);
        self
    }

    pub fn library(self, name: &str) -> Self {
        self.accept(name, Resolution::Library)
    }

    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap().clone()
    }
}

impl Default for MockTypeResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeResolver for MockTypeResolver {
    fn resolve(&self, type_name: &str) -> Option<Resolution> {
        self.asked.lock().unwrap().push(type_name.to_string());
        self.answers.get(type_name).cloned()
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Resolver wrapper so a test can keep a handle on the mock after handing it to a builder.
pub struct SharedResolver(pub std::sync::Arc<MockTypeResolver>);

impl TypeResolver for SharedResolver {
    fn resolve(&self, type_name: &str) -> Option<Resolution> {
        self.0.resolve(type_name)
    }

    fn name(&self) -> &str {
        self.0.name()
    }
}

/// ScanSource returning a fixed index, or failing when empty.
pub struct MockScanSource {
    scan: Option<ScanIndex>,
}

impl MockScanSource {
    pub fn new(scan: ScanIndex) -> Self {
        Self { scan: Some(scan) }
    }

    pub fn failing() -> Self {
        Self { scan: None }
    }
}

impl ScanSource for MockScanSource {
    fn load(&self) -> Result<ScanIndex> {
        self.scan
            .clone()
            .ok_or_else(|| anyhow!("scan unavailable"))
    }
}
