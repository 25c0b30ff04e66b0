use crate::domain::ports::ScanSource;
use crate::domain::scan::ScanIndex;
use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tracing::debug;

/// JSON scan index adapter
///
/// Reads one or more scan files produced by an external scanner and merges them, in the order
/// given, into a single index for one linking pass.
pub struct JsonScanAdapter {
    pub scan_paths: Vec<PathBuf>,
}

impl JsonScanAdapter {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            scan_paths: vec![path.as_ref().to_path_buf()],
        }
    }

    pub fn with_paths<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            scan_paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }
}

impl ScanSource for JsonScanAdapter {
    fn load(&self) -> Result<ScanIndex> {
        if self.scan_paths.is_empty() {
            bail!("No scan index files given");
        }

        let mut merged = ScanIndex::default();
        for path in &self.scan_paths {
            let part = load_scan_file(path)?;
            debug!(
                path = %path.display(),
                units = part.units.len(),
                types = part.type_count(),
                "scan file loaded"
            );
            merged.merge(part);
        }

        merged.project_root = strip_file_uri(&merged.project_root).to_string();
        Ok(merged)
    }
}

fn load_scan_file(path: &Path) -> Result<ScanIndex> {
    use memmap2::Mmap;
    use std::fs::File;

    let file = File::open(path)
        .with_context(|| format!("Failed to open scan index file: {}", path.display()))?;
    let mmap = unsafe { Mmap::map(&file).context("Failed to mmap scan index file")? };
    serde_json::from_slice(&mmap[..])
        .with_context(|| format!("Failed to parse scan index JSON: {}", path.display()))
}

/// Scanners commonly report the root as a `file://` URI.
fn strip_file_uri(root: &str) -> &str {
    root.strip_prefix("file://").unwrap_or(root)
}
