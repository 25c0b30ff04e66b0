//! Scan index loading adapters

mod adapter;

pub use adapter::JsonScanAdapter;
