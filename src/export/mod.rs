//! Export format generators module.
//!
//! This module contains the Mermaid erDiagram exporter.

pub mod mermaid;

// Re-export for convenience
pub use mermaid::MermaidExporter;
