// Text fitting: glyph metrics backends and the wrap/fit engine.
// Everything here is synchronous and CPU-only; the deck planner decides when to yield.

pub mod engine;
pub mod font_metrics;

// Re-export the public API consumed by the deck planner and main.
pub use engine::{CacheStats, FitError, FitRequest, FitResult, TextFitEngine};
pub use font_metrics::{FontFamily, FontStyle, GlyphMetricsProvider, MonospaceMetrics, TableMetrics};
