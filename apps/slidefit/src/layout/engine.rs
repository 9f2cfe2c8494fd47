//! Text-fitting engine — word-wrap simulation and font-size binary search.
//!
//! # Units
//! Font sizes are integer points, box dimensions are inches, and all width
//! comparisons happen in pixels (96 DPI, 96/72 px per pt).
//!
//! # Monotonicity
//! `fit_font_to_box` binary-searches the size range and is only sound if the
//! wrapped height never decreases as the font size grows. The greedy wrap below
//! satisfies this whenever the metrics backend scales linearly with pixel size:
//! a larger size is the same layout problem with a proportionally narrower line
//! budget, and greedy line count never drops when the budget shrinks. Debug
//! builds assert the property over every probed size.
//!
//! # Caching
//! Word widths, wrapped heights and fit results are memoized per engine
//! instance, keyed by the full parameter tuple (font family included). Nothing
//! is evicted; `clear_caches` resets everything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::layout::font_metrics::{inches_to_px, pt_to_px, FontStyle, GlyphMetricsProvider, DPI};

// ────────────────────────────────────────────────────────────────────────────
// Request / result types
// ────────────────────────────────────────────────────────────────────────────

/// Parameters for a single fit.
///
/// `box_height_in = None` requests a one-line fit (shrink, never wrap).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FitRequest<'a> {
    pub text: &'a str,
    pub family: &'a str,
    pub box_width_in: f32,
    pub box_height_in: Option<f32>,
    pub start_pt: u32,
    pub min_pt: u32,
    pub line_spacing: f32,
    pub style: FontStyle,
}

/// Outcome of a fit. Always within `[min_pt, start_pt]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub size_pt: u32,
    /// Wrapped height at `size_pt`; `None` for one-line fits.
    pub wrapped_height_in: Option<f32>,
    /// False when even `min_pt` overflows the box (result is best effort).
    pub fits: bool,
}

/// Precondition violations reported before any search runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FitError {
    #[error("box width must be a positive number of inches, got {0}")]
    InvalidBoxWidth(f32),

    #[error("box height must be a non-negative number of inches, got {0}")]
    InvalidBoxHeight(f32),

    #[error("box fit requires a box height")]
    MissingBoxHeight,

    #[error("minimum size {min_pt}pt exceeds start size {start_pt}pt")]
    InvertedSizeRange { min_pt: u32, start_pt: u32 },

    #[error("minimum size must be at least 1pt")]
    ZeroMinSize,

    #[error("line spacing must be positive, got {0}")]
    InvalidLineSpacing(f32),
}

/// Entry counts and hit/miss counters across all three caches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheStats {
    pub word_entries: usize,
    pub height_entries: usize,
    pub fit_entries: usize,
    pub hits: u64,
    pub misses: u64,
}

// ────────────────────────────────────────────────────────────────────────────
// Cache keys (floats keyed by bit pattern)
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct WordKey {
    token: String,
    px_bits: u32,
    family: String,
    style: FontStyle,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct HeightKey {
    text: String,
    pt: u32,
    box_width_bits: u32,
    spacing_bits: u32,
    family: String,
    style: FontStyle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum FitKind {
    Box,
    OneLine,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct FitKey {
    kind: FitKind,
    text: String,
    family: String,
    box_width_bits: u32,
    box_height_bits: Option<u32>,
    start_pt: u32,
    min_pt: u32,
    spacing_bits: u32,
    style: FontStyle,
}

impl FitKey {
    fn new(kind: FitKind, req: &FitRequest) -> Self {
        FitKey {
            kind,
            text: req.text.to_string(),
            family: req.family.to_string(),
            box_width_bits: req.box_width_in.to_bits(),
            box_height_bits: match kind {
                FitKind::Box => req.box_height_in.map(f32::to_bits),
                FitKind::OneLine => None,
            },
            start_pt: req.start_pt,
            min_pt: req.min_pt,
            // Spacing has no effect on a one-line fit.
            spacing_bits: match kind {
                FitKind::Box => req.line_spacing.to_bits(),
                FitKind::OneLine => 0,
            },
            style: req.style,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Engine
// ────────────────────────────────────────────────────────────────────────────

/// Owns a metrics backend and the memo tables built on top of it.
pub struct TextFitEngine<M> {
    metrics: M,
    word_widths: HashMap<WordKey, f32>,
    wrapped_heights: HashMap<HeightKey, f32>,
    font_fits: HashMap<FitKey, FitResult>,
    hits: u64,
    misses: u64,
}

impl<M: GlyphMetricsProvider> TextFitEngine<M> {
    pub fn new(metrics: M) -> Self {
        Self {
            metrics,
            word_widths: HashMap::new(),
            wrapped_heights: HashMap::new(),
            font_fits: HashMap::new(),
            hits: 0,
            misses: 0,
        }
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    pub fn cache_stats(&self) -> CacheStats {
        CacheStats {
            word_entries: self.word_widths.len(),
            height_entries: self.wrapped_heights.len(),
            fit_entries: self.font_fits.len(),
            hits: self.hits,
            misses: self.misses,
        }
    }

    pub fn clear_caches(&mut self) {
        self.word_widths.clear();
        self.wrapped_heights.clear();
        self.font_fits.clear();
        self.hits = 0;
        self.misses = 0;
    }

    /// Pixel width of `token` at `px_size`, memoized.
    pub fn measure_width(&mut self, token: &str, px_size: f32, family: &str, style: FontStyle) -> f32 {
        let key = WordKey {
            token: token.to_string(),
            px_bits: px_size.to_bits(),
            family: family.to_string(),
            style,
        };
        if let Some(&width) = self.word_widths.get(&key) {
            self.hits += 1;
            return width;
        }
        self.misses += 1;
        let width = self.metrics.text_width(token, px_size, family, style);
        self.word_widths.insert(key, width);
        width
    }

    /// Greedy word-wrap at `pt` into a box `box_width_in` wide.
    ///
    /// Returns the tokens of each line. Every `\n` starts a paragraph; an empty
    /// paragraph is one blank line, a whitespace-only one adds no line. A token
    /// wider than the box sits alone on its line and is never split. Empty text
    /// has no lines.
    pub fn wrap_lines<'t>(
        &mut self,
        text: &'t str,
        pt: u32,
        family: &str,
        box_width_in: f32,
        style: FontStyle,
    ) -> Vec<Vec<&'t str>> {
        if text.is_empty() {
            return Vec::new();
        }

        let px = pt_to_px(pt);
        let max_px = inches_to_px(box_width_in);
        let space_w = self.measure_width(" ", px, family, style);
        let mut lines: Vec<Vec<&'t str>> = Vec::new();

        for paragraph in text.split('\n') {
            if paragraph.is_empty() {
                lines.push(Vec::new());
                continue;
            }
            let mut current: Vec<&'t str> = Vec::new();
            let mut current_width = 0.0_f32;

            for word in paragraph.split_whitespace() {
                let word_w = self.measure_width(word, px, family, style);
                if current.is_empty() {
                    current_width = word_w;
                } else if current_width + space_w + word_w <= max_px {
                    current_width += space_w + word_w;
                } else {
                    lines.push(std::mem::take(&mut current));
                    current_width = word_w;
                }
                current.push(word);
            }
            if !current.is_empty() {
                lines.push(current);
            }
        }
        lines
    }

    /// Number of lines `wrap_lines` produces.
    pub fn count_lines(
        &mut self,
        text: &str,
        pt: u32,
        family: &str,
        box_width_in: f32,
        style: FontStyle,
    ) -> usize {
        self.wrap_lines(text, pt, family, box_width_in, style).len()
    }

    /// Height in inches of `text` wrapped at `pt` with the given line spacing.
    pub fn compute_wrapped_height(
        &mut self,
        text: &str,
        pt: u32,
        family: &str,
        box_width_in: f32,
        line_spacing: f32,
        style: FontStyle,
    ) -> f32 {
        let key = HeightKey {
            text: text.to_string(),
            pt,
            box_width_bits: box_width_in.to_bits(),
            spacing_bits: line_spacing.to_bits(),
            family: family.to_string(),
            style,
        };
        if let Some(&height) = self.wrapped_heights.get(&key) {
            self.hits += 1;
            return height;
        }
        self.misses += 1;

        let height = if text.is_empty() {
            0.0
        } else {
            let lines = self.count_lines(text, pt, family, box_width_in, style);
            lines as f32 * (pt_to_px(pt) * line_spacing) / DPI
        };
        self.wrapped_heights.insert(key, height);
        height
    }

    /// Dispatches to a box fit or a one-line fit depending on `box_height_in`.
    pub fn fit(&mut self, req: &FitRequest) -> Result<FitResult, FitError> {
        match req.box_height_in {
            Some(_) => self.fit_font_to_box(req),
            None => self.fit_font_to_line_width(req),
        }
    }

    /// Largest size in `[min_pt, start_pt]` whose wrapped height fits the box.
    ///
    /// Falls back to `min_pt` (with `fits == false`) when nothing fits.
    pub fn fit_font_to_box(&mut self, req: &FitRequest) -> Result<FitResult, FitError> {
        validate(req)?;
        let box_height_in = match req.box_height_in {
            Some(h) if h.is_finite() && h >= 0.0 => h,
            Some(h) => return Err(FitError::InvalidBoxHeight(h)),
            None => return Err(FitError::MissingBoxHeight),
        };
        if !(req.line_spacing.is_finite() && req.line_spacing > 0.0) {
            return Err(FitError::InvalidLineSpacing(req.line_spacing));
        }

        let key = FitKey::new(FitKind::Box, req);
        if let Some(&cached) = self.font_fits.get(&key) {
            self.hits += 1;
            return Ok(cached);
        }
        self.misses += 1;

        let height_at = |engine: &mut Self, pt: u32| {
            engine.compute_wrapped_height(
                req.text,
                pt,
                req.family,
                req.box_width_in,
                req.line_spacing,
                req.style,
            )
        };

        let floor_height = height_at(self, req.min_pt);
        let mut best = FitResult {
            size_pt: req.min_pt,
            wrapped_height_in: Some(floor_height),
            fits: floor_height <= box_height_in,
        };
        let mut probes = vec![(req.min_pt, floor_height)];

        let (mut lo, mut hi) = (req.min_pt, req.start_pt);
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let height = height_at(self, mid);
            probes.push((mid, height));
            if height <= box_height_in {
                best = FitResult {
                    size_pt: mid,
                    wrapped_height_in: Some(height),
                    fits: true,
                };
                match mid.checked_add(1) {
                    Some(next) => lo = next,
                    None => break,
                }
            } else {
                // mid >= min_pt >= 1
                hi = mid - 1;
            }
        }
        debug_assert_monotonic(&mut probes);

        debug!(
            size_pt = best.size_pt,
            height_in = ?best.wrapped_height_in,
            fits = best.fits,
            "box fit"
        );
        self.font_fits.insert(key, best);
        Ok(best)
    }

    /// Largest size in `[min_pt, start_pt]` at which `text` fits the box width
    /// on a single, unwrapped line.
    pub fn fit_font_to_line_width(&mut self, req: &FitRequest) -> Result<FitResult, FitError> {
        validate(req)?;

        let key = FitKey::new(FitKind::OneLine, req);
        if let Some(&cached) = self.font_fits.get(&key) {
            self.hits += 1;
            return Ok(cached);
        }
        self.misses += 1;

        let max_px = inches_to_px(req.box_width_in);
        let mut best = FitResult {
            size_pt: req.min_pt,
            wrapped_height_in: None,
            fits: false,
        };

        let (mut lo, mut hi) = (req.min_pt, req.start_pt);
        while lo <= hi {
            let mid = lo + (hi - lo) / 2;
            let width = self.measure_width(req.text, pt_to_px(mid), req.family, req.style);
            if width <= max_px {
                best = FitResult {
                    size_pt: mid,
                    wrapped_height_in: None,
                    fits: true,
                };
                match mid.checked_add(1) {
                    Some(next) => lo = next,
                    None => break,
                }
            } else {
                hi = mid - 1;
            }
        }

        debug!(size_pt = best.size_pt, fits = best.fits, "one-line fit");
        self.font_fits.insert(key, best);
        Ok(best)
    }
}

fn validate(req: &FitRequest) -> Result<(), FitError> {
    if !(req.box_width_in.is_finite() && req.box_width_in > 0.0) {
        return Err(FitError::InvalidBoxWidth(req.box_width_in));
    }
    if req.min_pt == 0 {
        return Err(FitError::ZeroMinSize);
    }
    if req.min_pt > req.start_pt {
        return Err(FitError::InvertedSizeRange {
            min_pt: req.min_pt,
            start_pt: req.start_pt,
        });
    }
    Ok(())
}

fn debug_assert_monotonic(probes: &mut [(u32, f32)]) {
    if cfg!(debug_assertions) {
        probes.sort_by_key(|&(pt, _)| pt);
        for pair in probes.windows(2) {
            debug_assert!(
                pair[0].1 <= pair[1].1,
                "wrapped height shrank from {}pt ({}in) to {}pt ({}in)",
                pair[0].0,
                pair[0].1,
                pair[1].0,
                pair[1].1
            );
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::font_metrics::{MonospaceMetrics, TableMetrics};
    use proptest::prelude::*;

    /// 0.75em advance: every character is 10px wide at 10pt (13.33px × 0.75).
    fn mono() -> TextFitEngine<MonospaceMetrics> {
        TextFitEngine::new(MonospaceMetrics::new(0.75))
    }

    fn box_request(text: &str, width_in: f32, height_in: f32, start: u32, min: u32) -> FitRequest<'_> {
        FitRequest {
            text,
            family: "Calibri",
            box_width_in: width_in,
            box_height_in: Some(height_in),
            start_pt: start,
            min_pt: min,
            line_spacing: 1.2,
            style: FontStyle::REGULAR,
        }
    }

    #[test]
    fn test_empty_text_has_zero_height() {
        let mut engine = mono();
        for pt in [8, 20, 72] {
            assert_eq!(
                engine.compute_wrapped_height("", pt, "Arial", 3.0, 1.2, FontStyle::BOLD),
                0.0
            );
        }
        assert!(engine.wrap_lines("", 20, "Arial", 3.0, FontStyle::REGULAR).is_empty());
    }

    #[test]
    fn test_single_line_height() {
        let mut engine = mono();
        // 72pt = 96px; one line at 1.0 spacing is exactly one inch.
        let h = engine.compute_wrapped_height("Om", 72, "Calibri", 10.0, 1.0, FontStyle::REGULAR);
        assert!((h - 1.0).abs() < 1e-5, "expected 1in, got {h}");
    }

    #[test]
    fn test_blank_line_is_preserved() {
        let mut engine = mono();
        let lines = engine.wrap_lines("A\n\nB", 10, "Calibri", 5.0, FontStyle::REGULAR);
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
    }

    #[test]
    fn test_whitespace_only_text_does_not_panic() {
        let mut engine = mono();
        assert_eq!(engine.count_lines("   ", 20, "Calibri", 2.0, FontStyle::REGULAR), 0);
        assert_eq!(
            engine.compute_wrapped_height("  \t ", 20, "Calibri", 2.0, 1.2, FontStyle::REGULAR),
            0.0
        );
        assert_eq!(engine.count_lines("\n\n", 20, "Calibri", 2.0, FontStyle::REGULAR), 3);
    }

    #[test]
    fn test_whitespace_only_paragraph_adds_no_line() {
        let mut engine = mono();
        let lines = engine.wrap_lines("A\n   \nB", 10, "Calibri", 5.0, FontStyle::REGULAR);
        assert_eq!(lines, vec![vec!["A"], vec!["B"]]);
        // A truly empty paragraph still counts.
        assert_eq!(engine.count_lines("A\n\nB", 10, "Calibri", 5.0, FontStyle::REGULAR), 3);
    }

    #[test]
    fn test_overlong_token_is_never_split() {
        let mut engine = mono();
        let token = "x".repeat(400);
        for pt in [8, 24, 60] {
            assert_eq!(engine.count_lines(&token, pt, "Calibri", 1.0, FontStyle::REGULAR), 1);
        }
    }

    #[test]
    fn test_greedy_wrap_breaks_before_overflowing_word() {
        let mut engine = mono();
        // At 10pt each char is 10px; box is 96px wide.
        // "aaa bbb" = 70px fits, "aaa bbb ccc" = 110px does not.
        let lines = engine.wrap_lines("aaa bbb ccc", 10, "Calibri", 1.0, FontStyle::REGULAR);
        assert_eq!(lines, vec![vec!["aaa", "bbb"], vec!["ccc"]]);
    }

    #[test]
    fn test_runs_of_whitespace_collapse() {
        let mut engine = mono();
        let lines = engine.wrap_lines("  Sai \t  Ram  ", 10, "Calibri", 5.0, FontStyle::REGULAR);
        assert_eq!(lines, vec![vec!["Sai", "Ram"]]);
    }

    #[test]
    fn test_word_cache_key_includes_family() {
        let mut engine = TextFitEngine::new(TableMetrics::default());
        let calibri = engine.measure_width("Sai", 20.0, "Calibri", FontStyle::REGULAR);
        let arial = engine.measure_width("Sai", 20.0, "Arial", FontStyle::REGULAR);
        assert_ne!(calibri, arial);
        assert_eq!(engine.cache_stats().word_entries, 2);
    }

    #[test]
    fn test_one_line_fit_om_sai_ram() {
        let mut engine = mono();
        // "Om Sai Ram" = 10 chars. At pt, width = 10 × 0.75 × pt × 4/3 = 10·pt px.
        // Box 205px → largest pt with 10·pt ≤ 205 is 20.
        let req = FitRequest {
            text: "Om Sai Ram",
            family: "Calibri",
            box_width_in: 205.0 / DPI,
            box_height_in: None,
            start_pt: 40,
            min_pt: 8,
            line_spacing: 1.0,
            style: FontStyle::BOLD,
        };
        let first = engine.fit(&req).unwrap();
        assert_eq!(first.size_pt, 20);
        assert!(first.fits);
        assert_eq!(first.wrapped_height_in, None);
        let second = engine.fit(&req).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_one_line_fit_uses_start_when_text_is_short() {
        let mut engine = mono();
        let req = FitRequest {
            box_height_in: None,
            ..box_request("Om", 10.0, 0.0, 58, 32)
        };
        assert_eq!(engine.fit_font_to_line_width(&req).unwrap().size_pt, 58);
    }

    #[test]
    fn test_one_line_fit_returns_min_when_nothing_fits() {
        let mut engine = mono();
        let long = "Sai ".repeat(100);
        let req = FitRequest {
            box_height_in: None,
            ..box_request(&long, 2.0, 0.0, 40, 22)
        };
        let result = engine.fit_font_to_line_width(&req).unwrap();
        assert_eq!(result.size_pt, 22);
        assert!(!result.fits);
    }

    #[test]
    fn test_box_fit_picks_largest_fitting_size() {
        let mut engine = mono();
        // One line of text, 1.0 spacing, box 0.51in tall → pt ≤ 36.72.
        let mut req = box_request("Om", 10.0, 0.51, 60, 10);
        req.line_spacing = 1.0;
        let result = engine.fit_font_to_box(&req).unwrap();
        assert_eq!(result.size_pt, 36);
        assert!(result.fits);
        assert!(result.wrapped_height_in.unwrap() <= 0.51);
    }

    #[test]
    fn test_box_fit_long_paragraph_returns_min_best_effort() {
        let mut engine = mono();
        // 500 characters, no newlines.
        let text = "abcd ".repeat(100);
        let min_pt = 14;
        // Box sized for exactly 3 lines at the minimum size.
        let line_h = pt_to_px(min_pt) * 1.2 / DPI;
        let req = box_request(&text, 2.0, 3.0 * line_h, 40, min_pt);
        let result = engine.fit_font_to_box(&req).unwrap();
        assert_eq!(result.size_pt, min_pt);
        assert!(!result.fits);
        assert!(result.wrapped_height_in.unwrap() > 3.0 * line_h);
    }

    #[test]
    fn test_box_fit_is_cached() {
        let mut engine = mono();
        let req = box_request("Sai Ram\nSai Ram", 3.0, 1.0, 40, 10);
        let first = engine.fit(&req).unwrap();
        let misses = engine.cache_stats().misses;
        let second = engine.fit(&req).unwrap();
        assert_eq!(first, second);
        assert_eq!(engine.cache_stats().misses, misses);
        assert_eq!(engine.cache_stats().fit_entries, 1);
    }

    #[test]
    fn test_box_and_line_fits_do_not_share_cache_entries() {
        let mut engine = mono();
        let boxed = box_request("Govinda Gopala", 1.0, 5.0, 40, 8);
        let one_line = FitRequest {
            box_height_in: None,
            ..boxed
        };
        let a = engine.fit(&boxed).unwrap();
        let b = engine.fit(&one_line).unwrap();
        assert!(a.wrapped_height_in.is_some());
        assert!(b.wrapped_height_in.is_none());
        assert_eq!(engine.cache_stats().fit_entries, 2);
    }

    #[test]
    fn test_empty_text_fits_at_start_size() {
        let mut engine = mono();
        let result = engine.fit(&box_request("", 10.0, 3.25, 34, 14)).unwrap();
        assert_eq!(result.size_pt, 34);
        assert_eq!(result.wrapped_height_in, Some(0.0));
    }

    #[test]
    fn test_search_at_top_of_size_range_terminates() {
        let mut engine = mono();
        let line = FitRequest {
            box_height_in: None,
            ..box_request("", 10.0, 1.0, u32::MAX, u32::MAX)
        };
        let result = engine.fit(&line).unwrap();
        assert_eq!(result.size_pt, u32::MAX);
        assert!(result.fits);

        let result = engine.fit(&box_request("", 10.0, 1.0, u32::MAX, u32::MAX - 3)).unwrap();
        assert_eq!(result.size_pt, u32::MAX);
        assert_eq!(result.wrapped_height_in, Some(0.0));
    }

    #[test]
    fn test_equal_start_and_min_is_allowed() {
        let mut engine = mono();
        let result = engine.fit(&box_request("Om", 10.0, 0.01, 20, 20)).unwrap();
        assert_eq!(result.size_pt, 20);
        assert!(!result.fits);
    }

    #[test]
    fn test_precondition_violations() {
        let mut engine = mono();
        assert_eq!(
            engine.fit(&box_request("Om", 0.0, 1.0, 40, 8)),
            Err(FitError::InvalidBoxWidth(0.0))
        );
        assert_eq!(
            engine.fit(&box_request("Om", 1.0, 1.0, 8, 40)),
            Err(FitError::InvertedSizeRange {
                min_pt: 40,
                start_pt: 8
            })
        );
        assert_eq!(
            engine.fit(&box_request("Om", 1.0, 1.0, 40, 0)),
            Err(FitError::ZeroMinSize)
        );
        assert_eq!(
            engine.fit(&box_request("Om", 1.0, -1.0, 40, 8)),
            Err(FitError::InvalidBoxHeight(-1.0))
        );
        let req = FitRequest {
            box_height_in: None,
            ..box_request("Om", 1.0, 1.0, 40, 8)
        };
        assert_eq!(engine.fit_font_to_box(&req), Err(FitError::MissingBoxHeight));
        let mut spaced = box_request("Om", 1.0, 1.0, 40, 8);
        spaced.line_spacing = 0.0;
        assert_eq!(engine.fit(&spaced), Err(FitError::InvalidLineSpacing(0.0)));
    }

    #[test]
    fn test_clear_caches_resets_everything() {
        let mut engine = mono();
        engine.fit(&box_request("Om Sai Ram", 2.0, 1.0, 40, 8)).unwrap();
        engine.clear_caches();
        assert_eq!(engine.cache_stats(), CacheStats::default());
    }

    fn lyric_text() -> impl Strategy<Value = String> {
        proptest::collection::vec(
            prop_oneof![
                4 => "[A-Za-z]{1,12}",
                1 => Just("\n".to_string()),
            ],
            0..60,
        )
        .prop_map(|tokens| tokens.join(" "))
    }

    proptest! {
        #[test]
        fn prop_wrapped_height_is_monotonic_in_size(
            text in lyric_text(),
            s1 in 6u32..80,
            delta in 1u32..40,
            width_in in 0.5f32..12.0,
        ) {
            let mut engine = TextFitEngine::new(TableMetrics::default());
            let s2 = s1 + delta;
            let h1 = engine.compute_wrapped_height(&text, s1, "Calibri", width_in, 1.22, FontStyle::REGULAR);
            let h2 = engine.compute_wrapped_height(&text, s2, "Calibri", width_in, 1.22, FontStyle::REGULAR);
            prop_assert!(h1 <= h2, "{s1}pt -> {h1}in, {s2}pt -> {h2}in");
        }

        #[test]
        fn prop_box_fit_stays_in_range_and_is_idempotent(
            text in lyric_text(),
            min_pt in 6u32..30,
            span in 0u32..40,
            width_in in 0.5f32..12.0,
            height_in in 0.0f32..6.0,
        ) {
            let mut engine = TextFitEngine::new(TableMetrics::default());
            let req = FitRequest {
                text: &text,
                family: "Calibri",
                box_width_in: width_in,
                box_height_in: Some(height_in),
                start_pt: min_pt + span,
                min_pt,
                line_spacing: 1.22,
                style: FontStyle::REGULAR,
            };
            let first = engine.fit(&req).unwrap();
            prop_assert!(first.size_pt >= min_pt && first.size_pt <= min_pt + span);
            if first.fits {
                prop_assert!(first.wrapped_height_in.unwrap() <= height_in);
            } else {
                prop_assert_eq!(first.size_pt, min_pt);
            }
            prop_assert_eq!(engine.fit(&req).unwrap(), first);
        }
    }
}
