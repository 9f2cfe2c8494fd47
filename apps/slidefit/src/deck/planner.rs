//! Deck Planner — turns a worklist into a slide plan with fitted font sizes.
//!
//! # Architecture
//! - `DeckPlanner::plan` is the async entry point. It resolves every entry's
//!   lyrics against the catalog, counts slides up front, then lays out one slide
//!   at a time.
//! - All sizing goes through the planner's `TextFitEngine`: headers use a
//!   one-line fit, lyrics use a box fit, notes derive their size from the lyrics.
//! - Every `yield_every` slides the planner yields to the tokio scheduler.
//!
//! The plan is geometry only (inches, 10 × 5.625 slide); writing an actual
//! presentation file from it is the caller's business.
#![allow(dead_code)]

use std::collections::HashMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::deck::lyrics::{
    extract_trailing_note, format_verses, normalize_lyrics, part_header, split_page_breaks,
};
use crate::deck::worklist::{BhajanRow, Catalog, PrayerRow, Worklist, WorklistEntry};
use crate::errors::AppError;
use crate::layout::{CacheStats, FitRequest, FitResult, FontStyle, GlyphMetricsProvider, TextFitEngine};

// ────────────────────────────────────────────────────────────────────────────
// Slide layout
// ────────────────────────────────────────────────────────────────────────────

/// A positioned rectangle on the slide, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

/// Start/minimum point sizes for a fitted box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SizeRange {
    pub start_pt: u32,
    pub min_pt: u32,
}

/// Slide geometry, colours and size bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideLayout {
    pub font_face: String,
    pub slide_w: f32,
    pub slide_h: f32,

    pub title_pt: u32,
    pub subtitle_pt: u32,
    pub title_box_h: f32,
    pub subtitle_box_h: f32,
    /// Distance of the title/subtitle centres from the slide's vertical centre.
    pub center_offset: f32,

    pub header_top_y: f32,
    pub header_h: f32,
    pub bhajan_header: SizeRange,
    pub prayer_header: SizeRange,

    pub bhajan_lyrics: Rect,
    pub bhajan_lyrics_size: SizeRange,
    pub prayer_lyrics: Rect,
    pub prayer_lyrics_size: SizeRange,
    pub line_spacing: f32,

    pub note_min_pt: u32,
    /// Bhajan notes are this many points smaller than the lyrics.
    pub bhajan_note_drop_pt: u32,
    /// Prayer translations are this many points smaller than the lyrics.
    pub translation_drop_pt: u32,
    pub translation_gap: f32,
    pub translation_h: f32,

    pub footer_y: f32,
    pub next_pt: u32,

    pub title_color: String,
    pub subtitle_color: String,
    pub header_color: String,
    pub name_color: String,
    pub lyrics_color: String,
    pub note_color: String,
}

/// Returns the default 16:9 layout for the given face.
pub fn default_slide_layout(font_face: &str) -> SlideLayout {
    let slide_w = 10.0;
    let slide_h = 5.625;
    SlideLayout {
        font_face: font_face.to_string(),
        slide_w,
        slide_h,
        title_pt: 54,
        subtitle_pt: 32,
        title_box_h: 1.2,
        subtitle_box_h: 0.9,
        center_offset: 0.75,
        header_top_y: 0.24,
        header_h: 0.9,
        bhajan_header: SizeRange {
            start_pt: 40,
            min_pt: 22,
        },
        prayer_header: SizeRange {
            start_pt: 58,
            min_pt: 32,
        },
        bhajan_lyrics: Rect {
            x: 0.0,
            y: 1.22,
            w: slide_w,
            h: 3.25,
        },
        bhajan_lyrics_size: SizeRange {
            start_pt: 34,
            min_pt: 14,
        },
        prayer_lyrics: Rect {
            x: 0.0,
            y: 1.18,
            w: slide_w,
            h: 2.70,
        },
        prayer_lyrics_size: SizeRange {
            start_pt: 42,
            min_pt: 16,
        },
        line_spacing: 1.22,
        note_min_pt: 14,
        bhajan_note_drop_pt: 6,
        translation_drop_pt: 14,
        translation_gap: 0.18,
        translation_h: 1.05,
        footer_y: slide_h - 0.60,
        next_pt: 16,
        title_color: "FFFFFF".to_string(),
        subtitle_color: "FFFF00".to_string(),
        header_color: "FFFFFF".to_string(),
        name_color: "00B0F0".to_string(),
        lyrics_color: "FFFFFF".to_string(),
        note_color: "FFFFFF".to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Plan types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VAlign {
    Top,
    Middle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoxRole {
    Title,
    Subtitle,
    Header,
    Lyrics,
    Note,
    NextLabel,
    NextTitle,
    NextName,
}

/// A styled span inside a text box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub color: String,
    pub bold: bool,
    pub italic: bool,
}

/// A text box placed on a slide.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBox {
    pub role: BoxRole,
    pub rect: Rect,
    pub font_face: String,
    pub font_size_pt: u32,
    pub align: Align,
    pub valign: VAlign,
    pub wrap: bool,
    pub runs: Vec<TextRun>,
    /// Wrapped line count at `font_size_pt` (fitted boxes only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    /// False when the text overflows even at the minimum size.
    pub fits: bool,
}

impl TextBox {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SlideKind {
    Title,
    Bhajan { id: String },
    Prayer { id: String, part: usize, parts: usize },
    Break,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slide {
    pub index: usize,
    #[serde(flatten)]
    pub kind: SlideKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    pub boxes: Vec<TextBox>,
}

impl Slide {
    pub fn boxes_with_role(&self, role: BoxRole) -> impl Iterator<Item = &TextBox> {
        self.boxes.iter().filter(move |b| b.role == role)
    }

    pub fn has_next_footer(&self) -> bool {
        self.boxes.iter().any(|b| b.role == BoxRole::NextLabel)
    }
}

/// The complete plan for one session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    pub title: String,
    pub subtitle: String,
    /// Session date the plan was made for.
    pub date: NaiveDate,
    pub font_face: String,
    pub total_slides: usize,
    /// Boxes whose text overflows at the minimum size.
    pub overflow_count: usize,
    pub slides: Vec<Slide>,
    pub cache: CacheStats,
}

// ────────────────────────────────────────────────────────────────────────────
// Backgrounds
// ────────────────────────────────────────────────────────────────────────────

/// Image 1 is reserved for the title slide; the others rotate.
#[derive(Debug, Clone, Default)]
pub struct BackgroundCycle {
    images: Vec<String>,
    next: usize,
}

impl BackgroundCycle {
    pub fn new(images: Vec<String>) -> Self {
        Self { images, next: 0 }
    }

    /// `images/bhajan1.png` … `images/bhajan{count}.png`.
    pub fn numbered(count: usize) -> Self {
        Self::new(
            (1..=count)
                .map(|i| format!("images/bhajan{i}.png"))
                .collect(),
        )
    }

    pub fn pick(&mut self, is_title: bool) -> Option<String> {
        match self.images.len() {
            0 => None,
            1 => Some(self.images[0].clone()),
            _ if is_title => Some(self.images[0].clone()),
            n => {
                let idx = 1 + self.next % (n - 1);
                self.next += 1;
                Some(self.images[idx].clone())
            }
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Planner
// ────────────────────────────────────────────────────────────────────────────

pub const DEFAULT_DECK_TITLE: &str = "Central London Sai Centre";
pub const DEFAULT_YIELD_EVERY: usize = 8;

/// Footer target: the next non-break entry.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NextInfo {
    title: String,
    name: String,
}

/// An entry with its lyrics resolved against the catalog.
enum Resolved<'w> {
    Bhajan {
        row: &'w BhajanRow,
        lyrics: String,
    },
    Prayer {
        row: &'w PrayerRow,
        parts: Vec<String>,
        translation: String,
    },
    Break,
}

impl Resolved<'_> {
    fn slide_count(&self) -> usize {
        match self {
            Resolved::Prayer { parts, .. } => parts.len(),
            _ => 1,
        }
    }
}

pub struct DeckPlanner<M> {
    engine: TextFitEngine<M>,
    layout: SlideLayout,
    backgrounds: BackgroundCycle,
    /// Prayer id → per-slide segments.
    prayer_segments: HashMap<String, Vec<String>>,
    yield_every: usize,
}

impl<M: GlyphMetricsProvider> DeckPlanner<M> {
    pub fn new(engine: TextFitEngine<M>, layout: SlideLayout) -> Self {
        Self {
            engine,
            layout,
            backgrounds: BackgroundCycle::default(),
            prayer_segments: HashMap::new(),
            yield_every: DEFAULT_YIELD_EVERY,
        }
    }

    pub fn with_backgrounds(mut self, backgrounds: BackgroundCycle) -> Self {
        self.backgrounds = backgrounds;
        self
    }

    /// Zero disables yielding.
    pub fn with_yield_every(mut self, yield_every: usize) -> Self {
        self.yield_every = yield_every;
        self
    }

    pub fn engine(&self) -> &TextFitEngine<M> {
        &self.engine
    }

    pub fn layout(&self) -> &SlideLayout {
        &self.layout
    }

    /// Plans the full deck: title slide, then every worklist entry in order.
    ///
    /// Explicit `title`/`subtitle` win over the worklist's own values; the
    /// defaults are the centre name and today's date.
    pub async fn plan(
        &mut self,
        worklist: &Worklist,
        catalog: &Catalog,
        title: Option<&str>,
        subtitle: Option<&str>,
        today: NaiveDate,
    ) -> Result<Deck, AppError> {
        let title = pick_text(&[title, worklist.title.as_deref()])
            .unwrap_or(DEFAULT_DECK_TITLE)
            .to_string();
        let subtitle = pick_text(&[subtitle, worklist.subtitle.as_deref()])
            .map(str::to_string)
            .unwrap_or_else(|| format_long_date(today));

        let resolved: Vec<Resolved> = worklist
            .entries
            .iter()
            .map(|entry| self.resolve(entry, catalog))
            .collect();
        let total_slides = 1 + resolved.iter().map(Resolved::slide_count).sum::<usize>();
        info!(
            entries = worklist.entries.len(),
            total_slides, "Planning deck '{title}'"
        );

        let mut slides: Vec<Slide> = Vec::with_capacity(total_slides);
        slides.push(self.title_slide(&title, &subtitle));
        let mut since_yield = 0usize;

        for (i, entry) in resolved.iter().enumerate() {
            let next = next_info(&worklist.entries, i);
            let produced = match entry {
                Resolved::Break => vec![self.break_slide(slides.len(), next.as_ref())],
                Resolved::Bhajan { row, lyrics } => {
                    vec![self.bhajan_slide(slides.len(), row, lyrics, next.as_ref())?]
                }
                Resolved::Prayer {
                    row,
                    parts,
                    translation,
                } => self.prayer_slides(slides.len(), row, parts, translation, next.as_ref())?,
            };

            for slide in produced {
                debug!(slide = slide.index + 1, total_slides, "Slide planned");
                slides.push(slide);
                since_yield += 1;
                if self.yield_every > 0 && since_yield >= self.yield_every {
                    since_yield = 0;
                    tokio::task::yield_now().await;
                }
            }
        }

        let overflow_count = slides
            .iter()
            .flat_map(|s| s.boxes.iter())
            .filter(|b| !b.fits)
            .count();
        if overflow_count > 0 {
            warn!(
                overflow = overflow_count,
                "Deck planned with text overflowing at minimum size"
            );
        }

        let cache = self.engine.cache_stats();
        info!(
            slides = slides.len(),
            cache_hits = cache.hits,
            cache_misses = cache.misses,
            "Deck planned"
        );

        Ok(Deck {
            title,
            subtitle,
            date: today,
            font_face: self.layout.font_face.clone(),
            total_slides,
            overflow_count,
            slides,
            cache,
        })
    }

    // ── Entry resolution ────────────────────────────────────────────────────

    fn resolve<'w>(&mut self, entry: &'w WorklistEntry, catalog: &Catalog) -> Resolved<'w> {
        match entry {
            WorklistEntry::Break => Resolved::Break,
            WorklistEntry::Bhajan(row) => {
                let mut lyrics = normalize_lyrics(&row.lyrics);
                let numeric_id = !row.id.is_empty() && row.id.chars().all(|c| c.is_ascii_digit());
                if lyrics.is_empty() && numeric_id && row.id != "0" {
                    if let Some(found) = catalog.find_bhajan(&row.id) {
                        lyrics = normalize_lyrics(&found.lyrics);
                    }
                }
                Resolved::Bhajan { row, lyrics }
            }
            WorklistEntry::Prayer(row) => {
                let canonical = catalog.find_prayer(&row.id);
                let translation = canonical.map(|p| p.translation().to_string()).unwrap_or_default();
                let parts = self
                    .prayer_segments
                    .entry(row.id.clone())
                    .or_insert_with(|| {
                        let lyrics = canonical.map_or(row.lyrics.as_str(), |p| p.lyrics.as_str());
                        split_page_breaks(&normalize_lyrics(lyrics))
                    })
                    .clone();
                Resolved::Prayer {
                    row,
                    parts,
                    translation,
                }
            }
        }
    }

    // ── Slide builders ──────────────────────────────────────────────────────

    fn title_slide(&mut self, title: &str, subtitle: &str) -> Slide {
        let l = &self.layout;
        let center_y = l.slide_h / 2.0;
        let title_y = center_y - l.center_offset - l.title_box_h / 2.0;
        let subtitle_y = center_y + l.center_offset - l.subtitle_box_h / 2.0;

        let boxes = vec![
            self.fixed_box(
                BoxRole::Title,
                Rect {
                    x: 0.0,
                    y: title_y,
                    w: l.slide_w,
                    h: l.title_box_h,
                },
                l.title_pt,
                Align::Center,
                VAlign::Middle,
                vec![run(title, &l.title_color, FontStyle::BOLD)],
            ),
            self.fixed_box(
                BoxRole::Subtitle,
                Rect {
                    x: 0.0,
                    y: subtitle_y,
                    w: l.slide_w,
                    h: l.subtitle_box_h,
                },
                l.subtitle_pt,
                Align::Center,
                VAlign::Middle,
                vec![run(subtitle, &l.subtitle_color, FontStyle::REGULAR)],
            ),
        ];

        Slide {
            index: 0,
            kind: SlideKind::Title,
            background: self.backgrounds.pick(true),
            boxes,
        }
    }

    fn break_slide(&mut self, index: usize, next: Option<&NextInfo>) -> Slide {
        let mut boxes = Vec::new();
        if let Some(next) = next {
            boxes.extend(self.next_footer(next));
        }
        Slide {
            index,
            kind: SlideKind::Break,
            background: self.backgrounds.pick(false),
            boxes,
        }
    }

    fn bhajan_slide(
        &mut self,
        index: usize,
        row: &BhajanRow,
        lyrics: &str,
        next: Option<&NextInfo>,
    ) -> Result<Slide, AppError> {
        let background = self.backgrounds.pick(false);
        let l = self.layout.clone();

        let header_runs = bhajan_header_runs(row, &l);
        let header_text: String = header_runs.iter().map(|r| r.text.as_str()).collect();
        let header_fit = self.fit_one_line(&header_text, l.slide_w, l.bhajan_header, FontStyle::BOLD)?;
        let mut boxes = vec![TextBox {
            role: BoxRole::Header,
            rect: Rect {
                x: 0.0,
                y: l.header_top_y,
                w: l.slide_w,
                h: l.header_h,
            },
            font_face: l.font_face.clone(),
            font_size_pt: header_fit.size_pt,
            align: Align::Center,
            valign: VAlign::Top,
            wrap: false,
            runs: header_runs,
            line_count: Some(1),
            fits: header_fit.fits,
        }];

        let split = extract_trailing_note(lyrics);
        let main = format_verses(&split.main);
        let lyrics_box = self.fitted_lyrics_box(&main, l.bhajan_lyrics, l.bhajan_lyrics_size)?;
        let lyrics_pt = lyrics_box.font_size_pt;
        boxes.push(lyrics_box);

        if !split.note.is_empty() {
            let lyrics_bottom = l.bhajan_lyrics.y + l.bhajan_lyrics.h;
            let note_y = (l.footer_y - 0.9).min(lyrics_bottom + 0.25);
            let avail_h = ((l.footer_y - 0.22) - note_y).max(0.6);
            let note_pt = l.note_min_pt.max(lyrics_pt.saturating_sub(l.bhajan_note_drop_pt));
            boxes.push(self.fixed_box(
                BoxRole::Note,
                Rect {
                    x: l.bhajan_lyrics.x,
                    y: note_y,
                    w: l.bhajan_lyrics.w,
                    h: avail_h,
                },
                note_pt,
                Align::Center,
                VAlign::Top,
                vec![run(&format!("({})", split.note), &l.note_color, FontStyle::ITALIC)],
            ));
        }

        if let Some(next) = next {
            boxes.extend(self.next_footer(next));
        }

        Ok(Slide {
            index,
            kind: SlideKind::Bhajan { id: row.id.clone() },
            background,
            boxes,
        })
    }

    fn prayer_slides(
        &mut self,
        first_index: usize,
        row: &PrayerRow,
        parts: &[String],
        translation: &str,
        next: Option<&NextInfo>,
    ) -> Result<Vec<Slide>, AppError> {
        let l = self.layout.clone();
        let mut slides = Vec::with_capacity(parts.len());

        for (p, segment) in parts.iter().enumerate() {
            let background = self.backgrounds.pick(false);
            let last = p == parts.len() - 1;
            let mut boxes = Vec::new();

            if !row.title.is_empty() {
                let header_text = part_header(&row.title, p, parts.len());
                let fit = self.fit_one_line(&header_text, l.slide_w, l.prayer_header, FontStyle::BOLD)?;
                boxes.push(TextBox {
                    role: BoxRole::Header,
                    rect: Rect {
                        x: 0.0,
                        y: l.header_top_y,
                        w: l.slide_w,
                        h: l.header_h,
                    },
                    font_face: l.font_face.clone(),
                    font_size_pt: fit.size_pt,
                    align: Align::Center,
                    valign: VAlign::Top,
                    wrap: false,
                    runs: vec![run(&header_text, &l.header_color, FontStyle::BOLD)],
                    line_count: Some(1),
                    fits: fit.fits,
                });
            }

            let lyrics_box = self.fitted_lyrics_box(segment, l.prayer_lyrics, l.prayer_lyrics_size)?;
            let lyrics_pt = lyrics_box.font_size_pt;
            boxes.push(lyrics_box);

            if last && !translation.is_empty() {
                let pt = l.note_min_pt.max(lyrics_pt.saturating_sub(l.translation_drop_pt));
                boxes.push(self.fixed_box(
                    BoxRole::Note,
                    Rect {
                        x: l.prayer_lyrics.x,
                        y: l.prayer_lyrics.y + l.prayer_lyrics.h + l.translation_gap,
                        w: l.prayer_lyrics.w,
                        h: l.translation_h,
                    },
                    pt,
                    Align::Center,
                    VAlign::Top,
                    vec![run(&format!("({translation})"), &l.note_color, FontStyle::ITALIC)],
                ));
            }

            // Only the final part of a prayer announces what comes next.
            if last {
                if let Some(next) = next {
                    boxes.extend(self.next_footer(next));
                }
            }

            slides.push(Slide {
                index: first_index + p,
                kind: SlideKind::Prayer {
                    id: row.id.clone(),
                    part: p + 1,
                    parts: parts.len(),
                },
                background,
                boxes,
            });
        }
        Ok(slides)
    }

    fn next_footer(&self, next: &NextInfo) -> Vec<TextBox> {
        let l = &self.layout;
        let mut boxes = vec![self.fixed_box(
            BoxRole::NextLabel,
            Rect {
                x: 0.3,
                y: l.footer_y,
                w: 1.2,
                h: 0.4,
            },
            l.next_pt,
            Align::Left,
            VAlign::Top,
            vec![run("Next", &l.subtitle_color, FontStyle::REGULAR)],
        )];
        if !next.title.is_empty() {
            boxes.push(self.fixed_box(
                BoxRole::NextTitle,
                Rect {
                    x: l.slide_w / 2.0 - 2.2,
                    y: l.footer_y,
                    w: 4.4,
                    h: 0.4,
                },
                l.next_pt,
                Align::Center,
                VAlign::Top,
                vec![run(&next.title, &l.header_color, FontStyle::REGULAR)],
            ));
        }
        if !next.name.is_empty() {
            boxes.push(self.fixed_box(
                BoxRole::NextName,
                Rect {
                    x: l.slide_w - 2.3,
                    y: l.footer_y,
                    w: 2.0,
                    h: 0.4,
                },
                l.next_pt,
                Align::Right,
                VAlign::Top,
                vec![run(&next.name, &l.name_color, FontStyle::REGULAR)],
            ));
        }
        boxes
    }

    // ── Fitting helpers ─────────────────────────────────────────────────────

    fn fit_one_line(
        &mut self,
        text: &str,
        width_in: f32,
        range: SizeRange,
        style: FontStyle,
    ) -> Result<FitResult, AppError> {
        let req = FitRequest {
            text,
            family: &self.layout.font_face,
            box_width_in: width_in,
            box_height_in: None,
            start_pt: range.start_pt,
            min_pt: range.min_pt,
            line_spacing: self.layout.line_spacing,
            style,
        };
        Ok(self.engine.fit(&req)?)
    }

    fn fitted_lyrics_box(&mut self, text: &str, rect: Rect, range: SizeRange) -> Result<TextBox, AppError> {
        let req = FitRequest {
            text,
            family: &self.layout.font_face,
            box_width_in: rect.w,
            box_height_in: Some(rect.h),
            start_pt: range.start_pt,
            min_pt: range.min_pt,
            line_spacing: self.layout.line_spacing,
            style: FontStyle::REGULAR,
        };
        let fit = self.engine.fit(&req)?;
        let line_count =
            self.engine
                .count_lines(text, fit.size_pt, &self.layout.font_face, rect.w, FontStyle::REGULAR);
        if !fit.fits {
            warn!(
                size_pt = fit.size_pt,
                lines = line_count,
                "Lyrics overflow their box at the minimum size"
            );
        }
        Ok(TextBox {
            role: BoxRole::Lyrics,
            rect,
            font_face: self.layout.font_face.clone(),
            font_size_pt: fit.size_pt,
            align: Align::Center,
            valign: VAlign::Top,
            wrap: true,
            runs: vec![run(text, &self.layout.lyrics_color, FontStyle::REGULAR)],
            line_count: Some(line_count),
            fits: fit.fits,
        })
    }

    fn fixed_box(
        &self,
        role: BoxRole,
        rect: Rect,
        font_size_pt: u32,
        align: Align,
        valign: VAlign,
        runs: Vec<TextRun>,
    ) -> TextBox {
        TextBox {
            role,
            rect,
            font_face: self.layout.font_face.clone(),
            font_size_pt,
            align,
            valign,
            wrap: matches!(role, BoxRole::Note),
            runs,
            line_count: None,
            fits: true,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Free helpers
// ────────────────────────────────────────────────────────────────────────────

fn run(text: &str, color: &str, style: FontStyle) -> TextRun {
    TextRun {
        text: text.to_string(),
        color: color.to_string(),
        bold: style.bold,
        italic: style.italic,
    }
}

/// Header runs: title, singer (accent colour), "(gender)", key — space separated.
fn bhajan_header_runs(row: &BhajanRow, l: &SlideLayout) -> Vec<TextRun> {
    let parts: Vec<(String, &str)> = [
        (row.title.clone(), l.header_color.as_str()),
        (row.name.clone(), l.name_color.as_str()),
        (
            if row.gender.is_empty() {
                String::new()
            } else {
                format!("({})", row.gender)
            },
            l.header_color.as_str(),
        ),
        (row.key.clone(), l.header_color.as_str()),
    ]
    .into_iter()
    .filter(|(text, _)| !text.is_empty())
    .collect();

    if parts.is_empty() {
        return vec![run("", &l.header_color, FontStyle::REGULAR)];
    }
    let last = parts.len() - 1;
    parts
        .iter()
        .enumerate()
        .map(|(i, (text, color))| {
            let text = if i < last { format!("{text} ") } else { text.clone() };
            run(&text, color, FontStyle::BOLD)
        })
        .collect()
}

fn next_info(entries: &[WorklistEntry], current: usize) -> Option<NextInfo> {
    entries[current + 1..].iter().find_map(|e| {
        e.next_title().map(|title| NextInfo {
            title: title.to_string(),
            name: e.next_name().to_string(),
        })
    })
}

fn pick_text<'a>(candidates: &[Option<&'a str>]) -> Option<&'a str> {
    candidates
        .iter()
        .copied()
        .flatten()
        .map(str::trim)
        .find(|s| !s.is_empty())
}

/// "1st January 2026", "22nd March 2026", "13th May 2026".
pub fn format_long_date(date: NaiveDate) -> String {
    let day = date.day();
    let suffix = match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{day}{suffix} {}", date.format("%B %Y"))
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
