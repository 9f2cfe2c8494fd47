//! Glyph metrics backends for the text-fitting engine.
//!
//! Character widths are in em units (relative to font size). Tables cover ASCII
//! 0x20..=0x7E (95 printable characters), index = (char as usize) - 32. Anything
//! outside that range (Devanagari, accented Latin, emoji) falls back to the table's
//! `average_char_width`. This is an approximation of what a real rasteriser reports,
//! but it is deterministic and scales linearly with the pixel size, which is what
//! the box-fit binary search relies on.
#![allow(dead_code)]

use serde::{Deserialize, Serialize};

/// Pixels per inch used for every inch/pixel conversion.
pub const DPI: f32 = 96.0;

/// Pixels per typographic point (96 / 72).
pub const PX_PER_PT: f32 = DPI / 72.0;

/// Converts an integer point size to a pixel size.
pub fn pt_to_px(pt: u32) -> f32 {
    pt as f32 * PX_PER_PT
}

/// Converts a length in inches to pixels.
pub fn inches_to_px(inches: f32) -> f32 {
    inches * DPI
}

// ────────────────────────────────────────────────────────────────────────────
// Style + provider trait
// ────────────────────────────────────────────────────────────────────────────

/// Bold / italic flags for a text run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FontStyle {
    #[serde(default)]
    pub bold: bool,
    #[serde(default)]
    pub italic: bool,
}

impl FontStyle {
    pub const REGULAR: FontStyle = FontStyle {
        bold: false,
        italic: false,
    };
    pub const BOLD: FontStyle = FontStyle {
        bold: true,
        italic: false,
    };
    pub const ITALIC: FontStyle = FontStyle {
        bold: false,
        italic: true,
    };
}

/// Measures the rendered pixel width of a string.
///
/// Implementations must be deterministic for fixed inputs; the engine caches
/// every answer for the lifetime of its caches. Widths should grow linearly
/// with `px_size`, otherwise the wrapped height of a text is not guaranteed to
/// be monotonic in font size and the box-fit search may settle on a size that
/// is not the largest fitting one.
pub trait GlyphMetricsProvider {
    fn text_width(&self, text: &str, px_size: f32, family: &str, style: FontStyle) -> f32;
}

impl<T: GlyphMetricsProvider + ?Sized> GlyphMetricsProvider for &T {
    fn text_width(&self, text: &str, px_size: f32, family: &str, style: FontStyle) -> f32 {
        (**self).text_width(text, px_size, family, style)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Monospace approximation
// ────────────────────────────────────────────────────────────────────────────

/// Every character advances by the same em width, regardless of family or style.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub advance_em: f32,
}

impl MonospaceMetrics {
    pub fn new(advance_em: f32) -> Self {
        Self { advance_em }
    }
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { advance_em: 0.6 }
    }
}

impl GlyphMetricsProvider for MonospaceMetrics {
    fn text_width(&self, text: &str, px_size: f32, _family: &str, _style: FontStyle) -> f32 {
        text.chars().count() as f32 * self.advance_em * px_size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font family enum
// ────────────────────────────────────────────────────────────────────────────

/// Font families with a built-in width table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FontFamily {
    /// Default deck face.
    Calibri,
    /// Neo-grotesque sans-serif, Helvetica metrics.
    Arial,
    /// Transitional serif.
    TimesNewRoman,
}

impl FontFamily {
    /// Resolves a face name case-insensitively. Unknown names return `None`.
    pub fn from_name(name: &str) -> Option<FontFamily> {
        let key: String = name
            .chars()
            .filter(|c| !c.is_whitespace() && *c != '-' && *c != '_')
            .flat_map(char::to_lowercase)
            .collect();
        match key.as_str() {
            "calibri" => Some(FontFamily::Calibri),
            "arial" | "helvetica" | "liberationsans" => Some(FontFamily::Arial),
            "timesnewroman" | "times" | "liberationserif" => Some(FontFamily::TimesNewRoman),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            FontFamily::Calibri => "Calibri",
            FontFamily::Arial => "Arial",
            FontFamily::TimesNewRoman => "Times New Roman",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Font metric table
// ────────────────────────────────────────────────────────────────────────────

/// Static character-width table for a font family.
///
/// Width array slot layout:
/// ```text
/// [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
/// [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
/// [16..25]=0-9
/// [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
/// [33..58]=A-Z
/// [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
/// [65..90]=a-z
/// [91]={  [92]=|  [93]=}  [94]=~
/// ```
pub struct FontMetricTable {
    pub font: FontFamily,
    widths: [f32; 95],
    /// Fallback width for non-ASCII characters (codepoints > 0x7E).
    pub average_char_width: f32,
    /// Horizontal scale applied to bold runs.
    pub bold_scale: f32,
    /// Horizontal scale applied to italic runs.
    pub italic_scale: f32,
}

impl FontMetricTable {
    /// Measures a string in em units, unstyled.
    ///
    /// Tabs count as a space; other control characters have no advance.
    pub fn measure_em(&self, s: &str) -> f32 {
        s.chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32]
                } else if c == '\t' {
                    self.widths[0]
                } else if c.is_control() {
                    0.0
                } else {
                    self.average_char_width
                }
            })
            .sum()
    }

    pub fn space_width(&self) -> f32 {
        self.widths[0]
    }

    /// Style multiplier for a run.
    pub fn style_scale(&self, style: FontStyle) -> f32 {
        let mut scale = 1.0;
        if style.bold {
            scale *= self.bold_scale;
        }
        if style.italic {
            scale *= self.italic_scale;
        }
        scale
    }
}

/// Calibri — the default deck face. Values are hmtx advances / 2048.
static CALIBRI_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Calibri,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.226, 0.266, 0.401, 0.498, 0.507, 0.715, 0.682, 0.221, 0.303, 0.303, 0.498, 0.498, 0.250, 0.306, 0.252, 0.386,
        // 0      1      2      3      4      5      6      7      8      9
        0.507, 0.507, 0.507, 0.507, 0.507, 0.507, 0.507, 0.507, 0.507, 0.507,
        // :      ;      <      =      >      ?      @
        0.268, 0.268, 0.498, 0.498, 0.498, 0.463, 0.894,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.579, 0.544, 0.533, 0.615, 0.488, 0.459, 0.631, 0.623, 0.252, 0.319, 0.520, 0.420, 0.855,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.646, 0.662, 0.517, 0.673, 0.543, 0.459, 0.487, 0.642, 0.567, 0.890, 0.519, 0.487, 0.468,
        // [      \      ]      ^      _      `
        0.306, 0.386, 0.306, 0.498, 0.498, 0.291,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.479, 0.525, 0.423, 0.525, 0.498, 0.305, 0.471, 0.525, 0.229, 0.239, 0.455, 0.229, 0.799,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.525, 0.527, 0.525, 0.525, 0.349, 0.391, 0.335, 0.525, 0.452, 0.715, 0.433, 0.453, 0.395,
        // {      |      }      ~
        0.310, 0.460, 0.310, 0.498,
    ],
    average_char_width: 0.49,
    bold_scale: 1.04,
    italic_scale: 0.98,
};

/// Arial — Helvetica-compatible advances / 1000.
static ARIAL_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::Arial,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.278, 0.278, 0.355, 0.556, 0.556, 0.889, 0.667, 0.191, 0.333, 0.333, 0.389, 0.584, 0.278, 0.333, 0.278, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556, 0.556,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.584, 0.584, 0.584, 0.556, 1.015,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.667, 0.667, 0.722, 0.722, 0.667, 0.611, 0.778, 0.722, 0.278, 0.500, 0.667, 0.556, 0.833,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.778, 0.667, 0.778, 0.722, 0.667, 0.611, 0.722, 0.667, 0.944, 0.667, 0.667, 0.611,
        // [      \      ]      ^      _      `
        0.278, 0.278, 0.278, 0.469, 0.556, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.556, 0.556, 0.500, 0.556, 0.556, 0.278, 0.556, 0.556, 0.222, 0.222, 0.500, 0.222, 0.833,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.556, 0.556, 0.556, 0.556, 0.333, 0.500, 0.278, 0.556, 0.500, 0.722, 0.500, 0.500, 0.500,
        // {      |      }      ~
        0.334, 0.260, 0.334, 0.584,
    ],
    average_char_width: 0.53,
    bold_scale: 1.07,
    italic_scale: 1.0,
};

/// Times New Roman — Times-compatible advances / 1000.
static TIMES_TABLE: FontMetricTable = FontMetricTable {
    font: FontFamily::TimesNewRoman,
    #[rustfmt::skip]
    widths: [
        // sp     !      "      #      $      %      &      '      (      )      *      +      ,      -      .      /
        0.250, 0.333, 0.408, 0.500, 0.500, 0.833, 0.778, 0.180, 0.333, 0.333, 0.500, 0.564, 0.250, 0.333, 0.250, 0.278,
        // 0      1      2      3      4      5      6      7      8      9
        0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500, 0.500,
        // :      ;      <      =      >      ?      @
        0.278, 0.278, 0.564, 0.564, 0.564, 0.444, 0.921,
        // A      B      C      D      E      F      G      H      I      J      K      L      M
        0.722, 0.667, 0.667, 0.722, 0.611, 0.556, 0.722, 0.722, 0.333, 0.389, 0.722, 0.611, 0.889,
        // N      O      P      Q      R      S      T      U      V      W      X      Y      Z
        0.722, 0.722, 0.556, 0.722, 0.667, 0.556, 0.611, 0.722, 0.722, 0.944, 0.722, 0.722, 0.611,
        // [      \      ]      ^      _      `
        0.333, 0.278, 0.333, 0.469, 0.500, 0.333,
        // a      b      c      d      e      f      g      h      i      j      k      l      m
        0.444, 0.500, 0.444, 0.500, 0.444, 0.333, 0.500, 0.500, 0.278, 0.278, 0.500, 0.278, 0.778,
        // n      o      p      q      r      s      t      u      v      w      x      y      z
        0.500, 0.500, 0.500, 0.500, 0.333, 0.389, 0.278, 0.500, 0.500, 0.722, 0.500, 0.500, 0.444,
        // {      |      }      ~
        0.480, 0.200, 0.480, 0.541,
    ],
    average_char_width: 0.48,
    bold_scale: 1.05,
    italic_scale: 0.97,
};

/// Returns the static metric table for a given font family.
pub fn get_metrics(font: &FontFamily) -> &'static FontMetricTable {
    match font {
        FontFamily::Calibri => &CALIBRI_TABLE,
        FontFamily::Arial => &ARIAL_TABLE,
        FontFamily::TimesNewRoman => &TIMES_TABLE,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Table-backed provider
// ────────────────────────────────────────────────────────────────────────────

/// Provider backed by the static width tables.
///
/// Family names are resolved with [`FontFamily::from_name`]; names without a
/// table are measured with the `fallback` family's table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableMetrics {
    pub fallback: FontFamily,
}

impl TableMetrics {
    pub fn new(fallback: FontFamily) -> Self {
        Self { fallback }
    }

    pub fn table_for(&self, family: &str) -> &'static FontMetricTable {
        get_metrics(&FontFamily::from_name(family).unwrap_or(self.fallback))
    }
}

impl Default for TableMetrics {
    fn default() -> Self {
        Self::new(FontFamily::Calibri)
    }
}

impl GlyphMetricsProvider for TableMetrics {
    fn text_width(&self, text: &str, px_size: f32, family: &str, style: FontStyle) -> f32 {
        let table = self.table_for(family);
        table.measure_em(text) * table.style_scale(style) * px_size
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
