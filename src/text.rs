//! Text measuring seam.
//!
//! Concept rectangles derive from the size of their text. The host toolkit
//! usually knows the real font metrics and can implement [`TextMetrics`];
//! [`MonospaceMetrics`] is a font-agnostic fallback based on display columns.

use crate::path::Size;
use serde::{Deserialize, Serialize};
use unicode_width::UnicodeWidthStr;

/// Measures the rendered extent of a piece of text.
pub trait TextMetrics {
    fn measure(&self, text: &str) -> Size;
}

/// Fixed advance per display column and fixed height per line.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.0,
            line_height: 15.0,
        }
    }
}

impl TextMetrics for MonospaceMetrics {
    fn measure(&self, text: &str) -> Size {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.lines() {
            lines += 1;
            widest = widest.max(line.width());
        }
        // An empty string still occupies one line
        let lines = lines.max(1);
        Size::new(
            widest as f32 * self.char_width,
            lines as f32 * self.line_height,
        )
    }
}

impl<T: TextMetrics + ?Sized> TextMetrics for &T {
    fn measure(&self, text: &str) -> Size {
        (**self).measure(text)
    }
}
