//! Text measurement for content-derived column widths.

use unicode_width::UnicodeWidthChar;
use unicode_width::UnicodeWidthStr;

use crate::error::MeasureError;

/// Which kind of element a measured text sits in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    /// Header label.
    Header,
    /// Body cell.
    Cell,
}

/// Host-side text measurement.
///
/// Hosts that cannot measure keep the default, and widths fall back to
/// [`estimate_width`].
pub trait TextMeasure {
    /// Rendered width of `text` in pixels.
    fn measure_text(&self, _text: &str, _role: TextRole) -> Result<u32, MeasureError> {
        Err(MeasureError::Unavailable)
    }
}

/// Terminal columns occupied by `s`.
pub fn display_width(s: &str) -> usize {
    s.width()
}

/// Pixel estimate: display columns × average glyph width.
pub fn estimate_width(text: &str, average_glyph_width: u32) -> u32 {
    display_width(text) as u32 * average_glyph_width
}

/// Measure with the host, falling back to the estimate on any failure.
pub fn measure_or_estimate<M>(measure: &M, text: &str, role: TextRole, average_glyph_width: u32) -> u32
where
    M: TextMeasure + ?Sized,
{
    match measure.measure_text(text, role) {
        Ok(width) => width,
        Err(MeasureError::Unavailable) => estimate_width(text, average_glyph_width),
        Err(err) => {
            log::debug!("text measurement failed, estimating: {}", err);
            estimate_width(text, average_glyph_width)
        }
    }
}

/// Cut `s` to `max_width` columns, ending in an ellipsis when cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let target = max_width.saturating_sub(1);
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoMeasure;
    impl TextMeasure for NoMeasure {}

    struct Broken;
    impl TextMeasure for Broken {
        fn measure_text(&self, _text: &str, _role: TextRole) -> Result<u32, MeasureError> {
            Err(MeasureError::Failed("no font".into()))
        }
    }

    struct Exact;
    impl TextMeasure for Exact {
        fn measure_text(&self, text: &str, _role: TextRole) -> Result<u32, MeasureError> {
            Ok(text.len() as u32 * 10)
        }
    }

    #[test]
    fn test_fallback_estimate() {
        assert_eq!(measure_or_estimate(&NoMeasure, "abcd", TextRole::Cell, 7), 28);
        assert_eq!(measure_or_estimate(&Broken, "abcd", TextRole::Header, 7), 28);
        assert_eq!(measure_or_estimate(&Exact, "abcd", TextRole::Cell, 7), 40);
    }

    #[test]
    fn test_wide_chars_count_double() {
        assert_eq!(estimate_width("日本", 7), 28);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello…");
        assert_eq!(truncate_to_width("hello", 0), "");
    }
}
