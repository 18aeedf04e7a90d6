//! Column width specs and the cell style shared by header and body.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use serde::Serialize;

/// How wide a column is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnWidth {
    /// Share of the container (`width:N%`). Flexible.
    Percent(f32),
    /// Minimum pixel width (`min-width:Npx`). Set by column setup and by
    /// resize gestures. Rigid.
    MinPx(u32),
    /// Exact pixel width (`width:Npx`). Set by auto-fit. Rigid.
    Px(u32),
}

impl ColumnWidth {
    /// Equal share of the container for one of `count` columns.
    pub fn equal_share(count: usize) -> Self {
        ColumnWidth::Percent(100.0 / count.max(1) as f32)
    }

    /// Rigid widths neither grow nor shrink with the container.
    pub fn is_rigid(&self) -> bool {
        !matches!(self, ColumnWidth::Percent(_))
    }

    /// Pixel width inside a container `container_width` pixels wide.
    pub fn resolve(&self, container_width: u32) -> u32 {
        match *self {
            ColumnWidth::Percent(p) => (container_width as f32 * p / 100.0).floor() as u32,
            ColumnWidth::MinPx(px) | ColumnWidth::Px(px) => px,
        }
    }
}

impl fmt::Display for ColumnWidth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnWidth::Percent(p) => write!(f, "width:{}%", p),
            ColumnWidth::MinPx(px) => write!(f, "min-width:{}px", px),
            ColumnWidth::Px(px) => write!(f, "width:{}px", px),
        }
    }
}

/// Parses a column setup width: `"25%"`, `"120px"` or `"120"`.
///
/// Pixel values become a minimum width; percentages stay flexible.
impl FromStr for ColumnWidth {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(percent) = s.strip_suffix('%') {
            let value: f32 = percent.trim().parse().map_err(|_| ())?;
            if value.is_finite() && value > 0.0 {
                return Ok(ColumnWidth::Percent(value));
            }
            return Err(());
        }
        let px = s.strip_suffix("px").unwrap_or(s).trim();
        px.parse::<u32>().map(ColumnWidth::MinPx).map_err(|_| ())
    }
}

/// Layout style of one column, applied identically to its header cell and
/// every body cell.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CellStyle {
    /// The column's width spec.
    pub width: ColumnWidth,
    /// Content-derived minimum width, once measured.
    pub content_min_width: Option<u32>,
}

impl CellStyle {
    /// Rigid cells get `flex-grow: 0; flex-shrink: 0`.
    pub fn is_rigid(&self) -> bool {
        self.width.is_rigid()
    }

    /// Laid-out pixel width inside a container, never below the content
    /// minimum.
    pub fn resolve(&self, container_width: u32) -> u32 {
        let base = self.width.resolve(container_width);
        base.max(self.content_min_width.unwrap_or(0))
    }

    /// Inline CSS for hosts that style with it.
    pub fn css(&self) -> String {
        let min = self
            .content_min_width
            .map(|px| format!("min-width: {}px; ", px))
            .unwrap_or_default();
        if self.is_rigid() {
            format!(
                "{}{}; flex-grow: 0; flex-shrink: 0; box-sizing: border-box;",
                min, self.width
            )
        } else {
            format!("{}{}; box-sizing: border-box;", min, self.width)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_widths() {
        assert_eq!("25%".parse::<ColumnWidth>(), Ok(ColumnWidth::Percent(25.0)));
        assert_eq!("120px".parse::<ColumnWidth>(), Ok(ColumnWidth::MinPx(120)));
        assert_eq!(" 90 ".parse::<ColumnWidth>(), Ok(ColumnWidth::MinPx(90)));
        assert!("wide".parse::<ColumnWidth>().is_err());
        assert!("-5px".parse::<ColumnWidth>().is_err());
        assert!("0%".parse::<ColumnWidth>().is_err());
    }

    #[test]
    fn test_css_rigid_and_flexible() {
        let flexible = CellStyle {
            width: ColumnWidth::Percent(50.0),
            content_min_width: Some(96),
        };
        assert_eq!(
            flexible.css(),
            "min-width: 96px; width:50%; box-sizing: border-box;"
        );

        let rigid = CellStyle {
            width: ColumnWidth::Px(200),
            content_min_width: None,
        };
        assert_eq!(
            rigid.css(),
            "width:200px; flex-grow: 0; flex-shrink: 0; box-sizing: border-box;"
        );
    }

    #[test]
    fn test_resolve_respects_content_min() {
        let style = CellStyle {
            width: ColumnWidth::Percent(10.0),
            content_min_width: Some(120),
        };
        assert_eq!(style.resolve(500), 120);
        assert_eq!(style.resolve(2000), 200);
    }
}
