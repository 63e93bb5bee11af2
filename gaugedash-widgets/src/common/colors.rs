// gaugedash-widgets/src/common/colors.rs
use ratatui::style::Color;

/// Color used when a threshold has no color or one we cannot parse
pub const FALLBACK_COLOR: Color = Color::Gray;

/// Parse a CSS color string as stored on threshold rows
///
/// Accepts `rgba(r, g, b, a)`, `rgb(r, g, b)` and `#rrggbb`. Alpha is
/// dropped since terminal cells are opaque.
///
/// # Example
/// ```rust
/// use gaugedash_widgets::parse_css_color;
/// use ratatui::style::Color;
///
/// assert_eq!(parse_css_color("rgba(50, 172, 45, 0.97)"), Some(Color::Rgb(50, 172, 45)));
/// assert_eq!(parse_css_color("#ff0000"), Some(Color::Rgb(255, 0, 0)));
/// assert_eq!(parse_css_color("teal"), None);
/// ```
pub fn parse_css_color(css: &str) -> Option<Color> {
    let css = css.trim();

    if let Some(hex) = css.strip_prefix('#') {
        if hex.len() != 6 {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }

    let args = css
        .strip_prefix("rgba(")
        .or_else(|| css.strip_prefix("rgb("))?
        .strip_suffix(')')?;

    let mut channels = args.split(',').map(|part| part.trim().parse::<u8>().ok());
    let r = channels.next()??;
    let g = channels.next()??;
    let b = channels.next()??;

    Some(Color::Rgb(r, g, b))
}

/// Terminal color for an optional threshold color
pub fn threshold_color(css: Option<&str>) -> Color {
    css.and_then(parse_css_color).unwrap_or(FALLBACK_COLOR)
}

/// Colors shared by the editor widgets
#[derive(Debug, Clone, Copy)]
pub struct ColorPalette {
    /// Border of the focused widget
    pub focus: Color,
    /// Border of other widgets
    pub unfocus: Color,
    /// Highlight behind the selected row
    pub selected: Color,
    /// Text of Min/Max rows
    pub boundary: Color,
    /// Status line for rejected edits
    pub error: Color,
    /// Status line while typing a value
    pub input: Color,
}

pub const DEFAULT_PALETTE: ColorPalette = ColorPalette {
    focus: Color::Yellow,
    unfocus: Color::DarkGray,
    selected: Color::DarkGray,
    boundary: Color::Cyan,
    error: Color::Red,
    input: Color::Yellow,
};

impl ColorPalette {
    /// Border color for a widget's focus state
    pub const fn focus_color(&self, focused: bool) -> Color {
        if focused { self.focus } else { self.unfocus }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gaugedash_core::ThresholdColor;

    #[test]
    fn test_parse_palette_colors() {
        assert_eq!(
            parse_css_color(ThresholdColor::Ok.as_str()),
            Some(Color::Rgb(50, 172, 45))
        );
        assert_eq!(
            parse_css_color(ThresholdColor::Warning.as_str()),
            Some(Color::Rgb(237, 129, 40))
        );
        assert_eq!(
            parse_css_color(ThresholdColor::Critical.as_str()),
            Some(Color::Rgb(245, 54, 54))
        );
    }

    #[test]
    fn test_parse_other_forms() {
        assert_eq!(parse_css_color("rgb(1, 2, 3)"), Some(Color::Rgb(1, 2, 3)));
        assert_eq!(parse_css_color(" #0a0B0c "), Some(Color::Rgb(10, 11, 12)));
        assert_eq!(parse_css_color("#fff"), None);
        assert_eq!(parse_css_color("rgba(300, 0, 0, 1)"), None);
        assert_eq!(parse_css_color("rgba(1, 2)"), None);
        assert_eq!(parse_css_color("hsl(0, 100%, 50%)"), None);
    }

    #[test]
    fn test_threshold_color_fallback() {
        assert_eq!(threshold_color(None), FALLBACK_COLOR);
        assert_eq!(threshold_color(Some("nonsense")), FALLBACK_COLOR);
        assert_eq!(threshold_color(Some("#00ff00")), Color::Rgb(0, 255, 0));
    }

    #[test]
    fn test_focus_color_reads_palette() {
        assert_eq!(DEFAULT_PALETTE.focus_color(true), Color::Yellow);
        assert_eq!(DEFAULT_PALETTE.focus_color(false), Color::DarkGray);

        let palette = ColorPalette {
            focus: Color::Green,
            unfocus: Color::Black,
            ..DEFAULT_PALETTE
        };
        assert_eq!(palette.focus_color(true), Color::Green);
        assert_eq!(palette.focus_color(false), Color::Black);
    }
}
