//! Lookup tables shared by both conversion directions.

use crate::elements::ShapeType;
use crate::style::Color;

/// Fallback for colors that cannot be parsed.
pub const FALLBACK_COLOR: Color = Color::rgb(0x1f, 0x29, 0x37);

/// Shape codes of the project format and the catalogue entry each one maps to.
/// Shapes missing here are exported as `RECTANGLE`.
pub const SHAPE_CODES: [(&str, ShapeType); 20] = [
    ("RECTANGLE", ShapeType::Rectangle),
    ("OVAL", ShapeType::Ellipse),
    ("ROUNDED_RECTANGLE", ShapeType::RoundedRectangle),
    ("TRIANGLE", ShapeType::Triangle),
    ("RIGHT_TRIANGLE", ShapeType::RightTriangle),
    ("DIAMOND", ShapeType::Diamond),
    ("PENTAGON", ShapeType::Pentagon),
    ("HEXAGON", ShapeType::Hexagon),
    ("OCTAGON", ShapeType::Octagon),
    ("PARALLELOGRAM", ShapeType::Parallelogram),
    ("TRAPEZOID", ShapeType::Trapezoid),
    ("STAR_4", ShapeType::Star4),
    ("STAR_5", ShapeType::Star5),
    ("STAR_6", ShapeType::Star6),
    ("STAR_8", ShapeType::Star8),
    ("RIGHT_ARROW", ShapeType::ArrowRight),
    ("LEFT_ARROW", ShapeType::ArrowLeft),
    ("UP_ARROW", ShapeType::ArrowUp),
    ("DOWN_ARROW", ShapeType::ArrowDown),
    ("CHEVRON", ShapeType::Chevron),
];

/// Catalogue shape for a project shape code; unknown codes become rectangles.
pub fn shape_from_code(code: &str) -> ShapeType {
    let code = code.trim();
    match SHAPE_CODES
        .iter()
        .find(|(c, _)| c.eq_ignore_ascii_case(code))
    {
        Some((_, shape)) => *shape,
        None => {
            log::debug!("Unmapped shape code {code:?}, using rectangle");
            ShapeType::Rectangle
        }
    }
}

/// Project shape code for a catalogue shape.
pub fn shape_to_code(shape: ShapeType) -> &'static str {
    match SHAPE_CODES.iter().find(|(_, s)| *s == shape) {
        Some((code, _)) => code,
        None => {
            log::debug!("Shape {} has no project code, exporting as RECTANGLE", shape.name());
            "RECTANGLE"
        }
    }
}

/// Parse a project color, falling back to [`FALLBACK_COLOR`].
pub fn color_or_fallback(value: Option<&str>) -> Color {
    value.and_then(Color::parse).unwrap_or(FALLBACK_COLOR)
}

const FONT_ALIASES: [(&str, &str); 5] = [
    ("sans-serif", "Arial"),
    ("serif", "Times New Roman"),
    ("monospace", "Courier New"),
    ("system-ui", "Arial"),
    ("cursive", "Comic Sans MS"),
];

/// Reduce a CSS font list to one concrete family name.
///
/// `"'Open Sans', sans-serif"` becomes `Open Sans`; a bare generic family is
/// replaced by its usual concrete font.
pub fn normalize_font(value: &str) -> Option<String> {
    let first = value.split(',').next()?.trim();
    let unquoted = first.trim_matches(|c| c == '"' || c == '\'').trim();
    if unquoted.is_empty() {
        return None;
    }
    let alias = FONT_ALIASES
        .iter()
        .find(|(generic, _)| generic.eq_ignore_ascii_case(unquoted))
        .map(|(_, concrete)| concrete.to_string());
    Some(alias.unwrap_or_else(|| unquoted.to_string()))
}

/// CSS value for a single family, quoted when it contains spaces.
pub fn css_font_family(family: &str) -> String {
    if family.contains(' ') {
        format!("'{family}'")
    } else {
        family.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_codes_both_ways() {
        assert_eq!(shape_from_code("OVAL"), ShapeType::Ellipse);
        assert_eq!(shape_from_code("oval"), ShapeType::Ellipse);
        assert_eq!(shape_to_code(ShapeType::Ellipse), "OVAL");
        for (code, shape) in SHAPE_CODES {
            assert_eq!(shape_from_code(code), shape);
            assert_eq!(shape_to_code(shape), code);
        }
    }

    #[test]
    fn test_unmapped_shapes_fall_back() {
        assert_eq!(shape_from_code("CLOUD_CALLOUT"), ShapeType::Rectangle);
        assert_eq!(shape_to_code(ShapeType::Heart), "RECTANGLE");
        assert_eq!(shape_to_code(ShapeType::Cloud), "RECTANGLE");
        assert_eq!(shape_to_code(ShapeType::Chevron), "CHEVRON");
    }

    #[test]
    fn test_normalize_font() {
        assert_eq!(normalize_font("'Open Sans', sans-serif").as_deref(), Some("Open Sans"));
        assert_eq!(normalize_font("\"Roboto\"").as_deref(), Some("Roboto"));
        assert_eq!(normalize_font("serif").as_deref(), Some("Times New Roman"));
        assert_eq!(normalize_font("  ").as_deref(), None);
    }

    #[test]
    fn test_css_font_family_quotes_spaces() {
        assert_eq!(css_font_family("Times New Roman"), "'Times New Roman'");
        assert_eq!(css_font_family("Arial"), "Arial");
        assert_eq!(
            normalize_font(&css_font_family("Times New Roman")).as_deref(),
            Some("Times New Roman")
        );
    }

    #[test]
    fn test_color_fallback() {
        assert_eq!(color_or_fallback(Some("#fff")), Color::white());
        assert_eq!(color_or_fallback(Some("not-a-color")), FALLBACK_COLOR);
        assert_eq!(color_or_fallback(None), FALLBACK_COLOR);
    }
}
