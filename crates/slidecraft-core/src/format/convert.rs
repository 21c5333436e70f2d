//! Conversions between the project format, the normalized layout and the
//! editor's own document.
//!
//! `internal_to_external` followed by [`import_project`] reproduces any
//! presentation made of text, shape and image elements whose shape types have
//! a project code. These do not survive the trip:
//!
//! - masters, playback settings and the slide layout tag
//! - theme roles other than the eight palette colors, `background1`, `text1`
//!   and the body font (the heading font comes back equal to the body font)
//! - table elements, which are dropped
//! - shape types without a project code, which come back as rectangles
//! - gradient text backgrounds, which are flattened to their first color
//! - font families that are CSS generic names or contain commas
//! - gradient offsets that are not exact after scaling to percent

use super::external::{
    ExternalBackground, ExternalElement, ExternalFill, ExternalFrame, ExternalGradient,
    ExternalGradientStop, ExternalImage, ExternalImageFill, ExternalLine, ExternalOutline,
    ExternalProject, ExternalShadow, ExternalShape, ExternalSlide, ExternalText, ExternalTheme,
};
use super::layout::{
    Frame, LayoutBackground, LayoutBackgroundImage, LayoutElement, LayoutImage, LayoutImageStyle,
    LayoutMeta, LayoutShape, LayoutShapeStyle, LayoutSlide, LayoutText, LayoutTextStyle,
    NormalizedLayout,
};
use super::rich_text::{html_to_runs, runs_to_html};
use super::tables::{color_or_fallback, normalize_font, shape_from_code, shape_to_code};
use crate::document::{
    valid_canvas, AspectRatio, Background, Presentation, Settings, Slide, Theme, DEFAULT_HEIGHT,
    DEFAULT_WIDTH,
};
use crate::elements::{
    new_id, ElementBase, ImageElement, ImageSource, ObjectFit, ShapeElement, ShapeType,
    SlideElement, TextElement, SHAPE_VIEW_BOX,
};
use crate::geometry::{BBox, MIN_ELEMENT_SIZE};
use crate::style::{
    Border, BorderStyle, Color, Fill, Gradient, GradientKind, GradientStop, ParagraphStyle,
    Shadow, TextStyle, VerticalAlign,
};
use std::collections::HashSet;

/// A project produced for export, with the font families its text uses.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedProject {
    pub project: ExternalProject,
    pub fonts: Vec<String>,
}

// Project -> normalized layout

/// Normalize a project. Elements of unsupported kinds are dropped.
pub fn external_to_internal(project: &ExternalProject) -> NormalizedLayout {
    let theme = &project.theme;
    let slides: Vec<LayoutSlide> = project
        .slides
        .iter()
        .enumerate()
        .map(|(index, slide)| slide_to_layout(slide, index, theme))
        .collect();

    let mut seen = HashSet::new();
    let mut fonts = Vec::new();
    for slide in &slides {
        for element in &slide.elements {
            if let LayoutElement::Text(text) = element {
                for run in &text.runs {
                    if seen.insert(run.style.font_family.clone()) {
                        fonts.push(run.style.font_family.clone());
                    }
                }
            }
        }
    }

    let title = project.title.trim();
    NormalizedLayout {
        id: project.id.clone().unwrap_or_else(new_id),
        title: if title.is_empty() {
            "Untitled".to_string()
        } else {
            project.title.clone()
        },
        meta: LayoutMeta {
            width: project.width,
            height: project.height,
            theme: theme.clone(),
            fonts,
        },
        slides,
    }
}

fn slide_to_layout(slide: &ExternalSlide, index: usize, theme: &ExternalTheme) -> LayoutSlide {
    let number = index + 1;
    let id = if slide.id.trim().is_empty() {
        format!("slide-{number}")
    } else {
        slide.id.clone()
    };
    let name = match slide.kind.as_deref() {
        Some(kind) if !kind.is_empty() => format!("{kind}-{number}"),
        _ => format!("Slide {number}"),
    };
    let elements = slide
        .elements
        .iter()
        .filter_map(|element| element_to_layout(element, theme))
        .collect();
    LayoutSlide {
        id,
        name,
        remark: slide.remark.clone(),
        background: slide.background.as_ref().map(background_to_layout),
        elements,
    }
}

fn background_to_layout(background: &ExternalBackground) -> LayoutBackground {
    let color = background
        .color
        .as_deref()
        .and_then(Color::parse)
        .unwrap_or(Color::white());
    match (background.kind.as_str(), &background.image, &background.gradient) {
        ("image", Some(image), _) => LayoutBackground {
            fill: Fill::solid(color),
            image: Some(LayoutBackgroundImage {
                src: image.src.clone(),
                size: image.size.clone().unwrap_or_else(|| "cover".to_string()),
            }),
        },
        ("gradient", _, Some(gradient)) => LayoutBackground {
            fill: Fill::Gradient(gradient_from_external(gradient)),
            image: None,
        },
        _ => LayoutBackground {
            fill: Fill::solid(color),
            image: None,
        },
    }
}

fn gradient_from_external(gradient: &ExternalGradient) -> Gradient {
    Gradient {
        kind: if gradient.kind.eq_ignore_ascii_case("radial") {
            GradientKind::Radial
        } else {
            GradientKind::Linear
        },
        angle: gradient.rotate,
        stops: gradient
            .colors
            .iter()
            .map(|stop| GradientStop {
                offset: (stop.pos / 100.0).clamp(0.0, 1.0),
                color: color_or_fallback(Some(&stop.color)),
            })
            .collect(),
    }
}

fn frame_of(frame: &ExternalFrame) -> Frame {
    Frame {
        x: frame.left,
        y: frame.top,
        width: frame.width,
        height: frame.height,
        rotate: frame.rotate,
    }
}

fn border_from_outline(outline: Option<&ExternalOutline>) -> Option<Border> {
    let outline = outline?;
    if outline.width.is_none() && outline.color.is_none() {
        return None;
    }
    Some(Border {
        width: outline.width.unwrap_or(1.0),
        color: color_or_fallback(outline.color.as_deref()),
        style: outline
            .style
            .as_deref()
            .map(BorderStyle::from_css)
            .unwrap_or_default(),
    })
}

fn shadow_from_external(shadow: Option<&ExternalShadow>) -> Option<Shadow> {
    shadow.map(|s| Shadow {
        offset_x: s.h,
        offset_y: s.v,
        blur: s.blur,
        color: color_or_fallback(Some(&s.color)),
    })
}

fn opacity_of(opacity: Option<f64>) -> f64 {
    opacity.unwrap_or(1.0).clamp(0.0, 1.0)
}

fn element_to_layout(element: &ExternalElement, theme: &ExternalTheme) -> Option<LayoutElement> {
    match element {
        ExternalElement::Text(text) => Some(LayoutElement::Text(text_to_layout(text, theme))),
        ExternalElement::Image(image) => Some(LayoutElement::Image(LayoutImage {
            id: image.frame.id.clone(),
            frame: frame_of(&image.frame),
            src: image.src.clone(),
            style: LayoutImageStyle {
                object_fit: image
                    .object_fit
                    .as_deref()
                    .map(ObjectFit::from_css)
                    .unwrap_or_default()
                    .as_css()
                    .to_string(),
                opacity: opacity_of(image.opacity),
                border: border_from_outline(image.outline.as_ref()),
                shadow: shadow_from_external(image.shadow.as_ref()),
                flip_h: image.flip_h,
                flip_v: image.flip_v,
            },
        })),
        ExternalElement::Shape(shape) => Some(LayoutElement::Shape(shape_to_layout(shape))),
        ExternalElement::Line(line) => Some(LayoutElement::Shape(line_to_layout(line))),
        ExternalElement::Unknown => {
            log::debug!("Dropping project element of unsupported type");
            None
        }
    }
}

fn text_to_layout(text: &ExternalText, theme: &ExternalTheme) -> LayoutText {
    let font_family = text
        .default_font_name
        .as_deref()
        .or(theme.font_name.as_deref())
        .and_then(normalize_font)
        .unwrap_or_else(|| TextStyle::default().font_family);
    let color = text
        .default_color
        .as_deref()
        .or(theme.font_color.as_deref())
        .map(|c| color_or_fallback(Some(c)))
        .unwrap_or(Color::black());
    let base = TextStyle {
        font_family,
        color,
        ..TextStyle::default()
    };
    let paragraph = ParagraphStyle {
        line_height: text.line_height.unwrap_or(ParagraphStyle::default().line_height),
        space_after: text.paragraph_space.unwrap_or(0.0),
        ..ParagraphStyle::default()
    };
    let rich = html_to_runs(&text.content, &base, &paragraph);
    LayoutText {
        id: text.frame.id.clone(),
        frame: frame_of(&text.frame),
        runs: rich.runs,
        style: LayoutTextStyle {
            paragraph: rich.paragraph,
            vertical_align: text
                .vertical_align
                .as_deref()
                .map(VerticalAlign::from_name)
                .unwrap_or_default(),
            padding: text.padding.unwrap_or(0.0),
            letter_spacing: text.word_space,
            opacity: opacity_of(text.opacity),
            background_color: text.fill.as_deref().and_then(Color::parse),
            border: border_from_outline(text.outline.as_ref()),
            shadow: shadow_from_external(text.shadow.as_ref()),
            vertical: text.vertical.unwrap_or(false),
        },
    }
}

fn shape_to_layout(shape: &ExternalShape) -> LayoutShape {
    let shape_type = shape.shape_type.as_deref().map(shape_from_code);
    let catalogue_path = shape_type
        .filter(|t| *t != ShapeType::Rectangle)
        .map(|t| (t.svg_path().to_string(), SHAPE_VIEW_BOX.to_string()));
    let (path, view_box) = match (&shape.path, catalogue_path) {
        (Some(path), _) => (Some(path.clone()), shape.view_box.clone()),
        (None, Some((path, view_box))) => (Some(path), Some(view_box)),
        (None, None) => (None, shape.view_box.clone()),
    };
    LayoutShape {
        id: shape.frame.id.clone(),
        frame: frame_of(&shape.frame),
        shape_type: shape_type.map(|t| t.name().to_string()),
        path,
        view_box,
        style: LayoutShapeStyle {
            fill: shape.fill.as_ref().map(|fill| match fill {
                ExternalFill::Color(color) => Fill::solid(color_or_fallback(Some(color))),
                ExternalFill::Gradient(gradient) => Fill::Gradient(gradient_from_external(gradient)),
            }),
            border: border_from_outline(shape.outline.as_ref()),
            shadow: shadow_from_external(shape.shadow.as_ref()),
            opacity: opacity_of(shape.opacity),
            radius: shape.radius.unwrap_or(0.0),
            flip_h: shape.flip_h,
            flip_v: shape.flip_v,
        },
    }
}

/// A connector becomes an unfilled shape stroking a straight path.
fn line_to_layout(line: &ExternalLine) -> LayoutShape {
    let [sx, sy] = line.start;
    let [ex, ey] = line.end;
    let (min_x, min_y) = (sx.min(ex), sy.min(ey));
    let width = (ex - sx).abs().max(MIN_ELEMENT_SIZE);
    let height = (ey - sy).abs().max(MIN_ELEMENT_SIZE);
    LayoutShape {
        id: line.id.clone(),
        frame: Frame {
            x: line.left + min_x,
            y: line.top + min_y,
            width,
            height,
            rotate: line.rotate,
        },
        shape_type: None,
        path: Some(format!(
            "M {} {} L {} {}",
            sx - min_x,
            sy - min_y,
            ex - min_x,
            ey - min_y
        )),
        view_box: Some(format!("0 0 {width} {height}")),
        style: LayoutShapeStyle {
            fill: None,
            border: Some(Border {
                width: line.width.max(1.0),
                color: color_or_fallback(line.color.as_deref()),
                style: line
                    .style
                    .as_deref()
                    .map(BorderStyle::from_css)
                    .unwrap_or_default(),
            }),
            shadow: None,
            opacity: 1.0,
            radius: 0.0,
            flip_h: false,
            flip_v: false,
        },
    }
}

// Normalized layout -> document

/// Rebuild an editor document from a normalized layout.
///
/// Sizes below the minimum are raised to it, opacities are clamped, and empty
/// or repeated ids are replaced, so the result always satisfies the document
/// invariants.
pub fn layout_to_presentation(layout: &NormalizedLayout) -> Presentation {
    let mut slide_ids = HashSet::new();
    let mut slides: Vec<Slide> = layout
        .slides
        .iter()
        .map(|slide| {
            let mut converted = slide_from_layout(slide);
            if converted.id.is_empty() || !slide_ids.insert(converted.id.clone()) {
                converted.id = new_id();
                slide_ids.insert(converted.id.clone());
            }
            converted
        })
        .collect();
    if slides.is_empty() {
        slides.push(Slide::blank());
    }

    let meta = &layout.meta;
    let (width, height) = if valid_canvas(meta.width, meta.height) {
        (meta.width, meta.height)
    } else {
        log::warn!(
            "Layout canvas {}x{} is invalid, using {}x{}",
            meta.width,
            meta.height,
            DEFAULT_WIDTH,
            DEFAULT_HEIGHT
        );
        (DEFAULT_WIDTH, DEFAULT_HEIGHT)
    };
    Presentation {
        id: layout.id.clone(),
        name: layout.title.clone(),
        width,
        height,
        slides,
        theme: theme_from_external(&meta.theme),
        masters: Vec::new(),
        settings: Settings {
            aspect_ratio: aspect_ratio_of(width, height),
            ..Settings::default()
        },
    }
}

/// Import a project straight into an editor document.
pub fn import_project(project: &ExternalProject) -> Presentation {
    layout_to_presentation(&external_to_internal(project))
}

/// Normalized layout of a document, as the HTML serializer consumes it.
pub fn presentation_to_layout(presentation: &Presentation) -> NormalizedLayout {
    external_to_internal(&internal_to_external(presentation).project)
}

fn aspect_ratio_of(width: f64, height: f64) -> AspectRatio {
    if height <= 0.0 {
        return AspectRatio::default();
    }
    let ratio = width / height;
    [
        (AspectRatio::Widescreen, 16.0 / 9.0),
        (AspectRatio::Standard, 4.0 / 3.0),
        (AspectRatio::Wide16x10, 16.0 / 10.0),
    ]
    .into_iter()
    .find(|(_, r)| (ratio - r).abs() < 0.01)
    .map(|(aspect, _)| aspect)
    .unwrap_or_default()
}

fn theme_from_external(theme: &ExternalTheme) -> Theme {
    let mut result = Theme::default();
    let colors = &mut result.colors;
    let parse = |value: Option<&String>| value.and_then(|v| Color::parse(v));
    if let Some(color) = parse(theme.background_color.as_ref()) {
        colors.background1 = color;
    }
    if let Some(color) = parse(theme.font_color.as_ref()) {
        colors.text1 = color;
    }
    let palette = [
        &mut colors.primary,
        &mut colors.secondary,
        &mut colors.accent1,
        &mut colors.accent2,
        &mut colors.accent3,
        &mut colors.accent4,
        &mut colors.accent5,
        &mut colors.accent6,
    ];
    for (slot, value) in palette.into_iter().zip(&theme.theme_colors) {
        if let Some(color) = Color::parse(value) {
            *slot = color;
        }
    }
    if let Some(font) = theme.font_name.as_deref().and_then(normalize_font) {
        result.fonts.heading = font.clone();
        result.fonts.body = font;
    }
    result
}

fn slide_from_layout(slide: &LayoutSlide) -> Slide {
    let mut ids = HashSet::new();
    let elements = slide
        .elements
        .iter()
        .map(|element| {
            let mut converted = element_from_layout(element);
            if converted.id().is_empty() || !ids.insert(converted.id().to_string()) {
                converted.regenerate_id();
                ids.insert(converted.id().to_string());
            }
            converted
        })
        .collect();
    Slide {
        id: slide.id.clone(),
        elements,
        background: slide
            .background
            .as_ref()
            .map(background_from_layout)
            .unwrap_or_default(),
        notes: slide.remark.clone().unwrap_or_default(),
        layout: "blank".to_string(),
    }
}

fn background_from_layout(background: &LayoutBackground) -> Background {
    match (&background.image, &background.fill) {
        (Some(image), fill) => Background::Image {
            src: image.src.clone(),
            size: image.size.clone(),
            color: match fill {
                Fill::Solid { color } => *color,
                Fill::Gradient(gradient) => gradient.first_color().unwrap_or(Color::white()),
            },
        },
        (None, Fill::Solid { color }) => Background::Solid { color: *color },
        (None, Fill::Gradient(gradient)) => Background::Gradient(gradient.clone()),
    }
}

fn base_from_frame(id: &str, frame: &Frame, opacity: f64) -> ElementBase {
    let bbox = BBox::new(
        frame.x,
        frame.y,
        frame.width.max(MIN_ELEMENT_SIZE),
        frame.height.max(MIN_ELEMENT_SIZE),
    );
    let mut base = ElementBase::with_id(id, bbox);
    base.rotation = frame.rotate;
    base.opacity = opacity.clamp(0.0, 1.0);
    base
}

fn element_from_layout(element: &LayoutElement) -> SlideElement {
    match element {
        LayoutElement::Text(text) => {
            let style = &text.style;
            SlideElement::Text(TextElement {
                base: base_from_frame(&text.id, &text.frame, style.opacity),
                runs: text.runs.clone(),
                paragraph: style.paragraph.clone(),
                vertical_align: style.vertical_align,
                padding: style.padding,
                background: style.background_color.map(Fill::solid),
                border: style.border.clone(),
                shadow: style.shadow.clone(),
            })
        }
        LayoutElement::Image(image) => {
            let style = &image.style;
            SlideElement::Image(ImageElement {
                base: base_from_frame(&image.id, &image.frame, style.opacity),
                source: ImageSource::from_src(&image.src),
                object_fit: ObjectFit::from_css(&style.object_fit),
                flip_h: style.flip_h,
                flip_v: style.flip_v,
                border: style.border.clone(),
                shadow: style.shadow.clone(),
            })
        }
        LayoutElement::Shape(shape) => {
            let style = &shape.style;
            SlideElement::Shape(ShapeElement {
                base: base_from_frame(&shape.id, &shape.frame, style.opacity),
                shape_type: shape
                    .shape_type
                    .as_deref()
                    .and_then(ShapeType::from_name)
                    .unwrap_or_default(),
                fill: style.fill.clone(),
                border: style.border.clone(),
                shadow: style.shadow.clone(),
                corner_radius: style.radius,
                flip_h: style.flip_h,
                flip_v: style.flip_v,
            })
        }
    }
}

// Document -> project

/// Export a document to the project format along with its font families.
pub fn internal_to_external(presentation: &Presentation) -> ExportedProject {
    let project = ExternalProject {
        id: Some(presentation.id.clone()),
        title: presentation.name.clone(),
        width: presentation.width,
        height: presentation.height,
        theme: theme_to_external(&presentation.theme),
        slides: presentation.slides.iter().map(slide_to_external).collect(),
    };
    ExportedProject {
        project,
        fonts: presentation.font_families(),
    }
}

fn theme_to_external(theme: &Theme) -> ExternalTheme {
    ExternalTheme {
        background_color: Some(theme.colors.background1.to_hex()),
        theme_colors: theme.colors.palette().iter().map(Color::to_hex).collect(),
        font_color: Some(theme.colors.text1.to_hex()),
        font_name: Some(theme.fonts.body.clone()),
        outline: None,
        shadow: None,
    }
}

fn slide_to_external(slide: &Slide) -> ExternalSlide {
    ExternalSlide {
        id: slide.id.clone(),
        elements: slide.elements.iter().filter_map(element_to_external).collect(),
        remark: if slide.notes.is_empty() {
            None
        } else {
            Some(slide.notes.clone())
        },
        background: Some(background_to_external(&slide.background)),
        kind: None,
    }
}

fn gradient_to_external(gradient: &Gradient) -> ExternalGradient {
    ExternalGradient {
        kind: match gradient.kind {
            GradientKind::Linear => "linear".to_string(),
            GradientKind::Radial => "radial".to_string(),
        },
        colors: gradient
            .stops
            .iter()
            .map(|stop| ExternalGradientStop {
                pos: stop.offset * 100.0,
                color: stop.color.to_hex(),
            })
            .collect(),
        rotate: gradient.angle,
    }
}

fn background_to_external(background: &Background) -> ExternalBackground {
    match background {
        Background::Solid { color } => ExternalBackground {
            kind: "solid".to_string(),
            color: Some(color.to_hex()),
            image: None,
            gradient: None,
        },
        Background::Gradient(gradient) => ExternalBackground {
            kind: "gradient".to_string(),
            color: gradient.first_color().map(|c| c.to_hex()),
            image: None,
            gradient: Some(gradient_to_external(gradient)),
        },
        Background::Image { src, size, color } => ExternalBackground {
            kind: "image".to_string(),
            color: Some(color.to_hex()),
            image: Some(ExternalImageFill {
                src: src.clone(),
                size: Some(size.clone()),
            }),
            gradient: None,
        },
    }
}

fn frame_to_external(base: &ElementBase) -> ExternalFrame {
    ExternalFrame {
        id: base.id().to_string(),
        left: base.bbox.x,
        top: base.bbox.y,
        width: base.bbox.width,
        height: base.bbox.height,
        rotate: base.rotation,
        lock: None,
    }
}

fn outline_of(border: Option<&Border>) -> Option<ExternalOutline> {
    border.map(|b| ExternalOutline {
        width: Some(b.width),
        color: Some(b.color.to_hex()),
        style: Some(b.style.as_css().to_string()),
    })
}

fn shadow_to_external(shadow: Option<&Shadow>) -> Option<ExternalShadow> {
    shadow.map(|s| ExternalShadow {
        h: s.offset_x,
        v: s.offset_y,
        blur: s.blur,
        color: s.color.to_hex(),
    })
}

fn element_to_external(element: &SlideElement) -> Option<ExternalElement> {
    match element {
        SlideElement::Text(text) => {
            let leading = text.leading_style();
            Some(ExternalElement::Text(ExternalText {
                frame: frame_to_external(&text.base),
                content: runs_to_html(&text.runs, &text.paragraph),
                default_font_name: Some(leading.font_family),
                default_color: Some(leading.color.to_hex()),
                outline: outline_of(text.border.as_ref()),
                fill: text.background.as_ref().and_then(|fill| match fill {
                    Fill::Solid { color } => Some(color.to_hex()),
                    Fill::Gradient(gradient) => gradient.first_color().map(|c| c.to_hex()),
                }),
                line_height: Some(text.paragraph.line_height),
                word_space: None,
                opacity: Some(text.base.opacity),
                shadow: shadow_to_external(text.shadow.as_ref()),
                paragraph_space: Some(text.paragraph.space_after),
                vertical: None,
                vertical_align: Some(text.vertical_align.as_str().to_string()),
                padding: Some(text.padding),
            }))
        }
        SlideElement::Shape(shape) => {
            // Rectangles render as boxes so their corner radius applies.
            let (path, view_box) = if shape.shape_type == ShapeType::Rectangle {
                (None, None)
            } else {
                (
                    Some(shape.shape_type.svg_path().to_string()),
                    Some(SHAPE_VIEW_BOX.to_string()),
                )
            };
            Some(ExternalElement::Shape(ExternalShape {
                frame: frame_to_external(&shape.base),
                shape_type: Some(shape_to_code(shape.shape_type).to_string()),
                view_box,
                path,
                fill: shape.fill.as_ref().map(|fill| match fill {
                    Fill::Solid { color } => ExternalFill::Color(color.to_hex()),
                    Fill::Gradient(gradient) => ExternalFill::Gradient(gradient_to_external(gradient)),
                }),
                outline: outline_of(shape.border.as_ref()),
                radius: Some(shape.corner_radius),
                opacity: Some(shape.base.opacity),
                shadow: shadow_to_external(shape.shadow.as_ref()),
                flip_h: shape.flip_h,
                flip_v: shape.flip_v,
            }))
        }
        SlideElement::Image(image) => Some(ExternalElement::Image(ExternalImage {
            frame: frame_to_external(&image.base),
            src: image.source.to_src(),
            object_fit: Some(image.object_fit.as_css().to_string()),
            outline: outline_of(image.border.as_ref()),
            flip_h: image.flip_h,
            flip_v: image.flip_v,
            opacity: Some(image.base.opacity),
            shadow: shadow_to_external(image.shadow.as_ref()),
        })),
        SlideElement::Table(table) => {
            log::debug!("Table {} has no project equivalent, skipping", table.base.id());
            None
        }
    }
}
