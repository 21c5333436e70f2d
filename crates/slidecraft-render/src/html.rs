//! Static HTML/CSS rendering of normalized slides.
//!
//! Every slide becomes a self-contained document: a fixed-size `.slide`
//! container and one absolutely positioned block per element, written in paint
//! order so later elements cover earlier ones.

use crate::renderer::{RenderResult, SlideRenderer};
use quick_xml::escape::escape;
use slidecraft_core::format::rich_text::runs_to_html;
use slidecraft_core::format::{
    Frame, LayoutBackground, LayoutElement, LayoutImage, LayoutMeta, LayoutShape, LayoutSlide,
    LayoutText, NormalizedLayout,
};
use slidecraft_core::style::{Border, Fill, Gradient, GradientKind, Shadow, VerticalAlign};
use std::fmt::Write;

/// Fill used by path shapes without a fill of their own.
const FALLBACK_FILL: &str = "#1f2937";

/// The HTML renderer. Stateless; rendering never touches the network or disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlRenderer;

impl SlideRenderer for HtmlRenderer {
    fn render_slide(&self, slide: &LayoutSlide, meta: &LayoutMeta) -> RenderResult<String> {
        render_slide_to_html(slide, meta)
    }
}

/// Render one slide to a standalone HTML document.
pub fn render_slide_to_html(slide: &LayoutSlide, meta: &LayoutMeta) -> RenderResult<String> {
    let mut html = String::new();
    writeln!(html, "<!DOCTYPE html>")?;
    writeln!(html, "<html>")?;
    writeln!(html, "<head>")?;
    writeln!(html, "<meta charset=\"utf-8\">")?;
    writeln!(
        html,
        "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">"
    )?;
    writeln!(html, "<style>")?;
    writeln!(html, "* {{ box-sizing: border-box; }}")?;
    writeln!(
        html,
        "body {{ margin: 0; font-family: {}; }}",
        css_text(meta.default_font())
    )?;
    writeln!(
        html,
        ".slide {{ position: relative; width: {}px; height: {}px; {} overflow: hidden; }}",
        meta.width,
        meta.height,
        background_css(slide.background.as_ref(), meta)
    )?;
    writeln!(html, ".el {{ position: absolute; }}")?;
    writeln!(html, ".el p {{ margin: 0; }}")?;
    writeln!(html, "</style>")?;
    writeln!(html, "</head>")?;
    writeln!(html, "<body>")?;
    writeln!(
        html,
        "<div class=\"slide\" data-slide-id=\"{}\">",
        escape_html(&slide.id)
    )?;
    for element in &slide.elements {
        match element {
            LayoutElement::Text(text) => write_text(&mut html, text)?,
            LayoutElement::Image(image) => write_image(&mut html, image)?,
            LayoutElement::Shape(shape) => write_shape(&mut html, shape)?,
        }
    }
    writeln!(html, "</div>")?;
    writeln!(html, "</body>")?;
    writeln!(html, "</html>")?;
    log::debug!(
        "Rendered slide {} ({} elements, {} bytes)",
        slide.id,
        slide.elements.len(),
        html.len()
    );
    Ok(html)
}

/// Render every slide of a layout with [`HtmlRenderer`].
pub fn render_layout(layout: &NormalizedLayout) -> RenderResult<Vec<crate::RenderedSlide>> {
    HtmlRenderer.render_layout(layout)
}

fn background_css(background: Option<&LayoutBackground>, meta: &LayoutMeta) -> String {
    let Some(background) = background else {
        return format!("background: {};", meta.background_color().to_hex());
    };
    if let Some(image) = &background.image {
        let color = match &background.fill {
            Fill::Solid { color } => color.to_hex(),
            Fill::Gradient(gradient) => gradient
                .first_color()
                .map(|c| c.to_hex())
                .unwrap_or_else(|| "#fff".to_string()),
        };
        return format!(
            "background: {color} url('{}') center/{} no-repeat;",
            css_url(&image.src),
            css_text(&image.size)
        );
    }
    format!("background: {};", fill_css(&background.fill))
}

fn gradient_css(gradient: &Gradient) -> String {
    let stops: Vec<String> = gradient
        .stops
        .iter()
        .map(|stop| format!("{} {}%", stop.color.to_hex(), stop.offset * 100.0))
        .collect();
    match gradient.kind {
        GradientKind::Linear => format!("linear-gradient({}deg, {})", gradient.angle, stops.join(", ")),
        GradientKind::Radial => format!("radial-gradient(circle, {})", stops.join(", ")),
    }
}

fn fill_css(fill: &Fill) -> String {
    match fill {
        Fill::Solid { color } => color.to_hex(),
        Fill::Gradient(gradient) => gradient_css(gradient),
    }
}

fn border_css(border: &Border) -> String {
    format!(
        "border: {}px {} {};",
        border.width,
        border.style.as_css(),
        border.color.to_hex()
    )
}

fn shadow_css(shadow: &Shadow) -> String {
    format!(
        "{}px {}px {}px {}",
        shadow.offset_x,
        shadow.offset_y,
        shadow.blur,
        shadow.color.to_hex()
    )
}

/// Position, size and the rotate/flip transform of a block.
fn frame_css(frame: &Frame, flip_h: bool, flip_v: bool) -> String {
    let mut css = format!(
        "left: {}px; top: {}px; width: {}px; height: {}px;",
        frame.x, frame.y, frame.width, frame.height
    );
    let mut transforms = Vec::new();
    if frame.rotate != 0.0 {
        transforms.push(format!("rotate({}deg)", frame.rotate));
    }
    if flip_h {
        transforms.push("scaleX(-1)".to_string());
    }
    if flip_v {
        transforms.push("scaleY(-1)".to_string());
    }
    if !transforms.is_empty() {
        let _ = write!(css, " transform: {};", transforms.join(" "));
    }
    css
}

fn opacity_css(opacity: f64) -> String {
    if opacity < 1.0 {
        format!(" opacity: {opacity};")
    } else {
        String::new()
    }
}

fn write_text(html: &mut String, text: &LayoutText) -> RenderResult<()> {
    let style = &text.style;
    let mut css = frame_css(&text.frame, false, false);
    css.push_str(&opacity_css(style.opacity));
    let _ = write!(
        css,
        " padding: {}px; overflow: hidden; display: flex; flex-direction: column; justify-content: {};",
        style.padding,
        match style.vertical_align {
            VerticalAlign::Top => "flex-start",
            VerticalAlign::Middle => "center",
            VerticalAlign::Bottom => "flex-end",
        }
    );
    if let Some(spacing) = style.letter_spacing {
        let _ = write!(css, " letter-spacing: {spacing}px;");
    }
    if let Some(color) = style.background_color {
        let _ = write!(css, " background-color: {};", color.to_hex());
    }
    if style.vertical {
        css.push_str(" writing-mode: vertical-rl;");
    }
    if let Some(border) = &style.border {
        css.push(' ');
        css.push_str(&border_css(border));
    }
    if let Some(shadow) = &style.shadow {
        let _ = write!(css, " box-shadow: {};", shadow_css(shadow));
    }
    writeln!(
        html,
        "<div class=\"el text\" data-id=\"{}\" style=\"{}\">{}</div>",
        escape_html(&text.id),
        escape_html(&css),
        runs_to_html(&text.runs, &style.paragraph)
    )?;
    Ok(())
}

fn write_image(html: &mut String, image: &LayoutImage) -> RenderResult<()> {
    let style = &image.style;
    let mut css = frame_css(&image.frame, style.flip_h, style.flip_v);
    let _ = write!(css, " object-fit: {};", css_text(&style.object_fit));
    css.push_str(&opacity_css(style.opacity));
    if let Some(border) = &style.border {
        css.push(' ');
        css.push_str(&border_css(border));
    }
    if let Some(shadow) = &style.shadow {
        let _ = write!(css, " box-shadow: {};", shadow_css(shadow));
    }
    writeln!(
        html,
        "<img class=\"el image\" data-id=\"{}\" src=\"{}\" alt=\"\" style=\"{}\">",
        escape_html(&image.id),
        escape_html(&image.src),
        escape_html(&css)
    )?;
    Ok(())
}

fn write_shape(html: &mut String, shape: &LayoutShape) -> RenderResult<()> {
    let style = &shape.style;
    let mut css = frame_css(&shape.frame, style.flip_h, style.flip_v);
    css.push_str(&opacity_css(style.opacity));

    let Some(path) = &shape.path else {
        // Plain box: rectangle-like primitives.
        if let Some(fill) = &style.fill {
            let _ = write!(css, " background: {};", fill_css(fill));
        }
        if style.radius > 0.0 {
            let _ = write!(css, " border-radius: {}px;", style.radius);
        }
        if let Some(border) = &style.border {
            css.push(' ');
            css.push_str(&border_css(border));
        }
        if let Some(shadow) = &style.shadow {
            let _ = write!(css, " box-shadow: {};", shadow_css(shadow));
        }
        writeln!(
            html,
            "<div class=\"el shape\" data-id=\"{}\" style=\"{}\"></div>",
            escape_html(&shape.id),
            escape_html(&css)
        )?;
        return Ok(());
    };

    if let Some(shadow) = &style.shadow {
        let _ = write!(css, " filter: drop-shadow({});", shadow_css(shadow));
    }
    let view_box = shape
        .view_box
        .clone()
        .unwrap_or_else(|| format!("0 0 {} {}", shape.frame.width, shape.frame.height));
    let gradient_id = format!("fill-{}", shape.id);
    let mut defs = String::new();
    let fill = match &style.fill {
        Some(Fill::Solid { color }) => color.to_hex(),
        Some(Fill::Gradient(gradient)) => {
            defs = svg_gradient(&gradient_id, gradient);
            format!("url(#{gradient_id})")
        }
        None if style.border.is_some() => "none".to_string(),
        None => FALLBACK_FILL.to_string(),
    };
    let mut stroke = String::new();
    if let Some(border) = &style.border {
        let _ = write!(
            stroke,
            " stroke=\"{}\" stroke-width=\"{}\" vector-effect=\"non-scaling-stroke\"",
            border.color.to_hex(),
            border.width
        );
        match border.style.as_css() {
            "dashed" => {
                let _ = write!(stroke, " stroke-dasharray=\"{} {}\"", border.width * 4.0, border.width * 2.0);
            }
            "dotted" => {
                let _ = write!(stroke, " stroke-dasharray=\"{} {}\"", border.width, border.width);
            }
            _ => {}
        }
    }
    writeln!(
        html,
        "<div class=\"el shape\" data-id=\"{}\" style=\"{}\"><svg width=\"100%\" height=\"100%\" viewBox=\"{}\" preserveAspectRatio=\"none\">{}<path d=\"{}\" fill=\"{}\"{} /></svg></div>",
        escape_html(&shape.id),
        escape_html(&css),
        escape_html(&view_box),
        defs,
        escape_html(path),
        escape_html(&fill),
        stroke
    )?;
    Ok(())
}

fn svg_gradient(id: &str, gradient: &Gradient) -> String {
    let stops: String = gradient
        .stops
        .iter()
        .map(|stop| {
            format!(
                "<stop offset=\"{}\" stop-color=\"{}\" />",
                stop.offset,
                stop.color.to_hex()
            )
        })
        .collect();
    match gradient.kind {
        // CSS angles start at "to top"; SVG gradients run left to right.
        GradientKind::Linear => format!(
            "<defs><linearGradient id=\"{}\" gradientTransform=\"rotate({} 0.5 0.5)\">{stops}</linearGradient></defs>",
            escape_html(id),
            gradient.angle - 90.0
        ),
        GradientKind::Radial => format!(
            "<defs><radialGradient id=\"{}\">{stops}</radialGradient></defs>",
            escape_html(id)
        ),
    }
}

/// Escape text for element content and double-quoted attributes.
pub fn escape_html(value: &str) -> String {
    escape(value).into_owned()
}

/// Free text inside a `<style>` block: drop characters that could end a rule or the block.
fn css_text(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, '<' | '>' | '{' | '}' | ';')).collect()
}

/// A URL inside `url('...')`.
fn css_url(value: &str) -> String {
    css_text(value)
        .replace('\\', "%5C")
        .replace('\'', "%27")
        .replace(['\n', '\r'], "")
}
