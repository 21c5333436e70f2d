//! Styled runs to and from the inline HTML used by text boxes in the project format.
//!
//! Encoding writes one `<p>` carrying the paragraph style and one `<span>` per
//! run with every character attribute spelled out, so decoding our own output
//! reproduces the runs exactly. Decoding also accepts the looser markup other
//! tools write (`<b>`, `<em>`, several paragraphs, `<br>`), and falls back to
//! a single tag-stripped run when the markup is not well formed.

use super::tables::{css_font_family, normalize_font};
use crate::style::{Color, FontStyle, ParagraphStyle, TextAlign, TextRun, TextStyle};
use quick_xml::escape::{escape, unescape};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::fmt::Write;

/// Runs and paragraph style decoded from a content string.
#[derive(Debug, Clone, PartialEq)]
pub struct RichText {
    pub runs: Vec<TextRun>,
    pub paragraph: ParagraphStyle,
}

/// Encode runs as a single styled paragraph.
pub fn runs_to_html(runs: &[TextRun], paragraph: &ParagraphStyle) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        "<p style=\"text-align:{};line-height:{};text-indent:{}px;margin-top:{}px;margin-bottom:{}px\">",
        paragraph.align.as_css(),
        paragraph.line_height,
        paragraph.indent,
        paragraph.space_before,
        paragraph.space_after,
    );
    for run in runs {
        let _ = write!(html, "<span style=\"{}\">", escape(&span_css(&run.style)));
        let mut lines = run.text.split('\n');
        if let Some(first) = lines.next() {
            html.push_str(&escape(first));
        }
        for line in lines {
            html.push_str("<br/>");
            html.push_str(&escape(line));
        }
        html.push_str("</span>");
    }
    html.push_str("</p>");
    html
}

/// Inline CSS declarations for one run.
pub fn span_css(style: &TextStyle) -> String {
    format!(
        "font-family:{};font-size:{}px;font-weight:{};font-style:{};color:{};text-decoration:{}",
        css_font_family(&style.font_family),
        style.font_size,
        style.font_weight,
        match style.font_style {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        },
        style.color.to_hex(),
        if style.underline { "underline" } else { "none" },
    )
}

/// Decode a content string. `base` styles text that carries no explicit style
/// and `paragraph` supplies paragraph values the markup leaves out.
pub fn html_to_runs(content: &str, base: &TextStyle, paragraph: &ParagraphStyle) -> RichText {
    match parse_markup(content, base, paragraph) {
        Some(rich) => rich,
        None => {
            log::debug!("Malformed text content, keeping plain text only");
            let text = strip_tags(content);
            let runs = if text.is_empty() {
                Vec::new()
            } else {
                vec![TextRun::new(text, base.clone())]
            };
            RichText {
                runs,
                paragraph: paragraph.clone(),
            }
        }
    }
}

struct Decoder {
    runs: Vec<TextRun>,
    paragraph: ParagraphStyle,
    styles: Vec<TextStyle>,
    /// One entry per open element above the base style: for spans, the run
    /// count when the span opened.
    spans: Vec<Option<usize>>,
    pending: String,
    paragraphs: usize,
}

impl Decoder {
    fn current(&self) -> &TextStyle {
        // the stack is seeded with the base style and never emptied below it
        &self.styles[self.styles.len() - 1]
    }

    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.pending);
        let style = self.current().clone();
        self.runs.push(TextRun::new(text, style));
    }

    /// A new paragraph ends the text before it with a line break.
    fn paragraph_break(&mut self) {
        if self.pending.is_empty() {
            if let Some(last) = self.runs.last_mut() {
                last.text.push('\n');
                return;
            }
        }
        self.pending.push('\n');
    }

    fn open(&mut self, element: &BytesStart<'_>) {
        self.flush();
        let name = element.name().as_ref().to_ascii_lowercase();
        let css = style_attribute(element);
        let mut style = self.current().clone();
        match name.as_slice() {
            b"p" | b"div" => {
                if self.paragraphs > 0 {
                    self.paragraph_break();
                } else if let Some(css) = &css {
                    apply_paragraph_css(&mut self.paragraph, css);
                }
                self.paragraphs += 1;
            }
            b"b" | b"strong" => style.font_weight = 700,
            b"i" | b"em" => style.font_style = FontStyle::Italic,
            b"u" => style.underline = true,
            _ => {}
        }
        if let Some(css) = &css {
            apply_span_css(&mut style, css);
        }
        self.styles.push(style);
        self.spans
            .push((name.as_slice() == b"span").then_some(self.runs.len()));
    }

    fn close(&mut self) {
        self.flush();
        if self.styles.len() > 1 {
            // An empty span still carries a run of its own.
            if let Some(Some(start)) = self.spans.pop() {
                if self.runs.len() == start {
                    let style = self.current().clone();
                    self.runs.push(TextRun::new("", style));
                }
            }
            self.styles.pop();
        }
    }
}

fn parse_markup(content: &str, base: &TextStyle, paragraph: &ParagraphStyle) -> Option<RichText> {
    let mut reader = Reader::from_str(content);
    let mut decoder = Decoder {
        runs: Vec::new(),
        paragraph: paragraph.clone(),
        styles: vec![base.clone()],
        spans: Vec::new(),
        pending: String::new(),
        paragraphs: 0,
    };
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => decoder.open(&e),
            Ok(Event::End(_)) => decoder.close(),
            Ok(Event::Empty(e)) => {
                if e.name().as_ref().eq_ignore_ascii_case(b"br") {
                    decoder.pending.push('\n');
                }
            }
            Ok(Event::Text(t)) => decoder.pending.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::CData(t)) => decoder.pending.push_str(&String::from_utf8_lossy(&t)),
            Ok(Event::GeneralRef(r)) => {
                let name = String::from_utf8_lossy(&r).into_owned();
                decoder.pending.push_str(&resolve_entity(&name)?);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                log::debug!("Text content parse error at {}: {e}", reader.buffer_position());
                return None;
            }
        }
    }
    decoder.flush();
    Some(RichText {
        runs: decoder.runs,
        paragraph: decoder.paragraph,
    })
}

fn resolve_entity(name: &str) -> Option<String> {
    match name {
        "nbsp" => Some('\u{a0}'.to_string()),
        _ => unescape(&format!("&{name};")).ok().map(|s| s.into_owned()),
    }
}

fn style_attribute(element: &BytesStart<'_>) -> Option<String> {
    element
        .attributes()
        .flatten()
        .find(|attr| attr.key.as_ref() == b"style")
        .map(|attr| {
            let raw = String::from_utf8_lossy(&attr.value).into_owned();
            match unescape(&raw) {
                Ok(value) => value.into_owned(),
                Err(_) => raw,
            }
        })
}

fn declarations(css: &str) -> impl Iterator<Item = (String, &str)> {
    css.split(';').filter_map(|decl| {
        let (key, value) = decl.split_once(':')?;
        Some((key.trim().to_ascii_lowercase(), value.trim()))
    })
}

fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    let number = value
        .strip_suffix("px")
        .or_else(|| value.strip_suffix("pt"))
        .unwrap_or(value);
    number.trim().parse().ok()
}

fn parse_weight(value: &str) -> Option<u16> {
    match value.to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(700),
        "normal" | "lighter" => Some(400),
        other => other.parse().ok(),
    }
}

fn apply_span_css(style: &mut TextStyle, css: &str) {
    for (key, value) in declarations(css) {
        match key.as_str() {
            "font-family" => {
                if let Some(family) = normalize_font(value) {
                    style.font_family = family;
                }
            }
            "font-size" => {
                if let Some(size) = parse_length(value) {
                    style.font_size = size;
                }
            }
            "font-weight" => {
                if let Some(weight) = parse_weight(value) {
                    style.font_weight = weight;
                }
            }
            "font-style" => {
                style.font_style = if value.eq_ignore_ascii_case("italic") {
                    FontStyle::Italic
                } else {
                    FontStyle::Normal
                };
            }
            "color" => {
                if let Some(color) = Color::parse(value) {
                    style.color = color;
                }
            }
            "text-decoration" | "text-decoration-line" => {
                style.underline = value.to_ascii_lowercase().contains("underline");
            }
            _ => {}
        }
    }
}

fn apply_paragraph_css(paragraph: &mut ParagraphStyle, css: &str) {
    for (key, value) in declarations(css) {
        match key.as_str() {
            "text-align" => paragraph.align = TextAlign::from_css(value),
            "line-height" => {
                let parsed = match value.strip_suffix('%') {
                    Some(pct) => pct.trim().parse::<f64>().ok().map(|p| p / 100.0),
                    None => value.parse().ok(),
                };
                if let Some(line_height) = parsed {
                    paragraph.line_height = line_height;
                }
            }
            "text-indent" => {
                if let Some(indent) = parse_length(value) {
                    paragraph.indent = indent;
                }
            }
            "margin-top" => {
                if let Some(space) = parse_length(value) {
                    paragraph.space_before = space;
                }
            }
            "margin-bottom" => {
                if let Some(space) = parse_length(value) {
                    paragraph.space_after = space;
                }
            }
            _ => {}
        }
    }
}

/// Plain text of loosely formed markup.
fn strip_tags(content: &str) -> String {
    let mut text = String::with_capacity(content.len());
    let mut in_tag = false;
    for c in content.chars() {
        match c {
            '<' => in_tag = true,
            '>' if in_tag => in_tag = false,
            _ if !in_tag => text.push(c),
            _ => {}
        }
    }
    match unescape(&text) {
        Ok(unescaped) => unescaped.into_owned(),
        Err(_) => text,
    }
}
