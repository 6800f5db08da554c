//! A small visual tree for the images.
//!
//! Only a flexbox subset is available: rows and columns, `justify` start,
//! center or space-between, `align` start, center or stretch, gaps and
//! padding. There is no grid and no absolute positioning. Text is measured
//! with an average glyph advance, so wrapping is approximate.

use std::borrow::Cow;
use std::fmt::Write;

use quick_xml::escape::escape;

/// Average advance of a glyph relative to the font size.
const GLYPH_ADVANCE: f32 = 0.56;
const BOLD_FACTOR: f32 = 1.06;
/// Distance from the top of a line box to the baseline, relative to the font size.
const ASCENT: f32 = 0.8;
/// Keeps a measured text on the same lines once it is placed in a box of exactly its width.
const WRAP_TOLERANCE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Direction {
    Row,
    Column,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Justify {
    Start,
    Center,
    SpaceBetween,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Align {
    Start,
    Center,
    Stretch,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TextAlign {
    Start,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientDirection {
    /// 135deg
    Diagonal,
    /// to bottom
    Down,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Paint {
    Solid(String),
    Gradient {
        direction: GradientDirection,
        from: String,
        to: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Flex {
    pub direction: Direction,
    pub justify: Justify,
    pub align: Align,
    pub gap: f32,
    pub padding: f32,
    pub radius: f32,
    pub background: Option<Paint>,
    pub children: Vec<Node>,
}

/// Rounded background behind a text, e.g. a badge.
#[derive(Debug, Clone, PartialEq)]
pub struct Pill {
    pub fill: String,
    pub opacity: f32,
    pub padding_x: f32,
    pub padding_y: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub content: String,
    pub font_size: f32,
    pub font_weight: u16,
    pub color: String,
    pub line_height: f32,
    pub letter_spacing: f32,
    pub uppercase: bool,
    pub max_width: Option<f32>,
    pub align: TextAlign,
    pub pill: Option<Pill>,
    /// Paints the first letter of every word in this color.
    pub initials: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Flex(Flex),
    Text(Text),
}

impl From<Flex> for Node {
    fn from(value: Flex) -> Self {
        Node::Flex(value)
    }
}

impl From<Text> for Node {
    fn from(value: Text) -> Self {
        Node::Text(value)
    }
}

impl Flex {
    fn new(direction: Direction) -> Self {
        Flex {
            direction,
            justify: Justify::Start,
            align: Align::Start,
            gap: 0.0,
            padding: 0.0,
            radius: 0.0,
            background: None,
            children: vec![],
        }
    }

    pub fn row() -> Self {
        Self::new(Direction::Row)
    }

    pub fn column() -> Self {
        Self::new(Direction::Column)
    }

    pub fn justify(mut self, justify: Justify) -> Self {
        self.justify = justify;
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn gap(mut self, gap: f32) -> Self {
        self.gap = gap;
        self
    }

    pub fn padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    pub fn radius(mut self, radius: f32) -> Self {
        self.radius = radius;
        self
    }

    pub fn background(mut self, paint: Paint) -> Self {
        self.background = Some(paint);
        self
    }

    pub fn child(mut self, child: impl Into<Node>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn child_opt(self, child: Option<impl Into<Node>>) -> Self {
        match child {
            Some(child) => self.child(child),
            None => self,
        }
    }
}

impl Text {
    pub fn new(content: impl Into<String>, font_size: f32) -> Self {
        Text {
            content: content.into(),
            font_size,
            font_weight: 400,
            color: "#0f172a".to_string(),
            line_height: 1.2,
            letter_spacing: 0.0,
            uppercase: false,
            max_width: None,
            align: TextAlign::Start,
            pill: None,
            initials: None,
        }
    }

    pub fn weight(mut self, weight: u16) -> Self {
        self.font_weight = weight;
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = color.into();
        self
    }

    pub fn line_height(mut self, line_height: f32) -> Self {
        self.line_height = line_height;
        self
    }

    pub fn letter_spacing(mut self, spacing: f32) -> Self {
        self.letter_spacing = spacing;
        self
    }

    pub fn uppercase(mut self) -> Self {
        self.uppercase = true;
        self
    }

    pub fn max_width(mut self, max_width: f32) -> Self {
        self.max_width = Some(max_width);
        self
    }

    pub fn centered(mut self) -> Self {
        self.align = TextAlign::Center;
        self
    }

    pub fn pill(mut self, pill: Pill) -> Self {
        self.pill = Some(pill);
        self
    }

    pub fn initials(mut self, color: impl Into<String>) -> Self {
        self.initials = Some(color.into());
        self
    }

    fn display_text(&self) -> Cow<'_, str> {
        if self.uppercase {
            Cow::Owned(self.content.to_uppercase())
        } else {
            Cow::Borrowed(&self.content)
        }
    }

    fn advance(&self) -> f32 {
        let factor = if self.font_weight >= 600 { BOLD_FACTOR } else { 1.0 };
        self.font_size * GLYPH_ADVANCE * factor + self.letter_spacing
    }

    fn line_box(&self) -> f32 {
        self.font_size * self.line_height
    }

    fn pill_padding(&self) -> (f32, f32) {
        self.pill.as_ref().map(|p| (p.padding_x, p.padding_y)).unwrap_or((0.0, 0.0))
    }

    fn text_width(&self, line: &str) -> f32 {
        line.chars().count() as f32 * self.advance()
    }

    /// Greedy word wrap. A word wider than the line gets a line of its own.
    fn wrap(&self, avail_w: f32) -> Vec<String> {
        let (pad_x, _) = self.pill_padding();
        let limit = match self.max_width {
            Some(max) => max.min(avail_w),
            None => avail_w,
        } - 2.0 * pad_x + WRAP_TOLERANCE;

        let text = self.display_text();
        let mut lines: Vec<String> = vec![];
        let mut current = String::new();
        for word in text.split_whitespace() {
            if current.is_empty() {
                current.push_str(word);
                continue;
            }
            let candidate = format!("{} {}", current, word);
            if self.text_width(&candidate) <= limit {
                current = candidate;
            } else {
                lines.push(std::mem::replace(&mut current, word.to_string()));
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
        lines
    }

    fn measure(&self, avail_w: f32) -> Size {
        let lines = self.wrap(avail_w);
        let (pad_x, pad_y) = self.pill_padding();
        let widest = lines.iter().map(|l| self.text_width(l)).fold(0.0, f32::max);
        Size {
            w: widest + 2.0 * pad_x,
            h: lines.len() as f32 * self.line_box() + 2.0 * pad_y,
        }
    }

    fn place(&self, rect: Rect, out: &mut SvgWriter) {
        let lines = self.wrap(rect.w);
        if lines.is_empty() {
            return;
        }
        let (pad_x, pad_y) = self.pill_padding();

        if let Some(ref pill) = self.pill {
            let _ = write!(out.body,
                r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}" fill-opacity="{}"/>"#,
                rect.x, rect.y, rect.w, rect.h, rect.h / 2.0, escape(pill.fill.as_str()), pill.opacity);
        }

        let (x, anchor) = match self.align {
            TextAlign::Start => (rect.x + pad_x, "start"),
            TextAlign::Center => (rect.x + rect.w / 2.0, "middle"),
        };

        let _ = write!(out.body,
            r#"<text font-family="{}" font-size="{}" font-weight="{}" fill="{}" letter-spacing="{}" text-anchor="{}">"#,
            escape(out.font_family.as_str()), self.font_size, self.font_weight,
            escape(self.color.as_str()), self.letter_spacing, anchor);

        let half_leading = (self.line_box() - self.font_size) / 2.0;
        for (idx, line) in lines.iter().enumerate() {
            let baseline = rect.y + pad_y + idx as f32 * self.line_box() + half_leading + self.font_size * ASCENT;
            let _ = write!(out.body, r#"<tspan x="{}" y="{}">"#, x, baseline);
            match self.initials {
                Some(ref color) => push_initials(out, line, color),
                None => out.body.push_str(&escape(line.as_str())),
            }
            out.body.push_str("</tspan>");
        }
        out.body.push_str("</text>");
    }
}

fn push_initials(out: &mut SvgWriter, line: &str, color: &str) {
    for (idx, word) in line.split(' ').enumerate() {
        if idx > 0 {
            out.body.push(' ');
        }
        let mut chars = word.chars();
        if let Some(first) = chars.next() {
            let _ = write!(out.body, r#"<tspan fill="{}">{}</tspan>{}"#,
                           escape(color), escape(first.to_string().as_str()), escape(chars.as_str()));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Size {
    pub w: f32,
    pub h: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Rect {
    x: f32,
    y: f32,
    w: f32,
    h: f32,
}

struct SvgWriter {
    body: String,
    font_family: String,
    gradients: usize,
}

impl SvgWriter {
    fn paint(&mut self, paint: &Paint) -> String {
        match paint {
            Paint::Solid(color) => escape(color.as_str()).into_owned(),
            Paint::Gradient { direction, from, to } => {
                let id = format!("g{}", self.gradients);
                self.gradients += 1;
                let (x2, y2) = match direction {
                    GradientDirection::Diagonal => (1, 1),
                    GradientDirection::Down => (0, 1),
                };
                let _ = write!(self.body,
                    r#"<defs><linearGradient id="{}" x1="0" y1="0" x2="{}" y2="{}"><stop offset="0" stop-color="{}"/><stop offset="1" stop-color="{}"/></linearGradient></defs>"#,
                    id, x2, y2, escape(from.as_str()), escape(to.as_str()));
                format!("url(#{})", id)
            }
        }
    }
}

impl Node {
    pub fn measure(&self, avail_w: f32) -> Size {
        match self {
            Node::Text(text) => text.measure(avail_w),
            Node::Flex(flex) => flex.measure(avail_w),
        }
    }

    fn place(&self, rect: Rect, out: &mut SvgWriter) {
        match self {
            Node::Text(text) => text.place(rect, out),
            Node::Flex(flex) => flex.place(rect, out),
        }
    }

    /// Lays the tree out on a `width` x `height` canvas and returns the SVG document.
    pub fn to_svg(&self, width: u32, height: u32, font_family: &str) -> String {
        let mut out = SvgWriter {
            body: String::with_capacity(4096),
            font_family: font_family.to_string(),
            gradients: 0,
        };
        let rect = Rect { x: 0.0, y: 0.0, w: width as f32, h: height as f32 };
        self.place(rect, &mut out);

        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">{body}</svg>"#,
            w = width,
            h = height,
            body = out.body,
        )
    }
}

impl Flex {
    /// Sizes of the children along (main, cross) for an inner width.
    fn child_sizes(&self, inner_w: f32) -> Vec<Size> {
        match self.direction {
            Direction::Column => self.children.iter().map(|c| c.measure(inner_w)).collect(),
            Direction::Row => {
                let mut used = 0.0;
                let mut sizes = Vec::with_capacity(self.children.len());
                for (idx, child) in self.children.iter().enumerate() {
                    let gap = if idx > 0 { self.gap } else { 0.0 };
                    let size = child.measure((inner_w - used - gap).max(0.0));
                    used += size.w + gap;
                    sizes.push(size);
                }
                sizes
            }
        }
    }

    fn gaps(&self) -> f32 {
        self.gap * self.children.len().saturating_sub(1) as f32
    }

    fn measure(&self, avail_w: f32) -> Size {
        let inner_w = (avail_w - 2.0 * self.padding).max(0.0);
        let sizes = self.child_sizes(inner_w);
        let (w, h) = match self.direction {
            Direction::Column => (
                sizes.iter().map(|s| s.w).fold(0.0, f32::max),
                sizes.iter().map(|s| s.h).sum::<f32>() + self.gaps(),
            ),
            Direction::Row => (
                sizes.iter().map(|s| s.w).sum::<f32>() + self.gaps(),
                sizes.iter().map(|s| s.h).fold(0.0, f32::max),
            ),
        };
        Size { w: w + 2.0 * self.padding, h: h + 2.0 * self.padding }
    }

    fn place(&self, rect: Rect, out: &mut SvgWriter) {
        if let Some(ref paint) = self.background {
            let fill = out.paint(paint);
            let _ = write!(out.body, r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" fill="{}"/>"#,
                           rect.x, rect.y, rect.w, rect.h, self.radius, fill);
        }

        let inner = Rect {
            x: rect.x + self.padding,
            y: rect.y + self.padding,
            w: (rect.w - 2.0 * self.padding).max(0.0),
            h: (rect.h - 2.0 * self.padding).max(0.0),
        };
        let sizes = self.child_sizes(inner.w);
        let count = self.children.len();

        let (main_len, main_total) = match self.direction {
            Direction::Column => (inner.h, sizes.iter().map(|s| s.h).sum::<f32>()),
            Direction::Row => (inner.w, sizes.iter().map(|s| s.w).sum::<f32>()),
        };
        let free = (main_len - main_total - self.gaps()).max(0.0);
        let (mut cursor, spacing) = match self.justify {
            Justify::Start => (0.0, self.gap),
            Justify::Center => (free / 2.0, self.gap),
            Justify::SpaceBetween if count > 1 => (0.0, self.gap + free / (count - 1) as f32),
            Justify::SpaceBetween => (0.0, self.gap),
        };

        for (child, size) in self.children.iter().zip(sizes) {
            let child_rect = match self.direction {
                Direction::Column => {
                    let (x, w) = cross_axis(self.align, inner.x, inner.w, size.w);
                    Rect { x, y: inner.y + cursor, w, h: size.h }
                }
                Direction::Row => {
                    let (y, h) = cross_axis(self.align, inner.y, inner.h, size.h);
                    Rect { x: inner.x + cursor, y, w: size.w, h }
                }
            };
            child.place(child_rect, out);
            cursor += match self.direction {
                Direction::Column => size.h,
                Direction::Row => size.w,
            } + spacing;
        }
    }
}

fn cross_axis(align: Align, start: f32, available: f32, wanted: f32) -> (f32, f32) {
    match align {
        Align::Start => (start, wanted.min(available)),
        Align::Center => (start + ((available - wanted) / 2.0).max(0.0), wanted.min(available)),
        Align::Stretch => (start, available),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        // advance = 10 * 0.56 = 5.6 per char, 56 px fits 10 chars
        let text = Text::new("aaaa bbbb cccc", 10.0).max_width(56.0).line_height(1.5);
        assert_eq!(text.wrap(1000.0), ["aaaa bbbb", "cccc"]);
        assert_eq!(text.measure(1000.0).h, 30.0);

        let narrow = Text::new("aaaa bbbb", 10.0);
        assert_eq!(narrow.wrap(20.0), ["aaaa", "bbbb"]);
        assert!(Text::new("   ", 10.0).wrap(100.0).is_empty());
    }

    #[test]
    fn test_column_measure() {
        let col = Flex::column()
            .padding(10.0)
            .gap(5.0)
            .child(Text::new("ab", 10.0).line_height(1.0))
            .child(Text::new("abcd", 10.0).line_height(1.0));
        let size = Node::from(col).measure(500.0);
        assert_eq!(size.h, 10.0 + 10.0 + 5.0 + 20.0);
        assert!((size.w - (4.0 * 5.6 + 20.0)).abs() < 0.001);
    }

    #[test]
    fn test_space_between_row() {
        let row = Flex::row()
            .justify(Justify::SpaceBetween)
            .child(Text::new("left", 10.0))
            .child(Text::new("right", 10.0));
        let svg = Node::from(row).to_svg(400, 100, "sans-serif");
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" width="400" height="100""#));

        let xs: Vec<f32> = svg.split(r#"<tspan x=""#)
            .skip(1)
            .map(|rest| rest[..rest.find('"').unwrap()].parse().unwrap())
            .collect();
        assert_eq!(xs.len(), 2);
        assert_eq!(xs[0], 0.0);
        // the right child ends flush with the right edge
        assert!((xs[1] - (400.0 - 5.0 * 5.6)).abs() < 0.01);
    }

    #[test]
    fn test_escaping_and_initials() {
        let text = Text::new("Tom & <Jerry>", 20.0).initials("#111827");
        let svg = Node::from(text).to_svg(600, 100, "Figtree, sans-serif");
        assert!(svg.contains(r##"<tspan fill="#111827">T</tspan>om"##));
        assert!(svg.contains("&amp;"));
        assert!(svg.contains(r##"<tspan fill="#111827">&lt;</tspan>Jerry&gt;"##));
    }

    #[test]
    fn test_gradient_background() {
        let root = Flex::column().background(Paint::Gradient {
            direction: GradientDirection::Diagonal,
            from: "#f8fafc".to_string(),
            to: "#e2e8f0".to_string(),
        });
        let svg = Node::from(root).to_svg(320, 320, "sans-serif");
        assert!(svg.contains(r#"<linearGradient id="g0" x1="0" y1="0" x2="1" y2="1">"#));
        assert!(svg.contains(r#"fill="url(#g0)""#));
    }
}
