//! Layout primitives carried by every element of a rendered snapshot.
//!
//! The engine never computes layout. A renderer (or the annotated loader)
//! hands it a content rectangle, a client size and the computed style that
//! matter to the heuristics.

use serde::{Deserialize, Serialize};

/// Axis-aligned bounding rectangle in document coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[must_use]
    pub const fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self { left, top, width, height }
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Horizontal centre.
    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }

    /// Vertical centre.
    #[must_use]
    pub fn center_y(&self) -> f64 {
        self.top + self.height / 2.0
    }

    /// A rectangle with no extent in either direction.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest rectangle covering both. Empty rectangles are ignored.
    #[must_use]
    pub fn union(&self, other: &Rect) -> Rect {
        if self.is_empty() {
            return *other;
        }
        if other.is_empty() {
            return *self;
        }
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }
}

/// Inner size of an element's padding box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientSize {
    pub width: f64,
    pub height: f64,
}

impl ClientSize {
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Display {
    Inline,
    Block,
    InlineBlock,
    ListItem,
    Table,
    TableRow,
    TableCell,
    Flex,
    None,
}

impl Display {
    fn parse(value: &str) -> Option<Self> {
        Some(match value {
            "inline" => Self::Inline,
            "block" => Self::Block,
            "inline-block" => Self::InlineBlock,
            "list-item" => Self::ListItem,
            "table" => Self::Table,
            "table-row" => Self::TableRow,
            "table-cell" => Self::TableCell,
            "flex" | "grid" => Self::Flex,
            "none" => Self::None,
            _ => return None,
        })
    }

    /// Whether the box starts a new line in rendered text.
    #[must_use]
    pub fn is_block_level(self) -> bool {
        !matches!(self, Self::Inline | Self::InlineBlock | Self::TableCell | Self::None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Visibility {
    Visible,
    Hidden,
    Collapse,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Float {
    None,
    Left,
    Right,
}

impl Float {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FontStyle {
    Normal,
    Italic,
    Oblique,
}

impl FontStyle {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Italic => "italic",
            Self::Oblique => "oblique",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ltr,
    Rtl,
}

/// Normal font weight in numeric form.
pub const FONT_WEIGHT_NORMAL: u16 = 400;
/// Bold font weight in numeric form.
pub const FONT_WEIGHT_BOLD: u16 = 700;

/// The subset of computed style the heuristics read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: Display,
    pub visibility: Visibility,
    pub float: Float,
    /// Font size in pixels.
    pub font_size: f64,
    pub font_style: FontStyle,
    pub font_weight: u16,
    /// Line height in pixels, `None` for `normal`.
    pub line_height: Option<f64>,
    pub direction: Direction,
    pub font_family: String,
    /// Width as declared by the page's own styles, if any.
    pub declared_width: Option<String>,
}

impl ComputedStyle {
    /// Initial values of every property.
    pub const INITIAL: ComputedStyle = ComputedStyle {
        display: Display::Inline,
        visibility: Visibility::Visible,
        float: Float::None,
        font_size: 16.0,
        font_style: FontStyle::Normal,
        font_weight: FONT_WEIGHT_NORMAL,
        line_height: None,
        direction: Direction::Ltr,
        font_family: String::new(),
        declared_width: None,
    };

    /// Default style of an element before any author declarations.
    ///
    /// Inherited properties come from `parent`, the rest from the element's
    /// tag the way a user-agent stylesheet would set them.
    #[must_use]
    pub fn for_tag(tag: &str, parent: Option<&ComputedStyle>) -> Self {
        let mut style = match parent {
            Some(parent) => Self {
                display: Display::Inline,
                float: Float::None,
                declared_width: None,
                ..parent.clone()
            },
            None => Self::INITIAL,
        };

        style.display = match tag {
            "head" | "script" | "style" | "title" | "meta" | "link" | "noscript" | "template" => {
                Display::None
            }
            "li" => Display::ListItem,
            "table" => Display::Table,
            "tr" => Display::TableRow,
            "td" | "th" => Display::TableCell,
            t if is_inline_tag(t) => Display::Inline,
            _ => Display::Block,
        };

        match tag {
            "b" | "strong" | "th" => style.font_weight = FONT_WEIGHT_BOLD,
            "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
                style.font_weight = FONT_WEIGHT_BOLD;
                let scale = match tag {
                    "h1" => 2.0,
                    "h2" => 1.5,
                    "h3" => 1.17,
                    "h4" => 1.0,
                    "h5" => 0.83,
                    _ => 0.67,
                };
                style.font_size *= scale;
            }
            "i" | "em" | "cite" | "var" | "address" => style.font_style = FontStyle::Italic,
            _ => {}
        }
        style
    }

    /// Apply `name: value` declarations such as `float: left; font-size: 18px`.
    ///
    /// Unknown properties and unparseable values are ignored.
    pub fn apply_declarations(&mut self, declarations: &str) {
        for declaration in declarations.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            let lower = value.to_ascii_lowercase();
            match name.as_str() {
                "display" => {
                    if let Some(display) = Display::parse(&lower) {
                        self.display = display;
                    }
                }
                "visibility" => {
                    self.visibility = match lower.as_str() {
                        "hidden" => Visibility::Hidden,
                        "collapse" => Visibility::Collapse,
                        _ => Visibility::Visible,
                    };
                }
                "float" => {
                    self.float = match lower.as_str() {
                        "left" => Float::Left,
                        "right" => Float::Right,
                        _ => Float::None,
                    };
                }
                "font-size" => {
                    if let Some(px) = parse_px(&lower) {
                        self.font_size = px;
                    }
                }
                "font-style" => {
                    self.font_style = match lower.as_str() {
                        "italic" => FontStyle::Italic,
                        "oblique" => FontStyle::Oblique,
                        _ => FontStyle::Normal,
                    };
                }
                "font-weight" => {
                    self.font_weight = match lower.as_str() {
                        "normal" => FONT_WEIGHT_NORMAL,
                        "bold" => FONT_WEIGHT_BOLD,
                        other => other.parse().unwrap_or(self.font_weight),
                    };
                }
                "line-height" => {
                    self.line_height = if lower == "normal" { None } else { parse_px(&lower) };
                }
                "direction" => {
                    self.direction = if lower == "rtl" { Direction::Rtl } else { Direction::Ltr };
                }
                "font-family" => self.font_family = value.to_string(),
                "width" => self.declared_width = Some(value.to_string()),
                _ => {}
            }
        }
    }

    /// Visible in the CSS sense: displayed and not hidden.
    #[must_use]
    pub fn is_shown(&self) -> bool {
        self.display != Display::None && self.visibility == Visibility::Visible
    }

    #[must_use]
    pub fn is_floating(&self) -> bool {
        self.float != Float::None
    }

    /// Line height in pixels, resolving `normal` against the font size.
    #[must_use]
    pub fn resolved_line_height(&self, normal_ratio: f64) -> f64 {
        self.line_height.unwrap_or(self.font_size * normal_ratio)
    }
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self::INITIAL
    }
}

/// Geometry and style of a single element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    /// Border box; `None` when the renderer produced no box.
    pub rect: Option<Rect>,
    /// Client area; `None` when the renderer did not report one.
    pub client: Option<ClientSize>,
    pub style: ComputedStyle,
}

fn is_inline_tag(tag: &str) -> bool {
    matches!(
        tag,
        "a" | "abbr"
            | "b"
            | "bdi"
            | "bdo"
            | "br"
            | "cite"
            | "code"
            | "data"
            | "dfn"
            | "em"
            | "font"
            | "i"
            | "img"
            | "input"
            | "kbd"
            | "label"
            | "mark"
            | "q"
            | "s"
            | "samp"
            | "select"
            | "small"
            | "span"
            | "strike"
            | "strong"
            | "sub"
            | "sup"
            | "time"
            | "tt"
            | "u"
            | "var"
            | "wbr"
            | "iframe"
            | "embed"
            | "object"
            | "canvas"
            | "svg"
            | "video"
            | "audio"
            | "button"
            | "textarea"
    )
}

/// Parse a CSS length in pixels (`18px`, `18`, `1.5em` relative to 16).
fn parse_px(value: &str) -> Option<f64> {
    let value = value.trim();
    if let Some(number) = value.strip_suffix("px") {
        return number.trim().parse().ok();
    }
    if let Some(number) = value.strip_suffix("em") {
        return number.trim().parse::<f64>().ok().map(|em| em * 16.0);
    }
    value.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn union_ignores_empty_rects() {
        let a = Rect::new(10.0, 10.0, 100.0, 50.0);
        let b = Rect::new(50.0, 40.0, 100.0, 100.0);
        assert_eq!(a.union(&b), Rect::new(10.0, 10.0, 140.0, 130.0));
        assert_eq!(a.union(&Rect::default()), a);
        assert_eq!(Rect::default().union(&b), b);
    }

    #[test]
    fn tag_defaults_inherit_font() {
        let mut parent = ComputedStyle::for_tag("div", None);
        parent.apply_declarations("font-size: 20px; font-family: Georgia; float: left");
        let strong = ComputedStyle::for_tag("strong", Some(&parent));

        assert_eq!(strong.font_size, 20.0);
        assert_eq!(strong.font_family, "Georgia");
        assert_eq!(strong.font_weight, FONT_WEIGHT_BOLD);
        assert_eq!(strong.display, Display::Inline);
        assert_eq!(strong.float, Float::None);
    }

    #[test]
    fn declarations_parse() {
        let mut style = ComputedStyle::default();
        style.apply_declarations(
            "display:block; visibility: hidden; font-weight: 600; line-height: 24px; direction: rtl; width: 40%",
        );
        assert_eq!(style.display, Display::Block);
        assert!(!style.is_shown());
        assert_eq!(style.font_weight, 600);
        assert_eq!(style.line_height, Some(24.0));
        assert_eq!(style.direction, Direction::Rtl);
        assert_eq!(style.declared_width.as_deref(), Some("40%"));
        assert_eq!(style.resolved_line_height(1.125), 24.0);
    }

    #[test]
    fn hidden_tags_default_to_display_none() {
        assert_eq!(ComputedStyle::for_tag("script", None).display, Display::None);
        assert_eq!(ComputedStyle::for_tag("p", None).display, Display::Block);
        assert_eq!(ComputedStyle::for_tag("span", None).display, Display::Inline);
    }
}
