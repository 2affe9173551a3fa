//! Styled-text codec
//!
//! Display text enters the library as legacy strings. The older era puts
//! those on the wire unchanged; the newer eras want a styled tree. `TextNode`
//! is the in-memory form, with conversions in both directions.

use scorebar_core::{
    hex_to_legacy, is_valid_hex_color, ScorebarError, ScorebarResult, TextColor, COLOR_CHAR,
};

use crate::nbt::NbtTag;

const TAG_TEXT: &str = "text";
const TAG_COLOR: &str = "color";
const TAG_OBFUSCATED: &str = "obfuscated";
const TAG_BOLD: &str = "bold";
const TAG_STRIKETHROUGH: &str = "strikethrough";
const TAG_UNDERLINED: &str = "underlined";
const TAG_ITALIC: &str = "italic";
const TAG_EXTRA: &str = "extra";

/// One node of styled text: a run of characters, its styling, and ordered
/// child runs. `color` is either a lowercase color name or a `#rrggbb` hex
/// string.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TextNode {
    pub text: String,
    pub color: Option<String>,
    pub obfuscated: bool,
    pub bold: bool,
    pub strikethrough: bool,
    pub underlined: bool,
    pub italic: bool,
    pub children: Vec<TextNode>,
}

impl TextNode {
    pub fn plain(text: impl Into<String>) -> Self {
        TextNode {
            text: text.into(),
            ..TextNode::default()
        }
    }

    fn is_plain(&self) -> bool {
        self.color.is_none()
            && !self.obfuscated
            && !self.bold
            && !self.strikethrough
            && !self.underlined
            && !self.italic
            && self.children.is_empty()
    }

    /// Scans a legacy string into a styled tree. The root is a pure container
    /// with one child per styled run.
    ///
    /// Scan rules:
    /// - marker + format letter sets that flag;
    /// - marker + color letter sets the color and clears every flag;
    /// - `§x` followed by six marker/digit pairs sets a hex color (clearing
    ///   flags); an invalid hex sequence falls through to plain code handling;
    /// - pending text flushes as a child carrying the state active before the
    ///   code took effect;
    /// - unknown codes vanish without flushing; a trailing lone marker drops.
    pub fn from_legacy(text: &str) -> Self {
        if text.is_empty() {
            return TextNode::plain("");
        }

        let chars: Vec<char> = text.chars().collect();
        let mut root = TextNode::plain("");

        let mut run = String::new();
        let mut color: Option<String> = None;
        let mut flags = [false; 5];

        let flush = |root: &mut TextNode, run: &mut String, color: &Option<String>, flags: &[bool; 5]| {
            if !run.is_empty() {
                root.children.push(TextNode {
                    text: std::mem::take(run),
                    color: color.clone(),
                    obfuscated: flags[0],
                    bold: flags[1],
                    strikethrough: flags[2],
                    underlined: flags[3],
                    italic: flags[4],
                    children: Vec::new(),
                });
            }
        };

        let mut i = 0;
        while i < chars.len() {
            let c = chars[i];

            if c != COLOR_CHAR {
                run.push(c);
                i += 1;
                continue;
            }

            i += 1;
            if i >= chars.len() {
                break;
            }
            let code = chars[i].to_ascii_lowercase();

            if code == 'x' && i + 12 < chars.len() {
                let mut hex = String::with_capacity(7);
                hex.push('#');
                for j in 0..6 {
                    hex.push(chars[i + 2 + j * 2]);
                }
                if is_valid_hex_color(&hex) {
                    flush(&mut root, &mut run, &color, &flags);
                    color = Some(hex.to_ascii_lowercase());
                    flags = [false; 5];
                    i += 13;
                    continue;
                }
            }

            let Some(format) = TextColor::by_char(code) else {
                i += 1;
                continue;
            };

            flush(&mut root, &mut run, &color, &flags);

            match format {
                TextColor::Obfuscated => flags[0] = true,
                TextColor::Bold => flags[1] = true,
                TextColor::Strikethrough => flags[2] = true,
                TextColor::Underline => flags[3] = true,
                TextColor::Italic => flags[4] = true,
                other => {
                    if other.is_color() {
                        color = Some(other.name().to_string());
                    }
                    flags = [false; 5];
                }
            }
            i += 1;
        }

        flush(&mut root, &mut run, &color, &flags);
        root
    }

    /// Renders the tree back into a legacy string: this node's markers and
    /// text first, then each child in order. No resets between runs.
    pub fn to_legacy(&self) -> String {
        let mut out = String::new();
        self.render_legacy(&mut out);
        for child in &self.children {
            child.render_legacy(&mut out);
        }
        out
    }

    fn render_legacy(&self, out: &mut String) {
        if let Some(color) = &self.color {
            if let Some(named) = TextColor::by_name(color) {
                out.push_str(&named.to_string());
            } else {
                out.push_str(&hex_to_legacy(color));
            }
        }
        if self.obfuscated {
            out.push_str(&TextColor::Obfuscated.to_string());
        }
        if self.bold {
            out.push_str(&TextColor::Bold.to_string());
        }
        if self.strikethrough {
            out.push_str(&TextColor::Strikethrough.to_string());
        }
        if self.underlined {
            out.push_str(&TextColor::Underline.to_string());
        }
        if self.italic {
            out.push_str(&TextColor::Italic.to_string());
        }
        out.push_str(&self.text);
    }

    /// Converts to the tag-tree wire form. An unstyled childless node is a
    /// bare String tag; anything else is a Compound with flag tags present
    /// only when set and children under `extra`. Children are always
    /// Compounds, list elements must share one tag type.
    pub fn to_nbt(&self) -> NbtTag {
        if self.is_plain() {
            return NbtTag::String(self.text.clone());
        }
        self.to_compound()
    }

    fn to_compound(&self) -> NbtTag {
        let mut entries = vec![(TAG_TEXT.to_string(), NbtTag::String(self.text.clone()))];
        self.push_style(&mut entries);
        if !self.children.is_empty() {
            let extra = self.children.iter().map(TextNode::to_compound).collect();
            entries.push((TAG_EXTRA.to_string(), NbtTag::List(extra)));
        }
        NbtTag::Compound(entries)
    }

    fn push_style(&self, entries: &mut Vec<(String, NbtTag)>) {
        if let Some(color) = &self.color {
            entries.push((TAG_COLOR.to_string(), NbtTag::String(color.clone())));
        }
        for (name, set) in [
            (TAG_OBFUSCATED, self.obfuscated),
            (TAG_BOLD, self.bold),
            (TAG_STRIKETHROUGH, self.strikethrough),
            (TAG_UNDERLINED, self.underlined),
            (TAG_ITALIC, self.italic),
        ] {
            if set {
                entries.push((name.to_string(), NbtTag::Byte(1)));
            }
        }
    }

    /// Decodes the tag-tree wire form. String tags are plain text, Compounds
    /// carry styling and children, anything else is malformed.
    pub fn from_nbt(tag: &NbtTag) -> ScorebarResult<Self> {
        match tag {
            NbtTag::String(text) => Ok(TextNode::plain(text.clone())),
            NbtTag::Compound(_) => {
                let text = match tag.get(TAG_TEXT) {
                    Some(NbtTag::String(text)) => text.clone(),
                    _ => String::new(),
                };
                let color = match tag.get(TAG_COLOR) {
                    Some(NbtTag::String(color)) => Some(color.clone()),
                    _ => None,
                };
                let flag = |name| matches!(tag.get(name), Some(NbtTag::Byte(b)) if *b != 0);

                let mut children = Vec::new();
                if let Some(NbtTag::List(extra)) = tag.get(TAG_EXTRA) {
                    for child in extra {
                        children.push(TextNode::from_nbt(child)?);
                    }
                }

                Ok(TextNode {
                    text,
                    color,
                    obfuscated: flag(TAG_OBFUSCATED),
                    bold: flag(TAG_BOLD),
                    strikethrough: flag(TAG_STRIKETHROUGH),
                    underlined: flag(TAG_UNDERLINED),
                    italic: flag(TAG_ITALIC),
                    children,
                })
            }
            other => Err(ScorebarError::InvalidWireFormat(format!(
                "tag type {} is not a text component",
                other.type_id()
            ))),
        }
    }
}
