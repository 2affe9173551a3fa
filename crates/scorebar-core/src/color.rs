//! Legacy color and format codes
//!
//! Legacy text carries styling inline: a control marker (`§`) followed by a
//! code character. Sixteen colors, five style formats and a reset, plus the
//! extended form `§x§r§r§g§g§b§b` for hex colors. This module is the single
//! source of truth for the code table and the helpers built on it.

use std::fmt;

/// The legacy control marker.
pub const COLOR_CHAR: char = '§';

/// Alternate marker accepted in caller-supplied text.
pub const ALT_COLOR_CHAR: char = '&';

/// One entry of the legacy code table. Discriminants are the wire ordinals
/// used by the team color field and the line entity names.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum TextColor {
    Black = 0,
    DarkBlue = 1,
    DarkGreen = 2,
    DarkAqua = 3,
    DarkRed = 4,
    DarkPurple = 5,
    Gold = 6,
    Gray = 7,
    DarkGray = 8,
    Blue = 9,
    Green = 10,
    Aqua = 11,
    Red = 12,
    LightPurple = 13,
    Yellow = 14,
    White = 15,
    Obfuscated = 16,
    Bold = 17,
    Strikethrough = 18,
    Underline = 19,
    Italic = 20,
    Reset = 21,
}

impl TextColor {
    /// Every entry, indexable by ordinal.
    pub const ALL: [TextColor; 22] = [
        TextColor::Black,
        TextColor::DarkBlue,
        TextColor::DarkGreen,
        TextColor::DarkAqua,
        TextColor::DarkRed,
        TextColor::DarkPurple,
        TextColor::Gold,
        TextColor::Gray,
        TextColor::DarkGray,
        TextColor::Blue,
        TextColor::Green,
        TextColor::Aqua,
        TextColor::Red,
        TextColor::LightPurple,
        TextColor::Yellow,
        TextColor::White,
        TextColor::Obfuscated,
        TextColor::Bold,
        TextColor::Strikethrough,
        TextColor::Underline,
        TextColor::Italic,
        TextColor::Reset,
    ];

    #[inline]
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn by_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    /// The code character following the marker.
    pub fn code(self) -> char {
        match self {
            TextColor::Black => '0',
            TextColor::DarkBlue => '1',
            TextColor::DarkGreen => '2',
            TextColor::DarkAqua => '3',
            TextColor::DarkRed => '4',
            TextColor::DarkPurple => '5',
            TextColor::Gold => '6',
            TextColor::Gray => '7',
            TextColor::DarkGray => '8',
            TextColor::Blue => '9',
            TextColor::Green => 'a',
            TextColor::Aqua => 'b',
            TextColor::Red => 'c',
            TextColor::LightPurple => 'd',
            TextColor::Yellow => 'e',
            TextColor::White => 'f',
            TextColor::Obfuscated => 'k',
            TextColor::Bold => 'l',
            TextColor::Strikethrough => 'm',
            TextColor::Underline => 'n',
            TextColor::Italic => 'o',
            TextColor::Reset => 'r',
        }
    }

    pub fn by_char(code: char) -> Option<Self> {
        let code = code.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|c| c.code() == code)
    }

    /// Lowercase name as it appears in tag trees (e.g. `"dark_aqua"`).
    pub fn name(self) -> &'static str {
        match self {
            TextColor::Black => "black",
            TextColor::DarkBlue => "dark_blue",
            TextColor::DarkGreen => "dark_green",
            TextColor::DarkAqua => "dark_aqua",
            TextColor::DarkRed => "dark_red",
            TextColor::DarkPurple => "dark_purple",
            TextColor::Gold => "gold",
            TextColor::Gray => "gray",
            TextColor::DarkGray => "dark_gray",
            TextColor::Blue => "blue",
            TextColor::Green => "green",
            TextColor::Aqua => "aqua",
            TextColor::Red => "red",
            TextColor::LightPurple => "light_purple",
            TextColor::Yellow => "yellow",
            TextColor::White => "white",
            TextColor::Obfuscated => "obfuscated",
            TextColor::Bold => "bold",
            TextColor::Strikethrough => "strikethrough",
            TextColor::Underline => "underline",
            TextColor::Italic => "italic",
            TextColor::Reset => "reset",
        }
    }

    pub fn by_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }

    #[inline]
    pub fn is_color(self) -> bool {
        (self as u8) <= TextColor::White as u8
    }

    /// A style format (not a color, not the reset).
    #[inline]
    pub fn is_format(self) -> bool {
        matches!(
            self,
            TextColor::Obfuscated
                | TextColor::Bold
                | TextColor::Strikethrough
                | TextColor::Underline
                | TextColor::Italic
        )
    }
}

impl fmt::Display for TextColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", COLOR_CHAR, self.code())
    }
}

/// Checks a strict `#` plus six hex digits color string.
pub fn is_valid_hex_color(value: &str) -> bool {
    let mut chars = value.chars();
    chars.next() == Some('#')
        && value.chars().skip(1).count() == 6
        && chars.all(|c| c.is_ascii_hexdigit())
}

/// Expands `#abc123` into the extended marker form `§x§a§b§c§1§2§3`.
pub fn hex_to_legacy(hex: &str) -> String {
    let mut out = String::with_capacity(14);
    out.push(COLOR_CHAR);
    out.push('x');
    for c in hex.chars().skip(1) {
        out.push(COLOR_CHAR);
        out.push(c.to_ascii_lowercase());
    }
    out
}

fn is_code_char(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c.to_ascii_lowercase(), 'k'..='o' | 'r' | 'x')
}

/// Translates `&`-prefixed codes into marker codes, lowercasing the code
/// character. When `hex` is set, `&#rrggbb` expands into the extended form
/// first; eras without hex support leave those sequences alone.
pub fn colorize(text: &str, hex: bool) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;

    while i < chars.len() {
        if hex && chars[i] == ALT_COLOR_CHAR && i + 7 < chars.len() && chars[i + 1] == '#' {
            let candidate: String = chars[i + 1..i + 8].iter().collect();
            if is_valid_hex_color(&candidate) {
                out.push_str(&hex_to_legacy(&candidate));
                i += 8;
                continue;
            }
        }
        if chars[i] == ALT_COLOR_CHAR && i + 1 < chars.len() && is_code_char(chars[i + 1]) {
            out.push(COLOR_CHAR);
            out.push(chars[i + 1].to_ascii_lowercase());
            i += 2;
            continue;
        }
        out.push(chars[i]);
        i += 1;
    }

    out
}

/// Returns the color and format markers still active at the end of `text`:
/// trailing format codes accumulate until the nearest color (or reset),
/// which terminates the scan.
pub fn last_colors(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut result = String::new();

    for i in (0..chars.len()).rev() {
        if chars[i] != COLOR_CHAR || i + 1 >= chars.len() {
            continue;
        }
        if let Some(color) = TextColor::by_char(chars[i + 1]) {
            result.insert_str(0, &color.to_string());
            if color.is_color() || color == TextColor::Reset {
                break;
            }
        }
    }

    result
}
