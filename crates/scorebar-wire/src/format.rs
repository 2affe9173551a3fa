//! Score number formats
//!
//! The newest era lets an objective or an individual score override how its
//! numeric value renders. Three variants: hide the number, restyle it, or
//! replace it with fixed text.

use scorebar_core::{ScorebarError, ScorebarResult};

use crate::component::TextNode;
use crate::nbt::NbtTag;

pub const FORMAT_BLANK: i32 = 0;
pub const FORMAT_STYLED: i32 = 1;
pub const FORMAT_FIXED: i32 = 2;

/// How a score value is drawn next to its entry.
#[derive(Clone, Debug, PartialEq)]
pub enum NumberFormat {
    /// The value is hidden entirely.
    Blank,
    /// The value keeps its number but takes this styling.
    Styled(StyledFormat),
    /// The value is replaced by fixed legacy text.
    Fixed(String),
}

impl NumberFormat {
    pub fn discriminant(&self) -> i32 {
        match self {
            NumberFormat::Blank => FORMAT_BLANK,
            NumberFormat::Styled(_) => FORMAT_STYLED,
            NumberFormat::Fixed(_) => FORMAT_FIXED,
        }
    }
}

/// Styling applied to a rendered score value. Every field is optional on the
/// wire; an absent flag is not the same as a flag set to false.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StyledFormat {
    pub color: Option<String>,
    pub obfuscated: Option<bool>,
    pub bold: Option<bool>,
    pub strikethrough: Option<bool>,
    pub underlined: Option<bool>,
    pub italic: Option<bool>,
}

impl StyledFormat {
    /// Encodes as a compound holding only the fields that are set.
    pub fn to_nbt(&self) -> NbtTag {
        let mut entries = Vec::new();
        if let Some(color) = &self.color {
            entries.push(("color".to_string(), NbtTag::String(color.clone())));
        }
        for (name, flag) in [
            ("obfuscated", self.obfuscated),
            ("bold", self.bold),
            ("strikethrough", self.strikethrough),
            ("underlined", self.underlined),
            ("italic", self.italic),
        ] {
            if let Some(value) = flag {
                entries.push((name.to_string(), NbtTag::Byte(value as i8)));
            }
        }
        NbtTag::Compound(entries)
    }

    pub fn from_nbt(tag: &NbtTag) -> ScorebarResult<Self> {
        let NbtTag::Compound(_) = tag else {
            return Err(ScorebarError::InvalidWireFormat(format!(
                "tag type {} is not a style compound",
                tag.type_id()
            )));
        };
        let color = match tag.get("color") {
            Some(NbtTag::String(color)) => Some(color.clone()),
            _ => None,
        };
        let flag = |name| match tag.get(name) {
            Some(NbtTag::Byte(b)) => Some(*b != 0),
            _ => None,
        };
        Ok(StyledFormat {
            color,
            obfuscated: flag("obfuscated"),
            bold: flag("bold"),
            strikethrough: flag("strikethrough"),
            underlined: flag("underlined"),
            italic: flag("italic"),
        })
    }
}

impl NumberFormat {
    /// Tag payload following the discriminant, if the variant carries one.
    pub fn payload(&self) -> Option<NbtTag> {
        match self {
            NumberFormat::Blank => None,
            NumberFormat::Styled(style) => Some(style.to_nbt()),
            NumberFormat::Fixed(text) => Some(TextNode::from_legacy(text).to_nbt()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_has_no_payload() {
        assert_eq!(NumberFormat::Blank.discriminant(), 0);
        assert_eq!(NumberFormat::Blank.payload(), None);
    }

    #[test]
    fn test_styled_absent_is_not_false() {
        let set_false = StyledFormat {
            bold: Some(false),
            ..StyledFormat::default()
        };
        let absent = StyledFormat::default();

        let decoded_false = StyledFormat::from_nbt(&set_false.to_nbt()).unwrap();
        let decoded_absent = StyledFormat::from_nbt(&absent.to_nbt()).unwrap();

        assert_eq!(decoded_false.bold, Some(false));
        assert_eq!(decoded_absent.bold, None);
        assert_ne!(decoded_false, decoded_absent);
    }

    #[test]
    fn test_styled_roundtrip() {
        let style = StyledFormat {
            color: Some("#ff0044".to_string()),
            bold: Some(true),
            italic: Some(false),
            ..StyledFormat::default()
        };
        assert_eq!(StyledFormat::from_nbt(&style.to_nbt()).unwrap(), style);
    }

    #[test]
    fn test_fixed_payload_is_text_tree() {
        let format = NumberFormat::Fixed("§c-".to_string());
        let payload = format.payload().unwrap();
        assert!(matches!(payload, NbtTag::Compound(_)));
    }

    #[test]
    fn test_styled_rejects_non_compound() {
        assert!(StyledFormat::from_nbt(&NbtTag::Byte(0)).is_err());
    }
}
