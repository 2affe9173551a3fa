//! Era codec strategy
//!
//! The packet schemas keep display text as legacy strings and delegate the
//! era-dependent wire form to a codec object. One stateless codec per era,
//! selected once by `codec_for`; schemas never branch on the era for text or
//! number formats themselves.

use scorebar_core::{ProtocolEra, ScorebarError, ScorebarResult};

use crate::component::TextNode;
use crate::format::{NumberFormat, StyledFormat, FORMAT_BLANK, FORMAT_FIXED, FORMAT_STYLED};
use crate::nbt::{read_nbt, write_nbt};
use crate::serializer::{PacketReader, PacketWriter};

/// Era-dependent encoding of display text and number formats.
pub trait ComponentCodec: Send + Sync {
    fn era(&self) -> ProtocolEra;

    fn write_component(&self, w: &mut PacketWriter, text: &str);

    fn read_component(&self, r: &mut PacketReader<'_>) -> ScorebarResult<String>;

    fn write_number_format(
        &self,
        w: &mut PacketWriter,
        format: &NumberFormat,
    ) -> ScorebarResult<()>;

    fn read_number_format(&self, r: &mut PacketReader<'_>) -> ScorebarResult<NumberFormat>;
}

/// Returns the codec for an era. Codecs are stateless.
pub fn codec_for(era: ProtocolEra) -> &'static dyn ComponentCodec {
    match era {
        ProtocolEra::Legacy => &LegacyCodec,
        ProtocolEra::Component => &ComponentEraCodec,
        ProtocolEra::Modern => &ModernCodec,
    }
}

/// Oldest era: display text travels as the raw legacy string.
struct LegacyCodec;

impl ComponentCodec for LegacyCodec {
    fn era(&self) -> ProtocolEra {
        ProtocolEra::Legacy
    }

    fn write_component(&self, w: &mut PacketWriter, text: &str) {
        w.write_string(text);
    }

    fn read_component(&self, r: &mut PacketReader<'_>) -> ScorebarResult<String> {
        r.read_string()
    }

    fn write_number_format(&self, _: &mut PacketWriter, _: &NumberFormat) -> ScorebarResult<()> {
        Err(ScorebarError::UnsupportedForEra {
            feature: "number formats",
            era: self.era(),
        })
    }

    fn read_number_format(&self, _: &mut PacketReader<'_>) -> ScorebarResult<NumberFormat> {
        Err(ScorebarError::UnsupportedForEra {
            feature: "number formats",
            era: self.era(),
        })
    }
}

/// Middle era: structured text, no number formats yet.
struct ComponentEraCodec;

impl ComponentCodec for ComponentEraCodec {
    fn era(&self) -> ProtocolEra {
        ProtocolEra::Component
    }

    fn write_component(&self, w: &mut PacketWriter, text: &str) {
        write_text_tree(w, text);
    }

    fn read_component(&self, r: &mut PacketReader<'_>) -> ScorebarResult<String> {
        read_text_tree(r)
    }

    fn write_number_format(&self, _: &mut PacketWriter, _: &NumberFormat) -> ScorebarResult<()> {
        Err(ScorebarError::UnsupportedForEra {
            feature: "number formats",
            era: self.era(),
        })
    }

    fn read_number_format(&self, _: &mut PacketReader<'_>) -> ScorebarResult<NumberFormat> {
        Err(ScorebarError::UnsupportedForEra {
            feature: "number formats",
            era: self.era(),
        })
    }
}

/// Newest era: structured text plus the number-format union.
struct ModernCodec;

impl ComponentCodec for ModernCodec {
    fn era(&self) -> ProtocolEra {
        ProtocolEra::Modern
    }

    fn write_component(&self, w: &mut PacketWriter, text: &str) {
        write_text_tree(w, text);
    }

    fn read_component(&self, r: &mut PacketReader<'_>) -> ScorebarResult<String> {
        read_text_tree(r)
    }

    fn write_number_format(&self, w: &mut PacketWriter, format: &NumberFormat) -> ScorebarResult<()> {
        w.write_var_int(format.discriminant());
        if let Some(payload) = format.payload() {
            write_nbt(w, &payload);
        }
        Ok(())
    }

    fn read_number_format(&self, r: &mut PacketReader<'_>) -> ScorebarResult<NumberFormat> {
        let discriminant = r.read_var_int()?;
        match discriminant {
            FORMAT_BLANK => Ok(NumberFormat::Blank),
            FORMAT_STYLED => Ok(NumberFormat::Styled(StyledFormat::from_nbt(&read_nbt(r)?)?)),
            FORMAT_FIXED => Ok(NumberFormat::Fixed(
                TextNode::from_nbt(&read_nbt(r)?)?.to_legacy(),
            )),
            other => Err(ScorebarError::UnknownEnumValue {
                kind: "number format",
                value: other,
            }),
        }
    }
}

fn write_text_tree(w: &mut PacketWriter, text: &str) {
    write_nbt(w, &TextNode::from_legacy(text).to_nbt());
}

fn read_text_tree(r: &mut PacketReader<'_>) -> ScorebarResult<String> {
    Ok(TextNode::from_nbt(&read_nbt(r)?)?.to_legacy())
}
