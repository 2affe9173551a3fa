//! Binary tag tree
//!
//! Structured text and styled number formats travel as a small tag tree in
//! the newer eras. This is the network form: a root type byte followed by a
//! nameless payload. Only the four tag types the packet family actually
//! uses are supported.
//!
//! - String: u16 big-endian byte length + UTF-8
//! - List: element type byte + i32 big-endian count + payloads
//! - Compound: (type byte, named string, payload)* terminated by End

use scorebar_core::{ScorebarError, ScorebarResult};

use crate::{PacketReader, PacketWriter};

pub const TAG_END: u8 = 0;
pub const TAG_BYTE: u8 = 1;
pub const TAG_STRING: u8 = 8;
pub const TAG_LIST: u8 = 9;
pub const TAG_COMPOUND: u8 = 10;

/// Nesting bound for decoded trees; input is attacker controlled.
const MAX_TAG_DEPTH: usize = 16;

/// One node of the tag tree.
#[derive(Clone, Debug, PartialEq)]
pub enum NbtTag {
    Byte(i8),
    String(String),
    List(Vec<NbtTag>),
    Compound(Vec<(String, NbtTag)>),
}

impl NbtTag {
    pub fn type_id(&self) -> u8 {
        match self {
            NbtTag::Byte(_) => TAG_BYTE,
            NbtTag::String(_) => TAG_STRING,
            NbtTag::List(_) => TAG_LIST,
            NbtTag::Compound(_) => TAG_COMPOUND,
        }
    }

    /// Looks up a named entry of a compound; `None` for other tag types.
    pub fn get(&self, name: &str) -> Option<&NbtTag> {
        match self {
            NbtTag::Compound(entries) => entries
                .iter()
                .find(|(entry, _)| entry == name)
                .map(|(_, tag)| tag),
            _ => None,
        }
    }
}

/// Writes a tag in network form: type byte, then the nameless payload.
pub fn write_nbt(w: &mut PacketWriter, tag: &NbtTag) {
    w.write_byte(tag.type_id());
    write_payload(w, tag);
}

fn write_payload(w: &mut PacketWriter, tag: &NbtTag) {
    match tag {
        NbtTag::Byte(value) => w.write_byte(*value as u8),
        NbtTag::String(value) => write_nbt_string(w, value),
        NbtTag::List(values) => {
            let element_type = values.first().map_or(TAG_END, NbtTag::type_id);
            w.write_byte(element_type);
            w.write_i32(values.len() as i32);
            for value in values {
                write_payload(w, value);
            }
        }
        NbtTag::Compound(entries) => {
            for (name, value) in entries {
                w.write_byte(value.type_id());
                write_nbt_string(w, name);
                write_payload(w, value);
            }
            w.write_byte(TAG_END);
        }
    }
}

fn write_nbt_string(w: &mut PacketWriter, value: &str) {
    w.write_raw(&(value.len() as u16).to_be_bytes());
    w.write_raw(value.as_bytes());
}

/// Reads a tag in network form.
pub fn read_nbt(r: &mut PacketReader<'_>) -> ScorebarResult<NbtTag> {
    let type_id = r.read_byte()?;
    read_payload(r, type_id, 0)
}

fn read_payload(r: &mut PacketReader<'_>, type_id: u8, depth: usize) -> ScorebarResult<NbtTag> {
    if depth > MAX_TAG_DEPTH {
        return Err(ScorebarError::InvalidWireFormat("tag tree too deep".into()));
    }

    match type_id {
        TAG_BYTE => Ok(NbtTag::Byte(r.read_byte()? as i8)),
        TAG_STRING => Ok(NbtTag::String(read_nbt_string(r)?)),
        TAG_LIST => {
            let element_type = r.read_byte()?;
            let len = r.read_i32()?;
            let len = usize::try_from(len).map_err(|_| {
                ScorebarError::InvalidWireFormat(format!("negative list length {len}"))
            })?;
            if len > r.remaining() {
                return Err(ScorebarError::CollectionTooLarge {
                    len,
                    max: r.remaining(),
                });
            }
            let mut values = Vec::with_capacity(len);
            for _ in 0..len {
                values.push(read_payload(r, element_type, depth + 1)?);
            }
            Ok(NbtTag::List(values))
        }
        TAG_COMPOUND => {
            let mut entries = Vec::new();
            loop {
                let entry_type = r.read_byte()?;
                if entry_type == TAG_END {
                    break;
                }
                let name = read_nbt_string(r)?;
                entries.push((name, read_payload(r, entry_type, depth + 1)?));
            }
            Ok(NbtTag::Compound(entries))
        }
        other => Err(ScorebarError::InvalidWireFormat(format!(
            "unknown tag type {other}"
        ))),
    }
}

fn read_nbt_string(r: &mut PacketReader<'_>) -> ScorebarResult<String> {
    let hi = r.read_byte()?;
    let lo = r.read_byte()?;
    let len = usize::from(u16::from_be_bytes([hi, lo]));

    let mut bytes = Vec::with_capacity(len);
    for _ in 0..len {
        bytes.push(r.read_byte()?);
    }
    String::from_utf8(bytes)
        .map_err(|e| ScorebarError::InvalidWireFormat(format!("invalid UTF-8 tag string: {e}")))
}
