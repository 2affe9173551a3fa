//! Wire primitives
//!
//! The packet family encodes integers as little-endian base-128 varints
//! (low 7 bits payload, high bit continuation), strings as a varint byte
//! length followed by UTF-8, nullable values as a bool flag plus payload,
//! and collections as a varint count plus elements. Fixed-width integers
//! are big-endian.

use bytes::{Buf, BufMut, Bytes, BytesMut};
use scorebar_core::{ScorebarError, ScorebarResult};

const SEGMENT_BITS: u8 = 0x7F;
const CONTINUE_BIT: u8 = 0x80;

/// Collection counts come off the network; anything above this is treated
/// as hostile rather than allocated.
pub const MAX_COLLECTION_LEN: usize = 4096;

/// Growable output buffer for one packet.
#[derive(Debug, Default)]
pub struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    pub fn new() -> Self {
        PacketWriter { buf: BytesMut::new() }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        PacketWriter {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Finish the packet and hand the bytes over.
    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.put_u8(u8::from(value));
    }

    pub fn write_byte(&mut self, value: u8) {
        self.buf.put_u8(value);
    }

    pub fn write_i32(&mut self, value: i32) {
        self.buf.put_i32(value);
    }

    pub fn write_i64(&mut self, value: i64) {
        self.buf.put_i64(value);
    }

    pub fn write_raw(&mut self, bytes: &[u8]) {
        self.buf.put_slice(bytes);
    }

    /// Base-128 varint; negative values travel as their two's-complement
    /// bit pattern, always five groups.
    pub fn write_var_int(&mut self, value: i32) {
        let mut value = value as u32;
        loop {
            if value & !u32::from(SEGMENT_BITS) == 0 {
                self.buf.put_u8(value as u8);
                return;
            }
            self.buf.put_u8((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
            value >>= 7;
        }
    }

    pub fn write_var_long(&mut self, value: i64) {
        let mut value = value as u64;
        loop {
            if value & !u64::from(SEGMENT_BITS) == 0 {
                self.buf.put_u8(value as u8);
                return;
            }
            self.buf.put_u8((value as u8 & SEGMENT_BITS) | CONTINUE_BIT);
            value >>= 7;
        }
    }

    /// Varint byte-length prefix (bytes, not code points) plus UTF-8.
    pub fn write_string(&mut self, value: &str) {
        self.write_var_int(value.len() as i32);
        self.buf.put_slice(value.as_bytes());
    }

    /// Bool presence flag, then the payload if present.
    pub fn write_option<T: ?Sized>(
        &mut self,
        value: Option<&T>,
        write: impl FnOnce(&mut Self, &T) -> ScorebarResult<()>,
    ) -> ScorebarResult<()> {
        match value {
            Some(value) => {
                self.write_bool(true);
                write(self, value)
            }
            None => {
                self.write_bool(false);
                Ok(())
            }
        }
    }

    /// Varint count, then the elements in order.
    pub fn write_collection<T>(
        &mut self,
        values: &[T],
        mut write: impl FnMut(&mut Self, &T) -> ScorebarResult<()>,
    ) -> ScorebarResult<()> {
        self.write_var_int(values.len() as i32);
        for value in values {
            write(self, value)?;
        }
        Ok(())
    }
}

/// Cursor over one received packet.
#[derive(Debug)]
pub struct PacketReader<'a> {
    buf: &'a [u8],
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        PacketReader { buf }
    }

    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn take(&mut self, n: usize) -> ScorebarResult<&'a [u8]> {
        if self.buf.len() < n {
            return Err(ScorebarError::BufferTooShort {
                expected: n,
                actual: self.buf.len(),
            });
        }
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    pub fn read_bool(&mut self) -> ScorebarResult<bool> {
        Ok(self.read_byte()? != 0)
    }

    pub fn read_byte(&mut self) -> ScorebarResult<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_i32(&mut self) -> ScorebarResult<i32> {
        let mut bytes = self.take(4)?;
        Ok(bytes.get_i32())
    }

    pub fn read_i64(&mut self) -> ScorebarResult<i64> {
        let mut bytes = self.take(8)?;
        Ok(bytes.get_i64())
    }

    /// Fails with `MalformedVarInt` after five groups without termination.
    pub fn read_var_int(&mut self) -> ScorebarResult<i32> {
        let mut value: u32 = 0;
        let mut position = 0;
        loop {
            let byte = self.read_byte()?;
            value |= u32::from(byte & SEGMENT_BITS) << position;
            if byte & CONTINUE_BIT == 0 {
                break;
            }
            position += 7;
            if position >= 32 {
                return Err(ScorebarError::MalformedVarInt);
            }
        }
        Ok(value as i32)
    }

    /// Fails with `MalformedVarInt` after ten groups without termination.
    pub fn read_var_long(&mut self) -> ScorebarResult<i64> {
        let mut value: u64 = 0;
        let mut position = 0;
        loop {
            let byte = self.read_byte()?;
            value |= u64::from(byte & SEGMENT_BITS) << position;
            if byte & CONTINUE_BIT == 0 {
                break;
            }
            position += 7;
            if position >= 64 {
                return Err(ScorebarError::MalformedVarInt);
            }
        }
        Ok(value as i64)
    }

    pub fn read_string(&mut self) -> ScorebarResult<String> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len)
            .map_err(|_| ScorebarError::InvalidWireFormat(format!("negative string length {len}")))?;
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|e| ScorebarError::InvalidWireFormat(format!("invalid UTF-8 string: {e}")))
    }

    pub fn read_option<T>(
        &mut self,
        read: impl FnOnce(&mut Self) -> ScorebarResult<T>,
    ) -> ScorebarResult<Option<T>> {
        if self.read_bool()? {
            Ok(Some(read(self)?))
        } else {
            Ok(None)
        }
    }

    /// The declared count is attacker controlled; reject anything above
    /// `MAX_COLLECTION_LEN` before reserving.
    pub fn read_collection<T>(
        &mut self,
        mut read: impl FnMut(&mut Self) -> ScorebarResult<T>,
    ) -> ScorebarResult<Vec<T>> {
        let len = self.read_var_int()?;
        let len = usize::try_from(len).map_err(|_| {
            ScorebarError::InvalidWireFormat(format!("negative collection length {len}"))
        })?;
        if len > MAX_COLLECTION_LEN {
            return Err(ScorebarError::CollectionTooLarge {
                len,
                max: MAX_COLLECTION_LEN,
            });
        }
        let mut values = Vec::with_capacity(len);
        for _ in 0..len {
            values.push(read(self)?);
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn encode_var_int(value: i32) -> Vec<u8> {
        let mut w = PacketWriter::new();
        w.write_var_int(value);
        w.into_bytes().to_vec()
    }

    #[test]
    fn test_var_int_known_encodings() {
        assert_eq!(encode_var_int(0), [0x00]);
        assert_eq!(encode_var_int(1), [0x01]);
        assert_eq!(encode_var_int(127), [0x7F]);
        assert_eq!(encode_var_int(128), [0x80, 0x01]);
        assert_eq!(encode_var_int(300), [0xAC, 0x02]);
        assert_eq!(encode_var_int(i32::MAX), [0xFF, 0xFF, 0xFF, 0xFF, 0x07]);
        // negatives ride the two's-complement pattern, always five groups
        assert_eq!(encode_var_int(-1), [0xFF, 0xFF, 0xFF, 0xFF, 0x0F]);
    }

    #[test]
    fn test_var_int_overflow_guard() {
        let mut r = PacketReader::new(&[0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]);
        assert!(matches!(r.read_var_int(), Err(ScorebarError::MalformedVarInt)));
    }

    #[test]
    fn test_var_int_truncated_input() {
        let mut r = PacketReader::new(&[0x80]);
        assert!(matches!(
            r.read_var_int(),
            Err(ScorebarError::BufferTooShort { .. })
        ));
    }

    #[test]
    fn test_var_long_known_encodings() {
        let mut w = PacketWriter::new();
        w.write_var_long(-1);
        assert_eq!(
            w.into_bytes().to_vec(),
            [0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01]
        );
    }

    #[test]
    fn test_var_long_overflow_guard() {
        let mut r = PacketReader::new(&[0xFF; 11]);
        assert!(matches!(r.read_var_long(), Err(ScorebarError::MalformedVarInt)));
    }

    #[test]
    fn test_string_roundtrip() {
        let mut w = PacketWriter::new();
        w.write_string("héllo §a world");
        w.write_string("");
        let bytes = w.into_bytes();

        let mut r = PacketReader::new(&bytes);
        assert_eq!(r.read_string().unwrap(), "héllo §a world");
        assert_eq!(r.read_string().unwrap(), "");
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_string_length_is_bytes_not_chars() {
        let mut w = PacketWriter::new();
        w.write_string("§"); // two UTF-8 bytes
        let bytes = w.into_bytes();
        assert_eq!(bytes[0], 2);
    }

    #[test]
    fn test_string_invalid_utf8() {
        // length 2, then an invalid sequence
        let mut r = PacketReader::new(&[0x02, 0xC3, 0x28]);
        assert!(matches!(
            r.read_string(),
            Err(ScorebarError::InvalidWireFormat(_))
        ));
    }

    #[test]
    fn test_option_framing() {
        let mut w = PacketWriter::new();
        w.write_option(Some(&"abc".to_string()), |w, v| {
            w.write_string(v);
            Ok(())
        })
        .unwrap();
        w.write_option(None::<&String>, |w, v| {
            w.write_string(v);
            Ok(())
        })
        .unwrap();
        let bytes = w.into_bytes();

        let mut r = PacketReader::new(&bytes);
        assert_eq!(r.read_option(|r| r.read_string()).unwrap(), Some("abc".to_string()));
        assert_eq!(r.read_option(|r| r.read_string()).unwrap(), None);
    }

    #[test]
    fn test_collection_roundtrip() {
        let values = vec!["one".to_string(), "two".to_string()];
        let mut w = PacketWriter::new();
        w.write_collection(&values, |w, v| {
            w.write_string(v);
            Ok(())
        })
        .unwrap();
        let bytes = w.into_bytes();

        let mut r = PacketReader::new(&bytes);
        assert_eq!(r.read_collection(|r| r.read_string()).unwrap(), values);
    }

    #[test]
    fn test_collection_count_bound() {
        let mut w = PacketWriter::new();
        w.write_var_int((MAX_COLLECTION_LEN + 1) as i32);
        let bytes = w.into_bytes();

        let mut r = PacketReader::new(&bytes);
        assert!(matches!(
            r.read_collection(|r| r.read_byte()),
            Err(ScorebarError::CollectionTooLarge { .. })
        ));
    }

    proptest! {
        #[test]
        fn prop_var_int_roundtrip(value: i32) {
            let encoded = encode_var_int(value);
            prop_assert!(encoded.len() <= 5);
            let mut r = PacketReader::new(&encoded);
            prop_assert_eq!(r.read_var_int().unwrap(), value);
            prop_assert_eq!(r.remaining(), 0);
        }

        #[test]
        fn prop_var_long_roundtrip(value: i64) {
            let mut w = PacketWriter::new();
            w.write_var_long(value);
            let encoded = w.into_bytes();
            prop_assert!(encoded.len() <= 10);
            let mut r = PacketReader::new(&encoded);
            prop_assert_eq!(r.read_var_long().unwrap(), value);
        }

        #[test]
        fn prop_string_roundtrip(value: String) {
            let mut w = PacketWriter::new();
            w.write_string(&value);
            let encoded = w.into_bytes();
            let mut r = PacketReader::new(&encoded);
            prop_assert_eq!(r.read_string().unwrap(), value);
        }
    }
}
