//! Binary block codec
//!
//! Fixed, little-endian layout:
//!
//! | kind | layout |
//! |---|---|
//! | boolean | 1 byte, `0` or `1` |
//! | integer | 8 bytes, two's complement |
//! | real | 8 bytes, IEEE-754 double |
//! | string | `u32` UTF-8 byte length, then the bytes |
//! | file | 32-byte content id, then the MIME type as a string |
//! | array | `u32` dimension count, one `u32` extent per dimension, then the elements (row-major) |
//!
//! Decoding checks every declared size against the remaining input before
//! reading or allocating, and rejects input with bytes left over.

use byteorder::{ByteOrder, LittleEndian};

use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::{Array, ContentId, FileValue, Value, element_count};
use crate::visitor::{KindVisitor, ValueVisitor};

/// Encode a value as a binary block
///
/// Fails with [`ValueError::InvalidArgument`] if a string or an array extent
/// does not fit the 32-bit length fields.
pub fn to_binary(value: &Value) -> ValueResult<Vec<u8>> {
    let mut encoder = BinaryEncoder::default();
    value.accept(&mut encoder)?;
    Ok(encoder.into_bytes())
}

/// Decode a binary block as a value of `kind`
pub fn from_binary(bytes: &[u8], kind: ValueKind) -> ValueResult<Value> {
    let mut decoder = BinaryDecoder::new(bytes, kind);
    let value = kind.accept(&mut decoder)?;
    decoder.finish()?;
    Ok(value)
}

// ============================================================================
// ENCODER
// ============================================================================

/// Appends the binary form of visited values to a buffer
#[derive(Debug, Default)]
pub struct BinaryEncoder {
    out: Vec<u8>,
}

impl BinaryEncoder {
    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }

    fn u32(&mut self, value: usize, what: &str) -> ValueResult<()> {
        let value = u32::try_from(value).map_err(|_| {
            ValueError::invalid_argument(format!("{what} {value} exceeds the 32-bit binary limit"))
        })?;
        let mut buf = [0; 4];
        LittleEndian::write_u32(&mut buf, value);
        self.out.extend_from_slice(&buf);
        Ok(())
    }

    fn i64(&mut self, value: i64) {
        let mut buf = [0; 8];
        LittleEndian::write_i64(&mut buf, value);
        self.out.extend_from_slice(&buf);
    }

    fn f64(&mut self, value: f64) {
        let mut buf = [0; 8];
        LittleEndian::write_f64(&mut buf, value);
        self.out.extend_from_slice(&buf);
    }

    fn bool(&mut self, value: bool) {
        self.out.push(u8::from(value));
    }

    fn str(&mut self, value: &str) -> ValueResult<()> {
        self.u32(value.len(), "string length")?;
        self.out.extend_from_slice(value.as_bytes());
        Ok(())
    }

    fn shape<T>(&mut self, array: &Array<T>) -> ValueResult<()> {
        self.u32(array.dimensions(), "dimension count")?;
        for &extent in array.shape() {
            self.u32(extent, "array extent")?;
        }
        Ok(())
    }
}

impl ValueVisitor for BinaryEncoder {
    type Output = ValueResult<()>;

    fn visit_real(&mut self, value: f64) -> Self::Output {
        self.f64(value);
        Ok(())
    }

    fn visit_integer(&mut self, value: i64) -> Self::Output {
        self.i64(value);
        Ok(())
    }

    fn visit_boolean(&mut self, value: bool) -> Self::Output {
        self.bool(value);
        Ok(())
    }

    fn visit_string(&mut self, value: &str) -> Self::Output {
        self.str(value)
    }

    fn visit_file(&mut self, value: &FileValue) -> Self::Output {
        self.out.extend_from_slice(value.id().as_bytes());
        self.str(value.mime_type())
    }

    fn visit_real_array(&mut self, value: &Array<f64>) -> Self::Output {
        self.shape(value)?;
        self.out.reserve(value.len() * 8);
        value.iter().for_each(|v| self.f64(*v));
        Ok(())
    }

    fn visit_integer_array(&mut self, value: &Array<i64>) -> Self::Output {
        self.shape(value)?;
        self.out.reserve(value.len() * 8);
        value.iter().for_each(|v| self.i64(*v));
        Ok(())
    }

    fn visit_boolean_array(&mut self, value: &Array<bool>) -> Self::Output {
        self.shape(value)?;
        self.out.extend(value.iter().map(|v| u8::from(*v)));
        Ok(())
    }

    fn visit_string_array(&mut self, value: &Array<String>) -> Self::Output {
        self.shape(value)?;
        value.iter().try_for_each(|v| self.str(v))
    }
}

// ============================================================================
// DECODER
// ============================================================================

/// Reads one value of the visited kind from a byte slice
#[derive(Debug)]
pub struct BinaryDecoder<'a> {
    data: &'a [u8],
    offset: usize,
    kind: ValueKind,
}

impl<'a> BinaryDecoder<'a> {
    pub const fn new(data: &'a [u8], kind: ValueKind) -> Self {
        Self {
            data,
            offset: 0,
            kind,
        }
    }

    /// Bytes not consumed yet
    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    /// Fail unless every byte was consumed
    pub fn finish(&self) -> ValueResult<()> {
        if self.remaining() != 0 {
            return Err(self.error(format!("{} trailing bytes", self.remaining())));
        }
        Ok(())
    }

    fn error(&self, reason: impl Into<String>) -> ValueError {
        ValueError::malformed_binary(self.kind, self.offset, reason)
    }

    fn take(&mut self, len: usize) -> ValueResult<&'a [u8]> {
        let data = self.data;
        let rest = data.get(self.offset..).unwrap_or_default();
        let Some((head, _)) = rest.split_at_checked(len) else {
            return Err(self.error(format!(
                "needs {len} bytes, {} remain",
                rest.len()
            )));
        };
        self.offset += len;
        Ok(head)
    }

    /// Fail before allocating for `count` items of at least `min_size` bytes
    fn ensure(&self, count: usize, min_size: usize) -> ValueResult<()> {
        let needed = count.checked_mul(min_size);
        match needed {
            Some(needed) if needed <= self.remaining() => Ok(()),
            _ => Err(self.error(format!(
                "declares {count} elements but only {} bytes remain",
                self.remaining()
            ))),
        }
    }

    fn u32(&mut self) -> ValueResult<usize> {
        self.take(4).map(|b| LittleEndian::read_u32(b) as usize)
    }

    fn i64(&mut self) -> ValueResult<i64> {
        self.take(8).map(LittleEndian::read_i64)
    }

    fn f64(&mut self) -> ValueResult<f64> {
        self.take(8).map(LittleEndian::read_f64)
    }

    fn bool(&mut self) -> ValueResult<bool> {
        let offset = self.offset;
        match self.take(1)? {
            [0] => Ok(false),
            [1] => Ok(true),
            [other, ..] => Err(ValueError::malformed_binary(
                self.kind,
                offset,
                format!("boolean byte {other:#04x}"),
            )),
            [] => Err(self.error("empty boolean")),
        }
    }

    fn str(&mut self) -> ValueResult<String> {
        let len = self.u32()?;
        let start = self.offset;
        let bytes = self.take(len)?;
        std::str::from_utf8(bytes)
            .map(str::to_owned)
            .map_err(|e| ValueError::malformed_binary(self.kind, start, format!("string: {e}")))
    }

    fn content_id(&mut self) -> ValueResult<ContentId> {
        let mut id = [0u8; ContentId::LEN];
        id.copy_from_slice(self.take(ContentId::LEN)?);
        Ok(ContentId::from_bytes(id))
    }

    /// Dimension count and extents; returns the shape and element count
    fn shape(&mut self) -> ValueResult<(Vec<usize>, usize)> {
        let dimensions = self.u32()?;
        if dimensions == 0 {
            return Err(self.error("array has no dimensions"));
        }
        self.ensure(dimensions, 4)?;

        let mut shape = Vec::with_capacity(dimensions);
        for _ in 0..dimensions {
            shape.push(self.u32()?);
        }
        let count = element_count(&shape).map_err(|_| self.error("array extents overflow"))?;
        Ok((shape, count))
    }

    fn array<T>(
        &mut self,
        min_size: usize,
        mut element: impl FnMut(&mut Self) -> ValueResult<T>,
    ) -> ValueResult<Array<T>> {
        let (shape, count) = self.shape()?;
        self.ensure(count, min_size)?;

        let mut elements = Vec::with_capacity(count);
        for _ in 0..count {
            elements.push(element(self)?);
        }
        Array::from_shape(&shape, elements)
    }
}

impl KindVisitor for BinaryDecoder<'_> {
    type Output = ValueResult<Value>;

    fn visit_real(&mut self) -> Self::Output {
        self.f64().map(Value::Real)
    }

    fn visit_integer(&mut self) -> Self::Output {
        self.i64().map(Value::Integer)
    }

    fn visit_boolean(&mut self) -> Self::Output {
        self.bool().map(Value::Boolean)
    }

    fn visit_string(&mut self) -> Self::Output {
        self.str().map(Value::String)
    }

    fn visit_file(&mut self) -> Self::Output {
        let id = self.content_id()?;
        let mime_type = self.str()?;
        Ok(Value::File(FileValue::new(id, mime_type)))
    }

    fn visit_real_array(&mut self) -> Self::Output {
        self.array(8, Self::f64).map(Value::from)
    }

    fn visit_integer_array(&mut self) -> Self::Output {
        self.array(8, Self::i64).map(Value::from)
    }

    fn visit_boolean_array(&mut self) -> Self::Output {
        self.array(1, Self::bool).map(Value::from)
    }

    fn visit_string_array(&mut self) -> Self::Output {
        self.array(4, Self::str).map(Value::from)
    }
}
