//! Normalization of host types into [`Value`].
//!
//! Flattening works on the closed [`Value`] enum. Anything that implements
//! `serde::Serialize` is converted into that enum first, with the serde data model
//! deciding the shape:
//!
//! - structs become [`Value::Record`], keeping declaration order and field names
//! - maps become [`Value::Map`] when every key is a `str`, a `char` or a unit enum
//!   variant, otherwise [`Value::Opaque`]
//! - sequences, tuples and tuple structs become [`Value::List`]
//! - `Option` is unwrapped one level, with `None` becoming [`Value::Null`]
//! - enum variants follow the externally tagged convention (`{"Variant": ...}`), and
//!   unit variants become their name as text
//!
//! ```
//! use serde::Serialize;
//!
//! #[derive(Serialize)]
//! struct Person {
//!     name: String,
//!     nickname: Option<String>,
//! }
//!
//! let value = flatnest::to_value(&Person { name: "Bob".into(), nickname: None })?;
//! let record = value.as_record().unwrap();
//! assert_eq!(record.name(), "Person");
//! assert_eq!(record.get("name").unwrap(), "Bob");
//! assert!(record.get("nickname").unwrap().is_null());
//! # Ok::<(), flatnest::SerializeError>(())
//! ```

use std::fmt::Display;

use serde::ser::{self, Serialize, Serializer as _};
use thiserror::Error;

use crate::value::{Map, Record, Value};

/// Error type for normalization failures.
#[non_exhaustive]
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SerializeError {
    /// A `Serialize` implementation reported an error of its own
    #[error("Serialization failed: {reason}")]
    Custom { reason: String },

    /// A 128-bit integer does not fit the 64-bit value range
    #[error("Integer {value} is out of range")]
    IntegerOutOfRange { value: String },
}

impl ser::Error for SerializeError {
    fn custom<T: Display>(msg: T) -> Self {
        SerializeError::Custom {
            reason: msg.to_string(),
        }
    }
}

impl From<SerializeError> for crate::Error {
    fn from(err: SerializeError) -> Self {
        crate::Error::Serialize(err)
    }
}

/// Converts any serializable value into a [`Value`].
///
/// # Errors
/// Fails only if the value's `Serialize` implementation fails, or if it emits a
/// 128-bit integer outside the `i64`/`u64` range.
pub fn to_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, SerializeError> {
    value.serialize(ValueSerializer)
}

/// A `serde::Serializer` whose output is a [`Value`].
#[derive(Debug, Clone, Copy, Default)]
pub struct ValueSerializer;

fn tagged(variant: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(variant.to_string(), value);
    Value::Map(map)
}

fn out_of_range(value: impl Display) -> SerializeError {
    SerializeError::IntegerOutOfRange {
        value: value.to_string(),
    }
}

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = SerializeError;

    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = VariantSeqSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = RecordSerializer;
    type SerializeStructVariant = VariantRecordSerializer;

    fn serialize_bool(self, v: bool) -> Result<Value, SerializeError> {
        Ok(Value::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_i64(self, v: i64) -> Result<Value, SerializeError> {
        Ok(Value::Int(v))
    }

    fn serialize_i128(self, v: i128) -> Result<Value, SerializeError> {
        if let Ok(n) = i64::try_from(v) {
            return Ok(Value::Int(n));
        }
        u64::try_from(v)
            .map(Value::UInt)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, SerializeError> {
        Ok(Value::Int(v.into()))
    }

    fn serialize_u64(self, v: u64) -> Result<Value, SerializeError> {
        Ok(Value::from(v))
    }

    fn serialize_u128(self, v: u128) -> Result<Value, SerializeError> {
        u64::try_from(v)
            .map(Value::from)
            .map_err(|_| out_of_range(v))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, SerializeError> {
        Ok(Value::Float(v.into()))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, SerializeError> {
        Ok(Value::Float(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, SerializeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Value, SerializeError> {
        Ok(Value::Text(v.to_string()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Value, SerializeError> {
        Ok(Value::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Value, SerializeError> {
        Ok(Value::Null)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, value: &T) -> Result<Value, SerializeError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, SerializeError> {
        Ok(Value::Null)
    }

    fn serialize_unit_struct(self, name: &'static str) -> Result<Value, SerializeError> {
        Ok(Value::Record(Record::new(name)))
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, SerializeError> {
        Ok(Value::Text(variant.to_string()))
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, SerializeError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Value, SerializeError> {
        Ok(tagged(variant, to_value(value)?))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<SeqSerializer, SerializeError> {
        Ok(SeqSerializer {
            items: Vec::with_capacity(len.unwrap_or(0)),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<SeqSerializer, SerializeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<SeqSerializer, SerializeError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<VariantSeqSerializer, SerializeError> {
        Ok(VariantSeqSerializer {
            variant,
            items: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<MapSerializer, SerializeError> {
        Ok(MapSerializer {
            entries: Vec::with_capacity(len.unwrap_or(0)),
            pending_key: None,
            string_keys: true,
        })
    }

    fn serialize_struct(
        self,
        name: &'static str,
        _len: usize,
    ) -> Result<RecordSerializer, SerializeError> {
        Ok(RecordSerializer {
            record: Record::new(name),
        })
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<VariantRecordSerializer, SerializeError> {
        Ok(VariantRecordSerializer {
            variant,
            record: Record::new(variant),
        })
    }
}

/// Collects sequences, tuples and tuple structs into [`Value::List`].
#[derive(Debug)]
pub struct SeqSerializer {
    items: Vec<Value>,
}

impl ser::SerializeSeq for SeqSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(Value::List(self.items))
    }
}

impl ser::SerializeTuple for SeqSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_element<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, SerializeError> {
        ser::SerializeSeq::end(self)
    }
}

/// Collects a tuple variant into `{variant: [..]}`.
#[derive(Debug)]
pub struct VariantSeqSerializer {
    variant: &'static str,
    items: Vec<Value>,
}

impl ser::SerializeTupleVariant for VariantSeqSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        self.items.push(to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(tagged(self.variant, Value::List(self.items)))
    }
}

/// Decides whether a map key is string-like.
///
/// Only `str`, `char` and unit enum variants qualify. Everything else, including
/// `Option` and newtype wrappers around strings, answers `false`. Composite keys
/// fail with an error that callers read as `false`.
#[derive(Debug, Clone, Copy, Default)]
struct KeyKind;

fn composite_key() -> SerializeError {
    SerializeError::Custom {
        reason: "composite map key".to_string(),
    }
}

impl ser::Serializer for KeyKind {
    type Ok = bool;
    type Error = SerializeError;

    type SerializeSeq = ser::Impossible<bool, SerializeError>;
    type SerializeTuple = ser::Impossible<bool, SerializeError>;
    type SerializeTupleStruct = ser::Impossible<bool, SerializeError>;
    type SerializeTupleVariant = ser::Impossible<bool, SerializeError>;
    type SerializeMap = ser::Impossible<bool, SerializeError>;
    type SerializeStruct = ser::Impossible<bool, SerializeError>;
    type SerializeStructVariant = ser::Impossible<bool, SerializeError>;

    fn serialize_bool(self, _v: bool) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_i8(self, _v: i8) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_i16(self, _v: i16) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_i32(self, _v: i32) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_i64(self, _v: i64) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_u8(self, _v: u8) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_u16(self, _v: u16) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_u32(self, _v: u32) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_u64(self, _v: u64) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_f32(self, _v: f32) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_f64(self, _v: f64) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_char(self, _v: char) -> Result<bool, SerializeError> {
        Ok(true)
    }

    fn serialize_str(self, _v: &str) -> Result<bool, SerializeError> {
        Ok(true)
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_none(self) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_some<T: Serialize + ?Sized>(self, _value: &T) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_unit(self) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_unit_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
    ) -> Result<bool, SerializeError> {
        Ok(true)
    }

    fn serialize_newtype_struct<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _value: &T,
    ) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_newtype_variant<T: Serialize + ?Sized>(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _value: &T,
    ) -> Result<bool, SerializeError> {
        Ok(false)
    }

    fn serialize_seq(self, _len: Option<usize>) -> Result<Self::SerializeSeq, SerializeError> {
        Err(composite_key())
    }

    fn serialize_tuple(self, _len: usize) -> Result<Self::SerializeTuple, SerializeError> {
        Err(composite_key())
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleStruct, SerializeError> {
        Err(composite_key())
    }

    fn serialize_tuple_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, SerializeError> {
        Err(composite_key())
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<Self::SerializeMap, SerializeError> {
        Err(composite_key())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStruct, SerializeError> {
        Err(composite_key())
    }

    fn serialize_struct_variant(
        self,
        _name: &'static str,
        _variant_index: u32,
        _variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, SerializeError> {
        Err(composite_key())
    }
}

/// Collects map entries.
///
/// Keys are normalized like any other value. If every key is string-like (`str`,
/// `char` or a unit variant) the map is a [`Value::Map`]; a single other key makes
/// the whole map [`Value::Opaque`], even when that key would normalize to text.
#[derive(Debug)]
pub struct MapSerializer {
    entries: Vec<(Value, Value)>,
    pending_key: Option<Value>,
    string_keys: bool,
}

impl ser::SerializeMap for MapSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_key<T: Serialize + ?Sized>(&mut self, key: &T) -> Result<(), SerializeError> {
        let normalized = to_value(key)?;
        self.string_keys &= key.serialize(KeyKind).unwrap_or(false);
        self.pending_key = Some(normalized);
        Ok(())
    }

    fn serialize_value<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), SerializeError> {
        let key = self.pending_key.take().ok_or_else(|| SerializeError::Custom {
            reason: "map value serialized before its key".to_string(),
        })?;
        self.entries.push((key, to_value(value)?));
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        if !self.string_keys {
            return Ok(Value::Opaque(self.entries));
        }

        let mut map = Map::new();
        for (key, value) in self.entries {
            if let Value::Text(key) = key {
                map.insert(key, value);
            }
        }
        Ok(Value::Map(map))
    }
}

/// Collects struct fields into a [`Value::Record`].
#[derive(Debug)]
pub struct RecordSerializer {
    record: Record,
}

impl ser::SerializeStruct for RecordSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerializeError> {
        self.record.push(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(Value::Record(self.record))
    }
}

/// Collects a struct variant into `{variant: Record}`.
#[derive(Debug)]
pub struct VariantRecordSerializer {
    variant: &'static str,
    record: Record,
}

impl ser::SerializeStructVariant for VariantRecordSerializer {
    type Ok = Value;
    type Error = SerializeError;

    fn serialize_field<T: Serialize + ?Sized>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), SerializeError> {
        self.record.push(key, to_value(value)?);
        Ok(())
    }

    fn end(self) -> Result<Value, SerializeError> {
        Ok(tagged(self.variant, Value::Record(self.record)))
    }
}
