//! API string codec
//!
//! Locale-invariant text meant for other processes. Every value that can be
//! represented round-trips: `from_api_string(&to_api_string(&v), v.kind())`
//! is [`identical`](crate::Value::identical) to `v`.
//!
//! | kind | form |
//! |---|---|
//! | real | `1.5`, `1e+300`, `NaN`, `Infinity`, `-Infinity` |
//! | integer | `-42` |
//! | boolean | `True`, `False` |
//! | string | the text itself |
//! | file | `{"contents":"<hex id>","mimeType":"text/plain"}` |
//! | arrays | see [`array_text`](super::array_text) |

use super::array_text::{self, Token};
use super::text;
use crate::error::{ValueError, ValueResult};
use crate::kind::ValueKind;
use crate::value::{Array, FileValue, Value};
use crate::visitor::{KindVisitor, ValueVisitor};

const CONTENTS_KEY: &str = "contents";
const MIME_TYPE_KEY: &str = "mimeType";

/// Encode a value as an API string
pub fn to_api_string(value: &Value) -> String {
    value.accept(&mut ApiStringEncoder)
}

/// Decode an API string as a value of `kind`
pub fn from_api_string(input: &str, kind: ValueKind) -> ValueResult<Value> {
    kind.accept(&mut ApiStringDecoder { input })
}

/// Renders values in API string form
#[derive(Debug, Default, Clone, Copy)]
pub struct ApiStringEncoder;

impl ApiStringEncoder {
    fn file(value: &FileValue) -> String {
        let mut object = serde_json::Map::new();
        object.insert(CONTENTS_KEY.to_owned(), value.id().to_hex().into());
        if !value.mime_type().is_empty() {
            object.insert(MIME_TYPE_KEY.to_owned(), value.mime_type().into());
        }
        serde_json::Value::Object(object).to_string()
    }
}

impl ValueVisitor for ApiStringEncoder {
    type Output = String;

    fn visit_real(&mut self, value: f64) -> String {
        text::format_real(value)
    }

    fn visit_integer(&mut self, value: i64) -> String {
        value.to_string()
    }

    fn visit_boolean(&mut self, value: bool) -> String {
        text::format_boolean(value).to_owned()
    }

    fn visit_string(&mut self, value: &str) -> String {
        value.to_owned()
    }

    fn visit_file(&mut self, value: &FileValue) -> String {
        Self::file(value)
    }

    fn visit_real_array(&mut self, value: &Array<f64>) -> String {
        array_text::encode(value, ",", |v| text::format_real(*v))
    }

    fn visit_integer_array(&mut self, value: &Array<i64>) -> String {
        array_text::encode(value, ",", ToString::to_string)
    }

    fn visit_boolean_array(&mut self, value: &Array<bool>) -> String {
        array_text::encode(value, ",", |v| text::format_boolean(*v).to_owned())
    }

    fn visit_string_array(&mut self, value: &Array<String>) -> String {
        array_text::encode(value, ",", |v| array_text::quote(v))
    }
}

/// Parses API strings into a value of the visited kind
#[derive(Debug, Clone, Copy)]
pub struct ApiStringDecoder<'a> {
    pub input: &'a str,
}

impl KindVisitor for ApiStringDecoder<'_> {
    type Output = ValueResult<Value>;

    fn visit_real(&mut self) -> Self::Output {
        text::parse_real(self.input).map(Value::Real)
    }

    fn visit_integer(&mut self) -> Self::Output {
        text::parse_integer(self.input).map(Value::Integer)
    }

    fn visit_boolean(&mut self) -> Self::Output {
        text::parse_boolean(self.input).map(Value::Boolean)
    }

    fn visit_string(&mut self) -> Self::Output {
        Ok(Value::String(self.input.to_owned()))
    }

    fn visit_file(&mut self) -> Self::Output {
        serde_json::from_str::<FileValue>(self.input)
            .map(Value::File)
            .map_err(|e| {
                ValueError::format_at(ValueKind::File, self.input, e.column().saturating_sub(1))
            })
    }

    fn visit_real_array(&mut self) -> Self::Output {
        array_text::decode(self.input, ValueKind::RealArray, |t| text::parse_real(t.text()))
            .map(Value::from)
    }

    fn visit_integer_array(&mut self) -> Self::Output {
        array_text::decode(self.input, ValueKind::IntegerArray, |t| {
            text::parse_integer(t.text())
        })
        .map(Value::from)
    }

    fn visit_boolean_array(&mut self) -> Self::Output {
        array_text::decode(self.input, ValueKind::BooleanArray, |t| {
            text::parse_boolean(t.text())
        })
        .map(Value::from)
    }

    fn visit_string_array(&mut self) -> Self::Output {
        array_text::decode(self.input, ValueKind::StringArray, |t| {
            Ok(Token::into_string(t))
        })
        .map(Value::from)
    }
}
