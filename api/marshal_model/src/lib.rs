// Copyright 2015-2021 Swim Inc.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! The document model for the marshalling engine. A [`Value`] is a recursive
//! data type covering everything the text formats can represent directly;
//! typed objects (beans) are layered on top of it by the engine and never
//! appear inside a [`Value`] tree.

use std::fmt::{Display, Formatter};

mod num;

pub use num::Number;

#[cfg(test)]
mod tests;

/// The category assigned to a node of an object graph when it is classified
/// for serialization or parsing. Exactly one category applies to any node;
/// `Unknown` only occurs transiently, before a type substitution has been
/// resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ValueCategory {
    Null,
    Boolean,
    Number,
    String,
    Char,
    Map,
    Collection,
    Array,
    Bean,
    Unknown,
}

impl Display for ValueCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueCategory::Null => "Null",
            ValueCategory::Boolean => "Boolean",
            ValueCategory::Number => "Number",
            ValueCategory::String => "String",
            ValueCategory::Char => "Char",
            ValueCategory::Map => "Map",
            ValueCategory::Collection => "Collection",
            ValueCategory::Array => "Array",
            ValueCategory::Bean => "Bean",
            ValueCategory::Unknown => "Unknown",
        };
        f.write_str(name)
    }
}

/// The core model type. A recursive data type that can represent any document
/// the text formats can produce.
///
/// Object entries preserve insertion order; two objects are only equal when
/// their entries occur in the same order.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// The null value.
    Null,

    /// A boolean wrapped as a [`Value`].
    Boolean(bool),

    /// A numeric value wrapped as a [`Value`].
    Number(Number),

    /// A single character. Serialized as a one character string.
    Char(char),

    /// A textual value.
    Text(String),

    /// An ordered sequence of values.
    Array(Vec<Value>),

    /// An ordered sequence of named entries.
    Object(Vec<(String, Value)>),
}

impl Value {
    /// Create a text value from anything that can be converted to a [`String`].
    pub fn text<T: Into<String>>(value: T) -> Value {
        Value::Text(value.into())
    }

    /// Create an object from a vector of named entries.
    pub fn object(entries: Vec<(String, Value)>) -> Value {
        Value::Object(entries)
    }

    /// Create an empty object.
    pub fn empty_object() -> Value {
        Value::Object(vec![])
    }

    /// Create an array from a vector of anything convertible to [`Value`]s.
    pub fn array<I: Into<Value>>(items: Vec<I>) -> Value {
        Value::Array(items.into_iter().map(Into::into).collect())
    }

    /// The category of this value when it is classified directly. Object
    /// values classify as maps and array values as collections; the `Array`
    /// and `Bean` categories are only produced for graph nodes outside the
    /// document model.
    pub fn category(&self) -> ValueCategory {
        match self {
            Value::Null => ValueCategory::Null,
            Value::Boolean(_) => ValueCategory::Boolean,
            Value::Number(_) => ValueCategory::Number,
            Value::Char(_) => ValueCategory::Char,
            Value::Text(_) => ValueCategory::String,
            Value::Array(_) => ValueCategory::Collection,
            Value::Object(_) => ValueCategory::Map,
        }
    }

    /// Look up the first entry with the given key, if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self {
            Value::Object(entries) => entries
                .iter()
                .find_map(|(k, v)| if k == key { Some(v) } else { None }),
            _ => None,
        }
    }

    /// True for an empty object or array. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Array(items) => items.is_empty(),
            Value::Object(entries) => entries.is_empty(),
            _ => false,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Boolean(p) => Some(*p),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Value::Number(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.as_number().and_then(Number::as_i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.as_number().map(Number::as_f64)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text.as_str()),
            _ => None,
        }
    }

    /// The value as a character: either a char value or a one character
    /// string.
    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            Value::Text(text) => {
                let mut chars = text.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => Some(c),
                    _ => None,
                }
            }
            _ => None,
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<bool> for Value {
    fn from(p: bool) -> Self {
        Value::Boolean(p)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<String> for Value {
    fn from(text: String) -> Self {
        Value::Text(text)
    }
}

impl From<Number> for Value {
    fn from(n: Number) -> Self {
        Value::Number(n)
    }
}

macro_rules! value_from_number {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Value::Number(Number::from(n))
                }
            }
        )*
    };
}

value_from_number!(i8, i16, i32, i64, u8, u16, u32, u64, f32, f64);
