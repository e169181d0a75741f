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

use crate::error::ConvertError;
use marshal_model::Value;
use std::any::Any;

/// The product of a parse or conversion. Positions typed by a bean hint
/// produce constructed instances which cannot be represented inside a
/// [`Value`] tree; containers holding such instances are represented
/// structurally with [`Parsed`] elements instead.
#[derive(Debug)]
pub enum Parsed {
    /// A plain document value.
    Value(Value),
    /// A constructed bean instance (or an unswapped substitution product).
    Bean(Box<dyn Any>),
    /// A sequence at least one element of which is not a plain value.
    List(Vec<Parsed>),
    /// A keyed sequence at least one value of which is not a plain value.
    Map(Vec<(String, Parsed)>),
}

impl Parsed {
    pub fn is_null(&self) -> bool {
        matches!(self, Parsed::Value(Value::Null))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Parsed::Value(value) => Some(value),
            _ => None,
        }
    }

    /// Recover the document value, failing if a bean instance occurs
    /// anywhere in the result.
    pub fn into_value(self) -> Result<Value, ConvertError> {
        match self {
            Parsed::Value(value) => Ok(value),
            Parsed::Bean(_) => Err(ConvertError::NotAValue),
            Parsed::List(items) => items
                .into_iter()
                .map(Parsed::into_value)
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Array),
            Parsed::Map(entries) => entries
                .into_iter()
                .map(|(key, parsed)| parsed.into_value().map(|value| (key, value)))
                .collect::<Result<Vec<_>, _>>()
                .map(Value::Object),
        }
    }

    /// Recover a bean instance of type `T`, returning the input unchanged if
    /// it is anything else.
    pub fn downcast<T: Any>(self) -> Result<Box<T>, Parsed> {
        match self {
            Parsed::Bean(instance) => instance.downcast::<T>().map_err(Parsed::Bean),
            other => Err(other),
        }
    }

    /// Collect a sequence of results into a single [`Parsed`], folding down
    /// to a plain [`Value`] array when every element is one.
    pub fn from_items(items: Vec<Parsed>) -> Parsed {
        if items.iter().all(|item| matches!(item, Parsed::Value(_))) {
            let values = items
                .into_iter()
                .map(|item| match item {
                    Parsed::Value(value) => value,
                    _ => unreachable!("checked above"),
                })
                .collect();
            Parsed::Value(Value::Array(values))
        } else {
            Parsed::List(items)
        }
    }

    /// As [`Parsed::from_items`] but for keyed entries.
    pub fn from_entries(entries: Vec<(String, Parsed)>) -> Parsed {
        if entries
            .iter()
            .all(|(_, parsed)| matches!(parsed, Parsed::Value(_)))
        {
            let values = entries
                .into_iter()
                .map(|(key, parsed)| match parsed {
                    Parsed::Value(value) => (key, value),
                    _ => unreachable!("checked above"),
                })
                .collect();
            Parsed::Value(Value::Object(values))
        } else {
            Parsed::Map(entries)
        }
    }
}

impl From<Value> for Parsed {
    fn from(value: Value) -> Self {
        Parsed::Value(value)
    }
}
