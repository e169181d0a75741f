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

//! Conversion of generic document values into typed parse products. Used by
//! the parsers to re-type entries that were read before a type discriminator
//! resolved the target, and available to hosts that parse generically and
//! assign types afterwards.

use crate::context::TypeContext;
use crate::error::ConvertError;
use crate::hint::TypeHint;
use crate::parsed::Parsed;
use marshal_model::{Number, Value};

/// Convert a document value to the shape demanded by the hint. Null converts
/// to null under every hint; whether null is assignable at its destination
/// is the destination's concern.
pub fn convert(value: Value, hint: &TypeHint, context: &TypeContext) -> Result<Parsed, ConvertError> {
    if matches!(value, Value::Null) {
        return Ok(Parsed::Value(Value::Null));
    }
    match hint {
        TypeHint::Any => Ok(Parsed::Value(value)),
        TypeHint::Boolean => match &value {
            Value::Boolean(_) => Ok(Parsed::Value(value)),
            Value::Text(text) => match text.as_str() {
                "true" => Ok(Parsed::Value(Value::Boolean(true))),
                "false" => Ok(Parsed::Value(Value::Boolean(false))),
                _ => Err(ConvertError::Malformatted {
                    expected: hint.clone(),
                    text: text.clone(),
                }),
            },
            _ => Err(mismatch(hint, &value)),
        },
        TypeHint::Number => match &value {
            Value::Number(_) => Ok(Parsed::Value(value)),
            Value::Text(text) => parse_numeric_text(text)
                .map(|n| Parsed::Value(Value::Number(n)))
                .ok_or_else(|| ConvertError::Malformatted {
                    expected: hint.clone(),
                    text: text.clone(),
                }),
            _ => Err(mismatch(hint, &value)),
        },
        TypeHint::String => match value {
            Value::Text(_) => Ok(Parsed::Value(value)),
            Value::Char(c) => Ok(Parsed::Value(Value::Text(c.to_string()))),
            Value::Number(n) => Ok(Parsed::Value(Value::Text(n.to_string()))),
            Value::Boolean(p) => Ok(Parsed::Value(Value::Text(p.to_string()))),
            other => Err(mismatch(hint, &other)),
        },
        TypeHint::Char => match value.as_char() {
            Some(c) => Ok(Parsed::Value(Value::Char(c))),
            None => Err(mismatch(hint, &value)),
        },
        TypeHint::Map(values) => match value {
            Value::Object(entries) => {
                let converted = entries
                    .into_iter()
                    .map(|(key, value)| convert(value, values, context).map(|v| (key, v)))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Parsed::from_entries(converted))
            }
            other => Err(mismatch(hint, &other)),
        },
        TypeHint::Collection(elements) | TypeHint::Array(elements) => match value {
            Value::Array(items) => {
                let converted = items
                    .into_iter()
                    .map(|item| convert(item, elements, context))
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(Parsed::from_items(converted))
            }
            other => Err(mismatch(hint, &other)),
        },
        TypeHint::Bean(ty) => {
            if let Some(substitution) = context.substitution(*ty) {
                let surrogate = convert(value, substitution.surrogate(), context)?;
                return substitution.unswap(surrogate);
            }
            match value {
                Value::Object(entries) => {
                    let class = context.introspect(*ty).ok_or(ConvertError::NoSuchClass)?;
                    let mut instance = class.new_instance();
                    for (key, value) in entries {
                        if let Some(property) = class.property(&key) {
                            if matches!(value, Value::Null) {
                                continue;
                            }
                            let converted = convert(value, property.hint(), context)?;
                            property.set(instance.as_mut(), converted)?;
                        }
                    }
                    Ok(Parsed::Bean(instance))
                }
                other => Err(mismatch(hint, &other)),
            }
        }
    }
}

fn mismatch(expected: &TypeHint, actual: &Value) -> ConvertError {
    ConvertError::NotConvertible {
        expected: expected.clone(),
        actual: actual.category(),
    }
}

fn parse_numeric_text(text: &str) -> Option<Number> {
    if let Ok(n) = text.parse::<i64>() {
        return Some(Number::Int(n));
    }
    if let Ok(n) = text.parse::<u64>() {
        return Some(Number::UInt(n));
    }
    if let Ok(n) = text.parse::<num_bigint::BigInt>() {
        return Some(Number::BigInt(n));
    }
    text.parse::<f64>().ok().map(Number::Float)
}

#[cfg(test)]
mod tests {
    use super::convert;
    use crate::context::TypeContext;
    use crate::error::{BeanError, ConvertError};
    use crate::hint::TypeHint;
    use crate::parsed::Parsed;
    use crate::reflect::{shared, BeanClass};
    use marshal_model::{Number, Value};

    fn ctx() -> TypeContext {
        TypeContext::default()
    }

    #[test]
    fn scalar_coercions() {
        let boolean = convert(Value::text("true"), &TypeHint::Boolean, &ctx()).unwrap();
        assert_eq!(boolean.as_value(), Some(&Value::Boolean(true)));

        let number = convert(Value::text("-17"), &TypeHint::Number, &ctx()).unwrap();
        assert_eq!(number.as_value(), Some(&Value::Number(Number::Int(-17))));

        let text = convert(Value::from(12), &TypeHint::String, &ctx()).unwrap();
        assert_eq!(text.as_value(), Some(&Value::text("12")));

        let ch = convert(Value::text("x"), &TypeHint::Char, &ctx()).unwrap();
        assert_eq!(ch.as_value(), Some(&Value::Char('x')));
    }

    #[test]
    fn null_converts_under_any_hint() {
        for hint in [
            TypeHint::Any,
            TypeHint::Number,
            TypeHint::map(TypeHint::Any),
            TypeHint::bean::<String>(),
        ] {
            let parsed = convert(Value::Null, &hint, &ctx()).unwrap();
            assert!(parsed.is_null());
        }
    }

    #[test]
    fn mismatch_is_an_error() {
        let error = convert(Value::from(1), &TypeHint::map(TypeHint::Any), &ctx());
        assert!(matches!(
            error,
            Err(ConvertError::NotConvertible { .. })
        ));
    }

    #[test]
    fn containers_of_plain_values_fold_to_values() {
        let value = Value::array(vec![Value::from(1), Value::from(2)]);
        let parsed = convert(value.clone(), &TypeHint::collection(TypeHint::Number), &ctx());
        assert_eq!(parsed.unwrap().into_value().unwrap(), value);
    }

    #[derive(Default, PartialEq, Debug)]
    struct Tag {
        id: i64,
    }

    fn tag_class() -> BeanClass {
        BeanClass::of::<Tag>()
            .property(
                "id",
                TypeHint::Number,
                |t| shared(t.id),
                |t, v| {
                    t.id = v
                        .as_value()
                        .and_then(Value::as_i64)
                        .ok_or_else(|| BeanError::NotAssignable("expected an integer".to_string()))?;
                    Ok(())
                },
            )
            .build()
    }

    #[test]
    fn object_converts_to_bean() {
        let context = TypeContext::builder().bean(tag_class()).build();
        let value = Value::object(vec![("id".to_string(), Value::from(9))]);
        let parsed = convert(value, &TypeHint::bean::<Tag>(), &context).unwrap();
        let tag = parsed.downcast::<Tag>().expect("not a bean");
        assert_eq!(*tag, Tag { id: 9 });
    }

    #[test]
    fn unknown_bean_class_is_an_error() {
        let value = Value::object(vec![("id".to_string(), Value::from(9))]);
        let error = convert(value, &TypeHint::bean::<Tag>(), &ctx());
        assert!(matches!(error, Err(ConvertError::NoSuchClass)));
    }

    #[test]
    fn beans_inside_containers_stay_structural() {
        let context = TypeContext::builder().bean(tag_class()).build();
        let value = Value::array(vec![Value::object(vec![(
            "id".to_string(),
            Value::from(1),
        )])]);
        let parsed = convert(
            value,
            &TypeHint::collection(TypeHint::bean::<Tag>()),
            &context,
        )
        .unwrap();
        match parsed {
            Parsed::List(items) => {
                assert_eq!(items.len(), 1);
                assert!(matches!(items[0], Parsed::Bean(_)));
            }
            other => panic!("expected a structural list, got {:?}", other),
        }
    }
}
