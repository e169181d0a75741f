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

use crate::{Number, Value, ValueCategory};
use num_bigint::{BigInt, BigUint};

#[test]
fn numbers_compare_across_variants() {
    assert_eq!(Number::Int(1), Number::UInt(1));
    assert_eq!(Number::UInt(42), Number::BigUint(BigUint::from(42u32)));
    assert_eq!(Number::Int(-5), Number::BigInt(BigInt::from(-5)));
    assert_ne!(Number::Int(1), Number::Int(2));
    assert_ne!(Number::UInt(0), Number::Int(-1));
}

#[test]
fn float_comparisons() {
    assert_eq!(Number::Float(2.0), Number::Float(2.0));
    assert_eq!(Number::Float(2.0), Number::Int(2));
    assert_ne!(Number::Float(2.5), Number::Int(2));
    assert_ne!(Number::Float(f64::NAN), Number::Float(f64::NAN));
}

#[test]
fn number_ordering() {
    assert!(Number::Int(-1) < Number::UInt(0));
    assert!(Number::UInt(10) > Number::Int(9));
    assert!(Number::Float(0.5) < Number::Int(1));
    assert!(Number::BigUint(BigUint::from(u64::MAX)) < Number::BigInt(BigInt::from(u128::MAX)));
}

#[test]
fn float_display_round_trips() {
    assert_eq!(Number::Float(2.0).to_string(), "2.0");
    assert_eq!(Number::Float(-0.25).to_string(), "-0.25");
    assert_eq!(Number::Int(-3).to_string(), "-3");
}

#[test]
fn value_categories() {
    assert_eq!(Value::Null.category(), ValueCategory::Null);
    assert_eq!(Value::Boolean(true).category(), ValueCategory::Boolean);
    assert_eq!(Value::from(3).category(), ValueCategory::Number);
    assert_eq!(Value::Char('a').category(), ValueCategory::Char);
    assert_eq!(Value::text("a").category(), ValueCategory::String);
    assert_eq!(Value::array::<Value>(vec![]).category(), ValueCategory::Collection);
    assert_eq!(Value::empty_object().category(), ValueCategory::Map);
}

#[test]
fn object_lookup_preserves_first_entry() {
    let value = Value::object(vec![
        ("a".to_string(), Value::from(1)),
        ("b".to_string(), Value::from(2)),
        ("a".to_string(), Value::from(3)),
    ]);
    assert_eq!(value.get("a"), Some(&Value::from(1)));
    assert_eq!(value.get("b"), Some(&Value::from(2)));
    assert_eq!(value.get("c"), None);
}

#[test]
fn emptiness() {
    assert!(Value::empty_object().is_empty());
    assert!(Value::Array(vec![]).is_empty());
    assert!(!Value::text("").is_empty());
    assert!(!Value::Null.is_empty());
}

#[test]
fn char_coercion() {
    assert_eq!(Value::Char('x').as_char(), Some('x'));
    assert_eq!(Value::text("x").as_char(), Some('x'));
    assert_eq!(Value::text("xy").as_char(), None);
    assert_eq!(Value::text("").as_char(), None);
}

#[test]
fn numeric_coercion() {
    assert_eq!(Value::from(12i32).as_i64(), Some(12));
    assert_eq!(Value::from(12u64).as_i64(), Some(12));
    assert_eq!(Value::from(2.5f64).as_i64(), None);
    assert_eq!(Value::from(2.5f64).as_f64(), Some(2.5));
}
