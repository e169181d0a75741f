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

use marshal_core::{
    shared, BeanClass, BeanError, ConvertError, Node, ParserConfig, SerializeError,
    SerializerConfig, Shared, TypeContext, TypeHint, TypeSubstitution,
};
use marshal_json::{parse_json, to_json_string};
use marshal_model::Value;
use std::cell::RefCell;
use std::rc::Rc;

fn round_trip(value: &Value, serializer: &SerializerConfig, parser: &ParserConfig) -> Value {
    let context = TypeContext::default();
    let text = to_json_string(Node::Value(value), &context, serializer).expect("serialize failed");
    parse_json(&text, &TypeHint::Any, &context, parser)
        .unwrap_or_else(|e| panic!("parse of '{}' failed: {}", text, e))
        .into_value()
        .expect("not a value")
}

fn samples() -> Vec<Value> {
    vec![
        Value::Null,
        Value::Boolean(true),
        Value::from(0),
        Value::from(-42i64),
        Value::from(u64::MAX),
        Value::from(2.5f64),
        Value::from(-0.125f64),
        Value::text(""),
        Value::text("plain"),
        Value::text("esc \" \\ \n \t done"),
        Value::Array(vec![]),
        Value::empty_object(),
        Value::array(vec![Value::from(1), Value::from(2), Value::from(3)]),
        Value::object(vec![
            ("name".to_string(), Value::text("unit")),
            ("ratio".to_string(), Value::from(0.5f64)),
            (
                "tags".to_string(),
                Value::array(vec![Value::text("a"), Value::text("b")]),
            ),
            (
                "nested".to_string(),
                Value::object(vec![("deep".to_string(), Value::Null)]),
            ),
        ]),
    ]
}

#[test]
fn round_trip_law_strict() {
    let serializer = SerializerConfig::default();
    let parser = ParserConfig::default().with_strict(true);
    for value in samples() {
        assert_eq!(round_trip(&value, &serializer, &parser), value);
    }
}

#[test]
fn round_trip_law_lax_with_whitespace_and_single_quotes() {
    let serializer = SerializerConfig::default()
        .with_whitespace(true)
        .with_quote_char('\'');
    let parser = ParserConfig::default();
    for value in samples() {
        assert_eq!(round_trip(&value, &serializer, &parser), value);
    }
}

#[test]
fn cycle_detection_policies() {
    let map: Rc<RefCell<Vec<(String, Shared)>>> = Rc::new(RefCell::new(vec![]));
    let cycle: Shared = map.clone();
    map.borrow_mut().push(("me".to_string(), cycle));
    let context = TypeContext::default();

    let strict = SerializerConfig::default().with_detect_recursions(true);
    let error = to_json_string(Node::Shared(map.clone()), &context, &strict)
        .expect_err("expected a recursion failure");
    assert!(matches!(error, SerializeError::Recursion { .. }));

    let lenient = SerializerConfig::default()
        .with_detect_recursions(true)
        .with_ignore_recursions(true);
    let text = to_json_string(Node::Shared(map.clone()), &context, &lenient)
        .expect("serialize failed");
    assert_eq!(text, "{\"me\":null}");
}

#[test]
fn depth_bound_is_exact() {
    fn chain(depth: usize) -> Value {
        let mut value = Value::from(1);
        for _ in 0..depth {
            value = Value::object(vec![("v".to_string(), value)]);
        }
        value
    }
    let context = TypeContext::default();
    let config = SerializerConfig::default().with_max_depth(5);
    assert!(to_json_string(Node::Value(&chain(5)), &context, &config).is_ok());
    let error = to_json_string(Node::Value(&chain(6)), &context, &config)
        .expect_err("expected a depth failure");
    assert!(matches!(error, SerializeError::DepthExceeded { .. }));
}

#[derive(Debug, PartialEq)]
struct Shape {
    sides: i64,
}

impl Default for Shape {
    fn default() -> Self {
        Shape { sides: 0 }
    }
}

#[derive(Debug, PartialEq, Default)]
struct Circle {
    radius: f64,
}

fn shape_class() -> BeanClass {
    BeanClass::of::<Shape>()
        .property(
            "sides",
            TypeHint::Number,
            |s| shared(s.sides),
            |s, v| {
                s.sides = v
                    .as_value()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| BeanError::NotAssignable("expected an integer".to_string()))?;
                Ok(())
            },
        )
        .build()
}

fn circle_class() -> BeanClass {
    BeanClass::of::<Circle>()
        .property(
            "radius",
            TypeHint::Number,
            |c| shared(c.radius),
            |c, v| {
                c.radius = v
                    .as_value()
                    .and_then(Value::as_f64)
                    .ok_or_else(|| BeanError::NotAssignable("expected a number".to_string()))?;
                Ok(())
            },
        )
        .build()
}

fn shape_context() -> TypeContext {
    TypeContext::builder()
        .named_bean("shape", shape_class())
        .named_bean("circle", circle_class())
        .build()
}

#[test]
fn type_discriminator_round_trip() {
    let context = shape_context();
    let serializer = SerializerConfig::default().with_type_discriminator(true);

    let circle = Circle { radius: 1.5 };
    let text =
        to_json_string(Node::any(&circle), &context, &serializer).expect("serialize failed");
    assert_eq!(text, "{\"_type\":\"circle\",\"radius\":1.5}");

    // Parsing back against the supertype hint yields the subtype.
    let parsed = parse_json(
        &text,
        &TypeHint::bean::<Shape>(),
        &context,
        &ParserConfig::default(),
    )
    .expect("parse failed");
    let back = parsed.downcast::<Circle>().expect("not a circle");
    assert_eq!(*back, Circle { radius: 1.5 });
}

#[test]
fn bean_round_trip_without_discriminator() {
    let context = shape_context();
    let shape = Shape { sides: 6 };
    let text = to_json_string(
        Node::any(&shape),
        &context,
        &SerializerConfig::default(),
    )
    .expect("serialize failed");
    assert_eq!(text, "{\"sides\":6}");
    let parsed = parse_json(
        &text,
        &TypeHint::bean::<Shape>(),
        &context,
        &ParserConfig::default().with_strict(true),
    )
    .expect("parse failed");
    assert_eq!(*parsed.downcast::<Shape>().expect("not a shape"), Shape { sides: 6 });
}

#[test]
fn substitution_round_trip() {
    #[derive(Debug, PartialEq)]
    struct Tick(u64);

    let substitution = TypeSubstitution::new::<Tick>(
        TypeHint::Number,
        |t| shared(t.0),
        |parsed| {
            parsed
                .as_value()
                .and_then(Value::as_number)
                .and_then(marshal_model::Number::as_u64)
                .map(Tick)
                .ok_or_else(|| ConvertError::Malformatted {
                    expected: TypeHint::Number,
                    text: "not a tick".to_string(),
                })
        },
    );
    let context = TypeContext::builder()
        .substitution::<Tick>(substitution)
        .build();

    let tick = Tick(88);
    let text = to_json_string(
        Node::any(&tick),
        &context,
        &SerializerConfig::default(),
    )
    .expect("serialize failed");
    assert_eq!(text, "88");

    let parsed = parse_json(
        &text,
        &TypeHint::bean::<Tick>(),
        &context,
        &ParserConfig::default().with_strict(true),
    )
    .expect("parse failed");
    assert_eq!(*parsed.downcast::<Tick>().expect("not a tick"), Tick(88));
}

#[test]
fn trimmed_and_sorted_output() {
    let context = TypeContext::default();
    let config = SerializerConfig::default()
        .with_trim_null_properties(true)
        .with_trim_empty_collections(true)
        .with_sort_maps(true);
    let value = Value::object(vec![
        ("z".to_string(), Value::from(1)),
        ("gone".to_string(), Value::Null),
        ("empty".to_string(), Value::Array(vec![])),
        ("a".to_string(), Value::from(2)),
    ]);
    let text = to_json_string(Node::Value(&value), &context, &config).expect("serialize failed");
    assert_eq!(text, "{\"a\":2,\"z\":1}");
}
