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

use crate::error::ParseErrorKind;
use crate::{parse_json, parse_json_value, parse_json_with_listener};
use marshal_core::{
    shared, BeanClass, BeanError, ParserConfig, ParserListener, TypeContext, TypeHint,
};
use marshal_model::{Number, Value};

fn lax() -> ParserConfig {
    ParserConfig::default()
}

fn strict() -> ParserConfig {
    ParserConfig::default().with_strict(true)
}

fn parse_value(input: &str, config: &ParserConfig) -> Value {
    parse_json(input, &TypeHint::Any, &TypeContext::default(), config)
        .expect("parse failed")
        .into_value()
        .expect("not a value")
}

fn parse_failure(input: &str, hint: &TypeHint, config: &ParserConfig) -> ParseErrorKind {
    match parse_json(input, hint, &TypeContext::default(), config) {
        Ok(_) => panic!("parse of '{}' unexpectedly succeeded", input),
        Err(error) => error.kind,
    }
}

#[test]
fn parses_scalars() {
    assert_eq!(parse_value("true", &strict()), Value::Boolean(true));
    assert_eq!(parse_value("false", &strict()), Value::Boolean(false));
    assert_eq!(parse_value("null", &strict()), Value::Null);
    assert_eq!(parse_value("42", &strict()), Value::from(42u64));
    assert_eq!(parse_value("-17", &strict()), Value::from(-17i64));
    assert_eq!(parse_value("2.5", &strict()), Value::from(2.5f64));
    assert_eq!(parse_value("\"hello\"", &strict()), Value::text("hello"));
}

#[test]
fn parses_composites() {
    assert_eq!(
        parse_value("{\"a\": 1, \"b\": [true, null]}", &strict()),
        Value::object(vec![
            ("a".to_string(), Value::from(1u64)),
            (
                "b".to_string(),
                Value::Array(vec![Value::Boolean(true), Value::Null])
            ),
        ])
    );
    assert_eq!(parse_value("{}", &strict()), Value::empty_object());
    assert_eq!(parse_value("[]", &strict()), Value::Array(vec![]));
}

#[test]
fn object_grammar_violations() {
    assert!(matches!(
        parse_failure("{\"a\" 1}", &TypeHint::Any, &strict()),
        ParseErrorKind::Expected(_)
    ));
    assert!(matches!(
        parse_failure("{\"a\": 1", &TypeHint::Any, &strict()),
        ParseErrorKind::UnexpectedEof(_)
    ));
    assert!(matches!(
        parse_failure("{\"a\": 1 \"b\": 2}", &TypeHint::Any, &strict()),
        ParseErrorKind::Expected(_)
    ));
}

#[test]
fn error_location_is_reported() {
    let error = parse_json(
        "{\n  \"a\": 01\n}",
        &TypeHint::Any,
        &TypeContext::default(),
        &strict(),
    )
    .expect_err("expected a failure");
    assert_eq!(error.location.line, 2);
    assert!(matches!(error.kind, ParseErrorKind::InvalidNumber(_)));
}

#[test]
fn strict_rejects_leading_zero_and_lax_accepts() {
    assert!(matches!(
        parse_failure("01", &TypeHint::Any, &strict()),
        ParseErrorKind::InvalidNumber(_)
    ));
    assert_eq!(
        parse_value("01", &lax()),
        Value::Number(Number::UInt(1))
    );
}

#[test]
fn strict_rejects_lax_only_forms() {
    assert!(matches!(
        parse_failure("'single'", &TypeHint::Any, &strict()),
        ParseErrorKind::InvalidQuote('\'')
    ));
    assert!(matches!(
        parse_failure("{a: 1}", &TypeHint::Any, &strict()),
        ParseErrorKind::UnquotedAttribute
    ));
    assert!(matches!(
        parse_failure("\"a\" + \"b\"", &TypeHint::Any, &strict()),
        ParseErrorKind::Concatenation
    ));
    assert!(matches!(
        parse_failure("/* note */ 1", &TypeHint::Any, &strict()),
        ParseErrorKind::Comment
    ));
    assert!(matches!(
        parse_failure("[1, 2,]", &TypeHint::Any, &strict()),
        ParseErrorKind::TrailingComma
    ));
    assert!(matches!(
        parse_failure("", &TypeHint::Any, &strict()),
        ParseErrorKind::EmptyInput
    ));
    assert!(matches!(
        parse_failure("[,1]", &TypeHint::Any, &strict()),
        ParseErrorKind::MissingValue
    ));
}

#[test]
fn lax_accepts_relaxed_forms() {
    assert_eq!(parse_value("'single'", &lax()), Value::text("single"));
    assert_eq!(
        parse_value("{a: 1}", &lax()),
        Value::object(vec![("a".to_string(), Value::from(1u64))])
    );
    assert_eq!(parse_value("\"a\" + \"b\"", &lax()), Value::text("ab"));
    assert_eq!(parse_value("/* note */ 1 // end", &lax()), Value::from(1u64));
    assert_eq!(
        parse_value("[1, 2,]", &lax()),
        Value::Array(vec![Value::from(1u64), Value::from(2u64)])
    );
    assert_eq!(parse_value("", &lax()), Value::Null);
    assert_eq!(
        parse_value("[,1]", &lax()),
        Value::Array(vec![Value::Null, Value::from(1u64)])
    );
    assert_eq!(parse_value("{\"a\": 1};", &lax()), parse_value("{\"a\":1}", &lax()));
}

#[test]
fn unquoted_strings_for_string_hint() {
    let parsed = parse_json(
        "plain",
        &TypeHint::String,
        &TypeContext::default(),
        &lax(),
    )
    .expect("parse failed");
    assert_eq!(
        parsed.into_value().expect("not a value"),
        Value::text("plain")
    );
}

#[test]
fn escape_table() {
    assert_eq!(
        parse_value(r#""a\nb\tc\\d\/e\"f""#, &strict()),
        Value::text("a\nb\tc\\d/e\"f")
    );
    assert_eq!(
        parse_value(r#""\u0041\u00e9""#, &strict()),
        Value::text("A\u{e9}")
    );
    assert!(matches!(
        parse_failure(r#""\q""#, &TypeHint::Any, &strict()),
        ParseErrorKind::InvalidEscape
    ));
    assert!(matches!(
        parse_failure(r#""\u00g1""#, &TypeHint::Any, &strict()),
        ParseErrorKind::InvalidUnicodeEscape
    ));
}

#[test]
fn strict_rejects_raw_control_characters() {
    assert!(matches!(
        parse_failure("\"a\nb\"", &TypeHint::Any, &strict()),
        ParseErrorKind::UnescapedControl(0x0A)
    ));
    assert_eq!(parse_value("\"a\nb\"", &lax()), Value::text("a\nb"));
}

#[test]
fn remainder_is_an_error() {
    assert!(matches!(
        parse_failure("1 2", &TypeHint::Any, &strict()),
        ParseErrorKind::Remainder('2')
    ));
}

#[test]
fn depth_bound() {
    let config = lax().with_max_depth(4);
    let fits = "[[[[1]]]]";
    parse_json(fits, &TypeHint::Any, &TypeContext::default(), &config).expect("parse failed");
    let too_deep = "[[[[[1]]]]]";
    assert!(matches!(
        parse_failure(too_deep, &TypeHint::Any, &config),
        ParseErrorKind::DepthExceeded(4)
    ));
}

#[test]
fn typed_scalar_hints() {
    let context = TypeContext::default();
    let number = parse_json("\"34\"", &TypeHint::Number, &context, &lax()).expect("parse failed");
    assert_eq!(
        number.into_value().expect("not a value"),
        Value::Number(Number::Int(34))
    );
    let ch = parse_json("\"x\"", &TypeHint::Char, &context, &strict()).expect("parse failed");
    assert_eq!(ch.into_value().expect("not a value"), Value::Char('x'));
    let flag = parse_json("\"true\"", &TypeHint::Boolean, &context, &lax()).expect("parse failed");
    assert_eq!(
        flag.into_value().expect("not a value"),
        Value::Boolean(true)
    );
}

#[derive(Default, Debug, PartialEq)]
struct OnlyX {
    x: i64,
}

fn only_x_class() -> BeanClass {
    BeanClass::of::<OnlyX>()
        .property(
            "x",
            TypeHint::Number,
            |b| shared(b.x),
            |b, v| {
                b.x = v
                    .as_value()
                    .and_then(Value::as_i64)
                    .ok_or_else(|| BeanError::NotAssignable("expected an integer".to_string()))?;
                Ok(())
            },
        )
        .build()
}

#[test]
fn unknown_properties_are_discarded_when_ignored() {
    let context = TypeContext::builder().bean(only_x_class()).build();
    let parsed = parse_json(
        "{\"x\": 1, \"y\": {\"deep\": [1, 2]}}",
        &TypeHint::bean::<OnlyX>(),
        &context,
        &lax(),
    )
    .expect("parse failed");
    let bean = parsed.downcast::<OnlyX>().expect("not a bean");
    assert_eq!(*bean, OnlyX { x: 1 });
}

#[test]
fn unknown_properties_fail_when_not_ignored() {
    let context = TypeContext::builder().bean(only_x_class()).build();
    let config = lax().with_ignore_unknown_properties(false);
    let error = parse_json(
        "{\"x\": 1, \"y\": 2}",
        &TypeHint::bean::<OnlyX>(),
        &context,
        &config,
    )
    .expect_err("expected a failure");
    match error.kind {
        ParseErrorKind::UnknownProperty(name) => assert_eq!(name, "y"),
        other => panic!("unexpected kind: {}", other),
    }
}

#[derive(Default)]
struct Listener {
    unknown: Vec<String>,
}

impl ParserListener for Listener {
    fn on_unknown_property(&mut self, name: &str, _line: u32, _column: usize) {
        self.unknown.push(name.to_string());
    }
}

#[test]
fn listener_sees_discarded_properties() {
    let context = TypeContext::builder().bean(only_x_class()).build();
    let mut listener = Listener::default();
    parse_json_with_listener(
        "{\"y\": 2, \"x\": 1}",
        &TypeHint::bean::<OnlyX>(),
        &context,
        &lax(),
        &mut listener,
    )
    .expect("parse failed");
    assert_eq!(listener.unknown, vec!["y".to_string()]);
}

#[test]
fn bean_hint_without_class_fails() {
    let error = parse_failure(
        "{\"x\": 1}",
        &TypeHint::bean::<OnlyX>(),
        &lax(),
    );
    assert!(matches!(error, ParseErrorKind::NoSuchClass));
}

#[test]
fn unresolvable_discriminator_degrades_to_a_map() {
    let value = parse_value("{\"_type\": \"mystery\", \"x\": 1}", &lax());
    assert_eq!(
        value,
        Value::object(vec![
            ("_type".to_string(), Value::text("mystery")),
            ("x".to_string(), Value::from(1u64)),
        ])
    );
}

#[test]
fn discriminator_resolves_dynamic_objects() {
    let context = TypeContext::builder()
        .named_bean("only_x", only_x_class())
        .build();
    let parsed = parse_json(
        "{\"_type\": \"only_x\", \"x\": 7}",
        &TypeHint::Any,
        &context,
        &lax(),
    )
    .expect("parse failed");
    let bean = parsed.downcast::<OnlyX>().expect("not a bean");
    assert_eq!(*bean, OnlyX { x: 7 });
}

#[test]
fn discriminator_after_properties_still_resolves() {
    let context = TypeContext::builder()
        .named_bean("only_x", only_x_class())
        .build();
    let parsed = parse_json(
        "{\"x\": 7, \"_type\": \"only_x\"}",
        &TypeHint::Any,
        &context,
        &lax(),
    )
    .expect("parse failed");
    let bean = parsed.downcast::<OnlyX>().expect("not a bean");
    assert_eq!(*bean, OnlyX { x: 7 });
}

#[test]
fn map_hint_treats_discriminator_as_data() {
    let context = TypeContext::builder()
        .named_bean("only_x", only_x_class())
        .build();
    let parsed = parse_json(
        "{\"_type\": \"only_x\", \"x\": 7}",
        &TypeHint::map(TypeHint::Any),
        &context,
        &lax(),
    )
    .expect("parse failed");
    let value = parsed.into_value().expect("not a value");
    assert_eq!(value.get("_type"), Some(&Value::text("only_x")));
}

#[test]
fn parse_json_value_round_trip_helper() {
    assert_eq!(
        parse_json_value("[1, \"two\", 3.0, null]").expect("parse failed"),
        Value::Array(vec![
            Value::from(1u64),
            Value::text("two"),
            Value::from(3.0f64),
            Value::Null
        ])
    );
}
