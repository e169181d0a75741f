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

//! JSON support for the marshalling engine: a [`writer::JsonWriter`] token
//! sink for output and a [`parser::ParserSession`] for input, plus the top
//! level convenience functions.

mod error;
pub mod parser;
pub mod writer;

pub use error::{Location, ParseError, ParseErrorKind};
pub use parser::ParserSession;
pub use writer::{write_string_literal, JsonWriter};

use marshal_core::{
    Node, Parsed, ParserConfig, ParserListener, SerializeError, SerializerConfig,
    SerializerSession, TypeContext, TypeHint,
};
use marshal_model::Value;
use std::fmt::Write;

/// Serialize the object graph rooted at `node` to a JSON string.
pub fn to_json_string(
    node: Node<'_>,
    context: &TypeContext,
    config: &SerializerConfig,
) -> Result<String, SerializeError> {
    let mut out = String::new();
    write_json(node, &mut out, context, config)?;
    Ok(out)
}

/// Serialize the object graph rooted at `node` as JSON into any formatter.
pub fn write_json<W: Write>(
    node: Node<'_>,
    out: &mut W,
    context: &TypeContext,
    config: &SerializerConfig,
) -> Result<(), SerializeError> {
    let mut writer = JsonWriter::new(out, config);
    let mut session = SerializerSession::new(config, context);
    session.serialize(node, &mut writer)
}

/// Parse a single value of the expected type from the input.
pub fn parse_json(
    input: &str,
    hint: &TypeHint,
    context: &TypeContext,
    config: &ParserConfig,
) -> Result<Parsed, ParseError> {
    let mut session = ParserSession::new(input, context, config);
    session.parse(hint)
}

/// As [`parse_json`], notifying the listener of discarded unknown
/// properties.
pub fn parse_json_with_listener(
    input: &str,
    hint: &TypeHint,
    context: &TypeContext,
    config: &ParserConfig,
    listener: &mut dyn ParserListener,
) -> Result<Parsed, ParseError> {
    let mut session = ParserSession::with_listener(input, context, config, listener);
    session.parse(hint)
}

/// Parse the input into a plain document value with the default (lax)
/// configuration.
pub fn parse_json_value(input: &str) -> Result<Value, ParseError> {
    let parsed = parse_json(
        input,
        &TypeHint::Any,
        &TypeContext::default(),
        &ParserConfig::default(),
    )?;
    parsed.into_value().map_err(|e| ParseError {
        kind: e.into(),
        location: Location { line: 1, column: 1 },
        context: String::new(),
    })
}
