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

//! The JSON token sink: turns the session's token stream into JSON text,
//! compact or whitespace separated, honouring the configured quote
//! character and indentation cap.


use marshal_core::{SerializerConfig, TokenSink};
use marshal_model::Number;
use std::fmt::Write;

const INDENT: &str = "    ";

/// Write a string literal with the given quote character, escaping the
/// quote itself, backslashes and control characters.
pub fn write_string_literal<W: Write>(out: &mut W, value: &str, quote: char) -> std::fmt::Result {
    out.write_char(quote)?;
    for c in value.chars() {
        match c {
            c if c == quote => {
                out.write_char('\\')?;
                out.write_char(c)?;
            }
            '\\' => out.write_str("\\\\")?,
            '\u{08}' => out.write_str("\\b")?,
            '\u{0c}' => out.write_str("\\f")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char(quote)
}

/// A [`TokenSink`] writing JSON text to an underlying formatter.
pub struct JsonWriter<'a, W> {
    out: W,
    config: &'a SerializerConfig,
    depth: usize,
    /// Whether the next entry of the composite at each level is the first.
    first: Vec<bool>,
}

impl<'a, W: Write> JsonWriter<'a, W> {
    pub fn new(out: W, config: &'a SerializerConfig) -> Self {
        JsonWriter {
            out,
            config,
            depth: config.initial_depth,
            first: vec![],
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn indent(&mut self) -> std::fmt::Result {
        if self.config.use_whitespace {
            self.out.write_char('\n')?;
            for _ in 0..self.depth.min(self.config.max_indent) {
                self.out.write_str(INDENT)?;
            }
        }
        Ok(())
    }

    fn separate(&mut self) -> std::fmt::Result {
        match self.first.last_mut() {
            Some(first) if *first => {
                *first = false;
            }
            Some(_) => {
                self.out.write_char(',')?;
            }
            None => {}
        }
        self.indent()
    }

    fn open(&mut self, token: char) -> std::fmt::Result {
        self.out.write_char(token)?;
        self.depth += 1;
        self.first.push(true);
        Ok(())
    }

    fn close(&mut self, token: char) -> std::fmt::Result {
        let empty = self.first.pop().unwrap_or(true);
        self.depth = self.depth.saturating_sub(1);
        if !empty {
            self.indent()?;
        }
        self.out.write_char(token)
    }
}

impl<'a, W: Write> TokenSink for JsonWriter<'a, W> {
    type Error = std::fmt::Error;

    fn write_null(&mut self) -> Result<(), Self::Error> {
        self.out.write_str("null")
    }

    fn write_boolean(&mut self, value: bool) -> Result<(), Self::Error> {
        self.out.write_str(if value { "true" } else { "false" })
    }

    fn write_number(&mut self, value: &Number) -> Result<(), Self::Error> {
        write!(self.out, "{}", value)
    }

    fn write_text(&mut self, value: &str) -> Result<(), Self::Error> {
        write_string_literal(&mut self.out, value, self.config.quote_char)
    }

    fn write_char(&mut self, value: char) -> Result<(), Self::Error> {
        let mut buffer = [0u8; 4];
        write_string_literal(
            &mut self.out,
            value.encode_utf8(&mut buffer),
            self.config.quote_char,
        )
    }

    fn start_object(&mut self) -> Result<(), Self::Error> {
        self.open('{')
    }

    fn object_key(&mut self, key: &str) -> Result<(), Self::Error> {
        self.separate()?;
        write_string_literal(&mut self.out, key, self.config.quote_char)?;
        self.out.write_char(':')?;
        if self.config.use_whitespace {
            self.out.write_char(' ')?;
        }
        Ok(())
    }

    fn end_object(&mut self) -> Result<(), Self::Error> {
        self.close('}')
    }

    fn start_array(&mut self) -> Result<(), Self::Error> {
        self.open('[')
    }

    fn array_element(&mut self) -> Result<(), Self::Error> {
        self.separate()
    }

    fn end_array(&mut self) -> Result<(), Self::Error> {
        self.close(']')
    }
}
