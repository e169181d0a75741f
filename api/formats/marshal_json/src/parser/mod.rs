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

//! The JSON parser session: recursive descent over the input with one
//! explicit state machine per grammar production, driven by the expected
//! type at each position. A session is created per parse and consumed by
//! it; every error carries the line, column and nearby input.

pub mod tokens;

#[cfg(test)]
mod tests;

use crate::error::{Location, ParseError, ParseErrorKind};
use either::Either;
use marshal_core::{
    convert, BeanClass, ConvertError, Parsed, ParserConfig, ParserListener, TypeContext, TypeHint,
};
use marshal_model::Value;
use nom::IResult;
use nom::InputTake;
use std::any::TypeId;
use tokens::Span;

/// The parser's position over the input: single character lookahead,
/// line/column tracking and application of token level parsers.
struct Cursor<'a> {
    rest: Span<'a>,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str) -> Self {
        Cursor {
            rest: Span::new(input),
        }
    }

    fn peek(&self) -> Option<char> {
        self.rest.fragment().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        let (rest, _) = self.rest.take_split(c.len_utf8());
        self.rest = rest;
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn location(&self) -> Location {
        Location {
            line: self.rest.location_line(),
            column: self.rest.get_utf8_column(),
        }
    }

    /// A short sample of the remaining input, for error context.
    fn context(&self) -> String {
        self.rest.fragment().chars().take(16).collect()
    }

    /// Apply a token parser at the current position, advancing past the
    /// token if it matches.
    fn take<O>(&mut self, mut parser: impl FnMut(Span<'a>) -> IResult<Span<'a>, O>) -> Option<O> {
        match parser(self.rest) {
            Ok((rest, output)) => {
                self.rest = rest;
                Some(output)
            }
            Err(_) => None,
        }
    }
}

/// States of the object production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ObjectState {
    ExpectKeyOrClose,
    ExpectColon,
    ExpectValue,
    ExpectCommaOrClose,
    ExpectKey,
}

/// States of the array production.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ArrayState {
    ExpectValueOrClose,
    ExpectCommaOrClose,
    ExpectValue,
}

/// How an object production types its entries.
enum ObjectMode<'h> {
    /// No expected type: entries are generic; a discriminator property, if
    /// present and resolvable, turns the result into a bean.
    Dynamic,
    /// An explicit map hint: entries take the value hint, the discriminator
    /// is an ordinary key.
    Generic { values: &'h TypeHint },
    /// A bean hint: entries take the declared property hints; a
    /// discriminator naming a registered type switches the target.
    Bean { ty: TypeId },
}

pub struct ParserSession<'a> {
    cursor: Cursor<'a>,
    context: &'a TypeContext,
    config: &'a ParserConfig,
    listener: Option<&'a mut dyn ParserListener>,
    depth: usize,
}

impl<'a> ParserSession<'a> {
    pub fn new(input: &'a str, context: &'a TypeContext, config: &'a ParserConfig) -> Self {
        ParserSession {
            cursor: Cursor::new(input),
            context,
            config,
            listener: None,
            depth: 0,
        }
    }

    pub fn with_listener(
        input: &'a str,
        context: &'a TypeContext,
        config: &'a ParserConfig,
        listener: &'a mut dyn ParserListener,
    ) -> Self {
        ParserSession {
            cursor: Cursor::new(input),
            context,
            config,
            listener: Some(listener),
            depth: 0,
        }
    }

    /// Parse a single value of the expected type. The remainder of the
    /// input must consist of whitespace (and, in lax mode, comments).
    pub fn parse(&mut self, hint: &TypeHint) -> Result<Parsed, ParseError> {
        let parsed = self.parse_anything(hint)?;
        self.validate_end()?;
        Ok(parsed)
    }

    fn fail(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: self.cursor.location(),
            context: self.cursor.context(),
        }
    }

    fn fail_at(&self, kind: ParseErrorKind, location: Location) -> ParseError {
        ParseError {
            kind,
            location,
            context: self.cursor.context(),
        }
    }

    fn parse_anything(&mut self, hint: &TypeHint) -> Result<Parsed, ParseError> {
        if let TypeHint::Bean(ty) = hint {
            let context = self.context;
            if let Some(substitution) = context.substitution(*ty) {
                let surrogate = self.parse_anything(substitution.surrogate())?;
                return substitution
                    .unswap(surrogate)
                    .map_err(|e| self.fail(e.into()));
            }
        }
        self.skip_space_and_comments()?;
        match self.cursor.peek() {
            None => {
                if self.config.strict {
                    Err(self.fail(if self.depth == 0 {
                        ParseErrorKind::EmptyInput
                    } else {
                        ParseErrorKind::UnexpectedEof("a value")
                    }))
                } else {
                    Ok(Parsed::Value(Value::Null))
                }
            }
            Some(',') | Some('}') | Some(']') => {
                if self.config.strict {
                    Err(self.fail(ParseErrorKind::MissingValue))
                } else {
                    Ok(Parsed::Value(Value::Null))
                }
            }
            Some('n') => match self.cursor.take(tokens::keyword) {
                Some(Either::Right(())) => Ok(Parsed::Value(Value::Null)),
                _ => Err(self.fail(ParseErrorKind::UnrecognizedSyntax('n'))),
            },
            Some(c) => self.parse_typed(hint, c),
        }
    }

    fn parse_typed(&mut self, hint: &TypeHint, c: char) -> Result<Parsed, ParseError> {
        match hint {
            TypeHint::Any => match c {
                '{' => self.parse_object(ObjectMode::Dynamic),
                '[' => self.parse_array(&TypeHint::Any),
                '"' | '\'' => self
                    .parse_string()
                    .map(|text| Parsed::Value(Value::Text(text))),
                c if c.is_ascii_digit() || c == '-' || c == '.' => self.parse_number(),
                't' | 'f' => self.parse_boolean(),
                other => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(other))),
            },
            TypeHint::Boolean => self.parse_boolean(),
            TypeHint::Number => self.parse_number(),
            TypeHint::String => self
                .parse_string()
                .map(|text| Parsed::Value(Value::Text(text))),
            TypeHint::Char => {
                let text = self.parse_string()?;
                convert(Value::Text(text), &TypeHint::Char, self.context)
                    .map_err(|e| self.fail(e.into()))
            }
            TypeHint::Map(values) => match c {
                '{' => self.parse_object(ObjectMode::Generic {
                    values: values.as_ref(),
                }),
                other => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(other))),
            },
            TypeHint::Collection(elements) | TypeHint::Array(elements) => match c {
                '[' => self.parse_array(elements.as_ref()),
                other => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(other))),
            },
            TypeHint::Bean(ty) => match c {
                '{' => self.parse_object(ObjectMode::Bean { ty: *ty }),
                other => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(other))),
            },
        }
    }

    fn parse_object(&mut self, mode: ObjectMode<'_>) -> Result<Parsed, ParseError> {
        self.descend()?;
        let open_location = self.cursor.location();
        self.cursor.bump();
        let context = self.context;

        let bean_mandatory = matches!(mode, ObjectMode::Bean { .. });
        let mut target: Option<&BeanClass> = match &mode {
            ObjectMode::Bean { ty } => context.introspect(*ty),
            _ => None,
        };

        let mut entries: Vec<(String, Parsed, Location)> = vec![];
        let mut current_key: Option<(String, Location)> = None;
        let mut state = ObjectState::ExpectKeyOrClose;
        loop {
            self.skip_space_and_comments()?;
            match state {
                ObjectState::ExpectKeyOrClose | ObjectState::ExpectKey => {
                    match self.cursor.peek() {
                        None => {
                            return Err(
                                self.fail(ParseErrorKind::UnexpectedEof("an attribute name or '}'"))
                            )
                        }
                        Some('}') => {
                            if state == ObjectState::ExpectKey && self.config.strict {
                                return Err(self.fail(ParseErrorKind::TrailingComma));
                            }
                            self.cursor.bump();
                            break;
                        }
                        Some(_) => {
                            let location = self.cursor.location();
                            let key = self.parse_field_name()?;
                            current_key = Some((key, location));
                            state = ObjectState::ExpectColon;
                        }
                    }
                }
                ObjectState::ExpectColon => {
                    if !self.cursor.eat(':') {
                        return Err(
                            self.fail(ParseErrorKind::Expected("':' following the attribute name"))
                        );
                    }
                    state = ObjectState::ExpectValue;
                }
                ObjectState::ExpectValue => {
                    let (key, location) = match current_key.take() {
                        Some(entry) => entry,
                        None => panic!("attribute name lost in the object production"),
                    };
                    if key == self.config.type_property_name
                        && !matches!(mode, ObjectMode::Generic { .. })
                    {
                        let name = self.parse_string()?;
                        match context
                            .names()
                            .resolve(&name)
                            .and_then(|ty| context.introspect(ty))
                        {
                            Some(class) => {
                                target = Some(class);
                            }
                            None if bean_mandatory && target.is_none() => {
                                return Err(
                                    self.fail_at(ParseErrorKind::NoSuchType(name), location)
                                );
                            }
                            None => {
                                // Unresolvable name: the object stays generic
                                // (or the hinted class stands) and the entry
                                // is kept as data.
                                if target.is_none() {
                                    entries.push((key, Parsed::Value(Value::Text(name)), location));
                                }
                            }
                        }
                    } else {
                        let hint = target
                            .and_then(|class| class.property(&key))
                            .map(|property| property.hint().clone());
                        match (hint, target.is_some()) {
                            (Some(hint), _) => {
                                let value = self.parse_anything(&hint)?;
                                entries.push((key, value, location));
                            }
                            (None, true) => {
                                // Unknown property on a resolved bean: the
                                // value is still fully parsed so the cursor
                                // stays consistent, then discarded.
                                if !self.config.ignore_unknown_properties {
                                    return Err(self.fail_at(
                                        ParseErrorKind::UnknownProperty(key),
                                        location,
                                    ));
                                }
                                let _ = self.parse_anything(&TypeHint::Any)?;
                                self.notify_unknown(&key, location);
                            }
                            (None, false) => {
                                let value = match &mode {
                                    ObjectMode::Generic { values } => self.parse_anything(values)?,
                                    _ => self.parse_anything(&TypeHint::Any)?,
                                };
                                entries.push((key, value, location));
                            }
                        }
                    }
                    state = ObjectState::ExpectCommaOrClose;
                }
                ObjectState::ExpectCommaOrClose => match self.cursor.peek() {
                    Some(',') => {
                        self.cursor.bump();
                        state = ObjectState::ExpectKey;
                    }
                    Some('}') => {
                        self.cursor.bump();
                        break;
                    }
                    None => return Err(self.fail(ParseErrorKind::UnexpectedEof("',' or '}'"))),
                    Some(_) => return Err(self.fail(ParseErrorKind::Expected("',' or '}'"))),
                },
            }
        }
        self.ascend();

        match (target, bean_mandatory) {
            (Some(class), _) => self.build_bean(class, entries),
            (None, true) => Err(self.fail_at(ParseErrorKind::NoSuchClass, open_location)),
            (None, false) => Ok(Parsed::from_entries(
                entries
                    .into_iter()
                    .map(|(key, parsed, _)| (key, parsed))
                    .collect(),
            )),
        }
    }

    /// Replay buffered entries into a new instance of the class. Entries
    /// read before the discriminator resolved were parsed generically and
    /// are re-typed here.
    fn build_bean(
        &mut self,
        class: &BeanClass,
        entries: Vec<(String, Parsed, Location)>,
    ) -> Result<Parsed, ParseError> {
        let context = self.context;
        let mut instance = class.new_instance();
        for (key, parsed, location) in entries {
            match class.property(&key) {
                Some(property) => {
                    if parsed.is_null() {
                        continue;
                    }
                    let typed = match parsed {
                        Parsed::Value(value) => convert(value, property.hint(), context)
                            .map_err(|e| self.fail_at(e.into(), location))?,
                        other => other,
                    };
                    property.set(instance.as_mut(), typed).map_err(|e| {
                        self.fail_at(ParseErrorKind::Convert(ConvertError::Bean(e)), location)
                    })?;
                }
                None => {
                    if !self.config.ignore_unknown_properties {
                        return Err(self.fail_at(ParseErrorKind::UnknownProperty(key), location));
                    }
                    self.notify_unknown(&key, location);
                }
            }
        }
        Ok(Parsed::Bean(instance))
    }

    fn notify_unknown(&mut self, key: &str, location: Location) {
        tracing::debug!(property = key, "Discarding unknown property.");
        if let Some(listener) = self.listener.as_deref_mut() {
            listener.on_unknown_property(key, location.line, location.column);
        }
    }

    fn parse_array(&mut self, elements: &TypeHint) -> Result<Parsed, ParseError> {
        self.descend()?;
        self.cursor.bump();
        let mut items = vec![];
        let mut state = ArrayState::ExpectValueOrClose;
        loop {
            self.skip_space_and_comments()?;
            match state {
                ArrayState::ExpectValueOrClose | ArrayState::ExpectValue => {
                    match self.cursor.peek() {
                        None => {
                            return Err(self.fail(ParseErrorKind::UnexpectedEof("a value or ']'")))
                        }
                        Some(']') => {
                            if state == ArrayState::ExpectValue && self.config.strict {
                                return Err(self.fail(ParseErrorKind::TrailingComma));
                            }
                            self.cursor.bump();
                            break;
                        }
                        Some(_) => {
                            items.push(self.parse_anything(elements)?);
                            state = ArrayState::ExpectCommaOrClose;
                        }
                    }
                }
                ArrayState::ExpectCommaOrClose => match self.cursor.peek() {
                    Some(',') => {
                        self.cursor.bump();
                        state = ArrayState::ExpectValue;
                    }
                    Some(']') => {
                        self.cursor.bump();
                        break;
                    }
                    None => return Err(self.fail(ParseErrorKind::UnexpectedEof("',' or ']'"))),
                    Some(_) => return Err(self.fail(ParseErrorKind::Expected("',' or ']'"))),
                },
            }
        }
        self.ascend();
        Ok(Parsed::from_items(items))
    }

    fn parse_field_name(&mut self) -> Result<String, ParseError> {
        match self.cursor.peek() {
            Some('"') | Some('\'') => self.parse_string(),
            _ if self.config.strict => Err(self.fail(ParseErrorKind::UnquotedAttribute)),
            _ => self
                .cursor
                .take(tokens::unquoted_name)
                .map(str::to_string)
                .ok_or_else(|| self.fail(ParseErrorKind::Expected("an attribute name"))),
        }
    }

    /// The string production: quoted (with the escape table) or, in lax
    /// mode, unquoted up to a structural delimiter. A trailing `+`
    /// concatenates a further string segment in lax mode.
    fn parse_string(&mut self) -> Result<String, ParseError> {
        let strict = self.config.strict;
        let quote = match self.cursor.peek() {
            Some('"') => {
                self.cursor.bump();
                Some('"')
            }
            Some('\'') => {
                if strict {
                    return Err(self.fail(ParseErrorKind::InvalidQuote('\'')));
                }
                self.cursor.bump();
                Some('\'')
            }
            Some(_) if strict => return Err(self.fail(ParseErrorKind::MissingQuote)),
            Some(_) => None,
            None => return Err(self.fail(ParseErrorKind::UnexpectedEof("a string"))),
        };
        let mut out = String::new();
        match quote {
            Some(q) => loop {
                let c = match self.cursor.bump() {
                    Some(c) => c,
                    None => return Err(self.fail(ParseErrorKind::UnclosedString(q))),
                };
                if strict && (c as u32) <= 0x1F {
                    return Err(self.fail(ParseErrorKind::UnescapedControl(c as u32)));
                }
                if c == '\\' {
                    self.parse_escape(&mut out)?;
                } else if c == q {
                    break;
                } else {
                    out.push(c);
                }
            },
            None => loop {
                match self.cursor.peek() {
                    None => break,
                    Some(c) if matches!(c, ',' | '}' | ']') || self.is_whitespace(c) => break,
                    Some('\\') => {
                        self.cursor.bump();
                        self.parse_escape(&mut out)?;
                    }
                    Some(c) => {
                        self.cursor.bump();
                        out.push(c);
                    }
                }
            },
        }
        self.skip_space_and_comments()?;
        if self.cursor.peek() == Some('+') {
            if strict {
                return Err(self.fail(ParseErrorKind::Concatenation));
            }
            self.cursor.bump();
            self.skip_space_and_comments()?;
            let rest = self.parse_string()?;
            out.push_str(&rest);
        }
        Ok(out)
    }

    fn parse_escape(&mut self, out: &mut String) -> Result<(), ParseError> {
        let c = self
            .cursor
            .bump()
            .ok_or_else(|| self.fail(ParseErrorKind::UnexpectedEof("an escape sequence")))?;
        let escaped = match c {
            'b' => '\u{08}',
            'f' => '\u{0c}',
            'n' => '\n',
            'r' => '\r',
            't' => '\t',
            '\\' => '\\',
            '/' => '/',
            '\'' => '\'',
            '"' => '"',
            'u' => {
                let mut code = 0u32;
                for _ in 0..4 {
                    let digit = self
                        .cursor
                        .bump()
                        .and_then(|c| c.to_digit(16))
                        .ok_or_else(|| self.fail(ParseErrorKind::InvalidUnicodeEscape))?;
                    code = (code << 4) | digit;
                }
                char::from_u32(code)
                    .ok_or_else(|| self.fail(ParseErrorKind::InvalidUnicodeEscape))?
            }
            _ => return Err(self.fail(ParseErrorKind::InvalidEscape)),
        };
        out.push(escaped);
        Ok(())
    }

    /// The number production. Quoted numbers are accepted (the content is
    /// validated the same way); strict mode applies the JSON number rules.
    fn parse_number(&mut self) -> Result<Parsed, ParseError> {
        let text = match self.cursor.peek() {
            Some('"') | Some('\'') => self.parse_string()?,
            _ => self
                .cursor
                .take(tokens::number_string)
                .map(str::to_string)
                .ok_or_else(|| self.fail(ParseErrorKind::Expected("a number")))?,
        };
        let number = tokens::convert_number(&text, self.config.strict)
            .map_err(|_| self.fail(ParseErrorKind::InvalidNumber(text.clone())))?;
        Ok(Parsed::Value(Value::Number(number)))
    }

    fn parse_boolean(&mut self) -> Result<Parsed, ParseError> {
        let c = match self.cursor.peek() {
            Some(c) => c,
            None => return Err(self.fail(ParseErrorKind::UnexpectedEof("a boolean"))),
        };
        match c {
            '"' | '\'' => {
                let text = self.parse_string()?;
                convert(Value::Text(text), &TypeHint::Boolean, self.context)
                    .map_err(|e| self.fail(e.into()))
            }
            't' | 'f' => match self.cursor.take(tokens::keyword) {
                Some(Either::Left(p)) => Ok(Parsed::Value(Value::Boolean(p))),
                _ => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(c))),
            },
            other => Err(self.fail(ParseErrorKind::UnrecognizedSyntax(other))),
        }
    }

    fn is_whitespace(&self, c: char) -> bool {
        if self.config.strict {
            matches!(c, ' ' | '\t' | '\n' | '\r')
        } else {
            c.is_whitespace()
        }
    }

    fn skip_space_and_comments(&mut self) -> Result<(), ParseError> {
        loop {
            match self.cursor.peek() {
                Some(c) if self.is_whitespace(c) => {
                    self.cursor.bump();
                }
                Some('/') => {
                    if self.config.strict {
                        return Err(self.fail(ParseErrorKind::Comment));
                    }
                    self.cursor.bump();
                    self.skip_comment()?;
                }
                _ => return Ok(()),
            }
        }
    }

    fn skip_comment(&mut self) -> Result<(), ParseError> {
        match self.cursor.bump() {
            Some('*') => loop {
                match self.cursor.bump() {
                    None => return Err(self.fail(ParseErrorKind::OpenComment)),
                    Some('*') => {
                        if self.cursor.eat('/') {
                            return Ok(());
                        }
                    }
                    Some(_) => {}
                }
            },
            Some('/') => loop {
                match self.cursor.bump() {
                    None | Some('\n') => return Ok(()),
                    Some(_) => {}
                }
            },
            _ => Err(self.fail(ParseErrorKind::OpenComment)),
        }
    }

    /// After the top level value only whitespace, comments and a single
    /// trailing semicolon may remain.
    fn validate_end(&mut self) -> Result<(), ParseError> {
        self.skip_space_and_comments()?;
        if self.cursor.eat(';') {
            self.skip_space_and_comments()?;
        }
        match self.cursor.peek() {
            None => Ok(()),
            Some(c) => Err(self.fail(ParseErrorKind::Remainder(c))),
        }
    }

    fn descend(&mut self) -> Result<(), ParseError> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(self.fail(ParseErrorKind::DepthExceeded(self.config.max_depth)));
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }
}
