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

use marshal_core::ConvertError;
use std::error::Error;
use std::fmt::{Display, Formatter};
use thiserror::Error as ThisError;

/// A position in the input, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub line: u32,
    pub column: usize,
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Failure type for parse operations. Parsing is all or nothing: no partial
/// result accompanies an error.
#[derive(Debug)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub location: Location,
    /// The input immediately following the failure position.
    pub context: String,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Parse error at {}", self.location)?;
        if !self.context.is_empty() {
            write!(f, " near '{}'", self.context)?;
        }
        write!(f, ": {}", self.kind)
    }
}

impl Error for ParseError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            ParseErrorKind::Convert(source) => Some(source),
            _ => None,
        }
    }
}

#[derive(Debug, ThisError)]
pub enum ParseErrorKind {
    #[error("Expected {0}.")]
    Expected(&'static str),
    #[error("Unexpected end of input; expected {0}.")]
    UnexpectedEof(&'static str),
    #[error("Empty input.")]
    EmptyInput,
    #[error("Missing value detected.")]
    MissingValue,
    #[error("Invalid number: '{0}'.")]
    InvalidNumber(String),
    #[error("Invalid escape sequence in string.")]
    InvalidEscape,
    #[error("Invalid unicode escape sequence in string.")]
    InvalidUnicodeEscape,
    #[error("Unescaped control character 0x{0:04X} encountered.")]
    UnescapedControl(u32),
    #[error("Invalid quote character '{0}'.")]
    InvalidQuote(char),
    #[error("Did not find a quote character marking the beginning of the string.")]
    MissingQuote,
    #[error("Unquoted attribute detected.")]
    UnquotedAttribute,
    #[error("String concatenation detected.")]
    Concatenation,
    #[error("Javascript comment detected.")]
    Comment,
    #[error("Open ended comment.")]
    OpenComment,
    #[error("Could not find the expected end of the string ('{0}').")]
    UnclosedString(char),
    #[error("Unexpected trailing comma.")]
    TrailingComma,
    #[error("Remainder after parse: '{0}'.")]
    Remainder(char),
    #[error("Maximum parse depth of {0} exceeded.")]
    DepthExceeded(usize),
    #[error("Unknown property '{0}' encountered.")]
    UnknownProperty(String),
    #[error("No type is registered under the name '{0}'.")]
    NoSuchType(String),
    #[error("The expected type could not be instantiated: no bean class is registered for it.")]
    NoSuchClass,
    #[error("Unrecognized syntax, starting character '{0}'.")]
    UnrecognizedSyntax(char),
    #[error(transparent)]
    Convert(#[from] ConvertError),
}
