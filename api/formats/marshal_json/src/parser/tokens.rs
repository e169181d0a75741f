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

//! Token level parsers for the JSON grammar. The grammar driver in the
//! parent module owns the state machines; these functions recognise the
//! individual tokens on a located span.

use either::Either;
use marshal_model::Number;
use nom::bytes::complete::{tag, take_while1};
use nom::combinator::map;
use nom::IResult;
use num_bigint::{BigInt, BigUint, Sign};
use num_traits::Num;
use std::borrow::Cow;
use std::ops::Neg;

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

fn unwrap_span(span: Span<'_>) -> &str {
    *span
}

/// An unquoted object key (lax mode only). Ends at the colon, at whitespace
/// or at the start of a comment.
pub fn unquoted_name(input: Span<'_>) -> IResult<Span<'_>, &str> {
    map(
        take_while1(|c: char| c != ':' && c != '/' && !c.is_whitespace()),
        unwrap_span,
    )(input)
}

/// The characters a numeric literal may contain. The literal is validated
/// and narrowed by [`convert_number`] afterwards.
pub fn number_string(input: Span<'_>) -> IResult<Span<'_>, &str> {
    map(
        take_while1(|c: char| {
            c.is_ascii_hexdigit() || matches!(c, 'x' | 'X' | '+' | '-' | '.')
        }),
        unwrap_span,
    )(input)
}

/// One of the literal keywords. `true` and `false` resolve to booleans and
/// `null` to the null marker.
pub fn keyword(input: Span<'_>) -> IResult<Span<'_>, Either<bool, ()>> {
    nom::branch::alt((
        map(tag("true"), |_| Either::Left(true)),
        map(tag("false"), |_| Either::Left(false)),
        map(tag("null"), |_| Either::Right(())),
    ))(input)
}

/// Validate a numeric literal against the strict JSON rules: no empty
/// strings, no leading `+`, no leading dot, no leading zero unless followed
/// by `.`/`e`/`E`, and any dot must be followed by a digit.
pub fn validate_strict_number(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    if !text
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E'))
    {
        return false;
    }
    let rest = text.strip_prefix('-').unwrap_or(text);
    let first = match rest.bytes().next() {
        Some(c) => c,
        None => return false,
    };
    if first == b'.' || first == b'+' {
        return false;
    }
    if first == b'0' && rest.len() > 1 {
        let second = rest.as_bytes()[1];
        if second != b'.' && second != b'e' && second != b'E' {
            return false;
        }
    }
    if let Some(i) = text.find('.') {
        match text.as_bytes().get(i + 1) {
            Some(c) if c.is_ascii_digit() => {}
            _ => return false,
        }
    }
    true
}

/// Convert a numeric literal to a [`Number`]. Integers narrow in the order
/// `u64` then `i64` then big integer; anything with a fractional or
/// exponent part becomes a float. Lax mode additionally accepts `0x`/`0b`
/// radix literals and treats the empty string as zero.
pub fn convert_number(text: &str, strict: bool) -> Result<Number, ()> {
    if strict && !validate_strict_number(text) {
        return Err(());
    }
    if text.is_empty() {
        return if strict { Err(()) } else { Ok(Number::Int(0)) };
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    if !strict {
        if let Some(hex) = digits.strip_prefix("0x").or_else(|| digits.strip_prefix("0X")) {
            return int_literal(negative, hex, 16);
        }
        if let Some(bin) = digits.strip_prefix("0b").or_else(|| digits.strip_prefix("0B")) {
            return int_literal(negative, bin, 2);
        }
    }
    if digits.contains(['.', 'e', 'E']) {
        let float_text = if digits.starts_with('.') {
            Cow::Owned(format!("0{}", digits))
        } else {
            Cow::Borrowed(digits)
        };
        let x = float_text.parse::<f64>().map_err(|_| ())?;
        return Ok(Number::Float(if negative { -x } else { x }));
    }
    int_literal(negative, digits, 10)
}

fn int_literal(negative: bool, digits: &str, radix: u32) -> Result<Number, ()> {
    if digits.is_empty() {
        return Err(());
    }
    if let Ok(n) = u64::from_str_radix(digits, radix) {
        if negative {
            match i64::try_from(n) {
                Ok(m) => Ok(Number::Int(-m)),
                Err(_) => Ok(Number::BigInt(BigInt::from(n).neg())),
            }
        } else {
            Ok(Number::UInt(n))
        }
    } else {
        let n = BigUint::from_str_radix(digits, radix).map_err(|_| ())?;
        if negative {
            Ok(Number::BigInt(BigInt::from_biguint(Sign::Minus, n)))
        } else {
            Ok(Number::BigUint(n))
        }
    }
}
