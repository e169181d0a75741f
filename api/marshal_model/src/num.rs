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

use num_bigint::{BigInt, BigUint};
use num_traits::ToPrimitive;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};

/// A numeric value in the document model. Integer literals are held in the
/// narrowest of the integer variants that can represent them; anything with a
/// fractional or exponent part is held as a 64-bit float.
#[derive(Debug, Clone)]
pub enum Number {
    Int(i64),
    UInt(u64),
    BigInt(BigInt),
    BigUint(BigUint),
    Float(f64),
}

impl Number {
    /// True if this number has a fractional representation.
    pub fn is_float(&self) -> bool {
        matches!(self, Number::Float(_))
    }

    /// The value as an `i64`, if it is an integer in range.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Number::Int(n) => Some(*n),
            Number::UInt(n) => i64::try_from(*n).ok(),
            Number::BigInt(n) => n.to_i64(),
            Number::BigUint(n) => n.to_i64(),
            Number::Float(_) => None,
        }
    }

    /// The value as a `u64`, if it is a non-negative integer in range.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Number::Int(n) => u64::try_from(*n).ok(),
            Number::UInt(n) => Some(*n),
            Number::BigInt(n) => n.to_u64(),
            Number::BigUint(n) => n.to_u64(),
            Number::Float(_) => None,
        }
    }

    /// The value as an `f64`, converting integers (with possible loss of
    /// precision for values beyond 2^53).
    pub fn as_f64(&self) -> f64 {
        match self {
            Number::Int(n) => *n as f64,
            Number::UInt(n) => *n as f64,
            Number::BigInt(n) => n.to_f64().unwrap_or(f64::NAN),
            Number::BigUint(n) => n.to_f64().unwrap_or(f64::NAN),
            Number::Float(x) => *x,
        }
    }

    fn as_big(&self) -> Option<BigInt> {
        match self {
            Number::Int(n) => Some(BigInt::from(*n)),
            Number::UInt(n) => Some(BigInt::from(*n)),
            Number::BigInt(n) => Some(n.clone()),
            Number::BigUint(n) => Some(BigInt::from(n.clone())),
            Number::Float(_) => None,
        }
    }
}

/// Numbers compare by value rather than by variant so that, for example, a
/// value written as `Int(1)` compares equal after a round trip that reads it
/// back as `UInt(1)`.
impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self.as_big(), other.as_big()) {
            (Some(m), Some(n)) => m == n,
            (None, None) => self.as_f64() == other.as_f64(),
            (Some(n), None) | (None, Some(n)) => {
                let x = if self.is_float() {
                    self.as_f64()
                } else {
                    other.as_f64()
                };
                x.fract() == 0.0 && n.to_f64() == Some(x)
            }
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self.as_big(), other.as_big()) {
            (Some(m), Some(n)) => Some(m.cmp(&n)),
            _ => self.as_f64().partial_cmp(&other.as_f64()),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Int(n) => write!(f, "{}", n),
            Number::UInt(n) => write!(f, "{}", n),
            Number::BigInt(n) => write!(f, "{}", n),
            Number::BigUint(n) => write!(f, "{}", n),
            Number::Float(x) => {
                let mut buffer = ryu::Buffer::new();
                f.write_str(buffer.format(*x))
            }
        }
    }
}

impl From<i8> for Number {
    fn from(n: i8) -> Self {
        Number::Int(n.into())
    }
}

impl From<i16> for Number {
    fn from(n: i16) -> Self {
        Number::Int(n.into())
    }
}

impl From<i32> for Number {
    fn from(n: i32) -> Self {
        Number::Int(n.into())
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Int(n)
    }
}

impl From<u8> for Number {
    fn from(n: u8) -> Self {
        Number::Int(n.into())
    }
}

impl From<u16> for Number {
    fn from(n: u16) -> Self {
        Number::UInt(n.into())
    }
}

impl From<u32> for Number {
    fn from(n: u32) -> Self {
        Number::UInt(n.into())
    }
}

impl From<u64> for Number {
    fn from(n: u64) -> Self {
        Number::UInt(n)
    }
}

impl From<f32> for Number {
    fn from(x: f32) -> Self {
        Number::Float(x.into())
    }
}

impl From<f64> for Number {
    fn from(x: f64) -> Self {
        Number::Float(x)
    }
}

impl From<BigInt> for Number {
    fn from(n: BigInt) -> Self {
        Number::BigInt(n)
    }
}

impl From<BigUint> for Number {
    fn from(n: BigUint) -> Self {
        Number::BigUint(n)
    }
}
