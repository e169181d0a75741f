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

//! The format neutral half of the marshalling engine: classification of
//! object graph nodes, recursion guarding, the serialization session and its
//! token sink interface, conversion of generic values to typed ones, and the
//! capability interfaces through which bean introspection and type
//! substitution are consumed. Format crates supply the grammar on both
//! sides: a [`session::TokenSink`] implementation for output and a parser
//! producing [`Parsed`] values for input.

pub mod classify;
pub mod config;
pub mod context;
pub mod convert;
pub mod error;
pub mod hint;
pub mod names;
pub mod parsed;
pub mod recursion;
pub mod reflect;
pub mod session;
pub mod swap;

pub use config::{ParserConfig, SerializerConfig};
pub use context::{TypeContext, TypeContextBuilder};
pub use convert::convert;
pub use error::{BeanError, ConvertError, SerializeError, TraversalPath};
pub use hint::TypeHint;
pub use names::TypeNameRegistry;
pub use parsed::Parsed;
pub use reflect::{
    shared, BeanClass, BeanClassBuilder, BeanIntrospector, BeanProperty, BeanRegistry, Node,
    Shared,
};
pub use session::{SerializerSession, TokenSink};
pub use swap::{SwapRegistry, TypeSubstitution};

/// A listener notified of recoverable conditions during parsing, most
/// notably keys discarded under the unknown property policy.
pub trait ParserListener {
    /// An object key had no corresponding property on the target type. The
    /// value has been fully parsed and discarded.
    fn on_unknown_property(&mut self, name: &str, line: u32, column: usize);
}

/// A listener that ignores every notification.
#[derive(Default, Debug, Clone, Copy)]
pub struct IgnoreListener;

impl ParserListener for IgnoreListener {
    fn on_unknown_property(&mut self, _name: &str, _line: u32, _column: usize) {}
}
