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

//! The serialization session: the depth first traversal over an object
//! graph, classifying each node, guarding against recursion and writing
//! format tokens through a [`TokenSink`]. A session lives for one call to
//! [`SerializerSession::serialize`] and is not safe for concurrent use; it
//! may be reused sequentially on the same thread.


use crate::classify::{classify, classify_surrogate, Classification, Classified, ClassifyError};
use crate::config::SerializerConfig;
use crate::context::TypeContext;
use crate::error::SerializeError;
use crate::hint::TypeHint;
use crate::recursion::{Entered, GuardError, RecursionGuard};
use crate::reflect::{BeanClass, BeanProperty, Node};
use marshal_model::{Number, ValueCategory};
use std::any::Any;
use std::cmp::Ordering;
use std::fmt::Display;
use std::mem::discriminant;

/// The format specific token writer a serialization session drives. The
/// session decides what to emit and in what order; the sink decides how the
/// tokens appear in the output.
pub trait TokenSink {
    type Error: Display;

    fn write_null(&mut self) -> Result<(), Self::Error>;
    fn write_boolean(&mut self, value: bool) -> Result<(), Self::Error>;
    fn write_number(&mut self, value: &Number) -> Result<(), Self::Error>;
    fn write_text(&mut self, value: &str) -> Result<(), Self::Error>;
    fn write_char(&mut self, value: char) -> Result<(), Self::Error>;

    fn start_object(&mut self) -> Result<(), Self::Error>;
    /// Begin an object entry with the given key. Called before the entry's
    /// value is written; the sink is responsible for separators.
    fn object_key(&mut self, key: &str) -> Result<(), Self::Error>;
    fn end_object(&mut self) -> Result<(), Self::Error>;

    fn start_array(&mut self) -> Result<(), Self::Error>;
    /// Begin an array element. Called before each element is written.
    fn array_element(&mut self) -> Result<(), Self::Error>;
    fn end_array(&mut self) -> Result<(), Self::Error>;
}

/// Scalar sort key used when `sort_collections` applies.
enum SortKey {
    Bool(bool),
    Num(Number),
    Text(String),
}

impl SortKey {
    fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Bool(a), SortKey::Bool(b)) => a.cmp(b),
            (SortKey::Num(a), SortKey::Num(b)) => a.partial_cmp(b).unwrap_or(Ordering::Equal),
            (SortKey::Text(a), SortKey::Text(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

pub struct SerializerSession<'a> {
    config: &'a SerializerConfig,
    context: &'a TypeContext,
    guard: RecursionGuard,
}

impl<'a> SerializerSession<'a> {
    pub fn new(config: &'a SerializerConfig, context: &'a TypeContext) -> Self {
        SerializerSession {
            config,
            context,
            guard: RecursionGuard::new(
                config.detect_recursions,
                config.ignore_recursions,
                config.max_depth,
            ),
        }
    }

    /// Serialize the object graph rooted at `node` to the sink.
    pub fn serialize<S: TokenSink>(
        &mut self,
        node: Node<'_>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        self.emit(&node, &TypeHint::Any, None, sink)
    }

    fn emit<S: TokenSink>(
        &mut self,
        node: &Node<'_>,
        expected: &TypeHint,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        let context = self.context;
        match classify(node, context).map_err(|e| self.classify_error(e, attr))? {
            Classification::Direct(classified) => {
                self.emit_classified(classified, node.identity(), expected, attr, sink)
            }
            Classification::Substituted(surrogate) => {
                let surrogate = Node::Shared(surrogate);
                let classified = classify_surrogate(&surrogate, context)
                    .map_err(|e| self.classify_error(e, attr))?;
                self.emit_classified(classified, surrogate.identity(), expected, attr, sink)
            }
        }
    }

    fn emit_classified<S: TokenSink>(
        &mut self,
        classified: Classified<'_>,
        identity: usize,
        expected: &TypeHint,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        match classified {
            Classified::Null => sink.write_null().map_err(|e| self.sink_error(e)),
            Classified::Boolean(p) => sink.write_boolean(p).map_err(|e| self.sink_error(e)),
            Classified::Number(n) => sink.write_number(&n).map_err(|e| self.sink_error(e)),
            Classified::Text(text) => {
                let text = if self.config.trim_strings {
                    text.trim()
                } else {
                    text
                };
                sink.write_text(text).map_err(|e| self.sink_error(e))
            }
            Classified::Char(c) => sink.write_char(c).map_err(|e| self.sink_error(e)),
            Classified::Map(entries) => self.emit_map(entries, identity, attr, sink),
            Classified::Collection(items) => {
                self.emit_sequence(items, ValueCategory::Collection, identity, attr, sink)
            }
            Classified::Array(items) => {
                self.emit_sequence(items, ValueCategory::Array, identity, attr, sink)
            }
            Classified::Bean(class, instance) => {
                self.emit_bean(class, instance, identity, expected, attr, sink)
            }
        }
    }

    fn emit_map<S: TokenSink>(
        &mut self,
        mut entries: Vec<(String, Node<'_>)>,
        identity: usize,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        if let Entered::Rejected = self.enter(attr, identity, ValueCategory::Map)? {
            return self.emit_ignored_recursion(attr, sink);
        }
        if self.config.sort_maps {
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
        }
        sink.start_object().map_err(|e| self.sink_error(e))?;
        for (key, child) in &entries {
            if self.can_ignore(child, Some(key.as_str()))? {
                continue;
            }
            sink.object_key(key).map_err(|e| self.sink_error(e))?;
            self.emit(child, &TypeHint::Any, Some(key.as_str()), sink)?;
        }
        sink.end_object().map_err(|e| self.sink_error(e))?;
        self.guard.leave(identity);
        Ok(())
    }

    fn emit_sequence<S: TokenSink>(
        &mut self,
        items: Vec<Node<'_>>,
        category: ValueCategory,
        identity: usize,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        if let Entered::Rejected = self.enter(attr, identity, category)? {
            return self.emit_ignored_recursion(attr, sink);
        }
        let items = if self.config.sort_collections {
            self.sorted(items)
        } else {
            items
        };
        sink.start_array().map_err(|e| self.sink_error(e))?;
        for child in &items {
            sink.array_element().map_err(|e| self.sink_error(e))?;
            self.emit(child, &TypeHint::Any, attr, sink)?;
        }
        sink.end_array().map_err(|e| self.sink_error(e))?;
        self.guard.leave(identity);
        Ok(())
    }

    fn emit_bean<S: TokenSink>(
        &mut self,
        class: &BeanClass,
        instance: &dyn Any,
        identity: usize,
        expected: &TypeHint,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        if let Entered::Rejected = self.enter(attr, identity, ValueCategory::Bean)? {
            return self.emit_ignored_recursion(attr, sink);
        }
        sink.start_object().map_err(|e| self.sink_error(e))?;
        if self.config.add_type_discriminator {
            let name = match expected {
                TypeHint::Bean(ty) if *ty == class.type_id() => None,
                _ => self.context.names().name_for(class.type_id()),
            };
            if let Some(name) = name {
                sink.object_key(&self.config.type_property_name)
                    .map_err(|e| self.sink_error(e))?;
                sink.write_text(name).map_err(|e| self.sink_error(e))?;
            }
        }
        let mut order: Vec<&BeanProperty> = class.properties().iter().collect();
        if self.config.sort_properties {
            order.sort_by(|a, b| a.name().cmp(b.name()));
        }
        for property in order {
            let value = property
                .get(instance)
                .map_err(|source| SerializeError::Property {
                    property: property.name().to_string(),
                    path: self.guard.path(),
                    source,
                })?;
            let child = Node::Shared(value);
            if self.can_ignore(&child, Some(property.name()))? {
                continue;
            }
            sink.object_key(property.name())
                .map_err(|e| self.sink_error(e))?;
            self.emit(&child, property.hint(), Some(property.name()), sink)?;
        }
        sink.end_object().map_err(|e| self.sink_error(e))?;
        self.guard.leave(identity);
        Ok(())
    }

    /// Decide whether an attributed member (a map entry or bean property)
    /// is omitted entirely under the trimming policies.
    fn can_ignore(&mut self, child: &Node<'_>, attr: Option<&str>) -> Result<bool, SerializeError> {
        if self.guard.would_recurse(child.identity()) {
            if !self.config.ignore_recursions {
                return Err(SerializeError::Recursion {
                    path: self.guard.path_with(attr),
                });
            }
            if self.config.trim_null_properties {
                tracing::debug!(
                    attr = attr.unwrap_or("<noname>"),
                    "Dropping recursive reference under the null trimming policy."
                );
                return Ok(true);
            }
            return Ok(false);
        }
        let config = self.config;
        if !(config.trim_null_properties || config.trim_empty_collections || config.trim_empty_maps)
        {
            return Ok(false);
        }
        let classified = match classify(child, self.context) {
            Ok(Classification::Direct(classified)) => classified,
            // Substituted values are never null; their surrogate is judged
            // when it is actually emitted.
            Ok(Classification::Substituted(_)) => return Ok(false),
            Err(error) => return Err(self.classify_error(error, attr)),
        };
        let ignore = match classified {
            Classified::Null => config.trim_null_properties,
            Classified::Map(entries) => config.trim_empty_maps && entries.is_empty(),
            Classified::Collection(items) | Classified::Array(items) => {
                config.trim_empty_collections && items.is_empty()
            }
            _ => false,
        };
        Ok(ignore)
    }

    fn sorted<'n>(&mut self, items: Vec<Node<'n>>) -> Vec<Node<'n>> {
        let mut keys = Vec::with_capacity(items.len());
        for child in &items {
            let key = match classify(child, self.context) {
                Ok(Classification::Direct(Classified::Boolean(p))) => Some(SortKey::Bool(p)),
                Ok(Classification::Direct(Classified::Number(n))) => Some(SortKey::Num(n)),
                Ok(Classification::Direct(Classified::Text(text))) => {
                    Some(SortKey::Text(text.to_string()))
                }
                _ => None,
            };
            keys.push(key);
        }
        let comparable = match keys.first() {
            Some(Some(first)) => keys.iter().all(|key| match key {
                Some(key) => discriminant(key) == discriminant(first),
                None => false,
            }),
            _ => false,
        };
        if !comparable {
            return items;
        }
        let mut pairs = Vec::with_capacity(items.len());
        for (key, node) in keys.into_iter().zip(items) {
            if let Some(key) = key {
                pairs.push((key, node));
            }
        }
        pairs.sort_by(|(a, _), (b, _)| a.compare(b));
        pairs.into_iter().map(|(_, node)| node).collect()
    }

    fn emit_ignored_recursion<S: TokenSink>(
        &mut self,
        attr: Option<&str>,
        sink: &mut S,
    ) -> Result<(), SerializeError> {
        tracing::debug!(
            attr = attr.unwrap_or("<noname>"),
            "Serializing a recursive reference as null."
        );
        sink.write_null().map_err(|e| self.sink_error(e))
    }

    fn enter(
        &mut self,
        attr: Option<&str>,
        identity: usize,
        category: ValueCategory,
    ) -> Result<Entered, SerializeError> {
        let result = self.guard.enter(attr, identity, category);
        result.map_err(|error| match error {
            GuardError::Recursion => SerializeError::Recursion {
                path: self.guard.path(),
            },
            GuardError::DepthExceeded => SerializeError::DepthExceeded {
                max_depth: self.guard.max_depth(),
                path: self.guard.path_with(attr),
                detect_enabled: self.guard.detect(),
            },
        })
    }

    fn classify_error(&self, error: ClassifyError, attr: Option<&str>) -> SerializeError {
        let path = self.guard.path_with(attr);
        match error {
            ClassifyError::Unsupported(type_id) => {
                SerializeError::UnsupportedType { type_id, path }
            }
            ClassifyError::Swap(source) => SerializeError::Swap { path, source },
            ClassifyError::Busy => SerializeError::Busy { path },
        }
    }

    fn sink_error<E: Display>(&self, error: E) -> SerializeError {
        SerializeError::Sink {
            message: error.to_string(),
            path: self.guard.path(),
        }
    }
}
