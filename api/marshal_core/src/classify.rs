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

//! Classification of graph nodes. Every node is resolved to exactly one
//! [`Classified`] view; all downstream logic matches over that view rather
//! than re-inspecting the runtime type. Type substitutions are applied
//! before the category list is consulted and indirect exactly once.

use crate::context::TypeContext;
use crate::error::BeanError;
use crate::reflect::{BeanClass, Node, Shared};
use marshal_model::{Number, Value, ValueCategory};
use num_bigint::{BigInt, BigUint};
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};

/// The classified view of a node. Composite views hold a snapshot of the
/// node's members taken at classification time; for shared containers the
/// snapshot clones the member handles (not the members), so a borrow of the
/// container is not held across the recursion into them.
pub enum Classified<'a> {
    Null,
    Boolean(bool),
    Number(Number),
    Text(&'a str),
    Char(char),
    Map(Vec<(String, Node<'a>)>),
    Collection(Vec<Node<'a>>),
    Array(Vec<Node<'a>>),
    Bean(&'a BeanClass, &'a dyn Any),
}

impl<'a> Classified<'a> {
    pub fn category(&self) -> ValueCategory {
        match self {
            Classified::Null => ValueCategory::Null,
            Classified::Boolean(_) => ValueCategory::Boolean,
            Classified::Number(_) => ValueCategory::Number,
            Classified::Text(_) => ValueCategory::String,
            Classified::Char(_) => ValueCategory::Char,
            Classified::Map(_) => ValueCategory::Map,
            Classified::Collection(_) => ValueCategory::Collection,
            Classified::Array(_) => ValueCategory::Array,
            Classified::Bean(_, _) => ValueCategory::Bean,
        }
    }

    /// True for an empty map, collection or array.
    pub fn is_empty_composite(&self) -> bool {
        match self {
            Classified::Map(entries) => entries.is_empty(),
            Classified::Collection(items) | Classified::Array(items) => items.is_empty(),
            _ => false,
        }
    }
}

/// The outcome of classifying with substitutions enabled: either a direct
/// view or the surrogate produced by a substitution, which the caller must
/// classify again (without substitutions).
pub enum Classification<'a> {
    Direct(Classified<'a>),
    Substituted(Shared),
}

/// Failure during classification; converted by the session into an error
/// carrying the traversal path.
#[derive(Debug)]
pub enum ClassifyError {
    /// No category applies and no bean class or substitution is registered.
    Unsupported(TypeId),
    /// A substitution's swap function failed.
    Swap(BeanError),
    /// A shared container is currently mutably borrowed.
    Busy,
}

/// Classify a node, applying a registered type substitution if one exists
/// for the node's concrete type.
pub fn classify<'a>(
    node: &'a Node<'a>,
    context: &'a TypeContext,
) -> Result<Classification<'a>, ClassifyError> {
    match node {
        Node::Value(value) => Ok(Classification::Direct(classify_value(value))),
        Node::Any(any) => classify_any(*any, context, true),
        Node::Shared(rc) => classify_any(&**rc, context, true),
    }
}

/// Classify a surrogate value produced by a substitution. Substitutions are
/// not consulted again, so a swap chain terminates after one step.
pub fn classify_surrogate<'a>(
    node: &'a Node<'a>,
    context: &'a TypeContext,
) -> Result<Classified<'a>, ClassifyError> {
    match node {
        Node::Value(value) => Ok(classify_value(value)),
        Node::Any(any) => match classify_any(*any, context, false)? {
            Classification::Direct(classified) => Ok(classified),
            Classification::Substituted(_) => Err(ClassifyError::Unsupported((*any).type_id())),
        },
        Node::Shared(rc) => match classify_any(&**rc, context, false)? {
            Classification::Direct(classified) => Ok(classified),
            Classification::Substituted(_) => Err(ClassifyError::Unsupported(rc.as_ref().type_id())),
        },
    }
}

fn classify_value(value: &Value) -> Classified<'_> {
    match value {
        Value::Null => Classified::Null,
        Value::Boolean(p) => Classified::Boolean(*p),
        Value::Number(n) => Classified::Number(n.clone()),
        Value::Char(c) => Classified::Char(*c),
        Value::Text(text) => Classified::Text(text.as_str()),
        Value::Array(items) => Classified::Collection(items.iter().map(Node::Value).collect()),
        Value::Object(entries) => Classified::Map(
            entries
                .iter()
                .map(|(key, value)| (key.clone(), Node::Value(value)))
                .collect(),
        ),
    }
}

macro_rules! classify_number {
    ($any:expr, $($ty:ty),*) => {
        $(
            if let Some(n) = $any.downcast_ref::<$ty>() {
                return Ok(Classification::Direct(Classified::Number(Number::from(n.clone()))));
            }
        )*
    };
}

fn classify_any<'a>(
    any: &'a dyn Any,
    context: &'a TypeContext,
    allow_swap: bool,
) -> Result<Classification<'a>, ClassifyError> {
    if let Some(value) = any.downcast_ref::<Value>() {
        return Ok(Classification::Direct(classify_value(value)));
    }

    if allow_swap {
        if let Some(substitution) = context.substitution(any.type_id()) {
            let surrogate = substitution.swap(any).map_err(ClassifyError::Swap)?;
            return Ok(Classification::Substituted(surrogate));
        }
    }

    if let Some(p) = any.downcast_ref::<bool>() {
        return Ok(Classification::Direct(Classified::Boolean(*p)));
    }
    classify_number!(any, i8, i16, i32, i64, u8, u16, u32, u64, f32, f64, BigInt, BigUint);
    if let Some(n) = any.downcast_ref::<Number>() {
        return Ok(Classification::Direct(Classified::Number(n.clone())));
    }
    if let Some(c) = any.downcast_ref::<char>() {
        return Ok(Classification::Direct(Classified::Char(*c)));
    }
    if let Some(text) = any.downcast_ref::<String>() {
        return Ok(Classification::Direct(Classified::Text(text.as_str())));
    }
    if let Some(text) = any.downcast_ref::<&'static str>() {
        return Ok(Classification::Direct(Classified::Text(text)));
    }

    if let Some(entries) = any.downcast_ref::<Vec<(String, Shared)>>() {
        return Ok(Classification::Direct(Classified::Map(snapshot_entries(
            entries,
        ))));
    }
    if let Some(cell) = any.downcast_ref::<RefCell<Vec<(String, Shared)>>>() {
        let entries = cell.try_borrow().map_err(|_| ClassifyError::Busy)?;
        return Ok(Classification::Direct(Classified::Map(snapshot_entries(
            &entries,
        ))));
    }
    if let Some(map) = any.downcast_ref::<BTreeMap<String, Shared>>() {
        return Ok(Classification::Direct(Classified::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), Node::Shared(value.clone())))
                .collect(),
        )));
    }
    if let Some(map) = any.downcast_ref::<HashMap<String, Shared>>() {
        return Ok(Classification::Direct(Classified::Map(
            map.iter()
                .map(|(key, value)| (key.clone(), Node::Shared(value.clone())))
                .collect(),
        )));
    }
    if let Some(items) = any.downcast_ref::<Vec<Shared>>() {
        return Ok(Classification::Direct(Classified::Collection(
            snapshot_items(items),
        )));
    }
    if let Some(cell) = any.downcast_ref::<RefCell<Vec<Shared>>>() {
        let items = cell.try_borrow().map_err(|_| ClassifyError::Busy)?;
        return Ok(Classification::Direct(Classified::Collection(
            snapshot_items(&items),
        )));
    }
    if let Some(items) = any.downcast_ref::<Box<[Shared]>>() {
        return Ok(Classification::Direct(Classified::Array(snapshot_items(
            items,
        ))));
    }

    match context.introspect(any.type_id()) {
        Some(class) => Ok(Classification::Direct(Classified::Bean(class, any))),
        None => Err(ClassifyError::Unsupported(any.type_id())),
    }
}

fn snapshot_entries(entries: &[(String, Shared)]) -> Vec<(String, Node<'static>)> {
    entries
        .iter()
        .map(|(key, value)| (key.clone(), Node::Shared(value.clone())))
        .collect()
}

fn snapshot_items(items: &[Shared]) -> Vec<Node<'static>> {
    items.iter().map(|item| Node::Shared(item.clone())).collect()
}
