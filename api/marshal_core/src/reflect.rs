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

//! The bean capability surface. The engine never performs reflection itself;
//! it consumes an ordered property table per type, supplied through the
//! [`BeanIntrospector`] interface. [`BeanRegistry`] is a plain registry
//! implementation of that interface populated through [`BeanClassBuilder`].

use crate::error::BeanError;
use crate::hint::TypeHint;
use crate::parsed::Parsed;
use marshal_model::Value;
use std::any::{type_name, Any, TypeId};
use std::collections::HashMap;
use std::rc::Rc;

/// A node of a dynamic object graph. Shared nodes make true cycles
/// expressible and identity observable.
pub type Shared = Rc<dyn Any>;

/// Wrap a value as a shared graph node.
pub fn shared<T: Any>(value: T) -> Shared {
    Rc::new(value)
}

/// A handle on a node to be serialized: a borrowed document value, a
/// borrowed arbitrary value or a shared graph node.
pub enum Node<'a> {
    Value(&'a Value),
    Any(&'a dyn Any),
    Shared(Shared),
}

impl<'a> Node<'a> {
    /// A node borrowing an arbitrary value.
    pub fn any<T: Any>(value: &'a T) -> Node<'a> {
        Node::Any(value)
    }

    /// The identity of the underlying object, used for cycle detection.
    /// Two handles have the same identity exactly when they point at the
    /// same object.
    pub fn identity(&self) -> usize {
        match self {
            Node::Value(value) => *value as *const Value as *const () as usize,
            Node::Any(any) => *any as *const dyn Any as *const () as usize,
            Node::Shared(rc) => Rc::as_ptr(rc) as *const () as usize,
        }
    }
}

impl<'a> From<&'a Value> for Node<'a> {
    fn from(value: &'a Value) -> Self {
        Node::Value(value)
    }
}

impl From<Shared> for Node<'_> {
    fn from(rc: Shared) -> Self {
        Node::Shared(rc)
    }
}

/// A single introspected property: its name, declared type and accessor
/// pair. The getter produces a shared node (so identity is preserved through
/// bean boundaries); the setter consumes a parse product.
pub struct BeanProperty {
    name: String,
    hint: TypeHint,
    get: Box<dyn Fn(&dyn Any) -> Result<Shared, BeanError>>,
    set: Box<dyn Fn(&mut dyn Any, Parsed) -> Result<(), BeanError>>,
}

impl BeanProperty {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn hint(&self) -> &TypeHint {
        &self.hint
    }

    pub fn get(&self, instance: &dyn Any) -> Result<Shared, BeanError> {
        (self.get)(instance)
    }

    pub fn set(&self, instance: &mut dyn Any, value: Parsed) -> Result<(), BeanError> {
        (self.set)(instance, value)
    }
}

/// The introspected shape of a bean type: an ordered property table and a
/// constructor for parse-side instantiation.
pub struct BeanClass {
    type_id: TypeId,
    type_name: &'static str,
    construct: Box<dyn Fn() -> Box<dyn Any>>,
    properties: Vec<BeanProperty>,
}

impl BeanClass {
    /// Start describing the bean type `T`, instantiated through its
    /// [`Default`] implementation.
    pub fn of<T: Any + Default>() -> BeanClassBuilder<T> {
        BeanClassBuilder::new(|| T::default())
    }

    /// Start describing the bean type `T` with an explicit constructor.
    pub fn with_constructor<T: Any>(construct: impl Fn() -> T + 'static) -> BeanClassBuilder<T> {
        BeanClassBuilder::new(construct)
    }

    pub fn type_id(&self) -> TypeId {
        self.type_id
    }

    /// The Rust type name, for diagnostics only.
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub fn properties(&self) -> &[BeanProperty] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&BeanProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn new_instance(&self) -> Box<dyn Any> {
        (self.construct)()
    }
}

/// Builder for [`BeanClass`] values. Accessors are declared against the
/// concrete type; the builder erases them behind downcasts.
pub struct BeanClassBuilder<T> {
    construct: Box<dyn Fn() -> Box<dyn Any>>,
    properties: Vec<BeanProperty>,
    _type: std::marker::PhantomData<fn() -> T>,
}

impl<T: Any> BeanClassBuilder<T> {
    fn new(construct: impl Fn() -> T + 'static) -> Self {
        BeanClassBuilder {
            construct: Box::new(move || Box::new(construct())),
            properties: vec![],
            _type: std::marker::PhantomData,
        }
    }

    /// Declare a property. Declaration order is the serialization order.
    pub fn property(
        mut self,
        name: &str,
        hint: TypeHint,
        get: impl Fn(&T) -> Shared + 'static,
        set: impl Fn(&mut T, Parsed) -> Result<(), BeanError> + 'static,
    ) -> Self {
        self.properties.push(BeanProperty {
            name: name.to_string(),
            hint,
            get: Box::new(move |any| {
                any.downcast_ref::<T>()
                    .map(&get)
                    .ok_or(BeanError::WrongClass(type_name::<T>()))
            }),
            set: Box::new(move |any, value| match any.downcast_mut::<T>() {
                Some(instance) => set(instance, value),
                None => Err(BeanError::WrongClass(type_name::<T>())),
            }),
        });
        self
    }

    pub fn build(self) -> BeanClass {
        let BeanClassBuilder {
            construct,
            properties,
            ..
        } = self;
        BeanClass {
            type_id: TypeId::of::<T>(),
            type_name: type_name::<T>(),
            construct,
            properties,
        }
    }
}

/// The capability through which the engine obtains property tables. Supplied
/// by the host; frozen for the lifetime of the owning context.
pub trait BeanIntrospector {
    fn introspect(&self, ty: TypeId) -> Option<&BeanClass>;
}

/// A registry backed introspector, populated up front from static
/// declarations.
#[derive(Default)]
pub struct BeanRegistry {
    classes: HashMap<TypeId, BeanClass>,
}

impl BeanRegistry {
    pub fn register(&mut self, class: BeanClass) {
        self.classes.insert(class.type_id(), class);
    }
}

impl BeanIntrospector for BeanRegistry {
    fn introspect(&self, ty: TypeId) -> Option<&BeanClass> {
        self.classes.get(&ty)
    }
}
