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

use crate::names::TypeNameRegistry;
use crate::reflect::{BeanClass, BeanIntrospector, BeanRegistry};
use crate::swap::{SwapRegistry, TypeSubstitution};
use std::any::{Any, TypeId};

/// The immutable configuration shared by every session created against it:
/// the bean introspector, the registered type substitutions and the type
/// name registry. Built once and never mutated afterwards, so sessions can
/// share it freely without locking.
pub struct TypeContext {
    introspector: Box<dyn BeanIntrospector>,
    swaps: SwapRegistry,
    names: TypeNameRegistry,
}

impl TypeContext {
    pub fn builder() -> TypeContextBuilder {
        TypeContextBuilder::default()
    }

    pub fn introspect(&self, ty: TypeId) -> Option<&BeanClass> {
        self.introspector.introspect(ty)
    }

    pub fn substitution(&self, ty: TypeId) -> Option<&TypeSubstitution> {
        self.swaps.lookup(ty)
    }

    pub fn names(&self) -> &TypeNameRegistry {
        &self.names
    }
}

impl Default for TypeContext {
    fn default() -> Self {
        TypeContext::builder().build()
    }
}

/// Builder for [`TypeContext`] values.
#[derive(Default)]
pub struct TypeContextBuilder {
    beans: BeanRegistry,
    custom: Option<Box<dyn BeanIntrospector>>,
    swaps: SwapRegistry,
    names: TypeNameRegistry,
}

impl TypeContextBuilder {
    /// Register a bean class with the built in registry introspector.
    pub fn bean(mut self, class: BeanClass) -> Self {
        self.beans.register(class);
        self
    }

    /// Register a bean class and a short type name for it in one step.
    pub fn named_bean(mut self, name: &str, class: BeanClass) -> Self {
        self.names.register_id(name, class.type_id());
        self.beans.register(class);
        self
    }

    /// Replace the introspector entirely. Beans registered through
    /// [`TypeContextBuilder::bean`] are ignored when a custom introspector
    /// is installed.
    pub fn introspector(mut self, introspector: Box<dyn BeanIntrospector>) -> Self {
        self.custom = Some(introspector);
        self
    }

    pub fn substitution<T: Any>(mut self, substitution: TypeSubstitution) -> Self {
        self.swaps.register::<T>(substitution);
        self
    }

    pub fn type_name<T: Any>(mut self, name: &str) -> Self {
        self.names.register::<T>(name);
        self
    }

    pub fn build(self) -> TypeContext {
        let TypeContextBuilder {
            beans,
            custom,
            swaps,
            names,
        } = self;
        TypeContext {
            introspector: custom.unwrap_or_else(|| Box::new(beans)),
            swaps,
            names,
        }
    }
}
