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

use crate::error::{BeanError, ConvertError};
use crate::hint::TypeHint;
use crate::parsed::Parsed;
use crate::reflect::Shared;
use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A registered pair of functions substituting a surrogate representation
/// for a type: `swap` produces the surrogate during serialization and
/// `unswap` reconstructs the original during parsing. A surrogate is
/// classified exactly once and is never itself substitutable.
pub struct TypeSubstitution {
    surrogate: TypeHint,
    swap: Box<dyn Fn(&dyn Any) -> Result<Shared, BeanError>>,
    unswap: Box<dyn Fn(Parsed) -> Result<Parsed, ConvertError>>,
}

impl TypeSubstitution {
    /// Declare a substitution for the type `T`. `surrogate` is the hint the
    /// parser will use for the serialized form.
    pub fn new<T: Any>(
        surrogate: TypeHint,
        swap: impl Fn(&T) -> Shared + 'static,
        unswap: impl Fn(Parsed) -> Result<T, ConvertError> + 'static,
    ) -> Self {
        TypeSubstitution {
            surrogate,
            swap: Box::new(move |any| {
                any.downcast_ref::<T>()
                    .map(&swap)
                    .ok_or(BeanError::WrongClass(std::any::type_name::<T>()))
            }),
            unswap: Box::new(move |parsed| {
                unswap(parsed).map(|value| Parsed::Bean(Box::new(value)))
            }),
        }
    }

    /// The hint describing the serialized (surrogate) form.
    pub fn surrogate(&self) -> &TypeHint {
        &self.surrogate
    }

    pub fn swap(&self, value: &dyn Any) -> Result<Shared, BeanError> {
        (self.swap)(value)
    }

    pub fn unswap(&self, surrogate: Parsed) -> Result<Parsed, ConvertError> {
        (self.unswap)(surrogate)
    }
}

/// The substitutions known to a context, keyed by the concrete type they
/// apply to. Frozen once the owning context is built.
#[derive(Default)]
pub struct SwapRegistry {
    swaps: HashMap<TypeId, TypeSubstitution>,
}

impl SwapRegistry {
    pub fn register<T: Any>(&mut self, substitution: TypeSubstitution) {
        self.swaps.insert(TypeId::of::<T>(), substitution);
    }

    pub fn lookup(&self, ty: TypeId) -> Option<&TypeSubstitution> {
        self.swaps.get(&ty)
    }
}
