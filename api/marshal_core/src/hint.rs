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

use marshal_model::ValueCategory;
use std::any::{Any, TypeId};
use std::fmt::{Display, Formatter};

/// The statically expected type at a position in an object graph (the
/// declared type of a bean property, the element type of a container or the
/// target type of a top level parse). `Any` means the position accepts any
/// document value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TypeHint {
    Any,
    Boolean,
    Number,
    String,
    Char,
    /// A map with string keys and values of the given type.
    Map(Box<TypeHint>),
    /// An ordered collection with elements of the given type.
    Collection(Box<TypeHint>),
    /// A fixed size sequence with elements of the given type.
    Array(Box<TypeHint>),
    /// An introspectable bean type.
    Bean(TypeId),
}

impl TypeHint {
    /// The hint for the bean type `T`.
    pub fn bean<T: Any>() -> TypeHint {
        TypeHint::Bean(TypeId::of::<T>())
    }

    pub fn map(values: TypeHint) -> TypeHint {
        TypeHint::Map(Box::new(values))
    }

    pub fn collection(elements: TypeHint) -> TypeHint {
        TypeHint::Collection(Box::new(elements))
    }

    pub fn array(elements: TypeHint) -> TypeHint {
        TypeHint::Array(Box::new(elements))
    }

    /// The category a value matching this hint will classify as. `Any` maps
    /// to [`ValueCategory::Unknown`] as the category is only determined by
    /// the value itself.
    pub fn category(&self) -> ValueCategory {
        match self {
            TypeHint::Any => ValueCategory::Unknown,
            TypeHint::Boolean => ValueCategory::Boolean,
            TypeHint::Number => ValueCategory::Number,
            TypeHint::String => ValueCategory::String,
            TypeHint::Char => ValueCategory::Char,
            TypeHint::Map(_) => ValueCategory::Map,
            TypeHint::Collection(_) => ValueCategory::Collection,
            TypeHint::Array(_) => ValueCategory::Array,
            TypeHint::Bean(_) => ValueCategory::Bean,
        }
    }
}

impl Display for TypeHint {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            TypeHint::Any => f.write_str("any"),
            TypeHint::Boolean => f.write_str("boolean"),
            TypeHint::Number => f.write_str("number"),
            TypeHint::String => f.write_str("string"),
            TypeHint::Char => f.write_str("char"),
            TypeHint::Map(values) => write!(f, "map of {}", values),
            TypeHint::Collection(elements) => write!(f, "collection of {}", elements),
            TypeHint::Array(elements) => write!(f, "array of {}", elements),
            TypeHint::Bean(_) => f.write_str("bean"),
        }
    }
}
