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

use crate::hint::TypeHint;
use marshal_model::ValueCategory;
use std::any::TypeId;
use std::error::Error;
use std::fmt::{Display, Formatter};
use thiserror::Error as ThisError;

/// Failure raised by a bean accessor or a type substitution function.
#[derive(Debug, ThisError)]
pub enum BeanError {
    #[error("The instance is not of the expected class '{0}'.")]
    WrongClass(&'static str),
    #[error("The value is not assignable to the property: {0}")]
    NotAssignable(String),
    #[error("Could not produce a value: {0}")]
    Failed(String),
}

/// Failure converting a generic document value into a typed one.
#[derive(Debug, ThisError)]
pub enum ConvertError {
    #[error("A value of category {actual} is not convertible to {expected}.")]
    NotConvertible {
        expected: TypeHint,
        actual: ValueCategory,
    },
    #[error("The text value '{text}' is not a valid {expected}.")]
    Malformatted { expected: TypeHint, text: String },
    #[error("No bean class is registered for the expected type.")]
    NoSuchClass,
    #[error("The result contains a bean instance and is not a plain value.")]
    NotAValue,
    #[error(transparent)]
    Bean(#[from] BeanError),
}

/// The names of the attributes on the active traversal path, outermost
/// first. Attached to every serialization error so a failure can be located
/// without re-running with tracing enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraversalPath(pub Vec<String>);

impl TraversalPath {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Display for TraversalPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            let mut first = true;
            for name in &self.0 {
                if !first {
                    f.write_str(" > ")?;
                }
                first = false;
                f.write_str(name)?;
            }
            Ok(())
        }
    }
}

/// Failure type for serialize operations. Every variant carries the path of
/// attribute names leading to the node that failed.
#[derive(Debug)]
pub enum SerializeError {
    /// The node could not be classified and no substitution was registered.
    UnsupportedType {
        type_id: TypeId,
        path: TraversalPath,
    },
    /// A cycle was found under the strict recursion policy.
    Recursion { path: TraversalPath },
    /// The traversal exceeded the configured maximum depth.
    DepthExceeded {
        max_depth: usize,
        path: TraversalPath,
        detect_enabled: bool,
    },
    /// A bean property getter failed.
    Property {
        property: String,
        path: TraversalPath,
        source: BeanError,
    },
    /// A type substitution's swap function failed.
    Swap {
        path: TraversalPath,
        source: BeanError,
    },
    /// A shared container was mutably borrowed while being serialized.
    Busy { path: TraversalPath },
    /// The token sink reported a failure.
    Sink {
        message: String,
        path: TraversalPath,
    },
}

impl Display for SerializeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SerializeError::UnsupportedType { type_id, path } => {
                write!(
                    f,
                    "No classification is available for a value of type {:?} at {}. \
                     Register a bean class or a type substitution for it.",
                    type_id, path
                )
            }
            SerializeError::Recursion { path } => {
                write!(f, "Recursion occurred, stack: {}", path)
            }
            SerializeError::DepthExceeded {
                max_depth,
                path,
                detect_enabled,
            } => {
                write!(f, "Maximum depth of {} exceeded at {}.", max_depth, path)?;
                if !detect_enabled {
                    f.write_str(
                        " This can occur when serializing models containing loops. \
                         Enable recursion detection to help locate the loop.",
                    )?;
                }
                Ok(())
            }
            SerializeError::Property {
                property,
                path,
                source,
            } => {
                write!(
                    f,
                    "Could not read property '{}' at {}: {}",
                    property, path, source
                )
            }
            SerializeError::Swap { path, source } => {
                write!(f, "Type substitution failed at {}: {}", path, source)
            }
            SerializeError::Busy { path } => {
                write!(
                    f,
                    "A shared container at {} was mutably borrowed during serialization.",
                    path
                )
            }
            SerializeError::Sink { message, path } => {
                write!(f, "Failed to write output at {}: {}", path, message)
            }
        }
    }
}

impl Error for SerializeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SerializeError::Property { source, .. } | SerializeError::Swap { source, .. } => {
                Some(source)
            }
            _ => None,
        }
    }
}
