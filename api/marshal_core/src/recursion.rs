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

use crate::error::TraversalPath;
use marshal_model::ValueCategory;
use std::collections::HashSet;
use std::fmt::Write;

/// One entry of the active traversal stack: the composite node currently
/// being visited at that depth.
#[derive(Debug, Clone)]
pub struct TraversalFrame {
    pub depth: usize,
    pub attr: Option<String>,
    pub identity: usize,
    pub category: ValueCategory,
}

impl TraversalFrame {
    fn render(&self) -> String {
        let mut out = String::new();
        let _ = write!(
            &mut out,
            "[{}]{}:{}",
            self.depth,
            self.attr.as_deref().unwrap_or("<noname>"),
            self.category
        );
        out
    }
}

/// Tracks the set of objects on the active traversal path by identity and
/// enforces the maximum depth. Identity is reference identity: two distinct
/// but equal objects are different nodes, only revisiting the same object
/// is a cycle.
pub struct RecursionGuard {
    detect: bool,
    ignore: bool,
    max_depth: usize,
    seen: HashSet<usize>,
    frames: Vec<TraversalFrame>,
}

/// Result of entering a composite node.
#[derive(Debug, PartialEq, Eq)]
pub enum Entered {
    Accepted,
    /// The node is already on the path and the ignore policy applies; the
    /// caller should emit the node as null and must not call `leave`.
    Rejected,
}

/// Guard failures; the session attaches the traversal path and settings.
#[derive(Debug, PartialEq, Eq)]
pub enum GuardError {
    Recursion,
    DepthExceeded,
}

impl RecursionGuard {
    pub fn new(detect: bool, ignore: bool, max_depth: usize) -> Self {
        RecursionGuard {
            detect,
            ignore,
            max_depth,
            seen: HashSet::new(),
            frames: Vec::new(),
        }
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn detect(&self) -> bool {
        self.detect
    }

    /// True if entering the given identity would be rejected as a cycle.
    pub fn would_recurse(&self, identity: usize) -> bool {
        self.detect && self.seen.contains(&identity)
    }

    /// Enter a composite node. The depth bound is enforced whether or not
    /// cycle detection is enabled; it is the only backstop against an
    /// undetected cycle exhausting the stack.
    pub fn enter(
        &mut self,
        attr: Option<&str>,
        identity: usize,
        category: ValueCategory,
    ) -> Result<Entered, GuardError> {
        if self.frames.len() >= self.max_depth {
            return Err(GuardError::DepthExceeded);
        }
        if self.detect && self.seen.contains(&identity) {
            if self.ignore {
                return Ok(Entered::Rejected);
            }
            self.frames.push(TraversalFrame {
                depth: self.frames.len(),
                attr: attr.map(str::to_string),
                identity,
                category,
            });
            return Err(GuardError::Recursion);
        }
        if self.detect {
            self.seen.insert(identity);
        }
        self.frames.push(TraversalFrame {
            depth: self.frames.len(),
            attr: attr.map(str::to_string),
            identity,
            category,
        });
        Ok(Entered::Accepted)
    }

    /// Leave a composite node previously accepted by `enter`.
    pub fn leave(&mut self, identity: usize) {
        if let Some(frame) = self.frames.pop() {
            debug_assert_eq!(frame.identity, identity);
        }
        if self.detect {
            self.seen.remove(&identity);
        }
    }

    /// The attribute path of the active traversal, for error reporting.
    pub fn path(&self) -> TraversalPath {
        TraversalPath(self.frames.iter().map(TraversalFrame::render).collect())
    }

    /// The path extended with one further attribute that has not been
    /// entered yet.
    pub fn path_with(&self, attr: Option<&str>) -> TraversalPath {
        let mut path = self.path();
        path.0.push(format!(
            "[{}]{}",
            self.frames.len(),
            attr.unwrap_or("<noname>")
        ));
        path
    }
}
