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

use std::any::{Any, TypeId};
use std::collections::HashMap;

/// A bidirectional mapping between the short type names embedded in
/// serialized output and reconstructable types. Consulted by the serializer
/// when writing a type discriminator and by the parser when one is read.
/// Read only for the lifetime of the owning context.
#[derive(Default)]
pub struct TypeNameRegistry {
    by_name: HashMap<String, TypeId>,
    by_type: HashMap<TypeId, String>,
}

impl TypeNameRegistry {
    /// Register a short name for the type `T`. Names are unique in both
    /// directions; a re-registration replaces the previous entry.
    pub fn register<T: Any>(&mut self, name: &str) {
        self.register_id(name, TypeId::of::<T>());
    }

    pub fn register_id(&mut self, name: &str, ty: TypeId) {
        if let Some(old) = self.by_type.insert(ty, name.to_string()) {
            self.by_name.remove(&old);
        }
        self.by_name.insert(name.to_string(), ty);
    }

    /// The type registered under the given short name, if any.
    pub fn resolve(&self, name: &str) -> Option<TypeId> {
        self.by_name.get(name).copied()
    }

    /// The short name registered for the given type, if any.
    pub fn name_for(&self, ty: TypeId) -> Option<&str> {
        self.by_type.get(&ty).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::TypeNameRegistry;
    use std::any::TypeId;

    #[test]
    fn resolves_both_directions() {
        let mut names = TypeNameRegistry::default();
        names.register::<String>("str");
        names.register::<i64>("long");
        assert_eq!(names.resolve("str"), Some(TypeId::of::<String>()));
        assert_eq!(names.name_for(TypeId::of::<i64>()), Some("long"));
        assert_eq!(names.resolve("missing"), None);
    }

    #[test]
    fn re_registration_replaces() {
        let mut names = TypeNameRegistry::default();
        names.register::<String>("a");
        names.register::<String>("b");
        assert_eq!(names.resolve("a"), None);
        assert_eq!(names.resolve("b"), Some(TypeId::of::<String>()));
        assert_eq!(names.name_for(TypeId::of::<String>()), Some("b"));
    }
}
