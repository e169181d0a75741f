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

/// Per invocation settings of a serialization session, captured immutably at
/// session construction.
#[derive(Clone, Debug)]
pub struct SerializerConfig {
    /// The quote character used for strings and keys.
    pub quote_char: char,
    /// Emit whitespace and newlines for readability.
    pub use_whitespace: bool,
    /// The maximum traversal depth.
    pub max_depth: usize,
    /// The indentation level the output starts at.
    pub initial_depth: usize,
    /// The deepest indentation the writer will produce; deeper nesting stops
    /// indenting further.
    pub max_indent: usize,
    /// Track object identities along the traversal path to detect cycles.
    pub detect_recursions: bool,
    /// Serialize a detected cycle as null instead of failing.
    pub ignore_recursions: bool,
    /// Omit map entries and bean properties with null values.
    pub trim_null_properties: bool,
    /// Omit map entries and bean properties holding empty collections.
    pub trim_empty_collections: bool,
    /// Omit map entries and bean properties holding empty maps.
    pub trim_empty_maps: bool,
    /// Trim surrounding whitespace from string values.
    pub trim_strings: bool,
    /// Sort collection elements when they are mutually comparable scalars.
    pub sort_collections: bool,
    /// Sort map entries by key.
    pub sort_maps: bool,
    /// Write bean properties in alphabetical rather than declared order.
    pub sort_properties: bool,
    /// Embed a type discriminator property when the actual type of a bean
    /// diverges from the expected type and has a registered name.
    pub add_type_discriminator: bool,
    /// The name of the type discriminator property.
    pub type_property_name: String,
}

impl Default for SerializerConfig {
    fn default() -> Self {
        SerializerConfig {
            quote_char: '"',
            use_whitespace: false,
            max_depth: 100,
            initial_depth: 0,
            max_indent: 100,
            detect_recursions: false,
            ignore_recursions: false,
            trim_null_properties: false,
            trim_empty_collections: false,
            trim_empty_maps: false,
            trim_strings: false,
            sort_collections: false,
            sort_maps: false,
            sort_properties: false,
            add_type_discriminator: false,
            type_property_name: "_type".to_string(),
        }
    }
}

impl SerializerConfig {
    pub fn with_quote_char(mut self, quote_char: char) -> Self {
        self.quote_char = quote_char;
        self
    }

    pub fn with_whitespace(mut self, use_whitespace: bool) -> Self {
        self.use_whitespace = use_whitespace;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_initial_depth(mut self, initial_depth: usize) -> Self {
        self.initial_depth = initial_depth;
        self
    }

    pub fn with_max_indent(mut self, max_indent: usize) -> Self {
        self.max_indent = max_indent;
        self
    }

    pub fn with_detect_recursions(mut self, detect: bool) -> Self {
        self.detect_recursions = detect;
        self
    }

    pub fn with_ignore_recursions(mut self, ignore: bool) -> Self {
        self.ignore_recursions = ignore;
        self
    }

    pub fn with_trim_null_properties(mut self, trim: bool) -> Self {
        self.trim_null_properties = trim;
        self
    }

    pub fn with_trim_empty_collections(mut self, trim: bool) -> Self {
        self.trim_empty_collections = trim;
        self
    }

    pub fn with_trim_empty_maps(mut self, trim: bool) -> Self {
        self.trim_empty_maps = trim;
        self
    }

    pub fn with_trim_strings(mut self, trim: bool) -> Self {
        self.trim_strings = trim;
        self
    }

    pub fn with_sort_collections(mut self, sort: bool) -> Self {
        self.sort_collections = sort;
        self
    }

    pub fn with_sort_maps(mut self, sort: bool) -> Self {
        self.sort_maps = sort;
        self
    }

    pub fn with_sort_properties(mut self, sort: bool) -> Self {
        self.sort_properties = sort;
        self
    }

    pub fn with_type_discriminator(mut self, add: bool) -> Self {
        self.add_type_discriminator = add;
        self
    }

    pub fn with_type_property_name(mut self, name: &str) -> Self {
        self.type_property_name = name.to_string();
        self
    }
}

/// Per invocation settings of a parser session.
#[derive(Clone, Debug)]
pub struct ParserConfig {
    /// Enforce the strict grammar: double quoted strings only, no comments,
    /// no concatenation, no unquoted tokens, JSON number rules.
    pub strict: bool,
    /// Discard keys with no corresponding bean property instead of failing.
    pub ignore_unknown_properties: bool,
    /// The maximum nesting depth of the input.
    pub max_depth: usize,
    /// The name of the type discriminator property.
    pub type_property_name: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        ParserConfig {
            strict: false,
            ignore_unknown_properties: true,
            max_depth: 100,
            type_property_name: "_type".to_string(),
        }
    }
}

impl ParserConfig {
    pub fn with_strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    pub fn with_ignore_unknown_properties(mut self, ignore: bool) -> Self {
        self.ignore_unknown_properties = ignore;
        self
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_type_property_name(mut self, name: &str) -> Self {
        self.type_property_name = name.to_string();
        self
    }
}
