use std::{cmp::Ordering, fmt};

use crate::{evaluator::EvalError, functions::FunctionRegistry};

/// The six JSON kinds every value classifies into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Name returned by the `type()` function.
    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Null => "null",
            ValueKind::Boolean => "boolean",
            ValueKind::Number => "number",
            ValueKind::String => "string",
            ValueKind::Array => "array",
            ValueKind::Object => "object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Borrowed iterator handed out by a [`ValueModel`].
pub type Elements<'a, V> = Box<dyn Iterator<Item = &'a V> + 'a>;

/// The contract between the query engine and a concrete JSON representation.
///
/// The engine never inspects values directly: it classifies, reads, and
/// builds them through this trait, so the same compiled expression can run
/// against any backend. A model is shared by every evaluation that uses it
/// and must be safe to use from several threads at once.
///
/// The comparison, equality, and truthiness operations have default
/// implementations in terms of the structural accessors.
pub trait ValueModel: Sized + Send + Sync + 'static {
    type Value: Clone + fmt::Debug;

    // Classification

    fn kind(&self, value: &Self::Value) -> ValueKind;

    // Structural access

    /// Property of an object; `None` for missing keys and non-objects.
    fn property<'a>(&self, value: &'a Self::Value, name: &str) -> Option<&'a Self::Value>;

    /// Element of an array; `None` when out of range or not an array.
    fn element<'a>(&self, value: &'a Self::Value, index: usize) -> Option<&'a Self::Value>;

    /// Element count of an array, or entry count of an object.
    fn length(&self, value: &Self::Value) -> usize;

    /// Array elements in order; empty for non-arrays.
    fn elements<'a>(&self, value: &'a Self::Value) -> Elements<'a, Self::Value>;

    /// Object keys in the object's own order; empty for non-objects.
    fn keys<'a>(&self, value: &'a Self::Value) -> Box<dyn Iterator<Item = &'a str> + 'a>;

    /// Object values in key order; empty for non-objects.
    fn values<'a>(&self, value: &'a Self::Value) -> Elements<'a, Self::Value>;

    // Conversion to host types

    fn as_bool(&self, value: &Self::Value) -> Option<bool>;

    fn as_number(&self, value: &Self::Value) -> Option<f64>;

    fn as_str<'a>(&self, value: &'a Self::Value) -> Option<&'a str>;

    // Construction

    fn null(&self) -> Self::Value;

    fn boolean(&self, value: bool) -> Self::Value;

    fn number(&self, value: f64) -> Self::Value;

    fn string(&self, value: String) -> Self::Value;

    fn array(&self, elements: Vec<Self::Value>) -> Self::Value;

    /// Builds an object keeping the given entry order.
    fn object(&self, entries: Vec<(String, Self::Value)>) -> Self::Value;

    // Text

    /// Parses the JSON text of a backtick literal.
    fn parse_literal(&self, text: &str) -> Result<Self::Value, EvalError>;

    /// Serializes a value as compact JSON.
    fn serialize(&self, value: &Self::Value) -> String;

    // Runtime configuration

    /// Functions available to expressions evaluated with this model.
    fn functions(&self) -> &FunctionRegistry<Self>;

    /// When true, type errors raised by function argument checks and by the
    /// `*_by` key comparisons produce `null` instead of failing.
    fn silent_type_errors(&self) -> bool {
        false
    }

    // Derived operations

    fn is_null(&self, value: &Self::Value) -> bool {
        self.kind(value) == ValueKind::Null
    }

    /// `false`, `null`, `""`, `[]` and `{}` are falsy; everything else,
    /// including the number `0`, is truthy.
    fn is_truthy(&self, value: &Self::Value) -> bool {
        match self.kind(value) {
            ValueKind::Null => false,
            ValueKind::Boolean => self.as_bool(value).unwrap_or(false),
            ValueKind::Number => true,
            ValueKind::String => self.as_str(value).is_some_and(|s| !s.is_empty()),
            ValueKind::Array | ValueKind::Object => self.length(value) > 0,
        }
    }

    /// Ordering between two numbers or two strings; `None` for any other
    /// pairing.
    fn compare(&self, left: &Self::Value, right: &Self::Value) -> Option<Ordering> {
        match (self.kind(left), self.kind(right)) {
            (ValueKind::Number, ValueKind::Number) => {
                self.as_number(left)?.partial_cmp(&self.as_number(right)?)
            }
            (ValueKind::String, ValueKind::String) => {
                Some(self.as_str(left)?.cmp(self.as_str(right)?))
            }
            _ => None,
        }
    }

    /// Deep structural equality. Numbers compare by value; objects compare
    /// by key set regardless of key order.
    fn equals(&self, left: &Self::Value, right: &Self::Value) -> bool {
        let kind = self.kind(left);
        if kind != self.kind(right) {
            return false;
        }
        match kind {
            ValueKind::Null => true,
            ValueKind::Boolean => self.as_bool(left) == self.as_bool(right),
            ValueKind::Number => self.as_number(left) == self.as_number(right),
            ValueKind::String => self.as_str(left) == self.as_str(right),
            ValueKind::Array => {
                self.length(left) == self.length(right)
                    && self
                        .elements(left)
                        .zip(self.elements(right))
                        .all(|(a, b)| self.equals(a, b))
            }
            ValueKind::Object => {
                self.length(left) == self.length(right)
                    && self.keys(left).all(|key| {
                        match (self.property(left, key), self.property(right, key)) {
                            (Some(a), Some(b)) => self.equals(a, b),
                            _ => false,
                        }
                    })
            }
        }
    }
}
