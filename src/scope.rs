//! Lexical scope for `let` expressions.
//!
//! A [`Scope`] is a persistent linked list of frames. Binding a name never
//! changes an existing scope; it returns a new one whose parent is the old
//! one, so a scope captured by an expression reference keeps seeing exactly
//! the variables that were visible where it was created.

use std::rc::Rc;

#[derive(Debug)]
struct Frame<V> {
    bindings: Vec<(String, V)>,
    parent: Option<Rc<Frame<V>>>,
}

/// Chained variable environment.
#[derive(Debug)]
pub struct Scope<V> {
    head: Option<Rc<Frame<V>>>,
}

impl<V> Clone for Scope<V> {
    fn clone(&self) -> Self {
        Scope {
            head: self.head.clone(),
        }
    }
}

impl<V> Default for Scope<V> {
    fn default() -> Self {
        Scope { head: None }
    }
}

impl<V> Scope<V> {
    /// The empty top-level scope.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a new scope in which `name` is bound to `value`, shadowing any
    /// outer binding of the same name.
    pub fn bind(&self, name: impl Into<String>, value: V) -> Self {
        Scope {
            head: Some(Rc::new(Frame {
                bindings: vec![(name.into(), value)],
                parent: self.head.clone(),
            })),
        }
    }

    /// Returns an empty scope parented to this one.
    pub fn child(&self) -> Self {
        Scope {
            head: Some(Rc::new(Frame {
                bindings: Vec::new(),
                parent: self.head.clone(),
            })),
        }
    }

    /// Looks `name` up, innermost frame first.
    pub fn get(&self, name: &str) -> Option<&V> {
        let mut frame = self.head.as_deref();
        while let Some(current) = frame {
            if let Some((_, value)) = current.bindings.iter().rev().find(|(n, _)| n == name) {
                return Some(value);
            }
            frame = current.parent.as_deref();
        }
        None
    }
}

#[test]
fn test_bind_does_not_touch_parent() {
    let outer = Scope::new().bind("x", 1);
    let inner = outer.bind("x", 2);
    assert_eq!(inner.get("x"), Some(&2));
    assert_eq!(outer.get("x"), Some(&1));
}

#[test]
fn test_lookup_walks_to_root() {
    let scope = Scope::new().bind("a", "root").child().bind("b", "leaf");
    assert_eq!(scope.get("a"), Some(&"root"));
    assert_eq!(scope.get("b"), Some(&"leaf"));
    assert_eq!(scope.get("c"), None);
}
