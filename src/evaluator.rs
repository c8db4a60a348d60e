use log::trace;
use thiserror::Error;

use crate::{
    ast::{Comparator, Node, Slice},
    error::ErrorKind,
    functions::{Argument, ExpressionRef},
    scope::Scope,
    value::{ValueKind, ValueModel},
};

/// Errors that can occur during expression evaluation.
///
/// Missing properties, out-of-range indices, and operations on the wrong
/// kind of value are not errors: they evaluate to `null`.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalError {
    /// Wrong number of arguments passed to a function
    #[error("invalid arity: {function}() takes {expected} argument(s), got {actual}")]
    Arity {
        function: String,
        expected: String,
        actual: usize,
    },

    /// Argument or key of the wrong kind
    #[error("invalid type: {0}")]
    Type(String),

    /// Call to a function that is not in the registry
    #[error("unknown function: {0}()")]
    UnknownFunction(String),

    /// Well-typed but unusable value, such as a zero slice step
    #[error("invalid value: {0}")]
    Value(String),
}

impl EvalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EvalError::Arity { .. } => ErrorKind::Arity,
            EvalError::Type(_) => ErrorKind::Type,
            EvalError::UnknownFunction(_) => ErrorKind::UnknownFunction,
            EvalError::Value(_) => ErrorKind::Value,
        }
    }
}

/// Walks a syntax tree against a document.
///
/// An evaluator is cheap to create and holds no state besides the model and
/// the root document, which `$` refers to.
pub struct Evaluator<'a, M: ValueModel> {
    model: &'a M,
    root: &'a M::Value,
}

impl<'a, M: ValueModel> Evaluator<'a, M> {
    pub fn new(model: &'a M, root: &'a M::Value) -> Self {
        Evaluator { model, root }
    }

    pub fn model(&self) -> &'a M {
        self.model
    }

    /// Evaluates `node` with the root document as the current value and an
    /// empty scope.
    pub fn evaluate(&self, node: &Node) -> Result<M::Value, EvalError> {
        self.eval(node, self.root, &Scope::new())
    }

    /// Evaluates `node` against `current` with the variables in `scope`.
    pub fn eval(
        &self,
        node: &Node,
        current: &M::Value,
        scope: &Scope<M::Value>,
    ) -> Result<M::Value, EvalError> {
        let model = self.model;

        match node {
            Node::Current => Ok(current.clone()),
            Node::Root => Ok(self.root.clone()),
            Node::VariableRef(name) => Ok(scope.get(name).cloned().unwrap_or_else(|| model.null())),
            Node::Identifier(name) => Ok(model
                .property(current, name)
                .cloned()
                .unwrap_or_else(|| model.null())),
            Node::Index(index) => Ok(self.index(current, *index)),
            Node::Slice(slice) => self.slice(current, slice),
            Node::Subexpression { left, right } => {
                let base = self.eval(left, current, scope)?;
                self.eval(right, &base, scope)
            }
            Node::Flatten(inner) => {
                let value = self.eval(inner, current, scope)?;
                Ok(self.flatten(&value))
            }
            Node::ArrayProjection { left, right } => {
                let base = self.eval(left, current, scope)?;
                if model.kind(&base) != ValueKind::Array {
                    return Ok(model.null());
                }
                self.project(model.elements(&base), right.as_deref(), scope)
            }
            Node::ObjectProjection { left, right } => {
                let base = self.eval(left, current, scope)?;
                if model.kind(&base) != ValueKind::Object {
                    return Ok(model.null());
                }
                self.project(model.values(&base), right.as_deref(), scope)
            }
            Node::Filter {
                left,
                condition,
                right,
            } => {
                let base = self.eval(left, current, scope)?;
                if model.kind(&base) != ValueKind::Array {
                    return Ok(model.null());
                }
                let mut kept = Vec::new();
                for element in model.elements(&base) {
                    if model.is_truthy(&self.eval(condition, element, scope)?) {
                        kept.push(element);
                    }
                }
                self.project(kept.into_iter(), right.as_deref(), scope)
            }
            Node::Pipe { left, right } => {
                let value = self.eval(left, current, scope)?;
                self.eval(right, &value, scope)
            }
            Node::Or { left, right } => {
                let value = self.eval(left, current, scope)?;
                if model.is_truthy(&value) {
                    Ok(value)
                } else {
                    self.eval(right, current, scope)
                }
            }
            Node::And { left, right } => {
                let value = self.eval(left, current, scope)?;
                if model.is_truthy(&value) {
                    self.eval(right, current, scope)
                } else {
                    Ok(value)
                }
            }
            Node::Not(inner) => {
                let value = self.eval(inner, current, scope)?;
                Ok(model.boolean(!model.is_truthy(&value)))
            }
            Node::Comparison { op, left, right } => {
                let left = self.eval(left, current, scope)?;
                let right = self.eval(right, current, scope)?;
                Ok(self.compare(*op, &left, &right))
            }
            Node::MultiSelectList(elements) => {
                if model.is_null(current) {
                    return Ok(model.null());
                }
                let mut values = Vec::with_capacity(elements.len());
                for element in elements {
                    values.push(self.eval(element, current, scope)?);
                }
                Ok(model.array(values))
            }
            Node::MultiSelectHash(pairs) => {
                if model.is_null(current) {
                    return Ok(model.null());
                }
                let mut entries = Vec::with_capacity(pairs.len());
                for pair in pairs {
                    entries.push((pair.key.clone(), self.eval(&pair.value, current, scope)?));
                }
                Ok(model.object(entries))
            }
            Node::FunctionCall { name, args } => self.call(name, args, current, scope),
            // Only meaningful as a function argument, where `call` intercepts it.
            Node::ExpressionRef(_) => Ok(model.null()),
            Node::Literal(text) => model.parse_literal(text),
            Node::RawString(text) => Ok(model.string(text.clone())),
            Node::Let { bindings, body } => {
                let mut inner = scope.child();
                for binding in bindings {
                    let value = self.eval(&binding.value, current, &inner)?;
                    inner = inner.bind(binding.name.as_str(), value);
                }
                self.eval(body, current, &inner)
            }
        }
    }

    fn index(&self, value: &M::Value, index: i64) -> M::Value {
        let model = self.model;
        if model.kind(value) != ValueKind::Array {
            return model.null();
        }

        let len = model.length(value) as i64;
        let resolved = if index < 0 { len + index } else { index };
        if resolved < 0 {
            return model.null();
        }
        model
            .element(value, resolved as usize)
            .cloned()
            .unwrap_or_else(|| model.null())
    }

    fn slice(&self, value: &M::Value, slice: &Slice) -> Result<M::Value, EvalError> {
        let model = self.model;
        let step = slice.step.unwrap_or(1);
        if step == 0 {
            return Err(EvalError::Value("slice step cannot be 0".to_string()));
        }
        if model.kind(value) != ValueKind::Array {
            return Ok(model.null());
        }

        let (start, stop) = slice_bounds(model.length(value) as i64, slice.start, slice.stop, step);
        let mut selected = Vec::new();
        let mut i = start;
        while (step > 0 && i < stop) || (step < 0 && i > stop) {
            if let Some(element) = model.element(value, i as usize) {
                selected.push(element.clone());
            }
            match i.checked_add(step) {
                Some(next) => i = next,
                None => break,
            }
        }
        Ok(model.array(selected))
    }

    fn flatten(&self, value: &M::Value) -> M::Value {
        let model = self.model;
        if model.kind(value) != ValueKind::Array {
            return model.null();
        }

        let mut flattened = Vec::new();
        for element in model.elements(value) {
            if model.kind(element) == ValueKind::Array {
                flattened.extend(model.elements(element).cloned());
            } else {
                flattened.push(element.clone());
            }
        }
        model.array(flattened)
    }

    /// Applies `right` to each element, dropping `null` results.
    fn project<'v, I>(
        &self,
        elements: I,
        right: Option<&Node>,
        scope: &Scope<M::Value>,
    ) -> Result<M::Value, EvalError>
    where
        I: Iterator<Item = &'v M::Value>,
        M::Value: 'v,
    {
        let model = self.model;
        let mut collected = Vec::new();
        for element in elements {
            let value = match right {
                Some(node) => self.eval(node, element, scope)?,
                None => element.clone(),
            };
            if !model.is_null(&value) {
                collected.push(value);
            }
        }
        Ok(model.array(collected))
    }

    fn compare(&self, op: Comparator, left: &M::Value, right: &M::Value) -> M::Value {
        let model = self.model;
        if !op.is_ordering() {
            let equal = model.equals(left, right);
            return model.boolean(if op == Comparator::Equal { equal } else { !equal });
        }

        let Some(ordering) = model.compare(left, right) else {
            return model.null();
        };
        let result = match op {
            Comparator::LessThan => ordering.is_lt(),
            Comparator::LessEqual => ordering.is_le(),
            Comparator::GreaterThan => ordering.is_gt(),
            _ => ordering.is_ge(),
        };
        model.boolean(result)
    }

    fn call(
        &self,
        name: &str,
        args: &[Node],
        current: &M::Value,
        scope: &Scope<M::Value>,
    ) -> Result<M::Value, EvalError> {
        let function = self
            .model
            .functions()
            .get(name)
            .ok_or_else(|| EvalError::UnknownFunction(name.to_string()))?;

        let mut arguments = Vec::with_capacity(args.len());
        for arg in args {
            let argument = match arg {
                Node::ExpressionRef(inner) => {
                    Argument::Expression(ExpressionRef::new(inner, self, scope))
                }
                other => Argument::Value(self.eval(other, current, scope)?),
            };
            arguments.push(argument);
        }

        trace!("calling {name}() with {} argument(s)", arguments.len());
        function.call(self.model, &arguments, current)
    }
}

/// Resolves slice bounds for an array of `len` elements.
///
/// Missing bounds default by the sign of `step`: `0..len` going forward,
/// `len - 1` down to (but excluding) `-1` going backward. Negative bounds
/// count from the end and out-of-range bounds are clamped.
pub fn slice_bounds(len: i64, start: Option<i64>, stop: Option<i64>, step: i64) -> (i64, i64) {
    let clamp = |bound: i64| -> i64 {
        if bound < 0 {
            let from_end = bound + len;
            if from_end >= 0 {
                from_end
            } else if step < 0 {
                -1
            } else {
                0
            }
        } else if bound >= len {
            if step < 0 { len - 1 } else { len }
        } else {
            bound
        }
    };

    let start = match start {
        Some(bound) => clamp(bound),
        None if step < 0 => len - 1,
        None => 0,
    };
    let stop = match stop {
        Some(bound) => clamp(bound),
        None if step < 0 => -1,
        None => len,
    };
    (start, stop)
}

#[test]
fn test_slice_bounds_negative_step() {
    assert_eq!(slice_bounds(20, Some(10), Some(-20), -1), (10, 0));
    assert_eq!(slice_bounds(3, None, None, -1), (2, -1));
    assert_eq!(slice_bounds(3, Some(-10), Some(10), 1), (0, 3));
}
