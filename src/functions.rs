//! Function calls.
//!
//! A [`Function`] pairs a [`Signature`] with an implementation closure. The
//! registry validates arity and argument types before the implementation
//! runs, so implementations can assume their arguments have the declared
//! kinds.
//!
//! ```
//! use clove_jmespath::functions::{ArgumentType, Function, FunctionRegistry};
//! use clove_jmespath::{JsonModel, ValueModel};
//!
//! let double = Function::<JsonModel>::builder("double")
//!     .arg([ArgumentType::Number])
//!     .build(|model, args, _current| {
//!         let n = args[0].as_value().and_then(|v| model.as_number(v)).unwrap_or(0.0);
//!         Ok(model.number(n * 2.0))
//!     });
//!
//! let mut registry = FunctionRegistry::builtins();
//! registry.register(double);
//! let model = JsonModel::with_registry(registry);
//!
//! let expression = clove_jmespath::compile("double(a)").unwrap();
//! let result = expression.evaluate(&model, &serde_json::json!({"a": 21})).unwrap();
//! assert_eq!(result, serde_json::json!(42));
//! ```

pub mod builtins;
pub mod registry;
pub mod signature;

use std::{fmt, marker::PhantomData, sync::Arc};

use log::debug;

pub use registry::{FunctionModule, FunctionRegistry};
pub use signature::{ArgumentType, Parameter, Signature};

use crate::{
    ast::Node,
    evaluator::{EvalError, Evaluator},
    scope::Scope,
    value::ValueModel,
};

/// A deferred expression passed with `&expr`.
///
/// It keeps the scope that was visible at the call site, so variables bound
/// by an enclosing `let` resolve the same way inside the callee.
pub struct ExpressionRef<'a, M: ValueModel> {
    node: &'a Node,
    evaluator: &'a Evaluator<'a, M>,
    scope: &'a Scope<M::Value>,
}

impl<'a, M: ValueModel> ExpressionRef<'a, M> {
    pub(crate) fn new(
        node: &'a Node,
        evaluator: &'a Evaluator<'a, M>,
        scope: &'a Scope<M::Value>,
    ) -> Self {
        ExpressionRef {
            node,
            evaluator,
            scope,
        }
    }

    pub fn node(&self) -> &Node {
        self.node
    }

    /// Evaluates the expression with `value` as the current node.
    pub fn evaluate(&self, value: &M::Value) -> Result<M::Value, EvalError> {
        self.evaluator.eval(self.node, value, self.scope)
    }
}

impl<M: ValueModel> fmt::Debug for ExpressionRef<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ExpressionRef").field(self.node).finish()
    }
}

/// An evaluated function argument.
pub enum Argument<'a, M: ValueModel> {
    Value(M::Value),
    Expression(ExpressionRef<'a, M>),
}

impl<'a, M: ValueModel> Argument<'a, M> {
    pub fn as_value(&self) -> Option<&M::Value> {
        match self {
            Argument::Value(value) => Some(value),
            Argument::Expression(_) => None,
        }
    }

    pub fn as_expression(&self) -> Option<&ExpressionRef<'a, M>> {
        match self {
            Argument::Value(_) => None,
            Argument::Expression(expression) => Some(expression),
        }
    }
}

impl<M: ValueModel> fmt::Debug for Argument<'_, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Argument::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Argument::Expression(expression) => expression.fmt(f),
        }
    }
}

type Implementation<M> = dyn Fn(
        &M,
        &[Argument<'_, M>],
        &<M as ValueModel>::Value,
    ) -> Result<<M as ValueModel>::Value, EvalError>
    + Send
    + Sync;

/// A named, typed function callable from expressions.
pub struct Function<M: ValueModel> {
    name: String,
    signature: Signature,
    implementation: Arc<Implementation<M>>,
}

impl<M: ValueModel> Function<M> {
    pub fn new<F>(name: impl Into<String>, signature: Signature, implementation: F) -> Self
    where
        F: Fn(&M, &[Argument<'_, M>], &M::Value) -> Result<M::Value, EvalError>
            + Send
            + Sync
            + 'static,
    {
        Function {
            name: name.into(),
            signature,
            implementation: Arc::new(implementation),
        }
    }

    pub fn builder(name: impl Into<String>) -> FunctionBuilder<M> {
        FunctionBuilder {
            name: name.into(),
            signature: Signature::new(),
            model: PhantomData,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// The same function under another name. Error messages use the new name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Function {
            name: name.into(),
            signature: self.signature.clone(),
            implementation: Arc::clone(&self.implementation),
        }
    }

    /// Checks the arguments against the signature and runs the function.
    ///
    /// With [`ValueModel::silent_type_errors`] enabled, a type error from
    /// either step yields `null`. Arity errors are never silenced.
    pub fn call(
        &self,
        model: &M,
        args: &[Argument<'_, M>],
        current: &M::Value,
    ) -> Result<M::Value, EvalError> {
        let result = self
            .signature
            .validate(&self.name, model, args)
            .and_then(|()| (self.implementation)(model, args, current));

        match result {
            Err(EvalError::Type(message)) if model.silent_type_errors() => {
                debug!("{}() type error silenced: {message}", self.name);
                Ok(model.null())
            }
            other => other,
        }
    }
}

impl<M: ValueModel> Clone for Function<M> {
    fn clone(&self) -> Self {
        self.renamed(self.name.clone())
    }
}

impl<M: ValueModel> fmt::Debug for Function<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

/// Builder returned by [`Function::builder`].
#[derive(Debug)]
pub struct FunctionBuilder<M> {
    name: String,
    signature: Signature,
    model: PhantomData<fn() -> M>,
}

impl<M: ValueModel> FunctionBuilder<M> {
    /// Adds a required parameter accepting any of `types`.
    pub fn arg(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.signature = self.signature.arg(types);
        self
    }

    /// Adds a parameter that may be omitted.
    pub fn optional_arg(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.signature = self.signature.optional_arg(types);
        self
    }

    /// Accepts any number of trailing arguments of `types`.
    pub fn variadic(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.signature = self.signature.variadic(types);
        self
    }

    pub fn build<F>(self, implementation: F) -> Function<M>
    where
        F: Fn(&M, &[Argument<'_, M>], &M::Value) -> Result<M::Value, EvalError>
            + Send
            + Sync
            + 'static,
    {
        Function::new(self.name, self.signature, implementation)
    }
}
