//! The standard JMESPath function library, grouped by concern.

mod collections;
mod conversion;
mod higher_order;
mod math;
mod strings;

use crate::{
    evaluator::EvalError,
    functions::{Argument, ExpressionRef, FunctionModule},
    value::ValueModel,
};

/// Every builtin module, in registration order.
pub fn modules<M: ValueModel>() -> Vec<FunctionModule<M>> {
    vec![
        math::module(),
        strings::module(),
        collections::module(),
        conversion::module(),
        higher_order::module(),
    ]
}

// Argument accessors. Signatures are validated before an implementation
// runs, so these only fail when a custom signature disagrees with its body.

fn value<'v, M: ValueModel>(
    args: &'v [Argument<'_, M>],
    index: usize,
) -> Result<&'v M::Value, EvalError> {
    args.get(index)
        .and_then(Argument::as_value)
        .ok_or_else(|| EvalError::Type(format!("argument {} must be a value", index + 1)))
}

fn expression<'v, 'a, M: ValueModel>(
    args: &'v [Argument<'a, M>],
    index: usize,
) -> Result<&'v ExpressionRef<'a, M>, EvalError> {
    args.get(index)
        .and_then(Argument::as_expression)
        .ok_or_else(|| EvalError::Type(format!("argument {} must be an expression", index + 1)))
}

fn number<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    index: usize,
) -> Result<f64, EvalError> {
    let value = value(args, index)?;
    model
        .as_number(value)
        .ok_or_else(|| EvalError::Type(format!("argument {} must be a number", index + 1)))
}

fn string<'v, M: ValueModel>(
    model: &M,
    args: &'v [Argument<'_, M>],
    index: usize,
) -> Result<&'v str, EvalError> {
    let value = value(args, index)?;
    model
        .as_str(value)
        .ok_or_else(|| EvalError::Type(format!("argument {} must be a string", index + 1)))
}
