use std::cmp::Ordering;

use super::{expression, value};
use crate::{
    evaluator::EvalError,
    functions::{Argument, ArgumentType, ExpressionRef, Function, FunctionModule},
    value::{ValueKind, ValueModel},
};

pub(super) fn module<M: ValueModel>() -> FunctionModule<M> {
    FunctionModule::new("higher_order")
        .with(
            Function::builder("map")
                .arg([ArgumentType::Expression])
                .arg([ArgumentType::Array])
                .build(map::<M>),
        )
        .with(
            Function::builder("sort_by")
                .arg([ArgumentType::Array])
                .arg([ArgumentType::Expression])
                .build(sort_by::<M>),
        )
        .with(
            Function::builder("min_by")
                .arg([ArgumentType::Array])
                .arg([ArgumentType::Expression])
                .build(min_by::<M>),
        )
        .with(
            Function::builder("max_by")
                .arg([ArgumentType::Array])
                .arg([ArgumentType::Expression])
                .build(max_by::<M>),
        )
}

/// Unlike a projection, `map` keeps `null` results.
fn map<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let mapper = expression(args, 0)?;
    let mut mapped = Vec::new();
    for element in model.elements(value(args, 1)?) {
        mapped.push(mapper.evaluate(element)?);
    }
    Ok(model.array(mapped))
}

/// Evaluates the key expression for every element. Keys must be all numbers
/// or all strings.
fn keyed<'v, M: ValueModel>(
    model: &M,
    function: &str,
    array: &'v M::Value,
    key_expr: &ExpressionRef<'_, M>,
) -> Result<Vec<(M::Value, &'v M::Value)>, EvalError> {
    let mut keyed = Vec::new();
    let mut expected: Option<ValueKind> = None;

    for element in model.elements(array) {
        let key = key_expr.evaluate(element)?;
        let kind = model.kind(&key);
        if !matches!(kind, ValueKind::Number | ValueKind::String) {
            return Err(EvalError::Type(format!(
                "{function}() keys must be numbers or strings, got {kind}"
            )));
        }
        match expected {
            Some(first) if first != kind => {
                return Err(EvalError::Type(format!(
                    "{function}() keys must all have the same type, got {first} and {kind}"
                )));
            }
            Some(_) => {}
            None => expected = Some(kind),
        }
        keyed.push((key, element));
    }
    Ok(keyed)
}

/// Stable: elements with equal keys keep their input order.
fn sort_by<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let mut keyed = keyed(model, "sort_by", value(args, 0)?, expression(args, 1)?)?;
    keyed.sort_by(|(a, _), (b, _)| model.compare(a, b).unwrap_or(Ordering::Equal));
    Ok(model.array(keyed.into_iter().map(|(_, element)| element.clone()).collect()))
}

fn extreme_by<M: ValueModel>(
    model: &M,
    function: &str,
    args: &[Argument<'_, M>],
    wins: Ordering,
) -> Result<M::Value, EvalError> {
    let keyed = keyed(model, function, value(args, 0)?, expression(args, 1)?)?;
    let mut best: Option<&(M::Value, &M::Value)> = None;
    for candidate in &keyed {
        best = match best {
            Some(current) if model.compare(&candidate.0, &current.0) != Some(wins) => Some(current),
            _ => Some(candidate),
        };
    }
    Ok(best
        .map(|(_, element)| (*element).clone())
        .unwrap_or_else(|| model.null()))
}

fn min_by<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    extreme_by(model, "min_by", args, Ordering::Less)
}

fn max_by<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    extreme_by(model, "max_by", args, Ordering::Greater)
}
