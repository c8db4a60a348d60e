use super::{number, value};
use crate::{
    evaluator::EvalError,
    functions::{Argument, ArgumentType, Function, FunctionModule},
    value::ValueModel,
};

pub(super) fn module<M: ValueModel>() -> FunctionModule<M> {
    FunctionModule::new("math")
        .with(Function::builder("abs").arg([ArgumentType::Number]).build(abs::<M>))
        .with(Function::builder("avg").arg([ArgumentType::ArrayOfNumbers]).build(avg::<M>))
        .with(Function::builder("ceil").arg([ArgumentType::Number]).build(ceil::<M>))
        .with(Function::builder("floor").arg([ArgumentType::Number]).build(floor::<M>))
        .with(Function::builder("sum").arg([ArgumentType::ArrayOfNumbers]).build(sum::<M>))
}

fn abs<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    Ok(model.number(number(model, args, 0)?.abs()))
}

fn ceil<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    Ok(model.number(number(model, args, 0)?.ceil()))
}

fn floor<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    Ok(model.number(number(model, args, 0)?.floor()))
}

fn numbers<M: ValueModel>(model: &M, array: &M::Value) -> Vec<f64> {
    model
        .elements(array)
        .filter_map(|element| model.as_number(element))
        .collect()
}

/// `null` for an empty array.
fn avg<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let numbers = numbers(model, value(args, 0)?);
    if numbers.is_empty() {
        return Ok(model.null());
    }
    let total: f64 = numbers.iter().sum();
    Ok(model.number(total / numbers.len() as f64))
}

fn sum<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let total: f64 = numbers(model, value(args, 0)?).into_iter().sum();
    Ok(model.number(total))
}
