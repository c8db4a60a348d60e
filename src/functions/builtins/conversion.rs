use super::value;
use crate::{
    evaluator::EvalError,
    functions::{Argument, ArgumentType, Function, FunctionModule},
    value::{ValueKind, ValueModel},
};

pub(super) fn module<M: ValueModel>() -> FunctionModule<M> {
    FunctionModule::new("conversion")
        .with(Function::builder("to_array").arg([ArgumentType::Any]).build(to_array::<M>))
        .with(Function::builder("to_number").arg([ArgumentType::Any]).build(to_number::<M>))
        .with(Function::builder("to_string").arg([ArgumentType::Any]).build(to_string::<M>))
        .with(Function::builder("type").arg([ArgumentType::Any]).build(type_of::<M>))
        .with(
            Function::builder("not_null")
                .arg([ArgumentType::Any])
                .variadic([ArgumentType::Any])
                .build(not_null::<M>),
        )
}

fn to_array<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    if model.kind(subject) == ValueKind::Array {
        return Ok(subject.clone());
    }
    Ok(model.array(vec![subject.clone()]))
}

/// Strings are parsed as JSON numbers; anything unparseable becomes `null`.
fn to_number<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    match model.kind(subject) {
        ValueKind::Number => Ok(subject.clone()),
        ValueKind::String => {
            let parsed = model
                .as_str(subject)
                .and_then(|text| model.parse_literal(text).ok())
                .filter(|parsed| model.kind(parsed) == ValueKind::Number);
            Ok(parsed.unwrap_or_else(|| model.null()))
        }
        _ => Ok(model.null()),
    }
}

fn to_string<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    if model.kind(subject) == ValueKind::String {
        return Ok(subject.clone());
    }
    Ok(model.string(model.serialize(subject)))
}

fn type_of<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    Ok(model.string(model.kind(subject).name().to_string()))
}

fn not_null<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let first = args
        .iter()
        .filter_map(Argument::as_value)
        .find(|candidate| !model.is_null(candidate));
    Ok(first.cloned().unwrap_or_else(|| model.null()))
}
