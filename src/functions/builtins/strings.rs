use super::{string, value};
use crate::{
    evaluator::EvalError,
    functions::{Argument, ArgumentType, Function, FunctionModule},
    value::{ValueKind, ValueModel},
};

pub(super) fn module<M: ValueModel>() -> FunctionModule<M> {
    FunctionModule::new("strings")
        .with(
            Function::builder("contains")
                .arg([ArgumentType::Array, ArgumentType::String])
                .arg([ArgumentType::Any])
                .build(contains::<M>),
        )
        .with(
            Function::builder("ends_with")
                .arg([ArgumentType::String])
                .arg([ArgumentType::String])
                .build(ends_with::<M>),
        )
        .with(
            Function::builder("starts_with")
                .arg([ArgumentType::String])
                .arg([ArgumentType::String])
                .build(starts_with::<M>),
        )
        .with(
            Function::builder("join")
                .arg([ArgumentType::String])
                .arg([ArgumentType::ArrayOfStrings])
                .build(join::<M>),
        )
}

/// Substring test for strings, deep-equality membership for arrays.
fn contains<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    let search = value(args, 1)?;

    let found = match model.kind(subject) {
        ValueKind::String => match (model.as_str(subject), model.as_str(search)) {
            (Some(haystack), Some(needle)) => haystack.contains(needle),
            _ => false,
        },
        _ => model.elements(subject).any(|element| model.equals(element, search)),
    };
    Ok(model.boolean(found))
}

fn ends_with<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = string(model, args, 0)?;
    let suffix = string(model, args, 1)?;
    Ok(model.boolean(subject.ends_with(suffix)))
}

fn starts_with<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = string(model, args, 0)?;
    let prefix = string(model, args, 1)?;
    Ok(model.boolean(subject.starts_with(prefix)))
}

fn join<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let glue = string(model, args, 0)?;
    let parts: Vec<&str> = model
        .elements(value(args, 1)?)
        .filter_map(|element| model.as_str(element))
        .collect();
    Ok(model.string(parts.join(glue)))
}
