use std::{cmp::Ordering, collections::HashMap};

use super::value;
use crate::{
    evaluator::EvalError,
    functions::{Argument, ArgumentType, Function, FunctionModule},
    value::{ValueKind, ValueModel},
};

pub(super) fn module<M: ValueModel>() -> FunctionModule<M> {
    let comparable = [ArgumentType::ArrayOfNumbers, ArgumentType::ArrayOfStrings];

    FunctionModule::new("collections")
        .with(
            Function::builder("length")
                .arg([ArgumentType::String, ArgumentType::Array, ArgumentType::Object])
                .build(length::<M>),
        )
        .with(Function::builder("max").arg(comparable).build(max::<M>))
        .with(Function::builder("min").arg(comparable).build(min::<M>))
        .with(
            Function::builder("reverse")
                .arg([ArgumentType::String, ArgumentType::Array])
                .build(reverse::<M>),
        )
        .with(Function::builder("sort").arg(comparable).build(sort::<M>))
        .with(Function::builder("keys").arg([ArgumentType::Object]).build(keys::<M>))
        .with(Function::builder("values").arg([ArgumentType::Object]).build(values::<M>))
        .with(
            Function::builder("merge")
                .arg([ArgumentType::Object])
                .variadic([ArgumentType::Object])
                .build(merge::<M>),
        )
}

/// Characters for strings, elements for arrays, entries for objects.
fn length<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    let len = match model.as_str(subject) {
        Some(text) => text.chars().count(),
        None => model.length(subject),
    };
    Ok(model.number(len as f64))
}

/// Picks the element that wins every comparison against `wins`.
fn extreme<M: ValueModel>(model: &M, array: &M::Value, wins: Ordering) -> M::Value {
    let mut best: Option<&M::Value> = None;
    for element in model.elements(array) {
        best = match best {
            Some(current) if model.compare(element, current) != Some(wins) => Some(current),
            _ => Some(element),
        };
    }
    best.cloned().unwrap_or_else(|| model.null())
}

fn max<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    Ok(extreme(model, value(args, 0)?, Ordering::Greater))
}

fn min<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    Ok(extreme(model, value(args, 0)?, Ordering::Less))
}

fn reverse<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let subject = value(args, 0)?;
    if let Some(text) = model.as_str(subject) {
        return Ok(model.string(text.chars().rev().collect()));
    }
    let mut elements: Vec<M::Value> = model.elements(subject).cloned().collect();
    elements.reverse();
    Ok(model.array(elements))
}

fn sort<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let mut elements: Vec<M::Value> = model.elements(value(args, 0)?).cloned().collect();
    elements.sort_by(|a, b| model.compare(a, b).unwrap_or(Ordering::Equal));
    Ok(model.array(elements))
}

fn keys<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let keys = model
        .keys(value(args, 0)?)
        .map(|key| model.string(key.to_string()))
        .collect();
    Ok(model.array(keys))
}

fn values<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let values = model.values(value(args, 0)?).cloned().collect();
    Ok(model.array(values))
}

/// Later objects override earlier ones. A key keeps the position where it
/// first appeared.
fn merge<M: ValueModel>(
    model: &M,
    args: &[Argument<'_, M>],
    _: &M::Value,
) -> Result<M::Value, EvalError> {
    let mut entries: Vec<(String, M::Value)> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for index in 0..args.len() {
        let object = value(args, index)?;
        if model.kind(object) != ValueKind::Object {
            continue;
        }
        for key in model.keys(object) {
            let Some(entry) = model.property(object, key) else {
                continue;
            };
            match positions.get(key) {
                Some(&position) => entries[position].1 = entry.clone(),
                None => {
                    positions.insert(key.to_string(), entries.len());
                    entries.push((key.to_string(), entry.clone()));
                }
            }
        }
    }
    Ok(model.object(entries))
}
