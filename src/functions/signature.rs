use std::fmt;

use crate::{
    evaluator::EvalError,
    functions::Argument,
    value::{ValueKind, ValueModel},
};

/// Type accepted by a function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArgumentType {
    Any,
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
    ArrayOfNumbers,
    ArrayOfStrings,
    /// An `&expr` reference rather than a value
    Expression,
}

impl ArgumentType {
    pub fn accepts<M: ValueModel>(self, model: &M, argument: &Argument<'_, M>) -> bool {
        match argument {
            Argument::Expression(_) => self == ArgumentType::Expression,
            Argument::Value(value) => self.accepts_value(model, value),
        }
    }

    pub fn accepts_value<M: ValueModel>(self, model: &M, value: &M::Value) -> bool {
        let kind = model.kind(value);
        match self {
            ArgumentType::Any => true,
            ArgumentType::Null => kind == ValueKind::Null,
            ArgumentType::Boolean => kind == ValueKind::Boolean,
            ArgumentType::Number => kind == ValueKind::Number,
            ArgumentType::String => kind == ValueKind::String,
            ArgumentType::Array => kind == ValueKind::Array,
            ArgumentType::Object => kind == ValueKind::Object,
            ArgumentType::ArrayOfNumbers => {
                kind == ValueKind::Array
                    && model
                        .elements(value)
                        .all(|element| model.kind(element) == ValueKind::Number)
            }
            ArgumentType::ArrayOfStrings => {
                kind == ValueKind::Array
                    && model
                        .elements(value)
                        .all(|element| model.kind(element) == ValueKind::String)
            }
            ArgumentType::Expression => false,
        }
    }
}

impl fmt::Display for ArgumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ArgumentType::Any => "any",
            ArgumentType::Null => "null",
            ArgumentType::Boolean => "boolean",
            ArgumentType::Number => "number",
            ArgumentType::String => "string",
            ArgumentType::Array => "array",
            ArgumentType::Object => "object",
            ArgumentType::ArrayOfNumbers => "array[number]",
            ArgumentType::ArrayOfStrings => "array[string]",
            ArgumentType::Expression => "expression",
        };
        f.write_str(name)
    }
}

/// One declared parameter: the types it accepts and whether it may be omitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    pub types: Vec<ArgumentType>,
    pub optional: bool,
}

impl Parameter {
    fn accepts<M: ValueModel>(&self, model: &M, argument: &Argument<'_, M>) -> bool {
        self.types.iter().any(|ty| ty.accepts(model, argument))
    }

    fn describe(&self) -> String {
        self.types
            .iter()
            .map(ArgumentType::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

/// Parameter list of a function.
///
/// Required parameters come first, then optional ones, then at most one
/// variadic parameter that absorbs every remaining argument.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    parameters: Vec<Parameter>,
    variadic: Option<Parameter>,
}

impl Signature {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn arg(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.parameters.push(Parameter {
            types: types.into_iter().collect(),
            optional: false,
        });
        self
    }

    pub fn optional_arg(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.parameters.push(Parameter {
            types: types.into_iter().collect(),
            optional: true,
        });
        self
    }

    pub fn variadic(mut self, types: impl IntoIterator<Item = ArgumentType>) -> Self {
        self.variadic = Some(Parameter {
            types: types.into_iter().collect(),
            optional: true,
        });
        self
    }

    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    pub fn variadic_parameter(&self) -> Option<&Parameter> {
        self.variadic.as_ref()
    }

    pub fn min_arity(&self) -> usize {
        self.parameters.iter().take_while(|p| !p.optional).count()
    }

    /// `None` when the signature is variadic.
    pub fn max_arity(&self) -> Option<usize> {
        match self.variadic {
            Some(_) => None,
            None => Some(self.parameters.len()),
        }
    }

    /// Checks the argument count, then each argument's type, left to right.
    pub fn validate<M: ValueModel>(
        &self,
        function: &str,
        model: &M,
        args: &[Argument<'_, M>],
    ) -> Result<(), EvalError> {
        let min = self.min_arity();
        let max = self.max_arity();
        if args.len() < min || max.is_some_and(|max| args.len() > max) {
            let expected = match max {
                None => format!("at least {min}"),
                Some(max) if max == min => min.to_string(),
                Some(max) => format!("{min} to {max}"),
            };
            return Err(EvalError::Arity {
                function: function.to_string(),
                expected,
                actual: args.len(),
            });
        }

        for (position, argument) in args.iter().enumerate() {
            let Some(parameter) = self.parameters.get(position).or(self.variadic.as_ref()) else {
                break;
            };
            if !parameter.accepts(model, argument) {
                let actual = match argument {
                    Argument::Value(value) => model.kind(value).to_string(),
                    Argument::Expression(_) => "expression".to_string(),
                };
                return Err(EvalError::Type(format!(
                    "{function}() argument {} must be {}, got {actual}",
                    position + 1,
                    parameter.describe()
                )));
            }
        }

        Ok(())
    }
}

#[test]
fn test_arity_bounds() {
    use ArgumentType::*;

    let fixed = Signature::new().arg([Number]).optional_arg([String]);
    assert_eq!(fixed.min_arity(), 1);
    assert_eq!(fixed.max_arity(), Some(2));

    let variadic = Signature::new().arg([Object]).variadic([Object]);
    assert_eq!(variadic.min_arity(), 1);
    assert_eq!(variadic.max_arity(), None);
}
