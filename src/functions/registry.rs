use std::{collections::HashMap, fmt};

use log::debug;

use crate::{
    evaluator::EvalError,
    functions::{Function, builtins},
    value::ValueModel,
};

/// A named group of functions registered together.
pub struct FunctionModule<M: ValueModel> {
    name: String,
    functions: Vec<Function<M>>,
}

impl<M: ValueModel> FunctionModule<M> {
    pub fn new(name: impl Into<String>) -> Self {
        FunctionModule {
            name: name.into(),
            functions: Vec::new(),
        }
    }

    pub fn with(mut self, function: Function<M>) -> Self {
        self.functions.push(function);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn functions(&self) -> &[Function<M>] {
        &self.functions
    }
}

/// Lookup table from function name to [`Function`].
pub struct FunctionRegistry<M: ValueModel> {
    functions: HashMap<String, Function<M>>,
}

impl<M: ValueModel> FunctionRegistry<M> {
    /// An empty registry. Expressions calling any function will fail with
    /// an unknown-function error.
    pub fn new() -> Self {
        FunctionRegistry {
            functions: HashMap::new(),
        }
    }

    /// A registry holding the standard JMESPath functions.
    pub fn builtins() -> Self {
        let mut registry = Self::new();
        for module in builtins::modules() {
            registry.register_module(module);
        }
        registry
    }

    /// Adds `function`, returning any function it replaced.
    pub fn register(&mut self, function: Function<M>) -> Option<Function<M>> {
        let replaced = self.functions.insert(function.name().to_string(), function);
        if let Some(previous) = &replaced {
            debug!("function {}() overridden", previous.name());
        }
        replaced
    }

    /// Builder-style [`register`](Self::register).
    pub fn with(mut self, function: Function<M>) -> Self {
        self.register(function);
        self
    }

    /// Makes `existing` callable as `alias` too.
    pub fn alias(&mut self, existing: &str, alias: impl Into<String>) -> Result<(), EvalError> {
        let function = self
            .functions
            .get(existing)
            .ok_or_else(|| EvalError::UnknownFunction(existing.to_string()))?
            .renamed(alias);
        self.register(function);
        Ok(())
    }

    pub fn register_module(&mut self, module: FunctionModule<M>) {
        debug!(
            "registering module {} ({} functions)",
            module.name,
            module.functions.len()
        );
        for function in module.functions {
            self.register(function);
        }
    }

    pub fn get(&self, name: &str) -> Option<&Function<M>> {
        self.functions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.functions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

impl<M: ValueModel> Default for FunctionRegistry<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: ValueModel> Clone for FunctionRegistry<M> {
    fn clone(&self) -> Self {
        FunctionRegistry {
            functions: self.functions.clone(),
        }
    }
}

impl<M: ValueModel> fmt::Debug for FunctionRegistry<M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.names())
            .finish()
    }
}
