use std::collections::HashMap;

use crate::runtime::expression::{ConstantExpression, Expression};
use crate::runtime::value::{FunctionReturn, Value};
use crate::types::Type;

/// Binds free variables to expressions at evaluation time.
pub trait FunctionContext {
    fn get_variable(&self, name: &str) -> Option<&Expression>;

    fn has_variable(&self, name: &str) -> bool {
        self.get_variable(name).is_some()
    }
}

/// A context with no variables.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyContext;

impl FunctionContext for EmptyContext {
    fn get_variable(&self, _name: &str) -> Option<&Expression> {
        None
    }
}

// ─── VariableMap ──────────────────────────────────────────────────────────────

/// Hash-map backed context for host-provided values.
#[derive(Debug, Clone, Default)]
pub struct VariableMap {
    vars: HashMap<String, Expression>,
}

impl VariableMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind `name` to an arbitrary expression, replacing any earlier binding.
    pub fn set(&mut self, name: impl Into<String>, expression: Expression) {
        self.vars.insert(name.into(), expression);
    }

    pub fn set_constant(&mut self, name: impl Into<String>, ty: Type, value: FunctionReturn) {
        self.set(name, Expression::Constant(ConstantExpression::new(ty, value)));
    }

    pub fn set_float(&mut self, name: impl Into<String>, value: f32) {
        self.set_constant(name, Type::FLOAT, FunctionReturn { float: value, ..Default::default() });
    }

    pub fn set_int(&mut self, name: impl Into<String>, value: i32) {
        self.set_constant(name, Type::INT, FunctionReturn { int: value, ..Default::default() });
    }

    pub fn set_bool(&mut self, name: impl Into<String>, value: bool) {
        self.set_constant(name, Type::BOOLEAN, FunctionReturn { boolean: value, ..Default::default() });
    }

    /// Bind `name` to `value` read as `ty`. Returns `false` and leaves the map
    /// untouched when the value's shape does not fit the type.
    pub fn set_value(&mut self, name: impl Into<String>, ty: Type, value: &Value) -> bool {
        match ConstantExpression::from_value(ty, value) {
            Some(c) => {
                self.set(name, Expression::Constant(c));
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<Expression> {
        self.vars.remove(name)
    }

    pub fn len(&self) -> usize { self.vars.len() }

    pub fn is_empty(&self) -> bool { self.vars.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expression)> {
        self.vars.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FunctionContext for VariableMap {
    fn get_variable(&self, name: &str) -> Option<&Expression> {
        self.vars.get(name)
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
