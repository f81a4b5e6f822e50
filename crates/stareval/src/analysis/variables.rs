use std::collections::HashMap;

use crate::runtime::context::{EmptyContext, FunctionContext, VariableMap};
use crate::runtime::expression::Expression;
use crate::types::Type;

/// Declared type of every free variable the resolver may bind.
pub trait VariableTypes {
    fn variable_type(&self, name: &str) -> Option<Type>;
}

impl VariableTypes for HashMap<String, Type> {
    fn variable_type(&self, name: &str) -> Option<Type> {
        self.get(name).copied()
    }
}

/// Variables are typed by the expression currently bound to them.
impl VariableTypes for VariableMap {
    fn variable_type(&self, name: &str) -> Option<Type> {
        self.get_variable(name).map(Expression::ty)
    }
}

impl VariableTypes for EmptyContext {
    fn variable_type(&self, _name: &str) -> Option<Type> {
        None
    }
}

/// Two lookups consulted in order, e.g. local definitions over host variables.
pub struct Layered<'a> {
    pub inner: &'a dyn VariableTypes,
    pub outer: &'a dyn VariableTypes,
}

impl VariableTypes for Layered<'_> {
    fn variable_type(&self, name: &str) -> Option<Type> {
        self.inner.variable_type(name).or_else(|| self.outer.variable_type(name))
    }
}
