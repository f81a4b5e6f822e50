//! Element tree → typed Expression tree.
//!
//! Children are resolved first, then the node's overload is chosen from their
//! static types and every argument is wrapped in the implicit conversion its
//! parameter needs.

use std::sync::Arc;

use crate::error::ResolutionError;
use crate::functions::{FunctionTable, TypedFunction};
use crate::runtime::expression::{
    BinaryExpression, CallExpression, ConstantExpression, Expression, UnaryExpression, VariableExpression,
};
use crate::runtime::value::FunctionReturn;
use crate::syntax::element::Element;
use crate::types::Type;
use super::access::resolve_access;
use super::overload::select;
use super::variables::VariableTypes;

pub struct Resolver<'a> {
    functions: &'a FunctionTable,
    variables: &'a dyn VariableTypes,
}

impl<'a> Resolver<'a> {
    pub fn new(functions: &'a FunctionTable, variables: &'a dyn VariableTypes) -> Self {
        Self { functions, variables }
    }

    pub fn resolve(&self, element: &Element) -> Result<Expression, ResolutionError> {
        match element {
            Element::Id { name, position } => self.identifier(name, *position),
            Element::Number { text, position } => number(text, *position),

            Element::FunctionCall { id, args, position } => {
                let args = args.iter().map(|a| self.resolve(a)).collect::<Result<Vec<_>, _>>()?;
                let types: Vec<Type> = args.iter().map(Expression::ty).collect();
                let function = select(self.functions, id, &types, *position)?;
                let args = self.convert_args(args, &function, *position)?;
                Ok(Expression::Call(Box::new(CallExpression { function, args })))
            }

            Element::Binary { op, left, right, position } => {
                let left = self.resolve(left)?;
                let right = self.resolve(right)?;
                let function = select(self.functions, op.symbol(), &[left.ty(), right.ty()], *position)?;
                let left = self.convert(left, function.params[0], *position)?;
                let right = self.convert(right, function.params[1], *position)?;
                Ok(Expression::Binary(Box::new(BinaryExpression { op: *op, function, args: [left, right] })))
            }

            Element::Unary { op, inner, position } => {
                let inner = self.resolve(inner)?;
                let function = select(self.functions, op.symbol(), &[inner.ty()], *position)?;
                let inner = self.convert(inner, function.params[0], *position)?;
                Ok(Expression::Unary(Box::new(UnaryExpression { op: *op, function, args: [inner] })))
            }

            Element::Access { base, index, position } => {
                let base = self.resolve(base)?;
                resolve_access(base, index, *position)
            }
        }
    }

    /// Constants shadow variables of the same name.
    fn identifier(&self, name: &str, position: usize) -> Result<Expression, ResolutionError> {
        if let Some(constant) = self.functions.constant(name) {
            return Ok(Expression::Constant(constant.clone()));
        }
        match self.variables.variable_type(name) {
            Some(ty) => Ok(Expression::Variable(VariableExpression::new(name, ty))),
            None => Err(ResolutionError::UnknownIdentifier { name: name.to_string(), position }),
        }
    }

    fn convert_args(
        &self,
        args: Vec<Expression>,
        function: &TypedFunction,
        position: usize,
    ) -> Result<Vec<Expression>, ResolutionError> {
        args.into_iter()
            .zip(&function.params)
            .map(|(arg, param)| self.convert(arg, *param, position))
            .collect()
    }

    /// Wrap `expression` in the implicit conversion to `to`, if it needs one.
    pub fn convert(&self, expression: Expression, to: Type, position: usize) -> Result<Expression, ResolutionError> {
        let from = expression.ty();
        if from == to {
            return Ok(expression);
        }
        let conversion = from
            .implicitly_converts_to(to)
            .then(|| self.functions.conversion(from, to))
            .flatten();
        match conversion {
            Some(function) => Ok(Expression::Call(Box::new(CallExpression {
                function: Arc::clone(function),
                args: vec![expression],
            }))),
            None => Err(ResolutionError::TypeMismatch { expected: to, found: from, position }),
        }
    }
}

/// `.` or an `f` suffix makes a float literal; anything else is an int.
fn number(text: &str, position: usize) -> Result<Expression, ResolutionError> {
    let invalid = || ResolutionError::InvalidLiteral { text: text.to_string(), position };

    let constant = if text.contains('.') || text.ends_with(['f', 'F']) {
        let value: f32 = text.trim_end_matches(['f', 'F']).parse().map_err(|_| invalid())?;
        ConstantExpression::new(Type::FLOAT, FunctionReturn { float: value, ..Default::default() })
    } else {
        let value: i32 = text.parse().map_err(|_| invalid())?;
        ConstantExpression::new(Type::INT, FunctionReturn { int: value, ..Default::default() })
    };
    Ok(Expression::Constant(constant))
}
