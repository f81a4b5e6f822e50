pub mod variables;
pub mod access;
pub mod overload;
pub mod resolver;


use crate::error::ResolutionError;
use crate::functions::FunctionTable;
use crate::runtime::expression::Expression;
use crate::syntax::element::Element;
use crate::types::Type;
use resolver::Resolver;
pub use variables::{Layered, VariableTypes};

// ─── Entry point ─────────────────────────────────────────────────────────────

/// Resolve `element` against the function table and the declared variable
/// types, then convert the result to `expected`.
///
/// Fails on the first unknown name, unmatched or ambiguous overload, bad
/// literal, bad member access, or a final type that cannot convert.
pub fn resolve(
    expected: Type,
    element: &Element,
    functions: &FunctionTable,
    variables: &dyn VariableTypes,
) -> Result<Expression, ResolutionError> {
    let resolver = Resolver::new(functions, variables);
    let expression = resolver.resolve(element)?;
    resolver.convert(expression, expected, element.position())
}
