pub mod syntax;
pub mod types;
pub mod runtime;
pub mod functions;
pub mod analysis;
pub mod error;
pub mod uniforms;

pub use error::{Error, ErrorCode, LexError, ParseError, ResolutionError};
pub use types::{ObjectType, Primitive, Type};
pub use syntax::{parse, element::Element, options::ParserOptions};
pub use runtime::{EmptyContext, Expression, FunctionContext, FunctionReturn, Value, VariableExpression, VariableMap};
pub use functions::{FunctionTable, TypedFunction};
pub use analysis::{resolve, Layered, VariableTypes};
pub use uniforms::{CustomUniforms, DefinitionKind, ExternalVariables, UpdateFrequency};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Parse `text` and resolve it against `functions` and `variables`, converting
/// the result to `expected`.
pub fn compile(
    expected: Type,
    text: &str,
    functions: &FunctionTable,
    variables: &dyn VariableTypes,
    options: &ParserOptions,
) -> Result<Expression, Error> {
    let element = parse(text, options)?;
    Ok(resolve(expected, &element, functions, variables)?)
}
