pub mod value;
pub mod context;
pub mod expression;

pub use context::{EmptyContext, FunctionContext, VariableMap};
pub use expression::{
    AccessExpression, BinaryExpression, CallExpression, ConstantExpression, Expression,
    UnaryExpression, VariableExpression,
};
pub use value::{FunctionReturn, Object, Value};
