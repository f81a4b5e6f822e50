//! Typed expression tree produced by the resolver.
//!
//! Trees are immutable once built. Evaluation writes into a caller-owned
//! `FunctionReturn` and never allocates; partial evaluation consumes the tree
//! and returns a (possibly) smaller one.

use std::collections::HashSet;
use std::sync::Arc;

use crate::functions::TypedFunction;
use crate::runtime::context::FunctionContext;
use crate::runtime::value::{FunctionReturn, Object, Value};
use crate::syntax::token::{BinaryOp, UnaryOp};
use crate::types::Type;

// ─── Nodes ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantExpression {
    pub ty: Type,
    pub value: FunctionReturn,
}

impl ConstantExpression {
    pub fn new(ty: Type, value: FunctionReturn) -> Self {
        Self { ty, value }
    }

    /// The zero value of `ty`.
    pub fn zero(ty: Type) -> Self {
        Self { ty, value: ty.default_value() }
    }

    /// Build a constant from an owned value; `None` if the value does not fit `ty`.
    pub fn from_value(ty: Type, value: &Value) -> Option<Self> {
        let mut slot = ty.default_value();
        ty.store(value, &mut slot).then_some(Self { ty, value: slot })
    }

    pub fn to_value(&self) -> Value {
        self.ty.load(&self.value)
    }
}

/// A free variable, bound at evaluation time through the `FunctionContext`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableExpression {
    pub name: String,
    pub ty: Type,
}

impl VariableExpression {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self { name: name.into(), ty }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpression {
    pub op: BinaryOp,
    pub function: Arc<TypedFunction>,
    /// `[left, right]`, stored contiguously so they can be handed to the
    /// implementation as one slice.
    pub args: [Expression; 2],
}

impl BinaryExpression {
    pub fn left(&self) -> &Expression { &self.args[0] }
    pub fn right(&self) -> &Expression { &self.args[1] }
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpression {
    pub op: UnaryOp,
    pub function: Arc<TypedFunction>,
    pub args: [Expression; 1],
}

impl UnaryExpression {
    pub fn inner(&self) -> &Expression { &self.args[0] }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpression {
    pub function: Arc<TypedFunction>,
    pub args: Vec<Expression>,
}

/// Component of a vector, or column of a matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct AccessExpression {
    pub base: Expression,
    pub index: usize,
    pub ty: Type,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(ConstantExpression),
    Variable(VariableExpression),
    Binary(Box<BinaryExpression>),
    Unary(Box<UnaryExpression>),
    Call(Box<CallExpression>),
    ElementAccess(Box<AccessExpression>),
}

// ─── Evaluation ───────────────────────────────────────────────────────────────

impl Expression {
    /// Static type fixed at resolution.
    pub fn ty(&self) -> Type {
        match self {
            Expression::Constant(c)      => c.ty,
            Expression::Variable(v)      => v.ty,
            Expression::Binary(b)        => b.function.ret,
            Expression::Unary(u)         => u.function.ret,
            Expression::Call(c)          => c.function.ret,
            Expression::ElementAccess(a) => a.ty,
        }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    /// Evaluate into `out`. Only the field selected by `self.ty()` is meaningful
    /// afterwards.
    ///
    /// A variable the context does not know evaluates to its type's zero value.
    pub fn evaluate_to(&self, ctx: &dyn FunctionContext, out: &mut FunctionReturn) {
        match self {
            Expression::Constant(c) => *out = c.value,
            Expression::Variable(v) => match ctx.get_variable(&v.name) {
                Some(bound) => bound.evaluate_to(ctx, out),
                None => *out = v.ty.default_value(),
            },
            Expression::Binary(b) => (b.function.implementation)(&b.args, ctx, out),
            Expression::Unary(u)  => (u.function.implementation)(&u.args, ctx, out),
            Expression::Call(c)   => (c.function.implementation)(&c.args, ctx, out),
            Expression::ElementAccess(a) => {
                a.base.evaluate_to(ctx, out);
                extract(a.base.ty(), a.index, out);
            }
        }
    }

    /// Evaluate into a fresh slot and read the result out as an owned value.
    pub fn evaluate(&self, ctx: &dyn FunctionContext) -> Value {
        let mut out = FunctionReturn::default();
        self.evaluate_to(ctx, &mut out);
        self.ty().load(&out)
    }

    /// Replace every variable known to `ctx` by its current value and fold
    /// every pure subtree whose inputs are all constant. `out` is scratch.
    ///
    /// Applying this twice with the same context gives the same tree.
    pub fn partial_eval(self, ctx: &dyn FunctionContext, out: &mut FunctionReturn) -> Expression {
        match self {
            Expression::Constant(_) => self,

            Expression::Variable(v) => match ctx.get_variable(&v.name) {
                Some(bound) => {
                    bound.evaluate_to(ctx, out);
                    Expression::Constant(ConstantExpression::new(v.ty, *out))
                }
                None => Expression::Variable(v),
            },

            Expression::Binary(mut b) => {
                b.args.iter_mut().for_each(|arg| partial_eval_in_place(arg, ctx, out));
                let foldable = b.function.pure && b.args.iter().all(Expression::is_constant);
                Expression::Binary(b).fold_if(foldable, ctx, out)
            }

            Expression::Unary(mut u) => {
                partial_eval_in_place(&mut u.args[0], ctx, out);
                let foldable = u.function.pure && u.args[0].is_constant();
                Expression::Unary(u).fold_if(foldable, ctx, out)
            }

            Expression::Call(mut c) => {
                c.args = std::mem::take(&mut c.args)
                    .into_iter()
                    .map(|arg| arg.partial_eval(ctx, out))
                    .collect();
                let foldable = c.function.pure && c.args.iter().all(Expression::is_constant);
                Expression::Call(c).fold_if(foldable, ctx, out)
            }

            Expression::ElementAccess(mut a) => {
                partial_eval_in_place(&mut a.base, ctx, out);
                let foldable = a.base.is_constant();
                Expression::ElementAccess(a).fold_if(foldable, ctx, out)
            }
        }
    }

    fn fold_if(self, foldable: bool, ctx: &dyn FunctionContext, out: &mut FunctionReturn) -> Expression {
        if !foldable {
            return self;
        }
        self.evaluate_to(ctx, out);
        Expression::Constant(ConstantExpression::new(self.ty(), *out))
    }

    /// Collect every free variable referenced by this tree.
    pub fn list_variables<'a>(&'a self, out: &mut HashSet<&'a VariableExpression>) {
        match self {
            Expression::Constant(_) => {}
            Expression::Variable(v) => { out.insert(v); }
            Expression::Binary(b) => b.args.iter().for_each(|a| a.list_variables(out)),
            Expression::Unary(u)  => u.args[0].list_variables(out),
            Expression::Call(c)   => c.args.iter().for_each(|a| a.list_variables(out)),
            Expression::ElementAccess(a) => a.base.list_variables(out),
        }
    }
}

fn partial_eval_in_place(slot: &mut Expression, ctx: &dyn FunctionContext, out: &mut FunctionReturn) {
    let placeholder = Expression::Constant(ConstantExpression::zero(Type::BOOLEAN));
    let taken = std::mem::replace(slot, placeholder);
    *slot = taken.partial_eval(ctx, out);
}

/// Narrow `slot`, which holds a value of type `base`, to component (vectors)
/// or column (matrices) `index`.
fn extract(base: Type, index: usize, slot: &mut FunctionReturn) {
    match base {
        Type::Vector(element, _) => {
            let vector = *slot;
            element.read_component(&vector, index, slot);
        }
        Type::Object(matrix) => {
            let n = matrix.dimension();
            let mut column = [0.0; 4];
            let elements = slot.object.floats();
            if elements.len() == n * n {
                crate::types::mat::column_into(elements, n, index, &mut column[..n]);
            }
            slot.object = Object::FloatVec(column);
        }
        Type::Primitive(_) => {}
    }
}

// ─── Display ──────────────────────────────────────────────────────────────────

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Constant(c) => write!(f, "{}", c.to_value()),
            Expression::Variable(v) => f.write_str(&v.name),
            Expression::Binary(b) => write!(f, "({} {} {})", b.left(), b.op.symbol(), b.right()),
            Expression::Unary(u) => write!(f, "{}{}", u.op.symbol(), u.inner()),
            Expression::Call(c) => {
                write!(f, "{}(", c.function.name)?;
                for (i, arg) in c.args.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Expression::ElementAccess(a) => write!(f, "{}[{}]", a.base, a.index),
        }
    }
}
