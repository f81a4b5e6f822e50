//! Function table: every callable the resolver can bind a name or operator to.
//!
//! Operators are ordinary overloads registered under their symbol (`"+"`,
//! `"&&"`, …); `-` holds both the binary and the unary overloads, told apart
//! by arity. Implementations receive their arguments unevaluated, so lazy
//! functions (`&&`, `||`, `if`) decide for themselves what to evaluate.

pub mod operators;
pub mod math;
pub mod logic;
pub mod constructors;
pub mod lifted;

use std::collections::HashMap;
use std::sync::Arc;

use crate::runtime::context::FunctionContext;
use crate::runtime::expression::{ConstantExpression, Expression};
use crate::runtime::value::{FunctionReturn, Object};
use crate::types::Type;

// ─── TypedFunction ────────────────────────────────────────────────────────────

pub type Implementation =
    Arc<dyn Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync>;

/// One overload: a fixed signature and the code that evaluates it.
#[derive(Clone)]
pub struct TypedFunction {
    pub name: String,
    pub params: Vec<Type>,
    pub ret: Type,
    /// Pure functions may be folded by partial evaluation once every argument
    /// is constant.
    pub pure: bool,
    pub implementation: Implementation,
}

impl TypedFunction {
    pub fn new<F>(name: impl Into<String>, params: Vec<Type>, ret: Type, implementation: F) -> Self
    where
        F: Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static,
    {
        Self { name: name.into(), params, ret, pure: true, implementation: Arc::new(implementation) }
    }

    /// Mark this overload as reading state outside its arguments.
    pub fn impure(mut self) -> Self {
        self.pure = false;
        self
    }

    pub fn arity(&self) -> usize {
        self.params.len()
    }

    /// `name(float, float) -> float`
    pub fn signature(&self) -> String {
        let params: Vec<&str> = self.params.iter().map(Type::name).collect();
        format!("{}({}) -> {}", self.name, params.join(", "), self.ret)
    }
}

impl std::fmt::Debug for TypedFunction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypedFunction")
            .field("name", &self.name)
            .field("params", &self.params)
            .field("ret", &self.ret)
            .field("pure", &self.pure)
            .finish_non_exhaustive()
    }
}

/// Overloads compare by signature; implementations are opaque.
impl PartialEq for TypedFunction {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.params == other.params && self.ret == other.ret && self.pure == other.pure
    }
}

// ─── Table ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default)]
pub struct FunctionTable {
    functions: HashMap<String, Vec<Arc<TypedFunction>>>,
    constants: HashMap<String, ConstantExpression>,
    conversions: HashMap<(Type, Type), Arc<TypedFunction>>,
}

impl FunctionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Operators, math, selection, constructors, conversions and the
    /// `true` / `false` / `pi` constants.
    pub fn standard() -> Self {
        let mut t = Self::new();
        operators::register(&mut t);
        math::register(&mut t);
        logic::register(&mut t);
        constructors::register(&mut t);

        t.define_constant("true", ConstantExpression::new(Type::BOOLEAN, FunctionReturn { boolean: true, ..Default::default() }));
        t.define_constant("false", ConstantExpression::new(Type::BOOLEAN, FunctionReturn { boolean: false, ..Default::default() }));
        t.define_constant("pi", ConstantExpression::new(Type::FLOAT, FunctionReturn { float: std::f32::consts::PI, ..Default::default() }));
        t
    }

    /// Add an overload. Overloads with an identical parameter list are kept
    /// side by side and reported as ambiguous when selected.
    pub fn register(&mut self, function: TypedFunction) -> Arc<TypedFunction> {
        let function = Arc::new(function);
        self.functions.entry(function.name.clone()).or_default().push(Arc::clone(&function));
        function
    }

    /// Add a one-argument overload that also serves as the implicit
    /// conversion from its parameter type to its return type.
    pub fn register_conversion(&mut self, function: TypedFunction) -> Arc<TypedFunction> {
        let function = self.register(function);
        if let [from] = function.params.as_slice() {
            self.conversions.insert((*from, function.ret), Arc::clone(&function));
        }
        function
    }

    pub fn define_constant(&mut self, name: impl Into<String>, constant: ConstantExpression) {
        self.constants.insert(name.into(), constant);
    }

    pub fn overloads(&self, name: &str) -> &[Arc<TypedFunction>] {
        self.functions.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.contains_key(name)
    }

    pub fn constant(&self, name: &str) -> Option<&ConstantExpression> {
        self.constants.get(name)
    }

    pub fn conversion(&self, from: Type, to: Type) -> Option<&Arc<TypedFunction>> {
        self.conversions.get(&(from, to))
    }

    /// Names of every registered function and operator.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.functions.keys().map(String::as_str)
    }
}

// ─── Implementation helpers ───────────────────────────────────────────────────
//
// Each helper evaluates the leading arguments into locals and the last one
// straight into `out`, then overwrites the result field.

pub(crate) fn float1(f: fn(f32) -> f32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        args[0].evaluate_to(ctx, out);
        out.float = f(out.float);
    }
}

pub(crate) fn float2(f: fn(f32, f32) -> f32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut a = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, out);
        out.float = f(a.float, out.float);
    }
}

pub(crate) fn float3(f: fn(f32, f32, f32) -> f32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut a = FunctionReturn::default();
        let mut b = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, &mut b);
        args[2].evaluate_to(ctx, out);
        out.float = f(a.float, b.float, out.float);
    }
}

pub(crate) fn int1(f: fn(i32) -> i32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        args[0].evaluate_to(ctx, out);
        out.int = f(out.int);
    }
}

pub(crate) fn int2(f: fn(i32, i32) -> i32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut a = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, out);
        out.int = f(a.int, out.int);
    }
}

pub(crate) fn int3(f: fn(i32, i32, i32) -> i32) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut a = FunctionReturn::default();
        let mut b = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, &mut b);
        args[2].evaluate_to(ctx, out);
        out.int = f(a.int, b.int, out.int);
    }
}

/// Binary predicate over a scalar field selected by `read`.
pub(crate) fn compare<T: Copy + 'static>(
    read: fn(&FunctionReturn) -> T,
    f: fn(T, T) -> bool,
) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut a = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, out);
        out.boolean = f(read(&a), read(out));
    }
}

pub(crate) fn read_float(slot: &FunctionReturn) -> f32 { slot.float }
pub(crate) fn read_int(slot: &FunctionReturn) -> i32 { slot.int }
pub(crate) fn read_bool(slot: &FunctionReturn) -> bool { slot.boolean }

/// Float payload of a vector or matrix, zero-padded to sixteen elements.
pub(crate) fn load_floats(object: &Object) -> [f32; 16] {
    let mut out = [0.0; 16];
    let floats = object.floats();
    out[..floats.len()].copy_from_slice(floats);
    out
}

/// Matrix payload of dimension `n` built from the first `n * n` elements.
pub(crate) fn matrix_object(n: usize, elements: &[f32]) -> Object {
    match n {
        2 => { let mut m = [0.0; 4]; m.copy_from_slice(&elements[..4]); Object::Mat2(m) }
        3 => { let mut m = [0.0; 9]; m.copy_from_slice(&elements[..9]); Object::Mat3(m) }
        _ => { let mut m = [0.0; 16]; m.copy_from_slice(&elements[..16]); Object::Mat4(m) }
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
