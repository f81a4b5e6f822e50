//! Arithmetic, logical, comparison and matrix operators.
//!
//! Integer arithmetic wraps; `/` truncates toward zero and a zero divisor
//! yields 0 for both `/` and `%`. Float arithmetic is plain IEEE-754.

use crate::runtime::context::FunctionContext;
use crate::runtime::expression::Expression;
use crate::runtime::value::{FunctionReturn, Object};
use crate::types::mat;
use crate::types::{ObjectType, Primitive, Type};
use super::{
    FunctionTable, TypedFunction, compare, float1, float2, int1, int2, load_floats, matrix_object,
    read_bool, read_float, read_int,
};

const F: Type = Type::FLOAT;
const I: Type = Type::INT;
const B: Type = Type::BOOLEAN;

pub(super) fn register(t: &mut FunctionTable) {
    register_arithmetic(t);
    register_logic(t);
    register_comparison(t);
    for n in 2..=4 {
        register_matrix(t, n);
    }
}

// ─── Arithmetic ───────────────────────────────────────────────────────────────

fn register_arithmetic(t: &mut FunctionTable) {
    t.register(TypedFunction::new("+", vec![I, I], I, int2(i32::wrapping_add)));
    t.register(TypedFunction::new("+", vec![F, F], F, float2(|a, b| a + b)));

    t.register(TypedFunction::new("-", vec![I, I], I, int2(i32::wrapping_sub)));
    t.register(TypedFunction::new("-", vec![F, F], F, float2(|a, b| a - b)));

    t.register(TypedFunction::new("*", vec![I, I], I, int2(i32::wrapping_mul)));
    t.register(TypedFunction::new("*", vec![F, F], F, float2(|a, b| a * b)));

    t.register(TypedFunction::new("/", vec![I, I], I, int2(int_div)));
    t.register(TypedFunction::new("/", vec![F, F], F, float2(|a, b| a / b)));

    t.register(TypedFunction::new("%", vec![I, I], I, int2(int_rem)));
    t.register(TypedFunction::new("%", vec![F, F], F, float2(|a, b| a % b)));

    // unary
    t.register(TypedFunction::new("-", vec![I], I, int1(i32::wrapping_neg)));
    t.register(TypedFunction::new("-", vec![F], F, float1(|a| -a)));
}

fn int_div(a: i32, b: i32) -> i32 {
    if b == 0 { 0 } else { a.wrapping_div(b) }
}

fn int_rem(a: i32, b: i32) -> i32 {
    if b == 0 { 0 } else { a.wrapping_rem(b) }
}

// ─── Logic ────────────────────────────────────────────────────────────────────

fn register_logic(t: &mut FunctionTable) {
    t.register(TypedFunction::new("!", vec![B], B, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        args[0].evaluate_to(ctx, out);
        out.boolean = !out.boolean;
    }));

    // Right operand only evaluated when it can change the result.
    t.register(TypedFunction::new("&&", vec![B, B], B, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        args[0].evaluate_to(ctx, out);
        if out.boolean {
            args[1].evaluate_to(ctx, out);
        }
    }));
    t.register(TypedFunction::new("||", vec![B, B], B, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        args[0].evaluate_to(ctx, out);
        if !out.boolean {
            args[1].evaluate_to(ctx, out);
        }
    }));
}

// ─── Comparison ───────────────────────────────────────────────────────────────

fn register_comparison(t: &mut FunctionTable) {
    t.register(TypedFunction::new("==", vec![I, I], B, compare(read_int, |a, b| a == b)));
    t.register(TypedFunction::new("==", vec![F, F], B, compare(read_float, |a, b| a == b)));
    t.register(TypedFunction::new("==", vec![B, B], B, compare(read_bool, |a, b| a == b)));

    t.register(TypedFunction::new("!=", vec![I, I], B, compare(read_int, |a, b| a != b)));
    t.register(TypedFunction::new("!=", vec![F, F], B, compare(read_float, |a, b| a != b)));
    t.register(TypedFunction::new("!=", vec![B, B], B, compare(read_bool, |a, b| a != b)));

    t.register(TypedFunction::new("<", vec![I, I], B, compare(read_int, |a, b| a < b)));
    t.register(TypedFunction::new("<", vec![F, F], B, compare(read_float, |a, b| a < b)));
    t.register(TypedFunction::new("<=", vec![I, I], B, compare(read_int, |a, b| a <= b)));
    t.register(TypedFunction::new("<=", vec![F, F], B, compare(read_float, |a, b| a <= b)));
    t.register(TypedFunction::new(">", vec![I, I], B, compare(read_int, |a, b| a > b)));
    t.register(TypedFunction::new(">", vec![F, F], B, compare(read_float, |a, b| a > b)));
    t.register(TypedFunction::new(">=", vec![I, I], B, compare(read_int, |a, b| a >= b)));
    t.register(TypedFunction::new(">=", vec![F, F], B, compare(read_float, |a, b| a >= b)));
}

// ─── Matrices ─────────────────────────────────────────────────────────────────

fn register_matrix(t: &mut FunctionTable, n: usize) {
    let Some(object) = ObjectType::matrix(n) else { return };
    let Some(vector) = Type::vector(Primitive::Float, n) else { return };
    let matrix = Type::Object(object);

    t.register(TypedFunction::new("*", vec![matrix, matrix], matrix, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut a = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, out);
        let (a, b) = (load_floats(&a.object), load_floats(&out.object));
        let mut product = [0.0; 16];
        mat::mul_into(&a, &b, n, &mut product);
        out.object = matrix_object(n, &product);
    }));

    t.register(TypedFunction::new("*", vec![matrix, vector], vector, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut m = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut m);
        args[1].evaluate_to(ctx, out);
        let (m, v) = (load_floats(&m.object), load_floats(&out.object));
        let mut product = [0.0; 4];
        mat::mul_vec_into(&m, &v, n, &mut product);
        out.object = Object::FloatVec(product);
    }));

    t.register(TypedFunction::new("*", vec![matrix, F], matrix, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut m = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut m);
        args[1].evaluate_to(ctx, out);
        scale(n, &m.object, out);
    }));

    t.register(TypedFunction::new("*", vec![F, matrix], matrix, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut s = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut s);
        args[1].evaluate_to(ctx, out);
        let m = out.object;
        out.float = s.float;
        scale(n, &m, out);
    }));
}

/// `out.object = m * out.float`
fn scale(n: usize, m: &Object, out: &mut FunctionReturn) {
    let elements = load_floats(m);
    let mut scaled = [0.0; 16];
    mat::scale_into(&elements[..n * n], out.float, &mut scaled);
    out.object = matrix_object(n, &scaled);
}

// ─── Tests ───────────────────────────────────────────────────────────────────
