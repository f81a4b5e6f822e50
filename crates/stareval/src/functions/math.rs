//! Scalar math. Angles are radians; `torad` / `todeg` convert.
//! Vector arguments are handled by vectorization, not by extra overloads.

use crate::types::Type;
use super::{FunctionTable, TypedFunction, float1, float2, float3, int1, int2, int3};

const F: Type = Type::FLOAT;
const I: Type = Type::INT;

pub(super) fn register(t: &mut FunctionTable) {
    // ── trigonometry ─────────────────────────────────────────────────────────
    t.register(TypedFunction::new("sin",   vec![F], F, float1(f32::sin)));
    t.register(TypedFunction::new("cos",   vec![F], F, float1(f32::cos)));
    t.register(TypedFunction::new("tan",   vec![F], F, float1(f32::tan)));
    t.register(TypedFunction::new("asin",  vec![F], F, float1(f32::asin)));
    t.register(TypedFunction::new("acos",  vec![F], F, float1(f32::acos)));
    t.register(TypedFunction::new("atan",  vec![F], F, float1(f32::atan)));
    t.register(TypedFunction::new("atan2", vec![F, F], F, float2(f32::atan2)));
    t.register(TypedFunction::new("torad", vec![F], F, float1(f32::to_radians)));
    t.register(TypedFunction::new("todeg", vec![F], F, float1(f32::to_degrees)));

    // ── exponential ──────────────────────────────────────────────────────────
    t.register(TypedFunction::new("exp",  vec![F], F, float1(f32::exp)));
    t.register(TypedFunction::new("log",  vec![F], F, float1(f32::ln)));
    t.register(TypedFunction::new("pow",  vec![F, F], F, float2(f32::powf)));
    t.register(TypedFunction::new("sqrt", vec![F], F, float1(f32::sqrt)));

    // ── rounding ─────────────────────────────────────────────────────────────
    t.register(TypedFunction::new("floor", vec![F], F, float1(f32::floor)));
    t.register(TypedFunction::new("ceil",  vec![F], F, float1(f32::ceil)));
    t.register(TypedFunction::new("round", vec![F], F, float1(f32::round)));
    t.register(TypedFunction::new("frac",  vec![F], F, float1(|x| x - x.floor())));
    t.register(TypedFunction::new("fmod",  vec![F, F], F, float2(|x, y| x - y * (x / y).floor())));

    // ── int and float ────────────────────────────────────────────────────────
    t.register(TypedFunction::new("min", vec![I, I], I, int2(i32::min)));
    t.register(TypedFunction::new("min", vec![F, F], F, float2(f32::min)));
    t.register(TypedFunction::new("max", vec![I, I], I, int2(i32::max)));
    t.register(TypedFunction::new("max", vec![F, F], F, float2(f32::max)));
    // lower bound wins when the bounds cross
    t.register(TypedFunction::new("clamp", vec![I, I, I], I, int3(|x, lo, hi| x.min(hi).max(lo))));
    t.register(TypedFunction::new("clamp", vec![F, F, F], F, float3(|x, lo, hi| x.min(hi).max(lo))));
    t.register(TypedFunction::new("abs", vec![I], I, int1(i32::wrapping_abs)));
    t.register(TypedFunction::new("abs", vec![F], F, float1(f32::abs)));
    t.register(TypedFunction::new("signum", vec![I], I, int1(i32::signum)));
    t.register(TypedFunction::new("signum", vec![F], F, float1(signum)));
}

/// Like `f32::signum`, but zero maps to zero.
fn signum(x: f32) -> f32 {
    if x == 0.0 || x.is_nan() { x } else { x.signum() }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::context::EmptyContext;
    use crate::runtime::expression::{ConstantExpression, Expression};
    use crate::runtime::value::FunctionReturn;

    fn float(v: f32) -> Expression {
        Expression::Constant(ConstantExpression::new(F, FunctionReturn { float: v, ..Default::default() }))
    }

    fn int(v: i32) -> Expression {
        Expression::Constant(ConstantExpression::new(I, FunctionReturn { int: v, ..Default::default() }))
    }

    fn call(name: &str, args: &[Expression]) -> FunctionReturn {
        let t = FunctionTable::standard();
        let types: Vec<Type> = args.iter().map(Expression::ty).collect();
        let f = t.overloads(name).iter().find(|f| f.params == types).expect("no such overload");
        let mut out = FunctionReturn::default();
        (f.implementation)(args, &EmptyContext, &mut out);
        out
    }

    #[test]
    fn frac_and_fmod_are_floor_based() {
        assert_eq!(call("frac", &[float(2.25)]).float, 0.25);
        assert_eq!(call("frac", &[float(-0.25)]).float, 0.75);
        assert_eq!(call("fmod", &[float(-1.0), float(4.0)]).float, 3.0);
    }

    #[test]
    fn clamp_orders_bounds() {
        assert_eq!(call("clamp", &[int(5), int(0), int(3)]).int, 3);
        assert_eq!(call("clamp", &[float(-1.0), float(0.0), float(1.0)]).float, 0.0);
        assert_eq!(call("clamp", &[int(1), int(4), int(2)]).int, 4);
    }

    #[test]
    fn signum_of_zero_is_zero() {
        assert_eq!(call("signum", &[float(0.0)]).float, 0.0);
        assert_eq!(call("signum", &[float(-3.0)]).float, -1.0);
        assert_eq!(call("signum", &[int(-3)]).int, -1);
    }

    #[test]
    fn angle_conversion() {
        let r = call("torad", &[float(180.0)]).float;
        assert!((r - std::f32::consts::PI).abs() < 1e-6);
        assert!((call("todeg", &[float(r)]).float - 180.0).abs() < 1e-4);
    }

    #[test]
    fn min_max_pick_by_type() {
        assert_eq!(call("min", &[int(2), int(-1)]).int, -1);
        assert_eq!(call("max", &[float(0.5), float(1.5)]).float, 1.5);
    }
}
