//! Selection and range predicates.

use crate::runtime::context::FunctionContext;
use crate::runtime::expression::Expression;
use crate::runtime::value::FunctionReturn;
use crate::types::Type;
use super::{FunctionTable, TypedFunction, read_float, read_int};

const F: Type = Type::FLOAT;
const I: Type = Type::INT;
const B: Type = Type::BOOLEAN;

/// Most candidates accepted by `in(x, a, b, …)`.
const MAX_IN_CANDIDATES: usize = 5;

pub(super) fn register(t: &mut FunctionTable) {
    for ty in Type::ALL {
        // if(cond, then, else)
        t.register(TypedFunction::new("if", vec![B, ty, ty], ty, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
            args[0].evaluate_to(ctx, out);
            let chosen = if out.boolean { &args[1] } else { &args[2] };
            chosen.evaluate_to(ctx, out);
        }));
        // if(cond1, a, cond2, b, else)
        t.register(TypedFunction::new("if", vec![B, ty, B, ty, ty], ty, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
            args[0].evaluate_to(ctx, out);
            if out.boolean {
                return args[1].evaluate_to(ctx, out);
            }
            args[2].evaluate_to(ctx, out);
            let chosen = if out.boolean { &args[3] } else { &args[4] };
            chosen.evaluate_to(ctx, out);
        }));
    }

    t.register(TypedFunction::new("between", vec![I, I, I], B, between(read_int)));
    t.register(TypedFunction::new("between", vec![F, F, F], B, between(read_float)));

    t.register(TypedFunction::new("equals", vec![F, F, F], B, |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut a = FunctionReturn::default();
        let mut b = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut a);
        args[1].evaluate_to(ctx, &mut b);
        args[2].evaluate_to(ctx, out);
        out.boolean = (a.float - b.float).abs() <= out.float;
    }));

    for candidates in 2..=MAX_IN_CANDIDATES {
        t.register(TypedFunction::new("in", vec![I; candidates + 1], B, contains(read_int)));
        t.register(TypedFunction::new("in", vec![F; candidates + 1], B, contains(read_float)));
    }
}

/// `lo <= x && x <= hi`
fn between<T: PartialOrd + Copy + 'static>(
    read: fn(&FunctionReturn) -> T,
) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut x = FunctionReturn::default();
        let mut lo = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut x);
        args[1].evaluate_to(ctx, &mut lo);
        args[2].evaluate_to(ctx, out);
        let (x, lo, hi) = (read(&x), read(&lo), read(out));
        out.boolean = lo <= x && x <= hi;
    }
}

/// True when the first argument equals any of the others; stops at the first hit.
fn contains<T: PartialEq + Copy + 'static>(
    read: fn(&FunctionReturn) -> T,
) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        let mut x = FunctionReturn::default();
        args[0].evaluate_to(ctx, &mut x);
        let needle = read(&x);
        for candidate in &args[1..] {
            candidate.evaluate_to(ctx, out);
            if read(out) == needle {
                out.boolean = true;
                return;
            }
        }
        out.boolean = false;
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::context::EmptyContext;
    use crate::runtime::expression::ConstantExpression;

    fn int(v: i32) -> Expression {
        Expression::Constant(ConstantExpression::new(I, FunctionReturn { int: v, ..Default::default() }))
    }

    fn float(v: f32) -> Expression {
        Expression::Constant(ConstantExpression::new(F, FunctionReturn { float: v, ..Default::default() }))
    }

    fn boolean(v: bool) -> Expression {
        Expression::Constant(ConstantExpression::new(B, FunctionReturn { boolean: v, ..Default::default() }))
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
    fn if_picks_branch() {
        assert_eq!(call("if", &[boolean(true), int(1), int(2)]).int, 1);
        assert_eq!(call("if", &[boolean(false), float(1.0), float(2.0)]).float, 2.0);
    }

    #[test]
    fn if_chain() {
        let args = |c1, c2| [boolean(c1), int(1), boolean(c2), int(2), int(3)];
        assert_eq!(call("if", &args(true, true)).int, 1);
        assert_eq!(call("if", &args(false, true)).int, 2);
        assert_eq!(call("if", &args(false, false)).int, 3);
    }

    #[test]
    fn between_is_inclusive() {
        assert!(call("between", &[int(3), int(3), int(5)]).boolean);
        assert!(call("between", &[float(5.0), float(3.0), float(5.0)]).boolean);
        assert!(!call("between", &[int(6), int(3), int(5)]).boolean);
    }

    #[test]
    fn equals_within_epsilon() {
        assert!(call("equals", &[float(1.0), float(1.05), float(0.1)]).boolean);
        assert!(!call("equals", &[float(1.0), float(1.2), float(0.1)]).boolean);
    }

    #[test]
    fn in_matches_any_candidate() {
        assert!(call("in", &[int(3), int(1), int(2), int(3)]).boolean);
        assert!(!call("in", &[int(4), int(1), int(2)]).boolean);
        assert!(call("in", &[float(0.5), float(0.5), float(1.0), float(2.0), float(3.0), float(4.0)]).boolean);
    }

    #[test]
    fn if_exists_for_every_type() {
        let t = FunctionTable::standard();
        for ty in Type::ALL {
            assert!(t.overloads("if").iter().any(|f| f.params == [B, ty, ty] && f.ret == ty));
        }
    }
}
