//! Vectorized overloads, synthesized by the resolver when a call only matches
//! once its vector arguments are taken apart component by component.
//!
//! A scalar overload returning `bool` lifts to an "all components" predicate
//! that stops at the first `false`. Any other primitive return lifts to a
//! vector of that primitive.

use std::sync::Arc;

use crate::runtime::context::FunctionContext;
use crate::runtime::expression::{ConstantExpression, Expression};
use crate::runtime::value::FunctionReturn;
use crate::types::{Primitive, Type};
use super::TypedFunction;

/// Most arguments a lifted call can take. Bounds the per-call scratch.
pub const MAX_ARITY: usize = 8;

/// How one argument of the lifted call feeds the scalar overload.
#[derive(Debug, Clone, Copy)]
struct Lane {
    from: Primitive,
    to: Primitive,
    /// Vector arguments contribute their i-th component to the i-th call;
    /// scalar arguments are repeated.
    vector: bool,
}

/// Wrap `scalar` so that it applies component-wise to `args` (all vectors of
/// `size` components, or primitives). `None` when the shapes do not allow it.
pub fn lift(scalar: Arc<TypedFunction>, args: &[Type], size: usize) -> Option<TypedFunction> {
    if args.len() != scalar.arity() || args.len() > MAX_ARITY {
        return None;
    }
    let ret = scalar.ret.primitive()?;
    let lanes = args
        .iter()
        .zip(&scalar.params)
        .map(|(arg, param)| {
            let to = param.primitive()?;
            match *arg {
                Type::Primitive(from) => Some(Lane { from, to, vector: false }),
                Type::Vector(from, n) if n as usize == size => Some(Lane { from, to, vector: true }),
                _ => None,
            }
        })
        .collect::<Option<Vec<Lane>>>()?;

    let predicate = ret == Primitive::Boolean;
    let lifted_ret = if predicate { Type::BOOLEAN } else { Type::vector(ret, size)? };
    let pure = scalar.pure;
    let name = scalar.name.clone();

    let params = args.to_vec();
    let mut function = TypedFunction::new(name, params, lifted_ret, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut values = [FunctionReturn::default(); MAX_ARITY];
        for (arg, value) in args.iter().zip(values.iter_mut()) {
            arg.evaluate_to(ctx, value);
        }

        let mut components: [Expression; MAX_ARITY] =
            std::array::from_fn(|_| Expression::Constant(ConstantExpression::zero(Type::BOOLEAN)));
        let mut result = FunctionReturn::default();
        if !predicate {
            *out = lifted_ret.default_value();
        }

        for c in 0..size {
            for (i, lane) in lanes.iter().enumerate() {
                let mut slot = values[i];
                if lane.vector {
                    lane.from.read_component(&values[i], c, &mut slot);
                }
                lane.from.coerce(lane.to, &mut slot);
                components[i] = Expression::Constant(ConstantExpression::new(Type::Primitive(lane.to), slot));
            }
            (scalar.implementation)(&components[..lanes.len()], ctx, &mut result);

            if predicate {
                if !result.boolean {
                    out.boolean = false;
                    return;
                }
            } else {
                ret.write_component(&result, c, out);
            }
        }
        if predicate {
            out.boolean = true;
        }
    });
    function.pure = pure;
    Some(function)
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functions::{FunctionTable, float2};
    use crate::runtime::context::EmptyContext;
    use crate::runtime::value::{Object, Value};

    fn constant(ty: Type, value: FunctionReturn) -> Expression {
        Expression::Constant(ConstantExpression::new(ty, value))
    }

    #[test]
    fn lifts_float_function_to_vector() {
        let add = Arc::new(TypedFunction::new("+", vec![Type::FLOAT, Type::FLOAT], Type::FLOAT, float2(|a, b| a + b)));
        let vec3 = Type::Vector(Primitive::Float, 3);
        let lifted = lift(add, &[vec3, Type::INT], 3).expect("liftable");
        assert_eq!(lifted.ret, vec3);

        let v = constant(vec3, FunctionReturn { object: Object::FloatVec([1.0, 2.0, 3.0, 0.0]), ..Default::default() });
        let k = constant(Type::INT, FunctionReturn { int: 10, ..Default::default() });
        let mut out = FunctionReturn::default();
        (lifted.implementation)(&[v, k], &EmptyContext, &mut out);
        assert_eq!(vec3.load(&out), Value::FloatVec(vec![11.0, 12.0, 13.0]));
    }

    #[test]
    fn boolean_return_lifts_to_predicate() {
        let t = FunctionTable::standard();
        let lt = t.overloads("<").iter().find(|f| f.params == [Type::INT, Type::INT]).cloned().expect("int <");
        let ivec2 = Type::Vector(Primitive::Int, 2);
        let lifted = lift(lt, &[ivec2, ivec2], 2).expect("liftable");
        assert_eq!(lifted.ret, Type::BOOLEAN);

        let a = constant(ivec2, FunctionReturn { object: Object::IntVec([1, 5, 0, 0]), ..Default::default() });
        let b = constant(ivec2, FunctionReturn { object: Object::IntVec([2, 3, 0, 0]), ..Default::default() });
        let mut out = FunctionReturn::default();
        (lifted.implementation)(&[a, b], &EmptyContext, &mut out);
        assert!(!out.boolean);
    }

    #[test]
    fn mismatched_sizes_do_not_lift() {
        let add = Arc::new(TypedFunction::new("+", vec![Type::FLOAT, Type::FLOAT], Type::FLOAT, float2(|a, b| a + b)));
        let vec2 = Type::Vector(Primitive::Float, 2);
        let vec3 = Type::Vector(Primitive::Float, 3);
        assert!(lift(add, &[vec2, vec3], 2).is_none());
    }

    #[test]
    fn object_return_does_not_lift() {
        let t = FunctionTable::standard();
        let m = t.overloads("mat2").first().cloned().expect("mat2");
        assert!(lift(m, &[Type::FLOAT, Type::FLOAT], 2).is_none());
    }
}
