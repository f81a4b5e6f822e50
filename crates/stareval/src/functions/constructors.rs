//! Vector and matrix constructors, `transpose`, and scalar conversions.

use crate::runtime::context::FunctionContext;
use crate::runtime::expression::Expression;
use crate::runtime::value::FunctionReturn;
use crate::types::mat;
use crate::types::{ObjectType, Primitive, Type};
use super::{FunctionTable, TypedFunction, load_floats, matrix_object};

pub(super) fn register(t: &mut FunctionTable) {
    for n in 2..=4 {
        register_vectors(t, n);
        register_matrices(t, n);
    }
    register_conversions(t);
}

fn vector_name(element: Primitive, n: usize) -> String {
    let prefix = match element {
        Primitive::Float   => "vec",
        Primitive::Int     => "ivec",
        Primitive::Boolean => "bvec",
    };
    format!("{prefix}{n}")
}

// ─── Vectors ──────────────────────────────────────────────────────────────────

fn register_vectors(t: &mut FunctionTable, n: usize) {
    for element in Primitive::ALL {
        let Some(ty) = Type::vector(element, n) else { continue };
        t.register(TypedFunction::new(vector_name(element, n), vec![Type::Primitive(element); n], ty, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
            let mut component = FunctionReturn::default();
            for (i, arg) in args.iter().enumerate() {
                arg.evaluate_to(ctx, &mut component);
                element.write_component(&component, i, out);
            }
        }));
    }
}

// ─── Matrices ─────────────────────────────────────────────────────────────────

fn register_matrices(t: &mut FunctionTable, n: usize) {
    let Some(object) = ObjectType::matrix(n) else { return };
    let Some(column) = Type::vector(Primitive::Float, n) else { return };
    let matrix = Type::Object(object);

    // one vector per column
    t.register(TypedFunction::new(format!("mat{n}"), vec![column; n], matrix, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        let mut elements = [0.0; 16];
        let mut slot = FunctionReturn::default();
        for (c, arg) in args.iter().enumerate() {
            arg.evaluate_to(ctx, &mut slot);
            let floats = load_floats(&slot.object);
            elements[c * n..c * n + n].copy_from_slice(&floats[..n]);
        }
        out.object = matrix_object(n, &elements);
    }));

    t.register(TypedFunction::new("transpose", vec![matrix], matrix, move |args: &[Expression], ctx: &dyn FunctionContext, out: &mut FunctionReturn| {
        args[0].evaluate_to(ctx, out);
        let elements = load_floats(&out.object);
        let mut transposed = [0.0; 16];
        mat::transpose_into(&elements, n, &mut transposed);
        out.object = matrix_object(n, &transposed);
    }));
}

// ─── Conversions ──────────────────────────────────────────────────────────────

fn register_conversions(t: &mut FunctionTable) {
    t.register_conversion(TypedFunction::new("float", vec![Type::INT], Type::FLOAT, coerce(Primitive::Int, Primitive::Float)));
    t.register_conversion(TypedFunction::new("bool", vec![Type::INT], Type::BOOLEAN, coerce(Primitive::Int, Primitive::Boolean)));
    // truncating; never applied implicitly
    t.register(TypedFunction::new("int", vec![Type::FLOAT], Type::INT, coerce(Primitive::Float, Primitive::Int)));
}

fn coerce(from: Primitive, to: Primitive) -> impl Fn(&[Expression], &dyn FunctionContext, &mut FunctionReturn) + Send + Sync + 'static {
    move |args, ctx, out| {
        args[0].evaluate_to(ctx, out);
        from.coerce(to, out);
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::context::EmptyContext;
    use crate::runtime::expression::ConstantExpression;
    use crate::runtime::value::{Object, Value};

    fn float(v: f32) -> Expression {
        Expression::Constant(ConstantExpression::new(Type::FLOAT, FunctionReturn { float: v, ..Default::default() }))
    }

    fn call(name: &str, args: &[Expression]) -> (Type, FunctionReturn) {
        let t = FunctionTable::standard();
        let types: Vec<Type> = args.iter().map(Expression::ty).collect();
        let f = t.overloads(name).iter().find(|f| f.params == types).expect("no such overload");
        let mut out = FunctionReturn::default();
        (f.implementation)(args, &EmptyContext, &mut out);
        (f.ret, out)
    }

    #[test]
    fn vector_constructors() {
        let (ty, out) = call("vec3", &[float(1.0), float(2.0), float(3.0)]);
        assert_eq!(ty.load(&out), Value::FloatVec(vec![1.0, 2.0, 3.0]));

        let t = FunctionTable::standard();
        assert!(t.contains("ivec4"));
        assert!(t.contains("bvec2"));
    }

    #[test]
    fn matrix_from_columns_and_transpose() {
        let vec2 = Type::Vector(Primitive::Float, 2);
        let col = |x: f32, y: f32| {
            Expression::Constant(ConstantExpression::new(vec2, FunctionReturn { object: Object::FloatVec([x, y, 0.0, 0.0]), ..Default::default() }))
        };
        let (_, m) = call("mat2", &[col(1.0, 2.0), col(3.0, 4.0)]);
        assert_eq!(m.object, Object::Mat2([1.0, 2.0, 3.0, 4.0]));

        let mat2 = Type::Object(ObjectType::Mat2);
        let (_, t) = call("transpose", &[Expression::Constant(ConstantExpression::new(mat2, m))]);
        assert_eq!(t.object, Object::Mat2([1.0, 3.0, 2.0, 4.0]));
    }

    #[test]
    fn explicit_int_truncates() {
        let (_, out) = call("int", &[float(-2.7)]);
        assert_eq!(out.int, -2);
    }
}
