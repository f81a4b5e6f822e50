//! Evaluation tests.
//!
//! Tests the full stack: compile → evaluate_to / partial_eval.
//! Results are read back through `Type::load` so that only the field the
//! expression's type selects is compared.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use stareval::{
    compile, EmptyContext, Expression, FunctionReturn, FunctionTable, ParserOptions, Primitive,
    Type, TypedFunction, Value, VariableMap, VariableTypes,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn build(expected: Type, src: &str, functions: &FunctionTable, vars: &dyn VariableTypes) -> Expression {
    compile(expected, src, functions, vars, &ParserOptions::default()).unwrap_or_else(|e| {
        panic!("compile of `{src}` failed: {e}");
    })
}

fn eval(expected: Type, src: &str) -> Value {
    build(expected, src, &FunctionTable::standard(), &EmptyContext).evaluate(&EmptyContext)
}

fn eval_with(expected: Type, src: &str, vars: &VariableMap) -> Value {
    build(expected, src, &FunctionTable::standard(), vars).evaluate(vars)
}

fn scene() -> VariableMap {
    let mut vars = VariableMap::new();
    vars.set_float("frameTimeCounter", 2.0);
    vars.set_int("worldTime", 6000);
    vars.set_bool("isEyeInWater", false);
    vars.set_value("sunPosition", Type::Vector(Primitive::Float, 3), &Value::FloatVec(vec![0.0, 100.0, 0.0]));
    vars
}

// ─── Arithmetic ──────────────────────────────────────────────────────────────

#[test]
fn one_plus_one() {
    assert_eq!(eval(Type::INT, "1 + 1"), Value::Int(2));
}

#[test]
fn precedence_and_associativity() {
    assert_eq!(eval(Type::INT, "2 + 3 * 4"), Value::Int(14));
    assert_eq!(eval(Type::INT, "10 - 3 - 2"), Value::Int(5));
    assert_eq!(eval(Type::INT, "(2 + 3) * 4"), Value::Int(20));
    assert_eq!(eval(Type::INT, "-2 * 3"), Value::Int(-6));
}

#[test]
fn int_division_by_zero_is_zero() {
    assert_eq!(eval(Type::INT, "7 / 0"), Value::Int(0));
    assert_eq!(eval(Type::INT, "7 % 0"), Value::Int(0));
}

#[test]
fn mixed_arithmetic() {
    assert_eq!(eval(Type::FLOAT, "1 / 2.0"), Value::Float(0.5));
    assert_eq!(eval(Type::FLOAT, "clamp(5, 0.0, 1.0)"), Value::Float(1.0));
}

#[test]
fn variables_are_read_from_the_context() {
    let vars = scene();
    assert_eq!(eval_with(Type::INT, "worldTime / 1000", &vars), Value::Int(6));
    assert_eq!(eval_with(Type::FLOAT, "frameTimeCounter * 0.5", &vars), Value::Float(1.0));
    assert_eq!(eval_with(Type::FLOAT, "sunPosition.y / 100", &vars), Value::Float(1.0));
}

// ─── Selection ───────────────────────────────────────────────────────────────

#[test]
fn if_with_int_condition() {
    assert_eq!(eval(Type::BOOLEAN, "if(1, 1, 0)"), Value::Bool(true));
    assert_eq!(eval(Type::BOOLEAN, "if(true, true, false)"), Value::Bool(true));
}

#[test]
fn if_chain() {
    let vars = scene();
    let src = "if(worldTime < 1000, 1, worldTime < 12000, 2, 3)";
    assert_eq!(eval_with(Type::INT, src, &vars), Value::Int(2));
}

#[test]
fn boolean_operators() {
    let vars = scene();
    assert_eq!(eval_with(Type::BOOLEAN, "isEyeInWater || worldTime > 0", &vars), Value::Bool(true));
    assert_eq!(eval_with(Type::BOOLEAN, "!isEyeInWater && between(worldTime, 0, 12000)", &vars), Value::Bool(true));
    assert_eq!(eval(Type::BOOLEAN, "in(3, 1, 2, 3)"), Value::Bool(true));
}

// ─── Vectors and matrices ────────────────────────────────────────────────────

#[test]
fn vector_arithmetic() {
    let vec3 = Type::Vector(Primitive::Float, 3);
    assert_eq!(eval(vec3, "vec3(1, 2, 3) + vec3(1, 1, 1)"), Value::FloatVec(vec![2.0, 3.0, 4.0]));
    assert_eq!(eval(vec3, "max(vec3(1, 5, 3), 2.0)"), Value::FloatVec(vec![2.0, 5.0, 3.0]));
}

#[test]
fn matrix_times_vector() {
    let vec2 = Type::Vector(Primitive::Float, 2);
    let src = "mat2(vec2(0, 1), vec2(-1, 0)) * vec2(1, 0)";
    assert_eq!(eval(vec2, src), Value::FloatVec(vec![0.0, 1.0]));
}

/// Standard table plus impure `touch(bool)` / `touch(int)` identities that
/// count how often they run.
fn counting_table() -> (FunctionTable, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut functions = FunctionTable::standard();
    for ty in [Type::BOOLEAN, Type::INT] {
        let counter = Arc::clone(&calls);
        functions.register(
            TypedFunction::new("touch", vec![ty], ty, move |args, ctx, out| {
                counter.fetch_add(1, Ordering::SeqCst);
                args[0].evaluate_to(ctx, out);
            })
            .impure(),
        );
    }
    (functions, calls)
}

/// Evaluate `src` against a fresh counting table; returns the value and the
/// number of `touch` calls.
fn eval_counting(expected: Type, src: &str) -> (Value, usize) {
    let (functions, calls) = counting_table();
    let value = build(expected, src, &functions, &EmptyContext).evaluate(&EmptyContext);
    (value, calls.load(Ordering::SeqCst))
}

#[test]
fn lifted_predicate_stops_at_first_false() {
    let (functions, calls) = counting_table();
    let expr = build(Type::BOOLEAN, "touch(bvec3(true, false, true))", &functions, &EmptyContext);
    let mut out = FunctionReturn::default();
    expr.evaluate_to(&EmptyContext, &mut out);

    assert!(!out.boolean);
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ─── Laziness ────────────────────────────────────────────────────────────────

#[test]
fn and_skips_right_side_when_left_is_false() {
    assert_eq!(eval_counting(Type::BOOLEAN, "false && touch(true)"), (Value::Bool(false), 0));
    assert_eq!(eval_counting(Type::BOOLEAN, "true && touch(true)"), (Value::Bool(true), 1));
}

#[test]
fn or_skips_right_side_when_left_is_true() {
    assert_eq!(eval_counting(Type::BOOLEAN, "true || touch(false)"), (Value::Bool(true), 0));
    assert_eq!(eval_counting(Type::BOOLEAN, "false || touch(false)"), (Value::Bool(false), 1));
}

#[test]
fn if_evaluates_only_the_chosen_branch() {
    assert_eq!(eval_counting(Type::INT, "if(true, 1, touch(2))"), (Value::Int(1), 0));
    assert_eq!(eval_counting(Type::INT, "if(false, touch(1), 2)"), (Value::Int(2), 0));
    assert_eq!(eval_counting(Type::INT, "if(true, 1, touch(true), touch(2), touch(3))"), (Value::Int(1), 0));
    assert_eq!(eval_counting(Type::INT, "if(false, touch(1), true, 2, touch(3))"), (Value::Int(2), 0));
}

#[test]
fn in_stops_at_first_match() {
    assert_eq!(eval_counting(Type::BOOLEAN, "in(1, 1, touch(2), touch(3))"), (Value::Bool(true), 0));
    assert_eq!(eval_counting(Type::BOOLEAN, "in(3, touch(2), 3, touch(4))"), (Value::Bool(true), 1));
}

// ─── Partial evaluation ──────────────────────────────────────────────────────

#[test]
fn partial_eval_matches_full_evaluation() {
    let vars = scene();
    let functions = FunctionTable::standard();
    let expr = build(Type::FLOAT, "sin(frameTimeCounter) * 2 + worldTime / 24000.0", &functions, &vars);

    let mut full = FunctionReturn::default();
    expr.evaluate_to(&vars, &mut full);

    let mut scratch = FunctionReturn::default();
    let folded = expr.partial_eval(&vars, &mut scratch);
    let Expression::Constant(constant) = &folded else {
        panic!("expected a constant, got {folded:?}");
    };
    assert_eq!(Type::FLOAT.load(&constant.value), Type::FLOAT.load(&full));

    let again = folded.clone().partial_eval(&vars, &mut scratch);
    assert_eq!(again, folded);
}

#[test]
fn partial_eval_keeps_unknown_variables() {
    let vars = scene();
    let functions = FunctionTable::standard();
    let expr = build(Type::FLOAT, "frameTimeCounter + 2 * 3", &functions, &vars);

    let folded = expr.partial_eval(&EmptyContext, &mut FunctionReturn::default());
    assert!(!folded.is_constant());
    assert_eq!(folded.evaluate(&vars), Value::Float(8.0));
}
