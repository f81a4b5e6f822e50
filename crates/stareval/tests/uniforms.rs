//! Custom uniforms tests.
//!
//! Builds a small shader-pack style set of definitions against host
//! variables, then drives it through a few frames and ticks.

use stareval::{
    CustomUniforms, DefinitionKind, ExternalVariables, FunctionTable, ParserOptions, Primitive,
    Type, UpdateFrequency, Value, VariableMap,
};

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn init_logging() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn externals() -> ExternalVariables {
    let mut ext = ExternalVariables::new();
    ext.register("frameTimeCounter", Type::FLOAT, UpdateFrequency::PerFrame)
        .register("worldTime", Type::INT, UpdateFrequency::PerTick)
        .register("rainStrength", Type::FLOAT, UpdateFrequency::PerTick)
        .register("sunPosition", Type::Vector(Primitive::Float, 3), UpdateFrequency::PerFrame);
    ext
}

fn host(time: f32, world_time: i32, rain: f32) -> VariableMap {
    let mut vars = VariableMap::new();
    vars.set_float("frameTimeCounter", time);
    vars.set_int("worldTime", world_time);
    vars.set_float("rainStrength", rain);
    vars.set_value("sunPosition", Type::Vector(Primitive::Float, 3), &Value::FloatVec(vec![0.0, 50.0, 50.0]));
    vars
}

fn pack() -> CustomUniforms {
    init_logging();
    CustomUniforms::builder()
        .variable(Type::BOOLEAN, "isNight", "worldTime > 13000 && worldTime < 23000")
        .variable(Type::FLOAT, "wetness", "clamp(rainStrength * 2, 0.0, 1.0)")
        .uniform(Type::FLOAT, "nightFactor", "if(isNight, 1.0, 0.0) * (1 - wetness)")
        .uniform(Type::FLOAT, "sunHeight", "sunPosition.y / 100")
        .uniform(Type::FLOAT, "wave", "sin(frameTimeCounter * pi)")
        .uniform(Type::FLOAT, "halfPi", "pi / 2")
        .uniform(Type::Vector(Primitive::Float, 2), "broken", "vec2(1, nope)")
        .build(&FunctionTable::standard(), &externals(), &ParserOptions::default())
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[test]
fn frequencies_follow_inputs() {
    let uniforms = pack();
    let freq = |name| uniforms.definition(name).map(|d| d.frequency);
    assert_eq!(freq("isNight"), Some(UpdateFrequency::PerTick));
    assert_eq!(freq("nightFactor"), Some(UpdateFrequency::PerTick));
    assert_eq!(freq("sunHeight"), Some(UpdateFrequency::PerFrame));
    assert_eq!(freq("halfPi"), Some(UpdateFrequency::Once));
    assert_eq!(freq("broken"), Some(UpdateFrequency::Once));
}

#[test]
fn values_after_first_update() {
    let mut uniforms = pack();
    uniforms.update_all(&host(0.5, 18000, 0.25));

    assert_eq!(uniforms.value("isNight"), Some(Value::Bool(true)));
    assert_eq!(uniforms.value("wetness"), Some(Value::Float(0.5)));
    assert_eq!(uniforms.value("nightFactor"), Some(Value::Float(0.5)));
    assert_eq!(uniforms.value("sunHeight"), Some(Value::Float(0.5)));
    assert_eq!(uniforms.value("broken"), Some(Value::FloatVec(vec![0.0, 0.0])));
    assert_eq!(uniforms.value("missing"), None);
    match uniforms.value("halfPi") {
        Some(Value::Float(v)) => assert!((v - std::f32::consts::FRAC_PI_2).abs() < 1e-6),
        other => panic!("expected a float, got {other:?}"),
    }
}

#[test]
fn ticks_and_frames_update_separately() {
    let mut uniforms = pack();
    uniforms.update_all(&host(0.5, 18000, 0.0));
    assert_eq!(uniforms.value("nightFactor"), Some(Value::Float(1.0)));

    // per-frame update does not pick up the new world time
    uniforms.update(&host(1.0, 6000, 0.0), UpdateFrequency::PerFrame);
    assert_eq!(uniforms.value("nightFactor"), Some(Value::Float(1.0)));

    uniforms.update(&host(1.0, 6000, 0.0), UpdateFrequency::PerTick);
    assert_eq!(uniforms.value("isNight"), Some(Value::Bool(false)));
    assert_eq!(uniforms.value("nightFactor"), Some(Value::Float(0.0)));
}

#[test]
fn only_uniforms_are_listed() {
    let mut uniforms = pack();
    uniforms.update_all(&host(0.0, 0, 0.0));

    let names: Vec<&str> = uniforms.uniforms().map(|(name, _)| name).collect();
    assert_eq!(names, ["nightFactor", "sunHeight", "wave", "halfPi", "broken"]);
    assert!(
        uniforms
            .definitions()
            .iter()
            .filter(|d| d.kind == DefinitionKind::Variable)
            .all(|d| d.name == "isNight" || d.name == "wetness")
    );
}
