//! Custom uniforms: named expressions declared by a shader pack, compiled
//! once at load and re-evaluated whenever the values they read may change.
//!
//! Definitions compile in declaration order and each one may read the host's
//! external variables plus every definition before it. Names are unique
//! across both, so a duplicate or a name taken by an external variable is
//! skipped. A definition that fails to compile is logged and replaced by its
//! type's zero value so that the rest of the pack still loads.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::analysis::{Layered, VariableTypes};
use crate::functions::FunctionTable;
use crate::runtime::context::{EmptyContext, FunctionContext};
use crate::runtime::expression::{ConstantExpression, Expression};
use crate::runtime::value::{FunctionReturn, Value};
use crate::syntax::options::ParserOptions;
use crate::types::Type;

// ─── External variables ───────────────────────────────────────────────────────

/// How often the host changes a variable's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum UpdateFrequency {
    #[default]
    Once,
    PerTick,
    PerFrame,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExternalVariable {
    pub ty: Type,
    pub frequency: UpdateFrequency,
}

/// Host-provided variables visible to every definition.
#[derive(Debug, Clone, Default)]
pub struct ExternalVariables {
    vars: HashMap<String, ExternalVariable>,
}

impl ExternalVariables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a host variable. A vector type with a size outside `2..=4` is
    /// logged and ignored.
    pub fn register(&mut self, name: impl Into<String>, ty: Type, frequency: UpdateFrequency) -> &mut Self {
        let name = name.into();
        if !ty.is_valid() {
            warn!(%name, ?ty, "external variable has an invalid type, ignoring");
            return self;
        }
        self.vars.insert(name, ExternalVariable { ty, frequency });
        self
    }

    pub fn get(&self, name: &str) -> Option<ExternalVariable> {
        self.vars.get(name).copied()
    }
}

impl VariableTypes for ExternalVariables {
    fn variable_type(&self, name: &str) -> Option<Type> {
        self.vars.get(name).map(|v| v.ty)
    }
}

// ─── Definitions ──────────────────────────────────────────────────────────────

/// `variable`s are intermediate values; only `uniform`s are meant for upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Variable,
    Uniform,
}

#[derive(Debug, Clone)]
struct Definition {
    kind: DefinitionKind,
    ty: Type,
    name: String,
    source: String,
}

#[derive(Debug, Default)]
pub struct CustomUniformsBuilder {
    definitions: Vec<Definition>,
}

impl CustomUniformsBuilder {
    pub fn variable(self, ty: Type, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.define(DefinitionKind::Variable, ty, name.into(), source.into())
    }

    pub fn uniform(self, ty: Type, name: impl Into<String>, source: impl Into<String>) -> Self {
        self.define(DefinitionKind::Uniform, ty, name.into(), source.into())
    }

    fn define(mut self, kind: DefinitionKind, ty: Type, name: String, source: String) -> Self {
        self.definitions.push(Definition { kind, ty, name, source });
        self
    }

    /// Compile every definition in order. Never fails; see the module docs.
    #[tracing::instrument(skip_all, fields(definitions = self.definitions.len()))]
    pub fn build(
        self,
        functions: &FunctionTable,
        externals: &ExternalVariables,
        options: &ParserOptions,
    ) -> CustomUniforms {
        let mut compiled: Vec<CompiledDefinition> = Vec::with_capacity(self.definitions.len());
        let mut local_types: HashMap<String, Type> = HashMap::new();
        let mut values: HashMap<String, Expression> = HashMap::new();
        let mut scratch = FunctionReturn::default();

        for def in self.definitions {
            if local_types.contains_key(&def.name) {
                warn!(name = %def.name, source = %def.source, "duplicate custom uniform definition, skipping");
                continue;
            }
            if externals.get(&def.name).is_some() {
                warn!(name = %def.name, source = %def.source, "custom uniform shadows an external variable, skipping");
                continue;
            }

            let scope = Layered { inner: &local_types, outer: externals };
            let expression = match crate::compile(def.ty, &def.source, functions, &scope, options) {
                Ok(expression) => expression.partial_eval(&EmptyContext, &mut scratch),
                Err(error) => {
                    warn!(name = %def.name, source = %def.source, %error, "failed to compile custom uniform, using default value");
                    Expression::Constant(ConstantExpression::zero(def.ty))
                }
            };

            let frequency = frequency_of(&expression, &compiled, externals);
            debug!(name = %def.name, ty = %def.ty, ?frequency, %expression, "loaded custom uniform");

            let initial = match &expression {
                Expression::Constant(c) => c.clone(),
                _ => ConstantExpression::zero(def.ty),
            };
            values.insert(def.name.clone(), Expression::Constant(initial));
            local_types.insert(def.name.clone(), def.ty);
            compiled.push(CompiledDefinition { kind: def.kind, name: def.name, ty: def.ty, expression, frequency });
        }

        CustomUniforms { definitions: compiled, values }
    }
}

/// The most frequently changing variable `expression` reads, earlier
/// definitions included.
fn frequency_of(expression: &Expression, earlier: &[CompiledDefinition], externals: &ExternalVariables) -> UpdateFrequency {
    let mut vars = HashSet::new();
    expression.list_variables(&mut vars);
    vars.iter()
        .map(|v| match earlier.iter().find(|d| d.name == v.name) {
            Some(d) => d.frequency,
            None => externals.get(&v.name).map(|e| e.frequency).unwrap_or_default(),
        })
        .max()
        .unwrap_or_default()
}

// ─── Runtime ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CompiledDefinition {
    pub kind: DefinitionKind,
    pub name: String,
    pub ty: Type,
    pub expression: Expression,
    pub frequency: UpdateFrequency,
}

/// Loaded definitions and their current values.
///
/// Call `update_all` once after loading, then `update` with each frequency
/// as the host's variables change.
#[derive(Debug, Clone)]
pub struct CustomUniforms {
    definitions: Vec<CompiledDefinition>,
    /// Current value of every definition, always a `Constant`.
    values: HashMap<String, Expression>,
}

impl CustomUniforms {
    pub fn builder() -> CustomUniformsBuilder {
        CustomUniformsBuilder::default()
    }

    /// Re-evaluate, in declaration order, every definition of `frequency`.
    pub fn update(&mut self, external: &dyn FunctionContext, frequency: UpdateFrequency) {
        self.evaluate(external, Some(frequency));
    }

    /// Re-evaluate every definition in declaration order.
    pub fn update_all(&mut self, external: &dyn FunctionContext) {
        self.evaluate(external, None);
    }

    fn evaluate(&mut self, external: &dyn FunctionContext, only: Option<UpdateFrequency>) {
        let mut out = FunctionReturn::default();
        for def in &self.definitions {
            if only.is_some_and(|f| f != def.frequency) {
                continue;
            }
            let ctx = UniformContext { values: &self.values, external };
            def.expression.evaluate_to(&ctx, &mut out);
            if let Some(Expression::Constant(current)) = self.values.get_mut(&def.name) {
                current.value = out;
            }
        }
    }

    /// Current value of a definition of either kind.
    pub fn value(&self, name: &str) -> Option<Value> {
        match self.values.get(name) {
            Some(Expression::Constant(c)) => Some(c.to_value()),
            _ => None,
        }
    }

    /// Names and current values of the `uniform` definitions, in declaration order.
    pub fn uniforms(&self) -> impl Iterator<Item = (&str, Value)> + '_ {
        self.definitions
            .iter()
            .filter(|d| d.kind == DefinitionKind::Uniform)
            .filter_map(|d| Some((d.name.as_str(), self.value(&d.name)?)))
    }

    pub fn definitions(&self) -> &[CompiledDefinition] {
        &self.definitions
    }

    pub fn definition(&self, name: &str) -> Option<&CompiledDefinition> {
        self.definitions.iter().find(|d| d.name == name)
    }
}

/// Definitions see each other's current values, falling back to the host.
impl FunctionContext for CustomUniforms {
    fn get_variable(&self, name: &str) -> Option<&Expression> {
        self.values.get(name)
    }
}

struct UniformContext<'a> {
    values: &'a HashMap<String, Expression>,
    external: &'a dyn FunctionContext,
}

impl FunctionContext for UniformContext<'_> {
    fn get_variable(&self, name: &str) -> Option<&Expression> {
        self.values.get(name).or_else(|| self.external.get_variable(name))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
