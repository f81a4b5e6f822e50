//! Static type system: the closed set of value kinds an expression can have.
//!
//! Consumed by:
//!   • The resolver: overload scoring and implicit conversions (compile-time)
//!   • The evaluator: reading/writing `FunctionReturn` slots (runtime)

pub mod mat;

use crate::runtime::value::{FunctionReturn, Object, Value};

// ─── Primitive ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Primitive {
    Float,
    Int,
    Boolean,
}

impl Primitive {
    pub const ALL: [Primitive; 3] = [Primitive::Float, Primitive::Int, Primitive::Boolean];

    /// Convert the scalar held in `slot` from `self` to `to` in place.
    /// Only conversions accepted by `Type::conversion_cost` are meaningful.
    pub fn coerce(self, to: Primitive, slot: &mut FunctionReturn) {
        match (self, to) {
            (Primitive::Int, Primitive::Float)   => slot.float = slot.int as f32,
            (Primitive::Int, Primitive::Boolean) => slot.boolean = slot.int != 0,
            (Primitive::Float, Primitive::Int)   => slot.int = slot.float as i32,
            (Primitive::Boolean, Primitive::Int) => slot.int = slot.boolean as i32,
            _ => {}
        }
    }

    /// Copy component `index` of the vector in `vector` into the scalar field of `dst`.
    pub fn read_component(self, vector: &FunctionReturn, index: usize, dst: &mut FunctionReturn) {
        match (self, &vector.object) {
            (Primitive::Float, Object::FloatVec(v))  => dst.float = v.get(index).copied().unwrap_or_default(),
            (Primitive::Int, Object::IntVec(v))      => dst.int = v.get(index).copied().unwrap_or_default(),
            (Primitive::Boolean, Object::BoolVec(v)) => dst.boolean = v.get(index).copied().unwrap_or_default(),
            (Primitive::Float, _)   => dst.float = 0.0,
            (Primitive::Int, _)     => dst.int = 0,
            (Primitive::Boolean, _) => dst.boolean = false,
        }
    }

    /// Store the scalar field of `src` as component `index` of the vector in `out`.
    pub fn write_component(self, src: &FunctionReturn, index: usize, out: &mut FunctionReturn) {
        match self {
            Primitive::Float => {
                if !matches!(out.object, Object::FloatVec(_)) { out.object = Object::FloatVec([0.0; 4]); }
                if let Object::FloatVec(v) = &mut out.object { if let Some(c) = v.get_mut(index) { *c = src.float; } }
            }
            Primitive::Int => {
                if !matches!(out.object, Object::IntVec(_)) { out.object = Object::IntVec([0; 4]); }
                if let Object::IntVec(v) = &mut out.object { if let Some(c) = v.get_mut(index) { *c = src.int; } }
            }
            Primitive::Boolean => {
                if !matches!(out.object, Object::BoolVec(_)) { out.object = Object::BoolVec([false; 4]); }
                if let Object::BoolVec(v) = &mut out.object { if let Some(c) = v.get_mut(index) { *c = src.boolean; } }
            }
        }
    }
}

// ─── Object types ─────────────────────────────────────────────────────────────

/// Opaque values the core only moves around; matrices are column-major.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ObjectType {
    Mat2,
    Mat3,
    Mat4,
}

impl ObjectType {
    pub fn dimension(self) -> usize {
        match self {
            ObjectType::Mat2 => 2,
            ObjectType::Mat3 => 3,
            ObjectType::Mat4 => 4,
        }
    }

    pub fn matrix(dimension: usize) -> Option<ObjectType> {
        match dimension {
            2 => Some(ObjectType::Mat2),
            3 => Some(ObjectType::Mat3),
            4 => Some(ObjectType::Mat4),
            _ => None,
        }
    }
}

// ─── Type ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Type {
    Primitive(Primitive),
    /// Element primitive and component count (2..=4).
    Vector(Primitive, u8),
    Object(ObjectType),
}

impl Type {
    pub const FLOAT: Type = Type::Primitive(Primitive::Float);
    pub const INT: Type = Type::Primitive(Primitive::Int);
    pub const BOOLEAN: Type = Type::Primitive(Primitive::Boolean);

    /// Every type a value can have, scalars first.
    pub const ALL: [Type; 15] = [
        Type::FLOAT,
        Type::INT,
        Type::BOOLEAN,
        Type::Vector(Primitive::Float, 2),
        Type::Vector(Primitive::Float, 3),
        Type::Vector(Primitive::Float, 4),
        Type::Vector(Primitive::Int, 2),
        Type::Vector(Primitive::Int, 3),
        Type::Vector(Primitive::Int, 4),
        Type::Vector(Primitive::Boolean, 2),
        Type::Vector(Primitive::Boolean, 3),
        Type::Vector(Primitive::Boolean, 4),
        Type::Object(ObjectType::Mat2),
        Type::Object(ObjectType::Mat3),
        Type::Object(ObjectType::Mat4),
    ];

    /// The vector type of `size` components of `element`, if such a type exists.
    pub fn vector(element: Primitive, size: usize) -> Option<Type> {
        match size {
            2..=4 => Some(Type::Vector(element, size as u8)),
            _ => None,
        }
    }

    pub fn primitive(self) -> Option<Primitive> {
        match self {
            Type::Primitive(p) => Some(p),
            _ => None,
        }
    }

    /// Element primitive of a vector type.
    pub fn element(self) -> Option<Primitive> {
        match self {
            Type::Vector(p, _) => Some(p),
            _ => None,
        }
    }

    /// Component count of a vector type; 1 for everything else.
    pub fn size(self) -> usize {
        match self {
            Type::Vector(_, n) => n as usize,
            _ => 1,
        }
    }

    pub fn is_vector(self) -> bool {
        matches!(self, Type::Vector(..))
    }

    /// False for a vector built directly with a size outside `2..=4`.
    pub fn is_valid(self) -> bool {
        !matches!(self, Type::Vector(_, n) if !(2..=4).contains(&n))
    }

    /// Number of implicit conversions needed to pass a `self` where `to` is
    /// expected: 0 when equal, 1 for `int → float` and `int → bool`,
    /// `None` when no implicit conversion exists.
    pub fn conversion_cost(self, to: Type) -> Option<u32> {
        if self == to {
            return Some(0);
        }
        match (self, to) {
            (Type::Primitive(Primitive::Int), Type::Primitive(Primitive::Float | Primitive::Boolean)) => Some(1),
            _ => None,
        }
    }

    pub fn implicitly_converts_to(self, to: Type) -> bool {
        self.conversion_cost(to) == Some(1)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Type::Primitive(Primitive::Float)   => "float",
            Type::Primitive(Primitive::Int)     => "int",
            Type::Primitive(Primitive::Boolean) => "bool",
            Type::Vector(Primitive::Float, 2)   => "vec2",
            Type::Vector(Primitive::Float, 3)   => "vec3",
            Type::Vector(Primitive::Float, _)   => "vec4",
            Type::Vector(Primitive::Int, 2)     => "ivec2",
            Type::Vector(Primitive::Int, 3)     => "ivec3",
            Type::Vector(Primitive::Int, _)     => "ivec4",
            Type::Vector(Primitive::Boolean, 2) => "bvec2",
            Type::Vector(Primitive::Boolean, 3) => "bvec3",
            Type::Vector(Primitive::Boolean, _) => "bvec4",
            Type::Object(ObjectType::Mat2)      => "mat2",
            Type::Object(ObjectType::Mat3)      => "mat3",
            Type::Object(ObjectType::Mat4)      => "mat4",
        }
    }

    /// Parse a GLSL-style type name (`float`, `ivec3`, `mat4`, …).
    /// `boolean` is accepted as an alias of `bool`.
    pub fn from_name(name: &str) -> Option<Type> {
        if name == "boolean" {
            return Some(Type::BOOLEAN);
        }
        Type::ALL.into_iter().find(|t| t.name() == name)
    }

    /// A slot holding this type's zero value.
    pub fn default_value(self) -> FunctionReturn {
        let mut out = FunctionReturn::default();
        out.object = match self {
            Type::Primitive(_) => Object::Empty,
            Type::Vector(Primitive::Float, _)   => Object::FloatVec([0.0; 4]),
            Type::Vector(Primitive::Int, _)     => Object::IntVec([0; 4]),
            Type::Vector(Primitive::Boolean, _) => Object::BoolVec([false; 4]),
            Type::Object(ObjectType::Mat2) => Object::Mat2([0.0; 4]),
            Type::Object(ObjectType::Mat3) => Object::Mat3([0.0; 9]),
            Type::Object(ObjectType::Mat4) => Object::Mat4([0.0; 16]),
        };
        out
    }

    /// Read the field of `slot` that a value of this type occupies.
    pub fn load(self, slot: &FunctionReturn) -> Value {
        match self {
            Type::Primitive(Primitive::Float)   => Value::Float(slot.float),
            Type::Primitive(Primitive::Int)     => Value::Int(slot.int),
            Type::Primitive(Primitive::Boolean) => Value::Bool(slot.boolean),
            Type::Vector(p, n) => {
                let n = (n as usize).min(4);
                match (p, &slot.object) {
                    (Primitive::Float, Object::FloatVec(v))  => Value::FloatVec(v[..n].to_vec()),
                    (Primitive::Int, Object::IntVec(v))      => Value::IntVec(v[..n].to_vec()),
                    (Primitive::Boolean, Object::BoolVec(v)) => Value::BoolVec(v[..n].to_vec()),
                    _ => self.load(&self.default_value()),
                }
            }
            Type::Object(o) => match (o, &slot.object) {
                (ObjectType::Mat2, Object::Mat2(m)) => Value::Matrix(m.to_vec()),
                (ObjectType::Mat3, Object::Mat3(m)) => Value::Matrix(m.to_vec()),
                (ObjectType::Mat4, Object::Mat4(m)) => Value::Matrix(m.to_vec()),
                _ => Value::Matrix(vec![0.0; o.dimension() * o.dimension()]),
            },
        }
    }

    /// Write `value` into `slot`. Returns `false` (leaving `slot` untouched)
    /// when the value's shape does not fit this type.
    pub fn store(self, value: &Value, slot: &mut FunctionReturn) -> bool {
        if !self.is_valid() {
            return false;
        }
        match (self, value) {
            (Type::Primitive(Primitive::Float), Value::Float(x))  => slot.float = *x,
            (Type::Primitive(Primitive::Int), Value::Int(x))      => slot.int = *x,
            (Type::Primitive(Primitive::Boolean), Value::Bool(x)) => slot.boolean = *x,
            (Type::Vector(Primitive::Float, n), Value::FloatVec(v)) if v.len() == n as usize => {
                let mut a = [0.0; 4];
                a[..v.len()].copy_from_slice(v);
                slot.object = Object::FloatVec(a);
            }
            (Type::Vector(Primitive::Int, n), Value::IntVec(v)) if v.len() == n as usize => {
                let mut a = [0; 4];
                a[..v.len()].copy_from_slice(v);
                slot.object = Object::IntVec(a);
            }
            (Type::Vector(Primitive::Boolean, n), Value::BoolVec(v)) if v.len() == n as usize => {
                let mut a = [false; 4];
                a[..v.len()].copy_from_slice(v);
                slot.object = Object::BoolVec(a);
            }
            (Type::Object(ObjectType::Mat2), Value::Matrix(m)) if m.len() == 4 => {
                let mut a = [0.0; 4];
                a.copy_from_slice(m);
                slot.object = Object::Mat2(a);
            }
            (Type::Object(ObjectType::Mat3), Value::Matrix(m)) if m.len() == 9 => {
                let mut a = [0.0; 9];
                a.copy_from_slice(m);
                slot.object = Object::Mat3(a);
            }
            (Type::Object(ObjectType::Mat4), Value::Matrix(m)) if m.len() == 16 => {
                let mut a = [0.0; 16];
                a.copy_from_slice(m);
                slot.object = Object::Mat4(a);
            }
            _ => return false,
        }
        true
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
