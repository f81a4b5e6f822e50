/// Inline payload for non-scalar values. Sized for the largest type (`mat4`)
/// so that writing any value never allocates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Object {
    #[default]
    Empty,
    FloatVec([f32; 4]),
    IntVec([i32; 4]),
    BoolVec([bool; 4]),
    Mat2([f32; 4]),
    Mat3([f32; 9]),
    Mat4([f32; 16]),
}

impl Object {
    pub fn floats(&self) -> &[f32] {
        match self {
            Object::FloatVec(v) => v,
            Object::Mat2(m) => m,
            Object::Mat3(m) => m,
            Object::Mat4(m) => m,
            _ => &[],
        }
    }
}

/// Reusable output register for evaluation.
///
/// Exactly one field is meaningful after `Expression::evaluate_to`, selected
/// by the static type of the node that wrote it. Keep one per evaluation call
/// chain; never share between threads.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FunctionReturn {
    pub boolean: bool,
    pub int: i32,
    pub float: f32,
    pub object: Object,
}

/// Owned snapshot of a value, read out of a `FunctionReturn` through its `Type`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Bool(bool),
    Int(i32),
    Float(f32),
    BoolVec(Vec<bool>),
    IntVec(Vec<i32>),
    FloatVec(Vec<f32>),
    /// Column-major matrix elements.
    Matrix(Vec<f32>),
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn list<T: std::fmt::Display>(f: &mut std::fmt::Formatter<'_>, items: &[T]) -> std::fmt::Result {
            f.write_str("(")?;
            for (i, v) in items.iter().enumerate() {
                if i > 0 { f.write_str(", ")?; }
                write!(f, "{v}")?;
            }
            f.write_str(")")
        }
        match self {
            Value::Bool(b)      => write!(f, "{b}"),
            Value::Int(i)       => write!(f, "{i}"),
            Value::Float(x)     => write!(f, "{x}"),
            Value::BoolVec(v)   => list(f, v),
            Value::IntVec(v)    => list(f, v),
            Value::FloatVec(v)  => list(f, v),
            Value::Matrix(m)    => list(f, m),
        }
    }
}
