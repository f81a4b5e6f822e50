use crate::syntax::token::{BinaryOp, UnaryOp};

/// Untyped syntax tree produced by the parser. Every node records the byte
/// offset of the source text it came from for error reporting.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// `base.member` (index is an `Id`) or `base[index]`
    Access {
        base: Box<Element>,
        index: Box<Element>,
        position: usize,
    },

    /// `a + b`, `a == b`, etc.
    Binary {
        op: BinaryOp,
        left: Box<Element>,
        right: Box<Element>,
        position: usize,
    },

    /// `-x`, `!x`
    Unary {
        op: UnaryOp,
        inner: Box<Element>,
        position: usize,
    },

    /// `name(args)`
    FunctionCall {
        id: String,
        args: Vec<Element>,
        position: usize,
    },

    Id {
        name: String,
        position: usize,
    },

    /// Literal text as written; typed by the resolver.
    Number {
        text: String,
        position: usize,
    },
}

impl Element {
    pub fn position(&self) -> usize {
        match self {
            Element::Access { position, .. }
            | Element::Binary { position, .. }
            | Element::Unary { position, .. }
            | Element::FunctionCall { position, .. }
            | Element::Id { position, .. }
            | Element::Number { position, .. } => *position,
        }
    }
}

/// Fully parenthesised rendering, e.g. `(2 + (3 * 4))`.
impl std::fmt::Display for Element {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Element::Access { base, index, .. } => match index.as_ref() {
                Element::Id { name, .. } => write!(f, "{base}.{name}"),
                other => write!(f, "{base}[{other}]"),
            },
            Element::Binary { op, left, right, .. } => write!(f, "({left} {} {right})", op.symbol()),
            Element::Unary { op, inner, .. } => write!(f, "{}{inner}", op.symbol()),
            Element::FunctionCall { id, args, .. } => {
                write!(f, "{id}(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 { f.write_str(", ")?; }
                    write!(f, "{arg}")?;
                }
                f.write_str(")")
            }
            Element::Id { name, .. } => f.write_str(name),
            Element::Number { text, .. } => f.write_str(text),
        }
    }
}
