//! Operator table consulted by the lexer and parser.
//!
//! Priorities and associativity are data here rather than behavior on the
//! operator tags, so a host can reshape the grammar without touching them.

use crate::syntax::token::{BinaryOp, UnaryOp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Associativity {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinaryOperatorDef {
    pub symbol: &'static str,
    pub op: BinaryOp,
    /// Higher binds tighter.
    pub priority: u8,
    pub associativity: Associativity,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnaryOperatorDef {
    pub symbol: &'static str,
    pub op: UnaryOp,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserOptions {
    pub binary_operators: Vec<BinaryOperatorDef>,
    pub unary_operators: Vec<UnaryOperatorDef>,
}

impl ParserOptions {
    pub fn standard() -> Self {
        use Associativity::Left;
        let bin = |symbol: &'static str, op: BinaryOp, priority: u8| BinaryOperatorDef { symbol, op, priority, associativity: Left };
        Self {
            binary_operators: vec![
                bin("||", BinaryOp::Or,    1),
                bin("&&", BinaryOp::And,   2),
                bin("==", BinaryOp::Eq,    3),
                bin("!=", BinaryOp::NotEq, 3),
                bin("<",  BinaryOp::Lt,    4),
                bin("<=", BinaryOp::LtEq,  4),
                bin(">",  BinaryOp::Gt,    4),
                bin(">=", BinaryOp::GtEq,  4),
                bin("+",  BinaryOp::Add,   5),
                bin("-",  BinaryOp::Sub,   5),
                bin("*",  BinaryOp::Mul,   6),
                bin("/",  BinaryOp::Div,   6),
                bin("%",  BinaryOp::Mod,   6),
            ],
            unary_operators: vec![
                UnaryOperatorDef { symbol: "-", op: UnaryOp::Neg },
                UnaryOperatorDef { symbol: "!", op: UnaryOp::Not },
            ],
        }
    }

    pub fn binary(&self, op: BinaryOp) -> Option<&BinaryOperatorDef> {
        self.binary_operators.iter().find(|d| d.op == op)
    }

    /// Longest binary operator symbol that prefixes `rest`.
    pub fn match_binary(&self, rest: &[u8]) -> Option<&BinaryOperatorDef> {
        self.binary_operators
            .iter()
            .filter(|d| rest.starts_with(d.symbol.as_bytes()))
            .max_by_key(|d| d.symbol.len())
    }

    /// Longest unary operator symbol that prefixes `rest`.
    pub fn match_unary(&self, rest: &[u8]) -> Option<&UnaryOperatorDef> {
        self.unary_operators
            .iter()
            .filter(|d| rest.starts_with(d.symbol.as_bytes()))
            .max_by_key(|d| d.symbol.len())
    }
}

impl Default for ParserOptions {
    fn default() -> Self { Self::standard() }
}
