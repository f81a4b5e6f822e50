use thiserror::Error;

use crate::types::Type;

/// Error codes prefixed by phase: L = lexer, P = parser, S = resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Lexer
    L001, // unexpected character
    L002, // malformed number literal

    // Parser
    P001, // unexpected token
    P002, // missing or unbalanced bracket
    P003, // bracketed group does not hold exactly one expression
    P004, // missing operand

    // Resolver
    S001, // unknown identifier
    S002, // type mismatch
    S003, // no matching overload
    S004, // ambiguous overload
    S005, // invalid literal
    S006, // no such member
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::L001 => "L001",
            Self::L002 => "L002",
            Self::P001 => "P001",
            Self::P002 => "P002",
            Self::P003 => "P003",
            Self::P004 => "P004",
            Self::S001 => "S001",
            Self::S002 => "S002",
            Self::S003 => "S003",
            Self::S004 => "S004",
            Self::S005 => "S005",
            Self::S006 => "S006",
        }
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ─── Lexer ────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] at {position}: {message}")]
pub struct LexError {
    pub code: ErrorCode,
    /// Byte offset into the source text.
    pub position: usize,
    pub message: String,
}

impl LexError {
    pub fn new(code: ErrorCode, position: usize, message: impl Into<String>) -> Self {
        Self { code, position, message: message.into() }
    }
}

// ─── Parser ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{code}] at {position}: {message}")]
pub struct ParseError {
    pub code: ErrorCode,
    pub position: usize,
    pub message: String,
}

impl ParseError {
    pub fn new(code: ErrorCode, position: usize, message: impl Into<String>) -> Self {
        Self { code, position, message: message.into() }
    }
}

// ─── Resolver ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolutionError {
    #[error("[S001] at {position}: unknown identifier `{name}`")]
    UnknownIdentifier { name: String, position: usize },

    #[error("[S002] at {position}: expected `{expected}`, found `{found}`")]
    TypeMismatch { expected: Type, found: Type, position: usize },

    #[error("[S003] at {position}: no overload of `{name}` accepts ({})", type_list(.args))]
    NoMatchingOverload { name: String, args: Vec<Type>, position: usize },

    #[error("[S004] at {position}: call to `{name}` with ({}) is ambiguous", type_list(.args))]
    AmbiguousOverload { name: String, args: Vec<Type>, position: usize },

    #[error("[S005] at {position}: invalid numeric literal `{text}`")]
    InvalidLiteral { text: String, position: usize },

    #[error("[S006] at {position}: `{ty}` has no member `{member}`")]
    NoSuchMember { ty: Type, member: String, position: usize },
}

impl ResolutionError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::UnknownIdentifier { .. }  => ErrorCode::S001,
            Self::TypeMismatch { .. }       => ErrorCode::S002,
            Self::NoMatchingOverload { .. } => ErrorCode::S003,
            Self::AmbiguousOverload { .. }  => ErrorCode::S004,
            Self::InvalidLiteral { .. }     => ErrorCode::S005,
            Self::NoSuchMember { .. }       => ErrorCode::S006,
        }
    }

    pub fn position(&self) -> usize {
        match self {
            Self::UnknownIdentifier { position, .. }
            | Self::TypeMismatch { position, .. }
            | Self::NoMatchingOverload { position, .. }
            | Self::AmbiguousOverload { position, .. }
            | Self::InvalidLiteral { position, .. }
            | Self::NoSuchMember { position, .. } => *position,
        }
    }
}

fn type_list(types: &[Type]) -> String {
    types.iter().map(Type::name).collect::<Vec<_>>().join(", ")
}

// ─────────────────────────────────────────────────────────────────────────────

/// Any failure while turning source text into an evaluable expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Resolve(#[from] ResolutionError),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Lex(e)     => e.code,
            Self::Parse(e)   => e.code,
            Self::Resolve(e) => e.code(),
        }
    }
}
