//! Operator-precedence (shift/reduce) parser.
//!
//! Operands and partially built nodes live on one explicit stack. A binary
//! operator first reduces every pending operator of higher or equal priority
//! and then parks itself as a `PartialBinary` waiting for its right operand.
//! Calls, groups and index brackets are stack frames that collect the
//! comma-separated expressions between them.

use crate::error::{ErrorCode, ParseError};
use crate::syntax::element::Element;
use crate::syntax::options::{Associativity, ParserOptions};
use crate::syntax::token::{BinaryOp, Token, TokenKind, UnaryOp};

enum StackEntry {
    Element(Element),
    PendingUnary { op: UnaryOp, position: usize },
    PartialBinary { left: Element, op: BinaryOp, priority: u8, position: usize },
    /// `(` that is not a call; must end up holding exactly one expression.
    OpenGroup { items: Vec<Element>, position: usize },
    OpenCall { id: String, args: Vec<Element>, position: usize },
    OpenIndex { base: Element, position: usize },
}

pub struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    options: &'a ParserOptions,
    stack: Vec<StackEntry>,
    expect_operand: bool,
    /// Byte offset reported for errors at end of input.
    end: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: Vec<Token>, options: &'a ParserOptions, source_len: usize) -> Self {
        Self { tokens, pos: 0, options, stack: Vec::new(), expect_operand: true, end: source_len }
    }

    pub fn parse(mut self) -> Result<Element, ParseError> {
        while let Some(tok) = self.next() {
            if self.expect_operand {
                self.shift_operand(tok)?;
            } else {
                self.shift_operator(tok)?;
            }
        }
        self.finish()
    }

    // ─── Operand position ────────────────────────────────────────────────────

    fn shift_operand(&mut self, tok: Token) -> Result<(), ParseError> {
        let position = tok.position;
        match tok.kind {
            TokenKind::Id(name) => {
                if self.peek_is(&TokenKind::LParen) {
                    self.next();
                    self.stack.push(StackEntry::OpenCall { id: name, args: Vec::new(), position });
                } else {
                    self.push_operand(Element::Id { name, position });
                }
            }
            TokenKind::Number(text) => self.push_operand(Element::Number { text, position }),
            TokenKind::UnaryOp(op) => self.stack.push(StackEntry::PendingUnary { op, position }),
            TokenKind::LParen => self.stack.push(StackEntry::OpenGroup { items: Vec::new(), position }),

            TokenKind::RParen => match self.stack.pop() {
                Some(StackEntry::OpenCall { id, args, position }) if args.is_empty() => {
                    self.push_operand(Element::FunctionCall { id, args, position });
                }
                Some(StackEntry::OpenGroup { items, .. }) if items.is_empty() => {
                    return Err(ParseError::new(
                        ErrorCode::P003, position,
                        "parentheses must contain exactly one expression, found none",
                    ));
                }
                _ => return Err(self.missing_operand(position, &TokenKind::RParen)),
            },

            other => return Err(self.missing_operand(position, &other)),
        }
        Ok(())
    }

    fn push_operand(&mut self, element: Element) {
        self.stack.push(StackEntry::Element(element));
        self.expect_operand = false;
    }

    // ─── Operator position ───────────────────────────────────────────────────

    fn shift_operator(&mut self, tok: Token) -> Result<(), ParseError> {
        let position = tok.position;
        match tok.kind {
            TokenKind::BinaryOp(op) => {
                let Some(def) = self.options.binary(op) else {
                    return Err(ParseError::new(
                        ErrorCode::P001, position,
                        format!("operator `{}` is not enabled", op.symbol()),
                    ));
                };
                let min_priority = match def.associativity {
                    Associativity::Left  => def.priority,
                    Associativity::Right => def.priority.saturating_add(1),
                };
                let priority = def.priority;
                self.reduce(min_priority);
                let left = self.pop_element(position)?;
                self.stack.push(StackEntry::PartialBinary { left, op, priority, position });
                self.expect_operand = true;
            }

            TokenKind::Dot => {
                let index = match self.next() {
                    Some(Token { kind: TokenKind::Id(name), position }) => Element::Id { name, position },
                    Some(Token { kind: TokenKind::Number(text), position }) => Element::Number { text, position },
                    Some(t) => {
                        return Err(ParseError::new(
                            ErrorCode::P001, t.position,
                            format!("expected member name after `.`, found {}", t.kind),
                        ));
                    }
                    None => {
                        return Err(ParseError::new(ErrorCode::P004, self.end, "expected member name after `.`"));
                    }
                };
                let base = self.pop_element(position)?;
                self.push_operand(Element::Access { base: Box::new(base), index: Box::new(index), position });
            }

            TokenKind::LBracket => {
                let base = self.pop_element(position)?;
                self.stack.push(StackEntry::OpenIndex { base, position });
                self.expect_operand = true;
            }

            TokenKind::RBracket => {
                self.reduce(0);
                let index = self.pop_element(position)?;
                match self.stack.pop() {
                    Some(StackEntry::OpenIndex { base, position }) => {
                        self.push_operand(Element::Access { base: Box::new(base), index: Box::new(index), position });
                    }
                    _ => return Err(ParseError::new(ErrorCode::P002, position, "unbalanced `]`")),
                }
            }

            TokenKind::Comma => {
                self.reduce(0);
                let item = self.pop_element(position)?;
                match self.stack.last_mut() {
                    Some(StackEntry::OpenCall { args, .. }) => args.push(item),
                    Some(StackEntry::OpenGroup { items, .. }) => items.push(item),
                    _ => {
                        return Err(ParseError::new(
                            ErrorCode::P001, position,
                            "`,` is only allowed between call arguments",
                        ));
                    }
                }
                self.expect_operand = true;
            }

            TokenKind::RParen => {
                self.reduce(0);
                let item = self.pop_element(position)?;
                match self.stack.pop() {
                    Some(StackEntry::OpenCall { id, mut args, position }) => {
                        args.push(item);
                        self.push_operand(Element::FunctionCall { id, args, position });
                    }
                    Some(StackEntry::OpenGroup { mut items, position }) => {
                        items.push(item);
                        if items.len() != 1 {
                            return Err(ParseError::new(
                                ErrorCode::P003, position,
                                format!("parentheses must contain exactly one expression, found {}", items.len()),
                            ));
                        }
                        let inner = items.pop().ok_or_else(|| self.missing_operand(position, &TokenKind::RParen))?;
                        self.push_operand(inner);
                    }
                    _ => return Err(ParseError::new(ErrorCode::P002, position, "unbalanced `)`")),
                }
            }

            other => {
                return Err(ParseError::new(
                    ErrorCode::P001, position,
                    format!("expected an operator, found {other}"),
                ));
            }
        }
        Ok(())
    }

    // ─── Reduction ───────────────────────────────────────────────────────────

    /// Fold pending operators beneath the top operand while their priority is
    /// at least `min_priority`. Unary operators always fold.
    fn reduce(&mut self, min_priority: u8) {
        loop {
            let len = self.stack.len();
            if len < 2 || !matches!(self.stack[len - 1], StackEntry::Element(_)) {
                return;
            }
            let foldable = match &self.stack[len - 2] {
                StackEntry::PendingUnary { .. } => true,
                StackEntry::PartialBinary { priority, .. } => *priority >= min_priority,
                _ => false,
            };
            if !foldable {
                return;
            }
            let Some(StackEntry::Element(operand)) = self.stack.pop() else { return };
            let folded = match self.stack.pop() {
                Some(StackEntry::PendingUnary { op, position }) => {
                    Element::Unary { op, inner: Box::new(operand), position }
                }
                Some(StackEntry::PartialBinary { left, op, position, .. }) => {
                    Element::Binary { op, left: Box::new(left), right: Box::new(operand), position }
                }
                _ => return,
            };
            self.stack.push(StackEntry::Element(folded));
        }
    }

    fn finish(mut self) -> Result<Element, ParseError> {
        if !self.expect_operand {
            self.reduce(0);
        }
        for entry in &self.stack {
            let unclosed = match entry {
                StackEntry::OpenGroup { position, .. } | StackEntry::OpenCall { position, .. } => Some((*position, "`(`")),
                StackEntry::OpenIndex { position, .. } => Some((*position, "`[`")),
                _ => None,
            };
            if let Some((position, what)) = unclosed {
                return Err(ParseError::new(ErrorCode::P002, position, format!("unclosed {what}")));
            }
        }
        if self.expect_operand {
            let message = if self.stack.is_empty() { "empty expression" } else { "expected an operand at end of input" };
            return Err(ParseError::new(ErrorCode::P004, self.end, message));
        }
        match (self.stack.pop(), self.stack.is_empty()) {
            (Some(StackEntry::Element(e)), true) => Ok(e),
            _ => Err(ParseError::new(ErrorCode::P001, self.end, "incomplete expression")),
        }
    }

    // ─── Token primitives ────────────────────────────────────────────────────

    fn next(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).cloned();
        if tok.is_some() { self.pos += 1; }
        tok
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.tokens.get(self.pos).is_some_and(|t| &t.kind == kind)
    }

    fn pop_element(&mut self, position: usize) -> Result<Element, ParseError> {
        match self.stack.pop() {
            Some(StackEntry::Element(e)) => Ok(e),
            other => {
                if let Some(entry) = other { self.stack.push(entry); }
                Err(ParseError::new(ErrorCode::P004, position, "missing operand"))
            }
        }
    }

    fn missing_operand(&self, position: usize, found: &TokenKind) -> ParseError {
        ParseError::new(ErrorCode::P004, position, format!("expected an operand, found {found}"))
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
