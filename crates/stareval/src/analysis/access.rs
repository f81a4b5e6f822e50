//! `base.member` and `base[n]` lookup.
//!
//! Vectors expose single components through the `xyzw`, `rgba` and `stpq`
//! sets or an integer literal index; matrices expose columns through an
//! integer literal index only.

use crate::error::ResolutionError;
use crate::runtime::expression::{AccessExpression, Expression};
use crate::syntax::element::Element;
use crate::types::{Primitive, Type};

const COMPONENT_SETS: [[char; 4]; 3] = [
    ['x', 'y', 'z', 'w'],
    ['r', 'g', 'b', 'a'],
    ['s', 't', 'p', 'q'],
];

/// Index named by a single-letter component selector.
pub fn component_index(member: &str) -> Option<usize> {
    let mut chars = member.chars();
    let (Some(c), None) = (chars.next(), chars.next()) else { return None };
    COMPONENT_SETS.iter().find_map(|set| set.iter().position(|&s| s == c))
}

enum Selector {
    Named(usize),
    Indexed(usize),
}

pub fn resolve_access(base: Expression, index: &Element, position: usize) -> Result<Expression, ResolutionError> {
    let ty = base.ty();
    let no_member = |member: String| ResolutionError::NoSuchMember { ty, member, position };

    let (selector, member) = match index {
        Element::Id { name, .. } => match component_index(name) {
            Some(i) => (Selector::Named(i), name.clone()),
            None => return Err(no_member(name.clone())),
        },
        Element::Number { text, position } => {
            if text.contains('.') || text.ends_with(['f', 'F']) {
                return Err(ResolutionError::TypeMismatch { expected: Type::INT, found: Type::FLOAT, position: *position });
            }
            match text.parse::<usize>() {
                Ok(i) => (Selector::Indexed(i), text.clone()),
                Err(_) => return Err(no_member(text.clone())),
            }
        }
        other => return Err(no_member(other.to_string())),
    };

    let (index, element_ty) = match (ty, selector) {
        (Type::Vector(element, n), Selector::Named(i) | Selector::Indexed(i)) if i < n as usize => {
            (i, Type::Primitive(element))
        }
        (Type::Object(matrix), Selector::Indexed(i)) if i < matrix.dimension() => {
            match Type::vector(Primitive::Float, matrix.dimension()) {
                Some(column) => (i, column),
                None => return Err(no_member(member)),
            }
        }
        _ => return Err(no_member(member)),
    };

    Ok(Expression::ElementAccess(Box::new(AccessExpression { base, index, ty: element_ty })))
}

// ─── Tests ───────────────────────────────────────────────────────────────────
