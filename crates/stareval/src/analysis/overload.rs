//! Overload selection.
//!
//! Every overload of the right arity is scored by the number of implicit
//! conversions its arguments need; an argument that cannot convert rejects
//! the overload. The unique cheapest overload wins and a tie at the cheapest
//! score is ambiguous. Only when nothing matches are vector arguments taken
//! apart and the scalar overloads scored again.

use std::sync::Arc;

use crate::error::ResolutionError;
use crate::functions::lifted::lift;
use crate::functions::{FunctionTable, TypedFunction};
use crate::types::Type;

enum Pick<'a> {
    One(&'a Arc<TypedFunction>),
    Tie,
    Nothing,
}

fn pick<'a>(overloads: &'a [Arc<TypedFunction>], args: &[Type]) -> Pick<'a> {
    let mut best: Option<(u32, &Arc<TypedFunction>)> = None;
    let mut tied = false;

    for f in overloads.iter().filter(|f| f.arity() == args.len()) {
        let Some(cost) = score(f, args) else { continue };
        match best {
            Some((lowest, _)) if cost > lowest => {}
            Some((lowest, _)) if cost == lowest => tied = true,
            _ => {
                best = Some((cost, f));
                tied = false;
            }
        }
    }

    match best {
        Some(_) if tied => Pick::Tie,
        Some((_, f)) => Pick::One(f),
        None => Pick::Nothing,
    }
}

/// Total conversions needed to pass `args` to `f`, or `None` if some argument
/// cannot be passed at all.
fn score(f: &TypedFunction, args: &[Type]) -> Option<u32> {
    args.iter().zip(&f.params).map(|(arg, param)| arg.conversion_cost(*param)).sum()
}

/// Choose the overload of `name` for `args`, lifting a scalar overload over
/// vector arguments when no overload matches directly.
pub fn select(
    functions: &FunctionTable,
    name: &str,
    args: &[Type],
    position: usize,
) -> Result<Arc<TypedFunction>, ResolutionError> {
    let overloads = functions.overloads(name);
    if overloads.is_empty() {
        return Err(ResolutionError::UnknownIdentifier { name: name.to_string(), position });
    }

    let ambiguous = || ResolutionError::AmbiguousOverload { name: name.to_string(), args: args.to_vec(), position };
    let no_match = || ResolutionError::NoMatchingOverload { name: name.to_string(), args: args.to_vec(), position };

    match pick(overloads, args) {
        Pick::One(f) => return Ok(Arc::clone(f)),
        Pick::Tie => return Err(ambiguous()),
        Pick::Nothing => {}
    }

    // ── vectorization ─────────────────────────────────────────────────────────
    let mut size = None;
    let mut scalars = Vec::with_capacity(args.len());
    for arg in args {
        match *arg {
            Type::Primitive(_) => scalars.push(*arg),
            Type::Vector(element, n) => {
                if size.is_some_and(|s| s != n) {
                    return Err(no_match());
                }
                size = Some(n);
                scalars.push(Type::Primitive(element));
            }
            Type::Object(_) => return Err(no_match()),
        }
    }
    let Some(size) = size else { return Err(no_match()) };

    match pick(overloads, &scalars) {
        Pick::One(f) => lift(Arc::clone(f), args, size as usize).map(Arc::new).ok_or_else(no_match),
        Pick::Tie => Err(ambiguous()),
        Pick::Nothing => Err(no_match()),
    }
}

// ─── Tests ───────────────────────────────────────────────────────────────────
