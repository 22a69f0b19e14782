//! Primitive basis
//!
//! The fixed registry of host-level functions and constants installed into
//! the root environment once at startup. Each primitive validates its own
//! argument count and variants; I/O primitives go through the injected
//! `Channels`, the same source and sink the reader and driver use.

use std::io::Write;

use crate::environment::Environment;
use crate::error::{MinimError, MinimResult};
use crate::interner::InternedSymbol;
use crate::language::{self, cons, is_atom, Primitive, Value};
use crate::stream::Channels;

// ============================================================================
// Shape-Checking Helpers
// ============================================================================

fn check_arity_exact(name: &str, args: &[Value], expected: usize) -> MinimResult<()> {
    if args.len() != expected {
        return Err(MinimError::Type(format!(
            "{name}: expected {expected} argument{}, got {}",
            if expected == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

fn check_arity_min(name: &str, args: &[Value], min: usize) -> MinimResult<()> {
    if args.len() < min {
        return Err(MinimError::Type(format!(
            "{name}: expected at least {min} argument{}, got {}",
            if min == 1 { "" } else { "s" },
            args.len()
        )));
    }
    Ok(())
}

fn expect_int(name: &str, value: &Value) -> MinimResult<i64> {
    match value {
        Value::Int(n) => Ok(*n),
        _ => Err(MinimError::Type(format!(
            "{name}: expected integer, got {value}"
        ))),
    }
}

fn expect_symbol(name: &str, value: &Value) -> MinimResult<InternedSymbol> {
    match value {
        Value::Symbol(s) => Ok(*s),
        _ => Err(MinimError::Type(format!(
            "{name}: expected symbol, got {value}"
        ))),
    }
}

// ============================================================================
// Character I/O
// ============================================================================

/// (getchar) - read one character from the shared input source.
/// Returns its code, or -1 once the source is exhausted. End of input is
/// never an error here, and a second call at end of input also yields -1.
fn prim_getchar(args: &[Value], io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("getchar", args, 0)?;
    match io.input.next()? {
        Some(c) => Ok(Value::Int(c as i64)),
        None => Ok(Value::Int(-1)),
    }
}

/// (print x) - write the value's textual rendering to the output sink.
/// No trailing newline; returns the symbol `ok`.
fn prim_print(args: &[Value], io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("print", args, 1)?;
    write!(io.output, "{}", args[0]).map_err(|e| MinimError::Io(e.to_string()))?;
    io.output
        .flush()
        .map_err(|e| MinimError::Io(e.to_string()))?;
    Ok(Value::symbol("ok"))
}

/// (itoc n) - character code to one-character symbol.
fn prim_itoc(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("itoc", args, 1)?;
    let code = expect_int("itoc", &args[0])?;
    let c = u32::try_from(code)
        .ok()
        .and_then(char::from_u32)
        .ok_or_else(|| MinimError::Type(format!("itoc: {code} is not a character code")))?;
    Ok(Value::symbol(&c.to_string()))
}

/// (cat a b) - concatenate two symbol names.
fn prim_cat(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("cat", args, 2)?;
    let left = expect_symbol("cat", &args[0])?;
    let right = expect_symbol("cat", &args[1])?;
    let joined = left.with_str(|l| right.with_str(|r| format!("{l}{r}")));
    Ok(Value::symbol(&joined))
}

// ============================================================================
// Pairs and Predicates
// ============================================================================

fn prim_cons(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("cons", args, 2)?;
    Ok(cons(args[0].clone(), args[1].clone()))
}

fn prim_car(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("car", args, 1)?;
    language::car(&args[0])
}

fn prim_cdr(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("cdr", args, 1)?;
    language::cdr(&args[0])
}

fn prim_atom(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("atom", args, 1)?;
    Ok(Value::Bool(is_atom(&args[0])))
}

/// (eq a b) - atom identity. Pairs are never eq, even to themselves.
fn prim_eq(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_exact("eq", args, 2)?;
    let result = match (&args[0], &args[1]) {
        (Value::Cons(_), _) | (_, Value::Cons(_)) => false,
        (a, b) => a == b,
    };
    Ok(Value::Bool(result))
}

// ============================================================================
// Arithmetic and Comparison
// ============================================================================

fn fold_arithmetic(
    name: &'static str,
    args: &[Value],
    op: fn(i64, i64) -> Option<i64>,
) -> MinimResult<Value> {
    check_arity_min(name, args, 2)?;
    let mut acc = expect_int(name, &args[0])?;
    for arg in &args[1..] {
        let n = expect_int(name, arg)?;
        acc = op(acc, n)
            .ok_or_else(|| MinimError::Type(format!("{name}: integer overflow")))?;
    }
    Ok(Value::Int(acc))
}

fn prim_add(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    fold_arithmetic("+", args, i64::checked_add)
}

fn prim_sub(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    fold_arithmetic("-", args, i64::checked_sub)
}

fn prim_mul(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    fold_arithmetic("*", args, i64::checked_mul)
}

fn prim_div(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    check_arity_min("/", args, 2)?;
    let mut acc = expect_int("/", &args[0])?;
    for arg in &args[1..] {
        let n = expect_int("/", arg)?;
        if n == 0 {
            return Err(MinimError::Type("/: division by zero".to_string()));
        }
        acc = acc
            .checked_div(n)
            .ok_or_else(|| MinimError::Type("/: integer overflow".to_string()))?;
    }
    Ok(Value::Int(acc))
}

fn compare(name: &str, args: &[Value], op: fn(i64, i64) -> bool) -> MinimResult<Value> {
    check_arity_exact(name, args, 2)?;
    let a = expect_int(name, &args[0])?;
    let b = expect_int(name, &args[1])?;
    Ok(Value::Bool(op(a, b)))
}

fn prim_lt(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    compare("<", args, |a, b| a < b)
}

fn prim_gt(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    compare(">", args, |a, b| a > b)
}

fn prim_num_eq(args: &[Value], _io: &mut Channels) -> MinimResult<Value> {
    compare("=", args, |a, b| a == b)
}

// ============================================================================
// Registration
// ============================================================================

fn define_primitive(env: &Environment, name: &'static str, func: crate::language::NativeFn) {
    env.define(
        InternedSymbol::new(name),
        Value::Primitive(Primitive { name, func }),
    );
}

/// Install every primitive and constant into the root frame. Called once
/// at startup; the root frame is never replaced afterwards.
pub fn register_basis(env: &Environment) {
    // Character I/O
    define_primitive(env, "getchar", prim_getchar);
    define_primitive(env, "print", prim_print);
    define_primitive(env, "itoc", prim_itoc);
    define_primitive(env, "cat", prim_cat);

    // Pairs and predicates
    define_primitive(env, "cons", prim_cons);
    define_primitive(env, "car", prim_car);
    define_primitive(env, "cdr", prim_cdr);
    define_primitive(env, "atom", prim_atom);
    define_primitive(env, "eq", prim_eq);

    // Arithmetic and comparison
    define_primitive(env, "+", prim_add);
    define_primitive(env, "-", prim_sub);
    define_primitive(env, "*", prim_mul);
    define_primitive(env, "/", prim_div);
    define_primitive(env, "<", prim_lt);
    define_primitive(env, ">", prim_gt);
    define_primitive(env, "=", prim_num_eq);

    // Non-callable constants
    env.define(InternedSymbol::new("empty-symbol"), Value::symbol(""));
}
