use std::fmt;
use std::sync::Arc;

use crate::environment::Environment;
use crate::error::{MinimError, MinimResult};
use crate::interner::InternedSymbol;
use crate::stream::Channels;

// ============================================================================
// Core Type System
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct ConsCell {
    pub car: Value,
    pub cdr: Value,
}

#[derive(Clone)]
pub struct LambdaCell {
    pub params: Vec<InternedSymbol>,
    pub body: Vec<Value>,
    pub env: Environment,
}

// Manual implementations since Environment uses RwLock (doesn't impl Debug/PartialEq)
impl fmt::Debug for LambdaCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LambdaCell")
            .field("params", &self.params)
            .field("body", &self.body)
            .field("env", &"<environment>")
            .finish()
    }
}

impl PartialEq for LambdaCell {
    fn eq(&self, other: &Self) -> bool {
        // Compare only params and body, not environment
        // (environments with the same bindings but different Arc pointers would differ)
        self.params == other.params && self.body == other.body
    }
}

/// Host function type - Rust functions callable from Minim.
///
/// Arguments arrive already evaluated, left to right. I/O primitives read
/// and write through the injected `Channels`; everything else ignores it.
pub type NativeFn = fn(&[Value], &mut Channels) -> MinimResult<Value>;

/// A named host-level function installed in the basis. The name is carried
/// for diagnostics: every shape error a primitive raises starts with it.
#[derive(Clone, Copy)]
pub struct Primitive {
    pub name: &'static str,
    pub func: NativeFn,
}

impl fmt::Debug for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Primitive({})", self.name)
    }
}

impl PartialEq for Primitive {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && std::ptr::eq(self.func as *const (), other.func as *const ())
    }
}

#[derive(Clone, Debug)]
pub enum Value {
    Int(i64),
    Symbol(InternedSymbol),
    Bool(bool),
    Nil,
    Cons(Arc<ConsCell>),
    Lambda(Arc<LambdaCell>),
    Primitive(Primitive),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Symbol(a), Value::Symbol(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Nil, Value::Nil) => true,
            (Value::Cons(a), Value::Cons(b)) => a == b,
            (Value::Lambda(a), Value::Lambda(b)) => a == b,
            (Value::Primitive(a), Value::Primitive(b)) => a == b,
            _ => false,
        }
    }
}

impl Value {
    /// Make a symbol value, interning the name.
    pub fn symbol(name: &str) -> Value {
        Value::Symbol(InternedSymbol::new(name))
    }
}

// ============================================================================
// Display Implementation
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Symbol(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{}", if *b { "t" } else { "nil" }),
            Value::Nil => write!(f, "nil"),
            Value::Cons(_) => {
                write!(f, "(")?;
                let mut current = self.clone();
                while let Value::Cons(ref cell) = current {
                    write!(f, "{}", cell.car)?;
                    match cell.cdr {
                        Value::Nil => break,
                        Value::Cons(_) => {
                            write!(f, " ")?;
                            current = cell.cdr.clone();
                        }
                        ref other => {
                            write!(f, " . {other}")?;
                            break;
                        }
                    }
                }
                write!(f, ")")
            }
            Value::Lambda(_) => write!(f, "<lambda>"),
            Value::Primitive(p) => write!(f, "<primitive:{}>", p.name),
        }
    }
}

// ============================================================================
// Pair Operations
// ============================================================================

pub fn cons(car: Value, cdr: Value) -> Value {
    Value::Cons(Arc::new(ConsCell { car, cdr }))
}

pub fn car(value: &Value) -> MinimResult<Value> {
    match value {
        Value::Cons(cell) => Ok(cell.car.clone()),
        _ => Err(MinimError::Type(format!("car: expected pair, got {value}"))),
    }
}

pub fn cdr(value: &Value) -> MinimResult<Value> {
    match value {
        Value::Cons(cell) => Ok(cell.cdr.clone()),
        _ => Err(MinimError::Type(format!("cdr: expected pair, got {value}"))),
    }
}

pub fn is_atom(value: &Value) -> bool {
    !matches!(value, Value::Cons(_))
}

/// Everything is true except nil and the false boolean.
pub fn is_truthy(value: &Value) -> bool {
    !matches!(value, Value::Nil | Value::Bool(false))
}

/// Convert a proper list to a Vec. Fails on improper lists.
pub fn list_to_vec(list: &Value) -> MinimResult<Vec<Value>> {
    let mut result = Vec::new();
    let mut current = list.clone();

    while let Value::Cons(ref cell) = current {
        result.push(cell.car.clone());
        current = cell.cdr.clone();
    }

    if current != Value::Nil {
        return Err(MinimError::Type(format!(
            "expected proper list, got improper tail {current}"
        )));
    }

    Ok(result)
}

/// Build a proper list from a Vec.
pub fn vec_to_list(items: Vec<Value>) -> Value {
    items
        .into_iter()
        .rev()
        .fold(Value::Nil, |acc, item| cons(item, acc))
}
