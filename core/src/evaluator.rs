//! Recursive evaluator
//!
//! Interprets reader output directly as the AST: special forms are
//! recognized by their head symbol, everything else is function
//! application with strict left-to-right operand evaluation. Malformed
//! special-form shapes fail here with `Type` errors, keeping the reader
//! purely syntactic.

use std::sync::Arc;

use crate::environment::Environment;
use crate::error::{MinimError, MinimResult};
use crate::interner::InternedSymbol;
use crate::language::{is_truthy, list_to_vec, LambdaCell, Value};
use crate::reader::read_sexp;
use crate::stream::Channels;

/// Operand list of a form, as a Vec. Improper operand lists are shape
/// errors carrying the form's name.
fn operands(form: &str, rest: &Value) -> MinimResult<Vec<Value>> {
    list_to_vec(rest)
        .map_err(|_| MinimError::Type(format!("{form}: malformed operand list")))
}

fn eval_quote(rest: &Value) -> MinimResult<Value> {
    let ops = operands("quote", rest)?;
    match ops.as_slice() {
        [arg] => Ok(arg.clone()),
        _ => Err(MinimError::Type(format!(
            "quote: expected exactly 1 operand, got {}",
            ops.len()
        ))),
    }
}

fn eval_if(rest: &Value, env: &Environment, io: &mut Channels) -> MinimResult<Value> {
    let ops = operands("if", rest)?;
    if ops.len() != 2 && ops.len() != 3 {
        return Err(MinimError::Type(format!(
            "if: expected 2 or 3 operands, got {}",
            ops.len()
        )));
    }
    let test = eval(ops[0].clone(), env, io)?;
    if is_truthy(&test) {
        eval(ops[1].clone(), env, io)
    } else if ops.len() == 3 {
        eval(ops[2].clone(), env, io)
    } else {
        Ok(Value::Nil)
    }
}

fn eval_cond(rest: &Value, env: &Environment, io: &mut Channels) -> MinimResult<Value> {
    for clause in operands("cond", rest)? {
        let parts = operands("cond", &clause)?;
        let [test, result] = parts.as_slice() else {
            return Err(MinimError::Type(format!(
                "cond: clause must be (test expr), got {clause}"
            )));
        };
        if is_truthy(&eval(test.clone(), env, io)?) {
            return eval(result.clone(), env, io);
        }
    }
    Ok(Value::Nil)
}

fn eval_lambda(rest: &Value, env: &Environment) -> MinimResult<Value> {
    let ops = operands("lambda", rest)?;
    if ops.len() < 2 {
        return Err(MinimError::Type(
            "lambda: expected a parameter list and at least one body expression".to_string(),
        ));
    }

    let mut params = Vec::new();
    for param in operands("lambda", &ops[0])? {
        match param {
            Value::Symbol(name) => params.push(name),
            other => {
                return Err(MinimError::Type(format!(
                    "lambda: parameter must be a symbol, got {other}"
                )))
            }
        }
    }

    Ok(Value::Lambda(Arc::new(LambdaCell {
        params,
        body: ops[1..].to_vec(),
        env: env.clone(),
    })))
}

fn eval_define(rest: &Value, env: &Environment, io: &mut Channels) -> MinimResult<Value> {
    let ops = operands("define", rest)?;
    let [name_expr, value_expr] = ops.as_slice() else {
        return Err(MinimError::Type(format!(
            "define: expected a name and a value, got {} operands",
            ops.len()
        )));
    };
    let Value::Symbol(name) = name_expr else {
        return Err(MinimError::Type(format!(
            "define: name must be a symbol, got {name_expr}"
        )));
    };
    // Evaluate first, bind after: a failed right-hand side leaves no
    // partial binding behind.
    let value = eval(value_expr.clone(), env, io)?;
    env.define(*name, value.clone());
    Ok(value)
}

fn eval_begin(rest: &Value, env: &Environment, io: &mut Channels) -> MinimResult<Value> {
    let mut result = Value::Nil;
    for expr in operands("begin", rest)? {
        result = eval(expr, env, io)?;
    }
    Ok(result)
}

enum SpecialForm {
    Quote,
    If,
    Cond,
    Lambda,
    Define,
    Begin,
}

/// Resolve a head symbol to its special form, if it names one. The name is
/// looked up in the interner exactly once.
fn special_form(head: InternedSymbol) -> Option<SpecialForm> {
    head.with_str(|s| match s {
        "quote" => Some(SpecialForm::Quote),
        "if" => Some(SpecialForm::If),
        "cond" => Some(SpecialForm::Cond),
        "lambda" => Some(SpecialForm::Lambda),
        "define" => Some(SpecialForm::Define),
        "begin" => Some(SpecialForm::Begin),
        _ => None,
    })
}

fn apply(func: Value, args: Vec<Value>, io: &mut Channels) -> MinimResult<Value> {
    match func {
        Value::Primitive(prim) => (prim.func)(&args, io),
        Value::Lambda(ref lambda) => {
            if args.len() != lambda.params.len() {
                return Err(MinimError::Type(format!(
                    "lambda: expected {} arguments, got {}",
                    lambda.params.len(),
                    args.len()
                )));
            }
            let frame = lambda.env.extend(&lambda.params, &args);
            let mut result = Value::Nil;
            for expr in &lambda.body {
                result = eval(expr.clone(), &frame, io)?;
            }
            Ok(result)
        }
        other => Err(MinimError::Type(format!(
            "apply: cannot apply non-function {other}"
        ))),
    }
}

/// Evaluate one expression against an environment.
///
/// The environment handle is shared: top-level `define` mutates the
/// current frame in place, so the caller's handle observes updates across
/// successive forms without being replaced.
pub fn eval(expr: Value, env: &Environment, io: &mut Channels) -> MinimResult<Value> {
    match expr {
        // Self-evaluating forms
        Value::Int(_) | Value::Bool(_) | Value::Nil | Value::Lambda(_) | Value::Primitive(_) => {
            Ok(expr)
        }

        // Symbol lookup
        Value::Symbol(name) => env
            .lookup(name)
            .ok_or_else(|| MinimError::Unbound(name.resolve())),

        // List evaluation
        Value::Cons(ref cell) => {
            // Special forms
            if let Value::Symbol(head) = &cell.car {
                if let Some(form) = special_form(*head) {
                    return match form {
                        SpecialForm::Quote => eval_quote(&cell.cdr),
                        SpecialForm::If => eval_if(&cell.cdr, env, io),
                        SpecialForm::Cond => eval_cond(&cell.cdr, env, io),
                        SpecialForm::Lambda => eval_lambda(&cell.cdr, env),
                        SpecialForm::Define => eval_define(&cell.cdr, env, io),
                        SpecialForm::Begin => eval_begin(&cell.cdr, env, io),
                    };
                }
            }

            // Function application
            let operand_exprs = operands("apply", &cell.cdr)?;
            let func = eval(cell.car.clone(), env, io)?;

            // Operands strictly left to right; ordering is observable
            // through I/O primitives.
            let mut args = Vec::with_capacity(operand_exprs.len());
            for expr in operand_exprs {
                args.push(eval(expr, env, io)?);
            }

            apply(func, args, io)
        }
    }
}

/// The driver entry point: read one s-expression from the shared input
/// source and evaluate it. `Ok(None)` signals end of input, distinct from
/// every error.
pub fn evaluate_one(io: &mut Channels, env: &Environment) -> MinimResult<Option<Value>> {
    match read_sexp(&mut io.input)? {
        Some(expr) => eval(expr, env, io).map(Some),
        None => Ok(None),
    }
}
