//! Stream-based s-expression reader
//!
//! Parses exactly one expression per call from a `CharSource`, leaving the
//! source positioned one character past the expression's closing delimiter.
//! The reader is syntax-only: it never evaluates and never touches the
//! environment. Semantic validation of special-form shapes happens later,
//! in the evaluator.

use crate::error::{MinimError, MinimResult};
use crate::language::{vec_to_list, Value};
use crate::stream::CharSource;

fn is_delimiter(c: char) -> bool {
    c.is_whitespace() || matches!(c, '(' | ')' | '\'' | ';')
}

/// Skip whitespace and `;` line comments.
fn skip_blank(source: &mut CharSource) -> MinimResult<()> {
    loop {
        match source.next()? {
            None => return Ok(()),
            Some(c) if c.is_whitespace() => continue,
            Some(';') => loop {
                match source.next()? {
                    None => return Ok(()),
                    Some('\n') => break,
                    Some(_) => continue,
                }
            },
            Some(c) => {
                source.pushback(c);
                return Ok(());
            }
        }
    }
}

/// Collect the rest of a token, starting from `first`, stopping at (and
/// pushing back) the delimiter that ends it.
fn read_token(source: &mut CharSource, first: char) -> MinimResult<String> {
    let mut text = String::new();
    text.push(first);
    loop {
        match source.next()? {
            None => return Ok(text),
            Some(c) if is_delimiter(c) => {
                source.pushback(c);
                return Ok(text);
            }
            Some(c) => text.push(c),
        }
    }
}

fn read_integer(source: &mut CharSource, first: char) -> MinimResult<Value> {
    let text = read_token(source, first)?;
    text.parse::<i64>().map(Value::Int).map_err(|_| {
        MinimError::Parse(format!(
            "malformed integer literal '{}' at line {}",
            text,
            source.line()
        ))
    })
}

fn read_symbol(source: &mut CharSource, first: char) -> MinimResult<Value> {
    let text = read_token(source, first)?;
    match text.as_str() {
        "nil" => Ok(Value::Nil),
        "t" => Ok(Value::Bool(true)),
        _ => Ok(Value::symbol(&text)),
    }
}

fn read_list(source: &mut CharSource) -> MinimResult<Value> {
    let mut items = Vec::new();
    loop {
        skip_blank(source)?;
        match source.peek()? {
            None => {
                return Err(MinimError::Parse(format!(
                    "unterminated list at line {}",
                    source.line()
                )))
            }
            Some(')') => {
                source.next()?;
                return Ok(vec_to_list(items));
            }
            Some(_) => items.push(read_expr(source)?),
        }
    }
}

fn read_expr(source: &mut CharSource) -> MinimResult<Value> {
    skip_blank(source)?;
    let c = source.next()?.ok_or_else(|| {
        MinimError::Parse(format!("unexpected end of input at line {}", source.line()))
    })?;

    match c {
        '(' => read_list(source),
        ')' => Err(MinimError::Parse(format!(
            "unexpected ')' at line {}",
            source.line()
        ))),
        '\'' => {
            let quoted = read_expr(source)?;
            Ok(vec_to_list(vec![Value::symbol("quote"), quoted]))
        }
        c if c.is_ascii_digit() => read_integer(source, c),
        '-' => match source.peek()? {
            Some(d) if d.is_ascii_digit() => read_integer(source, '-'),
            _ => read_symbol(source, '-'),
        },
        c => read_symbol(source, c),
    }
}

/// Parse exactly one complete s-expression from the source.
///
/// Returns `Ok(None)` when the source is exhausted before any token is
/// seen, which is how a read loop distinguishes clean termination from a
/// genuine syntax defect.
pub fn read_sexp(source: &mut CharSource) -> MinimResult<Option<Value>> {
    skip_blank(source)?;
    match source.peek()? {
        None => Ok(None),
        Some(_) => read_expr(source).map(Some),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::cons;

    fn read_one(text: &str) -> MinimResult<Option<Value>> {
        let mut src = CharSource::from_text(text);
        read_sexp(&mut src)
    }

    #[test]
    fn test_read_integers() {
        assert_eq!(read_one("42").unwrap(), Some(Value::Int(42)));
        assert_eq!(read_one("-7").unwrap(), Some(Value::Int(-7)));
        assert_eq!(read_one("0").unwrap(), Some(Value::Int(0)));
    }

    #[test]
    fn test_read_symbols() {
        assert_eq!(read_one("foo").unwrap(), Some(Value::symbol("foo")));
        assert_eq!(read_one("even?").unwrap(), Some(Value::symbol("even?")));
        // A lone minus is a symbol, not a number
        assert_eq!(read_one("-").unwrap(), Some(Value::symbol("-")));
    }

    #[test]
    fn test_read_nil_and_t() {
        assert_eq!(read_one("nil").unwrap(), Some(Value::Nil));
        assert_eq!(read_one("t").unwrap(), Some(Value::Bool(true)));
        assert_eq!(read_one("()").unwrap(), Some(Value::Nil));
    }

    #[test]
    fn test_read_lists() {
        let v = read_one("(a (b 1) 2)").unwrap().unwrap();
        assert_eq!(v.to_string(), "(a (b 1) 2)");
    }

    #[test]
    fn test_quote_shorthand_desugars() {
        let v = read_one("'x").unwrap().unwrap();
        assert_eq!(v.to_string(), "(quote x)");
        let v = read_one("'(1 2)").unwrap().unwrap();
        assert_eq!(v.to_string(), "(quote (1 2))");
    }

    #[test]
    fn test_comments_are_blank() {
        let v = read_one("; heading\n(f ; trailing\n 1)").unwrap().unwrap();
        assert_eq!(v.to_string(), "(f 1)");
        assert_eq!(read_one("; only a comment\n").unwrap(), None);
    }

    #[test]
    fn test_end_of_input_is_not_an_error() {
        assert_eq!(read_one("").unwrap(), None);
        assert_eq!(read_one("   \n\t ").unwrap(), None);
    }

    #[test]
    fn test_unmatched_close_is_parse_error() {
        assert!(matches!(read_one(")"), Err(MinimError::Parse(_))));
    }

    #[test]
    fn test_unterminated_list_is_parse_error() {
        assert!(matches!(read_one("(a b"), Err(MinimError::Parse(_))));
    }

    #[test]
    fn test_malformed_integer_is_parse_error() {
        assert!(matches!(read_one("12abc"), Err(MinimError::Parse(_))));
        // i64 overflow
        assert!(matches!(
            read_one("99999999999999999999"),
            Err(MinimError::Parse(_))
        ));
        // ... but i64::MIN itself is fine
        assert_eq!(
            read_one("-9223372036854775808").unwrap(),
            Some(Value::Int(i64::MIN))
        );
    }

    #[test]
    fn test_source_position_after_read() {
        // The trailing newline belongs to the stream, not the expression
        let mut src = CharSource::from_text("(print 1)\nx");
        read_sexp(&mut src).unwrap().unwrap();
        assert_eq!(src.next().unwrap(), Some('\n'));
        // An atom pushes its delimiter back too
        let mut src = CharSource::from_text("12 34");
        assert_eq!(read_sexp(&mut src).unwrap(), Some(Value::Int(12)));
        assert_eq!(src.next().unwrap(), Some(' '));
    }

    #[test]
    fn test_successive_reads_share_the_source() {
        let mut src = CharSource::from_text("1 (2 3) four");
        assert_eq!(read_sexp(&mut src).unwrap(), Some(Value::Int(1)));
        assert_eq!(
            read_sexp(&mut src).unwrap(),
            Some(cons(Value::Int(2), cons(Value::Int(3), Value::Nil)))
        );
        assert_eq!(read_sexp(&mut src).unwrap(), Some(Value::symbol("four")));
        assert_eq!(read_sexp(&mut src).unwrap(), None);
    }
}
