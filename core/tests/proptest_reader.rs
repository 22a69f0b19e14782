//! Property tests for the reader/printer pair.

use minim::{read_sexp, CharSource, Value};
use proptest::prelude::*;

proptest! {
    #[test]
    fn integer_literals_round_trip(n in any::<i64>()) {
        let text = n.to_string();
        let mut src = CharSource::from_text(&text);
        let value = read_sexp(&mut src).unwrap().unwrap();
        prop_assert_eq!(&value, &Value::Int(n));
        // Re-rendering reproduces the original text
        prop_assert_eq!(value.to_string(), text);
    }

    #[test]
    fn symbols_round_trip(name in "[a-z?!*][a-z0-9?!*-]{0,15}") {
        prop_assume!(name != "nil" && name != "t");
        let mut src = CharSource::from_text(&name);
        let value = read_sexp(&mut src).unwrap().unwrap();
        prop_assert_eq!(&value, &Value::symbol(&name));
        prop_assert_eq!(value.to_string(), name);
    }

    #[test]
    fn integer_lists_round_trip(xs in proptest::collection::vec(any::<i64>(), 0..24)) {
        let text = format!(
            "({})",
            xs.iter().map(|n| n.to_string()).collect::<Vec<_>>().join(" ")
        );
        let mut src = CharSource::from_text(&text);
        let value = read_sexp(&mut src).unwrap().unwrap();
        if xs.is_empty() {
            prop_assert_eq!(value, Value::Nil);
        } else {
            prop_assert_eq!(value.to_string(), text);
        }
    }

    #[test]
    fn reader_never_overshoots(n in any::<i64>(), tail in "[a-z ]{0,8}") {
        // Whatever follows the expression (separated by a space) is left
        // in the source untouched.
        let text = format!("{n} {tail}");
        let mut src = CharSource::from_text(&text);
        let value = read_sexp(&mut src).unwrap().unwrap();
        prop_assert_eq!(value, Value::Int(n));
        let mut rest = String::new();
        while let Some(c) = src.next().unwrap() {
            rest.push(c);
        }
        prop_assert_eq!(rest, format!(" {tail}"));
    }
}
