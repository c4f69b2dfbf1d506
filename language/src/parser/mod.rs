/// Parser for sti source code
///
/// Uses logos for lexing and chumsky for parsing.
use crate::ast::*;
use crate::error::{Error, Result};
use chumsky::input::Stream;
use chumsky::prelude::*;

pub mod grammar;
pub mod lexer;

/// Parse a sti source file into an AST
pub fn parse(source: &str) -> Result<Body> {
    let tokens = lexer::lex(source)?;
    let eoi = SimpleSpan::from(source.len()..source.len());
    let stream = Stream::from_iter(tokens).map(eoi, |(t, s): (_, _)| (t, s));

    let body = grammar::body_parser()
        .parse(stream)
        .into_result()
        .map_err(|errs| {
            errs.into_iter()
                .map(|err| Error::Parse {
                    message: err.to_string(),
                    span: Span::from(*err.span()),
                })
                .collect::<Error>()
        })?;

    tracing::debug!(
        decls = body.decls().len(),
        parts = body.template().len(),
        "parsed sti source"
    );
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal() {
        let result = parse("{}->x");
        assert!(result.is_ok());
    }

    #[test]
    fn test_parse_with_decls() {
        let source = "{ name, greeting = \"Hello\" } ->\n%{greeting}, %{name}!\n";
        let body = parse(source).expect("Parse failed");
        assert_eq!(body.decls().len(), 2);
        assert_eq!(body.template().inserts().count(), 2);
    }

    #[test]
    fn test_parse_lex_error_propagates() {
        let result = parse("{ name } => x");
        assert!(matches!(result, Err(Error::Lex { .. })));
    }

    #[test]
    fn test_parse_error_message() {
        let err = parse("{name").unwrap_err();
        match err {
            Error::Parse { message, span } => {
                assert!(!message.is_empty());
                assert_eq!(span, Span::new(5, 5));
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_display_reparses() {
        let source = "\n  {a,_, b = \"x\\\"y\"}  ->\n\n100% %{a} %%{b}";
        let body = parse(source).expect("Parse failed");
        let canonical = body.to_string();
        let reparsed = parse(&canonical).expect("Reparse failed");
        assert_eq!(reparsed.to_string(), canonical);
        assert_eq!(reparsed.decls().len(), 3);
        assert_eq!(reparsed.template().inserts().count(), 1);
    }
}
