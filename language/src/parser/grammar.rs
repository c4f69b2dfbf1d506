/// Grammar definitions using chumsky parser combinators
///
/// This module contains the parser implementation for sti syntax. Parsers
/// run over the spanned token stream produced by the lexer, so every span
/// they record is a byte range into the source text.
use super::lexer::Token;
use crate::ast::*;
use chumsky::input::ValueInput;
use chumsky::prelude::*;

pub type ParserError<'a> = extra::Err<Rich<'a, Token>>;

fn to_var(name: String) -> Var {
    if name == "_" {
        Var::Ignore
    } else {
        Var::Ident(name)
    }
}

/// Parse a variable
/// Examples: name, first_name, _
pub fn var_parser<'a, I>() -> impl Parser<'a, I, Var, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    select! {
        Token::Ident(name) => name,
    }
    .map(to_var)
}

/// Parse a declaration
/// Examples: name, greeting = "Hello"
pub fn decl_parser<'a, I>() -> impl Parser<'a, I, Decl, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let default = just(Token::Eq).ignore_then(select! {
        Token::Str(s) => DeclValue::Str(s),
    });

    var_parser()
        .then(default.or_not())
        .map_with(|(var, default), e| Decl {
            var,
            default,
            span: Span::from(e.span()),
        })
}

/// Parse the declarations block
/// Example: {name, greeting = "Hello",}
pub fn decls_parser<'a, I>() -> impl Parser<'a, I, Decls, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    decl_parser()
        .separated_by(just(Token::Comma))
        .allow_trailing()
        .collect::<Vec<_>>()
        .delimited_by(just(Token::LBrace), just(Token::RBrace))
        .map(Decls)
}

/// Parse the template body: text, escapes and insertions
/// Example: Hello %{name}, 100%% done
pub fn template_parser<'a, I>() -> impl Parser<'a, I, Template, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    let text = select! {
        Token::Char(c) => TemplatePart::Char(c),
    };

    let insert = select! {
        Token::Insert(name) => name,
    }
    .map_with(|name, e| {
        TemplatePart::Insert(TemplateValue::Var(to_var(name)), Span::from(e.span()))
    });

    choice((insert, text))
        .repeated()
        .at_least(1)
        .collect::<Vec<_>>()
        .map(Template)
}

/// Parse a complete file
pub fn body_parser<'a, I>() -> impl Parser<'a, I, Body, ParserError<'a>> + Clone
where
    I: ValueInput<'a, Token = Token, Span = SimpleSpan>,
{
    decls_parser()
        .then_ignore(just(Token::Arrow))
        .then(template_parser())
        .then_ignore(end())
        .map(|(decls, template)| Body::Function { decls, template })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn ident(name: &str) -> Var {
        Var::Ident(name.to_string())
    }

    fn chars(s: &str) -> Vec<TemplatePart> {
        s.chars().map(TemplatePart::Char).collect()
    }

    fn decl_names(source: &str) -> Vec<Var> {
        let body = parse(source).expect("Parse failed");
        body.decls().iter().map(|d| d.var.clone()).collect()
    }

    #[test]
    fn test_empty_str_fails() {
        parse("").expect_err("the empty string didn't fail");
    }

    #[test]
    fn test_empty_template_fails() {
        parse("{}->").expect_err("the empty body didn't fail");
        parse("{}->\n").expect_err("a lone newline body didn't fail");
    }

    #[test]
    fn test_missing_arrow_fails() {
        parse("{foo}").expect_err("missing arrow didn't fail");
    }

    #[test]
    fn test_text_only_body() {
        let body = parse("{}->f").expect("Parse failed");
        assert!(body.decls().is_empty());
        assert_eq!(body.template().0, chars("f"));
    }

    #[test]
    fn test_new_line_body() {
        let body = parse("{}->\nf").expect("Parse failed");
        assert_eq!(body.template().0, chars("f"));
    }

    #[test]
    fn test_insert_only_body() {
        let body = parse("{}->%{foo}").expect("Parse failed");
        match body.template().0.as_slice() {
            [TemplatePart::Insert(TemplateValue::Var(var), span)] => {
                assert_eq!(var, &ident("foo"));
                assert_eq!(*span, Span::new(4, 10));
            }
            other => panic!("Expected a single insert, got {:?}", other),
        }
    }

    #[test]
    fn test_single_decl() {
        assert_eq!(decl_names("{foo}->\nf"), vec![ident("foo")]);
        assert_eq!(decl_names("{foo,}->\nf"), vec![ident("foo")]);
    }

    #[test]
    fn test_multi_decl() {
        let expected = vec![ident("foo"), ident("bar"), ident("baz")];
        assert_eq!(decl_names("{foo,bar,baz}->\nf"), expected);
        assert_eq!(decl_names("{foo,bar,baz,}->\nf"), expected);
    }

    #[test]
    fn test_ignore_decl() {
        assert_eq!(decl_names("{_, foo}->f"), vec![Var::Ignore, ident("foo")]);
    }

    #[test]
    fn test_whitespace_in_header() {
        assert_eq!(decl_names("{} \n  \t->\nf"), vec![]);
        assert_eq!(decl_names("{  }->f"), vec![]);
        assert_eq!(decl_names("\n\n\t  \n  {}->f"), vec![]);
        assert_eq!(
            decl_names("\n\n\t  \n  {  foo, \n\nbar, }  ->f"),
            vec![ident("foo"), ident("bar")]
        );
    }

    #[test]
    fn test_double_comma_fails() {
        parse("{foo,,bar}->f").expect_err("double comma didn't fail");
    }

    #[test]
    fn test_decl_default() {
        let body = parse(r#"{greeting = "Hello", name}->f"#).expect("Parse failed");
        let decls: Vec<_> = body.decls().iter().collect();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].var, ident("greeting"));
        assert_eq!(decls[0].default, Some(DeclValue::from("Hello")));
        assert_eq!(decls[0].span, Span::new(1, 19));
        assert_eq!(decls[1].default, None);
    }

    #[test]
    fn test_default_requires_string() {
        parse("{greeting = hello}->f").expect_err("bare default didn't fail");
    }

    #[test]
    fn test_multiple_template_parts() {
        let body = parse("{}->foo%{foo}b%{foo}bar").expect("Parse failed");
        let rendered: Vec<String> = body
            .template()
            .0
            .iter()
            .map(|part| match part {
                TemplatePart::Char(c) => c.to_string(),
                TemplatePart::Insert(value, _) => format!("<{}>", value.var()),
            })
            .collect();
        assert_eq!(rendered.concat(), "foo<foo>b<foo>bar");
        assert_eq!(body.template().inserts().count(), 2);
    }

    #[test]
    fn test_escapes_double_percent() {
        let body = parse("{}->f%%f").expect("Parse failed");
        assert_eq!(body.template().0, chars("f%f"));
    }

    #[test]
    fn test_template_keeps_header_like_text() {
        let body = parse("{}->{a, b} -> c").expect("Parse failed");
        assert_eq!(body.template().0, chars("{a, b} -> c"));
    }

    #[test]
    fn test_parse_error_has_span() {
        match parse("{foo bar}->f").unwrap_err() {
            Error::Parse { span, .. } => assert_eq!(span, Span::new(5, 8)),
            other => panic!("Expected parse error, got {:?}", other),
        }
    }
}
