/// Lexer for sti using logos
///
/// Converts source text into spanned tokens. The header (declarations up to
/// and including `->`) and the template body have different lexical rules,
/// so lexing runs in two phases.
use crate::ast::Span;
use crate::error::Error;
use chumsky::span::SimpleSpan;
use logos::Logos;

#[derive(Logos, Debug, Clone, PartialEq, Eq, Hash)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    // Delimiters
    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(",")]
    Comma,

    #[token("=")]
    Eq,

    #[token("->")]
    Arrow,

    // Identifiers, including the `_` pattern
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*", |lex| lex.slice().to_string())]
    Ident(String),

    #[regex(r#""([^"\\]|\\["\\nt])*""#, |lex| unescape(lex.slice()))]
    Str(String),

    // Template body, produced by `BodyToken`
    Char(char),

    Insert(String),
}

#[derive(Logos, Debug, Clone, PartialEq, Eq)]
enum BodyToken {
    #[token("%%", |_| '%')]
    #[token("%", |_| '%')]
    #[regex(r"[^%]", |lex| lex.slice().chars().next())]
    Char(char),

    #[regex(r"%\{[A-Za-z_][A-Za-z0-9_]*\}", |lex| {
        let s = lex.slice();
        s[2..s.len() - 1].to_string()
    })]
    Insert(String),
}

impl From<BodyToken> for Token {
    fn from(token: BodyToken) -> Self {
        match token {
            BodyToken::Char(c) => Token::Char(c),
            BodyToken::Insert(name) => Token::Insert(name),
        }
    }
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Comma => write!(f, ","),
            Token::Eq => write!(f, "="),
            Token::Arrow => write!(f, "->"),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Str(s) => write!(f, "{:?}", s),
            Token::Char(c) => write!(f, "{:?}", c),
            Token::Insert(name) => write!(f, "%{{{}}}", name),
        }
    }
}

fn unescape(literal: &str) -> String {
    let inner = &literal[1..literal.len() - 1];
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// Tokenize a complete sti file.
///
/// Fails on the first character the header lexer does not recognise. The
/// body lexer accepts every character: a `%{` that does not close into an
/// insertion is lexed as plain characters.
pub fn lex(source: &str) -> Result<Vec<(Token, SimpleSpan)>, Error> {
    let mut tokens = Vec::new();
    let mut header = Token::lexer(source);
    let mut body_start = None;

    while let Some(token) = header.next() {
        let span = header.span();
        match token {
            Ok(Token::Arrow) => {
                tokens.push((Token::Arrow, SimpleSpan::from(span.clone())));
                body_start = Some(span.end);
                break;
            }
            Ok(token) => tokens.push((token, SimpleSpan::from(span))),
            Err(()) => {
                let found = source[span.clone()].to_string();
                return Err(Error::Lex {
                    found,
                    span: span.into(),
                });
            }
        }
    }

    if let Some(mut offset) = body_start {
        let rest = &source[offset..];
        if rest.starts_with("\r\n") {
            offset += 2;
        } else if rest.starts_with('\n') {
            offset += 1;
        }

        let mut body = BodyToken::lexer(&source[offset..]);
        while let Some(token) = body.next() {
            let span = body.span();
            let span = Span::new(span.start + offset, span.end + offset);
            match token {
                Ok(token) => tokens.push((token.into(), SimpleSpan::from(span.range()))),
                // An unfinished insertion such as `%{name` or `%{a b}` is text
                Err(()) => {
                    for (at, c) in source[span.range()].char_indices() {
                        let start = span.start + at;
                        let end = start + c.len_utf8();
                        tokens.push((Token::Char(c), SimpleSpan::from(start..end)));
                    }
                }
            }
        }
    }

    tracing::trace!(count = tokens.len(), "lexed sti source");
    Ok(tokens)
}
