/// Abstract Syntax Tree definitions for sti
///
/// This module defines the AST representation of sti files after parsing.
use std::fmt;
use std::ops::Range;

use chumsky::span::SimpleSpan;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Span { start, end }
    }

    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

impl From<SimpleSpan> for Span {
    fn from(span: SimpleSpan) -> Self {
        Span {
            start: span.start,
            end: span.end,
        }
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span {
            start: range.start,
            end: range.end,
        }
    }
}

/// A complete sti file
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum Body {
    /// The template and the declarations of the variables it may use
    Function { decls: Decls, template: Template },
}

impl Body {
    pub fn decls(&self) -> &Decls {
        match self {
            Body::Function { decls, .. } => decls,
        }
    }

    pub fn template(&self) -> &Template {
        match self {
            Body::Function { template, .. } => template,
        }
    }
}

/// Declarations block: {name, greeting = "Hello"}
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decls(pub Vec<Decl>);

impl Decls {
    pub fn iter(&self) -> std::slice::Iter<'_, Decl> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Decls {
    type Item = &'a Decl;
    type IntoIter = std::slice::Iter<'a, Decl>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// A declaration of a variable that can be used in the template
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Decl {
    pub var: Var,
    pub default: Option<DeclValue>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DeclValue {
    Str(String),
}

impl DeclValue {
    pub fn as_str(&self) -> &str {
        match self {
            DeclValue::Str(s) => s,
        }
    }
}

impl<S: Into<String>> From<S> for DeclValue {
    fn from(value: S) -> Self {
        DeclValue::Str(value.into())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Var {
    /// Named variable: name, first_name
    Ident(String),
    /// The `_` pattern, which binds nothing
    Ignore,
}

impl Var {
    pub fn name(&self) -> Option<&str> {
        match self {
            Var::Ident(name) => Some(name),
            Var::Ignore => None,
        }
    }
}

/// The main text, which is what actually produces the output
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Template(pub Vec<TemplatePart>);

impl Template {
    /// Every insertion in source order, with its location
    pub fn inserts(&self) -> impl Iterator<Item = (&TemplateValue, Span)> + '_ {
        self.0.iter().filter_map(|part| match part {
            TemplatePart::Insert(value, span) => Some((value, *span)),
            TemplatePart::Char(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TemplatePart {
    Char(char),
    /// Inserted text: %{name}
    Insert(TemplateValue, Span),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum TemplateValue {
    Var(Var),
}

impl TemplateValue {
    pub fn var(&self) -> &Var {
        match self {
            TemplateValue::Var(var) => var,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Var::Ident(name) => write!(f, "{}", name),
            Var::Ignore => write!(f, "_"),
        }
    }
}

impl fmt::Display for DeclValue {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DeclValue::Str(s) => {
                write!(f, "\"")?;
                for c in s.chars() {
                    match c {
                        '"' => write!(f, "\\\"")?,
                        '\\' => write!(f, "\\\\")?,
                        '\n' => write!(f, "\\n")?,
                        '\t' => write!(f, "\\t")?,
                        c => write!(f, "{}", c)?,
                    }
                }
                write!(f, "\"")
            }
        }
    }
}

impl fmt::Display for Decl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.var)?;
        if let Some(default) = &self.default {
            write!(f, " = {}", default)?;
        }
        Ok(())
    }
}

impl fmt::Display for Decls {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let decl_strs: Vec<_> = self.0.iter().map(|d| d.to_string()).collect();
        write!(f, "{{{}}}", decl_strs.join(", "))
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for part in &self.0 {
            match part {
                TemplatePart::Char('%') => write!(f, "%%")?,
                TemplatePart::Char(c) => write!(f, "{}", c)?,
                TemplatePart::Insert(TemplateValue::Var(var), _) => write!(f, "%{{{}}}", var)?,
            }
        }
        Ok(())
    }
}

/// Canonical source form of a file
impl fmt::Display for Body {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Body::Function { decls, template } => write!(f, "{} ->\n{}", decls, template),
        }
    }
}
