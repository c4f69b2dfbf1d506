/// Reduction of a verified template to its output text
///
/// A `VerifiedTemplate` is built once all declarations have been resolved
/// against the inputs, so producing the output cannot fail.
use crate::ast::*;
use crate::error::{Error, Result};
use crate::verify;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::hash::BuildHasher;

/// Key value pairs used to generate a concrete instance of a template
pub trait Inputs {
    fn get(&self, name: &str) -> Option<&str>;

    /// Every supplied name, used to log inputs nothing declares.
    ///
    /// The default returns no names, so implementations that keep it get no
    /// "ignoring undeclared input" events. Binding is unaffected either way.
    fn names(&self) -> Vec<&str> {
        Vec::new()
    }
}

impl<S: BuildHasher> Inputs for HashMap<String, String, S> {
    fn get(&self, name: &str) -> Option<&str> {
        HashMap::get(self, name).map(String::as_str)
    }

    fn names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl Inputs for BTreeMap<String, String> {
    fn get(&self, name: &str) -> Option<&str> {
        BTreeMap::get(self, name).map(String::as_str)
    }

    fn names(&self) -> Vec<&str> {
        self.keys().map(String::as_str).collect()
    }
}

impl<T: Inputs + ?Sized> Inputs for &T {
    fn get(&self, name: &str) -> Option<&str> {
        (**self).get(name)
    }

    fn names(&self) -> Vec<&str> {
        (**self).names()
    }
}

/// A piece of resolved output
#[derive(Debug, Clone, PartialEq)]
enum Segment<'a> {
    Text(String),
    Value(&'a str),
}

/// A template whose insertions are all bound to values
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedTemplate<'a> {
    segments: Vec<Segment<'a>>,
}

impl<'a> VerifiedTemplate<'a> {
    /// Verify `body` and bind its declarations from `inputs`, falling back
    /// to declared defaults
    pub fn try_from_body_inputs<I: Inputs + ?Sized>(
        body: &'a Body,
        inputs: &'a I,
    ) -> Result<Self> {
        let scope = verify::check(body)?;

        let mut values: HashMap<&str, &'a str> = HashMap::new();
        let mut missing = Vec::new();
        for decl in scope.decls() {
            let Var::Ident(name) = &decl.var else {
                continue;
            };
            match inputs
                .get(name)
                .or_else(|| decl.default.as_ref().map(DeclValue::as_str))
            {
                Some(value) => {
                    values.insert(name, value);
                }
                None => missing.push(Error::MissingInput {
                    name: name.clone(),
                    span: decl.span,
                }),
            }
        }
        if !missing.is_empty() {
            return Err(missing.into_iter().collect());
        }

        for name in inputs.names() {
            if !scope.contains(name) {
                tracing::debug!(input = name, "ignoring undeclared input");
            }
        }

        let mut segments: Vec<Segment<'a>> = Vec::new();
        for part in &body.template().0 {
            match part {
                TemplatePart::Char(c) => match segments.last_mut() {
                    Some(Segment::Text(text)) => text.push(*c),
                    _ => segments.push(Segment::Text(c.to_string())),
                },
                TemplatePart::Insert(value, span) => {
                    let value = value
                        .var()
                        .name()
                        .and_then(|name| values.get(name).copied())
                        .ok_or_else(|| Error::Undefined {
                            name: value.var().to_string(),
                            span: *span,
                        })?;
                    segments.push(Segment::Value(value));
                }
            }
        }

        Ok(VerifiedTemplate { segments })
    }

    /// Produce the output text
    pub fn reduce(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for VerifiedTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => f.write_str(text)?,
                Segment::Value(value) => f.write_str(value)?,
            }
        }
        Ok(())
    }
}
