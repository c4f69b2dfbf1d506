/// Static checking for sti files
///
/// This module implements:
/// - Declaration scope construction
/// - Duplicate declaration detection
/// - Insertion resolution against the declared scope
///
/// None of these checks need input values; they are shared by `check`
/// and by reduction.
use crate::ast::*;
use crate::error::{Error, Result};
use std::collections::HashMap;

/// Declared names, in declaration order, with their declarations
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    decls: HashMap<&'a str, &'a Decl>,
    order: Vec<&'a str>,
}

impl<'a> Scope<'a> {
    pub fn new() -> Self {
        Scope {
            decls: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Add a declaration. `_` binds nothing and is always accepted.
    pub fn declare(&mut self, decl: &'a Decl) -> Result<()> {
        let Var::Ident(name) = &decl.var else {
            return Ok(());
        };

        if let Some(first) = self.decls.get(name.as_str()) {
            return Err(Error::Duplicate {
                name: name.clone(),
                span: decl.span,
                first: first.span,
            });
        }

        self.decls.insert(name.as_str(), decl);
        self.order.push(name.as_str());
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&'a Decl> {
        self.decls.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.decls.contains_key(name)
    }

    /// Declarations in source order
    pub fn decls(&self) -> impl Iterator<Item = &'a Decl> + '_ {
        self.order.iter().filter_map(|name| self.decls.get(name).copied())
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

impl Default for Scope<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Collects every problem in a file rather than stopping at the first
pub struct Verifier<'a> {
    scope: Scope<'a>,
    errors: Vec<Error>,
}

impl<'a> Verifier<'a> {
    pub fn new() -> Self {
        Verifier {
            scope: Scope::new(),
            errors: Vec::new(),
        }
    }

    pub fn check_body(mut self, body: &'a Body) -> Result<Scope<'a>> {
        match body {
            Body::Function { decls, template } => {
                self.check_decls(decls);
                self.check_template(template);
            }
        }

        if self.errors.is_empty() {
            tracing::debug!(declared = self.scope.len(), "verified sti body");
            Ok(self.scope)
        } else {
            Err(self.errors.into_iter().collect())
        }
    }

    fn check_decls(&mut self, decls: &'a Decls) {
        for decl in decls {
            if let Err(err) = self.scope.declare(decl) {
                self.errors.push(err);
            }
        }
    }

    fn check_template(&mut self, template: &'a Template) {
        for (value, span) in template.inserts() {
            match value.var() {
                Var::Ident(name) if self.scope.contains(name) => {}
                Var::Ident(name) => self.errors.push(Error::Undefined {
                    name: name.clone(),
                    span,
                }),
                Var::Ignore => self.errors.push(Error::IgnoreInsert { span }),
            }
        }
    }
}

impl Default for Verifier<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Check a parsed file without any inputs
pub fn check(body: &Body) -> Result<Scope<'_>> {
    Verifier::new().check_body(body)
}
