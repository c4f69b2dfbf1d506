use crate::ast::Span;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("unexpected character {found:?}")]
    Lex { found: String, span: Span },

    #[error("{message}")]
    Parse { message: String, span: Span },

    #[error("variable `{name}` is not declared")]
    Undefined { name: String, span: Span },

    #[error("`_` cannot be inserted")]
    IgnoreInsert { span: Span },

    #[error("variable `{name}` is declared more than once")]
    Duplicate {
        name: String,
        span: Span,
        first: Span,
    },

    #[error("no value supplied for `{name}`")]
    MissingInput { name: String, span: Span },

    #[error("{} errors", .0.len())]
    Errors(Vec<Error>),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Location of the error, `None` for `Errors`
    pub fn span(&self) -> Option<Span> {
        match self {
            Error::Lex { span, .. }
            | Error::Parse { span, .. }
            | Error::Undefined { span, .. }
            | Error::IgnoreInsert { span }
            | Error::Duplicate { span, .. }
            | Error::MissingInput { span, .. } => Some(*span),
            Error::Errors(_) => None,
        }
    }

    /// Every leaf error, with nested `Errors` expanded in order
    pub fn flatten(&self) -> Vec<&Error> {
        match self {
            Error::Errors(errors) => errors.iter().flat_map(Error::flatten).collect(),
            leaf => vec![leaf],
        }
    }
}

impl FromIterator<Error> for Error {
    fn from_iter<T: IntoIterator<Item = Error>>(iter: T) -> Self {
        let mut errors: Vec<Error> = iter.into_iter().collect();
        if errors.len() == 1 {
            errors.remove(0)
        } else {
            Error::Errors(errors)
        }
    }
}
