//! sti Language Library
//!
//! Parses, verifies and renders sti template files. A file declares the
//! variables it accepts and then a template body that inserts them:
//!
//! ```text
//! {name, greeting = "Hello"} ->
//! %{greeting}, %{name}! 100%% done.
//! ```

pub mod ast;
pub mod diagnostic;
pub mod error;
pub mod language;
pub mod parser;
pub mod reduce;
pub mod verify;

pub use ast::Body;
pub use error::{Error, Result};
pub use language::{language, Language, NodeKind};
pub use parser::parse;
pub use reduce::{Inputs, VerifiedTemplate};
pub use verify::check;

/// Parse `source`, bind it to `inputs` and render the output
pub fn eval<I: Inputs + ?Sized>(source: &str, inputs: &I) -> Result<String> {
    let body = parse(source)?;
    let output = VerifiedTemplate::try_from_body_inputs(&body, inputs)?.reduce();
    tracing::debug!(bytes = output.len(), "rendered sti template");
    Ok(output)
}

/// Reformat `source` into its canonical form
pub fn format(source: &str) -> Result<String> {
    Ok(parse(source)?.to_string())
}
