//! The sti grammar as a loadable language handle.
//!
//! Editors and host tools ask for the handle once and use it to discover
//! the node kinds of the grammar and to drive parsing.

use crate::ast::Body;
use crate::error::Result;
use crate::reduce::Inputs;

/// Version of the handle layout. Bumped when `NodeKind` or the set of
/// kinds changes incompatibly.
pub const ABI_VERSION: u32 = 1;

/// A syntax node kind produced by the grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NodeKind {
    pub id: u16,
    pub name: &'static str,
    /// Named kinds are grammar rules; anonymous ones are literal tokens
    pub named: bool,
}

const fn named(id: u16, name: &'static str) -> NodeKind {
    NodeKind {
        id,
        name,
        named: true,
    }
}

const fn anonymous(id: u16, name: &'static str) -> NodeKind {
    NodeKind {
        id,
        name,
        named: false,
    }
}

static NODE_KINDS: [NodeKind; 15] = [
    named(1, "source_file"),
    named(2, "declarations"),
    named(3, "declaration"),
    named(4, "identifier"),
    named(5, "ignore"),
    named(6, "string"),
    named(7, "template"),
    named(8, "text"),
    named(9, "escape"),
    named(10, "insertion"),
    anonymous(11, "{"),
    anonymous(12, "}"),
    anonymous(13, ","),
    anonymous(14, "="),
    anonymous(15, "->"),
];

/// Opaque handle to the compiled sti grammar
#[derive(Debug)]
pub struct Language {
    name: &'static str,
    version: &'static str,
    file_types: &'static [&'static str],
    node_kinds: &'static [NodeKind],
}

static LANGUAGE: Language = Language {
    name: "sti",
    version: env!("CARGO_PKG_VERSION"),
    file_types: &["sti"],
    node_kinds: &NODE_KINDS,
};

/// Load the sti grammar
pub fn language() -> &'static Language {
    &LANGUAGE
}

impl Language {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn version(&self) -> &'static str {
        self.version
    }

    pub fn abi_version(&self) -> u32 {
        ABI_VERSION
    }

    pub fn file_types(&self) -> &'static [&'static str] {
        self.file_types
    }

    pub fn node_kinds(&self) -> &'static [NodeKind] {
        self.node_kinds
    }

    pub fn node_kind_count(&self) -> usize {
        self.node_kinds.len()
    }

    pub fn node_kind_for_name(&self, name: &str, named: bool) -> Option<&'static NodeKind> {
        self.node_kinds
            .iter()
            .find(|kind| kind.name == name && kind.named == named)
    }

    pub fn node_kind_for_id(&self, id: u16) -> Option<&'static NodeKind> {
        self.node_kinds.iter().find(|kind| kind.id == id)
    }

    /// Whether `path` has an sti file extension
    pub fn matches_path(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.file_types.contains(&ext))
    }

    pub fn parse(&self, source: &str) -> Result<Body> {
        crate::parser::parse(source)
    }

    pub fn eval<I: Inputs + ?Sized>(&self, source: &str, inputs: &I) -> Result<String> {
        crate::eval(source, inputs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    #[test]
    fn test_can_load_grammar() {
        let language = language();
        assert_eq!(language.name(), "sti", "Error loading Sti grammar");
        assert_eq!(language.abi_version(), ABI_VERSION);
    }

    #[test]
    fn test_node_kind_ids_are_unique() {
        let ids: HashSet<_> = language().node_kinds().iter().map(|k| k.id).collect();
        assert_eq!(ids.len(), language().node_kind_count());
    }

    #[test]
    fn test_node_kind_lookup() {
        let lang = language();
        let insertion = lang.node_kind_for_name("insertion", true);
        assert!(insertion.is_some());
        assert_eq!(lang.node_kind_for_id(insertion.unwrap().id), insertion);

        assert!(lang.node_kind_for_name("->", false).is_some());
        assert!(lang.node_kind_for_name("->", true).is_none());
        assert!(lang.node_kind_for_name("loop", true).is_none());
    }

    #[test]
    fn test_matches_path() {
        let lang = language();
        assert!(lang.matches_path(Path::new("greeting.sti")));
        assert!(!lang.matches_path(Path::new("greeting.txt")));
        assert!(!lang.matches_path(Path::new("sti")));
    }
}
