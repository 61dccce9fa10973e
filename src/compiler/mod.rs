//! View compiler.
//!
//! Compilation runs in two passes over a view source:
//!
//! 1. Every delimited span goes through the instance's [`RuleSet`]. Spans no
//!    rule applies to are kept verbatim, delimiters included.
//! 2. The resulting text/tag stream is structured into a [`Program`] tree;
//!    unbalanced block tags are reported as syntax errors.

pub mod builder;
pub mod program;

pub use builder::TreeBuilder;
pub use program::{Branch, Node, Program};

use crate::error::{Result, VellumError};
use crate::syntax::{extract, Piece, RuleSet, SpanOutcome};
use std::path::Path;

/// Compiles view sources with one rule set and delimiter pair.
pub struct Compiler<'a> {
    rules: &'a RuleSet,
    left: &'a str,
    right: &'a str,
}

impl<'a> Compiler<'a> {
    /// Create a compiler.
    pub fn new(rules: &'a RuleSet, left: &'a str, right: &'a str) -> Self {
        Self { rules, left, right }
    }

    /// Compile a view source into a program owned by `instance_id`.
    ///
    /// # Example
    ///
    /// ```
    /// use vellum::compiler::{Compiler, Node};
    /// use vellum::syntax::RuleSet;
    /// use std::path::Path;
    ///
    /// let rules = RuleSet::with_builtins();
    /// let compiler = Compiler::new(&rules, "{", "}");
    /// let program = compiler
    ///     .compile("id", Path::new("hello.tpl"), "Hello {name|World}!")
    ///     .unwrap();
    ///
    /// assert_eq!(program.nodes.len(), 3);
    /// assert!(matches!(program.nodes[1], Node::Var { .. }));
    /// ```
    pub fn compile(&self, instance_id: &str, source: &Path, text: &str) -> Result<Program> {
        let syntax_error = |message: String| VellumError::Syntax {
            path: source.to_path_buf(),
            message,
        };

        let mut builder = TreeBuilder::new();
        let mut tags = 0usize;

        for piece in extract(text, self.left, self.right) {
            match piece {
                Piece::Text(text) => builder.text(text),
                Piece::Span { raw, inner } => match self.compile_span(inner) {
                    Ok(SpanOutcome::Tag(tag)) => {
                        tags += 1;
                        builder.tag(tag).map_err(syntax_error)?;
                    }
                    Ok(SpanOutcome::Literal(literal)) => builder.text(&literal),
                    Ok(SpanOutcome::Inert) => builder.text(raw),
                    Err(VellumError::Expression { expr, message }) => {
                        return Err(syntax_error(format!(
                            "invalid expression '{}': {}",
                            expr, message
                        )));
                    }
                    Err(other) => return Err(other),
                },
            }
        }

        let nodes = builder.finish().map_err(syntax_error)?;
        tracing::debug!("Compiled {} ({} tags)", source.display(), tags);
        Ok(Program::new(instance_id, source, nodes))
    }

    /// Run one span's inner text through the rules.
    pub fn compile_span(&self, inner: &str) -> Result<SpanOutcome> {
        self.rules.apply(inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{LoopBinding, TagRule, VarPath};

    fn compile(text: &str) -> Result<Program> {
        let rules = RuleSet::with_builtins();
        Compiler::new(&rules, "{", "}").compile("id", Path::new("view.tpl"), text)
    }

    fn text(s: &str) -> Node {
        Node::Text { text: s.into() }
    }

    #[test]
    fn inert_spans_keep_delimiters() {
        let program = compile("a { color: red } b").unwrap();
        assert_eq!(program.nodes, vec![text("a { color: red } b")]);
    }

    #[test]
    fn inert_passthrough_is_idempotent() {
        let first = compile("x {1 + } y").unwrap();
        let second = compile("x {1 + } y").unwrap();
        assert_eq!(first.nodes, second.nodes);
        assert_eq!(first.nodes, vec![text("x {1 + } y")]);
    }

    #[test]
    fn variable_with_default_compiles_to_var_node() {
        let program = compile("Hello {name|World}!").unwrap();
        assert_eq!(
            program.nodes,
            vec![
                text("Hello "),
                Node::Var {
                    path: VarPath::simple("name"),
                    default: Some("World".into()),
                },
                text("!"),
            ]
        );
    }

    #[test]
    fn totaled_loop_compiles_with_counter_and_total() {
        let program = compile("{loop items v |i,t|}{v}{/loop}").unwrap();
        match &program.nodes[0] {
            Node::Loop { binding, body, .. } => {
                assert_eq!(
                    binding,
                    &LoopBinding::Totaled {
                        item: "v".into(),
                        counter: "i".into(),
                        total: "t".into(),
                    }
                );
                assert_eq!(body.len(), 1);
            }
            other => panic!("expected loop, got {:?}", other),
        }
    }

    #[test]
    fn plain_loop_introduces_no_counter() {
        let program = compile("{loop items v}{v}{/loop}").unwrap();
        assert!(matches!(
            &program.nodes[0],
            Node::Loop {
                binding: LoopBinding::Value { .. },
                ..
            }
        ));
    }

    #[test]
    fn unbalanced_loop_is_syntax_error() {
        let err = compile("{loop items v}").unwrap_err();
        match err {
            VellumError::Syntax { path, message } => {
                assert_eq!(path, Path::new("view.tpl"));
                assert!(message.contains("loop"));
            }
            other => panic!("expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn bad_expression_is_syntax_error_with_path() {
        let err = compile("{if a ==}x{/if}").unwrap_err();
        assert!(matches!(err, VellumError::Syntax { .. }));
        assert!(err.to_string().contains("view.tpl"));
    }

    #[test]
    fn custom_delimiters() {
        let rules = RuleSet::with_builtins();
        let program = Compiler::new(&rules, "<%", "%>")
            .compile("id", Path::new("v"), "{name} <%name%>")
            .unwrap();
        assert_eq!(program.nodes[0], text("{name} "));
        assert!(matches!(program.nodes[1], Node::Var { .. }));
    }

    #[test]
    fn rewrite_rules_emit_literal_text() {
        let mut rules = RuleSet::with_builtins();
        rules.define_first(TagRule::rewrite("nbsp", r"^nbsp$", "&nbsp;").unwrap());
        let program = Compiler::new(&rules, "{", "}")
            .compile("id", Path::new("v"), "a{nbsp}b")
            .unwrap();
        assert_eq!(program.nodes, vec![text("a&nbsp;b")]);
    }

    #[test]
    fn program_records_owner_and_source() {
        let program = compile("x").unwrap();
        assert_eq!(program.instance_id, "id");
        assert_eq!(program.source, Path::new("view.tpl"));
    }
}
