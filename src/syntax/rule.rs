//! Ordered tag rules.
//!
//! Every span runs through the rule list in order. A rule pairs a regex with
//! an action:
//!
//! - [`RuleAction::Rewrite`] rewrites the span text and the pipeline
//!   continues against the new text.
//! - [`RuleAction::Tag`] turns the captures into a [`Tag`]; the first one
//!   that accepts the span ends the pipeline.
//! - [`RuleAction::Literal`] computes text emitted verbatim, ending the
//!   pipeline.
//!
//! Loop rules are complete-span patterns listed most-specific first, so
//! `loop items v |i,t|` never falls through to the plain `loop items v` form.

use crate::error::{Result, VellumError};
use crate::syntax::expr::parse_expr;
use crate::syntax::path::{identifier, VarPath};
use crate::syntax::tag::{LoopBinding, Tag};
use regex::{Captures, Regex};
use std::fmt;
use std::sync::Arc;

/// Builds a tag from captures, or declines with `Ok(None)`.
pub type TagBuilder = Arc<dyn Fn(&Captures<'_>) -> Result<Option<Tag>> + Send + Sync>;

/// Produces literal output from captures.
pub type LiteralBuilder = Arc<dyn Fn(&Captures<'_>) -> String + Send + Sync>;

type BuiltinFn = fn(&Captures<'_>) -> Result<Option<Tag>>;

/// Built-in rules in evaluation order: (name, pattern, builder).
pub const BUILTIN_RULES: &[(&str, &str, BuiltinFn)] = &[
    (
        "loop_totaled",
        r"^loop\s+(\S+)\s+(\S+)\s*\|(\S+),(\S+)\|\s*$",
        build_loop_totaled,
    ),
    (
        "loop_counted",
        r"^loop\s+(\S+)\s+(\S+)\s*\|(\S+)\|\s*$",
        build_loop_counted,
    ),
    ("loop_value", r"^loop\s+(\S+)\s+(\S+)\s*$", build_loop_value),
    (
        "loop_keyed",
        r"^loop\s+(\S+)\s+(\S+)\s+(\S+)\s*$",
        build_loop_keyed,
    ),
    ("end_loop", r"^/loop$", build_end_loop),
    ("if", r"^if\s+(.+)$", build_if),
    ("elseif", r"^elseif\s+(.+)$", build_elseif),
    ("else", r"^else$", build_else),
    ("end_if", r"^/if$", build_end_if),
    ("emit", r"^=\s*(.+)$", build_emit),
    (
        "variable",
        r"^(\$?[A-Za-z_]\w*(?:\.\w+|->\w+|\[[^\]]+\])*)(?:\|(.+))?$",
        build_variable,
    ),
    (
        "template",
        r#"^template\s+["']?([^"']+)["']?$"#,
        build_include,
    ),
    ("yield", r"^yield$", build_yield),
];

/// Words that never name a variable.
const KEYWORDS: &[&str] = &["loop", "if", "elseif", "else", "template", "yield"];

/// What a rule does with a matching span.
#[derive(Clone)]
pub enum RuleAction {
    /// Regex replacement (`$1`-style); the pipeline continues.
    Rewrite(String),
    /// Recognize a tag.
    Tag(TagBuilder),
    /// Emit computed text.
    Literal(LiteralBuilder),
}

/// A named pattern/action pair.
#[derive(Clone)]
pub struct TagRule {
    /// Name of this rule (for diagnostics).
    pub name: String,
    /// Pattern matched against the span text.
    pub pattern: Regex,
    /// What to do on a match.
    pub action: RuleAction,
}

impl fmt::Debug for TagRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let action = match self.action {
            RuleAction::Rewrite(_) => "rewrite",
            RuleAction::Tag(_) => "tag",
            RuleAction::Literal(_) => "literal",
        };
        f.debug_struct("TagRule")
            .field("name", &self.name)
            .field("pattern", &self.pattern.as_str())
            .field("action", &action)
            .finish()
    }
}

impl TagRule {
    /// Create a rule from a pattern string.
    pub fn new(name: impl Into<String>, pattern: &str, action: RuleAction) -> Result<Self> {
        let name = name.into();
        let pattern = Regex::new(pattern).map_err(|e| VellumError::ConfigValidationError {
            message: format!("Invalid pattern for tag rule '{}': {}", name, e),
        })?;
        Ok(Self {
            name,
            pattern,
            action,
        })
    }

    /// A rule rewriting span text, e.g. an alias for another tag.
    ///
    /// # Example
    ///
    /// ```
    /// use vellum::syntax::{RuleSet, SpanOutcome, Tag, TagRule};
    ///
    /// let mut rules = RuleSet::with_builtins();
    /// rules.define_first(TagRule::rewrite("include", r"^include\s+(.+)$", "template $1").unwrap());
    ///
    /// let outcome = rules.apply("include header").unwrap();
    /// assert_eq!(outcome, SpanOutcome::Tag(Tag::Include("header".into())));
    /// ```
    pub fn rewrite(name: impl Into<String>, pattern: &str, replacement: &str) -> Result<Self> {
        Self::new(name, pattern, RuleAction::Rewrite(replacement.to_string()))
    }

    /// A rule producing a tag.
    pub fn tag<F>(name: impl Into<String>, pattern: &str, build: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> Result<Option<Tag>> + Send + Sync + 'static,
    {
        Self::new(name, pattern, RuleAction::Tag(Arc::new(build)))
    }

    /// A rule producing literal output.
    pub fn literal<F>(name: impl Into<String>, pattern: &str, build: F) -> Result<Self>
    where
        F: Fn(&Captures<'_>) -> String + Send + Sync + 'static,
    {
        Self::new(name, pattern, RuleAction::Literal(Arc::new(build)))
    }
}

/// Result of running one span through the rules.
#[derive(Debug, Clone, PartialEq)]
pub enum SpanOutcome {
    /// A rule recognized a tag.
    Tag(Tag),
    /// Text to emit in place of the span, without delimiters.
    Literal(String),
    /// Nothing applied; emit the span with its delimiters.
    Inert,
}

/// The ordered rule list of a template instance.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<TagRule>,
}

impl RuleSet {
    /// An empty rule list.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in rules, in evaluation order.
    pub fn with_builtins() -> Self {
        let rules = BUILTIN_RULES
            .iter()
            .map(|(name, pattern, build)| TagRule {
                name: name.to_string(),
                pattern: Regex::new(pattern).expect("built-in tag pattern is valid"),
                action: RuleAction::Tag(Arc::new(*build)),
            })
            .collect();

        Self { rules }
    }

    /// Append a rule after the existing ones.
    pub fn define(&mut self, rule: TagRule) {
        self.rules.push(rule);
    }

    /// Insert a rule ahead of every existing rule.
    pub fn define_first(&mut self, rule: TagRule) {
        self.rules.insert(0, rule);
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether there are no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Run a span's inner text through every rule in order.
    pub fn apply(&self, span: &str) -> Result<SpanOutcome> {
        let mut text = span.to_string();

        for rule in &self.rules {
            match &rule.action {
                RuleAction::Rewrite(replacement) => {
                    if rule.pattern.is_match(&text) {
                        let rewritten = rule
                            .pattern
                            .replace_all(&text, replacement.as_str())
                            .into_owned();
                        text = rewritten;
                    }
                }
                RuleAction::Tag(build) => {
                    if let Some(caps) = rule.pattern.captures(&text) {
                        if let Some(tag) = build(&caps)? {
                            return Ok(SpanOutcome::Tag(tag));
                        }
                    }
                }
                RuleAction::Literal(build) => {
                    if let Some(caps) = rule.pattern.captures(&text) {
                        return Ok(SpanOutcome::Literal(build(&caps)));
                    }
                }
            }
        }

        if text == span {
            Ok(SpanOutcome::Inert)
        } else {
            Ok(SpanOutcome::Literal(text))
        }
    }
}

fn loop_parts(caps: &Captures<'_>, names: &[usize]) -> Option<(VarPath, Vec<String>)> {
    let collection = VarPath::parse(&caps[1])?;
    let idents = names
        .iter()
        .map(|&i| identifier(&caps[i]).map(str::to_string))
        .collect::<Option<Vec<_>>>()?;
    Some((collection, idents))
}

fn build_loop_totaled(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(loop_parts(caps, &[2, 3, 4]).map(|(collection, mut ids)| {
        let total = ids.pop().unwrap_or_default();
        let counter = ids.pop().unwrap_or_default();
        let item = ids.pop().unwrap_or_default();
        Tag::Loop {
            collection,
            binding: LoopBinding::Totaled {
                item,
                counter,
                total,
            },
        }
    }))
}

fn build_loop_counted(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(loop_parts(caps, &[2, 3]).map(|(collection, mut ids)| {
        let counter = ids.pop().unwrap_or_default();
        let item = ids.pop().unwrap_or_default();
        Tag::Loop {
            collection,
            binding: LoopBinding::Counted { item, counter },
        }
    }))
}

fn build_loop_value(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(loop_parts(caps, &[2]).map(|(collection, mut ids)| Tag::Loop {
        collection,
        binding: LoopBinding::Value {
            item: ids.pop().unwrap_or_default(),
        },
    }))
}

fn build_loop_keyed(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(loop_parts(caps, &[2, 3]).map(|(collection, mut ids)| {
        let value = ids.pop().unwrap_or_default();
        let key = ids.pop().unwrap_or_default();
        Tag::Loop {
            collection,
            binding: LoopBinding::Keyed { key, value },
        }
    }))
}

fn build_end_loop(_: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::EndLoop))
}

fn build_if(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::If(parse_expr(caps[1].trim())?)))
}

fn build_elseif(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::ElseIf(parse_expr(caps[1].trim())?)))
}

fn build_else(_: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::Else))
}

fn build_end_if(_: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::EndIf))
}

fn build_emit(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::Emit(parse_expr(caps[1].trim())?)))
}

fn build_include(caps: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::Include(caps[1].trim().to_string())))
}

fn build_yield(_: &Captures<'_>) -> Result<Option<Tag>> {
    Ok(Some(Tag::Yield))
}

fn build_variable(caps: &Captures<'_>) -> Result<Option<Tag>> {
    let raw = &caps[1];
    if KEYWORDS.contains(&raw) {
        return Ok(None);
    }
    Ok(VarPath::parse(raw).map(|path| Tag::Var {
        path,
        default: caps.get(2).map(|m| m.as_str().to_string()),
    }))
}
