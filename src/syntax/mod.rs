//! The tag language: span extraction, rules and the tag AST.
//!
//! - [`extract`] splits raw view source into text and delimited spans
//! - [`rule`] holds the ordered rule pipeline that recognizes tags
//! - [`tag`] is the typed result of a recognized span
//! - [`path`] and [`expr`] parse variable references and expressions
//!
//! # Tags
//!
//! | Span | Meaning |
//! |---|---|
//! | `loop items item \|i,t\|` | loop with zero-based counter and total |
//! | `loop items item \|i\|` | loop with zero-based counter |
//! | `loop items item` | loop over values |
//! | `loop items key value` | loop over keys and values |
//! | `/loop` | close loop |
//! | `if cond` / `elseif cond` / `else` / `/if` | conditional |
//! | `= expr` | print an expression |
//! | `path` or `path\|default` | print a variable, or the default |
//! | `template view` | render another view in place |
//! | `yield` | render the requested view inside a layout |

pub mod expr;
pub mod extract;
pub mod path;
pub mod rule;
pub mod tag;

pub use expr::{parse_expr, BinaryOp, Expr, Func, UnaryOp};
pub use extract::{extract, Piece};
pub use path::{identifier, is_identifier, PathSegment, VarPath};
pub use rule::{
    LiteralBuilder, RuleAction, RuleSet, SpanOutcome, TagBuilder, TagRule, BUILTIN_RULES,
};
pub use tag::{LoopBinding, Tag};
