//! Recognized tags, one variant per built-in construct.

use crate::syntax::expr::Expr;
use crate::syntax::path::VarPath;
use serde::{Deserialize, Serialize};

/// How a loop binds each element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "form", rename_all = "snake_case")]
pub enum LoopBinding {
    /// `loop items item |i,total|`
    Totaled {
        item: String,
        counter: String,
        total: String,
    },
    /// `loop items item |i|`
    Counted { item: String, counter: String },
    /// `loop items item`
    Value { item: String },
    /// `loop items key value`
    Keyed { key: String, value: String },
}

/// A span recognized by a rule.
#[derive(Debug, Clone, PartialEq)]
pub enum Tag {
    /// Open a loop over `collection`.
    Loop {
        collection: VarPath,
        binding: LoopBinding,
    },
    /// `/loop`
    EndLoop,
    /// `if <condition>`
    If(Expr),
    /// `elseif <condition>`
    ElseIf(Expr),
    /// `else`
    Else,
    /// `/if`
    EndIf,
    /// `= <expression>`
    Emit(Expr),
    /// `<path>` or `<path>|<default>`
    Var {
        path: VarPath,
        default: Option<String>,
    },
    /// `template <view>`
    Include(String),
    /// `yield`
    Yield,
}

impl Tag {
    /// Short name used in diagnostics.
    pub fn keyword(&self) -> &'static str {
        match self {
            Tag::Loop { .. } => "loop",
            Tag::EndLoop => "/loop",
            Tag::If(_) => "if",
            Tag::ElseIf(_) => "elseif",
            Tag::Else => "else",
            Tag::EndIf => "/if",
            Tag::Emit(_) => "=",
            Tag::Var { .. } => "variable",
            Tag::Include(_) => "template",
            Tag::Yield => "yield",
        }
    }
}
