//! Compiled program representation.
//!
//! A program is plain data: a tree of output instructions persisted as JSON
//! in the artifact cache and interpreted by the executor.

use crate::syntax::{Expr, LoopBinding, VarPath};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One instruction in a compiled view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Node {
    /// Emit literal text.
    Text { text: String },
    /// Emit a variable, or its default when unbound.
    Var {
        path: VarPath,
        default: Option<String>,
    },
    /// Emit the value of an expression.
    Emit { expr: Expr },
    /// Run `body` once per element of `collection`.
    Loop {
        collection: VarPath,
        binding: LoopBinding,
        body: Vec<Node>,
    },
    /// Run the first branch whose condition holds, else `otherwise`.
    If {
        branches: Vec<Branch>,
        otherwise: Option<Vec<Node>>,
    },
    /// Render another view in place.
    Include { view: String },
    /// Render the requested view inside a layout.
    Yield,
}

/// A guarded body of an `If` node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Branch {
    pub condition: Expr,
    pub body: Vec<Node>,
}

/// A compiled view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Program {
    /// Id of the template instance that compiled this program.
    pub instance_id: String,
    /// Source file the program was compiled from.
    pub source: PathBuf,
    /// When compilation happened.
    pub compiled_at: DateTime<Utc>,
    /// Top-level instructions.
    pub nodes: Vec<Node>,
}

impl Program {
    /// Create a program from compiled nodes.
    pub fn new(instance_id: impl Into<String>, source: impl Into<PathBuf>, nodes: Vec<Node>) -> Self {
        Self {
            instance_id: instance_id.into(),
            source: source.into(),
            compiled_at: Utc::now(),
            nodes,
        }
    }

    /// A program that emits `text` unchanged.
    pub fn literal(instance_id: impl Into<String>, source: impl Into<PathBuf>, text: String) -> Self {
        let nodes = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::Text { text }]
        };
        Self::new(instance_id, source, nodes)
    }

    /// Whether any instruction needs the owning instance (`template`/`yield`).
    pub fn references_instance(&self) -> bool {
        fn walk(nodes: &[Node]) -> bool {
            nodes.iter().any(|node| match node {
                Node::Include { .. } | Node::Yield => true,
                Node::Loop { body, .. } => walk(body),
                Node::If {
                    branches,
                    otherwise,
                } => {
                    branches.iter().any(|b| walk(&b.body))
                        || otherwise.as_deref().is_some_and(walk)
                }
                _ => false,
            })
        }
        walk(&self.nodes)
    }
}
