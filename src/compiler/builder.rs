//! Structuring pass: a flat stream of text and tags into a node tree.

use crate::compiler::program::{Branch, Node};
use crate::syntax::{Expr, LoopBinding, Tag, VarPath};

enum Block {
    Loop {
        collection: VarPath,
        binding: LoopBinding,
    },
    If {
        branches: Vec<Branch>,
        // `None` once `else` has been seen.
        condition: Option<Expr>,
    },
}

struct Frame {
    block: Block,
    body: Vec<Node>,
}

/// Incrementally builds a node tree, tracking open blocks.
#[derive(Default)]
pub struct TreeBuilder {
    root: Vec<Node>,
    open: Vec<Frame>,
}

impl TreeBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&mut self) -> &mut Vec<Node> {
        match self.open.last_mut() {
            Some(frame) => &mut frame.body,
            None => &mut self.root,
        }
    }

    /// Append literal text, merging with preceding text.
    pub fn text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let body = self.body();
        if let Some(Node::Text { text: last }) = body.last_mut() {
            last.push_str(text);
        } else {
            body.push(Node::Text {
                text: text.to_string(),
            });
        }
    }

    /// Append a recognized tag. Errors describe misplaced block tags.
    pub fn tag(&mut self, tag: Tag) -> Result<(), String> {
        let keyword = tag.keyword();
        match tag {
            Tag::Loop {
                collection,
                binding,
            } => self.open.push(Frame {
                block: Block::Loop {
                    collection,
                    binding,
                },
                body: Vec::new(),
            }),
            Tag::If(condition) => self.open.push(Frame {
                block: Block::If {
                    branches: Vec::new(),
                    condition: Some(condition),
                },
                body: Vec::new(),
            }),
            Tag::ElseIf(next) => self.next_branch(Some(next), keyword)?,
            Tag::Else => self.next_branch(None, keyword)?,
            Tag::EndIf => {
                let node = match self.open.pop() {
                    Some(Frame {
                        block:
                            Block::If {
                                mut branches,
                                condition,
                            },
                        body,
                    }) => match condition {
                        Some(condition) => {
                            branches.push(Branch { condition, body });
                            Node::If {
                                branches,
                                otherwise: None,
                            }
                        }
                        None => Node::If {
                            branches,
                            otherwise: Some(body),
                        },
                    },
                    Some(frame) => return Err(mismatch(keyword, &frame)),
                    None => return Err(format!("`{}` without an open `if`", keyword)),
                };
                self.body().push(node);
            }
            Tag::EndLoop => {
                let node = match self.open.pop() {
                    Some(Frame {
                        block:
                            Block::Loop {
                                collection,
                                binding,
                            },
                        body,
                    }) => Node::Loop {
                        collection,
                        binding,
                        body,
                    },
                    Some(frame) => return Err(mismatch(keyword, &frame)),
                    None => return Err(format!("`{}` without an open `loop`", keyword)),
                };
                self.body().push(node);
            }
            Tag::Emit(expr) => self.body().push(Node::Emit { expr }),
            Tag::Var { path, default } => self.body().push(Node::Var { path, default }),
            Tag::Include(view) => self.body().push(Node::Include { view }),
            Tag::Yield => self.body().push(Node::Yield),
        }
        Ok(())
    }

    fn next_branch(&mut self, next: Option<Expr>, keyword: &str) -> Result<(), String> {
        let Some(frame) = self.open.last_mut() else {
            return Err(format!("`{}` without an open `if`", keyword));
        };
        let Block::If {
            branches,
            condition,
        } = &mut frame.block
        else {
            return Err(format!("`{}` inside a `loop` without an open `if`", keyword));
        };
        let Some(current) = condition.take() else {
            return Err(format!("`{}` after `else`", keyword));
        };
        branches.push(Branch {
            condition: current,
            body: std::mem::take(&mut frame.body),
        });
        *condition = next;
        Ok(())
    }

    /// Finish building. Fails if a block is still open.
    pub fn finish(self) -> Result<Vec<Node>, String> {
        match self.open.last() {
            Some(Frame {
                block: Block::Loop { .. },
                ..
            }) => Err("unclosed `loop`".to_string()),
            Some(Frame {
                block: Block::If { .. },
                ..
            }) => Err("unclosed `if`".to_string()),
            None => Ok(self.root),
        }
    }
}

fn mismatch(closer: &str, frame: &Frame) -> String {
    let open = match frame.block {
        Block::Loop { .. } => "loop",
        Block::If { .. } => "if",
    };
    format!("`{}` closes an open `{}`", closer, open)
}
