//! Interpreter for compiled programs.
//!
//! The executor walks a [`Program`] tree and writes output. It holds the
//! owning [`Template`] explicitly, so `template` and `yield` instructions call
//! straight back into that instance instead of looking it up by id.
//!
//! Variable lookup checks loop locals (innermost first), then the instance's
//! bindings. Unbound names resolve to nothing and never fail.

use crate::compiler::{Node, Program};
use crate::engine::template::Template;
use crate::engine::value::{self, is_truthy, write_value};
use crate::error::{Result, VellumError};
use crate::syntax::{BinaryOp, Expr, Func, LoopBinding, PathSegment, UnaryOp, VarPath};
use serde_json::{Map, Value};
use std::borrow::Cow;

/// Runs programs on behalf of one template instance.
pub struct Executor<'t> {
    template: &'t mut Template,
    locals: Vec<Map<String, Value>>,
}

impl<'t> Executor<'t> {
    /// Create an executor for `template`.
    pub fn new(template: &'t mut Template) -> Self {
        Self {
            template,
            locals: Vec::new(),
        }
    }

    /// Execute `program`, appending output to `out`.
    ///
    /// # Errors
    ///
    /// Returns `UnknownInstance` if the program references its owning
    /// instance but was compiled by a different one.
    pub fn run(&mut self, program: &Program, out: &mut String) -> Result<()> {
        if program.instance_id != self.template.id() && program.references_instance() {
            return Err(VellumError::UnknownInstance {
                id: program.instance_id.clone(),
            });
        }
        self.exec(&program.nodes, out)
    }

    fn exec(&mut self, nodes: &[Node], out: &mut String) -> Result<()> {
        for node in nodes {
            match node {
                Node::Text { text } => out.push_str(text),
                Node::Var { path, default } => match self.resolve(path) {
                    Some(value) if !value.is_null() => write_value(&value, out),
                    _ => out.push_str(default.as_deref().unwrap_or("")),
                },
                Node::Emit { expr } => {
                    let value = self.eval(expr)?;
                    write_value(&value, out);
                }
                Node::Loop {
                    collection,
                    binding,
                    body,
                } => self.exec_loop(collection, binding, body, out)?,
                Node::If {
                    branches,
                    otherwise,
                } => {
                    let mut taken = None;
                    for branch in branches {
                        if is_truthy(&self.eval(&branch.condition)?) {
                            taken = Some(&branch.body);
                            break;
                        }
                    }
                    if let Some(body) = taken.or(otherwise.as_ref()) {
                        self.exec(body, out)?;
                    }
                }
                Node::Include { view } => self.template.render_include(view, out)?,
                Node::Yield => self.template.render_yield(out)?,
            }
        }
        Ok(())
    }

    fn exec_loop(
        &mut self,
        collection: &VarPath,
        binding: &LoopBinding,
        body: &[Node],
        out: &mut String,
    ) -> Result<()> {
        let entries = self
            .resolve(collection)
            .map(|v| value::entries(&v))
            .unwrap_or_default();
        let total = entries.len();

        for (index, (key, item)) in entries.into_iter().enumerate() {
            let mut scope = Map::new();
            match binding {
                LoopBinding::Totaled {
                    item: name,
                    counter,
                    total: total_name,
                } => {
                    scope.insert(total_name.clone(), Value::from(total));
                    scope.insert(counter.clone(), Value::from(index));
                    scope.insert(name.clone(), item);
                }
                LoopBinding::Counted {
                    item: name,
                    counter,
                } => {
                    scope.insert(counter.clone(), Value::from(index));
                    scope.insert(name.clone(), item);
                }
                LoopBinding::Value { item: name } => {
                    scope.insert(name.clone(), item);
                }
                LoopBinding::Keyed {
                    key: key_name,
                    value: value_name,
                } => {
                    scope.insert(key_name.clone(), key);
                    scope.insert(value_name.clone(), item);
                }
            }

            self.locals.push(scope);
            let result = self.exec(body, out);
            self.locals.pop();
            result?;
        }

        Ok(())
    }

    fn lookup_root(&self, name: &str) -> Option<&Value> {
        self.locals
            .iter()
            .rev()
            .find_map(|scope| scope.get(name))
            .or_else(|| self.template.bindings().get(name))
    }

    /// Resolve a path to a value, or `None` if any step is missing.
    fn resolve(&self, path: &VarPath) -> Option<Value> {
        let mut current: Cow<'_, Value> = Cow::Borrowed(self.lookup_root(&path.root)?);
        for segment in &path.segments {
            let key = match segment {
                PathSegment::Key(key) => Cow::Borrowed(key.as_str()),
                PathSegment::Lookup(inner) => Cow::Owned(value::key_text(&self.resolve(inner)?)),
            };
            current = Cow::Owned(value::child(&current, &key)?.clone());
        }
        Some(current.into_owned())
    }

    fn eval(&self, expr: &Expr) -> Result<Value> {
        Ok(match expr {
            Expr::Literal(value) => value.clone(),
            Expr::Var(path) => self.resolve(path).unwrap_or(Value::Null),
            Expr::Unary { op, operand } => {
                let operand = self.eval(operand)?;
                match op {
                    UnaryOp::Not => Value::Bool(!is_truthy(&operand)),
                    UnaryOp::Neg => value::number(-value::to_number(&operand).unwrap_or(0.0)),
                }
            }
            Expr::Binary { op, left, right } => self.eval_binary(*op, left, right)?,
            Expr::Call { func, args } => self.eval_call(*func, args)?,
        })
    }

    fn eval_binary(&self, op: BinaryOp, left: &Expr, right: &Expr) -> Result<Value> {
        // Logical operators short-circuit and yield booleans.
        match op {
            BinaryOp::And => {
                return Ok(Value::Bool(
                    is_truthy(&self.eval(left)?) && is_truthy(&self.eval(right)?),
                ))
            }
            BinaryOp::Or => {
                return Ok(Value::Bool(
                    is_truthy(&self.eval(left)?) || is_truthy(&self.eval(right)?),
                ))
            }
            _ => {}
        }

        let l = self.eval(left)?;
        let r = self.eval(right)?;
        let num = |v: &Value| value::to_number(v).unwrap_or(0.0);

        Ok(match op {
            BinaryOp::Eq => Value::Bool(value::loose_eq(&l, &r)),
            BinaryOp::Ne => Value::Bool(!value::loose_eq(&l, &r)),
            BinaryOp::Lt => Value::Bool(value::compare(&l, &r).is_lt()),
            BinaryOp::Le => Value::Bool(value::compare(&l, &r).is_le()),
            BinaryOp::Gt => Value::Bool(value::compare(&l, &r).is_gt()),
            BinaryOp::Ge => Value::Bool(value::compare(&l, &r).is_ge()),
            BinaryOp::Add => value::number(num(&l) + num(&r)),
            BinaryOp::Sub => value::number(num(&l) - num(&r)),
            BinaryOp::Mul => value::number(num(&l) * num(&r)),
            BinaryOp::Concat => {
                let mut s = value::to_output(&l);
                write_value(&r, &mut s);
                Value::String(s)
            }
            BinaryOp::Div | BinaryOp::Rem => {
                let divisor = num(&r);
                if divisor == 0.0 {
                    return Err(VellumError::Render {
                        message: "division by zero".to_string(),
                    });
                }
                if op == BinaryOp::Div {
                    value::number(num(&l) / divisor)
                } else {
                    value::number(num(&l) % divisor)
                }
            }
            BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
        })
    }

    fn eval_call(&self, func: Func, args: &[Expr]) -> Result<Value> {
        let [arg] = args else {
            return Err(VellumError::Render {
                message: format!("{:?} takes exactly one argument", func).to_lowercase(),
            });
        };

        Ok(match func {
            Func::Defined => {
                let bound = match arg {
                    Expr::Var(path) => self.resolve(path).is_some_and(|v| !v.is_null()),
                    other => !self.eval(other)?.is_null(),
                };
                Value::Bool(bound)
            }
            Func::Count => Value::from(value::count(&self.eval(arg)?)),
            Func::Empty => Value::Bool(!is_truthy(&self.eval(arg)?)),
            Func::Upper => Value::String(value::to_output(&self.eval(arg)?).to_uppercase()),
            Func::Lower => Value::String(value::to_output(&self.eval(arg)?).to_lowercase()),
        })
    }
}
