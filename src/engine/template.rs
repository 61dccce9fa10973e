//! Template instances: configuration, bindings and the render entry points.

use crate::cache::{ArtifactCache, ResolvedView};
use crate::compiler::{Compiler, Program};
use crate::config::TemplateOptions;
use crate::engine::bindings::Bindings;
use crate::engine::executor::Executor;
use crate::error::{Result, VellumError};
use crate::syntax::{RuleSet, TagRule};
use serde::Serialize;
use serde_json::{Map, Value};
use std::io::Write;
use std::path::PathBuf;

/// Nested renders (`template` and `yield`) allowed before giving up.
const MAX_DEPTH: usize = 64;

/// One configured rendering context.
///
/// Holds the options it was built from, the tag rules used to compile its
/// views, the variables assigned to it, and an optional layout.
///
/// # Layouts
///
/// With a layout set, `render(view)` renders the layout instead; the layout's
/// `{yield}` clears the layout and renders `view` in place. Without `{yield}`
/// the layout stays set for the next render.
pub struct Template {
    id: String,
    options: TemplateOptions,
    rules: RuleSet,
    bindings: Bindings,
    layout: Option<String>,
    current_view: Option<String>,
    cache: ArtifactCache,
    depth: usize,
}

impl std::fmt::Debug for Template {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Template")
            .field("id", &self.id)
            .field("options", &self.options)
            .field("rules", &self.rules.len())
            .field("bindings", &self.bindings.len())
            .field("layout", &self.layout)
            .field("current_view", &self.current_view)
            .finish()
    }
}

impl Template {
    /// Create an instance with the built-in tag rules.
    ///
    /// # Errors
    ///
    /// Returns `ConfigValidationError` if the options are unusable.
    pub fn new(options: TemplateOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self {
            id: options.instance_id(),
            cache: ArtifactCache::from_options(&options),
            options,
            rules: RuleSet::with_builtins(),
            bindings: Bindings::new(),
            layout: None,
            current_view: None,
            depth: 0,
        })
    }

    /// Identifier derived from the options.
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn options(&self) -> &TemplateOptions {
        &self.options
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Append a rule after the existing ones.
    pub fn define(&mut self, rule: TagRule) {
        self.rules.define(rule);
    }

    /// Insert a rule ahead of every existing one.
    pub fn define_first(&mut self, rule: TagRule) {
        self.rules.define_first(rule);
    }

    /// Bind a variable.
    pub fn assign(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.bindings.assign(name, value);
        self
    }

    /// Merge a mapping into the bindings, key by key.
    pub fn assign_all(&mut self, values: Map<String, Value>) -> &mut Self {
        self.bindings.merge(values);
        self
    }

    /// Merge any serializable map or struct into the bindings.
    pub fn assign_serialize<T: Serialize + ?Sized>(&mut self, values: &T) -> Result<&mut Self> {
        self.bindings.merge_serialize(values)?;
        Ok(self)
    }

    pub fn binding(&self, name: &str) -> Option<&Value> {
        self.bindings.get(name)
    }

    pub fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    pub fn clear_bindings(&mut self) {
        self.bindings.clear();
    }

    /// Render views inside `view` until a `{yield}` consumes it.
    pub fn layout(&mut self, view: impl Into<String>) -> &mut Self {
        self.layout = Some(view.into());
        self
    }

    pub fn clear_layout(&mut self) {
        self.layout = None;
    }

    /// The pending layout, if any.
    pub fn current_layout(&self) -> Option<&str> {
        self.layout.as_deref()
    }

    /// The view most recently passed to [`render`](Self::render).
    pub fn current_view(&self) -> Option<&str> {
        self.current_view.as_deref()
    }

    /// Source file for `view`: `<directory>/<view>.<suffix>`.
    pub fn view_path(&self, view: &str) -> PathBuf {
        self.options
            .template_directory
            .join(format!("{}.{}", view, self.options.file_suffix))
    }

    /// Render `view`, through the layout if one is set.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use vellum::{Template, TemplateOptions};
    ///
    /// let options = TemplateOptions::new("views").with_compiler(true);
    /// let mut template = Template::new(options)?;
    /// template.assign("name", "Ada");
    /// let html = template.render("hello")?;
    /// # Ok::<(), vellum::VellumError>(())
    /// ```
    pub fn render(&mut self, view: &str) -> Result<String> {
        tracing::debug!("Rendering {} with instance {}", view, self.id);
        self.current_view = Some(view.to_string());
        self.depth = 0;

        let target = self.layout.clone().unwrap_or_else(|| view.to_string());
        let mut out = String::new();
        self.render_view(&target, &mut out)?;
        Ok(out)
    }

    /// Render `view` into `writer`.
    pub fn render_to<W: Write + ?Sized>(&mut self, view: &str, writer: &mut W) -> Result<()> {
        let output = self.render(view)?;
        writer.write_all(output.as_bytes())?;
        Ok(())
    }

    /// Compiled program for `view`, building it if needed.
    pub fn program(&self, view: &str) -> Result<Program> {
        let source = self.view_path(view);
        let compiler = Compiler::new(
            &self.rules,
            &self.options.left_delimiter,
            &self.options.right_delimiter,
        );
        self.cache
            .load(&self.id, &source, |path, text| compiler.compile(&self.id, path, text))
    }

    /// Path `view` loads from: its compiled artifact, or the source itself
    /// when the compiler is disabled. Compiles if needed.
    pub fn resolve(&self, view: &str) -> Result<ResolvedView> {
        let source = self.view_path(view);
        let compiler = Compiler::new(
            &self.rules,
            &self.options.left_delimiter,
            &self.options.right_delimiter,
        );
        self.cache
            .resolve(&self.id, &source, |path, text| compiler.compile(&self.id, path, text))
    }

    /// Render `view` directly, ignoring the layout. Used by `{template}`.
    pub(crate) fn render_include(&mut self, view: &str, out: &mut String) -> Result<()> {
        self.render_view(view, out)
    }

    /// Consume the layout and render the requested view. Used by `{yield}`.
    pub(crate) fn render_yield(&mut self, out: &mut String) -> Result<()> {
        self.layout = None;
        let view = self.current_view.clone().ok_or_else(|| VellumError::Render {
            message: "yield outside of a render".to_string(),
        })?;
        self.render_view(&view, out)
    }

    fn render_view(&mut self, view: &str, out: &mut String) -> Result<()> {
        if self.depth >= MAX_DEPTH {
            return Err(VellumError::Render {
                message: format!("views nested more than {} levels deep at '{}'", MAX_DEPTH, view),
            });
        }

        let program = self.program(view)?;
        self.depth += 1;
        let result = Executor::new(self).run(&program, out);
        self.depth -= 1;
        result
    }
}
