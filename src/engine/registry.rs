//! Directory of live template instances, keyed by instance id.

use crate::config::TemplateOptions;
use crate::engine::template::Template;
use crate::error::{Result, VellumError};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Owns template instances so hosts can share one per configuration.
///
/// # Example
///
/// ```
/// use vellum::{TemplateOptions, TemplateRegistry};
///
/// let mut registry = TemplateRegistry::new();
/// let id = registry
///     .get_or_create(TemplateOptions::new("views"))
///     .unwrap()
///     .id()
///     .to_string();
///
/// // Same options, same instance.
/// registry.get_or_create(TemplateOptions::new("views")).unwrap();
/// assert_eq!(registry.len(), 1);
/// assert!(registry.get(&id).is_ok());
/// ```
#[derive(Debug, Default)]
pub struct TemplateRegistry {
    instances: HashMap<String, Template>,
}

impl TemplateRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an instance, replacing any previous one with the same id.
    pub fn register(&mut self, template: Template) -> &mut Template {
        let id = template.id().to_string();
        if self.instances.contains_key(&id) {
            tracing::debug!("Replacing template instance {}", id);
        }
        match self.instances.entry(id) {
            Entry::Occupied(mut entry) => {
                entry.insert(template);
                entry.into_mut()
            }
            Entry::Vacant(entry) => entry.insert(template),
        }
    }

    /// Look up an instance.
    ///
    /// # Errors
    ///
    /// Returns `UnknownInstance` if no instance has that id.
    pub fn get(&self, id: &str) -> Result<&Template> {
        self.instances
            .get(id)
            .ok_or_else(|| VellumError::UnknownInstance { id: id.to_string() })
    }

    /// Look up an instance for rendering.
    pub fn get_mut(&mut self, id: &str) -> Result<&mut Template> {
        self.instances
            .get_mut(id)
            .ok_or_else(|| VellumError::UnknownInstance { id: id.to_string() })
    }

    /// Reuse the instance configured by `options`, creating it on first use.
    pub fn get_or_create(&mut self, options: TemplateOptions) -> Result<&mut Template> {
        match self.instances.entry(options.instance_id()) {
            Entry::Occupied(entry) => Ok(entry.into_mut()),
            Entry::Vacant(entry) => {
                let template = Template::new(options)?;
                tracing::debug!("Registered template instance {}", template.id());
                Ok(entry.insert(template))
            }
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.instances.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Registered ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.instances.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}
