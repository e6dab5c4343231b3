//! Bootstrap script templates
//!
//! Instance bootstrap scripts often need network values that only exist
//! after creation (the VPC id, a subnet id). A [`BootstrapTemplate`] fills
//! the `{{ name }}` placeholders of a script either from plain values or
//! from graph references, once those are resolved.
//!
//! Only placeholder expressions go through Tera (so filters such as
//! `{{ region | upper }}` work). Everything else is copied verbatim, so
//! shell syntax like `${#ARR[@]}` or `{%` is left alone.

use crate::error::{CloudError, Result};
use crate::graph::Reference;
use crate::state::ResolvedResources;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tera::{Context, Tera};
use tracing::debug;

/// `{{ name }}`, `{{name}}`, `{{ name | filter }}`, `{{- name -}}`
const PLACEHOLDER_PATTERN: &str = r"\{\{-?\s*([A-Za-z_][A-Za-z0-9_]*)\s*(?:\|[^}]*)?-?\}\}";

/// Template for an instance bootstrap script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapTemplate {
    source: String,
}

impl BootstrapTemplate {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        debug!(path = %path.display(), "Loaded bootstrap template");
        Ok(Self::new(source))
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Names of the `{{ name }}` placeholders, sorted and unique
    pub fn placeholders(&self) -> Result<Vec<String>> {
        let pattern = placeholder_pattern()?;
        let names: BTreeSet<String> = pattern
            .captures_iter(&self.source)
            .map(|c| c[1].to_string())
            .collect();
        Ok(names.into_iter().collect())
    }

    /// Render with plain values
    ///
    /// Every placeholder must have a value.
    pub fn render(&self, values: &BTreeMap<String, String>) -> Result<String> {
        let pattern = placeholder_pattern()?;
        let mut context = Context::new();
        for (key, value) in values {
            context.insert(key, value);
        }

        let mut rendered = String::with_capacity(self.source.len());
        let mut copied = 0;
        for placeholder in pattern.find_iter(&self.source) {
            rendered.push_str(&self.source[copied..placeholder.start()]);
            let value = Tera::one_off(placeholder.as_str(), &context, false)
                .map_err(|e| CloudError::Template(tera_error_detail(&e)))?;
            rendered.push_str(&value);
            copied = placeholder.end();
        }
        rendered.push_str(&self.source[copied..]);

        Ok(rendered)
    }

    /// Render with placeholders bound to resource attributes
    ///
    /// Fails with [`CloudError::UnresolvedReference`] while any bound
    /// resource has not been created yet. Entries of `values` take
    /// precedence over bindings of the same name.
    pub fn render_resolved(
        &self,
        bindings: &BTreeMap<String, Reference>,
        resolved: &ResolvedResources,
        values: &BTreeMap<String, String>,
    ) -> Result<String> {
        let mut merged = BTreeMap::new();
        for (name, reference) in bindings {
            let value = resolved
                .attribute(reference)
                .ok_or_else(|| CloudError::UnresolvedReference(reference.to_string()))?;
            merged.insert(name.clone(), plain_string(value));
        }
        merged.extend(values.iter().map(|(k, v)| (k.clone(), v.clone())));

        self.render(&merged)
    }
}

fn placeholder_pattern() -> Result<Regex> {
    Regex::new(PLACEHOLDER_PATTERN).map_err(|e| CloudError::Template(e.to_string()))
}

fn plain_string(value: serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Collect the whole error chain; the top-level Tera message alone only
/// names the template
fn tera_error_detail(err: &tera::Error) -> String {
    let mut messages = vec![err.to_string()];
    let mut source = std::error::Error::source(err);
    while let Some(inner) = source {
        messages.push(inner.to_string());
        source = inner.source();
    }
    messages.join(": ")
}
