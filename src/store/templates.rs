use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

use super::defaults::built_in_templates;

/// A clinical note template. Built-in templates are compiled in; custom
/// templates live in the JSON store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Template {
    pub id: String,
    pub name: String,
    pub content: String,
    pub is_default: bool,
}

/// Template storage port
///
/// The pipeline core only ever reads the `content` of the selected template
/// at generation time; lifecycle management belongs to the store.
pub trait TemplateStore: Send + Sync {
    /// Built-in templates followed by custom ones
    fn list(&self) -> Result<Vec<Template>>;

    fn get(&self, id: &str) -> Result<Option<Template>>;

    /// Persist a new custom template
    fn save(&self, name: &str, content: &str) -> Result<Template>;

    /// Update a custom template's name and/or content; built-ins are
    /// immutable and silently unaffected
    fn update(&self, id: &str, name: Option<&str>, content: Option<&str>) -> Result<()>;

    /// Delete a custom template; built-ins cannot be deleted
    fn delete(&self, id: &str) -> Result<()>;
}

/// JSON-file-backed template store
///
/// The file holds only custom templates; built-ins are merged in on read.
pub struct JsonTemplateStore {
    path: PathBuf,
}

impl JsonTemplateStore {
    pub fn new(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create template store directory: {:?}", parent))?;
        }
        info!("Template store at {:?}", path);
        Ok(Self { path })
    }

    fn read_customs(&self) -> Result<Vec<Template>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let raw = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read template store: {:?}", self.path))?;
        serde_json::from_str(&raw).context("Template store file is corrupt")
    }

    fn write_customs(&self, customs: &[Template]) -> Result<()> {
        let raw = serde_json::to_string_pretty(customs).context("Failed to encode templates")?;
        std::fs::write(&self.path, raw)
            .with_context(|| format!("Failed to write template store: {:?}", self.path))
    }
}

impl TemplateStore for JsonTemplateStore {
    fn list(&self) -> Result<Vec<Template>> {
        let mut templates = built_in_templates();
        templates.extend(self.read_customs()?);
        Ok(templates)
    }

    fn get(&self, id: &str) -> Result<Option<Template>> {
        Ok(self.list()?.into_iter().find(|t| t.id == id))
    }

    fn save(&self, name: &str, content: &str) -> Result<Template> {
        let template = Template {
            id: format!("custom-{}", uuid::Uuid::new_v4()),
            name: name.to_string(),
            content: content.to_string(),
            is_default: false,
        };

        let mut customs = self.read_customs()?;
        customs.push(template.clone());
        self.write_customs(&customs)?;

        info!("Saved template {} ({})", template.name, template.id);
        Ok(template)
    }

    fn update(&self, id: &str, name: Option<&str>, content: Option<&str>) -> Result<()> {
        let mut customs = self.read_customs()?;
        if let Some(template) = customs.iter_mut().find(|t| t.id == id) {
            if let Some(name) = name {
                template.name = name.to_string();
            }
            if let Some(content) = content {
                template.content = content.to_string();
            }
            self.write_customs(&customs)?;
        }
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<()> {
        let customs: Vec<Template> = self
            .read_customs()?
            .into_iter()
            .filter(|t| t.id != id)
            .collect();
        self.write_customs(&customs)
    }
}
