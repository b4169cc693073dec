use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;

use crate::icon::Icon;

// The shape of one tool entry (matches tools.json)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,        // lucide icon name, resolved through `Icon`
    pub webhook_url: String, // n8n workflow trigger
    #[serde(default)]
    pub inputs: Vec<ToolInputSpec>,
}

impl ToolDescriptor {
    pub fn icon(&self) -> Icon {
        Icon::from_name(&self.icon)
    }

    pub fn input(&self, name: &str) -> Option<&ToolInputSpec> {
        self.inputs.iter().find(|i| i.name == name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInputSpec {
    pub name: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: InputKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Textarea,
    Select,
    Number,
    Email,
    File,
}

/// A select option. Config files may list either `{ "value", "label" }`
/// objects or bare strings, where the string doubles as the label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawOption")]
pub struct SelectOption {
    pub value: String,
    pub label: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl From<RawOption> for SelectOption {
    fn from(raw: RawOption) -> Self {
        match raw {
            RawOption::Plain(value) => Self {
                label: value.clone(),
                value,
            },
            RawOption::Labeled { value, label } => Self { value, label },
        }
    }
}

/// Top-level config document: `{ "tools": [...] }`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolsConfig {
    #[serde(default)]
    pub tools: Vec<ToolDescriptor>,
}

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("failed to read registry at '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse registry at '{path}': {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("duplicate tool id '{0}'")]
    DuplicateTool(String),
    #[error("tool '{tool}' declares input '{input}' more than once")]
    DuplicateInput { tool: String, input: String },
    #[error("tool '{tool}': select input '{input}' has no options")]
    EmptySelect { tool: String, input: String },
}

/// The immutable, ordered tool list. Built once at startup and shared
/// behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    tools: Vec<ToolDescriptor>,
}

impl Registry {
    // Reads the tools document and returns the validated registry
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let path = path.as_ref();

        let content = fs::read_to_string(path)
            .await
            .map_err(|source| RegistryError::Io {
                path: path.to_path_buf(),
                source,
            })?;

        let config: ToolsConfig =
            serde_json::from_str(&content).map_err(|source| RegistryError::Parse {
                path: path.to_path_buf(),
                source,
            })?;

        Self::from_config(config)
    }

    pub fn from_config(config: ToolsConfig) -> Result<Self, RegistryError> {
        let mut ids = HashSet::new();
        for tool in &config.tools {
            if !ids.insert(tool.id.as_str()) {
                return Err(RegistryError::DuplicateTool(tool.id.clone()));
            }

            let mut names = HashSet::new();
            for input in &tool.inputs {
                if !names.insert(input.name.as_str()) {
                    return Err(RegistryError::DuplicateInput {
                        tool: tool.id.clone(),
                        input: input.name.clone(),
                    });
                }
                if input.kind == InputKind::Select && input.options.is_empty() {
                    return Err(RegistryError::EmptySelect {
                        tool: tool.id.clone(),
                        input: input.name.clone(),
                    });
                }
            }

            // Sanity check, the tool stays registered either way
            match reqwest::Url::parse(&tool.webhook_url) {
                Ok(url) if matches!(url.scheme(), "http" | "https") => {}
                _ => tracing::warn!(
                    "Tool '{}' registered with an unusable webhook url: {}",
                    tool.id,
                    tool.webhook_url
                ),
            }
        }

        Ok(Self {
            tools: config.tools,
        })
    }

    pub fn tools(&self) -> &[ToolDescriptor] {
        &self.tools
    }

    pub fn get(&self, id: &str) -> Option<&ToolDescriptor> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}
