//! Form schema interpretation: turns raw field values into the JSON mapping
//! forwarded to the webhook, and checks required fields before a run.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use thiserror::Error;

use crate::registry::{InputKind, ToolDescriptor, ToolInputSpec};

/// Upload ceiling for file fields (5 MiB).
pub const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// Wire shape of an uploaded file inside the submitted mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileData {
    pub base64: String,
    pub filename: String,
    pub mime_type: String,
    pub size: usize,
}

/// A file as received from the browser, before acceptance checks.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn check(&self) -> Result<(), FieldRejection> {
        if !self.mime_type.starts_with("image/") {
            return Err(FieldRejection::NotAnImage {
                mime_type: self.mime_type.clone(),
            });
        }
        if self.bytes.len() > MAX_FILE_BYTES {
            return Err(FieldRejection::TooLarge {
                size: self.bytes.len(),
            });
        }
        Ok(())
    }

    pub fn into_file_data(self) -> Result<FileData, FieldRejection> {
        self.check()?;
        Ok(FileData {
            base64: STANDARD.encode(&self.bytes),
            size: self.bytes.len(),
            filename: self.filename,
            mime_type: self.mime_type,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldRejection {
    #[error("'{value}' is not an option of {label}")]
    UnknownOption { label: String, value: String },
    #[error("please select an image file (got {mime_type})")]
    NotAnImage { mime_type: String },
    #[error("file size must be less than 5MB (got {size} bytes)")]
    TooLarge { size: usize },
    #[error("{label} does not accept file uploads")]
    NotAFileField { label: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Missing required field: {label}")]
pub struct ValidationError {
    pub label: String,
}

/// Per-submission accumulator. A rejected value never touches the mapping.
#[derive(Debug, Clone, Default)]
pub struct FormState {
    values: Map<String, Value>,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a non-file field from its raw string form. Empty input clears
    /// the field.
    pub fn set(&mut self, input: &ToolInputSpec, raw: &str) -> Result<(), FieldRejection> {
        if raw.is_empty() {
            self.values.remove(&input.name);
            return Ok(());
        }

        let value = match input.kind {
            InputKind::Select => {
                if !input.options.iter().any(|o| o.value == raw) {
                    return Err(FieldRejection::UnknownOption {
                        label: input.label.clone(),
                        value: raw.to_string(),
                    });
                }
                Value::String(raw.to_string())
            }
            InputKind::File => {
                return Err(FieldRejection::NotAFileField {
                    label: input.label.clone(),
                })
            }
            // numbers travel as typed; "0" must stay truthy for required checks
            InputKind::Text | InputKind::Textarea | InputKind::Email | InputKind::Number => {
                Value::String(raw.to_string())
            }
        };

        self.values.insert(input.name.clone(), value);
        Ok(())
    }

    pub fn attach_file(
        &mut self,
        input: &ToolInputSpec,
        upload: FileUpload,
    ) -> Result<(), FieldRejection> {
        if input.kind != InputKind::File {
            return Err(FieldRejection::NotAFileField {
                label: input.label.clone(),
            });
        }
        let file = upload.into_file_data()?;
        self.values.insert(
            input.name.clone(),
            json!({
                "base64": file.base64,
                "filename": file.filename,
                "mimeType": file.mime_type,
                "size": file.size,
            }),
        );
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn into_payload(self) -> Value {
        Value::Object(self.values)
    }
}

/// JavaScript truthiness, which is what the webhook flows were written
/// against.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0 && !f.is_nan()).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fails on the first required input without a truthy value.
pub fn validate_required(tool: &ToolDescriptor, body: &Value) -> Result<(), ValidationError> {
    for input in tool.inputs.iter().filter(|i| i.required) {
        let present = body.get(&input.name).map(is_truthy).unwrap_or(false);
        if !present {
            return Err(ValidationError {
                label: input.label.clone(),
            });
        }
    }
    Ok(())
}
