//! Decides how a webhook result is shown. `classify` runs once per result;
//! views only match on the returned [`ResultView`].

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;

use crate::webhook::WebhookResult;

pub const UNKNOWN_ERROR: &str = "Unknown error occurred";
pub const DEFAULT_IMAGE_MIME: &str = "image/png";

/// Gap between consecutive downloads when downloading a whole gallery.
pub const DOWNLOAD_STAGGER: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, PartialEq)]
pub enum ResultView {
    Error {
        message: String,
    },
    Gallery {
        items: Vec<GalleryItem>,
        message: Option<String>,
    },
    Generic {
        data: Option<Value>,
        message: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct GalleryItem {
    pub index: usize,
    pub source: Option<ImageSource>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ImageSource {
    Url(String),
    Embedded {
        data: String,
        mime_type: Option<String>,
        file_name: Option<String>,
    },
}

pub fn classify(result: &WebhookResult) -> ResultView {
    if !result.success {
        return ResultView::Error {
            message: result
                .error
                .clone()
                .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
        };
    }

    if let Some(Value::Array(entries)) = &result.data {
        let items: Vec<GalleryItem> = entries
            .iter()
            .enumerate()
            .map(|(index, entry)| GalleryItem {
                index,
                source: ImageSource::from_entry(entry),
            })
            .collect();

        if items.iter().any(|i| i.source.is_some()) {
            return ResultView::Gallery {
                items,
                message: result.message.clone(),
            };
        }
    }

    ResultView::Generic {
        data: result.data.clone(),
        message: result.message.clone(),
    }
}

impl ImageSource {
    /// Recognizes `{ "imageUrl": ... }` and n8n binary items
    /// (`{ "data": { "binary": { "data", "mimeType", "fileName" } } }`).
    pub fn from_entry(entry: &Value) -> Option<Self> {
        if let Some(url) = entry.get("imageUrl").and_then(Value::as_str) {
            if !url.is_empty() {
                return Some(ImageSource::Url(url.to_string()));
            }
        }

        let binary = entry.get("data")?.get("binary")?;
        let data = binary.get("data").and_then(Value::as_str)?;
        if data.is_empty() {
            return None;
        }
        let text = |key: &str| {
            binary
                .get(key)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        Some(ImageSource::Embedded {
            data: data.to_string(),
            mime_type: text("mimeType"),
            file_name: text("fileName"),
        })
    }
}

impl GalleryItem {
    pub fn title(&self) -> String {
        format!("Banner {}", self.index + 1)
    }

    pub fn default_file_name(&self) -> String {
        format!("banner-{}.png", self.index + 1)
    }

    /// What an `<img src>` should point at.
    pub fn display_src(&self) -> Option<String> {
        match self.source.as_ref()? {
            ImageSource::Url(url) => Some(url.clone()),
            ImageSource::Embedded {
                data, mime_type, ..
            } => Some(format!(
                "data:{};base64,{}",
                mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME),
                data
            )),
        }
    }

    /// Turns the item into something downloadable. Embedded images are
    /// decoded here so a corrupt payload is caught before it is offered.
    pub fn materialize(&self) -> Result<DownloadArtifact, DownloadError> {
        match &self.source {
            None => Err(DownloadError::NoSource(self.index)),
            Some(ImageSource::Url(url)) => Ok(DownloadArtifact {
                file_name: self.default_file_name(),
                mime_type: None,
                body: DownloadBody::Remote(url.clone()),
            }),
            Some(ImageSource::Embedded {
                data,
                mime_type,
                file_name,
            }) => {
                let bytes = STANDARD
                    .decode(data.trim())
                    .map_err(|e| DownloadError::Decode {
                        index: self.index,
                        reason: e.to_string(),
                    })?;
                Ok(DownloadArtifact {
                    file_name: file_name.clone().unwrap_or_else(|| self.default_file_name()),
                    mime_type: Some(
                        mime_type
                            .clone()
                            .unwrap_or_else(|| DEFAULT_IMAGE_MIME.to_string()),
                    ),
                    body: DownloadBody::Bytes(bytes),
                })
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadArtifact {
    pub file_name: String,
    pub mime_type: Option<String>,
    pub body: DownloadBody,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadBody {
    Remote(String),
    Bytes(Vec<u8>),
}

impl DownloadArtifact {
    /// Link target for an `<a download>` element.
    pub fn href(&self) -> String {
        match &self.body {
            DownloadBody::Remote(url) => url.clone(),
            DownloadBody::Bytes(bytes) => format!(
                "data:{};base64,{}",
                self.mime_type.as_deref().unwrap_or(DEFAULT_IMAGE_MIME),
                STANDARD.encode(bytes)
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DownloadError {
    #[error("no valid image found for item {0}")]
    NoSource(usize),
    #[error("item {index} holds invalid base64: {reason}")]
    Decode { index: usize, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScheduledDownload {
    pub index: usize,
    pub delay: Duration,
}

/// "Download all": every item fires on its own timer, spaced out so the
/// browser's download manager is not flooded.
pub fn download_schedule(indices: impl IntoIterator<Item = usize>) -> Vec<ScheduledDownload> {
    indices
        .into_iter()
        .map(|index| ScheduledDownload {
            index,
            delay: DOWNLOAD_STAGGER * index as u32,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn failure_becomes_error_view() {
        let view = classify(&WebhookResult::failed("HTTP 500: Internal Server Error"));
        assert_eq!(
            view,
            ResultView::Error {
                message: "HTTP 500: Internal Server Error".into()
            }
        );

        let view = classify(&WebhookResult::default());
        assert_eq!(
            view,
            ResultView::Error {
                message: UNKNOWN_ERROR.into()
            }
        );
    }

    #[test]
    fn image_url_list_selects_gallery() {
        let view = classify(&WebhookResult::ok(json!([{ "imageUrl": "http://x/a.png" }])));
        match view {
            ResultView::Gallery { items, .. } => {
                assert_eq!(items.len(), 1);
                assert_eq!(items[0].source, Some(ImageSource::Url("http://x/a.png".into())));
            }
            other => panic!("expected gallery, got {other:?}"),
        }
    }

    #[test]
    fn object_selects_generic() {
        let result = WebhookResult {
            message: Some("done".into()),
            ..WebhookResult::ok(json!({ "foo": 1 }))
        };
        assert_eq!(
            classify(&result),
            ResultView::Generic {
                data: Some(json!({ "foo": 1 })),
                message: Some("done".into())
            }
        );
    }

    #[test]
    fn list_without_images_selects_generic() {
        let view = classify(&WebhookResult::ok(json!([{ "title": "a" }, 3])));
        assert!(matches!(view, ResultView::Generic { .. }));
        let view = classify(&WebhookResult::ok(json!([])));
        assert!(matches!(view, ResultView::Generic { .. }));
    }

    #[test]
    fn items_without_source_become_placeholders() {
        let view = classify(&WebhookResult::ok(json!([
            { "data": { "binary": { "data": "aGk=", "mimeType": "image/jpeg", "fileName": "a.jpg" } } },
            { "caption": "nothing here" }
        ])));
        let ResultView::Gallery { items, .. } = view else {
            panic!("expected gallery");
        };
        assert!(items[0].source.is_some());
        assert_eq!(items[1].source, None);
        assert_eq!(items[1].display_src(), None);
        assert_eq!(items[0].display_src().unwrap(), "data:image/jpeg;base64,aGk=");
    }

    #[test]
    fn embedded_image_decodes_to_bytes() {
        let item = GalleryItem {
            index: 2,
            source: Some(ImageSource::Embedded {
                data: "aGk=".into(),
                mime_type: None,
                file_name: None,
            }),
        };
        let artifact = item.materialize().expect("decode");
        assert_eq!(artifact.file_name, "banner-3.png");
        assert_eq!(artifact.mime_type.as_deref(), Some("image/png"));
        assert_eq!(artifact.body, DownloadBody::Bytes(b"hi".to_vec()));
        assert_eq!(artifact.href(), "data:image/png;base64,aGk=");
    }

    #[test]
    fn corrupt_payload_fails_only_that_download() {
        let item = GalleryItem {
            index: 0,
            source: Some(ImageSource::Embedded {
                data: "%%%".into(),
                mime_type: None,
                file_name: None,
            }),
        };
        assert!(matches!(item.materialize(), Err(DownloadError::Decode { .. })));

        let empty = GalleryItem {
            index: 1,
            source: None,
        };
        assert_eq!(empty.materialize(), Err(DownloadError::NoSource(1)));
    }

    #[test]
    fn bulk_downloads_are_staggered() {
        let schedule = download_schedule([0, 1, 3]);
        let delays: Vec<u128> = schedule.iter().map(|s| s.delay.as_millis()).collect();
        assert_eq!(delays, vec![0, 500, 1500]);
    }
}
