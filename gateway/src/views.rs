//! Server-rendered HTML for the dashboard, tool pages and run results.

use std::fmt::Write;

use dashboard_core::registry::{InputKind, ToolDescriptor, ToolInputSpec};
use dashboard_core::render::{download_schedule, GalleryItem, ImageSource, ResultView};
use tracing::warn;

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f1f5f9;color:#0f172a;margin:0}\
main{max-width:64rem;margin:0 auto;padding:3rem 1rem}\
.grid{display:grid;grid-template-columns:repeat(auto-fill,minmax(18rem,1fr));gap:1.5rem}\
.card{background:#fff;border-radius:.75rem;padding:1.25rem;box-shadow:0 1px 3px #0002}\
.card a{color:inherit;text-decoration:none}\
.icon{font-size:1.5rem;padding:.5rem;border-radius:.5rem;background:#6366f11a}\
.muted{color:#64748b;font-size:.875rem}\
label{display:block;font-weight:600;margin:1rem 0 .25rem}\
.req{color:#ef4444;margin-left:.25rem}\
input,textarea,select{width:100%;padding:.5rem;border:1px solid #cbd5e1;border-radius:.375rem}\
button{margin-top:1.5rem;width:100%;padding:.75rem;border:0;border-radius:.375rem;background:#0f172a;color:#fff}\
.badge{display:inline-block;padding:.125rem .5rem;border-radius:9999px;font-size:.75rem}\
.ok{background:#dcfce7;color:#166534}.fail{background:#fee2e2;color:#991b1b}\
.alert{border:1px solid #fca5a5;background:#fef2f2;color:#991b1b;padding:1rem;border-radius:.5rem}\
pre{background:#e2e8f0;padding:1rem;border-radius:.5rem;overflow:auto}\
.placeholder{height:12rem;background:#e2e8f0;display:flex;align-items:center;justify-content:center}\
.gallery img{width:100%;height:auto}";

const DOWNLOAD_ALL_SCRIPT: &str = "<script>\
function downloadAll(){document.querySelectorAll('a[data-download-delay]').forEach(function(a){\
setTimeout(function(){a.click()},Number(a.dataset.downloadDelay))})}</script>";

pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html><html lang=\"en\"><head><meta charset=\"utf-8\">\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\
         <title>{}</title><style>{}</style></head><body><main>{}</main></body></html>",
        escape(title),
        STYLE,
        body
    )
}

fn plural(n: usize, word: &str) -> String {
    format!("{} {}{}", n, word, if n == 1 { "" } else { "s" })
}

pub fn dashboard(tools: &[ToolDescriptor], config_path: &str) -> String {
    let mut body = String::from(
        "<h1>n8n App Dashboard</h1><p class=\"muted\">Run your automation workflows with ease</p>",
    );

    if tools.is_empty() {
        let _ = write!(
            body,
            "<p class=\"muted\">No tools configured yet. Add your first tool to <code>{}</code></p>",
            escape(config_path)
        );
    } else {
        body.push_str("<div class=\"grid\">");
        for tool in tools {
            let _ = write!(
                body,
                "<div class=\"card\"><a href=\"/tools/{id}\">\
                 <span class=\"icon\" title=\"{icon_name}\">{glyph}</span> <strong>{name}</strong>\
                 <p>{description}</p><p class=\"muted\">{inputs}</p></a></div>",
                id = escape(&tool.id),
                icon_name = tool.icon().name(),
                glyph = tool.icon().glyph(),
                name = escape(&tool.name),
                description = escape(&tool.description),
                inputs = plural(tool.inputs.len(), "input"),
            );
        }
        body.push_str("</div>");
    }

    body.push_str(
        "<p class=\"muted\" style=\"text-align:center;margin-top:4rem\">\
         Powered by <a href=\"https://n8n.io\" target=\"_blank\" rel=\"noopener noreferrer\">n8n</a></p>",
    );
    layout("n8n App Dashboard", &body)
}

pub fn not_found_page() -> String {
    layout(
        "Tool Not Found",
        "<h1>Tool Not Found</h1><p><a href=\"/\">&larr; Back to Dashboard</a></p>",
    )
}

/// Tool page: header, generated form, then any rejected-field notices and
/// the run result.
pub fn tool_page(tool: &ToolDescriptor, notices: &[String], result: Option<&ResultView>) -> String {
    let mut body = format!(
        "<p><a href=\"/\">&larr; Back to Dashboard</a></p><div class=\"card\"><h2>{}</h2>\
         <p class=\"muted\">{}</p>{}</div>",
        escape(&tool.name),
        escape(&tool.description),
        form(tool)
    );

    for notice in notices {
        let _ = write!(body, "<p class=\"alert\">{}</p>", escape(notice));
    }

    if let Some(view) = result {
        body.push_str(&result_view(view));
    }
    layout(&tool.name, &body)
}

pub fn form(tool: &ToolDescriptor) -> String {
    let mut out = format!(
        "<form method=\"post\" action=\"/tools/{}\" enctype=\"multipart/form-data\">",
        escape(&tool.id)
    );
    for input in &tool.inputs {
        let _ = write!(
            out,
            "<label for=\"{name}\">{label}{marker}</label>{control}",
            name = escape(&input.name),
            label = escape(&input.label),
            marker = if input.required {
                "<span class=\"req\">*</span>"
            } else {
                ""
            },
            control = field(input),
        );
    }
    let _ = write!(out, "<button type=\"submit\">Run {}</button></form>", escape(&tool.name));
    out
}

pub fn field(input: &ToolInputSpec) -> String {
    let mut attrs = format!(
        "id=\"{0}\" name=\"{0}\"",
        escape(&input.name)
    );
    if input.required {
        attrs.push_str(" required");
    }
    if let Some(placeholder) = &input.placeholder {
        let _ = write!(attrs, " placeholder=\"{}\"", escape(placeholder));
    }

    match input.kind {
        InputKind::Textarea => format!("<textarea {attrs} rows=\"4\"></textarea>"),
        InputKind::Select => {
            let mut out = format!("<select {attrs}><option value=\"\">Select an option...</option>");
            for option in &input.options {
                let _ = write!(
                    out,
                    "<option value=\"{}\">{}</option>",
                    escape(&option.value),
                    escape(&option.label)
                );
            }
            out.push_str("</select>");
            out
        }
        InputKind::Number => format!("<input type=\"number\" step=\"any\" {attrs}>"),
        InputKind::Email => format!("<input type=\"email\" {attrs}>"),
        InputKind::File => format!(
            "<input type=\"file\" accept=\"image/*\" {attrs}>\
             <p class=\"muted\">Images only, up to 5MB</p>"
        ),
        InputKind::Text => format!("<input type=\"text\" {attrs}>"),
    }
}

pub fn result_view(view: &ResultView) -> String {
    let mut out = String::from("<section style=\"margin-top:1.5rem\">");
    match view {
        ResultView::Error { message } => {
            let _ = write!(
                out,
                "<p><span class=\"badge fail\">Failed</span></p><div class=\"alert\">{}</div>",
                escape(message)
            );
        }
        ResultView::Generic { data, message } => {
            out.push_str("<p><span class=\"badge ok\">Completed</span></p>");
            push_message(&mut out, message.as_deref());
            if let Some(data) = data {
                let pretty = serde_json::to_string_pretty(data).unwrap_or_else(|_| data.to_string());
                let _ = write!(out, "<pre>{}</pre>", escape(&pretty));
            }
        }
        ResultView::Gallery { items, message } => {
            out.push_str("<p><span class=\"badge ok\">Completed</span></p>");
            push_message(&mut out, message.as_deref());
            out.push_str(&gallery(items));
        }
    }
    out.push_str("</section>");
    out
}

fn push_message(out: &mut String, message: Option<&str>) {
    if let Some(message) = message {
        let _ = write!(out, "<p class=\"muted\">{}</p>", escape(message));
    }
}

pub fn gallery(items: &[GalleryItem]) -> String {
    let delays: std::collections::HashMap<usize, u128> =
        download_schedule(items.iter().map(|i| i.index))
            .into_iter()
            .map(|s| (s.index, s.delay.as_millis()))
            .collect();

    let mut out = format!(
        "{DOWNLOAD_ALL_SCRIPT}<div><h3>Generated Banners</h3><p class=\"muted\">{} created</p>\
         <button type=\"button\" onclick=\"downloadAll()\">Download All</button></div>\
         <div class=\"grid gallery\">",
        plural(items.len(), "banner")
    );

    for item in items {
        let _ = write!(out, "<div class=\"card\"><strong>{}</strong>", escape(&item.title()));

        match item.display_src() {
            Some(src) => {
                let _ = write!(
                    out,
                    "<img src=\"{}\" alt=\"{}\">",
                    escape(&src),
                    escape(&item.title())
                );

                // a bad payload only costs this item its download link
                match item.materialize() {
                    Ok(artifact) => {
                        let _ = write!(
                            out,
                            "<p><a href=\"{}\" download=\"{}\" data-download-delay=\"{}\">Download</a>",
                            escape(&artifact.href()),
                            escape(&artifact.file_name),
                            delays.get(&item.index).copied().unwrap_or_default()
                        );
                        if let Some(ImageSource::Url(url)) = &item.source {
                            let _ = write!(
                                out,
                                " &middot; <a href=\"{}\" target=\"_blank\" rel=\"noopener noreferrer\">Open</a>",
                                escape(url)
                            );
                        }
                        out.push_str("</p>");
                    }
                    Err(e) => warn!("Download failed: {}", e),
                }
            }
            None => out.push_str("<div class=\"placeholder\"><p class=\"muted\">No image available</p></div>"),
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashboard_core::render::classify;
    use dashboard_core::registry::ToolsConfig;
    use dashboard_core::WebhookResult;
    use serde_json::json;

    fn tool() -> ToolDescriptor {
        let config: ToolsConfig = serde_json::from_value(json!({
            "tools": [{
                "id": "banners",
                "name": "Banner <Generator>",
                "description": "Makes banners",
                "icon": "Image",
                "webhookUrl": "http://localhost/hook",
                "inputs": [
                    { "name": "product", "label": "Product", "type": "text", "required": true, "placeholder": "e.g. shoes" },
                    { "name": "tone", "label": "Tone", "type": "select", "options": ["casual", "formal"] },
                    { "name": "count", "label": "Count", "type": "number" },
                    { "name": "photo", "label": "Photo", "type": "file" }
                ]
            }]
        }))
        .unwrap();
        config.tools.into_iter().next().unwrap()
    }

    #[test]
    fn escape_covers_markup_characters() {
        assert_eq!(escape(r#"<a href="x">'&'</a>"#), "&lt;a href=&quot;x&quot;&gt;&#39;&amp;&#39;&lt;/a&gt;");
    }

    #[test]
    fn dashboard_lists_cards_or_empty_state() {
        let html = dashboard(&[tool()], "tools/tools.json");
        assert!(html.contains("href=\"/tools/banners\""));
        assert!(html.contains("Banner &lt;Generator&gt;"));
        assert!(html.contains("4 inputs"));
        assert!(html.contains("title=\"Image\""));

        let html = dashboard(&[], "tools/tools.json");
        assert!(html.contains("No tools configured yet"));
        assert!(html.contains("<code>tools/tools.json</code>"));
    }

    #[test]
    fn form_renders_each_input_kind() {
        let html = form(&tool());
        assert!(html.contains("<input type=\"text\" id=\"product\" name=\"product\" required placeholder=\"e.g. shoes\">"));
        assert!(html.contains("Product<span class=\"req\">*</span>"));
        assert!(html.contains("<option value=\"\">Select an option...</option><option value=\"casual\">casual</option>"));
        assert!(html.contains("type=\"number\""));
        assert!(html.contains("type=\"file\" accept=\"image/*\""));
        assert!(html.contains("enctype=\"multipart/form-data\""));
    }

    #[test]
    fn gallery_renders_links_and_placeholders() {
        let view = classify(&WebhookResult::ok(json!([
            { "imageUrl": "http://x/a.png" },
            { "nothing": true },
            { "data": { "binary": { "data": "aGk=", "mimeType": "image/png", "fileName": "b.png" } } },
            { "data": { "binary": { "data": "%%%", "mimeType": "image/png" } } }
        ])));
        let html = result_view(&view);

        assert!(html.contains("4 banners created"));
        assert!(html.contains("download=\"banner-1.png\" data-download-delay=\"0\""));
        assert!(html.contains("No image available"));
        assert!(html.contains("download=\"b.png\" data-download-delay=\"1000\""));
        assert!(html.contains(">Open</a>"));
        // the corrupt item still shows, just without a download link
        assert!(html.contains("Banner 4"));
        assert!(!html.contains("data-download-delay=\"1500\""));
    }

    #[test]
    fn error_and_generic_views() {
        let html = result_view(&classify(&WebhookResult::failed("HTTP 500: Internal Server Error")));
        assert!(html.contains("Failed"));
        assert!(html.contains("HTTP 500: Internal Server Error"));

        let result = WebhookResult {
            message: Some("All done".into()),
            ..WebhookResult::ok(json!({ "foo": "<b>" }))
        };
        let html = result_view(&classify(&result));
        assert!(html.contains("Completed"));
        assert!(html.contains("All done"));
        assert!(html.contains("&quot;foo&quot;: &quot;&lt;b&gt;&quot;"));
    }
}
