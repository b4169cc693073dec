pub mod form;
pub mod icon;
pub mod registry;
pub mod render;
pub mod runner;
pub mod webhook;

pub use registry::{Registry, ToolDescriptor, ToolInputSpec};
pub use runner::{RunError, ToolRunner};
pub use webhook::{WebhookClient, WebhookResult};
