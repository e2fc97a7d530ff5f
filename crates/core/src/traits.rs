//! External collaborator interfaces.

use async_trait::async_trait;

use crate::error::Result;

/// Vision-capable model client.
///
/// Takes an image and a prompt, returns free text. The implementation owns
/// transport concerns (endpoints, credentials, timeouts); the core never
/// retries a failed call.
#[async_trait]
pub trait VisionClient: Send + Sync {
    /// Analyze a base64-encoded JPEG image with the given prompt.
    async fn analyze(&self, image_base64: &str, prompt: &str) -> Result<String>;
}
