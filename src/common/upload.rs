use anyhow::{anyhow, Result};
use axum::extract::Multipart;
use bytes::{Bytes, BytesMut};
use mime::Mime;

pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;
pub const DEFAULT_FOLDER: &str = "posters";

/// An image posted as multipart form data, fully buffered.
#[derive(Debug)]
pub struct ImageForm {
    pub file_name: Option<String>,
    pub content_type: Mime,
    pub body: Bytes,
    pub folder: String,
}

impl ImageForm {
    /// File extension for the stored object: the upload's own when it has
    /// one, else derived from the mime subtype.
    pub fn extension(&self) -> String {
        let from_name = self
            .file_name
            .as_deref()
            .and_then(|name| std::path::Path::new(name).extension())
            .and_then(|ext| ext.to_str())
            .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()));

        match from_name {
            Some(ext) => ext.to_ascii_lowercase(),
            None => match self.content_type.subtype().as_str() {
                "jpeg" => "jpg".to_string(),
                other => other.to_string(),
            },
        }
    }
}

/// Keeps `[A-Za-z0-9_-]` path segments; anything else collapses to the default.
pub fn sanitize_folder(raw: &str) -> String {
    let segments: Vec<&str> = raw
        .split('/')
        .filter(|s| !s.is_empty())
        .filter(|s| s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'))
        .collect();

    if segments.is_empty() {
        DEFAULT_FOLDER.to_string()
    } else {
        segments.join("/")
    }
}

/// Reads the `file` and `folder` fields. Only `image/*` files are accepted and
/// the body is capped at [`MAX_IMAGE_BYTES`] while streaming in.
pub async fn read_image_form(mut multipart: Multipart) -> Result<ImageForm> {
    let mut image: Option<(Option<String>, Mime, Bytes)> = None;
    let mut folder = String::new();

    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow!("Malformed multipart body: {}", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let content_type: Mime = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .parse()
                    .map_err(|_| anyhow!("Invalid content type"))?;
                if content_type.type_() != mime::IMAGE {
                    return Err(anyhow!("Invalid content type: only image/* allowed"));
                }

                let file_name = field.file_name().map(str::to_string);
                let mut buffer = BytesMut::new();
                while let Some(chunk) = field
                    .chunk()
                    .await
                    .map_err(|e| anyhow!("Upload interrupted: {}", e))?
                {
                    if buffer.len() + chunk.len() > MAX_IMAGE_BYTES {
                        return Err(anyhow!("Image exceeds {} bytes", MAX_IMAGE_BYTES));
                    }
                    buffer.extend_from_slice(&chunk);
                }
                image = Some((file_name, content_type, buffer.freeze()));
            }
            "folder" => {
                folder = field
                    .text()
                    .await
                    .map_err(|e| anyhow!("Unreadable folder field: {}", e))?;
            }
            _ => {}
        }
    }

    let (file_name, content_type, body) = image.ok_or_else(|| anyhow!("No file uploaded"))?;
    Ok(ImageForm {
        file_name,
        content_type,
        body,
        folder: sanitize_folder(&folder),
    })
}
