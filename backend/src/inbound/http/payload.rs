//! Request body normalisation shared by the mutation handlers.
//!
//! Clients may send `application/json` or `multipart/form-data`. Either way
//! the body becomes a [`FormPayload`]: flat text fields plus the files sent
//! under the `images` part name. Handlers then build their validated domain
//! input from the text fields and hand the files to the service.

use std::collections::HashMap;

use actix_multipart::{Field, Multipart};
use actix_web::dev::Payload;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::web::Bytes;
use actix_web::{FromRequest, HttpRequest};
use futures_util::StreamExt;
use futures_util::future::LocalBoxFuture;
use serde_json::Value;
use tracing::debug;

use crate::domain::Error;
use crate::domain::ports::ImageFile;

/// Multipart part name that carries image files.
pub const IMAGES_FIELD: &str = "images";

/// Largest accepted single image, in bytes.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Largest accepted multipart text field or JSON body, in bytes.
const MAX_TEXT_BYTES: usize = 64 * 1024;

/// Normalised request body.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormPayload {
    fields: HashMap<String, String>,
    files: Vec<ImageFile>,
}

impl FormPayload {
    /// Text value of `name`, if the client sent one.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Image files from `images` parts, in arrival order.
    pub fn files(&self) -> &[ImageFile] {
        &self.files
    }

    /// Release the uploaded files to the caller.
    pub fn into_files(self) -> Vec<ImageFile> {
        self.files
    }

    /// Build a payload from a parsed JSON document.
    ///
    /// Strings, numbers and booleans become text fields. Nulls, arrays and
    /// nested objects are dropped: images only arrive as uploaded files.
    pub fn from_json(value: Value) -> Result<Self, Error> {
        let Value::Object(map) = value else {
            return Err(Error::invalid_request("Request body must be a JSON object"));
        };
        let fields = map
            .into_iter()
            .filter_map(|(key, value)| match value {
                Value::String(text) => Some((key, text)),
                Value::Number(number) => Some((key, number.to_string())),
                Value::Bool(flag) => Some((key, flag.to_string())),
                Value::Null | Value::Array(_) | Value::Object(_) => None,
            })
            .collect();
        Ok(Self {
            fields,
            files: Vec::new(),
        })
    }

    fn from_json_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_slice(bytes).map_err(|err| {
            debug!(error = %err, "request body is not valid JSON");
            Error::invalid_request("Request body must be valid JSON")
        })?;
        Self::from_json(value)
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, Error> {
        let mut payload = Self::default();
        while let Some(item) = multipart.next().await {
            let field = item.map_err(|err| {
                debug!(error = %err, "malformed multipart body");
                Error::invalid_request("Malformed multipart body")
            })?;
            payload.absorb(field).await?;
        }
        Ok(payload)
    }

    async fn absorb(&mut self, field: Field) -> Result<(), Error> {
        let name = field.name().unwrap_or_default().to_owned();
        let file_name = field
            .content_disposition()
            .and_then(|disposition| disposition.get_filename())
            .map(str::to_owned);
        let content_type = field.content_type().map(ToString::to_string);

        match file_name {
            Some(file_name) if name == IMAGES_FIELD => {
                let bytes = read_field(field, MAX_IMAGE_BYTES, &name).await?;
                if !bytes.is_empty() {
                    self.files.push(ImageFile {
                        file_name,
                        content_type,
                        bytes,
                    });
                }
            }
            Some(_) => {
                debug!(field = %name, "ignoring file part outside the images field");
                drain(field).await?;
            }
            None => {
                let bytes = read_field(field, MAX_TEXT_BYTES, &name).await?;
                let text = String::from_utf8(bytes).map_err(|_| {
                    Error::invalid_request(format!("{name} must be valid UTF-8 text"))
                })?;
                self.fields.insert(name, text);
            }
        }
        Ok(())
    }
}

async fn read_field(mut field: Field, limit: usize, name: &str) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field.next().await {
        let chunk = chunk.map_err(|err| {
            debug!(error = %err, field = %name, "failed to read multipart field");
            Error::invalid_request("Malformed multipart body")
        })?;
        if bytes.len() + chunk.len() > limit {
            return Err(Error::invalid_request(format!(
                "{name} exceeds the {limit} byte limit"
            )));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

async fn drain(mut field: Field) -> Result<(), Error> {
    while let Some(chunk) = field.next().await {
        chunk.map_err(|_| Error::invalid_request("Malformed multipart body"))?;
    }
    Ok(())
}

fn is_multipart(req: &HttpRequest) -> bool {
    req.headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| {
            value
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

impl FromRequest for FormPayload {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        if is_multipart(req) {
            let multipart = Multipart::new(req.headers(), payload.take());
            Box::pin(Self::from_multipart(multipart))
        } else {
            let body = Bytes::from_request(req, payload);
            Box::pin(async move {
                let bytes = body.await.map_err(|err| {
                    debug!(error = %err, "failed to read request body");
                    Error::invalid_request("Request body could not be read")
                })?;
                Self::from_json_bytes(&bytes)
            })
        }
    }
}
