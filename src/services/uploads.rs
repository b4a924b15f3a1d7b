//! The photo upload flow: decode the binary body, derive the storage key and
//! hand the bytes to the blob store.
use base64::{prelude::BASE64_STANDARD, Engine as _};
use serde_json::{json, Value};
use uuid::Uuid;

use crate::{
    constants::api::{IMAGE_EXTENSIONS, UNKNOWN_SUBJECT, UNREGISTERED_REPORTER},
    services::{dispatch::GatewayEvent, errors::ApiError},
    storage::MediaStore,
};

/// Handle a PUT of raw image bytes. Identity travels in the query string;
/// the body must assert the binary transport encoding.
///
/// The storage key is `{reporter_id}-{sanitized_subject_name}`, suffixed with
/// a random UUID for unregistered reporters so independent anonymous uploads
/// never collide. Registered reporters re-uploading the same subject
/// overwrite the prior asset in place.
pub async fn handle_upload(event: &GatewayEvent, media: &MediaStore) -> Result<Value, ApiError> {
    if !event.is_base64 {
        return Err(ApiError::InvalidRequest(
            "expected a base64-encoded binary body".to_owned(),
        ));
    }
    let image = BASE64_STANDARD
        .decode(event.body.as_bytes())
        .map_err(|err| ApiError::InvalidRequest(format!("body is not valid base64: {err}")))?;

    let reporter_id = event.query_param("reporter_id").ok_or_else(|| {
        ApiError::InvalidRequest("missing 'reporter_id' query parameter".to_owned())
    })?;
    let unregistered = reporter_id.eq_ignore_ascii_case(UNREGISTERED_REPORTER);
    let subject_name = match event.query_param("subject_name") {
        Some(name) => name.to_owned(),
        None if unregistered => UNKNOWN_SUBJECT.to_owned(),
        None => {
            return Err(ApiError::InvalidRequest(
                "missing 'subject_name' query parameter".to_owned(),
            ))
        }
    };

    let mut key = format!("{reporter_id}-{}", sanitize_subject_name(&subject_name));
    if unregistered {
        key.push('-');
        key.push_str(&Uuid::new_v4().to_string());
    }
    let content_type = event.header("content-type");
    key.push('.');
    key.push_str(extension_for(content_type));

    let file_url = media
        .put_image(&key, image, content_type.unwrap_or("image/jpeg"))
        .await?;
    Ok(json!({
        "message": "Image uploaded successfully",
        "file_url": file_url,
    }))
}

/// Make a subject name safe for use in a storage key: spaces become
/// underscores, alphanumerics, hyphens and underscores are kept, everything
/// else is dropped.
pub fn sanitize_subject_name(name: &str) -> String {
    name.chars()
        .map(|character| if character == ' ' { '_' } else { character })
        .filter(|character| {
            character.is_alphanumeric() || *character == '-' || *character == '_'
        })
        .collect()
}

/// Pick a file extension from the content-type subtype, falling back to `jpg`
/// for anything unrecognized or absent.
fn extension_for(content_type: Option<&str>) -> &'static str {
    let Some(content_type) = content_type else {
        return "jpg";
    };
    let subtype = content_type.rsplit('/').next().unwrap_or_default();
    IMAGE_EXTENSIONS
        .iter()
        .find(|extension| **extension == subtype)
        .copied()
        .unwrap_or("jpg")
}
