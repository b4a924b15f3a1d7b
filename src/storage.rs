//! Blob storage for uploaded subject media.
use std::sync::Arc;

use object_store::{
    aws::AmazonS3Builder, path::Path, Attribute, AttributeValue, Attributes, ObjectStore,
    PutOptions, PutPayload,
};

use crate::constants::s3 as constants;

/// A handle to the blob store plus the naming needed to build public URLs.
/// Cheap to clone and share between handlers.
#[derive(Clone)]
pub struct MediaStore {
    /// The underlying object store client.
    store: Arc<dyn ObjectStore>,
    /// The bucket media is written to.
    bucket: String,
    /// The domain under which the bucket is publicly addressable.
    public_domain: String,
}

impl MediaStore {
    /// Connect to the S3-compatible store configured in the environment.
    pub fn connect() -> Result<Self, errors::MediaError> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(constants::MEDIA_BUCKET.clone())
            .build()?;
        Ok(Self {
            store: Arc::new(store),
            bucket: constants::MEDIA_BUCKET.clone(),
            public_domain: constants::MEDIA_PUBLIC_DOMAIN.clone(),
        })
    }

    /// Wrap an arbitrary object store. Used by tests with the in-memory
    /// backend.
    pub fn with_store(store: Arc<dyn ObjectStore>, bucket: &str, public_domain: &str) -> Self {
        Self {
            store,
            bucket: bucket.to_owned(),
            public_domain: public_domain.to_owned(),
        }
    }

    /// Store image bytes under `key` and return the public URL the object is
    /// reachable at. Writing the same key twice overwrites the prior object.
    pub async fn put_image(
        &self,
        key: &str,
        image: Vec<u8>,
        content_type: &str,
    ) -> Result<String, errors::MediaError> {
        let options = PutOptions {
            attributes: Attributes::from_iter([(
                Attribute::ContentType,
                AttributeValue::from(content_type.to_owned()),
            )]),
            ..PutOptions::default()
        };
        self.store
            .put_opts(&Path::from(key), PutPayload::from(image), options)
            .await?;
        Ok(format!(
            "https://{}.{}/{key}",
            self.bucket, self.public_domain
        ))
    }
}

pub mod errors {
    use thiserror::Error;

    /// Errors raised by the blob store.
    #[derive(Debug, Error)]
    #[error(transparent)]
    pub struct MediaError(#[from] object_store::Error);
}
