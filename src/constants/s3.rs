//! Blob storage related constants. Credentials and endpoint for the
//! S3-compatible store come from the standard AWS environment variables
//! consumed by the `object_store` builder.
use std::{env::var, sync::LazyLock};

/// The bucket where uploaded subject media is stored.
pub static MEDIA_BUCKET: LazyLock<String> = LazyLock::new(|| {
    var("MEDIA_BUCKET").unwrap_or_else(|_| String::from("lostfound-subject-media"))
});

/// The domain under which stored media is publicly addressable. Uploads are
/// reachable at `https://{bucket}.{domain}/{key}`.
pub static MEDIA_PUBLIC_DOMAIN: LazyLock<String> = LazyLock::new(|| {
    var("MEDIA_PUBLIC_DOMAIN").unwrap_or_else(|_| String::from("s3.amazonaws.com"))
});
