//! Status queue connection related constants.
use std::{env::var, sync::LazyLock};

/// The hostname where the Redis status queue can be found.
pub static REDIS_HOST: LazyLock<String> =
    LazyLock::new(|| var("REDIS_HOST").expect("REDIS_HOST not provided in environment variables"));

/// The full connection URL for the status queue.
pub static REDIS_URL: LazyLock<String> =
    LazyLock::new(|| format!("redis://{}/", REDIS_HOST.clone()));

/// The list the downstream processing pipeline consumes status messages from.
pub static QUEUE_NAME: LazyLock<String> =
    LazyLock::new(|| var("QUEUE_NAME").unwrap_or_else(|_| String::from("subject-status-queue")));
