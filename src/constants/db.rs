//! Record store connection related constants.
use std::{env::var, sync::LazyLock};

/// The hostname where the record store database can be accessed.
pub static DB_HOST: LazyLock<String> =
    LazyLock::new(|| var("DB_HOST").expect("DB_HOST not provided in environment variables"));

/// The user to authenticate to the record store with.
pub static DB_USERNAME: LazyLock<String> = LazyLock::new(|| {
    var("DB_USERNAME").expect("DB_USERNAME not provided in environment variables")
});

/// The password to authenticate to the record store with.
pub static DB_PASSWORD: LazyLock<String> = LazyLock::new(|| {
    var("DB_PASSWORD").expect("DB_PASSWORD not provided in environment variables")
});

/// The database holding the application's tables.
pub static DB_DATABASE: LazyLock<String> = LazyLock::new(|| {
    var("DB_DATABASE").expect("DB_DATABASE not provided in environment variables")
});

/// The full connection URL for the record store.
pub static DB_URL: LazyLock<String> = LazyLock::new(|| {
    format!(
        "postgres://{}:{}@{}/{}",
        DB_USERNAME.clone(),
        DB_PASSWORD.clone(),
        DB_HOST.clone(),
        DB_DATABASE.clone()
    )
});

/// The table holding subject report records.
pub static REPORT_TABLE: LazyLock<String> =
    LazyLock::new(|| var("REPORT_TABLE").unwrap_or_else(|_| String::from("report")));
