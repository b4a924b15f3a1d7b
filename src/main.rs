mod constants;
mod db;
mod queue;
mod routes;
mod services;
mod state;
mod storage;
mod utils;

use std::sync::Arc;

use state::AppState;

#[tokio::main]
async fn main() {
    let media = storage::MediaStore::connect().expect("Failed to connect to media store");
    let records = db::PgReportStore::connect()
        .await
        .expect("Failed to connect to record store");
    let queue = queue::RedisStatusQueue::connect()
        .await
        .expect("Failed to connect to status queue");
    let state = AppState {
        media,
        records: Arc::new(records),
        queue: Arc::new(queue),
    };
    let app = routes::reports::create_router().with_state(state);
    let listener = tokio::net::TcpListener::bind("0.0.0.0:8080")
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app)
        .await
        .expect("Failed to init Axum service");
}
