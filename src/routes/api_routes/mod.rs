use crate::models::AppState;
use axum::routing::{get, put};
use axum::Router;

mod rates;
mod transactions;
mod users;

pub fn init(state: AppState) -> Router {
    Router::new()
        .route("/transactions", get(transactions::transactions))
        .route("/rates", get(rates::rates))
        .route("/rates/{id}", put(rates::update_rate))
        .route("/users", get(users::users))
        .route("/stats", get(users::stats))
        .with_state(state)
}
