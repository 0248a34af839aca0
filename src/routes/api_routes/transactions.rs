use crate::models::{AppState, ChatType, TransactionFilter};
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use http::StatusCode;
use serde::Deserialize;
use serde_json::json;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct TransactionQuery {
    user_id: Option<String>,
    chat_type: Option<String>,
}

fn bad_request(message: &str) -> axum::response::Response {
    (StatusCode::BAD_REQUEST, Json(json!({ "error": message }))).into_response()
}

pub(super) async fn transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionQuery>,
) -> impl IntoResponse {
    let user_id = match query.user_id.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => match raw.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => return bad_request("userId must be an integer"),
        },
    };
    // "all" приходит из фильтра дашборда
    let chat_type = match query.chat_type.as_deref().map(str::trim) {
        None | Some("") | Some("all") => None,
        Some(raw) => match raw.parse::<ChatType>() {
            Ok(t) => Some(t),
            Err(_) => return bad_request("chatType must be private, group or supergroup"),
        },
    };
    let filter = TransactionFilter { user_id, chat_type };
    match state.transaction_storage.list(filter).await {
        Ok(transactions) => (
            StatusCode::OK,
            Json(json!({ "transactions": transactions })),
        )
            .into_response(),
        Err(err) => {
            tracing::error!("Ошибка чтения транзакций: {err}");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Failed to fetch transactions" })),
            )
                .into_response()
        }
    }
}
