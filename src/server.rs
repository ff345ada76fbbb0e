use axum::body::Body;
use axum::extract::{Json, State};
use axum::http::{HeaderMap, Request, StatusCode};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::Instrument;
use uuid::Uuid;

use crate::models::{BookingRequest, ConversationTurn};
use crate::service::AdvisorService;

#[derive(Debug, Deserialize)]
pub struct AdviceParams {
    pub message: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub history: Vec<ConversationTurn>,
}

#[derive(Debug, Deserialize)]
pub struct LocationParams {
    pub location: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ReplyBody {
    pub reply: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LinkBody {
    pub url: String,
}

/// Advice endpoints, optionally behind bearer auth. `/health` is always open.
pub fn router(service: AdvisorService, bearer_token: Option<String>) -> Router {
    let mut router = Router::new()
        .route("/advice", post(advice))
        .route("/booking-link", post(booking_link))
        .route("/location-info", post(location_info))
        .route("/virtual-tour", post(virtual_tour))
        .with_state(service);

    if let Some(expected) = bearer_token {
        router = router.layer(middleware::from_fn_with_state(
            Arc::new(expected),
            require_bearer,
        ));
    }

    router.route("/health", get(|| async { "ok" }))
}

async fn advice(
    State(service): State<AdvisorService>,
    Json(params): Json<AdviceParams>,
) -> Json<ReplyBody> {
    let request_id = Uuid::new_v4();
    let language = params
        .language
        .unwrap_or_else(|| service.default_language().to_string());

    let reply = service
        .get_immigration_advice(&params.message, &language, &params.history)
        .instrument(tracing::info_span!("advice", %request_id))
        .await;
    Json(ReplyBody { reply })
}

async fn booking_link(
    State(service): State<AdvisorService>,
    Json(request): Json<BookingRequest>,
) -> Json<LinkBody> {
    Json(LinkBody {
        url: service.generate_booking_link(&request),
    })
}

async fn location_info(
    State(service): State<AdvisorService>,
    Json(params): Json<LocationParams>,
) -> Json<ReplyBody> {
    let request_id = Uuid::new_v4();
    let reply = service
        .get_location_info(&params.location)
        .instrument(tracing::info_span!("location_info", %request_id))
        .await;
    Json(ReplyBody { reply })
}

async fn virtual_tour(
    State(service): State<AdvisorService>,
    Json(params): Json<LocationParams>,
) -> Json<ReplyBody> {
    let request_id = Uuid::new_v4();
    let reply = service
        .get_virtual_tour(&params.location)
        .instrument(tracing::info_span!("virtual_tour", %request_id))
        .await;
    Json(ReplyBody { reply })
}

async fn require_bearer(
    State(expected): State<Arc<String>>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if req.uri().path().eq("/health") {
        return next.run(req).await;
    }
    let headers: &HeaderMap = req.headers();
    let by_header = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .is_some_and(|v| v == format!("Bearer {}", expected.as_str()));
    // Clients that cannot set headers may pass access_token or token instead.
    let by_query = req.uri().query().is_some_and(|q| {
        q.split('&').any(|pair| {
            pair.split_once('=')
                .is_some_and(|(k, v)| (k == "access_token" || k == "token") && v == expected.as_str())
        })
    });

    if !(by_header || by_query) {
        tracing::warn!("Rejected unauthorized request to {}", req.uri().path());
        return (StatusCode::UNAUTHORIZED, "Unauthorized").into_response();
    }
    next.run(req).await
}
