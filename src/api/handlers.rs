use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use chrono::Utc;
use tracing::{error, info};

use crate::{
    api::error::{ErrorResponse, error_response},
    app_state::AppState,
    classifier::Classification,
    events::{
        ClassifyRequest, CreateEventRequest, EventPatch, EventResponse, ExtractRequest,
        ExtractResponse, NewEvent, TagEntry,
    },
};

#[utoipa::path(
    post,
    path = "/v1/events/classify",
    tag = "events",
    request_body = ClassifyRequest,
    responses(
        (status = 200, description = "Tags, category and importance for the text", body = Classification),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
pub async fn classify_event(
    State(state): State<AppState>,
    Json(payload): Json<ClassifyRequest>,
) -> Response {
    let category_override = match payload.validate() {
        Ok(category) => category,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    let classification = state.classifier.classify(
        &payload.title,
        payload.description.as_deref(),
        payload.tags.as_deref(),
        category_override,
    );
    (StatusCode::OK, Json(classification)).into_response()
}

#[utoipa::path(
    post,
    path = "/v1/events/extract",
    tag = "events",
    request_body = ExtractRequest,
    responses(
        (status = 200, description = "Article title, text and images", body = ExtractResponse),
        (status = 400, description = "Unsupported or malformed link", body = ErrorResponse),
        (status = 422, description = "Page had no usable content", body = ErrorResponse),
        (status = 502, description = "Page could not be fetched", body = ErrorResponse)
    )
)]
pub async fn extract_article(
    State(state): State<AppState>,
    Json(payload): Json<ExtractRequest>,
) -> Response {
    if let Err(error) = payload.validate() {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    match state.extractor.extract(&payload.url).await {
        Ok(article) => (StatusCode::OK, Json(ExtractResponse::from(article))).into_response(),
        Err(err) => err.into_response(),
    }
}

#[utoipa::path(
    post,
    path = "/v1/events",
    tag = "events",
    request_body = CreateEventRequest,
    responses(
        (status = 201, description = "Event classified and stored", body = EventResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn create_event(
    State(state): State<AppState>,
    Json(payload): Json<CreateEventRequest>,
) -> Response {
    let category_override = match payload.validate() {
        Ok(category) => category,
        Err(error) => return error_response(StatusCode::BAD_REQUEST, error),
    };

    let classification = state.classifier.classify(
        &payload.title,
        payload.description.as_deref(),
        payload.tags.as_deref(),
        category_override,
    );
    let new_event = NewEvent::from_request(&payload, &classification, Utc::now());

    let record = match state.events.insert(new_event).await {
        Ok(record) => record,
        Err(e) => {
            error!(error = %e, "Failed to store event");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create event");
        }
    };

    if let Err(e) = state
        .events
        .register_tags(TagEntry::from_classification(&classification))
        .await
    {
        error!(error = %e, event_id = record.id, "Failed to register tags");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to create event");
    }

    info!(
        event_id = record.id,
        category = %record.category,
        impact_score = record.impact_score,
        "Event created"
    );
    (StatusCode::CREATED, Json(EventResponse::from(record))).into_response()
}

#[utoipa::path(
    patch,
    path = "/v1/events/{id}",
    tag = "events",
    params(("id" = i64, Path, description = "Event id")),
    request_body = EventPatch,
    responses(
        (status = 200, description = "Updated event", body = EventResponse),
        (status = 400, description = "Invalid patch", body = ErrorResponse),
        (status = 404, description = "Event not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    )
)]
pub async fn patch_event(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(patch): Json<EventPatch>,
) -> Response {
    let mut record = match state.events.find(id).await {
        Ok(Some(record)) => record,
        Ok(None) => return error_response(StatusCode::NOT_FOUND, "Event not found"),
        Err(e) => {
            error!(error = %e, event_id = id, "Failed to load event");
            return error_response(StatusCode::INTERNAL_SERVER_ERROR, "Database error");
        }
    };

    if let Err(error) = record.apply(&patch, state.classifier.normalizer()) {
        return error_response(StatusCode::BAD_REQUEST, error);
    }

    match state.events.update(record).await {
        Ok(record) => (StatusCode::OK, Json(EventResponse::from(record))).into_response(),
        Err(e) => {
            error!(error = %e, event_id = id, "Failed to update event");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to update event")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        api::router,
        classifier::{Category, Classifier, Lexicon},
        events::{EventRecord, MockEventRepository},
        extractor::{ContentExtractor, SourcePolicy},
        fetcher::FetchOptions,
    };
    use axum::{Router, body::Body, http::Request};
    use chrono::TimeZone;
    use serde_json::{Value, json};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn create_test_app(mock_repo: MockEventRepository) -> Router {
        let classifier = Classifier::new(&Lexicon::embedded().unwrap());
        let extractor =
            ContentExtractor::new(SourcePolicy::default(), FetchOptions::default()).unwrap();
        router(AppState::new(classifier, extractor, Arc::new(mock_repo)))
    }

    fn stored_record(id: i64) -> EventRecord {
        EventRecord {
            id,
            title: "Started at the new company".to_string(),
            description: None,
            event_date: Utc.with_ymd_and_hms(2024, 9, 2, 9, 0, 0).unwrap(),
            tags: vec!["work".to_string()],
            category: Category::Work,
            impact_score: 3,
        }
    }

    fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_classify_returns_classification() {
        let app = create_test_app(MockEventRepository::new());
        let request = json_request(
            "POST",
            "/v1/events/classify",
            json!({
                "title": "Got promoted at work",
                "description": "big day!!",
                "tags": "team, 团队"
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["category"], "work");
        assert_eq!(body["tags"][0], "team");
        assert_eq!(body["tags"][1], "团队");
        assert!(body["importance"].as_u64().unwrap() >= 3);
    }

    #[tokio::test]
    async fn test_classify_rejects_bad_input() {
        let app = create_test_app(MockEventRepository::new());

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/v1/events/classify",
                json!({ "title": "  " }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .oneshot(json_request(
                "POST",
                "/v1/events/classify",
                json!({ "title": "Weekend", "category": "hobbies" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_extract_rejects_foreign_host_without_fetching() {
        let app = create_test_app(MockEventRepository::new());
        let request = json_request(
            "POST",
            "/v1/events/extract",
            json!({ "url": "https://example.com/s/abc" }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = body_json(response).await;
        assert!(
            body["error"]
                .as_str()
                .unwrap()
                .starts_with("Not a supported article link")
        );
    }

    #[tokio::test]
    async fn test_create_event_stores_and_registers_tags() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_insert().times(1).returning(|event| {
            assert_eq!(event.category, Category::Achievement);
            Ok(EventRecord {
                id: 42,
                title: event.title,
                description: event.description,
                event_date: event.event_date,
                tags: event.tags,
                category: event.category,
                impact_score: event.impact_score,
            })
        });
        mock_repo
            .expect_register_tags()
            .times(1)
            .withf(|entries| {
                entries
                    .iter()
                    .all(|entry| entry.category == Category::Work)
            })
            .returning(|_| Ok(()));

        let app = create_test_app(mock_repo);
        let request = json_request(
            "POST",
            "/v1/events",
            json!({
                "title": "Project launch meeting",
                "category": "achievement",
                "event_date": "2024-06-01T10:00:00Z"
            }),
        );

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let body = body_json(response).await;
        assert_eq!(body["id"], 42);
        assert_eq!(body["category"], "achievement");
        assert_eq!(body["event_date"], "2024-06-01T10:00:00Z");
    }

    #[tokio::test]
    async fn test_create_event_storage_failure() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_insert()
            .returning(|_| Err(anyhow::anyhow!("Database insert failed")));
        mock_repo.expect_register_tags().times(0);

        let app = create_test_app(mock_repo);
        let response = app
            .oneshot(json_request(
                "POST",
                "/v1/events",
                json!({ "title": "Moved house" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_patch_event_merges_fields() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_find()
            .withf(|id| *id == 5)
            .returning(|id| Ok(Some(stored_record(id))));
        mock_repo
            .expect_update()
            .times(1)
            .returning(|event| Ok(event));

        let app = create_test_app(mock_repo);
        let response = app
            .oneshot(json_request(
                "PATCH",
                "/v1/events/5",
                json!({ "tags": "career，work", "impact_score": 15 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["title"], "Started at the new company");
        assert_eq!(body["tags"], json!(["career", "work"]));
        assert_eq!(body["impact_score"], 10);
        assert_eq!(body["impact_level"], "high");
    }

    #[tokio::test]
    async fn test_patch_event_not_found() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo.expect_find().returning(|_| Ok(None));
        mock_repo.expect_update().times(0);

        let app = create_test_app(mock_repo);
        let response = app
            .oneshot(json_request(
                "PATCH",
                "/v1/events/9",
                json!({ "title": "Renamed" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_patch_event_rejects_unknown_category() {
        let mut mock_repo = MockEventRepository::new();
        mock_repo
            .expect_find()
            .returning(|id| Ok(Some(stored_record(id))));
        mock_repo.expect_update().times(0);

        let app = create_test_app(mock_repo);
        let response = app
            .oneshot(json_request(
                "PATCH",
                "/v1/events/1",
                json!({ "category": "sports" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_health_and_openapi_routes() {
        let app = create_test_app(MockEventRepository::new());

        let response = app
            .clone()
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["status"], "OK");
        assert_eq!(body["extract_host"], "mp.weixin.qq.com");

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert!(body["paths"]["/v1/events/{id}"].is_object());
    }
}
