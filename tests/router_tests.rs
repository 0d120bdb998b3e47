use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use lms_catalog::{
    AppConfig, AppState, MemoryRepository, create_router,
    error::ErrorResponse,
    models::{Author, Book, Publisher},
};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use tower::util::ServiceExt;

fn app() -> Router {
    let state = AppState::new(Arc::new(MemoryRepository::new()), AppConfig::default());
    create_router(state)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

fn parse<T: DeserializeOwned>(bytes: &[u8]) -> T {
    serde_json::from_slice(bytes).expect("response should be valid JSON")
}

#[tokio::test]
async fn test_health_check() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"ok");
}

#[tokio::test]
async fn test_create_then_get_author() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/author?name=Tolkien", None).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Author = parse(&body);
    assert_eq!(created.name, "Tolkien");

    let (status, body) = send(&app, Method::GET, &format!("/author/{}", created.id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(parse::<Author>(&body), created);
}

#[tokio::test]
async fn test_trailing_slash_variants_are_equivalent() {
    let app = app();

    let (status, _) = send(&app, Method::POST, "/author/?name=Pratchett", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, plain) = send(&app, Method::GET, "/authors", None).await;
    let (status, slashed) = send(&app, Method::GET, "/authors/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(plain, slashed);

    let (status, _) = send(&app, Method::GET, "/author/1/", None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::DELETE, "/book/5/", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_missing_entity_is_404_with_json_body() {
    let app = app();

    for (uri, message) in [
        ("/author/42", "Author not found"),
        ("/book/42", "Book not found"),
        ("/publisher/42", "Publisher not found"),
    ] {
        let (status, body) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
        let error: ErrorResponse = parse(&body);
        assert_eq!(error.message, message);
    }
}

#[tokio::test]
async fn test_update_publisher_example() {
    let app = app();
    let (_, body) = send(&app, Method::POST, "/publisher?name=Old", None).await;
    let created: Publisher = parse(&body);
    assert_eq!(created.address, "");
    assert_eq!(created.phone, "");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/publisher/{}", created.id),
        Some(serde_json::json!({ "name": "Acme", "address": "1 Main St", "phone": "555-1234" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated: Publisher = parse(&body);
    assert_eq!(updated.name, "Acme");
    assert_eq!(updated.address, "1 Main St");
    assert_eq!(updated.phone, "555-1234");
}

#[tokio::test]
async fn test_create_book_with_flattened_references() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/book?title=Notes&author_id=5&author_name=Ada&publisher_name=Babbage%20%26%20Co",
        None,
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    let book: Book = parse(&body);
    assert_eq!(book.author.as_ref().map(|a| a.name.as_str()), Some("Ada"));
    assert_eq!(
        book.publisher.as_ref().map(|p| p.name.as_str()),
        Some("Babbage & Co")
    );

    let (_, body) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(parse::<Vec<Book>>(&body), vec![book]);
}

#[tokio::test]
async fn test_update_book_null_author_keeps_reference() {
    let app = app();
    let (_, body) = send(&app, Method::POST, "/book?title=Dune&author_name=Herbert", None).await;
    let book: Book = parse(&body);

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/book/{}", book.id),
        Some(serde_json::json!({ "title": "Dune (1965)", "author": null })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let updated: Book = parse(&body);
    assert_eq!(updated.title, "Dune (1965)");
    assert_eq!(updated.author, book.author);
}

#[tokio::test]
async fn test_malformed_input_is_rejected() {
    let app = app();

    let (status, _) = send(&app, Method::GET, "/author/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // `name` is required.
    let (status, _) = send(&app, Method::POST, "/author", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_openapi_document_lists_catalog_paths() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);

    let doc: serde_json::Value = parse(&body);
    let paths = doc["paths"].as_object().expect("paths object");
    for path in ["/authors", "/book/{id}", "/publisher"] {
        assert!(paths.contains_key(path), "missing {path}");
    }
}

#[tokio::test]
async fn test_request_id_is_propagated() {
    let app = app();
    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert!(response.headers().contains_key("x-request-id"));
}
