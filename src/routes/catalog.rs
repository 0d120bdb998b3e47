use crate::{AppState, handlers};
use axum::{
    Router,
    routing::{MethodRouter, get, post},
};

/// Registers `method_router` under `path` and under `path` followed by a
/// trailing slash, so `/authors` and `/authors/` reach the same handler.
fn route_both(
    router: Router<AppState>,
    path: &str,
    method_router: MethodRouter<AppState>,
) -> Router<AppState> {
    router
        .route(path, method_router.clone())
        .route(&format!("{path}/"), method_router)
}

/// Catalog Router Module
///
/// The verb/path table of the catalog. Collections are plural (`/authors`),
/// single entities singular (`/author/{id}`). Creation takes query parameters,
/// updates take a JSON body. None of these routes are authenticated.
pub fn catalog_routes() -> Router<AppState> {
    let router = Router::new();

    // GET /authors, /books, /publishers
    // Full listings in id order.
    let router = route_both(router, "/authors", get(handlers::list_authors));
    let router = route_both(router, "/books", get(handlers::list_books));
    let router = route_both(router, "/publishers", get(handlers::list_publishers));

    // POST /author?name=...
    let router = route_both(router, "/author", post(handlers::create_author));
    // POST /publisher?name=...&address=...&phone=...
    let router = route_both(router, "/publisher", post(handlers::create_publisher));
    // POST /book?title=...&author_id=...&author_name=...&publisher_id=...
    // Missing authors and publishers are created on the fly.
    let router = route_both(router, "/book", post(handlers::create_book));

    // GET/PUT/DELETE on a single entity.
    let router = route_both(
        router,
        "/author/{id}",
        get(handlers::get_author)
            .put(handlers::update_author)
            .delete(handlers::delete_author),
    );
    let router = route_both(
        router,
        "/publisher/{id}",
        get(handlers::get_publisher)
            .put(handlers::update_publisher)
            .delete(handlers::delete_publisher),
    );
    route_both(
        router,
        "/book/{id}",
        get(handlers::get_book)
            .put(handlers::update_book)
            .delete(handlers::delete_book),
    )
}
