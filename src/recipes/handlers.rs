use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    routing::{get, post, put},
    Json, Router,
};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::state::AppState;

use super::dto::{DetailQuery, ImageUploaded, ListQuery, RecipeDetails, RecipeListItem};
use super::services;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", get(list_recipes))
        .route("/recipes/:id", get(get_recipe))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/recipes", post(create_recipe))
        .route("/recipes/:id", put(update_recipe).delete(delete_recipe))
        .route("/recipes/:id/image", post(upload_image))
        // Above the 5MB image cap so the precise validation error wins over
        // a blunt 413.
        .layer(DefaultBodyLimit::max(6 * 1024 * 1024))
}

// --- handlers ---

#[instrument(skip(state))]
pub async fn list_recipes(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Json<Vec<RecipeListItem>> {
    let recipes = match query.q.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => state.recipes.search(q),
        _ => state.recipes.list(),
    };
    let mut items = Vec::with_capacity(recipes.len());
    for recipe in recipes {
        items.push(services::list_item(&state, recipe).await);
    }
    Json(items)
}

#[instrument(skip(state))]
pub async fn get_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<DetailQuery>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    let Some(recipe) = state.recipes.get(id) else {
        warn!(%id, "recipe not found");
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    };
    Ok(Json(services::details(&state, recipe, query.servings).await))
}

#[instrument(skip(state, body))]
pub async fn create_recipe(
    State(state): State<AppState>,
    Json(body): Json<super::dto::RecipeBody>,
) -> Result<(StatusCode, HeaderMap, Json<RecipeDetails>), (StatusCode, String)> {
    let draft = services::draft_from_body(body).map_err(bad_request)?;
    let recipe = state.recipes.add(draft);
    info!(id = %recipe.id, name = %recipe.name, "recipe created");

    let mut headers = HeaderMap::new();
    if let Ok(location) = format!("/api/v1/recipes/{}", recipe.id).parse() {
        headers.insert(axum::http::header::LOCATION, location);
    }
    Ok((
        StatusCode::CREATED,
        headers,
        Json(services::details(&state, recipe, None).await),
    ))
}

#[instrument(skip(state, body))]
pub async fn update_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<super::dto::RecipeBody>,
) -> Result<Json<RecipeDetails>, (StatusCode, String)> {
    let draft = services::draft_from_body(body).map_err(bad_request)?;
    let Some(recipe) = services::update_recipe(&state, id, draft).await else {
        warn!(%id, "recipe not found for edit");
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    };
    info!(%id, "recipe updated");
    Ok(Json(services::details(&state, recipe, None).await))
}

#[instrument(skip(state))]
pub async fn delete_recipe(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if !services::delete_recipe(&state, id).await {
        warn!(%id, "recipe not found for delete");
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }
    info!(%id, "recipe deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// POST /recipes/:id/image (multipart, single `file` field). The upload is
/// validated before storage is touched; any failure aborts with the recipe
/// left exactly as it was.
#[instrument(skip(state, mp))]
pub async fn upload_image(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    mut mp: Multipart,
) -> Result<Json<ImageUploaded>, (StatusCode, String)> {
    if state.recipes.get(id).is_none() {
        return Err((StatusCode::NOT_FOUND, "Recipe not found".into()));
    }

    let mut file = None;
    while let Ok(Some(field)) = mp.next_field().await {
        if field.name() == Some("file") {
            let content_type = field
                .content_type()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "application/octet-stream".into());
            let data = field.bytes().await.map_err(internal)?;
            file = Some((data, content_type));
            break;
        }
    }
    let Some((data, content_type)) = file else {
        return Err((StatusCode::BAD_REQUEST, "file is required".into()));
    };

    let ext = services::validate_image(&content_type, data.len()).map_err(bad_request)?;

    match services::attach_image(&state, id, ext, data, &content_type).await {
        Ok(image_url) => {
            info!(%id, "recipe image uploaded");
            Ok(Json(ImageUploaded { image_url }))
        }
        Err(e) => {
            error!(error = %e, %id, "image upload failed");
            Err((
                StatusCode::BAD_GATEWAY,
                format!("Failed to upload image: {e}"),
            ))
        }
    }
}

fn bad_request<E: std::error::Error>(e: E) -> (StatusCode, String) {
    (StatusCode::BAD_REQUEST, e.to_string())
}

fn internal<E: std::error::Error>(e: E) -> (StatusCode, String) {
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
