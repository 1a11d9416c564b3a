//! End-to-end tests driving the full router over in-memory state with the
//! fake storage backend.

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use myrecipe::app::build_app;
use myrecipe::state::AppState;

fn app() -> Router {
    build_app(AppState::fake())
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, Value) {
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = res.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn json_req(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn carbonara() -> Value {
    json!({
        "name": "Spaghetti Carbonara",
        "description": "A classic Italian pasta dish",
        "base_servings": 4,
        "ingredients": [
            { "name": "Spaghetti", "quantity": 400.0, "unit": "g", "cooking_time": 10 },
            { "name": "Eggs", "quantity": 4.0, "unit": "pcs" }
        ],
        "instructions": "Cook spaghetti.\nMix eggs and cheese.\nCombine."
    })
}

async fn create_recipe(app: &Router, body: &Value) -> Value {
    let (status, created) = send(app, json_req("POST", "/api/v1/recipes", body)).await;
    assert_eq!(status, StatusCode::CREATED);
    created
}

#[tokio::test]
async fn create_then_scale_to_eight_servings_displays_800() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();

    let (status, detail) = send(&app, get(&format!("/api/v1/recipes/{id}?servings=8"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["servings"], 8);
    assert_eq!(detail["base_servings"], 4);
    assert_eq!(detail["ingredients"][0]["display"], "800.00");
    assert_eq!(detail["ingredients"][0]["quantity"], 800.0);
    assert_eq!(detail["ingredients"][1]["display"], "8.00");
    // Units and countdowns survive scaling untouched.
    assert_eq!(detail["ingredients"][0]["unit"], "g");
    assert_eq!(detail["ingredients"][0]["cooking_time"], 10);
    assert_eq!(detail["steps"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn non_positive_servings_clamp_to_one() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();

    let (_, detail) = send(&app, get(&format!("/api/v1/recipes/{id}?servings=-5"))).await;
    assert_eq!(detail["servings"], 1);
    assert_eq!(detail["ingredients"][0]["display"], "100.00");
}

#[tokio::test]
async fn validation_rejects_before_any_state_change() {
    let app = app();
    let mut body = carbonara();
    body["name"] = json!("   ");
    let (status, _) = send(&app, json_req("POST", "/api/v1/recipes", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let mut body = carbonara();
    body["ingredients"][1]["name"] = json!("");
    let (status, _) = send(&app, json_req("POST", "/api/v1/recipes", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, listed) = send(&app, get("/api/v1/recipes")).await;
    assert_eq!(listed.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn edit_replaces_fields_and_recomputes_total_cooking_time() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();
    assert_eq!(created["total_cooking_time"], 10);

    let update = json!({
        "name": "Carbonara, revised",
        "base_servings": 2,
        "ingredients": [
            { "name": "Spaghetti", "quantity": 200.0, "unit": "g", "cooking_time": 9 },
            { "name": "Pancetta", "quantity": 100.0, "unit": "g", "cooking_time": 6 }
        ]
    });
    let (status, updated) = send(&app, json_req("PUT", &format!("/api/v1/recipes/{id}"), &update)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["id"].as_str().unwrap(), id);
    assert_eq!(updated["name"], "Carbonara, revised");
    assert_eq!(updated["total_cooking_time"], 15);

    let (status, _) = send(
        &app,
        json_req(
            "PUT",
            "/api/v1/recipes/00000000-0000-0000-0000-000000000000",
            &update,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn search_matches_substring_of_assigned_recipe() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();
    let other = json!({
        "name": "Pancakes",
        "base_servings": 2,
        "ingredients": [{ "name": "Flour", "quantity": 150.0, "unit": "g" }]
    });
    create_recipe(&app, &other).await;

    // Assign to (Monday, Breakfast), then find it by a name substring.
    let (status, cell) = send(
        &app,
        json_req(
            "PUT",
            "/api/v1/meal-plan/monday/breakfast",
            &json!({ "recipe_id": id }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cell["recipe_name"], "Spaghetti Carbonara");

    let (_, hits) = send(&app, get("/api/v1/recipes?q=carbo")).await;
    let hits = hits.as_array().unwrap().clone();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn set_cell_is_last_write_wins_and_toggle_preserves_recipe() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();

    let uri = "/api/v1/meal-plan/friday/dinner";
    send(&app, json_req("PUT", uri, &json!({ "recipe_id": id, "rotate": true }))).await;

    // Toggling twice restores the flag without touching the reference.
    let (_, once) = send(&app, json_req("POST", &format!("{uri}/rotation"), &Value::Null)).await;
    assert_eq!(once["rotate"], false);
    let (_, twice) = send(&app, json_req("POST", &format!("{uri}/rotation"), &Value::Null)).await;
    assert_eq!(twice["rotate"], true);
    assert_eq!(twice["recipe_id"].as_str().unwrap(), id);

    // Re-assigning without `rotate` overwrites the whole cell.
    let (_, cell) = send(&app, json_req("PUT", uri, &json!({ "recipe_id": id }))).await;
    assert_eq!(cell["rotate"], false);
    assert_eq!(cell["recipe_id"].as_str().unwrap(), id);
}

#[tokio::test]
async fn deleting_a_recipe_clears_its_plan_cells() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();

    send(
        &app,
        json_req("PUT", "/api/v1/meal-plan/monday/lunch", &json!({ "recipe_id": id, "rotate": true })),
    )
    .await;

    let (status, _) = send(
        &app,
        Request::builder()
            .method("DELETE")
            .uri(format!("/api/v1/recipes/{id}"))
            .body(Body::empty())
            .unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, cell) = send(&app, get("/api/v1/meal-plan/monday/lunch")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(cell["recipe_id"], Value::Null);
    assert_eq!(cell["recipe_name"], Value::Null);

    let (status, _) = send(&app, get(&format!("/api/v1/recipes/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn timer_start_pause_reset_round_trip() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();
    let ingredient = created["ingredients"][0]["id"].as_str().unwrap();
    let base = format!("/api/v1/recipes/{id}/ingredients/{ingredient}/timer");

    // Never started: Idle at the full declared duration.
    let (status, view) = send(&app, get(&base)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["state"], "idle");
    assert_eq!(view["remaining_secs"], 600);

    let (_, view) = send(&app, json_req("POST", &format!("{base}/start"), &Value::Null)).await;
    assert_eq!(view["state"], "running");
    assert_eq!(view["duration_secs"], 600);

    let (_, view) = send(&app, json_req("POST", &format!("{base}/pause"), &Value::Null)).await;
    assert_eq!(view["state"], "paused");

    let (_, view) = send(&app, json_req("POST", &format!("{base}/reset"), &Value::Null)).await;
    assert_eq!(view["state"], "idle");
    assert_eq!(view["remaining_secs"], 600);

    // The second ingredient declares no cooking time: no countdown exists.
    let no_timer = created["ingredients"][1]["id"].as_str().unwrap();
    let (status, _) = send(
        &app,
        json_req(
            "POST",
            &format!("/api/v1/recipes/{id}/ingredients/{no_timer}/timer/start"),
            &Value::Null,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn image_upload_validates_then_stores() {
    let app = app();
    let created = create_recipe(&app, &carbonara()).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/v1/recipes/{id}/image");

    let multipart = |content_type: &str| {
        let body = format!(
            "--BOUNDARY\r\nContent-Disposition: form-data; name=\"file\"; filename=\"dish\"\r\nContent-Type: {content_type}\r\n\r\nnot-really-pixels\r\n--BOUNDARY--\r\n"
        );
        Request::builder()
            .method("POST")
            .uri(&uri)
            .header(header::CONTENT_TYPE, "multipart/form-data; boundary=BOUNDARY")
            .body(Body::from(body))
            .unwrap()
    };

    let (status, _) = send(&app, multipart("image/gif")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, uploaded) = send(&app, multipart("image/png")).await;
    assert_eq!(status, StatusCode::OK);
    let url = uploaded["image_url"].as_str().unwrap();
    assert!(url.contains("fake.local"));
    assert!(url.contains(".png"));

    let (_, detail) = send(&app, get(&format!("/api/v1/recipes/{id}"))).await;
    assert!(detail["image_url"].as_str().unwrap().contains(".png"));
}

#[tokio::test]
async fn unknown_paths_resolve_to_the_not_found_view() {
    let app = app();
    let (status, body) = send(&app, get("/api/v1/totally/unknown")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not found");

    let (status, _) = send(
        &app,
        get("/api/v1/recipes/00000000-0000-0000-0000-000000000000"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Out-of-grid planner coordinates cannot be constructed.
    let (status, _) = send(&app, get("/api/v1/meal-plan/someday/brunch")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
