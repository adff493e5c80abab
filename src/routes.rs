use crate::config::Config;
use crate::error::AppError;
use crate::grid::GridView;
use crate::models::{clamp_contrast, GridState};
use crate::parsers::parse_axis;
use crate::query::{self, is_truthy, GridQuery};
use crate::render::{render_page, FormFields};

use axum::{
    extract::{Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Form, Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{debug, info};

static STYLESHEET: &str = include_str!("../static/styles.css");

// Inline styles carry the per-cell colors
const CSP: &str = "default-src 'self'; script-src 'none'; style-src 'self' 'unsafe-inline'; img-src 'self' data:; base-uri 'self'; form-action 'self'";

fn security_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(CSP),
    );
    headers.insert(
        header::X_CONTENT_TYPE_OPTIONS,
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers
}

pub struct AppState {
    pub config: Config,
}

pub fn router(state: Arc<AppState>) -> Router {
    // Routes defined before a layer are affected by that layer
    let api = Router::new().route("/api/grid", get(grid_json)).layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
            .expose_headers([header::CONTENT_TYPE]),
    );

    Router::new()
        .route("/assets/styles.css", get(stylesheet))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::CACHE_CONTROL,
            HeaderValue::from_static("public, max-age=86400"),
        ))
        .route("/", get(show_grid).post(submit_grid))
        .route("/liveness_check", get(health_check))
        .route("/readiness_check", get(health_check))
        .merge(api)
        .with_state(state)
}

/// Fields posted by the color form.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GridForm {
    #[serde(default)]
    pub x_axis: String,
    #[serde(default)]
    pub y_axis: String,
    pub contrast: Option<String>,
    pub hide_below: Option<String>,
    /// Set by the threshold shortcut buttons, wins over `contrast`.
    pub preset: Option<String>,
    pub action: Option<String>,
}

impl GridForm {
    fn is_reverse(&self) -> bool {
        self.action.as_deref() == Some("reverse")
    }

    fn contrast(&self, default_contrast: f64) -> f64 {
        self.preset
            .as_deref()
            .or(self.contrast.as_deref())
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .map(|value| clamp_contrast(value, default_contrast))
            .unwrap_or(default_contrast)
    }

    fn hide_below(&self) -> bool {
        self.hide_below.as_deref().is_some_and(is_truthy)
    }

    /// Parse both text areas. A blank y field reuses the x colors.
    pub fn to_state(&self, default_contrast: f64) -> GridState {
        let x_axis = parse_axis(&self.x_axis);
        let y_axis = if self.y_axis.trim().is_empty() {
            x_axis.clone()
        } else {
            parse_axis(&self.y_axis)
        };

        GridState {
            x_axis,
            y_axis,
            contrast_threshold: self.contrast(default_contrast),
            hide_below_threshold: self.hide_below(),
        }
    }

    /// Swap the two text areas.
    pub fn reverse(&mut self) {
        std::mem::swap(&mut self.x_axis, &mut self.y_axis);
    }
}

async fn health_check() -> &'static str {
    "OK"
}

async fn stylesheet() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/css; charset=utf-8")],
        STYLESHEET,
    )
}

/// Page load and history navigation: rebuild everything from the URL.
async fn show_grid(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GridQuery>,
) -> Response {
    let grid_state = query::decode(&params, state.config.default_contrast);
    let fields = FormFields::hydrate(&grid_state);

    let grid = (!grid_state.is_empty()).then(|| GridView::from_state(&grid_state));
    if let Some(grid) = &grid {
        debug!(
            "Rendering {}x{} grid from URL",
            grid.columns.len(),
            grid.rows.len()
        );
    }

    (security_headers(), Html(render_page(&fields, grid.as_ref()))).into_response()
}

/// Form submission. Stores the grid in the URL by redirecting to it.
async fn submit_grid(
    State(state): State<Arc<AppState>>,
    Form(mut form): Form<GridForm>,
) -> Response {
    let default_contrast = state.config.default_contrast;

    if form.is_reverse() {
        if form.y_axis.trim().is_empty() {
            debug!("Reverse ignored: y axis is empty");
            return StatusCode::NO_CONTENT.into_response();
        }
        form.reverse();
    }

    let grid_state = form.to_state(default_contrast);
    if grid_state.is_empty() {
        // Nothing parsed: keep the user's text, leave the URL alone
        let fields = FormFields {
            x_text: form.x_axis,
            y_text: form.y_axis,
            contrast: grid_state.contrast_threshold,
            hide_below: grid_state.hide_below_threshold,
        };
        return (security_headers(), Html(render_page(&fields, None))).into_response();
    }

    info!(
        "New grid: {} columns, {} rows",
        grid_state.x_axis.len(),
        grid_state.y_axis.len()
    );
    let location = query::grid_location(&grid_state, default_contrast);
    (security_headers(), Redirect::to(&location)).into_response()
}

/// Grid view-model for a URL state, as JSON.
async fn grid_json(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GridQuery>,
) -> Result<Json<GridView>, AppError> {
    let grid_state = query::decode(&params, state.config.default_contrast);
    if grid_state.is_empty() {
        return Err(AppError::BadRequest(format!(
            "{} holds no valid colors",
            query::X_AXIS_PARAM
        )));
    }
    Ok(Json(GridView::from_state(&grid_state)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ColorEntry, DEFAULT_CONTRAST};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, Uri};
    use tower::ServiceExt;

    fn app() -> Router {
        router(Arc::new(AppState {
            config: Config::default(),
        }))
    }

    fn form_body(fields: &[(&str, &str)]) -> String {
        fields
            .iter()
            .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
            .collect::<Vec<_>>()
            .join("&")
    }

    async fn post_form(fields: &[(&str, &str)]) -> Response {
        app()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from(form_body(fields)))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    async fn get(uri: &str) -> Response {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn body_text(response: Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn state_from_location(response: &Response) -> GridState {
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        let uri: Uri = location.parse().unwrap();
        let Query(params) = Query::<GridQuery>::try_from_uri(&uri).unwrap();
        query::decode(&params, DEFAULT_CONTRAST)
    }

    #[tokio::test]
    async fn test_submit_redirects_to_grid_url() {
        let response = post_form(&[("xAxis", "Black: #000\nWhite: #fff"), ("yAxis", "")]).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);

        let state = state_from_location(&response);
        assert_eq!(
            state.x_axis,
            vec![
                ColorEntry::named("Black", "#000000"),
                ColorEntry::named("White", "#ffffff"),
            ]
        );
        // Empty y field reuses x, so the URL stays symmetric
        assert_eq!(state.y_axis, state.x_axis);
        let location = response.headers()[header::LOCATION].to_str().unwrap();
        assert!(!location.contains(query::Y_AXIS_PARAM));
    }

    #[tokio::test]
    async fn test_submit_with_preset_and_hide() {
        let response = post_form(&[
            ("xAxis", "#000"),
            ("yAxis", "#777"),
            ("contrast", "7"),
            ("preset", "4.5"),
            ("hideBelow", "true"),
        ])
        .await;
        let state = state_from_location(&response);
        assert_eq!(state.contrast_threshold, 4.5);
        assert!(state.hide_below_threshold);
        assert_eq!(state.y_axis, vec![ColorEntry::new("#777777")]);
    }

    #[tokio::test]
    async fn test_submit_without_colors_keeps_text() {
        let response = post_form(&[("xAxis", "no colors here"), ("yAxis", "")]).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::LOCATION).is_none());
        let html = body_text(response).await;
        assert!(html.contains(">no colors here</textarea>"));
        assert!(!html.contains("<table"));
    }

    #[tokio::test]
    async fn test_reverse_swaps_axes() {
        let response = post_form(&[
            ("xAxis", "#000"),
            ("yAxis", "Paper: #fff"),
            ("action", "reverse"),
        ])
        .await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let state = state_from_location(&response);
        assert_eq!(state.x_axis, vec![ColorEntry::named("Paper", "#ffffff")]);
        assert_eq!(state.y_axis, vec![ColorEntry::new("#000000")]);
    }

    #[tokio::test]
    async fn test_reverse_without_y_does_nothing() {
        let response =
            post_form(&[("xAxis", "#000"), ("yAxis", "  \n"), ("action", "reverse")]).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_get_renders_grid_from_url() {
        let state = GridState::new(
            crate::parsers::parse_axis("#000000\n#ffffff"),
            crate::parsers::parse_axis("#000000\n#ffffff"),
        );
        let location = query::grid_location(&state, DEFAULT_CONTRAST);
        let response = get(&location).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .contains_key(header::CONTENT_SECURITY_POLICY));

        let html = body_text(response).await;
        assert_eq!(html.matches(">1.00</td>").count(), 2);
        assert_eq!(html.matches(">21.00</td>").count(), 2);
        assert!(html.contains(">#000000\n#ffffff</textarea>"));
    }

    #[tokio::test]
    async fn test_get_without_params_has_no_table() {
        let html = body_text(get("/").await).await;
        assert!(html.contains("<form class=\"color-input-form\""));
        assert!(!html.contains("<table"));
    }

    #[tokio::test]
    async fn test_api_grid() {
        let state = GridState::new(
            crate::parsers::parse_axis("#000"),
            crate::parsers::parse_axis("#fff\n#000"),
        );
        let query = query::encode(&state, DEFAULT_CONTRAST).unwrap();
        let response = get(&format!("/api/grid?{}", query)).await;
        assert_eq!(response.status(), StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body_text(response).await).unwrap();
        assert_eq!(json["columns"].as_array().unwrap().len(), 1);
        assert_eq!(json["rows"].as_array().unwrap().len(), 2);
        assert_eq!(json["rows"][0]["cells"][0]["label"], "21.00");
    }

    #[tokio::test]
    async fn test_api_grid_without_colors() {
        let response = get("/api/grid").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_stylesheet_and_health() {
        let response = get("/assets/styles.css").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CACHE_CONTROL],
            "public, max-age=86400"
        );

        let response = get("/liveness_check").await;
        assert_eq!(body_text(response).await, "OK");
    }
}
