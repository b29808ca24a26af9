use std::sync::Arc;
use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use tracing::{error, warn};
use crate::llm::Analyzer;

/// Render context for the single page.
#[derive(Debug, Default, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub original: Option<String>,
    pub analysis: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AnalyzeForm {
    pub text: String,
}

struct HtmlTemplate<T>(T);

impl<T: Template> IntoResponse for HtmlTemplate<T> {
    fn into_response(self) -> Response {
        match self.0.render() {
            Ok(html) => Html(html).into_response(),
            Err(e) => {
                error!("Failed to render template: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render page").into_response()
            }
        }
    }
}

async fn index() -> impl IntoResponse {
    HtmlTemplate(IndexTemplate::default())
}

/// A missing `text` field is rejected by the `Form` extractor with 422;
/// an empty one is rejected here the same way.
async fn analyze(
    State(analyzer): State<Arc<Analyzer>>,
    Form(form): Form<AnalyzeForm>,
) -> Response {
    if form.text.is_empty() {
        warn!("Rejected analysis request with empty text");
        return (StatusCode::UNPROCESSABLE_ENTITY, "Form field `text` is required").into_response();
    }

    let analysis = analyzer.explain(&form.text).await;

    HtmlTemplate(IndexTemplate {
        original: Some(form.text),
        analysis: Some(analysis),
    })
    .into_response()
}

pub fn create_routes(analyzer: Arc<Analyzer>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .with_state(analyzer)
}
