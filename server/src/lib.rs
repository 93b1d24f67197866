pub mod corpus;

use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::{get, post}, Json, Router};
use corpus::Corpus;
use qa_core::cluster::{cluster_documents, summarize};
use qa_core::rank::{highlight, search_prepared, snippet, SearchOptions};
use qa_core::vectorize::find_similar;
use qa_core::{Document, EngineConfig, EngineError, FaqCluster, SearchResult, SimilarityResult};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer, AllowOrigin};
use tower_http::trace::TraceLayer;

type ApiError = (StatusCode, String);

#[derive(Debug, Clone)]
pub struct Settings {
    pub engine: EngineConfig,
    /// Upper bound on threads handed to the clusterer per request.
    pub max_cluster_docs: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self { engine: EngineConfig::default(), max_cluster_docs: 300 }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub corpus: Arc<Corpus>,
    pub settings: Arc<Settings>,
}

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    pub course_id: Option<String>,
    pub min_relevance: Option<u32>,
    pub limit: Option<usize>,
}

#[derive(Serialize)]
pub struct SearchResponse<H> {
    pub query: String,
    pub took_s: f64,
    pub results: Vec<H>,
}

#[derive(Serialize)]
pub struct ThreadHit {
    #[serde(flatten)]
    pub result: SearchResult,
    pub title: String,
    pub course_id: String,
}

#[derive(Serialize)]
pub struct MaterialHit {
    #[serde(flatten)]
    pub result: SearchResult,
    pub title: String,
    pub kind: Option<String>,
    pub snippet: String,
}

#[derive(Deserialize)]
pub struct SimilarRequest {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub course_id: Option<String>,
    pub threshold: Option<f32>,
}

#[derive(Serialize)]
pub struct SimilarHit {
    #[serde(flatten)]
    pub result: SimilarityResult,
    pub title: String,
}

#[derive(Serialize)]
pub struct SimilarResponse {
    pub threshold: f32,
    pub results: Vec<SimilarHit>,
}

#[derive(Serialize)]
pub struct FaqEntry {
    #[serde(flatten)]
    pub cluster: FaqCluster,
    pub title: String,
}

#[derive(Serialize)]
pub struct FaqResponse {
    pub course_id: String,
    pub clusters: Vec<FaqEntry>,
}

pub fn build_app(data_dir: &str, settings: Settings) -> Result<Router> {
    let corpus = Corpus::load(std::path::Path::new(data_dir))?;
    Ok(router(corpus, settings))
}

pub fn router(corpus: Corpus, settings: Settings) -> Router {
    let app_state = AppState { corpus: Arc::new(corpus), settings: Arc::new(settings) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/materials/search", get(material_search_handler))
        .route("/threads/similar", post(similar_handler))
        .route("/courses/:course_id/faq", get(faq_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

fn bad_request(err: EngineError) -> ApiError {
    (StatusCode::BAD_REQUEST, err.to_string())
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse<ThreadHit>>, ApiError> {
    let start = std::time::Instant::now();
    let engine = &state.settings.engine;
    let opts = SearchOptions {
        min_relevance: params.min_relevance.unwrap_or(engine.min_relevance),
        limit: params.limit.unwrap_or(engine.search_limit).min(100),
    };
    let candidates = state.corpus.thread_candidates(params.course_id.as_deref());
    let found = search_prepared(&params.q, candidates, opts).map_err(bad_request)?;

    let results = found
        .into_iter()
        .filter_map(|result| {
            let thread = state.corpus.thread(&result.document_id)?;
            Some(ThreadHit { title: thread.title.clone(), course_id: thread.course_id.clone(), result })
        })
        .collect();
    Ok(Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), results }))
}

pub async fn material_search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse<MaterialHit>>, ApiError> {
    let start = std::time::Instant::now();
    let engine = &state.settings.engine;
    let opts = SearchOptions {
        min_relevance: params.min_relevance.unwrap_or(engine.min_material_relevance),
        limit: params.limit.unwrap_or(engine.search_limit).min(100),
    };
    let candidates = state.corpus.material_candidates(params.course_id.as_deref());
    let found = search_prepared(&params.q, candidates, opts).map_err(bad_request)?;

    let results = found
        .into_iter()
        .filter_map(|result| {
            let material = state.corpus.material(&result.document_id)?;
            let window = snippet(&material.content, &result.matched_keywords, engine.snippet_max_length);
            let snippet = highlight(&window, &result.matched_keywords);
            Some(MaterialHit { title: material.title.clone(), kind: material.kind.clone(), snippet, result })
        })
        .collect();
    Ok(Json(SearchResponse { query: params.q, took_s: start.elapsed().as_secs_f64(), results }))
}

pub async fn similar_handler(State(state): State<AppState>, Json(req): Json<SimilarRequest>) -> Result<Json<SimilarResponse>, ApiError> {
    let threshold = req.threshold.unwrap_or(state.settings.engine.duplicate_threshold);
    if !(0.0..=1.0).contains(&threshold) {
        return Err((StatusCode::BAD_REQUEST, format!("threshold must be within [0, 1], got {threshold}")));
    }
    let mut fields = vec![req.title.as_str(), req.content.as_str()];
    fields.extend(req.tags.iter().map(String::as_str));
    let draft = Document::from_fields("draft", &fields);

    let course_id = req.course_id.as_deref();
    let candidates: Vec<Document> = state
        .corpus
        .threads
        .iter()
        .filter(|t| course_id.map_or(true, |c| t.course_id == c))
        .map(|t| t.document())
        .collect();
    let results = find_similar(&draft.text, &candidates, threshold)
        .into_iter()
        .filter_map(|result| {
            let thread = state.corpus.thread(&result.id)?;
            Some(SimilarHit { title: thread.title.clone(), result })
        })
        .collect();
    Ok(Json(SimilarResponse { threshold, results }))
}

pub async fn faq_handler(State(state): State<AppState>, Path(course_id): Path<String>) -> Json<FaqResponse> {
    let documents: Vec<Document> = state
        .corpus
        .threads
        .iter()
        .filter(|t| t.course_id == course_id)
        .take(state.settings.max_cluster_docs)
        .map(|t| t.document())
        .collect();
    let clusters = cluster_documents(&documents, state.settings.engine.cluster_threshold);
    tracing::info!(%course_id, threads = documents.len(), clusters = clusters.len(), "faq clusters");

    let clusters = summarize(clusters, &state.corpus.signals)
        .into_iter()
        .map(|cluster| {
            let title = state
                .corpus
                .thread(&cluster.cluster.representative_id)
                .map(|t| t.title.clone())
                .unwrap_or_default();
            FaqEntry { cluster, title }
        })
        .collect();
    Json(FaqResponse { course_id, clusters })
}
