use axum::{
    routing::{get, post},
    Router,
    Json,
    Form,
    body::Bytes,
    extract::{rejection::FormRejection, DefaultBodyLimit, Multipart, State},
    response::{Html, IntoResponse, Response},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{CorsLayer, Any};
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};
use validator::Validate;

use crate::document;
use crate::error::AppError;
use crate::knowledge::{DocumentSource, KnowledgeStore};
use crate::llm::QuestionAnswerer;

pub mod render;

pub use render::PageRenderer;

pub const UPLOAD_FIELD: &str = "pdf_file";

pub const MISSING_FILE_PART: &str = "No file part";
pub const NO_SELECTED_FILE: &str = "No selected file";
pub const UPLOAD_SUCCESS: &str = "PDF uploaded and processed successfully!";
pub const UPLOAD_NO_TEXT: &str = "PDF uploaded, but no extractable text was found in it.";
pub const UPLOAD_FAILED: &str = "The uploaded file could not be read as a PDF. Please check the file and try again.";
pub const ASK_EMPTY: &str = "Please ask a question.";
pub const NO_DOCUMENT: &str = "Please upload a PDF first.";
pub const ANSWER_FAILED: &str = "Sorry, the assistant could not answer right now. Please try again later.";

#[derive(Clone)]
pub struct AppState {
    knowledge: Arc<KnowledgeStore>,
    answerer: Arc<QuestionAnswerer>,
    renderer: Arc<PageRenderer>,
    upload_dir: PathBuf,
}

impl AppState {
    pub fn new(
        knowledge: Arc<KnowledgeStore>,
        answerer: QuestionAnswerer,
        renderer: PageRenderer,
        upload_dir: PathBuf,
    ) -> Self {
        Self {
            knowledge,
            answerer: Arc::new(answerer),
            renderer: Arc::new(renderer),
            upload_dir,
        }
    }

    pub fn knowledge(&self) -> &KnowledgeStore {
        &self.knowledge
    }

    fn render_page(&self, status: StatusCode, message: Option<&str>) -> Response {
        let knowledge = self.knowledge.snapshot();
        match self.renderer.render(message, &knowledge) {
            Ok(html) => (status, Html(html)).into_response(),
            Err(e) => {
                error!("Failed to render page: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    message.unwrap_or_default().to_string(),
                ).into_response()
            }
        }
    }
}

#[derive(Debug, Default, Deserialize, Validate)]
pub struct AskForm {
    #[serde(default)]
    #[validate(length(min = 1))]
    question: String,
}

#[derive(Serialize)]
struct ApiResponse {
    status: String,
}

#[derive(Serialize)]
struct StatusResponse {
    has_document: bool,
    characters: usize,
    document: Option<DocumentSource>,
}

struct UploadedDocument {
    filename: String,
    bytes: Bytes,
}

/// Create and configure the API router
pub fn create_api(state: AppState, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
        .max_age(std::time::Duration::from_secs(3600));

    Router::new()
        .route("/", get(index_page))
        .route("/upload", post(upload_handler))
        .route("/ask", post(ask_handler))
        .route("/status", get(status_handler))
        .route("/health", get(health_check))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(max_upload_bytes)),
        )
        .with_state(state)
}

async fn index_page(State(state): State<AppState>) -> Response {
    state.render_page(StatusCode::OK, None)
}

async fn upload_handler(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Response {
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(rejection) => return rejection,
    };

    info!("Processing upload {} ({} bytes)", upload.filename, upload.bytes.len());

    match document::extract_upload(upload.bytes, state.upload_dir.clone()).await {
        Ok(extracted) => {
            let message = if extracted.is_empty() {
                UPLOAD_NO_TEXT
            } else {
                UPLOAD_SUCCESS
            };
            let source = DocumentSource::new(
                upload.filename,
                extracted.page_count,
                extracted.pages_with_text,
            );
            info!(
                document_id = %source.id,
                pages = source.page_count,
                pages_with_text = source.pages_with_text,
                "Knowledge base replaced with {}",
                source.filename
            );
            state.knowledge.replace_document(extracted.text, source);
            state.render_page(StatusCode::OK, Some(message))
        }
        Err(e) => {
            warn!("Failed to extract {}: {}", upload.filename, e);
            state.render_page(StatusCode::UNPROCESSABLE_ENTITY, Some(UPLOAD_FAILED))
        }
    }
}

async fn read_upload(multipart: &mut Multipart) -> Result<UploadedDocument, Response> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        warn!("Malformed upload: {}", e);
        e.into_response()
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        // A part without a filename parameter is a plain form value, not a file.
        let filename = match field.file_name() {
            Some(filename) => filename.to_string(),
            None => {
                return Err(AppError::Validation(MISSING_FILE_PART.to_string()).into_response());
            }
        };
        if filename.is_empty() {
            return Err(AppError::Validation(NO_SELECTED_FILE.to_string()).into_response());
        }

        let bytes = field.bytes().await.map_err(|e| {
            warn!("Failed to read upload {}: {}", filename, e);
            e.into_response()
        })?;
        return Ok(UploadedDocument { filename, bytes });
    }

    Err(AppError::Validation(MISSING_FILE_PART.to_string()).into_response())
}

async fn ask_handler(
    State(state): State<AppState>,
    form: Result<Form<AskForm>, FormRejection>,
) -> Response {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            warn!("Unreadable ask request: {}", rejection);
            AskForm::default()
        }
    };
    let message = match ask(&state, form).await {
        Ok(reply) => reply,
        Err(AppError::Validation(message)) => message,
        Err(e) => {
            error!("Failed to answer question: {}", e);
            ANSWER_FAILED.to_string()
        }
    };
    state.render_page(StatusCode::OK, Some(&message))
}

async fn ask(state: &AppState, form: AskForm) -> Result<String, AppError> {
    // Only the emptiness check ignores surrounding whitespace; the prompt gets
    // the question as typed.
    let trimmed = AskForm {
        question: form.question.trim().to_string(),
    };
    if trimmed.validate().is_err() {
        return Err(AppError::Validation(ASK_EMPTY.to_string()));
    }

    let knowledge = state.knowledge.snapshot();
    if knowledge.is_empty() {
        return Err(AppError::Validation(NO_DOCUMENT.to_string()));
    }

    state.answerer.answer(&form.question, &knowledge.content).await
}

async fn status_handler(State(state): State<AppState>) -> Json<StatusResponse> {
    let knowledge = state.knowledge.snapshot();
    Json(StatusResponse {
        has_document: knowledge.source.is_some(),
        characters: knowledge.content.chars().count(),
        document: knowledge.source.clone(),
    })
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DocumentParse(_) | AppError::Io(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::LlmRequest(_) => StatusCode::BAD_GATEWAY,
        };
        (status, self.to_string()).into_response()
    }
}

async fn health_check() -> Json<ApiResponse> {
    Json(ApiResponse {
        status: "Server is running and healthy".to_string(),
    })
}
