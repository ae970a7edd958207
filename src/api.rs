use std::time::Instant;

use actix_files::{Files, NamedFile};
use actix_multipart::Multipart;
use actix_web::{App, Error, HttpRequest, HttpResponse, HttpServer, Responder, middleware, web};
use chrono::{SecondsFormat, Utc};
use futures::StreamExt;
use slog::{Logger, info, warn};

use crate::config::Config;
use crate::models::{HealthStatus, UploadResponse};
use crate::upload::{UploadError, UploadStore};
use crate::utils;

/// Multipart field carrying the uploaded files.
pub const FILES_FIELD: &str = "files";
pub const INDEX_FILE: &str = "index.html";

pub struct AppState {
    pub config: Config,
    pub store: UploadStore,
    pub started_at: Instant,
    pub logger: Logger,
}

impl AppState {
    pub fn new(config: Config, logger: Logger) -> Self {
        let store = UploadStore::new(config.upload_dir.clone(), config.max_upload_size);
        AppState {
            config,
            store,
            started_at: Instant::now(),
            logger,
        }
    }
}

// POST /api/upload
async fn upload_files(
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, UploadError> {
    let result = receive_files(&state, payload).await;
    match &result {
        Ok(response) => info!(state.logger, "upload complete"; "files" => response.files.len()),
        Err(e) => utils::error_context(&state.logger, "upload failed", e),
    }
    Ok(HttpResponse::Ok().json(result?))
}

async fn receive_files(
    state: &AppState,
    mut payload: Multipart,
) -> Result<UploadResponse, UploadError> {
    state.store.ensure_dir().await?;

    let mut files = Vec::new();
    while let Some(item) = payload.next().await {
        let mut field = item?;

        let original_name = field
            .content_disposition()
            .filter(|cd| cd.get_name() == Some(FILES_FIELD))
            .and_then(|cd| cd.get_filename())
            .filter(|name| !name.is_empty())
            .map(str::to_owned);

        let Some(original_name) = original_name else {
            // Not a file part; skip its data.
            while let Some(chunk) = field.next().await {
                chunk?;
            }
            continue;
        };

        let (stored, size) = state.store.store(&original_name, &mut field).await?;
        info!(state.logger, "stored upload";
            "original" => &original_name,
            "filename" => &stored.filename,
            "bytes" => size);
        files.push(stored);
    }

    if files.is_empty() {
        return Err(UploadError::NoFiles);
    }
    Ok(UploadResponse { files })
}

// GET /health
async fn health(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(HealthStatus {
        status: "ok".to_string(),
        uptime: state.started_at.elapsed().as_secs_f64(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        environment: state.config.environment.clone(),
    })
}

fn is_api_path(path: &str) -> bool {
    path == "/api" || path.starts_with("/api/")
}

// Unknown uploads are a plain 404, never the page.
async fn missing_upload() -> HttpResponse {
    HttpResponse::NotFound().body("Not Found")
}

/// Client-side routes all resolve to the single page entry document.
async fn spa_index(req: HttpRequest, state: web::Data<AppState>) -> Result<HttpResponse, Error> {
    if is_api_path(req.path()) {
        return Ok(HttpResponse::NotFound().body("Not Found"));
    }
    let index = NamedFile::open_async(state.config.static_dir.join(INDEX_FILE)).await?;
    Ok(index.into_response(&req))
}

/// Registers all routes. The upload directory must exist beforehand.
pub fn configure(state: web::Data<AppState>) -> impl FnOnce(&mut web::ServiceConfig) {
    move |cfg| {
        let static_dir = state.config.static_dir.clone();
        let upload_dir = state.config.upload_dir.clone();

        cfg.app_data(state.clone())
            .route("/api/upload", web::post().to(upload_files))
            .route("/health", web::get().to(health))
            .service(
                Files::new("/uploads", upload_dir).default_handler(web::to(missing_upload)),
            );

        if static_dir.is_dir() {
            cfg.service(
                Files::new("/", static_dir)
                    .index_file(INDEX_FILE)
                    .default_handler(web::to(spa_index)),
            );
        } else {
            warn!(state.logger, "static directory missing, only API routes are served";
                "static_dir" => %static_dir.display());
        }
        cfg.default_service(web::to(spa_index));
    }
}

// Configure and start the web server
pub async fn start_server(config: Config, logger: Logger) -> std::io::Result<()> {
    utils::create_folder(&config.upload_dir)?;

    let (host, port) = (config.host.clone(), config.port);
    let state = web::Data::new(AppState::new(config, logger.clone()));

    info!(logger, "starting server";
        "address" => format!("http://{}:{}", host, port),
        "upload_dir" => %state.store.dir().display(),
        "static_dir" => %state.config.static_dir.display(),
        "max_upload_size" => state.config.max_upload_size,
        "environment" => &state.config.environment);

    HttpServer::new(move || {
        App::new()
            .wrap(middleware::Logger::default())
            .configure(configure(state.clone()))
    })
    .bind((host.as_str(), port))?
    .run()
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::path::Path;

    use actix_web::http::StatusCode;
    use actix_web::http::header::CONTENT_TYPE;
    use actix_web::test;

    use crate::models::UploadedFile;

    const BOUNDARY: &str = "fotkyboundary";

    fn state_for(root: &Path, max_upload_size: u64) -> web::Data<AppState> {
        let upload_dir = root.join("uploads");
        let static_dir = root.join("dist");
        std::fs::create_dir_all(&upload_dir).unwrap();
        std::fs::create_dir_all(static_dir.join("assets")).unwrap();
        std::fs::write(static_dir.join(INDEX_FILE), "<html>fotky</html>").unwrap();
        std::fs::write(static_dir.join("assets").join("app.js"), "console.log(1)").unwrap();

        let config = Config {
            upload_dir,
            static_dir,
            max_upload_size,
            environment: "test".to_string(),
            ..Config::default()
        };
        web::Data::new(AppState::new(config, Logger::root(slog::Discard, slog::o!())))
    }

    /// Builds a multipart body from `(field, filename, content)` parts.
    fn multipart_body(parts: &[(&str, Option<&str>, &str)]) -> String {
        let mut body = String::new();
        for (field, filename, content) in parts {
            body.push_str(&format!("--{}\r\n", BOUNDARY));
            match filename {
                Some(f) => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                    field, f
                )),
                None => body.push_str(&format!(
                    "Content-Disposition: form-data; name=\"{}\"\r\n\r\n",
                    field
                )),
            }
            body.push_str(content);
            body.push_str("\r\n");
        }
        body.push_str(&format!("--{}--\r\n", BOUNDARY));
        body
    }

    fn upload_request(body: String) -> test::TestRequest {
        test::TestRequest::post()
            .uri("/api/upload")
            .insert_header((
                CONTENT_TYPE,
                format!("multipart/form-data; boundary={}", BOUNDARY),
            ))
            .set_payload(body)
    }

    #[actix_web::test]
    async fn test_upload_stores_every_file() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state.clone()))).await;

        let body = multipart_body(&[
            ("files", Some("one.jpg"), "first"),
            ("files", Some("two.jpg"), "second"),
            ("caption", None, "ignored"),
            ("files", Some("three"), "third"),
        ]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK);

        let response: UploadResponse = test::read_body_json(resp).await;
        assert_eq!(response.files.len(), 3);
        let names: HashSet<_> = response.files.iter().map(|f| f.filename.clone()).collect();
        assert_eq!(names.len(), 3);
        assert!(response.files[0].filename.ends_with(".jpg"));
        assert!(!response.files[2].filename.contains('.'));

        for (file, expected) in response.files.iter().zip(["first", "second", "third"]) {
            assert_eq!(file.path, format!("/uploads/{}", file.filename));
            let stored = std::fs::read_to_string(state.config.upload_dir.join(&file.filename)).unwrap();
            assert_eq!(stored, expected);
        }
    }

    #[actix_web::test]
    async fn test_upload_without_files_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state))).await;

        let body = multipart_body(&[("caption", None, "just text")]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        let body = test::read_body(resp).await;
        assert_eq!(body, "No files uploaded");
    }

    #[actix_web::test]
    async fn test_upload_with_empty_filename_is_bad_request() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state))).await;

        let body = multipart_body(&[("files", Some(""), "")]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_oversized_upload_is_rejected() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 4);
        let app = test::init_service(App::new().configure(configure(state.clone()))).await;

        let body = multipart_body(&[("files", Some("big.txt"), "too large")]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(std::fs::read_dir(&state.config.upload_dir).unwrap().count(), 0);
    }

    #[actix_web::test]
    async fn test_uploaded_file_is_served() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state))).await;

        let body = multipart_body(&[("files", Some("note.txt"), "ahoj")]);
        let resp = test::call_service(&app, upload_request(body).to_request()).await;
        let response: UploadResponse = test::read_body_json(resp).await;
        let UploadedFile { path, .. } = &response.files[0];

        let req = test::TestRequest::get().uri(path).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await, "ahoj");

        let req = test::TestRequest::get().uri("/uploads/missing.png").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
        assert_ne!(test::read_body(resp).await, "<html>fotky</html>");
    }

    #[actix_web::test]
    async fn test_health_reports_ok() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state))).await;

        let req = test::TestRequest::get().uri("/health").to_request();
        let health: HealthStatus = test::call_and_read_body_json(&app, req).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.environment, "test");
        assert!(health.uptime >= 0.0);
        assert!(chrono::DateTime::parse_from_rfc3339(&health.timestamp).is_ok());
    }

    #[actix_web::test]
    async fn test_spa_fallback() {
        let tmp = tempfile::tempdir().unwrap();
        let state = state_for(tmp.path(), 1024);
        let app = test::init_service(App::new().configure(configure(state))).await;

        for uri in ["/", "/songs", "/some/client/route"] {
            let req = test::TestRequest::get().uri(uri).to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
            assert_eq!(test::read_body(resp).await, "<html>fotky</html>");
        }

        let req = test::TestRequest::get().uri("/assets/app.js").to_request();
        assert_eq!(test::call_and_read_body(&app, req).await, "console.log(1)");

        let req = test::TestRequest::get().uri("/api/nope").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_is_api_path() {
        assert!(is_api_path("/api"));
        assert!(is_api_path("/api/upload"));
        assert!(!is_api_path("/apiary"));
        assert!(!is_api_path("/"));
    }
}
