use axum::extract::Multipart;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::post;
use axum::Router;
use reqwest::Url;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use translate_uploader::{
    FileFilter, Phase, ReqwestTransport, SelectedFile, Uploader, ValidationError,
};

const WAIT: Duration = Duration::from_secs(10);
const ZIP_BODY: &[u8] = b"PK\x03\x04translations";

struct MockServer {
    endpoint: Url,
    requests: Arc<AtomicUsize>,
}

/// Serves `/upload` on a private runtime thread. The nth request gets
/// `statuses[n]` (the last one repeats) unless it lacks a `file` part named
/// `*.csv`, which gets 400.
fn mock_server(statuses: &[StatusCode]) -> MockServer {
    let statuses = statuses.to_vec();
    let requests = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&requests);
    let router = Router::new().route(
        "/upload",
        post(move |mut multipart: Multipart| {
            let counter = Arc::clone(&counter);
            let statuses = statuses.clone();
            async move {
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let status = statuses[n.min(statuses.len() - 1)];
                let mut valid = false;
                while let Ok(Some(field)) = multipart.next_field().await {
                    let is_csv_part = field.name() == Some("file")
                        && field.file_name().is_some_and(|name| name.ends_with(".csv"));
                    let body = field.bytes().await.unwrap_or_default();
                    valid |= is_csv_part && !body.is_empty();
                }
                if !valid {
                    return (StatusCode::BAD_REQUEST, "missing file part").into_response();
                }
                if status.is_success() {
                    (status, [(header::CONTENT_TYPE, "application/zip")], ZIP_BODY).into_response()
                } else {
                    (status, "internal error").into_response()
                }
            }
        }),
    );

    let (addr_tx, addr_rx) = std::sync::mpsc::channel();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Runtime::new().unwrap();
        rt.block_on(async move {
            let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
            addr_tx.send(listener.local_addr().unwrap()).unwrap();
            axum::serve(listener, router).await.unwrap();
        });
    });
    let addr = addr_rx.recv().unwrap();

    MockServer {
        endpoint: Url::parse(&format!("http://{addr}/upload")).unwrap(),
        requests,
    }
}

fn uploader_for(server: &MockServer) -> Uploader<ReqwestTransport> {
    let transport = ReqwestTransport::new(server.endpoint.clone(), Duration::from_secs(5)).unwrap();
    Uploader::new(
        transport,
        FileFilter::new(&["*.csv"]).unwrap(),
        "translations.zip",
    )
}

fn data_csv() -> SelectedFile {
    SelectedFile::from_bytes("data.csv", b"id,text\n1,a".to_vec())
}

#[test]
fn successful_upload_can_be_saved_as_translations_zip() {
    let server = mock_server(&[StatusCode::OK]);
    let mut uploader = uploader_for(&server);
    assert!(uploader.select_file(data_csv()));

    uploader.submit().unwrap();
    assert!(uploader.wait_for_result(WAIT));

    assert!(matches!(uploader.phase(), Phase::Success(_)));
    assert!(uploader.error_message().is_none());
    let download = uploader.download().unwrap();
    assert_eq!(download.file_name(), "translations.zip");

    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join(download.file_name());
    download.save_to(&dest).unwrap();
    assert_eq!(std::fs::read(&dest).unwrap(), ZIP_BODY);
    assert_eq!(server.requests.load(Ordering::SeqCst), 1);
}

#[test]
fn server_error_keeps_earlier_download() {
    let server = mock_server(&[StatusCode::OK, StatusCode::INTERNAL_SERVER_ERROR]);
    let mut uploader = uploader_for(&server);
    uploader.select_file(data_csv());
    uploader.submit().unwrap();
    assert!(uploader.wait_for_result(WAIT));
    let first = uploader.download().unwrap().path().to_path_buf();

    uploader.submit().unwrap();
    assert!(uploader.is_submitting());
    assert!(uploader.wait_for_result(WAIT));

    assert!(!uploader.is_submitting());
    assert_eq!(
        uploader.error_message().as_deref(),
        Some("Upload failed. Please try again.")
    );
    assert_eq!(uploader.download().unwrap().path(), first);
    assert_eq!(std::fs::read(&first).unwrap(), ZIP_BODY);
    assert_eq!(server.requests.load(Ordering::SeqCst), 2);
}

#[test]
fn submit_without_file_never_reaches_the_server() {
    let server = mock_server(&[StatusCode::OK]);
    let mut uploader = uploader_for(&server);

    assert_eq!(uploader.submit(), Err(ValidationError::NoFileSelected));
    assert_eq!(uploader.error_message().as_deref(), Some("Please select a file."));
    assert!(!uploader.wait_for_result(Duration::from_millis(100)));
    assert_eq!(server.requests.load(Ordering::SeqCst), 0);
}

#[test]
fn dropping_the_uploader_mid_request_is_harmless() {
    let server = mock_server(&[StatusCode::OK]);
    let mut uploader = uploader_for(&server);
    uploader.select_file(data_csv());
    uploader.submit().unwrap();
    drop(uploader);

    // Give the abandoned worker time to finish against the server.
    let deadline = std::time::Instant::now() + WAIT;
    while server.requests.load(Ordering::SeqCst) == 0 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(20));
    }
    assert_eq!(server.requests.load(Ordering::SeqCst), 1);
}
