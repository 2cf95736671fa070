// Drives the real blocking client against a one-shot local HTTP server.

use resumen_cli::api::{AnalysisClient, GENERIC_JOB_DESCRIPTION};
use resumen_cli::config::Config;
use resumen_cli::error::RequestError;
use resumen_cli::form::{FormController, InputMode, Phase};
use std::io::{Read, Write};
use std::net::TcpListener;
use std::thread::{self, JoinHandle};
use std::time::Duration;

struct Captured {
    head: String,
    body: Vec<u8>,
}

impl Captured {
    fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// Accept one connection, capture the request, answer with `status` and `body`.
fn serve_once(status: &'static str, body: &'static str, delay: Duration) -> (String, JoinHandle<Captured>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("http://{}", listener.local_addr().unwrap());

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let captured = read_request(&mut stream);
        thread::sleep(delay);
        let response = format!(
            "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
            status,
            body.len(),
            body
        );
        let _ = stream.write_all(response.as_bytes());
        captured
    });
    (url, handle)
}

fn read_request(stream: &mut impl Read) -> Captured {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).unwrap();
        assert!(n > 0, "connection closed before headers");
        buf.extend_from_slice(&chunk[..n]);
        if let Some(pos) = buf.windows(4).position(|w| w == b"\r\n\r\n") {
            break pos + 4;
        }
    };
    let head = String::from_utf8_lossy(&buf[..header_end]).into_owned();
    let lower = head.to_ascii_lowercase();
    let content_length = lower
        .lines()
        .find_map(|l| l.strip_prefix("content-length:"))
        .map(|v| v.trim().parse::<usize>().unwrap());
    let chunked = lower.contains("transfer-encoding: chunked");

    let mut body = buf[header_end..].to_vec();
    loop {
        let done = match content_length {
            Some(len) => body.len() >= len,
            None if chunked => body.ends_with(b"0\r\n\r\n"),
            None => true,
        };
        if done {
            break;
        }
        let n = stream.read(&mut chunk).unwrap();
        if n == 0 {
            break;
        }
        body.extend_from_slice(&chunk[..n]);
    }
    Captured { head, body }
}

fn client(url: &str) -> AnalysisClient {
    AnalysisClient::new(Config {
        api_url: url.to_string(),
        api_prefix: "/api".into(),
        timeout: Duration::from_secs(5),
    })
    .unwrap()
}

const SAMPLE: &str = r#"{"similarity_score":0.42,"similarity_percent":42,"skills":["python","sql"],"resume_preview":"..."}"#;

#[test]
fn text_analysis_posts_json_and_parses_result() {
    let (url, server) = serve_once("200 OK", SAMPLE, Duration::ZERO);
    let result = client(&url).analyze_text("Python and SQL", "Data engineer").unwrap();

    assert_eq!(result.similarity_percent, 42.0);
    assert_eq!(result.skills, vec!["python", "sql"]);

    let req = server.join().unwrap();
    assert!(req.head.starts_with("POST /api/analyze/text "));
    let sent: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
    assert_eq!(sent["resume_text"], "Python and SQL");
    assert_eq!(sent["job_description"], "Data engineer");
}

#[test]
fn pdf_validation_error_uses_first_msg() {
    let (url, server) = serve_once(
        "422 Unprocessable Entity",
        r#"{"detail":[{"loc":["body","file"],"msg":"file must be a PDF","type":"value_error"}]}"#,
        Duration::ZERO,
    );
    let pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    std::fs::write(pdf.path(), b"%PDF-1.4 not really").unwrap();

    let err = client(&url).analyze_pdf(pdf.path(), "Backend").unwrap_err();
    assert_eq!(err.user_message(), "file must be a PDF");
    match err {
        RequestError::Status { status, .. } => assert_eq!(status, 422),
        other => panic!("unexpected error: {:?}", other),
    }
    server.join().unwrap();
}

#[test]
fn text_server_error_with_garbage_body_uses_status_text() {
    let (url, server) = serve_once("500 Internal Server Error", "not json", Duration::ZERO);
    let err = client(&url).analyze_text("resume", "job").unwrap_err();
    assert_eq!(err.user_message(), "Internal Server Error");
    server.join().unwrap();
}

#[test]
fn malformed_success_body_is_rejected() {
    let (url, server) = serve_once("200 OK", r#"{"similarity_score":0.1}"#, Duration::ZERO);
    let err = client(&url).analyze_text("resume", "job").unwrap_err();
    assert!(matches!(err, RequestError::InvalidResponse(_)));
    server.join().unwrap();
}

#[test]
fn slow_backend_times_out() {
    let (url, _server) = serve_once("200 OK", SAMPLE, Duration::from_secs(3));
    let api = AnalysisClient::new(Config {
        api_url: url,
        api_prefix: "/api".into(),
        timeout: Duration::from_millis(300),
    })
    .unwrap();
    let err = api.analyze_text("resume", "job").unwrap_err();
    assert!(matches!(err, RequestError::Timeout(_)), "got {:?}", err);
}

#[test]
fn refused_connection_is_a_transport_error() {
    let port = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let err = client(&format!("http://127.0.0.1:{}", port))
        .analyze_text("resume", "job")
        .unwrap_err();
    assert!(matches!(err, RequestError::Transport(_)));
    assert!(!err.user_message().is_empty());
}

#[test]
fn missing_pdf_file_is_reported_without_request() {
    let err = client("http://127.0.0.1:9")
        .analyze_pdf(std::path::Path::new("/nonexistent/cv.pdf"), "job")
        .unwrap_err();
    assert!(matches!(err, RequestError::File { .. }));
}

#[test]
fn form_upload_sends_generic_job_description() {
    let (url, server) = serve_once("200 OK", SAMPLE, Duration::ZERO);
    let pdf = tempfile::Builder::new().suffix(".pdf").tempfile().unwrap();
    std::fs::write(pdf.path(), b"%PDF-1.4 resume").unwrap();

    let api = client(&url);
    let mut form = FormController::new();
    form.set_mode(InputMode::Pdf);
    form.select_file(Some(pdf.path().to_path_buf()));
    form.set_job_description("   ");

    assert_eq!(form.submit(&api), Phase::Succeeded);
    assert!(!form.is_loading());

    let req = server.join().unwrap();
    assert!(req.head.starts_with("POST /api/analyze/pdf "));
    let body = req.body_text();
    assert!(body.contains("name=\"file\""));
    assert!(body.to_ascii_lowercase().contains("content-type: application/pdf"));
    assert!(body.contains("%PDF-1.4 resume"));
    assert!(body.contains("name=\"job_description\""));
    assert!(body.contains(GENERIC_JOB_DESCRIPTION));
}

#[test]
fn skills_and_health_endpoints() {
    let (url, server) = serve_once("200 OK", r#"{"skills":["rust","docker"]}"#, Duration::ZERO);
    let skills = client(&url).extract_skills("Rust, Docker").unwrap();
    assert_eq!(skills, vec!["rust", "docker"]);
    assert!(server.join().unwrap().head.starts_with("POST /api/skills "));

    let (url, server) = serve_once("200 OK", r#"{"status":"ok","service":"ResumeN"}"#, Duration::ZERO);
    let health = client(&url).health().unwrap();
    assert_eq!(health.status, "ok");
    assert_eq!(health.service.as_deref(), Some("ResumeN"));
    assert!(server.join().unwrap().head.starts_with("GET /health "));
}
