//! End-to-end tests for the API tester
//!
//! These tests run the real scenarios against a wiremock server standing in
//! for the Lost & Found backend and check what the harness sent and how it
//! scored the results.

use apitest::common::config::Config;
use apitest::scenarios::{HealthCheck, Outcome, Scenario};
use apitest::{default_suite, run_suite, CallSpec, Credentials, Executor, RunSummary, TestRun};
use serde_json::{json, Value};
use std::io::{Cursor, Read};
use wiremock::matchers::{body_json, header, header_regex, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_TOKEN: &str = "abc123def456ghi789jkl012mno345";
const STUDENT_TOKEN: &str = "student-token-xyz";

fn students(rolls: &[(&str, &str)]) -> Value {
    Value::Array(
        rolls
            .iter()
            .map(|(id, roll)| {
                json!({
                    "id": id,
                    "roll_number": roll,
                    "full_name": format!("Student {roll}"),
                    "department": "Computer Science",
                })
            })
            .collect(),
    )
}

/// Mount every endpoint except `GET /students` and `DELETE /students/{id}`
async fn mount_common(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/admin/login"))
        .and(body_json(json!({"username": "superadmin", "password": "SuperAdmin@123"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": ADMIN_TOKEN, "role": "super_admin"})),
        )
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/students/upload-excel"))
        .and(header("Authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .and(header_regex("content-type", "^multipart/form-data; boundary="))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "added": 2,
            "skipped": 1,
            "message": "Added 2 students, skipped 1 duplicate"
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/stats"))
        .and(header("Authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total_items": 4})))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/items"))
        .and(header("Authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(server)
        .await;

    Mock::given(method("POST"))
        .and(path("/auth/student/login"))
        .and(body_json(json!({"roll_number": "CS002", "dob": "2002-08-20"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": STUDENT_TOKEN})))
        .mount(server)
        .await;
}

async fn mount_students(server: &MockServer, body: Value) {
    Mock::given(method("GET"))
        .and(path("/students"))
        .and(header("Authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(server)
        .await;
}

async fn run_default_suite(server: &MockServer) -> (TestRun, RunSummary) {
    let config = Config {
        base_url: server.uri(),
        ..Config::default()
    };
    let mut run = TestRun::new(Executor::new(&config.base_url, None).unwrap());
    let summary = run_suite(&mut run, &default_suite(&config)).await;
    (run, summary)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Bytes of the multipart file part named `file_name`
fn multipart_file(request: &wiremock::Request, file_name: &str) -> Vec<u8> {
    let content_type = request.headers.get("content-type").unwrap().to_str().unwrap();
    let boundary = content_type.split("boundary=").nth(1).unwrap();
    let delimiter = format!("\r\n--{boundary}");
    let marker = format!("filename=\"{file_name}\"");

    let body = request.body.as_slice();
    let part = find(body, marker.as_bytes()).unwrap();
    let start = part + find(&body[part..], b"\r\n\r\n").unwrap() + 4;
    let end = start + find(&body[start..], delimiter.as_bytes()).unwrap();
    body[start..end].to_vec()
}

async fn requests_to(server: &MockServer, verb: &str, url_path: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == verb && r.url.path() == url_path)
        .collect()
}

#[tokio::test]
async fn test_full_suite_passes() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_students(
        &server,
        students(&[("s1", "CS001"), ("s2", "CS002"), ("s6", "CS006"), ("s7", "CS007")]),
    )
    .await;
    Mock::given(method("DELETE"))
        .and(path("/students/s6"))
        .and(header("Authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "deleted"})))
        .expect(1)
        .mount(&server)
        .await;

    let (run, summary) = run_default_suite(&server).await;

    assert!(summary.all_passed(), "{summary:?}");
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(summary.results.len(), 8);
    // Delete Student issues a list call before the delete
    assert_eq!(summary.tests_run, 9);
    assert_eq!(summary.tests_passed, 9);
    assert_eq!(run.credentials.admin(), Some(ADMIN_TOKEN));
    assert_eq!(run.credentials.student(), Some(STUDENT_TOKEN));

    let delete_call = run
        .calls()
        .iter()
        .find(|c| c.endpoint == "students/s6")
        .unwrap();
    assert_eq!(delete_call.name, "Delete Student CS006");
}

#[tokio::test]
async fn test_logins_send_no_bearer_token() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_students(&server, students(&[("s6", "CS006")])).await;
    Mock::given(method("DELETE"))
        .and(path("/students/s6"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    run_default_suite(&server).await;

    for login_path in ["/auth/admin/login", "/auth/student/login"] {
        let requests = requests_to(&server, "POST", login_path).await;
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get("authorization").is_none());
        let content_type = requests[0].headers.get("content-type").unwrap();
        assert_eq!(content_type.to_str().unwrap(), "application/json");
    }

    let health = requests_to(&server, "GET", "/").await;
    assert!(health[0].headers.get("authorization").is_none());
}

#[tokio::test]
async fn test_upload_sends_generated_workbook() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_students(&server, students(&[("s7", "CS007")])).await;
    Mock::given(method("DELETE"))
        .and(path("/students/s7"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let (_, summary) = run_default_suite(&server).await;
    assert_eq!(summary.outcome_of("Excel Upload"), Some(&Outcome::Passed));

    let uploads = requests_to(&server, "POST", "/students/upload-excel").await;
    assert_eq!(uploads.len(), 1);
    let body = String::from_utf8_lossy(&uploads[0].body);
    assert!(body.contains(r#"name="file""#));
    assert!(body.contains(r#"filename="test_students.xlsx""#));
    assert!(body.contains("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"));

    let workbook = multipart_file(&uploads[0], "test_students.xlsx");
    let mut archive = zip::ZipArchive::new(Cursor::new(workbook)).unwrap();
    let mut sheet = String::new();
    archive
        .by_name("xl/worksheets/sheet1.xml")
        .unwrap()
        .read_to_string(&mut sheet)
        .unwrap();

    for cell in ["Roll Number", "Phone Number", "CS002", "Jane Smith", "CS006", "CS007"] {
        assert!(sheet.contains(&format!("<t>{cell}</t>")), "missing {cell} in {sheet}");
    }
    assert!(sheet.contains(r#"<c r="A4" t="inlineStr"><is><t>CS007</t></is></c>"#));
}

#[tokio::test]
async fn test_admin_login_failure_halts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/admin/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"detail": "Invalid credentials"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/students"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/student/login"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (run, summary) = run_default_suite(&server).await;

    assert_eq!(summary.halted_by.as_deref(), Some("Admin Login"));
    assert_eq!(summary.results.len(), 2);
    assert_eq!(summary.tests_run, 2);
    assert_eq!(summary.tests_passed, 1);
    assert_eq!(summary.exit_code(), 1);
    assert!(run.credentials.admin().is_none());
}

#[tokio::test]
async fn test_admin_login_without_token_halts_run() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/admin/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;

    let (run, summary) = run_default_suite(&server).await;

    assert!(summary.outcome_of("Admin Login").unwrap().is_failed());
    assert_eq!(summary.halted_by.as_deref(), Some("Admin Login"));
    assert_eq!(summary.tests_run, summary.tests_passed);
    assert_eq!(summary.exit_code(), 1);
    assert_eq!(run.calls().len(), 2);
}

#[tokio::test]
async fn test_delete_without_candidate_issues_no_delete() {
    let server = MockServer::start().await;
    mount_common(&server).await;
    mount_students(&server, students(&[("s1", "CS001"), ("s2", "CS002")])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (run, summary) = run_default_suite(&server).await;

    assert!(summary.outcome_of("Delete Student").unwrap().is_failed());
    assert_eq!(summary.outcome_of("Dashboard Stats"), Some(&Outcome::Passed));
    assert_eq!(summary.outcome_of("Student Login"), Some(&Outcome::Passed));
    assert!(summary.halted_by.is_none());
    assert_eq!(summary.tests_run, 8);
    assert_eq!(summary.tests_passed, 8);
    // Every attempted call passed, so the missing record alone does not fail the run
    assert_eq!(summary.exit_code(), 0);
    assert_eq!(run.count_calls_since(0, apitest::Method::Delete), 0);
}

#[tokio::test]
async fn test_failed_upload_skips_delete() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/students/upload-excel"))
        .respond_with(ResponseTemplate::new(422).set_body_string("Invalid file format"))
        .mount(&server)
        .await;
    mount_common(&server).await;
    mount_students(&server, students(&[("s6", "CS006")])).await;
    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let (_, summary) = run_default_suite(&server).await;

    assert!(summary.outcome_of("Excel Upload").unwrap().is_failed());
    assert_eq!(
        summary.outcome_of("Delete Student"),
        Some(&Outcome::Skipped(
            "prerequisite 'Excel Upload' not satisfied".to_string()
        ))
    );
    assert_eq!(summary.outcome_of("Get Items"), Some(&Outcome::Passed));
    assert_eq!(summary.exit_code(), 1);
}

#[tokio::test]
async fn test_health_check_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mut run = TestRun::new(Executor::new(&server.uri(), None).unwrap());
    let outcome = HealthCheck.run(&mut run).await.unwrap();

    assert_eq!(outcome, Outcome::Passed);
    assert_eq!(run.tests_run(), 1);
    assert_eq!(run.tests_passed(), 1);
}

#[tokio::test]
async fn test_status_mismatch_reports_raw_error_text() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/stats"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/items"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"detail": "Forbidden"})))
        .mount(&server)
        .await;

    let executor = Executor::new(&server.uri(), None).unwrap();
    let creds = Credentials::new();

    let result = executor
        .execute(&CallSpec::get("Dashboard Stats", "stats", 200), &creds)
        .await;
    assert!(!result.success);
    assert_eq!(result.status, Some(500));
    assert_eq!(result.error.as_deref(), Some("upstream exploded"));
    assert_eq!(result.body, json!({}));

    let result = executor
        .execute(&CallSpec::get("Get Items", "items", 200), &creds)
        .await;
    assert!(!result.success);
    let detail: Value = serde_json::from_str(result.error.as_deref().unwrap()).unwrap();
    assert_eq!(detail, json!({"detail": "Forbidden"}));
}

#[tokio::test]
async fn test_matching_non_200_status_is_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/students/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"detail": "Not found"})))
        .mount(&server)
        .await;

    let mut run = TestRun::new(Executor::new(&server.uri(), None).unwrap());
    let result = run
        .call(CallSpec::delete("Delete Missing", "students/missing", 404))
        .await;

    assert!(result.success);
    assert_eq!(run.tests_passed(), 1);
}
