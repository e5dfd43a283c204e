use std::io::Read as _;
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use predicates::prelude::*;

const PAGE_JSON: &str = r#"{
    "default_background": "assets/images/bg-default.jpg",
    "sections": [
        { "id": "intro", "custom_background": "assets/images/bg-intro.jpg" },
        { "id": "about" },
        { "id": "contact" }
    ],
    "menu_items": [
        { "id": "menu-item-intro", "scroll": true },
        { "id": "menu-item-about", "scroll": true },
        { "id": "menu-item-contact", "scroll": true }
    ],
    "forms": [
        {
            "id": "contact",
            "endpoint": "assets/php/mail.php",
            "fields": [
                { "name": "name", "rule": "string", "required": true },
                { "name": "email", "rule": "email", "required": true }
            ]
        }
    ]
}"#;

fn write_page(dir: &tempfile::TempDir, contents: &str) -> PathBuf {
    let path = dir.path().join("page.json");
    std::fs::write(&path, contents).expect("write page document");
    path
}

#[test]
fn check_accepts_valid_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = write_page(&dir, PAGE_JSON);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["check", "--page"])
        .arg(&page)
        .assert()
        .success()
        .stdout(predicate::str::contains("ok (3 sections, 3 menu items, 1 forms)"));
}

#[test]
fn check_reports_lint_issues_and_fails() {
    let dir = tempfile::tempdir().expect("tempdir");
    let broken = PAGE_JSON.replace("\"rule\": \"email\"", "\"rule\": \"postcode\"");
    let page = write_page(&dir, &broken);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["check", "--page"])
        .arg(&page)
        .assert()
        .failure()
        .stdout(predicate::str::contains("unknown validation rule: postcode"))
        .stderr(predicate::str::contains("1 issue(s) found"));
}

#[test]
fn check_rejects_malformed_json() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = write_page(&dir, "{ not json");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["check", "--page"])
        .arg(&page)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse page document"));
}

fn spawn_endpoint(body: &'static str) -> (String, mpsc::Sender<()>, thread::JoinHandle<()>) {
    let server = tiny_http::Server::http("127.0.0.1:0").expect("start tiny_http server");
    let addr = server.server_addr();
    let base_url = format!("http://{addr}/");

    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
    let handle = thread::spawn(move || loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }
        let mut request = match server.recv_timeout(Duration::from_millis(50)) {
            Ok(Some(req)) => req,
            Ok(None) => continue,
            Err(_) => break,
        };
        let mut ignored = String::new();
        let _ = request.as_reader().read_to_string(&mut ignored);
        let _ = request.respond(tiny_http::Response::from_string(body));
    });

    (base_url, shutdown_tx, handle)
}

#[test]
fn submit_round_trips_through_the_endpoint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = write_page(&dir, PAGE_JSON);
    let (base_url, shutdown, handle) = spawn_endpoint("success");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["submit", "--page"])
        .arg(&page)
        .args(["--form", "contact", "--base-url", &base_url])
        .args(["--field", "name=John Smith"])
        .args(["--field", "email=john@example.com"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Form submitted successfully."));

    let _ = shutdown.send(());
    let _ = handle.join();
}

#[test]
fn submit_surfaces_field_errors_without_posting() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = write_page(&dir, PAGE_JSON);
    let (base_url, shutdown, handle) = spawn_endpoint("success");

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["submit", "--page"])
        .arg(&page)
        .args(["--form", "contact", "--base-url", &base_url])
        .args(["--field", "name=John Smith"])
        .args(["--field", "email=not-an-email"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("Please enter a valid email address."))
        .stderr(predicate::str::contains("rejected by local validation"));

    let _ = shutdown.send(());
    let _ = handle.join();
}

#[test]
fn submit_refuses_unknown_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let page = write_page(&dir, PAGE_JSON);

    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("onepager");
    cmd.args(["submit", "--page"])
        .arg(&page)
        .args(["--form", "contact", "--base-url", "http://127.0.0.1:1/"])
        .args(["--field", "subject=Hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no field named subject"));
}
