// End-to-end tests of the schoolclosings_app binary.

use std::fs;
use std::io::{Read, Write};
use std::net::TcpListener;
use std::path::PathBuf;
use std::thread;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const FIXTURE_FEED: &str = include_str!("fixtures/closings.xml");

/// Answers a single HTTP request with the given status line and body, returns the feed url.
fn serve_once(status_line: &'static str, body: &'static str) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("listener should bind");
    let address = listener.local_addr().expect("local addr should exist");
    thread::spawn(move || {
        if let Ok((mut stream, _)) = listener.accept() {
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|window| window == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/xml\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            let _ = stream.write_all(response.as_bytes());
        }
    });
    format!("http://{}/closings.xml", address)
}

fn config_with(names: &str) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("config.ini");
    fs::write(&path, format!("[SCHOOL_NAMES]\nnames = {}\n", names)).expect("config should be written");
    (dir, path)
}

fn app(config_path: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("schoolclosings_app").expect("binary should exist");
    cmd.arg("--config").arg(config_path);
    cmd.env_remove("CLOSINGS_FEED_URL");
    cmd
}

#[test]
fn creates_config_on_first_run() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("config.ini");

    app(&path)
        .arg("--show")
        .assert()
        .success()
        .stdout(predicate::str::contains("created with default settings."))
        .stdout(predicate::str::ends_with("Current schools in config:\n"));
    assert!(path.exists());
}

#[test]
fn no_create_reports_missing_config() {
    let dir = tempfile::tempdir().expect("tempdir should be created");
    let path = dir.path().join("config.ini");

    app(&path)
        .args(["--no-create", "--show"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Error:"));
    assert!(!path.exists());
}

#[test]
fn add_show_remove_round_trip() {
    let (_dir, path) = config_with("central");

    app(&path)
        .args(["--add", "West High"])
        .assert()
        .success()
        .stdout("Added 'West High' to config.\n");

    app(&path)
        .arg("--show")
        .assert()
        .success()
        .stdout("Current schools in config:\n - central\n - west high\n");

    app(&path)
        .args(["--remove", "west high"])
        .assert()
        .success()
        .stdout("Removed 'west high' from config.\n");

    let contents = fs::read_to_string(&path).expect("config should be readable");
    assert_eq!(contents, "[SCHOOL_NAMES]\nnames = central\n");
}

#[test]
fn add_rejects_comma() {
    let (_dir, path) = config_with("central");
    app(&path).args(["--add", "a, b"]).assert().code(2);
}

#[test]
fn check_prints_matches() {
    let (_dir, path) = config_with("central, HIGH");
    let url = serve_once("200 OK", FIXTURE_FEED);

    app(&path)
        .env("CLOSINGS_FEED_URL", url)
        .assert()
        .success()
        .stdout("Central High School - Closed\nHighland Academy - Remote Learning\n");
}

#[test]
fn check_without_matches_prints_run_date() {
    let (_dir, path) = config_with("westview");
    let url = serve_once("200 OK", FIXTURE_FEED);

    app(&path)
        .env("CLOSINGS_FEED_URL", url)
        .assert()
        .success()
        .stdout("No Closings for you today! - 1/15/2026 6:02:11 AM\n");
}

#[test]
fn show_all_lists_every_record() {
    let (_dir, path) = config_with("");
    let url = serve_once("200 OK", FIXTURE_FEED);

    app(&path)
        .arg("--all")
        .env("CLOSINGS_FEED_URL", url)
        .assert()
        .success()
        .stdout(
            "All schools from the feed:\n\
             Central High School - Closed\n\
             Eastside Elementary - 2 Hour Delay\n\
             Highland Academy - Remote Learning\n",
        );
}

#[test]
fn feed_url_from_settings_section() {
    let (_dir, path) = config_with("eastside");
    let url = serve_once("200 OK", FIXTURE_FEED);
    let mut contents = fs::read_to_string(&path).expect("config should be readable");
    contents.push_str(&format!("\n[SETTINGS]\nfeed_url = {}\n", url));
    fs::write(&path, contents).expect("config should be written");

    app(&path)
        .assert()
        .success()
        .stdout("Eastside Elementary - 2 Hour Delay\n");
}

#[test]
fn server_error_exits_with_network_code() {
    let (_dir, path) = config_with("central");
    let url = serve_once("500 Internal Server Error", "temporary failure");

    app(&path)
        .env("CLOSINGS_FEED_URL", url)
        .assert()
        .code(3)
        .stdout("")
        .stderr(predicate::str::contains("unexpected status code: 500"));
}

#[test]
fn malformed_feed_exits_with_parse_code() {
    let (_dir, path) = config_with("central");
    let url = serve_once("200 OK", "<CLOSINGS><RUN_DATE>today</RUN_DATE><RECORD>");

    app(&path)
        .env("CLOSINGS_FEED_URL", url)
        .assert()
        .code(4)
        .stdout("");
}
