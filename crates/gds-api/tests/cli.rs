//! End-to-end tests for the `gds-search` binary against a mock search service.

use std::io::Write;
use std::process::{Command, Output};

use gds_api_test_helpers::SearchStubs;
use mockito::{Matcher, Server};
use serde_json::{json, Value};

fn gds_search(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_gds-search"))
        .args(args)
        .env_remove("GDS_SEARCH_ENDPOINT")
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run gds-search")
}

fn json_lines(output: &Output) -> Vec<Value> {
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line should be JSON"))
        .collect()
}

#[test]
fn test_streams_all_pages_as_json_lines() {
    let mut server = Server::new();
    let records = vec![json!({"title": "t1"}), json!({"title": "t2"}), json!({"title": "t3"})];
    let mocks = SearchStubs::new(&mut server).paginated(&records, 2);

    let url = server.url();
    let output = gds_search(&["--endpoint", &url, "--page-size", "2"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(json_lines(&output), records);
    for mock in &mocks {
        mock.assert();
    }
}

#[test]
fn test_limit_stops_fetching_early() {
    let mut server = Server::new();
    let mut stubs = SearchStubs::new(&mut server);
    let first = stubs
        .page_mock(0, 2, &[json!({"title": "t1"}), json!({"title": "t2"})])
        .expect(1)
        .create();
    let second = stubs.page_mock(2, 2, &[json!({"title": "t3"})]).expect(0).create();

    let url = server.url();
    let output = gds_search(&["--endpoint", &url, "--page-size", "2", "--limit", "2"]);

    assert!(output.status.success());
    assert_eq!(json_lines(&output).len(), 2);
    first.assert();
    second.assert();
}

#[test]
fn test_params_and_config_file() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/search.json")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("filter_format".into(), "guide".into()),
            Matcher::UrlEncoded("count".into(), "7".into()),
        ]))
        .match_header("user-agent", "gds-search-test")
        .with_body(r#"{"results": []}"#)
        .create();

    let mut config = tempfile::NamedTempFile::new().unwrap();
    writeln!(config, "endpoint: {}", server.url()).unwrap();
    writeln!(config, "page_size: 7").unwrap();
    writeln!(config, "headers:\n  User-Agent: gds-search-test").unwrap();

    let path = config.path().to_str().unwrap().to_string();
    let output = gds_search(&["--config", &path, "--param", "filter_format=guide"]);

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(json_lines(&output).is_empty());
    mock.assert();
}

#[test]
fn test_server_error_exits_non_zero() {
    let mut server = Server::new();
    let _mock = SearchStubs::new(&mut server).search_fails(500);

    let url = server.url();
    let output = gds_search(&["--endpoint", &url]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("server error (500)"), "stderr: {stderr}");
}

#[test]
fn test_requires_endpoint() {
    let output = gds_search(&[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--endpoint"));
}
