use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tempfile::TempDir;

fn folio_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("folio");
    path
}

/// Write a config whose every path lives under `root`, binding the admin
/// service to `port`.
fn write_config(root: &Path, port: u16) -> PathBuf {
    let config_content = format!(
        r#"[data]
file = "{root}/content/portfolio.json"
uploads_dir = "{root}/uploads"

[server]
bind = "127.0.0.1:{port}"

[admin]
password = "admin123"
state_file = "{root}/state.json"
session_minutes = 10
"#,
        root = root.display(),
        port = port
    );

    let config_path = root.join("folio.toml");
    fs::write(&config_path, config_content).unwrap();
    config_path
}

fn setup_test_env() -> (TempDir, PathBuf, u16) {
    let tmp = TempDir::new().unwrap();
    let port = find_free_port();
    let config_path = write_config(tmp.path(), port);
    (tmp, config_path, port)
}

fn run_folio(config_path: &Path, args: &[&str]) -> (String, String, bool) {
    let binary = folio_binary();
    let output = Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .args(args)
        // A developer's real publish token must not leak into assertions.
        .env_remove("FOLIO_GITHUB_TOKEN")
        .output()
        .unwrap_or_else(|e| panic!("Failed to run folio binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();
    (stdout, stderr, success)
}

/// Find an available port for the test server.
fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

/// Start the admin service in the background and return the child process.
fn start_server(config_path: &Path) -> std::process::Child {
    let binary = folio_binary();
    Command::new(&binary)
        .arg("--config")
        .arg(config_path.to_str().unwrap())
        .arg("serve")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap_or_else(|e| panic!("Failed to start server: {}", e))
}

/// Wait for the server to be ready by polling the data endpoint.
fn wait_for_server(port: u16) {
    let url = format!("http://127.0.0.1:{}/api/data", port);
    for _ in 0..50 {
        std::thread::sleep(std::time::Duration::from_millis(100));
        if let Ok(resp) = reqwest::blocking::get(&url) {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

fn get_document(port: u16) -> serde_json::Value {
    let url = format!("http://127.0.0.1:{}/api/data", port);
    reqwest::blocking::get(&url).unwrap().json().unwrap()
}

// ============ Scaffolding ============

#[test]
fn test_init_scaffolds_workspace() {
    let (tmp, config_path, _port) = setup_test_env();

    let (stdout, stderr, success) = run_folio(&config_path, &["init"]);
    assert!(success, "init failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("Next steps"));

    let data_file = tmp.path().join("content/portfolio.json");
    assert!(data_file.exists(), "init should seed the data file");
    assert!(tmp.path().join("uploads").is_dir());

    let doc: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&data_file).unwrap()).unwrap();
    assert!(doc["personalInfo"]["fullName"].is_string());
    assert!(doc["navLinks"].is_array());
    assert!(doc["projects"].is_array());
}

#[test]
fn test_init_idempotent() {
    let (_tmp, config_path, _port) = setup_test_env();

    let (_, _, success1) = run_folio(&config_path, &["init"]);
    assert!(success1, "First init failed");

    let (stdout2, _, success2) = run_folio(&config_path, &["init"]);
    assert!(success2, "Second init failed (not idempotent)");
    assert!(stdout2.contains("already present"));
}

// ============ Sessions ============

#[test]
fn test_login_rejects_wrong_password() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) = run_folio(&config_path, &["login", "nope"]);
    assert!(!success, "Wrong password should fail");
    assert!(
        stderr.contains("wrong password"),
        "Should report the password, got: {}",
        stderr
    );
}

#[test]
fn test_login_and_status() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (stdout, stderr, success) = run_folio(&config_path, &["login", "admin123"]);
    assert!(success, "login failed: {}", stderr);
    assert!(stdout.contains("Logged in"));
    assert!(stdout.contains("10 minutes"));

    let (stdout, _, success) = run_folio(&config_path, &["status"]);
    assert!(success);
    assert!(
        stdout.contains("Session: active"),
        "Status should show an active session, got: {}",
        stdout
    );
    assert!(
        stdout.contains(&format!(
            "Backend local: local admin service at http://127.0.0.1:{}",
            port
        )),
        "Status should describe the local backend, got: {}",
        stdout
    );
    assert!(stdout.contains("Backend github: not configured"));
}

#[test]
fn test_status_lists_configured_backends() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    // Filling in [remote] turns the github line into a concrete target.
    let mut config = fs::read_to_string(&config_path).unwrap();
    config.push_str("\n[remote]\nowner = \"octocat\"\nrepo = \"site\"\n");
    fs::write(&config_path, config).unwrap();

    let (stdout, _, success) = run_folio(&config_path, &["status"]);
    assert!(success);
    assert!(stdout.contains(&format!("http://127.0.0.1:{}", port)));
    assert!(
        stdout.contains("Backend github: GitHub contents API at https://api.github.com/repos/octocat/site/contents/"),
        "Status should name the publish target, got: {}",
        stdout
    );
}

#[test]
fn test_edits_require_session() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) = run_folio(&config_path, &["append", "projects"]);
    assert!(!success, "Editing without a session should fail");
    assert!(
        stderr.contains("not logged in"),
        "Should point at login, got: {}",
        stderr
    );
}

#[test]
fn test_upload_requires_session() {
    let (tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let image = tmp.path().join("pic.png");
    fs::write(&image, b"not really a png").unwrap();

    let (_, stderr, success) = run_folio(&config_path, &["upload", image.to_str().unwrap()]);
    assert!(!success);
    assert!(stderr.contains("not logged in"));
}

#[test]
fn test_logout_preserves_token() {
    let (tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    run_folio(&config_path, &["login", "admin123"]);
    let (_, stderr, success) = run_folio(&config_path, &["token", "set", "ghp_testtoken"]);
    assert!(success, "token set failed: {}", stderr);

    let (stdout, _, success) = run_folio(&config_path, &["logout"]);
    assert!(success);
    assert!(stdout.contains("Logged out"));

    let (stdout, _, _) = run_folio(&config_path, &["status"]);
    assert!(stdout.contains("Session: none"));
    assert!(
        stdout.contains("stored in the state file"),
        "Token should survive logout, got: {}",
        stdout
    );

    let state = fs::read_to_string(tmp.path().join("state.json")).unwrap();
    assert!(state.contains("ghp_testtoken"));
}

#[test]
fn test_expired_session_cleared_by_cli() {
    let (tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    // A session that lapsed long ago, sharing the file with a token.
    fs::write(
        tmp.path().join("state.json"),
        r#"{"session":{"expires_at":"2020-01-01T00:00:00Z"},"github_token":"ghp_keep"}"#,
    )
    .unwrap();

    let (stdout, _, success) = run_folio(&config_path, &["status"]);
    assert!(success);
    assert!(
        stdout.contains("Session: none"),
        "Expired session should be gone, got: {}",
        stdout
    );

    // The cleanup is durable and the token untouched.
    let state = fs::read_to_string(tmp.path().join("state.json")).unwrap();
    assert!(!state.contains("expires_at"));
    assert!(state.contains("ghp_keep"));
}

#[test]
fn test_token_clear() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    run_folio(&config_path, &["token", "set", "ghp_gone"]);
    let (stdout, _, success) = run_folio(&config_path, &["token", "clear"]);
    assert!(success);
    assert!(stdout.contains("cleared"));

    let (stdout, _, _) = run_folio(&config_path, &["status"]);
    assert!(stdout.contains("Publish token: none"));
}

#[test]
fn test_token_requires_session() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) = run_folio(&config_path, &["token", "set", "ghp_denied"]);
    assert!(!success, "Storing a credential without a session should fail");
    assert!(stderr.contains("not logged in"));
}

// ============ Backend selection ============

#[test]
fn test_github_backend_needs_remote_config() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) =
        run_folio(&config_path, &["append", "projects", "--backend", "github"]);
    assert!(!success, "Unconfigured [remote] should fail");
    assert!(
        stderr.contains("owner and repo"),
        "Should name the missing keys, got: {}",
        stderr
    );
}

#[test]
fn test_unknown_backend_errors() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) = run_folio(&config_path, &["show", "--backend", "dropbox"]);
    assert!(!success);
    assert!(stderr.contains("unknown backend"));
}

#[test]
fn test_show_reports_unreachable_service() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    // Nothing is listening on the configured port.
    let (_, stderr, success) = run_folio(&config_path, &["show"]);
    assert!(!success, "show against a dead service should fail");
    assert!(
        stderr.contains("folio serve"),
        "Should tell the operator how to start the service, got: {}",
        stderr
    );
}

// ============ Admin service ============

#[test]
fn test_server_data_roundtrip() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let doc = get_document(port);
    assert_eq!(doc["personalInfo"]["fullName"], "Your Name");
    assert_eq!(doc["navLinks"].as_array().unwrap().len(), 3);

    // Whole-document overwrite.
    let mut edited = doc.clone();
    edited["personalInfo"]["fullName"] = serde_json::json!("Edited Name");
    let client = reqwest::blocking::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/data", port))
        .json(&edited)
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["message"], "Data updated successfully");

    let doc = get_document(port);
    assert_eq!(doc["personalInfo"]["fullName"], "Edited Name");

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_server_writes_pretty_json() {
    let (tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let doc = get_document(port);
    let client = reqwest::blocking::Client::new();
    client
        .post(format!("http://127.0.0.1:{}/api/data", port))
        .json(&doc)
        .send()
        .unwrap();

    let on_disk = fs::read_to_string(tmp.path().join("content/portfolio.json")).unwrap();
    assert!(
        on_disk.starts_with("{\n"),
        "Data file should be pretty-printed"
    );
    assert!(on_disk.contains("\n  \"personalInfo\""));

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_server_missing_data_file_is_500() {
    let (tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    fs::remove_file(tmp.path().join("content/portfolio.json")).unwrap();

    let resp = reqwest::blocking::get(format!("http://127.0.0.1:{}/api/data", port)).unwrap();
    assert_eq!(resp.status(), 500);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["error"], "Failed to read data file");

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_server_upload_and_static_serve() {
    let (tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let bytes: &[u8] = b"\x89PNG\r\n\x1a\nfake image bytes";
    let part = reqwest::blocking::multipart::Part::bytes(bytes.to_vec())
        .file_name("logo.png")
        .mime_str("image/png")
        .unwrap();
    let form = reqwest::blocking::multipart::Form::new().part("image", part);

    let client = reqwest::blocking::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/upload", port))
        .multipart(form)
        .send()
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().unwrap();
    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"), "got url: {}", url);
    assert!(url.ends_with("-logo.png"), "got url: {}", url);

    // The stored file is served back at that URL.
    let served = reqwest::blocking::get(format!("http://127.0.0.1:{}{}", port, url)).unwrap();
    assert_eq!(served.status(), 200);
    assert_eq!(served.bytes().unwrap().as_ref(), bytes);

    // And it landed in the uploads directory on disk.
    let name = url.trim_start_matches("/uploads/");
    assert!(tmp.path().join("uploads").join(name).exists());

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_server_upload_without_image_field_is_400() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let form = reqwest::blocking::multipart::Form::new().text("other", "value");
    let client = reqwest::blocking::Client::new();
    let resp = client
        .post(format!("http://127.0.0.1:{}/api/upload", port))
        .multipart(form)
        .send()
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().unwrap();
    assert_eq!(body["error"], "No file uploaded");

    server.kill().ok();
    server.wait().ok();
}

// ============ Editing through the local store ============

#[test]
fn test_cli_edits_roundtrip_through_service() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let before = get_document(port)["projects"].as_array().unwrap().len();

    // Append a default project entry.
    let (stdout, stderr, success) = run_folio(&config_path, &["append", "projects"]);
    assert!(success, "append failed: {}", stderr);
    assert!(stdout.contains("Data updated successfully"));

    let doc = get_document(port);
    let projects = doc["projects"].as_array().unwrap();
    assert_eq!(projects.len(), before + 1);
    assert_eq!(projects[before]["name"], "New Project");

    // Edit fields by path, on an entry and on the profile.
    let (_, stderr, success) = run_folio(
        &config_path,
        &["set", "projects[0].name", "Weather Dashboard"],
    );
    assert!(success, "set failed: {}", stderr);
    let (_, stderr, success) = run_folio(&config_path, &["set", "personal.name", "Atelier"]);
    assert!(success, "set personal failed: {}", stderr);

    let doc = get_document(port);
    assert_eq!(doc["projects"][0]["name"], "Weather Dashboard");
    assert_eq!(doc["personalInfo"]["name"], "Atelier");

    // Remove the appended entry; counts return to where they started.
    let index = before.to_string();
    let (_, stderr, success) = run_folio(&config_path, &["remove", "projects", &index]);
    assert!(success, "remove failed: {}", stderr);
    let doc = get_document(port);
    assert_eq!(doc["projects"].as_array().unwrap().len(), before);

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_cli_edits_nested_lists() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let before = get_document(port)["experiences"][0]["points"]
        .as_array()
        .unwrap()
        .len();

    let (_, stderr, success) = run_folio(&config_path, &["append", "experiences[0].points"]);
    assert!(success, "append points failed: {}", stderr);

    let doc = get_document(port);
    let points = doc["experiences"][0]["points"].as_array().unwrap();
    assert_eq!(points.len(), before + 1);
    assert_eq!(points[before], "Add log entry...");

    let (_, stderr, success) = run_folio(
        &config_path,
        &["set", "experiences[0].points[0]", "Rebuilt the deploy pipeline"],
    );
    assert!(success, "set point failed: {}", stderr);
    let doc = get_document(port);
    assert_eq!(doc["experiences"][0]["points"][0], "Rebuilt the deploy pipeline");

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_cli_rejects_out_of_range_remove() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let len = get_document(port)["socials"].as_array().unwrap().len();
    let out_of_range = len.to_string();

    let (_, stderr, success) = run_folio(&config_path, &["remove", "socials", &out_of_range]);
    assert!(!success, "Out-of-range remove should fail");
    assert!(
        stderr.contains("out of range"),
        "Should name the range problem, got: {}",
        stderr
    );

    // Nothing was saved.
    assert_eq!(get_document(port)["socials"].as_array().unwrap().len(), len);

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_cli_upload_through_service() {
    let (tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    let image = tmp.path().join("team photo.png");
    fs::write(&image, b"pretend image").unwrap();

    let (stdout, stderr, success) =
        run_folio(&config_path, &["upload", image.to_str().unwrap()]);
    assert!(success, "upload failed: {}", stderr);
    assert!(
        stdout.contains("/uploads/"),
        "Should print the uploaded URL, got: {}",
        stdout
    );

    server.kill().ok();
    server.wait().ok();
}

// ============ Rendering ============

#[test]
fn test_show_renders_sections_and_icons() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);
    run_folio(&config_path, &["login", "admin123"]);

    let mut server = start_server(&config_path);
    wait_for_server(port);

    // Point one icon at a catalog glyph so both resolution paths render.
    let (_, stderr, success) =
        run_folio(&config_path, &["set", "technologies[0].icon", "Zap"]);
    assert!(success, "set icon failed: {}", stderr);

    let (stdout, stderr, success) = run_folio(&config_path, &["show"]);
    assert!(success, "show failed: {}", stderr);
    assert!(stdout.contains("Your Name"));
    assert!(stdout.contains("technologies (3):"));
    // Bundled asset names resolve to asset paths, catalog names to glyphs.
    assert!(stdout.contains("/assets/tech/javascript.png"));
    assert!(stdout.contains("glyph:Zap"));

    let (stdout, _, success) = run_folio(&config_path, &["show", "projects"]);
    assert!(success);
    assert!(stdout.contains("First Project"));
    assert!(
        !stdout.contains("technologies ("),
        "Single-section show should not render other sections"
    );

    server.kill().ok();
    server.wait().ok();
}

#[test]
fn test_icon_reference_classification() {
    let (_tmp, config_path, port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    // Normalized catalog lookup.
    let (stdout, _, success) = run_folio(&config_path, &["icon", "circle-help"]);
    assert!(success);
    assert!(stdout.contains("glyph"));
    assert!(stdout.contains("CircleHelp"));

    // Asset-table keys resolve to bundled paths.
    let (stdout, _, _) = run_folio(&config_path, &["icon", "html"]);
    assert!(stdout.contains("image"));
    assert!(stdout.contains("/assets/tech/html.png"));

    // Uploads are rewritten onto the configured service origin.
    let (stdout, _, _) = run_folio(&config_path, &["icon", "/uploads/42-pic.png"]);
    assert!(stdout.contains(&format!("http://127.0.0.1:{}/uploads/42-pic.png", port)));

    // A miss is a fallback, never a failure.
    let (stdout, _, success) = run_folio(&config_path, &["icon", "no-such-thing-xyz"]);
    assert!(success);
    assert!(stdout.contains("fallback"));
}

#[test]
fn test_show_unknown_section_errors() {
    let (_tmp, config_path, _port) = setup_test_env();
    run_folio(&config_path, &["init"]);

    let (_, stderr, success) = run_folio(&config_path, &["show", "gallery"]);
    assert!(!success);
    assert!(
        stderr.contains("unknown section"),
        "Should report the section, got: {}",
        stderr
    );
}
