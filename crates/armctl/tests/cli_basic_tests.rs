use std::fs;
use std::path::Path;

use assert_cmd::Command;
use assert_cmd::assert::OutputAssertExt;
use predicates::prelude::*;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Helper to create a test command that never sees the caller's environment
fn armctl() -> Command {
    let mut cmd = Command::cargo_bin("armctl").unwrap();
    cmd.env_remove("ARMCTL_PROFILE")
        .env_remove("ARMCTL_CONFIG_FILE")
        .env_remove("ARMCTL_SUBSCRIPTION_ID")
        .env_remove("ARMCTL_ACCESS_TOKEN")
        .env_remove("ARMCTL_MANAGEMENT_URL")
        .env_remove("RUST_LOG");
    cmd
}

fn write_config(dir: &TempDir, management_url: &str) -> String {
    let path = dir.path().join("config.toml");
    fs::write(
        &path,
        format!(
            r#"default_profile = "test"

[profiles.test]
subscription_id = "sub-1"
management_url = "{}"
access_token = "test-token"
"#,
            management_url
        ),
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

fn write_gateway(dir: &TempDir) -> String {
    let path = dir.path().join("gateway.json");
    fs::write(
        &path,
        json!({
            "name": "gw1",
            "id": "/subscriptions/sub-1/resourceGroups/rg/providers/Microsoft.Network/applicationGateways/gw1",
            "location": "westeurope",
            "redirectConfigurations": [{
                "name": "existing",
                "etag": "W/\"1\"",
                "redirectType": "Found",
                "targetUrl": "https://old.example.com"
            }]
        })
        .to_string(),
    )
    .unwrap();
    path.to_string_lossy().to_string()
}

fn read_json(path: &str) -> Value {
    serde_json::from_str(&fs::read_to_string(Path::new(path)).unwrap()).unwrap()
}

#[test]
fn test_help_flag() {
    armctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("resource-manager operations"))
        .stdout(predicate::str::contains("EXAMPLES:"));
}

#[test]
fn test_version_flag() {
    armctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("armctl"))
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_version_command_json() {
    armctl()
        .args(["-o", "json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"name\": \"armctl\""));
}

#[test]
fn test_no_args_shows_help() {
    armctl()
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_invalid_subcommand() {
    armctl()
        .arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_invalid_output_format() {
    armctl()
        .args(["-o", "xml", "version"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_sql_export_help_lists_storage_options() {
    armctl()
        .args(["sql", "export", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("--storage-uri"))
        .stdout(predicate::str::contains("--storage-key-type"))
        .stdout(predicate::str::contains("--wait"));
}

#[test]
fn test_wait_timeout_requires_wait() {
    armctl()
        .args(["sql", "status", "https://example.com/op/1", "--wait-timeout", "10"])
        .assert()
        .failure()
        .code(2)
        .stderr(predicate::str::contains("--wait"));
}

#[test]
fn test_node_type_add_requires_instances() {
    armctl()
        .args(["cluster", "node-type", "add", "-g", "rg", "--cluster", "sf1", "--name", "nt2"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--instances"));
}

#[test]
fn test_completions_bash() {
    armctl()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("armctl"));
}

#[test]
fn test_profile_set_list_show() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("config.toml");
    let config = config.to_str().unwrap();

    armctl()
        .args(["--config-file", config, "profile", "set", "prod"])
        .args(["--subscription-id", "00000000-0000-0000-0000-000000000001"])
        .args(["--access-token", "env:PROD_TOKEN"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Profile 'prod' saved"));

    armctl()
        .args(["--config-file", config, "-o", "json", "profile", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"count\": 1"))
        .stdout(predicate::str::contains("00000000-0000-0000-0000-000000000001"));

    armctl()
        .args(["--config-file", config, "profile", "show", "prod"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Access token: environment"))
        .stdout(predicate::str::contains("PROD_TOKEN").not());
}

#[test]
fn test_profile_default_and_remove() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "https://management.azure.com");

    armctl()
        .args(["--config-file", &config, "profile", "remove", "test", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Default profile cleared"));

    armctl()
        .args(["--config-file", &config, "profile", "default", "test"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Profile 'test' not found"));
}

#[test]
fn test_missing_profile_reports_tip() {
    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, "https://management.azure.com");

    armctl()
        .args(["--config-file", &config, "-p", "nope", "peer-asn", "get"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Profile 'nope' not found"))
        .stderr(predicate::str::contains("armctl profile list"));
}

#[test]
fn test_no_profile_configured() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("empty.toml");

    armctl()
        .args(["--config-file", config.to_str().unwrap(), "peer-asn", "get"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No profile configured"));
}

#[test]
fn test_gateway_redirect_add_in_place() {
    let dir = TempDir::new().unwrap();
    let gateway = write_gateway(&dir);

    armctl()
        .args(["gateway", "redirect-config", "add", "--gateway-file", &gateway])
        .args(["--name", "to-https", "--target-url", "https://example.com"])
        .args(["--include-path", "--in-place"])
        .assert()
        .success();

    let written = read_json(&gateway);
    let configs = written["redirectConfigurations"].as_array().unwrap();
    assert_eq!(configs.len(), 2);
    assert_eq!(configs[1]["name"], "to-https");
    assert_eq!(configs[1]["includePath"], true);
    assert_eq!(configs[0]["etag"], "W/\"1\"");
    assert_eq!(written["location"], "westeurope");
}

#[test]
fn test_gateway_redirect_add_duplicate_fails() {
    let dir = TempDir::new().unwrap();
    let gateway = write_gateway(&dir);

    armctl()
        .args(["gateway", "redirect-config", "add", "--gateway-file", &gateway])
        .args(["--name", "EXISTING", "--target-url", "https://example.com"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("EXISTING"));

    assert_eq!(
        read_json(&gateway)["redirectConfigurations"]
            .as_array()
            .unwrap()
            .len(),
        1
    );
}

#[test]
fn test_gateway_redirect_add_rejects_two_targets() {
    let dir = TempDir::new().unwrap();
    let gateway = write_gateway(&dir);

    armctl()
        .args(["gateway", "redirect-config", "add", "--gateway-file", &gateway])
        .args(["--name", "x", "--target-url", "https://example.com"])
        .args(["--target-listener-id", "/listeners/l1"])
        .assert()
        .failure()
        .code(2);
}

#[test]
fn test_gateway_redirect_remove_missing_is_noop() {
    let dir = TempDir::new().unwrap();
    let gateway = write_gateway(&dir);

    armctl()
        .args(["gateway", "redirect-config", "remove", "--gateway-file", &gateway])
        .args(["--name", "not-there"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"existing\""));
}

#[test]
fn test_gateway_redirect_list_table() {
    let dir = TempDir::new().unwrap();
    let gateway = write_gateway(&dir);

    armctl()
        .args(["-o", "table", "gateway", "redirect-config", "list"])
        .args(["--gateway-file", &gateway])
        .assert()
        .success()
        .stdout(predicate::str::contains("existing"))
        .stdout(predicate::str::contains("redirectType"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_peer_asn_get_against_mock_service() {
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(
            "/subscriptions/sub-1/providers/Microsoft.Peering/peerAsns/contoso",
        ))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "name": "contoso",
            "properties": {"peerAsn": 65000, "peerName": "Contoso", "validationState": "Approved"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    let output = tokio::task::spawn_blocking(move || {
        armctl()
            .args(["--config-file", &config, "peer-asn", "get", "--name", "contoso"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .success()
        .stdout(predicate::str::contains("\"peerAsn\": 65000"))
        .stdout(predicate::str::contains("Approved"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_service_error_is_normalized() {
    use wiremock::matchers::method;
    use wiremock::{Mock, MockServer, ResponseTemplate};

    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "error": {"code": "ResourceNotFound", "message": "cluster sf1 was not found"}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let config = write_config(&dir, &server.uri());

    let output = tokio::task::spawn_blocking(move || {
        armctl()
            .args(["--config-file", &config, "cluster", "get", "-g", "rg", "--cluster", "sf1"])
            .output()
            .unwrap()
    })
    .await
    .unwrap();

    output
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "Code: ResourceNotFound, Message: cluster sf1 was not found",
        ));
}
