//! End-to-end tests of the host protocol against file-backed state

use std::path::Path;

use dynamic_icon::{render_status, Host};
use dynicon_app::config::init_config_dir;
use dynicon_registry::{FilePreferences, FileRegistry, Manifest};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Project with a sample manifest and a pinned device identity
fn project(brand: &str) -> TempDir {
    let temp = TempDir::new().unwrap();
    init_config_dir(temp.path(), "com.example.app").unwrap();
    std::fs::write(
        temp.path().join(".dynicon").join("config.toml"),
        format!(
            r#"
[host]
attach_on_start = true

[device]
brand = "{brand}"
manufacturer = "{brand}"
model = "Model-1"
"#
        ),
    )
    .unwrap();
    temp
}

async fn session(project: &Path, lines: &[Value]) -> Vec<Value> {
    let mut host = Host::open(project).unwrap();
    let input: String = lines.iter().map(|l| format!("{}\n", l)).collect();
    let mut output = Vec::new();

    host.serve(input.as_bytes(), &mut output).await.unwrap();

    String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

fn status(project: &Path) -> String {
    let state_dir = project.join(".dynicon").join("state");
    let manifest = Manifest::load(&project.join("manifest.toml")).unwrap();
    let registry = FileRegistry::open(manifest, &state_dir).unwrap();
    render_status(&registry, &FilePreferences::new(&state_dir))
}

fn active_line(status: &str) -> &str {
    status.lines().find(|l| l.starts_with('*')).unwrap()
}

#[tokio::test]
async fn test_switch_persists_across_sessions() {
    let temp = project("google");

    let replies = session(
        temp.path(),
        &[
            json!({"id": 1, "method": "supportsAlternateIcons"}),
            json!({"id": 2, "method": "setAlternateIconName", "arguments": {"iconName": "IconRed"}}),
        ],
    )
    .await;
    assert_eq!(replies[0], json!({"id": 1, "result": true}));
    assert_eq!(replies[1], json!({"id": 2, "result": true}));

    let replies = session(
        temp.path(),
        &[json!({"id": 1, "method": "getAlternateIconName"})],
    )
    .await;
    assert_eq!(
        replies[0],
        json!({"id": 1, "result": "com.example.app.IconRed"})
    );

    let status = status(temp.path());
    assert!(active_line(&status).contains("com.example.app.IconRed"));
    assert!(status.contains("Pending: (none)"));
}

#[tokio::test]
async fn test_blacklisted_switch_waits_for_app_closing() {
    let temp = project("Xiaomi");

    let replies = session(
        temp.path(),
        &[
            json!({"id": 1, "method": "setAlternateIconName",
                   "arguments": {"iconName": "IconBlue", "manufactures": "xiaomi, huawei"}}),
            json!({"id": 2, "method": "getAlternateIconName"}),
            json!({"event": "appClosing"}),
            json!({"id": 3, "method": "getAlternateIconName"}),
        ],
    )
    .await;

    assert_eq!(replies[0], json!({"id": 1, "result": true}));
    assert_eq!(replies[1], json!({"id": 2, "result": null}));
    assert_eq!(replies[2]["event"], "appClosing");
    assert_eq!(replies[2]["outcome"], "applied");
    assert_eq!(replies[2]["failed"], json!([]));
    assert_eq!(
        replies[3],
        json!({"id": 3, "result": "com.example.app.IconBlue"})
    );
}

#[tokio::test]
async fn test_pending_selection_survives_until_input_closes() {
    let temp = project("Xiaomi");

    session(
        temp.path(),
        &[json!({"id": 1, "method": "setAlternateIconName",
                 "arguments": {"iconName": "IconRed", "brands": "XIAOMI"}})],
    )
    .await;

    // Closing stdin runs the queued switch
    let status = status(temp.path());
    assert!(active_line(&status).contains("com.example.app.IconRed"));
    assert!(status.contains("Pending: (none)"));
}

#[tokio::test]
async fn test_null_icon_name_restores_main() {
    let temp = project("google");

    let replies = session(
        temp.path(),
        &[
            json!({"id": 1, "method": "setAlternateIconName", "arguments": {"iconName": "IconRed"}}),
            json!({"id": 2, "method": "setAlternateIconName", "arguments": {"iconName": null}}),
            json!({"id": 3, "method": "getAlternateIconName"}),
        ],
    )
    .await;

    assert_eq!(replies[1], json!({"id": 2, "result": true}));
    assert_eq!(replies[2], json!({"id": 3, "result": null}));
    assert!(active_line(&status(temp.path())).contains("MainActivity"));
}

#[tokio::test]
async fn test_detached_host_and_malformed_input() {
    let temp = project("google");

    let replies = session(
        temp.path(),
        &[
            json!({"event": "activityDetached"}),
            json!({"id": 1, "method": "setAlternateIconName", "arguments": {"iconName": "IconRed"}}),
            json!({"id": 2, "method": "supportsAlternateIcons"}),
            json!("not a message"),
            json!({"event": "activityAttached"}),
            json!({"id": 3, "method": "setAlternateIconName", "arguments": {"iconName": "IconRed"}}),
        ],
    )
    .await;

    assert_eq!(replies[0], json!({"event": "activityDetached", "attached": false}));
    assert_eq!(
        replies[1],
        json!({"id": 1, "error": {
            "code": "500",
            "message": "Activity not found",
            "details": "Activity didn't attached"
        }})
    );
    assert_eq!(replies[2], json!({"id": 2, "result": false}));
    assert_eq!(replies[3]["error"]["code"], "400");
    assert_eq!(replies[4], json!({"event": "activityAttached", "attached": true}));
    assert_eq!(replies[5], json!({"id": 3, "result": true}));
}

#[test]
fn test_open_without_manifest_fails() {
    let temp = TempDir::new().unwrap();
    assert!(Host::open(temp.path()).is_err());
}
