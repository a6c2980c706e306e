use pretty_assertions::assert_eq;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const ITEMS: &str = r#"
[[items]]
id = "epitaph"
base_text = ["que bixit", "annos XX"]

[[items.layers]]
type_id = "comment"
fragments = [{ location = "1.2", text = "lived" }]

[[items]]
id = "broken"
base_text = ["que bixit"]

[[items.layers]]
type_id = "comment"
fragments = [{ location = "4.1" }]

[[items]]
id = "last"
base_text = ["annos"]
"#;

const CONFIG: &str = r#"
text_head = "<TEI>"
text_tail = "</TEI>"

[layer_renderers.comment]
kind = "tei-standoff"
"#;

fn run(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_standoff-export"))
        .args(args)
        .current_dir(dir)
        .env("RUST_LOG", "off")
        .output()
        .unwrap()
}

fn setup() -> TempDir {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("items.toml"), ITEMS).unwrap();
    std::fs::write(dir.path().join("config.toml"), CONFIG).unwrap();
    dir
}

#[test]
fn renders_good_items_and_fails_on_bad_ones() {
    let dir = setup();
    let output = run(
        dir.path(),
        &["render", "items.toml", "--config", "config.toml", "--output", "out"],
    );
    assert!(!output.status.success());

    let base = std::fs::read_to_string(dir.path().join("out/base-text.xml")).unwrap();
    let lines: Vec<_> = base.lines().collect();
    assert_eq!(
        lines,
        vec![
            "<TEI>",
            r#"<div xml:id="r1_1">que <seg xml:id="t1_1_2">bixit</seg></div><div xml:id="r1_2">annos XX</div>"#,
            r#"<div xml:id="r3_1">annos</div>"#,
            "</TEI>",
        ]
    );

    let comment = std::fs::read_to_string(dir.path().join("out/comment.xml")).unwrap();
    assert!(comment.contains(r##"<note xml:id="f1_1_1" target="#t1_1_2">lived</note>"##));
}

#[test]
fn stdout_mode_prints_flows() {
    let dir = setup();
    std::fs::write(
        dir.path().join("good.toml"),
        "[[items]]\nid = \"only\"\nbase_text = [\"a b\"]\n",
    )
    .unwrap();
    let output = run(
        dir.path(),
        &["render", "good.toml", "--config", "config.toml", "--stdout"],
    );
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(
        stdout,
        "<!-- only base-text -->\n<div xml:id=\"r1_1\">a b</div>\n"
    );
    assert!(!dir.path().join("out").exists());
}

#[test]
fn missing_explicit_config_is_an_error() {
    let dir = setup();
    let output = run(
        dir.path(),
        &["render", "items.toml", "--config", "nope.toml", "--stdout"],
    );
    assert!(!output.status.success());
}

#[test]
fn init_config_refuses_to_overwrite() {
    let dir = setup();
    let output = run(dir.path(), &["init-config", "--config", "config.toml"]);
    assert!(!output.status.success());

    let output = run(dir.path(), &["init-config", "--config", "fresh/config.toml"]);
    assert!(output.status.success());
    let written = std::fs::read_to_string(dir.path().join("fresh/config.toml")).unwrap();
    assert!(written.contains("layer_order = \"by-key\""));
}
