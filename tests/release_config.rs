//! Build settings the shipped binary depends on.

const CARGO_TOML: &str = include_str!("../Cargo.toml");

/// Body of a `[section]` up to the next header.
fn section(name: &str) -> &'static str {
    let header = format!("[{}]", name);
    let start = CARGO_TOML
        .find(&header)
        .unwrap_or_else(|| panic!("Cargo.toml has no {} section", header))
        + header.len();
    let rest = &CARGO_TOML[start..];
    let end = rest.find("\n[").unwrap_or(rest.len());
    &rest[..end]
}

#[test]
fn binary_is_named_vellum() {
    assert_eq!(env!("CARGO_PKG_NAME"), "vellum");
    assert!(std::path::Path::new(env!("CARGO_BIN_EXE_vellum")).exists());
}

#[test]
fn release_profile_is_size_optimized() {
    let profile = section("profile.release");
    for setting in ["lto = true", "strip = true", "codegen-units = 1", "opt-level = \"z\""] {
        assert!(
            profile.contains(setting),
            "[profile.release] is missing `{}`",
            setting
        );
    }
}

#[test]
fn json_maps_keep_insertion_order() {
    // Keyed loops and printed objects follow binding order.
    let deps = section("dependencies");
    let serde_json = deps
        .lines()
        .find(|line| line.starts_with("serde_json"))
        .expect("serde_json dependency");
    assert!(serde_json.contains("preserve_order"));

    let value: serde_json::Value = serde_json::from_str(r#"{"b":1,"a":2}"#).unwrap();
    let keys: Vec<&str> = value.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(keys, ["b", "a"]);
}
