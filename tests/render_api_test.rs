//! End-to-end rendering through the public API.

use serde_json::json;
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use vellum::syntax::TagRule;
use vellum::{Template, TemplateOptions, TemplateRegistry, VellumError};

fn write_views(dir: &Path, views: &[(&str, &str)]) {
    for (name, body) in views {
        let path = dir.join(format!("{}.tpl", name));
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, body).unwrap();
    }
}

fn options(temp: &TempDir) -> TemplateOptions {
    TemplateOptions::new(temp.path().join("views"))
        .with_suffix("tpl")
        .with_delimiters("{", "}")
        .with_compiler(true)
        .with_debug(true)
        .with_compiled_directory(temp.path().join("compiled"))
}

fn template(views: &[(&str, &str)]) -> (TempDir, Template) {
    let temp = TempDir::new().unwrap();
    write_views(&temp.path().join("views"), views);
    let template = Template::new(options(&temp)).unwrap();
    (temp, template)
}

#[test]
fn hello_scenario() {
    let (_temp, mut template) = template(&[("hello", "Hello {name|World}!")]);

    template.assign("name", "Ada");
    assert_eq!(template.render("hello").unwrap(), "Hello Ada!");

    template.clear_bindings();
    assert_eq!(template.render("hello").unwrap(), "Hello World!");
}

#[test]
fn default_fallback_then_binding() {
    let (_temp, mut template) = template(&[("greet", "{name|Guest}")]);
    assert_eq!(template.render("greet").unwrap(), "Guest");

    template.assign("name", "Ada");
    assert_eq!(template.render("greet").unwrap(), "Ada");
}

#[test]
fn unbound_variable_without_default_is_empty() {
    let (_temp, mut template) = template(&[("page", "[{missing}][{user.name}]")]);
    assert_eq!(template.render("page").unwrap(), "[][]");
}

#[test]
fn layout_yield_round_trip() {
    let (_temp, mut template) = template(&[
        ("layouts/main", "<html><title>{title}</title><body>{yield}</body></html>"),
        ("posts/show", "<h1>{post.title}</h1>"),
    ]);

    template
        .assign("title", "Blog")
        .assign("post", json!({"title": "First"}))
        .layout("layouts/main");

    assert_eq!(
        template.render("posts/show").unwrap(),
        "<html><title>Blog</title><body><h1>First</h1></body></html>"
    );
}

#[test]
fn loop_forms() {
    let (_temp, mut template) = template(&[
        ("totaled", "{loop items v |i,t|}{i}/{t}={v};{/loop}"),
        ("counted", "{loop items v |i|}{i}:{v} {/loop}"),
        ("plain", "{loop items v}<{v}>{/loop}"),
        ("keyed", "{loop user k v}{k}={v} {/loop}"),
    ]);
    template
        .assign("items", json!(["a", "b", "c"]))
        .assign("user", json!({"name": "Ada", "born": 1815}));

    assert_eq!(template.render("totaled").unwrap(), "0/3=a;1/3=b;2/3=c;");
    assert_eq!(template.render("counted").unwrap(), "0:a 1:b 2:c ");
    assert_eq!(template.render("plain").unwrap(), "<a><b><c>");
    assert_eq!(template.render("keyed").unwrap(), "name=Ada born=1815 ");
}

#[test]
fn keyed_loop_follows_struct_field_order() {
    #[derive(serde::Serialize)]
    struct Row {
        zeta: u32,
        alpha: u32,
    }

    let (_temp, mut template) = template(&[("row", "{loop row k v}{k}={v} {/loop}")]);
    let row = serde_json::to_value(Row { zeta: 1, alpha: 2 }).unwrap();
    template.assign("row", row);

    assert_eq!(template.render("row").unwrap(), "zeta=1 alpha=2 ");
}

#[test]
fn assigned_struct_fields_keep_declaration_order() {
    #[derive(serde::Serialize)]
    struct Page {
        title: &'static str,
        author: &'static str,
    }

    let (_temp, mut template) = template(&[("meta", "{= page}")]);
    template.assign("page", serde_json::to_value(Page { title: "Notes", author: "Ada" }).unwrap());

    assert_eq!(
        template.render("meta").unwrap(),
        r#"{"title":"Notes","author":"Ada"}"#
    );
}

#[test]
fn loop_over_missing_or_scalar() {
    let (_temp, mut template) = template(&[("list", "{loop things t}[{t}]{/loop}")]);
    assert_eq!(template.render("list").unwrap(), "");

    template.assign("things", "solo");
    assert_eq!(template.render("list").unwrap(), "[solo]");
}

#[test]
fn conditionals_and_expressions() {
    let (_temp, mut template) = template(&[(
        "cart",
        "{if count(items) == 0}empty{elseif count(items) > 2}many{else}{= count(items)} items{/if}",
    )]);

    template.assign("items", json!([]));
    assert_eq!(template.render("cart").unwrap(), "empty");

    template.assign("items", json!([1, 2]));
    assert_eq!(template.render("cart").unwrap(), "2 items");

    template.assign("items", json!([1, 2, 3]));
    assert_eq!(template.render("cart").unwrap(), "many");
}

#[test]
fn emit_expression_forms() {
    let (_temp, mut template) = template(&[(
        "calc",
        "{= price * qty}|{= upper(name) ~ '!'}|{= not defined(nothing)}",
    )]);
    template
        .assign("price", 2.5)
        .assign("qty", 4)
        .assign("name", "ada");

    assert_eq!(template.render("calc").unwrap(), "10|ADA!|1");
}

#[test]
fn division_by_zero_is_render_error() {
    let (_temp, mut template) = template(&[("bad", "{= 1 / zero}")]);
    template.assign("zero", 0);
    assert!(matches!(
        template.render("bad").unwrap_err(),
        VellumError::Render { .. }
    ));
}

#[test]
fn inert_spans_pass_through() {
    let (_temp, mut template) = template(&[(
        "style",
        "<style>p { color: red }</style><script>if (a) { b(); }</script>",
    )]);
    assert_eq!(
        template.render("style").unwrap(),
        "<style>p { color: red }</style><script>if (a) { b(); }</script>"
    );
}

#[test]
fn nested_template_include() {
    let (_temp, mut template) = template(&[
        ("page", "{template partials/nav}<main>{body}</main>"),
        ("partials/nav", "<nav>{loop links l}<a>{l}</a>{/loop}</nav>"),
    ]);
    template
        .assign("links", json!(["home", "about"]))
        .assign("body", "text");

    assert_eq!(
        template.render("page").unwrap(),
        "<nav><a>home</a><a>about</a></nav><main>text</main>"
    );
}

#[test]
fn custom_delimiters() {
    let temp = TempDir::new().unwrap();
    write_views(&temp.path().join("views"), &[("page", "{literal} <%name%>")]);
    let mut template = Template::new(options(&temp).with_delimiters("<%", "%>")).unwrap();
    template.assign("name", "Ada");

    assert_eq!(template.render("page").unwrap(), "{literal} Ada");
}

#[test]
fn compiler_disabled_renders_source_verbatim() {
    let temp = TempDir::new().unwrap();
    write_views(&temp.path().join("views"), &[("raw", "Hello {name|World}!")]);
    let mut template = Template::new(options(&temp).with_compiler(false)).unwrap();
    template.assign("name", "Ada");

    assert_eq!(template.render("raw").unwrap(), "Hello {name|World}!");
    assert!(!temp.path().join("compiled").exists());
}

#[test]
fn missing_view_names_path() {
    let (_temp, mut template) = template(&[]);
    let err = template.render("nowhere").unwrap_err();
    assert!(matches!(err, VellumError::MissingSource { .. }));
    assert!(err.to_string().contains("nowhere.tpl"));
}

#[test]
fn missing_layout_is_fatal() {
    let (_temp, mut template) = template(&[("page", "x")]);
    template.layout("layouts/none");
    assert!(matches!(
        template.render("page").unwrap_err(),
        VellumError::MissingSource { .. }
    ));
}

#[test]
fn unbalanced_view_is_syntax_error() {
    let (_temp, mut template) = template(&[("broken", "{if a}open")]);
    match template.render("broken").unwrap_err() {
        VellumError::Syntax { path, message } => {
            assert!(path.ends_with("broken.tpl"));
            assert!(message.contains("if"));
        }
        other => panic!("expected syntax error, got {:?}", other),
    }
}

#[test]
fn alias_rules_defined_by_owner() {
    let (_temp, mut template) = template(&[("list", "{each rows as r}{r}{/each}")]);
    template.define_first(TagRule::rewrite("each", r"^each (\S+) as (\S+)$", "loop $1 $2").unwrap());
    template.define_first(TagRule::rewrite("end_each", r"^/each$", "/loop").unwrap());
    template.assign("rows", json!([1, 2]));

    assert_eq!(template.render("list").unwrap(), "12");
}

#[test]
fn registry_shares_instances_by_options() {
    let temp = TempDir::new().unwrap();
    write_views(&temp.path().join("views"), &[("hello", "Hello {name|World}!")]);

    let mut registry = TemplateRegistry::new();
    let id = {
        let template = registry.get_or_create(options(&temp)).unwrap();
        template.assign("name", "Ada");
        template.id().to_string()
    };

    let same = registry.get_or_create(options(&temp)).unwrap();
    assert_eq!(same.id(), id);
    assert_eq!(same.render("hello").unwrap(), "Hello Ada!");

    assert!(matches!(
        registry.get_mut("not-an-id"),
        Err(VellumError::UnknownInstance { .. })
    ));
}

#[test]
fn instances_with_different_options_do_not_share_artifacts() {
    let temp = TempDir::new().unwrap();
    write_views(&temp.path().join("views"), &[("page", "{a}<%a%>")]);

    let mut braces = Template::new(options(&temp)).unwrap();
    let mut angles = Template::new(options(&temp).with_delimiters("<%", "%>")).unwrap();
    braces.assign("a", 1);
    angles.assign("a", 2);

    assert_ne!(braces.id(), angles.id());
    assert_eq!(braces.render("page").unwrap(), "1<%a%>");
    assert_eq!(angles.render("page").unwrap(), "{a}2");
    assert_eq!(fs::read_dir(temp.path().join("compiled")).unwrap().count(), 2);
}
