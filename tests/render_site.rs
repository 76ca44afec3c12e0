//! End-to-end rendering of a small site through the public API.
//!
//! Builds a throwaway content tree, renders it the way `devnotes render`
//! does, and inspects the written HTML.

use devnotes::check::check_site;
use devnotes::components::Components;
use devnotes::config::{SiteConfig, load_config};
use devnotes::generate::{DocumentKind, GeneratedDocument, generate_file};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const POST: &str = "\
# Copy to clipboard

Based on [the clipboard API](https://developer.mozilla.org/en-US/docs/Web/API/Clipboard).

```js:title=copy.js {2-3}
const copy = async (text) => {
  await navigator.clipboard.writeText(text)
  return true
}
```

```noLineNumbers
$ npm install
```
";

fn write(root: &Path, rel: &str, contents: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

const POST_PATH: &str = "content/posts/2021-03-04-copy-to-clipboard.md";
const PAGE_PATH: &str = "content/pages/about.md";

fn render_all(root: &Path, out: &Path, config: &SiteConfig) -> Vec<GeneratedDocument> {
    vec![
        generate_file(&root.join(POST_PATH), out, DocumentKind::Post, config).unwrap(),
        generate_file(&root.join(PAGE_PATH), out, DocumentKind::Page, config).unwrap(),
    ]
}

fn site() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write(tmp.path(), POST_PATH, POST);
    write(tmp.path(), PAGE_PATH, "# About\n\nSee [posts](/posts).\n");
    tmp
}

#[test]
fn render_writes_every_document() {
    let tmp = site();
    let out = tmp.path().join("dist");
    let config = load_config(tmp.path()).unwrap();

    let generated = render_all(tmp.path(), &out, &config);

    assert_eq!(generated.len(), 2);
    assert_eq!(generated[0].kind, DocumentKind::Post);
    assert_eq!(generated[0].date.as_deref(), Some("2021-03-04"));
    assert_eq!(generated[1].kind, DocumentKind::Page);
    assert!(out.join("copy-to-clipboard/index.html").is_file());
    assert!(out.join("about/index.html").is_file());
    assert_eq!(generated[0].code_blocks.len(), 2);
    assert_eq!(generated[0].code_blocks[0].highlighted_lines, vec![2, 3]);
}

#[test]
fn post_html_carries_code_block_views() {
    let tmp = site();
    let out = tmp.path().join("dist");
    render_all(tmp.path(), &out, &SiteConfig::default());
    let html = fs::read_to_string(out.join("copy-to-clipboard/index.html")).unwrap();

    assert!(html.contains(r#"<div class="code-title"><div>copy.js</div></div>"#));
    assert!(html.contains(r#"data-language="js""#));
    assert_eq!(html.matches("token-line highlight-line").count(), 2);
    assert!(html.contains("copy.js: copy code to clipboard"));
    // First block numbered, second opted out
    assert!(html.contains(r#"<span class="line-number-style">4</span>"#));
    assert!(html.contains(r#"data-language="noLineNumbers""#));
    assert!(html.contains(r#"target="_blank" rel="noopener noreferrer""#));
    assert!(html.contains(r#"<time datetime="2021-03-04">"#));
}

#[test]
fn internal_links_stay_in_tab() {
    let tmp = site();
    let out = tmp.path().join("dist");
    render_all(tmp.path(), &out, &SiteConfig::default());
    let html = fs::read_to_string(out.join("about/index.html")).unwrap();
    assert!(html.contains(r#"<a href="/posts">posts</a>"#));
}

#[test]
fn user_config_overrides_stock_values() {
    let tmp = site();
    write(
        tmp.path(),
        "config.toml",
        "[site]\ntitle = \"Field Notes\"\n\n[code]\nshow_line_numbers = false\n",
    );
    let config = load_config(tmp.path()).unwrap();
    assert_eq!(config.site.title, "Field Notes");
    // Untouched sections keep their stock values
    assert_eq!(config.code.copy_duration_ms, 5000);

    let out = tmp.path().join("dist");
    render_all(tmp.path(), &out, &config);
    let html = fs::read_to_string(out.join("copy-to-clipboard/index.html")).unwrap();
    assert!(html.contains("<title>Copy to clipboard | Field Notes</title>"));
    assert!(!html.contains("line-number-style\">"));
}

#[test]
fn check_reports_clean_site() {
    let tmp = site();
    let config = SiteConfig::default();
    let components = Components::new(&config).unwrap();
    let report = check_site(tmp.path(), &config, &components).unwrap();
    assert_eq!(report.documents.len(), 2);
    assert!(report.is_clean());
}
