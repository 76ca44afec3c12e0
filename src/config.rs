//! Site configuration module.
//!
//! Handles loading, validating, and merging `config.toml`. Stock defaults
//! describe the Developer Notes blog; a `config.toml` in the site root
//! overrides any subset of them.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [site]
//! title = "Developer Notes"
//! title_alt = "Developer notes on day-to-day task"
//! headline = "Developer notes on day-to-day task including snippets and small lifehacks"
//! url = "https://bdryanovski.github.io"
//! description = "Developer notes on may day-to-day tasks, snippets and reusable code."
//! language = "en"
//! image = "/banner.jpg"
//! author = "@bdryanovski"
//!
//! [paths]
//! posts = "content/posts"
//! pages = "content/pages"
//!
//! [[navigation]]
//! title = "Posts"
//! slug = "/posts"
//!
//! [[external_links]]
//! name = "Github"
//! url = "https://www.github.com/bdryanovski"
//!
//! [code]
//! show_line_numbers = true
//! theme = "base16-ocean.dark"
//! copy_duration_ms = 5000
//! trim_copied_text = false
//!
//! [manifest]
//! name = "Dev notes"
//! short_name = "devnotes"
//! theme_color = "#6B46C1"
//! ```
//!
//! ## Partial Configuration
//!
//! Config files are sparse. Tables merge key by key; arrays such as
//! `navigation` replace the stock list entirely:
//!
//! ```toml
//! [code]
//! show_line_numbers = false
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site metadata used in `<head>` and the site header.
    pub site: SiteMetadata,
    /// Content directories scanned by `check`.
    pub paths: PathsConfig,
    /// Internal navigation links, in display order.
    pub navigation: Vec<NavLink>,
    /// Links to profiles elsewhere, opened in a new tab.
    pub external_links: Vec<ExternalLink>,
    /// Code block rendering and copy button settings.
    pub code: CodeConfig,
    /// Web app manifest options.
    pub manifest: ManifestConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            site: SiteMetadata::default(),
            paths: PathsConfig::default(),
            navigation: default_navigation(),
            external_links: default_external_links(),
            code: CodeConfig::default(),
            manifest: ManifestConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.site.title.trim().is_empty() {
            return Err(ConfigError::Validation("site.title must not be empty".into()));
        }
        if self.code.copy_duration_ms == 0 {
            return Err(ConfigError::Validation(
                "code.copy_duration_ms must be greater than 0".into(),
            ));
        }
        if self.code.theme.trim().is_empty() {
            return Err(ConfigError::Validation("code.theme must not be empty".into()));
        }
        for link in &self.navigation {
            if !link.slug.starts_with('/') {
                return Err(ConfigError::Validation(format!(
                    "navigation slug '{}' must start with '/'",
                    link.slug
                )));
            }
        }
        for link in &self.external_links {
            if !(link.url.starts_with("http://") || link.url.starts_with("https://")) {
                return Err(ConfigError::Validation(format!(
                    "external link '{}' must be an http(s) URL",
                    link.name
                )));
            }
        }
        Ok(())
    }
}

/// Site metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteMetadata {
    pub title: String,
    /// Alternative title, published as the Open Graph site name.
    pub title_alt: String,
    pub headline: String,
    /// Canonical site URL. Links outside it are treated as external.
    pub url: String,
    pub description: String,
    pub language: String,
    /// Social sharing image, relative to the site root.
    pub image: String,
    pub author: String,
}

impl Default for SiteMetadata {
    fn default() -> Self {
        Self {
            title: "Developer Notes".to_string(),
            title_alt: "Developer notes on day-to-day task".to_string(),
            headline: "Developer notes on day-to-day task including snippets and small lifehacks"
                .to_string(),
            url: "https://bdryanovski.github.io".to_string(),
            description: "Developer notes on may day-to-day tasks, snippets and reusable code."
                .to_string(),
            language: "en".to_string(),
            image: "/banner.jpg".to_string(),
            author: "@bdryanovski".to_string(),
        }
    }
}

/// Content directories, relative to the site root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub posts: String,
    pub pages: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            posts: "content/posts".to_string(),
            pages: "content/pages".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavLink {
    pub title: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExternalLink {
    pub name: String,
    pub url: String,
}

/// Stock navigation: posts index and about page.
pub fn default_navigation() -> Vec<NavLink> {
    vec![
        NavLink {
            title: "Posts".to_string(),
            slug: "/posts".to_string(),
        },
        NavLink {
            title: "About".to_string(),
            slug: "/about".to_string(),
        },
    ]
}

/// Stock external links.
pub fn default_external_links() -> Vec<ExternalLink> {
    vec![
        ExternalLink {
            name: "Twitter".to_string(),
            url: "https://twitter.com/dryanovski".to_string(),
        },
        ExternalLink {
            name: "Github".to_string(),
            url: "https://www.github.com/bdryanovski".to_string(),
        },
    ]
}

/// Code block rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodeConfig {
    /// Show the line-number gutter unless a block opts out.
    pub show_line_numbers: bool,
    /// Name of a theme in syntect's bundled theme set.
    pub theme: String,
    /// How long a copy button shows "Copied" before resetting.
    pub copy_duration_ms: u64,
    /// Trim surrounding whitespace from code before copying.
    pub trim_copied_text: bool,
}

impl CodeConfig {
    pub fn copy_duration(&self) -> Duration {
        Duration::from_millis(self.copy_duration_ms)
    }
}

impl Default for CodeConfig {
    fn default() -> Self {
        Self {
            show_line_numbers: true,
            theme: "base16-ocean.dark".to_string(),
            copy_duration_ms: 5000,
            trim_copied_text: false,
        }
    }
}

/// Web app manifest options (`manifest.webmanifest`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ManifestConfig {
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub start_url: String,
    pub background_color: String,
    pub theme_color: String,
    pub display: String,
    pub icons: Vec<ManifestIcon>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ManifestIcon {
    pub src: String,
    pub sizes: String,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Default for ManifestConfig {
    fn default() -> Self {
        Self {
            name: "Dev notes".to_string(),
            short_name: "devnotes".to_string(),
            description:
                "DevNotes on my day-to-day tasks - including blog posts, code snippets and more."
                    .to_string(),
            start_url: "/".to_string(),
            background_color: "#fff".to_string(),
            theme_color: "#6B46C1".to_string(),
            display: "standalone".to_string(),
            icons: vec![
                ManifestIcon {
                    src: "/android-chrome-192x192.png".to_string(),
                    sizes: "192x192".to_string(),
                    mime_type: "image/png".to_string(),
                },
                ManifestIcon {
                    src: "/android-chrome-512x512.png".to_string(),
                    sizes: "512x512".to_string(),
                    mime_type: "image/png".to_string(),
                },
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
///
/// This is the base layer that user overrides are merged on top of.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay, arrays included, replace base values.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `config.toml` from a directory as a raw TOML value.
///
/// Returns `Ok(None)` if the directory has no `config.toml`.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config from `config.toml` in the given site root.
///
/// Merges user values on top of stock defaults, rejects unknown keys,
/// and validates the result.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# Developer Notes Configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults.
#
# Tables merge with the defaults key by key. Arrays of tables
# ([[navigation]], [[external_links]], [[manifest.icons]]) replace the
# default list entirely. Unknown keys will cause an error.

# ---------------------------------------------------------------------------
# Site metadata
# ---------------------------------------------------------------------------
[site]
title = "Developer Notes"
title_alt = "Developer notes on day-to-day task"
headline = "Developer notes on day-to-day task including snippets and small lifehacks"
# Links that leave this URL open in a new tab.
url = "https://bdryanovski.github.io"
description = "Developer notes on may day-to-day tasks, snippets and reusable code."
language = "en"
image = "/banner.jpg"
author = "@bdryanovski"

# ---------------------------------------------------------------------------
# Content directories (relative to the site root)
# ---------------------------------------------------------------------------
[paths]
posts = "content/posts"
pages = "content/pages"

# ---------------------------------------------------------------------------
# Navigation (in display order; slugs start with "/")
# ---------------------------------------------------------------------------
[[navigation]]
title = "Posts"
slug = "/posts"

[[navigation]]
title = "About"
slug = "/about"

# ---------------------------------------------------------------------------
# External links (shown in the header, opened in a new tab)
# ---------------------------------------------------------------------------
[[external_links]]
name = "Twitter"
url = "https://twitter.com/dryanovski"

[[external_links]]
name = "Github"
url = "https://www.github.com/bdryanovski"

# ---------------------------------------------------------------------------
# Code blocks
# ---------------------------------------------------------------------------
[code]
# Line-number gutter. Blocks opt out with the `noLineNumbers` language or
# parameter, e.g. ```js:title=app.js&noLineNumbers
show_line_numbers = true

# syntect theme used for highlighting.
theme = "base16-ocean.dark"

# How long (ms) the copy button shows "Copied" before resetting.
copy_duration_ms = 5000

# Trim surrounding whitespace from code before copying.
trim_copied_text = false

# ---------------------------------------------------------------------------
# Web app manifest
# ---------------------------------------------------------------------------
[manifest]
name = "Dev notes"
short_name = "devnotes"
description = "DevNotes on my day-to-day tasks - including blog posts, code snippets and more."
start_url = "/"
background_color = "#fff"
theme_color = "#6B46C1"
display = "standalone"

[[manifest.icons]]
src = "/android-chrome-192x192.png"
sizes = "192x192"
type = "image/png"

[[manifest.icons]]
src = "/android-chrome-512x512.png"
sizes = "512x512"
type = "image/png"
"##
}

/// Render the web app manifest as JSON.
pub fn manifest_json(manifest: &ManifestConfig) -> serde_json::Result<String> {
    serde_json::to_string_pretty(manifest)
}
