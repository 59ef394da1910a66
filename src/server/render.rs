// src/server/render.rs
//! App-shell rendering
//!
//! Renders the HTML page a worker returns for any route the static file
//! handler does not claim. Script and stylesheet URLs come from the
//! bundler's asset manifest; without a manifest the shell is served bare,
//! which keeps freshly scaffolded projects working before their first
//! build.

use crate::utils::errors::Result;
use serde::Deserialize;
use std::path::Path;
use tracing::warn;

/// Asset manifest written by the bundler
///
/// Matches the shape `{"main": {"js": "/main.abc123.js", "css": "..."}}`.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AssetManifest {
    pub main: EntryAssets,
}

/// Assets of one bundle entry point
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EntryAssets {
    pub js: Option<String>,
    pub css: Option<String>,
}

impl AssetManifest {
    /// Load the manifest, tolerating its absence
    ///
    /// A missing file is expected before the first build; a present but
    /// unparsable file is reported and treated the same way.
    pub fn load(path: &Path) -> Option<Self> {
        let raw = std::fs::read_to_string(path).ok()?;
        match serde_json::from_str(&raw) {
            Ok(manifest) => Some(manifest),
            Err(e) => {
                warn!("ignoring malformed asset manifest {}: {}", path.display(), e);
                None
            }
        }
    }
}

/// Render the HTML app shell around pre-rendered markup
pub fn render_page(root: &str, assets: Option<&AssetManifest>) -> Result<String> {
    let css_tag = assets
        .and_then(|a| a.main.css.as_deref())
        .map(|href| format!("<link rel=\"stylesheet\" href=\"{}\">", href))
        .unwrap_or_default();
    let js_tag = assets
        .and_then(|a| a.main.js.as_deref())
        .map(|src| format!("<script src=\"{}\"></script>", src))
        .unwrap_or_default();

    Ok(format!(
        "<!DOCTYPE html>\n\
         <html>\n\
         <head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         {css}\n\
         </head>\n\
         <body>\n\
         <div id=\"root\">{root}</div>\n\
         {js}\n\
         </body>\n\
         </html>\n",
        css = css_tag,
        root = root,
        js = js_tag,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_render_with_assets() {
        let manifest = AssetManifest {
            main: EntryAssets {
                js: Some("/main.abc123.js".to_string()),
                css: Some("/main.abc123.css".to_string()),
            },
        };

        let html = render_page("<p>hello</p>", Some(&manifest)).unwrap();
        assert!(html.contains("<div id=\"root\"><p>hello</p></div>"));
        assert!(html.contains("src=\"/main.abc123.js\""));
        assert!(html.contains("href=\"/main.abc123.css\""));
    }

    #[test]
    fn test_render_without_manifest() {
        let html = render_page("", None).unwrap();
        assert!(html.contains("<div id=\"root\"></div>"));
        assert!(!html.contains("<script"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_render_with_js_only() {
        let manifest = AssetManifest {
            main: EntryAssets {
                js: Some("/main.js".to_string()),
                css: None,
            },
        };

        let html = render_page("", Some(&manifest)).unwrap();
        assert!(html.contains("<script src=\"/main.js\"></script>"));
        assert!(!html.contains("<link"));
    }

    #[test]
    fn test_manifest_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("publicAssets.json");
        std::fs::write(&path, r#"{"main": {"js": "/m.js", "css": "/m.css"}}"#).unwrap();

        let manifest = AssetManifest::load(&path).unwrap();
        assert_eq!(manifest.main.js.as_deref(), Some("/m.js"));
        assert_eq!(manifest.main.css.as_deref(), Some("/m.css"));
    }

    #[test]
    fn test_manifest_load_missing_file() {
        assert!(AssetManifest::load(Path::new("/nonexistent/assets.json")).is_none());
    }

    #[test]
    fn test_manifest_load_malformed_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("publicAssets.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(AssetManifest::load(&path).is_none());
    }
}
