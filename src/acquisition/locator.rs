//! Locates the monitored bundle in the hosting page.
//!
//! Walks `<script src>` tags looking for a filename matching the
//! monitored stem and extension, e.g. `main.93f1c29a.js` (the infix is
//! a build hash and varies). Absence of a match is the pipeline's fatal
//! condition: nothing meaningful can proceed without the bundle.

use crate::profile;
use scraper::{Html, Selector};

/// A located bundle reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRef {
    /// Absolute URL to fetch the bundle from.
    pub url: String,
    /// Filename as served, e.g. `main.93f1c29a.js`.
    pub original_filename: String,
}

/// Find the monitored bundle's `<script src>` reference in page HTML.
///
/// Relative `src` values are resolved against `base_url`. Returns the
/// first matching script in document order.
pub fn locate_bundle(html: &str, base_url: &str) -> Option<AssetRef> {
    let document = Html::parse_document(html);
    let selector = Selector::parse("script[src]").expect("valid selector");

    for element in document.select(&selector) {
        let src = element.value().attr("src")?;
        let filename = src.rsplit('/').next().unwrap_or(src);
        let filename = filename.split('?').next().unwrap_or(filename);

        if !filename.starts_with(profile::ASSET_STEM) || !filename.ends_with(profile::ASSET_EXT) {
            continue;
        }

        let url = resolve(src, base_url)?;
        return Some(AssetRef {
            url,
            original_filename: filename.to_string(),
        });
    }

    None
}

fn resolve(src: &str, base_url: &str) -> Option<String> {
    if src.starts_with("http://") || src.starts_with("https://") {
        return Some(src.to_string());
    }
    let base = url::Url::parse(base_url).ok()?;
    base.join(src).ok().map(|u| u.to_string())
}
