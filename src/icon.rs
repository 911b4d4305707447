//! Icon and image reference resolution.
//!
//! Portfolio content stores icons as free-form strings: absolute URLs,
//! site-relative paths, data URIs, bundled asset keys, or glyph names from
//! the icon library. [`IconResolver::resolve`] classifies a reference and
//! maps it to something renderable. Resolution is total — an unrecognized
//! reference degrades to a fixed fallback glyph, never an error.

use crate::catalog::{lookup_asset, lookup_icon, FALLBACK_ICON};

/// Prefix of files stored by the local admin service's upload endpoint.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// What an icon reference resolved to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolved {
    /// A direct image source: URL, site-relative path, or data URI.
    Image(String),
    /// A canonical glyph identifier from the icon catalog.
    Icon(&'static str),
    /// Nothing matched; render the [`FALLBACK_ICON`] glyph.
    Fallback,
}

impl Resolved {
    /// The glyph to draw for non-image results.
    pub fn glyph(&self) -> Option<&'static str> {
        match self {
            Resolved::Image(_) => None,
            Resolved::Icon(name) => Some(name),
            Resolved::Fallback => Some(FALLBACK_ICON),
        }
    }
}

/// Resolves icon references for one rendering context.
///
/// Constructed by the composition root: with the admin service origin when
/// content is being previewed against a locally running service (so
/// `/uploads/...` paths become absolute URLs on that origin), or without
/// one when rendering the published document as-is.
#[derive(Debug, Clone)]
pub struct IconResolver {
    local_origin: Option<String>,
}

impl IconResolver {
    pub fn new(local_origin: Option<String>) -> Self {
        Self { local_origin }
    }

    /// Classify and resolve a single reference.
    ///
    /// Rules, in order:
    ///
    /// 1. Empty references render the site logo asset.
    /// 2. References starting with `http`, `/`, or `data:` are direct image
    ///    sources. In a local context, `/uploads/` paths are rewritten onto
    ///    the admin service origin.
    /// 3. Exact asset-table keys resolve to their bundled asset path.
    /// 4. Anything else is treated as a glyph name and looked up loosely in
    ///    the icon catalog.
    /// 5. Unresolved references fall back to [`FALLBACK_ICON`]. Outside
    ///    release builds a diagnostic is printed for plain names, since a
    ///    miss there is usually a typo in the content.
    pub fn resolve(&self, reference: &str) -> Resolved {
        if reference.is_empty() {
            if let Some(path) = lookup_asset("logo") {
                return Resolved::Image(path.to_string());
            }
            return Resolved::Fallback;
        }

        if reference.starts_with("http")
            || reference.starts_with('/')
            || reference.starts_with("data:")
        {
            return Resolved::Image(self.rewrite_local(reference));
        }

        if let Some(path) = lookup_asset(reference) {
            return Resolved::Image(path.to_string());
        }

        if let Some(name) = lookup_icon(reference) {
            return Resolved::Icon(name);
        }

        if cfg!(debug_assertions) && !reference.contains('/') {
            eprintln!(
                "warning: icon reference '{}' matched nothing; rendering {}",
                reference, FALLBACK_ICON
            );
        }
        Resolved::Fallback
    }

    /// Rewrite an uploads path onto the local service origin, when one is
    /// configured. All other paths pass through untouched.
    fn rewrite_local(&self, path: &str) -> String {
        match &self.local_origin {
            Some(origin) if path.starts_with(UPLOADS_PREFIX) => format!("{}{}", origin, path),
            _ => path.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn local() -> IconResolver {
        IconResolver::new(Some("http://127.0.0.1:5000".to_string()))
    }

    fn published() -> IconResolver {
        IconResolver::new(None)
    }

    #[test]
    fn test_url_prefixes_are_images() {
        let r = published();
        for reference in [
            "http://example.com/pic.png",
            "https://example.com/pic.png",
            "/assets/tech/html.png",
            "data:image/png;base64,iVBOR",
        ] {
            match r.resolve(reference) {
                Resolved::Image(url) => assert_eq!(url, reference),
                other => panic!("{} classified as {:?}", reference, other),
            }
        }
    }

    #[test]
    fn test_uploads_rewritten_on_local_origin() {
        assert_eq!(
            local().resolve("/uploads/173-pic.png"),
            Resolved::Image("http://127.0.0.1:5000/uploads/173-pic.png".to_string())
        );
        // Published rendering leaves the path server-relative.
        assert_eq!(
            published().resolve("/uploads/173-pic.png"),
            Resolved::Image("/uploads/173-pic.png".to_string())
        );
        // Non-upload paths never gain an origin.
        assert_eq!(
            local().resolve("/assets/logo.svg"),
            Resolved::Image("/assets/logo.svg".to_string())
        );
    }

    #[test]
    fn test_asset_keys_win_over_catalog() {
        // "github" is both an asset key and (capitalized) a glyph name;
        // the asset table is consulted first.
        assert_eq!(
            published().resolve("github"),
            Resolved::Image("/assets/github.png".to_string())
        );
        assert_eq!(published().resolve("Github"), Resolved::Icon("Github"));
    }

    #[test]
    fn test_glyph_names_resolve() {
        let r = published();
        assert_eq!(r.resolve("Zap"), Resolved::Icon("Zap"));
        assert_eq!(r.resolve("circle-help"), Resolved::Icon("CircleHelp"));
        assert_eq!(r.resolve("SettingsIcon"), Resolved::Icon("Settings"));
    }

    #[test]
    fn test_unknown_falls_back() {
        let r = published();
        assert_eq!(r.resolve("no-such-glyph-xyz"), Resolved::Fallback);
        assert_eq!(r.resolve("no-such-glyph-xyz").glyph(), Some(FALLBACK_ICON));
    }

    #[test]
    fn test_empty_renders_logo() {
        assert_eq!(
            published().resolve(""),
            Resolved::Image("/assets/logo.svg".to_string())
        );
    }
}
