//! Content type and cache lifetime derivation for uploaded files.
//!
//! Entry files are the documents a browser fetches by a fixed URL on every
//! visit, so a new build has to reach clients quickly. Everything else in a
//! build directory is addressed through `build/<buildNumber>/` and can be
//! cached for a day.

use serde::Serialize;
use std::path::Path;

/// Content type used when the extension is unknown (or missing)
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Cache lifetime applied to an uploaded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CachePolicy {
    /// `max-age=60`
    Short,
    /// `max-age=86400`
    Long,
}

impl CachePolicy {
    pub fn max_age_secs(&self) -> u32 {
        match self {
            Self::Short => 60,
            Self::Long => 86_400,
        }
    }

    /// Value of the `Cache-Control` header
    pub fn header_value(&self) -> String {
        format!("max-age={}", self.max_age_secs())
    }
}

/// Literal file names that get [`CachePolicy::Short`]; matched exactly.
pub const ENTRY_FILES: [(&str, CachePolicy); 2] = [
    ("index.html", CachePolicy::Short),
    ("config.js", CachePolicy::Short),
];

/// Extensions whose content type differs from the `mime_guess` table
static CONTENT_TYPE_OVERRIDES: [(&str, &str); 1] = [("map", "application/json")];

/// Result of classifying one file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub content_type: String,
    pub cache_policy: CachePolicy,
}

impl Classification {
    pub fn cache_control(&self) -> String {
        self.cache_policy.header_value()
    }
}

/// Derive content type and cache policy from a bare file name.
pub fn classify(file_name: &str) -> Classification {
    Classification {
        content_type: content_type_for(file_name).to_string(),
        cache_policy: cache_policy_for(file_name),
    }
}

pub fn content_type_for(file_name: &str) -> &'static str {
    if let Some(ext) = Path::new(file_name).extension().and_then(|e| e.to_str()) {
        for (known, content_type) in CONTENT_TYPE_OVERRIDES {
            if known.eq_ignore_ascii_case(ext) {
                return content_type;
            }
        }
    }

    mime_guess::from_path(file_name)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
}

pub fn cache_policy_for(file_name: &str) -> CachePolicy {
    ENTRY_FILES
        .iter()
        .find(|(name, _)| *name == file_name)
        .map(|(_, policy)| *policy)
        .unwrap_or(CachePolicy::Long)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_table_is_exactly_index_and_config() {
        let names: Vec<&str> = ENTRY_FILES.iter().map(|(name, _)| *name).collect();
        assert_eq!(names, ["index.html", "config.js"]);
        assert!(ENTRY_FILES.iter().all(|(_, p)| *p == CachePolicy::Short));
    }

    #[test]
    fn entry_files_get_short_cache() {
        assert_eq!(classify("index.html").cache_control(), "max-age=60");
        assert_eq!(classify("config.js").cache_control(), "max-age=60");
    }

    #[test]
    fn everything_else_gets_long_cache() {
        for name in ["main.js", "style.css", "Index.html", "config.json", "index.htm", "app-config.js"] {
            assert_eq!(classify(name).cache_policy, CachePolicy::Long, "{}", name);
            assert_eq!(classify(name).cache_control(), "max-age=86400");
        }
    }

    #[test]
    fn known_extensions_use_mime_table() {
        assert_eq!(content_type_for("index.html"), "text/html");
        assert_eq!(content_type_for("style.css"), "text/css");
        assert_eq!(content_type_for("logo.png"), "image/png");
        assert_eq!(content_type_for("icon.svg"), "image/svg+xml");
        assert_eq!(content_type_for("manifest.json"), "application/json");
    }

    #[test]
    fn source_maps_are_json() {
        assert_eq!(content_type_for("main.js.map"), "application/json");
        assert_eq!(content_type_for("style.css.MAP"), "application/json");
        assert_eq!(classify("main.js.map").cache_policy, CachePolicy::Long);
    }

    #[test]
    fn unknown_extension_falls_back_to_html() {
        assert_eq!(content_type_for("file.unknownext"), "text/html");
        assert_eq!(content_type_for("LICENSE"), "text/html");
    }
}
