//! Client settings and the `ordina.conf` loader.
//!
//! Settings control the ambient behavior of the subsystem: where the
//! catalog service lives, how long to wait out its eventual consistency
//! after a swap, and whether corrupted partitions are repaired
//! automatically. The file format is plain `key = value` lines with `#` or
//! `//` comments; unknown keys and malformed values are ignored so an old
//! config never blocks startup.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Runtime settings for the catalog client.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Root URL of the catalog service.
    pub base_url: String,
    /// Per-request timeout in milliseconds.
    pub request_timeout_ms: u64,
    /// Delay between issuing a swap's writes and re-reading the partition,
    /// bridging the service's eventual consistency.
    pub settle_delay_ms: u64,
    /// Reindex a partition automatically when a swap's refetch shows
    /// duplicate `order` values.
    pub auto_repair: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            request_timeout_ms: 10_000,
            settle_delay_ms: 350,
            auto_repair: true,
        }
    }
}

/// Drop everything after an inline `//` or `#` comment marker.
fn strip_inline_comment(mut s: &str) -> &str {
    if let Some(i) = s.find("//") {
        s = &s[..i];
    }
    if let Some(i) = s.find('#') {
        s = &s[..i];
    }
    s.trim()
}

/// Parse a truthy config value: `true`, `1`, `yes`, and `on` all count.
fn parse_bool(val: &str) -> bool {
    let lv = val.to_ascii_lowercase();
    lv == "true" || lv == "1" || lv == "yes" || lv == "on"
}

impl Settings {
    /// Load settings from a specific config file, starting from defaults.
    ///
    /// Lines that fail to parse are skipped; a missing or unreadable file
    /// yields plain defaults.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        let mut out = Self::default();
        let Ok(content) = fs::read_to_string(path) else {
            return out;
        };
        for line in content.lines() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with("//") {
                continue;
            }
            let Some((raw_key, val_raw)) = trimmed.split_once('=') else {
                continue;
            };
            let key = raw_key.trim().to_lowercase().replace(['.', '-', ' '], "_");
            let val = strip_inline_comment(val_raw.trim());
            match key.as_str() {
                "base_url" | "catalog_url" => {
                    if !val.is_empty() {
                        out.base_url = val.to_string();
                    }
                }
                "request_timeout_ms" => {
                    if let Ok(v) = val.parse::<u64>() {
                        out.request_timeout_ms = v;
                    }
                }
                "settle_delay_ms" | "refetch_delay_ms" => {
                    if let Ok(v) = val.parse::<u64>() {
                        out.settle_delay_ms = v;
                    }
                }
                "auto_repair" => {
                    out.auto_repair = parse_bool(val);
                }
                _ => {}
            }
        }
        out
    }
}

/// Resolve the config file path: `ORDINA_CONFIG` wins, then
/// `$XDG_CONFIG_HOME/ordina/ordina.conf`, then `~/.config/ordina/ordina.conf`.
fn config_path() -> Option<PathBuf> {
    if let Ok(p) = env::var("ORDINA_CONFIG") {
        return Some(PathBuf::from(p));
    }
    env::var("XDG_CONFIG_HOME")
        .ok()
        .map(PathBuf::from)
        .or_else(|| env::var("HOME").ok().map(|h| Path::new(&h).join(".config")))
        .map(|base| base.join("ordina").join("ordina.conf"))
}

/// Load user settings from the conventional config location.
///
/// Applies the `ORDINA_BASE_URL` environment override last so deployments
/// can repoint a shared config without editing it.
#[must_use]
pub fn settings() -> Settings {
    let mut out = config_path().map_or_else(Settings::default, |p| Settings::from_path(&p));
    if let Ok(url) = env::var("ORDINA_BASE_URL")
        && !url.is_empty()
    {
        out.base_url = url;
    }
    out
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::{Settings, parse_bool, strip_inline_comment};

    #[test]
    fn defaults_are_sane() {
        let s = Settings::default();
        assert_eq!(s.settle_delay_ms, 350);
        assert!(s.auto_repair);
    }

    #[test]
    fn strip_inline_comment_variants() {
        assert_eq!(strip_inline_comment("abc // hi"), "abc");
        assert_eq!(strip_inline_comment("abc # tail"), "abc");
        assert_eq!(strip_inline_comment("  abc  "), "abc");
    }

    #[test]
    fn truthy_values() {
        assert!(parse_bool("true"));
        assert!(parse_bool("YES"));
        assert!(parse_bool("1"));
        assert!(!parse_bool("off"));
    }

    #[test]
    fn from_path_overrides_and_ignores_junk() {
        let mut f = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(
            f,
            "# catalog client\nbase_url = https://admin.example.test // prod\nsettle-delay-ms = 0\nauto_repair = off\nnot a kv line\nrequest_timeout_ms = oops"
        )
        .expect("write config");
        let s = Settings::from_path(f.path());
        assert_eq!(s.base_url, "https://admin.example.test");
        assert_eq!(s.settle_delay_ms, 0);
        assert!(!s.auto_repair);
        // Malformed value falls back to the default
        assert_eq!(s.request_timeout_ms, 10_000);
    }

    #[test]
    fn missing_file_yields_defaults() {
        let s = Settings::from_path(std::path::Path::new("/nonexistent/ordina.conf"));
        assert_eq!(s, Settings::default());
    }
}
