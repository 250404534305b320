// Cache and config path utilities.
// Maps cache keys onto file names inside the platform cache directory.

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use sha2::{Digest, Sha256};

/// Longest escaped key used verbatim as a file stem.
const MAX_STEM_LEN: usize = 180;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("", "", "github-forge")
}

/// Get the base cache directory (~/.cache/github-forge on Linux).
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Directory holding one file per cached response.
pub fn responses_dir() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("responses"))
}

/// Path to the TOML config file (~/.config/github-forge/config.toml on Linux).
pub fn config_path() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
}

/// File holding the entry for `key` inside `dir`.
///
/// Short keys are escaped and used as-is, so distinct keys map to distinct
/// files. Long keys are truncated and suffixed with a hash of the full key;
/// the store checks the key recorded inside the file on read.
pub fn entry_path(dir: &Path, key: &str) -> PathBuf {
    let escaped = escape_name(key);
    let stem = if escaped.len() <= MAX_STEM_LEN {
        escaped
    } else {
        let mut cut = MAX_STEM_LEN;
        while !escaped.is_char_boundary(cut) {
            cut -= 1;
        }
        format!("{}-{}", &escaped[..cut], key_digest(key))
    };
    dir.join(format!("{}.json", stem))
}

/// Escape characters that are unsafe in file names, plus the escape character itself.
fn escape_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '%' | '.' => {
                out.push_str(&format!("%{:02X}", c as u32));
            }
            c if c.is_control() => out.push_str(&format!("%{:02X}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// First 16 hex characters of the key's SHA-256.
fn key_digest(key: &str) -> String {
    Sha256::digest(key.as_bytes())
        .iter()
        .take(8)
        .map(|b| format!("{:02x}", b))
        .collect()
}
