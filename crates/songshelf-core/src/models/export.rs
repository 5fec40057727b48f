use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

/// Numbered names tried before giving up on saving an export
const MAX_NAME_ATTEMPTS: usize = 1000;

/// A text export downloaded from the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl ExportedFile {
    /// Build from a response, naming the file after its `Content-Disposition`
    /// header or `fallback_name`.
    pub fn new(disposition: Option<&str>, fallback_name: &str, contents: Vec<u8>) -> Self {
        let file_name = disposition
            .and_then(file_name_from_disposition)
            .map(|name| sanitize_file_name(&name))
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        Self {
            file_name,
            contents,
        }
    }

    /// Write the export into `dir`, creating it if needed.
    ///
    /// Existing files are never overwritten: `name.txt` becomes `name-1.txt`,
    /// `name-2.txt` and so on.
    pub fn save_into(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create download directory {}", dir.display()))?;

        for attempt in 0..MAX_NAME_ATTEMPTS {
            let path = dir.join(numbered_name(&self.file_name, attempt));
            let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
                Ok(file) => file,
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => continue,
                Err(e) => {
                    return Err(e).with_context(|| format!("Failed to create {}", path.display()))
                }
            };
            file.write_all(&self.contents)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!(path = %path.display(), bytes = self.contents.len(), "Export saved");
            return Ok(path);
        }
        anyhow::bail!(
            "No free file name for {} in {}",
            self.file_name,
            dir.display()
        )
    }
}

/// `name` for the first attempt, then `stem-N.ext`.
fn numbered_name(name: &str, attempt: usize) -> String {
    if attempt == 0 {
        return name.to_string();
    }
    let path = Path::new(name);
    match (
        path.file_stem().and_then(|s| s.to_str()),
        path.extension().and_then(|e| e.to_str()),
    ) {
        (Some(stem), Some(ext)) => format!("{}-{}.{}", stem, attempt, ext),
        _ => format!("{}-{}", name, attempt),
    }
}

/// Extract the file name from a `Content-Disposition` value.
///
/// The RFC 5987 `filename*=` form wins over plain `filename=`.
/// An extended value that does not decode falls back to the plain one.
pub fn file_name_from_disposition(value: &str) -> Option<String> {
    let mut plain = None;
    let mut extended = None;
    for param in value.split(';').map(str::trim) {
        let Some((key, raw)) = param.split_once('=') else {
            continue;
        };
        match key.trim().to_ascii_lowercase().as_str() {
            "filename*" => {
                // charset'language'percent-encoded
                extended = raw
                    .trim()
                    .splitn(3, '\'')
                    .nth(2)
                    .and_then(percent_decode);
            }
            "filename" => {
                plain = Some(raw.trim().trim_matches('"').to_string());
            }
            _ => {}
        }
    }
    extended
        .filter(|name| !name.is_empty())
        .or(plain)
        .filter(|name| !name.is_empty())
}

fn percent_decode(input: &str) -> Option<String> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let hex = std::str::from_utf8(&bytes[i + 1..i + 3]).ok()?;
            out.push(u8::from_str_radix(hex, 16).ok()?);
            i += 3;
        } else {
            out.push(bytes[i]);
            i += 1;
        }
    }
    String::from_utf8(out).ok()
}

/// Keep only the final path component and drop characters that are unsafe
/// in file names.
fn sanitize_file_name(name: &str) -> String {
    let last = name.rsplit(['/', '\\']).next().unwrap_or(name);
    last.chars()
        .filter(|c| !c.is_control() && !matches!(c, ':' | '*' | '?' | '"' | '<' | '>' | '|'))
        .collect::<String>()
        .trim_matches('.')
        .trim()
        .to_string()
}
