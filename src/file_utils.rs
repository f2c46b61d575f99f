use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

// @module: File and directory utilities

// @const: Files translated as-is copies even when their extension matches
static BLACKLIST_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"META-INF[\\/].*\.txt$").unwrap());

// @enum: Supported document formats, detected by extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Html,
    Opf,
    Ncx,
    Txt,
    Unsupported,
}

impl DocumentFormat {
    // @detects: Format from the file extension (case-insensitive)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Self {
        let ext = path
            .as_ref()
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "html" | "xhtml" => DocumentFormat::Html,
            "opf" => DocumentFormat::Opf,
            "ncx" => DocumentFormat::Ncx,
            "txt" => DocumentFormat::Txt,
            _ => DocumentFormat::Unsupported,
        }
    }
}

// @struct: File operations utility
pub struct FileManager;

impl FileManager {
    // @checks: File existence
    pub fn file_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_file()
    }

    // @checks: Directory existence
    pub fn dir_exists<P: AsRef<Path>>(path: P) -> bool {
        path.as_ref().exists() && path.as_ref().is_dir()
    }

    // @creates: Directory and parents if needed
    pub fn ensure_dir<P: AsRef<Path>>(path: P) -> Result<()> {
        let path = path.as_ref();
        if !path.exists() {
            fs::create_dir_all(path)
                .with_context(|| format!("Failed to create directory: {}", path.display()))?;
        }
        Ok(())
    }

    // @checks: Whether the relative path is excluded from translation
    pub fn is_blacklisted<P: AsRef<Path>>(relative_path: P) -> bool {
        BLACKLIST_REGEX.is_match(&relative_path.as_ref().to_string_lossy())
    }

    // @lists: All files under the input directory, as paths relative to it
    pub fn enumerate_files<P: AsRef<Path>>(input_dir: P) -> Result<Vec<PathBuf>> {
        let input_dir = input_dir.as_ref();
        if !Self::dir_exists(input_dir) {
            return Err(anyhow::anyhow!(
                "Input directory not found: {}",
                input_dir.display()
            ));
        }

        let mut files = Vec::new();
        for entry in WalkDir::new(input_dir).follow_links(true) {
            let entry = entry
                .with_context(|| format!("Failed to walk directory: {}", input_dir.display()))?;
            if entry.file_type().is_file() {
                let relative = entry
                    .path()
                    .strip_prefix(input_dir)
                    .with_context(|| format!("Path outside input root: {}", entry.path().display()))?;
                files.push(relative.to_path_buf());
            }
        }
        files.sort();
        Ok(files)
    }

    // @reads: Entire file to a string
    pub fn read_to_string<P: AsRef<Path>>(path: P) -> Result<String> {
        let path = path.as_ref();
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))
    }

    // @writes: String content, creating parent directories first
    pub fn write_to_file<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::write(path, content)
            .with_context(|| format!("Failed to write file: {}", path.display()))
    }

    // @copies: File unchanged, creating parent directories first
    pub fn copy_file<P1: AsRef<Path>, P2: AsRef<Path>>(from: P1, to: P2) -> Result<()> {
        let from = from.as_ref();
        let to = to.as_ref();
        if let Some(parent) = to.parent() {
            Self::ensure_dir(parent)?;
        }
        fs::copy(from, to).with_context(|| {
            format!("Failed to copy {} to {}", from.display(), to.display())
        })?;
        Ok(())
    }
}
