use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use ga_core::{FileContent, FileReadError, FileReader, ReadOutcome, SkipReason};

const IGNORED_FILES: &[&str] = &["package-lock.json", "yarn.lock", "pnpm-lock.yaml", "uv.lock"];

const IGNORED_EXTENSIONS: &[&str] = &[
    "lock", "svg", "png", "jpg", "jpeg", "gif", "ico", "pdf", "zip", "tar", "gz",
];

const LANGUAGE_MAP: &[(&str, &str)] = &[
    ("py", "python"),
    ("js", "javascript"),
    ("ts", "typescript"),
    ("jsx", "react"),
    ("tsx", "react-typescript"),
    ("kt", "kotlin"),
    ("kts", "kotlin-script"),
    ("dart", "dart"),
    ("java", "java"),
    ("rs", "rust"),
    ("toml", "toml"),
    ("json", "json"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
    ("md", "markdown"),
    ("html", "html"),
    ("css", "css"),
    ("sh", "bash"),
    ("bash", "bash"),
];

/// Lower-case language id for a path, `"unknown"` when the extension is not mapped.
pub fn detect_language(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    LANGUAGE_MAP
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| *lang)
        .unwrap_or("unknown")
}

/// Lockfiles and binary assets are never sent to a reviewer.
pub fn is_ignored(path: &Path) -> bool {
    let name_ignored = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| IGNORED_FILES.contains(&n));
    let ext_ignored = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IGNORED_EXTENSIONS.contains(&e));
    name_ignored || ext_ignored
}

// "react-typescript" -> "React-Typescript"
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for ch in s.chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                out.extend(ch.to_uppercase());
            } else {
                out.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(ch);
            at_word_start = true;
        }
    }
    out
}

/// Reads changed files relative to the repository root.
pub struct FsFileReader {
    root: PathBuf,
}

impl FsFileReader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }
}

#[async_trait]
impl FileReader for FsFileReader {
    async fn read(&self, path: &Path, max_lines: Option<usize>) -> Result<ReadOutcome, FileReadError> {
        if is_ignored(path) {
            debug!("Skipping ignored file: {}", path.display());
            return Ok(ReadOutcome::Skipped(SkipReason::Ignored));
        }

        let full_path = self.root.join(path);
        let raw = match tokio::fs::read_to_string(&full_path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(FileReadError::NotFound(path.to_path_buf()));
            }
            Err(source) => {
                return Err(FileReadError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        let mut lines: Vec<String> = raw.lines().map(str::to_string).collect();
        if lines.is_empty() {
            return Ok(ReadOutcome::Skipped(SkipReason::Empty));
        }

        if let Some(max) = max_lines.filter(|&m| m > 0 && m < lines.len()) {
            let skipped = lines.len() - max;
            lines.truncate(max);
            lines.push(format!("{skipped} skipped lines"));
        }

        let content = FileContent::new(title_case(detect_language(path)), lines.join("\n"));
        debug!(
            "Read file. {} lines read, language: {}",
            content.line_count(),
            content.language()
        );
        Ok(ReadOutcome::Read(content))
    }
}
