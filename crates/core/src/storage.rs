//! On-disk layout of uploaded tracks and their derived artifacts.
//!
//! ```text
//! <root>/tracks/<user-slug>/<hash>.<ext>        original upload
//! <root>/tracks/<user-slug>/<hash>.<ext>.json   waveform / metadata sidecar
//! <root>/tracks/<user-slug>/<hash>.<ext>.png    waveform image sidecar
//! <root>/tracks/<user-slug>/<hash>.mp3          transcode
//! ```

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use crate::error::CoreError;

/// Sub-directory of the storage root holding per-user track directories.
pub const TRACKS_DIR: &str = "tracks";

/// Extension of transcoded files.
pub const TRANSCODE_EXT: &str = "mp3";

/// MIME type of files that are served without transcoding.
pub const MIME_MP3: &str = "audio/mpeg";

// ---------------------------------------------------------------------------
// Naming
// ---------------------------------------------------------------------------

/// Stored filename for an upload: the track hash plus the original
/// (lowercased) extension, if any.
pub fn stored_filename(hash: &str, original_name: &str) -> String {
    match Path::new(original_name)
        .extension()
        .and_then(|e| e.to_str())
        .filter(|e| !e.is_empty())
    {
        Some(ext) => format!("{hash}.{}", ext.to_lowercase()),
        None => hash.to_string(),
    }
}

/// Original upload name without directory or extension.
pub fn original_stem(original_name: &str) -> String {
    Path::new(original_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_string()
}

/// Whether an upload of the given MIME type must be transcoded before it
/// can be streamed.
pub fn needs_transcode(mimetype: &str) -> bool {
    !matches!(mimetype, MIME_MP3 | "audio/mp3")
}

/// Reject anything that would escape the user directory.
fn validate_component(value: &str, what: &str) -> Result<(), CoreError> {
    if value.is_empty()
        || value == "."
        || value == ".."
        || value.contains('/')
        || value.contains('\\')
        || value.contains('\0')
    {
        return Err(CoreError::Validation(format!("Invalid {what} '{value}'")));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// MIME detection
// ---------------------------------------------------------------------------

/// Detect the MIME type of an upload.
///
/// Magic bytes win; otherwise the extension of `original_name` is consulted,
/// preferring audio then video types. Falls back to
/// `application/octet-stream`.
pub fn detect_mime(data: &[u8], original_name: &str) -> String {
    if let Some(sniffed) = sniff_audio(data) {
        return sniffed.to_string();
    }
    let guess = mime_guess::from_path(original_name);
    guess
        .iter()
        .filter(|m| m.type_() == mime::AUDIO)
        .chain(guess.iter().filter(|m| m.type_() == mime::VIDEO))
        .next()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| mime::APPLICATION_OCTET_STREAM.essence_str().to_string())
}

fn sniff_audio(data: &[u8]) -> Option<&'static str> {
    match data {
        [b'I', b'D', b'3', ..] => Some(MIME_MP3),
        [0xFF, b, ..] if *b & 0xE0 == 0xE0 => Some(MIME_MP3),
        [b'O', b'g', b'g', b'S', ..] => Some("audio/ogg"),
        [b'f', b'L', b'a', b'C', ..] => Some("audio/flac"),
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'A', b'V', b'E', ..] => Some("audio/wav"),
        [b'F', b'O', b'R', b'M', _, _, _, _, b'A', b'I', b'F', b'F', ..] => Some("audio/aiff"),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Paths
// ---------------------------------------------------------------------------

/// Kind of file derived from one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    Original,
    Json,
    Png,
    Transcode,
}

impl Artifact {
    pub fn label(self) -> &'static str {
        match self {
            Self::Original => "orig",
            Self::Json => "json",
            Self::Png => "png",
            Self::Transcode => "transcode",
        }
    }
}

/// Every path a track may occupy on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackPaths {
    pub original: PathBuf,
    pub json: PathBuf,
    pub png: PathBuf,
    pub transcode: PathBuf,
}

impl TrackPaths {
    fn new(dir: &Path, filename: &str) -> Self {
        let stem = Path::new(filename)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(filename);
        Self {
            original: dir.join(filename),
            json: dir.join(format!("{filename}.json")),
            png: dir.join(format!("{filename}.png")),
            transcode: dir.join(format!("{stem}.{TRANSCODE_EXT}")),
        }
    }

    /// Artifacts to consider for removal; the transcode only when one was made.
    pub fn artifacts(&self, transcoded: bool) -> Vec<(Artifact, &Path)> {
        let mut out = vec![
            (Artifact::Original, self.original.as_path()),
            (Artifact::Json, self.json.as_path()),
            (Artifact::Png, self.png.as_path()),
        ];
        if transcoded {
            out.push((Artifact::Transcode, self.transcode.as_path()));
        }
        out
    }

    /// File names (not paths) of every artifact, used to match directory
    /// listings against stored tracks.
    pub fn file_names(&self) -> Vec<String> {
        self.artifacts(true)
            .into_iter()
            .filter_map(|(_, p)| p.file_name().and_then(|n| n.to_str()).map(String::from))
            .collect()
    }
}

/// Outcome of a best-effort cleanup.
#[derive(Debug, Default, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RemovalReport {
    pub removed: Vec<PathBuf>,
    /// Paths that did not exist.
    pub missing: Vec<PathBuf>,
    /// Paths that could not be removed, with the error message.
    pub failed: Vec<(PathBuf, String)>,
}

impl RemovalReport {
    pub fn is_clean(&self) -> bool {
        self.failed.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Storage
// ---------------------------------------------------------------------------

/// Filesystem store rooted at the configured storage path.
#[derive(Debug, Clone)]
pub struct TrackStorage {
    root: PathBuf,
}

impl TrackStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory holding all files of one user.
    pub fn user_dir(&self, user_slug: &str) -> Result<PathBuf, CoreError> {
        validate_component(user_slug, "user slug")?;
        Ok(self.root.join(TRACKS_DIR).join(user_slug))
    }

    pub fn track_paths(&self, user_slug: &str, filename: &str) -> Result<TrackPaths, CoreError> {
        validate_component(filename, "filename")?;
        Ok(TrackPaths::new(&self.user_dir(user_slug)?, filename))
    }

    /// Write an uploaded payload to `<user dir>/<filename>` and return its
    /// detected MIME type.
    pub async fn save_track_file(
        &self,
        user_slug: &str,
        filename: &str,
        data: &[u8],
    ) -> Result<String, CoreError> {
        let paths = self.track_paths(user_slug, filename)?;
        let dir = self.user_dir(user_slug)?;
        tracing::debug!(directory = %dir.display(), "Track will be uploaded");

        if let Err(e) = tokio::fs::create_dir_all(&dir).await {
            tracing::error!(directory = %dir.display(), error = %e, "Cannot create directory");
            return Err(e.into());
        }

        if let Err(e) = tokio::fs::write(&paths.original, data).await {
            tracing::error!(file = %paths.original.display(), error = %e, "Cannot write track file");
            return Err(e.into());
        }

        let mimetype = detect_mime(data, filename);
        tracing::info!(file = %paths.original.display(), %mimetype, "Track saved");
        Ok(mimetype)
    }

    /// Remove every artifact of a track. Never fails: each error is logged
    /// and recorded in the report, and the remaining files are still tried.
    pub async fn remove_track_files(
        &self,
        user_slug: &str,
        filename: &str,
        transcoded: bool,
    ) -> RemovalReport {
        let mut report = RemovalReport::default();
        let paths = match self.track_paths(user_slug, filename) {
            Ok(paths) => paths,
            Err(e) => {
                tracing::error!(user_slug, filename, error = %e, "Refusing to remove track files");
                report
                    .failed
                    .push((PathBuf::from(filename), e.to_string()));
                return report;
            }
        };

        for (artifact, path) in paths.artifacts(transcoded) {
            remove_into_report(path, artifact.label(), &mut report).await;
        }
        report
    }

    /// Names of the regular files in a user's directory. A missing directory
    /// yields an empty list.
    pub async fn list_user_files(&self, user_slug: &str) -> Result<Vec<String>, CoreError> {
        let dir = self.user_dir(user_slug)?;
        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if entry.file_type().await?.is_file() {
                if let Some(name) = entry.file_name().to_str() {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// Remove arbitrary files of one user directory, best effort.
    pub async fn remove_user_files(&self, user_slug: &str, names: &[String]) -> RemovalReport {
        let mut report = RemovalReport::default();
        for name in names {
            match self.track_paths(user_slug, name) {
                Ok(paths) => remove_into_report(&paths.original, "orphan", &mut report).await,
                Err(e) => report.failed.push((PathBuf::from(name), e.to_string())),
            }
        }
        report
    }
}

async fn remove_into_report(path: &Path, kind: &str, report: &mut RemovalReport) {
    match tokio::fs::remove_file(path).await {
        Ok(()) => {
            tracing::info!(file = %path.display(), kind, "File removed");
            report.removed.push(path.to_path_buf());
        }
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::debug!(file = %path.display(), kind, "File already absent");
            report.missing.push(path.to_path_buf());
        }
        Err(e) => {
            tracing::error!(file = %path.display(), kind, error = %e, "Cannot remove file");
            report.failed.push((path.to_path_buf(), e.to_string()));
        }
    }
}
