//! M3U playlist rendering and output

use chrono::{DateTime, Local};
use std::fmt::Write as _;
use std::path::Path;
use tracing::{debug, info};

use crate::errors::{AppError, AppResult};
use crate::models::PlaylistEntry;

/// Marker that stops GitHub Pages from running Jekyll over the output
pub const NOJEKYLL_MARKER: &str = ".nojekyll";

#[derive(Debug, Clone, Default)]
pub struct PlaylistGenerator {
    epg_url: Option<String>,
}

impl PlaylistGenerator {
    pub fn new(epg_url: Option<String>) -> Self {
        Self {
            epg_url: epg_url.filter(|u| !u.trim().is_empty()),
        }
    }

    /// Render entries in the given order
    pub fn render(&self, entries: &[PlaylistEntry], generated_at: DateTime<Local>) -> String {
        let mut out = String::with_capacity(64 + entries.len() * 128);

        match &self.epg_url {
            Some(epg) => {
                let _ = writeln!(out, "#EXTM3U x-tvg-url=\"{}\"", attribute_value(epg));
            }
            None => out.push_str("#EXTM3U\n"),
        }
        let _ = writeln!(
            out,
            "# Generated at: {}",
            generated_at.format("%Y-%m-%d %H:%M")
        );

        for entry in entries {
            let name = attribute_value(&entry.display_name);
            let _ = writeln!(
                out,
                "#EXTINF:-1 tvg-name=\"{}\" group-title=\"{}\",{}",
                name,
                attribute_value(entry.category.group_title()),
                entry.display_name
            );
            let _ = writeln!(out, "{}", entry.address);
        }
        out
    }

    /// Write the playlist, creating parent directories as needed
    pub async fn write(&self, path: &Path, content: &str) -> AppResult<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::output(parent, e))?;
        }
        tokio::fs::write(path, content)
            .await
            .map_err(|e| AppError::output(path, e))?;

        info!("Wrote playlist to {} ({} bytes)", path.display(), content.len());
        Ok(())
    }

    /// Create the `.nojekyll` marker in `dir` unless it already exists
    pub async fn ensure_nojekyll(dir: &Path) -> AppResult<bool> {
        let marker = dir.join(NOJEKYLL_MARKER);
        if tokio::fs::try_exists(&marker)
            .await
            .map_err(|e| AppError::output(&marker, e))?
        {
            return Ok(false);
        }
        tokio::fs::write(&marker, b"")
            .await
            .map_err(|e| AppError::output(&marker, e))?;
        debug!("Created {}", marker.display());
        Ok(true)
    }
}

/// Attribute values are double-quoted; embedded quotes become single quotes
fn attribute_value(value: &str) -> String {
    value.replace('"', "'")
}
