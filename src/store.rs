//! Persisted wallpaper files.
//!
//! Every generation gets a unique name (display index + timestamp) so the
//! OS sees a new image instead of serving its cached copy. A fixed-name
//! symlink tracks the most recent display-1 file for external tooling.

use anyhow::{Context, Result};
use chrono::Utc;
use image::RgbImage;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

pub const CURRENT_LINK: &str = "current_wallpaper.jpg";
const JPEG_QUALITY: u8 = 95;

/// Write `canvas` into `dir` under a per-display, per-generation name.
pub fn save_wallpaper(dir: &Path, display_index: usize, canvas: &RgbImage) -> Result<PathBuf> {
    let timestamp = Utc::now().timestamp();
    let path = dir.join(format!("wallpaper_display{display_index}_{timestamp}.jpg"));
    save_jpeg(canvas, &path)?;
    Ok(path)
}

fn save_jpeg(canvas: &RgbImage, path: &Path) -> Result<()> {
    let file =
        fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, JPEG_QUALITY);
    canvas
        .write_with_encoder(encoder)
        .with_context(|| format!("encoding {}", path.display()))?;
    Ok(())
}

/// Point the fixed-name link at the newest display-1 file.
pub fn update_current_link(dir: &Path, latest: &Path) -> Result<()> {
    let link = dir.join(CURRENT_LINK);
    if link.symlink_metadata().is_ok() {
        fs::remove_file(&link).with_context(|| format!("removing {}", link.display()))?;
    }
    std::os::unix::fs::symlink(latest, &link)
        .with_context(|| format!("linking {}", link.display()))?;
    Ok(())
}

/// Keep the `keep` most recently modified files per display group and
/// delete the rest. Individual deletions are best-effort.
pub fn cleanup_old_wallpapers(dir: &Path, keep: usize) -> Result<()> {
    let name_re = Regex::new(r"^wallpaper_display(\d+)_\d+\.jpg$")?;

    let mut groups: HashMap<u32, Vec<(PathBuf, SystemTime)>> = HashMap::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;
    for entry in entries {
        let entry = entry?;
        let file_name = entry.file_name();
        let Some(name) = file_name.to_str() else {
            continue;
        };
        let Some(caps) = name_re.captures(name) else {
            continue;
        };
        let Ok(group) = caps[1].parse::<u32>() else {
            continue;
        };
        let modified = entry
            .metadata()
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        groups.entry(group).or_default().push((entry.path(), modified));
    }

    for (_, mut files) in groups {
        files.sort_by(|a, b| b.1.cmp(&a.1));
        for (path, _) in files.into_iter().skip(keep) {
            let _ = fs::remove_file(path);
        }
    }
    Ok(())
}
