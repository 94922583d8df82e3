//! Font file resolution by path or family name.

use crate::error::{AtlasError, Result};
use log::{debug, info};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Font file extensions considered when scanning font directories.
const FONT_EXTENSIONS: [&str; 3] = ["ttf", "otf", "ttc"];

/// How deep to descend into font directories.
const MAX_SCAN_DEPTH: usize = 4;

/// A font file and the styles its face already provides.
#[derive(Debug, Clone)]
pub struct ResolvedFont {
    pub path: PathBuf,
    pub data: Vec<u8>,
    /// The face is a bold cut (no synthetic emboldening needed).
    pub is_bold: bool,
    /// The face is an italic cut (no synthetic slant needed).
    pub is_italic: bool,
}

/// A candidate file stem and the styles it satisfies.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StyleCandidate {
    stem: String,
    bold: bool,
    italic: bool,
}

/// Resolve a font specifier: an existing file path is read directly,
/// anything else is treated as a family name searched in the system font
/// directories, preferring a face that already has the requested style.
pub fn resolve_font(specifier: &str, bold: bool, italic: bool) -> Result<ResolvedFont> {
    let path = Path::new(specifier);
    if path.is_file() {
        info!("Font loaded from path: {}", specifier);
        return Ok(ResolvedFont {
            path: path.to_path_buf(),
            data: std::fs::read(path)?,
            is_bold: false,
            is_italic: false,
        });
    }

    let dirs = font_search_dirs();
    let (path, is_bold, is_italic) = find_in_dirs(&dirs, specifier, bold, italic).ok_or_else(|| {
        AtlasError::Font(format!(
            "Font not found: \"{}\" (not a file path or an installed family)",
            specifier
        ))
    })?;

    info!("Font resolved by name: \"{}\" -> {}", specifier, path.display());
    Ok(ResolvedFont {
        data: std::fs::read(&path)?,
        path,
        is_bold,
        is_italic,
    })
}

/// Directories that commonly hold installed fonts on this host.
pub fn font_search_dirs() -> Vec<PathBuf> {
    let mut dirs_list = Vec::new();
    if let Some(dir) = dirs::font_dir() {
        dirs_list.push(dir);
    }
    if let Some(home) = dirs::home_dir() {
        dirs_list.push(home.join(".fonts"));
    }
    if let Some(windir) = std::env::var_os("WINDIR") {
        dirs_list.push(PathBuf::from(windir).join("Fonts"));
    }
    for dir in [
        "/usr/share/fonts",
        "/usr/local/share/fonts",
        "/Library/Fonts",
        "/System/Library/Fonts",
    ] {
        dirs_list.push(PathBuf::from(dir));
    }
    dirs_list.retain(|d| d.is_dir());
    dirs_list
}

/// Search `dirs` for `family`, returning the path and the styles it provides.
pub fn find_in_dirs(
    dirs: &[PathBuf],
    family: &str,
    bold: bool,
    italic: bool,
) -> Option<(PathBuf, bool, bool)> {
    let mut by_stem = HashMap::new();
    for dir in dirs {
        scan_dir(dir, 0, &mut by_stem);
    }
    debug!("Scanned {} font files", by_stem.len());

    style_candidates(family, bold, italic)
        .into_iter()
        .find_map(|c| by_stem.get(&c.stem).map(|p: &PathBuf| (p.clone(), c.bold, c.italic)))
}

fn scan_dir(dir: &Path, depth: usize, by_stem: &mut HashMap<String, PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    let mut paths: Vec<PathBuf> = entries.filter_map(|e| e.ok().map(|e| e.path())).collect();
    paths.sort();

    for path in paths {
        if path.is_dir() {
            if depth < MAX_SCAN_DEPTH {
                scan_dir(&path, depth + 1, by_stem);
            }
            continue;
        }
        let is_font = path
            .extension()
            .map(|e| e.to_string_lossy().to_ascii_lowercase())
            .is_some_and(|e| FONT_EXTENSIONS.contains(&e.as_str()));
        if !is_font {
            continue;
        }
        if let Some(stem) = path.file_stem() {
            by_stem
                .entry(normalize(&stem.to_string_lossy()))
                .or_insert(path);
        }
    }
}

/// Lower-case and drop separators so "DejaVu Sans" matches "DejaVuSans".
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, ' ' | '-' | '_'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// File stems to try, best match first. Faces lacking a requested style
/// come last so the caller can synthesize it.
fn style_candidates(family: &str, bold: bool, italic: bool) -> Vec<StyleCandidate> {
    let family = normalize(family);
    let with = |suffixes: &[&str], bold: bool, italic: bool| -> Vec<StyleCandidate> {
        suffixes
            .iter()
            .map(|s| StyleCandidate {
                stem: format!("{}{}", family, s),
                bold,
                italic,
            })
            .collect()
    };

    let bold_italic = with(&["bolditalic", "boldoblique", "bi", "z"], true, true);
    let bold_only = with(&["bold", "bd", "b"], true, false);
    let italic_only = with(&["italic", "oblique", "i"], false, true);
    let regular = with(&["", "regular", "book"], false, false);

    let mut candidates = Vec::new();
    match (bold, italic) {
        (true, true) => {
            candidates.extend(bold_italic);
            candidates.extend(bold_only);
            candidates.extend(italic_only);
        }
        (true, false) => candidates.extend(bold_only),
        (false, true) => candidates.extend(italic_only),
        (false, false) => {}
    }
    candidates.extend(regular);
    candidates
}
