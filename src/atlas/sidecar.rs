//! UV sidecar text: one C initializer tuple per atlas element.
//!
//! ```text
//! { "", { 0.4, 0.4 } },
//! { "aegis", { 0.05, 0.05 } },
//! ```
//!
//! The first line always carries the span shared by every cell; the rest
//! map each element name to the top-left UV of its cell.

use crate::types::UvEntry;
use std::fmt::Write;
use std::path::Path;

/// Extension of the sidecar written next to the texture.
pub const SIDECAR_EXTENSION: &str = "inc";

/// Render the sidecar text.
///
/// Floats are printed with Rust's shortest round-trip formatting, which is
/// independent of the host locale.
pub fn serialize_sidecar(entries: &[UvEntry], common_span: &UvEntry) -> String {
    let mut out = String::new();
    push_line(&mut out, "", common_span.u_span, common_span.v_span);
    for entry in entries.iter().filter(|e| !e.is_common()) {
        push_line(&mut out, &entry.name, entry.u, entry.v);
    }
    out
}

fn push_line(out: &mut String, name: &str, a: f32, b: f32) {
    // Writing to a String cannot fail.
    let _ = writeln!(out, "{{ \"{}\", {{ {}, {} }} }},", escape(name), a, b);
}

fn escape(name: &str) -> String {
    name.replace('\\', "\\\\").replace('"', "\\\"")
}

/// Sidecar name for an image file: the lower-cased file stem.
pub fn element_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

/// Sidecar name for glyph `index`, zero-padded to the digit count of `count`.
pub fn glyph_name(index: u32, count: u32) -> String {
    let width = count.to_string().len();
    format!("{:0width$}", index, width = width)
}

/// Sidecar path for a texture path (extension swapped to `.inc`).
pub fn sidecar_path(texture_path: &Path) -> std::path::PathBuf {
    texture_path.with_extension(SIDECAR_EXTENSION)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, u: f32, v: f32) -> UvEntry {
        UvEntry {
            name: name.to_string(),
            u,
            v,
            u_span: 0.4,
            v_span: 0.4,
        }
    }

    #[test]
    fn test_serialize_layout() {
        let entries = vec![entry("aegis", 0.05, 0.05), entry("fury", 0.55, 0.05)];
        let text = serialize_sidecar(&entries, &UvEntry::common_span(0.4));

        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "{ \"\", { 0.4, 0.4 } },");
        assert_eq!(lines[1], "{ \"aegis\", { 0.05, 0.05 } },");
        assert_eq!(lines[2], "{ \"fury\", { 0.55, 0.05 } },");
    }

    #[test]
    fn test_float_formatting_uses_decimal_point() {
        let entries = vec![entry("third", 8.0 / 24.0, 0.0)];
        let text = serialize_sidecar(&entries, &UvEntry::common_span(1.0));
        assert!(text.starts_with("{ \"\", { 1, 1 } },\n"));
        assert!(text.contains("{ \"third\", { 0.33333334, 0 } },"));
        assert!(!text.contains(",5"));
    }

    #[test]
    fn test_common_entry_not_repeated() {
        let entries = vec![UvEntry::common_span(0.5), entry("a", 0.0, 0.0)];
        let text = serialize_sidecar(&entries, &UvEntry::common_span(0.5));
        assert_eq!(text.lines().count(), 2);
    }

    #[test]
    fn test_quotes_escaped() {
        let entries = vec![entry("say \"hi\"", 0.0, 0.0)];
        let text = serialize_sidecar(&entries, &UvEntry::common_span(0.5));
        assert!(text.contains("{ \"say \\\"hi\\\"\", { 0, 0 } },"));
    }

    #[test]
    fn test_element_name() {
        assert_eq!(element_name(Path::new("/icons/Aegis.PNG")), "aegis");
        assert_eq!(element_name(Path::new("Quickness.tga")), "quickness");
        assert_eq!(element_name(Path::new("archive.tar.dds")), "archive.tar");
    }

    #[test]
    fn test_glyph_name_padding() {
        assert_eq!(glyph_name(0, 100), "000");
        assert_eq!(glyph_name(42, 100), "042");
        assert_eq!(glyph_name(7, 26), "07");
        assert_eq!(glyph_name(3, 9), "3");
    }

    #[test]
    fn test_sidecar_path() {
        assert_eq!(sidecar_path(Path::new("out/atlas.dds")), PathBuf::from("out/atlas.inc"));
        assert_eq!(sidecar_path(Path::new("numbers")), PathBuf::from("numbers.inc"));
    }
}
