//! Image files as atlas elements.

use super::{ElementOutcome, ElementSource, SkippedElement};
use crate::atlas::element_name;
use crate::error::{AtlasError, Result};
use crate::export::dds::decode_dds;
use crate::types::{AtlasElement, TextureFormat};
use log::debug;
use std::path::{Path, PathBuf};

/// File extensions accepted as atlas inputs (lower case, without the dot).
pub const SUPPORTED_EXTENSIONS: [&str; 6] = ["dds", "tga", "bmp", "jpg", "jpeg", "png"];

/// Check a path against [`SUPPORTED_EXTENSIONS`], ignoring case.
pub fn is_supported(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .is_some_and(|ext| SUPPORTED_EXTENSIONS.contains(&ext.as_str()))
}

/// Decodes a sorted list of image files, one element per file.
#[derive(Debug, Clone)]
pub struct ImageSource {
    paths: Vec<PathBuf>,
    /// Native format of the first file that decoded.
    first_format: Option<TextureFormat>,
}

impl ImageSource {
    /// Use the supported files in `paths`, ordered by file name.
    pub fn from_files<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        let mut paths: Vec<PathBuf> = paths
            .into_iter()
            .map(Into::into)
            .filter(|p| {
                let keep = is_supported(p);
                if !keep {
                    debug!("Ignoring unsupported input {:?}", p);
                }
                keep
            })
            .collect();
        paths.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

        debug!("Using input files:");
        for path in &paths {
            debug!("\t{}", path.display());
        }

        Self {
            paths,
            first_format: None,
        }
    }

    /// Use every supported file directly inside `dir` (not recursive).
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();
        if !dir.is_dir() {
            return Err(AtlasError::Config(format!("{:?} is not a directory", dir)));
        }

        let mut files = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if path.is_file() {
                files.push(path);
            }
        }

        Ok(Self::from_files(files))
    }

    /// Input files in the order they will be placed.
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }
}

impl ElementSource for ImageSource {
    fn len(&self) -> usize {
        self.paths.len()
    }

    fn produce(&mut self, index: usize) -> ElementOutcome {
        let path = &self.paths[index];
        let name = element_name(path);

        match load_image(path, &name) {
            Ok((element, format)) => {
                self.first_format.get_or_insert(format);
                ElementOutcome::Produced(element)
            }
            Err(e) => ElementOutcome::Skipped(SkippedElement {
                name,
                reason: e.to_string(),
            }),
        }
    }

    fn default_format(&self) -> TextureFormat {
        self.first_format.unwrap_or_default()
    }
}

/// Decode one file to RGBA8 and report the format it was stored in.
///
/// DDS files go through the container reader so DX10 headers and every
/// output format decode; everything else goes through `image`.
fn load_image(path: &Path, name: &str) -> Result<(AtlasElement, TextureFormat)> {
    let decode_err = |message: String| AtlasError::Decode {
        path: path.to_path_buf(),
        message,
    };

    let is_dds = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("dds"));
    let (rgba, format) = if is_dds {
        decode_dds(path)?
    } else {
        let img = image::open(path).map_err(|e| decode_err(e.to_string()))?;
        (img.to_rgba8(), TextureFormat::Rgba8)
    };

    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(decode_err("image has no pixels".to_string()));
    }

    Ok((AtlasElement::new(name, width, height, rgba.into_raw()), format))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_png(dir: &Path, file: &str, width: u32, height: u32, color: [u8; 4]) -> PathBuf {
        let path = dir.join(file);
        image::RgbaImage::from_pixel(width, height, image::Rgba(color))
            .save(&path)
            .unwrap();
        path
    }

    #[test]
    fn test_supported_extensions() {
        assert!(is_supported(Path::new("a.png")));
        assert!(is_supported(Path::new("b.JPEG")));
        assert!(is_supported(Path::new("dir/c.Dds")));
        assert!(!is_supported(Path::new("notes.txt")));
        assert!(!is_supported(Path::new("noext")));
    }

    #[test]
    fn test_files_filtered_and_sorted_by_name() {
        let source = ImageSource::from_files(["z/Beta.png", "a/alpha.tga", "readme.md", "m/Gamma.bmp"]);
        let names: Vec<_> = source
            .paths()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        // Byte order: upper case sorts first
        assert_eq!(names, ["Beta.png", "Gamma.bmp", "alpha.tga"]);
    }

    #[test]
    fn test_directory_scan() {
        let dir = tempfile::tempdir().unwrap();
        write_png(dir.path(), "b.png", 4, 4, [0, 255, 0, 255]);
        write_png(dir.path(), "a.png", 2, 3, [255, 0, 0, 255]);
        std::fs::write(dir.path().join("skip.txt"), "text").unwrap();
        std::fs::create_dir(dir.path().join("nested.png")).unwrap();

        let mut source = ImageSource::from_directory(dir.path()).unwrap();
        assert_eq!(source.len(), 2);

        let ElementOutcome::Produced(first) = source.produce(0) else {
            panic!("a.png should decode");
        };
        assert_eq!(first.name, "a");
        assert_eq!((first.width, first.height), (2, 3));
        assert_eq!(first.get_pixel(1, 2), [255, 0, 0, 255]);
        assert_eq!(source.default_format(), TextureFormat::Rgba8);
    }

    #[test]
    fn test_missing_directory() {
        let err = ImageSource::from_directory("/definitely/not/here").unwrap_err();
        assert!(matches!(err, AtlasError::Config(_)));
    }

    #[test]
    fn test_dds_inputs_in_every_format() {
        use crate::export::dds::encode_dds;

        let dir = tempfile::tempdir().unwrap();
        let base = image::RgbaImage::from_pixel(8, 8, image::Rgba([255, 0, 0, 255]));
        for format in TextureFormat::ALL {
            let path = dir.path().join(format!("Icon_{}.DDS", format));
            std::fs::write(&path, encode_dds(&[base.clone()], format).unwrap()).unwrap();

            let mut source = ImageSource::from_files([&path]);
            let ElementOutcome::Produced(element) = source.produce(0) else {
                panic!("{} input should decode", format);
            };
            assert_eq!(element.name, format!("icon_{}", format));
            assert_eq!((element.width, element.height), (8, 8));
            assert_eq!(source.default_format(), format);
        }
    }

    #[test]
    fn test_corrupt_file_skipped() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("Broken.png"), b"not a png").unwrap();

        let mut source = ImageSource::from_directory(dir.path()).unwrap();
        match source.produce(0) {
            ElementOutcome::Skipped(skipped) => assert_eq!(skipped.name, "broken"),
            other => panic!("expected skip, got {:?}", other),
        }
    }
}
