//! Atlas building from an element source.

use crate::atlas::{compose, serialize_sidecar, Canvas, LayoutPlan};
use crate::config::AtlasConfig;
use crate::error::{AtlasError, Result};
use crate::export::{write_atlas, ExportOptions, WrittenAtlas};
use crate::source::{collect_elements, ElementSource, SkippedElement};
use crate::types::{AtlasElement, TextureFormat, UvEntry};
use log::{debug, info};
use std::path::Path;

/// A composited atlas, ready to be written.
#[derive(Debug)]
pub struct AtlasOutput {
    /// Grid the elements were placed on.
    pub plan: LayoutPlan,
    /// Composited pixels.
    pub canvas: Canvas,
    /// One entry per placed element, in placement order.
    pub entries: Vec<UvEntry>,
    /// Elements the source could not produce.
    pub skipped: Vec<SkippedElement>,
    /// Format the texture will be written in.
    pub format: TextureFormat,
    /// Whether to write the full mip chain.
    pub generate_mipmaps: bool,
}

impl AtlasOutput {
    /// The synthetic entry carrying the span shared by all cells.
    pub fn common_span(&self) -> UvEntry {
        UvEntry::common_span(self.plan.uv_span())
    }

    /// Look up an element's entry by name, ignoring case.
    pub fn entry(&self, name: &str) -> Option<&UvEntry> {
        self.entries.iter().find(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Sidecar text for this atlas.
    pub fn sidecar(&self) -> String {
        serialize_sidecar(&self.entries, &self.common_span())
    }

    /// Write the texture to `path` and the sidecar next to it.
    pub fn write<P: AsRef<Path>>(self, path: P, preview: bool) -> Result<WrittenAtlas> {
        let sidecar = self.sidecar();
        let options = ExportOptions {
            format: self.format,
            generate_mipmaps: self.generate_mipmaps,
            preview,
        };
        write_atlas(self.canvas, &sidecar, path.as_ref(), options)
    }
}

/// Builds grid atlases with a fixed configuration.
#[derive(Debug, Clone, Default)]
pub struct AtlasBuilder {
    config: AtlasConfig,
}

impl AtlasBuilder {
    /// Create a builder with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with custom configuration.
    pub fn with_config(config: AtlasConfig) -> Self {
        Self { config }
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AtlasConfig {
        &self.config
    }

    /// Produce every element of `source` and composite them into an atlas.
    pub fn build<S: ElementSource + ?Sized>(&self, source: &mut S) -> Result<AtlasOutput> {
        self.config.validate()?;

        let collected = collect_elements(source);
        if !collected.skipped.is_empty() {
            info!(
                "{} of {} elements were skipped",
                collected.skipped.len(),
                source.len()
            );
        }

        let cell_size = match self.config.cell_size {
            Some(size) => size,
            None => {
                let size = source
                    .auto_cell_size(&collected)
                    .ok_or(AtlasError::EmptyInputSet)?;
                debug!("Detected atlas element size: {}x{}.", size, size);
                size
            }
        };

        let format = self.config.format.unwrap_or_else(|| source.default_format());
        let mut output = self.compose_elements(collected.elements, cell_size, format)?;
        output.skipped = collected.skipped;
        Ok(output)
    }

    /// Composite already prepared elements. A configured cell size wins;
    /// otherwise the widest element sets it.
    pub fn build_elements(
        &self,
        elements: Vec<AtlasElement>,
        format: TextureFormat,
    ) -> Result<AtlasOutput> {
        self.config.validate()?;
        let cell_size = match self.config.cell_size {
            Some(size) => size,
            None => elements
                .iter()
                .map(|e| e.width)
                .max()
                .ok_or(AtlasError::EmptyInputSet)?,
        };
        let format = self.config.format.unwrap_or(format);
        self.compose_elements(elements, cell_size, format)
    }

    fn compose_elements(
        &self,
        elements: Vec<AtlasElement>,
        cell_size: u32,
        format: TextureFormat,
    ) -> Result<AtlasOutput> {
        if elements.is_empty() {
            return Err(AtlasError::EmptyInputSet);
        }

        let plan = LayoutPlan::plan(
            elements.len(),
            cell_size,
            self.config.border,
            self.config.block_align,
        )?;
        debug!("Final texture size: {}x{}.", plan.canvas_edge, plan.canvas_edge);

        let mut canvas = Canvas::for_plan(&plan);
        let entries = compose(&mut canvas, &plan, elements)?;

        info!(
            "Packed {} elements into a {}x{} atlas ({} columns, {}px cells)",
            entries.len(),
            plan.canvas_edge,
            plan.canvas_edge,
            plan.columns,
            plan.cell_size
        );

        Ok(AtlasOutput {
            plan,
            canvas,
            entries,
            skipped: Vec::new(),
            format,
            generate_mipmaps: self.config.generate_mipmaps,
        })
    }
}
