//! Image export of the current spread.
//!
//! The spread is rendered to markup by the shared renderer and handed to a
//! [`Rasterizer`]. The browser host bridges that to its bitmap library;
//! tests use fakes. While a job runs the `exporting` flag refuses a second
//! one, and the flag is cleared whatever the outcome.

use async_trait::async_trait;
use sb_core::geometry::{PAGE_HEIGHT, PAGE_WIDTH};
use sb_core::model::Scrapbook;
use sb_render::{ExportError, ExportOptions, image_filename, spread_html};
use serde::Serialize;

/// Everything a rasterizer needs for one bitmap.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RasterJob {
    /// Self-contained spread markup, stylesheet included.
    pub markup: String,
    /// Logical size of the spread.
    pub width: u32,
    pub height: u32,
    pub pixel_ratio: f32,
    pub filename: String,
}

#[async_trait(?Send)]
pub trait Rasterizer {
    /// Produce PNG bytes for `job`, or a human-readable reason it failed.
    async fn rasterize(&self, job: &RasterJob) -> Result<Vec<u8>, String>;
}

/// A finished download.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageArtifact {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Default)]
pub struct ImageExport {
    exporting: bool,
}

impl ImageExport {
    pub fn is_exporting(&self) -> bool {
        self.exporting
    }

    /// Render the spread starting at `spread_start` and raise the flag.
    /// `page_index` is the editor's current page and only names the file.
    pub fn begin(
        &mut self,
        book: &Scrapbook,
        spread_start: usize,
        page_index: usize,
        options: &ExportOptions,
        pixel_ratio: f32,
    ) -> Result<RasterJob, ExportError> {
        if self.exporting {
            return Err(ExportError::InProgress);
        }
        let markup = spread_html(book, spread_start, options)?;
        self.exporting = true;
        Ok(RasterJob {
            markup,
            width: (PAGE_WIDTH * 2.0) as u32,
            height: PAGE_HEIGHT as u32,
            pixel_ratio,
            filename: image_filename(&book.title, page_index),
        })
    }

    /// Lower the flag and turn the rasterizer's answer into an artifact.
    /// An empty bitmap counts as a failure, so no partial file is offered.
    pub fn finish(&mut self, job: RasterJob, result: Result<Vec<u8>, String>) -> Result<ImageArtifact, ExportError> {
        self.exporting = false;
        match result {
            Ok(bytes) if !bytes.is_empty() => {
                log::debug!("exported {} ({} bytes)", job.filename, bytes.len());
                Ok(ImageArtifact {
                    filename: job.filename,
                    bytes,
                })
            }
            Ok(_) => Err(ExportError::Rasterize("the rasterizer returned an empty image".into())),
            Err(reason) => Err(ExportError::Rasterize(reason)),
        }
    }

    /// `begin`, await the rasterizer, `finish`.
    pub async fn run<R: Rasterizer + ?Sized>(
        &mut self,
        rasterizer: &R,
        book: &Scrapbook,
        spread_start: usize,
        page_index: usize,
        options: &ExportOptions,
        pixel_ratio: f32,
    ) -> Result<ImageArtifact, ExportError> {
        let job = self.begin(book, spread_start, page_index, options, pixel_ratio)?;
        let result = rasterizer.rasterize(&job).await;
        self.finish(job, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::cell::RefCell;

    struct Recording {
        jobs: RefCell<Vec<RasterJob>>,
        answer: Result<Vec<u8>, String>,
    }

    #[async_trait(?Send)]
    impl Rasterizer for Recording {
        async fn rasterize(&self, job: &RasterJob) -> Result<Vec<u8>, String> {
            self.jobs.borrow_mut().push(job.clone());
            self.answer.clone()
        }
    }

    fn book() -> Scrapbook {
        Scrapbook::new(1, "My Trip", "travel", 4, 0)
    }

    #[tokio::test]
    async fn artifact_is_named_after_current_page() {
        let raster = Recording {
            jobs: RefCell::default(),
            answer: Ok(vec![0x89, b'P', b'N', b'G']),
        };
        let mut export = ImageExport::default();
        let artifact = export
            .run(&raster, &book(), 2, 2, &ExportOptions::default(), 2.0)
            .await
            .unwrap();
        assert_eq!(artifact.filename, "My Trip_page_3.png");
        assert!(!export.is_exporting());

        let jobs = raster.jobs.borrow();
        assert_eq!(jobs.len(), 1);
        assert_eq!((jobs[0].width, jobs[0].height, jobs[0].pixel_ratio), (1600, 1120, 2.0));
        assert!(jobs[0].markup.starts_with("<style>"));
        assert!(jobs[0].markup.contains("class=\"sb-spread\""));
    }

    #[tokio::test]
    async fn failure_clears_flag_and_yields_nothing() {
        let raster = Recording {
            jobs: RefCell::default(),
            answer: Err("image host unreachable".into()),
        };
        let mut export = ImageExport::default();
        let err = export
            .run(&raster, &book(), 0, 0, &ExportOptions::default(), 2.0)
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Rasterize(ref m) if m == "image host unreachable"));
        assert!(!export.is_exporting());
    }

    #[test]
    fn second_export_is_refused_while_running() {
        let mut export = ImageExport::default();
        let job = export
            .begin(&book(), 0, 0, &ExportOptions::default(), 2.0)
            .unwrap();
        assert!(matches!(
            export.begin(&book(), 0, 0, &ExportOptions::default(), 2.0),
            Err(ExportError::InProgress)
        ));
        assert!(export.finish(job, Ok(Vec::new())).is_err());
        assert!(!export.is_exporting());
    }

    #[test]
    fn bad_spread_does_not_raise_the_flag() {
        let mut export = ImageExport::default();
        assert!(matches!(
            export.begin(&book(), 8, 0, &ExportOptions::default(), 2.0),
            Err(ExportError::PageOutOfRange { index: 8, count: 4 })
        ));
        assert!(!export.is_exporting());
    }
}
