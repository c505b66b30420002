// Report service - Use case for exporting a rendered summary as a document
use crate::application::history_repository::{DatasetId, HistoryEntry, HistoryRepository};
use crate::application::service_error::ServiceError;
use crate::domain::projection::Projection;
use crate::domain::report::{PagePlacement, PageSize, fit_to_page};
use crate::infrastructure::chart_canvas::{ChartCanvas, ReportCaption};
use image::imageops::{self, FilterType};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::sync::Arc;
use thiserror::Error;

const FALLBACK_FILENAME: &str = "equipment_report.png";

/// A rendered surface that can be captured as a raster image.
pub trait SurfaceSnapshot: Send + Sync {
    fn capture(&self) -> anyhow::Result<RgbaImage>;
}

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Nothing to export: {0}")]
    Precondition(String),

    #[error("Failed to capture rendered surface: {0}")]
    Snapshot(anyhow::Error),

    #[error("Failed to encode report document: {0}")]
    Encode(#[from] image::ImageError),
}

/// A single-page document ready for download.
#[derive(Debug, Clone)]
pub struct DocumentArtifact {
    pub filename: String,
    pub content_type: &'static str,
    pub page: PageSize,
    pub placement: PagePlacement,
    pub bytes: Vec<u8>,
}

/// Fits a captured surface onto a fixed-size page.
#[derive(Debug, Clone, Copy)]
pub struct ReportExporter {
    page: PageSize,
}

impl ReportExporter {
    pub fn new(page: PageSize) -> Self {
        Self { page }
    }

    pub fn export(
        &self,
        surface: Option<&dyn SurfaceSnapshot>,
        dataset_name: Option<&str>,
    ) -> Result<DocumentArtifact, ExportError> {
        let surface = surface
            .ok_or_else(|| ExportError::Precondition("no rendered surface available".into()))?;

        let image = surface.capture().map_err(ExportError::Snapshot)?;
        let placement = fit_to_page(image.width(), image.height(), self.page)
            .ok_or_else(|| ExportError::Precondition("rendered surface is empty".into()))?;

        let page_width = self.page.width.round().max(1.0) as u32;
        let page_height = self.page.height.round().max(1.0) as u32;
        let mut page = RgbaImage::from_pixel(page_width, page_height, Rgba([255, 255, 255, 255]));

        let scaled_width = (placement.width.round() as u32).clamp(1, page_width);
        let scaled_height = (placement.height.round() as u32).clamp(1, page_height);
        let scaled = imageops::resize(&image, scaled_width, scaled_height, FilterType::Triangle);
        imageops::overlay(
            &mut page,
            &scaled,
            placement.x.round() as i64,
            placement.y.round() as i64,
        );

        let mut bytes = Vec::new();
        page.write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)?;

        Ok(DocumentArtifact {
            filename: report_filename(dataset_name),
            content_type: "image/png",
            page: self.page,
            placement,
            bytes,
        })
    }
}

/// Suggested download name: `<dataset>_report.png`, or a generic name.
pub fn report_filename(dataset_name: Option<&str>) -> String {
    let stem = dataset_name
        .map(str::trim)
        .map(|name| name.strip_suffix(".csv").unwrap_or(name))
        .map(|name| {
            name.chars()
                .map(|c| match c {
                    '/' | '\\' | '"' | ':' => '_',
                    c if c.is_control() => '_',
                    c => c,
                })
                .collect::<String>()
        })
        .filter(|name| !name.trim_matches('_').is_empty());

    match stem {
        Some(stem) => format!("{}_report.png", stem),
        None => FALLBACK_FILENAME.to_string(),
    }
}

#[derive(Clone)]
pub struct ReportService {
    repository: Arc<dyn HistoryRepository>,
    exporter: ReportExporter,
    surface_size: (u32, u32),
}

impl ReportService {
    pub fn new(
        repository: Arc<dyn HistoryRepository>,
        exporter: ReportExporter,
        surface_size: (u32, u32),
    ) -> Self {
        Self {
            repository,
            exporter,
            surface_size,
        }
    }

    /// Export the given dataset, or the latest one when `id` is `None`
    pub async fn export(&self, id: Option<DatasetId>) -> Result<DocumentArtifact, ServiceError> {
        let entry: Option<Arc<HistoryEntry>> = match id {
            Some(id) => self.repository.get(id).await,
            None => self.repository.latest().await,
        };

        let Some(entry) = entry else {
            let reason = match id {
                Some(id) => format!("no summary for dataset {}", id),
                None => "no dataset has been uploaded".to_string(),
            };
            tracing::warn!("Refusing report export: {}", reason);
            return Err(ExportError::Precondition(reason).into());
        };

        let projection = Projection::from_summary(&entry.summary);
        let (width, height) = self.surface_size;
        let canvas = ChartCanvas::new(width, height, projection).with_caption(ReportCaption {
            title: entry.dataset.name().to_string(),
            uploaded_at: entry.dataset.uploaded_at(),
            total_count: entry.summary.total_count,
        });

        let artifact = self
            .exporter
            .export(Some(&canvas), Some(entry.dataset.name()))?;
        tracing::info!(
            "Exported report {} for dataset {} ({}x{} page, {} bytes)",
            artifact.filename,
            entry.id,
            artifact.page.width,
            artifact.page.height,
            artifact.bytes.len()
        );
        Ok(artifact)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::equipment::{Dataset, EquipmentRecord};
    use crate::domain::summary::Summary;
    use crate::infrastructure::memory_history::InMemoryHistory;
    use chrono::Utc;
    use std::num::NonZeroUsize;

    struct SolidSurface {
        width: u32,
        height: u32,
    }

    impl SurfaceSnapshot for SolidSurface {
        fn capture(&self) -> anyhow::Result<RgbaImage> {
            Ok(RgbaImage::from_pixel(self.width, self.height, Rgba([0, 0, 0, 255])))
        }
    }

    struct BrokenSurface;

    impl SurfaceSnapshot for BrokenSurface {
        fn capture(&self) -> anyhow::Result<RgbaImage> {
            anyhow::bail!("display detached")
        }
    }

    fn decode(bytes: &[u8]) -> RgbaImage {
        image::load_from_memory(bytes).unwrap().to_rgba8()
    }

    #[test]
    fn test_export_centers_image_on_page() {
        let exporter = ReportExporter::new(PageSize::new(200.0, 100.0));
        let surface = SolidSurface { width: 50, height: 50 };

        let artifact = exporter.export(Some(&surface), Some("plant.csv")).unwrap();

        assert_eq!(artifact.filename, "plant_report.png");
        assert_eq!(artifact.placement.scale, 2.0);
        assert_eq!(artifact.placement.x, 50.0);
        assert_eq!(artifact.placement.y, 0.0);

        let page = decode(&artifact.bytes);
        assert_eq!(page.dimensions(), (200, 100));
        assert_eq!(page.get_pixel(10, 50), &Rgba([255, 255, 255, 255]));
        assert_eq!(page.get_pixel(100, 50), &Rgba([0, 0, 0, 255]));
        assert_eq!(page.get_pixel(190, 50), &Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_export_without_surface_is_refused() {
        let exporter = ReportExporter::new(PageSize::LETTER);
        let err = exporter.export(None, Some("plant.csv")).unwrap_err();
        assert!(matches!(err, ExportError::Precondition(_)));
    }

    #[test]
    fn test_snapshot_failure_is_surfaced() {
        let exporter = ReportExporter::new(PageSize::LETTER);
        let err = exporter.export(Some(&BrokenSurface), None).unwrap_err();

        assert!(matches!(err, ExportError::Snapshot(_)));
        assert!(err.to_string().contains("display detached"));
    }

    #[test]
    fn test_report_filename() {
        assert_eq!(report_filename(Some("batch 7.csv")), "batch 7_report.png");
        assert_eq!(report_filename(Some("runs/line-2")), "runs_line-2_report.png");
        assert_eq!(report_filename(Some("   ")), "equipment_report.png");
        assert_eq!(report_filename(None), "equipment_report.png");
    }

    #[tokio::test]
    async fn test_service_refuses_when_history_is_empty() {
        let repository = Arc::new(InMemoryHistory::new(NonZeroUsize::new(5).unwrap()));
        let service = ReportService::new(repository, ReportExporter::new(PageSize::LETTER), (300, 140));

        let err = service.export(None).await.unwrap_err();
        assert!(matches!(err, ServiceError::Export(ExportError::Precondition(_))));

        let err = service.export(Some(DatasetId(42))).await.unwrap_err();
        assert_eq!(err.to_string(), "Nothing to export: no summary for dataset 42");
    }

    #[tokio::test]
    async fn test_service_exports_latest_dataset() {
        let repository = Arc::new(InMemoryHistory::new(NonZeroUsize::new(5).unwrap()));
        let records = vec![
            EquipmentRecord::new("Pump A".into(), "Pump".into(), 10.0, 2.0, 30.0),
            EquipmentRecord::new("Valve B".into(), "Valve".into(), 5.0, 1.0, 20.0),
        ];
        let summary = Summary::from_records(&records);
        let dataset = Dataset::new("line-1.csv".into(), Utc::now(), 2, records);
        repository.record(dataset, summary).await;

        let service = ReportService::new(repository, ReportExporter::new(PageSize::LETTER), (900, 600));
        let artifact = service.export(None).await.unwrap();

        assert_eq!(artifact.filename, "line-1_report.png");
        assert_eq!(artifact.content_type, "image/png");
        assert!((artifact.placement.width - 612.0).abs() < 1e-9);
        assert!((artifact.placement.height - 408.0).abs() < 1e-9);

        let page = decode(&artifact.bytes);
        assert_eq!(page.dimensions(), (612, 792));

        // The surface lands at y = 192; its header band is the first 80 * 0.68 rows.
        let white = Rgba([255, 255, 255, 255]);
        let header_ink = (192..246)
            .flat_map(|y| (0..612).map(move |x| (x, y)))
            .filter(|&(x, y)| page.get_pixel(x, y) != &white)
            .count();
        assert!(header_ink > 0);
        for x in 0..612 {
            assert_eq!(page.get_pixel(x, 100), &white);
        }
    }
}
