// Chart canvas - Rasterizes a projection into a captioned bar and pie chart
use crate::application::report_service::SurfaceSnapshot;
use crate::domain::projection::{FULL_TURN, PieSegment, Projection};
use crate::infrastructure::bitmap_text::{GLYPH_SIZE, advance, draw_text};
use chrono::{DateTime, Utc};
use image::{Rgba, RgbaImage};

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const AXIS: Rgba<u8> = Rgba([64, 64, 64, 255]);
const TEXT: Rgba<u8> = Rgba([33, 33, 33, 255]);

const PALETTE: [Rgba<u8>; 8] = [
    Rgba([31, 119, 180, 255]),
    Rgba([255, 127, 14, 255]),
    Rgba([44, 160, 44, 255]),
    Rgba([214, 39, 40, 255]),
    Rgba([148, 103, 189, 255]),
    Rgba([140, 86, 75, 255]),
    Rgba([227, 119, 194, 255]),
    Rgba([127, 127, 127, 255]),
];

/// Pie slices start at 12 o'clock and run counter-clockwise.
const PIE_START_DEGREES: f64 = 90.0;

/// Legend rows shown before the rest are folded into one "more" line.
const MAX_LEGEND_ROWS: usize = 6;
const SUMMARY_LINES: usize = 6;

pub fn palette_color(index: usize) -> Rgba<u8> {
    PALETTE[index % PALETTE.len()]
}

/// Dataset provenance printed above the charts.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportCaption {
    pub title: String,
    pub uploaded_at: DateTime<Utc>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Copy)]
struct Region {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

/// Averages as bars on the left half, type distribution as a pie on the right.
///
/// With a caption, a header (title, upload time, total) sits above the charts
/// and the averages, insights and legend are printed below them.
#[derive(Debug, Clone)]
pub struct ChartCanvas {
    width: u32,
    height: u32,
    projection: Projection,
    caption: Option<ReportCaption>,
}

impl ChartCanvas {
    pub fn new(width: u32, height: u32, projection: Projection) -> Self {
        Self {
            width,
            height,
            projection,
            caption: None,
        }
    }

    pub fn with_caption(mut self, caption: ReportCaption) -> Self {
        self.caption = Some(caption);
        self
    }

    pub fn render(&self) -> RgbaImage {
        let mut image = RgbaImage::from_pixel(self.width, self.height, BACKGROUND);
        let mut chart = Region {
            x: 0,
            y: 0,
            width: self.width,
            height: self.height,
        };

        if let Some(caption) = &self.caption {
            let scale = text_scale(self.width, self.height);
            let line = line_height(scale);
            let header = header_lines(caption);
            let header_height = line * (header.len() as u32 + 1);
            let footer_height = line * (self.footer_line_count() as u32 + 1);

            // Text is dropped when it would squeeze the charts below a third of the surface.
            if header_height + footer_height + self.height / 3 <= self.height {
                let pad = line / 2;
                for (i, text) in header.iter().enumerate() {
                    draw_text(&mut image, pad, pad + line * i as u32, text, scale, TEXT);
                }
                let footer_top = self.height - footer_height + pad;
                self.draw_footer(&mut image, footer_top, scale);

                chart.y = header_height;
                chart.height = self.height - header_height - footer_height;
            }
        }

        let half = chart.width / 2;
        self.draw_bars(&mut image, Region { width: half, ..chart });
        self.draw_pie(
            &mut image,
            Region {
                x: half,
                width: chart.width - half,
                ..chart
            },
        );
        image
    }

    fn summary_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .projection
            .average_series
            .iter()
            .map(|bar| format!("Avg {}: {:.3}", bar.parameter, bar.value))
            .collect();

        let insights = &self.projection.insights;
        lines.push(match &insights.dominant_type {
            Some(d) => format!("Dominant type: {} ({}, {:.1}%)", d.label, d.count, d.percent),
            None => "Dominant type: none".to_string(),
        });
        lines.push(format!("Highest average: {}", insights.highest_average.parameter));
        lines.push(format!("Lowest average: {}", insights.lowest_average.parameter));
        lines
    }

    fn legend_lines(&self) -> Vec<(Option<usize>, String)> {
        let legend = &self.projection.legend;
        let shown = if legend.len() > MAX_LEGEND_ROWS {
            MAX_LEGEND_ROWS - 1
        } else {
            legend.len()
        };

        let mut lines: Vec<(Option<usize>, String)> = legend
            .iter()
            .take(shown)
            .enumerate()
            .map(|(i, row)| (Some(i), format!("{}: {} ({:.1}%)", row.label, row.count, row.percent)))
            .collect();
        if shown < legend.len() {
            lines.push((None, format!("+{} more types", legend.len() - shown)));
        }
        lines
    }

    fn footer_line_count(&self) -> usize {
        SUMMARY_LINES.max(self.legend_lines().len())
    }

    fn draw_footer(&self, image: &mut RgbaImage, top: u32, scale: u32) {
        let line = line_height(scale);
        let pad = line / 2;

        for (i, text) in self.summary_lines().iter().enumerate() {
            draw_text(image, pad, top + line * i as u32, text, scale, TEXT);
        }

        let legend_x = self.width / 2 + pad;
        let swatch = GLYPH_SIZE * scale;
        for (i, (color, text)) in self.legend_lines().iter().enumerate() {
            let y = top + line * i as u32;
            if let Some(idx) = color {
                fill_rect(image, legend_x, y, swatch, swatch, palette_color(*idx));
            }
            draw_text(image, legend_x + swatch + advance(scale), y, text, scale, TEXT);
        }
    }

    fn draw_bars(&self, image: &mut RgbaImage, region: Region) {
        let margin = (region.width.min(region.height) / 10).max(1);
        if region.width <= 2 * margin || region.height <= 2 * margin {
            return;
        }
        let baseline = region.y + region.height - margin;
        let plot_height = f64::from(region.height - 2 * margin);
        let plot_width = region.width - 2 * margin;

        fill_rect(image, region.x + margin, baseline, plot_width, 1, AXIS);

        let bars = &self.projection.average_series;
        if bars.is_empty() {
            return;
        }
        let slot = plot_width / bars.len() as u32;
        let bar_width = (slot * 3 / 5).max(1);

        for (i, bar) in bars.iter().enumerate() {
            let bar_height = (plot_height * bar.percent / 100.0).round() as u32;
            if bar_height == 0 {
                continue;
            }
            let left = region.x + margin + slot * i as u32 + (slot - bar_width) / 2;
            fill_rect(image, left, baseline - bar_height, bar_width, bar_height, palette_color(i));
        }
    }

    fn draw_pie(&self, image: &mut RgbaImage, region: Region) {
        let segments = &self.projection.segments;
        if segments.is_empty() {
            return;
        }

        let cx = f64::from(region.x) + f64::from(region.width) / 2.0;
        let cy = f64::from(region.y) + f64::from(region.height) / 2.0;
        let radius = f64::from(region.width.min(region.height)) * 0.4;
        let radius_sq = radius * radius;

        for y in region.y..region.y + region.height {
            for x in region.x..region.x + region.width {
                let dx = f64::from(x) + 0.5 - cx;
                let dy = cy - (f64::from(y) + 0.5);
                if dx * dx + dy * dy > radius_sq {
                    continue;
                }
                let angle = (dy.atan2(dx).to_degrees() - PIE_START_DEGREES).rem_euclid(FULL_TURN);
                if let Some(idx) = segment_at(segments, angle) {
                    image.put_pixel(x, y, palette_color(idx));
                }
            }
        }
    }
}

fn header_lines(caption: &ReportCaption) -> Vec<String> {
    vec![
        caption.title.clone(),
        format!("Uploaded: {}", caption.uploaded_at.format("%Y-%m-%d %H:%M:%S UTC")),
        format!("Total equipment: {}", caption.total_count),
    ]
}

fn text_scale(width: u32, height: u32) -> u32 {
    (width.min(height) / 300).max(1)
}

fn line_height(scale: u32) -> u32 {
    (GLYPH_SIZE + 2) * scale
}

impl SurfaceSnapshot for ChartCanvas {
    fn capture(&self) -> anyhow::Result<RgbaImage> {
        if self.width == 0 || self.height == 0 {
            anyhow::bail!("chart canvas has zero size ({}x{})", self.width, self.height);
        }
        Ok(self.render())
    }
}

fn segment_at(segments: &[PieSegment], angle: f64) -> Option<usize> {
    segments
        .iter()
        .position(|s| angle >= s.start_angle && angle < s.end_angle)
}

fn fill_rect(image: &mut RgbaImage, x: u32, y: u32, width: u32, height: u32, color: Rgba<u8>) {
    let x_end = (x + width).min(image.width());
    let y_end = (y + height).min(image.height());
    for py in y..y_end {
        for px in x..x_end {
            image.put_pixel(px, py, color);
        }
    }
}
