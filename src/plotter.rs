use crate::error::AppError;
use crate::glyph_backend::GlyphBackend;
use crate::processing::{PlotData, X_COLUMN, Y_COLUMN};
use image::{ImageFormat, RgbImage};
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters_backend::DrawingBackend;
use std::path::Path;
use tracing::debug;

/// Fixed look of the rendered chart. Sizes are in pixels at `dpi`.
#[derive(Debug, Clone)]
pub struct PlotStyle {
    pub title: &'static str,
    /// Canvas size in inches.
    pub figure_inches: (f64, f64),
    pub dpi: f64,
    pub title_px: u32,
    pub axis_title_px: u32,
    pub tick_px: u32,
    pub point_label_px: u32,
    pub marker_radius_px: u32,
    pub edge_width_px: u32,
    pub fill_alpha: f64,
    pub margin_px: u32,
    pub label_area_px: u32,
}

impl Default for PlotStyle {
    fn default() -> Self {
        // Point sizes converted at 300 DPI (1pt = 300/72 px)
        Self {
            title: "Scatter Plot of Words Based on Dim1 and Dim2",
            figure_inches: (10.0, 8.0),
            dpi: 300.0,
            title_px: 50,
            axis_title_px: 42,
            tick_px: 42,
            point_label_px: 33,
            marker_radius_px: 12,
            edge_width_px: 4,
            fill_alpha: 0.7,
            margin_px: 60,
            label_area_px: 200,
        }
    }
}

impl PlotStyle {
    /// Canvas size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let (w, h) = self.figure_inches;
        ((w * self.dpi).round() as u32, (h * self.dpi).round() as u32)
    }
}

/// Draws the labelled scatter plot into an in-memory RGB image.
///
/// The drawing surface borrows a pixel buffer for the duration of an inner
/// scope only, so it is released before this function returns whether or
/// not drawing succeeded.
pub fn render_scatter(plot_data: &PlotData, style: &PlotStyle) -> Result<RgbImage, AppError> {
    let (width, height) = style.pixel_size();
    let mut buffer = vec![0u8; width as usize * height as usize * 3];

    {
        let root = GlyphBackend::new(BitMapBackend::with_buffer(&mut buffer, (width, height)))
            .into_drawing_area();
        draw_chart(&root, plot_data, style).map_err(|e| AppError::Drawing(e.to_string()))?;
        root.present()
            .map_err(|e| AppError::Drawing(e.to_string()))?;
    }

    debug!(width, height, points = plot_data.points.len(), "rendered scatter");

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| AppError::Drawing("pixel buffer does not match canvas size".into()))
}

/// Encodes `image` as PNG at `path`.
///
/// The format is fixed rather than guessed from the extension, because generated
/// names such as `scatter_plot.png42` do not end in `.png`.
pub fn save_png(image: &RgbImage, path: &Path) -> Result<(), AppError> {
    image.save_with_format(path, ImageFormat::Png)?;
    Ok(())
}

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    plot_data: &PlotData,
    style: &PlotStyle,
) -> Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(root)
        .caption(style.title, ("sans-serif", style.title_px).into_font())
        .margin(style.margin_px)
        .x_label_area_size(style.label_area_px)
        .y_label_area_size(style.label_area_px)
        .build_cartesian_2d(plot_data.x_range(), plot_data.y_range())?;

    chart
        .configure_mesh()
        .x_desc(X_COLUMN)
        .y_desc(Y_COLUMN)
        .axis_desc_style(("sans-serif", style.axis_title_px))
        .label_style(("sans-serif", style.tick_px))
        .draw()?;

    let radius = style.marker_radius_px;
    let fill = BLUE.mix(style.fill_alpha).filled();
    let edge = BLACK.stroke_width(style.edge_width_px);

    chart.draw_series(
        plot_data
            .points
            .iter()
            .map(|p| Circle::new((p.x, p.y), radius, fill)),
    )?;
    chart.draw_series(
        plot_data
            .points
            .iter()
            .map(|p| Circle::new((p.x, p.y), radius, edge)),
    )?;

    let label_style = ("sans-serif", style.point_label_px)
        .into_font()
        .color(&BLACK)
        .pos(Pos::new(HPos::Right, VPos::Bottom));
    chart.draw_series(
        plot_data
            .points
            .iter()
            .map(|p| Text::new(p.label.clone(), (p.x, p.y), label_style.clone())),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::LabelledPoint;

    fn words() -> PlotData {
        PlotData {
            points: vec![
                LabelledPoint {
                    label: "cat".into(),
                    x: 0.1,
                    y: 0.2,
                },
                LabelledPoint {
                    label: "dog".into(),
                    x: 0.4,
                    y: 0.9,
                },
            ],
            skipped_rows: 0,
        }
    }

    #[test]
    fn canvas_is_ten_by_eight_inches_at_300_dpi() {
        assert_eq!(PlotStyle::default().pixel_size(), (3000, 2400));
    }

    #[test]
    fn renders_full_size_image_with_blue_markers() {
        let image = render_scatter(&words(), &PlotStyle::default()).unwrap();
        assert_eq!(image.dimensions(), (3000, 2400));

        // Background is white and at least one pixel carries the marker fill
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255]);
        let has_blue = image
            .pixels()
            .any(|p| p.0[2] > 150 && p.0[0] < 120 && p.0[1] < 120);
        assert!(has_blue);
    }

    fn dark_pixels(image: &RgbImage) -> usize {
        image.pixels().filter(|p| p.0.iter().all(|&c| c < 60)).count()
    }

    #[test]
    fn point_labels_are_drawn_next_to_markers() {
        let labelled = words();
        let mut blank = words();
        for p in &mut blank.points {
            p.label.clear();
        }

        let style = PlotStyle::default();
        let with_labels = render_scatter(&labelled, &style).unwrap();
        let without_labels = render_scatter(&blank, &style).unwrap();

        assert!(dark_pixels(&with_labels) > dark_pixels(&without_labels));
    }

    #[test]
    fn mixed_case_and_non_ascii_labels_render_differently() {
        let single = |label: &str| PlotData {
            points: vec![LabelledPoint {
                label: label.into(),
                x: 0.0,
                y: 0.0,
            }],
            skipped_rows: 0,
        };
        let style = PlotStyle::default();
        let upper = render_scatter(&single("Apple"), &style).unwrap();
        let lower = render_scatter(&single("apple"), &style).unwrap();
        let empty = render_scatter(&single(""), &style).unwrap();
        let zurich = render_scatter(&single("Zürich"), &style).unwrap();
        let cjk = render_scatter(&single("東京"), &style).unwrap();

        assert_ne!(upper, lower);
        assert!(dark_pixels(&zurich) > dark_pixels(&empty));
        assert!(dark_pixels(&cjk) > dark_pixels(&empty));
    }

    #[test]
    fn renders_empty_data() {
        let empty = PlotData {
            points: Vec::new(),
            skipped_rows: 0,
        };
        let image = render_scatter(&empty, &PlotStyle::default()).unwrap();
        assert_eq!(image.width(), 3000);
    }

    #[test]
    fn png_is_written_regardless_of_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scatter_plot.png17");
        let image = render_scatter(&words(), &PlotStyle::default()).unwrap();
        save_png(&image, &path).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}
