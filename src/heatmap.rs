//! Annotated correlation heatmap, rendered to SVG with plotters.
//!
//! Square cells on a diverging blue-to-red scale over [-1, 1], each labelled
//! with its coefficient to two decimals. Cells without a coefficient are grey.

use crate::correlation::CorrelationMatrix;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::FontTransform;
use std::path::{Path, PathBuf};

const TITLE_HEIGHT: i32 = 60;
const LEFT_LABELS: i32 = 220;
const BOTTOM_LABELS: i32 = 200;
const COLORBAR_AREA: i32 = 120;
const COLORBAR_WIDTH: i32 = 24;
const COLORBAR_STEPS: i32 = 100;

const COLD: (f64, f64, f64) = (59.0, 76.0, 192.0);
const NEUTRAL: (f64, f64, f64) = (221.0, 221.0, 221.0);
const HOT: (f64, f64, f64) = (180.0, 4.0, 38.0);
const MISSING: RGBColor = RGBColor(160, 160, 160);

/// Figure settings.
#[derive(Debug, Clone)]
pub struct HeatmapStyle {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

/// Render `matrix` to an SVG file at `path`, replacing any existing file.
pub fn render(
    matrix: &CorrelationMatrix,
    style: &HeatmapStyle,
    path: &Path,
) -> Result<(), HeatmapError> {
    draw(matrix, style, path).map_err(|e| HeatmapError {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    tracing::info!(path = %path.display(), cells = matrix.len() * matrix.len(), "heatmap written");
    Ok(())
}

/// Map a coefficient to the diverging palette.
pub fn color_for(value: f64) -> RGBColor {
    if value.is_nan() {
        return MISSING;
    }
    let v = value.clamp(-1.0, 1.0);
    let (from, to, t) = if v < 0.0 {
        (COLD, NEUTRAL, v + 1.0)
    } else {
        (NEUTRAL, HOT, v)
    };
    let lerp = |a: f64, b: f64| (a + (b - a) * t).round() as u8;
    RGBColor(lerp(from.0, to.0), lerp(from.1, to.1), lerp(from.2, to.2))
}

fn draw(
    matrix: &CorrelationMatrix,
    style: &HeatmapStyle,
    path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let root = SVGBackend::new(path, (style.width, style.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let (width, height) = (style.width as i32, style.height as i32);
    let centered = Pos::new(HPos::Center, VPos::Center);

    root.draw(&Text::new(
        style.title.clone(),
        (width / 2, TITLE_HEIGHT / 2),
        ("sans-serif", 24.0).into_font().color(&BLACK).pos(centered),
    ))?;

    let n = matrix.len() as i32;
    if n == 0 {
        root.draw(&Text::new(
            "no counters to correlate",
            (width / 2, height / 2),
            ("sans-serif", 18.0).into_font().color(&BLACK).pos(centered),
        ))?;
        root.present()?;
        return Ok(());
    }

    let avail_w = width - LEFT_LABELS - COLORBAR_AREA;
    let avail_h = height - TITLE_HEIGHT - BOTTOM_LABELS;
    let cell = (avail_w.min(avail_h) / n).max(1);
    let grid = cell * n;
    let x0 = LEFT_LABELS + (avail_w - grid).max(0) / 2;
    let y0 = TITLE_HEIGHT;

    let font_size = f64::from((cell / 4).clamp(8, 16));
    for i in 0..matrix.len() {
        for j in 0..matrix.len() {
            let value = matrix.get(i, j);
            let (cx, cy) = (x0 + j as i32 * cell, y0 + i as i32 * cell);
            let corners = [(cx, cy), (cx + cell, cy + cell)];
            root.draw(&Rectangle::new(corners, color_for(value).filled()))?;
            root.draw(&Rectangle::new(corners, WHITE.stroke_width(1)))?;

            let (label, ink) = if value.is_nan() {
                ("n/a".to_string(), BLACK)
            } else if value.abs() > 0.6 {
                (format!("{value:.2}"), WHITE)
            } else {
                (format!("{value:.2}"), BLACK)
            };
            root.draw(&Text::new(
                label,
                (cx + cell / 2, cy + cell / 2),
                ("sans-serif", font_size).into_font().color(&ink).pos(centered),
            ))?;
        }
    }

    for (k, name) in matrix.labels().iter().enumerate() {
        let mid = k as i32 * cell + cell / 2;
        root.draw(&Text::new(
            name.clone(),
            (x0 - 8, y0 + mid),
            ("sans-serif", 13.0)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Right, VPos::Center)),
        ))?;
        root.draw(&Text::new(
            name.clone(),
            (x0 + mid, y0 + grid + 8),
            ("sans-serif", 13.0)
                .into_font()
                .transform(FontTransform::Rotate90)
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }

    draw_colorbar(&root, x0 + grid + 30, y0, grid)?;
    root.present()?;
    Ok(())
}

fn draw_colorbar<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    x: i32,
    y: i32,
    length: i32,
) -> Result<(), Box<dyn std::error::Error>>
where
    DB::ErrorType: 'static,
{
    for step in 0..COLORBAR_STEPS {
        let top = y + length * step / COLORBAR_STEPS;
        let bottom = y + length * (step + 1) / COLORBAR_STEPS;
        let value = 1.0 - 2.0 * (step as f64 + 0.5) / COLORBAR_STEPS as f64;
        root.draw(&Rectangle::new(
            [(x, top), (x + COLORBAR_WIDTH, bottom.max(top + 1))],
            color_for(value).filled(),
        ))?;
    }

    for tick in [1.0, 0.5, 0.0, -0.5, -1.0_f64] {
        let ty = y + ((1.0 - tick) / 2.0 * length as f64).round() as i32;
        root.draw(&Text::new(
            format!("{tick:.1}"),
            (x + COLORBAR_WIDTH + 6, ty),
            ("sans-serif", 12.0)
                .into_font()
                .color(&BLACK)
                .pos(Pos::new(HPos::Left, VPos::Center)),
        ))?;
    }
    Ok(())
}

#[derive(Debug)]
pub struct HeatmapError {
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for HeatmapError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "failed to render heatmap {}: {}",
            self.path.display(),
            self.message
        )
    }
}

impl std::error::Error for HeatmapError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::correlate;
    use crate::dataset::Projection;
    use tempfile::tempdir;

    fn style() -> HeatmapStyle {
        HeatmapStyle {
            title: "Correlation Matrix".to_string(),
            width: 800,
            height: 600,
        }
    }

    #[test]
    fn palette_endpoints() {
        assert_eq!(color_for(-1.0).rgb(), (59, 76, 192));
        assert_eq!(color_for(0.0).rgb(), (221, 221, 221));
        assert_eq!(color_for(1.0).rgb(), (180, 4, 38));
        assert_eq!(color_for(f64::NAN).rgb(), MISSING.rgb());
        assert_eq!(color_for(3.0).rgb(), color_for(1.0).rgb());
    }

    #[test]
    fn renders_annotated_svg() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("corr.svg");
        let m = correlate(&Projection {
            columns: vec!["cpu_time_ms".into(), "map_input_bytes".into(), "flat".into()],
            data: vec![
                vec![1.0, 2.0, 3.0, 4.0],
                vec![2.0, 1.0, 4.0, 3.0],
                vec![0.0, 0.0, 0.0, 0.0],
            ],
        });

        render(&m, &style(), &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("Correlation Matrix"));
        assert!(svg.contains("cpu_time_ms"));
        assert!(svg.contains("map_input_bytes"));
        assert!(svg.contains("1.00"));
        assert!(svg.contains("0.60"));
        assert!(svg.contains("n/a"));
    }

    #[test]
    fn renders_empty_matrix() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.svg");
        let m = correlate(&Projection {
            columns: vec![],
            data: vec![],
        });
        render(&m, &style(), &path).unwrap();
        let svg = std::fs::read_to_string(&path).unwrap();
        assert!(svg.contains("no counters to correlate"));
    }

    #[test]
    fn unwritable_path_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing-dir").join("corr.svg");
        let m = correlate(&Projection {
            columns: vec!["a".into()],
            data: vec![vec![1.0]],
        });
        let err = render(&m, &style(), &path).unwrap_err();
        assert!(err.to_string().contains("corr.svg"));
    }
}
