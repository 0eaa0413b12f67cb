use super::finance_summary::MonthlyTotals;
use crate::error::{AnalyzerError, Result};
use crate::models::period::TrendPeriod;
use chrono::NaiveDate;
use plotters::prelude::*;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

pub const SPENDING_CHART: &str = "spending_by_category.png";
pub const MONTHLY_CHART: &str = "monthly_trends.png";

const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);
const CORAL: RGBColor = RGBColor(255, 127, 80);
const TEAL: RGBColor = RGBColor(0, 128, 128);

type DrawResult = std::result::Result<(), Box<dyn std::error::Error>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeChartNames {
    pub allocation: String,
    pub trend: String,
}

/// File names for the time-tracking charts, so runs with different options
/// never write to the same file.
pub fn chart_file_names(group_column: &str, period: TrendPeriod) -> TimeChartNames {
    let slug = group_column
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_")
        .to_lowercase();
    TimeChartNames {
        allocation: format!("time_allocation_by_{}.png", slug),
        trend: format!("{}_time_trend.png", period.label().to_lowercase()),
    }
}

pub struct BarChart<'a> {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub color: RGBColor,
    pub bars: &'a [(String, Decimal)],
}

impl<'a> BarChart<'a> {
    pub fn spending(bars: &'a [(String, Decimal)], inferred: bool) -> Self {
        Self {
            title: format!("Spending by {}Category", if inferred { "Inferred " } else { "" }),
            x_desc: "Category".to_string(),
            y_desc: "Total Spending ($)".to_string(),
            color: SKY_BLUE,
            bars,
        }
    }

    pub fn time_allocation(group_column: &str, bars: &'a [(String, Decimal)]) -> Self {
        Self {
            title: format!("Time Allocation by {}", group_column),
            x_desc: group_column.to_string(),
            y_desc: "Total Duration (hours)".to_string(),
            color: CORAL,
            bars,
        }
    }
}

struct LinePanel {
    title: String,
    y_desc: String,
    color: RGBColor,
    points: Vec<f64>,
}

pub fn render_bar_chart(chart: &BarChart, path: &Path) -> Result<()> {
    draw_bar_chart(chart, path).map_err(|e| chart_error(path, e))?;
    debug!(path = %path.display(), bars = chart.bars.len(), "Saved bar chart");
    Ok(())
}

pub fn render_monthly_trends(months: &[MonthlyTotals], path: &Path) -> Result<()> {
    let labels: Vec<String> = months
        .iter()
        .map(|m| m.month.format("%Y-%m").to_string())
        .collect();
    let panels = vec![
        LinePanel {
            title: "Monthly Income".to_string(),
            y_desc: "Amount ($)".to_string(),
            color: GREEN,
            points: months.iter().map(|m| to_f64(m.income)).collect(),
        },
        LinePanel {
            title: "Monthly Expenses".to_string(),
            y_desc: "Amount ($)".to_string(),
            color: RED,
            points: months.iter().map(|m| to_f64(m.expenses)).collect(),
        },
        LinePanel {
            title: "Monthly Net Savings".to_string(),
            y_desc: "Amount ($)".to_string(),
            color: BLUE,
            points: months.iter().map(|m| to_f64(m.net)).collect(),
        },
    ];

    draw_line_panels(&panels, &labels, "Year-Month", (1200, 800), path)
        .map_err(|e| chart_error(path, e))?;
    debug!(path = %path.display(), months = months.len(), "Saved monthly trends chart");
    Ok(())
}

pub fn render_time_trend(
    period: TrendPeriod,
    trend: &[(NaiveDate, Decimal)],
    path: &Path,
) -> Result<()> {
    let labels: Vec<String> = trend
        .iter()
        .map(|(bucket, _)| bucket.format("%Y-%m-%d").to_string())
        .collect();
    let panel = LinePanel {
        title: format!("{} Time Tracked Over Period", period.label()),
        y_desc: "Total Duration (hours)".to_string(),
        color: TEAL,
        points: trend.iter().map(|(_, hours)| to_f64(*hours)).collect(),
    };
    let x_desc = match period {
        TrendPeriod::Daily => "Date",
        TrendPeriod::Weekly => "Period Start Date",
    };

    draw_line_panels(&[panel], &labels, x_desc, (1200, 600), path)
        .map_err(|e| chart_error(path, e))?;
    debug!(path = %path.display(), buckets = trend.len(), "Saved time trend chart");
    Ok(())
}

pub fn output_path(dir: &Path, file_name: &str) -> PathBuf {
    dir.join(file_name)
}

/// Charts of one run, rendered to hidden sibling files and moved into place
/// only once every render succeeded. Anything still staged is removed on drop.
#[derive(Debug, Default)]
pub struct StagedCharts {
    // (staging file, final file)
    staged: Vec<(PathBuf, PathBuf)>,
}

impl StagedCharts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reserves `path` and returns the file to render into instead.
    pub fn stage(&mut self, path: PathBuf) -> PathBuf {
        let staging = staging_path(&path);
        self.staged.push((staging.clone(), path));
        staging
    }

    /// Moves every staged chart to its final name, in staging order.
    pub fn commit(mut self) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        while !self.staged.is_empty() {
            let (staging, path) = &self.staged[0];
            fs::rename(staging, path).map_err(|e| AnalyzerError::Chart {
                path: path.clone(),
                message: e.to_string(),
            })?;
            let (_, path) = self.staged.remove(0);
            written.push(path);
        }
        Ok(written)
    }
}

impl Drop for StagedCharts {
    fn drop(&mut self) {
        for (staging, _) in &self.staged {
            match fs::remove_file(staging) {
                Ok(()) => debug!(path = %staging.display(), "Removed unfinished chart"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!("Could not remove '{}': {}", staging.display(), e),
            }
        }
    }
}

/// `dir/.name.partial.png` for `dir/name.png`; the extension picks the encoder.
fn staging_path(path: &Path) -> PathBuf {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{}.partial.png", name))
}

fn draw_bar_chart(chart: &BarChart, path: &Path) -> DrawResult {
    let root = BitMapBackend::new(path, (1000, 700)).into_drawing_area();
    root.fill(&WHITE)?;

    let names: Vec<&str> = chart.bars.iter().map(|(name, _)| name.as_str()).collect();
    let values: Vec<f64> = chart.bars.iter().map(|(_, v)| to_f64(*v)).collect();
    let (low, high) = value_range(&values, true);

    let mut ctx = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 28))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d((0..names.len() as i32).into_segmented(), low..high)?;

    ctx.configure_mesh()
        .disable_x_mesh()
        .x_desc(chart.x_desc.as_str())
        .y_desc(chart.y_desc.as_str())
        .x_labels(names.len().max(1))
        .x_label_formatter(&|value| match value {
            SegmentValue::CenterOf(idx) => names
                .get(*idx as usize)
                .map(|name| name.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    ctx.draw_series(
        Histogram::vertical(&ctx)
            .style(chart.color.filled())
            .margin(8)
            .data(values.iter().enumerate().map(|(idx, v)| (idx as i32, *v))),
    )?;

    root.present()?;
    Ok(())
}

fn draw_line_panels(
    panels: &[LinePanel],
    labels: &[String],
    x_desc: &str,
    size: (u32, u32),
    path: &Path,
) -> DrawResult {
    let root = BitMapBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE)?;

    let areas = root.split_evenly((panels.len(), 1));
    let x_range = -0.5f64..(labels.len() as f64 - 0.5).max(0.5);
    let label_count = labels.len().clamp(1, 12);

    for (panel, area) in panels.iter().zip(areas.iter()) {
        let (low, high) = value_range(&panel.points, false);
        let mut ctx = ChartBuilder::on(area)
            .caption(&panel.title, ("sans-serif", 22))
            .margin(10)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(x_range.clone(), low..high)?;

        ctx.configure_mesh()
            .x_desc(x_desc)
            .y_desc(panel.y_desc.as_str())
            .x_labels(label_count)
            .x_label_formatter(&|x| bucket_label(labels, *x))
            .draw()?;

        let points: Vec<(f64, f64)> = panel
            .points
            .iter()
            .enumerate()
            .map(|(idx, y)| (idx as f64, *y))
            .collect();
        let color = panel.color;
        ctx.draw_series(LineSeries::new(points.clone(), &color))?
            .label(panel.title.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
        ctx.draw_series(
            points
                .iter()
                .map(|point| Circle::new(*point, 4, color.filled())),
        )?;
        ctx.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Label for an integral x position; fractional ticks stay blank.
fn bucket_label(labels: &[String], x: f64) -> String {
    let rounded = x.round();
    if (x - rounded).abs() > 1e-6 || rounded < 0.0 {
        return String::new();
    }
    labels.get(rounded as usize).cloned().unwrap_or_default()
}

/// Y range covering every value, padded so flat series still have height.
fn value_range(values: &[f64], from_zero: bool) -> (f64, f64) {
    let max = values.iter().copied().fold(f64::MIN, f64::max);
    let min = values.iter().copied().fold(f64::MAX, f64::min);
    if values.is_empty() {
        return (0.0, 1.0);
    }

    let (low, high) = if from_zero {
        (min.min(0.0), max.max(0.0))
    } else {
        (min, max)
    };
    let pad = ((high - low) * 0.1).max(1.0);
    let low = if from_zero && low >= 0.0 { 0.0 } else { low - pad };
    (low, high + pad)
}

fn to_f64(value: Decimal) -> f64 {
    value.to_f64().unwrap_or(0.0)
}

fn chart_error(path: &Path, error: Box<dyn std::error::Error>) -> AnalyzerError {
    AnalyzerError::Chart {
        path: path.to_path_buf(),
        message: error.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_file_names_depend_on_group_and_period() {
        let daily = chart_file_names("Project", TrendPeriod::Daily);
        assert_eq!(daily.allocation, "time_allocation_by_project.png");
        assert_eq!(daily.trend, "daily_time_trend.png");

        let weekly = chart_file_names("Client Name", TrendPeriod::Weekly);
        assert_eq!(weekly.allocation, "time_allocation_by_client_name.png");
        assert_eq!(weekly.trend, "weekly_time_trend.png");
        assert_ne!(daily, weekly);
    }

    #[test]
    fn test_chart_file_names_are_deterministic() {
        assert_eq!(
            chart_file_names("Task", TrendPeriod::Weekly),
            chart_file_names("Task", TrendPeriod::Weekly)
        );
    }

    #[test]
    fn test_staging_path_keeps_directory_and_png_extension() {
        let staging = staging_path(Path::new("out/monthly_trends.png"));
        assert_eq!(staging, Path::new("out/.monthly_trends.partial.png"));
    }

    #[test]
    fn test_uncommitted_charts_are_removed() {
        let out = tempfile::TempDir::new().unwrap();
        {
            let mut staged = StagedCharts::new();
            let first = staged.stage(output_path(out.path(), SPENDING_CHART));
            fs::write(&first, b"png").unwrap();
            // second render never produced a file
            staged.stage(output_path(out.path(), MONTHLY_CHART));
        }
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_commit_moves_charts_into_place() {
        let out = tempfile::TempDir::new().unwrap();
        let mut staged = StagedCharts::new();
        for name in [SPENDING_CHART, MONTHLY_CHART] {
            let staging = staged.stage(output_path(out.path(), name));
            fs::write(&staging, b"png").unwrap();
        }

        let written = staged.commit().unwrap();
        assert_eq!(
            written,
            vec![
                out.path().join(SPENDING_CHART),
                out.path().join(MONTHLY_CHART),
            ]
        );
        let mut names: Vec<String> = fs::read_dir(out.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![MONTHLY_CHART.to_string(), SPENDING_CHART.to_string()]);
    }

    #[test]
    fn test_commit_fails_when_a_render_is_missing() {
        let out = tempfile::TempDir::new().unwrap();
        let mut staged = StagedCharts::new();
        staged.stage(output_path(out.path(), SPENDING_CHART));

        assert!(matches!(staged.commit(), Err(AnalyzerError::Chart { .. })));
        assert!(fs::read_dir(out.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_bucket_label() {
        let labels = vec!["2024-01".to_string(), "2024-02".to_string()];
        assert_eq!(bucket_label(&labels, 0.0), "2024-01");
        assert_eq!(bucket_label(&labels, 1.0), "2024-02");
        assert_eq!(bucket_label(&labels, 0.5), "");
        assert_eq!(bucket_label(&labels, -1.0), "");
        assert_eq!(bucket_label(&labels, 5.0), "");
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range(&[], true), (0.0, 1.0));

        let (low, high) = value_range(&[10.0, 50.0], true);
        assert_eq!(low, 0.0);
        assert!(high > 50.0);

        let (low, high) = value_range(&[-30.0, 1950.0], false);
        assert!(low < -30.0);
        assert!(high > 1950.0);

        let (low, high) = value_range(&[5.0, 5.0], false);
        assert!(low < 5.0 && high > 5.0);
    }

    #[test]
    fn test_spending_title_marks_inference() {
        let bars = vec![("Dining".to_string(), Decimal::from(12))];
        assert_eq!(BarChart::spending(&bars, true).title, "Spending by Inferred Category");
        assert_eq!(BarChart::spending(&bars, false).title, "Spending by Category");
        assert_eq!(
            BarChart::time_allocation("Task", &bars).title,
            "Time Allocation by Task"
        );
    }
}
