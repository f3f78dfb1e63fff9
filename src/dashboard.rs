//! Four-panel performance dashboard.
//!
//! [`DashboardData`] is built from nothing but the summary table and the
//! subject statistics; [`render_svg`] draws it with `plotters`:
//! average per student (bar), grade distribution (pie), mean per subject
//! (line), and attendance against average (scatter).

use std::path::Path;

use anyhow::{Result, bail};
use plotters::element::Pie;
use plotters::prelude::*;
use tracing::{info, warn};

use crate::analyzers::grade::GradeScale;
use crate::analyzers::types::{SubjectStatistics, SummaryRow};

const WIDTH: u32 = 1400;
const HEIGHT: u32 = 1000;
const PALETTE: [RGBColor; 6] = [BLUE, GREEN, CYAN, MAGENTA, RED, YELLOW];

/// The data behind each panel, already computed.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardData {
    /// (student name, average)
    pub averages: Vec<(String, f64)>,
    /// (grade letter, student count), best grade first
    pub grades: Vec<(String, usize)>,
    /// (subject, mean mark)
    pub subject_means: Vec<(String, f64)>,
    /// (attendance %, average) for students with known attendance
    pub attendance: Vec<(f64, f64)>,
}

impl DashboardData {
    pub fn new(summary: &[SummaryRow], subjects: &[SubjectStatistics], scale: &GradeScale) -> Self {
        Self {
            averages: summary.iter().map(|r| (r.name.clone(), r.average)).collect(),
            grades: scale.distribution(summary.iter().map(|r| r.grade.as_str())),
            subject_means: subjects.iter().map(|s| (s.subject.clone(), s.mean)).collect(),
            attendance: summary
                .iter()
                .filter_map(|r| r.attendance.map(|a| (a, r.average)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.averages.is_empty()
    }
}

/// Draws the dashboard to an SVG file at `path`.
///
/// # Errors
///
/// Refuses an empty dashboard, and fails if the file cannot be written.
pub fn render_svg(path: &Path, data: &DashboardData) -> Result<()> {
    if data.is_empty() {
        warn!("No summary data to plot");
        bail!("no summary data to plot");
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let root = SVGBackend::new(path, (WIDTH, HEIGHT)).into_drawing_area();
    root.fill(&WHITE)?;
    let root = root.titled("Student Performance Dashboard", ("sans-serif", 28))?;
    let panels = root.split_evenly((2, 2));

    draw_averages(&panels[0], data)?;
    draw_grades(&panels[1], data)?;
    draw_subject_means(&panels[2], data)?;
    draw_attendance(&panels[3], data)?;

    root.present()?;
    info!(path = %path.display(), "Dashboard saved");
    Ok(())
}

type Panel<'a> = DrawingArea<SVGBackend<'a>, plotters::coord::Shift>;

fn label_at(labels: &[String], x: f64) -> String {
    let idx = x.round();
    if idx < 0.0 || (x - idx).abs() > 0.01 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

fn draw_averages(area: &Panel, data: &DashboardData) -> Result<()> {
    let names: Vec<String> = data.averages.iter().map(|(n, _)| n.clone()).collect();
    let n = names.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Average Marks by Student", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..100f64)?;

    let formatter = |x: &f64| label_at(&names, *x);
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(names.len())
        .x_label_formatter(&formatter)
        .y_desc("Average Marks")
        .draw()?;

    chart.draw_series(data.averages.iter().enumerate().map(|(i, (_, avg))| {
        let x = i as f64;
        Rectangle::new([(x - 0.35, 0.0), (x + 0.35, *avg)], BLUE.filled())
    }))?;
    Ok(())
}

fn draw_grades(area: &Panel, data: &DashboardData) -> Result<()> {
    let area = area.titled("Grade Distribution", ("sans-serif", 20))?;
    if data.grades.is_empty() {
        return Ok(());
    }

    let (w, h) = area.dim_in_pixel();
    let center = (w as i32 / 2, h as i32 / 2);
    let radius = (w.min(h) as f64) * 0.35;
    let sizes: Vec<f64> = data.grades.iter().map(|(_, c)| *c as f64).collect();
    let colors: Vec<RGBColor> = (0..sizes.len()).map(|i| PALETTE[i % PALETTE.len()]).collect();
    let total: f64 = sizes.iter().sum();
    let labels: Vec<String> = data
        .grades
        .iter()
        .map(|(g, c)| format!("{g} ({:.1}%)", *c as f64 / total * 100.0))
        .collect();

    let pie = Pie::new(&center, &radius, &sizes, &colors, &labels);
    area.draw(&pie)?;
    Ok(())
}

fn draw_subject_means(area: &Panel, data: &DashboardData) -> Result<()> {
    let subjects: Vec<String> = data.subject_means.iter().map(|(s, _)| s.clone()).collect();
    let n = subjects.len().max(1) as f64;

    let mut chart = ChartBuilder::on(area)
        .caption("Subject-wise Average Marks", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(-0.5f64..(n - 0.5), 0f64..100f64)?;

    let formatter = |x: &f64| label_at(&subjects, *x);
    chart
        .configure_mesh()
        .x_labels(subjects.len().max(1))
        .x_label_formatter(&formatter)
        .y_desc("Average Marks")
        .draw()?;

    let points: Vec<(f64, f64)> = data
        .subject_means
        .iter()
        .enumerate()
        .map(|(i, (_, mean))| (i as f64, *mean))
        .collect();

    chart.draw_series(LineSeries::new(points.clone(), &RED))?;
    chart.draw_series(PointSeries::of_element(points, 4, &RED, &|c, s, st| {
        EmptyElement::at(c) + Circle::new((0, 0), s, st.filled())
    }))?;
    Ok(())
}

fn draw_attendance(area: &Panel, data: &DashboardData) -> Result<()> {
    let mut chart = ChartBuilder::on(area)
        .caption("Attendance vs Average Marks", ("sans-serif", 20))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(0f64..100f64, 0f64..100f64)?;

    chart
        .configure_mesh()
        .x_desc("Attendance (%)")
        .y_desc("Average Marks")
        .draw()?;

    chart.draw_series(
        data.attendance
            .iter()
            .map(|&(att, avg)| Circle::new((att, avg), 5, GREEN.filled())),
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzers::types::Marks;

    fn row(name: &str, average: f64, grade: &str, attendance: Option<f64>) -> SummaryRow {
        SummaryRow {
            roll_no: name.to_lowercase(),
            name: name.into(),
            gender: None,
            attendance,
            marks: Marks::default(),
            total: average,
            average,
            grade: grade.into(),
        }
    }

    fn stats(subject: &str, mean: f64) -> SubjectStatistics {
        SubjectStatistics {
            subject: subject.into(),
            count: 2,
            mean,
            min: mean,
            max: mean,
            std_dev: Some(0.0),
        }
    }

    #[test]
    fn test_data_from_summary_and_stats() {
        let summary = vec![
            row("Aman", 77.0, "B", Some(92.0)),
            row("Nisha", 88.0, "A", None),
            row("Priya", 95.67, "A+", Some(98.0)),
            row("Ravi", 73.0, "B", Some(68.0)),
        ];
        let subjects = vec![stats("Chemistry", 78.25), stats("Math", 79.0)];
        let data = DashboardData::new(&summary, &subjects, &GradeScale::default());

        assert_eq!(data.averages.len(), 4);
        assert_eq!(data.averages[2], ("Priya".to_string(), 95.67));
        assert_eq!(
            data.grades,
            vec![("A+".to_string(), 1), ("A".to_string(), 1), ("B".to_string(), 2)]
        );
        assert_eq!(data.subject_means[1], ("Math".to_string(), 79.0));
        assert_eq!(data.attendance, vec![(92.0, 77.0), (98.0, 95.67), (68.0, 73.0)]);
    }

    #[test]
    fn test_empty_summary_is_not_rendered() {
        let data = DashboardData::new(&[], &[], &GradeScale::default());
        assert!(data.is_empty());

        let path = std::env::temp_dir().join("student_analyzer_test_empty_dashboard.svg");
        let _ = std::fs::remove_file(&path);
        assert!(render_svg(&path, &data).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_label_at_only_on_integer_ticks() {
        let labels = vec!["Math".to_string(), "Physics".to_string()];
        assert_eq!(label_at(&labels, 1.0), "Physics");
        assert_eq!(label_at(&labels, 0.5), "");
        assert_eq!(label_at(&labels, -0.5), "");
        assert_eq!(label_at(&labels, 2.0), "");
    }
}
