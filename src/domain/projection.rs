// Projection domain model - Render-ready views derived from a Summary
use super::equipment::Parameter;
use super::summary::Summary;
use serde::Serialize;

/// Angles are in degrees; a full pie covers `[0, FULL_TURN]`.
pub const FULL_TURN: f64 = 360.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageBar {
    pub parameter: Parameter,
    pub value: f64,
    /// Height relative to the tallest bar, 0-100.
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PieSegment {
    pub label: String,
    pub count: usize,
    pub start_angle: f64,
    pub end_angle: f64,
}

impl PieSegment {
    pub fn sweep(&self) -> f64 {
        self.end_angle - self.start_angle
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendRow {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DominantType {
    pub label: String,
    pub count: usize,
    pub percent: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ParameterValue {
    pub parameter: Parameter,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub dominant_type: Option<DominantType>,
    pub highest_average: ParameterValue,
    pub lowest_average: ParameterValue,
    pub distinct_types: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Projection {
    pub average_series: Vec<AverageBar>,
    pub segments: Vec<PieSegment>,
    pub legend: Vec<LegendRow>,
    pub insights: Insights,
}

impl Projection {
    pub fn from_summary(summary: &Summary) -> Self {
        Self {
            average_series: average_series(summary),
            segments: pie_segments(summary),
            legend: legend_rows(summary),
            insights: insights(summary),
        }
    }
}

fn average_series(summary: &Summary) -> Vec<AverageBar> {
    let max = summary
        .averages
        .iter()
        .map(|(_, v)| v)
        .fold(f64::NEG_INFINITY, f64::max);

    summary
        .averages
        .iter()
        .map(|(parameter, value)| {
            // Bars are scaled against the largest positive mean; negative means sit at zero.
            let percent = if max > 0.0 {
                let scaled = value * 100.0 / max;
                let scaled = if scaled.is_finite() { scaled } else { value / max * 100.0 };
                scaled.max(0.0)
            } else {
                0.0
            };
            AverageBar {
                parameter,
                value,
                percent,
            }
        })
        .collect()
}

fn pie_segments(summary: &Summary) -> Vec<PieSegment> {
    let total = summary.type_distribution.total();
    if total == 0 {
        return Vec::new();
    }

    let last = summary.type_distribution.len() - 1;
    let mut start = 0.0;
    summary
        .type_distribution
        .iter()
        .enumerate()
        .map(|(i, entry)| {
            // Pin the final edge so rounding never leaves a sliver uncovered.
            let end = if i == last {
                FULL_TURN
            } else {
                start + FULL_TURN * entry.count as f64 / total as f64
            };
            let segment = PieSegment {
                label: entry.label.clone(),
                count: entry.count,
                start_angle: start,
                end_angle: end,
            };
            start = end;
            segment
        })
        .collect()
}

fn legend_rows(summary: &Summary) -> Vec<LegendRow> {
    let total = summary.type_distribution.total();
    summary
        .type_distribution
        .iter()
        .map(|entry| LegendRow {
            label: entry.label.clone(),
            count: entry.count,
            percent: percent_of(entry.count, total),
        })
        .collect()
}

fn insights(summary: &Summary) -> Insights {
    let total = summary.type_distribution.total();

    let mut dominant: Option<DominantType> = None;
    for entry in summary.type_distribution.iter() {
        if dominant.as_ref().is_none_or(|d| entry.count > d.count) {
            dominant = Some(DominantType {
                label: entry.label.clone(),
                count: entry.count,
                percent: percent_of(entry.count, total),
            });
        }
    }

    let mut averages = summary.averages.iter();
    let (first_param, first_value) = averages
        .next()
        .unwrap_or((Parameter::Flowrate, 0.0));
    let mut highest = ParameterValue {
        parameter: first_param,
        value: first_value,
    };
    let mut lowest = highest;
    for (parameter, value) in averages {
        if value > highest.value {
            highest = ParameterValue { parameter, value };
        }
        if value < lowest.value {
            lowest = ParameterValue { parameter, value };
        }
    }

    Insights {
        dominant_type: dominant,
        highest_average: highest,
        lowest_average: lowest,
        distinct_types: summary.type_distribution.len(),
    }
}

fn percent_of(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        count as f64 * 100.0 / total as f64
    }
}
