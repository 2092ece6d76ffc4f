//! Display adapter
//!
//! Maps a window snapshot to chart coordinates. Pure and stateless: the same
//! snapshot and axis policy always produce the same series.

use crate::constants::PLOT_Y_PADDING;
use crate::window::WindowSnapshot;
use serde::{Deserialize, Serialize};

/// X-axis policy of a chart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum XAxis {
    /// Sample index in arrival order (0 = oldest)
    #[serde(rename = "index")]
    ArrivalOrder,
    /// Capture time in seconds relative to the newest sample
    #[default]
    #[serde(rename = "time")]
    CaptureTime,
}

/// Plot-ready points with axis bounds
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub points: Vec<(f64, f64)>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

impl Series {
    pub fn from_snapshot(snapshot: &WindowSnapshot, axis: XAxis) -> Self {
        let mapped: Vec<(f64, f64)> = match axis {
            XAxis::ArrivalOrder => snapshot
                .samples()
                .iter()
                .enumerate()
                .map(|(i, s)| (i as f64, s.value))
                .collect(),
            XAxis::CaptureTime => match snapshot.newest() {
                Some(newest) => {
                    let origin = newest.captured_at;
                    snapshot
                        .samples()
                        .iter()
                        .map(|s| {
                            let offset = s.captured_at - origin;
                            (offset.num_milliseconds() as f64 / 1000.0, s.value)
                        })
                        .collect()
                }
                None => Vec::new(),
            },
        };
        // Non-finite values stay in the window but cannot be drawn
        let points: Vec<(f64, f64)> = mapped.into_iter().filter(|(_, y)| y.is_finite()).collect();

        let x_bounds = match axis {
            XAxis::ArrivalOrder => [0.0, snapshot.capacity().saturating_sub(1).max(1) as f64],
            XAxis::CaptureTime => {
                let oldest = points.first().map(|(x, _)| *x).unwrap_or(0.0);
                [oldest.min(-1.0), 0.0]
            }
        };

        Self {
            y_bounds: y_bounds(&points),
            points,
            x_bounds,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Axis labels: lower bound, midpoint, upper bound
    pub fn y_labels(&self) -> [String; 3] {
        let [lo, hi] = self.y_bounds;
        [
            format!("{:.0}", lo),
            format!("{:.0}", (lo + hi) / 2.0),
            format!("{:.0}", hi),
        ]
    }
}

fn y_bounds(points: &[(f64, f64)]) -> [f64; 2] {
    let mut iter = points.iter().map(|(_, y)| *y);
    let Some(first) = iter.next() else {
        return [0.0, 1.0];
    };
    let (min, max) = iter.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y)));

    if max - min <= f64::EPSILON {
        return [min - 1.0, max + 1.0];
    }
    let pad = (max - min) * PLOT_Y_PADDING;
    [min - pad, max + pad]
}
