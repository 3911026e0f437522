use serde::{Deserialize, Serialize};

use crate::engine::geodesy::distance;
use crate::engine::models::{Coordinate, GridPoint};
use crate::engine::projection::{project_track, ProjectionContext};

/// Polyline of the positions a vessel has reported.
///
/// With a point limit the oldest points are dropped once it is exceeded; the
/// distance of the dropped legs is kept so [`Track::total_distance`] still
/// covers the whole run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Track {
    points: Vec<Coordinate>,
    max_points: Option<usize>,
    /// Meters sailed along legs no longer held in `points`
    trimmed_distance: f64,
}

impl Track {
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty track keeping at most `max_points` points (never fewer than two).
    pub fn with_limit(max_points: usize) -> Self {
        Self {
            max_points: Some(max_points.max(2)),
            ..Self::default()
        }
    }

    pub fn starting_at(position: Coordinate) -> Self {
        Self {
            points: vec![position],
            ..Self::default()
        }
    }

    pub fn push(&mut self, position: Coordinate) {
        self.points.push(position);

        if let Some(max_points) = self.max_points {
            if self.points.len() > max_points {
                let excess = self.points.len() - max_points;
                self.trimmed_distance += self.points[..=excess]
                    .windows(2)
                    .map(|leg| distance(&leg[0], &leg[1]))
                    .sum::<f64>();
                self.points.drain(..excess);
            }
        }
    }

    pub fn max_points(&self) -> Option<usize> {
        self.max_points
    }

    pub fn points(&self) -> &[Coordinate] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn last(&self) -> Option<&Coordinate> {
        self.points.last()
    }

    pub fn clear(&mut self) {
        self.points.clear();
        self.trimmed_distance = 0.0;
    }

    /// Distance sailed along the track in meters (sum of haversine legs),
    /// including legs already dropped by the point limit.
    pub fn total_distance(&self) -> f64 {
        self.trimmed_distance + self.points.windows(2).map(|leg| distance(&leg[0], &leg[1])).sum::<f64>()
    }

    pub fn to_line_string(&self) -> geo::LineString<f64> {
        self.points.iter().map(|c| (c.long, c.lat)).collect()
    }

    /// Pixel polyline for drawing the track on the grid.
    pub fn project(&self, ctx: &ProjectionContext) -> Vec<GridPoint> {
        project_track(&self.points, ctx)
    }
}
