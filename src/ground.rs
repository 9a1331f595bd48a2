use crate::error::{LocomotionError, LocomotionResult};
use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Terrain height source
pub trait GroundQuery {
    /// Ground height under world `(x, y)`, `None` when there is no terrain there
    fn query_height(&self, x: f32, y: f32) -> Option<f32>;
}

impl<F> GroundQuery for F
where
    F: Fn(f32, f32) -> Option<f32>,
{
    fn query_height(&self, x: f32, y: f32) -> Option<f32> {
        self(x, y)
    }
}

/// Infinite plane at a fixed height
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FlatGround {
    pub height: f32,
}

impl FlatGround {
    pub fn new(height: f32) -> Self {
        Self { height }
    }
}

impl GroundQuery for FlatGround {
    fn query_height(&self, _x: f32, _y: f32) -> Option<f32> {
        Some(self.height)
    }
}

/// Regular grid of heights sampled with bilinear interpolation.
///
/// `heights` is row major, rows run along world y and columns along world x.
/// Points outside the grid have no terrain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightMap {
    origin: Point2<f32>,
    cell_size: f32,
    columns: usize,
    heights: Vec<f32>,
}

impl HeightMap {
    pub fn new(
        origin: Point2<f32>,
        cell_size: f32,
        columns: usize,
        heights: Vec<f32>,
    ) -> LocomotionResult<Self> {
        let map = Self {
            origin,
            cell_size,
            columns,
            heights,
        };
        map.validate()?;
        Ok(map)
    }

    /// Load from yaml or json, picked by extension
    pub fn load(path: &Path) -> LocomotionResult<Self> {
        let text = fs::read_to_string(path)?;
        let map: HeightMap = match path.extension().and_then(|extension| extension.to_str()) {
            Some("json") => serde_json::from_str(&text)
                .map_err(|error| LocomotionError::InvalidHeightMap(error.to_string()))?,
            _ => serde_yaml::from_str(&text)?,
        };
        map.validate()?;
        Ok(map)
    }

    pub fn validate(&self) -> LocomotionResult<()> {
        if !(self.cell_size > 0.0 && self.cell_size.is_finite()) {
            return Err(LocomotionError::InvalidSetting {
                name: "cell_size",
                value: self.cell_size,
            });
        }
        if self.columns < 2 {
            return Err(LocomotionError::InvalidHeightMap(format!(
                "need at least 2 columns, got {}",
                self.columns
            )));
        }
        if self.heights.len() % self.columns != 0 || self.rows() < 2 {
            return Err(LocomotionError::InvalidHeightMap(format!(
                "{} samples don't fill rows of {} with at least 2 rows",
                self.heights.len(),
                self.columns
            )));
        }
        if let Some(index) = self.heights.iter().position(|height| !height.is_finite()) {
            return Err(LocomotionError::InvalidHeightMap(format!(
                "sample {} is not finite",
                index
            )));
        }
        Ok(())
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn rows(&self) -> usize {
        self.heights.len() / self.columns
    }

    fn sample(&self, column: usize, row: usize) -> f32 {
        self.heights[row * self.columns + column]
    }

    /// Cell index and position inside the cell along one axis
    fn locate(&self, offset: f32, samples: usize) -> Option<(usize, f32)> {
        let grid = offset / self.cell_size;
        let last = (samples - 1) as f32;
        if !(grid >= 0.0 && grid <= last) {
            return None;
        }
        let cell = (grid.floor() as usize).min(samples - 2);
        Some((cell, grid - cell as f32))
    }
}

impl GroundQuery for HeightMap {
    fn query_height(&self, x: f32, y: f32) -> Option<f32> {
        let (column, along_x) = self.locate(x - self.origin.x, self.columns)?;
        let (row, along_y) = self.locate(y - self.origin.y, self.rows())?;
        let near =
            self.sample(column, row) * (1.0 - along_x) + self.sample(column + 1, row) * along_x;
        let far = self.sample(column, row + 1) * (1.0 - along_x)
            + self.sample(column + 1, row + 1) * along_x;
        Some(near * (1.0 - along_y) + far * along_y)
    }
}
