use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use super::error::IndexError;
use crate::embedding::utils::l2_normalize;

/// How vectors are compared; fixed when an index is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    /// `1 - cos(a, b)` over unit-length vectors.
    #[default]
    Cosine,
    /// Negated dot product over raw vectors.
    InnerProduct,
}

impl DistanceMetric {
    /// Applies the normalization convention of this metric.
    ///
    /// Index vectors and query vectors both pass through here.
    pub fn prepare(self, vector: Vec<f32>) -> Vec<f32> {
        match self {
            DistanceMetric::Cosine => l2_normalize(vector),
            DistanceMetric::InnerProduct => vector,
        }
    }

    /// Smaller is closer. Inputs must already be [`prepare`](Self::prepare)d.
    pub fn distance(self, a: &[f32], b: &[f32]) -> f32 {
        let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
        match self {
            DistanceMetric::Cosine => 1.0 - dot,
            DistanceMetric::InnerProduct => -dot,
        }
    }

    /// Maps a distance back to a similarity.
    ///
    /// Cosine gives `1 - distance`; inner product gives the raw dot product,
    /// which is only bounded when the embedder emits unit vectors.
    pub fn similarity(self, distance: f32) -> f32 {
        match self {
            DistanceMetric::Cosine => 1.0 - distance,
            DistanceMetric::InnerProduct => -distance,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::InnerProduct => "inner_product",
        }
    }
}

impl fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DistanceMetric {
    type Err = IndexError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cosine" => Ok(DistanceMetric::Cosine),
            "inner_product" | "ip" | "dot" => Ok(DistanceMetric::InnerProduct),
            other => Err(IndexError::UnknownMetric {
                value: other.to_string(),
            }),
        }
    }
}
