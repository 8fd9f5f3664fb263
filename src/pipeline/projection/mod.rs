
use serde::Serialize;

use super::Query;
use crate::chunking::Chunk;

/// A labelled point in embedding space, taken from the first three vector components
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbeddingPoint {
    pub id: String,
    pub name: String,
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub is_query: bool,
}

/// Collect plottable points for chunks and, optionally, the query.
///
/// Vectors with fewer than three components are skipped. Chunks are numbered
/// from 1 in the order they are plotted.
#[inline]
pub fn project_points(chunks: &[Chunk], query: Option<&Query>) -> Vec<EmbeddingPoint> {
    let mut points = chunks
        .iter()
        .filter_map(|chunk| Some((chunk, xyz(chunk.vector.as_deref()?)?)))
        .enumerate()
        .map(|(i, (chunk, (x, y, z)))| EmbeddingPoint {
            id: chunk.id.clone(),
            name: format!("Chunk {}", i + 1),
            text: chunk.text.clone(),
            x,
            y,
            z,
            is_query: false,
        })
        .collect::<Vec<_>>();

    if let Some((query, (x, y, z))) = query.and_then(|q| Some((q, xyz(&q.vector)?))) {
        points.push(EmbeddingPoint {
            id: "query".to_string(),
            name: "Query".to_string(),
            text: query.text.clone(),
            x,
            y,
            z,
            is_query: true,
        });
    }

    points
}

fn xyz(vector: &[f64]) -> Option<(f64, f64, f64)> {
    match vector {
        [x, y, z, ..] => Some((*x, *y, *z)),
        _ => None,
    }
}
