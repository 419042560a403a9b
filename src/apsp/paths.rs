//! Path reconstruction from a Floyd-Warshall predecessor matrix.

use crate::apsp::floyd_warshall::NO_PRED;
use crate::apsp::matrix::SquareMatrix;
use rayon::prelude::*;

/// Reconstruct the `source -> target` node sequence, both endpoints
/// included. Returns the singleton path for `source == target` and an empty
/// sequence when the target is unreachable.
pub(crate) fn construct_path(
    pred: &SquareMatrix<usize>,
    source: usize,
    target: usize,
    marks: &[String],
) -> Vec<String> {
    if source == target {
        return vec![marks[source].clone()];
    }
    if pred.get(source, target) == NO_PRED {
        return Vec::new();
    }
    // Walk predecessors back from the target, then flip.
    let mut rev = vec![target];
    let mut curr = pred.get(source, target);
    while curr != source {
        rev.push(curr);
        curr = pred.get(source, curr);
    }
    rev.push(source);
    rev.reverse();
    rev.into_iter().map(|i| marks[i].clone()).collect()
}

/// Paths from one source to every target, unreachable targets dropped.
fn construct_source_paths(
    pred: &SquareMatrix<usize>,
    source: usize,
    marks: &[String],
) -> Vec<(usize, Vec<String>)> {
    (0..marks.len())
        .filter_map(|target| {
            let path = construct_path(pred, source, target, marks);
            (!path.is_empty()).then_some((target, path))
        })
        .collect()
}

/// Per-source path tables for every node, indexed like `marks`. The
/// parallel variant fans the sources out across the rayon pool.
pub(crate) fn construct_all(
    pred: &SquareMatrix<usize>,
    marks: &[String],
    parallel: bool,
) -> Vec<Vec<(usize, Vec<String>)>> {
    if parallel {
        (0..marks.len())
            .into_par_iter()
            .map(|source| construct_source_paths(pred, source, marks))
            .collect()
    } else {
        (0..marks.len())
            .map(|source| construct_source_paths(pred, source, marks))
            .collect()
    }
}
