//! Selector cases loaded from `tests/data/selector_cases.json`.
//!
//! Each case names an input array, one operation with its parameters, and
//! either the expected output or the expected error kind.

use serde::Deserialize;
use sparsify::{
    Array, Extrema1D, Extrema2D, ExtremaPoolIndices1D, ExtremaPoolIndices2D, PoolRemainder,
    Selector, Shape, SparsifyError, TopKAbsolutes1D, TopKAbsolutes2D,
};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone, Copy, Default)]
#[serde(rename_all = "snake_case")]
enum RemainderJson {
    #[default]
    Reject,
    Truncate,
    Partial,
}

impl From<RemainderJson> for PoolRemainder {
    fn from(value: RemainderJson) -> Self {
        match value {
            RemainderJson::Reject => PoolRemainder::Reject,
            RemainderJson::Truncate => PoolRemainder::Truncate,
            RemainderJson::Partial => PoolRemainder::Partial,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(tag = "kind")]
enum OpJson {
    #[serde(rename = "topk_absolutes_1d")]
    TopK1D { k: usize },
    #[serde(rename = "topk_absolutes_2d")]
    TopK2D { k: usize },
    #[serde(rename = "extrema_pool_indices_1d")]
    Pool1D {
        window: usize,
        #[serde(default)]
        remainder: RemainderJson,
    },
    #[serde(rename = "extrema_pool_indices_2d")]
    Pool2D {
        window: (usize, usize),
        #[serde(default)]
        remainder: RemainderJson,
    },
    #[serde(rename = "extrema_1d")]
    Extrema1D { min_distance: usize },
    #[serde(rename = "extrema_2d")]
    Extrema2D { min_distance: (usize, usize) },
}

impl OpJson {
    fn selector(&self) -> Box<dyn Selector> {
        match *self {
            Self::TopK1D { k } => Box::new(TopKAbsolutes1D::new(k)),
            Self::TopK2D { k } => Box::new(TopKAbsolutes2D::new(k)),
            Self::Pool1D { window, remainder } => {
                Box::new(ExtremaPoolIndices1D::new(window).with_remainder(remainder.into()))
            }
            Self::Pool2D { window, remainder } => {
                Box::new(ExtremaPoolIndices2D::new(window).with_remainder(remainder.into()))
            }
            Self::Extrema1D { min_distance } => Box::new(Extrema1D::new(min_distance)),
            Self::Extrema2D { min_distance } => Box::new(Extrema2D::new(min_distance)),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Case {
    name: String,
    shape: Vec<usize>,
    data: Vec<f32>,
    op: OpJson,
    #[serde(default)]
    expected: Option<Vec<f32>>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaseFile {
    cases: Vec<Case>,
}

fn error_kind(err: &SparsifyError) -> &'static str {
    match err {
        SparsifyError::InvalidArgument { .. } => "invalid_argument",
        SparsifyError::ShapeMismatch { .. } => "shape_mismatch",
        SparsifyError::InvalidDimensions { .. } => "invalid_dimensions",
        SparsifyError::BufferSizeMismatch { .. } => "buffer_size_mismatch",
        _ => "other",
    }
}

fn load_cases() -> Vec<Case> {
    let path = PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/data/selector_cases.json");
    let text = fs::read_to_string(&path)
        .unwrap_or_else(|err| panic!("failed to read {}: {err}", path.display()));
    let file: CaseFile = serde_json::from_str(&text).expect("invalid case file");
    file.cases
}

#[test]
fn selector_cases_match_fixture() {
    let cases = load_cases();
    assert!(!cases.is_empty(), "case file has no cases");

    for case in &cases {
        let shape = Shape::from_dims(&case.shape)
            .unwrap_or_else(|err| panic!("{}: bad shape: {err}", case.name));
        let input = Array::from_vec(case.data.clone(), shape)
            .unwrap_or_else(|err| panic!("{}: bad data: {err}", case.name));
        let result = case.op.selector().select(input.view());

        match (&case.expected, &case.error) {
            (Some(expected), None) => {
                let out = result.unwrap_or_else(|err| panic!("{}: {err}", case.name));
                assert_eq!(out.shape(), input.shape(), "{}", case.name);
                assert_eq!(out.as_slice(), expected.as_slice(), "{}", case.name);
            }
            (None, Some(kind)) => {
                let err = result.expect_err(&case.name);
                assert_eq!(error_kind(&err), kind, "{}: {err}", case.name);
            }
            _ => panic!("{}: set exactly one of `expected` or `error`", case.name),
        }
    }
}

#[test]
fn fixture_covers_every_selector_kind() {
    let cases = load_cases();
    let covered = |pred: fn(&OpJson) -> bool| cases.iter().any(|case| pred(&case.op));
    assert!(covered(|op| matches!(op, OpJson::TopK1D { .. })));
    assert!(covered(|op| matches!(op, OpJson::TopK2D { .. })));
    assert!(covered(|op| matches!(op, OpJson::Pool1D { .. })));
    assert!(covered(|op| matches!(op, OpJson::Pool2D { .. })));
    assert!(covered(|op| matches!(op, OpJson::Extrema1D { .. })));
    assert!(covered(|op| matches!(op, OpJson::Extrema2D { .. })));
}
