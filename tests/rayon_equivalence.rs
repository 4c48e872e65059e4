#![cfg(feature = "rayon")]

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use sparsify::{
    Array, Extrema1D, Extrema2D, ExtremaPoolIndices2D, SelectConfig, Selector, Shape,
    TopKAbsolutes1D,
};

fn random_array(seed: u64, shape: Shape) -> Array {
    let mut rng = StdRng::seed_from_u64(seed);
    let data = (0..shape.len())
        .map(|_| rng.random_range(-1.0f32..1.0))
        .collect();
    Array::from_vec(data, shape).unwrap()
}

fn assert_same<S: Selector>(seq: S, par: S, input: &Array) {
    let a = seq.select(input.view()).unwrap();
    let b = par.select(input.view()).unwrap();
    assert_eq!(a, b);
}

const PARALLEL: SelectConfig = SelectConfig { parallel: true };

#[test]
fn parallel_matches_sequential_extrema() {
    let signals = random_array(1, Shape::d1(32, 1, 256).unwrap());
    assert_same(
        Extrema1D::new(5),
        Extrema1D::new(5).with_config(PARALLEL),
        &signals,
    );

    let images = random_array(2, Shape::d2(12, 1, 40, 36).unwrap());
    assert_same(
        Extrema2D::new((3, 4)),
        Extrema2D::new((3, 4)).with_config(PARALLEL),
        &images,
    );
}

#[test]
fn parallel_matches_sequential_siblings() {
    let signals = random_array(3, Shape::d1(16, 2, 128).unwrap());
    assert_same(
        TopKAbsolutes1D::new(10),
        TopKAbsolutes1D::new(10).with_config(PARALLEL),
        &signals,
    );

    let images = random_array(4, Shape::d2(8, 3, 16, 16).unwrap());
    assert_same(
        ExtremaPoolIndices2D::new((4, 4)),
        ExtremaPoolIndices2D::new((4, 4)).with_config(PARALLEL),
        &images,
    );
}
