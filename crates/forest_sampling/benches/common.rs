#![allow(dead_code)]

use std::time::Duration;

use criterion::{Criterion, Throughput};
use forest_sampling::design::Block;
use geo::{polygon, Polygon};

pub const SAMPLE_SIZE: usize = 20;
pub const WARM_UP: Duration = Duration::from_secs(1);
pub const MEASUREMENT_TIME: Duration = Duration::from_secs(2);

pub fn default_criterion() -> Criterion {
    Criterion::default()
        .configure_from_args()
        .sample_size(SAMPLE_SIZE)
        .warm_up_time(WARM_UP)
        .measurement_time(MEASUREMENT_TIME)
}

pub fn elements_throughput(elements: usize) -> Throughput {
    Throughput::Elements(elements.max(1) as u64)
}

/// Irregular, concave block roughly `size` meters across, offset to UTM-like coordinates.
pub fn irregular_block(origin_x: f64, size: f64) -> Polygon<f64> {
    let (x, y) = (origin_x, 6_200_000.0);
    polygon![
        (x: x, y: y),
        (x: x + size, y: y + 0.1 * size),
        (x: x + 0.9 * size, y: y + 0.6 * size),
        (x: x + 0.55 * size, y: y + 0.45 * size),
        (x: x + 0.6 * size, y: y + size),
        (x: x + 0.05 * size, y: y + 0.85 * size),
    ]
}

/// A row of `count` blocks with sizes cycling through small and large.
pub fn forest(count: usize) -> Vec<Block> {
    const SIZES: [f64; 4] = [80.0, 350.0, 900.0, 1_600.0];
    (0..count)
        .map(|i| {
            let size = SIZES[i % SIZES.len()];
            Block::new(
                format!("Block {}", i + 1),
                irregular_block(500_000.0 + i as f64 * 2_000.0, size),
            )
        })
        .collect()
}
