#![forbid(unsafe_code)]
//! Shared helpers for the forest_sampling demo binaries.
use forest_sampling::prelude::*;
use geo::{polygon, Polygon};

/// Installs a `fmt` subscriber filtered by `RUST_LOG`, defaulting to `info`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_target(false)
        .try_init();
}

/// Axis-aligned rectangular block with its lower-left corner at `(x, y)`.
pub fn rect_block(name: &str, x: f64, y: f64, width: f64, height: f64) -> Block {
    Block::new(
        name,
        polygon![
            (x: x, y: y),
            (x: x + width, y: y),
            (x: x + width, y: y + height),
            (x: x, y: y + height),
        ],
    )
}

/// L-shaped block, `size` meters along each outer edge.
pub fn l_block(name: &str, x: f64, y: f64, size: f64) -> Block {
    let half = size / 2.0;
    let poly: Polygon<f64> = polygon![
        (x: x, y: y),
        (x: x + size, y: y),
        (x: x + size, y: y + half),
        (x: x + half, y: y + half),
        (x: x + half, y: y + size),
        (x: x, y: y + size),
    ];
    Block::new(name, poly)
}

/// A small estate in UTM-like coordinates: one large, one medium and one
/// sub-hectare block.
pub fn demo_forest() -> Vec<Block> {
    vec![
        rect_block("North Stand", 500_000.0, 6_201_000.0, 1_500.0, 1_000.0),
        l_block("Creek Stand", 502_000.0, 6_201_000.0, 400.0),
        rect_block("Clearing Edge", 503_000.0, 6_201_000.0, 100.0, 50.0),
    ]
}

/// Prints the per-block table and design-wide totals.
pub fn print_summary(result: &DesignResult) {
    println!(
        "{:<16} {:>9} {:>11} {:>7} {:>7} {:>10} {:>9}",
        "block", "area ha", "type", "target", "plots", "min", "intensity"
    );
    for info in &result.blocks_info {
        println!(
            "{:<16} {:>9.2} {:>11} {:>7} {:>7} {:>10} {:>8.2}%{}",
            info.block,
            info.area_hectares,
            info.sampling_type,
            info.target,
            info.samples_generated,
            format!("{}{}", info.minimum, if info.minimum_enforced { "*" } else { "" }),
            info.actual_intensity_percent,
            if info.partial { "  (partial)" } else { "" },
        );
    }
    for failure in &result.failures {
        println!("{:<16} skipped: {}", failure.block, failure.error);
    }
    println!(
        "total: {} plots over {} blocks, {:.2} ha forest, {:.3} plots/ha, {:.2}% sampled (seed {})",
        result.total_points,
        result.total_blocks,
        result.forest_area_hectares,
        result.actual_intensity_per_hectare,
        result.sampling_percentage,
        result.seed
    );
}

/// Prints the first `limit` plots of a block.
pub fn print_plots(result: &DesignResult, block: &str, limit: usize) {
    for point in result.points_for_block(block).take(limit) {
        match point.geographic {
            Some(geo) => println!(
                "  #{:<4} {:>12.1} {:>12.1}  ({:.6}, {:.6})",
                point.plot_number, point.position.x, point.position.y, geo.lon, geo.lat
            ),
            None => println!(
                "  #{:<4} {:>12.1} {:>12.1}",
                point.plot_number, point.position.x, point.position.y
            ),
        }
    }
}
