use forest_sampling::prelude::*;
use forest_sampling_examples::{init_tracing, l_block};

// Mean distance from each plot to its nearest neighbour; higher means more even spread.
fn mean_nearest_neighbour(points: &[SamplePoint]) -> f64 {
    if points.len() < 2 {
        return 0.0;
    }
    let total: f64 = points
        .iter()
        .map(|p| {
            points
                .iter()
                .filter(|q| q.plot_number != p.plot_number)
                .map(|q| p.position.distance(q.position))
                .fold(f64::INFINITY, f64::min)
        })
        .sum();
    total / points.len() as f64
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let blocks = vec![l_block("Ridge", 0.0, 0.0, 1_200.0)];
    let params = SamplingParameters::default().with_intensity_percent(2.0);
    let config = GenerationConfig::new().with_seed(7);

    for sampling_type in [SamplingType::Random, SamplingType::Stratified] {
        let design = SamplingDesign::new(sampling_type).with_default_parameters(params.clone());
        let result = generate(&design, &blocks, &config)?;
        println!(
            "{:<11} {:>4} plots, mean nearest-neighbour distance {:>7.1} m",
            sampling_type,
            result.total_points,
            mean_nearest_neighbour(&result.points)
        );
    }

    Ok(())
}
