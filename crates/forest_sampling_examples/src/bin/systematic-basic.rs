use forest_sampling::prelude::*;
use forest_sampling_examples::{demo_forest, init_tracing, print_plots, print_summary};

fn main() -> anyhow::Result<()> {
    init_tracing();

    // Default design: systematic grid, 0.5 % intensity, 500 m² circular plots.
    let design = SamplingDesign::new(SamplingType::Systematic);
    let blocks = demo_forest();

    let result = generate(&design, &blocks, &GenerationConfig::new())?;
    print_summary(&result);

    println!("\nNorth Stand, first plots:");
    print_plots(&result, "North Stand", 5);

    Ok(())
}
