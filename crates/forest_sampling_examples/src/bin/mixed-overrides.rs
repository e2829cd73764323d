use forest_sampling::prelude::*;
use forest_sampling_examples::{demo_forest, init_tracing, print_plots, print_summary};
use glam::DVec2;
use tracing::info;

// Rough inverse of a UTM zone 33N projection near 56°N; good enough for a demo.
fn to_wgs84(p: DVec2) -> Option<GeoCoord> {
    let lat = (p.y - 6_200_000.0) / 111_320.0 + 55.93;
    let lon = (p.x - 500_000.0) / (111_320.0 * lat.to_radians().cos()) + 15.0;
    Some(GeoCoord::new(lon, lat))
}

fn main() -> anyhow::Result<()> {
    init_tracing();

    let design = SamplingDesign::new(SamplingType::Systematic)
        .with_default_parameters(
            SamplingParameters::default()
                .with_intensity_percent(1.0)
                .with_boundary_buffer(15.0),
        )
        .with_plot(PlotShape::Circle { radius_m: 11.28 })
        .with_block_override(
            "Creek Stand",
            ParameterOverrides::new()
                .sampling_type(SamplingType::Random)
                .min_distance_meters(40.0),
        )
        .with_block_override(
            "Clearing Edge",
            ParameterOverrides::new()
                .sampling_type(SamplingType::Stratified)
                .boundary_buffer_meters(5.0)
                .min_samples_small(3),
        );

    let transform = to_wgs84;
    let generator = DesignGenerator::try_new(GenerationConfig::new().with_seed(2024))?
        .with_geographic(&transform);

    let mut sink = FnSink::new(|event| {
        if let DesignEvent::BlockSampled {
            info,
            first_plot_number: Some(first),
            ..
        } = event
        {
            info!(
                "{} plots from #{} in '{}'",
                info.samples_generated, first, info.block
            );
        }
    });
    let result = generator.run_with_events(&design, &demo_forest(), &mut sink)?;

    print_summary(&result);
    for block in ["Creek Stand", "Clearing Edge"] {
        println!("\n{block}:");
        print_plots(&result, block, 4);
    }
    for warning in &result.warnings {
        println!("warning: {warning}");
    }

    Ok(())
}
