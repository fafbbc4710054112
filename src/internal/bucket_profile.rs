//! Bucket-distribution profile of the hash strategies.
//!
//! Fills tables of increasing bucket estimate with the same random keys and
//! plots the longest chain against the estimate, once with primed bucket counts
//! and once with the estimate used as given.

use std::{error::Error, hash::BuildHasher, path::PathBuf};

use chaintable::{
    BucketStats, HashTable, Sizing,
    hashers::{ByteSumBuilder, DefaultHashBuilder, Fnv1aBuilder, IntMixBuilder},
    initialize_logger,
};
use clap::Parser;
use log::info;
use plotters::prelude::*;
use rand::Rng;

/// Profiles bucket distribution for every hash strategy
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Number of random keys inserted into every table
    #[arg(short, long, default_value_t = 2_000)]
    keys: usize,

    /// Largest bucket estimate tried
    #[arg(short, long, default_value_t = 400)]
    max_buckets: usize,

    /// Distance between consecutive bucket estimates
    #[arg(short, long, default_value_t = 8)]
    step: usize,

    /// Where the chart is written
    #[arg(short, long, default_value = "bucket_profile.png")]
    output: PathBuf,
}

/// Longest chain per bucket estimate for one strategy and sizing
#[derive(Debug)]
struct Series {
    /// Legend label
    label: String,
    /// Line color
    color: RGBColor,
    /// Primed series are drawn solid, exact ones faded
    sizing: Sizing,
    /// `(bucket estimate, longest chain)`
    points: Vec<(usize, usize)>,
}

/// Fills one table per estimate and records the longest chain
fn profile<H>(keys: &[u32], estimates: &[usize], sizing: Sizing) -> Vec<(usize, usize)>
where
    H: BuildHasher + Clone + Default,
{
    estimates
        .iter()
        .map(|&estimate| {
            let mut table: HashTable<u32, (), H> = HashTable::with_sizing(estimate, sizing);
            table.extend(keys.iter().map(|&key| (key, ())));
            let stats = BucketStats::of(&table);
            info!("{sizing:?} estimate {estimate}: {stats}");
            (estimate, stats.max_bucket_size)
        })
        .collect()
}

/// Both sizings of one strategy
fn series_for<H>(name: &str, color: RGBColor, keys: &[u32], estimates: &[usize]) -> [Series; 2]
where
    H: BuildHasher + Clone + Default,
{
    [Sizing::Primed, Sizing::Exact].map(|sizing| Series {
        label: format!("{name} ({sizing:?})"),
        color,
        sizing,
        points: profile::<H>(keys, estimates, sizing),
    })
}

fn main() -> Result<(), Box<dyn Error>> {
    initialize_logger();
    let args = Args::parse();

    let mut rng = rand::rng();
    let keys: Vec<u32> = (0..args.keys).map(|_| rng.random()).collect();
    let estimates: Vec<usize> =
        (args.step.max(2)..=args.max_buckets).step_by(args.step.max(1)).collect();
    println!("Profiling {} keys over {} bucket estimates", keys.len(), estimates.len());

    let series: Vec<Series> = [
        series_for::<DefaultHashBuilder>("SipHash", RGBColor(220, 50, 50), &keys, &estimates),
        series_for::<Fnv1aBuilder>("FNV-1a", RGBColor(50, 90, 220), &keys, &estimates),
        series_for::<ByteSumBuilder>("byte sum", RGBColor(50, 180, 50), &keys, &estimates),
        series_for::<IntMixBuilder>("int mix", RGBColor(180, 50, 180), &keys, &estimates),
    ]
    .into_iter()
    .flatten()
    .collect();

    for line in &series {
        let worst = line.points.iter().map(|&(_, longest)| longest).max().unwrap_or(0);
        println!("  {}: longest chain over all estimates = {worst}", line.label);
    }

    let y_max = series
        .iter()
        .flat_map(|line| line.points.iter().map(|&(_, longest)| longest))
        .max()
        .unwrap_or(0)
        .saturating_add(1);

    let root = BitMapBackend::new(&args.output, (1200, 800)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Longest chain by bucket estimate", ("sans-serif", 35))
        .margin(15)
        .x_label_area_size(60)
        .y_label_area_size(60)
        .build_cartesian_2d(0..args.max_buckets, 0..y_max)?;

    chart
        .configure_mesh()
        .x_desc("Bucket estimate")
        .y_desc("Longest chain (entries)")
        .axis_desc_style(("sans-serif", 16))
        .draw()?;

    for line in &series {
        let style = match line.sizing {
            Sizing::Primed => ShapeStyle::from(&line.color).stroke_width(2),
            Sizing::Exact => ShapeStyle::from(&line.color.mix(0.4)).stroke_width(1),
        };
        chart
            .draw_series(LineSeries::new(line.points.iter().copied(), style))?
            .label(line.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x.saturating_add(20), y)], style));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .position(SeriesLabelPosition::UpperRight)
        .draw()?;

    root.present()?;
    println!("Chart written to {}", args.output.display());
    Ok(())
}
