//! Rebuild a binary mask for an image from stored thresholds
//!
//! Several conditions can be combined (`sunny,cloudy`); a condition whose
//! file is missing or damaged contributes no thresholds.

use hsv_calibration::{
    build_mask, detection::mask::coverage, image_loader, CalibrationCondition, ThresholdStore,
};
use std::{env, path::Path, process};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <image> <condition[,condition...]> <mask.png> [storage_dir]", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} frame.png sunny,cloudy mask.png thresholds/", args[0]);
        process::exit(1);
    }

    let conditions: Vec<CalibrationCondition> = match args[2]
        .split(',')
        .map(str::parse::<CalibrationCondition>)
        .collect::<Result<Vec<_>, _>>()
    {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };
    let store = ThresholdStore::new(args.get(4).map(String::as_str).unwrap_or("."));

    let image = match image_loader::load_hsv(Path::new(&args[1])) {
        Ok(image) => image,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let document = store.load_merged(&conditions);
    let mask = build_mask(&image, &document);

    if let Err(e) = mask.save(&args[3]) {
        eprintln!("Error writing {}: {}", args[3], e);
        process::exit(1);
    }

    println!(
        "{} ranges, {:.1}% of pixels selected, mask written to {}",
        document.len(),
        coverage(&mask) * 100.0,
        args[3]
    );
}
