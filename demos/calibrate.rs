//! Build and save thresholds from an image and a JSON region file
//!
//! The region file maps label names to rectangles:
//! `{"red": [{"x": 10, "y": 20, "width": 16, "height": 16}]}`

use hsv_calibration::{
    calibrate, image_loader, CalibrationCondition, CalibrationConfig, LabelRegions, ThresholdStore,
};
use std::{env, fs, path::Path, process};

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = env::args().collect();

    let mut config_path = None;
    let mut positional = Vec::new();

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--config" => {
                i += 1;
                match args.get(i) {
                    Some(path) => config_path = Some(path.clone()),
                    None => {
                        eprintln!("Error: --config needs a path");
                        process::exit(1);
                    }
                }
            }
            "--help" | "-h" => {
                print_help(&args[0]);
                process::exit(0);
            }
            arg if !arg.starts_with("--") => positional.push(arg.to_string()),
            _ => {
                eprintln!("Unknown option: {}", args[i]);
                eprintln!("Use --help for usage information");
                process::exit(1);
            }
        }
        i += 1;
    }

    let [image_path, regions_path, condition] = match <[String; 3]>::try_from(positional) {
        Ok(p) => p,
        Err(_) => {
            print_help(&args[0]);
            process::exit(1);
        }
    };

    let config = match config_path {
        Some(path) => CalibrationConfig::from_json_file(Path::new(&path)).unwrap_or_else(|e| fail(&e)),
        None => CalibrationConfig::default(),
    };

    let condition: CalibrationCondition = condition.parse().unwrap_or_else(|e| fail(&e));
    let image = image_loader::load_hsv(Path::new(&image_path)).unwrap_or_else(|e| fail(&e));

    let regions: LabelRegions = match fs::read_to_string(&regions_path)
        .map_err(|e| e.to_string())
        .and_then(|s| serde_json::from_str(&s).map_err(|e| e.to_string()))
    {
        Ok(regions) => regions,
        Err(e) => {
            eprintln!("Error reading regions from {}: {}", regions_path, e);
            process::exit(1);
        }
    };

    let document = calibrate(&image, &regions, &config).unwrap_or_else(|e| fail(&e));
    let path = ThresholdStore::from_config(&config)
        .save(condition, &document)
        .unwrap_or_else(|e| fail(&e));

    println!("{} calibration saved to {}", condition, path.display());
    for range in document.ranges() {
        println!(
            "  h {:>3}-{:<3}  s {:>3}-{:<3}  v {:>3}-{:<3}",
            range.mins.h, range.maxs.h, range.mins.s, range.maxs.s, range.mins.v, range.maxs.v
        );
    }
}

fn fail(err: &hsv_calibration::CalibrationError) -> ! {
    eprintln!("Error: {}", err);
    eprintln!("{}", err.user_message());
    process::exit(1);
}

fn print_help(program: &str) {
    eprintln!("Usage: {} [--config <config.json>] <image> <regions.json> <sunny|cloudy|overcast>", program);
    eprintln!();
    eprintln!("Computes mean +/- k*stddev HSV thresholds for every labeled color");
    eprintln!("and writes them to <storage_dir>/<condition>.yml.");
}
