//! Generate a default calibration configuration file
//!
//! Creates a JSON config with all default parameters

use hsv_calibration::CalibrationConfig;
use std::{env, path::Path, process};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <output_config.json>", args[0]);
        eprintln!();
        eprintln!("Example:");
        eprintln!("  {} calibration.json", args[0]);
        process::exit(1);
    }

    let output_path = Path::new(&args[1]);

    if let Some(parent) = output_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Error creating directory: {}", e);
            process::exit(1);
        }
    }

    let config = CalibrationConfig::default();

    match config.to_json_file(output_path) {
        Ok(()) => {
            eprintln!("Configuration saved to {}", output_path.display());
            eprintln!();
            eprintln!("Config summary:");
            eprintln!("  Standard deviations: {}", config.num_stddevs);
            eprintln!("  Storage directory:   {}", config.storage_dir.display());
            eprintln!("  Region policy:       {:?}", config.region_policy);
        }
        Err(e) => {
            eprintln!("Error saving config: {}", e);
            process::exit(1);
        }
    }
}
