use criterion::{criterion_group, criterion_main, Criterion};
use hsv_calibration::{
    build_mask, calibrate, CalibrationConfig, HsvImage, Label, LabelRegions, Region,
};
use std::hint::black_box;

fn frame(width: u32, height: u32) -> HsvImage {
    HsvImage::from_fn(width, height, |x, y| {
        [((x / 8 + y / 8) % 180) as u8, (x % 256) as u8, (y % 256) as u8]
    })
}

fn benchmark_calibration(c: &mut Criterion) {
    let image = frame(640, 480);
    let mut regions = LabelRegions::new();
    for (i, label) in Label::ALL.into_iter().enumerate() {
        let offset = i as i32 * 90;
        regions.push(label, Region::new(offset, 40, 64, 64));
        regions.push(label, Region::new(offset + 16, 200, 48, 96));
    }
    let config = CalibrationConfig::default();

    c.bench_function("calibrate_640x480_six_labels", |b| {
        b.iter(|| calibrate(black_box(&image), black_box(&regions), &config))
    });

    let document = calibrate(&image, &regions, &config).expect("calibration");
    c.bench_function("build_mask_640x480", |b| {
        b.iter(|| build_mask(black_box(&image), black_box(&document)))
    });
}

criterion_group!(benches, benchmark_calibration);
criterion_main!(benches);
