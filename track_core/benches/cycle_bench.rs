use criterion::{black_box, criterion_group, criterion_main, Criterion};
use track_core::types::{MergeStatus, Report, SensorId, Vec3};
use track_core::{TrackManager, TrackManagerConfig};

fn make_report(i: usize, n: usize, t: f64) -> Report {
    let angle = i as f64 * std::f64::consts::TAU / n as f64;
    let r = 50_000.0_f64;
    let position = Vec3::new(r * angle.cos(), r * angle.sin(), 0.0);
    Report {
        sensor_id: SensorId(0),
        time: t,
        signal_to_noise_db: 20.0,
        azimuth_rad: angle,
        elevation_rad: 0.0,
        range_m: Some(r),
        position,
        velocity: Vec3::new(100.0 * angle.cos(), 100.0 * angle.sin(), 0.0),
        acceleration: Vec3::zeros(),
        merge_status: MergeStatus::NotMerged,
        truth_position: None,
        truth_velocity: None,
    }
}

fn bench_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("process_cycle");

    for n in [10, 50, 200] {
        group.bench_function(format!("{n}_reports"), |b| {
            b.iter(|| {
                let mgr = TrackManager::air(TrackManagerConfig {
                    max_tracks: 500,
                    queue_capacity: 512,
                    log_track_updates: false,
                    ..Default::default()
                })
                .unwrap();
                // Warm up with one cycle to establish tracks
                for i in 0..n {
                    mgr.new_report(make_report(i, n, 0.0), 20.0);
                }
                mgr.process(0.05);
                // Measure a full correlation cycle against existing tracks
                for i in 0..n {
                    mgr.new_report(make_report(i, n, 1.0), 20.0);
                }
                mgr.process(0.05);
                black_box(mgr.num_tracks());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_cycle);
criterion_main!(benches);
