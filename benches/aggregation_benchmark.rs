use chrono::NaiveDate;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use airq_processor::analyzers::{level_shares_by_station, monthly_mean, wind_rose};
use airq_processor::models::{Metric, Observation, PollutantReadings, PollutionLevel};
use airq_processor::processors::Enricher;

// Synthetic hourly observations cycling through stations, wind labels, and
// pollutant bands
fn create_test_observations(station_count: usize, days: usize) -> Vec<Observation> {
    let labels = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];
    let base_date = NaiveDate::from_ymd_opt(2016, 1, 1).unwrap();
    let mut observations = Vec::new();

    for station_id in 0..station_count {
        for day in 0..days {
            for hour in (0..24).step_by(3) {
                let date = base_date + chrono::Duration::days(day as i64);
                let timestamp = match date.and_hms_opt(hour, 0, 0) {
                    Some(ts) => ts,
                    None => continue,
                };

                let mut obs =
                    Observation::new(timestamp, format!("Station {}", station_id + 1));
                let swing = (day % 10) as f64;
                obs.temp = Some(5.0 + swing + station_id as f64 * 0.5);
                obs.pm25 = Some(10.0 + swing * 15.0);
                obs.pm10 = Some(20.0 + swing * 20.0);
                obs.so2 = Some(2.0 + swing * 3.0);
                obs.no2 = Some(5.0 + swing * 9.0);
                obs.co = Some(100.0 + swing * 150.0);
                obs.o3 = Some(10.0 + swing * 10.0);
                obs.wind_direction =
                    Some(labels[(day + hour as usize) % labels.len()].to_string());
                obs.wind_speed = Some(0.5 + (hour as f64) * 0.1);
                observations.push(obs);
            }
        }
    }

    observations
}

fn benchmark_classifier(c: &mut Criterion) {
    let readings: Vec<PollutantReadings> = (0..1000)
        .map(|i| {
            let scale = (i % 40) as f64;
            PollutantReadings::new(
                scale * 3.0,
                scale * 4.0,
                scale,
                scale * 2.0,
                scale * 30.0,
                scale * 2.0,
            )
        })
        .collect();

    c.bench_function("classify_1k_readings", |b| {
        b.iter(|| {
            let mut high = 0usize;
            for reading in &readings {
                if PollutionLevel::classify(reading) == PollutionLevel::High {
                    high += 1;
                }
            }
            black_box(high)
        })
    });
}

fn benchmark_enrichment(c: &mut Criterion) {
    let observations = create_test_observations(4, 60);

    c.bench_function("enrich_derived_fields", |b| {
        b.iter(|| {
            let enricher = Enricher::new(2);
            let enriched = enricher.enrich(observations.clone()).unwrap();
            black_box(enriched.len())
        })
    });
}

fn benchmark_monthly_mean(c: &mut Criterion) {
    let observations = create_test_observations(6, 90);
    let enriched = Enricher::new(2).enrich(observations).unwrap();
    let refs: Vec<&Observation> = enriched.iter().collect();

    c.bench_function("monthly_temperature_mean", |b| {
        b.iter(|| {
            let series = monthly_mean(&refs, Metric::Temperature);
            black_box(series.len())
        })
    });
}

fn benchmark_level_shares(c: &mut Criterion) {
    let observations = create_test_observations(6, 90);
    let enriched = Enricher::new(2).enrich(observations).unwrap();
    let refs: Vec<&Observation> = enriched.iter().collect();

    c.bench_function("level_shares_by_station", |b| {
        b.iter(|| {
            let shares = level_shares_by_station(&refs);
            black_box(shares.len())
        })
    });
}

fn benchmark_varying_data_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("wind_rose_by_size");

    for &days in &[30, 90, 365] {
        group.bench_with_input(BenchmarkId::new("days", days), &days, |b, &days| {
            let observations = create_test_observations(4, days);
            let enriched = Enricher::new(2).enrich(observations).unwrap();
            let refs: Vec<&Observation> = enriched.iter().collect();

            b.iter(|| {
                let sectors = wind_rose(&refs);
                black_box(sectors.len())
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    benchmark_classifier,
    benchmark_enrichment,
    benchmark_monthly_mean,
    benchmark_level_shares,
    benchmark_varying_data_sizes
);
criterion_main!(benches);
