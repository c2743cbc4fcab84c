//! Slot generation throughput for a busy split-shift day.

use chrono::{Duration, NaiveDate, TimeZone, Utc};
use criterion::{criterion_group, criterion_main, Criterion};
use slot_engine::{day_slots, OccupiedInterval, SlotRequest, TimeRange, WorkingHours};
use std::hint::black_box;

fn busy_day() -> Vec<OccupiedInterval> {
    let opening = Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap();
    (0..20)
        .map(|i| {
            let start = opening + Duration::minutes(i * 35);
            OccupiedInterval::appointment(TimeRange::new(start, start + Duration::minutes(20)))
        })
        .collect()
}

fn bench_day_slots(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2026, 3, 16).unwrap();
    let now = Utc.with_ymd_and_hms(2026, 3, 16, 0, 0, 0).unwrap();
    let occupied = busy_day();
    let blocks = vec![
        WorkingHours::parse("09:00", "13:00").unwrap(),
        WorkingHours::parse("16:00", "20:00").unwrap(),
    ];

    c.bench_function("day_slots_step_5", |b| {
        let request = SlotRequest::new(date, 45, now).with_step(5);
        b.iter(|| day_slots(black_box(&request), black_box(&blocks), black_box(&occupied)))
    });

    c.bench_function("day_slots_step_30", |b| {
        let request = SlotRequest::new(date, 45, now);
        b.iter(|| day_slots(black_box(&request), black_box(&blocks), black_box(&occupied)))
    });
}

criterion_group!(benches, bench_day_slots);
criterion_main!(benches);
