use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;

use slot_engine::civil::{BusyInterval, CivilDate, CivilTime, DateRange, FreeSlot, Timezone};
use slot_engine::convert::convert_slots;
use slot_engine::freeslots::{derive_free_slots, WorkingWindow, DEFAULT_MIN_SLOT_MINUTES};

/// A month of busy days: eight staggered 45-minute meetings per day.
fn busy_month() -> (Vec<BusyInterval>, DateRange) {
    let range = DateRange::parse("2024-06-01", "2024-06-30").unwrap();
    let mut busy = Vec::new();
    for date in range.days() {
        for i in 0..8u16 {
            let start = 8 * 60 + i * 70;
            busy.push(BusyInterval::new(
                date,
                CivilTime::from_minutes(start).unwrap(),
                CivilTime::from_minutes(start + 45).unwrap(),
            ));
        }
    }
    (busy, range)
}

fn bench_derive(c: &mut Criterion) {
    let (busy, range) = busy_month();
    let window = WorkingWindow::parse("09:00", "17:00").unwrap();

    c.bench_function("derive_free_slots/month", |b| {
        b.iter(|| {
            derive_free_slots(
                black_box(&busy),
                black_box(&range),
                false,
                &window,
                DEFAULT_MIN_SLOT_MINUTES,
            )
        })
    });
}

fn bench_convert(c: &mut Criterion) {
    let date = CivilDate::parse("2024-03-08").unwrap();
    let slots: Vec<FreeSlot> = (0..48u16)
        .map(|i| {
            FreeSlot::new(
                date,
                CivilTime::from_minutes(i * 30).unwrap(),
                CivilTime::from_minutes(i * 30 + 20).unwrap(),
            )
        })
        .collect();
    let source = Timezone::parse("America/New_York").unwrap();
    let target = Timezone::parse("Asia/Tokyo").unwrap();

    c.bench_function("convert_slots/new_york_to_tokyo", |b| {
        b.iter(|| convert_slots(black_box(&slots), &source, &target))
    });
}

criterion_group!(benches, bench_derive, bench_convert);
criterion_main!(benches);
