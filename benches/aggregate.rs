use booking_status::models::{ExtraItem, FareTable, Passenger};
use booking_status::{BookingRecord, FareClass, SelectableLineItemSet, aggregate, derive_status};
use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal_macros::dec;

fn group_booking() -> SelectableLineItemSet {
    let passengers = (0..40)
        .map(|i| {
            let mut p = Passenger::new(match i % 3 {
                0 => FareClass::Tier1,
                1 => FareClass::Tier2,
                _ => FareClass::Tier3,
            });
            p.selected = i % 7 != 0;
            p
        })
        .collect();
    SelectableLineItemSet {
        passengers,
        extras: vec![ExtraItem::new(dec!(350), 40); 6],
        fare_table: FareTable {
            tier1_price: dec!(12500),
            tier2_price: dec!(9800),
            tier3_price: dec!(1500),
            tier1_count: 14,
            tier2_count: 13,
            tier3_count: 13,
        },
        vat_percent: dec!(7),
    }
}

fn bench(c: &mut Criterion) {
    let items = group_booking().toggle_extra(0).toggle_extra(3);
    c.bench_function("aggregate/40-pax", |b| b.iter(|| aggregate(black_box(&items))));

    let record = (0..12).fold(BookingRecord::new(dec!(150000), dec!(20000), dec!(30000)), |r, _| {
        r.with_payment(dec!(4999.99))
    });
    c.bench_function("derive_status/12-payments", |b| {
        b.iter(|| derive_status(black_box(&record)))
    });
}

criterion_group!(benches, bench);
criterion_main!(benches);
