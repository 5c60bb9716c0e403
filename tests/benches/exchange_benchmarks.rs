//! # Sealed-Bid Exchange Benchmarks
//!
//! | Area | Operation | Target |
//! |------|-----------|--------|
//! | sx-02 Workflow | Accept one bid (two row inserts) | < 100µs |
//! | sx-02 Domain | Winner selection over N bids | linear in N |
//! | shared-crypto | Rotate a sealed asset | < 50µs for 4 KB |

use chrono::{NaiveDateTime, TimeDelta};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;
use shared_crypto::{encrypt, rotate, SecretKey};
use std::sync::Arc;
use sx_01_table_store::{InMemoryLedger, LedgerTableStore};
use sx_02_contract_exchange::domain::{parse_timestamp, select_winner};
use sx_02_contract_exchange::prelude::*;

fn created() -> NaiveDateTime {
    parse_timestamp("2016-06-28 18:40:57").unwrap()
}

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

// ============================================================================
// SX-02: Bid acceptance through the service
// ============================================================================

fn bench_bid_acceptance(c: &mut Criterion) {
    let mut group = c.benchmark_group("sx-02-bid-acceptance");

    let clock = FixedClock::new(created() + TimeDelta::minutes(1));
    let store = Arc::new(LedgerTableStore::new(Arc::new(InMemoryLedger::new())));
    let service = ExchangeService::new(store, Arc::new(clock), ExchangeConfig::default());
    service.initialize().unwrap();
    service
        .invoke(
            "PostUser",
            &args(&["U1", "USER", "n", "AH", "a", "p", "e", "b", "1", "5"]),
        )
        .unwrap();
    service
        .invoke(
            "PostUser",
            &args(&["U2", "USER", "n", "TR", "a", "p", "e", "b", "2", "5"]),
        )
        .unwrap();
    service
        .invoke(
            "PostRequest",
            &args(&[
                "1", "100", "60", "r", "Modern", "q", "d", "t", "2016-06-28 18:40:57", "U1",
                "CREATECONTR", "00ff",
            ]),
        )
        .unwrap();

    let mut next = 0u64;
    group.bench_function("post_bid", |b| {
        b.iter(|| {
            next += 1;
            let number = next.to_string();
            black_box(
                service
                    .invoke("PostBid", &args(&["1", "BID", number.as_str(), "1", "U2", "150"]))
                    .unwrap(),
            )
        })
    });

    group.finish();
}

// ============================================================================
// SX-02: Winner selection
// ============================================================================

fn bench_winner_selection(c: &mut Criterion) {
    let mut group = c.benchmark_group("sx-02-winner-selection");
    let mut rng = rand::thread_rng();

    for size in [10usize, 100, 1_000, 10_000] {
        let bids: Vec<Bid> = (0..size as u64)
            .map(|i| Bid {
                contract_id: 1,
                bid_number: i,
                contract_ref: 1,
                bidder_user_id: format!("U{i}"),
                bid_price: rng.gen_range(100..200),
                bid_timestamp: created() + TimeDelta::milliseconds(rng.gen_range(0..60_000)),
            })
            .collect();

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("select_winner", size), &bids, |b, bids| {
            b.iter(|| black_box(select_winner(bids)))
        });
    }

    group.finish();
}

// ============================================================================
// SHARED-CRYPTO: Asset sealing
// ============================================================================

fn bench_asset_rotation(c: &mut Criterion) {
    let mut group = c.benchmark_group("shared-crypto-asset");

    for size in [256usize, 4_096, 65_536] {
        let key = SecretKey::generate().unwrap();
        let plaintext: Vec<u8> = (0..size).map(|_| rand::random()).collect();
        let sealed = encrypt(&key, &plaintext).unwrap();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("encrypt", size), &plaintext, |b, p| {
            b.iter(|| black_box(encrypt(&key, p).unwrap()))
        });
        group.bench_with_input(BenchmarkId::new("rotate", size), &sealed, |b, s| {
            b.iter(|| black_box(rotate(&key, s).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_bid_acceptance,
    bench_winner_selection,
    bench_asset_rotation
);
criterion_main!(benches);
