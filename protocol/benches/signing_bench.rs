// Encoding, hashing and signing benchmarks.
//
// Covers address derivation, body serialization and id hashing, and
// witness generation for transactions of growing input counts.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use byron_protocol::address::Address;
use byron_protocol::crypto::SigningIdentity;
use byron_protocol::transaction::{sign_transaction, TxAux, TxId, TxIn, TxOut};

fn identity() -> SigningIdentity {
    SigningIdentity::from_seed(&[0x11; 32], [0x22; 32])
}

fn body(inputs: usize, identity: &SigningIdentity) -> TxAux {
    TxAux::new(
        (0..inputs)
            .map(|i| TxIn::new(TxId::from_bytes([i as u8; 32]), i as u32))
            .collect(),
        vec![
            TxOut::new(identity.address(), 1_000_000),
            TxOut::new(identity.address(), 4_321_000),
        ],
    )
    .expect("non-empty body")
}

fn bench_address_derivation(c: &mut Criterion) {
    let xpub = identity().extended_public_key();
    c.bench_function("address/from_xpub", |b| {
        b.iter(|| Address::from_xpub(&xpub));
    });
}

fn bench_body_id(c: &mut Criterion) {
    let identity = identity();
    let mut group = c.benchmark_group("transaction/id");

    for inputs in [1, 10, 100] {
        let aux = body(inputs, &identity);
        group.throughput(Throughput::Elements(inputs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(inputs), &aux, |b, aux| {
            b.iter(|| aux.id());
        });
    }

    group.finish();
}

fn bench_sign_and_serialize(c: &mut Criterion) {
    let identity = identity();
    let mut group = c.benchmark_group("transaction/sign_and_serialize");

    for inputs in [1, 10, 100] {
        let aux = body(inputs, &identity);
        group.throughput(Throughput::Elements(inputs as u64));
        group.bench_with_input(BenchmarkId::from_parameter(inputs), &aux, |b, aux| {
            b.iter(|| sign_transaction(aux.clone(), &identity).to_cbor());
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_address_derivation,
    bench_body_id,
    bench_sign_and_serialize
);
criterion_main!(benches);
