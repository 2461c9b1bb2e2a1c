extern crate criterion;
extern crate sigk;

use criterion::{criterion_group, criterion_main, Criterion};

use rand::rngs::StdRng;
use rand::SeedableRng;

use sigk::{generate_alice_keypair, generate_bob_keypair, generate_eve_keypair};

fn bench_groupkey(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0x747);

    let (pk_a, sk_a) = generate_alice_keypair(&mut rng).unwrap();
    let (pk_b, sk_b) = generate_bob_keypair(&mut rng).unwrap();
    let (pk_c, sk_c) = generate_eve_keypair(&mut rng).unwrap();

    let sp_ab = sk_b.shared_public(&pk_a);
    let (sp_bc, _) = sk_c.shared_secret(&pk_b, &sp_ab);
    let (sp_ac, _) = sk_a.shared_secret(&pk_c, &sp_bc);

    let mut group = c.benchmark_group("SIGKp747");
    group.sample_size(10);

    group.bench_function("Keygen A", |b| b.iter(|| sk_a.public_key()));
    group.bench_function("Keygen B", |b| b.iter(|| sk_b.public_key()));
    group.bench_function("Keygen C", |b| b.iter(|| sk_c.public_key()));
    group.bench_function("B shared public from A", |b| {
        b.iter(|| sk_b.shared_public(&pk_a))
    });
    group.bench_function("C shared secret from B", |b| {
        b.iter(|| sk_c.shared_secret(&pk_b, &sp_ab))
    });
    group.bench_function("A shared secret from C", |b| {
        b.iter(|| sk_a.shared_secret(&pk_c, &sp_bc))
    });
    group.bench_function("B shared secret from A", |b| {
        b.iter(|| sk_b.shared_secret(&sp_ac))
    });

    group.finish();
}

criterion_group!(benches, bench_groupkey);
criterion_main!(benches);
