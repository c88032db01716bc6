use criterion::{black_box, criterion_group, criterion_main, Criterion};

use kekule::{AtomSite, Kekulizer, MaximumWeightMatching, Weight};
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg64Mcg;

fn ring(n: usize) -> Vec<(usize, usize)> {
    (0..n).map(|i| (i, (i + 1) % n)).collect()
}

/// Linear acene with `rings` fused hexagons: `rings + 1` vertical bonds
/// joined by one apex atom above and one below each ring.
fn acene(rings: usize) -> Vec<(usize, usize)> {
    let up = |k: usize| k;
    let down = |k: usize| rings + 1 + k;
    let top = |k: usize| 2 * rings + 2 + k;
    let bottom = |k: usize| 3 * rings + 2 + k;

    let mut bonds: Vec<_> = (0..=rings).map(|k| (up(k), down(k))).collect();
    for k in 0..rings {
        bonds.push((up(k), top(k)));
        bonds.push((top(k), up(k + 1)));
        bonds.push((down(k), bottom(k)));
        bonds.push((bottom(k), down(k + 1)));
    }
    bonds
}

/// Square grid of `side * side` atoms, which has many competing
/// alternations.
fn grid(side: usize) -> Vec<(usize, usize)> {
    let mut bonds = Vec::new();
    for r in 0..side {
        for c in 0..side {
            let v = r * side + c;
            if c + 1 < side {
                bonds.push((v, v + 1));
            }
            if r + 1 < side {
                bonds.push((v, v + side));
            }
        }
    }
    bonds
}

fn carbon(_: usize) -> AtomSite {
    AtomSite::new(6, 3)
}

fn bench_kekulize(c: &mut Criterion) {
    let kekulizer = Kekulizer::new();
    let benzene = ring(6);
    let pentacene = acene(5);
    let macrocycle = ring(101);
    let sheet = grid(12);

    let mut group = c.benchmark_group("kekulize");

    group.bench_function("benzene", |b| {
        b.iter(|| black_box(kekulizer.kekulize(black_box(&benzene), carbon).unwrap()))
    });
    group.bench_function("pentacene", |b| {
        b.iter(|| black_box(kekulizer.kekulize(black_box(&pentacene), carbon).unwrap()))
    });
    group.bench_function("odd_macrocycle", |b| {
        b.iter(|| black_box(kekulizer.kekulize(black_box(&macrocycle), carbon).unwrap()))
    });
    group.bench_function("grid_12x12", |b| {
        b.iter(|| black_box(kekulizer.kekulize(black_box(&sheet), carbon).unwrap()))
    });

    group.finish();
}

fn bench_matching(c: &mut Criterion) {
    let n = 60;
    let mut problem = MaximumWeightMatching::new(n);
    let mut rng = Pcg64Mcg::seed_from_u64(0x853C_49E6_748F_EA9B);
    for a in 0..n {
        for b in a + 1..n {
            if rng.random_bool(0.2) {
                let weight: Weight = rng.random_range(0..1000);
                problem.add_edge(a, b, weight).unwrap();
            }
        }
    }

    c.bench_function("matching_random_60", |b| {
        b.iter(|| black_box(black_box(&problem).run()))
    });
}

criterion_group!(benches, bench_kekulize, bench_matching);
criterion_main!(benches);
