use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use perceptrs::train::{Averaged, Decoder, FeatureExtractor, Perceptron, Scorer, Trivial};
use perceptrs::{Decoded, Feature};

const LABELS: usize = 8;

type Labeled = Decoded<Vec<u32>, usize>;

struct BagOfIds;

impl FeatureExtractor<Labeled> for BagOfIds {
    fn features(&self, decoded: &Labeled) -> Vec<Feature> {
        decoded
            .instance
            .iter()
            .map(|id| Feature::from(format!("{}|{}", id, decoded.output)))
            .collect()
    }

    fn estimated_num_features(&self) -> usize {
        4096
    }
}

struct ArgMax;

impl Decoder<Labeled> for ArgMax {
    fn decode(&self, ids: &Vec<u32>, scorer: &dyn Scorer<Labeled>) -> Labeled {
        let mut best = Decoded::new(ids.clone(), 0);
        let mut best_score = scorer.score(&best);
        for label in 1..LABELS {
            let candidate = Decoded::new(ids.clone(), label);
            let score = scorer.score(&candidate);
            if score > best_score {
                best = candidate;
                best_score = score;
            }
        }
        best
    }
}

fn corpus(size: usize) -> Vec<Labeled> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..size)
        .map(|_| {
            let label = rng.random_range(0..LABELS);
            let ids = (0..16)
                .map(|_| (label as u32) * 64 + rng.random_range(0..64))
                .collect();
            Decoded::new(ids, label)
        })
        .collect()
}

fn criterion_benchmark(c: &mut Criterion) {
    let data = corpus(500);
    let mut group = c.benchmark_group("train");
    group.bench_function("trivial", |b| {
        b.iter(|| {
            let mut model = Perceptron::new(ArgMax);
            model.init(BagOfIds, Trivial);
            black_box(model.train(data.iter().cloned()))
        })
    });
    group.bench_function("averaged", |b| {
        b.iter(|| {
            let mut model = Perceptron::new(ArgMax);
            model.init(BagOfIds, Averaged::new());
            black_box(model.train(data.iter().cloned()))
        })
    });
    group.finish();

    let mut model = Perceptron::new(ArgMax);
    model.init(BagOfIds, Averaged::new());
    model.train(data.iter().cloned());
    c.bench_function("score", |b| {
        b.iter(|| {
            for item in &data {
                black_box(model.score(item));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
