use criterion::{Criterion, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;
use ragviz::chunking::{ChunkStrategy, ChunkingConfig, chunk_text};
use ragviz::embeddings::RandomVectorSource;
use ragviz::pipeline::SAMPLE_TEXT;
use std::hint::black_box;

pub fn criterion_benchmark(c: &mut Criterion) {
    let document = vec![SAMPLE_TEXT; 200].join("\n\n");
    let config = ChunkingConfig::default();
    let source = RandomVectorSource::default();

    for strategy in ChunkStrategy::ALL {
        c.bench_function(&format!("chunking/{}", strategy), |b| {
            let mut rng = StdRng::seed_from_u64(42);
            b.iter(|| {
                chunk_text(
                    black_box(&document),
                    strategy,
                    black_box(&config),
                    &source,
                    &mut rng,
                )
            })
        });
    }
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
