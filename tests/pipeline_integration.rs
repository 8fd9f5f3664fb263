#![expect(
    clippy::tests_outside_test_module,
    reason = "integration tests are only compiled in test mode"
)]

// End-to-end flow: chunk a document, rank chunks against a query, synthesize
// an answer, and persist the settings that drive it.

use rand::SeedableRng;
use rand::rngs::StdRng;
use tempfile::TempDir;

use ragviz::RagError;
use ragviz::chunking::{ChunkStrategy, ChunkingConfig, chunk_text, split_text};
use ragviz::config::Config;
use ragviz::embeddings::{RandomVectorSource, cosine_similarity};
use ragviz::pipeline::{Conversation, RagEngine, SAMPLE_QUERIES, SAMPLE_TEXT, project_points};
use ragviz::retrieval::{rank, synthesize};

fn seeded_config(seed: u64) -> Config {
    let mut config = Config::default();
    config.retrieval.seed = Some(seed);
    config
}

#[test]
fn sample_queries_produce_a_conversation() {
    let config = seeded_config(11);
    let mut engine = RagEngine::from_config(&config);
    let chunks = engine.chunk(SAMPLE_TEXT, config.strategy);
    assert!(!chunks.is_empty());

    let mut conversation = Conversation::new();
    for query in SAMPLE_QUERIES {
        let entry = engine.ask(query, &chunks).expect("chunks are available");
        assert!(!entry.retrieved.is_empty());
        assert!(entry.retrieved.len() <= config.retrieval.top_k);
        assert!(
            entry
                .retrieved
                .windows(2)
                .all(|pair| pair[0].similarity >= pair[1].similarity)
        );
        assert!(entry.response.starts_with("Based on the retrieved context,"));
        conversation.push(entry);
    }

    assert_eq!(conversation.len(), SAMPLE_QUERIES.len());
    let last = conversation.last().expect("two entries were pushed");
    assert_eq!(last.query, SAMPLE_QUERIES[1]);
    assert!(last.response.contains("the process involves"));
}

#[test]
fn every_strategy_covers_the_sample_in_order() {
    let config = ChunkingConfig::default();

    for strategy in ChunkStrategy::ALL {
        let mut rng = StdRng::seed_from_u64(3);
        let chunks = split_text(SAMPLE_TEXT, strategy, &config, &mut rng);
        assert!(!chunks.is_empty(), "{} produced no chunks", strategy);

        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.index, i);
            assert_eq!(chunk.id, format!("chunk-{}", i));
            assert!(!chunk.text.is_empty());
            assert_eq!(chunk.text, chunk.text.trim());
        }
    }
}

#[test]
fn ranking_matches_cosine_similarity() {
    let source = RandomVectorSource::default();
    let mut rng = StdRng::seed_from_u64(8);
    let chunks = chunk_text(
        SAMPLE_TEXT,
        ChunkStrategy::Sentence,
        &ChunkingConfig::default(),
        &source,
        &mut rng,
    );
    let query = [0.5, -0.25, 1.0];

    let ranked = rank(&query, &chunks, None);

    assert_eq!(ranked.len(), chunks.len());
    for item in &ranked {
        let vector = item.chunk.vector.as_ref().expect("chunk_text assigns vectors");
        assert!((item.similarity - cosine_similarity(&query, vector)).abs() < 1e-12);
        assert!((-1.0..=1.0).contains(&item.similarity));
    }

    let top = rank(&query, &chunks, Some(2));
    assert_eq!(top.len(), 2.min(chunks.len()));
    assert_eq!(top[0].chunk.id, ranked[0].chunk.id);
}

#[test]
fn synthesize_quotes_the_best_chunk() {
    let mut engine = RagEngine::from_config(&seeded_config(21));
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::FixedSize);
    let (_, scored) = engine.score_all("What is RAG?", &chunks);

    let response = synthesize("What is RAG?", &scored).expect("scored is not empty");

    let excerpt = scored[0].chunk.text.chars().take(150).collect::<String>();
    assert!(response.contains(&format!("{}...", excerpt)));
    assert!(response.contains("we can understand that"));
}

#[test]
fn empty_document_has_nothing_to_retrieve() {
    let mut engine = RagEngine::from_config(&seeded_config(2));
    let chunks = engine.chunk("   \n\n  ", ChunkStrategy::Paragraph);

    assert!(chunks.is_empty());
    assert!(matches!(
        engine.ask("What is RAG?", &chunks),
        Err(RagError::NoRetrievedChunks)
    ));
    assert!(matches!(synthesize("anything", &[]), Err(RagError::NoRetrievedChunks)));
}

#[test]
fn projection_places_query_last() {
    let mut engine = RagEngine::from_config(&seeded_config(4));
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Semantic);
    let query = engine.embed_query("How are documents processed?");

    let points = project_points(&chunks, Some(&query));

    assert_eq!(points.len(), chunks.len() + 1);
    let last = points.last().expect("query point");
    assert!(last.is_query);
    assert_eq!(last.x, query.vector[0]);
    assert!(points[..chunks.len()].iter().all(|p| !p.is_query));
}

#[test]
fn same_seed_gives_same_answers() -> anyhow::Result<()> {
    let config = seeded_config(99);

    let mut first = RagEngine::from_config(&config);
    let mut second = RagEngine::from_config(&config);
    let first_chunks = first.chunk(SAMPLE_TEXT, ChunkStrategy::SlidingWindow);
    let second_chunks = second.chunk(SAMPLE_TEXT, ChunkStrategy::SlidingWindow);
    assert_eq!(first_chunks, second_chunks);

    let a = first.ask(SAMPLE_QUERIES[0], &first_chunks)?;
    let b = second.ask(SAMPLE_QUERIES[0], &second_chunks)?;
    assert_eq!(a.response, b.response);
    assert_eq!(a.retrieved, b.retrieved);
    Ok(())
}

#[test]
fn saved_settings_drive_the_engine() -> anyhow::Result<()> {
    let temp_dir = TempDir::new()?;
    let mut config = Config::load(temp_dir.path())?;
    config.strategy = ChunkStrategy::Paragraph;
    config.set_chunk_size(60)?;
    config.retrieval.set_top_k(1)?;
    config.retrieval.seed = Some(5);
    config.save()?;

    let loaded = Config::load(temp_dir.path())?;
    assert_eq!(loaded.strategy, ChunkStrategy::Paragraph);
    assert_eq!(loaded.chunking.chunk_size, 60);

    let document = "Chunking splits text.\n\nEmbeddings map text to vectors.\n\nRetrieval ranks chunks.";
    let mut engine = RagEngine::from_config(&loaded);
    let chunks = engine.chunk(document, loaded.strategy);
    assert_eq!(chunks.len(), 2);

    let entry = engine.ask("What is retrieval?", &chunks)?;
    assert_eq!(entry.retrieved.len(), 1);
    Ok(())
}
