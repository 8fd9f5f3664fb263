use super::*;
use rand::RngCore;

fn seeded_engine(seed: u64) -> RagEngine {
    let mut config = Config::default();
    config.retrieval.seed = Some(seed);
    RagEngine::from_config(&config)
}

/// Points every text in the same direction so rankings are fully tied
struct ConstantSource;

impl VectorSource for ConstantSource {
    fn name(&self) -> &str {
        "constant"
    }

    fn dimension(&self) -> usize {
        3
    }

    fn embed(&self, _text: &str, _rng: &mut dyn RngCore) -> Vec<f64> {
        vec![1.0, 1.0, 1.0]
    }
}

#[test]
fn sample_document_chunks_with_vectors() {
    let mut engine = seeded_engine(1);

    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Sentence);

    assert!(chunks.len() > 1);
    assert!(chunks.iter().all(|c| c.vector.as_ref().is_some_and(|v| v.len() == 3)));
}

#[test]
fn rechunking_replaces_vectors_but_not_boundaries() {
    let mut engine = seeded_engine(5);

    let first = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Paragraph);
    let second = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Paragraph);

    let texts = |chunks: &[Chunk]| chunks.iter().map(|c| c.text.clone()).collect::<Vec<_>>();
    assert_eq!(texts(&first), texts(&second));
    assert_ne!(first[0].vector, second[0].vector);
}

#[test]
fn same_seed_same_session() {
    let run = |seed| {
        let mut engine = seeded_engine(seed);
        let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Semantic);
        let entry = engine
            .ask(SAMPLE_QUERIES[1], &chunks)
            .expect("ask should succeed");
        (chunks, entry.response)
    };

    assert_eq!(run(11), run(11));
}

#[test]
fn ask_builds_an_entry() {
    let mut engine = seeded_engine(3);
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Sentence);

    let entry = engine
        .ask(SAMPLE_QUERIES[1], &chunks)
        .expect("ask should succeed");

    assert_eq!(entry.query, SAMPLE_QUERIES[1]);
    assert!(entry.retrieved.len() <= 3);
    assert!(!entry.retrieved.is_empty());
    assert!(entry.response.contains("the process involves"));
    let best: String = entry.retrieved[0].chunk.text.chars().take(40).collect();
    assert!(entry.response.contains(&best));
}

#[test]
fn ask_respects_top_k() {
    let mut config = Config::default();
    config.chunking.chunk_size = 60;
    config.retrieval.top_k = 1;
    config.retrieval.seed = Some(8);
    let mut engine = RagEngine::from_config(&config);
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Sentence);

    let entry = engine.ask("What is RAG?", &chunks).expect("ask should succeed");

    assert_eq!(entry.retrieved.len(), 1);
}

#[test]
fn ask_rejects_blank_query() {
    let mut engine = seeded_engine(0);
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::Sentence);

    assert!(matches!(engine.ask("   ", &chunks), Err(RagError::EmptyQuery)));
}

#[test]
fn ask_without_chunks_is_rejected() {
    let mut engine = seeded_engine(0);

    assert!(matches!(
        engine.ask("What is RAG?", &[]),
        Err(RagError::NoRetrievedChunks)
    ));
}

#[test]
fn custom_source_drives_ranking() {
    let mut engine = RagEngine::new(
        ChunkingConfig::default(),
        RetrievalConfig::default(),
        Box::new(ConstantSource),
        StdRng::seed_from_u64(0),
    );
    let chunks = engine.chunk("One. Two. Three. Four.", ChunkStrategy::Semantic);

    let (query, scored) = engine.score_all("anything", &chunks);

    assert_eq!(query.vector, vec![1.0, 1.0, 1.0]);
    assert_eq!(scored.len(), chunks.len());
    // Every score ties, so document order is preserved
    let order = scored.iter().map(|s| s.chunk.index).collect::<Vec<_>>();
    assert_eq!(order, (0..chunks.len()).collect::<Vec<_>>());
}

#[test]
fn conversation_grows_in_order() {
    let mut engine = seeded_engine(21);
    let chunks = engine.chunk(SAMPLE_TEXT, ChunkStrategy::SlidingWindow);
    let mut conversation = Conversation::new();
    assert!(conversation.is_empty());

    for query in SAMPLE_QUERIES {
        conversation.push(engine.ask(query, &chunks).expect("ask should succeed"));
    }

    assert_eq!(conversation.len(), 2);
    let asked = conversation
        .entries()
        .iter()
        .map(|e| e.query.as_str())
        .collect::<Vec<_>>();
    assert_eq!(asked, SAMPLE_QUERIES);
    assert_eq!(
        conversation.last().map(|e| e.query.as_str()),
        Some(SAMPLE_QUERIES[1])
    );
    assert!(conversation.entries()[0].created_at <= conversation.entries()[1].created_at);
}
