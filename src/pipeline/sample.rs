/// Demo document used when no input is supplied
pub const SAMPLE_TEXT: &str = "Retrieval Augmented Generation (RAG) is a technique that combines the power of large language models with external knowledge retrieval. This approach allows AI systems to access up-to-date information and domain-specific knowledge that wasn't part of their training data. The process works in three main steps. First, documents are split into smaller chunks for efficient processing. Second, these chunks are converted into embeddings, which are numerical representations that capture semantic meaning. Third, when a user asks a question, the system retrieves the most relevant chunks and uses them to generate an informed response. This technique significantly improves the accuracy and reliability of AI-generated content.";

/// Questions suggested alongside the demo document
pub const SAMPLE_QUERIES: [&str; 2] = [
    "What is Retrieval Augmented Generation?",
    "How are documents processed in RAG?",
];
