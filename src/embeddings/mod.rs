// Embeddings module
// Vector math primitives and the pluggable source that turns text into vectors

pub mod source;
pub mod vector;

pub use source::{RandomVectorSource, VectorSource};
pub use vector::{DEFAULT_DIMENSION, cosine_similarity, generate_vector, magnitude};
