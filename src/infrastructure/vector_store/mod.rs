pub mod local_vector_store;

pub use local_vector_store::LocalVectorStore;
