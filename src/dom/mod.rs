pub mod builder;
pub mod dom_model;
pub mod indexer;
pub mod serializer;
