#![forbid(unsafe_code)]

pub mod files;
pub mod repository;

pub use repository::{
    InMemoryRepository, LoadError, PersistenceError, QuestionSource, ResultSink, Storage,
};
