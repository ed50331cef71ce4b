//! Getting the inputs onto local disk.

mod corpus;
mod model;

pub use self::corpus::{CorpusState, ensure_corpus};
pub use self::model::ensure_model;
