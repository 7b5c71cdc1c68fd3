pub mod dispenser;
pub mod error;
pub mod pool;
pub mod question;
pub mod search;
pub mod source;

pub use dispenser::{BatchStatus, Dispenser, Draw};
pub use error::{QuizError, Result};
pub use pool::BatchPool;
pub use question::{build_batch, build_item};
pub use search::{search_trivia, select_trivia_snippets, SnippetPage};
pub use source::{opentdb_source, PoolRequest, QuestionSource, SnippetSource};
