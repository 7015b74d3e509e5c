pub mod chunk;
pub mod composition;
pub mod t13n;
pub mod table;

pub use chunk::Chunk;
pub use composition::{Composition, CompositionInput, TrimMode};
pub use t13n::{Transliterator, TransliterationType};
pub use table::{LookupResult, Rule, RuleAttributes, Table, TableLoadError};
