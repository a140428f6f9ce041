pub mod browse;
pub mod load_corpus;
pub mod search;

pub use browse::*;
pub use load_corpus::*;
pub use search::*;
