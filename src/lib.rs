pub use tokenizer::Scanner;
pub use treebuild::{Document, Stream};

pub mod dump;
pub mod error;
pub mod escaper;
pub mod tokenizer;
pub mod treebuild;
