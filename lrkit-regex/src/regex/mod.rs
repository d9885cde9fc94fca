pub use postfix::{Postfix, PostfixToken};

mod postfix;
mod tokenizer;
