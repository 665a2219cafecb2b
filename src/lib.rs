//! Lowers parenthesised expression trees to three-address code and runs a local optimisation
//! pass over the result.
pub mod error;
pub mod il;
pub mod listing;
pub mod pipeline;
pub mod sexpr;
pub mod span;

mod prelude;

pub use il::{convert, optimise, parse_tac, render};
pub use pipeline::{compile, optimise_text, Compiled, PipelineError};
