pub mod clique;

pub use clique::Clique;
