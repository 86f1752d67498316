pub mod ask;
pub mod repl;
pub mod tables;
