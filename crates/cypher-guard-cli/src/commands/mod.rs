pub mod classify;
pub mod rewrite;
pub mod rules;
