//! Glue for the document-understanding service that turns a business plan
//! into [`ProjectParameters`](crate::projection::parameters::ProjectParameters).
//!
//! Nothing here talks to the network. The caller sends the prompts and hands
//! the raw reply text back for decoding.

pub mod prompt;
pub mod reply;
