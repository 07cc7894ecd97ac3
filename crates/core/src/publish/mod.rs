//! Publish module - assembling and writing the public rate table.

mod publish_model;
mod publisher;
mod writer;

pub use publish_model::{MetaDocument, Publication, RatesDocument};
pub use publisher::assemble;
pub use writer::{PublicationWriter, PublishedPaths};
