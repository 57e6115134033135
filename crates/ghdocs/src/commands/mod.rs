//! CLI command implementations.

pub(crate) mod page;

pub(crate) use page::PageArgs;
