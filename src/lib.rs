pub mod config;
pub mod error;
pub mod model;
pub mod fetch;
pub mod resolver;
pub mod tree;
pub mod gedcom;

pub use config::Config;
pub use error::{AncestryError, Result};
pub use fetch::{Fetcher, FsSession};
pub use resolver::Resolver;
pub use tree::builder::Depth;
pub use tree::{Tree, TreeBuilder, UnionKey};
