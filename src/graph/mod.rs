#[doc(hidden)]
pub mod builder;
#[doc(hidden)]
pub mod error;
#[doc(hidden)]
pub mod item;
#[doc(hidden)]
pub mod loader;
#[doc(hidden)]
pub mod network;

#[doc(inline)]
pub use builder::{EdgeAttributes, GraphBuilder};
#[doc(inline)]
pub use error::GraphError;
#[doc(inline)]
pub use item::{Edge, EdgeKind, Node};
#[doc(inline)]
pub use network::{EdgeIx, Graph, GraphStructure, GraphSummary, NodeIx};
