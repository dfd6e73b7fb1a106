#[doc(hidden)]
pub mod astar;
#[doc(hidden)]
pub mod deadline;
#[doc(hidden)]
pub mod yen;

#[doc(inline)]
pub use astar::find_path;
#[doc(inline)]
pub use deadline::Deadline;
#[doc(inline)]
pub use yen::k_shortest_simple_paths;
