// Ordered work list - the node chain and its public API

mod arena;
mod builder;
mod ordered_list;
mod shared;


pub use builder::WorkListBuilder;
pub use ordered_list::OrderedWorkList;
pub use shared::Completed;
pub(crate) use shared::Shared;
