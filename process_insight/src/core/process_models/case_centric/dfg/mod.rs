/// [`DirectlyFollowsGraph`] struct
pub mod dfg_struct;
/// DOT and image export of [`DirectlyFollowsGraph`]s
pub mod image_export;

#[doc(inline)]
pub use dfg_struct::DirectlyFollowsGraph;
