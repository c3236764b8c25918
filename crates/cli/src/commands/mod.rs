pub mod expand_ignore;
pub mod full_graph;
pub mod gen_annotations;
pub mod list_functions;
pub mod raw_cg;

pub use expand_ignore::*;
pub use full_graph::*;
pub use gen_annotations::*;
pub use list_functions::*;
pub use raw_cg::*;
