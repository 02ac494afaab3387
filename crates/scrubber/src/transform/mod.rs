//! Named transforms, their registry, and the operations they build.

mod column;
mod operations;
mod registry;

pub use column::{DateConverter, camel_case, is_valid_email};
pub use operations::{ColumnTransform, Filter, Transform};
pub use registry::{Factory, Operation, Params, Registry, TransformInfo, create};
