pub mod errors;
pub mod model;

pub use errors::SpecError;
pub use model::{Column, Field, FieldSelector, GroupSelector, ROOT_KEY, SelectorSpec, SpecBuilder};
