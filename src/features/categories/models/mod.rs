pub mod category;

pub use category::{Category, CategoryPatch, CategoryPathNode, CategorySummary, NewCategory};
