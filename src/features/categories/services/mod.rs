pub mod ancestry_guard;
pub mod category_service;
pub mod path_calculator;
pub mod tree_assembler;

pub use ancestry_guard::AncestryStrategy;
pub use category_service::CategoryService;
pub use tree_assembler::OrphanPolicy;
