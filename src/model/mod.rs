pub mod data_core;
pub mod performance;
pub mod source_tree;
