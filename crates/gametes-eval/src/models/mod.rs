pub mod classifier_trait;
pub mod factory;
pub mod forest;
pub mod gbdt;
pub mod grid_search;
pub mod metrics;
pub mod tree;
