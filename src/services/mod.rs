pub mod batch;
pub mod calculations;
pub mod mortgage;
pub mod projections;
