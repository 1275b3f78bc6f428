pub mod active;
pub mod enablement;
pub mod favorites;
pub mod order;
