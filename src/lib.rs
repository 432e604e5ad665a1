// Modules
pub mod constants;
pub mod data;
pub mod errors;
pub mod objective_functions;
pub mod utils;

// Individual classes, and functions
pub use data::Metadata;
pub use errors::ObjectiveError;
pub use objective_functions::{FairLoss, Objective, ObjectiveFunction, SquaredLoss};
