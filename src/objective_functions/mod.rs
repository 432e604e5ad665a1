// import modules
mod fair_loss;
mod squared_loss;

// make loss functions public
pub use fair_loss::FairLoss;
pub use squared_loss::SquaredLoss;

pub mod objective;

pub use objective::Objective;
pub use objective::ObjectiveFunction;
