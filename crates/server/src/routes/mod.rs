pub mod deviations;
pub mod health;
