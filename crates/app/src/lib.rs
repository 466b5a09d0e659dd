pub mod command;
pub mod errors;
pub mod startup;

pub use command::Command;
pub use startup::run;
