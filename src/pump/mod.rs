mod input;
mod output;

pub use input::run as run_input;
pub use output::run as run_output;
