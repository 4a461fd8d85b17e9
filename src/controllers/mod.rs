pub mod console;

pub use console::{ConsoleController, ConsoleNotifier, Notice};
