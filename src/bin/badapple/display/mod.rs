mod banner;
mod error;
mod progress;

pub use banner::{banner_for_help, print_banner};
pub use error::{print_error, print_usage_error};
pub use progress::Progress;

#[derive(Debug, Clone, Copy)]
pub struct Context {
    pub interactive: bool,
}

impl Context {
    pub fn detect() -> Self {
        Self {
            interactive: crate::io::stderr_is_tty(),
        }
    }
}
