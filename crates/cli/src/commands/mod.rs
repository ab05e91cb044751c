pub mod ide_args;
pub mod init;
pub mod run;
pub mod session;

pub use ide_args::ide_args_command;
pub use init::init_command;
pub use run::{SessionMode, session_command};
pub use session::SessionOptions;
