pub mod daemon;
pub mod health;
pub mod init;
pub mod submit;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use submit::Submit;
pub use version::Version;
