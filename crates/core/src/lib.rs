pub mod config;
pub mod error;
pub mod platform;
pub mod request;

pub use config::{Browser, OpenerConfig};
pub use error::{OpenError, OpenResult};
pub use platform::Platform;
pub use request::OpenRequest;
