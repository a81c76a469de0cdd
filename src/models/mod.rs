pub mod auth_config;
pub mod connector;
pub mod operation;
pub mod registry;

pub use auth_config::*;
pub use connector::*;
pub use operation::*;
pub use registry::*;
