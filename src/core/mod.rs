pub mod check;
pub mod docker;
pub mod env;

pub use check::{run_check, CheckEvent, CheckReport};
pub use docker::{DockerApi, DockerManager, PingOutcome};
pub use env::{HostDescriptor, HostError, HostResolver, HostSource, Protocol};
