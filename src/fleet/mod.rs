//! Fleet operations
//!
//! - [`launcher`]: create, provision and start every configured container
//! - [`cleaner`]: stop and remove them again
//! - [`naming`]: the name/port/device convention both passes share

pub mod cleaner;
pub mod launcher;
pub mod naming;
pub mod password;
pub mod report;

pub use cleaner::clean;
pub use launcher::{launch, launch_and_save};
pub use naming::{container_name, plan, port_for, ContainerPlan};
pub use password::generate_password;
pub use report::{ManagedContainer, Operation, Outcome, Report};
