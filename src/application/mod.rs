pub mod catalog;
pub mod loan;
mod service_dependencies;

pub use service_dependencies::ServiceDependencies;
