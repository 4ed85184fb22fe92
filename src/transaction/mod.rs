pub mod model;
pub mod policy;

pub use model::Transaction;
pub use policy::AdmissionPolicy;
