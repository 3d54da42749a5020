pub mod gate;
pub mod patient;

pub use gate::TenantGate;
pub use patient::PatientService;
