//! Domain ports: the traits adapters implement and handlers call.

mod macros;
pub(crate) use macros::define_port_error;

mod doctor_provisioning;
mod login_service;
mod staff_directory;
mod visit_recorder;
mod visit_store;

#[cfg(test)]
pub use doctor_provisioning::MockDoctorProvisioning;
pub use doctor_provisioning::{
    DoctorProvisioning, DoctorProvisioningError, NewDoctorAccount, ProvisionedDoctor,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{INVALID_CREDENTIALS, LoginService};
#[cfg(test)]
pub use staff_directory::MockStaffDirectory;
pub use staff_directory::{StaffDirectory, StaffDirectoryError};
#[cfg(test)]
pub use visit_recorder::MockVisitRecorder;
pub use visit_recorder::VisitRecorder;
#[cfg(test)]
pub use visit_store::MockVisitStore;
pub use visit_store::{VisitStore, VisitStoreError, VisitTransaction};
