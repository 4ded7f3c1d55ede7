//! Session services: bootstrapping, selection and parameter synchronization.

mod bootstrapper;
mod parameters;
mod synchronizer;

pub use bootstrapper::{
    BootstrapOutcome, SESSION_CREATE_FAILED_MESSAGE, SESSION_EXPIRED_MESSAGE, SessionBootstrapper,
};
pub use parameters::{PARAMETERS_FAILED_MESSAGE, ParameterOutcome, ParameterSynchronizer};
pub use synchronizer::{
    SELECTION_FAILED_MESSAGE, SelectionOutcome, SelectionSynchronizer, bulk_target,
};
