pub mod geo;
pub mod service;
pub mod store;
pub mod tracker;
pub mod validator;

pub use service::GeofenceService;
pub use store::GeofenceStore;
pub use tracker::TransitionTracker;
