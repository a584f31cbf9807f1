// Change-operation catalog, selection and merge engine.
// Everything here is synchronous and free of I/O; it runs on every toggle.

pub mod ats;
pub mod merge;
pub mod ops;
pub mod selection;
pub mod validation;
