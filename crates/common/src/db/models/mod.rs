//! Visit log models
//!
//! Rows of the visit table, as written and as listed

mod visit;

pub use visit::{NewVisit, VisitRecord};
