//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod validation;
pub mod contact;
pub mod contact_id;

pub use validation::ValidationError;
pub use contact::{Contact, ContactFields};
pub use contact_id::ContactId;
