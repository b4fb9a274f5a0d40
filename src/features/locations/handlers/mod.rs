pub mod form_session_handler;
pub mod location_handler;

pub use form_session_handler::*;
pub use location_handler::*;
