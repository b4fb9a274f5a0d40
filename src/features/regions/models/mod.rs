mod administrative_unit;

pub use administrative_unit::{codes_equal, derive_parent_code, AdminLevel, AdministrativeUnit};
