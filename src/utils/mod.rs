pub mod verification_code;

pub use verification_code::{generate_verification_code, is_well_formed_code};
