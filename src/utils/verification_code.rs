use rand::Rng;

/// Number of decimal digits in a verification code.
pub const VERIFICATION_CODE_LENGTH: usize = 6;

/// Generate a random 6-digit numeric code. Leading zeros are kept.
pub fn generate_verification_code() -> String {
    let mut rng = rand::thread_rng();
    (0..VERIFICATION_CODE_LENGTH)
        .map(|_| char::from(b'0' + rng.gen_range(0..10u8)))
        .collect()
}

/// A submitted code must be exactly six ASCII digits.
pub fn is_well_formed_code(code: &str) -> bool {
    code.len() == VERIFICATION_CODE_LENGTH && code.bytes().all(|b| b.is_ascii_digit())
}
