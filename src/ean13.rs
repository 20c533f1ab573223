//! # EAN-13 Code Synthesis
//!
//! Turns any item identifier into a 13-digit EAN-13 payload with a valid
//! check digit. Total and deterministic: every input produces a code.
//!
//! ## Algorithm
//!
//! ```text
//! "ABC-123"  → strip non-alphanumerics  → "ABC123"
//!            → letters to (L - 'A') % 10 → "012123"
//!            → pad / cut to 12 digits    → "012123000000"
//!            → append check digit        → "0121230000001"
//! ```
//!
//! Different inputs can land on the same code (letters share digit buckets,
//! anything past the 12th normalized digit is dropped). That is accepted:
//! the code is a label payload, not an identity.
//!
//! ```
//! use estock_labels::ean13;
//!
//! let code = ean13::synthesize_str("ABC123");
//! assert_eq!(code, "0121230000001");
//! assert!(ean13::is_valid(&code));
//! ```

/// Stand-in used for missing or empty input.
pub const UNKNOWN_INPUT: &str = "UNKNOWN";

/// Number of data digits before the check digit.
pub const DATA_DIGITS: usize = 12;

/// Synthesize an EAN-13 code. `None` stands for a missing value.
pub fn synthesize(input: Option<&str>) -> String {
    let input = match input {
        Some(s) if !s.is_empty() => s,
        _ => UNKNOWN_INPUT,
    };

    let mut digits: Vec<u8> = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| match c.to_digit(10) {
            Some(d) => d as u8,
            None => (c.to_ascii_uppercase() as u8 - b'A') % 10,
        })
        .take(DATA_DIGITS)
        .collect();
    digits.resize(DATA_DIGITS, 0);

    let mut data = [0u8; DATA_DIGITS];
    data.copy_from_slice(&digits);

    let mut code: String = data.iter().map(|d| char::from(b'0' + d)).collect();
    code.push(char::from(b'0' + check_digit(&data)));
    code
}

/// Synthesize from a string slice (empty behaves like missing).
pub fn synthesize_str(input: &str) -> String {
    synthesize(Some(input))
}

/// EAN-13 check digit: weights 1,3,1,3,... over the 12 data digits.
pub fn check_digit(data: &[u8; DATA_DIGITS]) -> u8 {
    let sum: u32 = data
        .iter()
        .enumerate()
        .map(|(i, &d)| if i % 2 == 0 { d as u32 } else { d as u32 * 3 })
        .sum();
    ((10 - (sum % 10)) % 10) as u8
}

/// True if `code` is 13 ASCII digits with a correct check digit.
pub fn is_valid(code: &str) -> bool {
    let bytes = code.as_bytes();
    if bytes.len() != DATA_DIGITS + 1 || !bytes.iter().all(u8::is_ascii_digit) {
        return false;
    }
    let mut data = [0u8; DATA_DIGITS];
    for (slot, b) in data.iter_mut().zip(bytes) {
        *slot = b - b'0';
    }
    check_digit(&data) == bytes[DATA_DIGITS] - b'0'
}

/// The 12 data digits of a synthesized code (what 1D encoders take).
pub fn data_part(code: &str) -> &str {
    &code[..code.len().min(DATA_DIGITS)]
}
