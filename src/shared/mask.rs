/// Mask for DD/MM/YYYY date inputs
pub const DATE_MASK: &str = "00/00/0000";

/// Mask for HH:MM time inputs
pub const TIME_MASK: &str = "00:00";

/// Digit placeholder inside a mask; every other mask character is a literal
const DIGIT_SLOT: char = '0';

/// Apply a fixed-width input mask to raw typed text.
///
/// Only digits are taken from `raw`. Each `0` slot consumes one digit, literal
/// separators are emitted only when another digit follows them, and digits
/// beyond the mask are dropped.
pub fn apply_mask(mask: &str, raw: &str) -> String {
    let mut digits = raw.chars().filter(|c| c.is_ascii_digit()).peekable();
    let mut out = String::with_capacity(mask.len());

    for slot in mask.chars() {
        if digits.peek().is_none() {
            break;
        }
        if slot == DIGIT_SLOT {
            if let Some(d) = digits.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }

    out
}
