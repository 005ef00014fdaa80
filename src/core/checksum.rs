//! Check-digit arithmetic shared by IBANs and payment references.

/// Carry sequence of the recursive modulo-10 scheme (SIX/PostFinance).
const MOD10_SEQUENCE: [u8; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

/// Transition table indexed by `[carry][digit]`.
const MOD10_TABLE: [[u8; 10]; 10] = mod10_table();

/// Check digit for each final carry.
const MOD10_CHECK: [u8; 10] = [0, 9, 8, 7, 6, 5, 4, 3, 2, 1];

const fn mod10_table() -> [[u8; 10]; 10] {
    let mut table = [[0u8; 10]; 10];
    let mut carry = 0;
    while carry < 10 {
        let mut digit = 0;
        while digit < 10 {
            table[carry][digit] = MOD10_SEQUENCE[(carry + digit) % 10];
            digit += 1;
        }
        carry += 1;
    }
    table
}

/// Recursive modulo-10 check digit over a string of ASCII digits.
///
/// Returns `None` if `digits` contains anything but `0`-`9`.
pub fn mod10_recursive(digits: &str) -> Option<u8> {
    let mut carry = 0u8;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            return None;
        }
        carry = MOD10_TABLE[carry as usize][(b - b'0') as usize];
    }
    Some(MOD10_CHECK[carry as usize])
}

/// ISO 7064 mod 97-10 remainder of an alphanumeric string.
///
/// Letters count as two-digit numbers (A=10 … Z=35). The string is folded
/// digit by digit so arbitrary lengths never overflow. The caller is
/// responsible for any rearrangement (moving the first four characters to the
/// end for IBANs and creditor references). Returns `None` on characters
/// outside `0-9A-Z`.
pub fn mod97(value: &str) -> Option<u32> {
    let mut remainder = 0u32;
    for c in value.chars() {
        let n = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return None,
        };
        remainder = if n < 10 {
            (remainder * 10 + n) % 97
        } else {
            (remainder * 100 + n) % 97
        };
    }
    Some(remainder)
}

/// Move the leading four characters (country/`RF` + check digits) to the end.
pub(crate) fn rearrange(value: &str) -> String {
    let (head, tail) = value.split_at(4);
    format!("{tail}{head}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rows_are_shifted_sequence() {
        assert_eq!(MOD10_TABLE[0], MOD10_SEQUENCE);
        assert_eq!(MOD10_TABLE[1], [9, 4, 6, 8, 2, 7, 1, 3, 5, 0]);
        assert_eq!(MOD10_TABLE[9][1], 0);
    }

    #[test]
    fn mod10_known_reference() {
        // Published SIX example reference 21 00000 00003 13947 14300 09017
        assert_eq!(mod10_recursive("21000000000313947143000901"), Some(7));
        assert_eq!(mod10_recursive("21000000000313947143000902"), Some(5));
        assert_eq!(mod10_recursive("00000000000000000000000001"), Some(1));
        assert_eq!(mod10_recursive(""), Some(0));
    }

    #[test]
    fn mod10_rejects_non_digits() {
        assert_eq!(mod10_recursive("12a4"), None);
        assert_eq!(mod10_recursive("12 4"), None);
    }

    #[test]
    fn mod97_iban() {
        assert_eq!(mod97(&rearrange("CH4709000000160414020")), Some(1));
        assert_eq!(mod97(&rearrange("CH4709000000164014020")).map(|r| r == 1), Some(false));
    }

    #[test]
    fn mod97_creditor_reference() {
        assert_eq!(mod97(&rearrange("RF18539007547034")), Some(1));
    }

    #[test]
    fn mod97_rejects_lowercase() {
        assert_eq!(mod97("ch47"), None);
    }
}
