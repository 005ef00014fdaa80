use super::address::AddressType;
use super::charset::{describe_forbidden, first_forbidden_char};
use super::error::ValidationError;
use super::payload::*;
use super::reference::ReferenceType;

/// Maximum characters per element, indexed by position.
const MAX_LINE_CHARS: [usize; PAYLOAD_LINES] = [
    3, 4, 1, 21, // header, IBAN
    1, 70, 70, 70, 16, 35, 2, // creditor
    1, 70, 70, 70, 16, 35, 2, // ultimate creditor
    12, 3, // amount, currency
    1, 70, 70, 70, 16, 35, 2, // ultimate debtor
    4, 27, 140, 3, // reference type, reference, message, trailer
];

/// Final structural pass over an assembled payload.
///
/// Checks element count, fixed header/trailer values, per-element length,
/// the permitted character set, code values and the total byte budget.
/// Returns all validation errors found (not just the first).
pub fn validate_payload(payload: &Payload) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let lines = payload.lines();

    if lines.len() != PAYLOAD_LINES {
        errors.push(ValidationError::new(
            "payload",
            format!("expected {PAYLOAD_LINES} elements, found {}", lines.len()),
        ));
        return errors;
    }

    for (index, expected, element) in [
        (line::QR_TYPE, QR_TYPE, "QRType"),
        (line::VERSION, VERSION, "Version"),
        (line::CODING_TYPE, CODING_TYPE, "Coding"),
        (line::TRAILER, TRAILER, "Trailer"),
    ] {
        if lines[index] != expected {
            errors.push(ValidationError::with_element(
                format!("line[{index}]"),
                format!("expected '{expected}', found '{}'", lines[index]),
                element,
            ));
        }
    }

    for (index, value) in lines.iter().enumerate() {
        let len = value.chars().count();
        if len > MAX_LINE_CHARS[index] {
            errors.push(ValidationError::new(
                format!("line[{index}]"),
                format!("{len} characters exceed the limit of {}", MAX_LINE_CHARS[index]),
            ));
        }
        if let Some((pos, c)) = first_forbidden_char(value) {
            errors.push(ValidationError::new(
                format!("line[{index}]"),
                describe_forbidden(pos, c),
            ));
        }
    }

    if lines[line::IBAN].is_empty() {
        errors.push(ValidationError::with_element(
            format!("line[{}]", line::IBAN),
            "IBAN must not be empty",
            "IBAN",
        ));
    }

    for (start, optional) in [
        (line::CREDITOR, false),
        (line::ULTIMATE_CREDITOR, true),
        (line::DEBTOR, true),
    ] {
        let block = &lines[start..start + 7];
        let blank = block.iter().all(String::is_empty);
        if blank && optional {
            continue;
        }
        if AddressType::from_code(&block[0]).is_none() {
            errors.push(ValidationError::with_element(
                format!("line[{start}]"),
                format!("address type must be S or K, found '{}'", block[0]),
                "AdrTp",
            ));
        }
    }

    if !matches!(lines[line::CURRENCY].as_str(), "CHF" | "EUR") {
        errors.push(ValidationError::with_element(
            format!("line[{}]", line::CURRENCY),
            format!("currency must be CHF or EUR, found '{}'", lines[line::CURRENCY]),
            "Ccy",
        ));
    }

    match ReferenceType::from_code(&lines[line::REFERENCE_TYPE]) {
        None => errors.push(ValidationError::with_element(
            format!("line[{}]", line::REFERENCE_TYPE),
            format!(
                "reference type must be QRR, SCOR or NON, found '{}'",
                lines[line::REFERENCE_TYPE]
            ),
            "Tp",
        )),
        Some(ReferenceType::Non) if !lines[line::REFERENCE].is_empty() => {
            errors.push(ValidationError::with_element(
                format!("line[{}]", line::REFERENCE),
                "reference must be empty for type NON",
                "Ref",
            ))
        }
        Some(ReferenceType::Qrr | ReferenceType::Scor) if lines[line::REFERENCE].is_empty() => {
            errors.push(ValidationError::with_element(
                format!("line[{}]", line::REFERENCE),
                "reference must not be empty for type QRR or SCOR",
                "Ref",
            ))
        }
        Some(_) => {}
    }

    let bytes = payload.byte_len();
    if bytes > MAX_PAYLOAD_BYTES {
        errors.push(ValidationError::new(
            "payload",
            format!("{bytes} bytes exceed the QR capacity of {MAX_PAYLOAD_BYTES} bytes"),
        ));
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_lines() -> Vec<String> {
        let mut lines = vec![String::new(); PAYLOAD_LINES];
        lines[line::QR_TYPE] = QR_TYPE.into();
        lines[line::VERSION] = VERSION.into();
        lines[line::CODING_TYPE] = CODING_TYPE.into();
        lines[line::IBAN] = "CH4709000000160414020".into();
        lines[line::CREDITOR] = "K".into();
        lines[line::CREDITOR + 1] = "Velokurier Bern".into();
        lines[line::CREDITOR + 3] = "3013 Bern".into();
        lines[line::CREDITOR + 6] = "CH".into();
        lines[line::AMOUNT] = "30.00".into();
        lines[line::CURRENCY] = "CHF".into();
        lines[line::REFERENCE_TYPE] = "NON".into();
        lines[line::UNSTRUCTURED_MESSAGE] = "Jane Doe 42 jane@example.com".into();
        lines[line::TRAILER] = TRAILER.into();
        lines
    }

    fn check(lines: Vec<String>) -> Vec<String> {
        validate_payload(&Payload::from_lines_unchecked(lines))
            .into_iter()
            .map(|e| e.field)
            .collect()
    }

    #[test]
    fn valid_payload_passes() {
        assert!(check(valid_lines()).is_empty());
    }

    #[test]
    fn limits_cover_every_line() {
        assert_eq!(MAX_LINE_CHARS.len(), PAYLOAD_LINES);
        assert_eq!(MAX_LINE_CHARS[line::UNSTRUCTURED_MESSAGE], 140);
        assert_eq!(MAX_LINE_CHARS[line::DEBTOR + 5], 35);
    }

    #[test]
    fn wrong_count_stops_early() {
        let mut lines = valid_lines();
        lines.push(String::new());
        assert_eq!(check(lines), ["payload"]);
    }

    #[test]
    fn header_and_trailer_are_fixed() {
        let mut lines = valid_lines();
        lines[line::VERSION] = "0100".into();
        lines[line::TRAILER] = "END".into();
        assert_eq!(check(lines), ["line[1]", "line[30]"]);
    }

    #[test]
    fn illegal_character_is_caught() {
        let mut lines = valid_lines();
        lines[line::UNSTRUCTURED_MESSAGE] = "Jane\u{0}Doe".into();
        assert_eq!(check(lines), ["line[29]"]);
    }

    #[test]
    fn overlong_element_is_caught() {
        let mut lines = valid_lines();
        lines[line::CREDITOR + 1] = "x".repeat(71);
        assert_eq!(check(lines), ["line[5]"]);
    }

    #[test]
    fn code_values_are_checked() {
        let mut lines = valid_lines();
        lines[line::CREDITOR] = "X".into();
        lines[line::CURRENCY] = "USD".into();
        lines[line::REFERENCE_TYPE] = "ABC".into();
        assert_eq!(check(lines), ["line[4]", "line[19]", "line[27]"]);
    }

    #[test]
    fn reference_presence_matches_type() {
        let mut lines = valid_lines();
        lines[line::REFERENCE] = "RF18539007547034".into();
        assert_eq!(check(lines), ["line[28]"]);

        let mut lines = valid_lines();
        lines[line::REFERENCE_TYPE] = "QRR".into();
        assert_eq!(check(lines), ["line[28]"]);
    }

    #[test]
    fn byte_budget_is_enforced() {
        let mut lines = valid_lines();
        for block in [line::ULTIMATE_CREDITOR, line::DEBTOR] {
            lines[block] = "K".into();
            lines[block + 1] = "N".repeat(70);
            lines[block + 2] = "L".repeat(70);
            lines[block + 3] = "M".repeat(70);
            lines[block + 6] = "CH".into();
        }
        lines[line::CREDITOR + 1] = "N".repeat(70);
        lines[line::CREDITOR + 2] = "L".repeat(70);
        lines[line::CREDITOR + 3] = "M".repeat(70);
        lines[line::REFERENCE_TYPE] = "SCOR".into();
        lines[line::REFERENCE] = "RF18539007547034ABCDEFGHI".into();
        lines[line::UNSTRUCTURED_MESSAGE] = "ü".repeat(140);
        assert_eq!(check(lines), ["payload"]);
    }
}
