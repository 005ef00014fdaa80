use serde::{Deserialize, Serialize};

use super::charset::{describe_forbidden, first_forbidden_char};
use super::countries::is_known_country_code;
use super::error::{AddressRole, QrBillError, ValidationError};

/// Number of payload elements every address block occupies.
pub const ADDRESS_LINES: usize = 7;

pub const MAX_NAME: usize = 70;
pub const MAX_ADDRESS_LINE: usize = 70;
pub const MAX_BUILDING_NUMBER: usize = 16;
pub const MAX_POSTAL_CODE: usize = 16;
pub const MAX_TOWN: usize = 35;

/// AdrTp: how the address block is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddressType {
    /// S: street, building number, postal code and town in separate fields.
    Structured,
    /// K: two free lines; the second carries postal code and town.
    Combined,
}

impl AddressType {
    /// Code letter used in the payload.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Structured => "S",
            Self::Combined => "K",
        }
    }

    /// Parse the payload code letter.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(Self::Structured),
            "K" => Some(Self::Combined),
            _ => None,
        }
    }
}

/// A validated creditor or debtor address.
///
/// Only obtainable through [`AddressBuilder::build`] or payload decoding, so
/// every instance satisfies the field rules of its [`AddressType`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Address {
    address_type: AddressType,
    name: String,
    line1: String,
    line2: String,
    postal_code: String,
    town: String,
    country_code: String,
}

impl Address {
    pub fn address_type(&self) -> AddressType {
        self.address_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Street (structured) or first free line (combined).
    pub fn line1(&self) -> &str {
        &self.line1
    }

    /// Building number (structured) or second free line (combined).
    pub fn line2(&self) -> &str {
        &self.line2
    }

    /// Empty for combined addresses.
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Empty for combined addresses.
    pub fn town(&self) -> &str {
        &self.town
    }

    pub fn country_code(&self) -> &str {
        &self.country_code
    }

    /// The seven payload elements in order: AdrTp, Name, StrtNmOrAdrLine1,
    /// BldgNbOrAdrLine2, PstCd, TwnNm, Ctry.
    pub fn to_lines(&self) -> [String; ADDRESS_LINES] {
        [
            self.address_type.code().to_string(),
            self.name.clone(),
            self.line1.clone(),
            self.line2.clone(),
            self.postal_code.clone(),
            self.town.clone(),
            self.country_code.clone(),
        ]
    }

    /// Decode an address block from its seven payload elements.
    ///
    /// An all-blank block decodes to `None` (absent optional party).
    pub fn from_lines(
        lines: &[&str],
        role: Option<AddressRole>,
    ) -> Result<Option<Self>, QrBillError> {
        let prefix = role.map(|r| r.to_string()).unwrap_or_else(|| "address".into());
        let [kind, name, line1, line2, postal_code, town, country] = lines else {
            return Err(QrBillError::InvalidAddress {
                role,
                errors: vec![ValidationError::new(
                    prefix,
                    format!("expected {ADDRESS_LINES} lines, found {}", lines.len()),
                )],
            });
        };
        if lines.iter().all(|l| l.is_empty()) {
            return Ok(None);
        }
        let Some(address_type) = AddressType::from_code(kind) else {
            return Err(QrBillError::InvalidAddress {
                role,
                errors: vec![ValidationError::with_element(
                    format!("{prefix}.address_type"),
                    format!("unknown address type '{kind}'"),
                    "AdrTp",
                )],
            });
        };
        AddressBuilder {
            address_type,
            name: name.to_string(),
            line1: line1.to_string(),
            line2: line2.to_string(),
            postal_code: postal_code.to_string(),
            town: town.to_string(),
            country_code: country.to_string(),
        }
        .build_with_role(role)
        .map(Some)
    }

    /// The blank block emitted for an absent optional party.
    pub fn empty_lines() -> [String; ADDRESS_LINES] {
        Default::default()
    }
}

/// Builder for [`Address`]. Raw input goes in; `build` validates it.
///
/// ```
/// use zahlteil::core::*;
///
/// let address = AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
///     .street("Dammweg")
///     .building_number("41")
///     .build()
///     .unwrap();
/// assert_eq!(address.to_lines()[0], "S");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AddressBuilder {
    address_type: AddressType,
    name: String,
    #[serde(default)]
    line1: String,
    #[serde(default)]
    line2: String,
    #[serde(default)]
    postal_code: String,
    #[serde(default)]
    town: String,
    country_code: String,
}

impl AddressBuilder {
    /// Start a structured (type S) address.
    pub fn structured(
        name: impl Into<String>,
        postal_code: impl Into<String>,
        town: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address_type: AddressType::Structured,
            name: name.into(),
            line1: String::new(),
            line2: String::new(),
            postal_code: postal_code.into(),
            town: town.into(),
            country_code: country_code.into(),
        }
    }

    /// Start a combined (type K) address; `line2` carries postal code and town.
    pub fn combined(
        name: impl Into<String>,
        line2: impl Into<String>,
        country_code: impl Into<String>,
    ) -> Self {
        Self {
            address_type: AddressType::Combined,
            name: name.into(),
            line1: String::new(),
            line2: line2.into(),
            postal_code: String::new(),
            town: String::new(),
            country_code: country_code.into(),
        }
    }

    pub fn street(mut self, street: impl Into<String>) -> Self {
        self.line1 = street.into();
        self
    }

    pub fn building_number(mut self, number: impl Into<String>) -> Self {
        self.line2 = number.into();
        self
    }

    pub fn line1(mut self, line: impl Into<String>) -> Self {
        self.line1 = line.into();
        self
    }

    pub fn line2(mut self, line: impl Into<String>) -> Self {
        self.line2 = line.into();
        self
    }

    pub fn postal_code(mut self, postal_code: impl Into<String>) -> Self {
        self.postal_code = postal_code.into();
        self
    }

    pub fn town(mut self, town: impl Into<String>) -> Self {
        self.town = town.into();
        self
    }

    /// Validate and build. Reports every field problem at once.
    pub fn build(self) -> Result<Address, QrBillError> {
        self.build_with_role(None)
    }

    pub(crate) fn build_with_role(self, role: Option<AddressRole>) -> Result<Address, QrBillError> {
        let address = Address {
            address_type: self.address_type,
            name: trim_spaces(self.name),
            line1: trim_spaces(self.line1),
            line2: trim_spaces(self.line2),
            postal_code: trim_spaces(self.postal_code),
            town: trim_spaces(self.town),
            country_code: trim_spaces(self.country_code),
        };
        let prefix = role.map(|r| r.to_string()).unwrap_or_else(|| "address".into());
        let errors = validate_address(&address, &prefix);
        if errors.is_empty() {
            Ok(address)
        } else {
            Err(QrBillError::InvalidAddress { role, errors })
        }
    }
}

/// Validate an address against the QR-bill field rules.
/// Returns all validation errors found (not just the first).
pub fn validate_address(address: &Address, prefix: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    required(&address.name, "name", "Name", prefix, &mut errors);
    max_len(&address.name, MAX_NAME, "name", "Name", prefix, &mut errors);

    match address.address_type {
        AddressType::Structured => {
            max_len(&address.line1, MAX_ADDRESS_LINE, "street", "StrtNmOrAdrLine1", prefix, &mut errors);
            max_len(&address.line2, MAX_BUILDING_NUMBER, "building_number", "BldgNbOrAdrLine2", prefix, &mut errors);
            required(&address.postal_code, "postal_code", "PstCd", prefix, &mut errors);
            max_len(&address.postal_code, MAX_POSTAL_CODE, "postal_code", "PstCd", prefix, &mut errors);
            required(&address.town, "town", "TwnNm", prefix, &mut errors);
            max_len(&address.town, MAX_TOWN, "town", "TwnNm", prefix, &mut errors);

            if !address.postal_code.is_empty() && !address.town.is_empty() {
                let locality = format!("{} {}", address.postal_code, address.town).to_lowercase();
                for (value, field, element) in [
                    (&address.line1, "street", "StrtNmOrAdrLine1"),
                    (&address.line2, "building_number", "BldgNbOrAdrLine2"),
                ] {
                    if value.to_lowercase().contains(&locality) {
                        errors.push(ValidationError::with_element(
                            format!("{prefix}.{field}"),
                            "postal code and town belong in their own fields for a structured address",
                            element,
                        ));
                    }
                }
            }
        }
        AddressType::Combined => {
            max_len(&address.line1, MAX_ADDRESS_LINE, "line1", "StrtNmOrAdrLine1", prefix, &mut errors);
            required(&address.line2, "line2", "BldgNbOrAdrLine2", prefix, &mut errors);
            max_len(&address.line2, MAX_ADDRESS_LINE, "line2", "BldgNbOrAdrLine2", prefix, &mut errors);
            for (value, field, element) in [
                (&address.postal_code, "postal_code", "PstCd"),
                (&address.town, "town", "TwnNm"),
            ] {
                if !value.is_empty() {
                    errors.push(ValidationError::with_element(
                        format!("{prefix}.{field}"),
                        format!("{field} must be empty for a combined address (put it in line2)"),
                        element,
                    ));
                }
            }
        }
    }

    if address.country_code.is_empty() {
        errors.push(ValidationError::with_element(
            format!("{prefix}.country_code"),
            "country code must not be empty",
            "Ctry",
        ));
    } else if !is_known_country_code(&address.country_code) {
        errors.push(ValidationError::with_element(
            format!("{prefix}.country_code"),
            format!(
                "country code '{}' is not a known ISO 3166-1 alpha-2 code",
                address.country_code
            ),
            "Ctry",
        ));
    }

    for (value, field) in [
        (&address.name, "name"),
        (&address.line1, "line1"),
        (&address.line2, "line2"),
        (&address.postal_code, "postal_code"),
        (&address.town, "town"),
    ] {
        if let Some((pos, c)) = first_forbidden_char(value) {
            errors.push(ValidationError::new(
                format!("{prefix}.{field}"),
                describe_forbidden(pos, c),
            ));
        }
    }

    errors
}

fn required(
    value: &str,
    field: &str,
    element: &str,
    prefix: &str,
    errors: &mut Vec<ValidationError>,
) {
    if value.is_empty() {
        errors.push(ValidationError::with_element(
            format!("{prefix}.{field}"),
            format!("{field} must not be empty"),
            element,
        ));
    }
}

fn max_len(
    value: &str,
    max: usize,
    field: &str,
    element: &str,
    prefix: &str,
    errors: &mut Vec<ValidationError>,
) {
    let len = value.chars().count();
    if len > max {
        errors.push(ValidationError::with_element(
            format!("{prefix}.{field}"),
            format!("{field} is {len} characters, at most {max} allowed"),
            element,
        ));
    }
}

/// Strip surrounding spaces only; other whitespace is left for the charset check.
fn trim_spaces(value: String) -> String {
    let trimmed = value.trim_matches(' ');
    if trimmed.len() == value.len() {
        value
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::Stage;

    fn bern() -> AddressBuilder {
        AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
            .street("Dammweg")
            .building_number("41")
    }

    fn fields(err: QrBillError) -> Vec<String> {
        match err {
            QrBillError::InvalidAddress { errors, .. } => {
                errors.into_iter().map(|e| e.field).collect()
            }
            other => panic!("unexpected error {other}"),
        }
    }

    #[test]
    fn structured_address_lines() {
        let address = bern().build().unwrap();
        assert_eq!(
            address.to_lines(),
            ["S", "Velokurier Bern", "Dammweg", "41", "3013", "Bern", "CH"].map(String::from)
        );
    }

    #[test]
    fn combined_address_lines() {
        let address = AddressBuilder::combined("Jane Doe", "3000 Bern", "CH")
            .line1("Marktgasse 1")
            .build()
            .unwrap();
        assert_eq!(
            address.to_lines(),
            ["K", "Jane Doe", "Marktgasse 1", "3000 Bern", "", "", "CH"].map(String::from)
        );
    }

    #[test]
    fn surrounding_spaces_are_trimmed() {
        let address = AddressBuilder::structured("  Jane Doe ", " 3000", "Bern ", "CH")
            .build()
            .unwrap();
        assert_eq!(address.name(), "Jane Doe");
        assert_eq!(address.postal_code(), "3000");
        assert_eq!(address.town(), "Bern");
    }

    #[test]
    fn structured_requires_postal_code_and_town() {
        let err = AddressBuilder::structured("Jane Doe", "", "", "CH")
            .build()
            .unwrap_err();
        assert_eq!(fields(err), ["address.postal_code", "address.town"]);
    }

    #[test]
    fn structured_rejects_locality_in_street_lines() {
        let err = bern().street("Dammweg 41, 3013 Bern").build().unwrap_err();
        assert_eq!(fields(err), ["address.street"]);
    }

    #[test]
    fn combined_rejects_separate_postal_fields() {
        let err = AddressBuilder::combined("Jane Doe", "3000 Bern", "CH")
            .postal_code("3000")
            .town("Bern")
            .build()
            .unwrap_err();
        assert_eq!(fields(err), ["address.postal_code", "address.town"]);
    }

    #[test]
    fn combined_requires_line2() {
        let err = AddressBuilder::combined("Jane Doe", "", "CH").build().unwrap_err();
        assert_eq!(fields(err), ["address.line2"]);
    }

    #[test]
    fn errors_are_aggregated() {
        let err = AddressBuilder::structured("x".repeat(71), "3013", "B".repeat(36), "XX")
            .building_number("12345678901234567")
            .build_with_role(Some(AddressRole::Debtor))
            .unwrap_err();
        assert_eq!(err.stage(), Stage::DebtorAddress);
        assert_eq!(
            fields(err),
            [
                "debtor.name",
                "debtor.building_number",
                "debtor.town",
                "debtor.country_code"
            ]
        );
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let name = "ä".repeat(70);
        assert!(AddressBuilder::structured(name, "3013", "Bern", "CH").build().is_ok());
    }

    #[test]
    fn forbidden_characters_are_rejected() {
        let err = AddressBuilder::structured("Jane\tDoe", "3013", "Bern", "CH")
            .build()
            .unwrap_err();
        assert_eq!(fields(err), ["address.name"]);
    }

    #[test]
    fn unknown_country_is_rejected() {
        let err = AddressBuilder::structured("Jane Doe", "3013", "Bern", "ch")
            .build()
            .unwrap_err();
        assert_eq!(fields(err), ["address.country_code"]);
    }

    #[test]
    fn lines_round_trip() {
        let address = bern().build().unwrap();
        let lines = address.to_lines();
        let refs: Vec<&str> = lines.iter().map(String::as_str).collect();
        let decoded = Address::from_lines(&refs, Some(AddressRole::Creditor))
            .unwrap()
            .unwrap();
        assert_eq!(decoded, address);
    }

    #[test]
    fn blank_block_decodes_to_none() {
        let refs = [""; ADDRESS_LINES];
        assert_eq!(Address::from_lines(&refs, None).unwrap(), None);
    }

    #[test]
    fn unknown_type_code_is_rejected() {
        let refs = ["X", "Jane", "", "", "3000", "Bern", "CH"];
        let err = Address::from_lines(&refs, None).unwrap_err();
        assert_eq!(fields(err), ["address.address_type"]);
    }
}
