#![cfg(feature = "png")]

use zahlteil::core::*;
use zahlteil::registration::*;

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n'];

fn payload() -> Payload {
    QrBillBuilder::new(
        "CH47 0900 0000 1604 1402 0",
        AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
            .street("Dammweg")
            .building_number("41"),
    )
    .amount_whole_units(30)
    .remittance("Jane Doe 42 jane@example.com")
    .build()
    .unwrap()
}

#[test]
fn renders_square_png() {
    let image = QrPngRenderer::new().module_size(3).render(&payload()).unwrap();
    assert_eq!(image.media_type, "image/png");
    assert_eq!(&image.bytes[..8], PNG_SIGNATURE);

    let decoded = image::load_from_memory(&image.bytes).unwrap();
    assert_eq!(decoded.width(), decoded.height());
    assert_eq!(decoded.width() % 3, 0);
}

#[test]
fn largest_valid_payload_fits() {
    let party = |c: &str| AddressBuilder::combined(c.repeat(70), "L".repeat(70), "CH").line1("M".repeat(70));
    let payload = QrBillBuilder::new("CH47 0900 0000 1604 1402 0", party("C"))
        .debtor(party("D"))
        .amount(rust_decimal_macros::dec!(999999999.99))
        .creditor_reference("RF18539007547034")
        .remittance("x".repeat(140))
        .build()
        .unwrap();
    assert!(payload.byte_len() <= MAX_PAYLOAD_BYTES);
    assert!(QrPngRenderer::new().render(&payload).is_ok());
}

#[test]
fn generator_embeds_png() {
    let config = BillConfig::new(
        "CH47 0900 0000 1604 1402 0",
        CreditorConfig::new("Velokurier Bern", "3013", "Bern").street("Dammweg", "41"),
    );
    let generator = PaymentCodeGenerator::new(config, QrPngRenderer::default());
    let code = generator
        .generate(&Registration::new("Jane", "jane@example.com", 42, 30))
        .unwrap();
    assert!(code.data_uri.starts_with("data:image/png;base64,iVBORw0KGgo"));
}
