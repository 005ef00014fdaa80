use zahlteil::core::*;

fn main() {
    let creditor = || {
        AddressBuilder::structured("Velokurier Bern", "3013", "Bern", "CH")
            .street("Dammweg")
            .building_number("41")
    };

    // QRR reference on a QR-IBAN
    let bill = QrBillBuilder::new("CH44 3199 9123 0008 8901 2", creditor())
        .amount_whole_units(30)
        .qr_reference_from_digits("42")
        .build_bill()
        .expect("valid QRR bill");
    println!("IBAN:      {}", bill.iban().formatted());
    println!("Reference: {}", bill.reference().formatted());

    // ISO 11649 creditor reference on a regular IBAN
    let bill = QrBillBuilder::new("CH47 0900 0000 1604 1402 0", creditor())
        .amount_whole_units(30)
        .creditor_reference_from_body("race42")
        .build_bill()
        .expect("valid SCOR bill");
    println!("IBAN:      {}", bill.iban().formatted());
    println!("Reference: {}", bill.reference().formatted());

    // Mismatched account and reference type
    match QrBillBuilder::new("CH47 0900 0000 1604 1402 0", creditor())
        .qr_reference_from_digits("42")
        .build()
    {
        Ok(_) => println!("unexpectedly accepted"),
        Err(e) => println!("Rejected at {}: {e}", e.stage()),
    }

    // Decode a payload back into a bill
    let text = bill.to_payload().expect("payload").as_text();
    match QrBill::parse(&text) {
        Ok(decoded) => println!("Decoded amount: {}", decoded.amount().amount_line()),
        Err(e) => println!("Decode failed: {e}"),
    }
}
