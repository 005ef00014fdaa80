#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(bill) = zahlteil::QrBill::parse(s) else {
        return;
    };
    // A decoded bill must re-encode, and re-encoding must be stable.
    let payload = bill.to_payload().expect("decoded bill must re-encode");
    let again = zahlteil::QrBill::parse(&payload.as_text()).expect("re-encoded payload must decode");
    assert_eq!(again, bill);
});
