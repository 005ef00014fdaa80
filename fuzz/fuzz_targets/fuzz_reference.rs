#![no_main]

use libfuzzer_sys::fuzz_target;
use zahlteil::{Iban, Reference};

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        let _ = Iban::parse(s);
        let _ = Reference::qr(s);
        let _ = Reference::qr_from_digits(s);
        let _ = Reference::creditor(s);
        let _ = Reference::creditor_from_body(s);
    }
});
