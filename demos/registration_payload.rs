use zahlteil::registration::*;
use zahlteil::{Payload, QrBillError};

/// Stand-in for a real QR renderer: embeds the payload text itself.
struct PlainText;

impl PayloadRenderer for PlainText {
    fn render(&self, payload: &Payload) -> Result<RenderedImage, QrBillError> {
        Ok(RenderedImage::new("text/plain", payload.as_text().into_bytes()))
    }
}

fn main() {
    let config = BillConfig::new(
        "CH47 0900 0000 1604 1402 0",
        CreditorConfig::new("Velokurier Bern", "3013", "Bern").street("Dammweg", "41"),
    );
    if let Err(e) = config.validate() {
        eprintln!("Configuration rejected: {e}");
        std::process::exit(1);
    }

    let generator = PaymentCodeGenerator::new(config, PlainText);
    let registrations = [
        Registration::new("Jane", "jane@example.com", 42, 30).nick_name("Jane Doe"),
        Registration::new("Hans", "hans@example.ch", 7, 45).payment_method("QR-bill"),
        Registration::new("Anna", "anna@example.ch", 108, 0),
    ];

    for registration in &registrations {
        match generator.generate(registration) {
            Ok(code) => {
                println!("--- #{} ({} bytes) ---", registration.race_number, code.payload.byte_len());
                println!("{}", code.payload);
                println!("{}...", &code.data_uri[..60.min(code.data_uri.len())]);
            }
            Err(e) => eprintln!("#{}: [{}] {e}", registration.race_number, e.stage()),
        }
    }
}
