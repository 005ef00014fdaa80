use zahlteil::registration::*;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BillConfig::new(
        "CH47 0900 0000 1604 1402 0",
        CreditorConfig::new("Velokurier Bern", "3013", "Bern").street("Dammweg", "41"),
    );
    let registration = Registration::new("Jane", "jane@example.com", 42, 30).nick_name("Jane Doe");

    let renderer = QrPngRenderer::new().module_size(6);
    let payload = PaymentCodeGenerator::new(config.clone(), renderer).payload(&registration)?;
    let image = renderer.render(&payload)?;
    std::fs::write("payment_code.png", &image.bytes)?;
    println!("Wrote payment_code.png ({} bytes)", image.bytes.len());

    let code = PaymentCodeGenerator::new(config, renderer).generate(&registration)?;
    println!("<img src=\"{}\" alt=\"QR-bill\">", code.data_uri);
    Ok(())
}
