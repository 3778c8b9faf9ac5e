use base64::{engine::general_purpose::STANDARD, Engine};

use super::schemas::{PaymentMethodType, PaymentStageType};
use super::utils::{generate_payment_url, render_qr_data_url};
use crate::routes::order::schemas::OrderPaymentStatus;

#[test]
fn manual_comprobante_path_walks_upload_and_verification() {
    use PaymentStageType::*;
    assert!(Pending.can_transition_to(QrUploaded));
    assert!(QrUploaded.can_transition_to(Verified));
    assert!(Verified.can_transition_to(Completed));
    // The dashboard may also confirm straight off the uploaded comprobante.
    assert!(QrUploaded.can_transition_to(Completed));
}

#[test]
fn generated_qr_path_confirms_straight_from_pending() {
    use PaymentStageType::*;
    // Out-of-band bank confirmation: no comprobante ever passes through.
    assert!(Pending.can_transition_to(Completed));
    // The asymmetry is one-way: verification cannot be skipped into.
    assert!(!Pending.can_transition_to(Verified));
}

#[test]
fn reject_is_legal_from_every_live_stage() {
    use PaymentStageType::*;
    assert!(Pending.can_transition_to(Failed));
    assert!(QrUploaded.can_transition_to(Failed));
    assert!(Verified.can_transition_to(Failed));
    assert!(!Completed.can_transition_to(Failed));
}

#[test]
fn terminal_stages_accept_no_transition() {
    use PaymentStageType::*;
    for next in [Pending, QrUploaded, Verified, Completed, Failed] {
        assert!(!Completed.can_transition_to(next));
        assert!(!Failed.can_transition_to(next));
    }
    assert!(Completed.is_terminal());
    assert!(Failed.is_terminal());
}

#[test]
fn only_terminal_stages_drive_the_order_mirror() {
    use PaymentStageType::*;
    assert_eq!(
        Completed.as_order_payment_status(),
        Some(OrderPaymentStatus::Paid)
    );
    assert_eq!(
        Failed.as_order_payment_status(),
        Some(OrderPaymentStatus::Failed)
    );
    assert_eq!(Pending.as_order_payment_status(), None);
    assert_eq!(QrUploaded.as_order_payment_status(), None);
    assert_eq!(Verified.as_order_payment_status(), None);
}

#[test]
fn dashboard_paid_label_is_an_alias_of_completed() {
    let stage: PaymentStageType = serde_json::from_str(r#""paid""#).unwrap();
    assert_eq!(stage, PaymentStageType::Completed);
    let stage: PaymentStageType = serde_json::from_str(r#""completed""#).unwrap();
    assert_eq!(stage, PaymentStageType::Completed);
    // Serialization always uses the canonical spelling.
    assert_eq!(
        serde_json::to_string(&PaymentStageType::Completed).unwrap(),
        r#""completed""#
    );
}

#[test]
fn only_proof_bearing_methods_take_an_uploaded_comprobante() {
    assert!(PaymentMethodType::QrCode.supports_proof_upload());
    assert!(PaymentMethodType::Transfer.supports_proof_upload());
    assert!(!PaymentMethodType::Cash.supports_proof_upload());
    assert!(!PaymentMethodType::Card.supports_proof_upload());
}

#[test]
fn payment_url_embeds_the_order_id() {
    let url = generate_payment_url(42, "https://resto.example");
    assert!(url.starts_with("https://resto.example/pay/42?ts="));

    // Two issuances produce distinct cache-busting URLs only through the
    // timestamp; the path stays stable.
    let again = generate_payment_url(42, "https://resto.example");
    assert_eq!(
        url.split('?').next().unwrap(),
        again.split('?').next().unwrap()
    );
}

#[test]
fn qr_artifact_is_a_base64_svg_data_url() {
    let url = generate_payment_url(42, "https://resto.example");
    let artifact = render_qr_data_url(&url).unwrap();

    let encoded = artifact
        .strip_prefix("data:image/svg+xml;base64,")
        .expect("artifact should be an svg data URL");
    let decoded = STANDARD.decode(encoded).unwrap();
    let svg = String::from_utf8(decoded).unwrap();
    assert!(svg.contains("<svg"));
}
