use storefront_api::{
    error::AppError,
    routes::params::{parse_key, user_key},
    services::payment_service::PaymentClient,
    token,
};

#[test]
fn user_key_rejects_malformed_ids_without_touching_the_db() {
    let err = user_key("not-a-uuid").unwrap_err();
    match err {
        AppError::BadRequest(msg) => assert_eq!(msg, "Invalid user ID"),
        other => panic!("expected BadRequest, got {other:?}"),
    }
}

#[test]
fn parse_key_accepts_well_formed_ids() {
    let id = uuid::Uuid::new_v4();
    assert_eq!(parse_key(&id.to_string(), "item").unwrap(), id);
}

#[test]
fn order_key_is_eight_alphanumeric_chars() {
    let key = token::order_key();
    assert_eq!(key.len(), 8);
    assert!(key.chars().all(|c| c.is_ascii_alphanumeric()));
}

#[test]
fn group_code_is_six_uppercase_chars() {
    let code = token::group_code();
    assert_eq!(code.len(), 6);
    assert!(
        code.chars()
            .all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase())
    );
}

#[test]
fn order_number_stays_in_display_range() {
    for _ in 0..200 {
        let n = token::order_number();
        assert!((1..=500).contains(&n), "order number {n} out of range");
    }
}

#[test]
fn minor_units_rounds_to_the_nearest_cent() {
    assert_eq!(PaymentClient::minor_units(25.0), 2500);
    assert_eq!(PaymentClient::minor_units(10.01), 1001);
    assert_eq!(PaymentClient::minor_units(10.004), 1000);
    assert_eq!(PaymentClient::minor_units(10.006), 1001);
    assert_eq!(PaymentClient::minor_units(0.0), 0);
}
