//! End-to-end tests for OneID authentication context building.
//!
//! These tests drive the public API the way a host integration does:
//! raw token and profile payloads in, a context and stored tokens out.

use chrono::{DateTime, TimeZone, Utc};
use oneid_auth::config::{SAVE_TOKENS_VAR, TOKEN_SAVE_VAR};
use oneid_auth::{
    build, AuthError, AuthenticationProperties, ContextBuilder, FixedClock, OneIdOptions,
    TokenSave, TokenSaveSelector,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn new_year() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
}

fn raw_tokens() -> Value {
    json!({
        "access_token": "at-123",
        "refresh_token": "rt-456",
        "token_type": "Bearer",
        "expires_in": "3600",
        "id_token": "header.payload.sig",
    })
}

fn raw_profile() -> Value {
    json!({
        "sub": "8f2c",
        "email": "jane@example.com",
        "given_name": "Jane",
        "family_name": "Doe",
        "phoneNumber": "+1 555 0100",
    })
}

fn selectors() -> Vec<TokenSaveSelector> {
    vec![
        TokenSaveSelector::empty(),
        TokenSaveSelector::empty().with(TokenSave::AccessToken),
        TokenSaveSelector::empty().with(TokenSave::RefreshToken),
        TokenSaveSelector::all(),
    ]
}

fn entry_names(context: &oneid_auth::AuthenticationContext) -> Vec<String> {
    context
        .persisted_tokens()
        .unwrap_or_default()
        .iter()
        .map(|e| e.name.clone())
        .collect()
}

#[test]
fn test_claims_match_profile_fields() {
    let context = build(
        Some(&raw_tokens()),
        Some(&raw_profile()),
        &TokenSaveSelector::all(),
        true,
        new_year(),
    )
    .unwrap();

    let claims = context.claims();
    assert_eq!(claims.id, "8f2c");
    assert_eq!(claims.email, "jane@example.com");
    assert_eq!(claims.given_name, "Jane");
    assert_eq!(claims.family_name, "Doe");
    assert_eq!(claims.phone_number, "+1 555 0100");
}

#[test]
fn test_absent_profile_fields_are_empty() {
    let context = build(
        Some(&raw_tokens()),
        Some(&json!({})),
        &TokenSaveSelector::all(),
        false,
        new_year(),
    )
    .unwrap();

    assert_eq!(context.claims(), &oneid_auth::IdentityClaims::default());
}

#[test]
fn test_persistence_disabled_yields_no_entries() {
    for selector in selectors() {
        let context = build(
            Some(&raw_tokens()),
            Some(&raw_profile()),
            &selector,
            false,
            new_year(),
        )
        .unwrap();

        assert!(context.persisted_tokens().is_none(), "selector {}", selector);
    }
}

#[test]
fn test_empty_access_token_not_persisted() {
    let mut tokens = raw_tokens();
    tokens["access_token"] = json!("");

    let selector = TokenSaveSelector::empty().with(TokenSave::AccessToken);
    let context = build(Some(&tokens), Some(&raw_profile()), &selector, true, new_year()).unwrap();

    assert!(!entry_names(&context).contains(&"access_token".to_string()));
}

#[test]
fn test_expires_at_is_round_trip_timestamp() {
    let context = build(
        Some(&raw_tokens()),
        Some(&raw_profile()),
        &TokenSaveSelector::empty(),
        true,
        new_year(),
    )
    .unwrap();

    let expires_at = context
        .persisted_tokens()
        .unwrap()
        .iter()
        .find(|e| e.name == "expires_at")
        .unwrap();
    assert_eq!(expires_at.value, "2024-01-01T01:00:00.0000000Z");

    let parsed = DateTime::parse_from_rfc3339(&expires_at.value).unwrap();
    assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 1, 1, 1, 0, 0).unwrap());
}

#[test]
fn test_malformed_expires_in_is_omitted() {
    let mut tokens = raw_tokens();
    tokens["expires_in"] = json!("not-a-number");

    let context = build(
        Some(&tokens),
        Some(&raw_profile()),
        &TokenSaveSelector::all(),
        true,
        new_year(),
    )
    .unwrap();

    assert_eq!(
        entry_names(&context),
        vec!["access_token", "refresh_token", "token_type"]
    );
}

#[test]
fn test_entry_names_are_unique() {
    for selector in selectors() {
        let context = build(
            Some(&raw_tokens()),
            Some(&raw_profile()),
            &selector,
            true,
            new_year(),
        )
        .unwrap();

        let mut names = entry_names(&context);
        let total = names.len();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), total);
    }
}

#[test]
fn test_build_is_idempotent() {
    let first = build(
        Some(&raw_tokens()),
        Some(&raw_profile()),
        &TokenSaveSelector::all(),
        true,
        new_year(),
    )
    .unwrap();
    let second = build(
        Some(&raw_tokens()),
        Some(&raw_profile()),
        &TokenSaveSelector::all(),
        true,
        new_year(),
    )
    .unwrap();

    assert_eq!(first, second);
}

#[test]
fn test_missing_payloads_fail() {
    let selector = TokenSaveSelector::all();

    let err = build(None, Some(&raw_profile()), &selector, true, new_year()).unwrap_err();
    assert!(matches!(err, AuthError::InvalidArgument(_)));
    assert_eq!(err.error_code(), "INVALID_ARGUMENT");

    let err = build(Some(&raw_tokens()), Some(&Value::Null), &selector, true, new_year())
        .unwrap_err();
    assert!(matches!(err, AuthError::InvalidArgument(_)));
}

#[test]
fn test_builder_from_lookup_into_store() {
    let options = OneIdOptions::from_lookup(|key| match key {
        k if k == SAVE_TOKENS_VAR => Some("true".to_string()),
        k if k == TOKEN_SAVE_VAR => Some("refresh_token".to_string()),
        _ => None,
    })
    .unwrap();
    let builder = ContextBuilder::new(options).with_clock(Arc::new(FixedClock(new_year())));

    let context = builder
        .build(Some(&raw_tokens()), Some(&raw_profile()))
        .unwrap();

    let mut properties = AuthenticationProperties::new();
    assert!(context.store_tokens(&mut properties));
    assert_eq!(
        properties.token_names(),
        vec!["refresh_token", "token_type", "expires_at"]
    );
    assert_eq!(properties.get_token_value("refresh_token"), Some("rt-456"));
    assert_eq!(properties.get_token_value("access_token"), None);
}

#[test]
fn test_store_skipped_when_saving_disabled() {
    let builder = ContextBuilder::new(OneIdOptions::default());
    let context = builder
        .build(Some(&raw_tokens()), Some(&raw_profile()))
        .unwrap();

    let mut properties = AuthenticationProperties::new();
    assert!(!context.store_tokens(&mut properties));
    assert!(properties.items().is_empty());
}

#[cfg(feature = "oauth")]
#[test]
fn test_oauth2_token_response_adapter() {
    use oauth2::basic::{BasicTokenResponse, BasicTokenType};
    use oauth2::{AccessToken, EmptyExtraTokenFields, RefreshToken, StandardTokenResponse};
    use oneid_auth::TokenEndpointResponse;
    use std::time::Duration;

    let mut response = BasicTokenResponse::new(
        AccessToken::new("at-123".to_string()),
        BasicTokenType::Bearer,
        EmptyExtraTokenFields {},
    );
    response.set_refresh_token(Some(RefreshToken::new("rt-456".to_string())));
    response.set_expires_in(Some(&Duration::from_secs(3600)));

    let tokens = TokenEndpointResponse::from_oauth2(&response);
    assert_eq!(tokens.access_token.as_deref(), Some("at-123"));
    assert_eq!(tokens.refresh_token.as_deref(), Some("rt-456"));
    assert_eq!(tokens.expires_in.as_deref(), Some("3600"));
    assert!(tokens
        .token_type
        .as_deref()
        .is_some_and(|t| t.eq_ignore_ascii_case("bearer")));
    assert!(tokens.id_token.is_none());

    let with_id_token: StandardTokenResponse<IdTokenFields, BasicTokenType> =
        StandardTokenResponse::new(
            AccessToken::new("at-789".to_string()),
            BasicTokenType::Bearer,
            IdTokenFields {
                id_token: "header.payload.sig".to_string(),
            },
        );

    let tokens = TokenEndpointResponse::from_oauth2(&with_id_token);
    assert_eq!(tokens.access_token.as_deref(), Some("at-789"));
    assert_eq!(tokens.id_token.as_deref(), Some("header.payload.sig"));
    assert!(tokens.refresh_token.is_none());
    assert!(tokens.expires_in.is_none());
}

#[cfg(feature = "oauth")]
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
struct IdTokenFields {
    id_token: String,
}

#[cfg(feature = "oauth")]
impl oauth2::ExtraTokenFields for IdTokenFields {}
