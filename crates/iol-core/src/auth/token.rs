//! Token endpoint response and expiry date parsing.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;

use super::TokenSet;
use crate::api::ApiError;

/// Layout of `.expires` / `.refreshexpires` without the trailing zone name,
/// e.g. `Sat, 29 May 2021 19:18:40`.
const EXPIRY_FORMAT: &str = "%a, %d %b %Y %H:%M:%S";

/// Zone names the token endpoint uses for expiry dates.
const UTC_ZONE_NAMES: [&str; 2] = ["GMT", "UTC"];

#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    access_token: String,
    refresh_token: String,
    #[serde(rename = ".expires")]
    expires: String,
    #[serde(rename = ".refreshexpires")]
    refresh_expires: String,
}

impl TokenResponse {
    pub(crate) fn into_token_set(self) -> Result<TokenSet, ApiError> {
        Ok(TokenSet {
            access_expiry: parse_expiry(&self.expires)?,
            refresh_expiry: parse_expiry(&self.refresh_expires)?,
            access_token: self.access_token,
            refresh_token: self.refresh_token,
        })
    }
}

/// Parse an expiry date such as `Sat, 29 May 2021 19:18:40 GMT`.
/// Anything not matching that exact layout is rejected.
pub fn parse_expiry(value: &str) -> Result<DateTime<Utc>, ApiError> {
    let invalid = || ApiError::InvalidDate {
        value: value.to_string(),
    };

    let (datetime, zone) = value.rsplit_once(' ').ok_or_else(invalid)?;
    if !UTC_ZONE_NAMES.contains(&zone) {
        return Err(invalid());
    }

    let naive = NaiveDateTime::parse_from_str(datetime, EXPIRY_FORMAT).map_err(|_| invalid())?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_expiry() {
        let parsed = parse_expiry("Sat, 29 May 2021 19:18:40 GMT").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2021, 5, 29, 19, 18, 40).unwrap());

        let utc = parse_expiry("Sat, 29 May 2021 19:18:40 UTC").unwrap();
        assert_eq!(utc, parsed);
    }

    #[test]
    fn test_parse_expiry_rejects_malformed() {
        assert!(parse_expiry("Sut, 29 May 2021 19:18:40 GMT").is_err()); // bad weekday
        assert!(parse_expiry("Fri, 29 May 2021 19:18:40 GMT").is_err()); // wrong weekday for date
        assert!(parse_expiry("Sat, 29 May 2021 19:18 GMT").is_err()); // missing seconds
        assert!(parse_expiry("29 May 2021 19:18:40 GMT").is_err()); // missing weekday
        assert!(parse_expiry("Sat, 29 May 2021 19:18:40").is_err()); // missing zone
        assert!(parse_expiry("Sat, 29 May 2021 19:18:40 +0000").is_err());
        assert!(parse_expiry("2021-05-29T19:18:40Z").is_err());
        assert!(parse_expiry("").is_err());
    }

    #[test]
    fn test_parse_expiry_error_keeps_value() {
        match parse_expiry("tomorrow") {
            Err(ApiError::InvalidDate { value }) => assert_eq!(value, "tomorrow"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_parse_token_response() {
        let json = r#"{"access_token":"abc","token_type":"bearer","expires_in":899,"refresh_token":"def",".issued":"Sat, 29 May 2021 19:03:40 GMT",".expires":"Sat, 29 May 2021 19:18:40 GMT",".refreshexpires":"Sat, 29 May 2021 19:33:40 GMT"}"#;

        let resp: TokenResponse =
            serde_json::from_str(json).expect("Failed to parse token test JSON");
        let tokens = resp.into_token_set().unwrap();
        assert_eq!(tokens.access_token, "abc");
        assert_eq!(tokens.refresh_token, "def");
        assert_eq!(
            tokens.access_expiry,
            Utc.with_ymd_and_hms(2021, 5, 29, 19, 18, 40).unwrap()
        );
        assert_eq!(
            tokens.refresh_expiry,
            Utc.with_ymd_and_hms(2021, 5, 29, 19, 33, 40).unwrap()
        );
    }

    #[test]
    fn test_token_response_with_bad_date() {
        let json = r#"{"access_token":"abc","refresh_token":"def",".expires":"2021-05-29",".refreshexpires":"Sat, 29 May 2021 19:33:40 GMT"}"#;
        let resp: TokenResponse = serde_json::from_str(json).unwrap();
        assert!(matches!(
            resp.into_token_set(),
            Err(ApiError::InvalidDate { .. })
        ));
    }
}
