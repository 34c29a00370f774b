//! Share parameters, validated before anything is sent.

use crate::api::types::{AccessType, ItemId, ShareRequest};
use crate::error::ApiError;
use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use std::str::FromStr;

impl FromStr for AccessType {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "read" => Ok(AccessType::Read),
            "write" => Ok(AccessType::Write),
            other => Err(ApiError::Invalid(format!(
                "Invalid access type '{}': expected read or write",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShareOptions {
    pub access_type: AccessType,
    pub expiration: Option<DateTime<Utc>>,
    pub password: Option<String>,
}

impl ShareOptions {
    /// Build options from raw form values. Blank expiration or password means
    /// none; a blank access type means read.
    pub fn parse(access_type: &str, expiration: &str, password: &str) -> Result<Self, ApiError> {
        let expiration = match expiration.trim() {
            "" => None,
            raw => Some(parse_expiration(raw)?),
        };
        let password = Some(password).filter(|p| !p.is_empty()).map(str::to_string);
        Ok(Self {
            access_type: access_type.parse()?,
            expiration,
            password,
        })
    }

    pub fn into_request(self, file_id: ItemId) -> ShareRequest {
        ShareRequest {
            file_id,
            access_type: self.access_type,
            expiration: self
                .expiration
                .map(|t| t.to_rfc3339_opts(SecondsFormat::Secs, true)),
            password: self.password,
        }
    }
}

/// Accepts RFC 3339, or `YYYY-MM-DDTHH:MM:SS` without an offset (taken as UTC).
fn parse_expiration(raw: &str) -> Result<DateTime<Utc>, ApiError> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|_| {
            ApiError::Invalid(format!(
                "Invalid expiration '{}': expected YYYY-MM-DDTHH:MM:SS",
                raw
            ))
        })
}
