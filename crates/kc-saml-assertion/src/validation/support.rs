//! Helpers shared by the validators.

use std::net::IpAddr;

use chrono::{DateTime, Duration, Utc};

use crate::context::{ParameterValue, ValidationContext};
use crate::params;
use crate::result::ValidationResult;
use crate::types::Assertion;

/// Default allowed clock skew, in minutes.
pub const DEFAULT_CLOCK_SKEW_MINUTES: i64 = 5;

/// Default assertion lifetime after its issue instant, in minutes.
pub const DEFAULT_LIFETIME_MINUTES: i64 = 5;

/// Largest duration any parameter may express, in days.
///
/// Longer values are clamped so that adding them to a timestamp of this era
/// stays within the representable range.
pub const MAX_DURATION_DAYS: i64 = 36_500;

/// Clamps `duration` to plus or minus [`MAX_DURATION_DAYS`].
#[must_use]
pub fn bounded(duration: Duration) -> Duration {
    let max = Duration::days(MAX_DURATION_DAYS);
    duration.clamp(-max, max)
}

/// `instant + delta`, saturating at the ends of the representable range.
#[must_use]
pub fn saturating_add(instant: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    instant.checked_add_signed(delta).unwrap_or(if delta < Duration::zero() {
        DateTime::<Utc>::MIN_UTC
    } else {
        DateTime::<Utc>::MAX_UTC
    })
}

/// `instant - delta`, saturating at the ends of the representable range.
#[must_use]
pub fn saturating_sub(instant: DateTime<Utc>, delta: Duration) -> DateTime<Utc> {
    instant.checked_sub_signed(delta).unwrap_or(if delta < Duration::zero() {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Reads a duration or millisecond integer parameter, bounded.
///
/// `None` when absent, mistyped or not representable.
fn read_duration(context: &ValidationContext, key: &str) -> Option<Duration> {
    match context.get_static(key)? {
        ParameterValue::Duration(d) => Some(bounded(*d)),
        ParameterValue::Integer(millis) => {
            tracing::debug!(key, millis, "Reading integer parameter as milliseconds");
            match Duration::try_milliseconds(*millis) {
                Some(d) => Some(bounded(d)),
                None => {
                    tracing::warn!(key, millis, "Integer parameter is out of range for a duration");
                    None
                }
            }
        }
        other => {
            tracing::warn!(key, kind = other.kind(), "Parameter is not a duration");
            None
        }
    }
}

/// Reads a duration parameter that must be positive.
///
/// Absent, zero or unreadable values yield `default`. Negative values are
/// taken by absolute value. Integers are read as milliseconds. The result
/// never exceeds [`MAX_DURATION_DAYS`].
#[must_use]
pub fn positive_duration(context: &ValidationContext, key: &str, default: Duration) -> Duration {
    match read_duration(context, key) {
        Some(d) if d.is_zero() => default,
        Some(d) => d.abs(),
        None => default,
    }
}

/// Reads an optional duration parameter, bounded by [`MAX_DURATION_DAYS`].
///
/// Returns `None` when absent, not a duration or integer, or out of range.
#[must_use]
pub fn optional_duration(context: &ValidationContext, key: &str) -> Option<Duration> {
    read_duration(context, key)
}

/// Allowed clock skew for this validation.
#[must_use]
pub fn clock_skew(context: &ValidationContext) -> Duration {
    positive_duration(
        context,
        params::CLOCK_SKEW,
        Duration::minutes(DEFAULT_CLOCK_SKEW_MINUTES),
    )
}

/// Assertion lifetime for this validation.
#[must_use]
pub fn lifetime(context: &ValidationContext) -> Duration {
    positive_duration(
        context,
        params::LIFETIME,
        Duration::minutes(DEFAULT_LIFETIME_MINUTES),
    )
}

/// Checks a presenter address against a set of valid addresses.
///
/// A missing address is valid (whether it is required is the caller's
/// concern). A missing, empty or mistyped valid-address set is
/// indeterminate. An address that is not an IP literal or not in the set is
/// invalid.
pub fn check_address(
    context: &mut ValidationContext,
    address: Option<&str>,
    valid_addresses_key: &str,
    assertion: &Assertion,
    description: &str,
) -> ValidationResult {
    let Some(address) = address.map(str::trim).filter(|a| !a.is_empty()) else {
        return ValidationResult::Valid;
    };

    tracing::debug!(address, "Evaluating {description}");

    let valid = match context.static_address_set(valid_addresses_key) {
        Some(set) if !set.is_empty() => set,
        found => {
            if found.is_none() && context.has_static(valid_addresses_key) {
                tracing::warn!(
                    key = valid_addresses_key,
                    "Valid address parameter is not an address set"
                );
            } else {
                tracing::warn!(
                    key = valid_addresses_key,
                    "No valid addresses available, unable to evaluate {description}"
                );
            }
            context.set_failure_message(format!(
                "Unable to determine list of valid addresses for {description}"
            ));
            return ValidationResult::Indeterminate;
        }
    };

    let parsed: IpAddr = match address.parse() {
        Ok(ip) => ip,
        Err(_) => {
            tracing::debug!(address, "{description} is not a valid IP address");
            context.set_failure_message(format!(
                "{description} '{address}' in assertion '{}' is not a valid IP address",
                assertion.id
            ));
            return ValidationResult::Invalid;
        }
    };

    if valid.contains(&parsed) {
        tracing::debug!(address, "Matched valid address");
        return ValidationResult::Valid;
    }

    tracing::debug!(address, "{description} did not match any valid address");
    context.set_failure_message(format!(
        "{description} '{address}' in assertion '{}' did not match any valid addresses",
        assertion.id
    ));
    ValidationResult::Invalid
}
