//! Freshness evaluation of stored responses.

use chrono::{DateTime, NaiveDateTime, TimeDelta, Utc};
use http::{HeaderMap, HeaderValue, header};

use crate::cache_control::{CacheControl, directive, parse_seconds};
use crate::clock::Clock;

const IMF_FIXDATE: &str = "%a, %d %b %Y %H:%M:%S GMT";
const IMF_FIXDATE_WITHOUT_WEEKDAY: &str = "%d %b %Y %H:%M:%S GMT";

/// How a stored response may be used for a new request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Freshness {
    /// Serve the stored response without contacting the origin.
    Fresh,
    /// Revalidate the stored response with a conditional request.
    Stale,
    /// Ignore the stored response and forward the request unchanged.
    Transparent,
}

/// Classifies a stored response for a new request.
///
/// Rules, applied in order:
///
/// 1. `no-cache` on the request makes the entry [`Freshness::Transparent`].
/// 2. `no-cache` on the stored response makes it [`Freshness::Stale`].
/// 3. `only-if-cached` on the request makes it [`Freshness::Fresh`].
/// 4. A stored response without a parseable `Date` is stale.
/// 5. Lifetime comes from the response's `max-age`, else `Expires - Date`,
///    else zero. Unparseable values count as zero.
/// 6. A request `max-age` replaces that lifetime.
/// 7. A request `min-fresh` is added to the current age.
/// 8. A valueless request `max-stale` accepts any age; with a value it is
///    subtracted from the current age.
/// 9. The entry is fresh only while lifetime exceeds current age.
pub fn freshness(response: &HeaderMap, request: &HeaderMap, clock: &dyn Clock) -> Freshness {
    let response_cc = CacheControl::from_headers(response);
    let request_cc = CacheControl::from_headers(request);

    if request_cc.contains(directive::NO_CACHE) {
        return Freshness::Transparent;
    }
    if response_cc.contains(directive::NO_CACHE) {
        return Freshness::Stale;
    }
    if request_cc.contains(directive::ONLY_IF_CACHED) {
        return Freshness::Fresh;
    }

    let date = match response.get(header::DATE).and_then(parse_http_date) {
        Some(date) => date,
        None => return Freshness::Stale,
    };
    let mut current_age = clock.now().signed_duration_since(date);

    let mut lifetime = match response_cc.get(directive::MAX_AGE) {
        Some(max_age) => parse_seconds(max_age).unwrap_or_default(),
        None => response
            .get(header::EXPIRES)
            .and_then(parse_http_date)
            .map(|expires| expires.signed_duration_since(date))
            .unwrap_or_default(),
    };

    if let Some(max_age) = request_cc.get(directive::MAX_AGE) {
        lifetime = parse_seconds(max_age).unwrap_or_default();
    }
    if let Some(min_fresh) = request_cc.get(directive::MIN_FRESH).and_then(parse_seconds) {
        current_age = saturating_add(current_age, min_fresh);
    }
    if let Some(max_stale) = request_cc.get(directive::MAX_STALE) {
        if max_stale.is_empty() {
            return Freshness::Fresh;
        }
        if let Some(max_stale) = parse_seconds(max_stale) {
            current_age = saturating_add(current_age, -max_stale);
        }
    }

    if lifetime > current_age {
        Freshness::Fresh
    } else {
        Freshness::Stale
    }
}

/// Parses an IMF-fixdate header value such as `Sun, 06 Nov 1994 08:49:37 GMT`.
///
/// The weekday name is not checked against the date.
pub fn parse_http_date(value: &HeaderValue) -> Option<DateTime<Utc>> {
    let value = value.to_str().ok()?.trim();
    let without_weekday = value.split_once(", ").map_or(value, |(_, rest)| rest);
    NaiveDateTime::parse_from_str(without_weekday, IMF_FIXDATE_WITHOUT_WEEKDAY)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Formats a timestamp as an IMF-fixdate header value.
pub fn format_http_date(at: DateTime<Utc>) -> String {
    at.format(IMF_FIXDATE).to_string()
}

fn saturating_add(lhs: TimeDelta, rhs: TimeDelta) -> TimeDelta {
    lhs.checked_add(&rhs).unwrap_or(if rhs > TimeDelta::zero() {
        TimeDelta::MAX
    } else {
        TimeDelta::MIN
    })
}
