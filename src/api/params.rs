use super::error::{ApiError, ApiResult};
use super::types::EntityKind;
use crate::db::{Comparison, RatingRange, YearRange};
use crate::util::QueryParams;

pub const MAX_LIMIT: i64 = 1000;
pub const MIN_YEAR: i32 = 1870;
pub const MAX_YEAR: i32 = 2100;

/// Parses a result-count limit: a positive integer, capped at `MAX_LIMIT`.
pub fn parse_limit(raw: &str) -> ApiResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 1 => Ok(n.min(MAX_LIMIT)),
        _ => Err(ApiError::validation(format!(
            "limit must be a positive integer, got '{}'",
            raw
        ))),
    }
}

/// Reads the optional `limit` query parameter.
pub fn limit_param(params: &QueryParams, default: i64) -> ApiResult<i64> {
    params.get("limit").map(parse_limit).unwrap_or(Ok(default))
}

/// Parses a popularity threshold such as a vote or review count.
pub fn parse_count(name: &str, raw: &str) -> ApiResult<i64> {
    match raw.trim().parse::<i64>() {
        Ok(n) if n >= 0 => Ok(n),
        _ => Err(ApiError::validation(format!(
            "{} must be a non-negative integer, got '{}'",
            name, raw
        ))),
    }
}

pub fn parse_year(name: &str, raw: &str) -> ApiResult<i32> {
    match raw.trim().parse::<i32>() {
        Ok(y) if (MIN_YEAR..=MAX_YEAR).contains(&y) => Ok(y),
        _ => Err(ApiError::validation(format!(
            "{} must be a year between {} and {}, got '{}'",
            name, MIN_YEAR, MAX_YEAR, raw
        ))),
    }
}

/// Parses a rating bound on the native scale of `kind`.
pub fn parse_rating(name: &str, raw: &str, kind: EntityKind) -> ApiResult<f64> {
    let scale = kind.rating_scale();
    match raw.trim().parse::<f64>() {
        Ok(r) if r.is_finite() && (0.0..=scale).contains(&r) => Ok(r),
        _ => Err(ApiError::validation(format!(
            "{} must be a number between 0 and {} for {}s, got '{}'",
            name,
            scale,
            kind.as_str(),
            raw
        ))),
    }
}

/// Reads `lower` and `upper`, defaulting to the ends of the scale and
/// swapping them when given in the wrong order.
pub fn rating_range_param(params: &QueryParams, kind: EntityKind) -> ApiResult<RatingRange> {
    let lower = match params.get("lower") {
        Some(raw) => parse_rating("lower", raw, kind)?,
        None => 0.0,
    };
    let upper = match params.get("upper") {
        Some(raw) => parse_rating("upper", raw, kind)?,
        None => kind.rating_scale(),
    };
    Ok(RatingRange {
        lower: lower.min(upper),
        upper: lower.max(upper),
    })
}

/// Reads either `year` or the `start_year`/`end_year` pair. `year` wins
/// when both forms are present.
pub fn year_range_param(params: &QueryParams) -> ApiResult<YearRange> {
    if let Some(raw) = params.get("year") {
        return Ok(YearRange::single(parse_year("year", raw)?));
    }

    match (params.get("start_year"), params.get("end_year")) {
        (Some(start), Some(end)) => {
            let start = parse_year("start_year", start)?;
            let end = parse_year("end_year", end)?;
            if start > end {
                return Err(ApiError::validation(format!(
                    "start_year ({}) must not be after end_year ({})",
                    start, end
                )));
            }
            Ok(YearRange { start, end })
        }
        (None, None) => Err(ApiError::validation(
            "year or both start_year and end_year are required",
        )),
        _ => Err(ApiError::validation(
            "start_year and end_year must be given together",
        )),
    }
}

pub fn comparison_param(params: &QueryParams) -> ApiResult<Comparison> {
    match params.get("comparison").map(|c| c.to_lowercase()) {
        None => Ok(Comparison::Above),
        Some(c) if c == "above" => Ok(Comparison::Above),
        Some(c) if c == "below" => Ok(Comparison::Below),
        Some(c) => Err(ApiError::validation(format!(
            "comparison must be 'above' or 'below', got '{}'",
            c
        ))),
    }
}

pub fn entity_kind(raw: Option<&str>) -> ApiResult<EntityKind> {
    let raw = raw.ok_or_else(|| ApiError::validation("type is required ('movie' or 'game')"))?;
    EntityKind::parse(raw).ok_or_else(|| {
        ApiError::validation(format!("type must be 'movie' or 'game', got '{}'", raw))
    })
}

/// Returns `raw` trimmed, rejecting blank values.
pub fn require_text<'a>(name: &str, raw: Option<&'a str>) -> ApiResult<&'a str> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::validation(format!("{} must not be empty", name)))
}
