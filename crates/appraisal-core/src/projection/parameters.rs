use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::str::FromStr;

use crate::error::AppraisalError;
use crate::types::{Money, Rate};
use crate::AppraisalResult;

/// Longest project life accepted by the projector.
pub const MAX_LIFE_YEARS: u32 = 1_000;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Structured inputs of a project appraisal.
///
/// Field aliases accept the key names used by the document-extraction reply
/// (`von_dau_tu`, `vong_doi`, `doanh_thu_nam`, `chi_phi_nam`, `thue_suat`,
/// `wacc`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectParameters {
    /// Total upfront capital outlay (positive)
    #[serde(alias = "von_dau_tu")]
    pub investment: Money,
    /// Number of operating years (>= 1)
    #[serde(alias = "vong_doi")]
    pub life_years: u32,
    /// Revenue earned in every operating year
    #[serde(alias = "doanh_thu_nam")]
    pub annual_revenue: Money,
    /// Operating cost incurred in every operating year
    #[serde(alias = "chi_phi_nam")]
    pub annual_cost: Money,
    /// Flat corporate income tax rate in [0, 1)
    #[serde(alias = "thue_suat")]
    pub tax_rate: Rate,
    /// Discount rate (WACC)
    #[serde(alias = "wacc")]
    pub discount_rate: Rate,
}

const INVESTMENT_KEYS: &[&str] = &["investment", "von_dau_tu"];
const LIFE_YEARS_KEYS: &[&str] = &["life_years", "vong_doi"];
const REVENUE_KEYS: &[&str] = &["annual_revenue", "doanh_thu_nam"];
const COST_KEYS: &[&str] = &["annual_cost", "chi_phi_nam"];
const TAX_RATE_KEYS: &[&str] = &["tax_rate", "thue_suat"];
const DISCOUNT_RATE_KEYS: &[&str] = &["discount_rate", "wacc"];

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

impl ProjectParameters {
    /// Check the constraints the projector relies on.
    pub fn validate(&self) -> AppraisalResult<()> {
        if self.investment <= Decimal::ZERO {
            return Err(AppraisalError::invalid(
                "investment",
                "Investment must be positive",
            ));
        }
        if self.life_years == 0 {
            return Err(AppraisalError::invalid(
                "life_years",
                "Project life must be at least one year",
            ));
        }
        if self.life_years > MAX_LIFE_YEARS {
            return Err(AppraisalError::invalid(
                "life_years",
                format!("Project life must not exceed {MAX_LIFE_YEARS} years"),
            ));
        }
        if self.tax_rate < Decimal::ZERO || self.tax_rate >= Decimal::ONE {
            return Err(AppraisalError::invalid(
                "tax_rate",
                "Tax rate must be in [0, 1)",
            ));
        }
        Ok(())
    }

    /// Decode parameters from a loosely-typed JSON object and validate them.
    ///
    /// Values may be JSON numbers or numeric strings. Strings may carry
    /// thousands separators (`1,500,000` or `1.500.000`) or a trailing `%`.
    pub fn from_value(value: &Value) -> AppraisalResult<Self> {
        let obj = value.as_object().ok_or_else(|| {
            AppraisalError::invalid("parameters", "Expected a JSON object")
        })?;

        let params = ProjectParameters {
            investment: decimal_field(obj, "investment", INVESTMENT_KEYS)?,
            life_years: life_years_field(obj)?,
            annual_revenue: decimal_field(obj, "annual_revenue", REVENUE_KEYS)?,
            annual_cost: decimal_field(obj, "annual_cost", COST_KEYS)?,
            tax_rate: decimal_field(obj, "tax_rate", TAX_RATE_KEYS)?,
            discount_rate: decimal_field(obj, "discount_rate", DISCOUNT_RATE_KEYS)?,
        };
        params.validate()?;
        Ok(params)
    }
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .find_map(|k| obj.get(*k))
        .filter(|v| !v.is_null())
}

fn decimal_field(
    obj: &Map<String, Value>,
    field: &str,
    keys: &[&str],
) -> AppraisalResult<Decimal> {
    let value = lookup(obj, keys)
        .ok_or_else(|| AppraisalError::invalid(field, "Required field is missing"))?;
    parse_decimal(value)
        .ok_or_else(|| AppraisalError::invalid(field, format!("Not a number: {value}")))
}

fn life_years_field(obj: &Map<String, Value>) -> AppraisalResult<u32> {
    let years = decimal_field(obj, "life_years", LIFE_YEARS_KEYS)?;
    if !years.fract().is_zero() {
        return Err(AppraisalError::invalid(
            "life_years",
            format!("Project life must be a whole number of years, got {years}"),
        ));
    }
    if years <= Decimal::ZERO {
        return Err(AppraisalError::invalid(
            "life_years",
            "Project life must be at least one year",
        ));
    }
    years.to_u32().ok_or_else(|| {
        AppraisalError::invalid("life_years", format!("Project life out of range: {years}"))
    })
}

fn parse_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => parse_numeric_str(&n.to_string()),
        Value::String(s) => parse_numeric_str(s),
        _ => None,
    }
}

fn parse_numeric_str(raw: &str) -> Option<Decimal> {
    let mut cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '_' | ' '))
        .collect();

    // "1.500.000" style grouping
    if cleaned.matches('.').count() > 1 {
        cleaned.retain(|c| c != '.');
    }

    if let Some(pct) = cleaned.strip_suffix('%') {
        return Decimal::from_str(pct.trim_end()).ok().map(|d| d / dec!(100));
    }

    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
}
