//! Validation rules for promotion definitions.
//!
//! One rule set gates create, update, duplicate and reactivate. Every
//! violation is collected and reported with its field; validation never
//! stops at the first problem.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{Money, Percentage, Timestamp, ValidationError};

use super::{AdminState, DiscountKind, DiscountKindTag, PromotionCode, PromotionRules, ValidityWindow};

/// Raw promotion definition as supplied by an administrator.
///
/// Mirrors the flat record shape: `value` is percentage points for
/// percentage discounts and cents for fixed amounts, `max_discount` of zero
/// means "no cap" and `usage_limit` of zero means unlimited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromotionInput {
    pub code: String,
    pub name: String,
    pub kind: DiscountKindTag,
    #[serde(default)]
    pub value: i64,
    pub min_spend: Money,
    #[serde(default)]
    pub max_discount: Money,
    #[serde(default)]
    pub usage_limit: i64,
    #[serde(default)]
    pub admin_state: AdminState,
    #[serde(default)]
    pub starts_at: Option<Timestamp>,
    #[serde(default)]
    pub ends_at: Option<Timestamp>,
}

/// A definition that passed every rule, expressed in domain types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedPromotion {
    pub code: PromotionCode,
    pub name: String,
    pub discount: DiscountKind,
    pub min_spend: Money,
    pub usage_limit: u32,
    pub admin_state: AdminState,
    pub window: ValidityWindow,
}

/// Non-empty list of field-tagged violations.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: ValidationError) {
        self.0.push(error);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Offending field names, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.0.iter().map(ValidationError::field).collect()
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|e| e.field() == field)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    pub fn into_inner(self) -> Vec<ValidationError> {
        self.0
    }

    /// `Ok(())` when nothing was collected.
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl From<Vec<ValidationError>> for ValidationErrors {
    fn from(errors: Vec<ValidationError>) -> Self {
        Self(errors)
    }
}

impl From<ValidationError> for ValidationErrors {
    fn from(error: ValidationError) -> Self {
        Self(vec![error])
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}", error)?;
        }
        Ok(())
    }
}

/// Records the error of a failed check and hands back the value if any.
fn collect<T>(errors: &mut ValidationErrors, result: Result<T, ValidationError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

/// Validates a raw definition against the rules.
///
/// # Errors
///
/// Returns every violated rule, each tagged with one of the fields
/// `code`, `name`, `value`, `max_discount`, `min_spend`, `usage_limit`
/// or `ends_at`.
pub fn validate_input(
    input: &PromotionInput,
    rules: &PromotionRules,
) -> Result<ValidatedPromotion, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let code = collect(&mut errors, PromotionCode::try_new(&input.code));

    let name = input.name.trim();
    if name.is_empty() {
        errors.push(ValidationError::empty_field("name"));
    }

    let cap = collect(&mut errors, check_max_discount(input.max_discount, rules));
    let discount = collect(&mut errors, check_discount(input.kind, input.value, rules))
        .map(|kind| with_cap(kind, cap.flatten()));

    if input.min_spend < rules.min_spend_floor {
        errors.push(ValidationError::below_minimum(
            "min_spend",
            rules.min_spend_floor.cents(),
            input.min_spend.cents(),
        ));
    }

    let usage_limit = collect(&mut errors, check_usage_limit(input.usage_limit, rules));
    let window = collect(&mut errors, ValidityWindow::new(input.starts_at, input.ends_at));

    match (code, discount, usage_limit, window) {
        (Some(code), Some(discount), Some(usage_limit), Some(window)) if errors.is_empty() => {
            Ok(ValidatedPromotion {
                code,
                name: name.to_string(),
                discount,
                min_spend: input.min_spend,
                usage_limit,
                admin_state: input.admin_state,
                window,
            })
        }
        _ => Err(errors),
    }
}

/// Validates a freshly supplied reactivation window.
///
/// Both bounds are required and the end must follow the start.
pub fn validate_window(
    starts_at: Option<Timestamp>,
    ends_at: Option<Timestamp>,
) -> Result<ValidityWindow, ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if starts_at.is_none() {
        errors.push(ValidationError::empty_field("starts_at"));
    }
    if ends_at.is_none() {
        errors.push(ValidationError::empty_field("ends_at"));
    }
    if !errors.is_empty() {
        return Err(errors);
    }
    ValidityWindow::new(starts_at, ends_at).map_err(ValidationErrors::from)
}

fn check_discount(
    kind: DiscountKindTag,
    value: i64,
    rules: &PromotionRules,
) -> Result<DiscountKind, ValidationError> {
    match kind {
        DiscountKindTag::Percentage => {
            let (min, max) = (i64::from(rules.percentage_min), i64::from(rules.percentage_max));
            if !(min..=max).contains(&value) {
                return Err(ValidationError::out_of_range("value", min, max, value));
            }
            let percent = Percentage::try_new(value).map_err(|e| e.for_field("value"))?;
            Ok(DiscountKind::Percentage {
                percent,
                max_discount: None,
            })
        }
        DiscountKindTag::FixedAmount => {
            let max = rules.fixed_amount_max.cents();
            if !(0..=max).contains(&value) {
                return Err(ValidationError::out_of_range("value", 0, max, value));
            }
            Ok(DiscountKind::FixedAmount {
                amount: Money::from_cents(value),
            })
        }
        DiscountKindTag::FreeShipping => {
            if value != 0 {
                return Err(ValidationError::out_of_range("value", 0, 0, value));
            }
            Ok(DiscountKind::FreeShipping)
        }
    }
}

/// Zero means uncapped; anything else must sit within the configured cap.
fn check_max_discount(
    max_discount: Money,
    rules: &PromotionRules,
) -> Result<Option<Money>, ValidationError> {
    if max_discount.is_zero() {
        return Ok(None);
    }
    let cap = rules.max_discount_cap.cents();
    if max_discount.is_negative() || max_discount.cents() > cap {
        return Err(ValidationError::out_of_range(
            "max_discount",
            0,
            cap,
            max_discount.cents(),
        ));
    }
    Ok(Some(max_discount))
}

fn check_usage_limit(limit: i64, rules: &PromotionRules) -> Result<u32, ValidationError> {
    let cap = i64::from(rules.usage_limit_cap);
    if !(0..=cap).contains(&limit) {
        return Err(ValidationError::out_of_range("usage_limit", 0, cap, limit));
    }
    u32::try_from(limit).map_err(|_| ValidationError::out_of_range("usage_limit", 0, cap, limit))
}

/// Only percentage discounts carry a cap; it is dropped for other kinds.
fn with_cap(kind: DiscountKind, cap: Option<Money>) -> DiscountKind {
    match kind {
        DiscountKind::Percentage { percent, .. } => DiscountKind::Percentage {
            percent,
            max_discount: cap,
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn percentage_input() -> PromotionInput {
        PromotionInput {
            code: "spring-10".to_string(),
            name: "Spring sale".to_string(),
            kind: DiscountKindTag::Percentage,
            value: 10,
            min_spend: Money::from_units(50),
            max_discount: Money::from_units(20),
            usage_limit: 100,
            admin_state: AdminState::Active,
            starts_at: None,
            ends_at: None,
        }
    }

    fn rules() -> PromotionRules {
        PromotionRules::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Accepted input
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn accepts_valid_percentage_and_normalizes_code() {
        let validated = validate_input(&percentage_input(), &rules()).unwrap();
        assert_eq!(validated.code.as_str(), "SPRING-10");
        assert_eq!(validated.usage_limit, 100);
        assert_eq!(
            validated.discount,
            DiscountKind::Percentage {
                percent: Percentage::try_new(10).unwrap(),
                max_discount: Some(Money::from_units(20)),
            }
        );
    }

    #[test]
    fn zero_max_discount_means_uncapped() {
        let mut input = percentage_input();
        input.max_discount = Money::ZERO;
        let validated = validate_input(&input, &rules()).unwrap();
        assert_eq!(validated.discount.max_discount(), Money::ZERO);
    }

    #[test]
    fn cap_is_dropped_for_fixed_amount() {
        let mut input = percentage_input();
        input.kind = DiscountKindTag::FixedAmount;
        input.value = 1_500;
        let validated = validate_input(&input, &rules()).unwrap();
        assert_eq!(
            validated.discount,
            DiscountKind::FixedAmount {
                amount: Money::from_cents(1_500)
            }
        );
    }

    #[test]
    fn fixed_amount_accepts_bounds() {
        let mut input = percentage_input();
        input.kind = DiscountKindTag::FixedAmount;
        for value in [0, Money::from_units(10_000).cents()] {
            input.value = value;
            assert!(validate_input(&input, &rules()).is_ok(), "value {}", value);
        }
    }

    #[test]
    fn free_shipping_with_zero_value_is_valid() {
        let mut input = percentage_input();
        input.kind = DiscountKindTag::FreeShipping;
        input.value = 0;
        let validated = validate_input(&input, &rules()).unwrap();
        assert_eq!(validated.discount, DiscountKind::FreeShipping);
    }

    #[test]
    fn unlimited_usage_is_zero() {
        let mut input = percentage_input();
        input.usage_limit = 0;
        assert_eq!(validate_input(&input, &rules()).unwrap().usage_limit, 0);
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Rejected input
    // ════════════════════════════════════════════════════════════════════════════

    #[test]
    fn percentage_outside_1_to_99_is_rejected() {
        for value in [0, 100, -5] {
            let mut input = percentage_input();
            input.value = value;
            let errors = validate_input(&input, &rules()).unwrap_err();
            assert_eq!(errors.fields(), vec!["value"], "value {}", value);
        }
    }

    #[test]
    fn fixed_amount_above_cap_is_rejected() {
        let mut input = percentage_input();
        input.kind = DiscountKindTag::FixedAmount;
        input.value = Money::from_units(10_000).cents() + 1;
        let errors = validate_input(&input, &rules()).unwrap_err();
        assert!(errors.has_field("value"));
    }

    #[test]
    fn free_shipping_with_value_is_rejected() {
        let mut input = percentage_input();
        input.kind = DiscountKindTag::FreeShipping;
        input.value = 5;
        let errors = validate_input(&input, &rules()).unwrap_err();
        assert_eq!(
            errors.into_inner(),
            vec![ValidationError::out_of_range("value", 0, 0, 5)]
        );
    }

    #[test]
    fn min_spend_below_floor_is_rejected() {
        let mut input = percentage_input();
        input.min_spend = Money::from_units(49);
        let errors = validate_input(&input, &rules()).unwrap_err();
        assert_eq!(
            errors.into_inner(),
            vec![ValidationError::below_minimum("min_spend", 5_000, 4_900)]
        );
    }

    #[test]
    fn max_discount_above_cap_is_rejected() {
        let mut input = percentage_input();
        input.max_discount = Money::from_units(1_001);
        assert!(validate_input(&input, &rules()).unwrap_err().has_field("max_discount"));
    }

    #[test]
    fn usage_limit_out_of_range_is_rejected() {
        for limit in [-1, 10_001] {
            let mut input = percentage_input();
            input.usage_limit = limit;
            assert!(validate_input(&input, &rules()).unwrap_err().has_field("usage_limit"));
        }
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Timestamp::now();
        let mut input = percentage_input();
        input.starts_at = Some(now);
        input.ends_at = Some(now.minus_secs(60));
        assert_eq!(validate_input(&input, &rules()).unwrap_err().fields(), vec!["ends_at"]);
    }

    #[test]
    fn collects_every_violation() {
        let input = PromotionInput {
            code: "bad code!".to_string(),
            name: "   ".to_string(),
            kind: DiscountKindTag::Percentage,
            value: 150,
            min_spend: Money::from_units(10),
            max_discount: Money::from_units(5_000),
            usage_limit: 20_000,
            admin_state: AdminState::Active,
            starts_at: None,
            ends_at: None,
        };
        let errors = validate_input(&input, &rules()).unwrap_err();
        assert_eq!(
            errors.fields(),
            vec!["code", "name", "max_discount", "value", "min_spend", "usage_limit"]
        );
        assert!(errors.to_string().contains("; "));
    }

    #[test]
    fn tightened_rules_apply() {
        let strict = PromotionRules {
            percentage_max: 50,
            ..PromotionRules::default()
        };
        let mut input = percentage_input();
        input.value = 60;
        assert!(validate_input(&input, &strict).is_err());
    }

    #[test]
    fn validate_window_reports_ends_at() {
        let now = Timestamp::now();
        let errors = validate_window(Some(now), Some(now)).unwrap_err();
        assert_eq!(errors.fields(), vec!["ends_at"]);
        assert!(validate_window(Some(now), Some(now.add_days(1))).is_ok());
    }

    #[test]
    fn validate_window_requires_both_bounds() {
        let now = Timestamp::now();
        assert_eq!(validate_window(None, None).unwrap_err().fields(), vec!["starts_at", "ends_at"]);
        assert_eq!(validate_window(None, Some(now)).unwrap_err().fields(), vec!["starts_at"]);
        assert_eq!(validate_window(Some(now), None).unwrap_err().fields(), vec!["ends_at"]);
    }

    #[test]
    fn input_deserializes_with_defaults() {
        let input: PromotionInput = serde_json::from_value(serde_json::json!({
            "code": "SHIPFREE",
            "name": "Free shipping",
            "kind": "free_shipping",
            "min_spend": 5000
        }))
        .unwrap();
        assert_eq!(input.value, 0);
        assert_eq!(input.usage_limit, 0);
        assert_eq!(input.admin_state, AdminState::Active);
        assert!(validate_input(&input, &rules()).is_ok());
    }
}
