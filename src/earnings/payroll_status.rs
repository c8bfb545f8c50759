use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    ToSchema,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PayrollStatus {
    #[default]
    Unpaid,
    Partial,
    Paid,
}

impl PayrollStatus {
    /// Paid once `paid + bonus` reaches `total`, partial for anything above zero.
    pub fn resolve(total_amount: f64, paid_amount: f64, bonus_amount: f64) -> Self {
        let settled = paid_amount + bonus_amount;
        if settled >= total_amount {
            PayrollStatus::Paid
        } else if settled > 0.0 {
            PayrollStatus::Partial
        } else {
            PayrollStatus::Unpaid
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn nothing_paid_is_unpaid() {
        assert_eq!(PayrollStatus::resolve(100.0, 0.0, 0.0), PayrollStatus::Unpaid);
    }

    #[test]
    fn half_paid_is_partial() {
        assert_eq!(PayrollStatus::resolve(100.0, 50.0, 0.0), PayrollStatus::Partial);
        assert_eq!(PayrollStatus::resolve(100.0, 0.0, 10.0), PayrollStatus::Partial);
    }

    #[test]
    fn exact_boundary_is_paid() {
        assert_eq!(PayrollStatus::resolve(100.0, 100.0, 0.0), PayrollStatus::Paid);
        assert_eq!(PayrollStatus::resolve(100.0, 70.0, 30.0), PayrollStatus::Paid);
        assert_eq!(PayrollStatus::resolve(100.0, 90.0, 30.0), PayrollStatus::Paid);
    }

    #[test]
    fn zero_total_counts_as_paid() {
        assert_eq!(PayrollStatus::resolve(0.0, 0.0, 0.0), PayrollStatus::Paid);
    }

    #[test]
    fn string_forms() {
        assert_eq!(PayrollStatus::Partial.to_string(), "partial");
        assert_eq!(PayrollStatus::from_str("paid").unwrap(), PayrollStatus::Paid);
        assert!(PayrollStatus::from_str("settled").is_err());
    }
}
