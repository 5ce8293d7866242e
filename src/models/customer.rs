//! Customer record model
//!
//! A customer record is one row of the remote spreadsheet. Every cell is kept
//! as text exactly as delivered; interpretation (money, dates, statuses)
//! happens in the rule layer so that a malformed cell can never make a
//! record unreadable.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use super::date::format_date;
use crate::error::{DashboardError, DashboardResult};

/// Cell values with business meaning
pub mod values {
    /// `payMethod` for subscription / installment sales
    pub const PAY_SUBSCRIPTION: &str = "구독(할부)";
    /// `esignStatus` once the customer signed
    pub const ESIGN_SIGNED: &str = "서명완료";
    /// `esignStatus` while the contract is sent but unsigned
    pub const ESIGN_SENT: &str = "발송완료";
    /// `esignStatus` / `kccDepositStatus` for a cancelled contract
    pub const CONTRACT_CANCELLED: &str = "계약취소";
    /// `kccDepositStatus` once the order deposit is paid
    pub const DEPOSIT_DONE: &str = "입금완료";
    /// `constructConfirm` values
    pub const CONFIRM_DONE: &str = "완료";
    pub const CONFIRM_WAITING: &str = "대기";
    pub const CONFIRM_CANCELLED: &str = "취소";
    /// `subApprove` once the subscription is approved
    pub const SUB_APPROVED: &str = "승인";
    /// `hankaeFeedback` while the installment contract is in progress
    pub const FEEDBACK_IN_PROGRESS: &str = "진행";
    /// Substring of `hankaeFeedback` marking an infeasible installment
    pub const FEEDBACK_INFEASIBLE: &str = "불가";
}

/// Keys of the money cells; separators are stripped before these are stored
pub const MONEY_FIELDS: &[&str] = &[
    "finalQuote",
    "kccSupplyPrice",
    "paidAmount",
    "balanceAmount",
    "subTotalFee",
    "subMonthlyFee",
];

/// Keys of the date cells normalized to `YYYY-MM-DD` when a snapshot is read
pub const DATE_FIELDS: &[&str] = &[
    "regDate",
    "applyDate",
    "birth",
    "esignDate",
    "constructDateFix",
];

macro_rules! customer_record {
    ($($(#[$doc:meta])* $field:ident => $key:literal,)*) => {
        /// One customer row of the snapshot
        ///
        /// Known columns map to named fields; any other column is preserved
        /// in `extra` so a round trip through the editor loses nothing.
        #[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
        pub struct CustomerRecord {
            $(
                $(#[$doc])*
                #[serde(rename = $key, default, deserialize_with = "lenient_string")]
                pub $field: String,
            )*

            /// Columns this build does not know about
            #[serde(flatten)]
            pub extra: BTreeMap<String, Value>,
        }

        /// Every known column key, in spreadsheet order
        pub const FIELD_KEYS: &[&str] = &[$($key),*];

        impl CustomerRecord {
            /// Read a known column by its key
            pub fn field(&self, key: &str) -> Option<&str> {
                match key {
                    $($key => Some(self.$field.as_str()),)*
                    _ => None,
                }
            }

            fn field_mut(&mut self, key: &str) -> Option<&mut String> {
                match key {
                    $($key => Some(&mut self.$field),)*
                    _ => None,
                }
            }
        }
    };
}

customer_record! {
    /// Unique identifier (e.g. "C-00042")
    customer_no => "customerNo",
    branch => "branch",
    /// Registration date (YYYY-MM-DD)
    reg_date => "regDate",
    apply_date => "applyDate",
    inflow_channel => "inflowChannel",
    name => "name",
    phone => "phone",
    address => "address",
    birth => "birth",
    memo_quick => "memoQuick",
    /// "완료", "대기", "취소" or empty
    construct_confirm => "constructConfirm",
    /// Fixed construction date
    construct_date_fix => "constructDateFix",
    /// "서명완료", "발송완료", "계약취소" or empty
    esign_status => "esignStatus",
    esign_date => "esignDate",
    /// "구독(할부)" for subscription sales, anything else is cash
    pay_method => "payMethod",
    /// Contract value used for revenue
    final_quote => "finalQuote",
    plus_yn => "plusYn",
    kcc_supply_price => "kccSupplyPrice",
    /// "입금완료", "계약취소" or other
    kcc_deposit_status => "kccDepositStatus",
    paid_amount => "paidAmount",
    /// Initial payment date
    paid_date => "paidDate",
    balance_amount => "balanceAmount",
    balance_paid_date => "balancePaidDate",
    interest_yn => "interestYn",
    sub_total_fee => "subTotalFee",
    sub_months => "subMonths",
    sub_monthly_fee => "subMonthlyFee",
    /// "승인" once approved
    sub_approve => "subApprove",
    /// Installment partner feedback
    hankae_feedback => "hankaeFeedback",
    installment_contract_date => "installmentContractDate",
    recording_request_date => "recordingRequestDate",
    plus_product => "plusProduct",
    plus_model => "plusModel",
    delivery_date => "deliveryDate",
    memo => "memo",
}

impl CustomerRecord {
    /// Create an empty record with the given customer number
    pub fn new(customer_no: impl Into<String>) -> Self {
        Self {
            customer_no: customer_no.into(),
            ..Self::default()
        }
    }

    /// Set a known column by its key
    ///
    /// Money columns are stored without thousands separators.
    pub fn set_field(&mut self, key: &str, value: &str) -> DashboardResult<()> {
        let is_money = MONEY_FIELDS.contains(&key);
        let slot = self.field_mut(key).ok_or_else(|| {
            DashboardError::Validation(format!("Unknown field: '{}'", key))
        })?;
        *slot = if is_money {
            crate::models::money::strip_separators(value)
        } else {
            value.to_string()
        };
        Ok(())
    }

    /// Display name, falling back to the customer number
    pub fn display_name(&self) -> &str {
        if is_blank(&self.name) {
            &self.customer_no
        } else {
            &self.name
        }
    }

    /// Rewrite the date cells as `YYYY-MM-DD` where they parse
    ///
    /// Prefix matching in the period filter and the calendar relies on this.
    /// Cells that do not parse are only trimmed.
    pub fn normalize_dates(&mut self) {
        for key in DATE_FIELDS {
            if let Some(slot) = self.field_mut(key) {
                *slot = format_date(slot.as_str());
            }
        }
    }
}

/// True when a cell is empty or whitespace-only
pub fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

/// Accept any JSON scalar for a text column
///
/// Spreadsheet backends hand back numbers for numeric-looking cells and null
/// for blank ones; both become text so that deserialization never fails on
/// the shape of a single cell.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => other.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r#"{
            "customerNo": "C-00001",
            "regDate": "2025-01-05",
            "payMethod": "구독(할부)",
            "esignStatus": "서명완료"
        }"#;
        let record: CustomerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.customer_no, "C-00001");
        assert_eq!(record.reg_date, "2025-01-05");
        assert_eq!(record.pay_method, values::PAY_SUBSCRIPTION);
        assert_eq!(record.paid_date, "");
        assert!(record.extra.is_empty());
    }

    #[test]
    fn test_deserialize_lenient_cells() {
        let json = r#"{
            "customerNo": 1042,
            "finalQuote": 3500000,
            "paidDate": null,
            "interestYn": true,
            "legacyColumn": "keep me"
        }"#;
        let record: CustomerRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.customer_no, "1042");
        assert_eq!(record.final_quote, "3500000");
        assert_eq!(record.paid_date, "");
        assert_eq!(record.interest_yn, "true");
        assert_eq!(
            record.extra.get("legacyColumn"),
            Some(&Value::String("keep me".into()))
        );
    }

    #[test]
    fn test_serialize_round_trip_keeps_extra() {
        let mut record = CustomerRecord::new("C-00002");
        record
            .extra
            .insert("salesRep".into(), Value::String("kim".into()));
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"customerNo\":\"C-00002\""));
        assert!(json.contains("\"salesRep\":\"kim\""));

        let back: CustomerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_field_access() {
        let mut record = CustomerRecord::new("C-00003");
        record.set_field("hankaeFeedback", "진행").unwrap();
        record.set_field("finalQuote", "1,250,000").unwrap();

        assert_eq!(record.field("hankaeFeedback"), Some("진행"));
        assert_eq!(record.final_quote, "1250000");
        assert_eq!(record.field("nope"), None);

        let err = record.set_field("nope", "x").unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn test_field_keys_cover_struct() {
        let record = CustomerRecord::default();
        assert_eq!(FIELD_KEYS.len(), 35);
        assert!(FIELD_KEYS.iter().all(|k| record.field(k).is_some()));
        assert!(MONEY_FIELDS.iter().all(|k| FIELD_KEYS.contains(k)));
    }

    #[test]
    fn test_normalize_dates() {
        let mut record = CustomerRecord {
            reg_date: "2025/06/02".into(),
            esign_date: " 2025.06.03 ".into(),
            construct_date_fix: "2025-06-20T00:00:00.000Z".into(),
            birth: "900101".into(),
            paid_date: "2025/06/04".into(),
            ..Default::default()
        };
        record
            .extra
            .insert("visitDate".into(), Value::String("2025/06/05".into()));
        record.normalize_dates();

        assert_eq!(record.reg_date, "2025-06-02");
        assert_eq!(record.esign_date, "2025-06-03");
        assert_eq!(record.construct_date_fix, "2025-06-20");
        assert_eq!(record.birth, "900101");
        assert!(record.apply_date.is_empty());
        // Only the listed date cells are rewritten
        assert_eq!(record.paid_date, "2025/06/04");
        assert_eq!(
            record.extra.get("visitDate"),
            Some(&Value::String("2025/06/05".into()))
        );
    }

    #[test]
    fn test_display_name() {
        let mut record = CustomerRecord::new("C-00004");
        assert_eq!(record.display_name(), "C-00004");
        record.name = "홍길동".into();
        assert_eq!(record.display_name(), "홍길동");
    }
}
