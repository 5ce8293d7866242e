//! Customer display formatting
//!
//! Formats customers for terminal output: the list table, the detail view
//! with its progress badges, and the status breakdown of a single record.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::models::customer::values;
use crate::models::money::format_money_value;
use crate::models::{format_date, is_blank, to_number, CustomerRecord, Status, FIELD_KEYS, MONEY_FIELDS};
use crate::services::classifier::{is_cancelled, is_construction_done, is_subscription, Classifier};

/// Values that render a badge as inactive
const INACTIVE_VALUES: &[&str] = &[
    "해당없음",
    "미선택",
    "(미선택)",
    "대기",
    "미입금",
    "미발주",
    "(일시불)",
];

/// One progress badge of a customer card
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub title: &'static str,
    pub value: String,
}

impl Badge {
    fn new(title: &'static str, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            title,
            value: if value.is_empty() { "대기".to_string() } else { value },
        }
    }

    /// Whether the badge shows progress rather than a placeholder
    pub fn is_active(&self) -> bool {
        !INACTIVE_VALUES.contains(&self.value.as_str())
    }
}

/// Derive the eight progress badges of a record
///
/// A record whose construction confirmation is "취소", or that is cancelled
/// by contract or deposit status, shows every derived badge as cancelled.
pub fn badges(record: &CustomerRecord, classifier: &Classifier) -> Vec<Badge> {
    let today = classifier.today();
    let cancelled =
        record.construct_confirm == values::CONFIRM_CANCELLED || is_cancelled(record, today);
    let subscription = is_subscription(record, today);

    let or_cancelled = |value: String| {
        if cancelled {
            values::CONFIRM_CANCELLED.to_string()
        } else {
            value
        }
    };

    let plus = if record.plus_yn.is_empty() {
        "해당없음".to_string()
    } else {
        record.plus_yn.clone()
    };

    let esign = if cancelled {
        values::CONTRACT_CANCELLED.to_string()
    } else if record.esign_status.is_empty() {
        "미서명".to_string()
    } else {
        record.esign_status.clone()
    };

    let order = if record.kcc_deposit_status == values::DEPOSIT_DONE {
        "발주완료"
    } else {
        "미발주"
    };

    let deposit = if to_number(&record.balance_amount) > 0 && record.balance_paid_date.is_empty() {
        "잔금확인"
    } else if !record.paid_date.is_empty() {
        "입금완료"
    } else {
        "미입금"
    };

    let approval = if !subscription {
        "(일시불)".to_string()
    } else if record.sub_approve.is_empty() {
        values::CONFIRM_WAITING.to_string()
    } else {
        record.sub_approve.clone()
    };

    let installment = if !subscription {
        "해당없음"
    } else if record.installment_contract_date.is_empty() {
        "미완료"
    } else {
        "계약완료"
    };

    let construction = if is_construction_done(record, today) {
        "시공완료"
    } else if !record.construct_date_fix.is_empty() {
        "시공예정"
    } else {
        values::CONFIRM_WAITING
    };

    vec![
        Badge::new("시공확정", record.construct_confirm.clone()),
        Badge::new("PLUS가전", or_cancelled(plus)),
        Badge::new("전자서명", esign),
        Badge::new("발주", or_cancelled(order.to_string())),
        Badge::new("입금", or_cancelled(deposit.to_string())),
        Badge::new("구독승인", or_cancelled(approval)),
        Badge::new("할부계약", or_cancelled(installment.to_string())),
        Badge::new("시공", or_cancelled(construction.to_string())),
    ]
}

/// Format a list of customers as a table
pub fn format_customer_list(records: &[CustomerRecord], banner: Option<&str>) -> String {
    let mut output = String::new();
    if let Some(banner) = banner {
        output.push_str(&format!("{}\n", banner));
    }
    if records.is_empty() {
        output.push_str("No customers found.\n");
        return output;
    }

    let name_width = records
        .iter()
        .map(|r| r.display_name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);

    output.push_str(&format!(
        "{:<10}  {:<10}  {:<name_width$}  {:<13}  {:<8}  {:<10}  {:>14}\n",
        "No",
        "Registered",
        "Name",
        "Phone",
        "Branch",
        "Pay",
        "Final Quote",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<10}  {:-<10}  {:-<name_width$}  {:-<13}  {:-<8}  {:-<10}  {:->14}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for record in records {
        output.push_str(&format!(
            "{:<10}  {:<10}  {:<name_width$}  {:<13}  {:<8}  {:<10}  {:>14}\n",
            record.customer_no,
            format_date(&record.reg_date),
            record.display_name(),
            record.phone,
            record.branch,
            record.pay_method,
            format_money_value(&record.final_quote),
            name_width = name_width,
        ));
    }

    output.push_str(&format!("\n{} customer(s)\n", records.len()));
    output
}

/// Format a single customer's details
///
/// Only filled columns are listed. Money columns get thousands separators
/// and date columns are normalized.
pub fn format_customer_details(record: &CustomerRecord, classifier: &Classifier) -> String {
    let mut output = String::new();

    output.push_str(&format!(
        "Customer: {} ({})\n",
        record.display_name(),
        record.customer_no
    ));

    let line: Vec<String> = badges(record, classifier)
        .iter()
        .map(|b| {
            if b.is_active() {
                format!("[{} {}]", b.title, b.value)
            } else {
                format!("({} {})", b.title, b.value)
            }
        })
        .collect();
    output.push_str(&format!("  {}\n\n", line.join(" ")));

    let key_width = FIELD_KEYS.iter().map(|k| k.len()).max().unwrap_or(0);
    for key in FIELD_KEYS.iter().skip(1) {
        let raw = record.field(key).unwrap_or_default();
        if is_blank(raw) {
            continue;
        }
        let shown = if MONEY_FIELDS.contains(key) {
            format_money_value(raw)
        } else if key.ends_with("Date") {
            format_date(raw)
        } else {
            raw.to_string()
        };
        output.push_str(&format!("  {:<key_width$}  {}\n", key, shown, key_width = key_width));
    }

    for (key, value) in &record.extra {
        let shown = match value {
            serde_json::Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        if !is_blank(&shown) {
            output.push_str(&format!("  {:<key_width$}  {}\n", key, shown, key_width = key_width));
        }
    }

    output
}

/// Format which statuses a record has
pub fn format_classification(record: &CustomerRecord, statuses: &BTreeSet<Status>) -> String {
    let mut output = String::new();
    output.push_str(&format!(
        "Statuses for {} ({})\n",
        record.display_name(),
        record.customer_no
    ));
    for status in Status::ALL {
        let mark = if statuses.contains(&status) { "x" } else { " " };
        output.push_str(&format!("  [{}] {:<26} {}\n", mark, status.name(), status.label()));
    }
    output
}
