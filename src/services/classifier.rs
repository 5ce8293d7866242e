//! Customer status classification
//!
//! Each status is a pure predicate over one record and a reference date.
//! Predicates short-circuit in a fixed order and several build on the
//! signed/cancelled/construction-done checks, so they are defined once here
//! and looked up through [`predicate`] by everything else (dashboard counts,
//! list drill-downs, the `classify` command).

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::models::customer::values;
use crate::models::{is_blank, parse_date, to_number, CustomerRecord, Status};

/// A classification predicate
pub type Predicate = fn(&CustomerRecord, NaiveDate) -> bool;

/// Payment by subscription / installment
pub fn is_subscription(c: &CustomerRecord, _today: NaiveDate) -> bool {
    c.pay_method == values::PAY_SUBSCRIPTION
}

/// Electronic signature completed
pub fn is_signed(c: &CustomerRecord, _today: NaiveDate) -> bool {
    c.esign_status == values::ESIGN_SIGNED
}

/// Contract cancelled on either the signature or the deposit side
pub fn is_cancelled(c: &CustomerRecord, _today: NaiveDate) -> bool {
    c.esign_status == values::CONTRACT_CANCELLED
        || c.kcc_deposit_status == values::CONTRACT_CANCELLED
}

/// Signed and the fixed construction date lies before the reference date
pub fn is_construction_done(c: &CustomerRecord, today: NaiveDate) -> bool {
    if !is_signed(c, today) {
        return false;
    }
    match parse_date(&c.construct_date_fix) {
        Some(date) => date < today,
        None => false,
    }
}

/// Signed, open, construction still ahead, and construction confirmed
pub fn is_contract_complete(c: &CustomerRecord, today: NaiveDate) -> bool {
    if !is_open_signed_contract(c, today) {
        return false;
    }
    c.construct_confirm == values::CONFIRM_DONE
}

/// Signed, open, construction still ahead, and construction waiting or unset
///
/// Any other confirmation value (e.g. "취소" on a contract that is not
/// otherwise cancelled) is neither complete nor in progress.
pub fn is_contract_in_progress(c: &CustomerRecord, today: NaiveDate) -> bool {
    if !is_open_signed_contract(c, today) {
        return false;
    }
    let confirm = c.construct_confirm.trim();
    confirm == values::CONFIRM_WAITING || confirm.is_empty()
}

fn is_open_signed_contract(c: &CustomerRecord, today: NaiveDate) -> bool {
    is_signed(c, today) && !is_cancelled(c, today) && !is_construction_done(c, today)
}

/// Signed but the order deposit is not marked paid
pub fn is_unordered(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_cancelled(c, today) {
        return false;
    }
    if !is_signed(c, today) {
        return false;
    }
    c.kcc_deposit_status != values::DEPOSIT_DONE
}

/// Signed cash sale with no initial payment date
pub fn is_cash_deposit_missing(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_subscription(c, today) {
        return false;
    }
    if is_cancelled(c, today) {
        return false;
    }
    is_signed(c, today) && is_blank(&c.paid_date)
}

/// Signed cash sale with an outstanding balance and no balance payment date
pub fn is_cash_balance_missing_done(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_cancelled(c, today) || is_subscription(c, today) || !is_signed(c, today) {
        return false;
    }
    if to_number(&c.balance_amount) == 0 {
        return false;
    }
    is_blank(&c.balance_paid_date)
}

/// Construction not confirmed, unless the installment partner ruled it out
pub fn is_construction_unconfirmed(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_cancelled(c, today) {
        return false;
    }
    if c.hankae_feedback.contains(values::FEEDBACK_INFEASIBLE) {
        return false;
    }
    c.construct_confirm != values::CONFIRM_DONE
}

/// Contract sent for signature but not signed yet
pub fn is_esign_not_approved(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_cancelled(c, today) {
        return false;
    }
    c.esign_status == values::ESIGN_SENT
}

/// Approved subscription still waiting for the installment partner
pub fn is_hankae_wait(c: &CustomerRecord, today: NaiveDate) -> bool {
    if is_cancelled(c, today) {
        return false;
    }
    if !is_subscription(c, today) {
        return false;
    }
    if c.sub_approve != values::SUB_APPROVED {
        return false;
    }
    c.hankae_feedback != values::FEEDBACK_IN_PROGRESS
}

/// Installment in progress but the recording request was never made
pub fn is_installment_incomplete(c: &CustomerRecord, today: NaiveDate) -> bool {
    if !is_subscription(c, today) {
        return false;
    }
    if c.hankae_feedback != values::FEEDBACK_IN_PROGRESS {
        return false;
    }
    is_blank(&c.recording_request_date)
}

/// Status → predicate table, in evaluation order
pub const REGISTRY: [(Status, Predicate); 13] = [
    (Status::Subscription, is_subscription),
    (Status::Signed, is_signed),
    (Status::Cancelled, is_cancelled),
    (Status::ConstructionDone, is_construction_done),
    (Status::ContractComplete, is_contract_complete),
    (Status::ContractInProgress, is_contract_in_progress),
    (Status::Unordered, is_unordered),
    (Status::CashDepositMissing, is_cash_deposit_missing),
    (Status::CashBalanceMissingDone, is_cash_balance_missing_done),
    (Status::ConstructionUnconfirmed, is_construction_unconfirmed),
    (Status::EsignNotApproved, is_esign_not_approved),
    (Status::HankaeWait, is_hankae_wait),
    (Status::InstallmentIncomplete, is_installment_incomplete),
];

/// Look up the predicate for a status
pub fn predicate(status: Status) -> Predicate {
    match status {
        Status::Subscription => is_subscription,
        Status::Signed => is_signed,
        Status::Cancelled => is_cancelled,
        Status::ConstructionDone => is_construction_done,
        Status::ContractComplete => is_contract_complete,
        Status::ContractInProgress => is_contract_in_progress,
        Status::Unordered => is_unordered,
        Status::CashDepositMissing => is_cash_deposit_missing,
        Status::CashBalanceMissingDone => is_cash_balance_missing_done,
        Status::ConstructionUnconfirmed => is_construction_unconfirmed,
        Status::EsignNotApproved => is_esign_not_approved,
        Status::HankaeWait => is_hankae_wait,
        Status::InstallmentIncomplete => is_installment_incomplete,
    }
}

/// Classifies records against a fixed reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    today: NaiveDate,
}

impl Classifier {
    /// Create a classifier for the given reference date
    pub fn new(today: NaiveDate) -> Self {
        Self { today }
    }

    /// Create a classifier for the local calendar date
    pub fn for_today() -> Self {
        Self::new(chrono::Local::now().date_naive())
    }

    /// The reference date
    pub fn today(&self) -> NaiveDate {
        self.today
    }

    /// Whether a record has the given status
    pub fn is(&self, status: Status, record: &CustomerRecord) -> bool {
        predicate(status)(record, self.today)
    }

    /// Every status a record has
    pub fn classify(&self, record: &CustomerRecord) -> BTreeSet<Status> {
        REGISTRY
            .iter()
            .filter(|(_, check)| check(record, self.today))
            .map(|(status, _)| *status)
            .collect()
    }

    /// The records with the given status, in input order
    pub fn select<'a>(
        &self,
        status: Status,
        records: &[&'a CustomerRecord],
    ) -> Vec<&'a CustomerRecord> {
        let check = predicate(status);
        records
            .iter()
            .copied()
            .filter(|r| check(r, self.today))
            .collect()
    }

    /// How many records have the given status
    pub fn count(&self, status: Status, records: &[&CustomerRecord]) -> usize {
        let check = predicate(status);
        records.iter().filter(|r| check(r, self.today)).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn classifier() -> Classifier {
        Classifier::new(today())
    }

    fn signed() -> CustomerRecord {
        CustomerRecord {
            customer_no: "C-00001".into(),
            esign_status: values::ESIGN_SIGNED.into(),
            ..Default::default()
        }
    }

    #[test]
    fn test_registry_matches_lookup() {
        let mut record = signed();
        record.pay_method = values::PAY_SUBSCRIPTION.into();
        record.sub_approve = values::SUB_APPROVED.into();
        for (status, check) in REGISTRY {
            assert_eq!(
                check(&record, today()),
                predicate(status)(&record, today()),
                "{}",
                status
            );
        }
        let order: Vec<Status> = REGISTRY.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, Status::ALL.to_vec());
    }

    #[test]
    fn test_construction_done_requires_signature() {
        let mut record = CustomerRecord {
            construct_date_fix: "2020-01-01".into(),
            ..Default::default()
        };
        for status in ["", "발송완료", "계약취소", "서명 완료"] {
            record.esign_status = status.into();
            assert!(!is_construction_done(&record, today()));
        }
        record.esign_status = values::ESIGN_SIGNED.into();
        assert!(is_construction_done(&record, today()));
    }

    #[test]
    fn test_construction_done_date_boundaries() {
        let mut record = signed();
        record.construct_date_fix = "2025-06-14".into();
        assert!(is_construction_done(&record, today()));

        // Today itself is not yet done
        record.construct_date_fix = "2025-06-15".into();
        assert!(!is_construction_done(&record, today()));

        record.construct_date_fix = "미정".into();
        assert!(!is_construction_done(&record, today()));

        record.construct_date_fix = "".into();
        assert!(!is_construction_done(&record, today()));
    }

    #[test]
    fn test_done_takes_precedence_over_complete() {
        let mut record = signed();
        record.construct_date_fix = "2020-01-01".into();
        record.construct_confirm = values::CONFIRM_DONE.into();

        let c = classifier();
        assert!(c.is(Status::ConstructionDone, &record));
        assert!(!c.is(Status::ContractComplete, &record));
        assert!(!c.is(Status::ContractInProgress, &record));
    }

    #[test]
    fn test_unordered_and_in_progress() {
        let mut record = signed();
        record.kcc_deposit_status = "미입금".into();
        record.construct_confirm = values::CONFIRM_WAITING.into();

        let statuses = classifier().classify(&record);
        assert!(statuses.contains(&Status::Unordered));
        assert!(statuses.contains(&Status::ContractInProgress));
        assert!(!statuses.contains(&Status::ContractComplete));
    }

    #[test]
    fn test_in_progress_accepts_blank_and_padded_waiting() {
        let mut record = signed();
        for confirm in ["", "   ", " 대기 "] {
            record.construct_confirm = confirm.into();
            assert!(is_contract_in_progress(&record, today()), "{:?}", confirm);
        }
    }

    #[test]
    fn test_unknown_confirmation_falls_in_neither_bucket() {
        let mut record = signed();
        record.construct_confirm = values::CONFIRM_CANCELLED.into();
        assert!(!is_contract_complete(&record, today()));
        assert!(!is_contract_in_progress(&record, today()));
    }

    #[test]
    fn test_complete_and_in_progress_are_exclusive() {
        let confirms = ["", "대기", "완료", "취소", "보류", " 완료"];
        let dates = ["", "2020-01-01", "2030-01-01", "bad"];
        let deposits = ["", "입금완료", "계약취소"];
        for confirm in confirms {
            for date in dates {
                for deposit in deposits {
                    let record = CustomerRecord {
                        esign_status: values::ESIGN_SIGNED.into(),
                        construct_confirm: confirm.into(),
                        construct_date_fix: date.into(),
                        kcc_deposit_status: deposit.into(),
                        ..Default::default()
                    };
                    assert!(
                        !(is_contract_complete(&record, today())
                            && is_contract_in_progress(&record, today()))
                    );
                }
            }
        }
    }

    #[test]
    fn test_hankae_wait_scenario() {
        let record = CustomerRecord {
            pay_method: values::PAY_SUBSCRIPTION.into(),
            sub_approve: values::SUB_APPROVED.into(),
            hankae_feedback: "대기".into(),
            ..Default::default()
        };
        assert!(is_hankae_wait(&record, today()));
        assert!(!is_installment_incomplete(&record, today()));
    }

    #[test]
    fn test_installment_incomplete() {
        let mut record = CustomerRecord {
            pay_method: values::PAY_SUBSCRIPTION.into(),
            sub_approve: values::SUB_APPROVED.into(),
            hankae_feedback: values::FEEDBACK_IN_PROGRESS.into(),
            ..Default::default()
        };
        assert!(is_installment_incomplete(&record, today()));
        assert!(!is_hankae_wait(&record, today()));

        record.recording_request_date = "2025-05-01".into();
        assert!(!is_installment_incomplete(&record, today()));
    }

    #[test]
    fn test_cancelled_short_circuits_task_predicates() {
        let record = CustomerRecord {
            esign_status: values::CONTRACT_CANCELLED.into(),
            pay_method: values::PAY_SUBSCRIPTION.into(),
            sub_approve: values::SUB_APPROVED.into(),
            balance_amount: "1,000,000".into(),
            construct_confirm: "대기".into(),
            ..Default::default()
        };
        assert!(is_cancelled(&record, today()));
        for check in [
            is_unordered as Predicate,
            is_cash_deposit_missing,
            is_cash_balance_missing_done,
            is_construction_unconfirmed,
            is_esign_not_approved,
            is_hankae_wait,
        ] {
            assert!(!check(&record, today()));
        }
    }

    #[test]
    fn test_deposit_side_cancellation() {
        let mut record = signed();
        record.kcc_deposit_status = values::CONTRACT_CANCELLED.into();
        assert!(is_cancelled(&record, today()));
        assert!(!is_unordered(&record, today()));
        assert!(!is_contract_in_progress(&record, today()));
    }

    #[test]
    fn test_cash_deposit_missing() {
        let mut record = signed();
        assert!(is_cash_deposit_missing(&record, today()));

        record.paid_date = "  ".into();
        assert!(is_cash_deposit_missing(&record, today()));

        record.paid_date = "2025-06-01".into();
        assert!(!is_cash_deposit_missing(&record, today()));

        record.paid_date.clear();
        record.pay_method = values::PAY_SUBSCRIPTION.into();
        assert!(!is_cash_deposit_missing(&record, today()));
    }

    #[test]
    fn test_cash_balance_missing() {
        let mut record = signed();
        record.balance_amount = "0".into();
        assert!(!is_cash_balance_missing_done(&record, today()));

        record.balance_amount = "없음".into();
        assert!(!is_cash_balance_missing_done(&record, today()));

        record.balance_amount = "1,500,000".into();
        assert!(is_cash_balance_missing_done(&record, today()));

        record.balance_paid_date = "2025-06-10".into();
        assert!(!is_cash_balance_missing_done(&record, today()));
    }

    #[test]
    fn test_construction_unconfirmed() {
        let mut record = CustomerRecord::default();
        assert!(is_construction_unconfirmed(&record, today()));

        record.hankae_feedback = "승인불가".into();
        assert!(!is_construction_unconfirmed(&record, today()));

        record.hankae_feedback.clear();
        record.construct_confirm = values::CONFIRM_DONE.into();
        assert!(!is_construction_unconfirmed(&record, today()));
    }

    #[test]
    fn test_esign_not_approved() {
        let record = CustomerRecord {
            esign_status: values::ESIGN_SENT.into(),
            ..Default::default()
        };
        assert!(is_esign_not_approved(&record, today()));
        assert!(!is_signed(&record, today()));
    }

    #[test]
    fn test_classify_empty_record() {
        let statuses = classifier().classify(&CustomerRecord::default());
        assert_eq!(
            statuses.into_iter().collect::<Vec<_>>(),
            vec![Status::ConstructionUnconfirmed]
        );
    }

    #[test]
    fn test_select_and_count_preserve_order() {
        let a = signed();
        let b = CustomerRecord::new("C-00002");
        let mut c = signed();
        c.customer_no = "C-00003".into();
        let records = vec![&a, &b, &c];

        let classifier = classifier();
        let picked = classifier.select(Status::Signed, &records);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].customer_no, "C-00001");
        assert_eq!(picked[1].customer_no, "C-00003");
        assert_eq!(classifier.count(Status::Signed, &records), 2);
    }
}
