//! Status names, dashboard cohorts and follow-up tasks
//!
//! `Status` names every classification predicate. `Cohort` and `TaskKind`
//! are the dashboard's drill-down keys; both map onto statuses so the
//! dashboard counts and the filtered customer list agree.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named classification of a customer record
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Subscription,
    Signed,
    Cancelled,
    ConstructionDone,
    ContractComplete,
    ContractInProgress,
    Unordered,
    CashDepositMissing,
    CashBalanceMissingDone,
    ConstructionUnconfirmed,
    EsignNotApproved,
    HankaeWait,
    InstallmentIncomplete,
}

impl Status {
    /// Every status, in evaluation order
    pub const ALL: [Status; 13] = [
        Status::Subscription,
        Status::Signed,
        Status::Cancelled,
        Status::ConstructionDone,
        Status::ContractComplete,
        Status::ContractInProgress,
        Status::Unordered,
        Status::CashDepositMissing,
        Status::CashBalanceMissingDone,
        Status::ConstructionUnconfirmed,
        Status::EsignNotApproved,
        Status::HankaeWait,
        Status::InstallmentIncomplete,
    ];

    /// Stable machine name
    pub fn name(&self) -> &'static str {
        match self {
            Status::Subscription => "subscription",
            Status::Signed => "signed",
            Status::Cancelled => "cancelled",
            Status::ConstructionDone => "construction_done",
            Status::ContractComplete => "contract_complete",
            Status::ContractInProgress => "contract_in_progress",
            Status::Unordered => "unordered",
            Status::CashDepositMissing => "cash_deposit_missing",
            Status::CashBalanceMissingDone => "cash_balance_missing_done",
            Status::ConstructionUnconfirmed => "construction_unconfirmed",
            Status::EsignNotApproved => "esign_not_approved",
            Status::HankaeWait => "hankae_wait",
            Status::InstallmentIncomplete => "installment_incomplete",
        }
    }

    /// Label shown to staff
    pub fn label(&self) -> &'static str {
        match self {
            Status::Subscription => "구독(할부)",
            Status::Signed => "서명완료",
            Status::Cancelled => "계약취소",
            Status::ConstructionDone => "공사완료",
            Status::ContractComplete => "계약완료",
            Status::ContractInProgress => "계약진행",
            Status::Unordered => "미발주",
            Status::CashDepositMissing => "입금 확인",
            Status::CashBalanceMissingDone => "잔금 확인",
            Status::ConstructionUnconfirmed => "시공 미확정",
            Status::EsignNotApproved => "계약서 미승인",
            Status::HankaeWait => "한캐승인대기",
            Status::InstallmentIncomplete => "할부계약 미완료",
        }
    }

    /// Look a status up by its machine name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.name() == name)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// A dashboard performance cohort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cohort {
    /// Every record of the period
    Total,
    /// Signed and construction date passed
    Done,
    /// Signed and construction confirmed
    Complete,
    /// Signed and construction waiting / unset
    Progress,
    /// Cancelled, signed or not
    Cancel,
}

impl Cohort {
    /// Every cohort, in dashboard order
    pub const ALL: [Cohort; 5] = [
        Cohort::Total,
        Cohort::Done,
        Cohort::Complete,
        Cohort::Progress,
        Cohort::Cancel,
    ];

    /// Drill-down key
    pub fn key(&self) -> &'static str {
        match self {
            Cohort::Total => "total",
            Cohort::Done => "done",
            Cohort::Complete => "complete",
            Cohort::Progress => "progress",
            Cohort::Cancel => "cancel",
        }
    }

    /// Performance card label
    pub fn label(&self) -> &'static str {
        match self {
            Cohort::Total => "총 등록",
            Cohort::Done => "공사완료",
            Cohort::Complete => "계약완료",
            Cohort::Progress => "계약진행",
            Cohort::Cancel => "계약취소",
        }
    }

    /// Revenue card label
    pub fn revenue_label(&self) -> &'static str {
        match self {
            Cohort::Total => "총 매출",
            Cohort::Done => "공사 매출",
            Cohort::Complete => "계약 매출",
            Cohort::Progress => "예정 매출",
            Cohort::Cancel => "취소 매출",
        }
    }

    /// The status that selects this cohort, `None` for the total
    pub fn status(&self) -> Option<Status> {
        match self {
            Cohort::Total => None,
            Cohort::Done => Some(Status::ConstructionDone),
            Cohort::Complete => Some(Status::ContractComplete),
            Cohort::Progress => Some(Status::ContractInProgress),
            Cohort::Cancel => Some(Status::Cancelled),
        }
    }

    /// Whether the cohort is drawn from signed records only
    pub fn requires_signature(&self) -> bool {
        matches!(self, Cohort::Done | Cohort::Complete | Cohort::Progress)
    }

    /// Look a cohort up by its key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

impl fmt::Display for Cohort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// A follow-up task queue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskKind {
    BalanceMissing,
    DepositMissing,
    Unordered,
    ConstructUnconfirmed,
    EsignPending,
    HankaeWait,
    InstallmentIncomplete,
}

impl TaskKind {
    /// Every task queue, in dashboard order
    pub const ALL: [TaskKind; 7] = [
        TaskKind::BalanceMissing,
        TaskKind::DepositMissing,
        TaskKind::Unordered,
        TaskKind::ConstructUnconfirmed,
        TaskKind::EsignPending,
        TaskKind::HankaeWait,
        TaskKind::InstallmentIncomplete,
    ];

    /// Drill-down key
    pub fn key(&self) -> &'static str {
        match self {
            TaskKind::BalanceMissing => "balance_missing",
            TaskKind::DepositMissing => "deposit_missing",
            TaskKind::Unordered => "unordered",
            TaskKind::ConstructUnconfirmed => "construct_unconfirmed",
            TaskKind::EsignPending => "esign_pending",
            TaskKind::HankaeWait => "hankae_wait",
            TaskKind::InstallmentIncomplete => "installment_incomplete",
        }
    }

    /// Task card title
    pub fn title(&self) -> &'static str {
        self.status().label()
    }

    /// The status a record must have to be in this queue
    pub fn status(&self) -> Status {
        match self {
            TaskKind::BalanceMissing => Status::CashBalanceMissingDone,
            TaskKind::DepositMissing => Status::CashDepositMissing,
            TaskKind::Unordered => Status::Unordered,
            TaskKind::ConstructUnconfirmed => Status::ConstructionUnconfirmed,
            TaskKind::EsignPending => Status::EsignNotApproved,
            TaskKind::HankaeWait => Status::HankaeWait,
            TaskKind::InstallmentIncomplete => Status::InstallmentIncomplete,
        }
    }

    /// Look a task up by its key
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.key() == key)
    }
}

impl fmt::Display for TaskKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_names_round_trip() {
        for status in Status::ALL {
            assert_eq!(Status::from_name(status.name()), Some(status));
        }
        assert_eq!(Status::from_name("bogus"), None);
    }

    #[test]
    fn test_status_serde_uses_names() {
        let json = serde_json::to_string(&Status::CashBalanceMissingDone).unwrap();
        assert_eq!(json, "\"cash_balance_missing_done\"");
    }

    #[test]
    fn test_cohort_keys() {
        assert_eq!(Cohort::from_key("progress"), Some(Cohort::Progress));
        assert_eq!(Cohort::Cancel.status(), Some(Status::Cancelled));
        assert_eq!(Cohort::Total.status(), None);
        assert!(Cohort::Done.requires_signature());
        assert!(!Cohort::Cancel.requires_signature());
    }

    #[test]
    fn test_task_keys() {
        assert_eq!(TaskKind::from_key("esign_pending"), Some(TaskKind::EsignPending));
        assert_eq!(TaskKind::BalanceMissing.title(), "잔금 확인");
        assert_eq!(TaskKind::from_key("total"), None);
        for task in TaskKind::ALL {
            assert_eq!(TaskKind::from_key(task.key()), Some(task));
        }
    }
}
