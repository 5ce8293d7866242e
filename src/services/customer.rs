//! Customer service
//!
//! Lookups, the filtered customer list and the record editor. Dashboard
//! drill-downs reuse the classifier registry so the list always agrees with
//! the figures it was opened from.

use std::cmp::Ordering;

use tracing::{debug, info};

use crate::audit::generate_diff;
use crate::error::{DashboardError, DashboardResult};
use crate::models::{
    is_blank, parse_date, Cohort, CustomerRecord, PeriodFilter, TaskKind,
};
use crate::reports::dashboard::cohort_members;
use crate::services::classifier::Classifier;
use crate::services::period::filter_by_period;
use crate::storage::Storage;

/// A dashboard card the list was opened from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrillDown {
    Cohort(Cohort),
    Task(TaskKind),
}

impl DrillDown {
    /// Banner shown above a drilled-down list
    pub fn label(&self) -> String {
        match self {
            DrillDown::Cohort(Cohort::Total) => "필터: 전체".to_string(),
            DrillDown::Cohort(cohort) => format!("필터: {}", cohort.label()),
            DrillDown::Task(task) => format!("업무: {}", task.title()),
        }
    }
}

/// Criteria for the customer list
///
/// A drill-down replaces the period: it selects from the whole snapshot.
/// The exact-match columns and the text query refine either selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListFilter {
    pub period: PeriodFilter,
    pub drill_down: Option<DrillDown>,
    pub branch: Option<String>,
    pub inflow_channel: Option<String>,
    pub pay_method: Option<String>,
    pub esign_status: Option<String>,
    pub sub_approve: Option<String>,
    pub hankae_feedback: Option<String>,
    pub query: Option<String>,
}

impl ListFilter {
    /// A filter that only narrows by period
    pub fn for_period(period: PeriodFilter) -> Self {
        Self {
            period,
            drill_down: None,
            branch: None,
            inflow_channel: None,
            pay_method: None,
            esign_status: None,
            sub_approve: None,
            hankae_feedback: None,
            query: None,
        }
    }

    /// Set the drill-down
    pub fn with_drill_down(mut self, drill_down: DrillDown) -> Self {
        self.drill_down = Some(drill_down);
        self
    }

    /// Set the text query
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Check the exact-match column filters
    pub fn matches_columns(&self, record: &CustomerRecord) -> bool {
        let checks = [
            (&self.branch, &record.branch),
            (&self.inflow_channel, &record.inflow_channel),
            (&self.pay_method, &record.pay_method),
            (&self.esign_status, &record.esign_status),
            (&self.sub_approve, &record.sub_approve),
            (&self.hankae_feedback, &record.hankae_feedback),
        ];
        checks.iter().all(|(wanted, actual)| match wanted {
            Some(wanted) if !wanted.is_empty() => wanted == *actual,
            _ => true,
        })
    }

    /// Check the text query against name, phone, customer number and address
    ///
    /// Matching ignores case except on the phone number, which is compared
    /// as typed.
    pub fn matches_query(&self, record: &CustomerRecord) -> bool {
        let query = match self.query.as_deref() {
            Some(q) if !q.is_empty() => q.to_lowercase(),
            _ => return true,
        };
        record.name.to_lowercase().contains(&query)
            || record.phone.contains(&query)
            || record.customer_no.to_lowercase().contains(&query)
            || record.address.to_lowercase().contains(&query)
    }
}

/// Apply a list filter to a snapshot, newest registration first
pub fn select<'a>(
    records: &'a [CustomerRecord],
    filter: &ListFilter,
    classifier: &Classifier,
) -> Vec<&'a CustomerRecord> {
    let base: Vec<&CustomerRecord> = match filter.drill_down {
        Some(DrillDown::Cohort(cohort)) => {
            let everything: Vec<&CustomerRecord> = records.iter().collect();
            cohort_members(cohort, &everything, classifier)
        }
        Some(DrillDown::Task(task)) => {
            let everything: Vec<&CustomerRecord> = records.iter().collect();
            classifier.select(task.status(), &everything)
        }
        None => filter_by_period(records, &filter.period, classifier.today()),
    };

    let mut list: Vec<&CustomerRecord> = base
        .into_iter()
        .filter(|r| filter.matches_columns(r))
        .filter(|r| filter.matches_query(r))
        .collect();
    sort_newest_first(&mut list);
    list
}

/// Stable sort by registration date, newest first
///
/// Records without a readable date keep their relative order at the end.
pub fn sort_newest_first(list: &mut [&CustomerRecord]) {
    list.sort_by(|a, b| match (parse_date(&a.reg_date), parse_date(&b.reg_date)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

/// Service for customer management
pub struct CustomerService<'a> {
    storage: &'a Storage,
}

impl<'a> CustomerService<'a> {
    /// Create a new customer service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Get a customer by number
    pub fn get(&self, customer_no: &str) -> DashboardResult<Option<CustomerRecord>> {
        self.storage.customers.get(customer_no.trim())
    }

    /// Get a customer by number, failing when it does not exist
    pub fn require(&self, customer_no: &str) -> DashboardResult<CustomerRecord> {
        self.get(customer_no)?
            .ok_or_else(|| DashboardError::customer_not_found(customer_no.trim()))
    }

    /// List customers matching a filter
    pub fn list(
        &self,
        filter: &ListFilter,
        classifier: &Classifier,
    ) -> DashboardResult<Vec<CustomerRecord>> {
        let records = self.storage.customers.get_all()?;
        let list: Vec<CustomerRecord> = select(&records, filter, classifier)
            .into_iter()
            .cloned()
            .collect();
        debug!(total = records.len(), shown = list.len(), "listed customers");
        Ok(list)
    }

    /// Create a customer from `key=value` pairs
    ///
    /// A number is assigned when `customerNo` is not given.
    pub fn create(&self, fields: &[(String, String)]) -> DashboardResult<CustomerRecord> {
        let mut record = CustomerRecord::default();
        apply_fields(&mut record, fields)?;

        if is_blank(&record.customer_no) {
            record.customer_no = self.storage.customers.next_customer_no()?;
        } else {
            record.customer_no = record.customer_no.trim().to_string();
            if self.storage.customers.contains(&record.customer_no)? {
                return Err(DashboardError::duplicate_customer(&record.customer_no));
            }
        }

        self.storage.customers.upsert(record.clone())?;
        self.storage.customers.save()?;

        self.storage.log_create(
            record.customer_no.clone(),
            Some(record.name.clone()),
            &record,
        )?;
        info!(customer_no = %record.customer_no, "created customer");

        Ok(record)
    }

    /// Update a customer from `key=value` pairs
    pub fn update(
        &self,
        customer_no: &str,
        fields: &[(String, String)],
    ) -> DashboardResult<CustomerRecord> {
        let before = self.require(customer_no)?;
        let mut record = before.clone();
        apply_fields(&mut record, fields)?;

        if record.customer_no != before.customer_no {
            return Err(DashboardError::Validation(
                "customerNo cannot be changed".into(),
            ));
        }

        self.storage.customers.upsert(record.clone())?;
        self.storage.customers.save()?;

        let diff = match (serde_json::to_value(&before), serde_json::to_value(&record)) {
            (Ok(b), Ok(a)) => generate_diff(&b, &a),
            _ => None,
        };
        self.storage.log_update(
            record.customer_no.clone(),
            Some(record.name.clone()),
            &before,
            &record,
            diff,
        )?;
        info!(customer_no = %record.customer_no, "updated customer");

        Ok(record)
    }
}

/// Apply and validate editor fields
pub fn apply_fields(record: &mut CustomerRecord, fields: &[(String, String)]) -> DashboardResult<()> {
    for (key, value) in fields {
        record.set_field(key.trim(), value.trim())?;
    }

    if !is_blank(&record.reg_date) && parse_date(&record.reg_date).is_none() {
        return Err(DashboardError::Validation(format!(
            "regDate is not a date: '{}'",
            record.reg_date
        )));
    }

    Ok(())
}

/// Split `key=value` arguments into pairs
pub fn parse_assignments<S: AsRef<str>>(args: &[S]) -> DashboardResult<Vec<(String, String)>> {
    args.iter()
        .map(|arg| {
            let arg = arg.as_ref();
            arg.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .filter(|(k, _)| !k.is_empty())
                .ok_or_else(|| {
                    DashboardError::Validation(format!("Expected key=value, got '{}'", arg))
                })
        })
        .collect()
}
