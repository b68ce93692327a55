//! Client for the REST record store that owns employees and payroll entries.

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::error::AdminError;
use crate::model::{Employee, PayrollEntry};

/// Both collections as returned by `GET /dados`.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    pub employees: Vec<Employee>,
    pub payroll_entries: Vec<PayrollEntry>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

#[derive(Clone)]
pub struct RecordStoreClient {
    base_url: String,
    http: Client,
}

impl RecordStoreClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, AdminError> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    #[instrument(skip(self))]
    pub async fn load_snapshot(&self) -> Result<Snapshot, AdminError> {
        let resp = self.http.get(self.url("/dados")).send().await?;
        let body: Value = decode(check(resp).await?).await?;

        let snapshot = Snapshot {
            employees: lenient_list(&body, "employees"),
            payroll_entries: lenient_list(&body, "payrollEntries"),
        };
        debug!(
            employees = snapshot.employees.len(),
            payroll_entries = snapshot.payroll_entries.len(),
            "Loaded record store snapshot"
        );
        Ok(snapshot)
    }

    #[instrument(skip(self, employee), fields(employee_id = %employee.id))]
    pub async fn save_employee(&self, employee: &Employee) -> Result<Employee, AdminError> {
        let resp = self
            .http
            .post(self.url("/employees"))
            .json(employee)
            .send()
            .await?;
        decode(check(resp).await?).await
    }

    #[instrument(skip(self))]
    pub async fn delete_employee(&self, id: &str) -> Result<(), AdminError> {
        let resp = self
            .http
            .delete(self.url(&format!("/employees/{id}")))
            .send()
            .await?;
        check(resp).await.map(drop)
    }

    #[instrument(skip(self, entry), fields(entry_id = %entry.id, employee_id = %entry.employee_id))]
    pub async fn save_payroll_entry(&self, entry: &PayrollEntry) -> Result<PayrollEntry, AdminError> {
        let resp = self
            .http
            .post(self.url("/payrollEntries"))
            .json(entry)
            .send()
            .await?;
        decode(check(resp).await?).await
    }

    #[instrument(skip(self))]
    pub async fn finalize_entry(&self, id: &str) -> Result<(), AdminError> {
        self.put_transition(id, "finalize").await
    }

    #[instrument(skip(self))]
    pub async fn reopen_entry(&self, id: &str) -> Result<(), AdminError> {
        self.put_transition(id, "reopen").await
    }

    #[instrument(skip(self))]
    pub async fn delete_entry(&self, id: &str) -> Result<(), AdminError> {
        let resp = self
            .http
            .delete(self.url(&format!("/payrollEntries/{id}")))
            .send()
            .await?;
        check(resp).await.map(drop)
    }

    async fn put_transition(&self, id: &str, action: &str) -> Result<(), AdminError> {
        let resp = self
            .http
            .put(self.url(&format!("/payrollEntries/{id}/{action}")))
            .send()
            .await?;
        check(resp).await.map(drop)
    }
}

/// Turns a non-2xx answer into `Rejected`, keeping the store's `{error}` text.
async fn check(resp: Response) -> Result<Response, AdminError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let text = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ErrorBody>(&text)
        .ok()
        .and_then(|b| b.error)
        .unwrap_or_else(|| format!("Record store answered {status}"));
    warn!(status = status.as_u16(), %message, "Record store rejected request");

    Err(AdminError::Rejected {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, AdminError> {
    resp.json::<T>()
        .await
        .map_err(|e| AdminError::Transport(format!("unreadable response: {e}")))
}

/// A missing or non-list field reads as empty. Records that fail to decode are
/// skipped one by one; the rest of the list is kept.
fn lenient_list<T: DeserializeOwned>(body: &Value, field: &str) -> Vec<T> {
    match body.get(field) {
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .filter_map(|(index, item)| match T::deserialize(item) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(field, index, error = %e, "Skipping undecodable record from record store");
                    None
                }
            })
            .collect(),
        Some(_) => {
            warn!(field, "Record store field is not a list");
            Vec::new()
        }
        None => Vec::new(),
    }
}
