//! In-process record store used by the integration tests.
#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_web::{App, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use payroll_admin::{AppState, RecordStoreClient};

#[derive(Default)]
pub struct MockDb {
    pub employees: Vec<Value>,
    pub entries: Vec<Value>,
    /// Served verbatim by `GET /dados` when set.
    pub dados_override: Option<Value>,
    pub next_id: u64,
    pub fail_dados: bool,
}

impl MockDb {
    fn next_id(&mut self) -> String {
        self.next_id += 1;
        format!("srv-{}", self.next_id)
    }
}

type Db = web::Data<Mutex<MockDb>>;

fn upsert(list: &mut Vec<Value>, mut record: Value, id: String) -> Value {
    record["id"] = json!(id);
    match list.iter_mut().find(|r| r["id"] == record["id"]) {
        Some(slot) => *slot = record.clone(),
        None => list.push(record.clone()),
    }
    record
}

async fn dados(db: Db) -> HttpResponse {
    let db = db.lock().unwrap();
    if db.fail_dados {
        return HttpResponse::InternalServerError().json(json!({ "error": "disk full" }));
    }
    let body = db.dados_override.clone().unwrap_or_else(|| {
        json!({ "employees": db.employees, "payrollEntries": db.entries })
    });
    HttpResponse::Ok().json(body)
}

async fn save_employee(db: Db, body: web::Json<Value>) -> HttpResponse {
    let mut db = db.lock().unwrap();
    let record = body.into_inner();
    let tax_id = record["taxId"].as_str().unwrap_or_default().to_string();
    let id = record["id"].as_str().unwrap_or_default().to_string();
    let duplicate = !tax_id.is_empty()
        && db
            .employees
            .iter()
            .any(|e| e["taxId"] == json!(tax_id) && e["id"] != json!(id));
    if duplicate {
        return HttpResponse::BadRequest().json(json!({ "error": "Tax id already registered" }));
    }

    let id = if id.is_empty() { db.next_id() } else { id };
    let saved = upsert(&mut db.employees, record, id);
    HttpResponse::Ok().json(saved)
}

async fn delete_employee(db: Db, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    let mut db = db.lock().unwrap();
    db.employees.retain(|e| e["id"] != json!(id));
    db.entries.retain(|e| e["employeeId"] != json!(id));
    HttpResponse::Ok().json(json!({ "message": "deleted" }))
}

async fn save_entry(db: Db, body: web::Json<Value>) -> HttpResponse {
    let mut db = db.lock().unwrap();
    let record = body.into_inner();
    let id = record["id"].as_str().unwrap_or_default().to_string();
    let id = if id.is_empty() { db.next_id() } else { id };
    let saved = upsert(&mut db.entries, record, id);
    HttpResponse::Ok().json(saved)
}

async fn set_status(db: Db, path: web::Path<(String, String)>) -> HttpResponse {
    let (id, action) = path.into_inner();
    let status = match action.as_str() {
        "finalize" => "finalizado",
        "reopen" => "aberto",
        _ => return HttpResponse::NotFound().finish(),
    };
    let mut db = db.lock().unwrap();
    match db.entries.iter_mut().find(|e| e["id"] == json!(id)) {
        Some(entry) => {
            entry["status"] = json!(status);
            HttpResponse::Ok().json(entry.clone())
        }
        None => HttpResponse::NotFound().json(json!({ "error": "Entry not found" })),
    }
}

async fn delete_entry(db: Db, path: web::Path<String>) -> HttpResponse {
    let id = path.into_inner();
    db.lock().unwrap().entries.retain(|e| e["id"] != json!(id));
    HttpResponse::Ok().json(json!({ "message": "deleted" }))
}

pub struct MockStore {
    pub base_url: String,
    pub db: Arc<Mutex<MockDb>>,
}

impl MockStore {
    pub fn client(&self) -> RecordStoreClient {
        RecordStoreClient::new(&self.base_url, Duration::from_secs(5)).expect("client")
    }

    pub async fn state(&self) -> AppState {
        let state = AppState::new(self.client());
        state.refresh().await.expect("initial refresh");
        state
    }
}

pub async fn spawn_store(db: MockDb) -> MockStore {
    let db = Arc::new(Mutex::new(db));
    let data: Db = web::Data::from(db.clone());

    let server = HttpServer::new(move || {
        App::new()
            .app_data(data.clone())
            .route("/dados", web::get().to(dados))
            .route("/employees", web::post().to(save_employee))
            .route("/employees/{id}", web::delete().to(delete_employee))
            .route("/payrollEntries", web::post().to(save_entry))
            .route("/payrollEntries/{id}/{action}", web::put().to(set_status))
            .route("/payrollEntries/{id}", web::delete().to(delete_entry))
    })
    .workers(1)
    .bind(("127.0.0.1", 0))
    .expect("bind mock record store");

    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());

    MockStore {
        base_url: format!("http://{addr}"),
        db,
    }
}

/// Address nothing listens on.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind throwaway listener");
    let addr = listener.local_addr().expect("throwaway listener addr");
    drop(listener);
    format!("http://{addr}")
}

pub fn employee(id: &str, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "taxId": format!("000.000.000-{id}"),
        "contractType": "CLT",
        "baseSalary": 2000.0,
        "bonus": 500.0,
        "hasAdvance": true,
        "advanceAmount": 400.0,
        "advanceKind": "cash",
        "loans": [
            {"id": "l1", "principal": 1200.0, "installmentCount": 12, "startMonth": "2024-01", "description": "Phone"}
        ]
    })
}

pub fn entry(id: &str, employee_id: &str, month: &str, status: &str) -> Value {
    json!({
        "id": id,
        "employeeId": employee_id,
        "month": month,
        "vacation": "normal",
        "baseSalary": 2000.0,
        "bonus": 500.0,
        "totalReceived": 2500.0,
        "cashAdvance": 400.0,
        "accountingAdvance": 0.0,
        "cashPayment": 2500.0,
        "accountingPayment": 0.0,
        "netTotal": 2500.0,
        "status": status
    })
}

pub fn seeded() -> MockDb {
    MockDb {
        employees: vec![employee("1", "Maria Souza"), employee("2", "João Lima")],
        entries: vec![
            entry("e1", "1", "2024-05", "finalizado"),
            entry("e2", "1", "2024-06", "aberto"),
        ],
        ..Default::default()
    }
}
