//! In-process stand-in for the employee backend, served by actix-web on an
//! ephemeral port. Counts every request so tests can assert that nothing was
//! sent, and lets a test force a status for one method + path.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Duration;

use actix_web::{App, HttpRequest, HttpResponse, HttpServer, web};
use serde_json::{Value, json};

use employee_console::model::employee::{Employee, EmployeeId};
use employee_console::model::role::Role;
use employee_console::{ApiClient, SessionStore};

pub struct Account {
    pub password: String,
    /// `None` means the backend has no role row for the user.
    pub role: Option<Role>,
}

pub struct Backend {
    pub employees: Mutex<Vec<Employee>>,
    pub accounts: Mutex<Vec<(String, Account)>>,
    tokens: Mutex<HashMap<String, String>>,
    forced: Mutex<HashMap<(String, String), u16>>,
    requests: AtomicUsize,
    next_id: AtomicU64,
}

enum Policy {
    Public,
    Authenticated,
    Roles(&'static [Role]),
}

impl Backend {
    pub fn seeded() -> Self {
        let account = |password: &str, role: Option<Role>| Account {
            password: password.to_string(),
            role,
        };
        Self {
            employees: Mutex::new(vec![
                employee(1, "Jane", "Doe", "admin"),
                employee(2, "John", "Smith", "manager"),
                employee(3, "Ada", "Lovelace", "admin"),
            ]),
            accounts: Mutex::new(vec![
                ("admin".into(), account("admin-pw", Some(Role::Admin))),
                ("manager".into(), account("manager-pw", Some(Role::Manager))),
                ("bob".into(), account("bob-pw", Some(Role::User))),
                ("alice".into(), account("alice-pw", Some(Role::User))),
                ("carol".into(), account("carol-pw", None)),
            ]),
            tokens: Mutex::new(HashMap::new()),
            forced: Mutex::new(HashMap::new()),
            requests: AtomicUsize::new(0),
            next_id: AtomicU64::new(100),
        }
    }

    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Answer `status` for `method path` (path including `/api`).
    pub fn force(&self, method: &str, path: &str, status: u16) {
        self.forced
            .lock()
            .unwrap()
            .insert((method.to_string(), path.to_string()), status);
    }

    /// Invalidate every issued token, as if they all expired.
    pub fn revoke_tokens(&self) {
        self.tokens.lock().unwrap().clear();
    }

    pub fn role_of(&self, username: &str) -> Option<Role> {
        self.accounts
            .lock()
            .unwrap()
            .iter()
            .find(|(name, _)| name == username)
            .and_then(|(_, a)| a.role)
    }

    /// Count the request, apply forced statuses, then authenticate and
    /// authorize. Returns the caller's username.
    fn enter(&self, req: &HttpRequest, policy: Policy) -> Result<Option<String>, HttpResponse> {
        self.requests.fetch_add(1, Ordering::SeqCst);

        let key = (req.method().to_string(), req.path().to_string());
        if let Some(status) = self.forced.lock().unwrap().get(&key) {
            let status = actix_web::http::StatusCode::from_u16(*status).unwrap();
            return Err(HttpResponse::build(status).json(json!({"message": "forced by test"})));
        }

        if matches!(policy, Policy::Public) {
            return Ok(None);
        }

        let token = req
            .headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|h| h.strip_prefix("Bearer "));
        let username = match token.and_then(|t| self.tokens.lock().unwrap().get(t).cloned()) {
            Some(u) => u,
            None => {
                return Err(HttpResponse::Unauthorized().json(json!({"error": "Invalid or expired token"})));
            }
        };

        if let Policy::Roles(allowed) = policy {
            let role = self.role_of(&username).unwrap_or(Role::User);
            if !allowed.contains(&role) {
                return Err(HttpResponse::Forbidden().json(json!({"error": "Forbidden"})));
            }
        }
        Ok(Some(username))
    }
}

pub fn employee(id: u64, first: &str, last: &str, creator: &str) -> Employee {
    Employee {
        id: EmployeeId(id),
        first_name: first.to_string(),
        last_name: last.to_string(),
        email: format!("{}.{}@example.com", first.to_lowercase(), last.to_lowercase()),
        username: creator.to_string(),
    }
}

const EDITORS: &[Role] = &[Role::Manager, Role::Admin];
const ADMINS: &[Role] = &[Role::Admin];

async fn login(state: web::Data<Backend>, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Public) {
        return resp;
    }
    let username = body["username"].as_str().unwrap_or_default();
    let password = body["password"].as_str().unwrap_or_default();

    let role = {
        let accounts = state.accounts.lock().unwrap();
        match accounts.iter().find(|(name, a)| name == username && a.password == password) {
            Some((_, a)) => a.role.unwrap_or(Role::User),
            None => {
                return HttpResponse::Unauthorized().json(json!({"message": "Invalid credentials"}));
            }
        }
    };
    let token = format!("token-{}-{}", username, state.next_id.fetch_add(1, Ordering::SeqCst));
    state
        .tokens
        .lock()
        .unwrap()
        .insert(token.clone(), username.to_string());
    HttpResponse::Ok().json(json!({"token": token, "role": role}))
}

async fn register(state: web::Data<Backend>, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Public) {
        return resp;
    }
    let username = body["username"].as_str().unwrap_or_default().to_string();
    let password = body["password"].as_str().unwrap_or_default().to_string();

    let mut accounts = state.accounts.lock().unwrap();
    if accounts.iter().any(|(name, _)| *name == username) {
        return HttpResponse::BadRequest().json(json!({"message": "Username already exists"}));
    }
    accounts.push((
        username,
        Account {
            password,
            role: Some(Role::User),
        },
    ));
    HttpResponse::Ok().json(json!({"message": "User registered successfully with role: USER"}))
}

async fn list_users(state: web::Data<Backend>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Authenticated) {
        return resp;
    }
    let users: Vec<Value> = state
        .accounts
        .lock()
        .unwrap()
        .iter()
        .enumerate()
        .map(|(i, (name, a))| json!({"id": i + 1, "username": name, "password": a.password}))
        .collect();
    HttpResponse::Ok().json(users)
}

async fn list_employees(state: web::Data<Backend>, req: HttpRequest) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Authenticated) {
        return resp;
    }
    HttpResponse::Ok().json(&*state.employees.lock().unwrap())
}

async fn get_employee(state: web::Data<Backend>, req: HttpRequest, path: web::Path<u64>) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Authenticated) {
        return resp;
    }
    let id = EmployeeId(path.into_inner());
    match state.employees.lock().unwrap().iter().find(|e| e.id == id) {
        Some(e) => HttpResponse::Ok().json(e),
        None => HttpResponse::NotFound().json(json!({"message": "Employee not found"})),
    }
}

fn employee_from_body(id: EmployeeId, body: &Value, creator: String) -> Employee {
    Employee {
        id,
        first_name: body["firstName"].as_str().unwrap_or_default().to_string(),
        last_name: body["lastName"].as_str().unwrap_or_default().to_string(),
        email: body["email"].as_str().unwrap_or_default().to_string(),
        username: creator,
    }
}

async fn create_employee(state: web::Data<Backend>, req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
    let caller = match state.enter(&req, Policy::Roles(EDITORS)) {
        Ok(caller) => caller.unwrap_or_default(),
        Err(resp) => return resp,
    };
    let id = EmployeeId(state.next_id.fetch_add(1, Ordering::SeqCst));
    let created = employee_from_body(id, &body, caller);
    state.employees.lock().unwrap().push(created.clone());
    HttpResponse::Created().json(created)
}

async fn update_employee(
    state: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<u64>,
    body: web::Json<Value>,
) -> HttpResponse {
    let caller = match state.enter(&req, Policy::Roles(EDITORS)) {
        Ok(caller) => caller.unwrap_or_default(),
        Err(resp) => return resp,
    };
    let id = EmployeeId(path.into_inner());
    let mut employees = state.employees.lock().unwrap();
    match employees.iter_mut().find(|e| e.id == id) {
        Some(slot) => {
            *slot = employee_from_body(id, &body, caller);
            HttpResponse::Ok().json(slot.clone())
        }
        None => HttpResponse::NotFound().json(json!({"message": "Employee not found"})),
    }
}

async fn delete_employee(state: web::Data<Backend>, req: HttpRequest, path: web::Path<u64>) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Roles(ADMINS)) {
        return resp;
    }
    let id = EmployeeId(path.into_inner());
    let mut employees = state.employees.lock().unwrap();
    let before = employees.len();
    employees.retain(|e| e.id != id);
    if employees.len() == before {
        HttpResponse::NotFound().json(json!({"message": "Employee not found"}))
    } else {
        HttpResponse::NoContent().finish()
    }
}

async fn get_roles(state: web::Data<Backend>, req: HttpRequest, path: web::Path<String>) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Authenticated) {
        return resp;
    }
    let username = path.into_inner();
    match state.role_of(&username) {
        Some(role) => HttpResponse::Ok().json(json!([{"id": 1, "username": username, "role": role}])),
        None => HttpResponse::NotFound().finish(),
    }
}

async fn set_role(
    state: web::Data<Backend>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<Value>,
) -> HttpResponse {
    if let Err(resp) = state.enter(&req, Policy::Roles(ADMINS)) {
        return resp;
    }
    let username = path.into_inner();
    let role: Role = match serde_json::from_value(body["role"].clone()) {
        Ok(role) => role,
        Err(_) => return HttpResponse::BadRequest().body("Role must be ADMIN, MANAGER, or USER"),
    };
    let mut accounts = state.accounts.lock().unwrap();
    match accounts.iter_mut().find(|(name, _)| *name == username) {
        Some((_, account)) if account.role.is_some() => {
            account.role = Some(role);
            HttpResponse::Ok().finish()
        }
        _ => HttpResponse::NotFound().finish(),
    }
}

fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(login))
                    .route("/register", web::post().to(register))
                    .route("/users", web::get().to(list_users)),
            )
            .service(
                web::scope("/employees")
                    .service(
                        web::resource("")
                            .route(web::get().to(list_employees))
                            .route(web::post().to(create_employee)),
                    )
                    .service(
                        web::resource("/roles/{username}")
                            .route(web::get().to(get_roles))
                            .route(web::put().to(set_role)),
                    )
                    .service(
                        web::resource("/{id}")
                            .route(web::get().to(get_employee))
                            .route(web::put().to(update_employee))
                            .route(web::delete().to(delete_employee)),
                    ),
            ),
    );
}

/// Start the mock on an ephemeral port. Returns the api base url.
pub fn spawn(backend: Backend) -> (String, web::Data<Backend>) {
    let state = web::Data::new(backend);
    let app_state = state.clone();
    let server = HttpServer::new(move || App::new().app_data(app_state.clone()).configure(routes))
        .workers(1)
        .bind(("127.0.0.1", 0))
        .expect("bind mock backend");
    let addr = server.addrs()[0];
    actix_web::rt::spawn(server.run());
    (format!("http://{addr}/api"), state)
}

pub fn client(base_url: &str) -> ApiClient {
    ApiClient::with_base_url(base_url, Duration::from_secs(5), SessionStore::in_memory())
        .expect("client")
}

/// Client whose session belongs to `username`.
pub async fn logged_in(base_url: &str, username: &str) -> ApiClient {
    let api = client(base_url);
    api.login(username, &format!("{username}-pw"))
        .await
        .expect("login");
    api
}
