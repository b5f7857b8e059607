//! In-memory fake of the Payrail API.
//!
//! Implements the wire contract the client depends on — resource CRUD,
//! association linking, collection pages with filtering/ordering/
//! pagination `next` links, and the micro-deposit verification protocol
//! — behind the [`Transport`] seam, so the integration suite exercises
//! real request construction without a network.

#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::Mutex,
};

use async_trait::async_trait;
use payrail::{
    ApiConfig, BankAccount, Card, Client, Customer, EntityOps,
    transport::{ApiRequest, ApiResponse, Method, Transport},
};
use serde_json::{Map, Value, json};

/// The two micro-deposit amounts the fake server "sends".
pub const MICRO_DEPOSITS: (i64, i64) = (1, 1);

/// Confirmation attempt budget.
pub const MAX_ATTEMPTS: i64 = 3;

#[derive(Debug, Default)]
struct FakeState {
    /// href -> attribute bag.
    resources: HashMap<String, Map<String, Value>>,
    /// collection uri -> member hrefs in creation order (the server's
    /// default ordering).
    collections: HashMap<String, Vec<String>>,
    next_id: u64,
    clock: u64,
}

/// Transport-level fake API.
#[derive(Debug, Default)]
pub struct FakeApi {
    state: Mutex<FakeState>,
}

impl FakeApi {
    /// A client wired to a fresh fake API.
    pub fn client() -> Client {
        Client::with_transport(ApiConfig::new("sk_test_key"), Self::default())
    }
}

#[async_trait]
impl Transport for FakeApi {
    async fn execute(&self, request: ApiRequest<'_>) -> payrail::Result<ApiResponse> {
        let (path, mut query) = split_query(request.path);
        query.extend(request.query.iter().cloned());
        let body = request.body.and_then(Value::as_object).cloned().unwrap_or_default();

        let mut state = self.state.lock().unwrap();
        let (status, payload) = state.dispatch(request.method, &path, &query, &body);
        let body = match payload {
            Value::Null => Vec::new(),
            other => serde_json::to_vec(&other).unwrap(),
        };
        Ok(ApiResponse { status, body })
    }
}

/// Splits a path that may carry its own query string (pagination links).
fn split_query(path: &str) -> (String, Vec<(String, String)>) {
    match path.split_once('?') {
        Some((path, query)) => {
            let pairs = url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();
            (path.to_owned(), pairs)
        }
        None => (path.to_owned(), Vec::new()),
    }
}

fn not_found() -> (u16, Value) {
    (404, json!({ "description": "no such resource" }))
}

impl FakeState {
    fn dispatch(
        &mut self,
        method: Method,
        path: &str,
        query: &[(String, String)],
        body: &Map<String, Value>,
    ) -> (u16, Value) {
        match method {
            Method::Post => self.handle_post(path, body),
            Method::Get => self.handle_get(path, query),
            Method::Put => self.handle_put(path, body),
            Method::Delete => self.handle_delete(path),
        }
    }

    // ---- creation ----

    fn handle_post(&mut self, path: &str, body: &Map<String, Value>) -> (u16, Value) {
        match path {
            "/customers" => self.create(path, "CU", body.clone()),
            "/cards" => self.create(path, "CC", body.clone()),
            "/bank_accounts" => self.create(path, "BA", body.clone()),
            _ => {
                if let Some(parent) = path.strip_suffix("/debits") {
                    self.create_debit(parent, body)
                } else if let Some(parent) = path.strip_suffix("/refunds") {
                    self.create_refund(parent, body)
                } else if let Some(parent) = path.strip_suffix("/verifications") {
                    self.create_verification(parent)
                } else {
                    not_found()
                }
            }
        }
    }

    fn create(&mut self, root: &str, prefix: &str, mut fields: Map<String, Value>) -> (u16, Value) {
        self.next_id += 1;
        let id = format!("{prefix}{}", self.next_id);
        let href = format!("{root}/{id}");
        fields.insert("id".to_owned(), json!(id));
        fields.insert("href".to_owned(), json!(href));
        fields.insert("created_at".to_owned(), json!(self.next_timestamp()));
        self.resources.insert(href.clone(), fields);
        self.collections.entry(root.to_owned()).or_default().push(href.clone());
        (201, self.render(&href))
    }

    fn create_debit(&mut self, parent: &str, body: &Map<String, Value>) -> (u16, Value) {
        if !self.resources.contains_key(parent) {
            return not_found();
        }
        let amount = body.get("amount").and_then(Value::as_i64);
        if !amount.is_some_and(|a| a > 0) {
            return (409, json!({ "description": "amount must be a positive integer" }));
        }
        if parent.starts_with("/bank_accounts/") && !self.bank_account_verified(parent) {
            return (409, json!({ "description": "bank account is not verified" }));
        }
        let mut fields = body.clone();
        fields.insert("status".to_owned(), json!("succeeded"));
        self.create(&format!("{parent}/debits"), "WD", fields)
    }

    fn create_refund(&mut self, parent: &str, body: &Map<String, Value>) -> (u16, Value) {
        let Some(debit) = self.resources.get(parent) else {
            return not_found();
        };
        let mut fields = body.clone();
        if !fields.contains_key("amount") {
            fields.insert("amount".to_owned(), debit.get("amount").cloned().unwrap_or(json!(0)));
        }
        fields.insert("status".to_owned(), json!("succeeded"));
        fields.insert("debit".to_owned(), json!(parent));
        self.create(&format!("{parent}/refunds"), "RF", fields)
    }

    fn create_verification(&mut self, parent: &str) -> (u16, Value) {
        let Some(account) = self.resources.get(parent) else {
            return not_found();
        };
        if let Some(existing) = account.get("verification_href").and_then(Value::as_str) {
            let status = self
                .resources
                .get(existing)
                .and_then(|v| v.get("verification_status"))
                .and_then(Value::as_str);
            if matches!(status, Some("pending" | "succeeded")) {
                return (
                    409,
                    json!({ "description": "a verification already exists for this bank account" }),
                );
            }
        }

        let mut fields = Map::new();
        fields.insert("attempts".to_owned(), json!(0));
        fields.insert("attempts_remaining".to_owned(), json!(MAX_ATTEMPTS));
        fields.insert("deposit_status".to_owned(), json!("pending"));
        fields.insert("verification_status".to_owned(), json!("pending"));
        fields.insert("bank_account".to_owned(), json!(parent));
        let (status, payload) = self.create("/verifications", "BAV", fields);

        let href = payload["href"].as_str().unwrap().to_owned();
        self.resources
            .get_mut(parent)
            .unwrap()
            .insert("verification_href".to_owned(), json!(href));
        (status, payload)
    }

    fn bank_account_verified(&self, href: &str) -> bool {
        self.resources
            .get(href)
            .and_then(|a| a.get("verification_href"))
            .and_then(Value::as_str)
            .and_then(|vhref| self.resources.get(vhref))
            .and_then(|v| v.get("verification_status"))
            .and_then(Value::as_str)
            == Some("succeeded")
    }

    // ---- retrieval ----

    fn handle_get(&mut self, path: &str, query: &[(String, String)]) -> (u16, Value) {
        if self.resources.contains_key(path) {
            return (200, self.render(path));
        }
        let is_collection = self.collections.contains_key(path)
            || path
                .rsplit_once('/')
                .is_some_and(|(parent, _)| self.resources.contains_key(parent));
        if is_collection {
            return self.list(path, query);
        }
        not_found()
    }

    fn list(&mut self, uri: &str, query: &[(String, String)]) -> (u16, Value) {
        let mut filters: Vec<(String, String, String)> = Vec::new();
        let mut sort: Option<String> = None;
        let mut limit: u64 = 25;
        let mut offset: u64 = 0;
        for (name, value) in query {
            match name.as_str() {
                "limit" => limit = value.parse().unwrap_or(limit),
                "offset" => offset = value.parse().unwrap_or(offset),
                "sort" => sort = Some(value.clone()),
                _ => {
                    let (field, op) = match name.split_once('[') {
                        Some((field, bracketed)) => {
                            (field.to_owned(), bracketed.trim_end_matches(']').to_owned())
                        }
                        None => (name.clone(), "=".to_owned()),
                    };
                    filters.push((field, op, value.clone()));
                }
            }
        }

        let members = self.collections.get(uri).cloned().unwrap_or_default();
        let mut matching: Vec<String> = members
            .into_iter()
            .filter(|href| {
                let fields = &self.resources[href];
                filters.iter().all(|(field, op, value)| field_matches(fields, field, op, value))
            })
            .collect();

        if let Some(sort) = &sort {
            let (field, descending) = match sort.strip_prefix('-') {
                Some(field) => (field.to_owned(), true),
                None => (sort.clone(), false),
            };
            matching.sort_by(|a, b| {
                let ordering =
                    value_cmp(self.resources[a].get(&field), self.resources[b].get(&field));
                if descending { ordering.reverse() } else { ordering }
            });
        }

        let total = matching.len() as u64;
        let page: Vec<Value> = matching
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|href| self.render(href))
            .collect();

        let next = if offset + limit < total {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (field, op, value) in &filters {
                let name = if op == "=" { field.clone() } else { format!("{field}[{op}]") };
                serializer.append_pair(&name, value);
            }
            if let Some(sort) = &sort {
                serializer.append_pair("sort", sort);
            }
            serializer.append_pair("limit", &limit.to_string());
            serializer.append_pair("offset", &(offset + limit).to_string());
            Some(format!("{uri}?{}", serializer.finish()))
        } else {
            None
        };

        (
            200,
            json!({
                "meta": { "total": total, "limit": limit, "offset": offset, "next": next },
                "items": page,
            }),
        )
    }

    // ---- updates ----

    fn handle_put(&mut self, path: &str, body: &Map<String, Value>) -> (u16, Value) {
        if !self.resources.contains_key(path) {
            return not_found();
        }
        if path.starts_with("/verifications/") {
            return self.confirm(path, body);
        }
        if let Some(customer) = body.get("customer").and_then(Value::as_str)
            && !self.resources.contains_key(customer)
        {
            return (400, json!({ "description": "no such customer" }));
        }

        let fields = self.resources.get_mut(path).unwrap();
        for (name, value) in body {
            fields.insert(name.clone(), value.clone());
        }
        if let Some(customer) = body.get("customer").and_then(Value::as_str).map(str::to_owned) {
            self.collections
                .entry(format!("{customer}/{}", owner_relation(path)))
                .or_default()
                .push(path.to_owned());
        }
        (200, self.render(path))
    }

    fn confirm(&mut self, path: &str, body: &Map<String, Value>) -> (u16, Value) {
        let amount_1 = body.get("amount_1").and_then(Value::as_i64);
        let amount_2 = body.get("amount_2").and_then(Value::as_i64);

        let fields = self.resources.get_mut(path).unwrap();
        let status =
            fields.get("verification_status").and_then(Value::as_str).unwrap_or_default();
        if status != "pending" {
            return (409, json!({ "description": "verification is not pending" }));
        }

        let attempts = fields.get("attempts").and_then(Value::as_i64).unwrap_or(0) + 1;
        let remaining =
            fields.get("attempts_remaining").and_then(Value::as_i64).unwrap_or(MAX_ATTEMPTS) - 1;
        fields.insert("attempts".to_owned(), json!(attempts));
        fields.insert("attempts_remaining".to_owned(), json!(remaining));

        if (amount_1, amount_2) == (Some(MICRO_DEPOSITS.0), Some(MICRO_DEPOSITS.1)) {
            fields.insert("deposit_status".to_owned(), json!("succeeded"));
            fields.insert("verification_status".to_owned(), json!("succeeded"));
        } else if remaining <= 0 {
            fields.insert("deposit_status".to_owned(), json!("failed"));
            fields.insert("verification_status".to_owned(), json!("failed"));
        }
        (200, self.render(path))
    }

    fn handle_delete(&mut self, path: &str) -> (u16, Value) {
        if self.resources.remove(path).is_none() {
            return not_found();
        }
        for members in self.collections.values_mut() {
            members.retain(|href| href != path);
        }
        (204, Value::Null)
    }

    // ---- rendering ----

    /// Renders a resource payload, embedding the bank account's
    /// verification sub-resource when one exists.
    fn render(&self, href: &str) -> Value {
        let mut fields = self.resources[href].clone();
        if let Some(vhref) = fields.remove("verification_href") {
            if let Some(verification) =
                vhref.as_str().and_then(|vhref| self.resources.get(vhref))
            {
                fields.insert("verification".to_owned(), Value::Object(verification.clone()));
            }
        }
        Value::Object(fields)
    }

    fn next_timestamp(&mut self) -> String {
        self.clock += 1;
        format!("2026-01-01T00:{:02}:{:02}Z", self.clock / 60, self.clock % 60)
    }
}

/// Which collection of the owning customer a linked resource joins.
fn owner_relation(href: &str) -> &'static str {
    if href.starts_with("/cards/") {
        "cards"
    } else if href.starts_with("/bank_accounts/") {
        "bank_accounts"
    } else {
        "resources"
    }
}

fn field_matches(fields: &Map<String, Value>, field: &str, op: &str, value: &str) -> bool {
    let Some(actual) = fields.get(field) else {
        return false;
    };
    match actual {
        Value::Number(n) => match (n.as_i64(), value.parse::<i64>()) {
            (Some(a), Ok(b)) => compare(&a, &b, op),
            _ => false,
        },
        Value::String(s) => compare(&s.as_str(), &value, op),
        Value::Bool(b) => op == "=" && value.parse() == Ok(*b),
        _ => false,
    }
}

fn compare<T: PartialOrd>(a: &T, b: &T, op: &str) -> bool {
    match op {
        "=" => a == b,
        "<" => a < b,
        ">" => a > b,
        "<=" => a <= b,
        ">=" => a >= b,
        _ => false,
    }
}

fn value_cmp(a: Option<&Value>, b: Option<&Value>) -> std::cmp::Ordering {
    use std::cmp::Ordering;
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x.as_i64().cmp(&y.as_i64()),
        (Some(Value::String(x)), Some(Value::String(y))) => x.cmp(y),
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        _ => Ordering::Equal,
    }
}

// ---- fixture helpers shared by the suite ----

/// Creates and saves a person customer.
pub async fn create_customer(client: &Client) -> Customer {
    let mut customer = Customer::new(client);
    customer.set_name("John Doe");
    customer.set_email("john.doe@example.com");
    customer.save().await.expect("customer create should succeed");
    customer
}

/// Creates and saves a card.
pub async fn create_card(client: &Client) -> Card {
    let mut card = Card::new(client);
    card.set_number("4111111111111111");
    card.set_expiration_month(12);
    card.set_expiration_year(2030);
    card.set_cvv("123");
    card.save().await.expect("card create should succeed");
    card
}

/// Creates and saves a bank account.
pub async fn create_bank_account(client: &Client) -> BankAccount {
    let mut account = BankAccount::new(client);
    account.set_name("Harry Fakester");
    account.set_routing_number("121042882");
    account.set_account_number("112233a");
    account.set_account_type("checking");
    account.save().await.expect("bank account create should succeed");
    account
}
