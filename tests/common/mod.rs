//! Mock of the GitHub Packages REST and GraphQL endpoints.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{delete, get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use url::Url;

pub const TOKEN: &str = "test-token";

#[derive(Clone)]
pub struct MockPackage {
    pub name: String,
    pub repository: Option<String>,
    pub versions: Vec<(u64, String)>,
}

#[derive(Default)]
pub struct MockState {
    pub packages: Vec<MockPackage>,
    pub fail_deletes: HashSet<u64>,
    pub fail_package_listing: bool,
    pub deleted: Vec<u64>,
    pub requests: Vec<String>,
}

impl MockState {
    pub fn with_package(
        mut self,
        name: &str,
        repository: Option<&str>,
        versions: &[(u64, &str)],
    ) -> Self {
        self.packages.push(MockPackage {
            name: name.to_string(),
            repository: repository.map(str::to_string),
            versions: versions.iter().map(|(id, label)| (*id, label.to_string())).collect(),
        });
        self
    }

    pub fn failing_delete(mut self, id: u64) -> Self {
        self.fail_deletes.insert(id);
        self
    }

    pub fn failing_package_listing(mut self) -> Self {
        self.fail_package_listing = true;
        self
    }

    fn package(&self, name: &str) -> Option<&MockPackage> {
        self.packages.iter().find(|p| p.name == name)
    }

    fn delete(&mut self, id: u64) -> Result<(), StatusCode> {
        if self.fail_deletes.contains(&id) {
            return Err(StatusCode::INTERNAL_SERVER_ERROR);
        }
        for package in &mut self.packages {
            if let Some(pos) = package.versions.iter().position(|(v, _)| *v == id) {
                package.versions.remove(pos);
                self.deleted.push(id);
                return Ok(());
            }
        }
        Err(StatusCode::NOT_FOUND)
    }
}

pub type Shared = Arc<Mutex<MockState>>;

/// Start the mock on an ephemeral port and return its base URL.
pub async fn spawn(state: MockState) -> (Url, Shared) {
    let shared = Arc::new(Mutex::new(state));
    let app = Router::new()
        .route("/orgs/{org}/packages", get(list_packages))
        .route(
            "/orgs/{org}/packages/{package_type}/{package_name}/versions",
            get(list_versions),
        )
        .route(
            "/orgs/{org}/packages/{package_type}/{package_name}/versions/{id}",
            delete(delete_version),
        )
        .route("/graphql", post(graphql))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (Url::parse(&format!("http://{}/", addr)).unwrap(), shared)
}

fn authorized(headers: &HeaderMap) -> Result<(), StatusCode> {
    let expected = format!("Bearer {}", TOKEN);
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some(value) if value == expected => Ok(()),
        _ => Err(StatusCode::UNAUTHORIZED),
    }
}

#[derive(Deserialize)]
struct PageParams {
    per_page: Option<usize>,
    page: Option<usize>,
    package_type: Option<String>,
}

fn page_of<T: Clone>(items: &[T], params: &PageParams) -> Vec<T> {
    let per_page = params.per_page.unwrap_or(30);
    let page = params.page.unwrap_or(1).max(1);
    items
        .iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .cloned()
        .collect()
}

async fn list_packages(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path(org): Path<String>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut state = state.lock().unwrap();
    state.requests.push(format!(
        "GET packages {} type={} page={}",
        org,
        params.package_type.as_deref().unwrap_or(""),
        params.page.unwrap_or(1)
    ));
    if state.fail_package_listing {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let packages: Vec<Value> = page_of(&state.packages, &params)
        .into_iter()
        .map(|p| match p.repository {
            Some(repo) => json!({ "name": p.name, "repository": { "name": repo } }),
            None => json!({ "name": p.name }),
        })
        .collect();
    Ok(Json(Value::Array(packages)))
}

async fn list_versions(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_org, _package_type, package_name)): Path<(String, String, String)>,
    Query(params): Query<PageParams>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let mut state = state.lock().unwrap();
    state.requests.push(format!(
        "GET versions {} page={}",
        package_name,
        params.page.unwrap_or(1)
    ));
    let package = state.package(&package_name).ok_or(StatusCode::NOT_FOUND)?;

    let versions: Vec<Value> = page_of(&package.versions, &params)
        .into_iter()
        .map(|(id, label)| json!({ "id": id, "name": label }))
        .collect();
    Ok(Json(Value::Array(versions)))
}

async fn delete_version(
    State(state): State<Shared>,
    headers: HeaderMap,
    Path((_org, _package_type, package_name, id)): Path<(String, String, String, u64)>,
) -> StatusCode {
    if let Err(status) = authorized(&headers) {
        return status;
    }
    let mut state = state.lock().unwrap();
    state
        .requests
        .push(format!("DELETE {} {}", package_name, id));
    match state.delete(id) {
        Ok(()) => StatusCode::NO_CONTENT,
        Err(status) => status,
    }
}

fn cursor_page<T: Clone>(items: &[T], variables: &Value) -> (Vec<T>, bool, Option<String>) {
    let first = variables["first"].as_u64().unwrap_or(100) as usize;
    let start: usize = variables["after"]
        .as_str()
        .and_then(|c| c.strip_prefix("cursor:"))
        .and_then(|c| c.parse().ok())
        .unwrap_or(0);
    let page: Vec<T> = items.iter().skip(start).take(first).cloned().collect();
    let end = start + page.len();
    (page, end < items.len(), Some(format!("cursor:{}", end)))
}

async fn graphql(
    State(state): State<Shared>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> Result<Json<Value>, StatusCode> {
    authorized(&headers)?;
    let query = body["query"].as_str().unwrap_or_default().to_string();
    let variables = body["variables"].clone();
    let mut state = state.lock().unwrap();

    if query.contains("deletePackageVersion") {
        let id = variables["id"]
            .as_str()
            .and_then(|id| id.strip_prefix("PV_"))
            .and_then(|id| id.parse::<u64>().ok())
            .ok_or(StatusCode::BAD_REQUEST)?;
        state.requests.push(format!("mutation delete {}", id));
        let response = match state.delete(id) {
            Ok(()) => json!({ "data": { "deletePackageVersion": { "success": true } } }),
            Err(_) => json!({
                "data": { "deletePackageVersion": null },
                "errors": [{ "message": format!("Could not delete PV_{}", id) }]
            }),
        };
        return Ok(Json(response));
    }

    if query.contains("versions(") {
        let name = variables["name"].as_str().unwrap_or_default().to_string();
        state.requests.push(format!(
            "query versions {} after={}",
            name,
            variables["after"].as_str().unwrap_or("-")
        ));
        let nodes = match state.package(&name) {
            Some(package) => {
                let (page, has_next, end) = cursor_page(&package.versions, &variables);
                let versions: Vec<Value> = page
                    .into_iter()
                    .map(|(id, label)| json!({ "id": format!("PV_{}", id), "version": label }))
                    .collect();
                vec![json!({
                    "name": name,
                    "versions": {
                        "nodes": versions,
                        "pageInfo": { "hasNextPage": has_next, "endCursor": end }
                    }
                })]
            }
            None => Vec::new(),
        };
        return Ok(Json(json!({
            "data": { "organization": { "packages": { "nodes": nodes } } }
        })));
    }

    state.requests.push(format!(
        "query packages type={} after={}",
        variables["packageType"].as_str().unwrap_or_default(),
        variables["after"].as_str().unwrap_or("-")
    ));
    if state.fail_package_listing {
        return Ok(Json(json!({
            "data": null,
            "errors": [{ "message": "Resource not accessible by integration" }]
        })));
    }
    let (page, has_next, end) = cursor_page(&state.packages, &variables);
    let packages: Vec<Value> = page
        .into_iter()
        .map(|p| {
            json!({
                "name": p.name,
                "repository": p.repository.map(|r| json!({ "name": r })),
            })
        })
        .collect();
    Ok(Json(json!({
        "data": { "organization": { "packages": {
            "nodes": packages,
            "pageInfo": { "hasNextPage": has_next, "endCursor": end }
        } } }
    })))
}
