//! Remote customer store: the collaborator trait and its HTTP implementation.

use std::{fmt, time::Duration};

use async_trait::async_trait;
use reqwest::{header::ACCEPT, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use shared::{
    domain::{Customer, CustomerId},
    error::ApiError,
    protocol::{routes, DeleteCustomerRequest},
};
use tracing::{debug, info, warn};
use url::Url;

use crate::error::ServiceError;

const MAX_REASON_LEN: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    ListCustomers,
    FetchCustomer,
    CreateCustomer,
    UpdateCustomer,
    DeleteCustomer,
}

impl Operation {
    pub fn verb(self) -> &'static str {
        match self {
            Self::ListCustomers => "list customers",
            Self::FetchCustomer => "fetch the customer",
            Self::CreateCustomer => "register the customer",
            Self::UpdateCustomer => "update the customer",
            Self::DeleteCustomer => "delete the customer",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ListCustomers => "list-customers",
            Self::FetchCustomer => "fetch-customer",
            Self::CreateCustomer => "create-customer",
            Self::UpdateCustomer => "update-customer",
            Self::DeleteCustomer => "delete-customer",
        };
        f.write_str(name)
    }
}

#[async_trait]
pub trait CustomerService: Send + Sync {
    async fn list_customers(&self) -> Result<Vec<Customer>, ServiceError>;
    /// `Ok(None)` when the store has no customer with this id.
    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, ServiceError>;
    /// The created record when the store echoes it back.
    async fn create_customer(&self, payload: &Customer) -> Result<Option<Customer>, ServiceError>;
    async fn update_customer(&self, payload: &Customer) -> Result<(), ServiceError>;
    async fn delete_customer(&self, id: CustomerId) -> Result<(), ServiceError>;
}

pub struct HttpCustomerService {
    http: Client,
    base_url: String,
}

impl HttpCustomerService {
    pub fn new(base_url: &str) -> Result<Self, ServiceError> {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, ServiceError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ServiceError::InvalidBaseUrl {
                url: base_url.to_string(),
                reason: format!("failed to build http client: {e}"),
            })?;
        Self::with_client(http, base_url)
    }

    pub fn with_client(http: Client, base_url: &str) -> Result<Self, ServiceError> {
        let invalid = |reason: String| ServiceError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let parsed = Url::parse(base_url.trim()).map_err(|e| invalid(e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme '{}'", parsed.scheme())));
        }
        Ok(Self {
            http,
            base_url: parsed.as_str().trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, route: &str) -> String {
        format!("{}{route}", self.base_url)
    }

    async fn send(&self, route: &str, request: RequestBuilder) -> Result<Response, ServiceError> {
        debug!(route, "customer service: sending request");
        request
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ServiceError::Transport {
                route: route.to_string(),
                reason: e.to_string(),
            })
    }

    async fn body_text(route: &str, response: Response) -> Result<String, ServiceError> {
        response.text().await.map_err(|e| ServiceError::Transport {
            route: route.to_string(),
            reason: e.to_string(),
        })
    }

    async fn ensure_success(route: &str, response: Response) -> Result<Response, ServiceError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let raw = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<ApiError>(&raw)
            .ok()
            .and_then(|body| body.summary().map(str::to_string))
            .unwrap_or_else(|| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    status.canonical_reason().unwrap_or("no reason given").to_string()
                } else {
                    trimmed.chars().take(MAX_REASON_LEN).collect()
                }
            });
        warn!(route, status = status.as_u16(), %reason, "customer service: request rejected");
        Err(ServiceError::Status {
            route: route.to_string(),
            status: status.as_u16(),
            reason,
        })
    }

    fn decode<T: DeserializeOwned>(route: &str, body: &str) -> Result<T, ServiceError> {
        serde_json::from_str(body).map_err(|e| ServiceError::Decode {
            route: route.to_string(),
            reason: e.to_string(),
        })
    }
}

#[async_trait]
impl CustomerService for HttpCustomerService {
    async fn list_customers(&self) -> Result<Vec<Customer>, ServiceError> {
        let route = routes::LIST_CUSTOMERS;
        let response = self.send(route, self.http.get(self.url(route))).await?;
        let response = Self::ensure_success(route, response).await?;
        let body = Self::body_text(route, response).await?;
        if body.trim().is_empty() {
            return Ok(Vec::new());
        }
        let customers: Option<Vec<Customer>> = Self::decode(route, &body)?;
        let customers = customers.unwrap_or_default();
        info!(count = customers.len(), "customer service: listed customers");
        Ok(customers)
    }

    async fn fetch_customer(&self, id: CustomerId) -> Result<Option<Customer>, ServiceError> {
        let route = routes::fetch_customer(id);
        let response = self.send(&route, self.http.get(self.url(&route))).await?;
        if response.status() == StatusCode::NOT_FOUND {
            info!(customer_id = id.0, "customer service: customer not found");
            return Ok(None);
        }
        let response = Self::ensure_success(&route, response).await?;
        let body = Self::body_text(&route, response).await?;
        if body.trim().is_empty() {
            info!(customer_id = id.0, "customer service: empty fetch response");
            return Ok(None);
        }
        let customer: Option<Customer> = Self::decode(&route, &body)?;
        Ok(customer.filter(Customer::is_persisted))
    }

    async fn create_customer(&self, payload: &Customer) -> Result<Option<Customer>, ServiceError> {
        let route = routes::CREATE_CUSTOMER;
        let response = self
            .send(route, self.http.post(self.url(route)).json(payload))
            .await?;
        let response = Self::ensure_success(route, response).await?;
        let body = Self::body_text(route, response).await?;
        let created = serde_json::from_str::<Customer>(&body)
            .ok()
            .filter(Customer::is_persisted);
        info!(
            customer_id = created.as_ref().and_then(|c| c.id).map(|id| id.0),
            "customer service: customer created"
        );
        Ok(created)
    }

    async fn update_customer(&self, payload: &Customer) -> Result<(), ServiceError> {
        let route = routes::UPDATE_CUSTOMER;
        let response = self
            .send(route, self.http.put(self.url(route)).json(payload))
            .await?;
        Self::ensure_success(route, response).await?;
        info!(
            customer_id = payload.id.map(|id| id.0),
            "customer service: customer updated"
        );
        Ok(())
    }

    async fn delete_customer(&self, id: CustomerId) -> Result<(), ServiceError> {
        let route = routes::DELETE_CUSTOMER;
        let response = self
            .send(
                route,
                self.http
                    .delete(self.url(route))
                    .json(&DeleteCustomerRequest { id }),
            )
            .await?;
        Self::ensure_success(route, response).await?;
        info!(customer_id = id.0, "customer service: customer deleted");
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
