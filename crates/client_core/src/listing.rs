//! Browse view: the full customer collection, one page at a time.

use shared::domain::Customer;
use tracing::{info, warn};

use crate::{
    error::WorkflowError,
    service::{CustomerService, Operation},
};

pub const DEFAULT_PAGE_SIZE: usize = 1;

#[derive(Debug, Clone)]
pub struct CustomerList {
    customers: Vec<Customer>,
    page: usize,
    page_size: usize,
}

impl Default for CustomerList {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl CustomerList {
    /// A page size of 0 is treated as 1.
    pub fn new(page_size: usize) -> Self {
        Self {
            customers: Vec::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_customers(customers: Vec<Customer>, page_size: usize) -> Self {
        let mut list = Self::new(page_size);
        list.replace(customers);
        list
    }

    /// Re-fetches the whole collection and rewinds to page 1. On failure the
    /// list is left empty.
    pub async fn refresh(&mut self, service: &dyn CustomerService) -> Result<usize, WorkflowError> {
        match service.list_customers().await {
            Ok(customers) => {
                self.replace(customers);
                info!(count = self.customers.len(), "listing: refreshed");
                Ok(self.customers.len())
            }
            Err(source) => {
                warn!(error = %source, "listing: refresh failed");
                self.replace(Vec::new());
                Err(WorkflowError::Remote {
                    operation: Operation::ListCustomers,
                    source,
                })
            }
        }
    }

    fn replace(&mut self, customers: Vec<Customer>) {
        self.customers = customers;
        self.page = 1;
    }

    pub fn len(&self) -> usize {
        self.customers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.customers.is_empty()
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    /// 0 for an empty collection.
    pub fn total_pages(&self) -> usize {
        self.customers.len().div_ceil(self.page_size)
    }

    fn last_page(&self) -> usize {
        self.total_pages().max(1)
    }

    pub fn next(&mut self) -> usize {
        self.page = (self.page + 1).min(self.last_page());
        self.page
    }

    pub fn previous(&mut self) -> usize {
        self.page = self.page.saturating_sub(1).max(1);
        self.page
    }

    /// Jumps to `page`, clamped into the valid range.
    pub fn go_to(&mut self, page: usize) -> usize {
        self.page = page.clamp(1, self.last_page());
        self.page
    }

    pub fn page_items(&self) -> &[Customer] {
        let start = (self.page - 1) * self.page_size;
        let end = (start + self.page_size).min(self.customers.len());
        self.customers.get(start..end).unwrap_or_default()
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }
}

#[cfg(test)]
#[path = "tests/listing_tests.rs"]
mod tests;
