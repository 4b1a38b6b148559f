use serde::{Deserialize, Serialize};

use crate::domain::CustomerId;

pub mod routes {
    use crate::domain::CustomerId;

    pub const LIST_CUSTOMERS: &str = "/cliente/clientes";
    pub const CREATE_CUSTOMER: &str = "/cliente/cadastrar";
    pub const UPDATE_CUSTOMER: &str = "/cliente/atualizar";
    pub const DELETE_CUSTOMER: &str = "/cliente/excluir";

    pub fn fetch_customer(id: CustomerId) -> String {
        format!("/cliente/{}", id.0)
    }
}

/// Body of the delete call; the remote expects the id wrapped in an object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeleteCustomerRequest {
    pub id: CustomerId,
}
