use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A bank whose notification emails the ingestion pipeline understands
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct PaymentProvider {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub logo: String,
}

/// Link between a user and one of their connected banks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
pub struct UserProvider {
    pub user_id: String,
    pub provider_id: String,
    pub is_active: bool,
}

/// Replaces the user's connected bank set in one write
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct UpdateUserProvidersRequest {
    pub provider_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
pub struct ProvidersResponse {
    pub providers: Vec<PaymentProvider>,
    pub total: usize,
}
