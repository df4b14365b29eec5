//! CRM clients

use serde::{Deserialize, Serialize};

use super::{new_id, normalize_key};

/// Sales pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    #[default]
    Lead,
    Negotiation,
    Active,
    Churned,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Lead => "lead",
            ClientStatus::Negotiation => "negotiation",
            ClientStatus::Active => "active",
            ClientStatus::Churned => "churned",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match normalize_key(s).as_str() {
            "lead" => Some(ClientStatus::Lead),
            "negotiation" => Some(ClientStatus::Negotiation),
            "active" => Some(ClientStatus::Active),
            "churned" => Some(ClientStatus::Churned),
            _ => None,
        }
    }

    /// Probability weight applied to deal value in revenue forecasts
    pub fn forecast_weight(&self) -> f64 {
        match self {
            ClientStatus::Lead => 0.1,
            ClientStatus::Negotiation => 0.5,
            ClientStatus::Active => 1.0,
            ClientStatus::Churned => 0.0,
        }
    }
}

impl std::fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    pub id: String,
    /// Contact person
    pub name: String,
    pub company: String,
    pub status: ClientStatus,
    /// Deal value in whole currency units
    pub deal_value: u64,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct NewClient {
    pub name: String,
    pub company: String,
    pub status: ClientStatus,
    pub deal_value: u64,
    pub email: Option<String>,
}

impl NewClient {
    pub fn new(name: impl Into<String>, company: impl Into<String>, deal_value: u64) -> Self {
        Self {
            name: name.into(),
            company: company.into(),
            deal_value,
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ClientStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    pub(crate) fn into_client(self) -> Client {
        Client {
            id: new_id(),
            name: self.name,
            company: self.company,
            status: self.status,
            deal_value: self.deal_value,
            email: self.email,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientPatch {
    pub name: Option<String>,
    pub company: Option<String>,
    pub status: Option<ClientStatus>,
    pub deal_value: Option<u64>,
    pub email: Option<Option<String>>,
}

impl ClientPatch {
    pub fn status(status: ClientStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub(crate) fn merge_into(self, client: &mut Client) {
        if let Some(name) = self.name {
            client.name = name;
        }
        if let Some(company) = self.company {
            client.company = company;
        }
        if let Some(status) = self.status {
            client.status = status;
        }
        if let Some(value) = self.deal_value {
            client.deal_value = value;
        }
        if let Some(email) = self.email {
            client.email = email;
        }
    }
}
