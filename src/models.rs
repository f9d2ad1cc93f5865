use serde::{Deserialize, Serialize};

/// Signed-in user record as returned by the auth endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<AuthUser>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsPayload {
    pub to: String,
    pub from: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SendSmsBatchResponse {
    pub status: String,
    pub total_batches: u64,
    pub total_messages: u64,
}

/// Delivery state of a logged message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LogStatus {
    Delivered,
    Read,
    Pending,
    Failed,
}

impl LogStatus {
    pub const ALL: [LogStatus; 4] = [
        LogStatus::Delivered,
        LogStatus::Read,
        LogStatus::Pending,
        LogStatus::Failed,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            LogStatus::Delivered => "Delivered",
            LogStatus::Read => "Read",
            LogStatus::Pending => "Pending",
            LogStatus::Failed => "Failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(value))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SmsLogEntry {
    pub id: String,
    pub subaccount: String,
    pub date_sent_received: String,
    pub destination: String,
    pub source: String,
    pub cost: String,
    pub status: LogStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserStatus {
    Active,
    Inactive,
}

impl UserStatus {
    pub fn as_str(&self) -> &str {
        match self {
            UserStatus::Active => "active",
            UserStatus::Inactive => "inactive",
        }
    }
}

/// Account listed on the dashboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformUser {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub status: UserStatus,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeType {
    Increase,
    Decrease,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricChange {
    pub value: String,
    pub change_type: ChangeType,
}

impl MetricChange {
    /// Change value with the sign matching its direction
    pub fn display(&self) -> String {
        match self.change_type {
            ChangeType::Increase => format!("+{}", self.value),
            ChangeType::Decrease => format!("-{}", self.value),
            ChangeType::Neutral => self.value.clone(),
        }
    }
}

/// Summary figure shown at the top of the dashboard
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricCard {
    pub label: String,
    pub value: String,
    pub change: Option<MetricChange>,
}
