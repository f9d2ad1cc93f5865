//! Static fixtures rendered by the dashboard and logs screens

use crate::models::{
    ChangeType, LogStatus, MetricCard, MetricChange, PlatformUser, SmsLogEntry, UserStatus,
};

pub fn metrics() -> Vec<MetricCard> {
    vec![
        MetricCard {
            label: "Total SMS".to_string(),
            value: "52,831".to_string(),
            change: Some(MetricChange {
                value: "No change".to_string(),
                change_type: ChangeType::Neutral,
            }),
        },
        MetricCard {
            label: "Delivery Rate".to_string(),
            value: "92.18%".to_string(),
            change: Some(MetricChange {
                value: "2.60%".to_string(),
                change_type: ChangeType::Increase,
            }),
        },
        MetricCard {
            label: "Total cost (P)".to_string(),
            value: "6,861.79".to_string(),
            change: Some(MetricChange {
                value: "71.34%".to_string(),
                change_type: ChangeType::Decrease,
            }),
        },
        MetricCard {
            label: "Destination countries".to_string(),
            value: "1".to_string(),
            change: None,
        },
    ]
}

pub fn users() -> Vec<PlatformUser> {
    let rows = [
        ("1", "John Doe", "john.doe@example.com", "Admin", UserStatus::Active, "2024-01-15"),
        ("2", "Jane Smith", "jane.smith@example.com", "User", UserStatus::Active, "2024-02-20"),
        ("3", "Bob Johnson", "bob.johnson@example.com", "Moderator", UserStatus::Inactive, "2024-01-10"),
        ("4", "Alice Williams", "alice.williams@example.com", "User", UserStatus::Active, "2024-03-05"),
        ("5", "Charlie Brown", "charlie.brown@example.com", "Admin", UserStatus::Active, "2024-02-14"),
        ("6", "Diana Prince", "diana.prince@example.com", "User", UserStatus::Inactive, "2024-01-28"),
        ("7", "Edward Norton", "edward.norton@example.com", "Moderator", UserStatus::Active, "2024-03-12"),
        ("8", "Fiona Apple", "fiona.apple@example.com", "User", UserStatus::Active, "2024-02-08"),
    ];

    rows.into_iter()
        .map(|(id, name, email, role, status, created_at)| PlatformUser {
            id: id.to_string(),
            name: name.to_string(),
            email: email.to_string(),
            role: role.to_string(),
            status,
            created_at: created_at.to_string(),
        })
        .collect()
}

pub fn logs() -> Vec<SmsLogEntry> {
    const LATE: &str = "Dec 03, 2025 10:33 AM (UTC+08:00)";
    const EARLY: &str = "Dec 03, 2025 10:32 AM (UTC+08:00)";

    let rows = [
        ("1", LATE, "+639950472420", LogStatus::Delivered),
        ("2", LATE, "+639154804641", LogStatus::Read),
        ("3", EARLY, "+639876543210", LogStatus::Delivered),
        ("4", LATE, "+639123456789", LogStatus::Read),
        ("5", EARLY, "+639987654321", LogStatus::Delivered),
        ("6", LATE, "+639112233445", LogStatus::Read),
        ("7", EARLY, "+639556677889", LogStatus::Delivered),
        ("8", LATE, "+639223344556", LogStatus::Read),
        ("9", EARLY, "+639334455667", LogStatus::Delivered),
    ];

    rows.into_iter()
        .map(|(id, date, destination, status)| SmsLogEntry {
            id: id.to_string(),
            subaccount: "XN_OTP".to_string(),
            date_sent_received: date.to_string(),
            destination: destination.to_string(),
            source: "MegaPerya".to_string(),
            cost: "PHP 0.13".to_string(),
            status,
        })
        .collect()
}

/// Filter log entries by free text (destination, source, subaccount) and status
pub fn filter_logs(
    entries: &[SmsLogEntry],
    query: &str,
    status: Option<LogStatus>,
) -> Vec<SmsLogEntry> {
    let needle = query.trim().to_lowercase();
    entries
        .iter()
        .filter(|entry| status.map_or(true, |s| entry.status == s))
        .filter(|entry| {
            needle.is_empty()
                || entry.destination.to_lowercase().contains(&needle)
                || entry.source.to_lowercase().contains(&needle)
                || entry.subaccount.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}
