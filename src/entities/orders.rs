use crate::error::{AppError, AppResult};
use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(
    Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, ToSchema, DeriveActiveEnum, EnumIter,
)]
#[sea_orm(rs_type = "String", db_type = "Text")]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "confirmed")]
    Confirmed,
    #[sea_orm(string_value = "verified")]
    Verified,
    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Verified => "verified",
            OrderStatus::Cancelled => "cancelled",
        };
        write!(f, "{}", s)
    }
}

impl OrderStatus {
    /// 订单状态流转表
    ///
    /// - pending   -> confirmed / cancelled
    /// - confirmed -> confirmed（重新发送电子票）/ verified / cancelled
    /// - verified、cancelled 为终态
    pub fn can_transition_to(self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed)
                | (Pending, Cancelled)
                | (Confirmed, Confirmed)
                | (Confirmed, Verified)
                | (Confirmed, Cancelled)
        )
    }

    pub fn transition(self, next: OrderStatus) -> AppResult<OrderStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::InvalidTransition {
                from: self,
                to: next,
            })
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Verified | OrderStatus::Cancelled)
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "orders")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(unique)]
    pub order_id: String,
    pub full_name: String,
    pub phone: String,
    pub email: String,
    pub dob: String,
    pub address: String,
    pub requirements: Option<String>,
    pub event_participation: String,
    /// JSON 数组字符串
    pub activities: String,
    pub activity_description: Option<String>,
    pub ticket_type: String,
    pub quantity: i32,
    pub price_per_ticket: f64,
    pub total_amount: f64,
    pub payment_method: String,
    pub payment_ss_filename: Option<String>,
    pub transaction_id: Option<String>,
    pub status: OrderStatus,
    #[sea_orm(unique)]
    pub qr_token: Option<String>,
    pub qr_code_filename: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::Iterable;

    #[test]
    fn test_lifecycle_transitions() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Verified));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Confirmed));

        assert!(!Pending.can_transition_to(Verified));
        assert!(!Pending.can_transition_to(Pending));
        assert!(!Confirmed.can_transition_to(Pending));
    }

    #[test]
    fn test_terminal_states_reject_everything() {
        for from in [OrderStatus::Verified, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::iter() {
                assert!(!from.can_transition_to(to), "{from} -> {to}");
                assert!(matches!(
                    from.transition(to),
                    Err(AppError::InvalidTransition { .. })
                ));
            }
        }
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Cancelled).unwrap(),
            "\"cancelled\""
        );
        let parsed: OrderStatus = serde_json::from_str("\"verified\"").unwrap();
        assert_eq!(parsed, OrderStatus::Verified);
        assert_eq!(OrderStatus::Confirmed.to_string(), "confirmed");
    }
}
