use sea_orm::entity::prelude::*;

/// Earnings ledger of a restaurant, delivery rider or platform admin.
///
/// Bank fields hold whatever the account-management layer stored (ciphertext when
/// encryption at rest is enabled there).
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "recipient_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipient_type: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub recipient_id: Uuid,
    pub balance: i64,
    pub total_earnings: i64,
    pub pending_amount: i64,
    pub bank_account_number: Option<String>,
    pub bank_ifsc_code: Option<String>,
    pub bank_account_holder_name: Option<String>,
    pub bank_name: Option<String>,
    pub bank_is_verified: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
