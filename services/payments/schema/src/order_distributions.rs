use sea_orm::entity::prelude::*;

/// Distribution state of one paid order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "order_distributions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub order_id: Uuid,
    pub restaurant_id: Uuid,
    pub delivery_rider_id: Option<Uuid>,
    pub total_amount: i64,
    pub restaurant_amount: i64,
    pub delivery_amount: i64,
    pub platform_amount: i64,
    /// Net amount currently credited to the platform account for this order.
    pub platform_credited: i64,
    pub status: String,
    pub order_data: Json,
    /// Claim lease; a call may work on the order only while it holds an unexpired claim.
    pub claimed_until: Option<chrono::DateTime<chrono::Utc>>,
    /// Identifies the call holding the claim; writes made under the claim must match it.
    pub claim_token: Option<Uuid>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::payout_records::Entity")]
    PayoutRecords,
}

impl Related<super::payout_records::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PayoutRecords.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
