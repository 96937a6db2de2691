use sea_orm::entity::prelude::*;

/// One payout attempt for a (recipient, order) pair.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "payout_records")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub external_payout_id: Option<String>,
    #[sea_orm(unique)]
    pub reference_id: String,
    pub recipient_type: String,
    pub recipient_id: Uuid,
    pub order_id: Uuid,
    pub amount: i64,
    pub status: String,
    pub method: String,
    pub order_data: Json,
    pub bank_details: Json,
    pub gateway_response: Option<Json>,
    pub failure_reason: Option<String>,
    pub processed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub failed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::order_distributions::Entity",
        from = "Column::OrderId",
        to = "super::order_distributions::Column::OrderId"
    )]
    OrderDistribution,
}

impl Related<super::order_distributions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::OrderDistribution.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
