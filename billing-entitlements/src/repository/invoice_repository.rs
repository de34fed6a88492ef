// src/repository/invoice_repository.rs

use crate::domain::invoice_model::{self, ActiveModel as InvoiceActiveModel, Entity as InvoiceEntity};
use chrono::{DateTime, Utc};
use sea_orm::entity::*;
use sea_orm::{DbConn, DbErr, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    db: DbConn,
}

impl InvoiceRepository {
    pub fn new(db: DbConn) -> Self {
        Self { db }
    }

    /// アカウントの請求書一覧（新しい順）
    pub async fn find_by_account_id(
        &self,
        account_id: Uuid,
    ) -> Result<Vec<invoice_model::Model>, DbErr> {
        InvoiceEntity::find()
            .filter(invoice_model::Column::AccountId.eq(account_id))
            .order_by_desc(invoice_model::Column::CreatedAt)
            .order_by_desc(invoice_model::Column::Id)
            .all(&self.db)
            .await
    }

    pub async fn create(&self, create_invoice: CreateInvoice) -> Result<invoice_model::Model, DbErr> {
        let new_invoice = InvoiceActiveModel {
            id: Set(Uuid::new_v4()),
            account_id: Set(create_invoice.account_id),
            fastspring_id: Set(create_invoice.fastspring_id),
            subscription_display: Set(create_invoice.subscription_display),
            total: Set(create_invoice.total),
            currency: Set(create_invoice.currency),
            status: Set(create_invoice.status),
            url: Set(create_invoice.url),
            created_at: Set(create_invoice.created_at.unwrap_or_else(Utc::now)),
        };

        new_invoice.insert(&self.db).await
    }
}

#[derive(Debug)]
pub struct CreateInvoice {
    pub account_id: Uuid,
    pub fastspring_id: String,
    pub subscription_display: Option<String>,
    pub total: i64,
    pub currency: String,
    pub status: String,
    pub url: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}
