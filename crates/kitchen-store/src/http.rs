//! HTTP 實作
//!
//! 不設定逾時，沿用 reqwest 的預設值。

use async_trait::async_trait;
use chrono::NaiveDate;
use kitchen_core::{
    AvailabilityRecord, ClientConfig, CommitReceipt, CommitRequest, Order, OrderId, Product,
    ProductionPlan, ProductionStatus, ShippingStatus, StatusEntry,
};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::wire::{
    self, AvailabilityEnvelope, ConfirmScheduleBody, DateCount, DeleteAllResponse, OrdersEnvelope,
    PlanEnvelope, StatusBody, StatusEnvelope,
};
use crate::{ProductionStore, Result, StoreError};

/// 後端 API 用戶端
#[derive(Clone)]
pub struct HttpStore {
    client: Client,
    config: ClientConfig,
}

impl std::fmt::Debug for HttpStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpStore")
            .field("base_url", &self.config.base_url)
            .field("profile", &self.config.profile)
            .finish_non_exhaustive()
    }
}

impl HttpStore {
    /// 創建新的用戶端
    pub fn new(config: ClientConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    /// 使用既有的 reqwest 用戶端
    pub fn with_client(config: ClientConfig, client: Client) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 組合網址；每個路徑片段都會被編碼
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = Url::parse(&self.config.base_url)
            .map_err(|e| StoreError::InvalidUrl(format!("{}: {e}", self.config.base_url)))?;
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidUrl(self.config.base_url.clone()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// 送出請求；非 2xx 轉為 [`StoreError::Api`]
    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let error = match wire::server_message(&body) {
            Some(message) => StoreError::Api {
                status: status.as_u16(),
                message,
            },
            None if status == reqwest::StatusCode::NOT_FOUND => {
                StoreError::NotFound("請求的資源不存在".to_string())
            }
            None => StoreError::generic(status.as_u16()),
        };
        tracing::debug!(status = status.as_u16(), error = %error, "API 回傳錯誤");
        Err(error)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        Ok(self.send(request).await?.json::<T>().await?)
    }
}

#[async_trait]
impl ProductionStore for HttpStore {
    #[instrument(skip(self))]
    async fn dates_with_orders(&self) -> Result<Vec<DateCount>> {
        let url = self.url(&["dates-with-orders"])?;
        self.get_json(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn unscheduled_orders(&self, date: NaiveDate) -> Result<Vec<Order>> {
        let url = self.url(&["unscheduled-orders"])?;
        let envelope: OrdersEnvelope = self
            .get_json(self.client.get(url).query(&[("date", date.to_string())]))
            .await?;
        Ok(wire::decode_orders(envelope.orders, date))
    }

    #[instrument(skip(self))]
    async fn order(&self, id: OrderId) -> Result<Order> {
        let url = self.url(&["order", &id.to_string()])?;
        self.get_json(self.client.get(url)).await
    }

    #[instrument(skip(self))]
    async fn availability(&self, as_of: Option<NaiveDate>) -> Result<Vec<AvailabilityRecord>> {
        let url = self.url(&["availability"])?;
        let mut request = self.client.get(url);
        if let Some(as_of) = as_of {
            request = request.query(&[("as_of", as_of.to_string())]);
        }
        let envelope: AvailabilityEnvelope = self.get_json(request).await?;
        Ok(envelope.availability.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn production_plan(&self, date: NaiveDate) -> Result<ProductionPlan> {
        let url = self.url(&["production-plan"])?;
        let envelope: PlanEnvelope = self
            .get_json(self.client.get(url).query(&[("date", date.to_string())]))
            .await?;
        Ok(ProductionPlan::empty(date)
            .with_delivery_date(envelope.delivery_date)
            .with_entries(envelope.production_plan))
    }

    #[instrument(skip(self))]
    async fn production_statuses(&self, date: NaiveDate) -> Result<Vec<StatusEntry>> {
        let url = self.url(&["production-status"])?;
        let envelope: StatusEnvelope = self
            .get_json(self.client.get(url).query(&[("date", date.to_string())]))
            .await?;
        Ok(envelope.statuses)
    }

    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>> {
        let url = self.url(&["products"])?;
        self.get_json(self.client.get(url)).await
    }

    #[instrument(skip(self, request), fields(date = %request.manufacturing_date()))]
    async fn confirm_schedule(&self, request: &CommitRequest) -> Result<CommitReceipt> {
        let url = self.url(&["confirm-schedule"])?;
        let body = ConfirmScheduleBody {
            production_date: request.manufacturing_date(),
            delivery_date: request.delivery_date(),
            order_ids: request.order_ids(),
            manufacturing_quantities: request.quantities(),
        };
        self.get_json(self.client.post(url).json(&body)).await
    }

    #[instrument(skip(self))]
    async fn delete_production_plan(&self, date: NaiveDate) -> Result<()> {
        let url = self.url(&["production-plan", &date.to_string()])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete_all_production_plans(&self) -> Result<u64> {
        let url = self.url(&["production-plan", "all"])?;
        let response: DeleteAllResponse = self.get_json(self.client.delete(url)).await?;
        Ok(response.deleted_count)
    }

    #[instrument(skip(self))]
    async fn set_shipping_status(&self, id: OrderId, status: ShippingStatus) -> Result<()> {
        let url = self.url(&["order", &id.to_string(), "shipping-status"])?;
        let body = StatusBody {
            status: status.as_str(),
        };
        self.send(self.client.put(url).json(&body)).await?;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn set_production_status(
        &self,
        date: NaiveDate,
        product_name: &str,
        status: ProductionStatus,
    ) -> Result<()> {
        let url = self.url(&["production-status", &date.to_string(), product_name])?;
        self.send(self.client.put(url).json(&StatusBody::production(status)))
            .await?;
        Ok(())
    }
}
