//! Service-type catalog management.

use dryklin_core::{NewServiceType, Page, ServiceType, ServiceTypeId, ServiceTypeUpdate};
use rust_decimal::Decimal;
use tracing::{info, instrument};

use super::{parse_id, require};
use crate::http::{ApiClient, ApiError};

/// Service-type endpoints.
#[derive(Debug, Clone)]
pub struct ServiceTypesApi {
    client: ApiClient,
}

impl ServiceTypesApi {
    #[must_use]
    pub const fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the request fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<ServiceType>, ApiError> {
        let page: Page<ServiceType> = self.client.get("/service-types").await?;
        Ok(page.items)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn get(&self, service_type_id: &str) -> Result<ServiceType, ApiError> {
        let id = parse_id(service_type_id, ServiceTypeId::parse)?;
        self.client.get(&format!("/service-types/{id}")).await
    }

    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a blank name or negative price,
    /// or the request error.
    #[instrument(skip(self))]
    pub async fn create(&self, service_type: &NewServiceType) -> Result<ServiceType, ApiError> {
        require("name", &service_type.name)?;
        check_price(service_type.base_price)?;
        let created: ServiceType = self.client.post("/service-types", service_type).await?;
        info!(service_type_id = %created.id, name = %created.name, "service type created");
        Ok(created)
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidInput` for a blank ID, an empty update or a
    /// negative price, or the request error.
    #[instrument(skip(self))]
    pub async fn update(
        &self,
        service_type_id: &str,
        update: &ServiceTypeUpdate,
    ) -> Result<ServiceType, ApiError> {
        let id = parse_id(service_type_id, ServiceTypeId::parse)?;
        if update.is_empty() {
            return Err(ApiError::InvalidInput("update changes nothing".to_string()));
        }
        if let Some(name) = &update.name {
            require("name", name)?;
        }
        if let Some(price) = update.base_price {
            check_price(price)?;
        }
        let updated: ServiceType = self
            .client
            .put(&format!("/service-types/{id}"), update)
            .await?;
        info!(service_type_id = %id, "service type updated");
        Ok(updated)
    }

    /// # Errors
    ///
    /// Returns `ApiError` if the ID is blank or the request fails.
    #[instrument(skip(self))]
    pub async fn delete(&self, service_type_id: &str) -> Result<(), ApiError> {
        let id = parse_id(service_type_id, ServiceTypeId::parse)?;
        self.client.delete(&format!("/service-types/{id}")).await?;
        info!(service_type_id = %id, "service type deleted");
        Ok(())
    }
}

fn check_price(price: Decimal) -> Result<(), ApiError> {
    if price.is_sign_negative() {
        return Err(ApiError::InvalidInput(
            "base price cannot be negative".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_price() {
        assert!(check_price(Decimal::new(150_000, 2)).is_ok());
        assert!(check_price(Decimal::ZERO).is_ok());
        assert!(check_price(Decimal::new(-1, 0)).is_err());
    }
}
