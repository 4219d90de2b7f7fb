use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::accounts::clients::{AccountProvisioner, ProvisionRequest};
use crate::features::accounts::dtos::{AccountResponseDto, CreateEmployeeDto, CreateRequesterDto};
use crate::features::auth::model::{AuthenticatedUser, Role};

/// Service for creating employee and requester accounts
pub struct AccountService {
    provisioner: Arc<dyn AccountProvisioner>,
}

impl AccountService {
    pub fn new(provisioner: Arc<dyn AccountProvisioner>) -> Self {
        Self { provisioner }
    }

    async fn provision(&self, request: ProvisionRequest) -> Result<AccountResponseDto> {
        let account = self.provisioner.provision(&request).await?;

        tracing::info!(
            "Provisioned {} account {} ({})",
            request.role,
            account.user_id,
            request.email
        );

        Ok(AccountResponseDto {
            user_id: account.user_id,
            email: request.email,
            role: request.role,
            verification_sent: account.verification_sent,
        })
    }

    /// Create a maintenance or systems employee
    pub async fn create_employee(
        &self,
        session: &AuthenticatedUser,
        dto: CreateEmployeeDto,
    ) -> Result<AccountResponseDto> {
        session.require_role(Role::Authority)?;
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.provision(ProvisionRequest {
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
            role: Role::Employee,
            name: dto.name.trim().to_string(),
            last_name: Some(dto.last_name.trim().to_string()),
            phone: dto.phone,
            department: Some(dto.department),
            title: Some(dto.title.trim().to_string()),
        })
        .await
    }

    /// Create a requester who can file reports
    pub async fn create_requester(
        &self,
        session: &AuthenticatedUser,
        dto: CreateRequesterDto,
    ) -> Result<AccountResponseDto> {
        session.require_role(Role::Authority)?;
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.provision(ProvisionRequest {
            email: dto.email.trim().to_lowercase(),
            password: dto.password,
            role: Role::Requester,
            name: dto.name.trim().to_string(),
            last_name: None,
            phone: None,
            department: None,
            title: None,
        })
        .await
    }
}
