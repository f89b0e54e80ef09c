//! DTOs for the identity toolkit `accounts:lookup` call.

use serde::{Deserialize, Serialize};

use crate::domain::Email;
use crate::domain::ports::VerifiedIdentity;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupRequestDto<'a> {
    pub(super) id_token: &'a str,
}

#[derive(Debug, Deserialize)]
pub(super) struct LookupResponseDto {
    #[serde(default)]
    pub(super) users: Vec<LookupUserDto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct LookupUserDto {
    pub(super) local_id: String,
    pub(super) email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProviderErrorEnvelopeDto {
    pub(super) error: ProviderErrorDto,
}

#[derive(Debug, Deserialize)]
pub(super) struct ProviderErrorDto {
    pub(super) message: Option<String>,
}

impl LookupResponseDto {
    /// `None` when the token resolved to no account.
    pub(super) fn into_identity(self) -> Result<Option<VerifiedIdentity>, String> {
        let Some(user) = self.users.into_iter().next() else {
            return Ok(None);
        };
        let email = user
            .email
            .map(Email::new)
            .transpose()
            .map_err(|err| format!("account {} has an invalid email: {err}", user.local_id))?;
        Ok(Some(VerifiedIdentity {
            subject: user.local_id,
            email,
        }))
    }
}
