use serde::Deserialize;

use super::repo::Profile;
use crate::{
    error::AppError,
    fields::{keep_or_replace, required},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateProfileRequest {
    /// Defaults to the caller's own account when omitted.
    #[serde(alias = "userid")]
    pub user_id: Option<i64>,
    #[serde(alias = "fullname")]
    pub full_name: String,
    pub age: Option<i32>,
    pub gender: String,
    pub address: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateProfileRequest {
    #[serde(alias = "fullname")]
    pub full_name: Option<String>,
    pub age: Option<i32>,
    pub gender: Option<String>,
    pub address: Option<String>,
}

/// Profile fields that passed validation; the owner id is resolved later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileFields {
    pub full_name: String,
    pub age: i32,
    pub gender: String,
    pub address: String,
}

impl ProfileFields {
    pub fn owned_by(self, user_id: i64) -> Profile {
        Profile {
            user_id,
            full_name: self.full_name,
            age: self.age,
            gender: self.gender,
            address: self.address,
        }
    }
}

impl CreateProfileRequest {
    /// Collects every missing field. An age of zero counts as missing.
    pub fn validate(self) -> Result<(Option<i64>, ProfileFields), AppError> {
        let mut missing = Vec::new();
        let full_name = required(self.full_name, "full_name", &mut missing);
        let address = required(self.address, "address", &mut missing);
        let gender = required(self.gender, "gender", &mut missing);
        let age = self.age.filter(|a| *a != 0);
        if age.is_none() {
            missing.push("age");
        }
        match age {
            Some(age) if missing.is_empty() => Ok((
                self.user_id,
                ProfileFields {
                    full_name,
                    age,
                    gender,
                    address,
                },
            )),
            _ => Err(AppError::MissingFields(missing)),
        }
    }
}

impl UpdateProfileRequest {
    pub fn merge_into(self, existing: Profile) -> Profile {
        Profile {
            user_id: existing.user_id,
            full_name: keep_or_replace(self.full_name, existing.full_name),
            age: self.age.filter(|a| *a != 0).unwrap_or(existing.age),
            gender: keep_or_replace(self.gender, existing.gender),
            address: keep_or_replace(self.address, existing.address),
        }
    }
}
