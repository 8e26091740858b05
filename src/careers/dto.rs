use serde::Deserialize;
use time::Date;

use super::{
    dates,
    repo::{Career, NewCareer},
};
use crate::{
    error::AppError,
    fields::{keep_or_replace, required},
};

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CreateCareerRequest {
    pub company: String,
    pub position: String,
    #[serde(alias = "jobtype")]
    pub job_type: String,
    pub description: String,
    #[serde(alias = "startdate", with = "dates::option")]
    pub start_date: Option<Date>,
    #[serde(alias = "enddate", with = "dates::option")]
    pub end_date: Option<Date>,
}

/// Partial update: absent or empty fields keep the stored value.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct UpdateCareerRequest {
    pub company: Option<String>,
    pub position: Option<String>,
    #[serde(alias = "jobtype")]
    pub job_type: Option<String>,
    pub description: Option<String>,
    #[serde(alias = "startdate", with = "dates::option")]
    pub start_date: Option<Date>,
    #[serde(alias = "enddate", with = "dates::option")]
    pub end_date: Option<Date>,
}

fn check_range(start: Date, end: Date) -> Result<(), AppError> {
    if start > end {
        return Err(AppError::bad_request_with(
            "Invalid date range",
            "Start date cannot be greater than end date",
        ));
    }
    Ok(())
}

impl CreateCareerRequest {
    /// Reports every missing field at once, then checks the date range.
    pub fn validate(self) -> Result<NewCareer, AppError> {
        let mut missing = Vec::new();
        let company = required(self.company, "company", &mut missing);
        let position = required(self.position, "position", &mut missing);
        let job_type = required(self.job_type, "job_type", &mut missing);
        let description = required(self.description, "description", &mut missing);
        if self.start_date.is_none() {
            missing.push("start_date");
        }
        if self.end_date.is_none() {
            missing.push("end_date");
        }

        match (self.start_date, self.end_date) {
            (Some(start_date), Some(end_date)) if missing.is_empty() => {
                check_range(start_date, end_date)?;
                Ok(NewCareer {
                    company,
                    position,
                    job_type,
                    description,
                    start_date,
                    end_date,
                })
            }
            _ => Err(AppError::MissingFields(missing)),
        }
    }
}

impl UpdateCareerRequest {
    pub fn merge_into(self, existing: Career) -> Result<Career, AppError> {
        let merged = Career {
            job_id: existing.job_id,
            company: keep_or_replace(self.company, existing.company),
            position: keep_or_replace(self.position, existing.position),
            job_type: keep_or_replace(self.job_type, existing.job_type),
            description: keep_or_replace(self.description, existing.description),
            start_date: self.start_date.unwrap_or(existing.start_date),
            end_date: self.end_date.unwrap_or(existing.end_date),
        };
        check_range(merged.start_date, merged.end_date)?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    fn full() -> CreateCareerRequest {
        serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "position": "Engineer",
            "job_type": "full-time",
            "description": "Build things",
            "start_date": "2024-01-01",
            "end_date": "2024-06-30",
        }))
        .unwrap()
    }

    fn stored() -> Career {
        Career {
            job_id: 3,
            company: "Acme".into(),
            position: "Engineer".into(),
            job_type: "full-time".into(),
            description: "Build things".into(),
            start_date: date!(2024 - 01 - 01),
            end_date: date!(2024 - 06 - 30),
        }
    }

    #[test]
    fn valid_request_becomes_new_career() {
        let new = full().validate().unwrap();
        assert_eq!(new.company, "Acme");
        assert_eq!(new.start_date, date!(2024 - 01 - 01));
    }

    #[test]
    fn collects_all_missing_fields() {
        match CreateCareerRequest::default().validate().unwrap_err() {
            AppError::MissingFields(fields) => assert_eq!(
                fields,
                vec!["company", "position", "job_type", "description", "start_date", "end_date"]
            ),
            other => panic!("unexpected {other:?}"),
        }

        let mut req = full();
        req.position = "   ".into();
        req.end_date = None;
        match req.validate().unwrap_err() {
            AppError::MissingFields(fields) => assert_eq!(fields, vec!["position", "end_date"]),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn start_after_end_is_always_rejected() {
        let mut req = full();
        req.start_date = Some(date!(2025 - 01 - 02));
        req.end_date = Some(date!(2025 - 01 - 01));
        let err = req.validate().unwrap_err();
        assert_eq!(err.to_string(), "Invalid date range");

        let mut req = full();
        req.start_date = Some(date!(2025 - 01 - 01));
        req.end_date = Some(date!(2025 - 01 - 01));
        assert!(req.validate().is_ok());
    }

    #[test]
    fn accepts_legacy_field_names_and_empty_dates() {
        let req: CreateCareerRequest = serde_json::from_value(serde_json::json!({
            "company": "Acme",
            "jobtype": "contract",
            "startdate": "",
        }))
        .unwrap();
        assert_eq!(req.job_type, "contract");
        assert!(req.start_date.is_none());
    }

    #[test]
    fn update_keeps_stored_values_for_empty_fields() {
        let update: UpdateCareerRequest = serde_json::from_value(serde_json::json!({
            "company": "",
            "position": "Staff Engineer",
            "end_date": "2024-12-31",
        }))
        .unwrap();
        let merged = update.merge_into(stored()).unwrap();
        assert_eq!(merged.company, "Acme");
        assert_eq!(merged.position, "Staff Engineer");
        assert_eq!(merged.job_type, "full-time");
        assert_eq!(merged.end_date, date!(2024 - 12 - 31));
        assert_eq!(merged.job_id, 3);
    }

    #[test]
    fn update_cannot_invert_range() {
        let update = UpdateCareerRequest {
            start_date: Some(date!(2025 - 01 - 01)),
            ..Default::default()
        };
        assert!(update.merge_into(stored()).is_err());
    }
}
