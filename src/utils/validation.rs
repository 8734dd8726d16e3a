use crate::utils::error::{EtlError, Result};
use chrono::NaiveDate;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(EtlError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: format!("Supported values: {}", allowed.join(", ")),
    })
}

pub fn validate_formats(field_name: &str, formats: &[String], allowed: &[&str]) -> Result<()> {
    if formats.is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: String::new(),
            reason: "At least one output format is required".to_string(),
        });
    }
    for format in formats {
        validate_one_of(field_name, format, allowed)?;
    }
    Ok(())
}

/// `YYYY-MM-DD` 格式的日期
pub fn validate_iso_date(field_name: &str, value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|e| {
        EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Expected YYYY-MM-DD: {}", e),
        }
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(EtlError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| EtlError::MissingConfigError {
        field: field_name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("input", "menu.txt").is_ok());
        assert!(validate_path("input", "").is_err());
        assert!(validate_path("input", "bad\0path").is_err());
    }

    #[test]
    fn test_validate_formats() {
        let formats = vec!["json".to_string(), "csv".to_string()];
        assert!(validate_formats("formats", &formats, &["json", "csv"]).is_ok());

        let invalid = vec!["xlsx".to_string()];
        assert!(validate_formats("formats", &invalid, &["json", "csv"]).is_err());
        assert!(validate_formats("formats", &[], &["json", "csv"]).is_err());
    }

    #[test]
    fn test_validate_iso_date() {
        let date = validate_iso_date("today", "2026-01-05").unwrap();
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
        assert!(validate_iso_date("today", "2026-13-01").is_err());
        assert!(validate_iso_date("today", "20260105").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("menu.txt".to_string());
        assert_eq!(validate_required_field("input", &present).unwrap(), "menu.txt");

        let missing: Option<String> = None;
        assert!(matches!(
            validate_required_field("input", &missing),
            Err(EtlError::MissingConfigError { .. })
        ));
    }
}
