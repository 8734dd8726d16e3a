//! Decoding for saved NEIS `mealServiceDietInfo` responses.
//!
//! Fetching is left to whoever saved the response; this module only turns the
//! JSON envelope into [`MealRecord`]s.

use crate::domain::model::MealRecord;
use crate::utils::error::{EtlError, Result};
use serde_json::Value;

pub const SERVICE_NAME: &str = "mealServiceDietInfo";

const CODE_OK: &str = "INFO-000";
const CODE_NO_DATA: &str = "INFO-200";

pub fn parse_response(body: &str) -> Result<Vec<MealRecord>> {
    let value: Value = serde_json::from_str(body)?;

    match &value {
        Value::Array(rows) => Ok(decode_rows(rows)),
        Value::Object(obj) => {
            // 查無資料時服務只回傳 RESULT
            if let Some(result) = obj.get("RESULT") {
                return check_result(result).map(|_| Vec::new());
            }

            let Some(Value::Array(sections)) = obj.get(SERVICE_NAME) else {
                return Err(EtlError::InvalidResponse {
                    message: format!("missing '{}' section", SERVICE_NAME),
                });
            };

            let mut records = Vec::new();
            for section in sections {
                if let Some(Value::Array(head)) = section.get("head") {
                    for entry in head {
                        if let Some(result) = entry.get("RESULT") {
                            check_result(result)?;
                        }
                    }
                }
                if let Some(Value::Array(rows)) = section.get("row") {
                    records.extend(decode_rows(rows));
                }
            }
            Ok(records)
        }
        _ => Err(EtlError::InvalidResponse {
            message: "expected a JSON object or array".to_string(),
        }),
    }
}

/// Rows that do not decode are skipped, not fatal.
fn decode_rows(rows: &[Value]) -> Vec<MealRecord> {
    rows.iter()
        .filter_map(|row| match serde_json::from_value::<MealRecord>(row.clone()) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("⚠️ Skipping undecodable meal row: {}", e);
                None
            }
        })
        .collect()
}

/// `Ok(true)` when data follows, `Ok(false)` for the "no data" code.
fn check_result(result: &Value) -> Result<bool> {
    let code = result.get("CODE").and_then(Value::as_str).unwrap_or_default();
    match code {
        CODE_OK => Ok(true),
        CODE_NO_DATA => {
            tracing::info!("Meal service reported no data for the requested range");
            Ok(false)
        }
        other => {
            let message = result
                .get("MESSAGE")
                .and_then(Value::as_str)
                .unwrap_or("unknown error");
            Err(EtlError::InvalidResponse {
                message: format!("{} ({})", message, other),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_envelope() {
        let body = r#"{
            "mealServiceDietInfo": [
                {"head": [
                    {"list_total_count": 2},
                    {"RESULT": {"CODE": "INFO-000", "MESSAGE": "정상 처리되었습니다."}}
                ]},
                {"row": [
                    {"ATPT_OFCDC_SC_CODE": "B10", "SD_SCHUL_CODE": "7010536",
                     "MMEAL_SC_NM": "중식", "MLSV_YMD": "20250120",
                     "DDISH_NM": "보리밥<br/>스팸짜글이(1.2.5.6.10.13.15.16)"},
                    {"MMEAL_SC_NM": "중식", "MLSV_YMD": "20250121",
                     "DDISH_NM": "흰밥<br/>소불고기(5.6.13.16)"}
                ]}
            ]
        }"#;

        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date.as_deref(), Some("20250120"));
        assert_eq!(records[0].meal_name.as_deref(), Some("중식"));
        assert!(records[1].menu.as_deref().unwrap().contains("소불고기"));
    }

    #[test]
    fn test_no_data_is_empty() {
        let body = r#"{"RESULT": {"CODE": "INFO-200", "MESSAGE": "해당하는 데이터가 없습니다."}}"#;
        assert!(parse_response(body).unwrap().is_empty());
    }

    #[test]
    fn test_error_code_is_invalid_response() {
        let body = r#"{"RESULT": {"CODE": "ERROR-290", "MESSAGE": "인증키가 유효하지 않습니다."}}"#;
        assert!(matches!(
            parse_response(body),
            Err(EtlError::InvalidResponse { .. })
        ));
    }

    #[test]
    fn test_bare_row_array_and_bad_rows() {
        let body = r#"[
            {"MLSV_YMD": "20250120", "DDISH_NM": "흰밥"},
            {"MLSV_YMD": 20250121, "DDISH_NM": "잡곡밥"},
            {"MLSV_YMD": ["20250122"], "DDISH_NM": "카레라이스"},
            {"DDISH_NM": "떡국"}
        ]"#;
        let records = parse_response(body).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[1].date.as_deref(), Some("20250121"));
        assert_eq!(records[2].date, None);
    }

    #[test]
    fn test_unrecognized_shapes() {
        assert!(matches!(
            parse_response(r#"{"schoolInfo": []}"#),
            Err(EtlError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_response("\"text\""),
            Err(EtlError::InvalidResponse { .. })
        ));
        assert!(matches!(
            parse_response("not json"),
            Err(EtlError::SerializationError(_))
        ));
    }
}
