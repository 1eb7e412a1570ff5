//! 한국은행 ECOS Open API 클라이언트.
//!
//! XML 응답의 `<row>` 요소마다 자식 태그 이름을 컬럼으로 사용합니다.
//! 오류 응답은 `<RESULT><CODE>..</CODE><MESSAGE>..</MESSAGE></RESULT>` 형태이며,
//! `INFO-200`(해당 데이터 없음)은 빈 결과로 처리합니다.

use std::collections::HashMap;

use scraper::{ElementRef, Html, Selector};
use snowball_core::{Cycle, SourcesConfig};
use tracing::{debug, info};

use super::{http_client, send_for_text, snippet};
use crate::error::{DataError, Result};

const PROVIDER: &str = "ecos";

/// 데이터 없음 응답 코드.
const NO_DATA_CODE: &str = "INFO-200";

type Row = HashMap<String, String>;

/// 통계표 목록의 한 항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcosTable {
    /// 통계표 코드
    pub code: String,
    /// 통계명 (앞쪽 분류 토큰 제거)
    pub name: String,
    /// 주기 코드
    pub cycle: String,
    /// 검색 가능 여부
    pub searchable: bool,
    /// 출처
    pub publisher: Option<String>,
}

/// 통계표 안의 세부항목.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcosItem {
    /// 항목명 (라벨)
    pub name: String,
    /// 항목 코드
    pub code: String,
    /// 주기 코드
    pub cycle: String,
    /// 수록 시작 시점
    pub start: String,
    /// 수록 종료 시점
    pub end: String,
    /// 자료 수
    pub count: u64,
}

/// ECOS 클라이언트.
#[derive(Debug, Clone)]
pub struct EcosClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl EcosClient {
    /// 설정으로 클라이언트를 생성합니다.
    pub fn new(config: &SourcesConfig) -> Result<Self> {
        Ok(Self {
            client: http_client(config)?,
            base_url: config.ecos_base_url.trim_end_matches('/').to_string(),
            api_key: config.resolved_ecos_key(),
        })
    }

    async fn rows(&self, path: &str) -> Result<Vec<Row>> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(path = path, "ECOS 요청");

        let text = send_for_text(PROVIDER, self.client.get(&url)).await?;
        parse_rows(&text)
    }

    /// 전체 통계표 목록을 조회합니다.
    pub async fn table_list(&self) -> Result<Vec<EcosTable>> {
        let path = format!("StatisticTableList/{}/xml/kr/1/10000/", self.api_key);
        let rows = self.rows(&path).await?;

        let tables = rows
            .iter()
            .map(|row| -> Result<EcosTable> {
                Ok(EcosTable {
                    code: column(row, "STAT_CODE")?.to_string(),
                    name: strip_descriptor(column(row, "STAT_NAME")?).to_string(),
                    cycle: optional(row, "CYCLE").unwrap_or_default().to_string(),
                    searchable: optional(row, "SRCH_YN") == Some("Y"),
                    publisher: optional(row, "ORG_NAME").map(str::to_string),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(count = tables.len(), "ECOS 통계표 목록 조회 완료");
        Ok(tables)
    }

    /// 통계표의 세부항목 목록을 조회합니다.
    pub async fn item_list(&self, table: &str) -> Result<Vec<EcosItem>> {
        let path = format!(
            "StatisticItemList/{}/xml/kr/1/10000/{}",
            self.api_key, table
        );
        let rows = self.rows(&path).await?;

        let items = rows
            .iter()
            .map(|row| -> Result<EcosItem> {
                let count = optional(row, "DATA_CNT").unwrap_or("0");
                Ok(EcosItem {
                    name: column(row, "ITEM_NAME")?.to_string(),
                    code: column(row, "ITEM_CODE")?.to_string(),
                    cycle: column(row, "CYCLE")?.to_string(),
                    start: optional(row, "START_TIME").unwrap_or_default().to_string(),
                    end: optional(row, "END_TIME").unwrap_or_default().to_string(),
                    count: count.parse().map_err(|_| {
                        DataError::SchemaMismatch(format!("DATA_CNT 파싱 실패: {}", count))
                    })?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        info!(table = table, count = items.len(), "ECOS 세부항목 조회 완료");
        Ok(items)
    }

    /// 항목의 (시점, 값) 목록을 조회합니다.
    pub async fn search(
        &self,
        table: &str,
        cycle: Cycle,
        start: &str,
        end: &str,
        item_code: &str,
    ) -> Result<Vec<(String, String)>> {
        let path = format!(
            "StatisticSearch/{}/xml/kr/1/100000/{}/{}/{}/{}/{}",
            self.api_key,
            table,
            cycle.code(),
            start,
            end,
            item_code
        );
        let rows = self.rows(&path).await?;

        let values = rows
            .iter()
            .map(|row| -> Result<(String, String)> {
                Ok((
                    column(row, "TIME")?.to_string(),
                    optional(row, "DATA_VALUE").unwrap_or_default().to_string(),
                ))
            })
            .collect::<Result<Vec<_>>>()?;

        info!(
            table = table,
            item = item_code,
            count = values.len(),
            "ECOS 통계 조회 완료"
        );
        Ok(values)
    }
}

/// 통계명 앞의 분류 토큰을 제거합니다 (첫 공백까지, 공백이 없으면 그대로).
pub(crate) fn strip_descriptor(name: &str) -> &str {
    match name.find(' ') {
        Some(idx) => &name[idx + 1..],
        None => name,
    }
}

fn column<'a>(row: &'a Row, key: &str) -> Result<&'a str> {
    row.get(key)
        .map(String::as_str)
        .ok_or_else(|| DataError::SchemaMismatch(format!("ECOS 응답에 {} 컬럼이 없습니다", key)))
}

fn optional<'a>(row: &'a Row, key: &str) -> Option<&'a str> {
    row.get(key).map(String::as_str).filter(|v| !v.is_empty())
}

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| DataError::SchemaMismatch(format!("selector {}: {:?}", css, e)))
}

/// ECOS XML 응답을 행 목록으로 변환합니다.
///
/// 태그 이름은 대문자로 정규화됩니다.
/// HTML 파서를 사용하므로 ECOS 태그 이름이 HTML 요소 이름과 겹치지 않는다는 전제에 의존합니다.
pub(crate) fn parse_rows(xml: &str) -> Result<Vec<Row>> {
    let document = Html::parse_document(xml);

    let result_sel = selector("result")?;
    if let Some(result) = document.select(&result_sel).next() {
        let mut code = String::new();
        let mut message = String::new();
        for child in result.children().filter_map(ElementRef::wrap) {
            let text = child.text().collect::<String>().trim().to_string();
            match child.value().name().to_ascii_uppercase().as_str() {
                "CODE" => code = text,
                "MESSAGE" => message = text,
                _ => {}
            }
        }
        if code == NO_DATA_CODE {
            debug!(code = %code, "ECOS 데이터 없음");
            return Ok(Vec::new());
        }
        return Err(DataError::unavailable(
            PROVIDER,
            format!("{}: {}", code, message),
        ));
    }

    let row_sel = selector("row")?;
    let rows: Vec<Row> = document
        .select(&row_sel)
        .map(|row| {
            row.children()
                .filter_map(ElementRef::wrap)
                .map(|cell| {
                    (
                        cell.value().name().to_ascii_uppercase(),
                        cell.text().collect::<String>().trim().to_string(),
                    )
                })
                .collect()
        })
        .collect();

    if rows.is_empty() && !xml.contains("list_total_count") {
        return Err(DataError::SchemaMismatch(format!(
            "ECOS 응답 형식이 아닙니다: {}",
            snippet(xml)
        )));
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ITEM_XML: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<StatisticItemList>
<list_total_count>2</list_total_count>
<row>
<STAT_CODE>817Y002</STAT_CODE>
<ITEM_NAME>국고채(3년)</ITEM_NAME>
<ITEM_CODE>010200000</ITEM_CODE>
<CYCLE>D</CYCLE>
<START_TIME>19950503</START_TIME>
<END_TIME>20240105</END_TIME>
<DATA_CNT>7000</DATA_CNT>
</row>
<row>
<STAT_CODE>817Y002</STAT_CODE>
<ITEM_NAME>국고채(10년)</ITEM_NAME>
<ITEM_CODE>010210000</ITEM_CODE>
<CYCLE>D</CYCLE>
<START_TIME>20000919</START_TIME>
<END_TIME>20240105</END_TIME>
<DATA_CNT>5900</DATA_CNT>
</row>
</StatisticItemList>"#;

    #[test]
    fn test_parse_rows() {
        let rows = parse_rows(ITEM_XML).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["ITEM_NAME"], "국고채(3년)");
        assert_eq!(rows[1]["DATA_CNT"], "5900");
        assert_eq!(rows[1]["CYCLE"], "D");
    }

    #[test]
    fn test_no_data_envelope_is_empty() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<RESULT><CODE>INFO-200</CODE><MESSAGE>해당하는 데이터가 없습니다.</MESSAGE></RESULT>"#;
        assert!(parse_rows(xml).unwrap().is_empty());
    }

    #[test]
    fn test_error_envelope_is_unavailable() {
        let xml = r#"<RESULT><CODE>INFO-100</CODE><MESSAGE>인증키가 유효하지 않습니다.</MESSAGE></RESULT>"#;
        match parse_rows(xml) {
            Err(DataError::SourceUnavailable { provider, message }) => {
                assert_eq!(provider, "ecos");
                assert!(message.starts_with("INFO-100"));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_non_ecos_body_is_schema_mismatch() {
        assert!(matches!(
            parse_rows("<html><body>maintenance</body></html>"),
            Err(DataError::SchemaMismatch(_))
        ));
    }

    #[test]
    fn test_strip_descriptor() {
        assert_eq!(strip_descriptor("1.3.1. 시장금리(일별)"), "시장금리(일별)");
        assert_eq!(strip_descriptor("본원통화"), "본원통화");
    }
}
