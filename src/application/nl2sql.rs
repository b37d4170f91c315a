//! Korean prompt -> table -> canned SQL template.
//!
//! Table matching is a flat cascade, first hit wins, ties broken by schema order.
//! Generated SQL is never validated or executed.

use crate::application::dictionary::{translate_column_name, translate_table_name};
use crate::application::translate::TranslationService;
use crate::domain::error::SchemaKoError;
use crate::domain::model::{MatchResult, MatchTier, SqlGeneration};
use std::fmt::Write;

/// Domain concept keyword -> English table-name fragments.
const KEYWORD_TABLES: &[(&str, &[&str])] = &[
    ("사용자", &["user", "users", "member", "account"]),
    ("회원", &["member", "user", "account"]),
    ("고객", &["customer", "client", "user"]),
    ("주문", &["order", "purchase"]),
    ("상품", &["product", "item", "goods"]),
    ("제품", &["product", "item"]),
    ("결제", &["payment", "transaction", "billing"]),
    ("게시글", &["post", "article", "board"]),
    ("댓글", &["comment", "reply"]),
    ("카테고리", &["category", "categories"]),
    ("리뷰", &["review", "rating"]),
    ("장바구니", &["cart", "basket"]),
    ("배송", &["delivery", "deliveries", "shipping", "shipment"]),
    ("재고", &["inventory", "stock"]),
    ("쿠폰", &["coupon", "discount"]),
    ("알림", &["notification", "alert"]),
    ("로그", &["log", "audit", "history"]),
    ("파일", &["file", "attachment"]),
];

const NUMERIC_TYPES: &[&str] = &[
    "int", "integer", "numeric", "decimal", "float", "double", "bigint",
];

const NO_MATCH_TABLE_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedColumn {
    pub name: String,
    pub korean_name: String,
    pub data_type: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TranslatedTable {
    pub name: String,
    pub korean_name: String,
    pub columns: Vec<TranslatedColumn>,
}

/// Detected intent of a prompt; each maps to one SQL template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SqlIntent {
    Count,
    List,
    Recent,
    LastWeek,
    ThisMonth,
    Stats,
    GroupBy,
    Default,
}

pub fn match_table<'a>(
    prompt: &str,
    tables: &'a [TranslatedTable],
) -> Option<(&'a TranslatedTable, MatchTier)> {
    let lower = prompt.to_lowercase();

    for (keyword, fragments) in KEYWORD_TABLES {
        if !prompt.contains(keyword) {
            continue;
        }
        let hit = tables.iter().find(|t| {
            let name = t.name.to_lowercase();
            fragments.iter().any(|f| name.contains(f))
        });
        if let Some(table) = hit {
            return Some((table, MatchTier::Keyword));
        }
    }

    if let Some(table) = tables
        .iter()
        .find(|t| !t.korean_name.is_empty() && prompt.contains(&t.korean_name))
    {
        return Some((table, MatchTier::KoreanTableName));
    }

    if let Some(table) = tables
        .iter()
        .find(|t| !t.name.is_empty() && lower.contains(&t.name.to_lowercase()))
    {
        return Some((table, MatchTier::EnglishTableName));
    }

    tables
        .iter()
        .find(|t| {
            t.columns.iter().any(|c| {
                (!c.korean_name.is_empty() && prompt.contains(&c.korean_name))
                    || (!c.name.is_empty() && lower.contains(&c.name.to_lowercase()))
            })
        })
        .map(|t| (t, MatchTier::Column))
}

pub fn detect_intent(prompt: &str, table: &TranslatedTable) -> SqlIntent {
    let p = prompt.to_lowercase();
    let has = |words: &[&str]| words.iter().any(|w| p.contains(w));

    if has(&["count", "개수", "몇"]) {
        SqlIntent::Count
    } else if has(&["목록", "list", "조회"]) {
        SqlIntent::List
    } else if has(&["최근", "recent", "latest"]) {
        SqlIntent::Recent
    } else if has(&["이번 주", "지난 주", "week", "일주일"]) {
        SqlIntent::LastWeek
    } else if has(&["이번 달", "month"]) {
        SqlIntent::ThisMonth
    } else if has(&["통계", "stats", "summary"]) && numeric_column(table).is_some() {
        SqlIntent::Stats
    } else if has(&["그룹", "group", "별로"]) {
        SqlIntent::GroupBy
    } else {
        SqlIntent::Default
    }
}

/// Render the statement (with its leading label comment) and a Korean explanation.
pub fn render_sql(intent: SqlIntent, table: &TranslatedTable) -> (String, String) {
    let t = quote_ident(&table.name);
    let label = &table.korean_name;

    let (statement, explanation) = match intent {
        SqlIntent::Count => (
            format!("SELECT COUNT(*) AS count FROM {};", t),
            format!("{} 테이블의 전체 행 수를 계산합니다.", label),
        ),
        SqlIntent::List | SqlIntent::Default => (
            format!("SELECT * FROM {} LIMIT 100;", t),
            format!("{} 테이블의 데이터를 최대 100건 조회합니다.", label),
        ),
        SqlIntent::Recent => {
            let date = date_column(table);
            (
                format!("SELECT * FROM {} ORDER BY {} DESC LIMIT 10;", t, quote_ident(date)),
                format!("{} 테이블에서 {} 기준 최근 10건을 조회합니다.", label, date),
            )
        }
        SqlIntent::LastWeek => {
            let date = date_column(table);
            (
                format!(
                    "SELECT * FROM {} WHERE {} >= NOW() - INTERVAL '7 days';",
                    t,
                    quote_ident(date)
                ),
                format!("{} 테이블에서 최근 7일 동안의 데이터를 조회합니다.", label),
            )
        }
        SqlIntent::ThisMonth => {
            let date = date_column(table);
            (
                format!(
                    "SELECT * FROM {} WHERE {} >= DATE_TRUNC('month', NOW());",
                    t,
                    quote_ident(date)
                ),
                format!("{} 테이블에서 이번 달 데이터를 조회합니다.", label),
            )
        }
        SqlIntent::Stats => match numeric_column(table) {
            Some(column) => {
                let c = quote_ident(&column.name);
                (
                    format!(
                        "SELECT COUNT(*) AS count, AVG({c}) AS avg_value, MAX({c}) AS max_value, MIN({c}) AS min_value FROM {t};"
                    ),
                    format!("{} 테이블의 {} 통계를 계산합니다.", label, column.korean_name),
                )
            }
            None => return render_sql(SqlIntent::GroupBy, table),
        },
        SqlIntent::GroupBy => {
            let column = categorical_column(table);
            let category = quote_ident(column);
            (
                format!(
                    "SELECT {category}, COUNT(*) AS count FROM {t} GROUP BY {category} ORDER BY count DESC;"
                ),
                format!("{} 테이블을 {} 기준으로 그룹화해 개수를 셉니다.", label, column),
            )
        }
    };

    (
        format!("-- {} ({}) 테이블\n{}", label, table.name, statement),
        explanation,
    )
}

/// Terminal result when nothing matched: a diagnostic comment and a placeholder query.
pub fn no_match_sql(tables: &[TranslatedTable]) -> (String, String) {
    let mut sql = String::from("-- 요청과 일치하는 테이블을 찾지 못했습니다.\n");
    if tables.is_empty() {
        sql.push_str("-- 사용 가능한 테이블이 없습니다.\n");
    } else {
        let listed: Vec<String> = tables
            .iter()
            .take(NO_MATCH_TABLE_LIMIT)
            .map(|t| format!("{}({})", t.name, t.korean_name))
            .collect();
        let _ = writeln!(sql, "-- 사용 가능한 테이블: {}", listed.join(", "));
        if tables.len() > NO_MATCH_TABLE_LIMIT {
            let _ = writeln!(sql, "-- 외 {}개", tables.len() - NO_MATCH_TABLE_LIMIT);
        }
    }
    sql.push_str("SELECT * FROM table_name LIMIT 100;");

    (
        sql,
        "질문에서 테이블을 찾지 못했습니다. 테이블 이름이나 한국어 이름을 포함해 다시 질문해 주세요."
            .to_string(),
    )
}

pub fn schema_context(tables: &[TranslatedTable]) -> String {
    let mut context = String::new();
    for table in tables {
        let columns: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("{}({})", c.name, c.korean_name))
            .collect();
        let _ = writeln!(
            context,
            "{} ({}): {}",
            table.name,
            table.korean_name,
            columns.join(", ")
        );
    }
    context
}

/// Full pipeline over an already translated schema.
pub fn generate_sql_for(prompt: &str, tables: &[TranslatedTable]) -> SqlGeneration {
    let context = schema_context(tables);

    match match_table(prompt, tables) {
        Some((table, tier)) => {
            let (sql, explanation) = render_sql(detect_intent(prompt, table), table);
            SqlGeneration {
                sql,
                explanation,
                schema_context: context,
                matched: Some(MatchResult {
                    table_name: table.name.clone(),
                    korean_name: table.korean_name.clone(),
                    tier,
                }),
            }
        }
        None => {
            let (sql, explanation) = no_match_sql(tables);
            SqlGeneration {
                sql,
                explanation,
                schema_context: context,
                matched: None,
            }
        }
    }
}

impl TranslationService {
    /// Live schema labelled with stored translations, dictionary where none is stored.
    pub async fn translated_schema(
        &self,
        connection_id: &str,
    ) -> Result<Vec<TranslatedTable>, SchemaKoError> {
        let translations = self.get_translations(connection_id, false).await?;
        let tables = self.schema.get_tables(connection_id).await?;

        let mut translated = Vec::with_capacity(tables.len());
        for table in tables {
            let columns = self.schema.get_columns(connection_id, &table.name).await?;
            let entry = translations.get(&table.name);

            let columns = columns
                .into_iter()
                .map(|c| TranslatedColumn {
                    korean_name: entry
                        .and_then(|e| e.column_translations.get(&c.name).cloned())
                        .unwrap_or_else(|| translate_column_name(&c.name, c.comment.as_deref())),
                    name: c.name,
                    data_type: c.data_type,
                })
                .collect();

            translated.push(TranslatedTable {
                korean_name: entry
                    .map(|e| e.korean_name.clone())
                    .unwrap_or_else(|| translate_table_name(&table.name)),
                name: table.name,
                columns,
            });
        }

        Ok(translated)
    }

    pub async fn generate_sql(
        &self,
        connection_id: &str,
        prompt: &str,
    ) -> Result<SqlGeneration, SchemaKoError> {
        let tables = self.translated_schema(connection_id).await?;
        Ok(generate_sql_for(prompt, &tables))
    }
}

fn numeric_column(table: &TranslatedTable) -> Option<&TranslatedColumn> {
    table.columns.iter().find(|c| {
        let ty = c.data_type.to_lowercase();
        NUMERIC_TYPES.iter().any(|n| ty.contains(n))
    })
}

fn date_column(table: &TranslatedTable) -> &str {
    table
        .columns
        .iter()
        .find(|c| {
            let name = c.name.to_lowercase();
            name.contains("created") || name.contains("date")
        })
        .map_or("createdAt", |c| c.name.as_str())
}

fn categorical_column(table: &TranslatedTable) -> &str {
    table
        .columns
        .iter()
        .find(|c| {
            let name = c.name.to_lowercase();
            name.contains("type") || name.contains("status") || name.contains("category")
        })
        .or_else(|| table.columns.first())
        .map_or("id", |c| c.name.as_str())
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(name: &str, korean: &str, columns: &[(&str, &str, &str)]) -> TranslatedTable {
        TranslatedTable {
            name: name.to_string(),
            korean_name: korean.to_string(),
            columns: columns
                .iter()
                .map(|(n, k, ty)| TranslatedColumn {
                    name: n.to_string(),
                    korean_name: k.to_string(),
                    data_type: ty.to_string(),
                })
                .collect(),
        }
    }

    fn shop() -> Vec<TranslatedTable> {
        vec![
            table(
                "orders",
                "주문",
                &[
                    ("id", "아이디", "INTEGER"),
                    ("status", "상태", "TEXT"),
                    ("total_price", "합계 가격", "DECIMAL(10,2)"),
                    ("created_at", "생성일시", "TIMESTAMP"),
                ],
            ),
            table(
                "users",
                "사용자",
                &[("id", "아이디", "INTEGER"), ("email", "이메일", "TEXT")],
            ),
            table("tb_cfg", "환경설정", &[("cfg_key", "설정키", "TEXT")]),
        ]
    }

    #[test]
    fn cascade_priority() {
        let tables = shop();
        assert_eq!(
            match_table("사용자 목록", &tables).map(|(t, tier)| (t.name.as_str(), tier)),
            Some(("users", MatchTier::Keyword))
        );
        assert_eq!(
            match_table("환경설정 보여줘", &tables).map(|(t, tier)| (t.name.as_str(), tier)),
            Some(("tb_cfg", MatchTier::KoreanTableName))
        );
        assert_eq!(
            match_table("show TB_CFG rows", &tables).map(|(t, tier)| (t.name.as_str(), tier)),
            Some(("tb_cfg", MatchTier::EnglishTableName))
        );
        assert_eq!(
            match_table("이메일 보여줘", &tables).map(|(t, tier)| (t.name.as_str(), tier)),
            Some(("users", MatchTier::Column))
        );
        assert!(match_table("날씨 어때", &tables).is_none());
    }

    #[test]
    fn intents_first_rule_wins() {
        let orders = &shop()[0];
        assert_eq!(detect_intent("주문 개수 목록", orders), SqlIntent::Count);
        assert_eq!(detect_intent("최근 주문", orders), SqlIntent::Recent);
        assert_eq!(detect_intent("지난 주 주문", orders), SqlIntent::LastWeek);
        assert_eq!(detect_intent("이번 달 주문", orders), SqlIntent::ThisMonth);
        assert_eq!(detect_intent("주문 통계", orders), SqlIntent::Stats);
        assert_eq!(detect_intent("상태별로 주문", orders), SqlIntent::GroupBy);
        assert_eq!(detect_intent("주문", orders), SqlIntent::Default);
    }

    #[test]
    fn stats_without_numeric_column_falls_through() {
        let users = table("users", "사용자", &[("email", "이메일", "TEXT")]);
        assert_eq!(detect_intent("사용자 통계", &users), SqlIntent::Default);
        assert_eq!(detect_intent("사용자 통계 그룹", &users), SqlIntent::GroupBy);
    }

    #[test]
    fn templates_pick_best_guess_columns() {
        let orders = &shop()[0];
        let (sql, _) = render_sql(SqlIntent::Recent, orders);
        assert!(sql.starts_with("-- 주문 (orders) 테이블\n"));
        assert!(sql.contains("ORDER BY \"created_at\" DESC LIMIT 10"));

        let (sql, _) = render_sql(SqlIntent::Stats, orders);
        assert!(sql.contains("AVG(\"id\")"));

        let (sql, _) = render_sql(SqlIntent::GroupBy, orders);
        assert!(sql.contains("GROUP BY \"status\""));

        let bare = table("events", "이벤트", &[]);
        let (sql, _) = render_sql(SqlIntent::ThisMonth, &bare);
        assert!(sql.contains("\"createdAt\" >= DATE_TRUNC('month', NOW())"));
        let (sql, _) = render_sql(SqlIntent::GroupBy, &bare);
        assert!(sql.contains("GROUP BY \"id\""));
    }

    #[test]
    fn no_match_lists_at_most_ten_tables() {
        let tables: Vec<TranslatedTable> = (0..12)
            .map(|i| table(&format!("t{}", i), &format!("테이블{}", i), &[]))
            .collect();
        let (sql, _) = no_match_sql(&tables);
        assert!(sql.contains("t9(테이블9)"));
        assert!(!sql.contains("t10(테이블10)"));
        assert!(sql.ends_with("SELECT * FROM table_name LIMIT 100;"));
    }
}
