//! Prompts sent to the AI translator and parsing of its `english: korean` replies.

use crate::domain::model::ColumnInfo;
use std::collections::HashMap;

pub const SYSTEM_PROMPT: &str = "You are a database expert who names English SQL identifiers \
in natural Korean business terms. Answer only with one line per term in the form \
`english: korean`, keeping the English term exactly as given.";

pub fn table_batch_prompt(table_names: &[String]) -> String {
    let mut prompt = String::from("Translate these database table names into Korean:\n");
    for name in table_names {
        prompt.push_str("- ");
        prompt.push_str(name);
        prompt.push('\n');
    }
    prompt
}

pub fn single_table_prompt(table_name: &str, columns: &[ColumnInfo]) -> String {
    let mut prompt = format!(
        "Translate the table name and every column name into Korean.\nTable:\n- {}\nColumns:\n",
        table_name
    );
    for column in columns {
        match column.comment.as_deref().map(str::trim) {
            Some(comment) if !comment.is_empty() => {
                prompt.push_str(&format!("- {} ({}, \"{}\")\n", column.name, column.data_type, comment))
            }
            _ => prompt.push_str(&format!("- {} ({})\n", column.name, column.data_type)),
        }
    }
    prompt
}

/// Map reply lines back to the requested terms, matched case-insensitively by name.
///
/// Lines that do not parse, or name a term that was not asked for, are dropped.
/// Multi-word English terms are not recognised.
pub fn parse_translation_lines(text: &str, terms: &[String]) -> HashMap<String, String> {
    let wanted: HashMap<String, &String> = terms.iter().map(|t| (t.to_lowercase(), t)).collect();
    let mut parsed = HashMap::new();

    for line in text.lines() {
        let Some((english, korean)) = split_line(line) else {
            continue;
        };
        if let Some(original) = wanted.get(&english.to_lowercase()) {
            parsed.insert((*original).clone(), korean);
        }
    }

    parsed
}

fn split_line(line: &str) -> Option<(String, String)> {
    let body = strip_bullet(line.trim());
    let idx = body.find([':', '：'])?;
    let sep_len = body[idx..].chars().next()?.len_utf8();

    let english = clean(&body[..idx]);
    // drop a trailing "(type)" hint echoed back from the prompt
    let english = match english.find('(') {
        Some(p) => english[..p].trim().to_string(),
        None => english,
    };
    let korean = clean(&body[idx + sep_len..]);

    if english.is_empty() || korean.is_empty() || english.contains(char::is_whitespace) {
        return None;
    }
    Some((english, korean))
}

fn strip_bullet(line: &str) -> &str {
    let line = line.trim_start_matches(['-', '*', '•', '·', '+']).trim_start();
    // numbered lists: "1." / "2)"
    let digits = line.chars().take_while(|c| c.is_ascii_digit()).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(stripped) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return stripped.trim_start();
        }
    }
    line
}

fn clean(s: &str) -> String {
    s.trim()
        .trim_matches(|c: char| matches!(c, '"' | '\'' | '`' | '*' | '“' | '”' | '‘' | '’') || c.is_whitespace())
        .to_string()
}
