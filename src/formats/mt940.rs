//! Минимальный набор тегов: :20:, :25:, :28C:, :60F:, :61:, :86:, :62F:
//!
//! Один проход вперёд; очередной :20: закрывает собираемую выписку.
//! Незнакомые теги пропускаются, кривые дата/сумма в :61: фатальны для
//! всего входа.

use crate::{
    error::{FintsError, Result},
    model::{Balance, DebitCredit, Statement, Transaction},
};
use chrono::{Datelike, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use std::io::BufRead;

pub struct Mt940;

impl crate::traits::ReadFormat for Mt940 {
    fn read<R: BufRead>(r: R) -> Result<Vec<Statement>> {
        // :61: YYMMDD [MMDD] [C|D] [CCY]? amount[,~~] [TX]? [REF]...
        let re_61 = Regex::new(
            r"^:61:(?P<val>\d{6})(?P<book>\d{4})?(?P<dc>[CD])(?P<ccy>[A-Z]{3})?(?P<amt>\d+,\d{0,2})(?P<tx>[A-Z]{3,4})?(?P<ref>[^\r\n]*)?.*$",
        )
        .map_err(|e| FintsError::Parse(e.to_string()))?;

        let mut statements: Vec<Statement> = Vec::new();
        let mut current: Option<Statement> = None;
        let mut in_description = false;

        for line in r.lines() {
            let line = line?;
            if line.starts_with(":20:") {
                if let Some(st) = current.take() {
                    statements.push(st);
                }
                let mut st = blank_statement();
                let reference = line[4..].trim();
                if !reference.is_empty() {
                    st.reference = Some(reference.to_string());
                }
                current = Some(st);
                in_description = false;
            } else if line.starts_with(":25:") {
                let st = current.get_or_insert_with(blank_statement);
                st.account_id = line[4..].trim().to_string();
                in_description = false;
            } else if line.starts_with(":28C:") {
                let st = current.get_or_insert_with(blank_statement);
                st.statement_number = Some(line[5..].trim().to_string());
                in_description = false;
            } else if line.starts_with(":60F:") {
                let st = current.get_or_insert_with(blank_statement);
                st.opening_balance = parse_balance(&line[5..])?;
                in_description = false;
            } else if line.starts_with(":62F:") {
                let st = current.get_or_insert_with(blank_statement);
                st.closing_balance = parse_balance(&line[5..])?;
                in_description = false;
            } else if line.starts_with(":61:") {
                let caps = re_61
                    .captures(&line)
                    .ok_or_else(|| FintsError::Parse("bad :61:".into()))?;

                // маленький хелпер для обязательных групп
                let req = |name: &str| {
                    caps.name(name)
                        .map(|m| m.as_str())
                        .ok_or_else(|| FintsError::Parse(format!(":61: missing {name}")))
                };

                let val = req("val")?;
                let book_opt = caps.name("book").map(|m| m.as_str());

                let dc = match req("dc")? {
                    "C" => DebitCredit::Credit,
                    "D" => DebitCredit::Debit,
                    other => return Err(FintsError::Parse(format!(":61: dc {other}"))),
                };

                // сумма в немецкой записи; знак берётся из маркера D/C
                let amt = req("amt")?.replace(',', ".");
                let amount: Decimal = amt
                    .parse()
                    .map_err(|e| FintsError::Parse(format!("amount: {e}")))?;
                let amount = match dc {
                    DebitCredit::Debit => -amount,
                    DebitCredit::Credit => amount,
                };

                let value_date = parse_mt_date(val)?;
                let booking_date = match book_opt {
                    Some(b) => parse_mt_book_date(value_date.year(), b)?,
                    None => value_date,
                };

                let transaction_type = caps
                    .name("tx")
                    .map(|m| m.as_str().to_string())
                    .unwrap_or_default();

                // reference: хвост после кода операции, игнорируем пустой и NONREF
                let reference = caps
                    .name("ref")
                    .map(|m| m.as_str().trim().to_string())
                    .filter(|s| !s.is_empty() && s != "NONREF");

                let st = current.get_or_insert_with(blank_statement);
                st.transactions.push(Transaction {
                    value_date,
                    booking_date,
                    amount,
                    transaction_type,
                    reference,
                    description: String::new(),
                });
                in_description = false;
            } else if line.starts_with(":86:") {
                if let Some(last) = current.as_mut().and_then(|st| st.transactions.last_mut()) {
                    let text = line[4..].to_string();
                    if last.description.is_empty() {
                        last.description = text;
                    } else {
                        last.description.push(' ');
                        last.description.push_str(&text);
                    }
                    in_description = true;
                }
            } else if in_description && !line.starts_with(':') {
                // продолжение описания без нового тега
                if let Some(last) = current.as_mut().and_then(|st| st.transactions.last_mut()) {
                    last.description.push(' ');
                    last.description.push_str(line.trim());
                }
            } else if line.starts_with(':') {
                // незнакомый тег — пропускаем ради совместимости вперёд
                in_description = false;
            }
        }

        if let Some(st) = current.take() {
            statements.push(st);
        }

        tracing::debug!(statements = statements.len(), "mt940 decoded");
        Ok(statements)
    }
}

fn blank_statement() -> Statement {
    Statement {
        reference: None,
        account_id: String::new(),
        statement_number: None,
        opening_balance: None,
        closing_balance: None,
        transactions: Vec::new(),
    }
}

/// Парс баланса формата D/C + YYMMDD + CCY + amount
fn parse_balance(s: &str) -> Result<Option<Balance>> {
    if s.len() < 7 {
        return Ok(None);
    }
    let dc = &s[0..1];
    let date = &s[1..7];
    let rest = &s[7..];

    if rest.len() < 3 {
        return Ok(None);
    }
    let currency = &rest[0..3];
    let amt = &rest[3..].replace(',', ".");

    let amount: Decimal = amt
        .parse()
        .map_err(|e| FintsError::Parse(format!("balance amt: {e}")))?;
    let d = parse_mt_date(date)?;
    let signed = if dc == "D" { -amount } else { amount };
    Ok(Some(Balance {
        date: d,
        amount: signed,
        currency: currency.to_string(),
    }))
}

fn parse_mt_date(yy_mmdd: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(yy_mmdd, "%y%m%d").map_err(|e| FintsError::Parse(e.to_string()))
}

fn parse_mt_book_date(year: i32, mmdd: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(&format!("{year}{mmdd}"), "%Y%m%d")
        .map_err(|e| FintsError::Parse(e.to_string()))
}
