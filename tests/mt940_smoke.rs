use fintslib::{error::FintsError, formats::mt940::Mt940, traits::ReadFormat};
use rust_decimal::Decimal;
use std::io::Cursor;

#[test]
fn mt940_read_minimal() {
    let s = r#":20:STATEMENT1
:25:DE0012345678
:28C:00001/001
:60F:C251001EUR1000,00
:61:2510011001C100,00NTRFNONREF
:86:Salary October
:62F:C251031EUR1100,00
"#;
    let statements = Mt940::read(Cursor::new(s)).expect("mt940 read");
    assert_eq!(statements.len(), 1);

    let st = &statements[0];
    assert_eq!(st.reference.as_deref(), Some("STATEMENT1"));
    assert_eq!(st.account_id, "DE0012345678");
    assert_eq!(st.statement_number.as_deref(), Some("00001/001"));
    assert_eq!(st.transactions.len(), 1);

    let t = &st.transactions[0];
    assert_eq!(t.description, "Salary October");
    assert_eq!(t.transaction_type, "NTRF");
    // NONREF отфильтровывается
    assert_eq!(t.reference, None);
    // сравниваем числовое значение, а не строку
    assert_eq!(t.amount, Decimal::new(100, 0));

    let opening = st.opening_balance.as_ref().expect("opening balance");
    assert_eq!(opening.currency, "EUR");
    assert_eq!(opening.amount, Decimal::new(1000, 0));
    let closing = st.closing_balance.as_ref().expect("closing balance");
    assert_eq!(closing.amount, Decimal::new(1100, 0));
}

#[test]
fn mt940_splits_statements_and_joins_continuations() {
    let s = r#":20:REF1
:25:ACC1
:61:2510011001D25,50NTRFREF-A
:86:CARD PAYMENT
SUPERMARKET BERLIN
:62F:C251031EUR974,50
:20:REF2
:25:ACC2
:61:2510021002C10,00NTRF
"#;
    let statements = Mt940::read(Cursor::new(s)).expect("mt940 read");
    assert_eq!(statements.len(), 2);

    let first = &statements[0];
    assert_eq!(first.transactions.len(), 1);
    // описание из двух физических строк склеивается
    assert_eq!(
        first.transactions[0].description,
        "CARD PAYMENT SUPERMARKET BERLIN"
    );
    // дебет — отрицательная сумма
    assert_eq!(first.transactions[0].amount, Decimal::new(-2550, 2));
    assert_eq!(first.transactions[0].reference.as_deref(), Some("REF-A"));

    let second = &statements[1];
    assert_eq!(second.account_id, "ACC2");
    assert_eq!(second.transactions[0].amount, Decimal::new(10, 0));
}

#[test]
fn mt940_skips_unknown_tags() {
    let s = r#":20:REF1
:25:ACC1
:NS:22 proprietary field
:61:2510011001C1,00NTRF
"#;
    let statements = Mt940::read(Cursor::new(s)).expect("mt940 read");
    assert_eq!(statements.len(), 1);
    assert_eq!(statements[0].transactions.len(), 1);
}

#[test]
fn mt940_bad_transaction_date_is_fatal() {
    // месяц 13 в дате валютирования
    let s = ":20:REF1\n:25:ACC1\n:61:2513991001C1,00NTRF\n";
    let err = Mt940::read(Cursor::new(s)).unwrap_err();
    assert!(matches!(err, FintsError::Parse(_)));
}

#[test]
fn mt940_bad_amount_is_fatal() {
    // точка вместо десятичной запятой не проходит разбор :61:
    let s = ":20:REF1\n:25:ACC1\n:61:2510011001C1.00NTRF\n";
    let err = Mt940::read(Cursor::new(s)).unwrap_err();
    assert!(matches!(err, FintsError::Parse(_)));
}
