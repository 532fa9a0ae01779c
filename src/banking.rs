//! Персистентная банковская информация: BPD, UPD, TAN-методы, счета.
//!
//! Создаётся один раз на конфигурацию, переживает сессии и обновляется
//! на месте каждой инициализацией диалога.

use serde::{Deserialize, Serialize};

/// Значение system id до первого назначения банком.
pub const UNASSIGNED_SYSTEM_ID: &str = "0";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankingInformation {
    pub system_id: String,
    pub bpd: Option<BankParameterData>,
    pub upd: Option<UserParameterData>,
    pub bank_messages: Vec<BankMessage>,
}

impl BankingInformation {
    pub fn new() -> Self {
        BankingInformation {
            system_id: UNASSIGNED_SYSTEM_ID.to_string(),
            bpd: None,
            upd: None,
            bank_messages: Vec::new(),
        }
    }
}

impl Default for BankingInformation {
    fn default() -> Self {
        Self::new()
    }
}

/// BPD — объявленные банком возможности.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankParameterData {
    pub version: u32,
    pub country_code: u32,
    pub bank_id: String,
    pub bank_name: String,
    pub max_transactions_per_message: u32,
    pub supported_languages: Vec<u32>,
    pub supported_hbci_versions: Vec<u32>,
    pub url: String,
    pub supported_tan_methods: Vec<TanMethod>,
    /// Методы, доступные прямо сейчас (код ответа 3920) — подмножество supported.
    pub available_tan_method_ids: Vec<u32>,
    pub allowed_transactions: Vec<BankTransaction>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TanMethod {
    /// Код Sicherheitsfunktion.
    pub id: u32,
    pub name: String,
    pub version: u32,
    pub is_decoupled: bool,
    pub active_tan_media_count: u32,
    pub tan_media_requirement: u32,
    /// Присутствует тогда и только тогда, когда is_decoupled.
    pub decoupled: Option<DecoupledParams>,
}

/// Границы опроса статуса для decoupled-методов; сам цикл опроса — на вызывающей стороне.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DecoupledParams {
    pub max_status_requests: u32,
    pub wait_before_first_status_request: u32,
    pub wait_between_status_requests: u32,
    pub manual_confirmation_allowed: bool,
    pub auto_confirmation_allowed: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankTransaction {
    pub trans_id: String,
    pub tan_required: bool,
    /// Версии параметрических сегментов в порядке обнаружения в ответе.
    pub versions: Vec<u32>,
}

/// UPD — данные банка по конкретному клиенту.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserParameterData {
    pub version: u32,
    pub usage: u32,
    pub bank_accounts: Vec<BankAccount>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BankAccount {
    pub account_number: String,
    pub sub_account_id: Option<String>,
    pub bank: BankRef,
    pub iban: Option<String>,
    pub customer_id: String,
    pub account_type: AccountType,
    pub currency: String,
    pub holder1: Option<String>,
    pub holder2: Option<String>,
    pub product: Option<String>,
    pub limit: Option<String>,
    pub allowed_transactions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankRef {
    pub country: u32,
    pub bank_id: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum AccountType {
    Checking,
    Savings,
    FixedTermDeposit,
    Securities,
    Loan,
    CreditCard,
    Fund,
    BuildingSociety,
    Insurance,
    Other,
}

impl AccountType {
    /// Коды вида счёта (Kontoart) сгруппированы диапазонами по десяткам.
    pub fn from_code(code: u32) -> Self {
        match code {
            1..=9 => AccountType::Checking,
            10..=19 => AccountType::Savings,
            20..=29 => AccountType::FixedTermDeposit,
            30..=39 => AccountType::Securities,
            40..=49 => AccountType::Loan,
            50..=59 => AccountType::CreditCard,
            60..=69 => AccountType::Fund,
            70..=79 => AccountType::BuildingSociety,
            80..=89 => AccountType::Insurance,
            _ => AccountType::Other,
        }
    }
}

/// Свободнотекстовое сообщение банка (HIKIM).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankMessage {
    pub subject: String,
    pub text: String,
}

/// Код статуса с параметрами; сопровождает каждый ответ независимо от сегментов.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BankAnswer {
    pub code: u32,
    pub params: Option<Vec<String>>,
}
