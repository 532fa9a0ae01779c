//! Конфигурация сессии: идентификация клиента и разделяемая банковская
//! информация. Ядро читает идентификационные поля и мутирует только
//! banking_information.

use crate::banking::{BankAccount, BankingInformation};

#[derive(Debug, Clone)]
pub struct FintsConfig {
    pub country_code: u32,
    pub bank_id: String,
    pub customer_id: Option<String>,
    pub user_id: Option<String>,
    pub product_id: String,
    pub product_version: String,
    /// Стартовый адрес; после переговоров BPD несёт актуальный.
    pub banking_url: String,
    pub banking_information: BankingInformation,
}

impl FintsConfig {
    pub fn new(
        country_code: u32,
        bank_id: impl Into<String>,
        banking_url: impl Into<String>,
        product_id: impl Into<String>,
        product_version: impl Into<String>,
    ) -> Self {
        FintsConfig {
            country_code,
            bank_id: bank_id.into(),
            customer_id: None,
            user_id: None,
            product_id: product_id.into(),
            product_version: product_version.into(),
            banking_url: banking_url.into(),
            banking_information: BankingInformation::new(),
        }
    }

    pub fn get_bank_account(&self, account_number: &str) -> Option<&BankAccount> {
        self.banking_information
            .upd
            .as_ref()?
            .bank_accounts
            .iter()
            .find(|a| a.account_number == account_number)
    }

    pub fn is_account_transaction_supported(&self, account_number: &str, trans_id: &str) -> bool {
        self.get_bank_account(account_number)
            .map(|a| a.allowed_transactions.iter().any(|t| t == trans_id))
            .unwrap_or(false)
    }

    /// Максимальная версия транзакции из согласованного BPD.
    pub fn get_max_supported_transaction_version(&self, trans_id: &str) -> Option<u32> {
        self.banking_information
            .bpd
            .as_ref()?
            .allowed_transactions
            .iter()
            .find(|t| t.trans_id == trans_id)?
            .versions
            .iter()
            .copied()
            .max()
    }
}
