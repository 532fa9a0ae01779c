//! Контракт взаимодействия: из конфигурации строится запрос, из ответа
//! заполняются ClientResponse и разделяемая банковская информация.
//!
//! На один диалог — не более одного незавершённого запроса; следующий
//! build_request не запускается, пока не завершён consume_response
//! предыдущего взаимодействия. Единственный писатель на конфигурацию
//! обеспечивается &mut-заимствованием.

use crate::{
    banking::{BankAccount, BankAnswer, BankingInformation},
    config::FintsConfig,
    error::{FintsError, Result},
    interactions::{init::InitDialogInteraction, statement::StatementInteraction},
    message::Message,
    model::Statement,
    segment::Segment,
};

/// Результат одной операции; bank_answers заполняет транспортный слой.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClientResponse {
    pub bank_answers: Vec<BankAnswer>,
    /// Только после инициализации диалога.
    pub banking_information: Option<BankingInformation>,
    pub banking_information_updated: bool,
    /// Только после заказа выписки; пустой список, если данных не было.
    pub statements: Vec<Statement>,
}

impl ClientResponse {
    pub fn new(bank_answers: Vec<BankAnswer>) -> Self {
        ClientResponse {
            bank_answers,
            ..Default::default()
        }
    }
}

/// Пара идентификаторов сегментов заказа: запрос и ожидаемый ответ.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderParams {
    pub request_seg_id: &'static str,
    pub response_seg_id: &'static str,
}

/// Закрытое множество взаимодействий диалога. Новые виды заказов добавляются
/// вариантами, не трогая переговоры и разбор выписок.
#[derive(Debug, Clone)]
pub enum Interaction {
    InitDialog(InitDialogInteraction),
    Statement(StatementInteraction),
}

impl Interaction {
    /// Строит сегменты запроса. При нарушенном предусловии не порождает ни
    /// сегментов, ни изменений состояния.
    pub fn build_request(&self, config: &FintsConfig) -> Result<Vec<Segment>> {
        match self {
            Interaction::InitDialog(i) => i.build_request(config),
            Interaction::Statement(i) => i.build_request(config),
        }
    }

    /// Разбирает ответ, заполняя client_response; инициализация дополнительно
    /// обновляет banking_information конфигурации.
    pub fn consume_response(
        &self,
        config: &mut FintsConfig,
        response: &Message,
        client_response: &mut ClientResponse,
    ) -> Result<()> {
        match self {
            Interaction::InitDialog(i) => i.consume_response(config, response, client_response),
            Interaction::Statement(i) => i.consume_response(config, response, client_response),
        }
    }
}

/// Префлайт заказа: счёт должен быть известен, поддерживать транзакцию, и у
/// неё должна быть хотя бы одна согласованная версия. Возвращает счёт и
/// максимальную версию.
pub(crate) fn check_order_support<'a>(
    config: &'a FintsConfig,
    account_number: &str,
    trans_id: &str,
) -> Result<(&'a BankAccount, u32)> {
    let account = config.get_bank_account(account_number).ok_or_else(|| {
        FintsError::UnsupportedTransaction(format!(
            "Account {account_number} is not present in the user parameter data"
        ))
    })?;

    if !config.is_account_transaction_supported(account_number, trans_id) {
        return Err(FintsError::UnsupportedTransaction(format!(
            "Account {account_number} does not support business transaction '{trans_id}'"
        )));
    }

    let version = config
        .get_max_supported_transaction_version(trans_id)
        .ok_or_else(|| {
            FintsError::UnsupportedTransaction(format!(
                "There is no supported version for business transaction '{trans_id}'"
            ))
        })?;

    Ok((account, version))
}
