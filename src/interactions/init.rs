//! Инициализация диалога: HKIDN/HKVVB(/HKSYN) на выход, переговоры
//! возможностей банка на входе.

use crate::{
    banking::{
        AccountType, BankAccount, BankMessage, BankParameterData, BankRef, BankTransaction,
        DecoupledParams, TanMethod, UserParameterData, UNASSIGNED_SYSTEM_ID,
    },
    config::FintsConfig,
    error::{FintsError, Result},
    interaction::ClientResponse,
    message::Message,
    segment::{
        Hibpa, Hikim, Hikom, Hipins, Hisyn, Hitans, HitansTanMethod, Hiupa, Hiupd, Hkidn, Hksyn,
        Hkvvb, Language, Segment, SegmentPayload, SyncMode,
    },
};

#[derive(Debug, Clone)]
pub struct InitDialogInteraction {
    /// Запрошена ли синхронизация system id.
    pub sync_system_id: bool,
}

impl InitDialogInteraction {
    pub fn new(sync_system_id: bool) -> Self {
        InitDialogInteraction { sync_system_id }
    }

    pub fn build_request(&self, config: &FintsConfig) -> Result<Vec<Segment>> {
        let info = &config.banking_information;
        let mut segments = Vec::new();

        let customer_id = config
            .customer_id
            .clone()
            .or_else(|| config.user_id.clone())
            .unwrap_or_else(|| "9999999999".to_string());

        segments.push(Segment::new(
            Hkidn::ID,
            Hkidn::VERSION,
            SegmentPayload::Hkidn(Hkidn {
                bank: BankRef {
                    country: config.country_code,
                    bank_id: config.bank_id.clone(),
                },
                customer_id,
                system_id: info.system_id.clone(),
                system_id_required: if config.user_id.is_some() { 1 } else { 0 },
            }),
        ));

        segments.push(Segment::new(
            Hkvvb::ID,
            Hkvvb::VERSION,
            SegmentPayload::Hkvvb(Hkvvb {
                bpd_version: info.bpd.as_ref().map(|b| b.version).unwrap_or(0),
                upd_version: info.upd.as_ref().map(|u| u.version).unwrap_or(0),
                dialog_language: Language::Default,
                product_id: config.product_id.clone(),
                product_version: config.product_version.clone(),
            }),
        ));

        if self.sync_system_id
            && config.user_id.is_some()
            && info.system_id == UNASSIGNED_SYSTEM_ID
        {
            segments.push(Segment::new(
                Hksyn::ID,
                Hksyn::VERSION,
                SegmentPayload::Hksyn(Hksyn {
                    mode: SyncMode::NewSystemId,
                }),
            ));
        }

        Ok(segments)
    }

    pub fn consume_response(
        &self,
        config: &mut FintsConfig,
        response: &Message,
        client_response: &mut ClientResponse,
    ) -> Result<()> {
        let before = serde_json::to_value(&config.banking_information)?;

        // Всё новое состояние копится в локальных значениях и применяется
        // только после обязательной проверки HIPINS: неудачные переговоры
        // оставляют banking_information нетронутой.
        let new_system_id = response
            .find_segment(Hisyn::ID)
            .and_then(|s| s.as_hisyn())
            .map(|h| h.system_id.clone())
            .filter(|id| !id.is_empty());

        let new_bpd = match response.find_segment(Hibpa::ID).and_then(|s| s.as_hibpa()) {
            Some(hibpa) => Some(negotiate_bpd(config, response, hibpa)?),
            None => None,
        };

        let new_upd = response
            .find_segment(Hiupa::ID)
            .and_then(|s| s.as_hiupa())
            .map(|hiupa| UserParameterData {
                version: hiupa.upd_version,
                usage: hiupa.upd_usage,
                bank_accounts: response
                    .find_all_segments(Hiupd::ID)
                    .iter()
                    .filter_map(|s| s.as_hiupd())
                    .map(project_account)
                    .collect(),
            });

        let bank_messages: Vec<BankMessage> = response
            .find_all_segments(Hikim::ID)
            .iter()
            .filter_map(|s| s.as_hikim())
            .map(|s| BankMessage {
                subject: s.subject.clone(),
                text: s.text.clone(),
            })
            .collect();

        let info = &mut config.banking_information;

        if let Some(id) = new_system_id {
            tracing::debug!(system_id = %id, "bank assigned system id");
            info.system_id = id;
        }

        if let Some(bpd) = new_bpd {
            tracing::debug!(
                version = bpd.version,
                transactions = bpd.allowed_transactions.len(),
                tan_methods = bpd.supported_tan_methods.len(),
                "bank parameter data refreshed"
            );
            info.bpd = Some(bpd);
        }

        // Код 3920: перечень доступных сейчас TAN-методов. Применяется к
        // текущему BPD, даже если в этом ответе он не обновлялся.
        if let Some(answer) = client_response.bank_answers.iter().find(|a| a.code == 3920) {
            if let Some(bpd) = info.bpd.as_mut() {
                bpd.available_tan_method_ids = answer
                    .params
                    .as_deref()
                    .unwrap_or(&[])
                    .iter()
                    .filter_map(|p| p.parse().ok())
                    .collect();
            }
        }

        if let Some(upd) = new_upd {
            tracing::debug!(accounts = upd.bank_accounts.len(), "user parameter data refreshed");
            info.upd = Some(upd);
        }

        // замена целиком, без слияния с предыдущим списком
        info.bank_messages = bank_messages;

        client_response.banking_information = Some(info.clone());
        let after = serde_json::to_value(&*info)?;
        client_response.banking_information_updated = before != after;
        Ok(())
    }
}

fn negotiate_bpd(
    config: &FintsConfig,
    response: &Message,
    hibpa: &Hibpa,
) -> Result<BankParameterData> {
    let mut supported_tan_methods: Vec<TanMethod> = Vec::new();
    for segment in response.find_all_segments(Hitans::ID) {
        let Some(hitans) = segment.as_hitans() else {
            continue;
        };
        for method in &hitans.tan_methods {
            let decoupled = is_decoupled_tan_method(method);
            supported_tan_methods.push(TanMethod {
                id: method.sec_func,
                name: method.method_name.clone(),
                version: segment.header.version,
                is_decoupled: decoupled,
                active_tan_media_count: method.active_tan_media,
                tan_media_requirement: method.tan_media_required,
                decoupled: decoupled.then(|| DecoupledParams {
                    max_status_requests: method.decoupled_max_status_requests.unwrap_or(0),
                    wait_before_first_status_request: method
                        .decoupled_wait_before_first_status_request
                        .unwrap_or(0),
                    wait_between_status_requests: method
                        .decoupled_wait_between_status_requests
                        .unwrap_or(0),
                    manual_confirmation_allowed: method
                        .decoupled_manual_confirmation_allowed
                        .unwrap_or(false),
                    auto_confirmation_allowed: method
                        .decoupled_auto_confirmation_allowed
                        .unwrap_or(false),
                }),
            });
        }
    }

    let mut url = config.banking_url.clone();
    if let Some(hikom) = response.find_segment(Hikom::ID).and_then(|s| s.as_hikom()) {
        url = hikom.address.clone();
        if !url.to_lowercase().starts_with("https://") {
            url = format!("https://{url}");
        }
    }

    let hipins = response
        .find_segment(Hipins::ID)
        .and_then(|s| s.as_hipins())
        .ok_or_else(|| {
            FintsError::Negotiation(
                "Bank does not support PIN/TAN transactions (HIPINS segment not found in BPA)"
                    .to_string(),
            )
        })?;

    let mut allowed_transactions: Vec<BankTransaction> = hipins
        .transactions
        .iter()
        .map(|t| BankTransaction {
            trans_id: t.trans_id.clone(),
            tan_required: t.tan_required,
            versions: Vec::new(),
        })
        .collect();

    for transaction in &mut allowed_transactions {
        let Some(param_seg_id) = param_segment_name(&transaction.trans_id) else {
            continue;
        };
        // параметрический сегмент может не входить в статически известный
        // набор, поэтому смотрим оба вида выборки
        let mut param_segments = response.find_all_segments(&param_seg_id);
        param_segments.extend(response.find_all_unknown_segments(&param_seg_id));
        for param_segment in param_segments {
            transaction.versions.push(param_segment.header.version);
        }
    }

    Ok(BankParameterData {
        version: hibpa.bpd_version,
        country_code: hibpa.bank.country,
        bank_id: hibpa.bank.bank_id.clone(),
        bank_name: hibpa.bank_name.clone(),
        max_transactions_per_message: hibpa.max_transactions,
        supported_languages: hibpa.supported_languages.clone(),
        supported_hbci_versions: hibpa.supported_hbci_versions.clone(),
        url,
        supported_tan_methods,
        available_tan_method_ids: Vec::new(),
        allowed_transactions,
    })
}

fn project_account(upd: &Hiupd) -> BankAccount {
    BankAccount {
        account_number: upd.account_number.clone(),
        sub_account_id: upd.sub_account_id.clone(),
        bank: upd.bank.clone(),
        iban: upd.iban.clone(),
        customer_id: upd.customer_id.clone(),
        account_type: AccountType::from_code(upd.account_type),
        currency: upd.currency.clone(),
        holder1: upd.holder1.clone(),
        holder2: upd.holder2.clone(),
        product: upd.product.clone(),
        limit: upd.limit.clone(),
        allowed_transactions: upd.allowed_transactions.iter().flatten().cloned().collect(),
    }
}

/// Имя параметрического сегмента транзакции: HK/DK-префикс заменяется на
/// "HI", в конец добавляется "S". Например, "HKSAL" -> "HISALS".
pub fn param_segment_name(trans_id: &str) -> Option<String> {
    if trans_id.starts_with("HK") || trans_id.starts_with("DK") {
        Some(format!("HI{}S", &trans_id[2..]))
    } else {
        None
    }
}

fn is_decoupled_tan_method(method: &HitansTanMethod) -> bool {
    if matches!(
        method.zka_method.as_deref(),
        Some("Decoupled") | Some("DecoupledPush")
    ) {
        return true;
    }

    // класс процедуры может отсутствовать; любой decoupled-параметр тоже
    // считается признаком
    method.decoupled_max_status_requests.is_some()
        || method.decoupled_wait_before_first_status_request.is_some()
        || method.decoupled_wait_between_status_requests.is_some()
        || method.decoupled_manual_confirmation_allowed.is_some()
        || method.decoupled_auto_confirmation_allowed.is_some()
}
