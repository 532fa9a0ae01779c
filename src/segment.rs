//! Сегментная модель: заголовок, типизированные payload'ы и протокольные коды.
//!
//! Кодирование/декодирование проводного формата живёт слоем ниже; здесь
//! сегмент — уже разобранная запись с заголовком и типизированным телом.

use crate::banking::BankRef;
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SegmentHeader {
    pub seg_id: String,
    pub seg_nr: u32,
    pub version: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub header: SegmentHeader,
    pub payload: SegmentPayload,
}

impl Segment {
    /// Номер сегмента проставляет проводной слой при сборке сообщения.
    pub fn new(seg_id: &str, version: u32, payload: SegmentPayload) -> Self {
        Segment {
            header: SegmentHeader {
                seg_id: seg_id.to_string(),
                seg_nr: 0,
                version,
            },
            payload,
        }
    }

    pub fn as_hisyn(&self) -> Option<&Hisyn> {
        match &self.payload {
            SegmentPayload::Hisyn(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hibpa(&self) -> Option<&Hibpa> {
        match &self.payload {
            SegmentPayload::Hibpa(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hitans(&self) -> Option<&Hitans> {
        match &self.payload {
            SegmentPayload::Hitans(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hikom(&self) -> Option<&Hikom> {
        match &self.payload {
            SegmentPayload::Hikom(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hipins(&self) -> Option<&Hipins> {
        match &self.payload {
            SegmentPayload::Hipins(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hiupa(&self) -> Option<&Hiupa> {
        match &self.payload {
            SegmentPayload::Hiupa(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hiupd(&self) -> Option<&Hiupd> {
        match &self.payload {
            SegmentPayload::Hiupd(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hikim(&self) -> Option<&Hikim> {
        match &self.payload {
            SegmentPayload::Hikim(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_hikaz(&self) -> Option<&Hikaz> {
        match &self.payload {
            SegmentPayload::Hikaz(d) => Some(d),
            _ => None,
        }
    }
}

/// Закрытое множество тел сегментов, известных клиенту.
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentPayload {
    Hkidn(Hkidn),
    Hkvvb(Hkvvb),
    Hksyn(Hksyn),
    Hkkaz(Hkkaz),
    Hisyn(Hisyn),
    Hibpa(Hibpa),
    Hitans(Hitans),
    Hikom(Hikom),
    Hipins(Hipins),
    Hiupa(Hiupa),
    Hiupd(Hiupd),
    Hikim(Hikim),
    Hikaz(Hikaz),
    /// Сегмент, известный только по заголовку; тело непрозрачно.
    Unknown(String),
}

/// Язык диалога (HKVVB).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Language {
    Default = 0,
    German = 1,
    English = 2,
    French = 3,
}

/// Режим синхронизации (HKSYN).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    NewSystemId = 0,
    LastMessageNumber = 1,
    SignatureId = 2,
}

/* --------------------------- запросы клиента ---------------------------- */

/// HKIDN — идентификация клиента.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hkidn {
    pub bank: BankRef,
    pub customer_id: String,
    pub system_id: String,
    pub system_id_required: u32,
}

impl Hkidn {
    pub const ID: &'static str = "HKIDN";
    pub const VERSION: u32 = 2;
}

/// HKVVB — параметры обработки: версии BPD/UPD, язык, продукт.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hkvvb {
    pub bpd_version: u32,
    pub upd_version: u32,
    pub dialog_language: Language,
    pub product_id: String,
    pub product_version: String,
}

impl Hkvvb {
    pub const ID: &'static str = "HKVVB";
    pub const VERSION: u32 = 3;
}

/// HKSYN — запрос синхронизации system id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hksyn {
    pub mode: SyncMode,
}

impl Hksyn {
    pub const ID: &'static str = "HKSYN";
    pub const VERSION: u32 = 3;
}

/// Национальная ссылка на счёт; IBAN в заказах не передаётся.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountRef {
    pub account_number: String,
    pub sub_account_id: Option<String>,
    pub bank: BankRef,
}

/// HKKAZ — запрос оборотов по счёту.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hkkaz {
    pub account: AccountRef,
    pub all_accounts: bool,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl Hkkaz {
    pub const ID: &'static str = "HKKAZ";
}

/* ---------------------------- ответы банка ------------------------------ */

/// HISYN — назначенный банком system id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hisyn {
    pub system_id: String,
}

impl Hisyn {
    pub const ID: &'static str = "HISYN";
}

/// HIBPA — общие параметры банка.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hibpa {
    pub bpd_version: u32,
    pub bank: BankRef,
    pub bank_name: String,
    pub max_transactions: u32,
    pub supported_languages: Vec<u32>,
    pub supported_hbci_versions: Vec<u32>,
}

impl Hibpa {
    pub const ID: &'static str = "HIBPA";
}

/// Запись о TAN-методе внутри HITANS.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitansTanMethod {
    pub sec_func: u32,
    pub method_name: String,
    /// Класс процедуры по каталогу ZKA; "Decoupled"/"DecoupledPush" — decoupled-методы.
    pub zka_method: Option<String>,
    pub active_tan_media: u32,
    pub tan_media_required: u32,
    pub decoupled_max_status_requests: Option<u32>,
    pub decoupled_wait_before_first_status_request: Option<u32>,
    pub decoupled_wait_between_status_requests: Option<u32>,
    pub decoupled_manual_confirmation_allowed: Option<bool>,
    pub decoupled_auto_confirmation_allowed: Option<bool>,
}

/// HITANS — параметры двухшаговой TAN-процедуры; в ответе может встречаться
/// несколько раз, по одному на версию процедуры.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hitans {
    pub tan_methods: Vec<HitansTanMethod>,
}

impl Hitans {
    pub const ID: &'static str = "HITANS";
}

/// HIKOM — коммуникационные параметры (адрес доступа).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hikom {
    pub address: String,
}

impl Hikom {
    pub const ID: &'static str = "HIKOM";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HipinsTransaction {
    pub trans_id: String,
    pub tan_required: bool,
}

/// HIPINS — допустимые в PIN/TAN-режиме деловые транзакции.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hipins {
    pub transactions: Vec<HipinsTransaction>,
}

impl Hipins {
    pub const ID: &'static str = "HIPINS";
}

/// HIUPA — заголовок пользовательских параметров.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hiupa {
    pub upd_version: u32,
    pub upd_usage: u32,
}

impl Hiupa {
    pub const ID: &'static str = "HIUPA";
}

/// HIUPD — один счёт из пользовательских параметров, сырые поля.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hiupd {
    pub account_number: String,
    pub sub_account_id: Option<String>,
    pub bank: BankRef,
    pub iban: Option<String>,
    pub customer_id: String,
    pub account_type: u32,
    pub currency: String,
    pub holder1: Option<String>,
    pub holder2: Option<String>,
    pub product: Option<String>,
    pub limit: Option<String>,
    pub allowed_transactions: Vec<Option<String>>,
}

impl Hiupd {
    pub const ID: &'static str = "HIUPD";
}

/// HIKIM — сообщение банка клиенту.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hikim {
    pub subject: String,
    pub text: String,
}

impl Hikim {
    pub const ID: &'static str = "HIKIM";
}

/// HIKAZ — обороты по счёту: MT940-текст одним полем.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hikaz {
    pub booked: String,
    pub unbooked: Option<String>,
}

impl Hikaz {
    pub const ID: &'static str = "HIKAZ";
}
