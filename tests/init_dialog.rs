use fintslib::{
    banking::{BankAnswer, BankRef},
    config::FintsConfig,
    error::FintsError,
    interaction::{ClientResponse, Interaction},
    interactions::init::{param_segment_name, InitDialogInteraction},
    message::Message,
    segment::{
        Hibpa, Hikim, Hikom, Hipins, HipinsTransaction, Hisyn, Hitans, HitansTanMethod, Hiupa,
        Hiupd, Segment, SegmentPayload,
    },
};

fn config() -> FintsConfig {
    let mut config = FintsConfig::new(280, "10070000", "https://old.example", "PROD", "1.0");
    config.customer_id = Some("CUST1".into());
    config.user_id = Some("USER1".into());
    config
}

fn tan_method(sec_func: u32, name: &str, zka_method: Option<&str>) -> HitansTanMethod {
    HitansTanMethod {
        sec_func,
        method_name: name.into(),
        zka_method: zka_method.map(Into::into),
        active_tan_media: 1,
        tan_media_required: 2,
        decoupled_max_status_requests: None,
        decoupled_wait_before_first_status_request: None,
        decoupled_wait_between_status_requests: None,
        decoupled_manual_confirmation_allowed: None,
        decoupled_auto_confirmation_allowed: None,
    }
}

fn hibpa() -> Segment {
    Segment::new(
        Hibpa::ID,
        3,
        SegmentPayload::Hibpa(Hibpa {
            bpd_version: 17,
            bank: BankRef {
                country: 280,
                bank_id: "10070000".into(),
            },
            bank_name: "Testbank".into(),
            max_transactions: 4,
            supported_languages: vec![1],
            supported_hbci_versions: vec![300],
        }),
    )
}

/// Ответ инициализации: BPA, два TAN-метода (один decoupled), адрес без
/// схемы, HIPINS с HKSAL и два параметрических сегмента HISALS (v5, v7).
fn init_response() -> Message {
    let decoupled = HitansTanMethod {
        decoupled_max_status_requests: Some(10),
        decoupled_wait_before_first_status_request: Some(5),
        decoupled_wait_between_status_requests: Some(2),
        decoupled_manual_confirmation_allowed: Some(true),
        ..tan_method(922, "pushTAN 2.0", Some("Decoupled"))
    };

    Message::new(vec![
        hibpa(),
        Segment::new(
            Hitans::ID,
            7,
            SegmentPayload::Hitans(Hitans {
                tan_methods: vec![decoupled, tan_method(910, "chipTAN", Some("HHD1.4"))],
            }),
        ),
        Segment::new(
            Hikom::ID,
            4,
            SegmentPayload::Hikom(Hikom {
                address: "example.bank.de".into(),
            }),
        ),
        Segment::new(
            Hipins::ID,
            1,
            SegmentPayload::Hipins(Hipins {
                transactions: vec![
                    HipinsTransaction {
                        trans_id: "HKSAL".into(),
                        tan_required: true,
                    },
                    HipinsTransaction {
                        trans_id: "HKKAZ".into(),
                        tan_required: true,
                    },
                ],
            }),
        ),
        Segment::new("HISALS", 5, SegmentPayload::Unknown("raw".into())),
        Segment::new("HISALS", 7, SegmentPayload::Unknown("raw".into())),
    ])
}

#[test]
fn negotiates_bank_parameter_data() {
    let mut config = config();
    let interaction = Interaction::InitDialog(InitDialogInteraction::new(false));
    let mut client_response = ClientResponse::new(vec![]);
    interaction
        .consume_response(&mut config, &init_response(), &mut client_response)
        .expect("consume init response");

    let bpd = config.banking_information.bpd.as_ref().expect("bpd");
    assert_eq!(bpd.version, 17);
    assert_eq!(bpd.bank_name, "Testbank");
    // адрес без схемы получает https://
    assert_eq!(bpd.url, "https://example.bank.de");

    assert_eq!(bpd.supported_tan_methods.len(), 2);
    assert_eq!(
        bpd.supported_tan_methods
            .iter()
            .filter(|m| m.is_decoupled)
            .count(),
        1
    );
    let decoupled = bpd
        .supported_tan_methods
        .iter()
        .find(|m| m.is_decoupled)
        .unwrap();
    let params = decoupled.decoupled.as_ref().expect("decoupled params");
    assert_eq!(params.max_status_requests, 10);
    assert!(params.manual_confirmation_allowed);
    // отсутствующий флаг подтверждения трактуется как false
    assert!(!params.auto_confirmation_allowed);
    let classic = bpd
        .supported_tan_methods
        .iter()
        .find(|m| !m.is_decoupled)
        .unwrap();
    assert!(classic.decoupled.is_none());

    // по одному вхождению параметрического сегмента на версию, в порядке
    // обнаружения
    let hksal = bpd
        .allowed_transactions
        .iter()
        .find(|t| t.trans_id == "HKSAL")
        .unwrap();
    assert_eq!(hksal.versions, vec![5, 7]);
    let hkkaz = bpd
        .allowed_transactions
        .iter()
        .find(|t| t.trans_id == "HKKAZ")
        .unwrap();
    assert!(hkkaz.versions.is_empty());

    assert!(client_response.banking_information_updated);
    assert!(client_response.banking_information.is_some());
}

#[test]
fn decoupled_classification_truth_table() {
    let with_param = HitansTanMethod {
        decoupled_wait_between_status_requests: Some(2),
        ..tan_method(930, "appTAN", None)
    };
    let message = Message::new(vec![
        hibpa(),
        Segment::new(
            Hitans::ID,
            6,
            SegmentPayload::Hitans(Hitans {
                tan_methods: vec![
                    tan_method(921, "pushTAN", Some("Decoupled")),
                    tan_method(922, "pushTAN push", Some("DecoupledPush")),
                    with_param,
                    tan_method(910, "chipTAN", None),
                ],
            }),
        ),
        Segment::new(
            Hipins::ID,
            1,
            SegmentPayload::Hipins(Hipins {
                transactions: vec![],
            }),
        ),
    ]);

    let mut config = config();
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &message, &mut ClientResponse::new(vec![]))
        .expect("consume");

    let methods = &config.banking_information.bpd.as_ref().unwrap().supported_tan_methods;
    let flags: Vec<bool> = methods.iter().map(|m| m.is_decoupled).collect();
    assert_eq!(flags, vec![true, true, true, false]);
    // инвариант: параметры decoupled есть ровно у decoupled-методов
    for m in methods {
        assert_eq!(m.decoupled.is_some(), m.is_decoupled);
    }
}

#[test]
fn missing_hipins_is_fatal_and_state_untouched() {
    let mut config = config();
    let message = Message::new(vec![
        hibpa(),
        Segment::new(
            Hisyn::ID,
            4,
            SegmentPayload::Hisyn(Hisyn {
                system_id: "FRESH-ID".into(),
            }),
        ),
    ]);

    let snapshot = config.banking_information.clone();
    let err = InitDialogInteraction::new(false)
        .consume_response(&mut config, &message, &mut ClientResponse::new(vec![]))
        .unwrap_err();

    assert!(matches!(err, FintsError::Negotiation(_)));
    // даже system id из HISYN не применяется при сорванных переговорах
    assert_eq!(config.banking_information, snapshot);
}

#[test]
fn adopts_assigned_system_id() {
    let mut config = config();
    let message = Message::new(vec![Segment::new(
        Hisyn::ID,
        4,
        SegmentPayload::Hisyn(Hisyn {
            system_id: "FRESH-ID".into(),
        }),
    )]);

    let mut client_response = ClientResponse::new(vec![]);
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &message, &mut client_response)
        .expect("consume");

    assert_eq!(config.banking_information.system_id, "FRESH-ID");
    assert!(client_response.banking_information_updated);
}

#[test]
fn answer_3920_overwrites_available_tan_methods() {
    let mut config = config();
    let mut client_response = ClientResponse::new(vec![BankAnswer {
        code: 3920,
        params: Some(vec!["900".into(), "930".into()]),
    }]);
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &init_response(), &mut client_response)
        .expect("consume");

    assert_eq!(
        config.banking_information.bpd.as_ref().unwrap().available_tan_method_ids,
        vec![900, 930]
    );
}

#[test]
fn answer_3920_updates_bpd_kept_from_earlier_round() {
    let mut config = config();
    // BPD согласован в прошлой сессии; этот ответ его не обновляет
    InitDialogInteraction::new(false)
        .consume_response(
            &mut config,
            &init_response(),
            &mut ClientResponse::new(vec![]),
        )
        .expect("first round");

    let mut client_response = ClientResponse::new(vec![BankAnswer {
        code: 3920,
        params: Some(vec!["922".into()]),
    }]);
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &Message::default(), &mut client_response)
        .expect("second round");

    assert_eq!(
        config.banking_information.bpd.as_ref().unwrap().available_tan_method_ids,
        vec![922]
    );
}

#[test]
fn repeat_of_identical_parameters_is_not_an_update() {
    let mut config = config();
    let response = init_response();

    let mut first = ClientResponse::new(vec![]);
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &response, &mut first)
        .expect("first consume");
    assert!(first.banking_information_updated);

    let mut second = ClientResponse::new(vec![]);
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &response, &mut second)
        .expect("second consume");
    assert!(!second.banking_information_updated);
}

#[test]
fn collects_user_parameter_data_and_bank_messages() {
    let account = Hiupd {
        account_number: "1234567".into(),
        sub_account_id: None,
        bank: BankRef {
            country: 280,
            bank_id: "10070000".into(),
        },
        iban: Some("DE021007000001234567".into()),
        customer_id: "CUST1".into(),
        account_type: 1,
        currency: "EUR".into(),
        holder1: Some("MUSTERMANN, MAX".into()),
        holder2: None,
        product: Some("Girokonto".into()),
        limit: None,
        allowed_transactions: vec![Some("HKKAZ".into()), None, Some("HKSAL".into())],
    };
    let depot = Hiupd {
        account_number: "7654321".into(),
        account_type: 30,
        allowed_transactions: vec![],
        ..account.clone()
    };
    let message = Message::new(vec![
        Segment::new(
            Hiupa::ID,
            4,
            SegmentPayload::Hiupa(Hiupa {
                upd_version: 3,
                upd_usage: 0,
            }),
        ),
        Segment::new(Hiupd::ID, 6, SegmentPayload::Hiupd(account)),
        Segment::new(Hiupd::ID, 6, SegmentPayload::Hiupd(depot)),
        Segment::new(
            Hikim::ID,
            2,
            SegmentPayload::Hikim(Hikim {
                subject: "Wartung".into(),
                text: "Am Sonntag nicht erreichbar.".into(),
            }),
        ),
    ]);

    let mut config = config();
    InitDialogInteraction::new(false)
        .consume_response(&mut config, &message, &mut ClientResponse::new(vec![]))
        .expect("consume");

    let upd = config.banking_information.upd.as_ref().expect("upd");
    assert_eq!(upd.version, 3);
    assert_eq!(upd.bank_accounts.len(), 2);
    // null-значения в списке транзакций отброшены
    assert_eq!(upd.bank_accounts[0].allowed_transactions, vec!["HKKAZ", "HKSAL"]);
    assert_eq!(
        upd.bank_accounts[0].account_type,
        fintslib::banking::AccountType::Checking
    );
    assert_eq!(
        upd.bank_accounts[1].account_type,
        fintslib::banking::AccountType::Securities
    );

    assert_eq!(config.banking_information.bank_messages.len(), 1);
    assert_eq!(config.banking_information.bank_messages[0].subject, "Wartung");
}

#[test]
fn sync_segment_only_when_requested_and_unassigned() {
    let config = config();

    let segments = InitDialogInteraction::new(true)
        .build_request(&config)
        .expect("build");
    assert_eq!(segments.len(), 3);
    assert_eq!(segments[0].header.seg_id, "HKIDN");
    assert_eq!(segments[1].header.seg_id, "HKVVB");
    assert_eq!(segments[2].header.seg_id, "HKSYN");

    // без запроса синхронизации
    let segments = InitDialogInteraction::new(false)
        .build_request(&config)
        .expect("build");
    assert_eq!(segments.len(), 2);

    // system id уже назначен
    let mut assigned = config.clone();
    assigned.banking_information.system_id = "ABC123".into();
    let segments = InitDialogInteraction::new(true)
        .build_request(&assigned)
        .expect("build");
    assert_eq!(segments.len(), 2);

    // нет user id
    let mut anonymous = config.clone();
    anonymous.user_id = None;
    let segments = InitDialogInteraction::new(true)
        .build_request(&anonymous)
        .expect("build");
    assert_eq!(segments.len(), 2);
}

#[test]
fn hkidn_falls_back_to_user_id() {
    let mut config = config();
    config.customer_id = None;

    let segments = InitDialogInteraction::new(false)
        .build_request(&config)
        .expect("build");
    match &segments[0].payload {
        SegmentPayload::Hkidn(hkidn) => {
            assert_eq!(hkidn.customer_id, "USER1");
            assert_eq!(hkidn.system_id_required, 1);
        }
        other => panic!("HKIDN expected, got {other:?}"),
    }
}

#[test]
fn param_segment_naming() {
    assert_eq!(param_segment_name("HKSAL").as_deref(), Some("HISALS"));
    assert_eq!(param_segment_name("HKKAZ").as_deref(), Some("HIKAZS"));
    assert_eq!(param_segment_name("DKZDF").as_deref(), Some("HIZDFS"));
    assert_eq!(param_segment_name("XYSAL"), None);
    assert_eq!(param_segment_name(""), None);
}

#[test]
fn lookup_distinguishes_typed_and_unknown_segments() {
    let message = init_response();
    // HISALS известен только по заголовку
    assert!(message.find_segment("HISALS").is_none());
    assert_eq!(message.find_all_unknown_segments("HISALS").len(), 2);
    assert_eq!(message.find_all_segments("HITANS").len(), 1);
    assert!(message.find_all_unknown_segments("HITANS").is_empty());
}
