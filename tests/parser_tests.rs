use conn_doctor::parser::{is_data_line, parse_record, FieldType, LogSchema, Proto};
use conn_doctor::utils::{ParseError, SchemaError};

/// Header of a cluster conn.log, with the full production field set
fn zeek_header() -> Vec<String> {
    vec![
        "#separator \\x09".to_string(),
        "#set_separator\t,".to_string(),
        "#empty_field\t(empty)".to_string(),
        "#unset_field\t-".to_string(),
        "#path\tconn".to_string(),
        "#open\t2024-05-01-00-00-00".to_string(),
        "#fields\tts\tuid\tid.orig_h\tid.orig_p\tid.resp_h\tid.resp_p\tproto\tservice\tduration\torig_bytes\tresp_bytes\tconn_state\tlocal_orig\tlocal_resp\tmissed_bytes\thistory\torig_pkts\torig_ip_bytes\tresp_pkts\tresp_ip_bytes\ttunnel_parents\tpeer".to_string(),
        "#types\ttime\tstring\taddr\tport\taddr\tport\tenum\tstring\tinterval\tcount\tcount\tstring\tbool\tbool\tcount\tstring\tcount\tcount\tcount\tcount\tset[string]\tstring".to_string(),
    ]
}

fn sample_line() -> String {
    [
        "1715000000.123456",
        "CAbCdE1FgHiJ2kLmN3",
        "192.168.1.50",
        "52044",
        "192.168.1.9",
        "443",
        "tcp",
        "ssl",
        "1.532",
        "1024",
        "8192",
        "SF",
        "T",
        "T",
        "0",
        "ShADadfF",
        "10",
        "1540",
        "12",
        "9060",
        "(empty)",
        "worker-eth2-7",
    ]
    .join("\t")
}

#[test]
fn test_resolve_production_header() {
    let schema = LogSchema::from_header(&zeek_header()).unwrap();

    assert_eq!(schema.separator, '\t');
    assert_eq!(schema.set_separator, ",");
    assert_eq!(schema.empty_field, "(empty)");
    assert_eq!(schema.unset_field, "-");
    assert_eq!(schema.path.as_deref(), Some("conn"));
    assert_eq!(schema.field_count(), 22);

    assert_eq!(schema.index_of("ts"), Some(0));
    assert_eq!(schema.index_of("history"), Some(15));
    assert_eq!(schema.index_of("peer"), Some(21));
    assert_eq!(schema.index_of("no_such_field"), None);

    assert_eq!(schema.type_of("ts"), Some(FieldType::Time));
    assert_eq!(schema.type_of("history"), Some(FieldType::Str));
    assert_eq!(schema.type_of("local_orig"), Some(FieldType::Bool));
    assert_eq!(schema.type_of("tunnel_parents"), Some(FieldType::Set));
}

#[test]
fn test_empty_header_is_rejected() {
    let lines: Vec<String> = vec![];
    let err = LogSchema::from_header(&lines).unwrap_err();
    assert!(matches!(err, SchemaError::MissingHeader));
}

#[test]
fn test_missing_fields_directive_is_rejected() {
    let lines = vec!["#separator \\x09", "#types\ttime\tstring"];
    let err = LogSchema::from_header(&lines).unwrap_err();
    assert!(matches!(err, SchemaError::MissingFields));
}

#[test]
fn test_missing_types_directive_is_rejected() {
    let lines = vec!["#separator \\x09", "#fields\tts\tuid"];
    let err = LogSchema::from_header(&lines).unwrap_err();
    assert!(matches!(err, SchemaError::MissingTypes));
}

#[test]
fn test_mismatched_fields_and_types_are_rejected() {
    let lines = vec!["#fields\tts\tuid\thistory", "#types\ttime\tstring"];
    let err = LogSchema::from_header(&lines).unwrap_err();
    assert!(matches!(
        err,
        SchemaError::FieldTypeMismatch { fields: 3, types: 2 }
    ));
}

#[test]
fn test_parse_production_record() {
    let schema = LogSchema::from_header(&zeek_header()).unwrap();
    let conn = parse_record(&sample_line(), &schema).unwrap();

    assert_eq!(conn.ts, Some(1715000000.123456));
    assert_eq!(conn.uid.as_deref(), Some("CAbCdE1FgHiJ2kLmN3"));
    assert_eq!(conn.orig_h, "192.168.1.50");
    assert_eq!(conn.orig_p, Some(52044));
    assert_eq!(conn.resp_h, "192.168.1.9");
    assert_eq!(conn.resp_p, Some(443));
    assert_eq!(conn.proto, Proto::Tcp);
    assert_eq!(conn.service.as_deref(), Some("ssl"));
    assert_eq!(conn.duration, Some(1.532));
    assert_eq!(conn.local_orig, Some(true));
    assert_eq!(conn.local_resp, Some(true));
    assert_eq!(conn.history, "ShADadfF");
    assert_eq!(conn.conn_state.as_deref(), Some("SF"));
    assert_eq!(conn.tunnel_parents, Some(Vec::new()));

    // Cluster peer name yields capture node and worker process
    assert_eq!(conn.node.as_deref(), Some("eth2"));
    assert_eq!(conn.sensor_process.as_deref(), Some("7"));
}

#[test]
fn test_unset_sentinels_parse_as_unknown() {
    let schema = LogSchema::from_header(&zeek_header()).unwrap();
    let line = sample_line()
        .replace("\tT\tT\t", "\t-\t-\t")
        .replace("\tShADadfF\t", "\t-\t")
        .replace("\tworker-eth2-7", "\t-");
    let conn = parse_record(&line, &schema).unwrap();

    assert_eq!(conn.local_orig, None);
    assert_eq!(conn.local_resp, None);
    assert_eq!(conn.history, "");
    assert_eq!(conn.node, None);
    assert_eq!(conn.sensor_process, None);
}

#[test]
fn test_short_line_reports_column_count() {
    let schema = LogSchema::from_header(&zeek_header()).unwrap();
    let err = parse_record("too\tfew\tcolumns", &schema).unwrap_err();

    assert!(matches!(
        err,
        ParseError::ColumnCount {
            expected: 22,
            found: 3
        }
    ));
}

#[test]
fn test_malformed_token_names_the_field() {
    let schema = LogSchema::from_header(&zeek_header()).unwrap();
    let line = sample_line().replace("\t52044\t", "\tnot-a-port\t");
    let err = parse_record(&line, &schema).unwrap_err();

    match err {
        ParseError::InvalidValue { field, kind, value } => {
            assert_eq!(field, "id.orig_p");
            assert_eq!(kind, "port");
            assert_eq!(value, "not-a-port");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn test_data_line_detection() {
    assert!(is_data_line(&sample_line()));
    assert!(!is_data_line("#close\t2024-05-01-23-59-59"));
    assert!(!is_data_line(""));
    assert!(!is_data_line("  \t "));
}
