use dashboard_search_state::CodecConfig;
use dashboard_search_state::Dictionaries;
use dashboard_search_state::DictionaryGroup;
use dashboard_search_state::SearchCodec;
use dashboard_search_state::SearchFormat;
use dashboard_search_state::SearchState;
use dashboard_search_state::is_encoded_json_array_param;
use dashboard_search_state::minify_params;
use dashboard_search_state::parse_search;
use dashboard_search_state::standard_codec;
use dashboard_search_state::stringify_search;
use dashboard_search_state::unminify_params;
use pretty_assertions::assert_eq;
use serde_json::Value;
use serde_json::json;

fn state(value: Value) -> SearchState {
    SearchState::try_from(value).expect("test fixture should be a valid search state")
}

fn base() -> Value {
    json!({
        "origin": "maestro",
        "intervalInDays": 7,
        "tableFilter": {
            "bootsTable": "all",
            "buildsTable": "failed",
            "testsTable": "all",
        },
        "treeInfo": {
            "treeName": "android",
            "gitCommitHash": "hash",
        },
        "diffFilter": {
            "configs": { "defconfig": true },
            "archs": { "arm": true },
            "testPath": "amlogic",
        },
        "treeIndexes": [0, 1, 2],
    })
}

#[test_log::test]
fn flat_state_round_trips() {
    let original = state(json!({
        "origin": "maestro",
        "intervalInDays": 7,
        "treeIndexes": [1, 2, 3],
    }));

    let query = stringify_search(&original);
    assert_eq!(query, "?origin=maestro&intervalInDays=7&treeIndexes[]=1,2,3");
    assert_eq!(parse_search(&query), original);
}

#[test_log::test]
fn nested_state_round_trips() {
    let original = state(base());
    let query = stringify_search(&original);

    for fragment in [
        "tableFilter|bootsTable=all&tableFilter|buildsTable=failed&tableFilter|testsTable=all",
        "treeInfo|treeName=android&treeInfo|gitCommitHash=hash",
        "diffFilter|configs|defconfig=true&diffFilter|archs|arm=true&diffFilter|testPath=amlogic",
        "treeIndexes[]=0,1,2",
    ] {
        assert!(query.contains(fragment), "{query} should contain {fragment}");
    }
    assert_eq!(parse_search(&query), original);
}

#[test]
fn empty_array_is_preserved() {
    let mut value = base();
    value["treeIndexes"] = json!([]);
    let original = state(value);

    let query = stringify_search(&original);
    assert!(query.ends_with("&treeIndexes[]"), "{query}");

    let parsed = parse_search(&query);
    assert_eq!(parsed.get("treeIndexes"), original.get("treeIndexes"));
    assert_eq!(parsed, original);
}

#[test]
fn legacy_json_links_still_parse() {
    let legacy = "treeIndexes=%5B1%2C2%2C3%5D";
    assert!(is_encoded_json_array_param(legacy));
    assert_eq!(standard_codec().detect(legacy), SearchFormat::LegacyJson);
    assert_eq!(parse_search(legacy), state(json!({ "treeIndexes": [1, 2, 3] })));
}

#[test]
fn legacy_json_objects_still_parse() {
    let legacy = "?origin=%22maestro%22&intervalInDays=7\
                  &tableFilter=%7B%22bootsTable%22%3A%22all%22%2C%22testsTable%22%3A%22failed%22%7D\
                  &diffFilter=%7B%22archs%22%3A%7B%22arm%22%3Atrue%7D%7D\
                  &treeIndexes=%5B%5D";
    assert_eq!(standard_codec().detect(legacy), SearchFormat::LegacyJson);
    assert_eq!(
        parse_search(legacy),
        state(json!({
            "origin": "maestro",
            "intervalInDays": 7,
            "tableFilter": { "bootsTable": "all", "testsTable": "failed" },
            "diffFilter": { "archs": { "arm": true } },
            "treeIndexes": [],
        }))
    );
}

#[test]
fn legacy_links_with_short_codes_are_unminified() {
    let legacy = "p=%22gbt%22&treeInfo=%7B%22gb%22%3A%22master%22%7D";
    assert_eq!(
        parse_search(legacy),
        state(json!({
            "currentPageTab": "global.boots",
            "treeInfo": { "gitBranch": "master" },
        }))
    );
}

#[test]
fn bracket_suffixed_arrays_are_current_format() {
    for query in ["treeIndexes[]=1,2,3", "treeIndexes%5B%5D=1%2C2%2C3"] {
        assert!(!is_encoded_json_array_param(query), "{query}");
        assert_eq!(standard_codec().detect(query), SearchFormat::Current);
        assert_eq!(parse_search(query), state(json!({ "treeIndexes": [1, 2, 3] })));
    }
}

#[test]
fn separator_takes_precedence_in_detection() {
    let query = stringify_search(&state(base()));
    assert!(query.contains("diffFilter|"));
    assert!(query.contains("treeIndexes[]="));
    assert_eq!(standard_codec().detect(&query), SearchFormat::Current);

    let with_brace = format!("{query}&note=%7Bopen");
    assert_eq!(standard_codec().detect(&with_brace), SearchFormat::Current);
}

#[test]
fn uri_encoded_current_format_parses() {
    let encoded = "?origin=maestro&tableFilter%7CbootsTable=all&treeIndexes%5B%5D=0%2C1";
    assert_eq!(
        parse_search(encoded),
        state(json!({
            "origin": "maestro",
            "tableFilter": { "bootsTable": "all" },
            "treeIndexes": [0, 1],
        }))
    );
}

#[test]
fn unknown_keys_pass_through_both_directions() {
    let dictionaries = Dictionaries::standard();
    let original = state(json!({
        "brandNewKey": "brandNewValue",
        "treeInfo": { "brandNewTreeKey": 3 },
        "diffFilter": { "brandNewFilter": { "x": true } },
    }));

    let minified = minify_params(&original, &dictionaries);
    assert_eq!(minified, original);
    assert_eq!(
        unminify_params(&minified, DictionaryGroup::General, &dictionaries),
        original
    );
    assert_eq!(parse_search(&stringify_search(&original)).get("brandNewKey"), original.get("brandNewKey"));
}

#[test]
fn free_text_equal_to_short_codes_round_trips() {
    for text in ["a", "f", "gb", "n", "gbt"] {
        let original = state(json!({ "treeSearch": text, "hardwareSearch": text }));
        let query = stringify_search(&original);
        assert_eq!(query, format!("?ts={text}&hs={text}"));
        assert_eq!(parse_search(&query), original);
    }
}

#[test]
fn page_tab_values_are_shortened() {
    let original = state(json!({ "currentPageTab": "global.builds", "treeSearch": "global.builds" }));
    let query = stringify_search(&original);
    assert_eq!(query, "?p=gb&ts=global.builds");
    assert_eq!(parse_search(&query), original);
}

#[test]
fn untyped_scalars_come_back_as_strings() {
    let original = state(json!({ "page": 3, "open": true }));
    let parsed = parse_search(&stringify_search(&original));
    assert_eq!(parsed, state(json!({ "page": "3", "open": "true" })));
}

#[test]
fn strings_with_reserved_characters_round_trip() {
    let original = state(json!({
        "treeSearch": "linux-next & stable = 50% + more",
        "hardwareSearch": "ünïcode/ü?#",
        "origin": "",
    }));
    let query = stringify_search(&original);
    assert!(query.starts_with("?ts=linux-next%20%26%20stable"), "{query}");
    assert_eq!(parse_search(&query), original);
}

#[test]
fn verbatim_codec_round_trips_nested_state() {
    let codec = SearchCodec::new(CodecConfig::verbatim()).expect("verbatim config is valid");
    let original = state(json!({
        "currentPageTab": "global.tests",
        "endTimestampInSeconds": 1700003600,
        "diffFilter": { "hardware": { "rk3399-gru-kevin": true } },
    }));
    let query = codec.stringify(&original);
    assert_eq!(
        query,
        "?currentPageTab=global.tests&endTimestampInSeconds=1700003600\
         &diffFilter|hardware|rk3399-gru-kevin=true"
    );
    assert_eq!(codec.parse(&query), original);
}

#[test]
fn empty_nested_records_are_dropped() {
    let original = state(json!({ "origin": "maestro", "diffFilter": {} }));
    let query = stringify_search(&original);
    assert_eq!(query, "?origin=maestro");
    assert_eq!(parse_search(&query), state(json!({ "origin": "maestro" })));
}
