use proptest::prelude::*;
use wire_error::{Code, Error, decode, encode};

fn code_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        prop::sample::select(Code::ALL.to_vec()).prop_map(|code| code.as_str().to_string()),
        "[a-z][a-z0-9-]{0,15}",
        Just(String::new()),
    ]
}

fn error_strategy() -> impl Strategy<Value = Error> {
    (
        "\\PC{0,40}",
        "\\PC{0,20}",
        any::<i32>(),
        code_strategy(),
        prop::option::of("[0-9a-f-]{0,36}"),
        prop::option::of("\\PC{1,20}"),
        prop::option::of("\\PC{1,20}"),
    )
        .prop_map(|(description, debug, class, code, request_id, detail, root)| {
            let base = match root {
                Some(root) => Error::wrap(std::io::Error::other(root), class, code.as_str()),
                None => Error::new(class, code.as_str(), description),
            };
            let err = match detail {
                Some(detail) => Error::wrapf(base, 0, "", format_args!("{detail}")),
                None => base,
            };
            let err = err.with_debug(debug);
            match request_id {
                Some(id) => err.with_request_id(id),
                None => err,
            }
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decode_inverts_encode(err in error_strategy()) {
        let wire = encode(&err);
        prop_assert!(wire.starts_with("#ERR "));
        prop_assert_eq!(decode(&wire), err.clone());
        prop_assert_eq!(wire.parse::<Error>().ok(), Some(err));
    }

    #[test]
    fn plain_text_decodes_to_an_unknown_error(text in "[^#]\\PC{0,60}") {
        let err = decode(&text);
        prop_assert_eq!(err.class(), 500);
        prop_assert_eq!(err.code(), "unknown");
        prop_assert_eq!(err.description(), text.as_str());
    }
}
