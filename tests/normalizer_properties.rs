use proptest::prelude::*;

use channel_reconciler::pipeline::stages::AddressNormalizer;
use channel_reconciler::pipeline::stages::normalization::DEFAULT_VOLATILE_PARAMS;

fn stream_url() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("http"), Just("https"), Just("HTTP")],
        "[a-zA-Z][a-zA-Z0-9-]{0,10}\\.(com|net|example)",
        proptest::option::of(1024u16..65535),
        "(/[a-zA-Z0-9._%-]{0,8}){0,3}",
        proptest::collection::vec(("[a-zA-Z_]{1,6}", "[a-zA-Z0-9%+ ]{0,6}"), 0..5),
    )
        .prop_map(|(scheme, host, port, path, params)| {
            let mut url = format!("{scheme}://{host}");
            if let Some(port) = port {
                url.push_str(&format!(":{port}"));
            }
            url.push_str(&path);
            if !params.is_empty() {
                let query: Vec<String> = params.iter().map(|(k, v)| format!("{k}={v}")).collect();
                url.push('?');
                url.push_str(&query.join("&"));
            }
            url
        })
}

proptest! {
    #[test]
    fn normalize_is_idempotent_for_urls(url in stream_url()) {
        let normalizer = AddressNormalizer::new();
        let once = normalizer.normalize(&url);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_for_arbitrary_text(text in "[a-zA-Z0-9:/?&=.%# _-]{0,40}") {
        let normalizer = AddressNormalizer::new();
        let once = normalizer.normalize(&text);
        prop_assert_eq!(normalizer.normalize(&once), once);
    }

    #[test]
    fn volatile_parameters_never_change_the_key(
        url in stream_url(),
        param in proptest::sample::select(DEFAULT_VOLATILE_PARAMS),
        value in "[a-zA-Z0-9]{1,12}",
    ) {
        let normalizer = AddressNormalizer::new();
        let separator = if url.contains('?') { '&' } else { '?' };
        let with_token = format!("{url}{separator}{param}={value}");
        prop_assert_eq!(normalizer.normalize(&with_token), normalizer.normalize(&url));
    }
}
