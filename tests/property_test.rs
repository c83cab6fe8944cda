use actix_web_csp_nonce::{utils::replace_all_into, CspConfig, CspTemplate, NONCE_PLACEHOLDER};
use bytes::BytesMut;
use proptest::prelude::*;

proptest! {
    #[test]
    fn static_template_header_is_trimmed_template(
        lead in "[ \t]{0,3}",
        body in "[a-z][a-z' :;.*-]{0,40}[a-z]",
        trail in "[ \t\n]{0,3}",
    ) {
        let raw = format!("{}{}{}", lead, body, trail);
        let config = CspConfig::new(raw.as_str()).unwrap();

        prop_assert!(!config.requires_buffering());
        prop_assert_eq!(
            config.static_header_value().unwrap().to_str().unwrap(),
            body.as_str()
        );
    }

    #[test]
    fn rendered_template_has_no_placeholder(
        prefix in "[a-z' -]{0,20}",
        suffix in "[a-z' ;-]{0,20}",
        nonce in "[A-Za-z0-9+/]{22}",
    ) {
        let template = CspTemplate::new(format!("{}{}{}", prefix, NONCE_PLACEHOLDER, suffix));
        let rendered = template.render(&nonce);

        prop_assert!(template.requires_nonce());
        prop_assert!(!rendered.contains(NONCE_PLACEHOLDER));
        let expected = format!("'nonce-{}'", nonce);
        prop_assert!(rendered.contains(&expected));
    }

    #[test]
    fn byte_replacement_matches_str_replace(
        parts in proptest::collection::vec("[a-z<>\"{} =]{0,12}", 0..6),
        replacement in "[A-Za-z0-9+/]{22}",
    ) {
        let haystack = parts.join(NONCE_PLACEHOLDER);

        let mut out = BytesMut::new();
        replace_all_into(
            &mut out,
            haystack.as_bytes(),
            NONCE_PLACEHOLDER.as_bytes(),
            replacement.as_bytes(),
        );

        let expected = haystack.replace(NONCE_PLACEHOLDER, &replacement);
        prop_assert_eq!(&out[..], expected.as_bytes());
    }
}
