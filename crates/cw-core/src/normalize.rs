//! Raw message → canonical message
//!
//! Markup stripping is an ordered table of regex rules. Each rule only removes
//! the tag itself, never the text it wraps.

use std::sync::LazyLock;

use regex::Regex;

use crate::time::to_iso;
use crate::types::{CanonicalMessage, RawMessage};

/// One tag family and how to rewrite it
#[derive(Debug, Clone, Copy)]
pub struct StripRule {
    pub name: &'static str,
    pub pattern: &'static str,
    pub replacement: &'static str,
}

/// Applied in order.
pub const STRIP_RULES: &[StripRule] = &[
    StripRule {
        name: "to",
        pattern: r"\[To:\d+\]",
        replacement: "",
    },
    StripRule {
        name: "reply",
        pattern: r"\[rp aid=\d+ to=\d+-\d+\]",
        replacement: "",
    },
    StripRule {
        name: "info",
        pattern: r"\[/?info\]",
        replacement: "",
    },
    StripRule {
        name: "title",
        pattern: r"\[/?title\]",
        replacement: "",
    },
    StripRule {
        name: "code",
        pattern: r"\[/?code\]",
        replacement: "",
    },
    StripRule {
        name: "quote",
        pattern: r"\[qt\]|\[qtmeta[^\]]*\]|\[/qt\]",
        replacement: "",
    },
];

static COMPILED_RULES: LazyLock<Vec<(StripRule, Regex)>> = LazyLock::new(|| {
    STRIP_RULES
        .iter()
        .map(|rule| {
            let re = Regex::new(rule.pattern).expect("strip rule patterns are valid regexes");
            (*rule, re)
        })
        .collect()
});

/// Remove every known markup tag and trim the result.
pub fn strip_tags(body: &str) -> String {
    let mut text = body.to_string();
    for (rule, re) in COMPILED_RULES.iter() {
        text = re.replace_all(&text, rule.replacement).into_owned();
    }
    text.trim().to_string()
}

/// Build the canonical form of one raw message.
pub fn normalize(room_id: &str, raw: &RawMessage, strip: bool) -> CanonicalMessage {
    let body = if strip {
        strip_tags(&raw.body)
    } else {
        raw.body.clone()
    };
    // unrepresentable times are treated like a missing one
    let send_time_iso = to_iso(raw.send_time.max(0));
    let send_time_unix = if send_time_iso.is_some() { raw.send_time } else { 0 };

    CanonicalMessage {
        room_id: room_id.to_string(),
        message_id: raw.message_id.clone(),
        send_time_unix,
        send_time_iso,
        account_id: raw.account.as_ref().and_then(|a| a.account_id),
        account_name: raw.account.as_ref().and_then(|a| a.name.clone()),
        body,
        raw_body: raw.body.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RawAccount;

    fn raw(body: &str, send_time: i64) -> RawMessage {
        RawMessage {
            message_id: "99".to_string(),
            account: Some(RawAccount {
                account_id: Some(7),
                name: Some("Alice".to_string()),
                avatar_image_url: None,
            }),
            body: body.to_string(),
            send_time,
            update_time: 0,
        }
    }

    fn apply(rule_name: &str, input: &str) -> String {
        let (rule, re) = COMPILED_RULES
            .iter()
            .find(|(rule, _)| rule.name == rule_name)
            .unwrap();
        re.replace_all(input, rule.replacement).into_owned()
    }

    #[test]
    fn test_rule_table_compiles() {
        assert_eq!(COMPILED_RULES.len(), STRIP_RULES.len());
    }

    #[test]
    fn test_to_rule() {
        assert_eq!(apply("to", "[To:123]Bob [To:456]Carol"), "Bob Carol");
        assert_eq!(apply("to", "[To:abc]"), "[To:abc]");
    }

    #[test]
    fn test_reply_rule() {
        assert_eq!(apply("reply", "[rp aid=1 to=2-3]ok"), "ok");
        assert_eq!(apply("reply", "[rp aid=1]ok"), "[rp aid=1]ok");
    }

    #[test]
    fn test_block_rules() {
        assert_eq!(apply("info", "[info]x[/info]"), "x");
        assert_eq!(apply("title", "[title]t[/title]"), "t");
        assert_eq!(apply("code", "[code]let a = 1;[/code]"), "let a = 1;");
        assert_eq!(
            apply("quote", "[qt][qtmeta aid=1 time=1700000000]quoted[/qt]"),
            "quoted"
        );
    }

    #[test]
    fn test_strip_tags_full_body() {
        let body = "[To:1]Bob\n[rp aid=2 to=10-20]\n[info][title]Release[/title]v1 is out[/info]\n";
        assert_eq!(strip_tags(body), "Bob\n\nReleasev1 is out");
    }

    #[test]
    fn test_normalize_without_strip_keeps_body() {
        let msg = normalize("10", &raw("[To:1] hi ", 1_700_000_000), false);
        assert_eq!(msg.body, msg.raw_body);
        assert_eq!(msg.body, "[To:1] hi ");
        assert_eq!(msg.room_id, "10");
        assert_eq!(msg.message_id, "99");
        assert_eq!(msg.account_id, Some(7));
        assert_eq!(msg.account_name.as_deref(), Some("Alice"));
        assert_eq!(msg.send_time_iso.as_deref(), Some("2023-11-14T22:13:20.000Z"));
    }

    #[test]
    fn test_normalize_with_strip_only_touches_body() {
        let plain = normalize("10", &raw("[To:1] hi ", 5), false);
        let stripped = normalize("10", &raw("[To:1] hi ", 5), true);
        assert_eq!(stripped.body, "hi");
        assert_eq!(stripped.raw_body, "[To:1] hi ");
        assert_eq!(
            CanonicalMessage {
                body: plain.body.clone(),
                ..stripped.clone()
            },
            plain
        );
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let record = raw("[code]x[/code]", 1);
        assert_eq!(normalize("1", &record, true), normalize("1", &record, true));
        assert_eq!(normalize("1", &record, false), normalize("1", &record, false));
    }

    #[test]
    fn test_zero_send_time_has_no_iso() {
        let msg = normalize("1", &raw("x", 0), false);
        assert_eq!(msg.send_time_unix, 0);
        assert!(msg.send_time_iso.is_none());
    }

    #[test]
    fn test_out_of_range_send_time_is_unknown() {
        let msg = normalize("1", &raw("x", 9_000_000_000_000), false);
        assert_eq!(msg.send_time_unix, 0);
        assert!(msg.send_time_iso.is_none());

        let msg = normalize("1", &raw("x", -20), false);
        assert_eq!(msg.send_time_unix, 0);
        assert!(msg.send_time_iso.is_none());
    }

    #[test]
    fn test_missing_account() {
        let mut record = raw("x", 1);
        record.account = None;
        let msg = normalize("1", &record, false);
        assert!(msg.account_id.is_none());
        assert!(msg.account_name.is_none());
    }
}
