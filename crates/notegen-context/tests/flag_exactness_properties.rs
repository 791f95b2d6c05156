//! Property: for every flag combination, the populated context fields are
//! exactly the enabled flags.

use notegen_context::ContextManager;
use notegen_core::{ContextFlags, DocumentSnapshot, MemoryVault, Position};
use proptest::prelude::*;

fn flags_strategy() -> impl Strategy<Value = ContextFlags> {
    (
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(
            |(title, stared, frontmatter, headings, children, mentions, highlights)| {
                ContextFlags {
                    include_title: title,
                    include_stared_blocks: stared,
                    include_frontmatter: frontmatter,
                    include_headings: headings,
                    include_children: children,
                    include_mentions: mentions,
                    include_highlights: highlights,
                }
            },
        )
}

fn fixture_vault() -> MemoryVault {
    let vault = MemoryVault::new();
    vault.insert("Child.md", "child body");
    vault.insert("Backlinker.md", "points at [[Active]] in a paragraph");
    vault
}

fn fixture_snapshot() -> DocumentSnapshot {
    DocumentSnapshot::new(
        "Active.md",
        "---\ntags: [a, b]\n---\n# Head\nbody ==mark== [[Child]]\n\n> [!star]\n> starred\n",
        Position::new(0, 0),
    )
}

proptest! {
    #[test]
    fn populated_fields_match_enabled_flags(flags in flags_strategy()) {
        let vault = fixture_vault();
        let ctx = ContextManager::new()
            .gather(&vault, &fixture_snapshot(), &flags)
            .unwrap();

        prop_assert_eq!(ctx.title.is_some(), flags.include_title);
        prop_assert_eq!(ctx.stared_blocks.is_some(), flags.include_stared_blocks);
        prop_assert_eq!(ctx.frontmatter.is_some(), flags.include_frontmatter);
        prop_assert_eq!(ctx.headings.is_some(), flags.include_headings);
        prop_assert_eq!(ctx.children.is_some(), flags.include_children);
        prop_assert_eq!(ctx.mentions.is_some(), flags.include_mentions);
        prop_assert_eq!(ctx.highlights.is_some(), flags.include_highlights);
    }

    #[test]
    fn enabled_fragments_are_found_in_fixture(flags in flags_strategy()) {
        let vault = fixture_vault();
        let ctx = ContextManager::new()
            .gather(&vault, &fixture_snapshot(), &flags)
            .unwrap();

        if let Some(frontmatter) = &ctx.frontmatter {
            prop_assert_eq!(frontmatter["tags"].as_str(), Some("a,b"));
        }
        if let Some(headings) = &ctx.headings {
            prop_assert_eq!(headings.len(), 1);
        }
        if let Some(highlights) = &ctx.highlights {
            let expected = ["mark".to_string()];
            prop_assert_eq!(highlights.as_slice(), expected.as_slice());
        }
        if let Some(children) = &ctx.children {
            prop_assert_eq!(children.len(), 1);
        }
        if let Some(mentions) = &ctx.mentions {
            prop_assert_eq!(mentions.len(), 1);
        }
    }
}
