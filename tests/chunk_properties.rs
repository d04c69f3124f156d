//! Property tests for the body chunker over arbitrary text and limits.

use proptest::prelude::*;

use mailtask::chunk::chunk;

fn arb_text() -> impl Strategy<Value = String> {
    prop_oneof![
        "\\PC{0,400}",
        "[a-zñÁé \\n]{0,400}",
        "[ \\n]{0,20}[a-z]{1,40}( {1,3}|\\n{1,3})[a-z ]{0,200}",
    ]
}

fn without_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

proptest! {
    #[test]
    fn chunks_never_exceed_limit(text in arb_text(), max_len in 1usize..64) {
        for piece in chunk(&text, max_len) {
            prop_assert!(piece.chars().count() <= max_len, "{piece:?} exceeds {max_len}");
        }
    }

    #[test]
    fn chunks_keep_every_visible_character(text in arb_text(), max_len in 1usize..64) {
        let joined: String = chunk(&text, max_len).concat();
        prop_assert_eq!(without_whitespace(&joined), without_whitespace(&text));
    }

    #[test]
    fn no_chunk_is_empty(text in arb_text(), max_len in 1usize..64) {
        prop_assert!(chunk(&text, max_len).iter().all(|piece| !piece.is_empty()));
    }

    #[test]
    fn unbroken_text_is_cut_at_exactly_the_limit(text in "[^\\s]{1,300}", max_len in 1usize..64) {
        let pieces = chunk(&text, max_len);
        let (last, full) = pieces.split_last().unwrap();

        for piece in full {
            prop_assert_eq!(piece.chars().count(), max_len);
        }
        prop_assert!(last.chars().count() <= max_len);
        prop_assert_eq!(pieces.concat(), text);
    }
}
